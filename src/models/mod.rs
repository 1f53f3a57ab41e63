use serde::{Deserialize, Serialize};
use crate::error::ApiError;

pub const ROLE_CAPTAIN: &str = "captain";
pub const ROLE_MEMBER: &str = "member";

pub const MATCH_SCHEDULED: &str = "scheduled";
pub const MATCH_COMPLETED: &str = "completed";

pub const DEFAULT_MAX_PARTICIPANTS: i64 = 16;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Player row from the `player` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub player_id: i64,
    pub player_name: String,
    pub age: i64,
    pub username: String,
    pub email: String,
}

/// Id + name projection used by selection dropdowns
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerOption {
    pub player_id: i64,
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub team_id: i64,
    pub team_name: String,
    pub captain_id: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamOption {
    pub team_id: i64,
    pub team_name: String,
}

/// Row from `team_members`; only `is_active` rows count toward membership
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMembership {
    pub member_id: i64,
    pub team_id: i64,
    pub player_id: i64,
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tournament {
    pub tour_id: i64,
    pub tour_name: String,
    pub tour_season: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub organizer_team_id: Option<i64>,
    pub max_participants: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct TournamentOption {
    pub tour_id: i64,
    pub tour_name: String,
    pub tour_season: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TournamentParticipant {
    pub tournament_id: i64,
    pub team_id: i64,
}

/// Match row from `match_table`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub match_id: i64,
    pub tournament_id: i64,
    pub round: String,
    pub scheduled_at: String,
    pub team1_id: i64,
    pub team2_id: i64,
    pub status: String,
}

/// At most one per match, keyed by `match_id`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchResult {
    pub result_id: i64,
    pub match_id: i64,
    pub winner_team_id: Option<i64>,
    pub team1_score: i64,
    pub team2_score: i64,
    /// Minutes
    pub match_duration: Option<i64>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Annotated listings
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerWithTeams {
    #[serde(flatten)]
    pub player: Player,
    /// Comma-joined active team names, "No team" when there are none
    pub teams: String,
    pub team_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamWithDetails {
    #[serde(flatten)]
    pub team: Team,
    pub captain_name: Option<String>,
    pub member_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentWithDetails {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub organizer_name: String,
    pub participant_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchWithDetails {
    #[serde(flatten)]
    pub match_row: Match,
    pub tour_name: String,
    pub team1_name: String,
    pub team2_name: String,
    pub team1_score: Option<i64>,
    pub team2_score: Option<i64>,
    pub winner_name: Option<String>,
    pub match_duration: Option<i64>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(flatten)]
    pub player: Player,
    pub total_teams: usize,
    pub tournaments_played: usize,
    pub matches_won: usize,
    pub total_matches: usize,
    pub win_rate: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamStats {
    #[serde(flatten)]
    pub team: Team,
    pub captain_name: Option<String>,
    pub member_count: usize,
    pub tournaments_joined: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_matches: usize,
    pub win_percentage: i64,
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TournamentStatus {
    pub fn from_counts(total_matches: usize, completed_matches: usize) -> Self {
        if total_matches == 0 {
            TournamentStatus::NotStarted
        } else if completed_matches == total_matches {
            TournamentStatus::Completed
        } else if completed_matches > 0 {
            TournamentStatus::InProgress
        } else {
            TournamentStatus::Scheduled
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentStats {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub organizer: String,
    pub participating_teams: usize,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub tournament_status: TournamentStatus,
    pub progress_percentage: i64,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

// Empty strings count as missing, the same as an absent field.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Form submissions send the age as text; JSON clients send a number.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid age: {text:?}"))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerPayload {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub age: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub player_name: String,
    pub age: i64,
    pub username: String,
    pub email: String,
}

impl PlayerPayload {
    pub fn validate(self) -> Result<NewPlayer, ApiError> {
        match (present(self.player_name), self.age, present(self.username), present(self.email)) {
            (Some(player_name), Some(age), Some(username), Some(email)) => Ok(NewPlayer {
                player_name,
                age,
                username,
                email,
            }),
            _ => Err(ApiError::bad_request("All fields are required")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamPayload {
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub captain_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTeam {
    pub team_name: String,
    pub captain_id: i64,
}

impl TeamPayload {
    pub fn validate(self) -> Result<NewTeam, ApiError> {
        match (present(self.team_name), self.captain_id) {
            (Some(team_name), Some(captain_id)) => Ok(NewTeam { team_name, captain_id }),
            _ => Err(ApiError::bad_request("Team name and captain are required")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TournamentPayload {
    #[serde(default)]
    pub tour_name: Option<String>,
    #[serde(default)]
    pub tour_season: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub organizer_team_id: Option<i64>,
    #[serde(default)]
    pub max_participants: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTournament {
    pub tour_name: String,
    pub tour_season: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub organizer_team_id: Option<i64>,
    /// `None` means "use the default" on create and "leave unchanged" on update
    pub max_participants: Option<i64>,
}

impl TournamentPayload {
    pub fn validate(self) -> Result<NewTournament, ApiError> {
        match (present(self.tour_name), present(self.start_date), present(self.end_date)) {
            (Some(tour_name), Some(start_date), Some(end_date)) => Ok(NewTournament {
                tour_name,
                tour_season: present(self.tour_season),
                start_date,
                end_date,
                organizer_team_id: self.organizer_team_id,
                max_participants: self.max_participants,
            }),
            _ => Err(ApiError::bad_request(
                "Tournament name, start date, and end date are required",
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchPayload {
    #[serde(default)]
    pub tournament_id: Option<i64>,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub team1_id: Option<i64>,
    #[serde(default)]
    pub team2_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub tournament_id: i64,
    pub round: String,
    pub scheduled_at: String,
    pub team1_id: i64,
    pub team2_id: i64,
    pub status: String,
}

impl MatchPayload {
    pub fn validate(self) -> Result<NewMatch, ApiError> {
        // A self-match is rejected whatever else the body contains.
        if let (Some(team1_id), Some(team2_id)) = (self.team1_id, self.team2_id) {
            if team1_id == team2_id {
                return Err(ApiError::bad_request("Team cannot play against itself"));
            }
        }

        match (
            self.tournament_id,
            present(self.round),
            present(self.scheduled_at),
            self.team1_id,
            self.team2_id,
        ) {
            (Some(tournament_id), Some(round), Some(scheduled_at), Some(team1_id), Some(team2_id)) => {
                Ok(NewMatch {
                    tournament_id,
                    round,
                    scheduled_at,
                    team1_id,
                    team2_id,
                    status: present(self.status).unwrap_or_else(|| MATCH_SCHEDULED.to_string()),
                })
            }
            _ => Err(ApiError::bad_request("All match fields are required")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchResultPayload {
    #[serde(default)]
    pub winner_team_id: Option<i64>,
    #[serde(default)]
    pub team1_score: Option<i64>,
    #[serde(default)]
    pub team2_score: Option<i64>,
    #[serde(default)]
    pub match_duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMatchResult {
    pub winner_team_id: Option<i64>,
    pub team1_score: i64,
    pub team2_score: i64,
    pub match_duration: Option<i64>,
    pub notes: Option<String>,
}

impl MatchResultPayload {
    pub fn validate(self) -> Result<NewMatchResult, ApiError> {
        match (self.team1_score, self.team2_score) {
            (Some(team1_score), Some(team2_score)) => Ok(NewMatchResult {
                winner_team_id: self.winner_team_id,
                team1_score,
                team2_score,
                match_duration: self.match_duration,
                notes: self.notes,
            }),
            _ => Err(ApiError::bad_request("Both team scores are required")),
        }
    }
}

// ---------------------------------------------------------------------------
// Mutation responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerCreated {
    pub player_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamCreated {
    pub team_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentCreated {
    pub tour_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchCreated {
    pub match_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResultRecorded {
    pub result_id: i64,
    pub message: String,
}
