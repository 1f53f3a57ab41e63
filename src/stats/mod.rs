//! Derived statistics over a snapshot of rows read at request time.
//!
//! Everything here is a pure function of its inputs: handlers fetch the
//! tables, these functions join them through id-keyed maps and return the
//! annotated rows already sorted for display.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use crate::models::*;

/// Count occurrences of each id.
pub fn count_by<I>(ids: I) -> HashMap<i64, usize>
where
    I: IntoIterator<Item = i64>,
{
    let mut counts = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// `round(part / total * 100)`, or 0 when nothing was played.
pub fn percentage(part: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as i64
}

/// Distinct tournaments each team is registered in.
fn tournaments_by_team(participants: &[TournamentParticipant]) -> HashMap<i64, HashSet<i64>> {
    let mut by_team: HashMap<i64, HashSet<i64>> = HashMap::new();
    for p in participants {
        by_team.entry(p.team_id).or_default().insert(p.tournament_id);
    }
    by_team
}

fn winners_by_match(results: &[MatchResult]) -> HashMap<i64, Option<i64>> {
    results.iter().map(|r| (r.match_id, r.winner_team_id)).collect()
}

/// Win/loss record per player, derived from the active memberships of both sides of every match.
///
/// A player listed on both teams of a match is counted once per side.
pub fn player_stats(
    players: Vec<Player>,
    memberships: &[TeamMembership],
    matches: &[Match],
    results: &[MatchResult],
    participants: &[TournamentParticipant],
) -> Vec<PlayerStats> {
    let active: Vec<&TeamMembership> = memberships.iter().filter(|m| m.is_active).collect();
    let team_counts = count_by(active.iter().map(|m| m.player_id));
    let winners = winners_by_match(results);
    let team_tournaments = tournaments_by_team(participants);

    let mut members_by_team: HashMap<i64, Vec<i64>> = HashMap::new();
    for m in &active {
        members_by_team.entry(m.team_id).or_default().push(m.player_id);
    }

    let mut played: HashMap<i64, usize> = HashMap::new();
    let mut won: HashMap<i64, usize> = HashMap::new();

    for m in matches {
        let winner = winners.get(&m.match_id).copied().flatten();
        for side in [m.team1_id, m.team2_id] {
            let Some(roster) = members_by_team.get(&side) else {
                continue;
            };
            for player_id in roster {
                *played.entry(*player_id).or_insert(0) += 1;
                if winner == Some(side) {
                    *won.entry(*player_id).or_insert(0) += 1;
                }
            }
        }
    }

    let mut stats: Vec<PlayerStats> = players
        .into_iter()
        .map(|player| {
            let id = player.player_id;
            let total_matches = played.get(&id).copied().unwrap_or(0);
            let matches_won = won.get(&id).copied().unwrap_or(0);

            let tournaments: HashSet<i64> = active
                .iter()
                .filter(|m| m.player_id == id)
                .filter_map(|m| team_tournaments.get(&m.team_id))
                .flatten()
                .copied()
                .collect();

            PlayerStats {
                player,
                total_teams: team_counts.get(&id).copied().unwrap_or(0),
                tournaments_played: tournaments.len(),
                matches_won,
                total_matches,
                win_rate: percentage(matches_won, total_matches),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.win_rate
            .cmp(&a.win_rate)
            .then(b.total_matches.cmp(&a.total_matches))
    });

    stats
}

/// Team standings with a 1-based rank assigned in sorted order.
pub fn team_rankings(
    teams: Vec<Team>,
    players: &[Player],
    memberships: &[TeamMembership],
    matches: &[Match],
    results: &[MatchResult],
    participants: &[TournamentParticipant],
) -> Vec<TeamStats> {
    let captain_names: HashMap<i64, &str> = players
        .iter()
        .map(|p| (p.player_id, p.player_name.as_str()))
        .collect();
    let member_counts = count_by(memberships.iter().filter(|m| m.is_active).map(|m| m.team_id));
    let winners = winners_by_match(results);
    let team_tournaments = tournaments_by_team(participants);

    let mut played: HashMap<i64, usize> = HashMap::new();
    let mut won: HashMap<i64, usize> = HashMap::new();

    for m in matches {
        let winner = winners.get(&m.match_id).copied().flatten();
        for side in [m.team1_id, m.team2_id] {
            *played.entry(side).or_insert(0) += 1;
            if winner == Some(side) {
                *won.entry(side).or_insert(0) += 1;
            }
        }
    }

    let mut stats: Vec<TeamStats> = teams
        .into_iter()
        .map(|team| {
            let id = team.team_id;
            let total_matches = played.get(&id).copied().unwrap_or(0);
            let wins = won.get(&id).copied().unwrap_or(0);

            TeamStats {
                captain_name: captain_names.get(&team.captain_id).map(|n| n.to_string()),
                member_count: member_counts.get(&id).copied().unwrap_or(0),
                tournaments_joined: team_tournaments.get(&id).map_or(0, |t| t.len()),
                wins,
                losses: total_matches - wins,
                total_matches,
                win_percentage: percentage(wins, total_matches),
                rank: 0,
                team,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.win_percentage
            .cmp(&a.win_percentage)
            .then(b.wins.cmp(&a.wins))
            .then(b.total_matches.cmp(&a.total_matches))
    });

    for (index, team) in stats.iter_mut().enumerate() {
        team.rank = index + 1;
    }

    stats
}

/// Accepts plain dates as well as full timestamps.
fn parse_start_date(value: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Match progress per tournament, newest start date first.
pub fn tournament_progress(
    tournaments: Vec<Tournament>,
    teams: &[Team],
    participants: &[TournamentParticipant],
    matches: &[Match],
) -> Vec<TournamentStats> {
    let team_names: HashMap<i64, &str> = teams
        .iter()
        .map(|t| (t.team_id, t.team_name.as_str()))
        .collect();
    let participant_counts = count_by(participants.iter().map(|p| p.tournament_id));
    let total = count_by(matches.iter().map(|m| m.tournament_id));
    let completed = count_by(
        matches
            .iter()
            .filter(|m| m.status == MATCH_COMPLETED)
            .map(|m| m.tournament_id),
    );

    let mut stats: Vec<TournamentStats> = tournaments
        .into_iter()
        .map(|tournament| {
            let id = tournament.tour_id;
            let total_matches = total.get(&id).copied().unwrap_or(0);
            let completed_matches = completed.get(&id).copied().unwrap_or(0);

            TournamentStats {
                organizer: tournament
                    .organizer_team_id
                    .and_then(|team_id| team_names.get(&team_id))
                    .map_or_else(|| "No Organizer".to_string(), |n| n.to_string()),
                participating_teams: participant_counts.get(&id).copied().unwrap_or(0),
                total_matches,
                completed_matches,
                tournament_status: TournamentStatus::from_counts(total_matches, completed_matches),
                progress_percentage: percentage(completed_matches, total_matches),
                tournament,
            }
        })
        .collect();

    // None sorts below Some, so unparseable dates land at the end.
    stats.sort_by(|a, b| {
        parse_start_date(&b.tournament.start_date).cmp(&parse_start_date(&a.tournament.start_date))
    });

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64, name: &str) -> Player {
        Player {
            player_id: id,
            player_name: name.to_string(),
            age: 20,
            username: name.to_lowercase(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn team(id: i64, name: &str, captain_id: i64) -> Team {
        Team { team_id: id, team_name: name.to_string(), captain_id }
    }

    fn member(id: i64, team_id: i64, player_id: i64, is_active: bool) -> TeamMembership {
        TeamMembership {
            member_id: id,
            team_id,
            player_id,
            role: ROLE_MEMBER.to_string(),
            is_active,
        }
    }

    fn game(id: i64, tournament_id: i64, team1_id: i64, team2_id: i64, status: &str) -> Match {
        Match {
            match_id: id,
            tournament_id,
            round: "1".to_string(),
            scheduled_at: "2025-06-01T18:00:00".to_string(),
            team1_id,
            team2_id,
            status: status.to_string(),
        }
    }

    fn result(match_id: i64, winner: Option<i64>) -> MatchResult {
        MatchResult {
            result_id: match_id,
            match_id,
            winner_team_id: winner,
            team1_score: 0,
            team2_score: 0,
            match_duration: None,
            notes: None,
        }
    }

    fn tournament(id: i64, start_date: &str, organizer: Option<i64>) -> Tournament {
        Tournament {
            tour_id: id,
            tour_name: format!("Cup {id}"),
            tour_season: None,
            start_date: start_date.to_string(),
            end_date: start_date.to_string(),
            organizer_team_id: organizer,
            max_participants: DEFAULT_MAX_PARTICIPANTS,
        }
    }

    #[test]
    fn percentage_rounds_and_handles_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn player_win_rate_counts_only_active_memberships() {
        let players = vec![player(1, "Alice"), player(2, "Bob"), player(3, "Cleo")];
        let memberships = vec![
            member(1, 10, 1, true),
            member(2, 20, 2, true),
            member(3, 20, 3, false),
        ];
        let matches = vec![
            game(100, 1, 10, 20, MATCH_COMPLETED),
            game(101, 1, 10, 20, MATCH_COMPLETED),
            game(102, 1, 20, 10, MATCH_SCHEDULED),
        ];
        let results = vec![result(100, Some(10)), result(101, Some(20))];

        let stats = player_stats(players, &memberships, &matches, &results, &[]);
        let by_id: HashMap<i64, &PlayerStats> = stats.iter().map(|s| (s.player.player_id, s)).collect();

        assert_eq!(by_id[&1].total_matches, 3);
        assert_eq!(by_id[&1].matches_won, 1);
        assert_eq!(by_id[&1].win_rate, 33);
        assert_eq!(by_id[&2].win_rate, 33);
        assert_eq!(by_id[&3].total_matches, 0);
        assert_eq!(by_id[&3].win_rate, 0);
        assert_eq!(by_id[&3].total_teams, 0);
        assert_eq!(stats.last().unwrap().player.player_id, 3);
    }

    #[test]
    fn players_sorted_by_win_rate_then_matches() {
        let players = vec![player(1, "Alice"), player(2, "Bob"), player(3, "Cleo")];
        let memberships = vec![
            member(1, 10, 1, true),
            member(2, 20, 2, true),
            member(3, 30, 3, true),
        ];
        let matches = vec![
            game(100, 1, 10, 20, MATCH_COMPLETED),
            game(101, 1, 30, 20, MATCH_COMPLETED),
            game(102, 1, 30, 20, MATCH_COMPLETED),
        ];
        let results = vec![result(100, Some(10)), result(101, Some(30)), result(102, Some(30))];

        let stats = player_stats(players, &memberships, &matches, &results, &[]);
        let order: Vec<i64> = stats.iter().map(|s| s.player.player_id).collect();

        // Alice and Cleo are both at 100%, Cleo has played more.
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn tournaments_played_follows_team_participation() {
        let players = vec![player(1, "Alice")];
        let memberships = vec![member(1, 10, 1, true), member(2, 20, 1, true)];
        let participants = vec![
            TournamentParticipant { tournament_id: 1, team_id: 10 },
            TournamentParticipant { tournament_id: 1, team_id: 20 },
            TournamentParticipant { tournament_id: 2, team_id: 20 },
        ];

        let stats = player_stats(players, &memberships, &[], &[], &participants);
        assert_eq!(stats[0].total_teams, 2);
        assert_eq!(stats[0].tournaments_played, 2);
    }

    #[test]
    fn team_ranking_is_dense_and_ordered() {
        let teams = vec![team(10, "Red", 1), team(20, "Blue", 2), team(30, "Green", 3)];
        let players = vec![player(1, "Alice"), player(2, "Bob")];
        let matches = vec![
            game(100, 1, 10, 20, MATCH_COMPLETED),
            game(101, 1, 20, 30, MATCH_COMPLETED),
            game(102, 1, 10, 30, MATCH_COMPLETED),
        ];
        let results = vec![result(100, Some(10)), result(101, Some(20)), result(102, Some(10))];

        let stats = team_rankings(teams, &players, &[], &matches, &results, &[]);

        let order: Vec<i64> = stats.iter().map(|s| s.team.team_id).collect();
        let ranks: Vec<usize> = stats.iter().map(|s| s.rank).collect();
        assert_eq!(order, vec![10, 20, 30]);
        assert_eq!(ranks, vec![1, 2, 3]);

        assert_eq!(stats[0].wins, 2);
        assert_eq!(stats[0].losses, 0);
        assert_eq!(stats[0].win_percentage, 100);
        assert_eq!(stats[0].captain_name.as_deref(), Some("Alice"));
        assert_eq!(stats[1].win_percentage, 50);
        assert_eq!(stats[2].losses, 2);
        assert_eq!(stats[2].captain_name, None);
    }

    #[test]
    fn team_ties_break_on_wins_then_matches() {
        let teams = vec![team(10, "Red", 1), team(20, "Blue", 1), team(30, "Green", 1), team(40, "Gold", 1)];
        // Red 1/2, Blue 2/4, Green 1/2 with nothing else, Gold 0/0.
        let matches = vec![
            game(1, 1, 10, 20, MATCH_COMPLETED),
            game(2, 1, 10, 20, MATCH_COMPLETED),
            game(3, 1, 20, 30, MATCH_COMPLETED),
            game(4, 1, 20, 30, MATCH_COMPLETED),
        ];
        let results = vec![
            result(1, Some(10)),
            result(2, Some(20)),
            result(3, Some(20)),
            result(4, Some(30)),
        ];

        let stats = team_rankings(teams, &[], &[], &matches, &results, &[]);
        let order: Vec<i64> = stats.iter().map(|s| s.team.team_id).collect();

        assert_eq!(order[0], 20);
        assert_eq!(stats[0].total_matches, 4);
        assert_eq!(order[3], 40);
        assert_eq!(stats[3].rank, 4);
    }

    #[test]
    fn matches_without_result_count_as_played_not_won() {
        let teams = vec![team(10, "Red", 1), team(20, "Blue", 1)];
        let matches = vec![game(1, 1, 10, 20, MATCH_SCHEDULED)];

        let stats = team_rankings(teams, &[], &[], &matches, &[], &[]);
        assert!(stats.iter().all(|s| s.total_matches == 1 && s.wins == 0 && s.losses == 1));
    }

    #[test]
    fn tournament_progress_labels_and_order() {
        let tournaments = vec![
            tournament(1, "2025-01-10", Some(10)),
            tournament(2, "2025-05-01", None),
            tournament(3, "not a date", None),
            tournament(4, "2025-03-01", Some(99)),
        ];
        let teams = vec![team(10, "Red", 1)];
        let participants = vec![
            TournamentParticipant { tournament_id: 1, team_id: 10 },
            TournamentParticipant { tournament_id: 1, team_id: 20 },
        ];
        let matches = vec![
            game(1, 1, 10, 20, MATCH_COMPLETED),
            game(2, 1, 10, 20, MATCH_COMPLETED),
            game(3, 4, 10, 20, MATCH_COMPLETED),
            game(4, 4, 10, 20, MATCH_SCHEDULED),
            game(5, 4, 10, 20, MATCH_SCHEDULED),
            game(6, 2, 10, 20, MATCH_SCHEDULED),
        ];

        let stats = tournament_progress(tournaments, &teams, &participants, &matches);
        let order: Vec<i64> = stats.iter().map(|s| s.tournament.tour_id).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);

        let by_id: HashMap<i64, &TournamentStats> = stats.iter().map(|s| (s.tournament.tour_id, s)).collect();
        assert_eq!(by_id[&1].tournament_status, TournamentStatus::Completed);
        assert_eq!(by_id[&1].progress_percentage, 100);
        assert_eq!(by_id[&1].participating_teams, 2);
        assert_eq!(by_id[&1].organizer, "Red");
        assert_eq!(by_id[&2].tournament_status, TournamentStatus::Scheduled);
        assert_eq!(by_id[&2].organizer, "No Organizer");
        assert_eq!(by_id[&3].tournament_status, TournamentStatus::NotStarted);
        assert_eq!(by_id[&4].tournament_status, TournamentStatus::InProgress);
        assert_eq!(by_id[&4].progress_percentage, 33);
        assert_eq!(by_id[&4].organizer, "No Organizer");
    }
}
