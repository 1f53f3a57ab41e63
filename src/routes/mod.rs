pub mod health;
pub mod matches;
pub mod players;
pub mod stats;
pub mod teams;
pub mod tournaments;

/// Optional relations (participants, results) read as empty when the store can't serve them.
pub(crate) fn or_empty<T>(rows: Result<Vec<T>, sqlx::Error>, relation: &str) -> Vec<T> {
    rows.unwrap_or_else(|err| {
        tracing::warn!("No {} found, continuing: {}", relation, err);
        Vec::new()
    })
}
