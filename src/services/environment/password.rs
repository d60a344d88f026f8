//! Share password hashes.
//!
//! Stored as bcrypt hashes (`$2b$<cost>$...`). Checking runs on the blocking
//! pool: bcrypt is deliberately slow.

use tokio::task;

/// A stored hash that is not valid bcrypt never verifies.
pub async fn verify(stored: &str, candidate: &str) -> bool {
    let stored = stored.to_owned();
    let candidate = candidate.to_owned();

    match task::spawn_blocking(move || bcrypt::verify(candidate, &stored)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "share password hash is not a valid bcrypt hash");
            false
        }
        Err(err) => {
            tracing::error!(error = %err, "share password check did not complete");
            false
        }
    }
}
