//! Startup schema bootstrap: embedded migrations with retry.
//!
//! The database is commonly still starting when the service comes up, so
//! the first attempts are expected to fail. Each failed attempt backs off
//! exponentially before retrying; only exhausting every attempt is fatal.

use std::time::Duration;

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task::spawn_blocking;
use tokio::time::sleep;
use tracing::{info, warn};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Default number of connection attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Errors raised while bootstrapping the schema.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Every attempt to connect and migrate failed.
    #[error("database bootstrap failed after {attempts} attempts: {message}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Last underlying failure.
        message: String,
    },
    /// The blocking migration task panicked or was cancelled.
    #[error("database bootstrap task failed: {message}")]
    Task {
        /// Join failure description.
        message: String,
    },
}

fn migrate_once(database_url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| err.to_string())?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Run pending migrations, retrying with exponential backoff.
///
/// Migrations use a synchronous connection on a blocking task; they run
/// once at startup and their duration does not matter to the runtime.
pub async fn run_migrations_with_retry(
    database_url: &str,
    max_attempts: u32,
) -> Result<(), BootstrapError> {
    let mut last_failure = String::new();

    for attempt in 1..=max_attempts {
        let url = database_url.to_owned();
        let outcome = spawn_blocking(move || migrate_once(&url))
            .await
            .map_err(|err| BootstrapError::Task {
                message: err.to_string(),
            })?;

        match outcome {
            Ok(()) => {
                info!(attempt, "database schema ensured");
                return Ok(());
            }
            Err(message) => {
                last_failure = message;
                if attempt < max_attempts {
                    let delay = Duration::from_secs(1 << attempt);
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %last_failure,
                        "database bootstrap attempt failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    Err(BootstrapError::Exhausted {
        attempts: max_attempts,
        message: last_failure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_database_exhausts_attempts() {
        let error = run_migrations_with_retry("postgres://127.0.0.1:1/none", 1)
            .await
            .expect_err("no database listening");

        match error {
            BootstrapError::Exhausted { attempts, .. } => assert_eq!(attempts, 1),
            BootstrapError::Task { message } => panic!("unexpected task failure: {message}"),
        }
    }
}
