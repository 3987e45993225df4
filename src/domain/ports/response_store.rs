//! Port for the atomic response commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::NewResponse;

/// Errors raised by response store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseStoreError {
    /// Store connection could not be established.
    #[error("response store connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("response store query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// A response for the same invitation hash was already committed.
    ///
    /// Raised by the storage-level uniqueness constraint on
    /// `invitation_token_hash`, the final authority when two submissions
    /// race past the pre-checks. Never retried by callers.
    #[error("a response for this invitation was already committed")]
    DuplicateResponse,
}

impl ResponseStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port committing a validated response as one unit of work.
///
/// `commit` persists the response header, every answer row, and the owning
/// invitation's `responded_at` transition inside a single transaction: either
/// all of it becomes visible or none of it does. An aborted call (dropped
/// future, connection loss) leaves no partial state behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Commit the response and mark its invitation responded at
    /// `responded_at`.
    async fn commit(
        &self,
        new_response: &NewResponse,
        responded_at: DateTime<Utc>,
    ) -> Result<(), ResponseStoreError>;
}

/// Fixture implementation for tests that do not exercise response commits.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResponseStore;

#[async_trait]
impl ResponseStore for FixtureResponseStore {
    async fn commit(
        &self,
        _new_response: &NewResponse,
        _responded_at: DateTime<Utc>,
    ) -> Result<(), ResponseStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_response_names_the_invitation_conflict() {
        let err = ResponseStoreError::DuplicateResponse;
        assert!(err.to_string().contains("already committed"));
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = ResponseStoreError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
