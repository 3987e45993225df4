//! Port for the invitation ledger: issuance records and hash lookups.

use async_trait::async_trait;

use crate::domain::{SurveyInvitation, TokenHash};

/// Errors raised by invitation ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationLedgerError {
    /// Ledger connection could not be established.
    #[error("invitation ledger connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("invitation ledger query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// An invitation with the same token hash already exists.
    ///
    /// Astronomically unlikely for CSPRNG-minted tokens; the issuing service
    /// regenerates once and treats a repeat as fatal.
    #[error("invitation token hash already exists")]
    DuplicateToken,
}

impl InvitationLedgerError {
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

/// Port for persisting invitations and reading them back by hash.
///
/// The only write is `add`: the transition to responded happens exclusively
/// inside the response commit (see the response store port), so it can never
/// run outside that unit of work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationLedger: Send + Sync {
    /// Insert a freshly issued invitation.
    async fn add(&self, invitation: &SurveyInvitation) -> Result<(), InvitationLedgerError>;

    /// Find an invitation by its token hash.
    async fn find_by_hash(
        &self,
        hash: &TokenHash,
    ) -> Result<Option<SurveyInvitation>, InvitationLedgerError>;
}

/// Fixture implementation for tests that do not exercise the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvitationLedger;

#[async_trait]
impl InvitationLedger for FixtureInvitationLedger {
    async fn add(&self, _invitation: &SurveyInvitation) -> Result<(), InvitationLedgerError> {
        Ok(())
    }

    async fn find_by_hash(
        &self,
        _hash: &TokenHash,
    ) -> Result<Option<SurveyInvitation>, InvitationLedgerError> {
        Ok(None)
    }
}
