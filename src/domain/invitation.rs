//! Single-use survey invitations.
//!
//! An invitation is identified internally by its token hash; the plaintext
//! secret never appears here. Expiry is derived at evaluation time, never
//! stored as a flag.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token::TokenHash;

/// Lifecycle state of an invitation, derived from its timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    /// Open for exactly one submission.
    Issued,
    /// Consumed by a successful submission. Terminal.
    Responded,
    /// Past its expiry timestamp without a response. Terminal.
    Expired,
}

/// A single-use right to submit one response to one survey.
///
/// ## Invariants
/// - Only the token hash is ever stored; the plaintext stays with the
///   respondent.
/// - `responded_at` is set at most once, inside the response commit; no other
///   mutation exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyInvitation {
    token_hash: TokenHash,
    survey_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    responded_at: Option<DateTime<Utc>>,
}

impl SurveyInvitation {
    /// Create a freshly issued invitation.
    #[must_use]
    pub fn issue(
        token_hash: TokenHash,
        survey_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            token_hash,
            survey_id,
            created_at,
            expires_at,
            responded_at: None,
        }
    }

    /// Rehydrate an invitation read back from the ledger.
    #[must_use]
    pub fn from_record(
        token_hash: TokenHash,
        survey_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        responded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            token_hash,
            survey_id,
            created_at,
            expires_at,
            responded_at,
        }
    }

    /// Stored digest identifying this invitation.
    #[must_use]
    pub fn token_hash(&self) -> &TokenHash {
        &self.token_hash
    }

    /// Owning survey.
    #[must_use]
    pub fn survey_id(&self) -> Uuid {
        self.survey_id
    }

    /// Issuance timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Optional expiry timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Moment the invitation was consumed, if it has been.
    #[must_use]
    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Derive the lifecycle state at `now`.
    ///
    /// A recorded response wins over expiry: an invitation answered before
    /// its deadline stays `Responded` forever.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.responded_at.is_some() {
            return InvitationStatus::Responded;
        }
        match self.expires_at {
            Some(expires_at) if expires_at < now => InvitationStatus::Expired,
            _ => InvitationStatus::Issued,
        }
    }
}
