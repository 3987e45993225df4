//! Port for handing invitation links to the email collaborator.

use async_trait::async_trait;

/// Errors raised by mailer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationMailerError {
    /// The message could not be dispatched.
    #[error("invitation email delivery failed: {message}")]
    Delivery {
        /// Adapter-level failure description.
        message: String,
    },
}

impl InvitationMailerError {
    /// Create a delivery error with the given message.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }
}

/// Port delivering a single-use response link to one recipient.
///
/// Delivery failures never roll back invitation creation: the invitation is
/// durable once the ledger accepted it, and the operator recovers by issuing
/// a fresh one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationMailer: Send + Sync {
    /// Send the invitation email carrying `response_link`.
    async fn send_invitation(
        &self,
        recipient: &str,
        survey_title: &str,
        response_link: &str,
    ) -> Result<(), InvitationMailerError>;
}

/// Fixture implementation for tests that do not inspect outgoing mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvitationMailer;

#[async_trait]
impl InvitationMailer for FixtureInvitationMailer {
    async fn send_invitation(
        &self,
        _recipient: &str,
        _survey_title: &str,
        _response_link: &str,
    ) -> Result<(), InvitationMailerError> {
        Ok(())
    }
}
