//! Mailer that records invitations in the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{InvitationMailer, InvitationMailerError};

/// Fallback mailer for deployments without an email collaborator.
///
/// The invitation link is deliberately absent from the log line: the
/// plaintext token must not end up in log storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyMailer;

#[async_trait]
impl InvitationMailer for LogOnlyMailer {
    async fn send_invitation(
        &self,
        recipient: &str,
        survey_title: &str,
        _response_link: &str,
    ) -> Result<(), InvitationMailerError> {
        info!(recipient, survey_title, "email delivery disabled, invitation not sent");
        Ok(())
    }
}
