//! Drop-directory mailer writing each invitation as a text file.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{InvitationMailer, InvitationMailerError};

use super::invitation_body;

/// Mailer that drops each message into a directory instead of sending it.
///
/// Used in local development and by end-to-end checks that want to inspect
/// outgoing mail without a mail server.
#[derive(Debug, Clone)]
pub struct DropDirectoryMailer {
    directory: PathBuf,
}

impl DropDirectoryMailer {
    /// Create a mailer writing into `directory`. The directory is created
    /// on first send if it does not exist.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn next_filename(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
        self.directory
            .join(format!("{stamp}-{}.txt", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl InvitationMailer for DropDirectoryMailer {
    async fn send_invitation(
        &self,
        recipient: &str,
        survey_title: &str,
        response_link: &str,
    ) -> Result<(), InvitationMailerError> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|err| InvitationMailerError::delivery(err.to_string()))?;

        let contents = format!(
            "To: {recipient}\nSubject: You're invited: {survey_title}\n\n{}",
            invitation_body(survey_title, response_link)
        );

        let path = self.next_filename();
        fs::write(&path, contents)
            .await
            .map_err(|err| InvitationMailerError::delivery(err.to_string()))?;

        info!(path = %path.display(), recipient, "wrote invitation email to drop directory");
        Ok(())
    }
}
