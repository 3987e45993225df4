//! Driving port for the anonymous respondent boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AnswerDraft, Error};

use super::survey_admin::QuestionView;

/// What a respondent with a live token is allowed to see.
///
/// Carries no invitation internals and no id useful for enumerating other
/// surveys' state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentSurveyView {
    /// Survey title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Expiry of the presenting invitation, if one was set.
    pub expires_at: Option<DateTime<Utc>>,
    /// Questions in order.
    pub questions: Vec<QuestionView>,
}

/// Input to a response submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponseRequest {
    /// Plaintext invitation token from the response link.
    pub token: String,
    /// One answer per survey question.
    pub answers: Vec<AnswerDraft>,
}

/// Driving port exposed to the respondent-facing boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RespondentGateway: Send + Sync {
    /// Resolve the survey behind a presented token.
    ///
    /// Unknown, already-responded, and expired tokens all come back as
    /// `None` so a dead link reveals nothing about why it died.
    async fn resolve_for_respondent(
        &self,
        token: &str,
    ) -> Result<Option<RespondentSurveyView>, Error>;

    /// Validate and commit exactly one response for the token's invitation.
    async fn submit(&self, request: SubmitResponseRequest) -> Result<(), Error>;
}
