//! Driving port for administrator survey operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Survey, SurveyQuestion, SurveyStats};

/// Question projection shared by admin and respondent read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// Question identity.
    pub id: Uuid,
    /// Prompt text.
    pub prompt: String,
    /// Storage tag of the question kind.
    pub question_type: String,
    /// Choice list; empty for free text.
    pub options: Vec<String>,
}

impl From<&SurveyQuestion> for QuestionView {
    fn from(question: &SurveyQuestion) -> Self {
        Self {
            id: question.id(),
            prompt: question.prompt().to_owned(),
            question_type: question.question_type().as_str().to_owned(),
            options: question.options().map(<[String]>::to_vec).unwrap_or_default(),
        }
    }
}

/// Full admin projection of one survey with its stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDetails {
    /// Survey identity.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Number of invitations issued.
    pub invitation_count: u64,
    /// Number of accepted responses.
    pub response_count: u64,
    /// Questions in order.
    pub questions: Vec<QuestionView>,
}

impl SurveyDetails {
    /// Project a survey aggregate plus its stats.
    #[must_use]
    pub fn project(survey: &Survey, stats: SurveyStats) -> Self {
        Self {
            id: survey.id(),
            title: survey.title().to_owned(),
            description: survey.description().map(str::to_owned),
            created_at: survey.created_at(),
            invitation_count: stats.invitation_count,
            response_count: stats.response_count,
            questions: survey.questions().iter().map(QuestionView::from).collect(),
        }
    }
}

/// Compact list projection of one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyListItem {
    /// Survey identity.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Number of questions.
    pub question_count: usize,
    /// Number of invitations issued.
    pub invitation_count: u64,
    /// Number of accepted responses.
    pub response_count: u64,
}

/// Input to survey creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSurveyRequest {
    /// Survey title; trimmed by the service.
    pub title: String,
    /// Optional description; trimmed, blank collapses to none.
    pub description: Option<String>,
    /// Question prompts in presentation order.
    pub prompts: Vec<String>,
}

/// Input to invitation issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueInvitationsRequest {
    /// Recipient addresses; normalized by the service.
    pub emails: Vec<String>,
    /// Optional shared expiry for the issued batch.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Per-recipient outcome of an issuance batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedInvitation {
    /// Normalized recipient address.
    pub recipient: String,
    /// Whether the email collaborator accepted the message. The invitation
    /// itself is durable either way.
    pub email_dispatched: bool,
}

/// Outcome of an issuance batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInvitationsOutcome {
    /// One entry per normalized recipient, in issuance order.
    pub issued: Vec<IssuedInvitation>,
}

/// Driving port exposed to the administrator-facing boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SurveyAdmin: Send + Sync {
    /// Create a survey with its questions atomically.
    async fn create_survey(&self, request: CreateSurveyRequest) -> Result<SurveyDetails, Error>;

    /// List all surveys with their stats, newest first.
    async fn list_surveys(&self) -> Result<Vec<SurveyListItem>, Error>;

    /// Fetch one survey with its stats.
    async fn get_survey(&self, survey_id: Uuid) -> Result<SurveyDetails, Error>;

    /// Issue single-use invitations and hand the links to the mailer.
    async fn issue_invitations(
        &self,
        survey_id: Uuid,
        request: IssueInvitationsRequest,
    ) -> Result<IssueInvitationsOutcome, Error>;
}
