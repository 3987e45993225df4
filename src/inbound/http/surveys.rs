//! Administrator survey HTTP handlers.
//!
//! ```text
//! POST /api/v1/surveys
//! GET  /api/v1/surveys
//! GET  /api/v1/surveys/{id}
//! POST /api/v1/surveys/{id}/invitations
//! ```
//!
//! All routes require the configured administrator bearer token.

use actix_web::{get, post, web, HttpRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateSurveyRequest, IssueInvitationsOutcome, IssueInvitationsRequest, IssuedInvitation,
    QuestionView, SurveyDetails, SurveyListItem,
};
use crate::domain::Error;
use crate::inbound::http::auth::AdminAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional_rfc3339_timestamp, parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Request payload for creating a survey.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequestBody {
    /// Survey title.
    pub title: String,
    /// Optional description shown to respondents.
    pub description: Option<String>,
    /// Questions in presentation order.
    pub questions: Vec<CreateQuestionBody>,
}

/// One question within a survey creation request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionBody {
    /// Prompt text.
    pub prompt: String,
}

/// Request payload for issuing an invitation batch.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueInvitationsRequestBody {
    /// Recipient email addresses.
    pub emails: Vec<String>,
    /// Optional RFC 3339 expiry shared by the whole batch.
    #[schema(format = "date-time")]
    pub expires_at: Option<String>,
}

/// Question projection returned to administrators.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBody {
    /// Question identity.
    #[schema(format = "uuid")]
    pub id: String,
    /// Prompt text.
    pub prompt: String,
    /// Storage tag of the question kind.
    pub question_type: String,
    /// Choice list; empty for free text.
    pub options: Vec<String>,
}

/// Full survey projection with stats.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDetailsBody {
    /// Survey identity.
    #[schema(format = "uuid")]
    pub id: String,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// RFC 3339 creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Number of invitations issued.
    pub invitation_count: u64,
    /// Number of accepted responses.
    pub response_count: u64,
    /// Questions in order.
    pub questions: Vec<QuestionBody>,
}

/// Compact survey projection for listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyListItemBody {
    /// Survey identity.
    #[schema(format = "uuid")]
    pub id: String,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// RFC 3339 creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Number of questions.
    pub question_count: usize,
    /// Number of invitations issued.
    pub invitation_count: u64,
    /// Number of accepted responses.
    pub response_count: u64,
}

/// Per-recipient outcome of an issuance batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedInvitationBody {
    /// Normalized recipient address.
    pub recipient: String,
    /// Whether the email was handed off; the invitation is durable either
    /// way.
    pub email_dispatched: bool,
}

/// Response payload for an issuance batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueInvitationsResponseBody {
    /// One entry per normalized recipient, in issuance order.
    pub issued: Vec<IssuedInvitationBody>,
}

impl From<QuestionView> for QuestionBody {
    fn from(value: QuestionView) -> Self {
        Self {
            id: value.id.to_string(),
            prompt: value.prompt,
            question_type: value.question_type,
            options: value.options,
        }
    }
}

impl From<SurveyDetails> for SurveyDetailsBody {
    fn from(value: SurveyDetails) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            created_at: value.created_at.to_rfc3339(),
            invitation_count: value.invitation_count,
            response_count: value.response_count,
            questions: value.questions.into_iter().map(QuestionBody::from).collect(),
        }
    }
}

impl From<SurveyListItem> for SurveyListItemBody {
    fn from(value: SurveyListItem) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            created_at: value.created_at.to_rfc3339(),
            question_count: value.question_count,
            invitation_count: value.invitation_count,
            response_count: value.response_count,
        }
    }
}

impl From<IssuedInvitation> for IssuedInvitationBody {
    fn from(value: IssuedInvitation) -> Self {
        Self {
            recipient: value.recipient,
            email_dispatched: value.email_dispatched,
        }
    }
}

impl From<IssueInvitationsOutcome> for IssueInvitationsResponseBody {
    fn from(value: IssueInvitationsOutcome) -> Self {
        Self {
            issued: value
                .issued
                .into_iter()
                .map(IssuedInvitationBody::from)
                .collect(),
        }
    }
}

/// Create a survey with its questions.
#[utoipa::path(
    post,
    path = "/api/v1/surveys",
    request_body = CreateSurveyRequestBody,
    responses(
        (status = 201, description = "Survey created", body = SurveyDetailsBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["surveys"],
    operation_id = "createSurvey",
    security(("AdminBearer" = []))
)]
#[post("/surveys")]
pub async fn create_survey(
    state: web::Data<HttpState>,
    admin: web::Data<AdminAuth>,
    request: HttpRequest,
    payload: web::Json<CreateSurveyRequestBody>,
) -> ApiResult<(web::Json<SurveyDetailsBody>, actix_web::http::StatusCode)> {
    admin.require_admin(&request)?;
    let payload = payload.into_inner();

    let details = state
        .admin
        .create_survey(CreateSurveyRequest {
            title: payload.title,
            description: payload.description,
            prompts: payload
                .questions
                .into_iter()
                .map(|question| question.prompt)
                .collect(),
        })
        .await?;

    Ok((
        web::Json(SurveyDetailsBody::from(details)),
        actix_web::http::StatusCode::CREATED,
    ))
}

/// List all surveys with their stats, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/surveys",
    responses(
        (status = 200, description = "Surveys listed", body = [SurveyListItemBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["surveys"],
    operation_id = "listSurveys",
    security(("AdminBearer" = []))
)]
#[get("/surveys")]
pub async fn list_surveys(
    state: web::Data<HttpState>,
    admin: web::Data<AdminAuth>,
    request: HttpRequest,
) -> ApiResult<web::Json<Vec<SurveyListItemBody>>> {
    admin.require_admin(&request)?;

    let surveys = state.admin.list_surveys().await?;
    Ok(web::Json(
        surveys.into_iter().map(SurveyListItemBody::from).collect(),
    ))
}

/// Fetch one survey with its questions and stats.
#[utoipa::path(
    get,
    path = "/api/v1/surveys/{id}",
    params(("id" = String, Path, format = "uuid", description = "Survey identifier")),
    responses(
        (status = 200, description = "Survey found", body = SurveyDetailsBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Survey not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["surveys"],
    operation_id = "getSurvey",
    security(("AdminBearer" = []))
)]
#[get("/surveys/{id}")]
pub async fn get_survey(
    state: web::Data<HttpState>,
    admin: web::Data<AdminAuth>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<SurveyDetailsBody>> {
    admin.require_admin(&request)?;
    let survey_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    let details = state.admin.get_survey(survey_id).await?;
    Ok(web::Json(SurveyDetailsBody::from(details)))
}

/// Issue single-use invitations for a survey and email the response links.
#[utoipa::path(
    post,
    path = "/api/v1/surveys/{id}/invitations",
    params(("id" = String, Path, format = "uuid", description = "Survey identifier")),
    request_body = IssueInvitationsRequestBody,
    responses(
        (status = 200, description = "Invitations issued", body = IssueInvitationsResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Survey not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["surveys"],
    operation_id = "issueInvitations",
    security(("AdminBearer" = []))
)]
#[post("/surveys/{id}/invitations")]
pub async fn issue_invitations(
    state: web::Data<HttpState>,
    admin: web::Data<AdminAuth>,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<IssueInvitationsRequestBody>,
) -> ApiResult<web::Json<IssueInvitationsResponseBody>> {
    admin.require_admin(&request)?;
    let survey_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let payload = payload.into_inner();

    let outcome = state
        .admin
        .issue_invitations(
            survey_id,
            IssueInvitationsRequest {
                emails: payload.emails,
                expires_at: parse_optional_rfc3339_timestamp(
                    payload.expires_at,
                    FieldName::new("expiresAt"),
                )?,
            },
        )
        .await?;

    Ok(web::Json(IssueInvitationsResponseBody::from(outcome)))
}

#[cfg(test)]
#[path = "surveys_tests.rs"]
mod tests;
