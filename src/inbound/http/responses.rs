//! Respondent-facing HTTP handlers.
//!
//! ```text
//! GET  /api/v1/respond/{token}
//! POST /api/v1/respond
//! ```
//!
//! The invitation token is the only credential on these routes. The read
//! endpoint answers 404 for any token it cannot serve, whether the token is
//! unknown, already used, or expired; only the write endpoint distinguishes
//! those cases.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RespondentSurveyView, SubmitResponseRequest};
use crate::domain::{AnswerDraft, Error};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::surveys::QuestionBody;
use crate::inbound::http::validation::{parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Survey projection shown to a respondent opening their link.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondentSurveyBody {
    /// Survey title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// RFC 3339 expiry of the presenting invitation, if one was set.
    #[schema(format = "date-time")]
    pub expires_at: Option<String>,
    /// Questions in order.
    pub questions: Vec<QuestionBody>,
}

/// Request payload for submitting a response.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequestBody {
    /// Plaintext invitation token from the response link.
    pub token: String,
    /// One answer per survey question.
    pub answers: Vec<SubmitAnswerBody>,
}

/// One answer within a submission.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerBody {
    /// Question this answer addresses.
    #[schema(format = "uuid")]
    pub question_id: String,
    /// Answer body; trimmed before storage.
    pub answer_text: String,
}

impl From<RespondentSurveyView> for RespondentSurveyBody {
    fn from(value: RespondentSurveyView) -> Self {
        Self {
            title: value.title,
            description: value.description,
            expires_at: value.expires_at.map(|at| at.to_rfc3339()),
            questions: value.questions.into_iter().map(QuestionBody::from).collect(),
        }
    }
}

fn parse_answers(answers: Vec<SubmitAnswerBody>) -> Result<Vec<AnswerDraft>, Error> {
    answers
        .into_iter()
        .map(|answer| {
            Ok(AnswerDraft {
                question_id: parse_uuid(answer.question_id, FieldName::new("questionId"))?,
                text: answer.answer_text,
            })
        })
        .collect()
}

/// Resolve the survey behind an invitation token.
#[utoipa::path(
    get,
    path = "/api/v1/respond/{token}",
    params(("token" = String, Path, description = "Invitation token from the response link")),
    responses(
        (status = 200, description = "Invitation is live", body = RespondentSurveyBody),
        (status = 404, description = "Token is unknown, used, or expired", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["respond"],
    operation_id = "resolveInvitation",
    security([])
)]
#[get("/respond/{token}")]
pub async fn resolve_invitation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RespondentSurveyBody>> {
    let token = path.into_inner();

    let view = state
        .respondent
        .resolve_for_respondent(&token)
        .await?
        .ok_or_else(|| Error::invalid_token("This invitation link is not valid."))?;

    Ok(web::Json(RespondentSurveyBody::from(view)))
}

/// Submit the single response for an invitation token.
#[utoipa::path(
    post,
    path = "/api/v1/respond",
    request_body = SubmitResponseRequestBody,
    responses(
        (status = 204, description = "Response recorded"),
        (status = 400, description = "Invalid or incomplete answers", body = Error),
        (status = 404, description = "Token is unknown", body = Error),
        (status = 409, description = "Invitation already used", body = Error),
        (status = 410, description = "Invitation expired", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["respond"],
    operation_id = "submitResponse",
    security([])
)]
#[post("/respond")]
pub async fn submit_response(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitResponseRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();

    state
        .respondent
        .submit(SubmitResponseRequest {
            token: payload.token,
            answers: parse_answers(payload.answers)?,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
