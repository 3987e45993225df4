//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API: the administrator survey endpoints, the
//! respondent endpoints, and the health probes. The generated specification
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::responses::{
    RespondentSurveyBody, SubmitAnswerBody, SubmitResponseRequestBody,
};
use crate::inbound::http::surveys::{
    CreateQuestionBody, CreateSurveyRequestBody, IssueInvitationsRequestBody,
    IssueInvitationsResponseBody, IssuedInvitationBody, QuestionBody, SurveyDetailsBody,
    SurveyListItemBody,
};

/// Enrich the generated document with the admin bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AdminBearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pollwise API",
        description = "Anonymous survey backend: survey administration, \
            single-use invitation links, and response submission."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::surveys::create_survey,
        crate::inbound::http::surveys::list_surveys,
        crate::inbound::http::surveys::get_survey,
        crate::inbound::http::surveys::issue_invitations,
        crate::inbound::http::responses::resolve_invitation,
        crate::inbound::http::responses::submit_response,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CreateSurveyRequestBody,
        CreateQuestionBody,
        IssueInvitationsRequestBody,
        IssueInvitationsResponseBody,
        IssuedInvitationBody,
        QuestionBody,
        SurveyDetailsBody,
        SurveyListItemBody,
        RespondentSurveyBody,
        SubmitAnswerBody,
        SubmitResponseRequestBody,
    )),
    tags(
        (name = "surveys", description = "Administrator survey operations"),
        (name = "respond", description = "Respondent token resolution and submission"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_document_registers_all_survey_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/surveys",
            "/api/v1/surveys/{id}",
            "/api/v1/surveys/{id}/invitations",
            "/api/v1/respond/{token}",
            "/api/v1/respond",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_document_registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("ErrorCode"));
    }
}
