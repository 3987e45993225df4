//! Tests for respondent HTTP handlers.

use super::*;
use crate::domain::ports::{
    MockRespondentGateway, MockSurveyAdmin, QuestionView, RespondentGateway,
};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

fn test_app(
    respondent: MockRespondentGateway,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(MockSurveyAdmin::new()),
        Arc::new(respondent) as Arc<dyn RespondentGateway>,
    );
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(resolve_invitation)
            .service(submit_response),
    )
}

fn sample_view() -> RespondentSurveyView {
    RespondentSurveyView {
        title: "Lunch Poll".to_owned(),
        description: None,
        expires_at: Some(Utc::now()),
        questions: vec![QuestionView {
            id: Uuid::new_v4(),
            prompt: "Where should we go?".to_owned(),
            question_type: "text".to_owned(),
            options: Vec::new(),
        }],
    }
}

#[actix_web::test]
async fn resolving_a_live_token_returns_the_survey_view() {
    let mut respondent = MockRespondentGateway::new();
    respondent
        .expect_resolve_for_respondent()
        .withf(|token| token == "a".repeat(64))
        .return_once(|_| Ok(Some(sample_view())));

    let app = actix_test::init_service(test_app(respondent)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/respond/{}", "a".repeat(64)))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["title"], "Lunch Poll");
    assert_eq!(body["questions"][0]["prompt"], "Where should we go?");
    // No survey id in the respondent projection.
    assert!(body.get("id").is_none());
}

#[actix_web::test]
async fn resolving_a_dead_token_returns_not_found() {
    let mut respondent = MockRespondentGateway::new();
    respondent
        .expect_resolve_for_respondent()
        .return_once(|_| Ok(None));

    let app = actix_test::init_service(test_app(respondent)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/respond/deadbeef")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_token");
}

#[actix_web::test]
async fn submitting_a_valid_response_returns_no_content() {
    let question_id = Uuid::new_v4();
    let mut respondent = MockRespondentGateway::new();
    respondent
        .expect_submit()
        .withf(move |request| {
            request.answers.len() == 1 && request.answers[0].question_id == question_id
        })
        .return_once(|_| Ok(()));

    let app = actix_test::init_service(test_app(respondent)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/respond")
            .set_json(serde_json::json!({
                "token": "b".repeat(64),
                "answers": [{"questionId": question_id, "answerText": "The taqueria"}]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn submitting_with_a_malformed_question_id_is_rejected() {
    let app = actix_test::init_service(test_app(MockRespondentGateway::new())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/respond")
            .set_json(serde_json::json!({
                "token": "b".repeat(64),
                "answers": [{"questionId": "not-a-uuid", "answerText": "x"}]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn a_used_invitation_is_reported_as_conflict() {
    let mut respondent = MockRespondentGateway::new();
    respondent
        .expect_submit()
        .return_once(|_| Err(Error::already_used("This invitation has already been used.")));

    let app = actix_test::init_service(test_app(respondent)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/respond")
            .set_json(serde_json::json!({"token": "b".repeat(64), "answers": []}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "already_used");
}

#[actix_web::test]
async fn a_commit_race_loser_is_reported_as_already_used() {
    let mut respondent = MockRespondentGateway::new();
    respondent
        .expect_submit()
        .return_once(|_| Err(Error::concurrent_conflict("lost the commit race")));

    let app = actix_test::init_service(test_app(respondent)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/respond")
            .set_json(serde_json::json!({"token": "b".repeat(64), "answers": []}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "already_used");
}

#[actix_web::test]
async fn an_expired_invitation_is_reported_as_gone() {
    let mut respondent = MockRespondentGateway::new();
    respondent
        .expect_submit()
        .return_once(|_| Err(Error::expired("This invitation has expired.")));

    let app = actix_test::init_service(test_app(respondent)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/respond")
            .set_json(serde_json::json!({"token": "b".repeat(64), "answers": []}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::GONE);
}
