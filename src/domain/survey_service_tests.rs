//! Tests for the administrator survey service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockall::Sequence;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockInvitationLedger, MockInvitationMailer, MockSurveyStore, SurveyStats,
};
use crate::domain::ErrorCode;

const BASE_URL: &str = "https://surveys.example.com/respond/";

fn sample_survey() -> Survey {
    let id = Uuid::new_v4();
    Survey::new(SurveyDraft {
        id,
        title: "Lunch Poll".to_owned(),
        description: None,
        created_at: Utc::now(),
        questions: vec![
            SurveyQuestionDraft {
                id: Uuid::new_v4(),
                survey_id: id,
                prompt: "Where?".to_owned(),
                question_type: QuestionType::FreeText,
                options: None,
                order_index: 0,
            },
            SurveyQuestionDraft {
                id: Uuid::new_v4(),
                survey_id: id,
                prompt: "When?".to_owned(),
                question_type: QuestionType::FreeText,
                options: None,
                order_index: 1,
            },
        ],
    })
    .expect("valid survey")
}

fn service(
    store: MockSurveyStore,
    ledger: MockInvitationLedger,
    mailer: MockInvitationMailer,
) -> SurveyService<MockSurveyStore, MockInvitationLedger, MockInvitationMailer> {
    SurveyService::new(Arc::new(store), Arc::new(ledger), Arc::new(mailer), BASE_URL)
}

#[tokio::test]
async fn create_survey_trims_fields_and_orders_questions() {
    let mut store = MockSurveyStore::new();
    store
        .expect_create()
        .times(1)
        .withf(|survey: &Survey| {
            survey.title() == "Lunch Poll"
                && survey.description().is_none()
                && survey
                    .questions()
                    .iter()
                    .map(|q| (q.prompt(), q.order_index()))
                    .eq([("Where?", 0), ("When?", 1)])
        })
        .return_once(|_| Ok(()));

    let svc = service(store, MockInvitationLedger::new(), MockInvitationMailer::new());
    let details = svc
        .create_survey(CreateSurveyRequest {
            title: "  Lunch Poll  ".to_owned(),
            description: Some("   ".to_owned()),
            prompts: vec![" Where? ".to_owned(), "When?".to_owned()],
        })
        .await
        .expect("create succeeds");

    assert_eq!(details.title, "Lunch Poll");
    assert_eq!(details.invitation_count, 0);
    assert_eq!(details.response_count, 0);
    assert_eq!(details.questions.len(), 2);
}

#[tokio::test]
async fn create_survey_rejects_empty_question_list() {
    let mut store = MockSurveyStore::new();
    store.expect_create().times(0);

    let svc = service(store, MockInvitationLedger::new(), MockInvitationMailer::new());
    let error = svc
        .create_survey(CreateSurveyRequest {
            title: "Lunch Poll".to_owned(),
            description: None,
            prompts: Vec::new(),
        })
        .await
        .expect_err("invalid request");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn get_survey_maps_absence_to_not_found() {
    let mut store = MockSurveyStore::new();
    store.expect_find_by_id().return_once(|_| Ok(None));

    let svc = service(store, MockInvitationLedger::new(), MockInvitationMailer::new());
    let error = svc.get_survey(Uuid::new_v4()).await.expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn get_survey_attaches_stats() {
    let survey = sample_survey();
    let survey_id = survey.id();
    let mut store = MockSurveyStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(survey)));
    store.expect_stats().return_once(|_| {
        Ok(SurveyStats {
            invitation_count: 2,
            response_count: 1,
        })
    });

    let svc = service(store, MockInvitationLedger::new(), MockInvitationMailer::new());
    let details = svc.get_survey(survey_id).await.expect("survey found");

    assert_eq!(details.invitation_count, 2);
    assert_eq!(details.response_count, 1);
    assert_eq!(details.questions.len(), 2);
}

#[tokio::test]
async fn issue_invitations_dedupes_recipients_and_links_with_base_url() {
    let survey = sample_survey();
    let survey_id = survey.id();
    let mut store = MockSurveyStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(survey)));

    let mut ledger = MockInvitationLedger::new();
    ledger.expect_add().times(2).returning(|_| Ok(()));

    let mut mailer = MockInvitationMailer::new();
    mailer
        .expect_send_invitation()
        .times(2)
        .withf(|_, title, link| {
            // Base URL trailing slash is trimmed before the token is
            // appended, and the plaintext rides only in the link.
            title == "Lunch Poll"
                && link.starts_with("https://surveys.example.com/respond/")
                && !link.contains("//respond")
                && link.rsplit('/').next().is_some_and(|t| t.len() == 64)
        })
        .returning(|_, _, _| Ok(()));

    let svc = service(store, ledger, mailer);
    let outcome = svc
        .issue_invitations(
            survey_id,
            IssueInvitationsRequest {
                emails: vec![
                    " a@x.com ".to_owned(),
                    "A@X.COM".to_owned(),
                    String::new(),
                    "b@x.com".to_owned(),
                ],
                expires_at: None,
            },
        )
        .await
        .expect("issuance succeeds");

    let recipients: Vec<_> = outcome.issued.iter().map(|i| i.recipient.as_str()).collect();
    assert_eq!(recipients, ["a@x.com", "b@x.com"]);
    assert!(outcome.issued.iter().all(|i| i.email_dispatched));
}

#[tokio::test]
async fn issue_invitations_rejects_all_blank_recipients() {
    let survey = sample_survey();
    let mut store = MockSurveyStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(survey)));

    let svc = service(store, MockInvitationLedger::new(), MockInvitationMailer::new());
    let error = svc
        .issue_invitations(
            Uuid::new_v4(),
            IssueInvitationsRequest {
                emails: vec!["  ".to_owned(), String::new()],
                expires_at: None,
            },
        )
        .await
        .expect_err("invalid request");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn issue_invitations_regenerates_once_on_hash_collision() {
    let survey = sample_survey();
    let survey_id = survey.id();
    let mut store = MockSurveyStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(survey)));

    let mut seq = Sequence::new();
    let mut ledger = MockInvitationLedger::new();
    ledger
        .expect_add()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(InvitationLedgerError::DuplicateToken));
    ledger
        .expect_add()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let mut mailer = MockInvitationMailer::new();
    mailer
        .expect_send_invitation()
        .times(1)
        .returning(|_, _, _| Ok(()));

    let svc = service(store, ledger, mailer);
    let outcome = svc
        .issue_invitations(
            survey_id,
            IssueInvitationsRequest {
                emails: vec!["a@x.com".to_owned()],
                expires_at: Some(Utc::now() + Duration::days(7)),
            },
        )
        .await
        .expect("regeneration succeeds");

    assert_eq!(outcome.issued.len(), 1);
}

#[tokio::test]
async fn issue_invitations_treats_second_collision_as_fatal() {
    let survey = sample_survey();
    let survey_id = survey.id();
    let mut store = MockSurveyStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(survey)));

    let mut ledger = MockInvitationLedger::new();
    ledger
        .expect_add()
        .times(2)
        .returning(|_| Err(InvitationLedgerError::DuplicateToken));

    let mut mailer = MockInvitationMailer::new();
    mailer.expect_send_invitation().times(0);

    let svc = service(store, ledger, mailer);
    let error = svc
        .issue_invitations(
            survey_id,
            IssueInvitationsRequest {
                emails: vec!["a@x.com".to_owned()],
                expires_at: None,
            },
        )
        .await
        .expect_err("fatal after one regeneration");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn mailer_failure_keeps_the_invitation_durable() {
    let survey = sample_survey();
    let survey_id = survey.id();
    let mut store = MockSurveyStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(survey)));

    let mut ledger = MockInvitationLedger::new();
    ledger.expect_add().times(1).returning(|_| Ok(()));

    let mut mailer = MockInvitationMailer::new();
    mailer
        .expect_send_invitation()
        .times(1)
        .returning(|_, _, _| Err(crate::domain::ports::InvitationMailerError::delivery("smtp down")));

    let svc = service(store, ledger, mailer);
    let outcome = svc
        .issue_invitations(
            survey_id,
            IssueInvitationsRequest {
                emails: vec!["a@x.com".to_owned()],
                expires_at: None,
            },
        )
        .await
        .expect("issuance still succeeds");

    assert_eq!(outcome.issued.len(), 1);
    assert!(!outcome.issued[0].email_dispatched);
}

#[tokio::test]
async fn connection_failure_maps_to_service_unavailable() {
    let mut store = MockSurveyStore::new();
    store
        .expect_list()
        .return_once(|| Err(SurveyStoreError::connection("pool exhausted")));

    let svc = service(store, MockInvitationLedger::new(), MockInvitationMailer::new());
    let error = svc.list_surveys().await.expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
