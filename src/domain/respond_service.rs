//! Respondent-facing service: token resolution and the response commit.
//!
//! The engine is stateless between calls; every coordination decision is
//! delegated to durable storage. The status pre-checks in `submit` give the
//! caller a precise error early, but the uniqueness constraint enforced by
//! the response store remains the final authority against concurrent
//! submissions.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    InvitationLedger, InvitationLedgerError, QuestionView, RespondentGateway,
    RespondentSurveyView, ResponseStore, ResponseStoreError, SubmitResponseRequest, SurveyStore,
    SurveyStoreError,
};
use crate::domain::{
    Error, InvitationStatus, NewResponse, Survey, SurveyAnswer, SurveyInvitation, SurveyResponse,
    TokenHash,
};

fn map_store_error(error: SurveyStoreError) -> Error {
    match error {
        SurveyStoreError::Connection { message } => {
            Error::service_unavailable(format!("survey store unavailable: {message}"))
        }
        SurveyStoreError::Query { message } => {
            Error::internal(format!("survey store error: {message}"))
        }
    }
}

fn map_ledger_error(error: InvitationLedgerError) -> Error {
    match error {
        InvitationLedgerError::Connection { message } => {
            Error::service_unavailable(format!("invitation ledger unavailable: {message}"))
        }
        InvitationLedgerError::Query { message } => {
            Error::internal(format!("invitation ledger error: {message}"))
        }
        InvitationLedgerError::DuplicateToken => {
            Error::internal("unexpected duplicate token during lookup")
        }
    }
}

/// Respondent service over the ledger, survey store, and response store.
#[derive(Clone)]
pub struct RespondService<S, L, R> {
    store: Arc<S>,
    ledger: Arc<L>,
    responses: Arc<R>,
}

impl<S, L, R> RespondService<S, L, R> {
    /// Create the service with its collaborators.
    pub fn new(store: Arc<S>, ledger: Arc<L>, responses: Arc<R>) -> Self {
        Self {
            store,
            ledger,
            responses,
        }
    }
}

impl<S, L, R> RespondService<S, L, R>
where
    S: SurveyStore,
    L: InvitationLedger,
    R: ResponseStore,
{
    async fn survey_for_invitation(&self, hash: &TokenHash) -> Result<Survey, Error> {
        self.store
            .find_by_invitation_hash(hash)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| {
                // The ledger row exists but its survey is gone; with cascade
                // deletes this means a torn deployment, not user error.
                Error::internal("invitation references a missing survey")
            })
    }

    /// Check the submitted answer set against the survey's question-id set.
    ///
    /// The raw draft count is compared first so a duplicate answer can never
    /// ride along with otherwise complete coverage; the set comparisons then
    /// separate foreign ids from duplicates hiding a missing question.
    fn check_answer_coverage(
        survey: &Survey,
        answered: &[Uuid],
    ) -> Result<(), Error> {
        let question_ids: HashSet<Uuid> = survey.question_ids().into_iter().collect();
        let answered_ids: HashSet<Uuid> = answered.iter().copied().collect();

        if answered.len() != question_ids.len() || answered_ids.len() != question_ids.len() {
            return Err(Error::incomplete_answers(
                "every survey question must be answered exactly once",
            ));
        }
        if !answered_ids.is_subset(&question_ids) {
            return Err(Error::unknown_question(
                "submitted answers do not match the survey's questions",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<S, L, R> RespondentGateway for RespondService<S, L, R>
where
    S: SurveyStore,
    L: InvitationLedger,
    R: ResponseStore,
{
    async fn resolve_for_respondent(
        &self,
        token: &str,
    ) -> Result<Option<RespondentSurveyView>, Error> {
        let hash = TokenHash::derive(token);
        let invitation: Option<SurveyInvitation> = self
            .ledger
            .find_by_hash(&hash)
            .await
            .map_err(map_ledger_error)?;

        // Unknown, responded, and expired all collapse to None: the read
        // boundary never explains why a link stopped working.
        let Some(invitation) = invitation else {
            return Ok(None);
        };
        if invitation.status(Utc::now()) != InvitationStatus::Issued {
            return Ok(None);
        }

        let survey = self.survey_for_invitation(&hash).await?;

        Ok(Some(RespondentSurveyView {
            title: survey.title().to_owned(),
            description: survey.description().map(str::to_owned),
            expires_at: invitation.expires_at(),
            questions: survey.questions().iter().map(QuestionView::from).collect(),
        }))
    }

    async fn submit(&self, request: SubmitResponseRequest) -> Result<(), Error> {
        let hash = TokenHash::derive(&request.token);

        let invitation = self
            .ledger
            .find_by_hash(&hash)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::invalid_token("Invalid or unknown token."))?;

        match invitation.status(Utc::now()) {
            InvitationStatus::Responded => {
                return Err(Error::already_used(
                    "This invitation has already been used.",
                ));
            }
            InvitationStatus::Expired => {
                return Err(Error::expired("This invitation has expired."));
            }
            InvitationStatus::Issued => {}
        }

        let survey = self.survey_for_invitation(&hash).await?;
        let answered: Vec<Uuid> = request.answers.iter().map(|a| a.question_id).collect();
        Self::check_answer_coverage(&survey, &answered)?;

        let response_id = Uuid::new_v4();
        let submitted_at = Utc::now();
        let answers = request
            .answers
            .iter()
            .map(|draft| {
                SurveyAnswer::new(Uuid::new_v4(), response_id, draft.question_id, &draft.text)
                    .map_err(|err| Error::invalid_request(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let new_response = NewResponse {
            response: SurveyResponse::new(response_id, survey.id(), submitted_at, hash),
            answers,
        };

        match self.responses.commit(&new_response, submitted_at).await {
            Ok(()) => {
                info!(survey_id = %survey.id(), %response_id, "response committed");
                Ok(())
            }
            // Race loser: another submission committed between our pre-check
            // and this commit. The invitation is rightfully consumed, so the
            // failure must never be retried.
            Err(ResponseStoreError::DuplicateResponse) => {
                warn!(survey_id = %survey.id(), "concurrent submission lost the commit race");
                Err(Error::concurrent_conflict(
                    "This invitation has already been used.",
                ))
            }
            Err(ResponseStoreError::Connection { message }) => Err(Error::service_unavailable(
                format!("response store unavailable: {message}"),
            )),
            Err(ResponseStoreError::Query { message }) => {
                Err(Error::internal(format!("response store error: {message}")))
            }
        }
    }
}

#[cfg(test)]
#[path = "respond_service_tests.rs"]
mod tests;
