//! Administrator-facing survey service.
//!
//! Implements the [`SurveyAdmin`] driving port: survey creation, read models
//! with stats, and invitation issuance with token minting.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CreateSurveyRequest, InvitationLedger, InvitationLedgerError, InvitationMailer,
    IssueInvitationsOutcome, IssueInvitationsRequest, IssuedInvitation, SurveyAdmin,
    SurveyDetails, SurveyListItem, SurveyStore, SurveyStoreError,
};
use crate::domain::{
    Error, InvitationToken, QuestionType, Survey, SurveyDraft, SurveyInvitation,
    SurveyQuestionDraft,
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
        // Two collisions in a row from a CSPRNG means something is deeply
        // wrong; surface it instead of looping.
        InvitationLedgerError::DuplicateToken => {
            Error::internal("token hash collision persisted across regeneration")
        }
    }
}

/// Normalize a recipient list: trim, drop blanks, case-insensitive dedupe,
/// preserving first-seen order.
fn normalize_recipients(emails: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut normalized = Vec::new();
    for email in emails {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            continue;
        }
        let folded = trimmed.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        normalized.push(trimmed.to_owned());
    }
    normalized
}

/// Build the single-use response link for a plaintext token.
fn response_link(base_url: &str, token: &InvitationToken) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), token.expose())
}

/// Survey service wiring the store, ledger, and mailer together.
#[derive(Clone)]
pub struct SurveyService<S, L, M> {
    store: Arc<S>,
    ledger: Arc<L>,
    mailer: Arc<M>,
    response_base_url: String,
}

impl<S, L, M> SurveyService<S, L, M> {
    /// Create the service with its collaborators and the configured base URL
    /// for response links.
    pub fn new(
        store: Arc<S>,
        ledger: Arc<L>,
        mailer: Arc<M>,
        response_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            ledger,
            mailer,
            response_base_url: response_base_url.into(),
        }
    }
}

impl<S, L, M> SurveyService<S, L, M>
where
    S: SurveyStore,
    L: InvitationLedger,
    M: InvitationMailer,
{
    /// Mint a token and record its hash, regenerating once on a hash
    /// collision.
    async fn mint_invitation(
        &self,
        survey_id: Uuid,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> Result<InvitationToken, Error> {
        for attempt in 0..2 {
            let token = InvitationToken::generate();
            let invitation =
                SurveyInvitation::issue(token.hash(), survey_id, Utc::now(), expires_at);
            match self.ledger.add(&invitation).await {
                Ok(()) => return Ok(token),
                Err(InvitationLedgerError::DuplicateToken) if attempt == 0 => {
                    warn!(%survey_id, "token hash collision; regenerating");
                }
                Err(err) => return Err(map_ledger_error(err)),
            }
        }
        Err(map_ledger_error(InvitationLedgerError::DuplicateToken))
    }
}

#[async_trait]
impl<S, L, M> SurveyAdmin for SurveyService<S, L, M>
where
    S: SurveyStore,
    L: InvitationLedger,
    M: InvitationMailer,
{
    async fn create_survey(&self, request: CreateSurveyRequest) -> Result<SurveyDetails, Error> {
        let survey_id = Uuid::new_v4();
        let questions = request
            .prompts
            .iter()
            .enumerate()
            .map(|(index, prompt)| SurveyQuestionDraft {
                id: Uuid::new_v4(),
                survey_id,
                prompt: prompt.trim().to_owned(),
                question_type: QuestionType::FreeText,
                options: None,
                order_index: u32::try_from(index).unwrap_or(u32::MAX),
            })
            .collect();

        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        let survey = Survey::new(SurveyDraft {
            id: survey_id,
            title: request.title.trim().to_owned(),
            description,
            created_at: Utc::now(),
            questions,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.store.create(&survey).await.map_err(map_store_error)?;
        info!(%survey_id, questions = survey.questions().len(), "survey created");

        Ok(SurveyDetails::project(&survey, Default::default()))
    }

    async fn list_surveys(&self) -> Result<Vec<SurveyListItem>, Error> {
        let surveys = self.store.list().await.map_err(map_store_error)?;

        let mut items = Vec::with_capacity(surveys.len());
        for survey in &surveys {
            let stats = self.store.stats(survey.id()).await.map_err(map_store_error)?;
            items.push(SurveyListItem {
                id: survey.id(),
                title: survey.title().to_owned(),
                description: survey.description().map(str::to_owned),
                created_at: survey.created_at(),
                question_count: survey.questions().len(),
                invitation_count: stats.invitation_count,
                response_count: stats.response_count,
            });
        }
        Ok(items)
    }

    async fn get_survey(&self, survey_id: Uuid) -> Result<SurveyDetails, Error> {
        let survey = self
            .store
            .find_by_id(survey_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("survey {survey_id} not found")))?;
        let stats = self.store.stats(survey_id).await.map_err(map_store_error)?;

        Ok(SurveyDetails::project(&survey, stats))
    }

    async fn issue_invitations(
        &self,
        survey_id: Uuid,
        request: IssueInvitationsRequest,
    ) -> Result<IssueInvitationsOutcome, Error> {
        let survey = self
            .store
            .find_by_id(survey_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("survey {survey_id} not found")))?;

        let recipients = normalize_recipients(&request.emails);
        if recipients.is_empty() {
            return Err(Error::invalid_request(
                "no valid recipient email addresses provided",
            ));
        }

        let mut issued = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let token = self.mint_invitation(survey_id, request.expires_at).await?;
            let link = response_link(&self.response_base_url, &token);

            // The invitation is durable at this point; a lost email is the
            // operator's to resend via a fresh invitation.
            let email_dispatched = match self
                .mailer
                .send_invitation(&recipient, survey.title(), &link)
                .await
            {
                Ok(()) => true,
                Err(err) => {
                    warn!(%survey_id, recipient, error = %err, "invitation email not delivered");
                    false
                }
            };

            issued.push(IssuedInvitation {
                recipient,
                email_dispatched,
            });
        }

        info!(%survey_id, count = issued.len(), "invitations issued");
        Ok(IssueInvitationsOutcome { issued })
    }
}

#[cfg(test)]
#[path = "survey_service_tests.rs"]
mod tests;
