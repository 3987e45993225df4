//! Test utilities shared by unit tests and integration tests.
//!
//! The in-memory adapters here are functional implementations of the driven
//! ports over one shared state, so a full token lifecycle can run without a
//! database. The response store enforces the same uniqueness rule as the
//! real schema: one committed response per invitation hash, the loser of a
//! concurrent commit observing `DuplicateResponse`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    InvitationLedger, InvitationLedgerError, InvitationMailer, InvitationMailerError,
    ResponseStore, ResponseStoreError, SurveyStats, SurveyStore, SurveyStoreError,
};
use crate::domain::{NewResponse, Survey, SurveyAnswer, SurveyInvitation, TokenHash};

#[derive(Default)]
struct MemoryState {
    surveys: Vec<Survey>,
    invitations: HashMap<TokenHash, SurveyInvitation>,
    responses: HashMap<TokenHash, CommittedResponse>,
}

#[derive(Clone)]
struct CommittedResponse {
    survey_id: Uuid,
    answers: Vec<SurveyAnswer>,
}

/// Shared in-memory backing for the survey store, ledger, and response
/// store. Clone it and hand each adapter a handle.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of committed responses across all surveys.
    #[must_use]
    pub fn response_count(&self) -> usize {
        self.lock().responses.len()
    }

    /// Answers committed for the invitation identified by `hash`.
    #[must_use]
    pub fn answers_for(&self, hash: &TokenHash) -> Option<Vec<SurveyAnswer>> {
        self.lock()
            .responses
            .get(hash)
            .map(|committed| committed.answers.clone())
    }
}

/// In-memory survey store over a [`MemoryBackend`].
#[derive(Clone)]
pub struct InMemorySurveyStore {
    backend: MemoryBackend,
}

impl InMemorySurveyStore {
    /// Create a store over the shared backend.
    #[must_use]
    pub fn new(backend: MemoryBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SurveyStore for InMemorySurveyStore {
    async fn create(&self, survey: &Survey) -> Result<(), SurveyStoreError> {
        self.backend.lock().surveys.push(survey.clone());
        Ok(())
    }

    async fn find_by_id(&self, survey_id: Uuid) -> Result<Option<Survey>, SurveyStoreError> {
        Ok(self
            .backend
            .lock()
            .surveys
            .iter()
            .find(|survey| survey.id() == survey_id)
            .cloned())
    }

    async fn find_by_invitation_hash(
        &self,
        hash: &TokenHash,
    ) -> Result<Option<Survey>, SurveyStoreError> {
        let state = self.backend.lock();
        let Some(invitation) = state.invitations.get(hash) else {
            return Ok(None);
        };
        Ok(state
            .surveys
            .iter()
            .find(|survey| survey.id() == invitation.survey_id())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Survey>, SurveyStoreError> {
        let mut surveys = self.backend.lock().surveys.clone();
        surveys.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(surveys)
    }

    async fn stats(&self, survey_id: Uuid) -> Result<SurveyStats, SurveyStoreError> {
        let state = self.backend.lock();
        let invitation_count = state
            .invitations
            .values()
            .filter(|invitation| invitation.survey_id() == survey_id)
            .count() as u64;
        let response_count = state
            .responses
            .values()
            .filter(|committed| committed.survey_id == survey_id)
            .count() as u64;
        Ok(SurveyStats {
            invitation_count,
            response_count,
        })
    }
}

/// In-memory invitation ledger over a [`MemoryBackend`].
#[derive(Clone)]
pub struct InMemoryInvitationLedger {
    backend: MemoryBackend,
}

impl InMemoryInvitationLedger {
    /// Create a ledger over the shared backend.
    #[must_use]
    pub fn new(backend: MemoryBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl InvitationLedger for InMemoryInvitationLedger {
    async fn add(&self, invitation: &SurveyInvitation) -> Result<(), InvitationLedgerError> {
        let mut state = self.backend.lock();
        if state.invitations.contains_key(invitation.token_hash()) {
            return Err(InvitationLedgerError::DuplicateToken);
        }
        state
            .invitations
            .insert(invitation.token_hash().clone(), invitation.clone());
        Ok(())
    }

    async fn find_by_hash(
        &self,
        hash: &TokenHash,
    ) -> Result<Option<SurveyInvitation>, InvitationLedgerError> {
        Ok(self.backend.lock().invitations.get(hash).cloned())
    }
}

/// In-memory response store over a [`MemoryBackend`].
///
/// `commit` holds the state lock for the whole unit of work, so the
/// uniqueness check and the writes are atomic exactly like the database
/// transaction they stand in for.
#[derive(Clone)]
pub struct InMemoryResponseStore {
    backend: MemoryBackend,
}

impl InMemoryResponseStore {
    /// Create a response store over the shared backend.
    #[must_use]
    pub fn new(backend: MemoryBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    async fn commit(
        &self,
        new_response: &NewResponse,
        responded_at: DateTime<Utc>,
    ) -> Result<(), ResponseStoreError> {
        let mut state = self.backend.lock();
        let hash = new_response.response.invitation_token_hash().clone();

        if state.responses.contains_key(&hash) {
            return Err(ResponseStoreError::DuplicateResponse);
        }

        let committed = CommittedResponse {
            survey_id: new_response.response.survey_id(),
            answers: new_response.answers.clone(),
        };
        state.responses.insert(hash.clone(), committed);

        if let Some(invitation) = state.invitations.remove(&hash) {
            let updated = SurveyInvitation::from_record(
                invitation.token_hash().clone(),
                invitation.survey_id(),
                invitation.created_at(),
                invitation.expires_at(),
                Some(responded_at),
            );
            state.invitations.insert(hash, updated);
        }

        Ok(())
    }
}

/// Mailer that records every send for later assertions.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentInvitation>>>,
}

/// One recorded invitation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentInvitation {
    /// Recipient address.
    pub recipient: String,
    /// Survey title carried in the subject.
    pub survey_title: String,
    /// Full response link, including the plaintext token.
    pub response_link: String,
}

impl RecordingMailer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invitation recorded so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentInvitation> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl InvitationMailer for RecordingMailer {
    async fn send_invitation(
        &self,
        recipient: &str,
        survey_title: &str,
        response_link: &str,
    ) -> Result<(), InvitationMailerError> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(SentInvitation {
                recipient: recipient.to_owned(),
                survey_title: survey_title.to_owned(),
                response_link: response_link.to_owned(),
            });
        Ok(())
    }
}
