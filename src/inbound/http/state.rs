//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{RespondentGateway, SurveyAdmin};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Administrator-facing survey operations.
    pub admin: Arc<dyn SurveyAdmin>,
    /// Respondent-facing token resolution and submission.
    pub respondent: Arc<dyn RespondentGateway>,
}

impl HttpState {
    /// Bundle the two driving ports for handler injection.
    #[must_use]
    pub fn new(admin: Arc<dyn SurveyAdmin>, respondent: Arc<dyn RespondentGateway>) -> Self {
        Self { admin, respondent }
    }
}
