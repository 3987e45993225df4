//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (stores, ledger, mailer) are implemented by outbound
//! adapters; driving ports (admin, respondent) are implemented by the domain
//! services and consumed by the HTTP layer.

mod invitation_ledger;
mod invitation_mailer;
mod respondent_gateway;
mod response_store;
mod survey_admin;
mod survey_store;

#[cfg(test)]
pub use invitation_ledger::MockInvitationLedger;
pub use invitation_ledger::{FixtureInvitationLedger, InvitationLedger, InvitationLedgerError};

#[cfg(test)]
pub use invitation_mailer::MockInvitationMailer;
pub use invitation_mailer::{FixtureInvitationMailer, InvitationMailer, InvitationMailerError};

#[cfg(test)]
pub use respondent_gateway::MockRespondentGateway;
pub use respondent_gateway::{RespondentGateway, RespondentSurveyView, SubmitResponseRequest};

#[cfg(test)]
pub use response_store::MockResponseStore;
pub use response_store::{FixtureResponseStore, ResponseStore, ResponseStoreError};

#[cfg(test)]
pub use survey_admin::MockSurveyAdmin;
pub use survey_admin::{
    CreateSurveyRequest, IssueInvitationsOutcome, IssueInvitationsRequest, IssuedInvitation,
    QuestionView, SurveyAdmin, SurveyDetails, SurveyListItem,
};

#[cfg(test)]
pub use survey_store::MockSurveyStore;
pub use survey_store::{FixtureSurveyStore, SurveyStats, SurveyStore, SurveyStoreError};
