//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the survey store, invitation ledger, and
//! response store ports, backed by PostgreSQL via `diesel-async` with `bb8`
//! connection pooling.
//!
//! The Diesel row structs (`models.rs`) and schema definitions (`schema.rs`)
//! are internal implementation details, never exposed to the domain layer.
//! All database errors are mapped to the port error types; in particular the
//! unique-violation on `survey_responses.invitation_token_hash` surfaces as
//! `ResponseStoreError::DuplicateResponse`, the signal that a submission lost
//! a commit race.

mod bootstrap;
mod diesel_invitation_ledger;
mod diesel_response_store;
mod diesel_survey_store;
mod models;
mod pool;
mod schema;

pub use bootstrap::{run_migrations_with_retry, BootstrapError, DEFAULT_MAX_ATTEMPTS};
pub use diesel_invitation_ledger::DieselInvitationLedger;
pub use diesel_response_store::DieselResponseStore;
pub use diesel_survey_store::DieselSurveyStore;
pub use pool::{DbPool, PoolConfig, PoolError};
