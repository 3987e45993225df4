//! PostgreSQL-backed `InvitationLedger` implementation using Diesel ORM.
//!
//! The token hash is the primary key of the ledger table, so a hash
//! collision on insert surfaces as `DuplicateToken` and the issuing service
//! decides whether to regenerate.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{InvitationLedger, InvitationLedgerError};
use crate::domain::{SurveyInvitation, TokenHash};

use super::models::{InvitationRow, NewInvitationRow};
use super::pool::{DbPool, PoolError};
use super::schema::survey_invitations;

/// Diesel-backed implementation of the invitation ledger port.
#[derive(Clone)]
pub struct DieselInvitationLedger {
    pool: DbPool,
}

impl DieselInvitationLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to invitation ledger errors.
fn map_pool_error(error: PoolError) -> InvitationLedgerError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            InvitationLedgerError::connection(message)
        }
    }
}

/// Map Diesel errors to invitation ledger errors.
fn map_diesel_error(error: diesel::result::Error) -> InvitationLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => InvitationLedgerError::query("record not found"),
        DieselError::QueryBuilderError(_) => InvitationLedgerError::query("database query error"),
        DieselError::DatabaseError(kind, _) => match kind {
            DatabaseErrorKind::UniqueViolation => InvitationLedgerError::DuplicateToken,
            DatabaseErrorKind::ClosedConnection => {
                InvitationLedgerError::connection("database connection error")
            }
            _ => InvitationLedgerError::query("database error"),
        },
        _ => InvitationLedgerError::query("database error"),
    }
}

/// Convert a database row into a domain invitation.
fn row_to_invitation(row: InvitationRow) -> Result<SurveyInvitation, InvitationLedgerError> {
    let hash = TokenHash::parse(row.token_hash)
        .map_err(|err| InvitationLedgerError::query(format!("corrupted token hash: {err}")))?;

    Ok(SurveyInvitation::from_record(
        hash,
        row.survey_id,
        row.created_at,
        row.expires_at,
        row.responded_at,
    ))
}

#[async_trait]
impl InvitationLedger for DieselInvitationLedger {
    async fn add(&self, invitation: &SurveyInvitation) -> Result<(), InvitationLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewInvitationRow {
            token_hash: invitation.token_hash().as_str(),
            survey_id: invitation.survey_id(),
            created_at: invitation.created_at(),
            expires_at: invitation.expires_at(),
        };

        diesel::insert_into(survey_invitations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_hash(
        &self,
        hash: &TokenHash,
    ) -> Result<Option<SurveyInvitation>, InvitationLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = survey_invitations::table
            .filter(survey_invitations::token_hash.eq(hash.as_str()))
            .select(InvitationRow::as_select())
            .first::<InvitationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invitation).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(error, InvitationLedgerError::Connection { .. }));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_token() {
        let error = map_diesel_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        ));
        assert_eq!(error, InvitationLedgerError::DuplicateToken);
    }

    #[rstest]
    fn row_conversion_rejects_a_corrupted_hash() {
        let row = InvitationRow {
            token_hash: "not-hex".to_owned(),
            survey_id: Uuid::new_v4(),
            created_at: Utc::now(),
            expires_at: None,
            responded_at: None,
        };

        let error = row_to_invitation(row).expect_err("corrupted hash fails");
        assert!(error.to_string().contains("corrupted token hash"));
    }

    #[rstest]
    fn row_conversion_preserves_the_responded_marker() {
        let responded_at = Utc::now();
        let row = InvitationRow {
            token_hash: "a".repeat(64),
            survey_id: Uuid::new_v4(),
            created_at: responded_at,
            expires_at: None,
            responded_at: Some(responded_at),
        };

        let invitation = row_to_invitation(row).expect("valid row converts");
        assert_eq!(invitation.responded_at(), Some(responded_at));
    }
}
