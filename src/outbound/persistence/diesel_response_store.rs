//! PostgreSQL-backed `ResponseStore` implementation using Diesel ORM.
//!
//! `commit` runs one transaction: insert the response header, insert every
//! answer row, and stamp the invitation's `responded_at`. The unique
//! constraint on `survey_responses.invitation_token_hash` decides a
//! concurrent double-submit; the loser's transaction rolls back and the
//! violation surfaces as `DuplicateResponse`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{ResponseStore, ResponseStoreError};
use crate::domain::NewResponse;

use super::models::{NewAnswerRow, NewResponseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{survey_answers, survey_invitations, survey_responses};

/// Diesel-backed implementation of the response store port.
#[derive(Clone)]
pub struct DieselResponseStore {
    pool: DbPool,
}

impl DieselResponseStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to response store errors.
fn map_pool_error(error: PoolError) -> ResponseStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ResponseStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to response store errors.
fn map_diesel_error(error: diesel::result::Error) -> ResponseStoreError {
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
        DieselError::NotFound => ResponseStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => ResponseStoreError::query("database query error"),
        DieselError::DatabaseError(kind, _) => match kind {
            DatabaseErrorKind::UniqueViolation => ResponseStoreError::DuplicateResponse,
            DatabaseErrorKind::ClosedConnection => {
                ResponseStoreError::connection("database connection error")
            }
            _ => ResponseStoreError::query("database error"),
        },
        _ => ResponseStoreError::query("database error"),
    }
}

#[async_trait]
impl ResponseStore for DieselResponseStore {
    async fn commit(
        &self,
        new_response: &NewResponse,
        responded_at: DateTime<Utc>,
    ) -> Result<(), ResponseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let response = &new_response.response;
        let header = NewResponseRow {
            id: response.id(),
            survey_id: response.survey_id(),
            invitation_token_hash: response.invitation_token_hash().as_str(),
            submitted_at: response.submitted_at(),
        };
        let answer_rows: Vec<NewAnswerRow<'_>> = new_response
            .answers
            .iter()
            .map(|answer| NewAnswerRow {
                id: answer.id(),
                response_id: answer.response_id(),
                question_id: answer.question_id(),
                answer_text: answer.answer_text(),
            })
            .collect();
        let token_hash = response.invitation_token_hash().as_str();

        conn.transaction(|conn| {
            async move {
                // The unique index on invitation_token_hash makes this
                // insert the point where a double-submit race is decided.
                diesel::insert_into(survey_responses::table)
                    .values(&header)
                    .execute(conn)
                    .await?;

                diesel::insert_into(survey_answers::table)
                    .values(&answer_rows)
                    .execute(conn)
                    .await?;

                diesel::update(
                    survey_invitations::table
                        .filter(survey_invitations::token_hash.eq(token_hash)),
                )
                .set(survey_invitations::responded_at.eq(responded_at))
                .execute(conn)
                .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn unique_violation_maps_to_duplicate_response() {
        let error = map_diesel_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        ));
        assert_eq!(error, ResponseStoreError::DuplicateResponse);
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let error = map_diesel_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));
        assert!(matches!(error, ResponseStoreError::Connection { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("pool timed out"));
        assert!(matches!(error, ResponseStoreError::Connection { .. }));
        assert!(error.to_string().contains("pool timed out"));
    }
}
