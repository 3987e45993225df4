//! PostgreSQL-backed `SurveyStore` implementation using Diesel ORM.
//!
//! Survey creation writes the header and all question rows inside one
//! transaction. Reads rebuild the aggregate through the validated domain
//! constructor, so a corrupted row surfaces as a query error instead of an
//! invalid `Survey` value.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SurveyStats, SurveyStore, SurveyStoreError};
use crate::domain::{QuestionType, Survey, SurveyDraft, SurveyQuestionDraft, TokenHash};

use super::models::{NewQuestionRow, NewSurveyRow, QuestionRow, SurveyRow};
use super::pool::{DbPool, PoolError};
use super::schema::{survey_invitations, survey_questions, survey_responses, surveys};

/// Diesel-backed implementation of the survey store port.
#[derive(Clone)]
pub struct DieselSurveyStore {
    pool: DbPool,
}

impl DieselSurveyStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_survey(
        conn: &mut AsyncPgConnection,
        survey_id: Uuid,
    ) -> Result<Option<Survey>, SurveyStoreError> {
        let header = surveys::table
            .filter(surveys::id.eq(survey_id))
            .select(SurveyRow::as_select())
            .first::<SurveyRow>(conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(header) = header else {
            return Ok(None);
        };

        let questions: Vec<QuestionRow> = survey_questions::table
            .filter(survey_questions::survey_id.eq(survey_id))
            .order(survey_questions::order_index.asc())
            .select(QuestionRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_survey(header, questions).map(Some)
    }
}

/// Map pool errors to survey store errors.
fn map_pool_error(error: PoolError) -> SurveyStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SurveyStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to survey store errors.
fn map_diesel_error(error: diesel::result::Error) -> SurveyStoreError {
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
        DieselError::NotFound => SurveyStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => SurveyStoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SurveyStoreError::connection("database connection error")
        }
        _ => SurveyStoreError::query("database error"),
    }
}

fn decode_options(
    options: Option<serde_json::Value>,
) -> Result<Option<Vec<String>>, SurveyStoreError> {
    options
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|err| SurveyStoreError::query(format!("decode question options: {err}")))
        })
        .transpose()
}

fn encode_options(options: Option<&[String]>) -> Result<Option<serde_json::Value>, SurveyStoreError> {
    options
        .map(|choices| {
            serde_json::to_value(choices)
                .map_err(|err| SurveyStoreError::query(format!("encode question options: {err}")))
        })
        .transpose()
}

fn order_index_from_row(row_id: Uuid, order_index: i32) -> Result<u32, SurveyStoreError> {
    u32::try_from(order_index).map_err(|_| {
        SurveyStoreError::query(format!("negative order index on question {row_id}"))
    })
}

/// Convert database rows into a validated domain survey.
fn rows_to_survey(header: SurveyRow, questions: Vec<QuestionRow>) -> Result<Survey, SurveyStoreError> {
    let question_drafts = questions
        .into_iter()
        .map(|row| {
            Ok(SurveyQuestionDraft {
                id: row.id,
                survey_id: row.survey_id,
                prompt: row.prompt,
                question_type: QuestionType::from_tag(&row.question_type)
                    .map_err(|err| SurveyStoreError::query(err.to_string()))?,
                options: decode_options(row.options)?,
                order_index: order_index_from_row(row.id, row.order_index)?,
            })
        })
        .collect::<Result<Vec<_>, SurveyStoreError>>()?;

    Survey::new(SurveyDraft {
        id: header.id,
        title: header.title,
        description: header.description,
        created_at: header.created_at,
        questions: question_drafts,
    })
    .map_err(|err| SurveyStoreError::query(err.to_string()))
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl SurveyStore for DieselSurveyStore {
    async fn create(&self, survey: &Survey) -> Result<(), SurveyStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let header = NewSurveyRow {
            id: survey.id(),
            title: survey.title(),
            description: survey.description(),
            created_at: survey.created_at(),
        };
        let question_rows = survey
            .questions()
            .iter()
            .map(|question| {
                Ok(NewQuestionRow {
                    id: question.id(),
                    survey_id: question.survey_id(),
                    prompt: question.prompt(),
                    question_type: question.question_type().as_str(),
                    options: encode_options(question.options())?,
                    order_index: i32::try_from(question.order_index()).map_err(|_| {
                        SurveyStoreError::query("question order index out of range")
                    })?,
                })
            })
            .collect::<Result<Vec<_>, SurveyStoreError>>()?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(surveys::table)
                    .values(&header)
                    .execute(conn)
                    .await?;

                diesel::insert_into(survey_questions::table)
                    .values(&question_rows)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, survey_id: Uuid) -> Result<Option<Survey>, SurveyStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Self::load_survey(&mut conn, survey_id).await
    }

    async fn find_by_invitation_hash(
        &self,
        hash: &TokenHash,
    ) -> Result<Option<Survey>, SurveyStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let survey_id = survey_invitations::table
            .filter(survey_invitations::token_hash.eq(hash.as_str()))
            .select(survey_invitations::survey_id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match survey_id {
            Some(survey_id) => Self::load_survey(&mut conn, survey_id).await,
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Survey>, SurveyStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let headers: Vec<SurveyRow> = surveys::table
            .order(surveys::created_at.desc())
            .select(SurveyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut result = Vec::with_capacity(headers.len());
        for header in headers {
            let questions: Vec<QuestionRow> = survey_questions::table
                .filter(survey_questions::survey_id.eq(header.id))
                .order(survey_questions::order_index.asc())
                .select(QuestionRow::as_select())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            result.push(rows_to_survey(header, questions)?);
        }

        Ok(result)
    }

    async fn stats(&self, survey_id: Uuid) -> Result<SurveyStats, SurveyStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let invitation_count: i64 = survey_invitations::table
            .filter(survey_invitations::survey_id.eq(survey_id))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let response_count: i64 = survey_responses::table
            .filter(survey_responses::survey_id.eq(survey_id))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(SurveyStats {
            invitation_count: count_to_u64(invitation_count),
            response_count: count_to_u64(response_count),
        })
    }
}
