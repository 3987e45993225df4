//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{survey_answers, survey_invitations, survey_questions, survey_responses, surveys};

/// Row struct for reading from the surveys table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = surveys)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SurveyRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating survey records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = surveys)]
pub(crate) struct NewSurveyRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the survey_questions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = survey_questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub prompt: String,
    pub question_type: String,
    pub options: Option<serde_json::Value>,
    pub order_index: i32,
}

/// Insertable struct for creating question records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = survey_questions)]
pub(crate) struct NewQuestionRow<'a> {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub prompt: &'a str,
    pub question_type: &'a str,
    pub options: Option<serde_json::Value>,
    pub order_index: i32,
}

/// Row struct for reading from the survey_invitations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = survey_invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvitationRow {
    pub token_hash: String,
    pub survey_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating invitation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = survey_invitations)]
pub(crate) struct NewInvitationRow<'a> {
    pub token_hash: &'a str,
    pub survey_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating response header records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = survey_responses)]
pub(crate) struct NewResponseRow<'a> {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub invitation_token_hash: &'a str,
    pub submitted_at: DateTime<Utc>,
}

/// Insertable struct for creating answer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = survey_answers)]
pub(crate) struct NewAnswerRow<'a> {
    pub id: Uuid,
    pub response_id: Uuid,
    pub question_id: Uuid,
    pub answer_text: &'a str,
}
