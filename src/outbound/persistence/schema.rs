//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, update this file to match.

diesel::table! {
    /// Survey headers.
    surveys (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Trimmed title, at most 200 characters.
        #[max_length = 200]
        title -> Varchar,
        /// Optional trimmed description, at most 1000 characters.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Questions belonging to a survey, densely ordered by `order_index`.
    survey_questions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning survey.
        survey_id -> Uuid,
        /// Prompt text, at most 500 characters.
        #[max_length = 500]
        prompt -> Varchar,
        /// Storage tag of the question kind.
        #[max_length = 32]
        question_type -> Varchar,
        /// Choice list for option-based kinds; null for free text.
        options -> Nullable<Jsonb>,
        /// Zero-based position within the survey.
        order_index -> Int4,
    }
}

diesel::table! {
    /// Invitation ledger keyed by token digest. The plaintext token is never
    /// stored.
    survey_invitations (token_hash) {
        /// Primary key: lowercase hex SHA-256 digest of the token.
        #[max_length = 64]
        token_hash -> Varchar,
        /// Survey this invitation opens.
        survey_id -> Uuid,
        /// Issuance timestamp.
        created_at -> Timestamptz,
        /// Optional expiry; null means the invitation never lapses.
        expires_at -> Nullable<Timestamptz>,
        /// Set exactly once, inside the response commit transaction.
        responded_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Response headers. The unique constraint on `invitation_token_hash`
    /// is the single-use guarantee under concurrency.
    survey_responses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Survey the response belongs to.
        survey_id -> Uuid,
        /// Digest of the invitation that produced this response; unique.
        #[max_length = 64]
        invitation_token_hash -> Varchar,
        /// Commit timestamp.
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Individual answers within a response.
    survey_answers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning response.
        response_id -> Uuid,
        /// Question this answer addresses.
        question_id -> Uuid,
        /// Trimmed answer text, at most 2000 characters.
        #[max_length = 2000]
        answer_text -> Varchar,
    }
}

diesel::joinable!(survey_questions -> surveys (survey_id));
diesel::joinable!(survey_invitations -> surveys (survey_id));
diesel::joinable!(survey_responses -> surveys (survey_id));
diesel::joinable!(survey_answers -> survey_responses (response_id));
diesel::joinable!(survey_answers -> survey_questions (question_id));

diesel::allow_tables_to_appear_in_same_query!(
    surveys,
    survey_questions,
    survey_invitations,
    survey_responses,
    survey_answers,
);
