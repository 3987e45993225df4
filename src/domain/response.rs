//! Survey responses and their answers.
//!
//! A response is the complete, immutable answer set redeemed against one
//! invitation. The pairing between a response and its invitation hash is what
//! the storage-level uniqueness constraint protects.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token::TokenHash;

/// Maximum length of a single answer body.
pub const MAX_ANSWER_LEN: usize = 2000;

/// Validation errors for answer construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerValidationError {
    /// The answer body was blank once trimmed.
    #[error("answer for question {question_id} must not be empty")]
    EmptyAnswer {
        /// Question the blank answer targeted.
        question_id: Uuid,
    },
    /// The answer body exceeded [`MAX_ANSWER_LEN`].
    #[error("answer for question {question_id} must be at most {MAX_ANSWER_LEN} characters")]
    AnswerTooLong {
        /// Question the oversized answer targeted.
        question_id: Uuid,
    },
}

/// One submitted answer, trimmed and immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyAnswer {
    id: Uuid,
    response_id: Uuid,
    question_id: Uuid,
    answer_text: String,
}

impl SurveyAnswer {
    /// Validate and trim an answer body.
    pub fn new(
        id: Uuid,
        response_id: Uuid,
        question_id: Uuid,
        answer_text: &str,
    ) -> Result<Self, AnswerValidationError> {
        let trimmed = answer_text.trim();
        if trimmed.is_empty() {
            return Err(AnswerValidationError::EmptyAnswer { question_id });
        }
        if trimmed.chars().count() > MAX_ANSWER_LEN {
            return Err(AnswerValidationError::AnswerTooLong { question_id });
        }
        Ok(Self {
            id,
            response_id,
            question_id,
            answer_text: trimmed.to_owned(),
        })
    }

    /// Answer identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning response.
    #[must_use]
    pub fn response_id(&self) -> Uuid {
        self.response_id
    }

    /// Question this answer addresses.
    #[must_use]
    pub fn question_id(&self) -> Uuid {
        self.question_id
    }

    /// Trimmed answer body.
    #[must_use]
    pub fn answer_text(&self) -> &str {
        &self.answer_text
    }
}

/// A committed (or about-to-commit) response header.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponse {
    id: Uuid,
    survey_id: Uuid,
    submitted_at: DateTime<Utc>,
    invitation_token_hash: TokenHash,
}

impl SurveyResponse {
    /// Assemble a response header.
    #[must_use]
    pub fn new(
        id: Uuid,
        survey_id: Uuid,
        submitted_at: DateTime<Utc>,
        invitation_token_hash: TokenHash,
    ) -> Self {
        Self {
            id,
            survey_id,
            submitted_at,
            invitation_token_hash,
        }
    }

    /// Response identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning survey.
    #[must_use]
    pub fn survey_id(&self) -> Uuid {
        self.survey_id
    }

    /// Submission timestamp.
    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Hash of the invitation this response redeems. Unique per response.
    #[must_use]
    pub fn invitation_token_hash(&self) -> &TokenHash {
        &self.invitation_token_hash
    }
}

/// The atomic unit of work handed to the response store: one response header,
/// its answers, and the implied invitation transition to responded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResponse {
    /// Response header.
    pub response: SurveyResponse,
    /// One answer per survey question.
    pub answers: Vec<SurveyAnswer>,
}

/// Raw answer input to a submission, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDraft {
    /// Question this draft targets.
    pub question_id: Uuid,
    /// Untrimmed answer body as received at the boundary.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn answer_is_trimmed() {
        let answer = SurveyAnswer::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "  Cafe  ")
            .expect("valid answer");

        assert_eq!(answer.answer_text(), "Cafe");
    }

    #[rstest]
    fn blank_answer_is_rejected() {
        let question_id = Uuid::new_v4();
        let result = SurveyAnswer::new(Uuid::new_v4(), Uuid::new_v4(), question_id, "   ");

        assert_eq!(result, Err(AnswerValidationError::EmptyAnswer { question_id }));
    }

    #[rstest]
    fn oversized_answer_is_rejected() {
        let question_id = Uuid::new_v4();
        let body = "a".repeat(MAX_ANSWER_LEN + 1);
        let result = SurveyAnswer::new(Uuid::new_v4(), Uuid::new_v4(), question_id, &body);

        assert_eq!(
            result,
            Err(AnswerValidationError::AnswerTooLong { question_id })
        );
    }
}
