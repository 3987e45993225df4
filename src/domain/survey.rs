//! Survey aggregate: a survey and its ordered questions.
//!
//! The aggregate is immutable after creation; there is no update or delete
//! path anywhere in the engine. Constructors validate the structural
//! invariants so that every `Survey` value in circulation is persistable
//! as-is.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum length of a survey title.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum length of a survey description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Maximum length of a question prompt.
pub const MAX_PROMPT_LEN: usize = 500;

/// Kind of answer a question collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionType {
    /// Free-form text answer; the only kind currently issued.
    #[default]
    FreeText,
}

impl QuestionType {
    /// Stable storage tag for the `question_type` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreeText => "text",
        }
    }

    /// Parse a storage tag back into a question type.
    pub fn from_tag(tag: &str) -> Result<Self, SurveyValidationError> {
        match tag {
            "text" => Ok(Self::FreeText),
            other => Err(SurveyValidationError::UnknownQuestionType {
                tag: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised by the aggregate constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurveyValidationError {
    /// Title was blank once trimmed.
    #[error("survey title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`MAX_TITLE_LEN`].
    #[error("survey title must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,
    /// Description exceeded [`MAX_DESCRIPTION_LEN`].
    #[error("survey description must be at most {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,
    /// The aggregate carried no questions.
    #[error("a survey needs at least one question")]
    NoQuestions,
    /// A question prompt was blank once trimmed.
    #[error("question prompt at index {index} must not be empty")]
    EmptyPrompt {
        /// Zero-based position of the offending question.
        index: usize,
    },
    /// A question prompt exceeded [`MAX_PROMPT_LEN`].
    #[error("question prompt at index {index} must be at most {MAX_PROMPT_LEN} characters")]
    PromptTooLong {
        /// Zero-based position of the offending question.
        index: usize,
    },
    /// Question order indices were not dense and zero-based.
    #[error("question order indices must be dense and zero-based")]
    NonDenseOrder,
    /// A question referenced a survey other than its owner.
    #[error("question {question_id} does not belong to survey {survey_id}")]
    ForeignQuestion {
        /// Owning survey id of the aggregate under construction.
        survey_id: Uuid,
        /// Id of the question carrying a mismatched survey reference.
        question_id: Uuid,
    },
    /// A stored question carried an unrecognized type tag.
    #[error("unknown question type tag: {tag}")]
    UnknownQuestionType {
        /// The unrecognized tag value.
        tag: String,
    },
}

/// One question inside a survey.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyQuestion {
    id: Uuid,
    survey_id: Uuid,
    prompt: String,
    question_type: QuestionType,
    options: Option<Vec<String>>,
    order_index: u32,
}

/// Unvalidated question fields, as assembled by a service or read adapter.
#[derive(Debug, Clone)]
pub struct SurveyQuestionDraft {
    /// Question identity.
    pub id: Uuid,
    /// Owning survey.
    pub survey_id: Uuid,
    /// Prompt text shown to the respondent.
    pub prompt: String,
    /// Answer kind.
    pub question_type: QuestionType,
    /// Choice list for option-based kinds; absent for free text.
    pub options: Option<Vec<String>>,
    /// Zero-based position within the survey.
    pub order_index: u32,
}

impl SurveyQuestion {
    /// Question identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning survey.
    #[must_use]
    pub fn survey_id(&self) -> Uuid {
        self.survey_id
    }

    /// Prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answer kind.
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// Choice list, if any.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Zero-based position within the survey.
    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }
}

/// Unvalidated survey fields.
#[derive(Debug, Clone)]
pub struct SurveyDraft {
    /// Survey identity.
    pub id: Uuid,
    /// Title, trimmed by the caller.
    pub title: String,
    /// Optional description, trimmed by the caller.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Questions in creation order.
    pub questions: Vec<SurveyQuestionDraft>,
}

/// A survey with its ordered questions.
///
/// ## Invariants
/// - The title is non-blank and at most [`MAX_TITLE_LEN`] characters.
/// - There is at least one question; prompts are non-blank and bounded.
/// - Question order indices are exactly `0..n` in slice order, so read order
///   always matches creation order.
/// - Every question references this survey.
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    id: Uuid,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    questions: Vec<SurveyQuestion>,
}

impl Survey {
    /// Validate a draft into an aggregate.
    pub fn new(draft: SurveyDraft) -> Result<Self, SurveyValidationError> {
        let SurveyDraft {
            id,
            title,
            description,
            created_at,
            questions,
        } = draft;

        if title.trim().is_empty() {
            return Err(SurveyValidationError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(SurveyValidationError::TitleTooLong);
        }
        if let Some(description) = &description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(SurveyValidationError::DescriptionTooLong);
            }
        }
        if questions.is_empty() {
            return Err(SurveyValidationError::NoQuestions);
        }

        let mut validated = Vec::with_capacity(questions.len());
        for (index, question) in questions.into_iter().enumerate() {
            if question.survey_id != id {
                return Err(SurveyValidationError::ForeignQuestion {
                    survey_id: id,
                    question_id: question.id,
                });
            }
            if question.prompt.trim().is_empty() {
                return Err(SurveyValidationError::EmptyPrompt { index });
            }
            if question.prompt.chars().count() > MAX_PROMPT_LEN {
                return Err(SurveyValidationError::PromptTooLong { index });
            }
            if question.order_index as usize != index {
                return Err(SurveyValidationError::NonDenseOrder);
            }
            validated.push(SurveyQuestion {
                id: question.id,
                survey_id: question.survey_id,
                prompt: question.prompt,
                question_type: question.question_type,
                options: question.options,
                order_index: question.order_index,
            });
        }

        Ok(Self {
            id,
            title,
            description,
            created_at,
            questions: validated,
        })
    }

    /// Survey identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Questions in order-index order.
    #[must_use]
    pub fn questions(&self) -> &[SurveyQuestion] {
        &self.questions
    }

    /// Ids of this survey's questions, in question order.
    #[must_use]
    pub fn question_ids(&self) -> Vec<Uuid> {
        self.questions.iter().map(SurveyQuestion::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn draft_question(survey_id: Uuid, prompt: &str, order_index: u32) -> SurveyQuestionDraft {
        SurveyQuestionDraft {
            id: Uuid::new_v4(),
            survey_id,
            prompt: prompt.to_owned(),
            question_type: QuestionType::FreeText,
            options: None,
            order_index,
        }
    }

    #[fixture]
    fn valid_draft() -> SurveyDraft {
        let id = Uuid::new_v4();
        SurveyDraft {
            id,
            title: "Lunch Poll".to_owned(),
            description: Some("Where should we eat?".to_owned()),
            created_at: Utc::now(),
            questions: vec![
                draft_question(id, "Where?", 0),
                draft_question(id, "When?", 1),
            ],
        }
    }

    #[rstest]
    fn valid_draft_preserves_question_order(valid_draft: SurveyDraft) {
        let survey = Survey::new(valid_draft).expect("valid draft");

        let prompts: Vec<_> = survey.questions().iter().map(SurveyQuestion::prompt).collect();
        assert_eq!(prompts, ["Where?", "When?"]);
        assert_eq!(survey.questions().len(), 2);
    }

    #[rstest]
    fn rejects_blank_title(mut valid_draft: SurveyDraft) {
        valid_draft.title = "   ".to_owned();

        assert_eq!(
            Survey::new(valid_draft),
            Err(SurveyValidationError::EmptyTitle)
        );
    }

    #[rstest]
    fn rejects_oversized_title(mut valid_draft: SurveyDraft) {
        valid_draft.title = "t".repeat(MAX_TITLE_LEN + 1);

        assert_eq!(
            Survey::new(valid_draft),
            Err(SurveyValidationError::TitleTooLong)
        );
    }

    #[rstest]
    fn rejects_empty_question_list(mut valid_draft: SurveyDraft) {
        valid_draft.questions.clear();

        assert_eq!(
            Survey::new(valid_draft),
            Err(SurveyValidationError::NoQuestions)
        );
    }

    #[rstest]
    fn rejects_blank_prompt(mut valid_draft: SurveyDraft) {
        valid_draft.questions[1].prompt = " ".to_owned();

        assert_eq!(
            Survey::new(valid_draft),
            Err(SurveyValidationError::EmptyPrompt { index: 1 })
        );
    }

    #[rstest]
    #[case::gap(&[0, 2])]
    #[case::duplicate(&[0, 0])]
    #[case::one_based(&[1, 2])]
    fn rejects_non_dense_order_indices(mut valid_draft: SurveyDraft, #[case] indices: &[u32]) {
        for (question, index) in valid_draft.questions.iter_mut().zip(indices) {
            question.order_index = *index;
        }

        assert_eq!(
            Survey::new(valid_draft),
            Err(SurveyValidationError::NonDenseOrder)
        );
    }

    #[rstest]
    fn rejects_question_owned_by_another_survey(mut valid_draft: SurveyDraft) {
        let foreign = Uuid::new_v4();
        valid_draft.questions[0].survey_id = foreign;

        assert!(matches!(
            Survey::new(valid_draft),
            Err(SurveyValidationError::ForeignQuestion { .. })
        ));
    }

    #[rstest]
    fn question_type_tag_round_trips() {
        assert_eq!(QuestionType::FreeText.as_str(), "text");
        assert_eq!(QuestionType::from_tag("text"), Ok(QuestionType::FreeText));
        assert!(matches!(
            QuestionType::from_tag("likert"),
            Err(SurveyValidationError::UnknownQuestionType { .. })
        ));
    }
}
