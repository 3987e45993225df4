//! Domain core: entities, the invitation-token lifecycle, and the
//! response-submission consistency engine.
//!
//! Types are immutable after construction and validated on the way in.
//! Services implement the driving ports; all storage coordination goes
//! through the driven ports in [`ports`].

pub mod error;
pub mod invitation;
pub mod ports;
pub mod respond_service;
pub mod response;
pub mod survey;
pub mod survey_service;
pub mod token;

pub use self::error::{Error, ErrorCode};
pub use self::invitation::{InvitationStatus, SurveyInvitation};
pub use self::respond_service::RespondService;
pub use self::response::{
    AnswerDraft, AnswerValidationError, NewResponse, SurveyAnswer, SurveyResponse, MAX_ANSWER_LEN,
};
pub use self::survey::{
    QuestionType, Survey, SurveyDraft, SurveyQuestion, SurveyQuestionDraft, SurveyValidationError,
    MAX_DESCRIPTION_LEN, MAX_PROMPT_LEN, MAX_TITLE_LEN,
};
pub use self::survey_service::SurveyService;
pub use self::token::{InvitationToken, TokenHash, TokenHashParseError};

pub use self::ports::SurveyStats;
