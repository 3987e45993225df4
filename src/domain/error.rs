//! Domain-level error type.
//!
//! Transport agnostic: the HTTP adapter maps these to status codes and JSON
//! envelopes. Every business failure in the engine is expressed as a value of
//! this type so the boundary can handle the full taxonomy exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Admin authentication failed or is missing.
    Unauthorized,
    /// The requested resource does not exist.
    NotFound,
    /// The presented invitation token matches no ledger entry.
    InvalidToken,
    /// The invitation has already been redeemed.
    AlreadyUsed,
    /// The invitation's expiry timestamp has passed.
    Expired,
    /// The answer set does not cover every survey question exactly once.
    IncompleteAnswers,
    /// The answer set references a question outside the survey.
    UnknownQuestion,
    /// A concurrent submission won the race for the same invitation.
    ConcurrentConflict,
    /// A dependency (storage, pool) is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the engine.
    InternalError,
}

/// Domain error payload carried from services to the boundary.
///
/// ## Invariants
/// - `message` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "invalid_token")]
    code: ErrorCode,
    #[schema(example = "Invalid or unknown token.")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidToken`].
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidToken, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyUsed`].
    pub fn already_used(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyUsed, message)
    }

    /// Convenience constructor for [`ErrorCode::Expired`].
    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Expired, message)
    }

    /// Convenience constructor for [`ErrorCode::IncompleteAnswers`].
    pub fn incomplete_answers(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IncompleteAnswers, message)
    }

    /// Convenience constructor for [`ErrorCode::UnknownQuestion`].
    pub fn unknown_question(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownQuestion, message)
    }

    /// Convenience constructor for [`ErrorCode::ConcurrentConflict`].
    pub fn concurrent_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrentConflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn constructors_set_the_matching_code() {
        assert_eq!(Error::invalid_token("x").code(), ErrorCode::InvalidToken);
        assert_eq!(Error::already_used("x").code(), ErrorCode::AlreadyUsed);
        assert_eq!(Error::expired("x").code(), ErrorCode::Expired);
        assert_eq!(
            Error::concurrent_conflict("x").code(),
            ErrorCode::ConcurrentConflict
        );
    }

    #[rstest]
    fn codes_serialize_as_snake_case() {
        let rendered = serde_json::to_value(Error::incomplete_answers("missing answers"))
            .expect("error serializes");

        assert_eq!(rendered["code"], json!("incomplete_answers"));
        assert_eq!(rendered["message"], json!("missing answers"));
        assert!(rendered.get("details").is_none());
    }

    #[rstest]
    fn details_round_trip_through_json() {
        let error = Error::invalid_request("bad field").with_details(json!({ "field": "title" }));
        let rendered = serde_json::to_value(&error).expect("error serializes");
        let parsed: Error = serde_json::from_value(rendered).expect("error deserializes");

        assert_eq!(parsed, error);
    }
}
