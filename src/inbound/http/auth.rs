//! Authentication helpers used by HTTP handlers.
//!
//! Administrator endpoints are guarded by a single static bearer token
//! configured at startup. Respondent endpoints authenticate with the
//! invitation token itself and never touch this module.

use actix_web::{http::header, HttpRequest};

use crate::domain::Error;

use super::ApiResult;

/// Configured administrator credential, injected via `web::Data`.
#[derive(Clone)]
pub struct AdminAuth {
    token: String,
}

impl AdminAuth {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Check the request's `Authorization: Bearer` header against the
    /// configured token.
    pub fn require_admin(&self, request: &HttpRequest) -> ApiResult<()> {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| Error::unauthorized("missing bearer token"))?;

        if constant_time_eq(presented.as_bytes(), self.token.as_bytes()) {
            Ok(())
        } else {
            Err(Error::unauthorized("invalid bearer token"))
        }
    }
}

// Comparison time must not depend on how much of the token matches.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn auth() -> AdminAuth {
        AdminAuth::new("sekrit")
    }

    #[rstest]
    fn matching_bearer_token_is_accepted() {
        let request = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer sekrit"))
            .to_http_request();
        assert!(auth().require_admin(&request).is_ok());
    }

    #[rstest]
    #[case::wrong_token("Bearer wrong")]
    #[case::wrong_scheme("Basic sekrit")]
    #[case::bare_token("sekrit")]
    fn rejected_header_yields_unauthorized(#[case] value: &str) {
        let request = TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_http_request();
        let error = auth().require_admin(&request).expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn absent_header_yields_unauthorized() {
        let request = TestRequest::default().to_http_request();
        let error = auth().require_admin(&request).expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
