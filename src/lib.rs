//! Anonymous survey backend built around single-use invitation tokens.
//!
//! The domain layer owns the token lifecycle and submission consistency
//! rules; inbound adapters expose them over HTTP and outbound adapters
//! persist them in PostgreSQL and deliver invitation emails.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
