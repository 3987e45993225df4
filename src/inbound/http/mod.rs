//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod responses;
pub mod state;
pub mod surveys;
pub mod validation;

pub use error::ApiResult;
