//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed stores using Diesel ORM
//! - **email**: invitation delivery adapters
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod email;
pub mod persistence;
