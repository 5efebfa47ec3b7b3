//! # schemaform-contracts
//!
//! Shared types for the schemaform validation core.
//!
//! All crates in the workspace import from here. No validation logic lives
//! in this crate, only the schema data model, live value types, result
//! records, and the error type.

pub mod dependency;
pub mod error;
pub mod report;
pub mod rules;
pub mod schema;
pub mod value;
