//! Error types for the schemaform loading boundary.
//!
//! Validation itself never fails: a value that breaks a rule is reported as
//! data in a `FieldVerdict`. `FormError` covers only the places where input
//! documents are read and parsed.

use thiserror::Error;

/// The unified error type for schemaform.
#[derive(Debug, Error)]
pub enum FormError {
    /// The schema document is not valid JSON/TOML or does not match the
    /// expected shape.
    #[error("failed to parse schema: {reason}")]
    SchemaParse { reason: String },

    /// The schema file could not be read.
    #[error("failed to read schema: {reason}")]
    SchemaRead { reason: String },

    /// A file extension the loader has no parser for.
    #[error("unsupported document format '{extension}' (expected json or toml)")]
    UnsupportedFormat { extension: String },

    /// A value snapshot document could not be read or parsed.
    #[error("failed to parse field values: {reason}")]
    ValuesParse { reason: String },

    /// A validation report could not be written out.
    #[error("failed to encode report: {reason}")]
    ReportEncode { reason: String },
}

/// Convenience alias used throughout the schemaform crates.
pub type FormResult<T> = Result<T, FormError>;
