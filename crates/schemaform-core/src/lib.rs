//! # schemaform-core
//!
//! The validation orchestrator for schema-driven forms.
//!
//! This crate provides:
//! - The two seam traits (`FieldEvaluator`, `ActivityResolver`)
//! - The `FormValidator` that runs them over pages and whole forms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaform_core::{FormValidator, traits::{ActivityResolver, FieldEvaluator}};
//! ```

pub mod orchestrator;
pub mod traits;

pub use orchestrator::FormValidator;
