//! # schemaform-rules
//!
//! The schema interpretation engine for schemaform.
//!
//! ## Overview
//!
//! - [`evaluator`] checks a value against a field's `RuleSet`; first failing
//!   check wins.
//! - [`condition`] translates dependency conditions into rule checks so both
//!   validation and activity share one evaluation kernel.
//! - [`resolver`] decides whether a field is active from the value snapshot.
//! - [`loader`] reads JSON/TOML schema documents and value snapshots.
//! - [`diagnostics`] reports malformed schema elements without rejecting them.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let schema = schemaform_rules::loader::from_file(Path::new("forms/signup.json"))?;
//! let validator = schemaform_rules::standard_validator();
//! let values = schema.initial_values();
//! let page = validator.validate_page(&schema.pages[0], &values);
//! ```

pub mod condition;
pub mod diagnostics;
pub mod evaluator;
pub mod loader;
pub mod resolver;

pub use condition::to_rule_check;
pub use evaluator::{evaluate, RuleSetEvaluator};
pub use resolver::{is_active, DependencyResolver};

use schemaform_core::FormValidator;

/// A `FormValidator` wired with the rule-set evaluator and dependency resolver.
pub fn standard_validator() -> FormValidator {
    FormValidator::new(Box::new(RuleSetEvaluator), Box::new(DependencyResolver))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
