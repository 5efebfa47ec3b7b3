//! Trait seams between the orchestrator and the rule machinery.
//!
//! - `FieldEvaluator`: checks one field's value against its rules
//! - `ActivityResolver`: decides whether a field is currently active
//!
//! Both are pure: they read the schema and a value snapshot and return data.
//! Neither may block, perform I/O, or wait on option lists still loading.

use schemaform_contracts::{
    report::FieldVerdict,
    schema::FieldSpec,
    value::{FieldPrimitive, FieldValueMap},
};

/// Evaluates a field's own rule set against its current value.
///
/// Implementations must be deterministic: the same field and value always
/// produce the same verdict.
pub trait FieldEvaluator: Send + Sync {
    /// Return `FieldVerdict::Invalid` with the first failing check, or
    /// `FieldVerdict::Valid`. `value` is `None` when the field has no entry
    /// in the snapshot.
    fn evaluate(&self, field: &FieldSpec, value: Option<&FieldPrimitive>) -> FieldVerdict;
}

/// Decides whether a field is active given the values of the fields it
/// depends on.
///
/// The orchestrator skips rule evaluation for inactive fields.
pub trait ActivityResolver: Send + Sync {
    fn is_active(&self, field: &FieldSpec, values: &FieldValueMap) -> bool;
}
