//! The dependency resolver.
//!
//! A field is active when every entry in its `dependencies` list holds
//! (logical AND). Each entry looks up its controller in the value snapshot,
//! runs the translated condition, and inverts the result when `reverse` is
//! set. A controller missing from the snapshot is an empty value, so a plain
//! "must be filled" dependency on it fails closed.
//!
//! Resolution is a single snapshot lookup per dependency. It never follows
//! the controller's own dependencies, so cyclic declarations terminate and
//! simply stay inert.

use tracing::debug;

use schemaform_contracts::{dependency::Dependency, schema::FieldSpec, value::FieldValueMap};
use schemaform_core::traits::ActivityResolver;

use crate::condition::to_rule_check;

/// Evaluate one dependency against the snapshot.
pub fn dependency_holds(dependency: &Dependency, values: &FieldValueMap) -> bool {
    let value = values.get(&dependency.depends_on);
    let holds = to_rule_check(dependency.condition.as_ref(), value) != dependency.reverse;
    debug!(
        depends_on = %dependency.depends_on,
        present = value.is_some(),
        reverse = dependency.reverse,
        holds,
        "evaluated dependency"
    );
    holds
}

/// True when `field` has no dependencies or all of them hold.
pub fn is_active(field: &FieldSpec, values: &FieldValueMap) -> bool {
    field
        .dependencies
        .iter()
        .all(|dependency| dependency_holds(dependency, values))
}

/// `ActivityResolver` over declared field dependencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyResolver;

impl ActivityResolver for DependencyResolver {
    fn is_active(&self, field: &FieldSpec, values: &FieldValueMap) -> bool {
        is_active(field, values)
    }
}
