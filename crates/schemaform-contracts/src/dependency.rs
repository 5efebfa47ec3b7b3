//! Inter-field dependencies.
//!
//! A dependency makes one field's active state conditional on another
//! field's current value. `depends_on` is a plain name, resolved against the
//! value snapshot at evaluation time, so a schema may reference fields that
//! come later on the page or on another page.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{rules::RuleSet, value::Scalar};

/// One entry in a field's `dependencies` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Name of the controlling field.
    pub depends_on: String,

    /// The check applied to the controlling field's value. When absent the
    /// controller must hold a non-empty value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<DependencyCondition>,

    /// Invert the outcome of the check.
    #[serde(default)]
    pub reverse: bool,
}

impl Dependency {
    /// A dependency satisfied when `depends_on` holds any non-empty value.
    pub fn on(depends_on: impl Into<String>) -> Self {
        Self {
            depends_on: depends_on.into(),
            condition: None,
            reverse: false,
        }
    }

    pub fn when(mut self, condition: impl Into<DependencyCondition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// The check a dependency applies to its controller.
///
/// Written in the schema either as a single comparison
/// (`{"equals": "yes"}`, `{"greaterThan": 3}`) or as a full rule set
/// (`{"minValue": 3, "forbiddenValues": ["n/a"]}`).
///
/// Parsing is strict: a comparison must be the only key and carry an operand
/// of the right type, and a rule set may only use rule-set keys. Anything
/// else is a schema parse error rather than a silently different check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DependencyCondition {
    Compare(Comparison),
    Rules(RuleSet),
}

const COMPARISON_KEYS: &[&str] = &["equals", "notEquals", "greaterThan", "lessThan", "contains"];

impl<'de> Deserialize<'de> for DependencyCondition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;

        if raw.keys().any(|k| COMPARISON_KEYS.contains(&k.as_str())) {
            if raw.len() != 1 {
                return Err(D::Error::custom(format!(
                    "a comparison condition takes exactly one key, found {}",
                    raw.len()
                )));
            }
            return Comparison::deserialize(Value::Object(raw))
                .map(DependencyCondition::Compare)
                .map_err(|e| D::Error::custom(format!("invalid comparison condition: {e}")));
        }

        if let Some(key) = raw.keys().find(|k| !RuleSet::KEYS.contains(&k.as_str())) {
            return Err(D::Error::custom(format!(
                "unknown dependency condition key '{key}'"
            )));
        }
        RuleSet::deserialize(Value::Object(raw))
            .map(DependencyCondition::Rules)
            .map_err(|e| D::Error::custom(format!("invalid rule-set condition: {e}")))
    }
}

impl From<Comparison> for DependencyCondition {
    fn from(c: Comparison) -> Self {
        DependencyCondition::Compare(c)
    }
}

impl From<RuleSet> for DependencyCondition {
    fn from(r: RuleSet) -> Self {
        DependencyCondition::Rules(r)
    }
}

/// Simple comparisons against the controlling field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    /// Exact equality with a text, number, or boolean value.
    Equals(Scalar),
    NotEquals(Scalar),
    /// Numbers only; any other value fails the check.
    GreaterThan(f64),
    /// Numbers only; any other value fails the check.
    LessThan(f64),
    /// Substring for text values, membership for list values.
    Contains(String),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn comparison_condition_deserializes() {
        let dep: Dependency = serde_json::from_value(json!({
            "dependsOn": "country",
            "condition": { "equals": "NO" }
        }))
        .unwrap();

        assert_eq!(dep.depends_on, "country");
        assert_eq!(
            dep.condition,
            Some(DependencyCondition::Compare(Comparison::Equals(Scalar::Text(
                "NO".into()
            ))))
        );
        assert!(!dep.reverse);
    }

    #[test]
    fn rule_set_condition_deserializes() {
        let dep: Dependency = serde_json::from_value(json!({
            "dependsOn": "age",
            "condition": { "minValue": 18 },
            "reverse": true
        }))
        .unwrap();

        match dep.condition {
            Some(DependencyCondition::Rules(rules)) => assert_eq!(rules.min_value, Some(18.0)),
            other => panic!("expected rule set condition, got {:?}", other),
        }
        assert!(dep.reverse);
    }

    #[test]
    fn boolean_operand_is_a_comparison() {
        let dep: Dependency = serde_json::from_value(json!({
            "dependsOn": "optout",
            "condition": { "equals": false }
        }))
        .unwrap();
        assert_eq!(
            dep.condition,
            Some(DependencyCondition::Compare(Comparison::Equals(Scalar::Bool(false))))
        );

        let dep: Dependency = serde_json::from_value(json!({
            "dependsOn": "optout",
            "condition": { "notEquals": true }
        }))
        .unwrap();
        assert_eq!(
            dep.condition,
            Some(DependencyCondition::Compare(Comparison::NotEquals(Scalar::Bool(true))))
        );
    }

    #[test]
    fn malformed_conditions_are_rejected() {
        let shapes = [
            json!({ "greaterThan": "18" }),
            json!({ "lessThan": true }),
            json!({ "contains": 3 }),
            json!({ "equals": ["a"] }),
            json!({ "equal": "x" }),
            json!({ "equals": "x", "minValue": 2 }),
            json!("yes"),
        ];
        for shape in shapes {
            let parsed = serde_json::from_value::<Dependency>(json!({
                "dependsOn": "age",
                "condition": shape.clone()
            }));
            assert!(parsed.is_err(), "{shape} should not parse, got {:?}", parsed);
        }
    }

    #[test]
    fn empty_condition_object_is_an_empty_rule_set() {
        let dep: Dependency =
            serde_json::from_value(json!({ "dependsOn": "a", "condition": {} })).unwrap();
        assert_eq!(dep.condition, Some(DependencyCondition::Rules(RuleSet::default())));
    }

    #[test]
    fn condition_parses_from_toml() {
        let dep: Dependency = toml::from_str(
            "dependsOn = \"age\"\ncondition = { greaterThan = 17 }\n",
        )
        .unwrap();
        assert_eq!(
            dep.condition,
            Some(DependencyCondition::Compare(Comparison::GreaterThan(17.0)))
        );
    }

    #[test]
    fn missing_condition_is_none() {
        let dep: Dependency = serde_json::from_value(json!({ "dependsOn": "show" })).unwrap();
        assert_eq!(dep, Dependency::on("show"));
    }
}
