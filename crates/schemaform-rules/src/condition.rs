//! The condition translator.
//!
//! Dependency conditions are not evaluated by a second engine. Each one is
//! translated into a `RuleCheck` (a small `RuleSet` plus the outcome it is
//! expected to produce) and run through [`evaluate`](crate::evaluator::evaluate):
//!
//! | condition        | rule set                    | required | holds when |
//! |------------------|-----------------------------|----------|------------|
//! | none             | (empty)                     | yes      | valid      |
//! | `greaterThan n`  | `max_value = n`             | yes      | invalid    |
//! | `lessThan n`     | `min_value = n`             | yes      | invalid    |
//! | `contains s`     | text: `mandatory_characters = [s]`, list: `mandatory_values = [s]` | yes | valid |
//! | rule set         | as written                  | yes      | valid      |
//!
//! `equals` and `notEquals` are plain equality and skip the evaluator, whose
//! emptiness gate would otherwise decide comparisons against `""` or
//! `false`. A missing controller equals nothing.
//!
//! Conditions that do not apply to the controller's value type (ordering on
//! a non-number, `contains` on a number or checkbox) are vacuously false.
//! `Dependency::reverse` is applied by the caller.

use schemaform_contracts::{
    dependency::{Comparison, DependencyCondition},
    rules::RuleSet,
    value::{FieldPrimitive, Scalar},
};

use crate::evaluator::evaluate;

/// Which verdict counts as "condition holds".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Valid,
    Invalid,
}

/// A dependency condition expressed in the rule language.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCheck {
    pub rules: RuleSet,
    pub required: bool,
    pub expect: Expect,
}

impl RuleCheck {
    fn valid_when(rules: RuleSet, required: bool) -> Self {
        Self {
            rules,
            required,
            expect: Expect::Valid,
        }
    }

    fn invalid_when(rules: RuleSet) -> Self {
        Self {
            rules,
            required: true,
            expect: Expect::Invalid,
        }
    }

    /// Run the check against `value` through the shared evaluator.
    pub fn holds(&self, value: Option<&FieldPrimitive>) -> bool {
        let verdict = evaluate(Some(&self.rules), self.required, None, value);
        verdict.is_valid() == (self.expect == Expect::Valid)
    }
}

/// Translate `condition` for a controller currently holding `value`.
///
/// Returns `None` for equality comparisons, which are not rule checks, and
/// when the condition cannot apply to that kind of value.
pub fn translate(
    condition: Option<&DependencyCondition>,
    value: Option<&FieldPrimitive>,
) -> Option<RuleCheck> {
    let comparison = match condition {
        None => return Some(RuleCheck::valid_when(RuleSet::default(), true)),
        Some(DependencyCondition::Rules(rules)) => {
            return Some(RuleCheck::valid_when(rules.clone(), true))
        }
        Some(DependencyCondition::Compare(c)) => c,
    };

    match comparison {
        // Decided directly by `to_rule_check`.
        Comparison::Equals(_) | Comparison::NotEquals(_) => None,
        Comparison::GreaterThan(bound) => {
            value.and_then(FieldPrimitive::as_number)?;
            Some(RuleCheck::invalid_when(RuleSet {
                max_value: Some(*bound),
                ..RuleSet::default()
            }))
        }
        Comparison::LessThan(bound) => {
            value.and_then(FieldPrimitive::as_number)?;
            Some(RuleCheck::invalid_when(RuleSet {
                min_value: Some(*bound),
                ..RuleSet::default()
            }))
        }
        Comparison::Contains(needle) => {
            let rules = match value? {
                FieldPrimitive::Text(_) => RuleSet {
                    mandatory_characters: vec![needle.clone()],
                    ..RuleSet::default()
                },
                FieldPrimitive::List(_) => RuleSet {
                    mandatory_values: vec![Scalar::Text(needle.clone())],
                    ..RuleSet::default()
                },
                FieldPrimitive::Number(_) | FieldPrimitive::Bool(_) => return None,
            };
            Some(RuleCheck::valid_when(rules, true))
        }
    }
}

/// True when `condition` holds for `value`. A missing condition means
/// "non-empty".
pub fn to_rule_check(condition: Option<&DependencyCondition>, value: Option<&FieldPrimitive>) -> bool {
    match condition {
        Some(DependencyCondition::Compare(Comparison::Equals(expected))) => {
            value.is_some_and(|v| expected.matches(v))
        }
        Some(DependencyCondition::Compare(Comparison::NotEquals(unexpected))) => {
            !value.is_some_and(|v| unexpected.matches(v))
        }
        _ => translate(condition, value).is_some_and(|check| check.holds(value)),
    }
}

#[cfg(test)]
mod tests {
    use schemaform_contracts::{
        dependency::{Comparison, DependencyCondition},
        rules::RuleSet,
        value::{FieldPrimitive, Scalar},
    };

    use super::{to_rule_check, translate, Expect};

    fn cmp(c: Comparison) -> DependencyCondition {
        DependencyCondition::Compare(c)
    }

    fn text(s: &str) -> FieldPrimitive {
        FieldPrimitive::Text(s.to_string())
    }

    fn num(n: f64) -> FieldPrimitive {
        FieldPrimitive::Number(n)
    }

    #[test]
    fn no_condition_requires_a_non_empty_value() {
        assert!(to_rule_check(None, Some(&text("x"))));
        assert!(to_rule_check(None, Some(&FieldPrimitive::Bool(true))));
        assert!(to_rule_check(None, Some(&num(0.0))));
        assert!(!to_rule_check(None, None));
        assert!(!to_rule_check(None, Some(&text(""))));
        assert!(!to_rule_check(None, Some(&FieldPrimitive::Bool(false))));
    }

    #[test]
    fn equals_compares_text_and_numbers() {
        let c = cmp(Comparison::Equals(Scalar::from("NO")));
        assert!(to_rule_check(Some(&c), Some(&text("NO"))));
        assert!(!to_rule_check(Some(&c), Some(&text("SE"))));
        assert!(!to_rule_check(Some(&c), None));

        let n = cmp(Comparison::Equals(Scalar::from(3.0)));
        assert!(to_rule_check(Some(&n), Some(&num(3.0))));
        assert!(!to_rule_check(Some(&n), Some(&text("3"))));
    }

    #[test]
    fn equals_never_crosses_value_types() {
        let c = cmp(Comparison::Equals(Scalar::from("a")));
        assert!(!to_rule_check(Some(&c), Some(&FieldPrimitive::List(vec!["a".into()]))));
        assert!(!to_rule_check(Some(&c), Some(&FieldPrimitive::Bool(true))));
    }

    #[test]
    fn equals_compares_checkbox_state() {
        let unchecked = cmp(Comparison::Equals(Scalar::from(false)));
        assert!(to_rule_check(Some(&unchecked), Some(&FieldPrimitive::Bool(false))));
        assert!(!to_rule_check(Some(&unchecked), Some(&FieldPrimitive::Bool(true))));

        let checked = cmp(Comparison::NotEquals(Scalar::from(true)));
        assert!(to_rule_check(Some(&checked), Some(&FieldPrimitive::Bool(false))));
        assert!(!to_rule_check(Some(&checked), Some(&FieldPrimitive::Bool(true))));
    }

    #[test]
    fn equality_against_empty_text_is_plain_equality() {
        let is_blank = cmp(Comparison::Equals(Scalar::from("")));
        assert!(to_rule_check(Some(&is_blank), Some(&text(""))));
        assert!(!to_rule_check(Some(&is_blank), Some(&text("x"))));
        assert!(!to_rule_check(Some(&is_blank), None));

        let not_blank = cmp(Comparison::NotEquals(Scalar::from("")));
        assert!(!to_rule_check(Some(&not_blank), Some(&text(""))));
        assert!(to_rule_check(Some(&not_blank), Some(&text("x"))));
        assert!(to_rule_check(Some(&not_blank), None));
    }

    #[test]
    fn equality_is_not_a_rule_check() {
        let c = cmp(Comparison::Equals(Scalar::from("NO")));
        assert!(translate(Some(&c), Some(&text("NO"))).is_none());
    }

    #[test]
    fn not_equals_holds_for_anything_else() {
        let c = cmp(Comparison::NotEquals(Scalar::from("none")));
        assert!(!to_rule_check(Some(&c), Some(&text("none"))));
        assert!(to_rule_check(Some(&c), Some(&text("some"))));
        assert!(to_rule_check(Some(&c), None));
        assert!(to_rule_check(Some(&c), Some(&FieldPrimitive::Bool(true))));
    }

    #[test]
    fn ordering_is_strict_and_numeric_only() {
        let gt = cmp(Comparison::GreaterThan(18.0));
        assert!(to_rule_check(Some(&gt), Some(&num(19.0))));
        assert!(!to_rule_check(Some(&gt), Some(&num(18.0))));
        assert!(!to_rule_check(Some(&gt), Some(&text("99"))));
        assert!(!to_rule_check(Some(&gt), None));

        let lt = cmp(Comparison::LessThan(0.0));
        assert!(to_rule_check(Some(&lt), Some(&num(-0.5))));
        assert!(!to_rule_check(Some(&lt), Some(&num(0.0))));
        assert!(!to_rule_check(Some(&lt), Some(&FieldPrimitive::List(vec![]))));
    }

    #[test]
    fn contains_is_substring_or_membership() {
        let c = cmp(Comparison::Contains("news".into()));
        assert!(to_rule_check(Some(&c), Some(&text("weekly newsletter"))));
        assert!(!to_rule_check(Some(&c), Some(&text("weekly digest"))));

        let list = FieldPrimitive::List(vec!["sports".into(), "news".into()]);
        assert!(to_rule_check(Some(&c), Some(&list)));
        let other = FieldPrimitive::List(vec!["newsletter".into()]);
        assert!(!to_rule_check(Some(&c), Some(&other)), "membership is exact");

        assert!(!to_rule_check(Some(&c), Some(&num(1.0))));
        assert!(!to_rule_check(Some(&c), None));
    }

    #[test]
    fn rule_set_condition_reuses_the_evaluator() {
        let c = DependencyCondition::Rules(RuleSet {
            min_value: Some(3.0),
            ..RuleSet::default()
        });
        assert!(to_rule_check(Some(&c), Some(&text("abcd"))));
        assert!(!to_rule_check(Some(&c), Some(&text("ab"))));
        assert!(!to_rule_check(Some(&c), None));
    }

    #[test]
    fn ordering_translates_to_an_expected_failure() {
        let gt = cmp(Comparison::GreaterThan(5.0));
        let check = translate(Some(&gt), Some(&num(1.0))).unwrap();
        assert_eq!(check.expect, Expect::Invalid);
        assert_eq!(check.rules.max_value, Some(5.0));
        assert!(check.required);
    }
}
