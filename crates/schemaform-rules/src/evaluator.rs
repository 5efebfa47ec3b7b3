//! The rule evaluator.
//!
//! `evaluate` checks one value against a `RuleSet` plus the field's required
//! flag. Checks run in a fixed order and the first failure wins:
//!
//! 1. Empty value (`None`, `""`, `false`): fail only when required and not
//!    reversed. Everything else passes.
//! 2. Non-empty value on a required, reversed field: fail.
//! 3. Text, number, and list values then go through the constraints:
//!    `min_value`, `max_value`, `forbidden_values`, `mandatory_values`,
//!    `forbidden_characters`, `mandatory_characters`, `regex`.
//!
//! `reverse` only changes the required check. A field that is not required
//! passes when empty regardless of `reverse`, and a non-required reversed
//! field with a value is checked against its constraints like any other.

use tracing::debug;

use schemaform_contracts::{
    report::FieldVerdict,
    rules::RuleSet,
    schema::FieldSpec,
    value::{format_number, FieldPrimitive, Scalar},
};
use schemaform_core::traits::FieldEvaluator;

pub const REQUIRED_TEXT: &str = "This field is required";
pub const MUST_BE_EMPTY_TEXT: &str = "This field is not allowed to have a value";
pub const FORBIDDEN_VALUE_TEXT: &str = "This value is not allowed";
pub const MANDATORY_VALUE_TEXT: &str = "This value must be one of the following values";
pub const FORBIDDEN_CHARACTERS_TEXT: &str = "This value contains forbidden characters";
pub const MANDATORY_CHARACTERS_TEXT: &str = "This value must contain the following characters";
pub const REGEX_MISMATCH_TEXT: &str = "This value does not match the required format";
pub const INVALID_PATTERN_TEXT: &str = "Invalid regex pattern";

/// Evaluate `value` against `rules` and the required flag.
///
/// `required_error_text` overrides both required messages: the
/// "must have a value" one and, for reversed fields, the "must stay empty"
/// one. Pure function; the same inputs always produce the same verdict.
pub fn evaluate(
    rules: Option<&RuleSet>,
    required: bool,
    required_error_text: Option<&str>,
    value: Option<&FieldPrimitive>,
) -> FieldVerdict {
    let reverse = rules.is_some_and(|r| r.reverse);

    let Some(value) = value.filter(|v| !v.is_empty()) else {
        if required && !reverse {
            return FieldVerdict::invalid(required_error_text.unwrap_or(REQUIRED_TEXT));
        }
        return FieldVerdict::Valid;
    };

    if required && reverse {
        return FieldVerdict::invalid(required_error_text.unwrap_or(MUST_BE_EMPTY_TEXT));
    }

    match rules.and_then(|r| check_constraints(r, value)) {
        Some(reason) => FieldVerdict::Invalid { reason },
        None => FieldVerdict::Valid,
    }
}

/// What `min_value` / `max_value` compare against.
enum Measure {
    Length(usize),
    Value(f64),
}

fn measure(value: &FieldPrimitive) -> Option<Measure> {
    match value {
        // Length in UTF-16 code units, the unit form inputs count in.
        FieldPrimitive::Text(s) => Some(Measure::Length(s.encode_utf16().count())),
        FieldPrimitive::List(items) => Some(Measure::Length(items.len())),
        FieldPrimitive::Number(n) => Some(Measure::Value(*n)),
        FieldPrimitive::Bool(_) => None,
    }
}

fn check_constraints(rules: &RuleSet, value: &FieldPrimitive) -> Option<String> {
    let measured = measure(value)?;

    check_min(rules, &measured)
        .or_else(|| check_max(rules, &measured))
        .or_else(|| check_forbidden_values(rules, value))
        .or_else(|| check_mandatory_values(rules, value))
        .or_else(|| check_forbidden_characters(rules, value))
        .or_else(|| check_mandatory_characters(rules, value))
        .or_else(|| check_regex(rules, value))
}

fn check_min(rules: &RuleSet, measured: &Measure) -> Option<String> {
    let min = rules.min_value?;
    match *measured {
        Measure::Length(len) if (len as f64) < min => Some(
            rules
                .min_length_error_text
                .clone()
                .unwrap_or_else(|| format!("Minimum length is {}", format_number(min))),
        ),
        Measure::Value(n) if n < min => Some(
            rules
                .min_value_error_text
                .clone()
                .unwrap_or_else(|| format!("Minimum value is {}", format_number(min))),
        ),
        _ => None,
    }
}

fn check_max(rules: &RuleSet, measured: &Measure) -> Option<String> {
    let max = rules.max_value?;
    match *measured {
        Measure::Length(len) if (len as f64) > max => Some(
            rules
                .max_length_error_text
                .clone()
                .unwrap_or_else(|| format!("Maximum length is {}", format_number(max))),
        ),
        Measure::Value(n) if n > max => Some(
            rules
                .max_value_error_text
                .clone()
                .unwrap_or_else(|| format!("Maximum value is {}", format_number(max))),
        ),
        _ => None,
    }
}

fn check_forbidden_values(rules: &RuleSet, value: &FieldPrimitive) -> Option<String> {
    if rules.forbidden_values.iter().any(|f| f.matches(value)) {
        return Some(
            rules
                .forbidden_values_error_text
                .clone()
                .unwrap_or_else(|| FORBIDDEN_VALUE_TEXT.to_string()),
        );
    }
    None
}

fn check_mandatory_values(rules: &RuleSet, value: &FieldPrimitive) -> Option<String> {
    if rules.mandatory_values.is_empty() {
        return None;
    }

    let satisfied = match value {
        FieldPrimitive::List(items) => rules
            .mandatory_values
            .iter()
            .all(|m| m.as_text().is_some_and(|t| items.iter().any(|i| i == t))),
        _ => rules.mandatory_values.iter().any(|m| m.matches(value)),
    };
    if satisfied {
        return None;
    }

    Some(
        rules
            .mandatory_values_error_text
            .clone()
            .unwrap_or_else(|| format!("{}: {}", MANDATORY_VALUE_TEXT, join(&rules.mandatory_values))),
    )
}

fn check_forbidden_characters(rules: &RuleSet, value: &FieldPrimitive) -> Option<String> {
    let text = value.as_text()?;
    let found: Vec<&str> = rules
        .forbidden_characters
        .iter()
        .map(String::as_str)
        .filter(|c| text.contains(c))
        .collect();
    if found.is_empty() {
        return None;
    }

    let prefix = rules
        .forbidden_characters_error_text
        .as_deref()
        .unwrap_or(FORBIDDEN_CHARACTERS_TEXT);
    Some(format!("{}: {}", prefix, quote_all(&found)))
}

fn check_mandatory_characters(rules: &RuleSet, value: &FieldPrimitive) -> Option<String> {
    let text = value.as_text()?;
    let missing: Vec<&str> = rules
        .mandatory_characters
        .iter()
        .map(String::as_str)
        .filter(|c| !text.contains(c))
        .collect();
    if missing.is_empty() {
        return None;
    }

    let prefix = rules
        .mandatory_characters_error_text
        .as_deref()
        .unwrap_or(MANDATORY_CHARACTERS_TEXT);
    Some(format!("{}: {}", prefix, quote_all(&missing)))
}

fn check_regex(rules: &RuleSet, value: &FieldPrimitive) -> Option<String> {
    let pattern = rules.regex.as_ref()?;
    let text = value.as_text()?;

    let Some(re) = pattern.compiled() else {
        return Some(INVALID_PATTERN_TEXT.to_string());
    };
    if re.is_match(text) {
        return None;
    }
    Some(
        rules
            .regex_error_text
            .clone()
            .unwrap_or_else(|| REGEX_MISMATCH_TEXT.to_string()),
    )
}

fn join(values: &[Scalar]) -> String {
    values
        .iter()
        .map(Scalar::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `[" ", "@"]` → `" ", "@"`, so whitespace entries stay visible.
fn quote_all(items: &[&str]) -> String {
    items
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `FieldEvaluator` backed by each field's own `RuleSet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleSetEvaluator;

impl FieldEvaluator for RuleSetEvaluator {
    fn evaluate(&self, field: &FieldSpec, value: Option<&FieldPrimitive>) -> FieldVerdict {
        let verdict = evaluate(
            field.conditions.as_ref(),
            field.required,
            field.required_error_text.as_deref(),
            value,
        );
        debug!(
            field = %field.name,
            required = field.required,
            valid = verdict.is_valid(),
            "evaluated field rules"
        );
        verdict
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
