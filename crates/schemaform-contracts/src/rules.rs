//! Declarative validation constraints (`validationConditions` in the schema
//! document).
//!
//! A `RuleSet` is pure data. The evaluator in `schemaform-rules` walks its
//! constraints in a fixed order; the dependency translator builds small
//! `RuleSet`s of its own to reuse the same evaluation kernel.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::value::Scalar;

/// Validation constraints attached to a field.
///
/// `min_value` / `max_value` bound the numeric value of number fields and the
/// length of text and list values. Every constraint carries an optional
/// message override; when absent the evaluator uses a standard template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// Inverts the required check: a required field must stay empty.
    pub reverse: bool,

    pub min_value: Option<f64>,
    pub min_value_error_text: Option<String>,
    pub min_length_error_text: Option<String>,

    pub max_value: Option<f64>,
    pub max_value_error_text: Option<String>,
    pub max_length_error_text: Option<String>,

    /// Exact-match denylist for text and number values.
    pub forbidden_values: Vec<Scalar>,
    pub forbidden_values_error_text: Option<String>,

    /// Text and number values must equal one of these; a list value must
    /// contain every one of them.
    pub mandatory_values: Vec<Scalar>,
    pub mandatory_values_error_text: Option<String>,

    /// Substrings a text value may not contain.
    pub forbidden_characters: Vec<String>,
    /// Used as the message prefix; matched characters are appended.
    pub forbidden_characters_error_text: Option<String>,

    /// Substrings a text value must contain.
    pub mandatory_characters: Vec<String>,
    pub mandatory_characters_error_text: Option<String>,

    pub regex: Option<Pattern>,
    pub regex_error_text: Option<String>,
}

impl RuleSet {
    /// Every document key a rule set accepts.
    pub const KEYS: &'static [&'static str] = &[
        "reverse",
        "minValue",
        "minValueErrorText",
        "minLengthErrorText",
        "maxValue",
        "maxValueErrorText",
        "maxLengthErrorText",
        "forbiddenValues",
        "forbiddenValuesErrorText",
        "mandatoryValues",
        "mandatoryValuesErrorText",
        "forbiddenCharacters",
        "forbiddenCharactersErrorText",
        "mandatoryCharacters",
        "mandatoryCharactersErrorText",
        "regex",
        "regexErrorText",
    ];

    /// True when the set carries no constraint beyond `reverse`.
    pub fn is_unconstrained(&self) -> bool {
        self.min_value.is_none()
            && self.max_value.is_none()
            && self.forbidden_values.is_empty()
            && self.mandatory_values.is_empty()
            && self.forbidden_characters.is_empty()
            && self.mandatory_characters.is_empty()
            && self.regex.is_none()
    }
}

/// A regular expression compiled once when the schema is loaded.
///
/// The schema document may write the pattern bare (`^\d+$`) or in
/// `/pattern/flags` form (`/^abc$/i`). Supported flags are `i`
/// (case-insensitive), `m` (multi-line), and `s` (dot matches newline);
/// `g`, `y` and `u` are accepted and have no effect on a single match test.
///
/// A pattern that does not compile is kept with `compiled = None`. The
/// evaluator reports that as a field error instead of failing the load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: Option<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = match compile(&source) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = %source, error = %e, "regex pattern failed to compile");
                None
            }
        };
        Self { source, compiled }
    }

    /// The pattern exactly as written in the schema.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn compiled(&self) -> Option<&Regex> {
        self.compiled.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::new(source)
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::new(source)
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        p.source
    }
}

/// Split `/body/flags` into its parts. Anything else is a bare pattern.
fn split_delimited(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if body.is_empty() || !flags.chars().all(|c| "gimsuy".contains(c)) {
        return None;
    }
    Some((body, flags))
}

fn compile(source: &str) -> Result<Regex, regex::Error> {
    let Some((body, flags)) = split_delimited(source) else {
        return Regex::new(source);
    };
    RegexBuilder::new(body)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
}
