//! Live field values.
//!
//! The validation core never holds per-field UI state of its own. Whatever
//! the user has typed, checked, or selected is collected by the caller into a
//! `FieldValueMap` and passed in on every validation pass. The map is a
//! snapshot: nothing in the core mutates it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A primitive value held by a single field.
///
/// Checkboxes hold `Bool`, number inputs hold `Number`, text and
/// single-select inputs hold `Text`, and multi-checkbox inputs hold `List`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldPrimitive {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldPrimitive {
    /// True for the values the form treats as "nothing entered": an empty
    /// string or `false`.
    ///
    /// `false` counts as empty so that a required checkbox must be checked.
    /// An empty list is *not* empty here; list length is governed by
    /// `min_value` instead.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldPrimitive::Text(s) => s.is_empty(),
            FieldPrimitive::Bool(b) => !b,
            FieldPrimitive::Number(_) | FieldPrimitive::List(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldPrimitive::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldPrimitive::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`, writing integral numbers without a
    /// fractional part (`18`, not `18.0`).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldPrimitive::Bool(b) => serde_json::Value::Bool(*b),
            FieldPrimitive::Number(n) => number_to_json(*n),
            FieldPrimitive::Text(s) => serde_json::Value::String(s.clone()),
            FieldPrimitive::List(items) => serde_json::Value::Array(
                items.iter().cloned().map(serde_json::Value::String).collect(),
            ),
        }
    }
}

impl From<&str> for FieldPrimitive {
    fn from(s: &str) -> Self {
        FieldPrimitive::Text(s.to_string())
    }
}

impl From<String> for FieldPrimitive {
    fn from(s: String) -> Self {
        FieldPrimitive::Text(s)
    }
}

impl From<f64> for FieldPrimitive {
    fn from(n: f64) -> Self {
        FieldPrimitive::Number(n)
    }
}

impl From<bool> for FieldPrimitive {
    fn from(b: bool) -> Self {
        FieldPrimitive::Bool(b)
    }
}

impl From<Vec<String>> for FieldPrimitive {
    fn from(items: Vec<String>) -> Self {
        FieldPrimitive::List(items)
    }
}

/// Serialize an optional value the way it is handed to the submission
/// consumer: a JSON document, `null` when the field holds nothing.
pub fn serialize_value(value: Option<&FieldPrimitive>) -> String {
    value
        .map(FieldPrimitive::to_json)
        .unwrap_or(serde_json::Value::Null)
        .to_string()
}

fn number_to_json(n: f64) -> serde_json::Value {
    if is_integral(n) {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

/// Render a number for messages: `120`, `-1`, `2.5`.
pub fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// A single comparable value used by denylists, allowlists, and equality
/// conditions. Matching is exact and never crosses variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Strict equality against a field value: a text scalar never equals a
    /// number value and vice versa.
    pub fn matches(&self, value: &FieldPrimitive) -> bool {
        match (self, value) {
            (Scalar::Bool(a), FieldPrimitive::Bool(b)) => a == b,
            (Scalar::Number(a), FieldPrimitive::Number(b)) => a == b,
            (Scalar::Text(a), FieldPrimitive::Text(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Number(_) | Scalar::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Field name → current value, owned by the caller.
///
/// A field that has never been touched is simply absent; lookups return
/// `None` and the evaluator treats that as empty. A `null` entry in a value
/// document is read the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldValueMap {
    inner: HashMap<String, FieldPrimitive>,
}

impl FieldValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldPrimitive> {
        self.inner.get(name)
    }

    /// Set `name` to `value`, returning the previous value if any.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldPrimitive>,
    ) -> Option<FieldPrimitive> {
        self.inner.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldPrimitive> {
        self.inner.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldPrimitive)> {
        self.inner.iter()
    }

    /// Overlay every entry of `other` onto this map.
    pub fn merge(&mut self, other: FieldValueMap) {
        self.inner.extend(other.inner);
    }
}

impl<'de> Deserialize<'de> for FieldValueMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, Option<FieldPrimitive>>::deserialize(deserializer)?;
        Ok(Self {
            inner: raw
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v)))
                .collect(),
        })
    }
}

impl<K: Into<String>, V: Into<FieldPrimitive>> FromIterator<(K, V)> for FieldValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
