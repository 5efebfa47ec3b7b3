//! Validation results.
//!
//! These records are produced fresh on every validation pass and handed to
//! the caller. They reference the schema only by field and page name.

use serde::{Deserialize, Serialize};

/// The outcome of evaluating one field's rules against its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldVerdict {
    /// Every check passed.
    Valid,

    /// The first failing check.
    Invalid {
        /// Human-readable message for the rendering layer.
        reason: String,
    },
}

impl FieldVerdict {
    pub fn invalid(reason: impl Into<String>) -> Self {
        FieldVerdict::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FieldVerdict::Valid)
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            FieldVerdict::Valid => None,
            FieldVerdict::Invalid { reason } => Some(reason),
        }
    }

    pub fn into_error_text(self) -> Option<String> {
        match self {
            FieldVerdict::Valid => None,
            FieldVerdict::Invalid { reason } => Some(reason),
        }
    }
}

/// The validation record for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field_name: String,
    /// The field's current value as a JSON document (`"null"` when unset).
    pub value: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

/// The validation records for one page, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageValues {
    pub page_name: String,
    pub fields: Vec<FieldValue>,
}

impl PageValues {
    /// A page is valid iff every field on it is valid.
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.valid)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.field_name == name)
    }

    /// The fields that carry an error, in page order.
    pub fn errors(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().filter(|f| !f.valid)
    }
}

/// The complete payload for a submission consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    /// True iff every page is valid.
    pub valid: bool,
    pub pages: Vec<PageValues>,
}

impl FormReport {
    pub fn from_pages(pages: Vec<PageValues>) -> Self {
        let valid = pages.iter().all(PageValues::is_valid);
        Self { valid, pages }
    }

    /// All field records across all pages.
    pub fn fields(&self) -> impl Iterator<Item = &FieldValue> {
        self.pages.iter().flat_map(|p| p.fields.iter())
    }
}
