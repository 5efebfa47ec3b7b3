//! The page/form validation orchestrator.
//!
//! For every field on a page the orchestrator runs:
//!
//!   Activity → [FieldEvaluator::evaluate] → FieldValue
//!
//! `evaluate()` is only reached for fields that are active and enabled.
//! Everything else is reported valid with no error, and its raw value is
//! still carried through in the record.
//!
//! A pass is idempotent. Callers re-run it on every page transition attempt
//! and whenever a value changes; a result computed from a stale snapshot is
//! simply discarded.

use tracing::{debug, warn};

use schemaform_contracts::{
    report::{FieldValue, FieldVerdict, FormReport, PageValues},
    schema::{FieldSpec, PageSpec},
    value::{serialize_value, FieldValueMap},
};

use crate::traits::{ActivityResolver, FieldEvaluator};

/// Runs field evaluation and activity resolution over pages and forms.
///
/// The validator holds no per-form state; one instance can serve any number
/// of schemas and value snapshots.
pub struct FormValidator {
    evaluator: Box<dyn FieldEvaluator>,
    resolver: Box<dyn ActivityResolver>,
}

impl FormValidator {
    pub fn new(evaluator: Box<dyn FieldEvaluator>, resolver: Box<dyn ActivityResolver>) -> Self {
        Self {
            evaluator,
            resolver,
        }
    }

    /// Validate a single field against the snapshot.
    pub fn validate_field(&self, field: &FieldSpec, values: &FieldValueMap) -> FieldValue {
        let value = values.get(&field.name);
        let active = self.resolver.is_active(field, values);

        let verdict = if !active {
            debug!(field = %field.name, "field inactive, skipping validation");
            FieldVerdict::Valid
        } else if !field.is_enabled() {
            if !field.kind.is_supported() {
                warn!(
                    field = %field.name,
                    kind = %field.kind.tag(),
                    "unsupported field type, skipping validation"
                );
            }
            FieldVerdict::Valid
        } else {
            self.evaluator.evaluate(field, value)
        };

        if let Some(reason) = verdict.error_text() {
            debug!(field = %field.name, %reason, "field failed validation");
        }

        FieldValue {
            field_name: field.name.clone(),
            value: serialize_value(value),
            valid: verdict.is_valid(),
            active: Some(active),
            error_text: verdict.into_error_text(),
        }
    }

    /// Validate every field on `page`, in declaration order.
    pub fn validate_page(&self, page: &PageSpec, values: &FieldValueMap) -> PageValues {
        let fields: Vec<FieldValue> = page
            .fields
            .iter()
            .map(|field| self.validate_field(field, values))
            .collect();

        let result = PageValues {
            page_name: page.name.clone(),
            fields,
        };

        debug!(
            page = %page.name,
            valid = result.is_valid(),
            error_count = result.errors().count(),
            "page validation complete"
        );
        result
    }

    /// True iff every page is valid.
    pub fn validate_form(&self, pages: &[PageSpec], values: &FieldValueMap) -> bool {
        pages
            .iter()
            .all(|page| self.validate_page(page, values).is_valid())
    }

    /// Validate every page and collect the full submission payload.
    pub fn report(&self, pages: &[PageSpec], values: &FieldValueMap) -> FormReport {
        let report = FormReport::from_pages(
            pages
                .iter()
                .map(|page| self.validate_page(page, values))
                .collect(),
        );
        debug!(
            page_count = report.pages.len(),
            valid = report.valid,
            "form validation complete"
        );
        report
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use schemaform_contracts::{
        report::FieldVerdict,
        schema::{FieldKind, FieldSpec, PageSpec},
        value::{FieldPrimitive, FieldValueMap},
    };

    use crate::traits::{ActivityResolver, FieldEvaluator};

    use super::FormValidator;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// Fails any field whose value is missing, and counts its calls.
    struct MockEvaluator {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockEvaluator {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FieldEvaluator for MockEvaluator {
        fn evaluate(&self, field: &FieldSpec, value: Option<&FieldPrimitive>) -> FieldVerdict {
            self.calls.lock().unwrap().push(field.name.clone());
            match value {
                Some(_) => FieldVerdict::Valid,
                None => FieldVerdict::invalid("This field is required"),
            }
        }
    }

    /// Treats every field whose name starts with "hidden" as inactive.
    struct MockResolver;

    impl ActivityResolver for MockResolver {
        fn is_active(&self, field: &FieldSpec, _values: &FieldValueMap) -> bool {
            !field.name.starts_with("hidden")
        }
    }

    fn page(name: &str, fields: Vec<FieldSpec>) -> PageSpec {
        PageSpec {
            name: name.to_string(),
            fields,
            ..PageSpec::default()
        }
    }

    fn validator() -> (FormValidator, Arc<Mutex<Vec<String>>>) {
        let evaluator = MockEvaluator::new();
        let calls = evaluator.calls.clone();
        (
            FormValidator::new(Box::new(evaluator), Box::new(MockResolver)),
            calls,
        )
    }

    // ── Test cases ───────────────────────────────────────────────────────────

    #[test]
    fn test_active_field_is_evaluated() {
        let (validator, calls) = validator();
        let values = FieldValueMap::new();

        let result = validator.validate_field(&FieldSpec::new("email"), &values);

        assert!(!result.valid);
        assert_eq!(result.active, Some(true));
        assert_eq!(result.error_text.as_deref(), Some("This field is required"));
        assert_eq!(result.value, "null");
        assert_eq!(*calls.lock().unwrap(), vec!["email".to_string()]);
    }

    /// An inactive field must never reach the evaluator and never carry an
    /// error, but its value is still reported.
    #[test]
    fn test_inactive_field_skips_evaluation() {
        let (validator, calls) = validator();
        let values: FieldValueMap = [("hidden_notes", "draft")].into_iter().collect();

        let result = validator.validate_field(&FieldSpec::new("hidden_notes"), &values);

        assert!(result.valid);
        assert_eq!(result.active, Some(false));
        assert!(result.error_text.is_none());
        assert_eq!(result.value, "\"draft\"");
        assert!(calls.lock().unwrap().is_empty(), "evaluate() must not run for inactive fields");
    }

    #[test]
    fn test_disabled_and_unsupported_fields_skip_evaluation() {
        let (validator, calls) = validator();
        let values = FieldValueMap::new();

        let mut disabled = FieldSpec::new("locked");
        disabled.disabled = true;
        let unsupported = FieldSpec::of_kind("when", FieldKind::Unsupported("datetime".into()));

        let p = page("p1", vec![disabled, unsupported]);
        let result = validator.validate_page(&p, &values);

        assert!(result.is_valid());
        assert!(result.fields.iter().all(|f| f.active == Some(true)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_page_keeps_declaration_order_and_aggregates() {
        let (validator, _) = validator();
        let values: FieldValueMap = [("b", "filled")].into_iter().collect();

        let p = page(
            "details",
            vec![FieldSpec::new("c"), FieldSpec::new("b"), FieldSpec::new("hidden_a")],
        );
        let result = validator.validate_page(&p, &values);

        assert_eq!(result.page_name, "details");
        let names: Vec<&str> = result.fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "hidden_a"]);
        assert!(!result.is_valid(), "missing 'c' must invalidate the page");
        assert_eq!(result.errors().count(), 1);
    }

    #[test]
    fn test_form_valid_only_when_every_page_valid() {
        let (validator, _) = validator();
        let pages = vec![
            page("one", vec![FieldSpec::new("a")]),
            page("two", vec![FieldSpec::new("b")]),
        ];

        let mut values: FieldValueMap = [("a", "x")].into_iter().collect();
        assert!(!validator.validate_form(&pages, &values));

        values.set("b", "y");
        assert!(validator.validate_form(&pages, &values));

        let report = validator.report(&pages, &values);
        assert!(report.valid);
        assert_eq!(report.pages.len(), 2);
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let (validator, _) = validator();
        let p = page("p", vec![FieldSpec::new("a"), FieldSpec::new("hidden_b")]);
        let values: FieldValueMap = [("hidden_b", 3.0)].into_iter().collect();

        let first = validator.validate_page(&p, &values);
        let second = validator.validate_page(&p, &values);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_form_is_valid() {
        let (validator, _) = validator();
        assert!(validator.validate_form(&[], &FieldValueMap::new()));
    }
}
