//! Schema and value-snapshot loading.
//!
//! Schema documents are JSON or TOML with the same camelCase shape. The
//! loader parses, then runs [`inspect`](crate::diagnostics::inspect) and logs
//! every finding; a malformed-but-parseable schema still loads.

use std::path::Path;

use tracing::{debug, info, warn};

use schemaform_contracts::{
    error::{FormError, FormResult},
    schema::Schema,
    value::FieldValueMap,
};

use crate::diagnostics::{inspect, Severity};

/// Document formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> FormResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "toml" => Ok(DocumentFormat::Toml),
            _ => Err(FormError::UnsupportedFormat { extension }),
        }
    }
}

/// Parse `s` as a JSON schema document.
pub fn from_json_str(s: &str) -> FormResult<Schema> {
    let schema: Schema = serde_json::from_str(s).map_err(|e| FormError::SchemaParse {
        reason: format!("invalid JSON schema document: {}", e),
    })?;
    Ok(checked(schema))
}

/// Parse `s` as a TOML schema document.
pub fn from_toml_str(s: &str) -> FormResult<Schema> {
    let schema: Schema = toml::from_str(s).map_err(|e| FormError::SchemaParse {
        reason: format!("invalid TOML schema document: {}", e),
    })?;
    Ok(checked(schema))
}

pub fn from_str(s: &str, format: DocumentFormat) -> FormResult<Schema> {
    match format {
        DocumentFormat::Json => from_json_str(s),
        DocumentFormat::Toml => from_toml_str(s),
    }
}

/// Read the file at `path` and parse it according to its extension.
pub fn from_file(path: &Path) -> FormResult<Schema> {
    let format = DocumentFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(|e| FormError::SchemaRead {
        reason: format!("failed to read schema file '{}': {}", path.display(), e),
    })?;
    info!(path = %path.display(), ?format, "loading schema");
    from_str(&contents, format)
}

/// Parse a value snapshot (field name → value) from `s`.
pub fn values_from_str(s: &str, format: DocumentFormat) -> FormResult<FieldValueMap> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str(s).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str(s).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| FormError::ValuesParse { reason })
}

/// Read a value snapshot from a JSON or TOML file.
pub fn values_from_file(path: &Path) -> FormResult<FieldValueMap> {
    let format = DocumentFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(|e| FormError::ValuesParse {
        reason: format!("failed to read values file '{}': {}", path.display(), e),
    })?;
    values_from_str(&contents, format)
}

fn checked(schema: Schema) -> Schema {
    for diagnostic in inspect(&schema) {
        match diagnostic.severity() {
            Severity::Warning => warn!(%diagnostic, "schema diagnostic"),
            Severity::Info => debug!(%diagnostic, "schema diagnostic"),
        }
    }
    debug!(
        page_count = schema.pages.len(),
        field_count = schema.fields().count(),
        "schema loaded"
    );
    schema
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use schemaform_contracts::{
        error::FormError,
        schema::FieldKind,
        value::FieldPrimitive,
    };

    use super::*;

    #[test]
    fn loads_toml_schema() {
        let toml = r#"
            title = "Signup"

            [[pages]]
            name = "account"

            [[pages.fieldGroups]]
            name = "personal"
            title = "Personal information"
            collapsable = true

            [[pages.fields]]
            name = "username"
            groupName = "personal"
            required = true

            [pages.fields.validationConditions]
            minValue = 3
            forbiddenCharacters = [" ", "@"]

            [[pages.fields]]
            name = "age"
            type = "number"
            defaultValue = 18
        "#;

        let schema = from_toml_str(toml).unwrap();
        let page = &schema.pages[0];
        assert_eq!(page.name, "account");
        assert!(page.field_groups[0].collapsible);

        let username = &page.fields[0];
        assert!(username.required);
        let rules = username.conditions.as_ref().unwrap();
        assert_eq!(rules.min_value, Some(3.0));
        assert_eq!(rules.forbidden_characters.len(), 2);

        assert_eq!(page.fields[1].kind, FieldKind::Number);
        assert_eq!(page.fields[1].default_value, Some(FieldPrimitive::Number(18.0)));
    }

    #[test]
    fn loads_json_schema_with_unknown_kind() {
        let json = r#"{
            "pages": [{ "name": "p", "fields": [{ "name": "when", "type": "datetime" }] }]
        }"#;
        let schema = from_json_str(json).unwrap();
        assert!(!schema.pages[0].fields[0].is_enabled());
    }

    #[test]
    fn parse_error_is_reported() {
        match from_json_str("{ not json") {
            Err(FormError::SchemaParse { reason }) => {
                assert!(reason.contains("invalid JSON schema document"), "got: {reason}");
            }
            other => panic!("expected SchemaParse, got {:?}", other),
        }

        match from_toml_str("this is not valid toml ][[[") {
            Err(FormError::SchemaParse { reason }) => {
                assert!(reason.contains("invalid TOML schema document"), "got: {reason}");
            }
            other => panic!("expected SchemaParse, got {:?}", other),
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("form.JSON")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("form.toml")).unwrap(),
            DocumentFormat::Toml
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("form.yaml")),
            Err(FormError::UnsupportedFormat { extension }) if extension == "yaml"
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, FormError::SchemaRead { .. }));
    }

    #[test]
    fn loads_value_snapshots() {
        let values = values_from_str(
            r#"{ "username": "ada", "age": 36, "subscribe": true }"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert_eq!(values.get("age"), Some(&FieldPrimitive::Number(36.0)));

        let values = values_from_str("tags = [\"a\"]\nshow = false\n", DocumentFormat::Toml).unwrap();
        assert_eq!(values.get("show"), Some(&FieldPrimitive::Bool(false)));
        assert_eq!(values.get("tags"), Some(&FieldPrimitive::List(vec!["a".into()])));

        assert!(matches!(
            values_from_str("[1, 2]", DocumentFormat::Json),
            Err(FormError::ValuesParse { .. })
        ));
    }

    #[test]
    fn null_value_reads_as_unset() {
        let values = values_from_str(r#"{ "a": null, "b": "x" }"#, DocumentFormat::Json).unwrap();
        assert_eq!(values.get("a"), None);
        assert_eq!(values.get("b"), Some(&FieldPrimitive::Text("x".into())));
    }
}
