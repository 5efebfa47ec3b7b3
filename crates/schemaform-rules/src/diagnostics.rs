//! Load-time schema diagnostics.
//!
//! Schemas are never rejected for being malformed. `inspect` reports what a
//! careful author would want to know about, and the loader logs each entry;
//! evaluation still falls back to its defaults (disabled field, synthesized
//! group, fail-closed dependency).

use std::collections::{HashMap, HashSet};
use std::fmt;

use schemaform_contracts::{dependency::DependencyCondition, schema::Schema};

/// One finding about a loaded schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDiagnostic {
    /// The field's type tag is not one the form knows; it will be disabled.
    UnsupportedKind { field: String, kind: String },
    /// A select-family field with neither static options nor an options URL.
    MissingOptions { field: String },
    /// `dependsOn` names a field that does not exist anywhere in the schema.
    UnknownDependency { field: String, depends_on: String },
    /// Two fields share a name; value lookups cannot tell them apart.
    DuplicateField { field: String },
    /// `groupName` has no descriptor on the page; a name-only one is used.
    UndeclaredGroup { page: String, field: String, group: String },
    /// A `regex` that failed to compile, in the field's own rules (the field
    /// will always fail) or in one of its dependency conditions (the
    /// dependency never holds).
    InvalidPattern { field: String, pattern: String },
    /// Fields whose dependencies form a loop. The first name is repeated at
    /// the end: `a → b → a`.
    DependencyCycle { path: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl SchemaDiagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            SchemaDiagnostic::UndeclaredGroup { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for SchemaDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDiagnostic::UnsupportedKind { field, kind } => {
                write!(f, "field '{field}' has unsupported type '{kind}'")
            }
            SchemaDiagnostic::MissingOptions { field } => {
                write!(f, "field '{field}' has no options and no options URL")
            }
            SchemaDiagnostic::UnknownDependency { field, depends_on } => {
                write!(f, "field '{field}' depends on unknown field '{depends_on}'")
            }
            SchemaDiagnostic::DuplicateField { field } => {
                write!(f, "field name '{field}' is declared more than once")
            }
            SchemaDiagnostic::UndeclaredGroup { page, field, group } => write!(
                f,
                "field '{field}' on page '{page}' references undeclared group '{group}'"
            ),
            SchemaDiagnostic::InvalidPattern { field, pattern } => {
                write!(f, "field '{field}' has an invalid regex '{pattern}'")
            }
            SchemaDiagnostic::DependencyCycle { path } => {
                write!(f, "dependency cycle: {}", path.join(" → "))
            }
        }
    }
}

/// Inspect `schema` and return every finding, in schema order.
pub fn inspect(schema: &Schema) -> Vec<SchemaDiagnostic> {
    let mut out = Vec::new();
    let known: HashSet<&str> = schema.fields().map(|f| f.name.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    for page in &schema.pages {
        for field in &page.fields {
            if !seen.insert(field.name.as_str()) {
                out.push(SchemaDiagnostic::DuplicateField {
                    field: field.name.clone(),
                });
            }

            if !field.kind.is_supported() {
                out.push(SchemaDiagnostic::UnsupportedKind {
                    field: field.name.clone(),
                    kind: field.kind.tag().to_string(),
                });
            }

            if field.kind.uses_options() && field.options.is_empty() && field.options_url.is_none() {
                out.push(SchemaDiagnostic::MissingOptions {
                    field: field.name.clone(),
                });
            }

            for dep in &field.dependencies {
                if !known.contains(dep.depends_on.as_str()) {
                    out.push(SchemaDiagnostic::UnknownDependency {
                        field: field.name.clone(),
                        depends_on: dep.depends_on.clone(),
                    });
                }
            }

            if let Some(group) = &field.group_name {
                if !page.field_groups.iter().any(|g| &g.name == group) {
                    out.push(SchemaDiagnostic::UndeclaredGroup {
                        page: page.name.clone(),
                        field: field.name.clone(),
                        group: group.clone(),
                    });
                }
            }

            let dependency_rules = field.dependencies.iter().filter_map(|d| match &d.condition {
                Some(DependencyCondition::Rules(rules)) => Some(rules),
                _ => None,
            });
            for rules in field.conditions.iter().chain(dependency_rules) {
                if let Some(pattern) = rules.regex.as_ref().filter(|p| !p.is_valid()) {
                    out.push(SchemaDiagnostic::InvalidPattern {
                        field: field.name.clone(),
                        pattern: pattern.source().to_string(),
                    });
                }
            }
        }
    }

    out.extend(
        find_cycles(schema)
            .into_iter()
            .map(|path| SchemaDiagnostic::DependencyCycle { path }),
    );
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search over `field → depends_on` edges, with an explicit
/// stack so chain length is bounded by memory rather than thread stack.
fn find_cycles(schema: &Schema) -> Vec<Vec<String>> {
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for field in schema.fields() {
        let targets = edges.entry(field.name.as_str()).or_insert_with(|| {
            order.push(field.name.as_str());
            Vec::new()
        });
        targets.extend(field.dependencies.iter().map(|d| d.depends_on.as_str()));
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut cycles = Vec::new();
    for root in order {
        if marks.contains_key(root) {
            continue;
        }
        marks.insert(root, Mark::Visiting);
        // (node, index of the next outgoing edge to follow)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let (node, cursor) = *top;
            let targets = edges.get(node).map(Vec::as_slice).unwrap_or_default();
            let Some(&next) = targets.get(cursor) else {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            };
            top.1 += 1;

            // Unknown targets are reported separately and have no outgoing edges.
            if !edges.contains_key(next) {
                continue;
            }
            match marks.get(next) {
                None => {
                    marks.insert(next, Mark::Visiting);
                    stack.push((next, 0));
                }
                Some(Mark::Visiting) => {
                    if let Some(start) = stack.iter().position(|(n, _)| *n == next) {
                        let mut path: Vec<String> =
                            stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                        path.push(next.to_string());
                        cycles.push(path);
                    }
                }
                Some(Mark::Done) => {}
            }
        }
    }
    cycles
}
