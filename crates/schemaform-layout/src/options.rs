//! Option-list resolution for select-family fields.
//!
//! Fetching remote options is the caller's business. Once a fetch has
//! finished (or was never attempted) the caller hands the outcome here and
//! gets back the list to render:
//!
//! 1. A successful, non-empty remote list wins.
//! 2. Otherwise the schema's static `options` are used.
//! 3. With no options at all the field is disabled and shows a single
//!    placeholder option.
//!
//! The effective default is the field's `defaultValue` only when it names
//! one of the resolved options.

use std::fmt::Display;

use tracing::warn;

use schemaform_contracts::schema::{FieldSpec, SelectOption};
use schemaform_contracts::value::FieldPrimitive;

/// Label of the placeholder option shown when no options could be loaded.
pub const FAILED_OPTIONS_LABEL: &str = "!! Failed to load options !!";

/// Where the resolved list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    Remote,
    Static,
    Placeholder,
}

/// The options a select-family field should render with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub options: Vec<SelectOption>,
    pub source: OptionSource,
    /// True when no usable options exist.
    pub disabled: bool,
    /// The initial selection, if the field's default names a resolved option.
    pub default_value: Option<String>,
}

/// Settle the option list for `field`.
///
/// `fetched` is `None` when no remote fetch happened, otherwise the outcome
/// of fetching `field.options_url`.
pub fn resolve_options<E: Display>(
    field: &FieldSpec,
    fetched: Option<Result<Vec<SelectOption>, E>>,
) -> ResolvedOptions {
    let remote = match fetched {
        Some(Ok(options)) if !options.is_empty() => Some(options),
        Some(Ok(_)) => {
            warn!(field = %field.name, "remote options list is empty, using static options");
            None
        }
        Some(Err(e)) => {
            warn!(
                field = %field.name,
                url = field.options_url.as_deref().unwrap_or_default(),
                error = %e,
                "failed to load remote options, using static options"
            );
            None
        }
        None => None,
    };

    let (options, source) = match remote {
        Some(options) => (options, OptionSource::Remote),
        None if !field.options.is_empty() => (field.options.clone(), OptionSource::Static),
        None => {
            warn!(field = %field.name, "no options available, disabling field");
            return ResolvedOptions {
                options: vec![SelectOption::labeled("", FAILED_OPTIONS_LABEL)],
                source: OptionSource::Placeholder,
                disabled: true,
                default_value: None,
            };
        }
    };

    let default_value = match &field.default_value {
        Some(FieldPrimitive::Text(v)) if options.iter().any(|o| &o.value == v) => Some(v.clone()),
        _ => None,
    };

    ResolvedOptions {
        options,
        source,
        disabled: false,
        default_value,
    }
}
