//! schemaform: command-line front end for the form validation core.
//!
//! Loads a JSON or TOML schema document and a value snapshot, then prints
//! page layout, field verdicts, or load-time diagnostics.
//!
//! Usage:
//!   cargo run -p demo -- sample
//!   cargo run -p demo -- validate --schema form.json --values answers.json
//!   cargo run -p demo -- validate --schema form.toml --json
//!   cargo run -p demo -- layout --schema form.json
//!   cargo run -p demo -- diagnose --schema form.json

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use schemaform_contracts::{
    error::{FormError, FormResult},
    report::FormReport,
    schema::{FieldSpec, Schema, SelectOption},
    value::FieldValueMap,
};
use schemaform_layout::{page_layout, resolve_options, Block, OptionSource};
use schemaform_rules::{diagnostics, loader, standard_validator};

const SAMPLE_SCHEMA: &str = include_str!("../schemas/signup.json");
const SAMPLE_VALUES: &str = include_str!("../schemas/signup-values.json");

// ── CLI definition ────────────────────────────────────────────────────────────

/// schemaform: schema-driven form validation.
#[derive(Parser)]
#[command(
    name = "schemaform",
    about = "Validate and lay out schema-driven multi-page forms",
    long_about = "Loads a form schema (JSON or TOML) and a snapshot of field values,\n\
                  then reports page layout, per-field verdicts, and schema diagnostics."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a value snapshot against every page of a schema.
    Validate {
        /// Schema document (.json or .toml).
        #[arg(long)]
        schema: PathBuf,
        /// Value snapshot (.json or .toml). Defaults to the schema's initial values.
        #[arg(long)]
        values: Option<PathBuf>,
        /// Print the submission payload as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Print each page's blocks and the resolved option lists.
    Layout {
        #[arg(long)]
        schema: PathBuf,
    },
    /// List load-time findings for a schema.
    Diagnose {
        #[arg(long)]
        schema: PathBuf,
    },
    /// Run layout and validation over the bundled signup form.
    Sample {
        #[arg(long)]
        json: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to trace every evaluation step.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate {
            schema,
            values,
            json,
        } => run_validate(&schema, values.as_deref(), json),
        Command::Layout { schema } => loader::from_file(&schema).map(|s| print_layout(&s)),
        Command::Diagnose { schema } => run_diagnose(&schema),
        Command::Sample { json } => run_sample(json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("schemaform error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// Returns the form verdict.
fn run_validate(schema_path: &Path, values_path: Option<&Path>, json: bool) -> FormResult<bool> {
    let schema = loader::from_file(schema_path)?;
    let values = match values_path {
        Some(path) => loader::values_from_file(path)?,
        None => schema.initial_values(),
    };
    validate(&schema, &values, json)
}

fn run_diagnose(schema_path: &Path) -> FormResult<bool> {
    let schema = loader::from_file(schema_path)?;
    let findings = diagnostics::inspect(&schema);
    if findings.is_empty() {
        println!("No findings.");
        return Ok(true);
    }
    for finding in &findings {
        println!("[{:?}] {}", finding.severity(), finding);
    }
    Ok(true)
}

fn run_sample(json: bool) -> FormResult<bool> {
    let schema = loader::from_json_str(SAMPLE_SCHEMA)?;
    let mut values = schema.initial_values();
    values.merge(loader::values_from_str(
        SAMPLE_VALUES,
        loader::DocumentFormat::Json,
    )?);
    info!(field_count = values.len(), "sample values loaded");

    if !json {
        print_layout(&schema);
    }
    validate(&schema, &values, json)
}

fn validate(schema: &Schema, values: &FieldValueMap, json: bool) -> FormResult<bool> {
    let report = standard_validator().report(&schema.pages, values);
    if json {
        let payload = serde_json::to_string_pretty(&report).map_err(|e| FormError::ReportEncode {
            reason: e.to_string(),
        })?;
        println!("{}", payload);
    } else {
        print_report(&report);
    }
    Ok(report.valid)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_layout(schema: &Schema) -> bool {
    if let Some(title) = schema.title.as_ref().and_then(|t| t.as_plain()) {
        println!("{}", title);
        println!("{}", "=".repeat(title.chars().count()));
    }
    for page in &schema.pages {
        println!();
        println!("Page: {}", page.name);
        for block in page_layout(page) {
            match &block {
                Block::Standalone(field) => print_field(field, "  "),
                Block::Grouped { group, members } => {
                    let marker = if group.collapsible { " [collapsible]" } else { "" };
                    println!("  Group: {}{}", group.heading(), marker);
                    for field in members {
                        print_field(field, "    ");
                    }
                }
            }
        }
    }
    println!();
    true
}

fn print_field(field: &FieldSpec, indent: &str) {
    let input = field.kind.describe_input();
    let required = if field.required { " *" } else { "" };
    println!(
        "{}- {}{} ({}, {:?})",
        indent,
        field.display_label(),
        required,
        field.kind.tag(),
        input.control
    );

    if input.needs_options {
        // No network access here; remote lists always fall back.
        let fetched: Option<Result<Vec<SelectOption>, String>> = field
            .options_url
            .as_ref()
            .map(|url| Err(format!("remote options not fetched: {}", url)));
        let resolved = resolve_options(field, fetched);
        let labels: Vec<&str> = resolved.options.iter().map(|o| o.display_label()).collect();
        let source = match resolved.source {
            OptionSource::Remote => "remote",
            OptionSource::Static => "static",
            OptionSource::Placeholder => "disabled",
        };
        println!("{}    options ({}): {}", indent, source, labels.join(" | "));
        if let Some(default) = resolved.default_value {
            println!("{}    default: {}", indent, default);
        }
    }
}

fn print_report(report: &FormReport) {
    for page in &report.pages {
        let verdict = if page.is_valid() { "VALID" } else { "INVALID" };
        println!("Page '{}': {}", page.page_name, verdict);
        for field in &page.fields {
            let state = match (field.active, &field.error_text) {
                (Some(false), _) => "inactive".to_string(),
                (_, Some(error)) => format!("error: {}", error),
                _ => "ok".to_string(),
            };
            println!("  {:<16} {:<24} {}", field.field_name, field.value, state);
        }
    }
    println!();
    println!(
        "Form: {}",
        if report.valid { "VALID" } else { "INVALID" }
    );
}
