//! qualdoc CLI - template checking and calculated-field resolution

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use qualdoc::prelude::*;
use qualdoc::{extract_field_dependencies, DEFAULT_ROW_PASSES};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qualdoc")]
#[command(
    author,
    version,
    about = "Quality document template checking and formula resolution"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a template file (JSON)
    Check {
        /// Template file
        template: PathBuf,
    },

    /// Evaluate a single formula
    Eval {
        /// Formula text, e.g. "{gross}-{header.tare}"
        formula: String,

        /// Row value, repeatable
        #[arg(short, long = "row", value_name = "ID=VALUE", value_parser = parse_assignment)]
        row: Vec<(String, f64)>,

        /// Header value, repeatable
        #[arg(short = 'H', long = "header", value_name = "ID=VALUE", value_parser = parse_assignment)]
        header: Vec<(String, f64)>,
    },

    /// Resolve every calculated field of a document and print it as JSON
    Resolve {
        /// Template file
        template: PathBuf,

        /// Document instance file
        document: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Passes over each row's calculated fields
        #[arg(short, long, default_value_t = DEFAULT_ROW_PASSES)]
        passes: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Check { template } => check(&template),
        Commands::Eval {
            formula,
            row,
            header,
        } => eval(&formula, row, header),
        Commands::Resolve {
            template,
            document,
            output,
            passes,
        } => resolve(&template, &document, output.as_deref(), passes),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("qualdoc={}", level).parse()?),
        )
        .init();

    Ok(())
}

/// Parse an `id=value` pair
fn parse_assignment(s: &str) -> std::result::Result<(String, f64), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{}'", s))?;
    let id = id.trim();
    if !qualdoc::is_valid_field_id(id) {
        return Err(format!("invalid field id '{}'", id));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", id, e))?;
    Ok((id.to_string(), value))
}

fn load_template(path: &Path) -> Result<Template> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse template '{}'", path.display()))
}

fn load_document(path: &Path) -> Result<DocumentInstance> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse document '{}'", path.display()))
}

fn check(path: &Path) -> Result<()> {
    let template = load_template(path)?;
    validate_template(&template)
        .with_context(|| format!("Template '{}' is invalid", template.name))?;

    println!("Template: {}", template.name);
    println!(
        "Fields: {} header, {} row",
        template.header_fields().count(),
        template.row_fields().count()
    );

    for field in template.fields.iter().filter(|f| f.is_calculated()) {
        let formula = field.formula.as_deref().unwrap_or_default();
        let deps = extract_field_dependencies(formula);
        let scope = if field.is_header() { "header" } else { "row" };

        println!();
        println!("  {} ({}): {}", field.id, scope, formula);
        if !deps.row.is_empty() {
            println!("    row inputs: {}", deps.row.join(", "));
        }
        if !deps.header.is_empty() {
            println!("    header inputs: {}", deps.header.join(", "));
        }
    }

    Ok(())
}

fn eval(formula: &str, row: Vec<(String, f64)>, header: Vec<(String, f64)>) -> Result<()> {
    let scope = FormulaScope {
        header_values: header.into_iter().collect(),
        row_values: row.into_iter().collect(),
    };

    match evaluate_formula(formula, &scope) {
        Some(value) => println!("{}", value),
        None => println!("unresolved"),
    }

    Ok(())
}

fn resolve(
    template_path: &Path,
    document_path: &Path,
    output: Option<&Path>,
    passes: usize,
) -> Result<()> {
    if passes == 0 {
        bail!("--passes must be at least 1");
    }

    let template = load_template(template_path)?;
    validate_template(&template)
        .with_context(|| format!("Template '{}' is invalid", template.name))?;

    let mut document = load_document(document_path)?;
    if document.template != template.name {
        tracing::warn!(
            document = %document.template,
            template = %template.name,
            "document was created from a different template"
        );
    }

    let stats = document.resolve_with_options(&template, &ResolutionOptions { row_passes: passes });

    eprintln!(
        "Resolved {} header and {} row fields ({} unresolved)",
        stats.header_resolved,
        stats.row_resolved,
        stats.header_unresolved + stats.row_unresolved
    );

    let json = serde_json::to_string_pretty(&document).context("Failed to serialize document")?;

    if let Some(output_path) = output {
        std::fs::write(output_path, &json)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote '{}'", output_path.display());
    } else {
        writeln!(io::stdout(), "{}", json).context("Failed to write to stdout")?;
    }

    Ok(())
}
