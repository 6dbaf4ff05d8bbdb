use crate::core::pipeline;
use crate::directives::parse_instructions;
use crate::error::PivotResult;
use crate::external::{load_table, RawTable};
use crate::types::Instructions;
use clap::ValueEnum;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rendering of the processed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Html,
}

/// Where instructions come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionSource {
    /// Directive text, or a JSON/YAML instruction document (chosen by extension)
    File(PathBuf),
    /// Directive lines given on the command line
    Directives(Vec<String>),
}

/// Read instructions from a file or from inline directive lines
pub fn load_instructions(source: &InstructionSource) -> PivotResult<Instructions> {
    match source {
        InstructionSource::File(path) => {
            let content = fs::read_to_string(path)?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => Ok(serde_json::from_str(&content)?),
                Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
                _ => parse_instructions(&content),
            }
        }
        InstructionSource::Directives(lines) => parse_instructions(&lines.join("\n")),
    }
}

pub fn render(table: &RawTable, format: OutputFormat) -> PivotResult<String> {
    match format {
        OutputFormat::Json => table.to_json(),
        OutputFormat::Yaml => table.to_yaml(),
        OutputFormat::Html => Ok(table.to_html()),
    }
}

fn describe(source: &InstructionSource) -> String {
    match source {
        InstructionSource::File(path) => path.display().to_string(),
        InstructionSource::Directives(lines) => format!("{} inline directive(s)", lines.len()),
    }
}

/// Execute the process command
///
/// Status lines go to stderr so the rendered table can be piped from stdout.
pub fn process(
    table: PathBuf,
    source: InstructionSource,
    format: OutputFormat,
    output: Option<PathBuf>,
    verbose: bool,
) -> PivotResult<()> {
    eprintln!("{}", "📊 Pivotify - Processing table".bold().green());
    eprintln!("   Table: {}", table.display());
    eprintln!("   Instructions: {}", describe(&source));
    eprintln!();

    let raw = load_table(&table)?;
    let instructions = load_instructions(&source)?;

    if verbose {
        eprintln!(
            "   Found {} columns, {} rows",
            raw.headers.len(),
            raw.rows.len()
        );
        eprintln!(
            "   Groups: {}  Compute: {}  Aggregate: {}  Summary: {}  Style: {}",
            instructions.groups.len(),
            instructions.compute.len(),
            instructions.aggregate.len(),
            instructions.summarize.len(),
            instructions.style.len()
        );
        eprintln!();
    }

    let result = match pipeline::process(&raw, &instructions)? {
        Some(result) => {
            eprintln!(
                "{}",
                format!(
                    "✅ Processed: {} columns, {} rows",
                    result.headers.len(),
                    result.rows.len()
                )
                .bold()
                .green()
            );
            result
        }
        None => {
            eprintln!(
                "{}",
                "⚠️  No instructions found; table left unchanged".yellow()
            );
            raw
        }
    };

    let rendered = render(&result, format)?;
    write_output(output.as_deref(), &rendered)
}

fn write_output(output: Option<&Path>, rendered: &str) -> PivotResult<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            debug!(path = %path.display(), bytes = rendered.len(), "wrote output");
            eprintln!("   Written to {}", path.display().to_string().bright_blue());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Execute the inspect command - print parsed instructions as JSON
pub fn inspect(source: InstructionSource) -> PivotResult<()> {
    eprintln!("{}", "🔍 Pivotify - Parsed instructions".bold().green());
    eprintln!("   Instructions: {}", describe(&source));
    eprintln!();

    let instructions = load_instructions(&source)?;
    if instructions.is_empty() {
        eprintln!("{}", "⚠️  No applicable instructions".yellow());
    }
    println!("{}", serde_json::to_string_pretty(&instructions)?);
    Ok(())
}
