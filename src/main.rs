use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pivotify::cli::{self, InstructionSource, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pivotify")]
#[command(about = "Computed columns, pivot grouping, summary rows and gradients for tables")]
#[command(long_about = "Pivotify - table annotation from plain-text directives

COMMANDS:
  process   - Apply directives to a JSON/YAML table
  inspect   - Show the instructions parsed from directive text

DIRECTIVES (one per line, <br> also separates lines):
  PIVOTIFYJS_GROUPS:[\"Category\"]
  PIVOTIFYJS_SUM:[\"Cost\"]              (also AVERAGE, MIN, MAX, MEDIAN, FIRST)
  PIVOTIFYJS_SUMMARY_AVERAGE:[\"Cost\"]  (summary row, no grouping)
  PIVOTIFYJS_COMPUTE:\"Subtotal\"=\"${Unit Cost} * ${Qty:1}\"
  PIVOTIFYJS_STYLE_GRADIENT:\"Cost\"=\"from:green;to:red;target:bg\"

EXAMPLES:
  pivotify process costs.json -i directives.txt
  pivotify process costs.yaml -d 'PIVOTIFYJS_SUMMARY_SUM:[\"Cost\"]' -f html
  pivotify inspect -i directives.txt")]
#[command(version)]
struct Cli {
    /// Show debug logging and extra status output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Directive text file, or a JSON/YAML instruction document
    #[arg(short, long)]
    instructions: Option<PathBuf>,

    /// Directive line (repeatable)
    #[arg(short, long)]
    directive: Vec<String>,
}

impl From<SourceArgs> for InstructionSource {
    fn from(args: SourceArgs) -> Self {
        match args.instructions {
            Some(path) => InstructionSource::File(path),
            None => InstructionSource::Directives(args.directive),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Apply directives to a table and print or write the result
    Process {
        /// Path to a JSON or YAML table
        table: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short, long, value_enum, env = "PIVOTIFY_FORMAT", default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the instructions parsed from directives as JSON
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Process {
            table,
            source,
            format,
            output,
        } => {
            let label = table.display().to_string();
            cli::process(table, source.into(), format, output, cli.verbose)
                .with_context(|| format!("failed to process {}", label))
        }

        Commands::Inspect { source } => {
            cli::inspect(source.into()).context("failed to parse instructions")
        }
    }
}
