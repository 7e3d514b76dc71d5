//! physnet lowers placed logical netlists to physical netlists.
//!
//! Provides `physnet lower` for a single graph file, `physnet run` for every
//! design listed in `physnet.toml`, and `physnet inspect` for summarising a
//! graph file.

#![warn(missing_docs)]

mod inspect;
mod lower;
mod pipeline;
mod run;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// physnet: logical-to-physical netlist lowering.
#[derive(Parser, Debug)]
#[command(name = "physnet", version, about = "Logical-to-physical netlist lowering")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show a note for every rewrite the pass performs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `physnet.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lower one graph file and export the result.
    Lower(LowerArgs),
    /// Lower every design configured in `physnet.toml`.
    Run(RunArgs),
    /// Print a summary of a graph file.
    Inspect(InspectArgs),
}

/// Arguments for the `physnet lower` subcommand.
#[derive(Parser, Debug)]
pub struct LowerArgs {
    /// Input graph (`.pnc` checkpoint or `.json`).
    pub input: PathBuf,

    /// Where to write the lowered netlist.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output encoding; inferred from the output extension when omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputKind>,

    /// Output format for diagnostics and the lowering report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

/// Arguments for the `physnet run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Lower only this design.
    #[arg(short, long)]
    pub design: Option<String>,

    /// Output format for diagnostics and lowering reports.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

/// Arguments for the `physnet inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Graph file to summarise.
    pub input: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Encoding of an exported netlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Pretty-printed JSON.
    Json,
    /// Header-validated binary checkpoint.
    Checkpoint,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON lines.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to show notes.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Lower(ref args) => lower::run(args, &global),
        Command::Run(ref args) => run::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection: checks the TERM env var.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}
