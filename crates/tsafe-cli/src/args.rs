use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tsafe binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsafe",
    version,
    about = "Type-directed soundness checks for TypeScript"
)]
pub struct CliArgs {
    /// Disable colored output even when stdout is a terminal.
    #[arg(long = "no-color", alias = "noColor", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the enabled rules over every site of a request file.
    Check(CheckArgs),
    /// List the available rules and their default levels.
    Rules,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON request describing types, functions and sites.
    pub request: PathBuf,

    /// Lint options (JSON). Defaults apply when omitted.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// How diagnostics are printed.
    #[arg(short = 'f', long, value_enum, ignore_case = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `file:line:col - error rule: message` with a source snippet.
    Text,
    /// A single JSON document.
    Json,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
