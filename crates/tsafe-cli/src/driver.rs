use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info_span};

use tsafe_common::Diagnostic;
use tsafe_lint::{CompiledOptions, LintOptions, Linter, rules};
use tsafe_solver::TypeInterner;

use crate::args::{CheckArgs, CliArgs, Command, OutputFormat};
use crate::reporter::{Reporter, render_json, summary};
use crate::request::Request;

/// Nothing to report.
pub const EXIT_SUCCESS: u8 = 0;
/// At least one diagnostic was produced.
pub const EXIT_DIAGNOSTICS: u8 = 1;
/// The request or the options could not be used.
pub const EXIT_FAILURE: u8 = 2;

#[derive(Debug)]
pub struct CheckResult {
    /// Name diagnostics are reported against.
    pub file: String,
    pub source: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the parsed command, writing its output to `out`, and return the exit
/// status.
pub fn run(args: &CliArgs, color: bool, out: &mut dyn Write) -> Result<u8> {
    match &args.command {
        Command::Check(check_args) => {
            let result = check(check_args)?;
            match check_args.format {
                OutputFormat::Text => {
                    if !result.diagnostics.is_empty() {
                        let reporter = Reporter::new(color, result.file.as_str(), result.source);
                        writeln!(out, "{}", reporter.render(&result.diagnostics))?;
                        writeln!(out)?;
                    }
                    if let Some(summary) = summary(&result.diagnostics, color) {
                        writeln!(out, "{summary}")?;
                    }
                }
                OutputFormat::Json => {
                    let json = render_json(&result.file, &result.diagnostics)
                        .context("failed to serialize diagnostics")?;
                    writeln!(out, "{json}")?;
                }
            }
            Ok(if result.diagnostics.is_empty() {
                EXIT_SUCCESS
            } else {
                EXIT_DIAGNOSTICS
            })
        }
        Command::Rules => {
            for rule in rules::ALL {
                writeln!(
                    out,
                    "{:<26} {:<6} {}",
                    rule.meta.name,
                    rule.meta.default_level.as_str(),
                    rule.meta.description
                )?;
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

pub fn check(args: &CheckArgs) -> Result<CheckResult> {
    let _span = info_span!("check", request = %args.request.display()).entered();
    let options = load_options(args.config.as_deref())?;

    let text = std::fs::read_to_string(&args.request)
        .with_context(|| format!("failed to read {}", args.request.display()))?;
    let request = Request::from_json(&text)
        .with_context(|| format!("failed to parse {}", args.request.display()))?;

    let db = TypeInterner::new();
    let resolved = request
        .resolve(&db)
        .with_context(|| format!("failed to resolve {}", args.request.display()))?;

    let linter = Linter::new(&db, options).with_functions(resolved.functions);
    let diagnostics = linter.check_all(&resolved.sites);
    debug!(
        sites = resolved.sites.len(),
        diagnostics = diagnostics.len(),
        "check finished"
    );

    let source = request.source.clone().or_else(|| {
        let file = request.file.as_deref()?;
        let base = args.request.parent().unwrap_or_else(|| Path::new(""));
        std::fs::read_to_string(base.join(file)).ok()
    });
    let file = request
        .file
        .clone()
        .unwrap_or_else(|| args.request.display().to_string());
    Ok(CheckResult {
        file,
        source,
        diagnostics,
    })
}

/// Defaults when no path is given.
pub fn load_options(path: Option<&Path>) -> Result<CompiledOptions> {
    let Some(path) = path else {
        return Ok(CompiledOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let options = LintOptions::from_json(&text)
        .with_context(|| format!("invalid options in {}", path.display()))?;
    options
        .compile()
        .with_context(|| format!("invalid options in {}", path.display()))
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
