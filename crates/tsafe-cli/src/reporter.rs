use colored::Colorize;
use serde::Serialize;

use tsafe_common::{Diagnostic, DiagnosticCategory, Span, Suggestion};

/// Renders the diagnostics of one file, tsc style.
pub struct Reporter {
    color: bool,
    file: String,
    source: Option<String>,
    line_starts: Vec<u32>,
}

impl Reporter {
    pub fn new(color: bool, file: impl Into<String>, source: Option<String>) -> Self {
        let line_starts = source.as_deref().map(line_starts).unwrap_or_default();
        Reporter {
            color,
            file: file.into(),
            source,
            line_starts,
        }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = self.format_location(diagnostic.span.start);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_rule(diagnostic.rule));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) = self.format_snippet(diagnostic.span) {
            output.push_str(&snippet);
        }

        for suggestion in &diagnostic.suggestions {
            output.push('\n');
            output.push_str(&self.format_suggestion(suggestion));
        }

        output
    }

    /// Source line with the span underlined.
    /// Example:
    ///     1   let a = value as any;
    ///                 ~~~~~~~~~~~~
    fn format_snippet(&self, span: Span) -> Option<String> {
        if span.is_empty() {
            return None;
        }
        let source = self.source.as_deref()?;
        let (line_num, _) = self.position_for(span.start)?;
        let line_idx = (line_num - 1) as usize;
        let line_text = source.lines().nth(line_idx)?;
        let line_start = *self.line_starts.get(line_idx)?;

        let mut underline = String::new();
        for (offset, ch) in line_text.char_indices() {
            let absolute = line_start + offset as u32;
            if absolute >= span.end {
                break;
            }
            let marker = if absolute < span.start { " " } else { "~" };
            // Tabs expand to 4 columns
            let width = if ch == '\t' { 4 } else { 1 };
            underline.push_str(&marker.repeat(width));
        }
        // A span starting at the end of the line still gets a marker.
        if !underline.contains('~') {
            underline.push('~');
        }

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {line_num:>3}   {line_text}\n       {underline}"))
    }

    fn format_suggestion(&self, suggestion: &Suggestion) -> String {
        let prefix = if self.color {
            "  Suggestion".dimmed().to_string()
        } else {
            "  Suggestion".to_string()
        };
        let mut output = format!("{prefix}: {}", suggestion.message);
        for edit in &suggestion.edits {
            let at = match self.position_for(edit.span.start) {
                Some((line, column)) => format!("{line}:{column}"),
                None => edit.span.start.to_string(),
            };
            output.push_str(&format!(" (replace at {at} with `{}`)", edit.new_text));
        }
        output
    }

    fn format_location(&self, offset: u32) -> String {
        let file = if self.file.is_empty() {
            "<unknown>"
        } else {
            self.file.as_str()
        };
        match self.position_for(offset) {
            Some((line, column)) => format!("{file}:{line}:{column}"),
            None => file.to_string(),
        }
    }

    /// 1-based line and column of a byte offset. Columns count characters.
    fn position_for(&self, offset: u32) -> Option<(u32, u32)> {
        let source = self.source.as_deref()?;
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .checked_sub(1)?;
        let line_start = *self.line_starts.get(line)? as usize;
        let prefix = source.get(line_start..offset as usize)?;
        let column = prefix.chars().count() as u32 + 1;
        Some((line as u32 + 1, column))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_rule(&self, rule: &str) -> String {
        if self.color {
            rule.bright_blue().to_string()
        } else {
            rule.to_string()
        }
    }
}

fn line_starts(source: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            source
                .match_indices('\n')
                .map(|(index, _)| index as u32 + 1),
        )
        .collect()
}

/// `Found 2 errors and 1 warning.`, or `None` when there is nothing to report.
pub fn summary(diagnostics: &[Diagnostic], color: bool) -> Option<String> {
    let count = |category: DiagnosticCategory| {
        diagnostics
            .iter()
            .filter(|d| d.category == category)
            .count()
    };
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("1 {word}")
        } else {
            format!("{n} {word}s")
        }
    };

    let errors = count(DiagnosticCategory::Error);
    let warnings = count(DiagnosticCategory::Warning);
    let text = match (errors, warnings) {
        (0, 0) => return None,
        (errors, 0) => format!("Found {}.", plural(errors, "error")),
        (0, warnings) => format!("Found {}.", plural(warnings, "warning")),
        (errors, warnings) => format!(
            "Found {} and {}.",
            plural(errors, "error"),
            plural(warnings, "warning")
        ),
    };
    Some(if color { text.bold().to_string() } else { text })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    file: &'a str,
    diagnostics: &'a [Diagnostic],
}

pub fn render_json(file: &str, diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { file, diagnostics })
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;
