use super::*;
use pretty_assertions::assert_eq;
use tsafe_common::TextEdit;

const SOURCE: &str = "let a = value as any;\nconst b = `${obj}`;\n";

fn diagnostic(rule: &'static str, category: DiagnosticCategory, span: Span) -> Diagnostic {
    Diagnostic::new(rule, "message", category, span, "Something {what}.", &[("what", "odd")])
}

#[test]
fn location_message_and_snippet() {
    let reporter = Reporter::new(false, "input.ts", Some(SOURCE.to_string()));
    let rendered = reporter.format_diagnostic(&diagnostic(
        "no-unsafe-type-assertion",
        DiagnosticCategory::Error,
        Span::new(8, 20),
    ));
    let expected = format!(
        "input.ts:1:9 - error no-unsafe-type-assertion: Something odd.\n    1   let a = value as any;\n       {}{}",
        " ".repeat(8),
        "~".repeat(12)
    );
    assert_eq!(rendered, expected);
}

#[test]
fn positions_on_later_lines() {
    let reporter = Reporter::new(false, "input.ts", Some(SOURCE.to_string()));
    let rendered = reporter.format_diagnostic(&diagnostic(
        "no-base-to-string",
        DiagnosticCategory::Warning,
        Span::new(35, 38),
    ));
    let mut lines = rendered.lines();
    assert_eq!(
        lines.next(),
        Some("input.ts:2:14 - warning no-base-to-string: Something odd.")
    );
    assert_eq!(lines.next(), Some("    2   const b = `${obj}`;"));
    assert_eq!(
        lines.next().map(str::trim_start),
        Some("~~~")
    );
}

#[test]
fn without_source_only_the_file_is_shown() {
    let reporter = Reporter::new(false, "input.ts", None);
    let rendered = reporter.format_diagnostic(&diagnostic(
        "no-unsafe-return",
        DiagnosticCategory::Error,
        Span::new(8, 20),
    ));
    assert_eq!(rendered, "input.ts - error no-unsafe-return: Something odd.");

    let anonymous = Reporter::new(false, "", None);
    assert!(
        anonymous
            .format_diagnostic(&diagnostic("no-unsafe-return", DiagnosticCategory::Error, Span::new(0, 1)))
            .starts_with("<unknown> - error")
    );
}

#[test]
fn suggestions_follow_the_snippet() {
    let reporter = Reporter::new(false, "input.ts", Some(SOURCE.to_string()));
    let with_fix = diagnostic(
        "no-unsafe-type-assertion",
        DiagnosticCategory::Error,
        Span::new(8, 20),
    )
    .with_suggestion(Suggestion {
        message_id: "suggestUnknown",
        message: "Use `unknown`.".to_string(),
        edits: vec![TextEdit {
            span: Span::new(17, 20),
            new_text: "unknown".to_string(),
        }],
    });
    let rendered = reporter.format_diagnostic(&with_fix);
    assert_eq!(
        rendered.lines().last(),
        Some("  Suggestion: Use `unknown`. (replace at 1:18 with `unknown`)")
    );
}

#[test]
fn render_separates_diagnostics() {
    let reporter = Reporter::new(false, "input.ts", None);
    let rendered = reporter.render(&[
        diagnostic("no-unsafe-return", DiagnosticCategory::Error, Span::new(0, 1)),
        diagnostic("no-unsafe-spread", DiagnosticCategory::Error, Span::new(2, 3)),
    ]);
    assert_eq!(
        rendered,
        "input.ts - error no-unsafe-return: Something odd.\ninput.ts - error no-unsafe-spread: Something odd."
    );
    assert_eq!(reporter.render(&[]), "");
}

#[test]
fn summary_counts_by_category() {
    let error = diagnostic("no-unsafe-return", DiagnosticCategory::Error, Span::new(0, 1));
    let warning = diagnostic("no-base-to-string", DiagnosticCategory::Warning, Span::new(0, 1));
    assert_eq!(summary(&[], false), None);
    assert_eq!(summary(&[error.clone()], false).as_deref(), Some("Found 1 error."));
    assert_eq!(
        summary(&[warning.clone(), warning.clone()], false).as_deref(),
        Some("Found 2 warnings.")
    );
    assert_eq!(
        summary(&[error.clone(), error, warning], false).as_deref(),
        Some("Found 2 errors and 1 warning.")
    );
}

#[test]
fn json_report() {
    let rendered = render_json(
        "input.ts",
        &[diagnostic("no-unsafe-return", DiagnosticCategory::Error, Span::new(3, 9))],
    )
    .expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid JSON");
    assert_eq!(value["file"], "input.ts");
    assert_eq!(value["diagnostics"][0]["rule"], "no-unsafe-return");
    assert_eq!(value["diagnostics"][0]["messageText"], "Something odd.");
    assert_eq!(value["diagnostics"][0]["data"]["what"], "odd");
    assert_eq!(value["diagnostics"][0]["span"]["end"], 9);
}
