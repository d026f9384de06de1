//! Message definitions and the sink diagnostics are emitted into.

use tsafe_common::{Diagnostic, DiagnosticCategory, Span, Suggestion, TextEdit, format_message};

/// A message definition: stable id plus a template with `{name}` placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LintMessage {
    pub id: &'static str,
    pub template: &'static str,
}

impl LintMessage {
    pub fn render(&self, data: &[(&str, &str)]) -> String {
        format_message(self.template, data)
    }
}

pub mod messages {
    use super::LintMessage;

    pub const UNSAFE_OF_ANY_TYPE_ASSERTION: LintMessage = LintMessage {
        id: "unsafeOfAnyTypeAssertion",
        template: "Unsafe cast from 'any' detected: consider using type guards or a safer cast.",
    };
    pub const UNSAFE_TO_ANY_TYPE_ASSERTION: LintMessage = LintMessage {
        id: "unsafeToAnyTypeAssertion",
        template: "Unsafe cast to 'any' detected: consider using a more specific type to ensure safety.",
    };
    pub const UNSAFE_NEVER_TYPE_ASSERTION: LintMessage = LintMessage {
        id: "unsafeNeverTypeAssertion",
        template: "Unsafe cast from 'never' detected: the value cannot exist, so the cast hides unreachable code.",
    };
    pub const UNSAFE_FUNCTION_TYPE_ASSERTION: LintMessage = LintMessage {
        id: "unsafeFunctionTypeAssertion",
        template: "Unsafe cast to 'Function' detected: the global 'Function' type accepts any callable; assert a specific signature instead.",
    };
    pub const UNSAFE_TYPE_ASSERTION: LintMessage = LintMessage {
        id: "unsafeTypeAssertion",
        template: "Unsafe type assertion: type '{type}' is more narrow than the original type.",
    };
    pub const SUGGEST_UNKNOWN: LintMessage = LintMessage {
        id: "suggestUnknown",
        template: "Assert to 'unknown' instead, and narrow the value before use.",
    };

    pub const BASE_TO_STRING: LintMessage = LintMessage {
        id: "baseToString",
        template: "'{name}' {certainty} use Object's default stringification format ('[object Object]') when stringified.",
    };

    pub const UNSAFE_RETURN: LintMessage = LintMessage {
        id: "unsafeReturn",
        template: "Unsafe return of a value of type {type}.",
    };
    pub const UNSAFE_RETURN_THIS: LintMessage = LintMessage {
        id: "unsafeReturnThis",
        template: "Unsafe return of a value of type {type}. `this` is typed as `any`.\nYou can try to fix this by turning on the `noImplicitThis` compiler option, or adding a `this` parameter to the function.",
    };
    pub const UNSAFE_RETURN_ASSIGNMENT: LintMessage = LintMessage {
        id: "unsafeReturnAssignment",
        template: "Unsafe return of type `{sender}` from function with return type `{receiver}`.",
    };

    pub const UNSAFE_SPREAD: LintMessage = LintMessage {
        id: "unsafeSpread",
        template: "Unsafe spread of an {type} value.",
    };
    pub const UNSAFE_ARRAY_SPREAD: LintMessage = LintMessage {
        id: "unsafeArraySpread",
        template: "Unsafe spread of an {type} array type.",
    };
    pub const UNSAFE_SPREAD_ASSIGNMENT: LintMessage = LintMessage {
        id: "unsafeSpreadAssignment",
        template: "Unsafe spread of type `{sender}` into a slot of type `{receiver}`.",
    };
}

/// Build a diagnostic for `rule` from a message definition.
pub fn lint_diagnostic(
    rule: &'static str,
    message: &LintMessage,
    category: DiagnosticCategory,
    span: Span,
    data: &[(&str, &str)],
) -> Diagnostic {
    Diagnostic::new(rule, message.id, category, span, message.template, data)
}

/// A suggestion that replaces `span` with `new_text`.
pub fn replace_suggestion(message: &LintMessage, span: Span, new_text: &str) -> Suggestion {
    Suggestion {
        message_id: message.id,
        message: message.render(&[]),
        edits: vec![TextEdit {
            span,
            new_text: new_text.to_string(),
        }],
    }
}

/// Receives diagnostics as rules produce them.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
