use indexmap::IndexMap;
use serde::Serialize;

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Suggestion => "suggestion",
            Self::Message => "message",
        }
    }
}

/// A single replacement of `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

/// An optional fix offered alongside a diagnostic. Never applied automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub message_id: &'static str,
    pub message: String,
    pub edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule: &'static str,
    pub message_id: &'static str,
    pub category: DiagnosticCategory,
    pub span: Span,
    pub message_text: String,
    /// Placeholder values used to render `message_text`, in insertion order.
    pub data: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    /// Build a diagnostic by rendering `template` with `data`.
    pub fn new(
        rule: &'static str,
        message_id: &'static str,
        category: DiagnosticCategory,
        span: Span,
        template: &str,
        data: &[(&str, &str)],
    ) -> Self {
        Self {
            rule,
            message_id,
            category,
            span,
            message_text: format_message(template, data),
            data: data
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

/// Replace every `{name}` placeholder in `message` with its value from `args`.
///
/// Unknown placeholders are left untouched.
pub fn format_message(message: &str, args: &[(&str, &str)]) -> String {
    let mut result = message.to_string();
    for (name, value) in args {
        result = result.replace(&format!("{{{name}}}"), value);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
