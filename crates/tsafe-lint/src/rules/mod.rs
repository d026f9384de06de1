//! The lint rules and the context they run in.
//!
//! Every rule sees every site and ignores the kinds it has no opinion on.

use tsafe_common::{Diagnostic, DiagnosticCategory, Span};
use tsafe_solver::TypeOracle;

use crate::config::{CompiledOptions, RuleLevel};
use crate::diagnostics::{DiagnosticSink, LintMessage, lint_diagnostic};
use crate::functions::FunctionTable;
use crate::syntax::Site;

pub mod base_to_string;
pub mod unsafe_return;
pub mod unsafe_spread;
pub mod unsafe_type_assertion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub default_level: RuleLevel,
}

pub type CheckFn = fn(&mut RuleContext<'_>, &Site);

pub struct Rule {
    pub meta: RuleMeta,
    pub check: CheckFn,
}

pub static ALL: &[Rule] = &[
    Rule {
        meta: unsafe_type_assertion::META,
        check: unsafe_type_assertion::check,
    },
    Rule {
        meta: unsafe_return::META,
        check: unsafe_return::check,
    },
    Rule {
        meta: unsafe_spread::META,
        check: unsafe_spread::check,
    },
    Rule {
        meta: base_to_string::META,
        check: base_to_string::check,
    },
];

pub fn find(name: &str) -> Option<&'static Rule> {
    ALL.iter().find(|rule| rule.meta.name == name)
}

/// What a rule can see and where its diagnostics go.
pub struct RuleContext<'a> {
    pub db: &'a dyn TypeOracle,
    pub options: &'a CompiledOptions,
    pub functions: &'a FunctionTable,
    rule: &'static str,
    category: DiagnosticCategory,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        db: &'a dyn TypeOracle,
        options: &'a CompiledOptions,
        functions: &'a FunctionTable,
        rule: &RuleMeta,
        category: DiagnosticCategory,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            db,
            options,
            functions,
            rule: rule.name,
            category,
            sink,
        }
    }

    /// Build (without emitting) a diagnostic for the running rule.
    pub fn diagnostic(&self, message: &LintMessage, span: Span, data: &[(&str, &str)]) -> Diagnostic {
        lint_diagnostic(self.rule, message, self.category, span, data)
    }

    pub fn report(&mut self, message: &LintMessage, span: Span, data: &[(&str, &str)]) {
        let diagnostic = self.diagnostic(message, span, data);
        self.emit(diagnostic);
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            rule = diagnostic.rule,
            message_id = diagnostic.message_id,
            start = diagnostic.span.start,
            end = diagnostic.span.end,
            "report"
        );
        self.sink.emit(diagnostic);
    }
}
