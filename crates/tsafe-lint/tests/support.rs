use tsafe_common::{Diagnostic, Span};
use tsafe_solver::{NodeId, TypeId, TypeInterner};

use crate::config::LintOptions;
use crate::functions::FunctionTable;
use crate::linter::Linter;
use crate::syntax::{Expr, ExprKind, Site};

/// An expression whose node id and span are derived from `at`.
pub(crate) fn expr(at: u32, ty: TypeId, text: &str) -> Expr {
    let len = u32::try_from(text.len()).unwrap_or(1);
    Expr::new(NodeId(at), Span::new(at, at + len), ty, text)
}

pub(crate) fn literal(at: u32, ty: TypeId, text: &str) -> Expr {
    expr(at, ty, text).with_kind(ExprKind::Literal)
}

pub(crate) fn lint_with(
    db: &TypeInterner,
    options: &LintOptions,
    functions: FunctionTable,
    sites: &[Site],
) -> Vec<Diagnostic> {
    let options = options.compile().expect("valid options");
    Linter::new(db, options)
        .with_functions(functions)
        .check_all(sites)
}

pub(crate) fn lint(db: &TypeInterner, sites: &[Site]) -> Vec<Diagnostic> {
    lint_with(db, &LintOptions::default(), FunctionTable::new(), sites)
}

pub(crate) fn message_ids(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|d| d.message_id).collect()
}
