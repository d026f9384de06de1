//! Type-aware soundness lint rules.
//!
//! A host lowers its syntax tree to [`Site`]s, registers the functions that
//! `return` sites belong to in a [`FunctionTable`], and hands both to a
//! [`Linter`] together with a [`TypeOracle`](tsafe_solver::TypeOracle).
//!
//! Rules:
//! - `no-unsafe-type-assertion`
//! - `no-unsafe-return`
//! - `no-unsafe-spread`
//! - `no-base-to-string`

pub mod config;
pub mod diagnostics;
pub mod functions;
mod linter;
pub mod rules;
pub mod syntax;

#[cfg(test)]
#[path = "../tests/support.rs"]
mod test_support;

pub use config::{CompiledOptions, ConfigError, IgnoredTypeNames, LintOptions, RuleLevel};
pub use diagnostics::{DiagnosticSink, LintMessage, messages};
pub use functions::{ContextualType, FunctionInfo, FunctionTable, ReturnType};
pub use linter::Linter;
pub use syntax::{
    AssertionForm, ConcatOperator, Expr, ExprKind, FunctionId, Site, TypeAnnotation,
};
