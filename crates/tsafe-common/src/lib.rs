//! Common types shared by the tsafe crates.
//!
//! - [`span`]: byte ranges into the analyzed source text
//! - [`diagnostics`]: the diagnostic record emitted by every rule
//! - [`limits`]: recursion limits used by the solver's guards

pub mod diagnostics;
pub mod limits;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticCategory, Suggestion, TextEdit, format_message};
pub use span::Span;
