use tracing::debug_span;
use tsafe_common::Diagnostic;
use tsafe_solver::TypeOracle;

use crate::config::CompiledOptions;
use crate::diagnostics::DiagnosticSink;
use crate::functions::FunctionTable;
use crate::rules::{self, RuleContext};
use crate::syntax::Site;

/// Runs the enabled rules over sites, one site at a time.
///
/// Holds no state between sites; the oracle and function table are only read.
pub struct Linter<'a> {
    db: &'a dyn TypeOracle,
    options: CompiledOptions,
    functions: FunctionTable,
}

impl<'a> Linter<'a> {
    pub fn new(db: &'a dyn TypeOracle, options: CompiledOptions) -> Self {
        Self {
            db,
            options,
            functions: FunctionTable::new(),
        }
    }

    pub fn with_functions(mut self, functions: FunctionTable) -> Self {
        self.functions = functions;
        self
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionTable {
        &mut self.functions
    }

    pub fn options(&self) -> &CompiledOptions {
        &self.options
    }

    pub fn check_site(&self, site: &Site, sink: &mut dyn DiagnosticSink) {
        for rule in rules::ALL {
            let Some(category) = self.options.category(&rule.meta) else {
                continue;
            };
            let _span = debug_span!("rule", rule = rule.meta.name, site = site.kind_name()).entered();
            let mut cx = RuleContext::new(
                self.db,
                &self.options,
                &self.functions,
                &rule.meta,
                category,
                sink,
            );
            (rule.check)(&mut cx, site);
        }
    }

    /// Check every site and return the diagnostics in source order.
    pub fn check_all<'s>(&self, sites: impl IntoIterator<Item = &'s Site>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for site in sites {
            self.check_site(site, &mut diagnostics);
        }
        diagnostics.sort_by_key(|d| (d.span.start, d.span.end));
        diagnostics
    }
}

#[cfg(test)]
#[path = "../tests/linter_tests.rs"]
mod tests;
