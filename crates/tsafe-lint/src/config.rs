//! Lint options, as read from a JSON configuration file.
//!
//! ```json
//! {
//!   "ignoredTypeNames": ["Error", "*Exception"],
//!   "allowUnsafeNever": false,
//!   "rules": { "no-base-to-string": "warn", "no-unsafe-spread": "off" }
//! }
//! ```

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsafe_common::DiagnosticCategory;
use tsafe_solver::{AssertionOptions, AssignmentOptions, TypeNameMatcher};

use crate::rules::{self, RuleMeta};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid ignoredTypeNames pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("unknown rule '{0}'")]
    UnknownRule(String),
}

/// Severity a rule reports with, or `off`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    pub const fn category(self) -> Option<DiagnosticCategory> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(DiagnosticCategory::Warning),
            RuleLevel::Error => Some(DiagnosticCategory::Error),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RuleLevel::Off => "off",
            RuleLevel::Warn => "warn",
            RuleLevel::Error => "error",
        }
    }
}

fn default_ignored_type_names() -> Vec<String> {
    ["Error", "RegExp", "URL", "URLSearchParams"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LintOptions {
    /// Type names whose stringification is never reported. Glob patterns.
    pub ignored_type_names: Vec<String>,
    /// Distinguish a missing optional property from one set to `undefined`.
    pub exact_optional_property_types: bool,
    /// Let `never` flow into typed returns and spreads unreported.
    pub allow_unsafe_never: bool,
    /// Mirrors the compiler option: with it on, an `any`-typed `this` is
    /// already an error and is reported as a plain unsafe return.
    pub no_implicit_this: bool,
    /// Per-rule level overrides, keyed by rule name.
    pub rules: IndexMap<String, RuleLevel>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            ignored_type_names: default_ignored_type_names(),
            exact_optional_property_types: false,
            allow_unsafe_never: true,
            no_implicit_this: false,
            rules: IndexMap::new(),
        }
    }
}

impl LintOptions {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate the options and build the matchers the rules use.
    pub fn compile(&self) -> Result<CompiledOptions, ConfigError> {
        let mut levels = IndexMap::new();
        for rule in rules::ALL {
            levels.insert(rule.meta.name, rule.meta.default_level);
        }
        for (name, level) in &self.rules {
            let rule = rules::find(name).ok_or_else(|| ConfigError::UnknownRule(name.clone()))?;
            levels.insert(rule.meta.name, *level);
        }

        Ok(CompiledOptions {
            ignored_type_names: IgnoredTypeNames::new(&self.ignored_type_names)?,
            assertion: AssertionOptions {
                exact_optional_property_types: self.exact_optional_property_types,
            },
            assignment: AssignmentOptions {
                allow_unsafe_never: self.allow_unsafe_never,
            },
            no_implicit_this: self.no_implicit_this,
            levels,
        })
    }
}

/// Options after validation, ready for the rules.
#[derive(Clone, Debug)]
pub struct CompiledOptions {
    pub ignored_type_names: IgnoredTypeNames,
    pub assertion: AssertionOptions,
    pub assignment: AssignmentOptions,
    pub no_implicit_this: bool,
    levels: IndexMap<&'static str, RuleLevel>,
}

impl CompiledOptions {
    /// Category `rule` reports with; `None` when the rule is off.
    pub fn category(&self, rule: &RuleMeta) -> Option<DiagnosticCategory> {
        self.levels
            .get(rule.name)
            .copied()
            .unwrap_or(rule.default_level)
            .category()
    }
}

impl Default for CompiledOptions {
    fn default() -> Self {
        Self {
            ignored_type_names: IgnoredTypeNames::defaults(),
            assertion: AssertionOptions::default(),
            assignment: AssignmentOptions::default(),
            no_implicit_this: false,
            levels: rules::ALL
                .iter()
                .map(|rule| (rule.meta.name, rule.meta.default_level))
                .collect(),
        }
    }
}

/// Glob matcher over type names.
#[derive(Clone, Debug)]
pub struct IgnoredTypeNames {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoredTypeNames {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(false)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| ConfigError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    fn defaults() -> Self {
        let patterns = default_ignored_type_names();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            // Plain identifiers are always valid globs.
            if let Ok(glob) = GlobBuilder::new(pattern).build() {
                builder.add(glob);
            }
        }
        Self {
            set: builder.build().unwrap_or_else(|_| GlobSet::empty()),
            patterns,
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl TypeNameMatcher for IgnoredTypeNames {
    fn matches(&self, type_name: &str) -> bool {
        self.set.is_match(type_name)
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
