//! Soundness of type assertions (`expr as T`, `<T>expr`).
//!
//! An assertion is unsafe when the asserted type admits values the original
//! type doesn't, or when it launders a gradual escape hatch (`any`, `never`,
//! the wide `Function` type) into or out of a concrete type.
//!
//! Checks run in a fixed priority order; the first that decides wins:
//!
//! 1. identity (optionally ignoring `undefined` on optional properties)
//! 2. target `unknown`
//! 3. union distribution on either side
//! 4. target is the global `Function` type
//! 5. structural descent into arrays, tuples, objects, promises and
//!    same-definition references
//! 6. source `never`, source `any`, target `any`
//! 7. assignability of the source (object literals widened) to the target

use tracing::{debug, trace};

use crate::descent::{Component, Descent, DescentPolicy, structural_descent};
use crate::oracle::{NodeId, TypeFlags, TypeOracle};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::TypeId;

/// Outcome of comparing an expression type with an asserted type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastVerdict {
    Safe,
    /// An `any` value is asserted to something concrete.
    FromAny,
    /// A concrete value is asserted to `any`.
    ToAny,
    /// A `never` value is asserted to something concrete.
    FromNever,
    /// The asserted type is the wide global `Function` type.
    ToFunction,
    /// The asserted type is narrower than the original type.
    Narrowing,
}

impl CastVerdict {
    #[inline]
    pub const fn is_unsafe(self) -> bool {
        !matches!(self, CastVerdict::Safe)
    }

    /// Escape-hatch verdicts, as opposed to plain narrowing.
    #[inline]
    pub const fn is_escape(self) -> bool {
        matches!(
            self,
            CastVerdict::FromAny | CastVerdict::ToAny | CastVerdict::FromNever | CastVerdict::ToFunction
        )
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AssertionOptions {
    /// When set, `T | undefined` and `T` are distinct even on optional
    /// properties.
    pub exact_optional_property_types: bool,
}

pub struct AssertionChecker<'a> {
    db: &'a dyn TypeOracle,
    location: NodeId,
    options: AssertionOptions,
    guard: RecursionGuard<(TypeId, TypeId, bool)>,
}

impl<'a> AssertionChecker<'a> {
    pub fn new(db: &'a dyn TypeOracle, location: NodeId) -> Self {
        Self {
            db,
            location,
            options: AssertionOptions::default(),
            guard: RecursionGuard::with_profile(RecursionProfile::TypeComparison),
        }
    }

    pub fn with_options(mut self, options: AssertionOptions) -> Self {
        self.options = options;
        self
    }

    /// Compare the expression type `source` with the asserted type `target`.
    pub fn check(&mut self, source: TypeId, target: TypeId) -> CastVerdict {
        let verdict = self.compare(source, target, false);
        debug!(
            source = source.0,
            target = target.0,
            ?verdict,
            limit_hit = self.guard.is_exceeded(),
            "assertion verdict"
        );
        verdict
    }

    fn compare(&mut self, source: TypeId, target: TypeId, target_optional: bool) -> CastVerdict {
        let key = (source, target, target_optional);
        match self.guard.enter(key) {
            RecursionResult::Entered => {
                let verdict = self.compare_inner(source, target, target_optional);
                trace!(
                    source = source.0,
                    target = target.0,
                    depth = self.guard.depth(),
                    ?verdict,
                    "compare"
                );
                self.guard.leave(key);
                verdict
            }
            // Coinductive: the pair is already being compared further up.
            RecursionResult::Cycle => CastVerdict::Safe,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                CastVerdict::Narrowing
            }
        }
    }

    fn compare_inner(&mut self, source: TypeId, target: TypeId, target_optional: bool) -> CastVerdict {
        let db = self.db;
        let source_flags = db.type_flags(source);
        let target_flags = db.type_flags(target);

        if source == target {
            return CastVerdict::Safe;
        }
        // Unresolved types can't be reasoned about.
        if source_flags.contains(TypeFlags::ERROR) || target_flags.contains(TypeFlags::ERROR) {
            return CastVerdict::Narrowing;
        }
        if target_optional
            && !self.options.exact_optional_property_types
            && self.without_undefined(source) == self.without_undefined(target)
        {
            return CastVerdict::Safe;
        }

        if target_flags.contains(TypeFlags::UNKNOWN) {
            return CastVerdict::Safe;
        }

        if let Some(members) = db.union_members(source) {
            // Members are ordered by id, so an escape verdict must win over
            // narrowing regardless of which member was interned first.
            let mut narrowing = None;
            for member in members {
                let verdict = self.compare(member, target, target_optional);
                if verdict.is_escape() {
                    return verdict;
                }
                if narrowing.is_none() && verdict.is_unsafe() {
                    narrowing = Some(verdict);
                }
            }
            return narrowing.unwrap_or(CastVerdict::Safe);
        }
        if let Some(members) = db.union_members(target) {
            let mut escape = None;
            for member in members {
                let verdict = self.compare(source, member, target_optional);
                if !verdict.is_unsafe() {
                    return CastVerdict::Safe;
                }
                if escape.is_none() && verdict.is_escape() {
                    escape = Some(verdict);
                }
            }
            if let Some(verdict) = escape {
                return verdict;
            }
            return self.assignability_fallback(source, target);
        }

        // The wide `Function` type is reported on its own, whatever the
        // source's members look like.
        if db.is_global_function_reference(target) {
            return CastVerdict::ToFunction;
        }

        if let Some(verdict) = self.descend(source, target) {
            if verdict.is_unsafe() {
                return verdict;
            }
        }

        if source_flags.contains(TypeFlags::NEVER) {
            return CastVerdict::FromNever;
        }
        if source_flags.contains(TypeFlags::ANY) {
            return CastVerdict::FromAny;
        }
        if target_flags.contains(TypeFlags::ANY) {
            return CastVerdict::ToAny;
        }

        self.assignability_fallback(source, target)
    }

    fn descend(&mut self, source: TypeId, target: TypeId) -> Option<CastVerdict> {
        let policy = DescentPolicy {
            compare_distinct_references: true,
            skip_type_arguments: false,
        };
        match structural_descent(self.db, source, target, self.location, policy) {
            Descent::Opaque => None,
            Descent::ArityMismatch => Some(CastVerdict::Narrowing),
            Descent::Components(components) => {
                for component in components {
                    match component {
                        Component::Missing { name } | Component::OptionalToRequired { name } => {
                            trace!(property = %name, "property does not line up");
                            return Some(CastVerdict::Narrowing);
                        }
                        Component::Related {
                            source,
                            target,
                            target_optional,
                        } => {
                            let verdict = self.compare(source, target, target_optional);
                            if verdict.is_unsafe() {
                                return Some(verdict);
                            }
                        }
                    }
                }
                Some(CastVerdict::Safe)
            }
        }
    }

    fn assignability_fallback(&self, source: TypeId, target: TypeId) -> CastVerdict {
        // Only object literal expressions widen; `'a' as 'a' | 'b'` stays exact.
        let source = if self.db.type_flags(source).contains(TypeFlags::OBJECT_LITERAL) {
            self.db.widened_type(source)
        } else {
            source
        };
        if self.db.is_type_assignable_to(source, target) {
            CastVerdict::Safe
        } else {
            CastVerdict::Narrowing
        }
    }

    /// Member set of `ty` without `undefined`, sorted for comparison.
    fn without_undefined(&self, ty: TypeId) -> Vec<TypeId> {
        let mut members = self.db.union_members(ty).unwrap_or_else(|| vec![ty]);
        members.retain(|&m| !self.db.type_flags(m).contains(TypeFlags::UNDEFINED));
        members.sort_unstable();
        members
    }
}

/// Whether asserting `source` to `target` is unsafe in any way.
pub fn is_unsafe_narrowing(
    db: &dyn TypeOracle,
    source: TypeId,
    target: TypeId,
    location: NodeId,
) -> bool {
    AssertionChecker::new(db, location)
        .check(source, target)
        .is_unsafe()
}

#[cfg(test)]
#[path = "../tests/assertion_tests.rs"]
mod tests;
