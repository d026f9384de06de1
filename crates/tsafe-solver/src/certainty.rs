//! Whether converting a value to text produces something meaningful.
//!
//! A value whose only `toString` is the one every object inherits from
//! `Object` prints `[object Object]`. [`ToStringClassifier`] reports, per
//! type, whether stringification is always useful, never useful, or depends
//! on which union member is present at runtime.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::oracle::{TypeFlags, TypeOracle};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{MemberOrigin, TypeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    /// Stringification always produces meaningful text.
    Always,
    /// Some union members print `[object Object]`.
    Sometimes,
    /// Always prints `[object Object]`.
    Never,
}

impl Certainty {
    /// Union aggregation: equal verdicts are kept, mixed verdicts become
    /// `Sometimes`.
    #[must_use]
    pub const fn join(self, other: Certainty) -> Certainty {
        match (self, other) {
            (Certainty::Always, Certainty::Always) => Certainty::Always,
            (Certainty::Never, Certainty::Never) => Certainty::Never,
            _ => Certainty::Sometimes,
        }
    }

    /// Fold [`join`](Self::join) over `items`; `None` when empty.
    pub fn join_all(items: impl IntoIterator<Item = Certainty>) -> Option<Certainty> {
        items.into_iter().reduce(Certainty::join)
    }

    /// Aggregate the verdicts of a tuple's slots.
    ///
    /// Unlike a union, a tuple is stringified slot by slot, so a single
    /// useless slot makes the whole join useless unless some slot is only
    /// conditionally useless.
    pub fn aggregate_slots(slots: &[Certainty]) -> Certainty {
        if slots.iter().all(|&c| c == Certainty::Always) {
            Certainty::Always
        } else if slots.contains(&Certainty::Sometimes) {
            Certainty::Sometimes
        } else {
            Certainty::Never
        }
    }

    /// Phrase used in diagnostics, `None` for `Always`.
    pub const fn phrase(self) -> Option<&'static str> {
        match self {
            Certainty::Always => None,
            Certainty::Sometimes => Some("may"),
            Certainty::Never => Some("will"),
        }
    }
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Certainty::Always => "always",
            Certainty::Sometimes => "may",
            Certainty::Never => "will",
        })
    }
}

/// Decides which rendered type names are exempt from classification.
pub trait TypeNameMatcher {
    fn matches(&self, type_name: &str) -> bool;
}

// =============================================================================
// ToStringClassifier
// =============================================================================

pub struct ToStringClassifier<'a> {
    db: &'a dyn TypeOracle,
    ignored: &'a dyn TypeNameMatcher,
    guard: RecursionGuard<TypeId>,
}

impl<'a> ToStringClassifier<'a> {
    pub fn new(db: &'a dyn TypeOracle, ignored: &'a dyn TypeNameMatcher) -> Self {
        Self {
            db,
            ignored,
            guard: RecursionGuard::with_profile(RecursionProfile::Classification),
        }
    }

    pub fn classify(&mut self, ty: TypeId) -> Certainty {
        match self.guard.enter(ty) {
            RecursionResult::Entered => {
                let certainty = self.classify_inner(ty);
                trace!(type_id = ty.0, depth = self.guard.depth(), ?certainty, "classify");
                self.guard.leave(ty);
                certainty
            }
            // A type that stringifies through itself is assumed fine.
            RecursionResult::Cycle => Certainty::Always,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                Certainty::Never
            }
        }
    }

    /// Classify each slot and aggregate with [`Certainty::aggregate_slots`].
    pub fn classify_slots(&mut self, slots: &[TypeId]) -> Certainty {
        let verdicts: Vec<Certainty> = slots.iter().map(|&slot| self.classify(slot)).collect();
        Certainty::aggregate_slots(&verdicts)
    }

    fn is_ignored(&self, ty: TypeId) -> bool {
        self.ignored.matches(&self.db.type_name(ty))
    }

    fn classify_inner(&mut self, ty: TypeId) -> Certainty {
        let db = self.db;
        let flags = db.type_flags(ty);

        if flags.contains(TypeFlags::TYPE_PARAMETER) {
            let constraint = db.base_constraint(ty);
            if constraint == ty || db.type_flags(constraint).contains(TypeFlags::UNKNOWN) {
                return Certainty::Always;
            }
            return self.classify(constraint);
        }

        // A custom `Symbol.toPrimitive` replaces default stringification.
        if db.has_well_known_symbol_property(ty, "toPrimitive") {
            return Certainty::Always;
        }

        if let Some(members) = db.union_members(ty) {
            if self.is_ignored(ty) {
                return Certainty::Always;
            }
            let verdicts: Vec<Certainty> = members.iter().map(|&m| self.classify(m)).collect();
            return Certainty::join_all(verdicts).unwrap_or(Certainty::Always);
        }

        if let Some(members) = db.intersection_members(ty) {
            if self.is_ignored(ty) {
                return Certainty::Always;
            }
            for member in members {
                if self.classify(member) == Certainty::Always {
                    return Certainty::Always;
                }
            }
            return Certainty::Never;
        }

        let Some(to_string) = db.property_of_type(ty, "toString") else {
            return Certainty::Always;
        };
        if flags.intersects(TypeFlags::BOOLEAN_LIKE) {
            return Certainty::Always;
        }
        if self.is_ignored(ty) {
            return Certainty::Always;
        }
        if to_string.origin != MemberOrigin::ObjectBase {
            return Certainty::Always;
        }
        Certainty::Never
    }
}

#[cfg(test)]
#[path = "../tests/certainty_tests.rs"]
mod tests;
