//! Directional unsafe-assignment detection for returns and spreads.
//!
//! Unlike the assertion comparator, this only looks for `any` (and
//! optionally `never`) leaking into a typed position through containers. A
//! plain structural mismatch is the host checker's business, not ours.

use tracing::{debug, trace};

use crate::descent::{Component, Descent, DescentPolicy, structural_descent};
use crate::oracle::{NodeId, TypeFlags, TypeOracle};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::TypeId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AssignmentOptions {
    /// Treat a `never` sender like any other value.
    pub allow_unsafe_never: bool,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        Self {
            allow_unsafe_never: true,
        }
    }
}

/// The outermost pair of an unsafe assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnsafeAssignment {
    pub sender: TypeId,
    pub receiver: TypeId,
}

pub struct AssignmentChecker<'a> {
    db: &'a dyn TypeOracle,
    location: NodeId,
    options: AssignmentOptions,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> AssignmentChecker<'a> {
    pub fn new(db: &'a dyn TypeOracle, location: NodeId) -> Self {
        Self {
            db,
            location,
            options: AssignmentOptions::default(),
            guard: RecursionGuard::with_profile(RecursionProfile::TypeComparison),
        }
    }

    pub fn with_options(mut self, options: AssignmentOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether assigning `sender` to `receiver` lets an `any` (or `never`)
    /// escape into the receiver's type.
    ///
    /// `sender_is_bare_constructor` marks `new Foo()` with neither arguments
    /// nor explicit type arguments, whose inferred type arguments are
    /// whatever the receiver asks for.
    pub fn is_unsafe_assignment(
        &mut self,
        sender: TypeId,
        receiver: TypeId,
        sender_is_bare_constructor: bool,
    ) -> Option<UnsafeAssignment> {
        let unsafe_pair = self.pair(sender, receiver, sender_is_bare_constructor);
        debug!(
            sender = sender.0,
            receiver = receiver.0,
            unsafe_pair,
            limit_hit = self.guard.is_exceeded(),
            "assignment"
        );
        unsafe_pair.then_some(UnsafeAssignment { sender, receiver })
    }

    fn pair(&mut self, sender: TypeId, receiver: TypeId, bare_constructor: bool) -> bool {
        let key = (sender, receiver);
        match self.guard.enter(key) {
            RecursionResult::Entered => {
                let result = self.pair_inner(sender, receiver, bare_constructor);
                self.guard.leave(key);
                result
            }
            RecursionResult::Cycle => false,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => true,
        }
    }

    fn pair_inner(&mut self, sender: TypeId, receiver: TypeId, bare_constructor: bool) -> bool {
        let db = self.db;
        let sender_flags = db.type_flags(sender);
        let receiver_flags = db.type_flags(receiver);

        if sender_flags.intersects(TypeFlags::ANY | TypeFlags::ERROR) {
            return !receiver_flags.intersects(TypeFlags::ANY | TypeFlags::UNKNOWN);
        }
        if sender_flags.contains(TypeFlags::NEVER) && !self.options.allow_unsafe_never {
            return !receiver_flags
                .intersects(TypeFlags::NEVER | TypeFlags::UNKNOWN | TypeFlags::ANY);
        }
        if sender == receiver {
            return false;
        }

        let policy = DescentPolicy {
            compare_distinct_references: false,
            skip_type_arguments: bare_constructor,
        };
        let Descent::Components(components) =
            structural_descent(db, sender, receiver, self.location, policy)
        else {
            return false;
        };
        components.into_iter().any(|component| match component {
            Component::Related { source, target, .. } => {
                let nested = self.pair(source, target, false);
                if nested {
                    trace!(sender = source.0, receiver = target.0, "unsafe component");
                }
                nested
            }
            Component::Missing { .. } | Component::OptionalToRequired { .. } => false,
        })
    }
}

// =============================================================================
// Any-like discrimination
// =============================================================================

/// How a value's type carries `any` or `never` at its surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnyType {
    Safe,
    Any,
    AnyArray,
    PromiseAny,
    Never,
    NeverArray,
    PromiseNever,
}

impl AnyType {
    /// Rendered form used in diagnostic messages.
    pub const fn display(self) -> &'static str {
        match self {
            AnyType::Safe => "",
            AnyType::Any => "`any`",
            AnyType::AnyArray => "`any[]`",
            AnyType::PromiseAny => "`Promise<any>`",
            AnyType::Never => "`never`",
            AnyType::NeverArray => "`never[]`",
            AnyType::PromiseNever => "`Promise<never>`",
        }
    }
}

/// Classify `ty` as `any`, `any[]`, a promise of `any`, or the `never`
/// counterparts of those when `never_is_unsafe` is set.
pub fn discriminate_any_type(
    db: &dyn TypeOracle,
    ty: TypeId,
    location: NodeId,
    never_is_unsafe: bool,
) -> AnyType {
    let flags = db.type_flags(ty);
    if flags.intersects(TypeFlags::ANY | TypeFlags::ERROR) {
        return AnyType::Any;
    }
    if never_is_unsafe && flags.contains(TypeFlags::NEVER) {
        return AnyType::Never;
    }
    if let Some(element) = db.array_element_type(ty) {
        let element_flags = db.type_flags(element);
        if element_flags.intersects(TypeFlags::ANY | TypeFlags::ERROR) {
            return AnyType::AnyArray;
        }
        if never_is_unsafe && element_flags.contains(TypeFlags::NEVER) {
            return AnyType::NeverArray;
        }
    }

    let parts = db
        .union_members(ty)
        .or_else(|| db.intersection_members(ty))
        .unwrap_or_else(|| vec![ty]);
    for part in parts {
        if db.promised_type(part, location).is_none() {
            continue;
        }
        let awaited = db.awaited_type(part);
        if awaited == part {
            continue;
        }
        match discriminate_any_type(db, awaited, location, never_is_unsafe) {
            AnyType::Any => return AnyType::PromiseAny,
            AnyType::Never => return AnyType::PromiseNever,
            _ => {}
        }
    }
    AnyType::Safe
}

#[cfg(test)]
#[path = "../tests/assignment_tests.rs"]
mod tests;
