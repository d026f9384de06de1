//! Type-Directed Soundness Solver
//!
//! Answers the questions the lint rules ask about types:
//!
//! - **Assertions**: is `expr as T` narrower than what `expr` is known to be,
//!   or does it launder `any`, `never` or `Function`?
//! - **Assignments**: does a return or spread leak `any` into a typed slot?
//! - **Stringification**: does converting a value to text print
//!   `[object Object]`?
//!
//! All analyses query types through the [`TypeOracle`] trait. The crate
//! ships an in-memory oracle, [`TypeInterner`], with interned structural
//! types, generic definitions and a small model of the standard library.
//! Recursive comparisons are bounded by [`recursion::RecursionGuard`] and
//! treat cycles coinductively.
pub mod assertion;
pub mod assignment;
pub mod certainty;
pub mod def;
pub mod descent;
mod format;
mod intern;
pub mod lib_types;
mod members;
pub mod oracle;
mod query;
pub mod recursion;
pub mod relation;
pub mod shape;
pub mod types;
mod widening;

pub use assertion::{AssertionChecker, AssertionOptions, CastVerdict, is_unsafe_narrowing};
pub use assignment::{
    AnyType, AssignmentChecker, AssignmentOptions, UnsafeAssignment, discriminate_any_type,
};
pub use certainty::{Certainty, ToStringClassifier, TypeNameMatcher};
pub use def::{DefFlags, DefId, DefKind, DefinitionInfo, DefinitionStore};
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use lib_types::WellKnownDefs;
pub use oracle::{NodeId, TypeFlags, TypeOracle};
pub use types::{
    FunctionShape, LiteralValue, MemberOrigin, ObjectShape, ParamInfo, PropertyInfo, TypeData,
    TypeId,
};
