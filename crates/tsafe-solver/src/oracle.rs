//! The query surface the analysis needs from a host type checker.
//!
//! Every comparison and classification in this crate goes through
//! `&dyn TypeOracle`. [`TypeInterner`](crate::TypeInterner) is the in-memory
//! implementation used by the CLI and the tests; a host integration supplies
//! its own.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::def::DefId;
use crate::types::{PropertyInfo, TypeId};

/// Identifies the syntax node a query originates from.
///
/// Some answers depend on what is in scope at that node (for example which
/// `Promise` contract applies).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        const ANY = 1 << 0;
        const UNKNOWN = 1 << 1;
        const ERROR = 1 << 2;
        const NEVER = 1 << 3;
        const VOID = 1 << 4;
        const UNDEFINED = 1 << 5;
        const NULL = 1 << 6;
        const STRING = 1 << 7;
        const NUMBER = 1 << 8;
        const BIGINT = 1 << 9;
        const BOOLEAN = 1 << 10;
        const SYMBOL = 1 << 11;
        const STRING_LITERAL = 1 << 12;
        const NUMBER_LITERAL = 1 << 13;
        const BIGINT_LITERAL = 1 << 14;
        const BOOLEAN_LITERAL = 1 << 15;
        /// The `object` keyword type.
        const NON_PRIMITIVE = 1 << 16;
        const UNION = 1 << 17;
        const INTERSECTION = 1 << 18;
        /// Object, array, tuple, function or named reference type.
        const OBJECT = 1 << 19;
        const TYPE_PARAMETER = 1 << 20;
        /// Type of an anonymous object literal expression.
        const OBJECT_LITERAL = 1 << 21;

        const STRING_LIKE = Self::STRING.bits() | Self::STRING_LITERAL.bits();
        const NUMBER_LIKE = Self::NUMBER.bits() | Self::NUMBER_LITERAL.bits();
        const BIGINT_LIKE = Self::BIGINT.bits() | Self::BIGINT_LITERAL.bits();
        const BOOLEAN_LIKE = Self::BOOLEAN.bits() | Self::BOOLEAN_LITERAL.bits();
        const LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::BIGINT_LITERAL.bits()
            | Self::BOOLEAN_LITERAL.bits();
        const NULLABLE = Self::UNDEFINED.bits() | Self::NULL.bits() | Self::VOID.bits();
        const PRIMITIVE = Self::STRING.bits()
            | Self::NUMBER.bits()
            | Self::BIGINT.bits()
            | Self::BOOLEAN.bits()
            | Self::SYMBOL.bits()
            | Self::NULLABLE.bits()
            | Self::NON_PRIMITIVE.bits()
            | Self::LITERAL.bits();
    }
}

/// Read-only queries against a fully checked program.
///
/// Implementations must be side-effect free from the caller's point of view.
/// A type the host could not resolve is reported with [`TypeFlags::ERROR`].
pub trait TypeOracle {
    fn type_flags(&self, ty: TypeId) -> TypeFlags;

    /// Members of a union type, `None` for anything else.
    fn union_members(&self, ty: TypeId) -> Option<Vec<TypeId>>;

    /// Members of an intersection type, `None` for anything else.
    fn intersection_members(&self, ty: TypeId) -> Option<Vec<TypeId>>;

    /// Element type of `T[]` or `readonly T[]`.
    fn array_element_type(&self, ty: TypeId) -> Option<TypeId>;

    fn is_readonly_array(&self, ty: TypeId) -> bool;

    /// Slot types of a tuple type.
    fn tuple_element_types(&self, ty: TypeId) -> Option<Vec<TypeId>>;

    /// Declared properties (own and inherited from named bases), excluding
    /// members every object gets from the universal `Object` interface.
    fn properties_of_type(&self, ty: TypeId) -> Vec<PropertyInfo>;

    /// Apparent property lookup, falling back to `Object` base members.
    fn property_of_type(&self, ty: TypeId, name: &str) -> Option<PropertyInfo>;

    /// Whether the type has the well-known symbol member `Symbol.<name>`.
    fn has_well_known_symbol_property(&self, ty: TypeId, name: &str) -> bool;

    /// Definition a named reference type points to.
    fn reference_target(&self, ty: TypeId) -> Option<DefId>;

    /// Type arguments of a named reference, array or tuple.
    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId>;

    /// Resolved value type when `ty` is promise-like under the promise contract
    /// in scope at `location`.
    fn promised_type(&self, ty: TypeId, location: NodeId) -> Option<TypeId>;

    /// Recursively unwrapped promise value type; `ty` itself when not awaitable.
    fn awaited_type(&self, ty: TypeId) -> TypeId;

    /// Whether `ty` is a reference to the global wide `Function` type.
    fn is_global_function_reference(&self, ty: TypeId) -> bool;

    /// Return type of the (first) call signature of `ty`.
    fn call_return_type(&self, ty: TypeId) -> Option<TypeId>;

    /// `ty` with type parameters replaced by their constraints.
    fn base_constraint(&self, ty: TypeId) -> TypeId;

    /// Literal types widened to their primitive and object literal types to
    /// their widened shape.
    fn widened_type(&self, ty: TypeId) -> TypeId;

    fn is_type_assignable_to(&self, source: TypeId, target: TypeId) -> bool;

    /// Rendered type text, as the host checker prints it.
    fn type_to_string(&self, ty: TypeId) -> String;

    /// Short type name used for name-based matching.
    ///
    /// String-like types (including unions and intersections of them) are
    /// named `string`; type parameters are named after their constraint.
    fn type_name(&self, ty: TypeId) -> String;
}
