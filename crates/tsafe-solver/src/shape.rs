//! On-demand classification of a type into the shapes the comparators
//! distinguish.
//!
//! Shapes are derived from oracle queries each time they are needed and are
//! never cached, so they can't go stale against the host.

use crate::def::DefId;
use crate::oracle::{NodeId, TypeFlags, TypeOracle};
use crate::types::TypeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeShape {
    Error,
    Any,
    Never,
    Unknown,
    Primitive(TypeFlags),
    Literal(TypeFlags),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Array { element: TypeId, readonly: bool },
    Tuple(Vec<TypeId>),
    /// Awaitable under the promise contract at the query location.
    PromiseLike(TypeId),
    Reference { def: DefId, args: Vec<TypeId> },
    /// Anonymous callable type.
    Function,
    Object,
    TypeParameter,
    Other,
}

impl TypeShape {
    /// Shapes whose members can be compared property by property.
    pub fn is_property_bearing(&self) -> bool {
        matches!(self, Self::Object | Self::Reference { .. })
    }
}

pub fn type_shape(db: &dyn TypeOracle, ty: TypeId, location: NodeId) -> TypeShape {
    let flags = db.type_flags(ty);

    if flags.contains(TypeFlags::ERROR) {
        return TypeShape::Error;
    }
    if flags.contains(TypeFlags::ANY) {
        return TypeShape::Any;
    }
    if flags.contains(TypeFlags::NEVER) {
        return TypeShape::Never;
    }
    if flags.contains(TypeFlags::UNKNOWN) {
        return TypeShape::Unknown;
    }
    if let Some(members) = db.union_members(ty) {
        return TypeShape::Union(members);
    }
    if let Some(members) = db.intersection_members(ty) {
        return TypeShape::Intersection(members);
    }
    if flags.intersects(TypeFlags::LITERAL) {
        return TypeShape::Literal(flags);
    }
    if flags.intersects(TypeFlags::PRIMITIVE) {
        return TypeShape::Primitive(flags);
    }
    if flags.contains(TypeFlags::TYPE_PARAMETER) {
        return TypeShape::TypeParameter;
    }
    if let Some(element) = db.array_element_type(ty) {
        return TypeShape::Array {
            element,
            readonly: db.is_readonly_array(ty),
        };
    }
    if let Some(elements) = db.tuple_element_types(ty) {
        return TypeShape::Tuple(elements);
    }
    if let Some(inner) = db.promised_type(ty, location) {
        return TypeShape::PromiseLike(inner);
    }
    if let Some(def) = db.reference_target(ty) {
        return TypeShape::Reference {
            def,
            args: db.type_arguments(ty),
        };
    }
    if db.call_return_type(ty).is_some() {
        return TypeShape::Function;
    }
    if flags.contains(TypeFlags::OBJECT) {
        return TypeShape::Object;
    }
    TypeShape::Other
}
