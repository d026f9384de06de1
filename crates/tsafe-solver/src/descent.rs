//! Pairwise structural decomposition shared by both comparators.
//!
//! Given two types of matching container shape, produce the component pairs
//! to compare next: array elements, tuple slots, promise values, type
//! arguments of the same generic definition, or properties.

use smallvec::SmallVec;

use crate::oracle::{NodeId, TypeOracle};
use crate::shape::{TypeShape, type_shape};
use crate::types::TypeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    /// Compare `source` against `target` next.
    Related {
        source: TypeId,
        target: TypeId,
        /// The pair comes from an optional target property.
        target_optional: bool,
    },
    /// The target declares a property the source lacks.
    Missing { name: String },
    /// The source property is optional but the target's is required.
    OptionalToRequired { name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Descent {
    /// The pair has no shared container shape.
    Opaque,
    /// Tuples of different length.
    ArityMismatch,
    Components(SmallVec<[Component; 4]>),
}

#[derive(Copy, Clone, Debug, Default)]
pub struct DescentPolicy {
    /// Compare references to *different* definitions property by property.
    /// When off, only references to the same definition decompose.
    pub compare_distinct_references: bool,
    /// Do not decompose the type arguments of same-definition references.
    pub skip_type_arguments: bool,
}

fn related(source: TypeId, target: TypeId) -> Component {
    Component::Related {
        source,
        target,
        target_optional: false,
    }
}

pub fn structural_descent(
    db: &dyn TypeOracle,
    source: TypeId,
    target: TypeId,
    location: NodeId,
    policy: DescentPolicy,
) -> Descent {
    let source_shape = type_shape(db, source, location);
    let target_shape = type_shape(db, target, location);

    match (&source_shape, &target_shape) {
        (TypeShape::Array { element: s, .. }, TypeShape::Array { element: t, .. }) => {
            Descent::Components(smallvec::smallvec![related(*s, *t)])
        }
        (TypeShape::Tuple(s), TypeShape::Tuple(t)) => {
            if s.len() != t.len() {
                return Descent::ArityMismatch;
            }
            Descent::Components(s.iter().zip(t).map(|(&a, &b)| related(a, b)).collect())
        }
        (TypeShape::PromiseLike(s), TypeShape::PromiseLike(t)) => {
            Descent::Components(smallvec::smallvec![related(*s, *t)])
        }
        (
            TypeShape::Reference { def: sd, args: sa },
            TypeShape::Reference { def: td, args: ta },
        ) if sd == td => {
            if policy.skip_type_arguments {
                return Descent::Opaque;
            }
            Descent::Components(sa.iter().zip(ta).map(|(&a, &b)| related(a, b)).collect())
        }
        (TypeShape::Reference { .. }, TypeShape::Reference { .. })
            if !policy.compare_distinct_references =>
        {
            Descent::Opaque
        }
        (s, t) if s.is_property_bearing() && t.is_property_bearing() => {
            property_descent(db, source, target)
        }
        _ => Descent::Opaque,
    }
}

fn property_descent(db: &dyn TypeOracle, source: TypeId, target: TypeId) -> Descent {
    let components = db
        .properties_of_type(target)
        .into_iter()
        .filter_map(|target_prop| match db.property_of_type(source, &target_prop.name) {
            None if target_prop.optional => None,
            None => Some(Component::Missing {
                name: target_prop.name,
            }),
            Some(source_prop) if source_prop.optional && !target_prop.optional => {
                Some(Component::OptionalToRequired {
                    name: target_prop.name,
                })
            }
            Some(source_prop) => Some(Component::Related {
                source: source_prop.type_id,
                target: target_prop.type_id,
                target_optional: target_prop.optional,
            }),
        })
        .collect();
    Descent::Components(components)
}
