//! `TypeOracle` implementation for the in-memory interner.

use crate::def::{DefFlags, DefId};
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::lib_types::well_known_symbol_key;
use crate::oracle::{NodeId, TypeFlags, TypeOracle};
use crate::relation::AssignabilityChecker;
use crate::types::{IntrinsicKind, LiteralValue, ObjectFlags, PropertyInfo, TypeData, TypeId};

/// Bound on nested `Promise<Promise<...>>` unwrapping.
const MAX_AWAIT_DEPTH: u32 = 16;

impl TypeInterner {
    fn promise_argument(&self, ty: TypeId) -> Option<TypeId> {
        let TypeData::Application(app_id) = self.lookup(ty)? else {
            return None;
        };
        let app = self.application(app_id)?;
        if !self.definitions().flags(app.base).contains(DefFlags::PROMISE_LIKE) {
            return None;
        }
        Some(app.args.first().copied().unwrap_or(TypeId::UNKNOWN))
    }

    fn awaited_at(&self, ty: TypeId, depth: u32) -> TypeId {
        if depth >= MAX_AWAIT_DEPTH {
            return ty;
        }
        if let Some(TypeData::Union(list)) = self.lookup(ty) {
            let members = self
                .type_list(list)
                .iter()
                .map(|&m| self.awaited_at(m, depth + 1))
                .collect();
            return self.union(members);
        }
        match self.promise_argument(ty) {
            Some(inner) => self.awaited_at(inner, depth + 1),
            None => ty,
        }
    }

    fn constraint_at(&self, ty: TypeId, depth: u32) -> TypeId {
        if depth >= tsafe_common::limits::MAX_COMPARISON_DEPTH {
            return TypeId::UNKNOWN;
        }
        match self.lookup(ty) {
            Some(TypeData::TypeParameter(info)) => match info.constraint {
                Some(constraint) => self.constraint_at(constraint, depth + 1),
                None => TypeId::UNKNOWN,
            },
            Some(TypeData::Union(list)) => {
                let members = self
                    .type_list(list)
                    .iter()
                    .map(|&m| self.constraint_at(m, depth + 1))
                    .collect();
                self.union(members)
            }
            Some(TypeData::Intersection(list)) => {
                let members = self
                    .type_list(list)
                    .iter()
                    .map(|&m| self.constraint_at(m, depth + 1))
                    .collect();
                self.intersection(members)
            }
            _ => ty,
        }
    }

    fn is_string_like_name(&self, ty: TypeId) -> bool {
        self.type_flags(ty).intersects(TypeFlags::STRING_LIKE)
    }
}

impl TypeOracle for TypeInterner {
    fn type_flags(&self, ty: TypeId) -> TypeFlags {
        let Some(data) = self.lookup(ty) else {
            return TypeFlags::ERROR;
        };
        match data {
            TypeData::Intrinsic(kind) => match kind {
                IntrinsicKind::Any => TypeFlags::ANY,
                IntrinsicKind::Unknown => TypeFlags::UNKNOWN,
                IntrinsicKind::Error => TypeFlags::ERROR,
                IntrinsicKind::Undefined => TypeFlags::UNDEFINED,
                IntrinsicKind::Null => TypeFlags::NULL,
                IntrinsicKind::String => TypeFlags::STRING,
                IntrinsicKind::Number => TypeFlags::NUMBER,
                IntrinsicKind::Bigint => TypeFlags::BIGINT,
                IntrinsicKind::Boolean => TypeFlags::BOOLEAN,
                IntrinsicKind::Symbol => TypeFlags::SYMBOL,
                IntrinsicKind::Void => TypeFlags::VOID,
                IntrinsicKind::Never => TypeFlags::NEVER,
                IntrinsicKind::Object => TypeFlags::NON_PRIMITIVE,
            },
            TypeData::Literal(lit) => match lit {
                LiteralValue::String(_) => TypeFlags::STRING_LITERAL,
                LiteralValue::Number(_) => TypeFlags::NUMBER_LITERAL,
                LiteralValue::BigInt(_) => TypeFlags::BIGINT_LITERAL,
                LiteralValue::Boolean(_) => TypeFlags::BOOLEAN_LITERAL,
            },
            TypeData::Union(_) => TypeFlags::UNION,
            TypeData::Intersection(_) => TypeFlags::INTERSECTION,
            TypeData::TypeParameter(_) => TypeFlags::TYPE_PARAMETER,
            TypeData::Object(shape_id) => {
                if self
                    .object_shape(shape_id)
                    .flags
                    .contains(ObjectFlags::OBJECT_LITERAL)
                {
                    TypeFlags::OBJECT | TypeFlags::OBJECT_LITERAL
                } else {
                    TypeFlags::OBJECT
                }
            }
            TypeData::Array(_)
            | TypeData::ReadonlyArray(_)
            | TypeData::Tuple(_)
            | TypeData::Function(_)
            | TypeData::Application(_) => TypeFlags::OBJECT,
        }
    }

    fn union_members(&self, ty: TypeId) -> Option<Vec<TypeId>> {
        match self.lookup(ty)? {
            TypeData::Union(list) => Some(self.type_list(list).to_vec()),
            _ => None,
        }
    }

    fn intersection_members(&self, ty: TypeId) -> Option<Vec<TypeId>> {
        match self.lookup(ty)? {
            TypeData::Intersection(list) => Some(self.type_list(list).to_vec()),
            _ => None,
        }
    }

    fn array_element_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.lookup(ty)? {
            TypeData::Array(element) | TypeData::ReadonlyArray(element) => Some(element),
            _ => None,
        }
    }

    fn is_readonly_array(&self, ty: TypeId) -> bool {
        matches!(self.lookup(ty), Some(TypeData::ReadonlyArray(_)))
    }

    fn tuple_element_types(&self, ty: TypeId) -> Option<Vec<TypeId>> {
        match self.lookup(ty)? {
            TypeData::Tuple(list) => Some(self.type_list(list).to_vec()),
            _ => None,
        }
    }

    fn properties_of_type(&self, ty: TypeId) -> Vec<PropertyInfo> {
        self.declared_properties(ty)
    }

    fn property_of_type(&self, ty: TypeId, name: &str) -> Option<PropertyInfo> {
        self.apparent_property(ty, name)
    }

    fn has_well_known_symbol_property(&self, ty: TypeId, name: &str) -> bool {
        let key = well_known_symbol_key(name);
        self.declared_properties(ty).iter().any(|p| p.name == key)
    }

    fn reference_target(&self, ty: TypeId) -> Option<DefId> {
        match self.lookup(ty)? {
            TypeData::Application(app_id) => self.application(app_id).map(|app| app.base),
            _ => None,
        }
    }

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        match self.lookup(ty) {
            Some(TypeData::Application(app_id)) => self
                .application(app_id)
                .map(|app| app.args.clone())
                .unwrap_or_default(),
            Some(TypeData::Array(element) | TypeData::ReadonlyArray(element)) => vec![element],
            Some(TypeData::Tuple(list)) => self.type_list(list).to_vec(),
            _ => Vec::new(),
        }
    }

    fn promised_type(&self, ty: TypeId, _location: NodeId) -> Option<TypeId> {
        // A single global promise contract applies everywhere.
        self.promise_argument(ty)
    }

    fn awaited_type(&self, ty: TypeId) -> TypeId {
        self.awaited_at(ty, 0)
    }

    fn is_global_function_reference(&self, ty: TypeId) -> bool {
        self.reference_target(ty).is_some_and(|def| {
            self.definitions()
                .flags(def)
                .contains(DefFlags::GLOBAL_FUNCTION)
        })
    }

    fn call_return_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.lookup(ty)? {
            TypeData::Function(shape_id) => self.function_shape(shape_id).map(|s| s.return_type),
            TypeData::Union(list) | TypeData::Intersection(list) => self
                .type_list(list)
                .iter()
                .find_map(|&member| self.call_return_type(member)),
            TypeData::TypeParameter(info) => info.constraint.and_then(|c| self.call_return_type(c)),
            _ => None,
        }
    }

    fn base_constraint(&self, ty: TypeId) -> TypeId {
        self.constraint_at(ty, 0)
    }

    fn widened_type(&self, ty: TypeId) -> TypeId {
        self.widen(ty)
    }

    fn is_type_assignable_to(&self, source: TypeId, target: TypeId) -> bool {
        AssignabilityChecker::new(self).is_assignable(source, target)
    }

    fn type_to_string(&self, ty: TypeId) -> String {
        TypeFormatter::new(self).format(ty)
    }

    fn type_name(&self, ty: TypeId) -> String {
        match self.lookup(ty) {
            Some(TypeData::TypeParameter(info)) => match info.constraint {
                Some(constraint) => self.type_name(constraint),
                None => info.name,
            },
            Some(TypeData::Union(list)) => {
                let members = self.type_list(list);
                if members.iter().all(|&m| self.is_string_like_name(m)) {
                    "string".to_string()
                } else {
                    self.type_to_string(ty)
                }
            }
            Some(TypeData::Intersection(list)) => {
                let members = self.type_list(list);
                if members.iter().any(|&m| self.is_string_like_name(m)) {
                    "string".to_string()
                } else {
                    self.type_to_string(ty)
                }
            }
            _ if self.is_string_like_name(ty) => "string".to_string(),
            _ => self.type_to_string(ty),
        }
    }
}

#[cfg(test)]
#[path = "../tests/query_tests.rs"]
mod tests;
