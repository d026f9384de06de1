//! Property resolution for the reference oracle.
//!
//! Declared members come from object shapes, named definitions (instantiated
//! with the reference's type arguments, plus their `extends` chain) and the
//! library interfaces backing arrays, functions and primitives. Apparent
//! lookup additionally falls back to the `Object` base interface.

use rustc_hash::{FxHashMap, FxHashSet};
use tsafe_common::limits::MAX_COMPARISON_DEPTH;

use crate::def::DefId;
use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, LiteralValue, MemberOrigin, PropertyInfo, TypeData, TypeId};

impl TypeInterner {
    /// Declared properties of `ty`, excluding `Object` base members.
    pub fn declared_properties(&self, ty: TypeId) -> Vec<PropertyInfo> {
        self.declared_properties_at(ty, 0)
    }

    fn declared_properties_at(&self, ty: TypeId, depth: u32) -> Vec<PropertyInfo> {
        if depth >= MAX_COMPARISON_DEPTH {
            return Vec::new();
        }
        let Some(data) = self.lookup(ty) else {
            return Vec::new();
        };
        let lib = *self.lib();
        match data {
            TypeData::Object(shape_id) => self.object_shape(shape_id).properties.clone(),
            TypeData::Application(app_id) => match self.application(app_id) {
                Some(app) => self.definition_properties(app.base, &app.args),
                None => Vec::new(),
            },
            TypeData::Array(element) | TypeData::ReadonlyArray(element) => {
                self.definition_properties(lib.array, &[element])
            }
            TypeData::Tuple(list) => {
                let element = self.union(self.type_list(list).to_vec());
                self.definition_properties(lib.array, &[element])
            }
            TypeData::Function(_) => self.definition_properties(lib.function, &[]),
            TypeData::TypeParameter(info) => match info.constraint {
                Some(constraint) => self.declared_properties_at(constraint, depth + 1),
                None => Vec::new(),
            },
            TypeData::Intersection(list) => {
                let mut seen = FxHashSet::default();
                let mut merged = Vec::new();
                for &member in self.type_list(list).iter() {
                    for prop in self.declared_properties_at(member, depth + 1) {
                        if seen.insert(prop.name.clone()) {
                            merged.push(prop);
                        }
                    }
                }
                merged
            }
            TypeData::Union(list) => self.common_union_properties(&self.type_list(list), depth),
            TypeData::Literal(lit) => match lit {
                LiteralValue::String(_) => self.definition_properties(lib.string, &[]),
                LiteralValue::Number(_) => self.definition_properties(lib.number, &[]),
                LiteralValue::BigInt(_) => self.definition_properties(lib.bigint, &[]),
                LiteralValue::Boolean(_) => self.definition_properties(lib.boolean, &[]),
            },
            TypeData::Intrinsic(kind) => match kind {
                IntrinsicKind::String => self.definition_properties(lib.string, &[]),
                IntrinsicKind::Number => self.definition_properties(lib.number, &[]),
                IntrinsicKind::Bigint => self.definition_properties(lib.bigint, &[]),
                IntrinsicKind::Boolean => self.definition_properties(lib.boolean, &[]),
                IntrinsicKind::Symbol => self.definition_properties(lib.symbol, &[]),
                _ => Vec::new(),
            },
        }
    }

    /// Properties present on every member of a union; types are unioned.
    fn common_union_properties(&self, members: &[TypeId], depth: u32) -> Vec<PropertyInfo> {
        let mut per_member = members
            .iter()
            .map(|&m| self.declared_properties_at(m, depth + 1));
        let Some(first) = per_member.next() else {
            return Vec::new();
        };
        let rest: Vec<Vec<PropertyInfo>> = per_member.collect();
        first
            .into_iter()
            .filter_map(|prop| {
                let mut types = vec![prop.type_id];
                let mut optional = prop.optional;
                for other in &rest {
                    let found = other.iter().find(|p| p.name == prop.name)?;
                    types.push(found.type_id);
                    optional |= found.optional;
                }
                Some(PropertyInfo {
                    type_id: self.union(types),
                    optional,
                    ..prop
                })
            })
            .collect()
    }

    /// Members of `def` instantiated with `args`, followed by inherited
    /// members not overridden along the `extends` chain.
    pub fn definition_properties(&self, def: DefId, args: &[TypeId]) -> Vec<PropertyInfo> {
        let mut visited = FxHashSet::default();
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_definition_properties(def, args, &mut visited, &mut seen, &mut out);
        out
    }

    fn collect_definition_properties(
        &self,
        def: DefId,
        args: &[TypeId],
        visited: &mut FxHashSet<DefId>,
        seen: &mut FxHashSet<String>,
        out: &mut Vec<PropertyInfo>,
    ) {
        if !visited.insert(def) {
            return;
        }
        let Some(info) = self.definitions().get(def) else {
            return;
        };
        let subst: FxHashMap<TypeId, TypeId> = self.substitution_for(&info, args);
        for prop in &info.properties {
            if seen.insert(prop.name.clone()) {
                out.push(PropertyInfo {
                    type_id: self.instantiate(prop.type_id, &subst),
                    ..prop.clone()
                });
            }
        }
        for &base in &info.heritage {
            let base = self.instantiate(base, &subst);
            if let Some(TypeData::Application(app_id)) = self.lookup(base) {
                if let Some(app) = self.application(app_id) {
                    self.collect_definition_properties(app.base, &app.args, visited, seen, out);
                }
            }
        }
    }

    /// Whether apparent lookups on `ty` fall back to `Object` base members.
    pub(crate) fn has_object_apparent_type(&self, ty: TypeId) -> bool {
        match self.lookup(ty) {
            Some(TypeData::Intrinsic(kind)) => matches!(
                kind,
                IntrinsicKind::String
                    | IntrinsicKind::Number
                    | IntrinsicKind::Bigint
                    | IntrinsicKind::Boolean
                    | IntrinsicKind::Symbol
                    | IntrinsicKind::Object
            ),
            Some(TypeData::TypeParameter(info)) => info
                .constraint
                .is_some_and(|c| self.has_object_apparent_type(c)),
            Some(TypeData::Union(list)) => self
                .type_list(list)
                .iter()
                .all(|&m| self.has_object_apparent_type(m)),
            Some(TypeData::Intersection(list)) => self
                .type_list(list)
                .iter()
                .any(|&m| self.has_object_apparent_type(m)),
            Some(_) => true,
            None => false,
        }
    }

    /// Apparent property lookup by name.
    pub fn apparent_property(&self, ty: TypeId, name: &str) -> Option<PropertyInfo> {
        if let Some(prop) = self
            .declared_properties(ty)
            .into_iter()
            .find(|p| p.name == name)
        {
            return Some(prop);
        }
        if !self.has_object_apparent_type(ty) {
            return None;
        }
        let object = self.lib().object;
        self.definition_properties(object, &[])
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| PropertyInfo {
                origin: MemberOrigin::ObjectBase,
                ..p
            })
    }
}

#[cfg(test)]
#[path = "../tests/members_tests.rs"]
mod tests;
