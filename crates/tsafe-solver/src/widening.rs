//! Literal widening.
//!
//! `"foo"` widens to `string`, `1` to `number`, and the type of an object
//! literal expression `{ a: 'x' }` to `{ a: string; }`. Declared types are
//! left alone.

use crate::intern::TypeInterner;
use crate::types::{ObjectFlags, PropertyInfo, TypeData, TypeId};

impl TypeInterner {
    pub fn widen(&self, ty: TypeId) -> TypeId {
        self.widen_at(ty, 0)
    }

    fn widen_at(&self, ty: TypeId, depth: u32) -> TypeId {
        if ty.is_intrinsic() && !matches!(ty, TypeId::BOOLEAN_TRUE | TypeId::BOOLEAN_FALSE) {
            return ty;
        }
        if depth >= tsafe_common::limits::MAX_COMPARISON_DEPTH {
            return ty;
        }
        match self.lookup(ty) {
            Some(TypeData::Literal(lit)) => lit.base_type(),
            Some(TypeData::Union(list)) => {
                let members = self
                    .type_list(list)
                    .iter()
                    .map(|&m| self.widen_at(m, depth + 1))
                    .collect();
                self.union(members)
            }
            Some(TypeData::Object(shape_id)) => {
                let shape = self.object_shape(shape_id);
                if !shape.flags.contains(ObjectFlags::OBJECT_LITERAL) {
                    return ty;
                }
                let properties: Vec<PropertyInfo> = shape
                    .properties
                    .iter()
                    .map(|p| PropertyInfo {
                        type_id: self.widen_at(p.type_id, depth + 1),
                        ..p.clone()
                    })
                    .collect();
                self.object_with_flags(properties, shape.flags - ObjectFlags::OBJECT_LITERAL)
            }
            _ => ty,
        }
    }
}
