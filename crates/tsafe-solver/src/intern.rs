//! Type interning and construction.
//!
//! `TypeInterner` owns every type the reference oracle knows about. All
//! builders take `&self`; storage sits behind `RwLock`s so an interner can be
//! shared across threads while the analysis only ever reads.

use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use crate::def::{DefId, DefinitionInfo, DefinitionStore};
use crate::lib_types::{self, WellKnownDefs};
use crate::types::{
    FunctionShape, FunctionShapeId, IntrinsicKind, LiteralValue, ObjectFlags, ObjectShape,
    ObjectShapeId, OrderedFloat, ParamInfo, PropertyInfo, TypeApplication, TypeApplicationId,
    TypeData, TypeId, TypeListId, TypeParamInfo,
};

// =============================================================================
// ValueInterner
// =============================================================================

struct InternerState<T> {
    values: Vec<Arc<T>>,
    index: FxHashMap<Arc<T>, u32>,
}

/// Deduplicating append-only store handing out dense `u32` ids.
struct ValueInterner<T> {
    state: RwLock<InternerState<T>>,
}

impl<T: Hash + Eq> ValueInterner<T> {
    fn new() -> Self {
        Self {
            state: RwLock::new(InternerState {
                values: Vec::new(),
                index: FxHashMap::default(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, InternerState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InternerState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn intern(&self, value: T) -> u32 {
        if let Some(&id) = self.read().index.get(&value) {
            return id;
        }
        let mut state = self.write();
        // Another writer may have raced us between the two locks.
        if let Some(&id) = state.index.get(&value) {
            return id;
        }
        let id = state.values.len() as u32;
        let value = Arc::new(value);
        state.values.push(Arc::clone(&value));
        state.index.insert(value, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.read().values.get(id as usize).cloned()
    }

    fn len(&self) -> usize {
        self.read().values.len()
    }
}

// =============================================================================
// TypeInterner
// =============================================================================

pub struct TypeInterner {
    types: ValueInterner<TypeData>,
    lists: ValueInterner<Vec<TypeId>>,
    objects: ValueInterner<ObjectShape>,
    functions: ValueInterner<FunctionShape>,
    applications: ValueInterner<TypeApplication>,
    defs: DefinitionStore,
    lib: WellKnownDefs,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Intrinsics in `TypeId` index order.
const INTRINSICS: [TypeData; TypeId::FIRST_USER as usize] = [
    TypeData::Intrinsic(IntrinsicKind::Any),
    TypeData::Intrinsic(IntrinsicKind::Unknown),
    TypeData::Intrinsic(IntrinsicKind::Error),
    TypeData::Intrinsic(IntrinsicKind::Undefined),
    TypeData::Intrinsic(IntrinsicKind::Null),
    TypeData::Intrinsic(IntrinsicKind::String),
    TypeData::Intrinsic(IntrinsicKind::Number),
    TypeData::Intrinsic(IntrinsicKind::Bigint),
    TypeData::Literal(LiteralValue::Boolean(false)),
    TypeData::Literal(LiteralValue::Boolean(true)),
    TypeData::Intrinsic(IntrinsicKind::Boolean),
    TypeData::Intrinsic(IntrinsicKind::Symbol),
    TypeData::Intrinsic(IntrinsicKind::Void),
    TypeData::Intrinsic(IntrinsicKind::Never),
    TypeData::Intrinsic(IntrinsicKind::Object),
];

impl TypeInterner {
    /// Create an interner with intrinsics and the built-in library
    /// definitions (`Object`, `Function`, `Promise`, ...) registered.
    pub fn new() -> Self {
        let mut interner = Self {
            types: ValueInterner::new(),
            lists: ValueInterner::new(),
            objects: ValueInterner::new(),
            functions: ValueInterner::new(),
            applications: ValueInterner::new(),
            defs: DefinitionStore::new(),
            lib: WellKnownDefs::default(),
        };
        for (index, data) in INTRINSICS.into_iter().enumerate() {
            let id = interner.types.intern(data);
            debug_assert_eq!(id as usize, index);
        }
        interner.lib = lib_types::install(&interner);
        interner
    }

    pub fn definitions(&self) -> &DefinitionStore {
        &self.defs
    }

    pub fn lib(&self) -> &WellKnownDefs {
        &self.lib
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // -------------------------------------------------------------------------
    // Raw access
    // -------------------------------------------------------------------------

    pub fn intern(&self, data: TypeData) -> TypeId {
        TypeId(self.types.intern(data))
    }

    pub fn lookup(&self, ty: TypeId) -> Option<TypeData> {
        self.types.get(ty.0).map(|data| (*data).clone())
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<Vec<TypeId>> {
        self.lists.get(id.0).unwrap_or_default()
    }

    pub fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        self.objects.get(id.0).unwrap_or_default()
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>> {
        self.functions.get(id.0)
    }

    pub fn application(&self, id: TypeApplicationId) -> Option<Arc<TypeApplication>> {
        self.applications.get(id.0)
    }

    fn intern_list(&self, list: Vec<TypeId>) -> TypeListId {
        TypeListId(self.lists.intern(list))
    }

    // -------------------------------------------------------------------------
    // Literals
    // -------------------------------------------------------------------------

    pub fn literal_string(&self, value: &str) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::String(value.to_string())))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    pub fn literal_bigint(&self, digits: &str) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::BigInt(digits.to_string())))
    }

    pub const fn literal_boolean(&self, value: bool) -> TypeId {
        if value {
            TypeId::BOOLEAN_TRUE
        } else {
            TypeId::BOOLEAN_FALSE
        }
    }

    // -------------------------------------------------------------------------
    // Unions and intersections
    // -------------------------------------------------------------------------

    /// Build a normalized union.
    ///
    /// Nested unions are flattened, `any`, `error` and `unknown` absorb every
    /// other member, `never` disappears, literals are absorbed by their
    /// primitive and `true | false` collapses to `boolean`.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(list)) => flat.extend(self.type_list(list).iter().copied()),
                _ => flat.push(member),
            }
        }

        for absorbing in [TypeId::ANY, TypeId::ERROR, TypeId::UNKNOWN] {
            if flat.contains(&absorbing) {
                return absorbing;
            }
        }

        flat.retain(|&t| t != TypeId::NEVER);
        if flat.contains(&TypeId::BOOLEAN_TRUE) && flat.contains(&TypeId::BOOLEAN_FALSE) {
            flat.push(TypeId::BOOLEAN);
        }

        let primitives: SmallVec<[TypeId; 4]> = flat
            .iter()
            .copied()
            .filter(|&t| {
                matches!(
                    t,
                    TypeId::STRING | TypeId::NUMBER | TypeId::BIGINT | TypeId::BOOLEAN
                )
            })
            .collect();
        if !primitives.is_empty() {
            flat.retain(|&t| match self.lookup(t) {
                Some(TypeData::Literal(lit)) => !primitives.contains(&lit.base_type()),
                _ => true,
            });
        }

        flat.sort_unstable();
        flat.dedup();

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list = self.intern_list(flat);
                self.intern(TypeData::Union(list))
            }
        }
    }

    pub fn union2(&self, a: TypeId, b: TypeId) -> TypeId {
        self.union(vec![a, b])
    }

    /// Build a normalized intersection.
    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Intersection(list)) => {
                    flat.extend(self.type_list(list).iter().copied())
                }
                _ => flat.push(member),
            }
        }

        for absorbing in [TypeId::NEVER, TypeId::ANY, TypeId::ERROR] {
            if flat.contains(&absorbing) {
                return absorbing;
            }
        }
        flat.retain(|&t| t != TypeId::UNKNOWN);
        flat.sort_unstable();
        flat.dedup();

        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => {
                let list = self.intern_list(flat);
                self.intern(TypeData::Intersection(list))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Structural types
    // -------------------------------------------------------------------------

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn readonly_array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::ReadonlyArray(element))
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        let list = self.intern_list(elements);
        self.intern(TypeData::Tuple(list))
    }

    pub fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        self.object_with_flags(properties, ObjectFlags::empty())
    }

    /// Type of an object literal expression such as `{ a: 'x' }`.
    pub fn object_literal(&self, properties: Vec<PropertyInfo>) -> TypeId {
        self.object_with_flags(properties, ObjectFlags::OBJECT_LITERAL)
    }

    pub fn object_with_flags(&self, mut properties: Vec<PropertyInfo>, flags: ObjectFlags) -> TypeId {
        let mut seen = FxHashSet::default();
        properties.retain(|p| seen.insert(p.name.clone()));
        let shape = ObjectShapeId(self.objects.intern(ObjectShape { flags, properties }));
        self.intern(TypeData::Object(shape))
    }

    pub fn function(&self, params: Vec<ParamInfo>, return_type: TypeId) -> TypeId {
        let shape = FunctionShapeId(self.functions.intern(FunctionShape {
            params,
            return_type,
        }));
        self.intern(TypeData::Function(shape))
    }

    pub fn type_param(&self, name: &str, constraint: Option<TypeId>) -> TypeId {
        self.intern(TypeData::TypeParameter(TypeParamInfo {
            name: name.to_string(),
            constraint,
        }))
    }

    // -------------------------------------------------------------------------
    // Named references
    // -------------------------------------------------------------------------

    /// `Def<args>`; `args` may be empty for non-generic definitions.
    pub fn reference(&self, base: DefId, args: Vec<TypeId>) -> TypeId {
        let app = TypeApplicationId(self.applications.intern(TypeApplication { base, args }));
        self.intern(TypeData::Application(app))
    }

    pub fn promise(&self, value: TypeId) -> TypeId {
        self.reference(self.lib.promise, vec![value])
    }

    /// The global wide `Function` type.
    pub fn global_function(&self) -> TypeId {
        self.reference(self.lib.function, Vec::new())
    }

    /// Register an interface whose members may refer to the interface itself.
    ///
    /// `build` receives the new `DefId` and returns the member list.
    pub fn define_interface(
        &self,
        name: &str,
        type_params: Vec<TypeId>,
        build: impl FnOnce(DefId) -> Vec<PropertyInfo>,
    ) -> DefId {
        let def = self
            .defs
            .register(DefinitionInfo::interface(name, type_params));
        let properties = build(def);
        self.defs.set_properties(def, properties);
        trace!(def_id = def.0, name, "TypeInterner::define_interface");
        def
    }

    /// Register a definition as-is.
    pub fn register_definition(&self, info: DefinitionInfo) -> DefId {
        self.defs.register(info)
    }

    // -------------------------------------------------------------------------
    // Instantiation
    // -------------------------------------------------------------------------

    /// Substitute type parameters according to `subst`.
    pub fn instantiate(&self, ty: TypeId, subst: &FxHashMap<TypeId, TypeId>) -> TypeId {
        if subst.is_empty() {
            return ty;
        }
        self.instantiate_at(ty, subst, 0)
    }

    fn instantiate_at(&self, ty: TypeId, subst: &FxHashMap<TypeId, TypeId>, depth: u32) -> TypeId {
        if let Some(&replacement) = subst.get(&ty) {
            return replacement;
        }
        if ty.is_intrinsic() || depth >= tsafe_common::limits::MAX_COMPARISON_DEPTH {
            return ty;
        }
        let next = depth + 1;
        let Some(data) = self.lookup(ty) else {
            return ty;
        };
        match data {
            TypeData::Intrinsic(_) | TypeData::Literal(_) | TypeData::TypeParameter(_) => ty,
            TypeData::Union(list) => {
                let members = self.instantiate_list(list, subst, next);
                self.union(members)
            }
            TypeData::Intersection(list) => {
                let members = self.instantiate_list(list, subst, next);
                self.intersection(members)
            }
            TypeData::Array(element) => self.array(self.instantiate_at(element, subst, next)),
            TypeData::ReadonlyArray(element) => {
                self.readonly_array(self.instantiate_at(element, subst, next))
            }
            TypeData::Tuple(list) => {
                let elements = self.instantiate_list(list, subst, next);
                self.tuple(elements)
            }
            TypeData::Object(shape_id) => {
                let shape = self.object_shape(shape_id);
                let properties = shape
                    .properties
                    .iter()
                    .map(|p| PropertyInfo {
                        type_id: self.instantiate_at(p.type_id, subst, next),
                        ..p.clone()
                    })
                    .collect();
                self.object_with_flags(properties, shape.flags)
            }
            TypeData::Function(shape_id) => {
                let Some(shape) = self.function_shape(shape_id) else {
                    return ty;
                };
                let params = shape
                    .params
                    .iter()
                    .map(|p| ParamInfo {
                        type_id: self.instantiate_at(p.type_id, subst, next),
                        ..p.clone()
                    })
                    .collect();
                let return_type = self.instantiate_at(shape.return_type, subst, next);
                self.function(params, return_type)
            }
            TypeData::Application(app_id) => {
                let Some(app) = self.application(app_id) else {
                    return ty;
                };
                let args = app
                    .args
                    .iter()
                    .map(|&arg| self.instantiate_at(arg, subst, next))
                    .collect();
                self.reference(app.base, args)
            }
        }
    }

    fn instantiate_list(
        &self,
        list: TypeListId,
        subst: &FxHashMap<TypeId, TypeId>,
        depth: u32,
    ) -> Vec<TypeId> {
        self.type_list(list)
            .iter()
            .map(|&t| self.instantiate_at(t, subst, depth))
            .collect()
    }

    /// Substitution map binding `def`'s type parameters to `args`.
    ///
    /// Missing arguments default to `unknown`.
    pub(crate) fn substitution_for(&self, info: &DefinitionInfo, args: &[TypeId]) -> FxHashMap<TypeId, TypeId> {
        info.type_params
            .iter()
            .enumerate()
            .map(|(i, &param)| (param, args.get(i).copied().unwrap_or(TypeId::UNKNOWN)))
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
