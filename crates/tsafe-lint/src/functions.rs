//! Functions that `return` sites belong to, and how their return types are
//! found.

use rustc_hash::FxHashMap;
use tracing::trace;
use tsafe_common::limits::MAX_FUNCTION_NESTING;
use tsafe_solver::{NodeId, TypeOracle, TypeId};

use crate::syntax::FunctionId;

/// Where an unannotated function expression gets its expected type from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ContextualType {
    /// A declaration, or an expression nothing gives a type to.
    #[default]
    None,
    /// The type of the slot the expression is written into, e.g. the
    /// parameter type of the call it is an argument of.
    Type(TypeId),
    /// The function literal is itself returned from `parent`.
    EnclosingReturn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    pub node: NodeId,
    /// Return type annotation, if written.
    pub declared_return: Option<TypeId>,
    pub contextual: ContextualType,
    /// Return type the checker inferred from the body.
    pub inferred_return: TypeId,
    pub is_async: bool,
    /// Innermost enclosing function.
    pub parent: Option<FunctionId>,
}

impl FunctionInfo {
    pub fn new(node: NodeId, inferred_return: TypeId) -> Self {
        Self {
            node,
            declared_return: None,
            contextual: ContextualType::None,
            inferred_return,
            is_async: false,
            parent: None,
        }
    }

    pub fn declared(mut self, return_type: TypeId) -> Self {
        self.declared_return = Some(return_type);
        self
    }

    pub fn contextual(mut self, contextual: ContextualType) -> Self {
        self.contextual = contextual;
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn nested_in(mut self, parent: FunctionId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// The return type a `return` is checked against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReturnType {
    pub ty: TypeId,
    /// Written as an annotation on the function itself.
    pub declared: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionTable {
    functions: FxHashMap<FunctionId, FunctionInfo>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `info` under `id`, returning the previous entry.
    pub fn insert(&mut self, id: FunctionId, info: FunctionInfo) -> Option<FunctionInfo> {
        self.functions.insert(id, info)
    }

    pub fn get(&self, id: FunctionId) -> Option<&FunctionInfo> {
        self.functions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Resolve the return type of `id`.
    ///
    /// An annotation wins. An unannotated function expression takes the call
    /// return type of its contextual type; a function literal returned from
    /// another function gets its contextual type from that function's return
    /// type, walking outward. Otherwise the inferred type is used.
    ///
    /// `None` when `id` is not registered.
    pub fn return_type(&self, db: &dyn TypeOracle, id: FunctionId) -> Option<ReturnType> {
        self.resolve(db, id, 0)
    }

    fn resolve(&self, db: &dyn TypeOracle, id: FunctionId, depth: u32) -> Option<ReturnType> {
        let info = self.get(id)?;
        if let Some(declared) = info.declared_return {
            return Some(ReturnType {
                ty: declared,
                declared: true,
            });
        }

        let contextual = if depth >= MAX_FUNCTION_NESTING {
            trace!(function = id.0, depth, "function nesting limit reached");
            None
        } else {
            match info.contextual {
                ContextualType::None => None,
                ContextualType::Type(ty) => db.call_return_type(ty),
                ContextualType::EnclosingReturn => info
                    .parent
                    .and_then(|parent| self.enclosing_expected_type(db, parent, depth))
                    .and_then(|expected| db.call_return_type(expected)),
            }
        };

        let ty = contextual.unwrap_or(info.inferred_return);
        trace!(function = id.0, return_type = ty.0, contextual = contextual.is_some(), "resolved return type");
        Some(ReturnType {
            ty,
            declared: false,
        })
    }

    /// The type a value returned from `parent` is expected to have.
    fn enclosing_expected_type(
        &self,
        db: &dyn TypeOracle,
        parent: FunctionId,
        depth: u32,
    ) -> Option<TypeId> {
        let outer = self.resolve(db, parent, depth + 1)?;
        let is_async = self.get(parent).is_some_and(|info| info.is_async);
        Some(if is_async {
            db.awaited_type(outer.ty)
        } else {
            outer.ty
        })
    }
}

#[cfg(test)]
#[path = "../tests/functions_tests.rs"]
mod tests;
