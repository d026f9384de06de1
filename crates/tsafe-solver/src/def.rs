//! Named type definitions (interfaces and classes).
//!
//! A `TypeData::Application` refers to a definition by `DefId` plus type
//! arguments. Definitions are registered before their members so recursive
//! types such as `interface Node { next: Node }` can refer to themselves.

use std::sync::atomic::{AtomicU32, Ordering};

use bitflags::bitflags;
use dashmap::DashMap;
use tracing::trace;

use crate::types::{PropertyInfo, TypeId};

// =============================================================================
// DefId
// =============================================================================

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// `interface Point { x: number; y: number }`
    Interface,
    /// `class User { name: string }`
    Class,
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DefFlags: u8 {
        /// Instances are awaitable; the first type argument is the resolved value.
        const PROMISE_LIKE = 1 << 0;
        /// The wide global `Function` interface.
        const GLOBAL_FUNCTION = 1 << 1;
        /// The universal `Object` base interface.
        const OBJECT_BASE = 1 << 2;
        /// Supplies members for array and tuple types.
        const ARRAY_BASE = 1 << 3;
    }
}

// =============================================================================
// DefinitionInfo
// =============================================================================

#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,
    pub name: String,
    /// `TypeData::TypeParameter` handles, substituted by the application's
    /// arguments when members are read.
    pub type_params: Vec<TypeId>,
    pub properties: Vec<PropertyInfo>,
    /// Base types from `extends` clauses, expressed in terms of `type_params`.
    pub heritage: Vec<TypeId>,
    pub flags: DefFlags,
}

impl DefinitionInfo {
    pub fn interface(name: impl Into<String>, type_params: Vec<TypeId>) -> Self {
        Self {
            kind: DefKind::Interface,
            name: name.into(),
            type_params,
            properties: Vec::new(),
            heritage: Vec::new(),
            flags: DefFlags::empty(),
        }
    }

    pub fn class(name: impl Into<String>, type_params: Vec<TypeId>) -> Self {
        Self {
            kind: DefKind::Class,
            ..Self::interface(name, type_params)
        }
    }

    pub fn with_properties(mut self, properties: Vec<PropertyInfo>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_heritage(mut self, heritage: Vec<TypeId>) -> Self {
        self.heritage = heritage;
        self
    }

    pub const fn with_flags(mut self, flags: DefFlags) -> Self {
        self.flags = flags;
        self
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Thread-safe storage for definitions.
pub struct DefinitionStore {
    definitions: DashMap<DefId, DefinitionInfo>,
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self {
            definitions: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// Register a new definition and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = DefId(self.next_id.fetch_add(1, Ordering::SeqCst));
        trace!(def_id = id.0, name = %info.name, kind = ?info.kind, "DefinitionStore::register");
        self.definitions.insert(id, info);
        id
    }

    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn name(&self, id: DefId) -> Option<String> {
        self.definitions.get(&id).map(|r| r.name.clone())
    }

    pub fn flags(&self, id: DefId) -> DefFlags {
        self.definitions
            .get(&id)
            .map(|r| r.flags)
            .unwrap_or_default()
    }

    /// Replace the members of an already registered definition.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn set_properties(&self, id: DefId, properties: Vec<PropertyInfo>) -> bool {
        match self.definitions.get_mut(&id) {
            Some(mut entry) => {
                entry.properties = properties;
                true
            }
            None => false,
        }
    }

    pub fn set_heritage(&self, id: DefId, heritage: Vec<TypeId>) -> bool {
        match self.definitions.get_mut(&id) {
            Some(mut entry) => {
                entry.heritage = heritage;
                true
            }
            None => false,
        }
    }

    /// Find the first definition registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<DefId> {
        self.definitions
            .iter()
            .filter(|entry| entry.value().name == name)
            .map(|entry| *entry.key())
            .min()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
