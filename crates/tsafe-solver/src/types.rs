//! Type representation for the reference oracle.
//!
//! Types are interned: a `TypeId` is a `u32` handle and two handles are equal
//! exactly when the structures they name are equal. Composite payloads
//! (member lists, object shapes, function shapes, applications) live in their
//! own interners and are referenced by typed ids.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::def::DefId;

// =============================================================================
// TypeId
// =============================================================================

/// Interned type handle.
///
/// Intrinsic types are pre-interned at fixed indices. Their order mirrors the
/// creation order of the host checker so unions sort the way it prints them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    /// Result of a failed resolution. Behaves like `any` in assignability.
    pub const ERROR: TypeId = TypeId(2);
    pub const UNDEFINED: TypeId = TypeId(3);
    pub const NULL: TypeId = TypeId(4);
    pub const STRING: TypeId = TypeId(5);
    pub const NUMBER: TypeId = TypeId(6);
    pub const BIGINT: TypeId = TypeId(7);
    pub const BOOLEAN_FALSE: TypeId = TypeId(8);
    pub const BOOLEAN_TRUE: TypeId = TypeId(9);
    pub const BOOLEAN: TypeId = TypeId(10);
    pub const SYMBOL: TypeId = TypeId(11);
    pub const VOID: TypeId = TypeId(12);
    pub const NEVER: TypeId = TypeId(13);
    /// The non-primitive `object` type.
    pub const OBJECT: TypeId = TypeId(14);

    /// First index handed out for user-constructed types.
    pub const FIRST_USER: u32 = 15;

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ANY => write!(f, "TypeId::ANY"),
            Self::UNKNOWN => write!(f, "TypeId::UNKNOWN"),
            Self::ERROR => write!(f, "TypeId::ERROR"),
            Self::UNDEFINED => write!(f, "TypeId::UNDEFINED"),
            Self::NULL => write!(f, "TypeId::NULL"),
            Self::STRING => write!(f, "TypeId::STRING"),
            Self::NUMBER => write!(f, "TypeId::NUMBER"),
            Self::BIGINT => write!(f, "TypeId::BIGINT"),
            Self::BOOLEAN_FALSE => write!(f, "TypeId::BOOLEAN_FALSE"),
            Self::BOOLEAN_TRUE => write!(f, "TypeId::BOOLEAN_TRUE"),
            Self::BOOLEAN => write!(f, "TypeId::BOOLEAN"),
            Self::SYMBOL => write!(f, "TypeId::SYMBOL"),
            Self::VOID => write!(f, "TypeId::VOID"),
            Self::NEVER => write!(f, "TypeId::NEVER"),
            Self::OBJECT => write!(f, "TypeId::OBJECT"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);
    };
}

interned_id!(
    /// Interned list of member/element types.
    TypeListId
);
interned_id!(
    /// Interned object shape.
    ObjectShapeId
);
interned_id!(
    /// Interned function signature.
    FunctionShapeId
);
interned_id!(
    /// Interned generic application `Def<Args>`.
    TypeApplicationId
);

// =============================================================================
// TypeData
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Error,
    Undefined,
    Null,
    String,
    Number,
    Bigint,
    Boolean,
    Symbol,
    Void,
    Never,
    Object,
}

impl IntrinsicKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Error => "error",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::String => "string",
            Self::Number => "number",
            Self::Bigint => "bigint",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Void => "void",
            Self::Never => "never",
            Self::Object => "object",
        }
    }
}

/// `f64` wrapper with total equality and hashing on the bit pattern.
#[derive(Copy, Clone, Debug)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(String),
    Number(OrderedFloat),
    /// Digits without the trailing `n`.
    BigInt(String),
    Boolean(bool),
}

impl LiteralValue {
    /// The primitive a literal widens to.
    pub const fn base_type(&self) -> TypeId {
        match self {
            Self::String(_) => TypeId::STRING,
            Self::Number(_) => TypeId::NUMBER,
            Self::BigInt(_) => TypeId::BIGINT,
            Self::Boolean(_) => TypeId::BOOLEAN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: String,
    pub constraint: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    Union(TypeListId),
    Intersection(TypeListId),
    Array(TypeId),
    ReadonlyArray(TypeId),
    Tuple(TypeListId),
    Object(ObjectShapeId),
    Function(FunctionShapeId),
    Application(TypeApplicationId),
    TypeParameter(TypeParamInfo),
}

// =============================================================================
// Object shapes
// =============================================================================

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Type of an anonymous object literal expression; widened before
        /// assignability checks.
        const OBJECT_LITERAL = 1 << 0;
    }
}

/// Where a property was declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberOrigin {
    /// Declared by the type itself or one of its own base interfaces.
    Declared,
    /// Inherited from the universal `Object` base interface.
    ObjectBase,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    pub readonly: bool,
    pub origin: MemberOrigin,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            optional: false,
            readonly: false,
            origin: MemberOrigin::Declared,
        }
    }

    pub fn opt(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            optional: true,
            ..Self::new(name, type_id)
        }
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub(crate) fn with_origin(mut self, origin: MemberOrigin) -> Self {
        self.origin = origin;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub flags: ObjectFlags,
    pub properties: Vec<PropertyInfo>,
}

impl ObjectShape {
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}

// =============================================================================
// Functions and applications
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            optional: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

/// A reference to a (possibly generic) named definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication {
    pub base: DefId,
    pub args: Vec<TypeId>,
}
