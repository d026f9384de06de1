//! The syntax sites the rules inspect.
//!
//! A host front end lowers its AST to these records: each carries the spans
//! to report at, the source text needed for messages, and the checked type of
//! every expression involved. Nothing here refers back to a tree.

use serde::{Deserialize, Serialize};
use tsafe_common::Span;
use tsafe_solver::{NodeId, TypeId};

/// Syntactic category of an expression, as far as the rules care.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExprKind {
    #[default]
    Other,
    /// A literal token (`"a"`, `1`, `true`, `null`, a regex).
    Literal,
    /// `[]` with no elements.
    EmptyArrayLiteral,
    This,
    /// `#field` on the left of `#field in obj`.
    PrivateIdentifier,
    /// `new Foo()` with neither arguments nor explicit type arguments.
    BareConstructorCall,
}

/// An expression together with its checked type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub node: NodeId,
    pub span: Span,
    pub ty: TypeId,
    /// Source text, used verbatim in messages.
    pub text: String,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(node: NodeId, span: Span, ty: TypeId, text: impl Into<String>) -> Self {
        Self {
            node,
            span,
            ty,
            text: text.into(),
            kind: ExprKind::Other,
        }
    }

    pub fn with_kind(mut self, kind: ExprKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn is(&self, kind: ExprKind) -> bool {
        self.kind == kind
    }
}

/// Index into a [`FunctionTable`](crate::functions::FunctionTable).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertionForm {
    /// `expr as T`
    As,
    /// `<T>expr`
    AngleBracket,
}

/// A written type, e.g. the `T` of `expr as T`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub span: Span,
    pub ty: TypeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcatOperator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "+=")]
    PlusAssign,
}

/// A place where one of the rules may report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Site {
    /// `expr as T` or `<T>expr`. `span` covers the whole assertion.
    TypeAssertion {
        span: Span,
        form: AssertionForm,
        expression: Expr,
        annotation: TypeAnnotation,
    },
    /// `return expr;`, or the expression body of an arrow function.
    Return {
        span: Span,
        function: FunctionId,
        expression: Expr,
    },
    /// `...argument` in an array literal, object literal or call. `receiver`
    /// is the type of the parameter or slot it flows into, when known.
    Spread {
        span: Span,
        argument: Expr,
        receiver: Option<TypeId>,
    },
    /// `left + right` or `left += right`.
    Concatenation {
        span: Span,
        operator: ConcatOperator,
        left: Expr,
        right: Expr,
    },
    /// `receiver.toString()`.
    ToStringCall { span: Span, receiver: Expr },
    /// `receiver.join(...)`. `span` and `text` cover the whole call.
    JoinCall {
        span: Span,
        text: String,
        receiver: Expr,
    },
    /// A template literal and its interpolated expressions.
    TemplateLiteral {
        span: Span,
        tagged: bool,
        expressions: Vec<Expr>,
    },
}

impl Site {
    pub const fn span(&self) -> Span {
        match self {
            Site::TypeAssertion { span, .. }
            | Site::Return { span, .. }
            | Site::Spread { span, .. }
            | Site::Concatenation { span, .. }
            | Site::ToStringCall { span, .. }
            | Site::JoinCall { span, .. }
            | Site::TemplateLiteral { span, .. } => *span,
        }
    }

    /// Short name for logging.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Site::TypeAssertion { .. } => "type-assertion",
            Site::Return { .. } => "return",
            Site::Spread { .. } => "spread",
            Site::Concatenation { .. } => "concatenation",
            Site::ToStringCall { .. } => "to-string-call",
            Site::JoinCall { .. } => "join-call",
            Site::TemplateLiteral { .. } => "template-literal",
        }
    }
}
