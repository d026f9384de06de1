//! The JSON request read by `tsafe check`.
//!
//! A request carries what a front end knows after type checking: a graph of
//! types, the functions that `return` sites belong to, and the sites
//! themselves. Types are written either as a name or as a one-key node:
//!
//! ```json
//! {
//!   "file": "input.ts",
//!   "types": { "StrOrNum": { "union": ["string", "number"] } },
//!   "sites": [{
//!     "kind": "typeAssertion",
//!     "span": { "start": 0, "end": 15 },
//!     "expression": { "span": { "start": 0, "end": 5 }, "type": "StrOrNum", "text": "value" },
//!     "annotation": { "span": { "start": 9, "end": 15 }, "type": "string" }
//!   }]
//! }
//! ```
//!
//! Names resolve to, in order: type parameters in scope, intrinsics
//! (`any`, `string`, `error`, ...), entries of `types`, then definitions
//! (the request's own first, then the built-in library).

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::debug;
use tsafe_common::Span;
use tsafe_lint::{
    AssertionForm, ConcatOperator, ContextualType, Expr, ExprKind, FunctionId, FunctionInfo,
    FunctionTable, Site, TypeAnnotation,
};
use tsafe_solver::{
    DefId, DefinitionInfo, NodeId, ParamInfo, PropertyInfo, TypeId, TypeInterner,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Request {
    /// File name used in reports.
    #[serde(default)]
    pub file: Option<String>,
    /// Text of `file`, for snippets.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub definitions: Vec<DefinitionDecl>,
    #[serde(default)]
    pub types: IndexMap<String, TypeExpr>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub sites: Vec<SiteDecl>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Name(String),
    Node(Box<TypeNode>),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeNode {
    Literal(LiteralDecl),
    /// Digits of a bigint literal, without the trailing `n`.
    Bigint(String),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Array(TypeExpr),
    ReadonlyArray(TypeExpr),
    Tuple(Vec<TypeExpr>),
    Object(Vec<PropertyDecl>),
    /// A fresh object literal type.
    ObjectLiteral(Vec<PropertyDecl>),
    Function(FunctionTypeDecl),
    Reference(ReferenceDecl),
    Promise(TypeExpr),
    TypeParam(TypeParamDecl),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LiteralDecl {
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FunctionTypeDecl {
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    pub returns: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReferenceDecl {
    pub name: String,
    #[serde(default)]
    pub args: Vec<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeParamDecl {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<TypeExpr>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefinitionKind {
    #[default]
    Interface,
    Class,
}

/// A named interface or class. Members may refer to any definition in the
/// request, including the one being declared.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefinitionDecl {
    pub name: String,
    #[serde(default)]
    pub kind: DefinitionKind,
    /// Constraints may refer to earlier parameters and earlier definitions.
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub extends: Vec<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextualDecl {
    EnclosingReturn,
    Type(TypeExpr),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FunctionDecl {
    pub id: u32,
    /// Defaults to `id`.
    #[serde(default)]
    pub node: Option<u32>,
    #[serde(default)]
    pub declared_return: Option<TypeExpr>,
    #[serde(default)]
    pub contextual: Option<ContextualDecl>,
    pub inferred_return: TypeExpr,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub parent: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExprDecl {
    /// Defaults to `span.start`.
    #[serde(default)]
    pub node: Option<u32>,
    pub span: Span,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnnotationDecl {
    pub span: Span,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SiteDecl {
    TypeAssertion {
        span: Span,
        #[serde(default = "default_form")]
        form: AssertionForm,
        expression: ExprDecl,
        annotation: AnnotationDecl,
    },
    Return {
        span: Span,
        function: u32,
        expression: ExprDecl,
    },
    Spread {
        span: Span,
        argument: ExprDecl,
        #[serde(default)]
        receiver: Option<TypeExpr>,
    },
    Concatenation {
        span: Span,
        #[serde(default = "default_operator")]
        operator: ConcatOperator,
        left: ExprDecl,
        right: ExprDecl,
    },
    ToStringCall {
        span: Span,
        receiver: ExprDecl,
    },
    JoinCall {
        span: Span,
        #[serde(default)]
        text: String,
        receiver: ExprDecl,
    },
    TemplateLiteral {
        span: Span,
        #[serde(default)]
        tagged: bool,
        expressions: Vec<ExprDecl>,
    },
}

const fn default_form() -> AssertionForm {
    AssertionForm::As
}

const fn default_operator() -> ConcatOperator {
    ConcatOperator::Plus
}

/// A request lowered onto a [`TypeInterner`].
#[derive(Debug)]
pub struct ResolvedRequest {
    pub functions: FunctionTable,
    pub sites: Vec<Site>,
}

impl Request {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("malformed request")
    }

    /// Intern every type the request mentions into `db`.
    pub fn resolve(&self, db: &TypeInterner) -> Result<ResolvedRequest> {
        let mut resolver = Resolver::new(db, &self.types);
        resolver.declare_definitions(&self.definitions)?;
        let functions = resolver.function_table(&self.functions)?;
        let sites = self
            .sites
            .iter()
            .enumerate()
            .map(|(index, site)| {
                resolver
                    .site(site, &functions)
                    .with_context(|| format!("in site #{index}"))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            definitions = self.definitions.len(),
            functions = functions.len(),
            sites = sites.len(),
            types = db.type_count(),
            "resolved request"
        );
        Ok(ResolvedRequest { functions, sites })
    }
}

struct Resolver<'a> {
    db: &'a TypeInterner,
    aliases: &'a IndexMap<String, TypeExpr>,
    resolved: FxHashMap<String, TypeId>,
    in_progress: FxHashSet<String>,
    definitions: FxHashMap<String, DefId>,
    /// Type parameters visible by name.
    scope: FxHashMap<String, TypeId>,
}

impl<'a> Resolver<'a> {
    fn new(db: &'a TypeInterner, aliases: &'a IndexMap<String, TypeExpr>) -> Self {
        Self {
            db,
            aliases,
            resolved: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            definitions: FxHashMap::default(),
            scope: FxHashMap::default(),
        }
    }

    /// Register every definition first so members can refer to each other,
    /// then fill in members and bases.
    fn declare_definitions(&mut self, decls: &[DefinitionDecl]) -> Result<()> {
        let mut declared = Vec::with_capacity(decls.len());
        for decl in decls {
            if self.definitions.contains_key(&decl.name) {
                bail!("definition `{}` is declared twice", decl.name);
            }
            let type_params = self
                .scoped_type_params(&decl.type_params)
                .with_context(|| format!("in type parameters of `{}`", decl.name));
            self.scope.clear();
            let type_params = type_params?;
            let info = match decl.kind {
                DefinitionKind::Interface => {
                    DefinitionInfo::interface(decl.name.as_str(), type_params.clone())
                }
                DefinitionKind::Class => {
                    DefinitionInfo::class(decl.name.as_str(), type_params.clone())
                }
            };
            let def = self.db.register_definition(info);
            self.definitions.insert(decl.name.clone(), def);
            declared.push((def, type_params));
        }

        for (decl, (def, type_params)) in decls.iter().zip(declared) {
            self.scope = decl
                .type_params
                .iter()
                .map(|param| param.name.clone())
                .zip(type_params)
                .collect();
            let members = self.members(decl);
            self.scope.clear();
            let (properties, heritage) =
                members.with_context(|| format!("in definition `{}`", decl.name))?;
            let store = self.db.definitions();
            store.set_properties(def, properties);
            store.set_heritage(def, heritage);
        }
        Ok(())
    }

    /// Each parameter joins the scope as soon as it is created.
    fn scoped_type_params(&mut self, params: &[TypeParamDecl]) -> Result<Vec<TypeId>> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            let ty = self.type_param(param)?;
            self.scope.insert(param.name.clone(), ty);
            out.push(ty);
        }
        Ok(out)
    }

    fn members(&mut self, decl: &DefinitionDecl) -> Result<(Vec<PropertyInfo>, Vec<TypeId>)> {
        let properties = self.properties(&decl.properties)?;
        let heritage = self.types(&decl.extends)?;
        Ok((properties, heritage))
    }

    fn function_table(&mut self, decls: &[FunctionDecl]) -> Result<FunctionTable> {
        let ids: FxHashSet<u32> = decls.iter().map(|decl| decl.id).collect();
        let mut table = FunctionTable::new();
        for decl in decls {
            let info = self
                .function(decl, &ids)
                .with_context(|| format!("in function {}", decl.id))?;
            if table.insert(FunctionId(decl.id), info).is_some() {
                bail!("function {} is declared twice", decl.id);
            }
        }
        Ok(table)
    }

    fn function(&mut self, decl: &FunctionDecl, ids: &FxHashSet<u32>) -> Result<FunctionInfo> {
        let inferred = self.resolve(&decl.inferred_return)?;
        let mut info = FunctionInfo::new(NodeId(decl.node.unwrap_or(decl.id)), inferred);
        if let Some(declared) = &decl.declared_return {
            info = info.declared(self.resolve(declared)?);
        }
        match &decl.contextual {
            None => {}
            Some(ContextualDecl::EnclosingReturn) => {
                info = info.contextual(ContextualType::EnclosingReturn);
            }
            Some(ContextualDecl::Type(expected)) => {
                info = info.contextual(ContextualType::Type(self.resolve(expected)?));
            }
        }
        if decl.is_async {
            info = info.asynchronous();
        }
        if let Some(parent) = decl.parent {
            if !ids.contains(&parent) {
                bail!("parent function {parent} is not declared");
            }
            info = info.nested_in(FunctionId(parent));
        }
        Ok(info)
    }

    fn site(&mut self, decl: &SiteDecl, functions: &FunctionTable) -> Result<Site> {
        Ok(match decl {
            SiteDecl::TypeAssertion {
                span,
                form,
                expression,
                annotation,
            } => Site::TypeAssertion {
                span: *span,
                form: *form,
                expression: self.expr(expression)?,
                annotation: TypeAnnotation {
                    span: annotation.span,
                    ty: self.resolve(&annotation.ty)?,
                },
            },
            SiteDecl::Return {
                span,
                function,
                expression,
            } => {
                let function = FunctionId(*function);
                if functions.get(function).is_none() {
                    bail!("return belongs to undeclared function {}", function.0);
                }
                Site::Return {
                    span: *span,
                    function,
                    expression: self.expr(expression)?,
                }
            }
            SiteDecl::Spread {
                span,
                argument,
                receiver,
            } => Site::Spread {
                span: *span,
                argument: self.expr(argument)?,
                receiver: receiver
                    .as_ref()
                    .map(|receiver| self.resolve(receiver))
                    .transpose()?,
            },
            SiteDecl::Concatenation {
                span,
                operator,
                left,
                right,
            } => Site::Concatenation {
                span: *span,
                operator: *operator,
                left: self.expr(left)?,
                right: self.expr(right)?,
            },
            SiteDecl::ToStringCall { span, receiver } => Site::ToStringCall {
                span: *span,
                receiver: self.expr(receiver)?,
            },
            SiteDecl::JoinCall {
                span,
                text,
                receiver,
            } => Site::JoinCall {
                span: *span,
                text: text.clone(),
                receiver: self.expr(receiver)?,
            },
            SiteDecl::TemplateLiteral {
                span,
                tagged,
                expressions,
            } => Site::TemplateLiteral {
                span: *span,
                tagged: *tagged,
                expressions: expressions
                    .iter()
                    .map(|expression| self.expr(expression))
                    .collect::<Result<_>>()?,
            },
        })
    }

    fn expr(&mut self, decl: &ExprDecl) -> Result<Expr> {
        let ty = self
            .resolve(&decl.ty)
            .with_context(|| format!("in expression `{}`", decl.text))?;
        let node = NodeId(decl.node.unwrap_or(decl.span.start));
        Ok(Expr::new(node, decl.span, ty, decl.text.as_str()).with_kind(decl.kind))
    }

    fn resolve(&mut self, expr: &TypeExpr) -> Result<TypeId> {
        match expr {
            TypeExpr::Name(name) => self.named(name),
            TypeExpr::Node(node) => self.node(node),
        }
    }

    fn types(&mut self, exprs: &[TypeExpr]) -> Result<Vec<TypeId>> {
        exprs.iter().map(|expr| self.resolve(expr)).collect()
    }

    fn named(&mut self, name: &str) -> Result<TypeId> {
        if let Some(&ty) = self.scope.get(name) {
            return Ok(ty);
        }
        if let Some(ty) = intrinsic(name) {
            return Ok(ty);
        }
        if let Some(&ty) = self.resolved.get(name) {
            return Ok(ty);
        }
        let aliases = self.aliases;
        if let Some(expr) = aliases.get(name) {
            if !self.in_progress.insert(name.to_string()) {
                bail!("type `{name}` refers to itself; declare it as a definition instead");
            }
            // Aliases are resolved at the top level, whatever scope asked.
            let scope = std::mem::take(&mut self.scope);
            let result = self.resolve(expr);
            self.scope = scope;
            self.in_progress.remove(name);
            let ty = result.with_context(|| format!("in type `{name}`"))?;
            self.resolved.insert(name.to_string(), ty);
            return Ok(ty);
        }
        if self.definition(name).is_some() {
            return self.reference(name, &[]);
        }
        bail!("unknown type `{name}`")
    }

    fn node(&mut self, node: &TypeNode) -> Result<TypeId> {
        let db = self.db;
        Ok(match node {
            TypeNode::Literal(LiteralDecl::Bool(true)) => TypeId::BOOLEAN_TRUE,
            TypeNode::Literal(LiteralDecl::Bool(false)) => TypeId::BOOLEAN_FALSE,
            TypeNode::Literal(LiteralDecl::Number(value)) => db.literal_number(*value),
            TypeNode::Literal(LiteralDecl::String(value)) => db.literal_string(value),
            TypeNode::Bigint(digits) => db.literal_bigint(digits),
            TypeNode::Union(members) => db.union(self.types(members)?),
            TypeNode::Intersection(members) => db.intersection(self.types(members)?),
            TypeNode::Array(element) => db.array(self.resolve(element)?),
            TypeNode::ReadonlyArray(element) => db.readonly_array(self.resolve(element)?),
            TypeNode::Tuple(elements) => db.tuple(self.types(elements)?),
            TypeNode::Object(properties) => db.object(self.properties(properties)?),
            TypeNode::ObjectLiteral(properties) => {
                db.object_literal(self.properties(properties)?)
            }
            TypeNode::Function(function) => {
                let params = function
                    .params
                    .iter()
                    .map(|param| {
                        Ok(ParamInfo {
                            name: param.name.clone(),
                            type_id: self.resolve(&param.ty)?,
                            optional: param.optional,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                db.function(params, self.resolve(&function.returns)?)
            }
            TypeNode::Reference(reference) => self.reference(&reference.name, &reference.args)?,
            TypeNode::Promise(value) => db.promise(self.resolve(value)?),
            TypeNode::TypeParam(param) => self.type_param(param)?,
        })
    }

    fn properties(&mut self, decls: &[PropertyDecl]) -> Result<Vec<PropertyInfo>> {
        decls
            .iter()
            .map(|decl| {
                let ty = self
                    .resolve(&decl.ty)
                    .with_context(|| format!("in property `{}`", decl.name))?;
                let mut property = if decl.optional {
                    PropertyInfo::opt(decl.name.as_str(), ty)
                } else {
                    PropertyInfo::new(decl.name.as_str(), ty)
                };
                if decl.readonly {
                    property = property.readonly();
                }
                Ok(property)
            })
            .collect()
    }

    fn type_param(&mut self, decl: &TypeParamDecl) -> Result<TypeId> {
        let constraint = decl
            .constraint
            .as_ref()
            .map(|constraint| self.resolve(constraint))
            .transpose()?;
        Ok(self.db.type_param(&decl.name, constraint))
    }

    fn definition(&self, name: &str) -> Option<DefId> {
        self.definitions
            .get(name)
            .copied()
            .or_else(|| self.db.definitions().find_by_name(name))
    }

    fn reference(&mut self, name: &str, args: &[TypeExpr]) -> Result<TypeId> {
        let def = self
            .definition(name)
            .ok_or_else(|| anyhow!("unknown definition `{name}`"))?;
        let expected = self
            .db
            .definitions()
            .get(def)
            .map_or(0, |info| info.type_params.len());
        if expected != args.len() {
            bail!(
                "`{name}` expects {expected} type argument(s), got {}",
                args.len()
            );
        }
        let args = self.types(args)?;
        Ok(self.db.reference(def, args))
    }
}

fn intrinsic(name: &str) -> Option<TypeId> {
    Some(match name {
        "any" => TypeId::ANY,
        "unknown" => TypeId::UNKNOWN,
        "error" => TypeId::ERROR,
        "undefined" => TypeId::UNDEFINED,
        "null" => TypeId::NULL,
        "string" => TypeId::STRING,
        "number" => TypeId::NUMBER,
        "bigint" => TypeId::BIGINT,
        "false" => TypeId::BOOLEAN_FALSE,
        "true" => TypeId::BOOLEAN_TRUE,
        "boolean" => TypeId::BOOLEAN,
        "symbol" => TypeId::SYMBOL,
        "void" => TypeId::VOID,
        "never" => TypeId::NEVER,
        "object" => TypeId::OBJECT,
        _ => return None,
    })
}

#[cfg(test)]
#[path = "../tests/request_tests.rs"]
mod tests;
