//! Structural assignability for the reference oracle.
//!
//! This is the plain "is `source` assignable to `target`" relation the host
//! checker would answer. `any` and `error` relate both ways; the comparators
//! decide whether those escapes are unsafe.

use tracing::trace;

use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{IntrinsicKind, LiteralValue, PropertyInfo, TypeData, TypeId};

pub struct AssignabilityChecker<'a> {
    interner: &'a TypeInterner,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> AssignabilityChecker<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self {
            interner,
            guard: RecursionGuard::with_profile(RecursionProfile::Assignability),
        }
    }

    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        match self.guard.enter((source, target)) {
            RecursionResult::Entered => {
                let result = self.check(source, target);
                self.guard.leave((source, target));
                trace!(source = source.0, target = target.0, result, "is_assignable");
                result
            }
            // Coinductive: a pair already under comparison is assumed related.
            RecursionResult::Cycle => true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => false,
        }
    }

    fn check(&mut self, source: TypeId, target: TypeId) -> bool {
        let db = self.interner;

        match target {
            TypeId::ANY | TypeId::UNKNOWN | TypeId::ERROR => return true,
            _ => {}
        }
        match source {
            TypeId::ANY | TypeId::ERROR => return target != TypeId::NEVER,
            TypeId::NEVER => return true,
            _ => {}
        }
        if target == TypeId::NEVER {
            return false;
        }

        let (Some(source_data), Some(target_data)) = (db.lookup(source), db.lookup(target)) else {
            return false;
        };

        // Unions on the source side distribute first so that `A | B` to
        // `A | B | C` is checked member by member.
        if let TypeData::Union(list) = source_data {
            return db
                .type_list(list)
                .iter()
                .all(|&member| self.is_assignable(member, target));
        }
        if let TypeData::Union(list) = target_data {
            return db
                .type_list(list)
                .iter()
                .any(|&member| self.is_assignable(source, member));
        }
        if let TypeData::Intersection(list) = target_data {
            return db
                .type_list(list)
                .iter()
                .all(|&member| self.is_assignable(source, member));
        }
        if let TypeData::Intersection(list) = &source_data {
            let members = db.type_list(*list);
            if members.iter().any(|&member| self.is_assignable(member, target)) {
                return true;
            }
            // Members may jointly provide the target's properties.
            return self.is_object_like_target(&target_data)
                && self.properties_related(source, target);
        }
        if let TypeData::TypeParameter(info) = &source_data {
            let constraint = info.constraint.unwrap_or(TypeId::UNKNOWN);
            return self.is_assignable(constraint, target);
        }
        if let TypeData::TypeParameter(_) = target_data {
            return false;
        }

        match (&source_data, &target_data) {
            (TypeData::Literal(lit), TypeData::Intrinsic(kind)) => {
                return lit.base_type() == intrinsic_id(*kind);
            }
            (TypeData::Literal(LiteralValue::Boolean(_)), _) => return false,
            (TypeData::Intrinsic(IntrinsicKind::Undefined), TypeData::Intrinsic(IntrinsicKind::Void)) => {
                return true;
            }
            (TypeData::Intrinsic(_), TypeData::Intrinsic(IntrinsicKind::Object))
            | (TypeData::Literal(_), TypeData::Intrinsic(IntrinsicKind::Object)) => return false,
            (_, TypeData::Intrinsic(IntrinsicKind::Object)) => return true,
            (_, TypeData::Intrinsic(_)) | (_, TypeData::Literal(_)) => return false,
            _ => {}
        }

        match (&source_data, &target_data) {
            (TypeData::Array(s), TypeData::Array(t))
            | (TypeData::Array(s), TypeData::ReadonlyArray(t))
            | (TypeData::ReadonlyArray(s), TypeData::ReadonlyArray(t)) => {
                return self.is_assignable(*s, *t);
            }
            (TypeData::ReadonlyArray(_), TypeData::Array(_)) => return false,
            (TypeData::Tuple(s), TypeData::Tuple(t)) => {
                let (s, t) = (db.type_list(*s), db.type_list(*t));
                return s.len() == t.len()
                    && s.iter().zip(t.iter()).all(|(&a, &b)| self.is_assignable(a, b));
            }
            (TypeData::Tuple(s), TypeData::Array(t)) | (TypeData::Tuple(s), TypeData::ReadonlyArray(t)) => {
                let elements = db.type_list(*s);
                return elements.iter().all(|&e| self.is_assignable(e, *t));
            }
            (TypeData::Array(_) | TypeData::ReadonlyArray(_), TypeData::Tuple(_)) => return false,
            (TypeData::Function(s), TypeData::Function(t)) => {
                let (Some(s), Some(t)) = (db.function_shape(*s), db.function_shape(*t)) else {
                    return false;
                };
                let required = s.params.iter().filter(|p| !p.optional).count();
                if required > t.params.len() {
                    return false;
                }
                // Parameters are compared bivariantly.
                let params_ok = s.params.iter().zip(t.params.iter()).all(|(sp, tp)| {
                    self.is_assignable(tp.type_id, sp.type_id)
                        || self.is_assignable(sp.type_id, tp.type_id)
                });
                return params_ok
                    && (t.return_type == TypeId::VOID
                        || self.is_assignable(s.return_type, t.return_type));
            }
            (TypeData::Application(_), TypeData::Function(_)) => {
                // The wide `Function` interface carries no call signature.
                return false;
            }
            (TypeData::Application(s), TypeData::Application(t)) => {
                let (Some(s), Some(t)) = (db.application(*s), db.application(*t)) else {
                    return false;
                };
                if s.base == t.base {
                    let pairs = s.args.len().max(t.args.len());
                    return (0..pairs).all(|i| {
                        let a = s.args.get(i).copied().unwrap_or(TypeId::UNKNOWN);
                        let b = t.args.get(i).copied().unwrap_or(TypeId::UNKNOWN);
                        self.is_assignable(a, b)
                    });
                }
                if self.inherits_from(source, target) {
                    return true;
                }
            }
            _ => {}
        }

        if let TypeData::Application(app_id) = &target_data {
            if let Some(app) = db.application(*app_id) {
                if app.base == db.lib().function {
                    return matches!(source_data, TypeData::Function(_));
                }
                if app.base == db.lib().object {
                    return true;
                }
            }
        }

        if self.is_object_like_target(&target_data) {
            return self.properties_related(source, target);
        }
        false
    }

    fn is_object_like_target(&self, target: &TypeData) -> bool {
        matches!(target, TypeData::Object(_) | TypeData::Application(_))
    }

    /// Whether a named base in `source`'s `extends` chain is assignable to
    /// `target`.
    fn inherits_from(&mut self, source: TypeId, target: TypeId) -> bool {
        let db = self.interner;
        let Some(TypeData::Application(app_id)) = db.lookup(source) else {
            return false;
        };
        let Some(app) = db.application(app_id) else {
            return false;
        };
        let Some(info) = db.definitions().get(app.base) else {
            return false;
        };
        let subst = db.substitution_for(&info, &app.args);
        info.heritage.iter().any(|&base| {
            let base = db.instantiate(base, &subst);
            self.is_assignable(base, target)
        })
    }

    /// Structural width subtyping on declared properties.
    fn properties_related(&mut self, source: TypeId, target: TypeId) -> bool {
        let db = self.interner;
        let target_props: Vec<PropertyInfo> = db.declared_properties(target);
        for target_prop in &target_props {
            match db.apparent_property(source, &target_prop.name) {
                Some(source_prop) => {
                    if source_prop.optional && !target_prop.optional {
                        return false;
                    }
                    let target_type = if target_prop.optional {
                        db.union2(target_prop.type_id, TypeId::UNDEFINED)
                    } else {
                        target_prop.type_id
                    };
                    if !self.is_assignable(source_prop.type_id, target_type) {
                        return false;
                    }
                }
                None if target_prop.optional => {}
                None => return false,
            }
        }
        // Nullish values have no properties at all.
        db.has_object_apparent_type(source)
    }
}

const fn intrinsic_id(kind: IntrinsicKind) -> TypeId {
    match kind {
        IntrinsicKind::Any => TypeId::ANY,
        IntrinsicKind::Unknown => TypeId::UNKNOWN,
        IntrinsicKind::Error => TypeId::ERROR,
        IntrinsicKind::Undefined => TypeId::UNDEFINED,
        IntrinsicKind::Null => TypeId::NULL,
        IntrinsicKind::String => TypeId::STRING,
        IntrinsicKind::Number => TypeId::NUMBER,
        IntrinsicKind::Bigint => TypeId::BIGINT,
        IntrinsicKind::Boolean => TypeId::BOOLEAN,
        IntrinsicKind::Symbol => TypeId::SYMBOL,
        IntrinsicKind::Void => TypeId::VOID,
        IntrinsicKind::Never => TypeId::NEVER,
        IntrinsicKind::Object => TypeId::OBJECT,
    }
}

#[cfg(test)]
#[path = "../tests/relation_tests.rs"]
mod tests;
