//! `no-unsafe-return`: returning `any` (or a container of it) from a function.

use tracing::debug;
use tsafe_solver::{
    AnyType, AssignmentChecker, NodeId, TypeFlags, TypeId, TypeOracle, UnsafeAssignment,
    discriminate_any_type,
};

use super::{RuleContext, RuleMeta};
use crate::config::RuleLevel;
use crate::diagnostics::messages;
use crate::functions::ReturnType;
use crate::syntax::{ExprKind, Site};

pub const META: RuleMeta = RuleMeta {
    name: "no-unsafe-return",
    description: "Disallow returning a value with type `any` from a function",
    default_level: RuleLevel::Error,
};

const OPT_OUT: TypeFlags = TypeFlags::ANY
    .union(TypeFlags::UNKNOWN)
    .union(TypeFlags::NEVER);

pub fn check(cx: &mut RuleContext<'_>, site: &Site) {
    let Site::Return {
        span,
        function,
        expression,
    } = site
    else {
        return;
    };
    // `[]` is typed `never[]` until something flows into it.
    if expression.is(ExprKind::EmptyArrayLiteral) {
        return;
    }

    let db = cx.db;
    let (Some(info), Some(return_type)) = (
        cx.functions.get(*function),
        cx.functions.return_type(db, *function),
    ) else {
        debug!(function = function.0, "return outside a registered function");
        return;
    };
    let returned = db.base_constraint(expression.ty);
    let location = expression.node;

    if is_explicit_opt_out(db, returned, return_type, info.is_async) {
        return;
    }

    let never_is_unsafe = !cx.options.assignment.allow_unsafe_never;
    let any_type = discriminate_any_type(db, returned, location, never_is_unsafe);
    if any_type != AnyType::Safe {
        if accepts_unknown(db, any_type, return_type.ty, location) {
            return;
        }
        // A sync function handing back a promise doesn't unwrap it.
        if matches!(any_type, AnyType::PromiseAny | AnyType::PromiseNever) && !info.is_async {
            return;
        }

        let returned_flags = db.type_flags(returned);
        let rendered = if returned_flags.contains(TypeFlags::ERROR) {
            "error"
        } else {
            any_type.display()
        };
        let message = if !cx.options.no_implicit_this
            && expression.is(ExprKind::This)
            && returned_flags.contains(TypeFlags::ANY)
        {
            &messages::UNSAFE_RETURN_THIS
        } else {
            &messages::UNSAFE_RETURN
        };
        cx.report(message, *span, &[("type", rendered)]);
        return;
    }

    let unsafe_assignment = AssignmentChecker::new(db, location)
        .with_options(cx.options.assignment)
        .is_unsafe_assignment(
            returned,
            return_type.ty,
            expression.is(ExprKind::BareConstructorCall),
        );
    if let Some(UnsafeAssignment { sender, receiver }) = unsafe_assignment {
        let sender = db.type_to_string(sender);
        let receiver = db.type_to_string(receiver);
        cx.report(
            &messages::UNSAFE_RETURN_ASSIGNMENT,
            *span,
            &[("receiver", &receiver), ("sender", &sender)],
        );
    }
}

/// An annotation that names the returned type exactly, or is `any`,
/// `unknown` or `never`, is taken as intentional.
fn is_explicit_opt_out(
    db: &dyn TypeOracle,
    returned: TypeId,
    return_type: ReturnType,
    is_async: bool,
) -> bool {
    if !return_type.declared {
        return false;
    }
    let declared = return_type.ty;
    if returned == declared || db.type_flags(declared).intersects(OPT_OUT) {
        return true;
    }
    if is_async {
        let awaited_declared = db.awaited_type(declared);
        let awaited_returned = db.awaited_type(returned);
        if awaited_returned == awaited_declared
            || db.type_flags(awaited_declared).intersects(OPT_OUT)
        {
            return true;
        }
    }
    false
}

/// `unknown`, `unknown[]` and `Promise<unknown>` receivers make callers
/// narrow before use, so `any` flowing into them is harmless.
fn accepts_unknown(db: &dyn TypeOracle, any_type: AnyType, receiver: TypeId, location: NodeId) -> bool {
    let is_unknown = |ty: TypeId| db.type_flags(ty).contains(TypeFlags::UNKNOWN);
    match any_type {
        AnyType::Any | AnyType::Never => is_unknown(receiver),
        AnyType::AnyArray | AnyType::NeverArray => {
            db.array_element_type(receiver).is_some_and(is_unknown)
        }
        AnyType::PromiseAny | AnyType::PromiseNever => {
            db.promised_type(receiver, location).is_some_and(is_unknown)
        }
        AnyType::Safe => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unsafe_return_tests.rs"]
mod tests;
