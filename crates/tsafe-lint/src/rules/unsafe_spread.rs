//! `no-unsafe-spread`: spreading `any` into array literals, object literals
//! and calls.

use tsafe_solver::{AnyType, AssignmentChecker, TypeFlags, UnsafeAssignment, discriminate_any_type};

use super::{RuleContext, RuleMeta};
use crate::config::RuleLevel;
use crate::diagnostics::messages;
use crate::syntax::{ExprKind, Site};

pub const META: RuleMeta = RuleMeta {
    name: "no-unsafe-spread",
    description: "Disallow spreading a value with type `any`",
    default_level: RuleLevel::Error,
};

pub fn check(cx: &mut RuleContext<'_>, site: &Site) {
    let Site::Spread {
        span,
        argument,
        receiver,
    } = site
    else {
        return;
    };
    let db = cx.db;
    let spread = db.base_constraint(argument.ty);
    let never_is_unsafe = !cx.options.assignment.allow_unsafe_never;

    let rendered = |any_type: AnyType| {
        if db.type_flags(spread).contains(TypeFlags::ERROR) {
            "error"
        } else {
            any_type.display()
        }
    };
    match discriminate_any_type(db, spread, argument.node, never_is_unsafe) {
        any_type @ (AnyType::Any | AnyType::Never) => {
            cx.report(&messages::UNSAFE_SPREAD, *span, &[("type", rendered(any_type))]);
            return;
        }
        any_type @ (AnyType::AnyArray | AnyType::NeverArray) => {
            cx.report(&messages::UNSAFE_ARRAY_SPREAD, *span, &[("type", rendered(any_type))]);
            return;
        }
        // Spreading a promise spreads its own properties, not its value.
        AnyType::PromiseAny | AnyType::PromiseNever | AnyType::Safe => {}
    }

    let Some(receiver) = *receiver else {
        return;
    };
    let unsafe_assignment = AssignmentChecker::new(db, argument.node)
        .with_options(cx.options.assignment)
        .is_unsafe_assignment(spread, receiver, argument.is(ExprKind::BareConstructorCall));
    if let Some(UnsafeAssignment { sender, receiver }) = unsafe_assignment {
        let sender = db.type_to_string(sender);
        let receiver = db.type_to_string(receiver);
        cx.report(
            &messages::UNSAFE_SPREAD_ASSIGNMENT,
            *span,
            &[("receiver", &receiver), ("sender", &sender)],
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unsafe_spread_tests.rs"]
mod tests;
