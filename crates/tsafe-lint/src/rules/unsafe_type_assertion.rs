//! `no-unsafe-type-assertion`: type assertions that narrow a type or launder
//! `any`, `never` or `Function`.

use tsafe_solver::{AssertionChecker, CastVerdict, TypeFlags};

use super::{RuleContext, RuleMeta};
use crate::config::RuleLevel;
use crate::diagnostics::{messages, replace_suggestion};
use crate::syntax::Site;

pub const META: RuleMeta = RuleMeta {
    name: "no-unsafe-type-assertion",
    description: "Disallow type assertions that narrow a type",
    default_level: RuleLevel::Error,
};

pub fn check(cx: &mut RuleContext<'_>, site: &Site) {
    let Site::TypeAssertion {
        span,
        expression,
        annotation,
        ..
    } = site
    else {
        return;
    };
    let db = cx.db;

    let expression_type = db.base_constraint(expression.ty);
    let asserted_type = db.base_constraint(annotation.ty);
    let verdict = AssertionChecker::new(db, expression.node)
        .with_options(cx.options.assertion)
        .check(expression_type, asserted_type);

    match verdict {
        CastVerdict::Safe => {}
        CastVerdict::FromAny => cx.report(&messages::UNSAFE_OF_ANY_TYPE_ASSERTION, *span, &[]),
        CastVerdict::ToAny => {
            let mut diagnostic = cx.diagnostic(&messages::UNSAFE_TO_ANY_TYPE_ASSERTION, *span, &[]);
            // Only an outright `as any` can be rewritten without touching
            // the rest of the annotation.
            if db.type_flags(annotation.ty).contains(TypeFlags::ANY) {
                diagnostic = diagnostic.with_suggestion(replace_suggestion(
                    &messages::SUGGEST_UNKNOWN,
                    annotation.span,
                    "unknown",
                ));
            }
            cx.emit(diagnostic);
        }
        CastVerdict::FromNever => cx.report(&messages::UNSAFE_NEVER_TYPE_ASSERTION, *span, &[]),
        CastVerdict::ToFunction => {
            cx.report(&messages::UNSAFE_FUNCTION_TYPE_ASSERTION, *span, &[]);
        }
        CastVerdict::Narrowing => {
            let rendered = db.type_to_string(expression_type);
            cx.report(&messages::UNSAFE_TYPE_ASSERTION, *span, &[("type", &rendered)]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unsafe_type_assertion_tests.rs"]
mod tests;
