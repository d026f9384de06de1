//! `no-base-to-string`: values that stringify as `[object Object]`.
//!
//! Checked where a value is implicitly or explicitly converted to text:
//! string concatenation, `toString()` calls, array `join()` and untagged
//! template literals. Tagged templates hand the raw
//! values to the tag and are left alone.

use tsafe_common::Span;
use tsafe_solver::{Certainty, ToStringClassifier};

use super::{RuleContext, RuleMeta};
use crate::config::RuleLevel;
use crate::diagnostics::messages;
use crate::syntax::{Expr, ExprKind, Site};

pub const META: RuleMeta = RuleMeta {
    name: "no-base-to-string",
    description: "Require stringified values to provide a useful string representation",
    default_level: RuleLevel::Error,
};

pub fn check(cx: &mut RuleContext<'_>, site: &Site) {
    match site {
        Site::Concatenation { left, right, .. } => {
            let db = cx.db;
            if db.type_name(left.ty) == "string" {
                check_expression(cx, right);
            } else if db.type_name(right.ty) == "string" && !left.is(ExprKind::PrivateIdentifier) {
                check_expression(cx, left);
            }
        }
        Site::ToStringCall { receiver, .. } => check_expression(cx, receiver),
        Site::JoinCall {
            span,
            text,
            receiver,
        } => check_join(cx, *span, text, receiver),
        Site::TemplateLiteral {
            tagged: false,
            expressions,
            ..
        } => {
            for expression in expressions {
                check_expression(cx, expression);
            }
        }
        _ => {}
    }
}

fn check_expression(cx: &mut RuleContext<'_>, expression: &Expr) {
    if expression.is(ExprKind::Literal) {
        return;
    }
    let certainty =
        ToStringClassifier::new(cx.db, &cx.options.ignored_type_names).classify(expression.ty);
    report(cx, expression.span, &expression.text, certainty);
}

/// `join` stringifies the elements, not the array.
fn check_join(cx: &mut RuleContext<'_>, span: Span, text: &str, receiver: &Expr) {
    let db = cx.db;
    let mut classifier = ToStringClassifier::new(db, &cx.options.ignored_type_names);
    let certainty = if let Some(element) = db.array_element_type(receiver.ty) {
        classifier.classify(element)
    } else if let Some(slots) = db.tuple_element_types(receiver.ty) {
        classifier.classify_slots(&slots)
    } else {
        return;
    };
    report(cx, span, text, certainty);
}

fn report(cx: &mut RuleContext<'_>, span: Span, name: &str, certainty: Certainty) {
    let Some(phrase) = certainty.phrase() else {
        return;
    };
    cx.report(
        &messages::BASE_TO_STRING,
        span,
        &[("certainty", phrase), ("name", name)],
    );
}

#[cfg(test)]
#[path = "../../tests/base_to_string_tests.rs"]
mod tests;
