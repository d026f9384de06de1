use pretty_assertions::assert_eq;
use tsafe_common::{Diagnostic, Span};
use tsafe_solver::{TypeId, TypeInterner};

use crate::config::LintOptions;
use crate::functions::FunctionTable;
use crate::syntax::{Expr, Site};
use crate::test_support::{expr, lint, lint_with, message_ids};

fn spread(argument: Expr, receiver: Option<TypeId>) -> Site {
    Site::Spread {
        span: Span::new(argument.span.start - 3, argument.span.end),
        argument,
        receiver,
    }
}

fn check(db: &TypeInterner, ty: TypeId, receiver: Option<TypeId>) -> Vec<Diagnostic> {
    lint(db, &[spread(expr(10, ty, "args"), receiver)])
}

#[test]
fn spreading_any() {
    let db = TypeInterner::new();
    let diagnostics = check(&db, TypeId::ANY, None);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeSpread"]);
    assert_eq!(diagnostics[0].data("type"), Some("`any`"));
    assert_eq!(diagnostics[0].span, Span::new(7, 14));
    assert_eq!(diagnostics[0].rule, "no-unsafe-spread");
}

#[test]
fn spreading_any_array() {
    let db = TypeInterner::new();
    let diagnostics = check(&db, db.array(TypeId::ANY), Some(db.array(TypeId::STRING)));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeArraySpread"]);
    assert_eq!(
        diagnostics[0].message_text,
        "Unsafe spread of an `any[]` array type."
    );
}

#[test]
fn spreading_unresolved_value() {
    let db = TypeInterner::new();
    let diagnostics = check(&db, TypeId::ERROR, None);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeSpread"]);
    assert_eq!(diagnostics[0].data("type"), Some("error"));
}

#[test]
fn any_argument_leaking_into_typed_receiver() {
    let db = TypeInterner::new();
    let set = db.lib().set;
    let sender = db.reference(set, vec![TypeId::ANY]);
    let receiver = db.reference(set, vec![TypeId::STRING]);
    let diagnostics = check(&db, sender, Some(receiver));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeSpreadAssignment"]);
    assert_eq!(diagnostics[0].data("sender"), Some("Set<any>"));
    assert_eq!(diagnostics[0].data("receiver"), Some("Set<string>"));

    // Without a receiver there is nothing to leak into.
    assert!(check(&db, sender, None).is_empty());
}

#[test]
fn safe_spreads() {
    let db = TypeInterner::new();
    let strings = db.array(TypeId::STRING);
    assert!(check(&db, strings, None).is_empty());
    assert!(check(&db, strings, Some(strings)).is_empty());
    assert!(check(&db, db.promise(TypeId::ANY), None).is_empty());
    assert_eq!(check(&db, db.array(TypeId::ANY), None).len(), 1);
}

#[test]
fn never_spreads_follow_the_option() {
    let db = TypeInterner::new();
    let never_array = db.array(TypeId::NEVER);
    assert!(check(&db, never_array, None).is_empty());

    let options = LintOptions {
        allow_unsafe_never: false,
        ..LintOptions::default()
    };
    let diagnostics = lint_with(
        &db,
        &options,
        FunctionTable::new(),
        &[spread(expr(10, never_array, "args"), None)],
    );
    assert_eq!(message_ids(&diagnostics), vec!["unsafeArraySpread"]);
    assert_eq!(diagnostics[0].data("type"), Some("`never[]`"));
}
