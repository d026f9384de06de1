use pretty_assertions::assert_eq;
use tsafe_common::{Diagnostic, Span};
use tsafe_solver::{DefinitionInfo, ParamInfo, PropertyInfo, TypeId, TypeInterner};

use crate::config::LintOptions;
use crate::functions::FunctionTable;
use crate::syntax::{ConcatOperator, Expr, ExprKind, Site};
use crate::test_support::{expr, lint, lint_with, literal, message_ids};

fn plain_object(db: &TypeInterner) -> TypeId {
    db.object(vec![PropertyInfo::new("a", TypeId::STRING)])
}

fn template(expressions: Vec<Expr>) -> Site {
    Site::TemplateLiteral {
        span: Span::new(0, 40),
        tagged: false,
        expressions,
    }
}

fn concat(left: Expr, right: Expr) -> Site {
    Site::Concatenation {
        span: left.span.cover(right.span),
        operator: ConcatOperator::Plus,
        left,
        right,
    }
}

fn to_string_call(receiver: Expr) -> Site {
    Site::ToStringCall {
        span: Span::new(receiver.span.start, receiver.span.end + 11),
        receiver,
    }
}

fn join(receiver: Expr) -> Site {
    let text = format!("{}.join()", receiver.text);
    Site::JoinCall {
        span: Span::new(receiver.span.start, receiver.span.end + 7),
        text,
        receiver,
    }
}

fn certainty(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().filter_map(|d| d.data("certainty")).collect()
}

#[test]
fn template_interpolation_of_plain_object() {
    let db = TypeInterner::new();
    let value = expr(3, plain_object(&db), "value");
    let diagnostics = lint(&db, &[template(vec![value])]);
    assert_eq!(message_ids(&diagnostics), vec!["baseToString"]);
    assert_eq!(diagnostics[0].data("certainty"), Some("will"));
    assert_eq!(diagnostics[0].data("name"), Some("value"));
    assert_eq!(diagnostics[0].span, Span::new(3, 8));
    assert_eq!(
        diagnostics[0].message_text,
        "'value' will use Object's default stringification format ('[object Object]') when stringified."
    );
}

#[test]
fn tagged_templates_and_literals_are_skipped() {
    let db = TypeInterner::new();
    let tagged = Site::TemplateLiteral {
        span: Span::new(0, 20),
        tagged: true,
        expressions: vec![expr(5, plain_object(&db), "value")],
    };
    let with_literal = template(vec![literal(3, db.literal_string("a"), "'a'")]);
    assert!(lint(&db, &[tagged, with_literal]).is_empty());
}

#[test]
fn every_interpolation_is_checked() {
    let db = TypeInterner::new();
    let sometimes = db.union2(plain_object(&db), TypeId::STRING);
    let diagnostics = lint(
        &db,
        &[template(vec![
            expr(3, TypeId::NUMBER, "n"),
            expr(8, sometimes, "maybe"),
            expr(20, plain_object(&db), "obj"),
        ])],
    );
    assert_eq!(certainty(&diagnostics), vec!["may", "will"]);
}

#[test]
fn concatenation_checks_the_non_string_side() {
    let db = TypeInterner::new();
    let object = plain_object(&db);

    let right = lint(&db, &[concat(expr(0, TypeId::STRING, "s"), expr(4, object, "obj"))]);
    assert_eq!(right.len(), 1);
    assert_eq!(right[0].data("name"), Some("obj"));

    let left = lint(&db, &[concat(expr(0, object, "obj"), expr(6, db.literal_string("x"), "x"))]);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].data("name"), Some("obj"));

    let neither = lint(&db, &[concat(expr(0, object, "a"), expr(4, TypeId::NUMBER, "b"))]);
    assert!(neither.is_empty());
}

#[test]
fn private_identifier_on_the_left_is_skipped() {
    let db = TypeInterner::new();
    let left = expr(0, plain_object(&db), "#field").with_kind(ExprKind::PrivateIdentifier);
    let site = concat(left, expr(9, TypeId::STRING, "s"));
    assert!(lint(&db, &[site]).is_empty());
}

#[test]
fn compound_assignment_is_a_concatenation() {
    let db = TypeInterner::new();
    let left = expr(0, TypeId::STRING, "s");
    let right = expr(5, plain_object(&db), "obj");
    let site = Site::Concatenation {
        span: Span::new(0, 8),
        operator: ConcatOperator::PlusAssign,
        left,
        right,
    };
    assert_eq!(message_ids(&lint(&db, &[site])), vec!["baseToString"]);
}

#[test]
fn to_string_calls() {
    let db = TypeInterner::new();
    let date = db.reference(db.lib().date, Vec::new());
    let error = db.reference(db.lib().error, Vec::new());
    let custom = db.object(vec![PropertyInfo::new(
        "toString",
        db.function(Vec::new(), TypeId::STRING),
    )]);
    let sites = [
        to_string_call(expr(0, plain_object(&db), "obj")),
        to_string_call(expr(20, date, "date")),
        to_string_call(expr(40, error, "error")),
        to_string_call(expr(60, custom, "custom")),
        to_string_call(expr(80, TypeId::NUMBER, "count")),
    ];
    let diagnostics = lint(&db, &sites);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].data("name"), Some("obj"));
}

#[test]
fn ignored_type_names_are_globs() {
    let db = TypeInterner::new();
    let custom = db.register_definition(
        DefinitionInfo::class("CustomThing", Vec::new())
            .with_properties(vec![PropertyInfo::new("id", TypeId::NUMBER)]),
    );
    let custom = db.reference(custom, Vec::new());
    let error = db.reference(db.lib().error, Vec::new());
    let sites = [
        to_string_call(expr(0, custom, "thing")),
        to_string_call(expr(20, error, "error")),
    ];

    let reported = lint(&db, &sites);
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].data("name"), Some("thing"));

    let options = LintOptions {
        ignored_type_names: vec!["Custom*".to_string()],
        ..LintOptions::default()
    };
    let reported = lint_with(&db, &options, FunctionTable::new(), &sites);
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].data("name"), Some("error"));
}

#[test]
fn join_reports_the_call() {
    let db = TypeInterner::new();
    let objects = db.array(plain_object(&db));
    let diagnostics = lint(&db, &[join(expr(0, objects, "items"))]);
    assert_eq!(message_ids(&diagnostics), vec!["baseToString"]);
    assert_eq!(diagnostics[0].data("name"), Some("items.join()"));
    assert_eq!(diagnostics[0].span, Span::new(0, 12));
    assert_eq!(diagnostics[0].data("certainty"), Some("will"));

    let strings = db.readonly_array(TypeId::STRING);
    assert!(lint(&db, &[join(expr(0, strings, "names"))]).is_empty());

    // Not an array: some user-defined `join`.
    let joiner = db.object(vec![PropertyInfo::new(
        "join",
        db.function(vec![ParamInfo::new("sep", TypeId::STRING)], TypeId::STRING),
    )]);
    assert!(lint(&db, &[join(expr(0, joiner, "joiner"))]).is_empty());
}

#[test]
fn join_on_tuples_aggregates_slots() {
    let db = TypeInterner::new();
    let object = plain_object(&db);
    let maybe = db.union2(object, TypeId::STRING);

    let one_bad_slot = db.tuple(vec![TypeId::STRING, object]);
    let diagnostics = lint(&db, &[join(expr(0, one_bad_slot, "pair"))]);
    assert_eq!(certainty(&diagnostics), vec!["will"]);

    let conditional_slot = db.tuple(vec![object, maybe]);
    let diagnostics = lint(&db, &[join(expr(0, conditional_slot, "pair"))]);
    assert_eq!(certainty(&diagnostics), vec!["may"]);

    let fine = db.tuple(vec![TypeId::STRING, TypeId::NUMBER]);
    assert!(lint(&db, &[join(expr(0, fine, "pair"))]).is_empty());
}

#[test]
fn unions_may_stringify_badly() {
    let db = TypeInterner::new();
    let maybe = db.union2(plain_object(&db), TypeId::NUMBER);
    let diagnostics = lint(&db, &[to_string_call(expr(0, maybe, "value"))]);
    assert_eq!(certainty(&diagnostics), vec!["may"]);
    assert!(diagnostics[0].message_text.starts_with("'value' may use"));
}
