use pretty_assertions::assert_eq;
use tsafe_common::{DiagnosticCategory, Span, TextEdit};
use tsafe_solver::{PropertyInfo, TypeId, TypeInterner};

use crate::config::{LintOptions, RuleLevel};
use crate::functions::FunctionTable;
use crate::syntax::{AssertionForm, Site, TypeAnnotation};
use crate::test_support::{expr, lint, lint_with, message_ids};

/// `<text> as <annotation>` laid out from offset 0.
fn assertion(source: TypeId, text: &str, target: TypeId, annotation: &str) -> Site {
    let text_len = u32::try_from(text.len()).unwrap_or(0);
    let annotation_start = text_len + 4;
    let annotation_len = u32::try_from(annotation.len()).unwrap_or(0);
    Site::TypeAssertion {
        span: Span::new(0, annotation_start + annotation_len),
        form: AssertionForm::As,
        expression: expr(0, source, text),
        annotation: TypeAnnotation {
            span: Span::new(annotation_start, annotation_start + annotation_len),
            ty: target,
        },
    }
}

#[test]
fn union_asserted_to_member_is_narrowing() {
    let db = TypeInterner::new();
    let source = db.union2(TypeId::STRING, TypeId::NUMBER);
    let diagnostics = lint(&db, &[assertion(source, "value", TypeId::STRING, "string")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeTypeAssertion"]);
    assert_eq!(diagnostics[0].data("type"), Some("string | number"));
    assert_eq!(
        diagnostics[0].message_text,
        "Unsafe type assertion: type 'string | number' is more narrow than the original type."
    );
    assert_eq!(diagnostics[0].span, Span::new(0, 15));
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Error);
}

#[test]
fn any_asserted_to_concrete_type() {
    let db = TypeInterner::new();
    let diagnostics = lint(&db, &[assertion(TypeId::ANY, "value", TypeId::STRING, "string")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeOfAnyTypeAssertion"]);

    let to_unknown = lint(&db, &[assertion(TypeId::ANY, "value", TypeId::UNKNOWN, "unknown")]);
    assert!(to_unknown.is_empty());
}

#[test]
fn never_asserted_to_function_prefers_function_verdict() {
    let db = TypeInterner::new();
    let function = db.global_function();
    let diagnostics = lint(&db, &[assertion(TypeId::NEVER, "value", function, "Function")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeFunctionTypeAssertion"]);

    let to_string = lint(&db, &[assertion(TypeId::NEVER, "value", TypeId::STRING, "string")]);
    assert_eq!(message_ids(&to_string), vec!["unsafeNeverTypeAssertion"]);
}

#[test]
fn object_asserted_to_function_is_function_assertion() {
    let db = TypeInterner::new();
    let function = db.global_function();
    let greeting = db.object(vec![PropertyInfo::new("hello", TypeId::STRING)]);
    let diagnostics = lint(&db, &[assertion(greeting, "value", function, "Function")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeFunctionTypeAssertion"]);
}

#[test]
fn union_with_any_array_member_is_assertion_from_any() {
    // declare const a: 'hello' | any[]; a as string[]
    let db = TypeInterner::new();
    let source = db.union2(db.literal_string("hello"), db.array(TypeId::ANY));
    let target = db.array(TypeId::STRING);
    let diagnostics = lint(&db, &[assertion(source, "a", target, "string[]")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeOfAnyTypeAssertion"]);
}

#[test]
fn nested_any_reports_to_any_without_suggestion() {
    let db = TypeInterner::new();
    let source = db.object(vec![PropertyInfo::new("hello", TypeId::STRING)]);
    let target = db.object(vec![PropertyInfo::new("hello", TypeId::ANY)]);
    let site = assertion(source, "value", target, "{ hello: any }");
    let diagnostics = lint(&db, &[site.clone()]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeToAnyTypeAssertion"]);
    assert_eq!(diagnostics[0].span, site.span());
    assert!(diagnostics[0].suggestions.is_empty());
}

#[test]
fn as_any_suggests_unknown() {
    let db = TypeInterner::new();
    let diagnostics = lint(&db, &[assertion(TypeId::STRING, "value", TypeId::ANY, "any")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeToAnyTypeAssertion"]);
    let suggestion = &diagnostics[0].suggestions[0];
    assert_eq!(suggestion.message_id, "suggestUnknown");
    assert_eq!(
        suggestion.edits,
        vec![TextEdit {
            span: Span::new(9, 12),
            new_text: "unknown".to_string(),
        }]
    );
}

#[test]
fn array_of_union_asserted_to_array_of_member() {
    let db = TypeInterner::new();
    let source = db.array(db.union2(TypeId::STRING, TypeId::NUMBER));
    let target = db.array(TypeId::STRING);
    let diagnostics = lint(&db, &[assertion(source, "values", target, "string[]")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeTypeAssertion"]);
    assert_eq!(diagnostics[0].data("type"), Some("(string | number)[]"));
}

#[test]
fn widening_assertions_are_safe() {
    let db = TypeInterner::new();
    let sites = [
        assertion(TypeId::STRING, "a", db.union2(TypeId::STRING, TypeId::NUMBER), "string | number"),
        assertion(db.literal_string("a"), "b", TypeId::STRING, "string"),
        assertion(TypeId::NUMBER, "c", TypeId::UNKNOWN, "unknown"),
        assertion(
            db.object(vec![
                PropertyInfo::new("a", TypeId::STRING),
                PropertyInfo::new("b", TypeId::NUMBER),
            ]),
            "d",
            db.object(vec![PropertyInfo::new("a", TypeId::STRING)]),
            "{ a: string }",
        ),
    ];
    assert!(lint(&db, &sites).is_empty());
}

#[test]
fn type_parameters_are_compared_through_constraints() {
    let db = TypeInterner::new();
    let t = db.type_param("T", Some(db.union2(TypeId::STRING, TypeId::NUMBER)));
    let diagnostics = lint(&db, &[assertion(t, "value", TypeId::STRING, "string")]);
    assert_eq!(diagnostics[0].data("type"), Some("string | number"));
}

#[test]
fn unresolved_expression_is_reported_as_error_narrowing() {
    let db = TypeInterner::new();
    let diagnostics = lint(&db, &[assertion(TypeId::ERROR, "value", TypeId::STRING, "string")]);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeTypeAssertion"]);
    assert_eq!(diagnostics[0].data("type"), Some("error"));
}

#[test]
fn angle_bracket_form_is_checked_the_same() {
    let db = TypeInterner::new();
    let source = db.union2(TypeId::STRING, TypeId::NUMBER);
    let site = Site::TypeAssertion {
        span: Span::new(0, 14),
        form: AssertionForm::AngleBracket,
        expression: expr(9, source, "value"),
        annotation: TypeAnnotation {
            span: Span::new(1, 7),
            ty: TypeId::STRING,
        },
    };
    assert_eq!(message_ids(&lint(&db, &[site])), vec!["unsafeTypeAssertion"]);
}

#[test]
fn rule_level_overrides() {
    let db = TypeInterner::new();
    let site = assertion(TypeId::ANY, "value", TypeId::STRING, "string");

    let mut options = LintOptions::default();
    options
        .rules
        .insert("no-unsafe-type-assertion".to_string(), RuleLevel::Warn);
    let warned = lint_with(&db, &options, FunctionTable::new(), &[site.clone()]);
    assert_eq!(warned[0].category, DiagnosticCategory::Warning);
    assert_eq!(warned[0].rule, "no-unsafe-type-assertion");

    options
        .rules
        .insert("no-unsafe-type-assertion".to_string(), RuleLevel::Off);
    assert!(lint_with(&db, &options, FunctionTable::new(), &[site]).is_empty());
}
