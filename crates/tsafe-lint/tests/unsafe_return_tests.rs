use pretty_assertions::assert_eq;
use tsafe_common::{Diagnostic, Span};
use tsafe_solver::{NodeId, PropertyInfo, TypeId, TypeInterner};

use crate::config::LintOptions;
use crate::functions::{ContextualType, FunctionInfo, FunctionTable};
use crate::syntax::{Expr, ExprKind, FunctionId, Site};
use crate::test_support::{expr, lint_with, message_ids};

const F: FunctionId = FunctionId(1);
const OUTER: FunctionId = FunctionId(2);

fn ret(function: FunctionId, expression: Expr) -> Site {
    Site::Return {
        span: Span::new(expression.span.start.saturating_sub(7), expression.span.end + 1),
        function,
        expression,
    }
}

fn table(entries: Vec<(FunctionId, FunctionInfo)>) -> FunctionTable {
    let mut functions = FunctionTable::new();
    for (id, info) in entries {
        functions.insert(id, info);
    }
    functions
}

fn check(db: &TypeInterner, info: FunctionInfo, expression: Expr) -> Vec<Diagnostic> {
    check_with(db, &LintOptions::default(), info, expression)
}

fn check_with(
    db: &TypeInterner,
    options: &LintOptions,
    info: FunctionInfo,
    expression: Expr,
) -> Vec<Diagnostic> {
    lint_with(db, options, table(vec![(F, info)]), &[ret(F, expression)])
}

fn function(inferred: TypeId) -> FunctionInfo {
    FunctionInfo::new(NodeId(100), inferred)
}

#[test]
fn returning_any_from_unannotated_function() {
    let db = TypeInterner::new();
    let diagnostics = check(&db, function(TypeId::ANY), expr(20, TypeId::ANY, "value"));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturn"]);
    assert_eq!(diagnostics[0].data("type"), Some("`any`"));
    assert_eq!(diagnostics[0].message_text, "Unsafe return of a value of type `any`.");
    assert_eq!(diagnostics[0].span, Span::new(13, 26));
}

#[test]
fn returning_any_array_and_error() {
    let db = TypeInterner::new();
    let any_array = db.array(TypeId::ANY);
    let diagnostics = check(&db, function(any_array), expr(20, any_array, "[] as any[]"));
    assert_eq!(diagnostics[0].data("type"), Some("`any[]`"));

    let unresolved = check(&db, function(TypeId::ERROR), expr(20, TypeId::ERROR, "value"));
    assert_eq!(message_ids(&unresolved), vec!["unsafeReturn"]);
    assert_eq!(unresolved[0].data("type"), Some("error"));
}

#[test]
fn explicit_annotation_opts_out() {
    let db = TypeInterner::new();
    let any_array = db.array(TypeId::ANY);
    let set_of_any = db.reference(db.lib().set, vec![TypeId::ANY]);
    let cases = [
        (TypeId::ANY, TypeId::ANY),
        (TypeId::UNKNOWN, TypeId::ANY),
        (TypeId::ANY, any_array),
        (TypeId::UNKNOWN, any_array),
        (any_array, any_array),
        (set_of_any, set_of_any),
    ];
    for (declared, returned) in cases {
        let info = function(declared).declared(declared);
        assert!(
            check(&db, info, expr(20, returned, "value")).is_empty(),
            "{declared:?} <- {returned:?}"
        );
    }
}

#[test]
fn unknown_receivers_accept_any() {
    let db = TypeInterner::new();
    // Contextually typed, so the annotation opt-out doesn't apply.
    let returns_unknown_array = db.function(Vec::new(), db.array(TypeId::UNKNOWN));
    let info = function(db.array(TypeId::ANY)).contextual(ContextualType::Type(returns_unknown_array));
    assert!(check(&db, info, expr(20, db.array(TypeId::ANY), "value")).is_empty());

    let returns_unknown = db.function(Vec::new(), TypeId::UNKNOWN);
    let info = function(TypeId::ANY).contextual(ContextualType::Type(returns_unknown));
    assert!(check(&db, info, expr(20, TypeId::ANY, "value")).is_empty());
}

#[test]
fn async_annotation_is_compared_after_awaiting() {
    let db = TypeInterner::new();
    let promise_any = db.promise(TypeId::ANY);
    let info = function(promise_any).declared(promise_any).asynchronous();
    assert!(check(&db, info, expr(20, TypeId::ANY, "{} as any")).is_empty());

    let promise_unknown = db.promise(TypeId::UNKNOWN);
    let info = function(promise_unknown).declared(promise_unknown).asynchronous();
    assert!(check(&db, info, expr(20, TypeId::ANY, "x as any")).is_empty());
}

#[test]
fn sync_function_with_promise_annotation_still_reports_any() {
    let db = TypeInterner::new();
    let promise_any = db.promise(TypeId::ANY);
    let info = function(promise_any).declared(promise_any);
    let diagnostics = check(&db, info, expr(20, TypeId::ANY, "{} as any"));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturn"]);
    assert_eq!(diagnostics[0].data("type"), Some("`any`"));
}

#[test]
fn promise_of_any_matters_only_in_async_functions() {
    let db = TypeInterner::new();
    let promise_any = db.promise(TypeId::ANY);
    assert!(check(&db, function(promise_any), expr(20, promise_any, "value")).is_empty());

    let nested = db.promise(db.promise(promise_any));
    let promise_object = db.promise(TypeId::OBJECT);
    let info = function(promise_object).declared(promise_object).asynchronous();
    let diagnostics = check(&db, info, expr(20, nested, "value"));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturn"]);
    assert_eq!(diagnostics[0].data("type"), Some("`Promise<any>`"));
}

#[test]
fn returning_any_typed_this() {
    let db = TypeInterner::new();
    let this = expr(20, TypeId::ANY, "this").with_kind(ExprKind::This);
    let diagnostics = check(&db, function(TypeId::ANY), this.clone());
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturnThis"]);
    assert_eq!(diagnostics[0].data("type"), Some("`any`"));

    let options = LintOptions {
        no_implicit_this: true,
        ..LintOptions::default()
    };
    let diagnostics = check_with(&db, &options, function(TypeId::ANY), this);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturn"]);
}

#[test]
fn generic_any_argument_leaks_into_declared_type() {
    let db = TypeInterner::new();
    let set = db.lib().set;
    let set_of_string = db.reference(set, vec![TypeId::STRING]);
    let set_of_any = db.reference(set, vec![TypeId::ANY]);
    let info = function(set_of_string).declared(set_of_string);
    let diagnostics = check(&db, info, expr(20, set_of_any, "new Set<any>()"));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturnAssignment"]);
    assert_eq!(diagnostics[0].data("receiver"), Some("Set<string>"));
    assert_eq!(diagnostics[0].data("sender"), Some("Set<any>"));
    assert_eq!(
        diagnostics[0].message_text,
        "Unsafe return of type `Set<any>` from function with return type `Set<string>`."
    );

    let map = db.lib().map;
    let receiver = db.reference(map, vec![TypeId::STRING, TypeId::STRING]);
    let sender = db.reference(map, vec![TypeId::STRING, TypeId::ANY]);
    let info = function(receiver).declared(receiver);
    let diagnostics = check(&db, info, expr(20, sender, "new Map<string, any>()"));
    assert_eq!(diagnostics[0].data("sender"), Some("Map<string, any>"));
}

#[test]
fn bare_constructor_takes_its_type_arguments_from_the_receiver() {
    let db = TypeInterner::new();
    let map = db.lib().map;
    let receiver = db.reference(map, vec![TypeId::STRING, TypeId::STRING]);
    let sender = db.reference(map, vec![TypeId::ANY, TypeId::ANY]);
    let info = function(receiver).declared(receiver);
    let bare = expr(20, sender, "new Map()").with_kind(ExprKind::BareConstructorCall);
    assert!(check(&db, info, bare).is_empty());
}

#[test]
fn different_definitions_are_not_compared() {
    let db = TypeInterner::new();
    let receiver = db.reference(db.lib().readonly_set, vec![TypeId::NUMBER]);
    let sender = db.reference(db.lib().set, vec![TypeId::ANY]);
    let info = function(receiver).declared(receiver);
    assert!(check(&db, info, expr(20, sender, "new Set<any>()")).is_empty());
}

#[test]
fn contextual_type_supplies_the_return_type() {
    let db = TypeInterner::new();
    let set = db.lib().set;
    let set_of_string = db.reference(set, vec![TypeId::STRING]);
    let set_of_any = db.reference(set, vec![TypeId::ANY]);
    let callback = db.function(Vec::new(), set_of_string);
    let info = function(set_of_any).contextual(ContextualType::Type(callback));
    let diagnostics = check(&db, info, expr(20, set_of_any, "new Set<any>()"));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturnAssignment"]);
    assert_eq!(diagnostics[0].data("receiver"), Some("Set<string>"));
}

#[test]
fn nullable_contextual_type_still_applies() {
    let db = TypeInterner::new();
    let callback = db.function(Vec::new(), TypeId::ANY);
    let nullable = db.union2(TypeId::NULL, callback);
    let info = function(TypeId::ANY).contextual(ContextualType::Type(nullable));
    let diagnostics = check(&db, info, expr(20, TypeId::ANY, "'foo' as any"));
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturn"]);

    let void_callback = db.union2(db.function(Vec::new(), TypeId::VOID), TypeId::UNDEFINED);
    let info = function(db.literal_number(1.0)).contextual(ContextualType::Type(void_callback));
    assert!(check(&db, info, expr(20, db.literal_number(1.0), "1")).is_empty());
}

#[test]
fn returned_function_literal_uses_enclosing_return_type() {
    let db = TypeInterner::new();
    let set = db.lib().set;
    let set_of_string = db.reference(set, vec![TypeId::STRING]);
    let set_of_any = db.reference(set, vec![TypeId::ANY]);
    let factory = db.function(Vec::new(), set_of_string);
    let functions = table(vec![
        (OUTER, function(factory).declared(factory)),
        (
            F,
            function(set_of_any)
                .contextual(ContextualType::EnclosingReturn)
                .nested_in(OUTER),
        ),
    ]);
    let diagnostics = lint_with(
        &db,
        &LintOptions::default(),
        functions,
        &[ret(F, expr(40, set_of_any, "new Set<any>()"))],
    );
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturnAssignment"]);
    assert_eq!(diagnostics[0].data("receiver"), Some("Set<string>"));
}

#[test]
fn empty_array_literal_is_never_reported() {
    let db = TypeInterner::new();
    let options = LintOptions {
        allow_unsafe_never: false,
        ..LintOptions::default()
    };
    let never_array = db.array(TypeId::NEVER);
    let empty = expr(20, never_array, "[]").with_kind(ExprKind::EmptyArrayLiteral);
    assert!(check_with(&db, &options, function(never_array), empty).is_empty());
}

#[test]
fn never_is_reported_only_when_disallowed() {
    let db = TypeInterner::new();
    let value = expr(20, TypeId::NEVER, "arg");
    assert!(check(&db, function(TypeId::NEVER), value.clone()).is_empty());

    let options = LintOptions {
        allow_unsafe_never: false,
        ..LintOptions::default()
    };
    let diagnostics = check_with(&db, &options, function(TypeId::NEVER), value.clone());
    assert_eq!(message_ids(&diagnostics), vec!["unsafeReturn"]);
    assert_eq!(diagnostics[0].data("type"), Some("`never`"));

    let declared_never = function(TypeId::NEVER).declared(TypeId::NEVER);
    assert!(check_with(&db, &options, declared_never, value).is_empty());
}

#[test]
fn plain_structural_mismatch_is_left_to_the_checker() {
    let db = TypeInterner::new();
    let declared = db.object(vec![PropertyInfo::new("a", TypeId::STRING)]);
    let info = function(declared).declared(declared);
    assert!(check(&db, info, expr(20, TypeId::NUMBER, "1")).is_empty());
}

#[test]
fn unregistered_function_is_skipped() {
    let db = TypeInterner::new();
    let diagnostics = lint_with(
        &db,
        &LintOptions::default(),
        FunctionTable::new(),
        &[ret(F, expr(20, TypeId::ANY, "value"))],
    );
    assert!(diagnostics.is_empty());
}
