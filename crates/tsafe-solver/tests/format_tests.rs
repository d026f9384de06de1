use super::*;
use crate::types::{ParamInfo, PropertyInfo};
use pretty_assertions::assert_eq;

fn fmt(interner: &TypeInterner, ty: TypeId) -> String {
    TypeFormatter::new(interner).format(ty)
}

#[test]
fn intrinsics_and_literals() {
    let db = TypeInterner::new();
    assert_eq!(fmt(&db, TypeId::STRING), "string");
    assert_eq!(fmt(&db, TypeId::ERROR), "error");
    assert_eq!(fmt(&db, TypeId::OBJECT), "object");
    assert_eq!(fmt(&db, db.literal_string("a\"b")), "\"a\\\"b\"");
    assert_eq!(fmt(&db, db.literal_number(1.0)), "1");
    assert_eq!(fmt(&db, db.literal_number(2.5)), "2.5");
    assert_eq!(fmt(&db, db.literal_number(f64::NAN)), "NaN");
    assert_eq!(fmt(&db, db.literal_number(f64::NEG_INFINITY)), "-Infinity");
    assert_eq!(fmt(&db, db.literal_bigint("10")), "10n");
    assert_eq!(fmt(&db, TypeId::BOOLEAN_TRUE), "true");
}

#[test]
fn unions_print_nullish_last() {
    let db = TypeInterner::new();
    let ty = db.union(vec![TypeId::UNDEFINED, TypeId::NUMBER, TypeId::NULL, TypeId::STRING]);
    assert_eq!(fmt(&db, ty), "string | number | null | undefined");
}

#[test]
fn arrays_parenthesize_compound_elements() {
    let db = TypeInterner::new();
    let union = db.union2(TypeId::STRING, TypeId::NUMBER);
    assert_eq!(fmt(&db, db.array(union)), "(string | number)[]");
    assert_eq!(fmt(&db, db.readonly_array(TypeId::NUMBER)), "readonly number[]");
    let callback = db.function(Vec::new(), TypeId::VOID);
    assert_eq!(fmt(&db, db.array(callback)), "(() => void)[]");
}

#[test]
fn tuples_objects_and_functions() {
    let db = TypeInterner::new();
    assert_eq!(
        fmt(&db, db.tuple(vec![TypeId::STRING, TypeId::NUMBER])),
        "[string, number]"
    );
    assert_eq!(fmt(&db, db.object(Vec::new())), "{}");
    let obj = db.object(vec![
        PropertyInfo::new("hello", TypeId::STRING),
        PropertyInfo::opt("count", TypeId::NUMBER).readonly(),
    ]);
    assert_eq!(fmt(&db, obj), "{ hello: string; readonly count?: number; }");
    let function = db.function(
        vec![
            ParamInfo::new("a", TypeId::STRING),
            ParamInfo {
                optional: true,
                ..ParamInfo::new("b", TypeId::NUMBER)
            },
        ],
        TypeId::BOOLEAN,
    );
    assert_eq!(fmt(&db, function), "(a: string, b?: number) => boolean");
}

#[test]
fn references_and_type_parameters() {
    let db = TypeInterner::new();
    assert_eq!(fmt(&db, db.promise(TypeId::ANY)), "Promise<any>");
    let map = db.reference(db.lib().map, vec![TypeId::STRING, db.array(TypeId::NUMBER)]);
    assert_eq!(fmt(&db, map), "Map<string, number[]>");
    assert_eq!(fmt(&db, db.global_function()), "Function");
    assert_eq!(fmt(&db, db.type_param("T", None)), "T");
}

#[test]
fn deep_nesting_is_truncated() {
    let db = TypeInterner::new();
    let mut ty = TypeId::STRING;
    for _ in 0..64 {
        ty = db.array(ty);
    }
    assert!(fmt(&db, ty).contains("..."));
}
