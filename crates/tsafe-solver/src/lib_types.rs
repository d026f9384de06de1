//! Built-in library definitions.
//!
//! A small model of the host language's standard declarations: the
//! universal `Object` base, the wide `Function` type, array and primitive
//! wrapper interfaces, `Promise` and a handful of commonly stringified
//! classes. Only the members the analysis looks at are declared.

use crate::def::{DefFlags, DefId, DefinitionInfo};
use crate::intern::TypeInterner;
use crate::types::{MemberOrigin, ParamInfo, PropertyInfo, TypeId};

/// Property name used for the `Symbol.toPrimitive` member.
pub const TO_PRIMITIVE_KEY: &str = "[Symbol.toPrimitive]";

/// Name of the well-known symbol property `Symbol.<name>`.
pub fn well_known_symbol_key(name: &str) -> String {
    format!("[Symbol.{name}]")
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WellKnownDefs {
    pub object: DefId,
    pub function: DefId,
    pub array: DefId,
    pub string: DefId,
    pub number: DefId,
    pub boolean: DefId,
    pub bigint: DefId,
    pub symbol: DefId,
    pub promise: DefId,
    pub error: DefId,
    pub reg_exp: DefId,
    pub url: DefId,
    pub url_search_params: DefId,
    pub date: DefId,
    pub set: DefId,
    pub readonly_set: DefId,
    pub map: DefId,
}

fn method(interner: &TypeInterner, name: &str, params: Vec<ParamInfo>, ret: TypeId) -> PropertyInfo {
    PropertyInfo::new(name, interner.function(params, ret))
}

fn to_string_method(interner: &TypeInterner) -> PropertyInfo {
    method(interner, "toString", Vec::new(), TypeId::STRING)
}

fn register(
    interner: &TypeInterner,
    name: &str,
    type_params: Vec<TypeId>,
    flags: DefFlags,
) -> DefId {
    interner.register_definition(DefinitionInfo::interface(name, type_params).with_flags(flags))
}

pub(crate) fn install(interner: &TypeInterner) -> WellKnownDefs {
    let defs = interner.definitions();
    let string = TypeId::STRING;
    let number = TypeId::NUMBER;
    let boolean = TypeId::BOOLEAN;

    // Object
    let object = register(interner, "Object", Vec::new(), DefFlags::OBJECT_BASE);
    defs.set_properties(
        object,
        vec![
            to_string_method(interner),
            method(interner, "toLocaleString", Vec::new(), string),
            method(interner, "valueOf", Vec::new(), TypeId::OBJECT),
            method(
                interner,
                "hasOwnProperty",
                vec![ParamInfo::new("v", string)],
                boolean,
            ),
        ]
        .into_iter()
        .map(|p| p.with_origin(MemberOrigin::ObjectBase))
        .collect(),
    );

    // Function
    let function = register(interner, "Function", Vec::new(), DefFlags::GLOBAL_FUNCTION);
    defs.set_properties(
        function,
        vec![
            method(
                interner,
                "apply",
                vec![
                    ParamInfo::new("thisArg", TypeId::ANY),
                    ParamInfo::new("argArray", TypeId::ANY),
                ],
                TypeId::ANY,
            ),
            method(interner, "call", vec![ParamInfo::new("thisArg", TypeId::ANY)], TypeId::ANY),
            method(interner, "bind", vec![ParamInfo::new("thisArg", TypeId::ANY)], TypeId::ANY),
            to_string_method(interner),
            PropertyInfo::new("length", number).readonly(),
            PropertyInfo::new("name", string).readonly(),
        ],
    );

    // Array<T>
    let array_t = interner.type_param("T", None);
    let array = register(interner, "Array", vec![array_t], DefFlags::ARRAY_BASE);
    defs.set_properties(
        array,
        vec![
            PropertyInfo::new("length", number),
            to_string_method(interner),
            method(
                interner,
                "join",
                vec![ParamInfo {
                    optional: true,
                    ..ParamInfo::new("separator", string)
                }],
                string,
            ),
            method(interner, "push", vec![ParamInfo::new("item", array_t)], number),
            method(interner, "pop", Vec::new(), interner.union2(array_t, TypeId::UNDEFINED)),
        ],
    );

    // Primitive wrappers. `Boolean` declares no `toString` of its own.
    let string_def = register(interner, "String", Vec::new(), DefFlags::empty());
    defs.set_properties(
        string_def,
        vec![
            to_string_method(interner),
            method(interner, "valueOf", Vec::new(), string),
            PropertyInfo::new("length", number).readonly(),
            method(interner, "charAt", vec![ParamInfo::new("pos", number)], string),
        ],
    );
    let number_def = register(interner, "Number", Vec::new(), DefFlags::empty());
    defs.set_properties(
        number_def,
        vec![
            method(
                interner,
                "toString",
                vec![ParamInfo {
                    optional: true,
                    ..ParamInfo::new("radix", number)
                }],
                string,
            ),
            method(interner, "valueOf", Vec::new(), number),
            method(interner, "toFixed", vec![ParamInfo::new("digits", number)], string),
        ],
    );
    let boolean_def = register(interner, "Boolean", Vec::new(), DefFlags::empty());
    defs.set_properties(
        boolean_def,
        vec![method(interner, "valueOf", Vec::new(), boolean)],
    );
    let bigint_def = register(interner, "BigInt", Vec::new(), DefFlags::empty());
    defs.set_properties(
        bigint_def,
        vec![
            to_string_method(interner),
            method(interner, "valueOf", Vec::new(), TypeId::BIGINT),
        ],
    );
    let symbol_def = register(interner, "Symbol", Vec::new(), DefFlags::empty());
    defs.set_properties(
        symbol_def,
        vec![
            to_string_method(interner),
            method(interner, "valueOf", Vec::new(), TypeId::SYMBOL),
            PropertyInfo::opt("description", string).readonly(),
        ],
    );

    // Promise<T>
    let promise_t = interner.type_param("T", None);
    let promise = register(interner, "Promise", vec![promise_t], DefFlags::PROMISE_LIKE);
    let on_fulfilled = interner.function(vec![ParamInfo::new("value", promise_t)], TypeId::UNKNOWN);
    let then_result = interner.reference(promise, vec![TypeId::UNKNOWN]);
    defs.set_properties(
        promise,
        vec![method(
            interner,
            "then",
            vec![ParamInfo {
                optional: true,
                ..ParamInfo::new("onfulfilled", on_fulfilled)
            }],
            then_result,
        )],
    );

    // Classes whose `toString` comes from `Object` but still prints something
    // meaningful. They are matched by name through the ignore list.
    let error = register(interner, "Error", Vec::new(), DefFlags::empty());
    defs.set_properties(
        error,
        vec![
            PropertyInfo::new("name", string),
            PropertyInfo::new("message", string),
            PropertyInfo::opt("stack", string),
        ],
    );
    let reg_exp = register(interner, "RegExp", Vec::new(), DefFlags::empty());
    defs.set_properties(
        reg_exp,
        vec![
            PropertyInfo::new("source", string).readonly(),
            PropertyInfo::new("flags", string).readonly(),
            PropertyInfo::new("lastIndex", number),
            method(interner, "test", vec![ParamInfo::new("string", string)], boolean),
        ],
    );
    let url = register(interner, "URL", Vec::new(), DefFlags::empty());
    defs.set_properties(
        url,
        vec![
            PropertyInfo::new("href", string),
            PropertyInfo::new("origin", string).readonly(),
            PropertyInfo::new("pathname", string),
            method(interner, "toJSON", Vec::new(), string),
        ],
    );
    let url_search_params = register(interner, "URLSearchParams", Vec::new(), DefFlags::empty());
    defs.set_properties(
        url_search_params,
        vec![
            method(interner, "get", vec![ParamInfo::new("name", string)], interner.union2(string, TypeId::NULL)),
            method(interner, "has", vec![ParamInfo::new("name", string)], boolean),
        ],
    );

    // Date converts itself through `Symbol.toPrimitive`.
    let date = register(interner, "Date", Vec::new(), DefFlags::empty());
    defs.set_properties(
        date,
        vec![
            to_string_method(interner),
            method(interner, "getTime", Vec::new(), number),
            method(
                interner,
                TO_PRIMITIVE_KEY,
                vec![ParamInfo::new("hint", string)],
                interner.union2(string, number),
            ),
        ],
    );

    // Collections
    let set_t = interner.type_param("T", None);
    let set = register(interner, "Set", vec![set_t], DefFlags::empty());
    let set_of_t = interner.reference(set, vec![set_t]);
    defs.set_properties(
        set,
        vec![
            PropertyInfo::new("size", number).readonly(),
            method(interner, "add", vec![ParamInfo::new("value", set_t)], set_of_t),
            method(interner, "has", vec![ParamInfo::new("value", set_t)], boolean),
        ],
    );
    let readonly_set_t = interner.type_param("T", None);
    let readonly_set = register(interner, "ReadonlySet", vec![readonly_set_t], DefFlags::empty());
    defs.set_properties(
        readonly_set,
        vec![
            PropertyInfo::new("size", number).readonly(),
            method(interner, "has", vec![ParamInfo::new("value", readonly_set_t)], boolean),
        ],
    );
    let map_k = interner.type_param("K", None);
    let map_v = interner.type_param("V", None);
    let map = register(interner, "Map", vec![map_k, map_v], DefFlags::empty());
    let map_of_kv = interner.reference(map, vec![map_k, map_v]);
    defs.set_properties(
        map,
        vec![
            PropertyInfo::new("size", number).readonly(),
            method(
                interner,
                "get",
                vec![ParamInfo::new("key", map_k)],
                interner.union2(map_v, TypeId::UNDEFINED),
            ),
            method(
                interner,
                "set",
                vec![ParamInfo::new("key", map_k), ParamInfo::new("value", map_v)],
                map_of_kv,
            ),
            method(interner, "has", vec![ParamInfo::new("key", map_k)], boolean),
        ],
    );

    WellKnownDefs {
        object,
        function,
        array,
        string: string_def,
        number: number_def,
        boolean: boolean_def,
        bigint: bigint_def,
        symbol: symbol_def,
        promise,
        error,
        reg_exp,
        url,
        url_search_params,
        date,
        set,
        readonly_set,
        map,
    }
}
