//! Type to text rendering, following the host checker's printer.
//!
//! ```text
//! string | number
//! (string | number)[]
//! readonly number[]
//! [string, number]
//! { hello: string; }
//! Promise<string>
//! (a: string) => void
//! ```

use crate::intern::TypeInterner;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{LiteralValue, TypeData, TypeId};

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
    depth: DepthCounter,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self {
            interner,
            depth: DepthCounter::with_profile(RecursionProfile::Formatting),
        }
    }

    pub fn format(&mut self, ty: TypeId) -> String {
        if !self.depth.enter() {
            return "...".to_string();
        }
        let text = self.format_inner(ty);
        self.depth.leave();
        text
    }

    fn format_inner(&mut self, ty: TypeId) -> String {
        let db = self.interner;
        let Some(data) = db.lookup(ty) else {
            return "error".to_string();
        };
        match data {
            TypeData::Intrinsic(kind) => kind.name().to_string(),
            TypeData::Literal(lit) => format_literal(&lit),
            TypeData::Union(list) => {
                let members = db.type_list(list);
                // Nullish members print last, `null` before `undefined`.
                let (mut nullish, rest): (Vec<TypeId>, Vec<TypeId>) = members
                    .iter()
                    .partition(|&&m| matches!(m, TypeId::UNDEFINED | TypeId::NULL));
                nullish.sort_by_key(|&m| m != TypeId::NULL);
                let parts: Vec<String> = rest
                    .into_iter()
                    .chain(nullish)
                    .map(|m| self.format_operand(m))
                    .collect();
                parts.join(" | ")
            }
            TypeData::Intersection(list) => {
                let members = db.type_list(list);
                let parts: Vec<String> = members.iter().map(|&m| self.format_operand(m)).collect();
                parts.join(" & ")
            }
            TypeData::Array(element) => format!("{}[]", self.format_operand(element)),
            TypeData::ReadonlyArray(element) => {
                format!("readonly {}[]", self.format_operand(element))
            }
            TypeData::Tuple(list) => {
                let elements = db.type_list(list);
                let parts: Vec<String> = elements.iter().map(|&e| self.format(e)).collect();
                format!("[{}]", parts.join(", "))
            }
            TypeData::Object(shape_id) => {
                let shape = db.object_shape(shape_id);
                if shape.properties.is_empty() {
                    return "{}".to_string();
                }
                let mut out = String::from("{ ");
                for prop in &shape.properties {
                    if prop.readonly {
                        out.push_str("readonly ");
                    }
                    out.push_str(&prop.name);
                    if prop.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    out.push_str(&self.format(prop.type_id));
                    out.push_str("; ");
                }
                out.push('}');
                out
            }
            TypeData::Function(shape_id) => {
                let Some(shape) = db.function_shape(shape_id) else {
                    return "error".to_string();
                };
                let params: Vec<String> = shape
                    .params
                    .iter()
                    .map(|p| {
                        let marker = if p.optional { "?" } else { "" };
                        format!("{}{}: {}", p.name, marker, self.format(p.type_id))
                    })
                    .collect();
                format!("({}) => {}", params.join(", "), self.format(shape.return_type))
            }
            TypeData::Application(app_id) => {
                let Some(app) = db.application(app_id) else {
                    return "error".to_string();
                };
                let name = db
                    .definitions()
                    .name(app.base)
                    .unwrap_or_else(|| "error".to_string());
                if app.args.is_empty() {
                    return name;
                }
                let args: Vec<String> = app.args.iter().map(|&a| self.format(a)).collect();
                format!("{}<{}>", name, args.join(", "))
            }
            TypeData::TypeParameter(info) => info.name,
        }
    }

    /// Operand of `|`, `&` or `[]`; compound types get parentheses.
    fn format_operand(&mut self, ty: TypeId) -> String {
        let text = self.format(ty);
        match self.interner.lookup(ty) {
            Some(TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Function(_)) => {
                format!("({text})")
            }
            _ => text,
        }
    }
}

fn format_literal(lit: &LiteralValue) -> String {
    match lit {
        LiteralValue::String(s) => {
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        }
        LiteralValue::Number(n) => {
            let v = n.0;
            if v.is_nan() {
                "NaN".to_string()
            } else if v.is_infinite() {
                if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
            } else {
                format!("{v}")
            }
        }
        LiteralValue::BigInt(digits) => format!("{digits}n"),
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
