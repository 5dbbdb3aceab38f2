//! Rendering types and literal values for diagnostic messages.

use crate::comparison::DomainValue;
use crate::intern::TypeInterner;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{LiteralValue, TypeData, TypeId};
use std::fmt::Write;

impl TypeInterner {
    /// Render `id` the way it would be written in source.
    pub fn display(&self, id: TypeId) -> String {
        let mut counter = DepthCounter::with_profile(RecursionProfile::TypeDisplay);
        let mut out = String::new();
        self.write_type(&mut out, id, &mut counter);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, counter: &mut DepthCounter) {
        if !counter.enter() {
            out.push_str("...");
            return;
        }
        match self.lookup(id) {
            None => out.push_str("unknown"),
            Some(TypeData::Intrinsic(kind)) => out.push_str(kind.name()),
            Some(TypeData::Literal(value)) => out.push_str(&display_literal(&value)),
            Some(TypeData::Union(list)) => self.write_list(out, &self.type_list(list), " | ", counter),
            Some(TypeData::Intersection(list)) => {
                self.write_list(out, &self.type_list(list), " & ", counter)
            }
            Some(TypeData::Array(element)) => {
                let needs_parens = matches!(
                    self.lookup(element),
                    Some(TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Function(_))
                );
                if needs_parens {
                    out.push('(');
                }
                self.write_type(out, element, counter);
                if needs_parens {
                    out.push(')');
                }
                out.push_str("[]");
            }
            Some(TypeData::Tuple(list)) => {
                out.push('[');
                self.write_list(out, &self.type_list(list), ", ", counter);
                out.push(']');
            }
            Some(TypeData::Function(signature)) => match self.function_shape(signature) {
                Some(shape) => {
                    out.push('(');
                    for (i, param) in shape.params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&param.name);
                        if param.optional {
                            out.push('?');
                        }
                        out.push_str(": ");
                        self.write_type(out, param.ty, counter);
                    }
                    out.push_str(") => ");
                    if shape.is_async() {
                        out.push_str("Promise<");
                        self.write_type(out, shape.return_type, counter);
                        out.push('>');
                    } else {
                        self.write_type(out, shape.return_type, counter);
                    }
                }
                None => out.push_str("Function"),
            },
            Some(TypeData::Class(class)) => match self.class_shape(class) {
                Some(shape) if !shape.is_anonymous() => out.push_str(&shape.name),
                Some(shape) if shape.fields.is_empty() => out.push_str("{}"),
                Some(shape) => {
                    out.push_str("{ ");
                    for field in &shape.fields {
                        let _ = write!(out, "{}: ", field.name);
                        self.write_type(out, field.ty, counter);
                        out.push_str("; ");
                    }
                    out.push('}');
                }
                None => out.push_str("object"),
            },
            Some(TypeData::Alias(alias)) => match self.alias_name(alias) {
                Some(name) => out.push_str(&name),
                None => out.push_str("unknown"),
            },
            Some(TypeData::TypeParameter(info)) => out.push_str(&info.name),
            Some(TypeData::Unclear(name)) => out.push_str(&name),
        }
        counter.leave();
    }

    fn write_list(&self, out: &mut String, members: &[TypeId], separator: &str, counter: &mut DepthCounter) {
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write_type(out, member, counter);
        }
    }
}

/// Render a literal value as it appears in source: `"a"`, `0`, `1n`, `true`.
pub fn display_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(text) => {
            let mut out = String::with_capacity(text.len() + 2);
            out.push('"');
            for ch in text.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    other => out.push(other),
                }
            }
            out.push('"');
            out
        }
        LiteralValue::Number(number) => display_number(number.value()),
        LiteralValue::BigInt(digits) => format!("{digits}n"),
        LiteralValue::Boolean(value) => value.to_string(),
    }
}

/// Render a literal-domain value (`null`, `undefined` or a literal).
pub fn display_domain_value(value: &DomainValue) -> String {
    match value {
        DomainValue::Literal(literal) => display_literal(literal),
        DomainValue::Null => "null".to_string(),
        DomainValue::Undefined => "undefined".to_string(),
    }
}

fn display_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }
    value.to_string()
}
