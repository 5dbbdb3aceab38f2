//! Literal token text.
//!
//! Parsing of numeric, bigint and string literal tokens as they appear in
//! statement text, used when a syntax literal has no IR counterpart.

use crate::syntax::{LiteralKind, NodeId, NodeKind, PrefixOperator, SyntaxFragment};
use tscond_types::{TypeId, TypeInterner};

/// Literal type of a syntax node read from its text alone.
///
/// Covers number, string, bigint and keyword literals, no-substitution
/// templates, the `undefined` identifier and negated numeric literals.
pub fn syntax_literal_type(
    types: &TypeInterner,
    fragment: &SyntaxFragment,
    node: NodeId,
) -> Option<TypeId> {
    let node = fragment.skip_parentheses(node);
    let text = fragment.text(node);
    match fragment.kind(node)? {
        NodeKind::Literal(kind) => match kind {
            LiteralKind::True => Some(TypeId::BOOLEAN_TRUE),
            LiteralKind::False => Some(TypeId::BOOLEAN_FALSE),
            LiteralKind::Null => Some(TypeId::NULL),
            LiteralKind::Undefined => Some(TypeId::UNDEFINED),
            LiteralKind::Number => parse_number(text).map(|value| types.literal_number(value)),
            LiteralKind::BigInt => parse_bigint(text).map(|digits| types.literal_bigint(&digits)),
            LiteralKind::String | LiteralKind::Template => {
                unquote(text).map(|value| types.literal_string(&value))
            }
            LiteralKind::RegExp => None,
        },
        NodeKind::Identifier if text == "undefined" => Some(TypeId::UNDEFINED),
        NodeKind::Prefix {
            op: PrefixOperator::Minus,
            operand,
        } => {
            let operand = fragment.skip_parentheses(*operand);
            match fragment.kind(operand)? {
                NodeKind::Literal(LiteralKind::Number) => {
                    parse_number(fragment.text(operand)).map(|value| types.literal_number(-value))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Value of a numeric literal token (`1_000`, `0x1F`, `.5`, `1e3`).
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    if let Some((radix, digits)) = radix_digits(&cleaned) {
        return u128::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }
    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Decimal digits of a bigint literal token (`10n`, `0xFFn`).
pub fn parse_bigint(text: &str) -> Option<String> {
    let body = text.strip_suffix('n')?;
    let cleaned: String = body.chars().filter(|&c| c != '_').collect();
    let (radix, digits) = radix_digits(&cleaned).unwrap_or((10, cleaned.as_str()));
    u128::from_str_radix(digits, radix).ok().map(|n| n.to_string())
}

fn radix_digits(text: &str) -> Option<(u32, &str)> {
    let prefix = text.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

/// Contents of a quoted string or substitution-free template token.
pub fn unquote(text: &str) -> Option<String> {
    let quote = text.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    if quote == '`' && inner.contains("${") {
        return None;
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                // Lone surrogates have no `char`; keep the token unresolved.
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            '\n' => {}
            other => out.push(other),
        }
    }
    Some(out)
}
