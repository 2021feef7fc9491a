//! Deterministic source rendering for rule settings.
//!
//! Output follows one fixed convention: single-quoted strings, no trailing
//! commas, mapping keys sorted ascending. Identical tables always render
//! to identical text regardless of how they were built.
//!
//! Layout rules for sequences, in priority order:
//! 1. up to five scalar elements render on one line: `['error', 'always']`;
//! 2. two elements render as `[first, second]` with the second shifted one
//!    indentation level;
//! 3. a numeric head followed only by strings, or only by mappings, renders
//!    the head and then one element per line;
//! 4. three or four elements render positionally, shifting only the last;
//! 5. anything else renders one element per line inside the brackets.
//!
//! Indentation is written as [`INDENT_MARK`] while composing nested values
//! and expanded to two spaces in a single pass by [`expand_indent`]. Nested
//! values never track their depth; a parent shifts a child by rewriting
//! each of its line breaks.
//!
//! Embedded single quotes in strings are not escaped. Artifacts produced
//! by earlier runs rely on this exact text. Strings inside single-line
//! arrays additionally get JSON escapes for backslashes and control
//! characters, so they stay on one line and keep their meaning.

use crate::models::Setting;
use std::collections::BTreeMap;

/// Placeholder for one indentation unit.
pub const INDENT_MARK: char = '\t';
const INDENT_UNIT: &str = "  ";
const INLINE_MAX: usize = 5;

/// Render a setting with indentation placeholders left in place.
pub fn serialize(value: &Setting) -> String {
    match value {
        Setting::Number(n) => number(*n),
        Setting::Text(s) => text(s),
        Setting::Sequence(items) => sequence(items),
        Setting::Mapping(map) => mapping(map),
        Setting::Flag(b) => b.to_string(),
        Setting::Null => "null".to_string(),
    }
}

/// Replace every indentation placeholder with the two-space unit.
pub fn expand_indent(text: &str) -> String {
    text.replace(INDENT_MARK, INDENT_UNIT)
}

/// Render a setting as final source text.
pub fn to_source(value: &Setting) -> String {
    expand_indent(&serialize(value))
}

/// Quote a mapping key.
pub fn key(k: &str) -> String {
    format!("'{}'", k.replace('"', "\\\""))
}

fn shift(text: &str) -> String {
    text.replace('\n', "\n\t")
}

/// Shortest round-trip digits, in the notation JavaScript prints numbers:
/// `-0` prints as `0`, and magnitudes from `1e21` up or below `1e-6` use an
/// exponent with an explicit sign.
fn number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

fn text(s: &str) -> String {
    format!("'{}'", s.replace('"', "'"))
}

/// String element of a single-line array: JSON escapes for backslashes and
/// control characters, then single quotes around it with `"` downgraded.
fn inline_text(s: &str) -> String {
    let json = serde_json::Value::String(s.to_string()).to_string();
    let inner = &json[1..json.len() - 1];
    format!("'{}'", inner.replace("\\\"", "'"))
}

fn inline(value: &Setting) -> String {
    match value {
        Setting::Text(s) => inline_text(s),
        other => serialize(other),
    }
}

fn homogeneous(rest: &[Setting]) -> bool {
    rest.iter().all(|v| matches!(v, Setting::Text(_)))
        || rest.iter().all(|v| matches!(v, Setting::Mapping(_)))
}

fn joined_shifted(items: &[Setting]) -> String {
    items
        .iter()
        .map(|v| shift(&serialize(v)))
        .collect::<Vec<_>>()
        .join(",\n\t")
}

fn sequence(items: &[Setting]) -> String {
    if items.len() <= INLINE_MAX && items.iter().all(Setting::is_scalar) {
        let body = items.iter().map(inline).collect::<Vec<_>>().join(", ");
        return format!("[{body}]");
    }
    match items {
        [first, second] => format!("[{}, {}]", serialize(first), shift(&serialize(second))),
        [Setting::Number(head), rest @ ..] if homogeneous(rest) => {
            format!(
                "[{},\n\t\t{}\n\t]",
                number(*head),
                shift(&joined_shifted(rest))
            )
        }
        [first, second, third] => format!(
            "[{}, {}, {}]",
            serialize(first),
            serialize(second),
            shift(&serialize(third))
        ),
        [first, second, third, fourth] => format!(
            "[{}, {}, {}, {}]",
            serialize(first),
            serialize(second),
            serialize(third),
            shift(&serialize(fourth))
        ),
        _ => format!("[\n\t{}\n]", joined_shifted(items)),
    }
}

fn mapping(map: &BTreeMap<String, Setting>) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }
    let body = map
        .iter()
        .map(|(k, v)| format!("{}: {}", key(k), shift(&serialize(v))))
        .collect::<Vec<_>>()
        .join(",\n\t");
    format!("{{\n\t{body}\n}}")
}
