//! Compact JSON-like rendering of tool arguments and tool results.
//!
//! The platform re-serializes tool-call arguments TypeScript-style (bare keys)
//! and tool-result objects with quoted keys before tokenizing them. Both
//! styles drop all insignificant whitespace.

use serde_json::{Map, Value};

/// How object keys are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// `"key":value`, used for tool-response content.
    Quoted,
    /// `key:value`, used for tool-call arguments.
    Unquoted,
}

/// Render a top-level object as the platform does, including the trailing newline.
pub fn render_document(object: &Map<String, Value>, style: KeyStyle) -> String {
    let mut out = render_object(object, style);
    out.push('\n');
    out
}

/// Render any JSON value in the given key style.
pub fn render_value(value: &Value, style: KeyStyle) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let elements: Vec<String> = items.iter().map(|v| render_value(v, style)).collect();
            format!("[{}]", elements.join(","))
        }
        Value::Object(object) => render_object(object, style),
    }
}

// Single-key objects included. The trailing newline of a one-key object is
// added by `render_document` at the top level only; nested objects, one key
// or many, never carry it.
fn render_object(object: &Map<String, Value>, style: KeyStyle) -> String {
    let fields: Vec<String> = object
        .iter()
        .map(|(key, value)| render_field(key, value, style))
        .collect();
    format!("{{{}}}", fields.join(","))
}

fn render_field(key: &str, value: &Value, style: KeyStyle) -> String {
    match style {
        KeyStyle::Quoted => format!("{}:{}", quote(key), render_value(value, style)),
        KeyStyle::Unquoted => format!("{}:{}", key, render_value(value, style)),
    }
}

fn quote(s: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}
