//! # Render Module
//!
//! Text renderings the platform applies to structured request parts before
//! they are tokenized. Token counts are only exact if these match the
//! platform's own output byte for byte, so every function here is pure and
//! ordering-stable (object keys iterate in declaration order).
//!
//! | Function | Used for |
//! |----------|----------|
//! | [`render_tool_definitions`] | `tools` → injected `namespace functions` system text |
//! | [`render_document`] / [`render_value`] | tool-call arguments ([`KeyStyle::Unquoted`]) and JSON tool results ([`KeyStyle::Quoted`]) |
//! | [`render_tool_choice`] | the forced-function fragment of `tool_choice` |

pub mod schema;
pub mod value;

pub use schema::{render_properties, render_tool_definitions, render_type};
pub use value::{render_document, render_value, KeyStyle};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Render the fragment a forced `tool_choice` contributes:
/// `{"name": ...}` pretty-printed with a one-space indent.
pub fn render_tool_choice(function_name: &str) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    let fragment = serde_json::json!({ "name": function_name });
    match fragment.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_default(),
        Err(_) => String::new(),
    }
}
