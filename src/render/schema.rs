//! TypeScript-namespace rendering of function definitions.
//!
//! Before a request reaches the model, its `tools` are rewritten into a
//! `namespace functions { ... }` block and appended to the system prompt.
//! This module reproduces that block byte for byte so it can be tokenized.
//!
//! Rendering is best effort: schema nodes with a missing or unknown `type`
//! render as an empty type, and property entries that are not objects are
//! skipped. Nothing here can fail.

use crate::types::ToolDefinition;
use serde_json::{Map, Value};

const HEADER: [&str; 3] = ["# Tools", "## functions", "namespace functions {"];
const FOOTER: &str = "} // namespace functions";

/// Render a list of tool definitions into the injected system-prompt block.
pub fn render_tool_definitions(tools: &[ToolDefinition]) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();

    for tool in tools {
        let function = &tool.function;
        if let Some(description) = function.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("// {}", description));
        }

        let params = function.parameters.as_object();
        if params.and_then(properties_of).is_some() {
            lines.push(format!("type {} = (_: {{", function.name));
            lines.push(params.map(|p| render_properties(p, 0)).unwrap_or_default());
            lines.push("}) => any;".to_string());
        } else {
            lines.push(format!("type {} = () => any;", function.name));
        }
    }

    lines.push(FOOTER.to_string());
    lines.join("\n")
}

/// Render the `properties` of a schema node, one entry per property, each
/// entry prefixed with `indent` spaces.
pub fn render_properties(node: &Map<String, Value>, indent: usize) -> String {
    let Some(properties) = properties_of(node) else {
        return String::new();
    };

    let required: Vec<&str> = node
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut entries = Vec::with_capacity(properties.len());
    for (key, prop) in properties {
        let Some(prop) = prop.as_object() else {
            tracing::trace!(property = %key, "skipping non-object schema property");
            continue;
        };
        if let Some(description) = prop
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
        {
            entries.push(format!("// {}", description));
        }
        let optional = if required.contains(&key.as_str()) { "" } else { "?" };
        entries.push(format!("{}{}:{},", key, optional, render_type(prop, indent)));
    }

    let pad = " ".repeat(indent);
    entries
        .iter()
        .map(|entry| format!("{}{}", pad, entry))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the TypeScript type of one schema node.
pub fn render_type(node: &Map<String, Value>, indent: usize) -> String {
    let Some(kind) = node.get("type").and_then(Value::as_str) else {
        return String::new();
    };

    match kind {
        "string" => match node.get("enum").and_then(Value::as_array) {
            Some(values) => union(values, |v| match v {
                Value::String(s) => format!("\"{}\"", s),
                other => format!("\"{}\"", other),
            }),
            None => "string".to_string(),
        },
        "integer" | "number" => match node.get("enum").and_then(Value::as_array) {
            Some(values) => union(values, |v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            None => "number".to_string(),
        },
        "boolean" => "boolean".to_string(),
        "null" => "null".to_string(),
        "array" => match node.get("items").and_then(Value::as_object) {
            Some(items) => format!("{}[]", render_type(items, indent)),
            None => "any[]".to_string(),
        },
        "object" => {
            if properties_of(node).is_some() {
                format!("{{\n{}\n}}", render_properties(node, indent + 2))
            } else {
                "{}".to_string()
            }
        }
        other => {
            tracing::trace!(schema_type = %other, "unrecognized schema type renders empty");
            String::new()
        }
    }
}

/// The node's `properties`, if it has at least one.
fn properties_of(node: &Map<String, Value>) -> Option<&Map<String, Value>> {
    node.get("properties")
        .and_then(Value::as_object)
        .filter(|p| !p.is_empty())
}

fn union(values: &[Value], literal: impl Fn(&Value) -> String) -> String {
    values.iter().map(literal).collect::<Vec<_>>().join(" | ")
}
