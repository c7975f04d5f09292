//! Counter configuration.
//!
//! Every constant the estimator adds on top of raw text tokens lives in
//! [`Overheads`], scoped to a single [`crate::Counter`]. Counters calibrated
//! for different models can therefore coexist in one process.
//!
//! ```yaml
//! vocabulary: cl100k_base
//! cache_capacity: 4096
//! overheads:
//!   multi_tool_response: 13
//! ```

use crate::tokens::Vocabulary;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed token overheads applied by the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overheads {
    /// Every reply is primed with `<|start|>assistant<|message|>`.
    pub reply_priming: usize,
    pub per_message: usize,
    pub per_tool_call: usize,
    pub per_name: usize,
    /// Added to a message carrying both text content and tool calls.
    pub content_with_tool_calls: usize,
    /// Added once to requests with two or more tool-response messages.
    /// Empirically calibrated; the cause is unknown, so recalibrate it if the
    /// upstream formatting changes.
    pub multi_tool_response: usize,
    /// Added by [`crate::Counter::count_tools`] to the rendered block.
    pub tool_block_estimate: usize,
}

impl Default for Overheads {
    fn default() -> Self {
        Self {
            reply_priming: 3,
            per_message: 3,
            per_tool_call: 4,
            per_name: 1,
            content_with_tool_calls: 4,
            multi_tool_response: 13,
            tool_block_estimate: 3,
        }
    }
}

/// Construction-time settings for a [`crate::Counter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Use this vocabulary instead of the one mapped from the model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vocabulary>,
    /// Enable an LRU cache of per-text counts with this many entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
    pub overheads: Overheads,
}

impl CounterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn with_overheads(mut self, overheads: Overheads) -> Self {
        self.overheads = overheads;
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid counter config: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid counter config: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == Some(0) {
            return Err(Error::configuration_with_context(
                "cache capacity must be positive",
                ErrorContext::new()
                    .with_field_path("cache_capacity")
                    .with_details("omit the field to disable caching"),
            ));
        }
        Ok(())
    }
}
