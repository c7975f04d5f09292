//! # chat-token-counter
//!
//! Estimates how many tokens an OpenAI-style chat-completion request or
//! response consumes, before the request is sent.
//!
//! ## Overview
//!
//! Providers charge and limit requests by tokens, but a request is not plain
//! text: messages are wrapped in a fixed framing, tool definitions are turned
//! into a TypeScript-like `namespace functions` block inside the system
//! message, and tool-call arguments are re-rendered before the model sees
//! them. This crate reproduces those renderings and tokenizes the result with
//! the model's BPE vocabulary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chat_token_counter::{ChatRequest, Counter, Message, ToolDefinition};
//!
//! let counter = Counter::new("gpt-4")?;
//! let request = ChatRequest::new(vec![Message::user("I want to ski at Killington this weekend.")])
//!     .with_tools(vec![ToolDefinition::function(
//!         "get_current_weather",
//!         Some("Get the current weather"),
//!         serde_json::json!({
//!             "type": "object",
//!             "properties": {"location": {"type": "string"}},
//!             "required": ["location"]
//!         }),
//!     )]);
//! println!("prompt tokens: {}", counter.count_request(&request));
//! # Ok::<(), chat_token_counter::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Messages, tool definitions, requests and responses |
//! | [`render`] | Text renderings applied before tokenization |
//! | [`tokens`] | Tokenizers, vocabularies and the [`Counter`] |
//! | [`config`] | Counter configuration and overhead constants |

pub mod config;
pub mod render;
pub mod tokens;
pub mod types;

pub use config::{CounterConfig, Overheads};
pub use tokens::{Counter, RequestUsage, Tokenizer, Vocabulary};
pub use types::{
    chat::{ChatRequest, ChatResponse, Choice},
    message::{Message, MessageRole},
    tool::{ToolCall, ToolChoice, ToolDefinition},
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
