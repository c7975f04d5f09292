//! # Types Module
//!
//! Strongly-typed representations of the chat-completion inputs the counter
//! understands. The serde shapes follow the OpenAI chat-completion wire format,
//! so recorded request and response bodies can be deserialized directly.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role, content, name and tool calls |
//! | [`MessageRole`] | Message role (system, user, assistant, tool) |
//! | [`ToolCall`] | Function call emitted by the model (raw JSON arguments) |
//! | [`ToolDefinition`] | Function definition with a JSON-Schema parameter tree |
//! | [`ToolChoice`] | Request-level tool choice (mode or forced function) |
//! | [`ChatRequest`] / [`ChatResponse`] | Request and response envelopes |
//!
//! ## Example
//!
//! ```rust
//! use chat_token_counter::types::{ChatRequest, Message, ToolDefinition};
//!
//! let request = ChatRequest::new(vec![
//!     Message::system("You are a helpful assistant"),
//!     Message::user("What's the weather?"),
//! ])
//! .with_tools(vec![ToolDefinition::function(
//!     "get_weather",
//!     Some("Get current weather for a location"),
//!     serde_json::json!({
//!         "type": "object",
//!         "properties": {"location": {"type": "string"}}
//!     }),
//! )]);
//! assert_eq!(request.tools.len(), 1);
//! ```

pub mod chat;
pub mod message;
pub mod tool;

pub use chat::{ChatRequest, ChatResponse, Choice};
pub use message::{Message, MessageRole};
pub use tool::{
    FunctionCall, FunctionDefinition, FunctionName, ToolCall, ToolChoice, ToolChoiceFunction,
    ToolDefinition, ToolKind,
};
