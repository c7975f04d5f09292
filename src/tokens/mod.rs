//! # Tokens Module
//!
//! Token accounting for chat-completion requests and responses.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Counter`] | Counts requests, responses, messages and tool definitions |
//! | [`RequestUsage`] | Per-source breakdown of a request count |
//! | [`Tokenizer`] | Trait for subword tokenizers |
//! | [`BpeTokenizer`] | `tiktoken` byte-pair encoding over a shared vocabulary table |
//! | [`CachingTokenizer`] | Wrapper that caches counts per text |
//! | [`Vocabulary`] | Named BPE vocabularies and the model-name mapping |
//!
//! ## Example
//!
//! ```rust,no_run
//! use chat_token_counter::tokens::Counter;
//! use chat_token_counter::types::{ChatRequest, Message};
//!
//! let counter = Counter::new("gpt-4")?;
//! let request = ChatRequest::new(vec![
//!     Message::system("You are a helpful assistant."),
//!     Message::user("What's the weather like in Paris?"),
//! ]);
//! let usage = counter.request_usage(&request);
//! println!("{} prompt tokens ({} messages)", usage.total, usage.messages.len());
//! # Ok::<(), chat_token_counter::Error>(())
//! ```

mod cache;
mod counter;
mod tokenizer;
mod vocabulary;

pub use cache::CachingTokenizer;
pub use counter::{Counter, RequestUsage, ToolInjection};
pub use tokenizer::{BpeTokenizer, Tokenizer};
pub use vocabulary::Vocabulary;
