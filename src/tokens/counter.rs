//! The token estimator.

use super::cache::CachingTokenizer;
use super::tokenizer::{BpeTokenizer, Tokenizer};
use super::vocabulary::Vocabulary;
use crate::config::{CounterConfig, Overheads};
use crate::render::{render_document, render_tool_choice, render_tool_definitions, KeyStyle};
use crate::types::{ChatRequest, ChatResponse, Message, MessageRole, ToolChoice, ToolDefinition};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Counts the tokens a chat-completion request or response consumes.
///
/// A counter is bound to one vocabulary and one set of [`Overheads`]. It is
/// `Send + Sync`; the vocabulary table is shared read-only between all
/// counters of the same vocabulary. Custom [`Tokenizer`]s plugged in through
/// [`Counter::from_tokenizer`] must be safe to share the same way.
///
/// ```rust,no_run
/// use chat_token_counter::{ChatRequest, Counter, Message};
///
/// let counter = Counter::new("gpt-4")?;
/// let request = ChatRequest::new(vec![Message::system("This is a system message.")]);
/// assert_eq!(counter.count_request(&request), 13);
/// # Ok::<(), chat_token_counter::Error>(())
/// ```
pub struct Counter {
    model: Option<String>,
    vocabulary: Option<Vocabulary>,
    tokenizer: Arc<dyn Tokenizer>,
    overheads: Overheads,
}

/// Where the rendered tool definitions were placed for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolInjection {
    /// Appended to the first system message, at this index of the request.
    AppendedToSystem { index: usize },
    /// No system message existed; a new one was counted in front.
    PrependedSystem,
}

/// A request's token count and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestUsage {
    pub total: usize,
    pub priming: usize,
    /// Per-message counts including the per-message overhead, in the order
    /// the model sees them (a prepended tool system message comes first).
    pub messages: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_injection: Option<ToolInjection>,
    pub multi_tool_correction: usize,
    pub tool_choice: usize,
}

impl Counter {
    /// Create a counter for `model` with the default overheads.
    pub fn new(model: &str) -> Result<Self> {
        Self::with_config(model, CounterConfig::default())
    }

    pub fn with_config(model: &str, config: CounterConfig) -> Result<Self> {
        config.validate()?;
        let vocabulary = config
            .vocabulary
            .or_else(|| Vocabulary::for_model(model))
            .ok_or_else(|| Error::UnknownModel {
                model: model.to_string(),
            })?;

        let bpe: Arc<dyn Tokenizer> = Arc::new(BpeTokenizer::load(vocabulary)?);
        let tokenizer: Arc<dyn Tokenizer> = match config.cache_capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => Arc::new(CachingTokenizer::new(bpe, capacity)),
            None => bpe,
        };

        tracing::debug!(
            model,
            vocabulary = %vocabulary,
            cache_capacity = config.cache_capacity,
            "created token counter"
        );
        Ok(Self {
            model: Some(model.to_string()),
            vocabulary: Some(vocabulary),
            tokenizer,
            overheads: config.overheads,
        })
    }

    /// Count with any tokenizer instead of a named vocabulary.
    pub fn from_tokenizer(tokenizer: Arc<dyn Tokenizer>, overheads: Overheads) -> Self {
        Self {
            model: None,
            vocabulary: None,
            tokenizer,
            overheads,
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn vocabulary(&self) -> Option<Vocabulary> {
        self.vocabulary
    }

    pub fn overheads(&self) -> &Overheads {
        &self.overheads
    }

    /// Number of tokens in `text`.
    pub fn count_text(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.tokenizer.count(text)
    }

    /// Tokens of a single message, without the per-message request overhead.
    pub fn count_message(&self, message: &Message) -> usize {
        let mut count = self.count_text(message.role.as_str());

        // JSON tool results are re-rendered with quoted keys before tokenizing.
        count += match message.role {
            MessageRole::Tool => match parse_object(&message.content) {
                Some(object) => self.count_text(&render_document(&object, KeyStyle::Quoted)),
                None => {
                    tracing::trace!("tool content is not a JSON object; counting raw text");
                    self.count_text(&message.content)
                }
            },
            _ => self.count_text(&message.content),
        };

        for call in &message.tool_calls {
            count += self.overheads.per_tool_call
                + self.count_text(call.kind.as_str())
                + self.count_text(&call.function.name) * 2;
            match parse_object(&call.function.arguments) {
                Some(arguments) => {
                    count += self.count_text(&render_document(&arguments, KeyStyle::Unquoted));
                }
                None => {
                    tracing::trace!(
                        call_id = %call.id,
                        function = %call.function.name,
                        "tool call arguments are not a JSON object; skipping them"
                    );
                }
            }
        }

        if message.has_tool_calls() && !message.content.is_empty() {
            count += self.overheads.content_with_tool_calls;
        }

        if let Some(name) = message.name.as_deref().filter(|n| !n.is_empty()) {
            count += self.count_text(name) + self.overheads.per_name;
        }

        count
    }

    /// Prompt tokens of a request.
    pub fn count_request(&self, request: &ChatRequest) -> usize {
        self.request_usage(request).total
    }

    /// Prompt tokens of a request, broken down by source.
    pub fn request_usage(&self, request: &ChatRequest) -> RequestUsage {
        let overheads = &self.overheads;
        let mut usage = RequestUsage {
            priming: overheads.reply_priming,
            ..RequestUsage::default()
        };

        // The tool block is counted as part of a system message. The caller's
        // request is left untouched; only the affected message is copied.
        let tool_block =
            (!request.tools.is_empty()).then(|| render_tool_definitions(&request.tools));
        let mut augmented_system = None;
        if let Some(block) = &tool_block {
            match request
                .messages
                .iter()
                .position(|m| m.role == MessageRole::System)
            {
                Some(index) => {
                    let mut system = request.messages[index].clone();
                    system.content = format!("{}\n\n{}", system.content, block);
                    augmented_system = Some((index, system));
                    usage.tool_injection = Some(ToolInjection::AppendedToSystem { index });
                }
                None => {
                    let system = Message::system(block.as_str());
                    usage
                        .messages
                        .push(overheads.per_message + self.count_message(&system));
                    usage.tool_injection = Some(ToolInjection::PrependedSystem);
                }
            }
        }

        for (index, message) in request.messages.iter().enumerate() {
            let message = match &augmented_system {
                Some((system_index, system)) if *system_index == index => system,
                _ => message,
            };
            usage
                .messages
                .push(overheads.per_message + self.count_message(message));
        }

        if request.tool_message_count() >= 2 {
            usage.multi_tool_correction = overheads.multi_tool_response;
        }

        if let Some(name) = request.tool_choice.as_ref().and_then(ToolChoice::function_name) {
            usage.tool_choice = self.count_text(&render_tool_choice(name));
        }

        usage.total = usage.priming
            + usage.messages.iter().sum::<usize>()
            + usage.multi_tool_correction
            + usage.tool_choice;
        tracing::trace!(?usage, "counted request");
        usage
    }

    /// Completion tokens of a response. Roles are not charged to completions.
    pub fn count_response(&self, response: &ChatResponse) -> usize {
        response
            .choices
            .iter()
            .map(|choice| {
                self.count_message(&choice.message)
                    .saturating_sub(self.count_text(choice.message.role.as_str()))
            })
            .sum()
    }

    /// Estimated tokens for a set of tool definitions.
    ///
    /// This is an approximation: the real contribution depends on whether the
    /// block is appended to an existing system message or becomes one of its
    /// own. Use [`Counter::count_request`] for exact numbers.
    pub fn count_tools(&self, tools: &[ToolDefinition]) -> usize {
        self.count_text(&render_tool_definitions(tools)) + self.overheads.tool_block_estimate
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("model", &self.model)
            .field("vocabulary", &self.vocabulary)
            .field("overheads", &self.overheads)
            .finish_non_exhaustive()
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
