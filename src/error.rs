use thiserror::Error;

/// Where a configuration error came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Config key that was rejected (e.g. `cache_capacity`).
    pub field_path: Option<String>,
    /// What was expected instead.
    pub details: Option<String>,
    /// Component that raised the error (e.g. `config_loader`).
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the counter.
///
/// Only construction and configuration can fail. Counting itself is total:
/// malformed tool arguments, non-JSON tool content and unknown schema types
/// degrade to a best-effort rendering instead of surfacing here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No tokenizer vocabulary known for model '{model}'")]
    UnknownModel { model: String },

    #[error("Failed to load vocabulary {vocabulary}: {source}")]
    Vocabulary {
        vocabulary: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let parts: Vec<String> = [
        ("field", &ctx.field_path),
        ("details", &ctx.details),
        ("source", &ctx.source),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
    .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Configuration error carrying the rejected field and component.
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Get the error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
