//! Vocabulary resolution and the process-wide table registry.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tiktoken_rs::tokenizer::Tokenizer as TiktokenVocabulary;
use tiktoken_rs::CoreBPE;

/// A named BPE vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vocabulary {
    #[serde(rename = "o200k_base")]
    O200kBase,
    #[serde(rename = "cl100k_base")]
    Cl100kBase,
    #[serde(rename = "p50k_base")]
    P50kBase,
    #[serde(rename = "p50k_edit")]
    P50kEdit,
    #[serde(rename = "r50k_base")]
    R50kBase,
}

impl Vocabulary {
    /// Resolve the vocabulary a model tokenizes with, by exact name or known prefix
    /// (e.g. `gpt-4o-2024-05-13` → `o200k_base`, `gpt-4` → `cl100k_base`).
    pub fn for_model(model: &str) -> Option<Self> {
        tiktoken_rs::tokenizer::get_tokenizer(model).map(Self::from)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Vocabulary::O200kBase => "o200k_base",
            Vocabulary::Cl100kBase => "cl100k_base",
            Vocabulary::P50kBase => "p50k_base",
            Vocabulary::P50kEdit => "p50k_edit",
            Vocabulary::R50kBase => "r50k_base",
        }
    }

    fn tiktoken(self) -> TiktokenVocabulary {
        match self {
            Vocabulary::O200kBase => TiktokenVocabulary::O200kBase,
            Vocabulary::Cl100kBase => TiktokenVocabulary::Cl100kBase,
            Vocabulary::P50kBase => TiktokenVocabulary::P50kBase,
            Vocabulary::P50kEdit => TiktokenVocabulary::P50kEdit,
            Vocabulary::R50kBase => TiktokenVocabulary::R50kBase,
        }
    }
}

impl From<TiktokenVocabulary> for Vocabulary {
    fn from(value: TiktokenVocabulary) -> Self {
        match value {
            TiktokenVocabulary::O200kBase => Vocabulary::O200kBase,
            TiktokenVocabulary::Cl100kBase => Vocabulary::Cl100kBase,
            TiktokenVocabulary::P50kBase => Vocabulary::P50kBase,
            TiktokenVocabulary::P50kEdit => Vocabulary::P50kEdit,
            // GPT-2 shares the r50k table.
            TiktokenVocabulary::R50kBase | TiktokenVocabulary::Gpt2 => Vocabulary::R50kBase,
        }
    }
}

impl std::fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Vocabulary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "o200k_base" => Ok(Vocabulary::O200kBase),
            "cl100k_base" => Ok(Vocabulary::Cl100kBase),
            "p50k_base" => Ok(Vocabulary::P50kBase),
            "p50k_edit" => Ok(Vocabulary::P50kEdit),
            "r50k_base" | "gpt2" => Ok(Vocabulary::R50kBase),
            other => Err(Error::configuration_with_context(
                format!("unknown vocabulary '{}'", other),
                crate::ErrorContext::new()
                    .with_field_path("vocabulary")
                    .with_details("expected one of o200k_base, cl100k_base, p50k_base, p50k_edit, r50k_base"),
            )),
        }
    }
}

// Tables are large and immutable; every counter shares one copy per vocabulary.
static TABLES: Lazy<RwLock<HashMap<Vocabulary, Arc<CoreBPE>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Get the shared table for `vocabulary`, loading it on first use.
pub(crate) fn shared_table(vocabulary: Vocabulary) -> Result<Arc<CoreBPE>> {
    {
        let tables = TABLES.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(bpe) = tables.get(&vocabulary) {
            return Ok(bpe.clone());
        }
    }

    let mut tables = TABLES.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(bpe) = tables.get(&vocabulary) {
        return Ok(bpe.clone());
    }
    let bpe = tiktoken_rs::get_bpe_from_tokenizer(vocabulary.tiktoken()).map_err(|source| {
        Error::Vocabulary {
            vocabulary: vocabulary.name().to_string(),
            source,
        }
    })?;
    tracing::debug!(vocabulary = %vocabulary, "loaded vocabulary table");
    let bpe = Arc::new(bpe);
    tables.insert(vocabulary, bpe.clone());
    Ok(bpe)
}
