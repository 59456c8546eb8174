//! Multi-order transition model — training, back-off lookup, persistence.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("empty corpus: no usable sentences to train on")]
    EmptyCorpus,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Special token marking sentence start.
pub const SENTENCE_START: &str = "<s>";
/// Special token marking sentence end.
pub const SENTENCE_END: &str = "</s>";

/// One transition table: context (k-1 tokens) → [(next_token, count)].
pub type Table = FxHashMap<Vec<String>, Vec<(String, u32)>>;

/// A trained multi-order n-gram model.
///
/// Holds one table per order k in `1..=order`. The order-k table maps the
/// k-1 preceding tokens to every next token observed after that context,
/// with its count. Counts are sums over all training sentences, so the
/// insertion order of sentences never changes the finished model. Built
/// once; read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransitionModel {
    /// Highest n-gram order trained (tokens per window, prediction included).
    pub order: usize,
    /// `tables[k - 1]` is the order-k table (context length k-1).
    pub tables: Vec<Table>,
}

impl TransitionModel {
    /// Train a model of the given order from punctuation-filtered,
    /// lowercase token sequences.
    ///
    /// Each sentence is padded with k-1 start sentinels and one end
    /// sentinel before the k-window slides over it, so boundary contexts
    /// are modeled. Sentinels appear only as context and as the terminal
    /// next-token, never as an ordinary word.
    pub fn train(sentences: &[Vec<String>], order: usize) -> Result<Self, ModelError> {
        assert!(order >= 1, "model order must be at least 1");

        if sentences.iter().all(|s| s.is_empty()) {
            return Err(ModelError::EmptyCorpus);
        }

        let mut tables: Vec<Table> = vec![Table::default(); order];
        for sentence in sentences.iter().filter(|s| !s.is_empty()) {
            for k in 1..=order {
                let mut padded = vec![SENTENCE_START.to_string(); k - 1];
                padded.extend(sentence.iter().cloned());
                padded.push(SENTENCE_END.to_string());

                for window in padded.windows(k) {
                    let context = window[..k - 1].to_vec();
                    let next = window[k - 1].clone();
                    add_transition(&mut tables[k - 1], context, next);
                }
            }
        }

        Ok(Self { order, tables })
    }

    /// True when the model has nothing to sample from.
    pub fn is_empty(&self) -> bool {
        self.tables.first().map_or(true, |t| t.is_empty())
    }

    /// Candidate pools for a context, highest order first.
    ///
    /// Yields the observed next-token list of every table whose context key
    /// (the k-1 token suffix of `context`) is present, walking k downward.
    /// The unigram table (empty context) is always last, so a trained model
    /// always yields at least one pool.
    pub fn backoff_pools<'a>(
        &'a self,
        context: &'a [String],
    ) -> impl Iterator<Item = &'a [(String, u32)]> + 'a {
        (1..=self.order).rev().filter_map(move |k| {
            let need = k - 1;
            if context.len() < need {
                return None;
            }
            let key = &context[context.len() - need..];
            self.tables
                .get(k - 1)
                .and_then(|table| table.get(key))
                .map(|options| options.as_slice())
        })
    }

    /// The highest-order candidate pool observed for a context, if any.
    ///
    /// This is the default back-off policy: use the longest context the
    /// training data has seen, fall progressively lower otherwise. No
    /// interpolation across orders.
    pub fn candidates<'a>(&'a self, context: &'a [String]) -> Option<&'a [(String, u32)]> {
        self.backoff_pools(context).next()
    }

    /// Distinct non-sentinel tokens observed in training, sorted.
    pub fn vocabulary(&self) -> Vec<String> {
        let Some(unigrams) = self.tables.first() else {
            return Vec::new();
        };
        let mut words: Vec<String> = unigrams
            .values()
            .flatten()
            .filter(|(tok, _)| tok != SENTENCE_START && tok != SENTENCE_END)
            .map(|(tok, _)| tok.clone())
            .collect();
        words.sort();
        words.dedup();
        words
    }

    /// Save the model to a RON file.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let serialized = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a model from a RON file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        let model: TransitionModel = ron::from_str(&contents)?;
        Ok(model)
    }
}

/// Add a transition to a table, incrementing the count.
fn add_transition(table: &mut Table, context: Vec<String>, next: String) {
    let entries = table.entry(context).or_default();
    if let Some(entry) = entries.iter_mut().find(|(tok, _)| tok == &next) {
        entry.1 += 1;
    } else {
        entries.push((next, 1));
    }
}
