//! Corpus orchestration — tokenization, one-time model and index
//! construction, and the generation entry points callers actually use.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::generate::{generate, Constraint, GenerateError};
use crate::core::index::OrderIndex;
use crate::core::model::{ModelError, TransitionModel};
use crate::core::semantic::{
    generate_semantic, similar_words, GeneratedSentence, SimilarityProvider,
};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A single token of a raw line, with its punctuation flag. Punctuation is
/// kept for display but excluded from the trained vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub punctuation: bool,
}

/// Splits a raw line into lowercase tokens with punctuation flags.
pub trait Tokenizer {
    fn tokenize(&self, line: &str) -> Vec<Token>;
}

/// Punctuation characters split into their own tokens.
const PUNCTUATION: &[char] = &['.', '!', '?', ',', ';', ':', '"', '\''];

/// Default tokenizer: lowercases, splits on whitespace, and peels
/// punctuation marks off into separate flagged tokens.
#[derive(Debug, Clone, Default)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for word in line.split_whitespace() {
            let lowered = word.to_lowercase();
            let mut remaining = lowered.as_str();
            while !remaining.is_empty() {
                let first = match remaining.chars().next() {
                    Some(c) => c,
                    None => break,
                };
                if PUNCTUATION.contains(&first) {
                    tokens.push(Token {
                        text: first.to_string(),
                        punctuation: true,
                    });
                    remaining = &remaining[first.len_utf8()..];
                    continue;
                }

                if let Some(pos) = remaining.find(|c: char| PUNCTUATION.contains(&c)) {
                    tokens.push(Token {
                        text: remaining[..pos].to_string(),
                        punctuation: false,
                    });
                    remaining = &remaining[pos..];
                } else {
                    tokens.push(Token {
                        text: remaining.to_string(),
                        punctuation: false,
                    });
                    break;
                }
            }
        }
        tokens
    }
}

/// A trained corpus: the tokenized sentences plus the transition model and
/// provenance index built once over them.
///
/// Construction is the only mutation; every generation entry point takes
/// `&self`, so a corpus can be shared across threads for concurrent
/// read-only generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    order: usize,
    sentences: Vec<Vec<Token>>,
    model: TransitionModel,
    index: OrderIndex,
}

impl Corpus {
    /// Tokenize every non-empty line of `text` and train the model and
    /// provenance index of the given order over the punctuation-filtered
    /// sentences.
    pub fn from_text<T: Tokenizer>(
        text: &str,
        order: usize,
        tokenizer: &T,
    ) -> Result<Self, CorpusError> {
        let sentences: Vec<Vec<Token>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| tokenizer.tokenize(line))
            .collect();

        let filtered: Vec<Vec<String>> = sentences
            .iter()
            .map(|sentence| {
                sentence
                    .iter()
                    .filter(|t| !t.punctuation)
                    .map(|t| t.text.clone())
                    .collect()
            })
            .collect();

        let model = TransitionModel::train(&filtered, order)?;
        // Runs longer than the model order say nothing about the walk, so
        // the index is capped there.
        let index = OrderIndex::with_max_run(&filtered, order);

        Ok(Self {
            order,
            sentences,
            model,
            index,
        })
    }

    /// Read a text file and train from it.
    pub fn from_file<T: Tokenizer>(
        path: &Path,
        order: usize,
        tokenizer: &T,
    ) -> Result<Self, CorpusError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(&text, order, tokenizer)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    /// Raw tokenized sentences, punctuation included.
    pub fn sentences(&self) -> &[Vec<Token>] {
        &self.sentences
    }

    /// Distinct non-punctuation words of the corpus, sorted.
    pub fn words(&self) -> Vec<String> {
        self.model.vocabulary()
    }

    /// Draw `n` sentences under one constraint vector, each annotated with
    /// its provenance orders.
    pub fn generate_sentences(
        &self,
        constraints: &[Constraint],
        n: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<GeneratedSentence>, CorpusError> {
        let mut sentences = Vec::with_capacity(n);
        for _ in 0..n {
            let tokens = generate(&self.model, constraints, rng)?;
            let orders = self.index.all_orders(&tokens);
            sentences.push(GeneratedSentence { tokens, orders });
        }
        Ok(sentences)
    }

    /// Generate up to `n` sentences of `length` words steered toward the
    /// vocabulary most similar to `sense`. Empty when nothing worked.
    pub fn generate_semantic<P: SimilarityProvider>(
        &self,
        provider: &P,
        sense: &str,
        length: usize,
        n: usize,
        top_k: usize,
        rng: &mut StdRng,
    ) -> Vec<GeneratedSentence> {
        generate_semantic(
            &self.model,
            &self.index,
            provider,
            sense,
            length,
            n,
            top_k,
            rng,
        )
    }

    /// The `top_k` corpus words most similar to `sense`, best first.
    pub fn similar_words<P: SimilarityProvider>(
        &self,
        provider: &P,
        sense: &str,
        top_k: usize,
    ) -> Vec<String> {
        similar_words(&self.model, provider, sense, top_k)
    }

    /// Save the trained corpus to a RON file.
    pub fn save(&self, path: &Path) -> Result<(), CorpusError> {
        let serialized = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a trained corpus from a RON file.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let contents = std::fs::read_to_string(path)?;
        let corpus: Corpus = ron::from_str(&contents)?;
        Ok(corpus)
    }
}
