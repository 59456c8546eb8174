//! Semantic steering — ranks the corpus vocabulary against a sense word
//! and searches sentence positions where the ranked words can be placed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::generate::{generate, Constraint, GenerateError};
use crate::core::index::OrderIndex;
use crate::core::model::{TransitionModel, SENTENCE_END, SENTENCE_START};

/// Word-pair similarity oracle, backed by whatever semantic model the host
/// application brings.
///
/// `None` means the pair is unknown to the backing model; rankers skip such
/// words rather than scoring them zero.
pub trait SimilarityProvider {
    fn similarity(&self, a: &str, b: &str) -> Option<f32>;
}

/// A generated sentence with per-position provenance: `orders[i]` is the
/// length of the longest corpus n-gram ending at token `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSentence {
    pub tokens: Vec<String>,
    pub orders: Vec<usize>,
}

impl fmt::Display for GeneratedSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if token == SENTENCE_START || token == SENTENCE_END {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
            first = false;
        }
        Ok(())
    }
}

/// Rank the model vocabulary by similarity to `sense`, best first, keeping
/// the top `top_k`. Words the provider does not know are skipped.
pub fn similar_words<P: SimilarityProvider>(
    model: &TransitionModel,
    provider: &P,
    sense: &str,
    top_k: usize,
) -> Vec<String> {
    let mut scored: Vec<(f32, String)> = model
        .vocabulary()
        .into_iter()
        .filter_map(|word| {
            provider
                .similarity(sense, &word)
                .map(|score| (score, word))
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(top_k);
    scored.into_iter().map(|(_, word)| word).collect()
}

/// Generate up to `n` sentences of `length` words, each containing one of
/// the `top_k` vocabulary words most similar to `sense`.
///
/// Positions `0..length` are tried in a uniformly shuffled order; at each,
/// the candidate set is pinned there and `n` sentences are drawn. Any
/// failed draw abandons that placement and moves to the next position —
/// the first placement whose whole batch succeeds wins. This finds the
/// first workable placement, not the best one.
///
/// Returns an empty vector when no vocabulary word has a defined
/// similarity to `sense`, or when every placement fails. That is a
/// legitimate "could not do it" outcome, not an error.
#[allow(clippy::too_many_arguments)]
pub fn generate_semantic<P: SimilarityProvider>(
    model: &TransitionModel,
    index: &OrderIndex,
    provider: &P,
    sense: &str,
    length: usize,
    n: usize,
    top_k: usize,
    rng: &mut StdRng,
) -> Vec<GeneratedSentence> {
    let ranked = similar_words(model, provider, sense, top_k);
    if ranked.is_empty() || length == 0 {
        return Vec::new();
    }
    let pool: FxHashSet<String> = ranked.into_iter().collect();

    let mut positions: Vec<usize> = (0..length).collect();
    positions.shuffle(rng);

    for position in positions {
        let mut constraints = vec![Constraint::Free; length];
        constraints[position] = Constraint::OneOf(pool.clone());

        match draw_batch(model, index, &constraints, n, rng) {
            Ok(sentences) => return sentences,
            Err(GenerateError::ConstraintUnsatisfiable { .. }) => continue,
            Err(GenerateError::EmptyModel) => return Vec::new(),
        }
    }

    Vec::new()
}

/// Draw `n` sentences for one constraint placement, annotating each with
/// its provenance orders. A single failed draw fails the whole batch.
fn draw_batch(
    model: &TransitionModel,
    index: &OrderIndex,
    constraints: &[Constraint],
    n: usize,
    rng: &mut StdRng,
) -> Result<Vec<GeneratedSentence>, GenerateError> {
    let mut sentences = Vec::with_capacity(n);
    for _ in 0..n {
        let tokens = generate(model, constraints, rng)?;
        let orders = index.all_orders(&tokens);
        sentences.push(GeneratedSentence { tokens, orders });
    }
    Ok(sentences)
}
