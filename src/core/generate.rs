//! Constrained sentence generation — back-off sampling under per-position
//! word-set constraints.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::core::model::{TransitionModel, SENTENCE_END, SENTENCE_START};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("model has no transitions to sample from")]
    EmptyModel,
    #[error("no candidate word satisfies the constraint at position {position}")]
    ConstraintUnsatisfiable { position: usize },
}

/// Per-position restriction on a generated sentence.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Any word the model can reach.
    Free,
    /// The word at this position must come from the given set.
    OneOf(FxHashSet<String>),
}

impl Constraint {
    /// Convenience constructor for a word-set constraint.
    pub fn one_of<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf(words.into_iter().map(Into::into).collect())
    }

    fn admits(&self, token: &str) -> bool {
        match self {
            Constraint::Free => true,
            Constraint::OneOf(words) => words.contains(token),
        }
    }
}

/// Generate a sentence of exactly `constraints.len()` tokens.
///
/// Walks left to right keeping the last order-1 accepted tokens as context
/// (start-padded at the beginning). Per position, the distribution is the
/// highest back-off pool that still offers a real word — the end sentinel
/// is never eligible, since the constraint slice fixes the length — and the
/// position's constraint then restricts that distribution before a weighted
/// draw. An empty restriction fails the whole attempt: there is no partial
/// backtracking, callers retry with a different constraint placement
/// instead.
pub fn generate(
    model: &TransitionModel,
    constraints: &[Constraint],
    rng: &mut StdRng,
) -> Result<Vec<String>, GenerateError> {
    if model.is_empty() {
        return Err(GenerateError::EmptyModel);
    }

    let mut tokens: Vec<String> = Vec::with_capacity(constraints.len());
    let mut context: Vec<String> =
        vec![SENTENCE_START.to_string(); model.order.saturating_sub(1)];

    for (position, constraint) in constraints.iter().enumerate() {
        // Highest back-off level with at least one non-sentinel word.
        let pool = model
            .backoff_pools(&context)
            .find(|options| options.iter().any(|(tok, _)| tok != SENTENCE_END))
            .ok_or(GenerateError::ConstraintUnsatisfiable { position })?;

        let admissible: Vec<&(String, u32)> = pool
            .iter()
            .filter(|(tok, _)| tok != SENTENCE_END && constraint.admits(tok))
            .collect();
        if admissible.is_empty() {
            return Err(GenerateError::ConstraintUnsatisfiable { position });
        }

        let next = sample_weighted(&admissible, rng)
            .ok_or(GenerateError::ConstraintUnsatisfiable { position })?
            .clone();

        tokens.push(next.clone());
        slide_context(&mut context, next, model.order);
    }

    Ok(tokens)
}

/// Generate without a fixed length: walk until the end sentinel is drawn,
/// hard-capped at `max_len` tokens so the walk always terminates.
pub fn generate_open(
    model: &TransitionModel,
    max_len: usize,
    rng: &mut StdRng,
) -> Result<Vec<String>, GenerateError> {
    if model.is_empty() {
        return Err(GenerateError::EmptyModel);
    }

    let mut tokens: Vec<String> = Vec::new();
    let mut context: Vec<String> =
        vec![SENTENCE_START.to_string(); model.order.saturating_sub(1)];

    for _ in 0..max_len {
        let Some(pool) = model.candidates(&context) else {
            break;
        };
        let options: Vec<&(String, u32)> = pool.iter().collect();
        let Some(next) = sample_weighted(&options, rng) else {
            break;
        };
        if next == SENTENCE_END {
            break;
        }
        let next = next.clone();
        tokens.push(next.clone());
        slide_context(&mut context, next, model.order);
    }

    Ok(tokens)
}

/// Slide the context window: append and drop from the front past order-1.
fn slide_context(context: &mut Vec<String>, token: String, order: usize) {
    context.push(token);
    if context.len() > order.saturating_sub(1) {
        context.remove(0);
    }
}

/// Weighted draw over candidate (token, count) pairs.
fn sample_weighted<'a>(
    options: &[&'a (String, u32)],
    rng: &mut StdRng,
) -> Option<&'a String> {
    let weights: Vec<u32> = options.iter().map(|(_, count)| *count).collect();
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(&options[dist.sample(rng)].0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sent(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn love_corpus() -> Vec<Vec<String>> {
        vec![
            sent(&["i", "love", "you"]),
            sent(&["you", "love", "me"]),
            sent(&["we", "love", "them"]),
            sent(&["they", "love", "us"]),
        ]
    }

    fn model() -> TransitionModel {
        TransitionModel::train(&love_corpus(), 2).unwrap()
    }

    #[test]
    fn free_vector_always_fills_the_length() {
        let model = model();
        let mut rng = StdRng::seed_from_u64(7);
        for length in [1usize, 3, 10, 25] {
            let constraints = vec![Constraint::Free; length];
            let tokens = generate(&model, &constraints, &mut rng).unwrap();
            assert_eq!(tokens.len(), length);
            assert!(tokens.iter().all(|t| t != SENTENCE_END && t != SENTENCE_START));
        }
    }

    #[test]
    fn generation_is_deterministic_under_a_seed() {
        let model = model();
        let constraints = vec![Constraint::Free; 8];
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        assert_eq!(
            generate(&model, &constraints, &mut rng1).unwrap(),
            generate(&model, &constraints, &mut rng2).unwrap()
        );
    }

    #[test]
    fn pinned_word_lands_at_its_position() {
        let model = model();
        let mut rng = StdRng::seed_from_u64(3);
        // Position 0 draws from the start context (i/you/we/they), position
        // 1 then always offers "love".
        let constraints = vec![
            Constraint::Free,
            Constraint::one_of(["love"]),
            Constraint::Free,
        ];
        for _ in 0..20 {
            let tokens = generate(&model, &constraints, &mut rng).unwrap();
            assert_eq!(tokens[1], "love");
        }
    }

    #[test]
    fn unreachable_word_is_unsatisfiable() {
        let model = model();
        let mut rng = StdRng::seed_from_u64(11);
        // The start-context pool is i/you/we/they; "love" is not in it,
        // and constraints do not re-back-off past the observed context.
        let constraints = vec![Constraint::one_of(["love"]), Constraint::Free];
        let err = generate(&model, &constraints, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::ConstraintUnsatisfiable { position: 0 }
        ));
    }

    #[test]
    fn unknown_word_is_unsatisfiable_anywhere() {
        let model = model();
        let mut rng = StdRng::seed_from_u64(5);
        let constraints = vec![Constraint::Free, Constraint::one_of(["volcano"])];
        assert!(matches!(
            generate(&model, &constraints, &mut rng),
            Err(GenerateError::ConstraintUnsatisfiable { position: 1 })
        ));
    }

    #[test]
    fn empty_model_is_reported_as_such() {
        let empty = TransitionModel::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate(&empty, &[Constraint::Free], &mut rng),
            Err(GenerateError::EmptyModel)
        ));
        assert!(matches!(
            generate_open(&empty, 10, &mut rng),
            Err(GenerateError::EmptyModel)
        ));
    }

    #[test]
    fn open_generation_stops_at_the_end_sentinel() {
        let model = model();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let tokens = generate_open(&model, 64, &mut rng).unwrap();
            // Training sentences are three words; a bigram walk can wander
            // but always terminates within the cap.
            assert!(tokens.len() <= 64);
            assert!(tokens.iter().all(|t| t != SENTENCE_END));
        }
    }

    #[test]
    fn open_generation_respects_the_cap() {
        // A looping corpus with no end in sight still terminates.
        let corpus = vec![sent(&["round", "and", "round", "and", "round"])];
        let model = TransitionModel::train(&corpus, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let tokens = generate_open(&model, 12, &mut rng).unwrap();
            assert!(tokens.len() <= 12);
        }
    }

    #[test]
    fn sampling_tracks_training_frequencies() {
        // Unigram model where "sun" is three times as frequent as "moon".
        let corpus = vec![
            sent(&["sun"]),
            sent(&["sun"]),
            sent(&["sun"]),
            sent(&["moon"]),
        ];
        let model = TransitionModel::train(&corpus, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(1234);
        let constraints = vec![Constraint::Free];

        let draws = 4000;
        let mut suns = 0usize;
        for _ in 0..draws {
            if generate(&model, &constraints, &mut rng).unwrap()[0] == "sun" {
                suns += 1;
            }
        }
        let ratio = suns as f64 / draws as f64;
        assert!(
            (ratio - 0.75).abs() < 0.05,
            "expected ~0.75 sun frequency, got {ratio}"
        );
    }
}
