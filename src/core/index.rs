//! Provenance lookup — which corpus n-gram does a generated fragment
//! reproduce, and how long is it.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Hashed index of every contiguous token run occurring in the training
/// corpus, up to a maximum run length.
///
/// Substring closure holds: every sub-run of a stored run is itself stored,
/// so for a fixed end position the matching lengths form an unbroken range
/// starting at 1. `longest_match` exploits that to stop at the first miss.
/// Built once; safe for concurrent read-only queries afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderIndex {
    runs: FxHashSet<Vec<String>>,
    max_run: usize,
}

impl OrderIndex {
    /// Index every contiguous run of every sentence, up to the longest
    /// sentence in the corpus.
    pub fn build(sentences: &[Vec<String>]) -> Self {
        let longest = sentences.iter().map(Vec::len).max().unwrap_or(0);
        Self::with_max_run(sentences, longest)
    }

    /// Index contiguous runs no longer than `max_run` tokens.
    ///
    /// A corpus-backed generator caps this at its model order, since runs
    /// longer than the order say nothing about how the walk got there.
    pub fn with_max_run(sentences: &[Vec<String>], max_run: usize) -> Self {
        let mut runs = FxHashSet::default();
        for sentence in sentences {
            let cap = max_run.min(sentence.len());
            for len in 1..=cap {
                for run in sentence.windows(len) {
                    runs.insert(run.to_vec());
                }
            }
        }
        Self { runs, max_run }
    }

    /// Length of the longest run ending at `position` that also occurs
    /// contiguously somewhere in the corpus; 0 when even the single token
    /// at `position` is unknown. Bounded by the indexed maximum run length.
    pub fn longest_match(&self, sequence: &[String], position: usize) -> usize {
        let upper = (position + 1).min(self.max_run);
        let mut best = 0;
        for len in 1..=upper {
            if self.runs.contains(&sequence[position + 1 - len..=position]) {
                best = len;
            } else {
                break;
            }
        }
        best
    }

    /// `longest_match` at every position of the sequence.
    pub fn all_orders(&self, sequence: &[String]) -> Vec<usize> {
        (0..sequence.len())
            .map(|position| self.longest_match(sequence, position))
            .collect()
    }

    /// Number of distinct runs stored.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// True when nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn corpus() -> Vec<Vec<String>> {
        vec![
            sent(&["the", "wind", "howls", "tonight"]),
            sent(&["the", "rain", "falls"]),
        ]
    }

    #[test]
    fn verbatim_sentence_matches_its_full_length() {
        let index = OrderIndex::build(&corpus());
        let probe = sent(&["the", "wind", "howls", "tonight"]);
        assert_eq!(index.longest_match(&probe, 3), 4);
        assert_eq!(index.all_orders(&probe), vec![1, 2, 3, 4]);
    }

    #[test]
    fn known_single_token_matches_at_least_one() {
        let index = OrderIndex::build(&corpus());
        let probe = sent(&["rain"]);
        assert_eq!(index.longest_match(&probe, 0), 1);
    }

    #[test]
    fn unknown_token_matches_zero() {
        let index = OrderIndex::build(&corpus());
        let probe = sent(&["volcano"]);
        assert_eq!(index.longest_match(&probe, 0), 0);
    }

    #[test]
    fn novel_junction_resets_the_run() {
        let index = OrderIndex::build(&corpus());
        // "wind falls" never occurs, so the run restarts at "falls".
        let probe = sent(&["the", "wind", "falls"]);
        assert_eq!(index.all_orders(&probe), vec![1, 2, 1]);
    }

    #[test]
    fn build_is_insertion_order_insensitive() {
        let forward = OrderIndex::build(&corpus());
        let mut shuffled = corpus();
        shuffled.reverse();
        let backward = OrderIndex::build(&shuffled);

        assert_eq!(forward.len(), backward.len());
        let probe = sent(&["the", "rain", "falls", "tonight"]);
        assert_eq!(forward.all_orders(&probe), backward.all_orders(&probe));
    }

    #[test]
    fn queries_are_idempotent() {
        let index = OrderIndex::build(&corpus());
        let probe = sent(&["the", "wind", "howls"]);
        let first = index.all_orders(&probe);
        let second = index.all_orders(&probe);
        assert_eq!(first, second);
    }

    #[test]
    fn max_run_caps_reported_orders() {
        let index = OrderIndex::with_max_run(&corpus(), 2);
        let probe = sent(&["the", "wind", "howls", "tonight"]);
        assert_eq!(index.all_orders(&probe), vec![1, 2, 2, 2]);
    }

    #[test]
    fn probe_longer_than_any_sentence_is_fine() {
        let index = OrderIndex::build(&corpus());
        let probe = sent(&[
            "the", "wind", "howls", "tonight", "the", "rain", "falls", "the",
        ]);
        let orders = index.all_orders(&probe);
        assert_eq!(orders.len(), 8);
        assert_eq!(orders[3], 4);
        assert_eq!(orders[6], 3); // "the rain falls"
    }

    #[test]
    fn empty_corpus_builds_an_empty_index() {
        let index = OrderIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.longest_match(&sent(&["word"]), 0), 0);
    }
}
