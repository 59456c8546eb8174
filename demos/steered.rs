/// Semantic steering end to end: train a tiny corpus, rank its vocabulary
/// against a sense word with a toy similarity table, and print the steered
/// sentences with their provenance orders.
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;

use versemark::core::corpus::{Corpus, SimpleTokenizer};
use versemark::core::semantic::SimilarityProvider;

/// Symmetric pair-score table standing in for a real word-vector model.
/// Pairs not listed are unknown, so the ranker skips those words.
struct PairTable {
    scores: FxHashMap<(String, String), f32>,
}

impl PairTable {
    fn new(entries: &[(&str, &str, f32)]) -> Self {
        let mut scores = FxHashMap::default();
        for (a, b, score) in entries {
            scores.insert((a.to_string(), b.to_string()), *score);
            scores.insert((b.to_string(), a.to_string()), *score);
        }
        Self { scores }
    }
}

impl SimilarityProvider for PairTable {
    fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        self.scores.get(&(a.to_string(), b.to_string())).copied()
    }
}

const LYRICS: &str = "\
the night wraps the harbor in fog
my heart beats like a drum in the dark
she holds my heart in her cold hands
true love is a lantern in the storm
the storm took the lantern and the light
my love waits by the harbor wall
the drum of the rain on the window
her hands held the rain and the light";

fn main() {
    let corpus = Corpus::from_text(LYRICS, 3, &SimpleTokenizer).expect("corpus trains");

    let provider = PairTable::new(&[
        ("affection", "love", 0.92),
        ("affection", "heart", 0.81),
        ("affection", "holds", 0.55),
        ("affection", "hands", 0.40),
        ("affection", "storm", 0.10),
    ]);

    let ranked = corpus.similar_words(&provider, "affection", 5);
    println!("Words nearest to 'affection': {:?}", ranked);

    let mut rng = StdRng::seed_from_u64(2024);
    let sentences = corpus.generate_semantic(&provider, "affection", 8, 4, 5, &mut rng);

    if sentences.is_empty() {
        println!("No placement worked for this corpus and length.");
        return;
    }

    for sentence in &sentences {
        println!("{}", sentence);
        println!("  orders: {:?}", sentence.orders);
    }
}
