//! Versemark — constrained Markov sentence generation.
//!
//! Trains multi-order n-gram transition models from tokenized corpora,
//! generates sentences that satisfy per-position word-set constraints,
//! steers generation toward vocabulary semantically related to a sense
//! word, and annotates every output with its provenance: the longest
//! training-corpus n-gram each fragment reproduces.

pub mod core;
