/// Preview — generates sentences from a trained corpus and prints each one
/// with its per-position provenance orders.
///
/// Usage: preview --corpus <corpus.ron> [--length N] [--count N]
///                [--word WORD [--at POS]] [--seed N]
///
/// Or train on the fly: preview --input <file.txt> [--order N] ...
use std::env;
use std::path::Path;
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;

use versemark::core::corpus::{Corpus, CorpusError, SimpleTokenizer};
use versemark::core::generate::{Constraint, GenerateError};

const USAGE: &str = "Usage: preview --corpus <corpus.ron> | --input <file.txt> [--order N] \
[--length N] [--count N] [--word WORD [--at POS]] [--seed N]";

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut corpus_path = None;
    let mut input_path = None;
    let mut order = 3usize;
    let mut length = 10usize;
    let mut count = 5usize;
    let mut word: Option<String> = None;
    let mut at: Option<usize> = None;
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--corpus" => {
                i += 1;
                corpus_path = Some(args[i].clone());
            }
            "--input" => {
                i += 1;
                input_path = Some(args[i].clone());
            }
            "--order" => {
                i += 1;
                order = parse_num(&args[i], "--order");
            }
            "--length" => {
                i += 1;
                length = parse_num(&args[i], "--length");
            }
            "--count" => {
                i += 1;
                count = parse_num(&args[i], "--count");
            }
            "--word" => {
                i += 1;
                word = Some(args[i].to_lowercase());
            }
            "--at" => {
                i += 1;
                at = Some(parse_num(&args[i], "--at"));
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_num(&args[i], "--seed") as u64);
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let corpus = match (&corpus_path, &input_path) {
        (Some(path), _) => Corpus::load(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading corpus '{}': {}", path, e);
            process::exit(1);
        }),
        (None, Some(path)) => {
            Corpus::from_file(Path::new(path), order, &SimpleTokenizer).unwrap_or_else(|e| {
                eprintln!("Error training corpus from '{}': {}", path, e);
                process::exit(1);
            })
        }
        (None, None) => {
            eprintln!("Error: --corpus or --input is required");
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if length == 0 {
        eprintln!("Error: --length must be positive");
        process::exit(1);
    }

    let mut constraints = vec![Constraint::Free; length];
    if let Some(ref word) = word {
        let position = at.unwrap_or(length / 2);
        if position >= length {
            eprintln!("Error: --at {} is outside the sentence length {}", position, length);
            process::exit(1);
        }
        constraints[position] = Constraint::one_of([word.clone()]);
        println!(
            "Pinning '{}' at position {} of {} words",
            word, position, length
        );
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match corpus.generate_sentences(&constraints, count, &mut rng) {
        Ok(sentences) => {
            for sentence in &sentences {
                println!("{}", sentence);
                println!("  orders: {:?}", sentence.orders);
            }
        }
        Err(CorpusError::Generate(GenerateError::ConstraintUnsatisfiable { position })) => {
            eprintln!(
                "Could not satisfy the constraint at position {}; try another \
position or a larger corpus",
                position
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            process::exit(1);
        }
    }
}

fn parse_num(value: &str, flag: &str) -> usize {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: {} must be a number", flag);
        process::exit(1);
    })
}
