/// Corpus Trainer — trains a constrained-generation corpus from raw text.
///
/// Usage: corpus_trainer --input <file.txt> --output <corpus.ron> --order <1-5>
use std::env;
use std::path::Path;
use std::process;
use std::time::Instant;

use versemark::core::corpus::{Corpus, SimpleTokenizer};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut input = None;
    let mut output = None;
    let mut order = 3usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = Some(args[i].clone());
            }
            "--output" => {
                i += 1;
                output = Some(args[i].clone());
            }
            "--order" => {
                i += 1;
                order = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --order must be a number between 1 and 5");
                    process::exit(1);
                });
            }
            "--help" | "-h" => {
                println!(
                    "Usage: corpus_trainer --input <file.txt> --output <corpus.ron> --order <1-5>"
                );
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input.unwrap_or_else(|| {
        eprintln!("Error: --input is required");
        eprintln!("Usage: corpus_trainer --input <file.txt> --output <corpus.ron> --order <1-5>");
        process::exit(1);
    });

    let output_path = output.unwrap_or_else(|| {
        eprintln!("Error: --output is required");
        eprintln!("Usage: corpus_trainer --input <file.txt> --output <corpus.ron> --order <1-5>");
        process::exit(1);
    });

    if !(1..=5).contains(&order) {
        eprintln!("Error: --order must be between 1 and 5");
        process::exit(1);
    }

    println!("Training order-{} corpus from '{}'...", order, input_path);
    let start = Instant::now();
    let corpus = Corpus::from_file(Path::new(&input_path), order, &SimpleTokenizer)
        .unwrap_or_else(|e| {
            eprintln!("Error training corpus from '{}': {}", input_path, e);
            process::exit(1);
        });

    println!(
        "Trained in {:?}: {} sentences, {} words, {} indexed runs",
        start.elapsed(),
        corpus.sentences().len(),
        corpus.words().len(),
        corpus.index().len()
    );

    corpus.save(Path::new(&output_path)).unwrap_or_else(|e| {
        eprintln!("Error writing '{}': {}", output_path, e);
        process::exit(1);
    });
    println!("Corpus saved to '{}'", output_path);
}
