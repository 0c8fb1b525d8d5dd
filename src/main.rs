// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `ingram` CLI: build, query, generate, and inspect infini-gram models.
//!
//! ```bash
//! ingram build --input ./docs --output ./model
//! ingram query --model ./model "the cat"
//! ingram generate --model ./model "the cat" --max-len 16
//! ingram inspect ./model
//! ```

use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use ingram::error::{IngramError, Result};
use ingram::persist::Manifest;
use ingram::tokenizer::{ByteTokenizer, Tokenizer, WordTokenizer};
use ingram::InfiniGramEngine;

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            tokenizer,
        } => run_build(&input, &output, &tokenizer),
        Commands::Query {
            model,
            query,
            min_count,
        } => run_query(&model, &query, min_count),
        Commands::Generate {
            model,
            prompt,
            max_len,
        } => run_generate(&model, &prompt, max_len),
        Commands::Inspect { model } => run_inspect(&model),
    };

    if let Err(e) = result {
        eprintln!("❌ {e}");
        process::exit(1);
    }
}

fn read_documents(input: &Path) -> Result<Vec<String>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(input)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt") {
            documents.push(fs::read_to_string(&path)?);
        }
    }
    documents.sort();
    Ok(documents)
}

#[cfg(feature = "parallel")]
fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap();
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn run_build(input: &str, output: &str, tokenizer_kind: &str) -> Result<()> {
    let input = Path::new(input);
    let output = Path::new(output);

    #[cfg(feature = "parallel")]
    let pb = spinner("Reading documents...");
    let documents = read_documents(input)?;
    #[cfg(feature = "parallel")]
    pb.finish_with_message(format!("Read {} documents", documents.len()));

    let tokenizer: Arc<dyn Tokenizer> = match tokenizer_kind {
        "word" => Arc::new(WordTokenizer::train(&documents)),
        "byte" => Arc::new(ByteTokenizer::new()),
        other => {
            return Err(IngramError::InvalidQuery(format!(
                "unknown tokenizer kind '{other}', expected 'word' or 'byte'"
            )))
        }
    };

    #[cfg(feature = "parallel")]
    let pb = spinner("Building suffix array...");
    let start = Instant::now();
    let engine = InfiniGramEngine::build(&documents, tokenizer)?;
    let elapsed = start.elapsed();
    #[cfg(feature = "parallel")]
    pb.finish_with_message(format!(
        "Built index over {} tokens in {:.2?}",
        engine.token_stream_len(),
        elapsed
    ));
    #[cfg(not(feature = "parallel"))]
    println!(
        "Built index over {} tokens in {:.2?}",
        engine.token_stream_len(),
        elapsed
    );

    engine.save(output)?;
    println!("Saved model to {}", output.display());
    Ok(())
}

fn load_tokenizer(model: &Path) -> Result<Arc<dyn Tokenizer>> {
    let manifest = Manifest::read(model)?;
    Ok(match manifest.tokenizer_kind.as_str() {
        "word" => Arc::new(WordTokenizer::load(model)?) as Arc<dyn Tokenizer>,
        "byte" => Arc::new(ByteTokenizer::load(model)?) as Arc<dyn Tokenizer>,
        other => {
            return Err(IngramError::CorruptArtifact(format!(
                "manifest records unknown tokenizer kind '{other}'"
            )))
        }
    })
}

fn run_query(model: &str, query: &str, min_count: usize) -> Result<()> {
    let model = Path::new(model);
    let tokenizer = load_tokenizer(model)?;
    let engine = InfiniGramEngine::load(model, tokenizer.clone())?;

    let q = tokenizer.encode_one(query);
    let (windows, effective_n) = engine.longest_matching_next(&q, min_count);
    println!("effective_n = {effective_n}, matches = {}", windows.len());

    let result = engine.prob_next(&q)?;
    if let Some(distr) = result.distr {
        let mut ranked: Vec<(usize, f64)> = distr.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        for (id, p) in ranked.into_iter().filter(|(_, p)| *p > 0.0).take(10) {
            let word = tokenizer.decode_one(&[id as u32]);
            println!("  {word:>12} {p:.4}");
        }
    } else {
        println!("  no continuation found");
    }
    Ok(())
}

fn run_generate(model: &str, prompt: &str, max_len: usize) -> Result<()> {
    let model = Path::new(model);
    let tokenizer = load_tokenizer(model)?;
    let engine = InfiniGramEngine::load(model, tokenizer.clone())?;

    let q = tokenizer.encode_one(prompt);
    let generated = engine.greedy(&q, max_len)?;
    println!("{}", tokenizer.decode_one(&generated));
    Ok(())
}

fn run_inspect(model: &str) -> Result<()> {
    let model = Path::new(model);
    let manifest = Manifest::read(model)?;
    println!("format_version  = {}", manifest.format_version);
    println!("tokenizer_kind  = {}", manifest.tokenizer_kind);
    println!("vocab_size      = {}", manifest.vocab_size);
    println!("eod_id          = {}", manifest.eod_id);
    println!("N (token count) = {}", manifest.n);

    let tokenizer = load_tokenizer(model)?;
    match InfiniGramEngine::load(model, tokenizer) {
        Ok(_) => println!("status          = valid (checksums and structure OK)"),
        Err(e) => println!("status          = INVALID: {e}"),
    }
    Ok(())
}
