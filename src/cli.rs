// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the `ingram` command-line tool.
//!
//! Four subcommands: `build` turns a directory of documents into a model
//! directory, `query` runs `prob_next`/`longest_matching_next` against a
//! built model, `generate` runs greedy decoding, and `inspect` prints the
//! persisted manifest and header metadata for a model directory.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ingram", about = "Infini-gram language model engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a model directory from a directory of `.txt` documents.
    Build {
        /// Directory containing one document per `.txt` file.
        #[arg(short, long)]
        input: String,

        /// Output model directory.
        #[arg(short, long)]
        output: String,

        /// Tokenizer to train/use: "word" or "byte".
        #[arg(long, default_value = "word")]
        tokenizer: String,
    },

    /// Run `prob_next` for a whitespace-separated query against a model.
    Query {
        /// Model directory produced by `build`.
        #[arg(short, long)]
        model: String,

        /// Query text, tokenized with the model's tokenizer.
        query: String,

        /// Minimum occurrence count for `longest_matching_next`.
        #[arg(long, default_value_t = 1)]
        min_count: usize,
    },

    /// Greedily decode a continuation for a query.
    Generate {
        /// Model directory produced by `build`.
        #[arg(short, long)]
        model: String,

        /// Prompt text, tokenized with the model's tokenizer.
        prompt: String,

        /// Maximum output length in tokens, prompt included.
        #[arg(long, default_value_t = 32)]
        max_len: usize,
    },

    /// Print manifest and array metadata for a model directory.
    Inspect {
        /// Model directory produced by `build`.
        model: String,
    },
}
