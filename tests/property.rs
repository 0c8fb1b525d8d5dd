// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Property tests exercised against the public API (complementing the
//! whitebox property tests in `src/lib.rs`'s own test module).

use std::sync::Arc;

use proptest::prelude::*;

use ingram::tokenizer::WordTokenizer;
use ingram::{InfiniGramEngine, Tokenizer};

fn engine_from_words(words: &[&str]) -> InfiniGramEngine {
    let doc = words.join(" ");
    let tokenizer = Arc::new(WordTokenizer::train(&[doc.clone()]));
    InfiniGramEngine::build(&[doc], tokenizer).unwrap()
}

proptest! {
    /// Whenever a distribution exists, it sums to one.
    #[test]
    fn distr_sums_to_one_when_present(
        picks in prop::collection::vec(0usize..5, 2..20),
    ) {
        let vocab = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let words: Vec<&str> = picks.iter().map(|&i| vocab[i]).collect();
        let engine = engine_from_words(&words);

        for window in 1..words.len() {
            let q = engine.tokenizer().encode_one(&words[..window].join(" "));
            let result = engine.prob_next(&q).unwrap();
            if let Some(distr) = result.distr {
                let total: f64 = distr.iter().sum();
                prop_assert!((total - 1.0).abs() < 1e-9);
            }
        }
    }

    /// Greedy decoding never exceeds max_len and always starts with the prompt.
    #[test]
    fn greedy_respects_max_len_and_prefix(
        picks in prop::collection::vec(0usize..4, 1..10),
        max_len in 1usize..12,
    ) {
        let vocab = ["red", "green", "blue", "yellow"];
        let words: Vec<&str> = picks.iter().map(|&i| vocab[i]).collect();
        let engine = engine_from_words(&words);
        let q = engine.tokenizer().encode_one(&words[0]);

        let seq = engine.greedy(&q, max_len).unwrap();
        prop_assert!(seq.len() <= max_len);
        prop_assert!(seq.len() >= q.len());
        prop_assert_eq!(&seq[..q.len()], &q[..]);
    }
}
