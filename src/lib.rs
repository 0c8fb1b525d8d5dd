// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Infini-gram: suffix-array-backed n-gram language modeling with `n` chosen
//! per query rather than fixed ahead of time.
//!
//! A corpus is tokenized and concatenated into one stream `S` (each document
//! separated by `EOD`), then a suffix array `SA` is built over `S`. Queries
//! binary-search `SA` for the longest suffix of the query that still occurs
//! often enough in the corpus, and report the empirical distribution over
//! whatever followed it.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌────────────────┐   ┌──────────┐
//! │ tokenizer   │──▶│ corpus    │──▶│ suffix_array   │──▶│ retrieve │
//! │ (str<->ids) │   │ (build S) │   │ (build/search  │   │ (count,  │
//! │             │   │           │   │  SA over S)    │   │ retrieve)│
//! └────────────┘   └───────────┘   └────────────────┘   └──────────┘
//!                                                              │
//!                                                              ▼
//!                                                      ┌───────────────┐
//!                                                      │ engine        │
//!                                                      │ (prob_next,   │
//!                                                      │  greedy, ...) │
//!                                                      └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ingram::tokenizer::{Tokenizer, WordTokenizer};
//! use ingram::engine::InfiniGramEngine;
//! use std::sync::Arc;
//!
//! let docs = vec!["the cat sat".to_string(), "the cat ran".to_string()];
//! let tokenizer = Arc::new(WordTokenizer::train(&docs));
//! let engine = InfiniGramEngine::build(&docs, tokenizer.clone())?;
//!
//! let q = tokenizer.encode_one("the cat");
//! let result = engine.prob_next(&q)?;
//! # Ok::<(), ingram::error::IngramError>(())
//! ```

pub mod contracts;
pub mod corpus;
pub mod engine;
pub mod error;
#[cfg(feature = "cache")]
pub mod memo;
pub mod persist;
pub mod retrieve;
pub mod suffix_array;
pub mod tokenizer;
pub mod types;

pub use engine::InfiniGramEngine;
pub use error::{IngramError, Result};
#[cfg(feature = "cache")]
pub use memo::MemoizedEngine;
pub use suffix_array::SuffixArray;
pub use tokenizer::{ByteTokenizer, Tokenizer, WordTokenizer, EOD};
pub use types::{MatchRange, NextTokenResult, TokenId, TokenStream};

#[cfg(test)]
mod tests {
    //! End-to-end scenarios and property tests over the public API.

    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn engine_from(docs: &[&str]) -> InfiniGramEngine {
        let docs: Vec<String> = docs.iter().map(|s| s.to_string()).collect();
        let tokenizer = Arc::new(WordTokenizer::train(&docs));
        InfiniGramEngine::build(&docs, tokenizer).unwrap()
    }

    #[test]
    fn s1_unambiguous_continuation_splits_evenly() {
        let engine = engine_from(&["a b c", "a b d"]);
        let a = engine.tokenizer().encode_one("a")[0];
        let b = engine.tokenizer().encode_one("b")[0];
        let c = engine.tokenizer().encode_one("c")[0];
        let d = engine.tokenizer().encode_one("d")[0];

        let result = engine.prob_next(&[a, b]).unwrap();
        assert_eq!(result.effective_n, 2);
        let distr = result.distr.unwrap();
        assert!((distr[c as usize] - 0.5).abs() < 1e-9);
        assert!((distr[d as usize] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn s2_unseen_prefix_token_falls_back_to_matching_suffix() {
        let engine = engine_from(&["a b c", "a b d"]);
        let a = engine.tokenizer().encode_one("a")[0];
        let b = engine.tokenizer().encode_one("b")[0];
        let unk = 1; // never trained, always <unk>

        let with_unk = engine.prob_next(&[unk, a, b]).unwrap();
        let without = engine.prob_next(&[a, b]).unwrap();
        assert_eq!(with_unk.effective_n, without.effective_n);
        assert_eq!(with_unk.distr, without.distr);
    }

    #[test]
    fn s3_absent_suffix_has_no_distribution() {
        let engine = engine_from(&["a b c", "a b d"]);
        let result = engine.prob_next(&[1, 1, 1, 1, 1]).unwrap();
        if result.effective_n == 0 {
            assert!(result.distr.is_none());
        }
    }

    #[test]
    fn s4_greedy_breaks_ties_by_lowest_id() {
        let engine = engine_from(&["a b c", "a b d"]);
        let a = engine.tokenizer().encode_one("a")[0];
        let b = engine.tokenizer().encode_one("b")[0];
        let c = engine.tokenizer().encode_one("c")[0];
        let d = engine.tokenizer().encode_one("d")[0];
        let lower = c.min(d);

        let seq = engine.greedy(&[a, b], 5).unwrap();
        assert_eq!(seq[2], lower);
    }

    #[test]
    fn s5_min_count_threshold_prefers_shorter_suffix() {
        // "y" occurs twice ("x y" and "z y"); "x y" itself occurs once. With
        // min_count=2, the two-token suffix fails the threshold and the
        // search falls back to the one-token suffix.
        let engine = engine_from(&["x y", "z y"]);
        let x = engine.tokenizer().encode_one("x")[0];
        let y = engine.tokenizer().encode_one("y")[0];

        let (windows, n) = engine.longest_matching_next(&[x, y], 2);
        assert_eq!(n, 1);
        assert_eq!(windows.len(), 2);
        for w in &windows {
            assert_eq!(w[0], y);
        }
    }

    #[test]
    fn s6_forced_gen_returns_per_position_effective_n() {
        let engine = engine_from(&["a b c", "a b d"]);
        let a = engine.tokenizer().encode_one("a")[0];
        let b = engine.tokenizer().encode_one("b")[0];
        let c = engine.tokenizer().encode_one("c")[0];

        let results = engine.forced_gen(&[a, b, c]).unwrap();
        assert_eq!(results.len(), 3);
        // "a" occurs twice; "a b" occurs twice; "a b c" occurs once but is
        // still its own longest matching suffix (full self-match), so n
        // climbs 1, 2, 3 across the three prefixes.
        assert_eq!(results[0].effective_n, 1);
        assert_eq!(results[1].effective_n, 2);
        assert_eq!(results[2].effective_n, 3);
    }

    proptest! {
        #[test]
        fn suffix_array_always_sorted_and_permuted(
            stream in prop::collection::vec(0u32..5, 0..64)
        ) {
            let sa = SuffixArray::build(&stream).unwrap();
            prop_assert!(sa.is_permutation_of(stream.len()));
            prop_assert!(sa.is_sorted(&stream));
        }

        #[test]
        fn count_is_monotone_in_suffix_length(
            stream in prop::collection::vec(0u32..4, 4..64),
            len in 1usize..4,
        ) {
            let sa = SuffixArray::build(&stream).unwrap();
            let q: Vec<TokenId> = stream[..len.min(stream.len())].to_vec();
            if !q.is_empty() {
                for split in 1..q.len() {
                    let shorter = &q[split..];
                    let (shorter_count, _) = retrieve::count(&sa, &stream, shorter);
                    let (longer_count, _) = retrieve::count(&sa, &stream, &q);
                    prop_assert!(longer_count <= shorter_count);
                }
            }
        }

        #[test]
        fn prob_next_batch_order_matches_sequential(
            picks in prop::collection::vec(0usize..4, 1..12),
            parallelism in 1usize..5,
        ) {
            let engine = engine_from(&["a b c", "a b d", "a c e", "b c d"]);
            let words = ["a", "b", "c", "d"];
            let qs: Vec<Vec<TokenId>> = picks
                .iter()
                .map(|&i| vec![engine.tokenizer().encode_one(words[i])[0]])
                .collect();

            let sequential = engine.prob_next_batch(&qs, 1).unwrap();
            let parallel = engine.prob_next_batch(&qs, parallelism).unwrap();
            prop_assert_eq!(sequential, parallel);
        }
    }
}
