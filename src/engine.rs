// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The infini-gram engine: the query surface over a built token stream and
//! suffix array pair, plus persistence.

use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::corpus;
use crate::error::{IngramError, Result};
use crate::persist::{self, header, Manifest};
use crate::retrieve;
use crate::suffix_array::SuffixArray;
use crate::tokenizer::Tokenizer;
use crate::types::{MatchRange, NextTokenResult, TokenId};

/// An immutable, query-ready infini-gram model. Cheap to clone: the token
/// stream and suffix array are shared via `Arc`, so cloning an engine shares
/// memory rather than copying it, matching a read-only concurrent query
/// model where many callers hold the same engine.
#[derive(Clone)]
pub struct InfiniGramEngine {
    s: Arc<[TokenId]>,
    sa: Arc<SuffixArray>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl InfiniGramEngine {
    /// Build `S` from `documents` via `tokenizer`, then build `SA` over it.
    pub fn build(documents: &[String], tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        let s = corpus::build_token_stream(documents, tokenizer.as_ref())?;
        let sa = SuffixArray::build(&s)?;
        Ok(Self {
            s: Arc::from(s),
            sa: Arc::new(sa),
            tokenizer,
        })
    }

    pub fn vocab_size(&self) -> usize {
        self.tokenizer.vocab_size()
    }

    pub fn token_stream_len(&self) -> usize {
        self.s.len()
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    fn eod(&self) -> TokenId {
        self.tokenizer.eod_id()
    }

    /// All occurrences of `q` extended by one token. `q` must be non-empty
    /// and not end in `EOD`.
    pub fn matching_next(&self, q: &[TokenId]) -> Result<Vec<Vec<TokenId>>> {
        self.check_query_nonempty_no_trailing_eod(q)?;
        let (_, range) = retrieve::count(&self.sa, &self.s, q);
        Ok(match range {
            Some(range) => retrieve::retrieve(&self.sa, &self.s, q, 1, range),
            None => Vec::new(),
        })
    }

    /// Binary search over the suffix length `n` for the largest `n` whose
    /// trailing suffix of `q` occurs at least `min_count` times, then the
    /// extension-1 windows for that suffix. Returns the windows and the
    /// winning `n`.
    pub fn longest_matching_next(
        &self,
        q: &[TokenId],
        min_count: usize,
    ) -> (Vec<Vec<TokenId>>, usize) {
        let (n_star, range_star) = self.longest_matching_suffix(q, min_count);
        match range_star {
            Some(range) => {
                let suffix = &q[q.len() - n_star..];
                (
                    retrieve::retrieve(&self.sa, &self.s, suffix, 1, range),
                    n_star,
                )
            }
            None => (Vec::new(), 0),
        }
    }

    /// The binary search itself, isolated so `prob_next` can reuse it without
    /// re-deriving windows it won't use until it knows `n*`.
    fn longest_matching_suffix(
        &self,
        q: &[TokenId],
        min_count: usize,
    ) -> (usize, Option<MatchRange>) {
        let mut left: i64 = 0;
        let mut right: i64 = q.len() as i64;
        let mut n_star = 0usize;
        let mut range_star: Option<MatchRange> = None;

        while left <= right {
            let mid = (left + right) / 2;
            if mid == 0 {
                left = mid + 1;
                continue;
            }
            let mid = mid as usize;
            let suffix = &q[q.len() - mid..];
            let (n, range) = retrieve::count(&self.sa, &self.s, suffix);
            if n >= min_count {
                n_star = mid;
                range_star = range;
                left = mid as i64 + 1;
            } else {
                right = mid as i64 - 1;
            }
        }

        (n_star, range_star)
    }

    /// Empirical next-token distribution over the longest suffix of `q` with
    /// at least one match. `q` must contain no `EOD`.
    pub fn prob_next(&self, q: &[TokenId]) -> Result<NextTokenResult> {
        if q.contains(&self.eod()) {
            return Err(IngramError::InvalidQuery(
                "query must not contain EOD".to_string(),
            ));
        }
        if q.is_empty() {
            return Ok(NextTokenResult::not_found());
        }

        let (windows, n_star) = self.longest_matching_next(q, 1);
        if windows.is_empty() {
            return Ok(NextTokenResult::not_found());
        }

        let vocab = self.tokenizer.vocab_size();
        let mut count = vec![0u32; vocab];
        for window in &windows {
            let next = window[n_star] as usize;
            if next < vocab {
                count[next] += 1;
            }
        }
        let total = windows.len() as f64;
        let distr: Vec<f64> = count.iter().map(|&c| f64::from(c) / total).collect();

        Ok(NextTokenResult {
            distr: Some(distr),
            count: Some(count),
            effective_n: n_star,
        })
    }

    /// Repeatedly append the argmax next token (lowest id on ties) until
    /// `EOD` or `max_len` is reached.
    pub fn greedy(&self, q: &[TokenId], max_len: usize) -> Result<Vec<TokenId>> {
        let mut current = q.to_vec();
        let eod = self.eod();
        while current.len() < max_len {
            let result = self.prob_next(&current)?;
            let Some(next) = result.argmax() else {
                break;
            };
            current.push(next);
            if next == eod {
                break;
            }
        }
        Ok(current)
    }

    /// Runs `prob_next` over many queries via contiguous chunked dispatch;
    /// result order matches input order regardless of worker scheduling.
    pub fn prob_next_batch(
        &self,
        qs: &[Vec<TokenId>],
        parallelism: usize,
    ) -> Result<Vec<NextTokenResult>> {
        if qs.is_empty() {
            return Ok(Vec::new());
        }
        let parallelism = parallelism.max(1);
        if parallelism == 1 {
            return qs.iter().map(|q| self.prob_next(q)).collect();
        }

        let chunk_size = qs.len().div_ceil(parallelism);
        let chunks: Vec<&[Vec<TokenId>]> = qs.chunks(chunk_size.max(1)).collect();

        #[cfg(feature = "parallel")]
        {
            let chunk_results: Vec<Result<Vec<NextTokenResult>>> = chunks
                .par_iter()
                .map(|chunk| chunk.iter().map(|q| self.prob_next(q)).collect())
                .collect();
            let mut out = Vec::with_capacity(qs.len());
            for chunk_result in chunk_results {
                out.extend(chunk_result?);
            }
            Ok(out)
        }
        #[cfg(not(feature = "parallel"))]
        {
            let mut out = Vec::with_capacity(qs.len());
            for chunk in chunks {
                for q in chunk {
                    out.push(self.prob_next(q)?);
                }
            }
            Ok(out)
        }
    }

    /// `prob_next` over every non-empty prefix of `x`, as a batch of `|x|`
    /// queries.
    pub fn forced_gen(&self, x: &[TokenId]) -> Result<Vec<NextTokenResult>> {
        let prefixes: Vec<Vec<TokenId>> = (1..=x.len()).map(|i| x[..i].to_vec()).collect();
        #[cfg(feature = "parallel")]
        let parallelism = rayon::current_num_threads();
        #[cfg(not(feature = "parallel"))]
        let parallelism = 1;
        self.prob_next_batch(&prefixes, parallelism)
    }

    fn check_query_nonempty_no_trailing_eod(&self, q: &[TokenId]) -> Result<()> {
        if q.is_empty() {
            return Err(IngramError::InvalidQuery("query must be non-empty".to_string()));
        }
        if *q.last().unwrap() == self.eod() {
            return Err(IngramError::InvalidQuery(
                "query must not end in EOD".to_string(),
            ));
        }
        Ok(())
    }

    /// Persist the token stream, suffix array, tokenizer, and a manifest to
    /// `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        persist::write_token_stream(dir, &self.s)?;
        persist::write_suffix_array(dir, self.sa.as_slice())?;
        self.tokenizer.save(dir)?;
        let manifest = Manifest {
            format_version: header::VERSION,
            token_width: 4,
            sa_width: 4,
            n: self.s.len() as u64,
            vocab_size: self.tokenizer.vocab_size(),
            eod_id: self.tokenizer.eod_id(),
            tokenizer_kind: self.tokenizer.kind().to_string(),
        };
        manifest.write(dir)
    }

    /// Load the token stream and suffix array from `dir`, pairing them with
    /// an already-loaded `tokenizer` (the tokenizer persists itself; this
    /// only cross-checks its kind against the manifest). Fails if the
    /// manifest's recorded tokenizer kind disagrees, or if the loaded data
    /// fails its structural or range checks.
    pub fn load(dir: &Path, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        let manifest = Manifest::read(dir)?;
        if manifest.tokenizer_kind != tokenizer.kind() {
            return Err(IngramError::CorruptArtifact(format!(
                "manifest records tokenizer kind '{}' but a '{}' tokenizer was supplied",
                manifest.tokenizer_kind,
                tokenizer.kind()
            )));
        }

        let s = persist::read_token_stream(dir)?;
        let sa_raw = persist::read_suffix_array(dir)?;
        if sa_raw.len() != s.len() {
            return Err(IngramError::CorruptArtifact(format!(
                "token stream length {} does not match suffix array length {}",
                s.len(),
                sa_raw.len()
            )));
        }

        let sa = SuffixArray::from_parts(sa_raw);
        if !sa.is_permutation_of(s.len()) {
            return Err(IngramError::CorruptArtifact(
                "suffix array is not a valid permutation of the token stream".to_string(),
            ));
        }

        let vocab_size = tokenizer.vocab_size();
        if let Some(&bad) = s.iter().find(|&&id| id as usize >= vocab_size) {
            return Err(IngramError::CorruptArtifact(format!(
                "token stream contains id {bad} outside vocab size {vocab_size}"
            )));
        }

        Ok(Self {
            s: Arc::from(s),
            sa: Arc::new(sa),
            tokenizer,
        })
    }
}
