// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Substring retriever: counting and materializing matches against the
//! suffix array.

use crate::suffix_array::SuffixArray;
use crate::types::{MatchRange, TokenId};

/// The number of occurrences of `q` in `s`, plus the underlying match range.
/// `(0, None)` when `q` does not occur.
pub fn count(sa: &SuffixArray, s: &[TokenId], q: &[TokenId]) -> (usize, Option<MatchRange>) {
    match sa.search_range(s, q) {
        Some(range) => (range.1 - range.0 + 1, Some(range)),
        None => (0, None),
    }
}

/// The match windows `s[sa[i]..sa[i]+q.len()+extend]` for `i` in `range`, in
/// suffix-array order. `extend` must be `0` or `1`.
///
/// A window may run one token past the nominal end of `s` only when the
/// match itself ends exactly at the final position; callers that keep
/// `q.last() != EOD` are guaranteed every match has at least one more token
/// available, since `s` always ends in `EOD`.
pub fn retrieve(
    sa: &SuffixArray,
    s: &[TokenId],
    q: &[TokenId],
    extend: usize,
    range: MatchRange,
) -> Vec<Vec<TokenId>> {
    debug_assert!(extend <= 1, "extend must be 0 or 1");
    let (first, last) = range;
    (first..=last)
        .map(|i| {
            let start = sa.as_slice()[i] as usize;
            let end = (start + q.len() + extend).min(s.len());
            s[start..end].to_vec()
        })
        .collect()
}
