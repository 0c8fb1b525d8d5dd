// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Suffix array: construction and lexicographic search.
//!
//! # Algorithm choice
//!
//! The classic induced-sorting construction (SA-IS) depends on the input
//! ending in one symbol that is unique and strictly smaller than everything
//! else, so that the final suffix sorts first and every induction step has a
//! base case. Our token stream `S` ends in `EOD`, but `EOD` also recurs once
//! per document earlier in the stream — it is not a unique terminator, so
//! SA-IS's standard base case does not apply without first appending an
//! artificial sentinel and stripping it back out.
//!
//! Instead this module builds `SA` by prefix doubling (Manber–Myers):
//! maintain a rank per position, and each round sort by the pair
//! `(rank[i], rank[i+k])`, doubling `k` until all ranks are distinct. A
//! position whose second half runs past the end of `S` is treated as
//! lexicographically smallest — exactly the "shorter suffix sorts first"
//! tie-break this module's search functions use, so it falls out with no
//! special-casing. This is `O(N log^2 N))` with `sort_unstable_by_key`,
//! standard and easy to verify by inspection.

use std::cmp::Ordering;

use crate::error::{IngramError, Result};
use crate::types::{MatchRange, TokenId};

/// The suffix array `SA`: a permutation of `0..N` sorting the suffixes of a
/// token stream lexicographically (shorter-is-less at a tied prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    sa: Vec<u32>,
}

impl SuffixArray {
    /// Build the suffix array of `s` in `O(N log^2 N)` time.
    pub fn build(s: &[TokenId]) -> Result<Self> {
        let n = s.len();
        if n == 0 {
            return Ok(Self { sa: Vec::new() });
        }
        if n > u32::MAX as usize {
            return Err(IngramError::BuildFailure(format!(
                "token stream length {n} exceeds the u32 suffix array index limit"
            )));
        }

        let mut sa: Vec<usize> = (0..n).collect();
        let mut rank: Vec<i64> = s.iter().map(|&t| i64::from(t)).collect();
        let mut tmp: Vec<i64> = vec![0; n];

        // Initial sort by single-symbol rank, then densify to 0..distinct-1.
        sa.sort_unstable_by_key(|&i| rank[i]);
        densify(&sa, &rank, &mut tmp, |i| rank[i]);
        rank.copy_from_slice(&tmp);

        let mut k: usize = 1;
        while (rank[sa[n - 1]] as usize) < n - 1 {
            let second = |i: usize| -> i64 {
                if i + k < n {
                    rank[i + k]
                } else {
                    -1
                }
            };
            sa.sort_unstable_by_key(|&i| (rank[i], second(i)));
            densify(&sa, &rank, &mut tmp, |i| (rank[i], second(i)));
            rank.copy_from_slice(&tmp);
            k *= 2;
            debug_assert!(k <= 2 * n + 2, "prefix doubling failed to converge");
        }

        let sa: Vec<u32> = sa.into_iter().map(|x| x as u32).collect();
        Ok(Self { sa })
    }

    /// Construct directly from an already-sorted permutation, as when loading
    /// a persisted artifact. Callers are responsible for validity; use
    /// [`SuffixArray::is_sorted`] to check if the source is untrusted.
    pub fn from_parts(sa: Vec<u32>) -> Self {
        Self { sa }
    }

    pub fn len(&self) -> usize {
        self.sa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.sa
    }

    /// Smallest `i` such that `S[SA[i]:SA[i]+|Q|] >= Q` lexicographically.
    pub fn lower_bound(&self, s: &[TokenId], q: &[TokenId]) -> usize {
        let mut lo = 0usize;
        let mut hi = self.sa.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if compare_suffix(s, self.sa[mid] as usize, q) == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Smallest `i` such that `S[SA[i]:SA[i]+|Q|] > Q` lexicographically.
    pub fn upper_bound(&self, s: &[TokenId], q: &[TokenId]) -> usize {
        let mut lo = 0usize;
        let mut hi = self.sa.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if compare_suffix(s, self.sa[mid] as usize, q) == Ordering::Greater {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }

    /// Locate the inclusive match range for a non-empty query, or `None` if
    /// `q` does not occur in `s`.
    pub fn search_range(&self, s: &[TokenId], q: &[TokenId]) -> Option<MatchRange> {
        if q.is_empty() {
            return None;
        }
        let lower = self.lower_bound(s, q);
        if lower >= self.sa.len() {
            return None;
        }
        if compare_suffix(s, self.sa[lower] as usize, q) != Ordering::Equal {
            return None;
        }
        let upper = self.upper_bound(s, q);
        Some((lower, upper - 1))
    }

    /// `true` iff the suffixes are in non-decreasing lexicographic order.
    /// Used by contracts and tests, not the query path.
    pub fn is_sorted(&self, s: &[TokenId]) -> bool {
        self.sa.windows(2).all(|w| {
            compare_two_suffixes(s, w[0] as usize, w[1] as usize) != Ordering::Greater
        })
    }

    /// `true` iff `self` is a permutation of `0..s.len()`.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.sa.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &i in &self.sa {
            let i = i as usize;
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}

/// Compare suffix `s[start..start+q.len()]` against `q`. A suffix shorter
/// than `q` at some position is strictly less.
fn compare_suffix(s: &[TokenId], start: usize, q: &[TokenId]) -> Ordering {
    let n = s.len();
    for (k, &qt) in q.iter().enumerate() {
        let pos = start + k;
        if pos >= n {
            return Ordering::Less;
        }
        match s[pos].cmp(&qt) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Full lexicographic comparison of two suffixes of `s` (used only for the
/// `is_sorted` contract check, not the hot query path).
fn compare_two_suffixes(s: &[TokenId], a: usize, b: usize) -> Ordering {
    let (mut i, mut j) = (a, b);
    loop {
        match (s.get(i), s.get(j)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(y) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                other => return other,
            },
        }
    }
}

/// Turn the current sort order `sa` into dense 0-based ranks (ties get equal
/// ranks), writing into `tmp`.
fn densify<K: Ord>(sa: &[usize], _rank: &[i64], tmp: &mut [i64], key: impl Fn(usize) -> K) {
    tmp[sa[0]] = 0;
    for w in 1..sa.len() {
        let bump = i64::from(key(sa[w - 1]) < key(sa[w]));
        tmp[sa[w]] = tmp[sa[w - 1]] + bump;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[u32]) -> Vec<TokenId> {
        v.to_vec()
    }

    #[test]
    fn build_is_sorted_and_permutation() {
        let stream = s(&[1, 2, 3, 0, 1, 2, 4, 0]);
        let sa = SuffixArray::build(&stream).unwrap();
        assert!(sa.is_permutation_of(stream.len()));
        assert!(sa.is_sorted(&stream));
    }

    #[test]
    fn build_empty_stream() {
        let sa = SuffixArray::build(&[]).unwrap();
        assert_eq!(sa.len(), 0);
    }

    #[test]
    fn build_single_token() {
        let sa = SuffixArray::build(&[5]).unwrap();
        assert_eq!(sa.as_slice(), &[0]);
    }

    #[test]
    fn build_repeated_tokens() {
        // Repeated EOD-like values stress the "no unique sentinel" case.
        let stream = s(&[0, 0, 0, 0]);
        let sa = SuffixArray::build(&stream).unwrap();
        assert!(sa.is_permutation_of(4));
        assert!(sa.is_sorted(&stream));
        // Shortest suffix (just the final 0) sorts first among ties.
        assert_eq!(sa.as_slice()[0], 3);
    }

    #[test]
    fn search_range_finds_exact_match() {
        let stream = s(&[1, 2, 3, 0, 1, 2, 4, 0]);
        let sa = SuffixArray::build(&stream).unwrap();
        let range = sa.search_range(&stream, &[1, 2]).unwrap();
        assert_eq!(range.1 - range.0 + 1, 2);
    }

    #[test]
    fn search_range_absent_query() {
        let stream = s(&[1, 2, 3, 0, 1, 2, 4, 0]);
        let sa = SuffixArray::build(&stream).unwrap();
        assert!(sa.search_range(&stream, &[9]).is_none());
    }

    #[test]
    fn search_range_monotone_in_suffix_length() {
        let stream = s(&[1, 2, 3, 0, 1, 2, 4, 0]);
        let sa = SuffixArray::build(&stream).unwrap();
        let count = |q: &[TokenId]| -> usize {
            sa.search_range(&stream, q)
                .map(|(f, l)| l - f + 1)
                .unwrap_or(0)
        };
        assert!(count(&[2]) >= count(&[1, 2]));
        assert!(count(&[1, 2]) >= count(&[9, 1, 2]));
    }
}
