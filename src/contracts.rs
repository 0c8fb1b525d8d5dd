// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts: `debug_assert!`-based checks for the invariants that
//! hold on a correctly built token stream and suffix array pair. Zero cost
//! in release builds;
//! callers wire them into build and load paths so a broken invariant is
//! caught next to where it was introduced, not three calls later in a
//! confusing query result.

use crate::suffix_array::SuffixArray;
use crate::types::TokenId;

/// `SA` sorts the suffixes of `s` lexicographically, shorter-is-less on a
/// tied prefix.
#[inline]
pub fn check_suffix_array_sorted(sa: &SuffixArray, s: &[TokenId]) {
    debug_assert!(sa.is_sorted(s), "suffix array is not sorted");
}

/// `SA` is a permutation of `0..s.len()`.
#[inline]
pub fn check_suffix_array_permutation(sa: &SuffixArray, s: &[TokenId]) {
    debug_assert!(
        sa.is_permutation_of(s.len()),
        "suffix array is not a permutation of 0..{}",
        s.len()
    );
}

/// A match range is either empty or every suffix inside it genuinely begins
/// with `q`, checked on the side that matters at runtime.
#[inline]
pub fn check_match_range_valid(sa: &SuffixArray, s: &[TokenId], q: &[TokenId], range: Option<(usize, usize)>) {
    if let Some((first, last)) = range {
        debug_assert!(first <= last, "match range is inverted: {first} > {last}");
        debug_assert!(last < sa.len(), "match range runs past the suffix array");
        for i in first..=last {
            let start = sa.as_slice()[i] as usize;
            debug_assert!(
                s[start..].starts_with(q) || (s.len() - start < q.len() && s[start..] == q[..s.len() - start]),
                "suffix array entry {i} does not actually match the query"
            );
        }
    }
}

/// A next-token distribution sums to one within floating-point tolerance.
#[inline]
pub fn check_distr_normalized(distr: &[f64]) {
    let total: f64 = distr.iter().sum();
    debug_assert!(
        (total - 1.0).abs() < 1e-6,
        "next-token distribution sums to {total}, not 1.0"
    );
}

/// `count` is monotonically non-increasing as the suffix length queried
/// grows; exercised directly by proptest, this is the spot check used
/// inside the binary search itself.
#[inline]
pub fn check_monotone_count(shorter_count: usize, longer_count: usize) {
    debug_assert!(
        longer_count <= shorter_count,
        "count({longer_count}) exceeds count of a shorter suffix ({shorter_count}); monotonicity violated"
    );
}
