// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core data model: token ids, the reserved end-of-document marker, and the
//! next-token result shape queries return.

/// A vocabulary element. Non-negative by construction (`u32`).
pub type TokenId = u32;

/// The token stream `S`: the concatenation of every document's tokens,
/// each followed by `EOD`. Immutable once built.
pub type TokenStream = Vec<TokenId>;

/// An inclusive `(first, last)` index range into the suffix array.
pub type MatchRange = (usize, usize);

/// Result of a next-token query: `prob_next`, `forced_gen`.
///
/// `distr` and `count` are `None` exactly when `effective_n == 0`, i.e. no
/// suffix of the query (down to length 1) met the minimum-count threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct NextTokenResult {
    /// Empirical next-token distribution over the vocabulary, or `None`.
    pub distr: Option<Vec<f64>>,
    /// Raw next-token counts over the vocabulary, or `None`.
    pub count: Option<Vec<u32>>,
    /// Length of the longest query suffix that met the minimum-count
    /// threshold; `0` iff no continuation exists.
    pub effective_n: usize,
}

impl NextTokenResult {
    /// The "no continuation found" result: absent distribution, `effective_n = 0`.
    pub fn not_found() -> Self {
        Self {
            distr: None,
            count: None,
            effective_n: 0,
        }
    }

    /// The token with the highest probability, lowest id wins ties. `None`
    /// when there is no distribution to argmax over.
    pub fn argmax(&self) -> Option<TokenId> {
        let distr = self.distr.as_ref()?;
        distr
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .map(|(i, _)| i as TokenId)
    }
}
