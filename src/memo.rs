// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Optional memoization: a pure function cache over `prob_next`, keyed on
//! query contents. Not required for correctness — an
//! engine behaves identically with or without it — but large workloads that
//! repeat queries (e.g. scoring the same prefixes across several candidate
//! continuations) benefit from skipping the binary search entirely on a
//! cache hit.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::engine::InfiniGramEngine;
use crate::error::Result;
use crate::types::{NextTokenResult, TokenId};

/// Wraps an [`InfiniGramEngine`] with a read-through cache over `prob_next`.
/// Safe for concurrent use: reads take a shared lock, a miss upgrades to an
/// exclusive lock only to insert.
pub struct MemoizedEngine {
    engine: InfiniGramEngine,
    cache: RwLock<HashMap<Vec<TokenId>, NextTokenResult>>,
}

impl MemoizedEngine {
    pub fn new(engine: InfiniGramEngine) -> Self {
        Self {
            engine,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &InfiniGramEngine {
        &self.engine
    }

    /// Same contract as [`InfiniGramEngine::prob_next`], transparently
    /// cached by exact query contents.
    pub fn prob_next(&self, q: &[TokenId]) -> Result<NextTokenResult> {
        if let Some(hit) = self.cache.read().get(q) {
            return Ok(hit.clone());
        }
        let result = self.engine.prob_next(q)?;
        self.cache.write().insert(q.to_vec(), result.clone());
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }
}
