// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for the infini-gram engine.
//!
//! The library hand-rolls its error type rather than pulling in an error-derive
//! crate: every variant here corresponds to one of the failure modes named in
//! the engine's error-handling design, and the set is small and stable enough
//! that a macro buys nothing.
//!
//! `NotFound` is deliberately absent: a query with no sufficiently-common
//! suffix is a normal result (`effective_n = 0`), never an `Err`.

use std::fmt;
use std::io;

/// Everything that can go wrong building, loading, or querying an engine.
#[derive(Debug)]
pub enum IngramError {
    /// A query violated a precondition: empty, ends with `EOD`, or (for
    /// `prob_next`) contains `EOD` anywhere.
    InvalidQuery(String),
    /// A loaded artifact failed validation: length mismatch between `S` and
    /// `SA`, a bad checksum, or a decoded value out of range.
    CorruptArtifact(String),
    /// Tokenization or suffix array construction failed during a build.
    BuildFailure(String),
    /// A filesystem error occurred during `save`/`load`.
    IoFailure(io::Error),
}

impl fmt::Display for IngramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngramError::InvalidQuery(msg) => write!(f, "invalid query: {msg}"),
            IngramError::CorruptArtifact(msg) => write!(f, "corrupt artifact: {msg}"),
            IngramError::BuildFailure(msg) => write!(f, "build failed: {msg}"),
            IngramError::IoFailure(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for IngramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngramError::IoFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IngramError {
    fn from(err: io::Error) -> Self {
        IngramError::IoFailure(err)
    }
}

pub type Result<T> = std::result::Result<T, IngramError>;
