// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer adapter.
//!
//! The engine treats tokenization as an opaque `str -> int[]` function; this
//! module supplies the contract (`Tokenizer`) and two concrete
//! implementations. Neither implementation is assumed to be reversible —
//! `decode(encode(s)) == s` is not guaranteed by the trait, only by whichever
//! impl happens to be lossless.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{IngramError, Result};
use crate::types::TokenId;

/// Reserved token id marking end-of-document. Never emitted by tokenizing
/// document text.
pub const EOD: TokenId = 0;

/// Opaque tokenizer contract. The engine only ever calls through this trait,
/// never assuming any particular scheme underneath.
pub trait Tokenizer: Send + Sync {
    /// Tokenize one string. No special tokens added, no padding.
    fn encode_one(&self, s: &str) -> Vec<TokenId>;

    /// Tokenize many strings, preserving input order in the output.
    fn encode_many(&self, strs: &[String]) -> Vec<Vec<TokenId>> {
        #[cfg(feature = "parallel")]
        {
            strs.par_iter().map(|s| self.encode_one(s)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            strs.iter().map(|s| self.encode_one(s)).collect()
        }
    }

    /// Decode one token sequence back to a string.
    fn decode_one(&self, ids: &[TokenId]) -> String;

    /// Decode many token sequences, preserving order.
    fn decode_many(&self, idss: &[Vec<TokenId>]) -> Vec<String> {
        idss.iter().map(|ids| self.decode_one(ids)).collect()
    }

    /// Reserved end-of-document token id.
    fn eod_id(&self) -> TokenId;

    /// Size of the vocabulary, including reserved ids.
    fn vocab_size(&self) -> usize;

    /// Persist tokenizer state to `dir`.
    fn save(&self, dir: &Path) -> Result<()>;

    /// Short name recorded in `manifest.json` so `load` can sanity-check the
    /// tokenizer a caller supplies against the one a corpus was built with.
    fn kind(&self) -> &'static str;
}

/// One token per input byte, plus a reserved `EOD`. Lossless, vocabulary-free,
/// and useful for tests and fuzzing where a learned vocabulary would only add
/// noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ByteTokenizer;

impl ByteTokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("tokenizer.json");
        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| IngramError::CorruptArtifact(format!("tokenizer.json: {e}")))
    }
}

impl Default for ByteTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for ByteTokenizer {
    fn encode_one(&self, s: &str) -> Vec<TokenId> {
        // Byte values 0..=255 shift by 1 so that 0 stays reserved for EOD.
        s.bytes().map(|b| TokenId::from(b) + 1).collect()
    }

    fn decode_one(&self, ids: &[TokenId]) -> String {
        let bytes: Vec<u8> = ids
            .iter()
            .filter(|&&id| id != EOD)
            .map(|&id| (id - 1) as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn eod_id(&self) -> TokenId {
        EOD
    }

    fn vocab_size(&self) -> usize {
        257 // EOD + 256 byte values
    }

    fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| IngramError::BuildFailure(format!("serializing tokenizer: {e}")))?;
        fs::write(dir.join("tokenizer.json"), bytes)?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "byte"
    }
}

/// A whitespace/punctuation word-level tokenizer with a vocabulary learned
/// once from a training corpus and frozen thereafter. Unseen words at encode
/// time map to `<unk>`.
///
/// Reserved ids: `0 = EOD`, `1 = <unk>`. Ordinary vocabulary starts at `2`,
/// assigned in sorted order of the learned words so that two trainings over
/// the same corpus produce bitwise-identical ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordTokenizer {
    word_to_id: HashMap<String, TokenId>,
    id_to_word: Vec<String>,
}

const UNK: TokenId = 1;

impl WordTokenizer {
    /// Learn a vocabulary from `documents`. Words are Unicode-word-bounded
    /// tokens of a normalized (NFKC) lowercase copy of each document.
    pub fn train(documents: &[String]) -> Self {
        let mut words: Vec<String> = documents
            .iter()
            .flat_map(|doc| Self::split_words(doc))
            .collect();
        words.sort_unstable();
        words.dedup();

        let mut id_to_word: Vec<String> = Vec::with_capacity(words.len() + 2);
        id_to_word.push("<eod>".to_string());
        id_to_word.push("<unk>".to_string());
        id_to_word.extend(words);

        let word_to_id = id_to_word
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as TokenId))
            .collect();

        Self {
            word_to_id,
            id_to_word,
        }
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("tokenizer.json");
        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| IngramError::CorruptArtifact(format!("tokenizer.json: {e}")))
    }

    fn normalize(s: &str) -> String {
        s.nfkc().collect::<String>().to_lowercase()
    }

    fn split_words(s: &str) -> Vec<String> {
        Self::normalize(s)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Tokenizer for WordTokenizer {
    fn encode_one(&self, s: &str) -> Vec<TokenId> {
        Self::split_words(s)
            .into_iter()
            .map(|w| self.word_to_id.get(&w).copied().unwrap_or(UNK))
            .collect()
    }

    fn decode_one(&self, ids: &[TokenId]) -> String {
        ids.iter()
            .filter(|&&id| id != EOD)
            .map(|&id| {
                self.id_to_word
                    .get(id as usize)
                    .map(String::as_str)
                    .unwrap_or("<unk>")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn eod_id(&self) -> TokenId {
        EOD
    }

    fn vocab_size(&self) -> usize {
        self.id_to_word.len()
    }

    fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| IngramError::BuildFailure(format!("serializing tokenizer: {e}")))?;
        fs::write(dir.join("tokenizer.json"), bytes)?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "word"
    }
}
