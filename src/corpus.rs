// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus builder: documents + tokenizer -> the concatenated token stream.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{IngramError, Result};
use crate::tokenizer::Tokenizer;
use crate::types::{TokenId, TokenStream};

/// Tokenize every document, append `eod_id` to each, and concatenate in
/// order. Fails fast if tokenization produces `EOD` inside a document's own
/// tokens, since that would violate the "EOD appears after every document
/// and nowhere else" invariant the rest of the engine relies on.
pub fn build_token_stream(documents: &[String], tokenizer: &dyn Tokenizer) -> Result<TokenStream> {
    let eod = tokenizer.eod_id();

    let per_doc: Vec<Vec<TokenId>> = {
        #[cfg(feature = "parallel")]
        {
            documents
                .par_iter()
                .map(|doc| tokenizer.encode_one(doc))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            documents.iter().map(|doc| tokenizer.encode_one(doc)).collect()
        }
    };

    let mut stream = Vec::with_capacity(per_doc.iter().map(Vec::len).sum::<usize>() + per_doc.len());
    for (i, tokens) in per_doc.into_iter().enumerate() {
        if tokens.contains(&eod) {
            return Err(IngramError::BuildFailure(format!(
                "document {i} tokenized to a sequence containing EOD"
            )));
        }
        stream.extend(tokens);
        stream.push(eod);
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;

    #[test]
    fn concatenates_with_eod_separators() {
        let docs = vec!["a b c".to_string(), "a b d".to_string()];
        let tok = WordTokenizer::train(&docs);
        let stream = build_token_stream(&docs, &tok).unwrap();
        assert_eq!(stream.len(), 8); // 3 + 1 + 3 + 1
        assert_eq!(stream[3], tok.eod_id());
        assert_eq!(stream[7], tok.eod_id());
    }

    #[test]
    fn empty_document_still_gets_eod() {
        let docs = vec!["".to_string()];
        let tok = WordTokenizer::train(&docs);
        let stream = build_token_stream(&docs, &tok).unwrap();
        assert_eq!(stream, vec![tok.eod_id()]);
    }

    #[test]
    fn trailing_token_is_always_eod() {
        let docs = vec!["x y z".to_string(), "q".to_string()];
        let tok = WordTokenizer::train(&docs);
        let stream = build_token_stream(&docs, &tok).unwrap();
        assert_eq!(*stream.last().unwrap(), tok.eod_id());
    }
}
