// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for suffix array construction and query throughput.
//!
//! Simulates corpora at a few realistic sizes:
//! - small:  ~20 documents, ~500 words each
//! - medium: ~100 documents, ~1000 words each
//! - large:  ~500 documents, ~1500 words each (construction only; query
//!   benchmarks stay at small/medium so the suite runs in reasonable time)
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ingram::tokenizer::WordTokenizer;
use ingram::{InfiniGramEngine, SuffixArray, TokenId};

struct CorpusSize {
    name: &'static str,
    docs: usize,
    words_per_doc: usize,
}

const CORPUS_SIZES: &[CorpusSize] = &[
    CorpusSize {
        name: "small",
        docs: 20,
        words_per_doc: 500,
    },
    CorpusSize {
        name: "medium",
        docs: 100,
        words_per_doc: 1000,
    },
];

const LARGE_CORPUS: CorpusSize = CorpusSize {
    name: "large",
    docs: 500,
    words_per_doc: 1500,
};

const VOCAB: &[&str] = &[
    "the", "cat", "sat", "on", "mat", "ran", "dog", "jumped", "over", "fence", "quick", "brown",
    "fox", "lazy", "river", "mountain", "code", "rust", "suffix", "array",
];

fn make_corpus(size: &CorpusSize) -> Vec<String> {
    (0..size.docs)
        .map(|i| {
            (0..size.words_per_doc)
                .map(|j| VOCAB[(i * 31 + j * 17) % VOCAB.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_build");
    for size in CORPUS_SIZES {
        let docs = make_corpus(size);
        let total_words: usize = size.docs * size.words_per_doc;
        group.throughput(Throughput::Elements(total_words as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &docs, |b, docs| {
            b.iter(|| {
                let tokenizer = Arc::new(WordTokenizer::train(docs));
                black_box(InfiniGramEngine::build(docs, tokenizer).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_build_large(c: &mut Criterion) {
    let docs = make_corpus(&LARGE_CORPUS);
    let tokenizer = Arc::new(WordTokenizer::train(&docs));
    let stream = ingram::corpus::build_token_stream(&docs, tokenizer.as_ref()).unwrap();

    let mut group = c.benchmark_group("suffix_array_build");
    group.throughput(Throughput::Elements(stream.len() as u64));
    group.bench_function("large", |b| {
        b.iter(|| black_box(SuffixArray::build(&stream).unwrap()));
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("prob_next");
    for size in CORPUS_SIZES {
        let docs = make_corpus(size);
        let tokenizer = Arc::new(WordTokenizer::train(&docs));
        let engine = InfiniGramEngine::build(&docs, tokenizer.clone()).unwrap();
        let q: Vec<TokenId> = tokenizer.encode_one("the cat sat on");

        group.bench_with_input(BenchmarkId::from_parameter(size.name), &q, |b, q| {
            b.iter(|| black_box(engine.prob_next(q).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_build_large, bench_query);
criterion_main!(benches);
