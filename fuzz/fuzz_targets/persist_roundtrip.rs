// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

#![no_main]

//! Array persistence under adversarial input.
//!
//! A model directory loaded from disk might be truncated, bit-flipped, or
//! simply not one this crate wrote. `read_u32_array` must never panic on any
//! byte sequence; the worst acceptable outcome is `CorruptArtifact`.

use libfuzzer_sys::fuzz_target;
use std::fs;

use ingram::persist::read_u32_array;

fuzz_target!(|data: &[u8]| {
    let dir = std::env::temp_dir().join(format!("ingram-fuzz-{}", std::process::id()));
    let _ = fs::create_dir_all(&dir);
    let path = dir.join("fuzzed.bin");
    if fs::write(&path, data).is_err() {
        return;
    }

    let result = read_u32_array(&dir, "fuzzed.bin");

    if let Ok(values) = result {
        // Whatever was decoded must round-trip through the same writer.
        let rewritten = ingram::persist::write_u32_array(&dir, "rewritten.bin", &values);
        assert!(rewritten.is_ok(), "failed to re-serialize a value this parser itself accepted");
        let reread = read_u32_array(&dir, "rewritten.bin").expect("round trip of accepted data must succeed");
        assert_eq!(reread, values);
    }

    let _ = fs::remove_dir_all(&dir);
});
