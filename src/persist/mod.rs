// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk model directory layout:
//!
//! - `documents_tkn.bin` — the concatenated token stream.
//! - `suffix_array.bin` — the suffix array over it.
//! - `tokenizer.json` — written by whichever [`crate::tokenizer::Tokenizer`]
//!   impl is in use.
//! - `manifest.json` — read first, so `load` knows how to parse the rest
//!   without guessing.

pub mod header;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngramError, Result};
use header::{ArrayFooter, ArrayHeader};

const DOCS_FILE: &str = "documents_tkn.bin";
const SA_FILE: &str = "suffix_array.bin";
const MANIFEST_FILE: &str = "manifest.json";

/// Format metadata read before anything else, so loading never has to guess
/// element widths or which tokenizer implementation produced `tokenizer.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u8,
    pub token_width: u8,
    pub sa_width: u8,
    pub n: u64,
    pub vocab_size: usize,
    pub eod_id: u32,
    pub tokenizer_kind: String,
}

impl Manifest {
    pub fn write(&self, dir: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| IngramError::BuildFailure(format!("serializing manifest: {e}")))?;
        fs::write(dir.join(MANIFEST_FILE), bytes)?;
        Ok(())
    }

    pub fn read(dir: &Path) -> Result<Self> {
        let bytes = fs::read(dir.join(MANIFEST_FILE))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| IngramError::CorruptArtifact(format!("manifest.json: {e}")))
    }
}

/// Write a `u32` array as header + little-endian payload + CRC32 footer.
pub fn write_u32_array(dir: &Path, file_name: &str, values: &[u32]) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let mut out = BufWriter::new(File::create(&path)?);

    let header = ArrayHeader {
        version: header::VERSION,
        element_width: 4,
        len: values.len() as u64,
    };
    let mut body = Vec::with_capacity(ArrayHeader::SIZE + values.len() * 4);
    header.write(&mut body)?;
    for &v in values {
        body.extend_from_slice(&v.to_le_bytes());
    }
    let footer = ArrayFooter {
        crc32: header::crc32_of(&body),
    };

    out.write_all(&body)?;
    footer.write(&mut out)?;
    Ok(())
}

/// Read back an array written by [`write_u32_array`], validating the footer
/// checksum before trusting the payload.
pub fn read_u32_array(dir: &Path, file_name: &str) -> Result<Vec<u32>> {
    let path = dir.join(file_name);
    let bytes = fs::read(&path)?;
    if bytes.len() < ArrayHeader::SIZE + ArrayFooter::SIZE {
        return Err(IngramError::CorruptArtifact(format!(
            "{file_name}: truncated, too short for a header and footer"
        )));
    }
    let body_len = bytes.len() - ArrayFooter::SIZE;
    let body = &bytes[..body_len];
    let footer = ArrayFooter::read(&mut &bytes[body_len..])?;
    if footer.crc32 != header::crc32_of(body) {
        return Err(IngramError::CorruptArtifact(format!(
            "{file_name}: CRC32 mismatch, file is corrupt"
        )));
    }

    let mut reader = BufReader::new(body);
    let array_header = ArrayHeader::read(&mut reader)?;
    if array_header.element_width != 4 {
        return Err(IngramError::CorruptArtifact(format!(
            "{file_name}: expected 4-byte elements, header says {}",
            array_header.element_width
        )));
    }
    let expected_len = array_header.len as usize;
    let remaining = body_len - ArrayHeader::SIZE;
    if remaining != expected_len * 4 {
        return Err(IngramError::CorruptArtifact(format!(
            "{file_name}: header declares {expected_len} elements but payload has {}",
            remaining / 4
        )));
    }

    let payload = &body[ArrayHeader::SIZE..];
    let values = payload
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    Ok(values)
}

pub fn write_token_stream(dir: &Path, s: &[u32]) -> Result<()> {
    write_u32_array(dir, DOCS_FILE, s)
}

pub fn read_token_stream(dir: &Path) -> Result<Vec<u32>> {
    read_u32_array(dir, DOCS_FILE)
}

pub fn write_suffix_array(dir: &Path, sa: &[u32]) -> Result<()> {
    write_u32_array(dir, SA_FILE, sa)
}

pub fn read_suffix_array(dir: &Path) -> Result<Vec<u32>> {
    read_u32_array(dir, SA_FILE)
}
