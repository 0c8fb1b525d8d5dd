// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed-width array header/footer, modeled on the binary header format
//! this crate's corpus and suffix array persistence builds on: a short fixed
//! header naming exactly how much payload follows, then the payload, then a
//! CRC32 footer so a truncated or corrupted file is caught before its
//! contents are trusted.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{IngramError, Result};

/// Magic bytes marking the start of a header: "IGRM".
pub const MAGIC: [u8; 4] = [0x49, 0x47, 0x52, 0x4D];

/// Footer magic, the header magic reversed: "MRGI".
pub const FOOTER_MAGIC: [u8; 4] = [0x4D, 0x52, 0x47, 0x49];

pub const VERSION: u8 = 1;

/// Header for one fixed-width little-endian array: 4-byte magic, version,
/// element width (4 or 8 bytes), a reserved byte, and the element count as a
/// little-endian `u64`. 16 bytes total.
#[derive(Debug, Clone, Copy)]
pub struct ArrayHeader {
    pub version: u8,
    pub element_width: u8,
    pub len: u64,
}

impl ArrayHeader {
    pub const SIZE: usize = 16;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version, self.element_width, 0])?;
        w.write_all(&self.len.to_le_bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)
            .map_err(|e| IngramError::CorruptArtifact(format!("reading array header: {e}")))?;
        if magic != MAGIC {
            return Err(IngramError::CorruptArtifact(format!(
                "bad array header magic: {magic:02x?}"
            )));
        }
        let mut rest = [0u8; 11];
        r.read_exact(&mut rest)
            .map_err(|e| IngramError::CorruptArtifact(format!("reading array header: {e}")))?;
        let len = u64::from_le_bytes(rest[3..11].try_into().unwrap());
        Ok(Self {
            version: rest[0],
            element_width: rest[1],
            len,
        })
    }
}

/// 8-byte footer: CRC32 over header + payload, then the reversed magic.
#[derive(Debug, Clone, Copy)]
pub struct ArrayFooter {
    pub crc32: u32,
}

impl ArrayFooter {
    pub const SIZE: usize = 8;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut buf = [0u8; 8];
        r.read_exact(&mut buf)
            .map_err(|e| IngramError::CorruptArtifact(format!("reading array footer: {e}")))?;
        let crc32 = u32::from_le_bytes(buf[0..4].try_into().unwrap());
        if buf[4..8] != FOOTER_MAGIC {
            return Err(IngramError::CorruptArtifact(
                "bad array footer magic".to_string(),
            ));
        }
        Ok(Self { crc32 })
    }
}

pub fn crc32_of(bytes: &[u8]) -> u32 {
    let mut hasher = Crc32Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}
