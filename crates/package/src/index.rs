//! Direct-by-id record index
//!
//! The index lists, for every record, where its encoded bytes sit inside the
//! decrypted payload. It is stored as `package.index`: a msgpack sequence of
//! `{id, offset, size}` maps, encrypted with the package encryptor.

use crate::error::{PackError, PackResult};
use luma_core::AssetId;
use serde::{Deserialize, Serialize};

/// Location of one encoded record within the decrypted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Record id
    pub id: AssetId,
    /// Byte offset of the encoded record
    pub offset: u64,
    /// Length of the encoded record
    pub size: u64,
}

/// Accumulates index entries while records are encoded
///
/// The builder tracks a running offset. Each pushed record is placed at the
/// current offset and advances it by its encoded size; framing bytes between
/// records are accounted for with [`IndexBuilder::skip`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    entries: Vec<IndexEntry>,
    running_offset: u64,
}

impl IndexBuilder {
    /// Start a builder whose first record sits at `start_offset`
    pub fn new(start_offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            running_offset: start_offset,
        }
    }

    /// Record an encoded record at the running offset
    pub fn push(&mut self, id: AssetId, encoded_size: u64) -> IndexEntry {
        let entry = IndexEntry {
            id,
            offset: self.running_offset,
            size: encoded_size,
        };
        self.running_offset += encoded_size;
        self.entries.push(entry);
        entry
    }

    /// Advance past bytes that belong to no record
    pub fn skip(&mut self, bytes: u64) {
        self.running_offset += bytes;
    }

    /// Offset the next record would be placed at
    pub fn running_offset(&self) -> u64 {
        self.running_offset
    }

    /// Number of entries so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been pushed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish and return the entries in push order
    pub fn finish(self) -> Vec<IndexEntry> {
        self.entries
    }
}

/// Serialize an index as an ordered msgpack sequence
pub fn encode_index(entries: &[IndexEntry]) -> PackResult<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(entries)?)
}

/// Deserialize an index written by [`encode_index`]
pub fn decode_index(bytes: &[u8]) -> PackResult<Vec<IndexEntry>> {
    rmp_serde::from_slice(bytes)
        .map_err(|e| PackError::format(format!("msgpack decode index: {}", e)))
}

/// Find the entry for `id`
pub fn find_entry(entries: &[IndexEntry], id: AssetId) -> Option<&IndexEntry> {
    entries.iter().find(|entry| entry.id == id)
}
