//! Multi-threaded payload decoding
//!
//! Framing is validated on the calling thread (cheap: lengths and CRCs only).
//! The frames are then cut into contiguous shards, one scoped thread per
//! shard decodes its records into a local map, and the local maps are merged.
//!
//! Any record that fails to decode fails the whole call. An id that appears
//! twice, in the same shard or across shards, is reported as a format error
//! rather than letting one copy win.

use crate::codec::{BinaryCodec, Frame};
use crate::error::{PackError, PackResult};
use luma_core::AssetMap;
use std::thread;
use tracing::debug;

/// Decodes payload containers on a pool of scoped threads
#[derive(Debug, Clone, Copy)]
pub struct ParallelDecoder {
    threads: usize,
}

impl ParallelDecoder {
    /// Create a decoder; `threads` below one is treated as one
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Number of shards used for `frames` records
    pub fn shard_count(&self, frames: usize) -> usize {
        self.threads.min(frames)
    }

    /// Decode a whole payload container
    pub fn decode(&self, payload: &[u8]) -> PackResult<AssetMap> {
        let frames = BinaryCodec::frames(payload)?;
        if frames.is_empty() {
            return Ok(AssetMap::new());
        }

        let shards = self.shard_count(frames.len());
        let per_shard = frames.len().div_ceil(shards);

        let decoded = thread::scope(|scope| {
            let handles: Vec<_> = frames
                .chunks(per_shard)
                .map(|range| scope.spawn(move || decode_range(range)))
                .collect();

            let mut merged = AssetMap::new();
            for handle in handles {
                let local = handle
                    .join()
                    .map_err(|_| PackError::Worker("decode worker panicked".to_string()))??;
                for (id, record) in local {
                    if merged.insert(id, record).is_some() {
                        return Err(PackError::format(format!(
                            "duplicate record id {} across shards",
                            id
                        )));
                    }
                }
            }
            Ok(merged)
        })?;

        debug!(
            target: "luma::package",
            records = decoded.len(),
            shards,
            "Decoded payload"
        );
        Ok(decoded)
    }
}

fn decode_range(frames: &[Frame<'_>]) -> PackResult<AssetMap> {
    let mut local = AssetMap::new();
    for frame in frames {
        let record = BinaryCodec::decode(frame.bytes).map_err(|e| {
            PackError::format(format!("record at offset {}: {}", frame.offset, e))
        })?;
        let id = record.id;
        if local.insert(id, record).is_some() {
            return Err(PackError::format(format!("duplicate record id {}", id)));
        }
    }
    Ok(local)
}
