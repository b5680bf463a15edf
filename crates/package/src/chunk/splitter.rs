//! Randomized payload splitting

use crate::error::{PackError, PackResult};
use crate::manifest::{PackageManifest, CHUNK_EXTENSION};
use rand::Rng;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// One slice of the encrypted payload, named for disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Random file name, with extension
    pub name: String,
    /// Payload slice
    pub bytes: &'a [u8],
}

/// Cuts a payload into randomly sized chunks
///
/// For a payload of `n` bytes the chunk count is uniform in
/// `1..=min(n, max_chunks)`. Each chunk but the last is uniform in
/// `1..=remaining - chunks_left_after_it`, so every chunk gets at least one
/// byte; the last chunk takes whatever remains.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSplitter {
    max_chunks: usize,
}

impl ChunkSplitter {
    /// Create a splitter; `max_chunks` below one is treated as one
    pub fn new(max_chunks: usize) -> Self {
        Self {
            max_chunks: max_chunks.max(1),
        }
    }

    /// Upper bound on chunks per payload
    pub fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    /// Pick chunk sizes for a payload of `total` bytes
    ///
    /// Returns no sizes for an empty payload.
    pub fn plan<R: Rng>(&self, total: usize, rng: &mut R) -> Vec<usize> {
        if total == 0 {
            return Vec::new();
        }

        let count = rng.gen_range(1..=self.max_chunks.min(total));
        let mut sizes = Vec::with_capacity(count);
        let mut remaining = total;
        for cut in 0..count - 1 {
            let chunks_after = count - cut - 1;
            let size = rng.gen_range(1..=remaining - chunks_after);
            sizes.push(size);
            remaining -= size;
        }
        sizes.push(remaining);
        sizes
    }

    /// Cut a payload into named chunks, in payload order
    pub fn split<'a, R: Rng>(&self, payload: &'a [u8], rng: &mut R) -> Vec<Chunk<'a>> {
        let sizes = self.plan(payload.len(), rng);
        let mut used = HashSet::with_capacity(sizes.len());
        let mut chunks = Vec::with_capacity(sizes.len());
        let mut pos = 0;
        for size in sizes {
            let name = loop {
                let candidate = chunk_name(rng);
                if used.insert(candidate.clone()) {
                    break candidate;
                }
            };
            chunks.push(Chunk {
                name,
                bytes: &payload[pos..pos + size],
            });
            pos += size;
        }
        chunks
    }

    /// Split a payload and write every chunk into `dir`
    ///
    /// Returns the manifest listing the chunks in cut order. The manifest
    /// itself is not written. Chunk files are created exclusively, so an
    /// existing file is never overwritten.
    pub fn write<R: Rng>(
        &self,
        payload: &[u8],
        dir: &Path,
        rng: &mut R,
    ) -> PackResult<PackageManifest> {
        let chunks = self.split(payload, rng);
        let mut names = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let path = dir.join(&chunk.name);
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .map_err(|e| PackError::io(&path, e))?;
            file.write_all(chunk.bytes)
                .map_err(|e| PackError::io(&path, e))?;
            debug!(target: "luma::package", chunk = %chunk.name, bytes = chunk.bytes.len(), "Wrote chunk");
            names.push(chunk.name);
        }
        PackageManifest::new(names)
    }
}

/// Generate a random chunk file name
pub fn chunk_name<R: Rng>(rng: &mut R) -> String {
    let uuid = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    format!("{}.{}", uuid.simple(), CHUNK_EXTENSION)
}
