//! Concurrent chunk reassembly

use crate::error::{PackError, PackResult};
use crate::manifest::PackageManifest;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::debug;

/// Reads every chunk listed in a manifest and concatenates them
///
/// Chunk files are read by up to `fetch_threads` scoped workers that pull
/// manifest positions from a shared counter, so reads complete in any order.
/// Results are then sorted back into manifest order before concatenation.
///
/// Worker count is `min(fetch_threads, chunks)`, so with `fetch_threads` at
/// least the writer's `max_chunks` every chunk gets its own worker.
#[derive(Debug, Clone, Copy)]
pub struct ChunkJoiner {
    fetch_threads: usize,
}

impl ChunkJoiner {
    /// Create a joiner; `fetch_threads` below one is treated as one
    pub fn new(fetch_threads: usize) -> Self {
        Self {
            fetch_threads: fetch_threads.max(1),
        }
    }

    /// Fetch all chunks of `manifest` from `dir` and reassemble the payload
    ///
    /// An empty manifest yields an empty payload. A missing or empty chunk
    /// file fails the whole join.
    pub fn join(&self, dir: &Path, manifest: &PackageManifest) -> PackResult<Vec<u8>> {
        let names = manifest.chunks();
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.fetch_threads.min(names.len());
        let counter = AtomicUsize::new(0);
        let next = &counter;

        let mut fetched = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || -> PackResult<Vec<(usize, Vec<u8>)>> {
                        let mut local = Vec::new();
                        loop {
                            let position = next.fetch_add(1, Ordering::Relaxed);
                            let Some(name) = names.get(position) else {
                                break;
                            };
                            let path = dir.join(name);
                            let bytes = fs::read(&path).map_err(|e| PackError::io(&path, e))?;
                            if bytes.is_empty() {
                                return Err(PackError::format(format!(
                                    "chunk {} is empty",
                                    path.display()
                                )));
                            }
                            local.push((position, bytes));
                        }
                        Ok(local)
                    })
                })
                .collect();

            let mut all = Vec::with_capacity(names.len());
            for handle in handles {
                let local = handle
                    .join()
                    .map_err(|_| PackError::Worker("chunk reader panicked".to_string()))??;
                all.extend(local);
            }
            Ok::<_, PackError>(all)
        })?;

        fetched.sort_unstable_by_key(|(position, _)| *position);
        if fetched.len() != names.len() {
            return Err(PackError::format(format!(
                "fetched {} of {} chunks",
                fetched.len(),
                names.len()
            )));
        }

        let total = fetched.iter().map(|(_, bytes)| bytes.len()).sum();
        let mut payload = Vec::with_capacity(total);
        for (_, bytes) in fetched {
            payload.extend_from_slice(&bytes);
        }

        debug!(
            target: "luma::package",
            chunks = names.len(),
            bytes = payload.len(),
            workers,
            "Joined chunks"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkSplitter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn write_payload(dir: &Path, payload: &[u8], max_chunks: usize, seed: u64) -> PackageManifest {
        let mut rng = StdRng::seed_from_u64(seed);
        ChunkSplitter::new(max_chunks)
            .write(payload, dir, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_join_reproduces_payload() {
        let dir = TempDir::new().unwrap();
        let payload: Vec<u8> = (0..5000u32).map(|i| (i * 31 % 251) as u8).collect();
        for (seed, threads) in [(1, 1), (2, 3), (3, 16)] {
            let sub = dir.path().join(format!("run{}", seed));
            fs::create_dir(&sub).unwrap();
            let manifest = write_payload(&sub, &payload, 12, seed);
            let joined = ChunkJoiner::new(threads).join(&sub, &manifest).unwrap();
            assert_eq!(joined, payload);
        }
    }

    #[test]
    fn test_join_follows_manifest_not_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zzzz.luma_pack"), b"AB").unwrap();
        fs::write(dir.path().join("aaaa.luma_pack"), b"CD").unwrap();
        let manifest = PackageManifest::new(vec![
            "zzzz.luma_pack".to_string(),
            "aaaa.luma_pack".to_string(),
        ])
        .unwrap();
        let joined = ChunkJoiner::new(2).join(dir.path(), &manifest).unwrap();
        assert_eq!(joined, b"ABCD");
    }

    #[test]
    fn test_empty_manifest_joins_to_nothing() {
        let dir = TempDir::new().unwrap();
        let joined = ChunkJoiner::new(4)
            .join(dir.path(), &PackageManifest::default())
            .unwrap();
        assert!(joined.is_empty());
    }

    #[test]
    fn test_missing_chunk_fails() {
        let dir = TempDir::new().unwrap();
        let manifest = write_payload(dir.path(), &[1u8; 64], 4, 8);
        fs::remove_file(dir.path().join(&manifest.chunks()[0])).unwrap();
        let err = ChunkJoiner::new(2).join(dir.path(), &manifest).unwrap_err();
        assert!(matches!(err, PackError::MissingFile(_)));
    }

    #[test]
    fn test_empty_chunk_file_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("abc.luma_pack"), b"").unwrap();
        let manifest = PackageManifest::new(vec!["abc.luma_pack".to_string()]).unwrap();
        let err = ChunkJoiner::new(1).join(dir.path(), &manifest).unwrap_err();
        assert!(err.is_format());
    }
}
