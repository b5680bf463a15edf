//! Decrypted package cache
//!
//! Random-access loads need the decrypted payload of a package. Decrypting
//! is the expensive part, so the plaintext is kept in a small cache keyed by
//! manifest path.
//!
//! ## Policy
//!
//! - Capacity is fixed at construction (default one package).
//! - Least recently used entry is evicted when a new package is loaded into
//!   a full cache. With capacity one, alternating between two packages
//!   decrypts on every call.
//! - Keys are normalized lexically (`a/./b` and `a//b` are `a/b`); symlinks
//!   and `..` are not resolved.
//! - Entries are never invalidated by file changes; a package rewritten on
//!   disk keeps serving its old plaintext until evicted or [`clear`]ed.
//! - The whole lookup-decrypt-insert sequence holds the cache lock, so two
//!   threads never decrypt the same package at the same time.
//!
//! [`clear`]: DecryptedPackageCache::clear

use crate::error::PackResult;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to decrypt
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    // Front is most recently used
    entries: VecDeque<(PathBuf, Arc<Vec<u8>>)>,
    stats: CacheStats,
}

/// Capped LRU of decrypted payloads, keyed by manifest path
#[derive(Debug)]
pub struct DecryptedPackageCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl DecryptedPackageCache {
    /// Create a cache holding at most `capacity` packages (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Maximum number of cached packages
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the cached plaintext for `key`, loading it on a miss
    ///
    /// `load` runs with the cache lock held. If it fails nothing is cached
    /// and the error is returned.
    pub fn get_or_load<F>(&self, key: &Path, load: F) -> PackResult<Arc<Vec<u8>>>
    where
        F: FnOnce() -> PackResult<Vec<u8>>,
    {
        let key = normalize_key(key);
        let mut state = self.state.lock();

        let cached = state
            .entries
            .iter()
            .position(|(path, _)| *path == key)
            .and_then(|pos| state.entries.remove(pos));
        if let Some(entry) = cached {
            state.stats.hits += 1;
            let payload = Arc::clone(&entry.1);
            state.entries.push_front(entry);
            return Ok(payload);
        }

        state.stats.misses += 1;
        let payload = Arc::new(load()?);
        state.entries.push_front((key.clone(), Arc::clone(&payload)));

        while state.entries.len() > self.capacity {
            if let Some((evicted, _)) = state.entries.pop_back() {
                state.stats.evictions += 1;
                debug!(target: "luma::package", path = %evicted.display(), "Evicted decrypted package");
            }
        }

        debug!(
            target: "luma::package",
            path = %key.display(),
            bytes = payload.len(),
            "Cached decrypted package"
        );
        Ok(payload)
    }

    /// Whether `key` is currently cached
    pub fn contains(&self, key: &Path) -> bool {
        let key = normalize_key(key);
        self.state
            .lock()
            .entries
            .iter()
            .any(|(path, _)| *path == key)
    }

    /// Number of cached packages
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Drop every cached package; counters are kept
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

fn normalize_key(key: &Path) -> PathBuf {
    key.components().collect()
}

impl Default for DecryptedPackageCache {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_miss_then_hit() {
        let cache = DecryptedPackageCache::new(1);
        let a = Path::new("/pkg/a/package.manifest");

        let first = cache.get_or_load(a, || Ok(vec![1, 2, 3])).unwrap();
        let second = cache
            .get_or_load(a, || panic!("must not reload a cached package"))
            .unwrap();

        assert_eq!(*first, vec![1, 2, 3]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                evictions: 0
            }
        );
    }

    #[test]
    fn test_single_slot_evicts_on_other_package() {
        let cache = DecryptedPackageCache::new(1);
        let a = Path::new("a/package.manifest");
        let b = Path::new("b/package.manifest");

        cache.get_or_load(a, || Ok(vec![1])).unwrap();
        cache.get_or_load(b, || Ok(vec![2])).unwrap();
        assert!(!cache.contains(a));
        assert!(cache.contains(b));

        let reloaded = cache.get_or_load(a, || Ok(vec![3])).unwrap();
        assert_eq!(*reloaded, vec![3]);
        assert_eq!(cache.stats().evictions, 2);
        assert_eq!(cache.stats().misses, 3);
    }

    #[test]
    fn test_lru_order() {
        let cache = DecryptedPackageCache::new(2);
        let (a, b, c) = (Path::new("a"), Path::new("b"), Path::new("c"));

        cache.get_or_load(a, || Ok(vec![1])).unwrap();
        cache.get_or_load(b, || Ok(vec![2])).unwrap();
        cache.get_or_load(a, || Ok(vec![9])).unwrap();
        cache.get_or_load(c, || Ok(vec![3])).unwrap();

        assert!(cache.contains(a));
        assert!(!cache.contains(b));
        assert!(cache.contains(c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = DecryptedPackageCache::new(1);
        let a = Path::new("a");
        let err = cache
            .get_or_load(a, || Err(PackError::format("bad payload")))
            .unwrap_err();
        assert!(err.is_format());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_equivalent_paths_share_entry() {
        let cache = DecryptedPackageCache::new(1);
        cache
            .get_or_load(Path::new("pkg/package.manifest"), || Ok(vec![1]))
            .unwrap();
        let again = cache
            .get_or_load(Path::new("pkg/./package.manifest"), || Ok(vec![2]))
            .unwrap();
        cache
            .get_or_load(Path::new("pkg//package.manifest"), || Ok(vec![3]))
            .unwrap();

        assert_eq!(*again, vec![1]);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(Path::new("pkg/./package.manifest")));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 1,
                evictions: 0
            }
        );
    }

    #[test]
    fn test_clear() {
        let cache = DecryptedPackageCache::default();
        cache.get_or_load(Path::new("a"), || Ok(vec![1])).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_concurrent_loads_decrypt_once() {
        let cache = Arc::new(DecryptedPackageCache::new(1));
        let loads = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                thread::spawn(move || {
                    cache
                        .get_or_load(Path::new("shared"), || {
                            loads.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(10));
                            Ok(vec![42; 1024])
                        })
                        .unwrap()
                        .len()
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), 1024);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 7);
    }
}
