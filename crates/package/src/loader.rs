//! Random-access asset loading
//!
//! The first load from a package fetches and decrypts the whole payload and
//! keeps the plaintext in a [`DecryptedPackageCache`]. Each record is then cut
//! out of the plaintext using its index entry and decoded on its own; no other
//! record is decoded.

use crate::cache::{CacheStats, DecryptedPackageCache};
use crate::codec::BinaryCodec;
use crate::config::PackConfig;
use crate::crypto::Encryptor;
use crate::error::{PackError, PackResult};
use crate::index::{find_entry, IndexEntry};
use crate::reader::PackageReader;
use luma_core::{AssetId, AssetRecord};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Loads single records from packages
pub struct SingleAssetLoader {
    reader: PackageReader,
    cache: Arc<DecryptedPackageCache>,
}

impl SingleAssetLoader {
    /// Create a loader with its own cache sized from `config`
    pub fn new(config: PackConfig, encryptor: Arc<dyn Encryptor>) -> PackResult<Self> {
        let cache = Arc::new(DecryptedPackageCache::new(config.cache_capacity));
        Self::with_cache(config, encryptor, cache)
    }

    /// Create a loader that shares an existing cache
    pub fn with_cache(
        config: PackConfig,
        encryptor: Arc<dyn Encryptor>,
        cache: Arc<DecryptedPackageCache>,
    ) -> PackResult<Self> {
        Ok(Self {
            reader: PackageReader::new(config, encryptor)?,
            cache,
        })
    }

    /// The decrypted-package cache in use
    pub fn cache(&self) -> &Arc<DecryptedPackageCache> {
        &self.cache
    }

    /// Load the record that `entry` points at
    pub fn load_single_asset(
        &self,
        manifest_path: &Path,
        entry: &IndexEntry,
    ) -> PackResult<AssetRecord> {
        let payload = self.payload(manifest_path)?;
        extract(&payload, entry)
    }

    /// Look `id` up in the package index and load it
    pub fn load_by_id(&self, manifest_path: &Path, id: AssetId) -> PackResult<AssetRecord> {
        let index = self.reader.load_index(manifest_path)?;
        let entry = find_entry(&index, id)
            .ok_or_else(|| PackError::not_found(format!("asset {}", id)))?;
        self.load_single_asset(manifest_path, entry)
    }

    /// Resolve an addressable name and load the record it maps to
    pub fn load_by_address(&self, manifest_path: &Path, address: &str) -> PackResult<AssetRecord> {
        let addressables = self
            .reader
            .try_load_addressables(manifest_path)?
            .ok_or_else(|| PackError::not_found("package has no addressables"))?;
        let id = addressables
            .resolve(address)
            .ok_or_else(|| PackError::not_found(format!("address '{}'", address)))?;
        self.load_by_id(manifest_path, id)
    }

    /// Load every record of a group, in group order
    ///
    /// An unknown group yields an empty list.
    pub fn load_group(&self, manifest_path: &Path, group: &str) -> PackResult<Vec<AssetRecord>> {
        let addressables = self
            .reader
            .try_load_addressables(manifest_path)?
            .ok_or_else(|| PackError::not_found("package has no addressables"))?;
        let ids = addressables.group(group);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.reader.load_index(manifest_path)?;
        let payload = self.payload(manifest_path)?;
        let records = ids
            .iter()
            .map(|id| {
                let entry = find_entry(&index, *id).ok_or_else(|| {
                    PackError::format(format!("group '{}' lists unindexed asset {}", group, id))
                })?;
                extract(&payload, entry)
            })
            .collect::<PackResult<Vec<_>>>()?;

        debug!(
            target: "luma::package",
            group,
            records = records.len(),
            "Loaded group"
        );
        Ok(records)
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached package
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn payload(&self, manifest_path: &Path) -> PackResult<Arc<Vec<u8>>> {
        self.cache
            .get_or_load(manifest_path, || self.reader.read_payload(manifest_path))
    }
}

fn extract(payload: &[u8], entry: &IndexEntry) -> PackResult<AssetRecord> {
    let bytes = BinaryCodec::frame_at(payload, entry.offset, entry.size)?;
    let record = BinaryCodec::decode(bytes)?;
    if record.id != entry.id {
        return Err(PackError::format(format!(
            "index entry {} resolved to record {}",
            entry.id, record.id
        )));
    }
    Ok(record)
}
