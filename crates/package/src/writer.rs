//! Package writer
//!
//! Turns an in-memory asset database into a package directory:
//! 1. Encode every record into the payload container, building the index
//! 2. Build the address/group index
//! 3. Encrypt the payload and cut it into randomly sized chunk files
//! 4. Write the manifest, then the encrypted index and addressables
//!
//! A failed pack leaves whatever files were already written; callers must
//! treat the output directory as unusable and pack again.

use crate::addressables::AddressablesIndex;
use crate::chunk::ChunkSplitter;
use crate::codec::BinaryCodec;
use crate::config::PackConfig;
use crate::crypto::{get_encryptor, seal, Encryptor};
use crate::error::{ConsistencyWarning, PackError, PackResult};
use crate::index::{encode_index, IndexEntry};
use crate::manifest::{paths, PackageManifest};
use luma_core::{AssetId, AssetMap};
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Summary of a finished pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Path of the written manifest
    pub manifest_path: PathBuf,
    /// Chunk file names in concatenation order
    pub chunk_names: Vec<String>,
    /// Number of records packed
    pub record_count: usize,
    /// Size of the encrypted payload in bytes
    pub payload_bytes: u64,
    /// xxh3 checksum of the encrypted payload (hex)
    pub payload_checksum: String,
    /// Number of index entries written
    pub index_entries: usize,
    /// Number of addresses in the addressables index
    pub address_count: usize,
    /// Number of groups in the addressables index
    pub group_count: usize,
    /// Non-fatal inconsistencies found in the input
    pub warnings: Vec<ConsistencyWarning>,
}

/// Writer for asset packages
pub struct PackageWriter {
    config: PackConfig,
    encryptor: Arc<dyn Encryptor>,
}

impl PackageWriter {
    /// Create a writer with an injected encryptor
    pub fn new(config: PackConfig, encryptor: Arc<dyn Encryptor>) -> PackResult<Self> {
        config.validate()?;
        Ok(Self { config, encryptor })
    }

    /// Create a writer using the encryptor named in the config
    pub fn from_config(config: PackConfig) -> PackResult<Self> {
        let encryptor = get_encryptor(&config.encryptor_id)?;
        Self::new(config, encryptor)
    }

    /// Configuration in use
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Pack `records` into `output_dir` using thread-local randomness
    pub fn pack(&self, records: &AssetMap, output_dir: &Path) -> PackResult<PackReport> {
        self.pack_with_rng(records, output_dir, &mut rand::thread_rng())
    }

    /// Pack `records` into `output_dir`, drawing chunk cuts and names from `rng`
    pub fn pack_with_rng<R: Rng>(
        &self,
        records: &AssetMap,
        output_dir: &Path,
        rng: &mut R,
    ) -> PackResult<PackReport> {
        fs::create_dir_all(output_dir).map_err(|e| PackError::io(output_dir, e))?;

        let mut warnings = check_asset_paths(records);

        let (payload, index) = if records.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            BinaryCodec::encode_all_indexed(records)?
        };
        let (addressables, address_warnings) = AddressablesIndex::build(records);
        warnings.extend(address_warnings);

        // An empty database has no payload at all, not an encrypted empty one
        let encrypted = if payload.is_empty() {
            Vec::new()
        } else {
            seal(self.encryptor.as_ref(), &payload)?
        };
        let manifest = ChunkSplitter::new(self.config.max_chunks).write(&encrypted, output_dir, rng)?;

        let manifest_path = output_dir.join(paths::MANIFEST);
        manifest.write(&manifest_path)?;
        self.write_index(output_dir, &index)?;
        self.write_addressables(output_dir, &addressables)?;

        info!(
            target: "luma::package",
            path = %output_dir.display(),
            records = records.len(),
            chunks = manifest.len(),
            bytes = encrypted.len(),
            warnings = warnings.len(),
            "Package written"
        );

        Ok(PackReport {
            manifest_path,
            chunk_names: manifest.chunks().to_vec(),
            record_count: records.len(),
            payload_bytes: encrypted.len() as u64,
            payload_checksum: xxh3_hex(&encrypted),
            index_entries: index.len(),
            address_count: addressables.addresses.len(),
            group_count: addressables.groups.len(),
            warnings,
        })
    }

    fn write_index(&self, dir: &Path, index: &[IndexEntry]) -> PackResult<()> {
        let bytes = encode_index(index)?;
        self.write_sealed(&dir.join(paths::INDEX), &bytes)
    }

    fn write_addressables(&self, dir: &Path, addressables: &AddressablesIndex) -> PackResult<()> {
        let bytes = addressables.to_bytes()?;
        self.write_sealed(&dir.join(paths::ADDRESSABLES), &bytes)
    }

    fn write_sealed(&self, path: &Path, plaintext: &[u8]) -> PackResult<()> {
        let sealed = seal(self.encryptor.as_ref(), plaintext)?;
        fs::write(path, sealed).map_err(|e| PackError::io(path, e))
    }
}

/// Warn about records that share a source path
fn check_asset_paths(records: &AssetMap) -> Vec<ConsistencyWarning> {
    let mut seen: HashMap<&str, AssetId> = HashMap::with_capacity(records.len());
    let mut warnings = Vec::new();
    for record in records.values() {
        if let Some(&first) = seen.get(record.asset_path.as_str()) {
            warn!(
                target: "luma::package",
                asset_path = %record.asset_path,
                first = %first,
                second = %record.id,
                "Duplicate asset path"
            );
            warnings.push(ConsistencyWarning::DuplicateAssetPath {
                asset_path: record.asset_path.clone(),
                first,
                second: record.id,
            });
        } else {
            seen.insert(&record.asset_path, record.id);
        }
    }
    warnings
}

/// Compute xxh3 checksum and return as hex string
pub fn xxh3_hex(data: &[u8]) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(data))
}
