//! Package reader
//!
//! Reads package directories produced by [`crate::writer::PackageWriter`].
//! Every entry point takes the path of `package.manifest`; the other package
//! files are looked up next to it.

use crate::addressables::AddressablesIndex;
use crate::chunk::ChunkJoiner;
use crate::codec::BinaryCodec;
use crate::config::PackConfig;
use crate::crypto::{get_encryptor, CryptoError, Encryptor};
use crate::decode::ParallelDecoder;
use crate::error::{PackError, PackResult};
use crate::index::{decode_index, IndexEntry};
use crate::manifest::{package_dir, paths, PackageManifest};
use crate::writer::xxh3_hex;
use luma_core::AssetMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of a full package verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVerifyInfo {
    /// Number of chunk files
    pub chunk_count: usize,
    /// Size of the encrypted payload in bytes
    pub payload_bytes: u64,
    /// xxh3 checksum of the encrypted payload (hex)
    pub payload_checksum: String,
    /// Number of records decoded
    pub record_count: usize,
    /// Number of index entries
    pub index_entries: usize,
    /// Whether the addressables file exists
    pub has_addressables: bool,
}

/// Reader for asset packages
pub struct PackageReader {
    config: PackConfig,
    encryptor: Arc<dyn Encryptor>,
}

impl PackageReader {
    /// Create a reader with an injected encryptor
    pub fn new(config: PackConfig, encryptor: Arc<dyn Encryptor>) -> PackResult<Self> {
        config.validate()?;
        Ok(Self { config, encryptor })
    }

    /// Create a reader using the encryptor named in the config
    pub fn from_config(config: PackConfig) -> PackResult<Self> {
        let encryptor = get_encryptor(&config.encryptor_id)?;
        Self::new(config, encryptor)
    }

    /// Configuration in use
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Read and validate the manifest
    pub fn read_manifest(&self, manifest_path: &Path) -> PackResult<PackageManifest> {
        PackageManifest::read(manifest_path)
    }

    /// Fetch all chunks and return the encrypted payload
    pub fn read_ciphertext(&self, manifest_path: &Path) -> PackResult<(PackageManifest, Vec<u8>)> {
        let manifest = self.read_manifest(manifest_path)?;
        let ciphertext = ChunkJoiner::new(self.config.fetch_threads)
            .join(&package_dir(manifest_path), &manifest)?;
        Ok((manifest, ciphertext))
    }

    /// Fetch, reassemble and decrypt the payload
    ///
    /// An empty manifest yields an empty payload.
    pub fn read_payload(&self, manifest_path: &Path) -> PackResult<Vec<u8>> {
        let (_, ciphertext) = self.read_ciphertext(manifest_path)?;
        self.decrypt(&ciphertext)
    }

    /// Load every record in the package
    ///
    /// Either the whole database is returned or an error; a single bad
    /// record fails the call.
    pub fn unpack(&self, manifest_path: &Path) -> PackResult<AssetMap> {
        let payload = self.read_payload(manifest_path)?;
        let records = if payload.is_empty() {
            AssetMap::new()
        } else {
            ParallelDecoder::new(self.config.decode_threads).decode(&payload)?
        };

        info!(
            target: "luma::package",
            path = %manifest_path.display(),
            records = records.len(),
            "Package unpacked"
        );
        Ok(records)
    }

    /// Load the record index
    pub fn load_index(&self, manifest_path: &Path) -> PackResult<Vec<IndexEntry>> {
        let path = package_dir(manifest_path).join(paths::INDEX);
        let sealed = fs::read(&path).map_err(|e| PackError::io(&path, e))?;
        decode_index(&self.decrypt(&sealed)?)
    }

    /// Load the address/group index, if the package has one
    ///
    /// A missing file is `Ok(None)`; a present but unreadable file is an error.
    pub fn try_load_addressables(
        &self,
        manifest_path: &Path,
    ) -> PackResult<Option<AddressablesIndex>> {
        let path = package_dir(manifest_path).join(paths::ADDRESSABLES);
        let sealed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PackError::io(&path, e)),
        };
        AddressablesIndex::from_bytes(&self.decrypt(&sealed)?).map(Some)
    }

    /// Read the whole package and cross-check the index against the payload
    pub fn verify(&self, manifest_path: &Path) -> PackResult<PackageVerifyInfo> {
        let (manifest, ciphertext) = self.read_ciphertext(manifest_path)?;
        let payload = self.decrypt(&ciphertext)?;
        let index = self.load_index(manifest_path)?;

        let record_count = if payload.is_empty() {
            0
        } else {
            let records = ParallelDecoder::new(self.config.decode_threads).decode(&payload)?;
            for entry in &index {
                let bytes = BinaryCodec::frame_at(&payload, entry.offset, entry.size)?;
                let record = BinaryCodec::decode(bytes)?;
                if record.id != entry.id || !records.contains_key(&entry.id) {
                    return Err(PackError::format(format!(
                        "index entry {} points at record {}",
                        entry.id, record.id
                    )));
                }
            }
            records.len()
        };

        if index.len() != record_count {
            return Err(PackError::format(format!(
                "index lists {} entries for {} records",
                index.len(),
                record_count
            )));
        }

        Ok(PackageVerifyInfo {
            chunk_count: manifest.len(),
            payload_bytes: ciphertext.len() as u64,
            payload_checksum: xxh3_hex(&ciphertext),
            record_count,
            index_entries: index.len(),
            has_addressables: self.try_load_addressables(manifest_path)?.is_some(),
        })
    }

    pub(crate) fn decrypt(&self, ciphertext: &[u8]) -> PackResult<Vec<u8>> {
        if ciphertext.is_empty() {
            return Ok(Vec::new());
        }
        let plaintext = self.encryptor.decrypt(ciphertext)?;
        // Empty plaintext would read as an empty database
        if plaintext.is_empty() {
            return Err(CryptoError::decrypt(
                "empty plaintext for non-empty ciphertext",
                self.encryptor.encryptor_id(),
                ciphertext.len(),
            )
            .into());
        }
        Ok(plaintext)
    }
}
