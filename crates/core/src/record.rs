//! Asset metadata record
//!
//! One record exists per imported asset. Importers produce them; the packer
//! consumes a whole map of them at once.

use crate::address::normalize_address;
use crate::settings::SettingsBlob;
use crate::types::{AssetId, AssetKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The asset database: records keyed by their id, iterated in id order
pub type AssetMap = BTreeMap<AssetId, AssetRecord>;

/// Metadata for a single imported asset
///
/// Field order is the serialized order and is part of the package format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Stable identifier, unique across the database
    pub id: AssetId,
    /// Content hash of the source file as computed by the importer
    pub file_hash: String,
    /// Project-relative path of the source file, unique across the database
    pub asset_path: String,
    /// Asset category
    pub kind: AssetKind,
    /// Optional addressable name; empty means "not addressable"
    pub address_name: String,
    /// Addressable groups this asset belongs to, in declaration order
    pub group_names: Vec<String>,
    /// Importer settings in their embedded form
    pub settings: SettingsBlob,
}

impl AssetRecord {
    /// Create a record with no hash, address, groups or settings
    pub fn new(id: AssetId, asset_path: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id,
            file_hash: String::new(),
            asset_path: asset_path.into(),
            kind,
            address_name: String::new(),
            group_names: Vec::new(),
            settings: SettingsBlob::empty(),
        }
    }

    /// Set the source file hash
    pub fn with_file_hash(mut self, hash: impl Into<String>) -> Self {
        self.file_hash = hash.into();
        self
    }

    /// Set the addressable name
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address_name = address.into();
        self
    }

    /// Append a group name
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group_names.push(group.into());
        self
    }

    /// Set the settings blob
    pub fn with_settings(mut self, settings: SettingsBlob) -> Self {
        self.settings = settings;
        self
    }

    /// Normalized addressable name, if the record has one
    pub fn normalized_address(&self) -> Option<String> {
        normalize_address(&self.address_name)
    }

    /// Whether the record has an addressable name
    pub fn is_addressable(&self) -> bool {
        self.normalized_address().is_some()
    }
}
