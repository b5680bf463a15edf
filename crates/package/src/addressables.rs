//! Address and group index
//!
//! Besides lookup by id, assets can be resolved by a human-readable address
//! (`"UI/Fonts/Title"`) or enumerated by group tag (`"preload"`). Both maps are
//! rebuilt from scratch on every pack and stored together in
//! `package.addressables` as one msgpack object with keys `addresses` and
//! `groups`.
//!
//! ## Rules
//!
//! - Addresses are normalized (`\` becomes `/`) before insertion.
//! - The first record to claim an address keeps it; later claims by other
//!   records are dropped with a [`ConsistencyWarning`].
//! - A group lists each record once, in first-appearance order.

use crate::error::{ConsistencyWarning, PackError, PackResult};
use luma_core::{normalize_address, AssetId, AssetMap, AssetRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Address and group lookup tables for one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressablesIndex {
    /// Normalized address to record id
    pub addresses: BTreeMap<String, AssetId>,
    /// Group name to member ids, first-appearance order
    pub groups: BTreeMap<String, Vec<AssetId>>,
}

impl AddressablesIndex {
    /// Build the index for a whole database, iterating in id order
    pub fn build(records: &AssetMap) -> (Self, Vec<ConsistencyWarning>) {
        let mut builder = AddressablesIndexBuilder::new();
        for record in records.values() {
            builder.add(record);
        }
        builder.finish()
    }

    /// Look up an address, normalizing it first
    pub fn resolve(&self, address: &str) -> Option<AssetId> {
        let normalized = normalize_address(address)?;
        self.addresses.get(&normalized).copied()
    }

    /// Members of a group, empty if the group is unknown
    pub fn group(&self, name: &str) -> &[AssetId] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether both tables are empty
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.groups.is_empty()
    }

    /// Serialize as a msgpack object `{addresses, groups}`
    pub fn to_bytes(&self) -> PackResult<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Deserialize from [`AddressablesIndex::to_bytes`] output
    pub fn from_bytes(bytes: &[u8]) -> PackResult<Self> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| PackError::format(format!("msgpack decode addressables: {}", e)))
    }
}

/// Incremental builder for [`AddressablesIndex`]
#[derive(Debug, Default)]
pub struct AddressablesIndexBuilder {
    index: AddressablesIndex,
    warnings: Vec<ConsistencyWarning>,
}

impl AddressablesIndexBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one record's address and groups
    pub fn add(&mut self, record: &AssetRecord) {
        if let Some(address) = record.normalized_address() {
            match self.index.addresses.get(&address) {
                Some(&kept) if kept != record.id => {
                    warn!(
                        target: "luma::package",
                        address = %address,
                        kept = %kept,
                        ignored = %record.id,
                        "Address collision, keeping first mapping"
                    );
                    self.warnings.push(ConsistencyWarning::AddressCollision {
                        address,
                        kept,
                        ignored: record.id,
                    });
                }
                Some(_) => {}
                None => {
                    self.index.addresses.insert(address, record.id);
                }
            }
        }

        let mut seen = BTreeSet::new();
        for group in &record.group_names {
            if !seen.insert(group.as_str()) {
                warn!(
                    target: "luma::package",
                    group = %group,
                    id = %record.id,
                    "Duplicate group entry"
                );
                self.warnings.push(ConsistencyWarning::DuplicateGroupEntry {
                    group: group.clone(),
                    id: record.id,
                });
                continue;
            }
            let members = self.index.groups.entry(group.clone()).or_default();
            if !members.contains(&record.id) {
                members.push(record.id);
            }
        }
    }

    /// Finish building, returning the index and any warnings raised
    pub fn finish(self) -> (AddressablesIndex, Vec<ConsistencyWarning>) {
        (self.index, self.warnings)
    }
}
