//! Core types for the Luma asset database
//!
//! This crate defines the data model shared by the packer and the runtime:
//! - AssetId: Stable, globally unique identifier for an imported asset
//! - AssetKind: Asset category with on-disk integer discriminants
//! - SettingsBlob: Opaque, self-describing per-asset settings document
//! - AssetRecord: One metadata record per imported asset
//! - Address helpers: normalization of addressable names
//! - Error: Error type for model conversions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod error;
pub mod record;
pub mod settings;
pub mod types;

pub use address::normalize_address;
pub use error::{CoreError, CoreResult};
pub use record::{AssetMap, AssetRecord};
pub use settings::SettingsBlob;
pub use types::{AssetId, AssetKind};
