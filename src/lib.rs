//! Lumapack - encrypted asset database packages for the Luma engine
//!
//! Lumapack turns the editor's asset database (one metadata record per
//! imported asset) into a single distributable package and loads it back at
//! runtime, either all at once or one record at a time.
//!
//! # Quick Start
//!
//! ```ignore
//! use lumapack::{AssetId, AssetKind, AssetMap, AssetRecord, PackConfig, PackageReader, PackageWriter};
//!
//! let mut records = AssetMap::new();
//! let hero = AssetRecord::new(AssetId::new(), "Assets/hero.png", AssetKind::Texture);
//! records.insert(hero.id, hero);
//!
//! let report = PackageWriter::from_config(PackConfig::default())?.pack(&records, "build/pkg".as_ref())?;
//! let restored = PackageReader::from_config(PackConfig::default())?.unpack(&report.manifest_path)?;
//! ```
//!
//! # Architecture
//!
//! The data model lives in `luma-core`; packing, reading and random access
//! live in `luma-package`. This crate re-exports both.

// Re-export the public API from luma-package
pub use luma_package::*;
