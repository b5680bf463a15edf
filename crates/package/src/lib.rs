//! Asset database packaging for Luma
//!
//! This crate turns an in-memory asset database into an encrypted,
//! chunk-split package on disk, and back:
//!
//! - Codec: framed msgpack payload container, one frame per record
//! - Index: direct-by-id offsets into the decrypted payload
//! - Addressables: address and group lookup tables
//! - Chunks: randomly sized payload slices and their ordered manifest
//! - Writer: pack a database into a package directory
//! - Reader: bulk unpack with parallel chunk fetch and parallel decode
//! - Loader: single-record access through a decrypted-package cache
//! - Crypto: the injected encryptor seam

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod addressables; // Address/group index (AddressablesIndex, builder)
pub mod cache; // Decrypted-package LRU
pub mod chunk; // Chunk splitter and joiner
pub mod codec; // Payload container (BinaryCodec)
pub mod config; // PackConfig and validation
pub mod crypto; // Encryptor trait and registry
pub mod decode; // Multi-threaded payload decode
pub mod error; // PackError, ConsistencyWarning
pub mod index; // IndexEntry, IndexBuilder
pub mod loader; // SingleAssetLoader
pub mod manifest; // Manifest file and package layout
pub mod reader; // PackageReader
pub mod testing; // Test encryptors and fixtures
pub mod writer; // PackageWriter

// === Re-exports ===
pub use addressables::{AddressablesIndex, AddressablesIndexBuilder};
pub use cache::{CacheStats, DecryptedPackageCache};
pub use chunk::{ChunkJoiner, ChunkSplitter};
pub use codec::BinaryCodec;
pub use config::{ConfigError, PackConfig};
pub use crypto::{get_encryptor, CryptoError, Encryptor, IdentityEncryptor};
pub use decode::ParallelDecoder;
pub use error::{ConsistencyWarning, PackError, PackResult};
pub use index::{decode_index, encode_index, find_entry, IndexBuilder, IndexEntry};
pub use loader::SingleAssetLoader;
pub use manifest::{paths, PackageManifest, CHUNK_EXTENSION};
pub use reader::{PackageReader, PackageVerifyInfo};
pub use writer::{PackReport, PackageWriter};

// Data model
pub use luma_core::{AssetId, AssetKind, AssetMap, AssetRecord, SettingsBlob};
