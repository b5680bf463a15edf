//! Package error and warning types

use crate::config::ConfigError;
use crate::crypto::CryptoError;
use luma_core::AssetId;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while packing or loading a package
///
/// Any of these aborts the whole operation. A pack that fails leaves the
/// output directory in an unspecified state; a load that fails returns no
/// records at all.
#[derive(Debug, Error)]
pub enum PackError {
    /// Manifest, index or payload has the wrong shape
    #[error("Invalid package: {0}")]
    Format(String),

    /// Required package file does not exist
    #[error("Missing required file in package: {}", .0.display())]
    MissingFile(PathBuf),

    /// Open/read/write failure
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File or directory the operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Encryption or decryption failed
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Configuration rejected by validation
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    /// Requested id, address or group is not in the package
    #[error("Not found in package: {0}")]
    NotFound(String),

    /// A worker thread panicked
    #[error("Worker failed: {0}")]
    Worker(String),
}

impl PackError {
    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Wrap an IO error with the path it happened on
    ///
    /// A missing file becomes [`PackError::MissingFile`].
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingFile(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether this error means the package contents are malformed
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_) | Self::MissingFile(_))
    }

    /// Whether this error came from the encryptor
    pub fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto(_))
    }
}

impl From<rmp_serde::decode::Error> for PackError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Self::Format(format!("msgpack decode: {}", e))
    }
}

impl From<rmp_serde::encode::Error> for PackError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Format(format!("msgpack encode: {}", e))
    }
}

/// Result type for package operations
pub type PackResult<T> = Result<T, PackError>;

/// Non-fatal inconsistency found while building a package
///
/// Warnings are logged and returned to the caller; they never abort a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyWarning {
    /// Two records claim the same address; the first one keeps it
    AddressCollision {
        /// Normalized address
        address: String,
        /// Record that owns the address
        kept: AssetId,
        /// Record whose claim was dropped
        ignored: AssetId,
    },
    /// A record lists the same group more than once
    DuplicateGroupEntry {
        /// Group name
        group: String,
        /// Record with the repeated group
        id: AssetId,
    },
    /// Two records point at the same source file
    DuplicateAssetPath {
        /// Shared asset path
        asset_path: String,
        /// Record seen first
        first: AssetId,
        /// Record seen later
        second: AssetId,
    },
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressCollision {
                address,
                kept,
                ignored,
            } => write!(
                f,
                "address '{}' already maps to {}, ignoring {}",
                address, kept, ignored
            ),
            Self::DuplicateGroupEntry { group, id } => {
                write!(f, "asset {} lists group '{}' more than once", id, group)
            }
            Self::DuplicateAssetPath {
                asset_path,
                first,
                second,
            } => write!(
                f,
                "asset path '{}' is shared by {} and {}",
                asset_path, first, second
            ),
        }
    }
}
