//! Package manifest and on-disk layout
//!
//! ## Directory Structure
//!
//! ```text
//! <output dir>/
//! ├── package.manifest      chunk file names, one per line, concatenation order
//! ├── package.index         encrypted msgpack [{id, offset, size}, ...]
//! ├── package.addressables  encrypted msgpack {addresses, groups}
//! └── <random>.luma_pack    encrypted payload slices, one per chunk
//! ```
//!
//! Chunk names are random and carry no meaning. Only their position in the
//! manifest says where each slice belongs; names are never sorted.

use crate::error::{PackError, PackResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File names within a package directory
pub mod paths {
    /// Ordered chunk list
    pub const MANIFEST: &str = "package.manifest";
    /// Encrypted record index
    pub const INDEX: &str = "package.index";
    /// Encrypted address/group index
    pub const ADDRESSABLES: &str = "package.addressables";
}

/// Extension of every chunk file (without the dot)
pub const CHUNK_EXTENSION: &str = "luma_pack";

/// Ordered list of chunk file names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    chunks: Vec<String>,
}

impl PackageManifest {
    /// Create a manifest from chunk names in concatenation order
    ///
    /// Every name is validated with [`validate_chunk_name`].
    pub fn new(chunks: Vec<String>) -> PackResult<Self> {
        for name in &chunks {
            validate_chunk_name(name)?;
        }
        Ok(Self { chunks })
    }

    /// Chunk names in concatenation order
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the package has no payload
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Render as newline-delimited text
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for name in &self.chunks {
            text.push_str(name);
            text.push('\n');
        }
        text
    }

    /// Parse newline-delimited text
    ///
    /// Blank lines are ignored and `\r\n` endings accepted. An empty file is a
    /// valid manifest for an empty database.
    pub fn parse(text: &str) -> PackResult<Self> {
        let chunks = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(chunks)
    }

    /// Read a manifest file
    pub fn read(path: &Path) -> PackResult<Self> {
        let bytes = fs::read(path).map_err(|e| PackError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| {
            PackError::format(format!("manifest {} is not UTF-8", path.display()))
        })?;
        Self::parse(&text)
    }

    /// Write a manifest file
    pub fn write(&self, path: &Path) -> PackResult<()> {
        fs::write(path, self.to_text()).map_err(|e| PackError::io(path, e))
    }
}

/// Check that a chunk name is a bare file name with the chunk extension
pub fn validate_chunk_name(name: &str) -> PackResult<()> {
    let stem = name
        .strip_suffix(CHUNK_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .ok_or_else(|| PackError::format(format!("chunk '{}' lacks .{}", name, CHUNK_EXTENSION)))?;

    let bare = !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !bare {
        return Err(PackError::format(format!("invalid chunk name '{}'", name)));
    }
    Ok(())
}

/// Directory holding the package that `manifest_path` describes
pub fn package_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
