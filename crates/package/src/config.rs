//! Package configuration
//!
//! Controls chunk obfuscation, worker counts for loading and the decrypted
//! package cache.

use crate::crypto::get_encryptor;

/// Default upper bound on the number of chunk files per package
pub const DEFAULT_MAX_CHUNKS: usize = 8;

/// Default number of concurrent chunk readers
pub const DEFAULT_FETCH_THREADS: usize = 8;

/// Package configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Upper bound on chunk files; the actual count is random in `1..=max_chunks`
    pub max_chunks: usize,
    /// Worker threads for record decoding
    pub decode_threads: usize,
    /// Worker threads for chunk file reads
    pub fetch_threads: usize,
    /// Number of decrypted packages kept by the single-asset loader
    pub cache_capacity: usize,
    /// Encryptor identifier (default: "identity")
    pub encryptor_id: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            max_chunks: DEFAULT_MAX_CHUNKS,
            decode_threads: default_decode_threads(),
            fetch_threads: DEFAULT_FETCH_THREADS,
            cache_capacity: 1,
            encryptor_id: "identity".to_string(),
        }
    }
}

fn default_decode_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl PackConfig {
    /// Create config for testing
    ///
    /// Uses few threads so tests exercise the sharding paths on any machine.
    pub fn for_testing() -> Self {
        PackConfig {
            max_chunks: 4,
            decode_threads: 3,
            fetch_threads: 2,
            cache_capacity: 1,
            encryptor_id: "identity".to_string(),
        }
    }

    /// Set the chunk count upper bound
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the decode worker count
    pub fn with_decode_threads(mut self, threads: usize) -> Self {
        self.decode_threads = threads;
        self
    }

    /// Set the chunk reader count
    pub fn with_fetch_threads(mut self, threads: usize) -> Self {
        self.fetch_threads = threads;
        self
    }

    /// Set the decrypted package cache capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set encryptor identifier
    pub fn with_encryptor(mut self, encryptor_id: impl Into<String>) -> Self {
        self.encryptor_id = encryptor_id.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chunks == 0 {
            return Err(ConfigError::ZeroValue("max_chunks"));
        }
        if self.decode_threads == 0 {
            return Err(ConfigError::ZeroValue("decode_threads"));
        }
        if self.fetch_threads == 0 {
            return Err(ConfigError::ZeroValue("fetch_threads"));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroValue("cache_capacity"));
        }
        get_encryptor(&self.encryptor_id)
            .map_err(|e| ConfigError::InvalidEncryptor(e.to_string()))?;
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A count that must be at least one was zero
    #[error("{0} must be at least 1")]
    ZeroValue(&'static str),

    /// Invalid encryptor identifier
    #[error("Invalid encryptor: {0}")]
    InvalidEncryptor(String),
}
