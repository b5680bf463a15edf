//! Chunk splitting and joining
//!
//! The encrypted payload is cut into a random number of random-length slices
//! and stored under random file names. Chunks are a structural obfuscation
//! layer, not a cryptographic boundary: a reader that has the manifest can
//! reassemble the ciphertext by plain concatenation.

pub mod joiner;
pub mod splitter;

pub use joiner::ChunkJoiner;
pub use splitter::{chunk_name, Chunk, ChunkSplitter};
