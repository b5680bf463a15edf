//! Error types for the asset data model
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for data model operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised while converting asset model values
#[derive(Debug, Error)]
pub enum CoreError {
    /// String is not a valid UUID
    #[error("Invalid asset id '{0}'")]
    InvalidAssetId(String),

    /// Integer discriminant does not name an asset kind
    #[error("Unknown asset kind discriminant: {0}")]
    UnknownAssetKind(u8),

    /// Settings document could not be rendered or parsed
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}
