//! Encryptor trait definitions.

/// Symmetric whole-buffer encryptor.
///
/// # Thread Safety
///
/// Encryptors must be `Send + Sync`; one instance is shared by the writer,
/// the reader and the single-asset loader.
///
/// # Identity
///
/// Each encryptor has an identifier so configuration can name it and error
/// messages can say which cipher failed.
pub trait Encryptor: Send + Sync {
    /// Encrypt a buffer.
    ///
    /// An empty result for non-empty input is treated as a cipher failure
    /// by the packer.
    fn encrypt(&self, data: &[u8]) -> Vec<u8>;

    /// Decrypt a buffer produced by [`Encryptor::encrypt`].
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Unique encryptor identifier.
    fn encryptor_id(&self) -> &str;
}

/// Encryption errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Cipher produced nothing for non-empty input.
    #[error("Encryptor '{encryptor_id}' returned empty output for {input_len} input bytes")]
    EmptyOutput {
        /// Encryptor that failed
        encryptor_id: String,
        /// Length of the plaintext
        input_len: usize,
    },

    /// Decryption failed (wrong key, tampered ciphertext...).
    #[error("Decrypt error (encryptor={encryptor_id}, data_len={data_len}): {detail}")]
    DecryptFailed {
        /// Human-readable error description
        detail: String,
        /// Encryptor that attempted the decrypt
        encryptor_id: String,
        /// Length of the ciphertext
        data_len: usize,
    },

    /// Unknown encryptor identifier.
    #[error("Unknown encryptor: {0}")]
    UnknownEncryptor(String),
}

impl CryptoError {
    /// Create a decrypt error with full diagnostic context.
    pub fn decrypt(
        detail: impl Into<String>,
        encryptor_id: impl Into<String>,
        data_len: usize,
    ) -> Self {
        CryptoError::DecryptFailed {
            detail: detail.into(),
            encryptor_id: encryptor_id.into(),
            data_len,
        }
    }
}
