//! Identity encryptor (no transformation).

use super::traits::{CryptoError, Encryptor};

/// Identity encryptor - bytes pass through unchanged.
///
/// # Example
///
/// ```
/// use luma_package::crypto::{Encryptor, IdentityEncryptor};
///
/// let encryptor = IdentityEncryptor;
/// let sealed = encryptor.encrypt(b"hello world");
/// assert_eq!(sealed.as_slice(), b"hello world");
/// assert_eq!(encryptor.decrypt(&sealed).unwrap().as_slice(), b"hello world");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEncryptor;

impl Encryptor for IdentityEncryptor {
    fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(data.to_vec())
    }

    fn encryptor_id(&self) -> &str {
        "identity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_roundtrip() {
        let encryptor = IdentityEncryptor;
        let data = vec![0xFF, 0x00, 0xAB, 0xCD];
        let sealed = encryptor.encrypt(&data);
        assert_eq!(sealed, data);
        assert_eq!(encryptor.decrypt(&sealed).unwrap(), data);
    }

    #[test]
    fn test_identity_empty() {
        let encryptor = IdentityEncryptor;
        assert!(encryptor.encrypt(&[]).is_empty());
        assert!(encryptor.decrypt(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_identity_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IdentityEncryptor>();
    }
}
