use crate::crypto::{CryptoError, Encryptor};

const TAG_SIZE: usize = 4;

/// Repeating-key XOR with a CRC32 tag over the plaintext
///
/// Not a real cipher. It changes every byte and detects a wrong key or a
/// damaged ciphertext, which is all the tests need.
#[derive(Debug, Clone)]
pub struct XorEncryptor {
    key: Vec<u8>,
}

impl XorEncryptor {
    /// Create an encryptor for `key`
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn new(key: &[u8]) -> Self {
        assert!(!key.is_empty(), "xor key must not be empty");
        Self { key: key.to_vec() }
    }

    fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

impl Encryptor for XorEncryptor {
    fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        let mut sealed = self.apply(data);
        sealed.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
        sealed
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() < TAG_SIZE {
            return Err(CryptoError::decrypt(
                "ciphertext shorter than tag",
                self.encryptor_id(),
                data.len(),
            ));
        }
        let (body, tag) = data.split_at(data.len() - TAG_SIZE);
        let plain = self.apply(body);
        let expected = u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]);
        if crc32fast::hash(&plain) != expected {
            return Err(CryptoError::decrypt(
                "tag mismatch",
                self.encryptor_id(),
                data.len(),
            ));
        }
        Ok(plain)
    }

    fn encryptor_id(&self) -> &str {
        "xor-test"
    }
}

/// Encryptor whose cipher returns nothing and never decrypts
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenEncryptor;

impl Encryptor for BrokenEncryptor {
    fn encrypt(&self, _data: &[u8]) -> Vec<u8> {
        Vec::new()
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::decrypt(
            "cipher unavailable",
            self.encryptor_id(),
            data.len(),
        ))
    }

    fn encryptor_id(&self) -> &str {
        "broken"
    }
}

/// Pass-through encryptor whose decrypt always yields nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct HollowEncryptor;

impl Encryptor for HollowEncryptor {
    fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decrypt(&self, _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(Vec::new())
    }

    fn encryptor_id(&self) -> &str {
        "hollow"
    }
}
