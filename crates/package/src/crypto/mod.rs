//! Package encryption seam.
//!
//! Every byte that lands on disk (payload, index, addressables) passes through
//! an [`Encryptor`]. The cipher itself is supplied by the host application and
//! injected into the writer and reader; this crate carries no key material
//! and no global cipher state.
//!
//! `IdentityEncryptor` ships as the pass-through default so packages can be
//! produced and inspected before a real cipher is wired in.
//!
//! # Usage
//!
//! ```ignore
//! use luma_package::crypto::{Encryptor, IdentityEncryptor};
//!
//! let encryptor = IdentityEncryptor;
//! let sealed = encryptor.encrypt(b"payload");
//! let opened = encryptor.decrypt(&sealed)?;
//! ```

mod identity;
mod traits;

pub use identity::IdentityEncryptor;
pub use traits::{CryptoError, Encryptor};

use std::sync::Arc;

/// Get an encryptor by its identifier.
///
/// # Known Encryptors
///
/// - `"identity"`: No-op encryptor (pass-through)
pub fn get_encryptor(encryptor_id: &str) -> Result<Arc<dyn Encryptor>, CryptoError> {
    match encryptor_id {
        "identity" => Ok(Arc::new(IdentityEncryptor)),
        _ => Err(CryptoError::UnknownEncryptor(encryptor_id.to_string())),
    }
}

/// Encrypt `data`, rejecting an empty result for non-empty input
pub(crate) fn seal(encryptor: &dyn Encryptor, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let sealed = encryptor.encrypt(data);
    if sealed.is_empty() && !data.is_empty() {
        return Err(CryptoError::EmptyOutput {
            encryptor_id: encryptor.encryptor_id().to_string(),
            input_len: data.len(),
        });
    }
    Ok(sealed)
}
