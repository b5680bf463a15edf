//! Testing utilities for packages
//!
//! - **Encryptors**: a keyed toy cipher, a cipher that always fails and one
//!   that decrypts to nothing
//! - **Fixtures**: small asset databases and package corruption helpers
//!
//! # Example
//!
//! ```ignore
//! use luma_package::testing::{sample_records, XorEncryptor};
//!
//! let encryptor = XorEncryptor::new(b"key");
//! let records = sample_records();
//! ```

mod encryptors;
mod fixtures;

pub use encryptors::{BrokenEncryptor, HollowEncryptor, XorEncryptor};
pub use fixtures::{
    addressable_records, generated_records, sample_records, sample_ids, truncate_last_chunk,
};
