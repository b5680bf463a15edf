//! Opaque per-asset settings
//!
//! Importers attach a dynamically-typed settings tree to each record (texture
//! filtering, audio streaming flags, script defines...). The tree is rendered
//! to a self-describing byte string before it is embedded, so the record codec
//! never needs to know any importer's schema.
//!
//! ## Inner format
//!
//! The bytes are UTF-8 JSON text. An empty byte string means "no settings"
//! and is always valid.

use crate::error::CoreResult;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Self-describing settings document carried as opaque bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SettingsBlob(Vec<u8>);

impl SettingsBlob {
    /// Blob meaning "no settings"
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Render a settings tree into its embedded form
    ///
    /// `null` renders to the empty blob.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<Self> {
        if value.is_null() {
            return Ok(Self::empty());
        }
        Ok(Self(serde_json::to_vec(value)?))
    }

    /// Wrap bytes that are already in the embedded form
    pub fn from_raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse the embedded form back into a settings tree
    ///
    /// Returns `None` for the empty blob.
    pub fn to_json(&self) -> CoreResult<Option<serde_json::Value>> {
        if self.0.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&self.0)?))
    }

    /// Raw embedded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether the blob carries no settings
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the embedded form in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for SettingsBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for SettingsBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BlobVisitor;

        impl<'de> Visitor<'de> for BlobVisitor {
            type Value = SettingsBlob;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a byte string")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<SettingsBlob, E> {
                Ok(SettingsBlob(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<SettingsBlob, E> {
                Ok(SettingsBlob(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SettingsBlob, E> {
                Ok(SettingsBlob(v.as_bytes().to_vec()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<SettingsBlob, E> {
                Ok(SettingsBlob::empty())
            }

            fn visit_none<E: de::Error>(self) -> Result<SettingsBlob, E> {
                Ok(SettingsBlob::empty())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SettingsBlob, A::Error> {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Ok(SettingsBlob(bytes))
            }
        }

        deserializer.deserialize_byte_buf(BlobVisitor)
    }
}
