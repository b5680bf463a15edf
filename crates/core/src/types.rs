//! Identity and category types for asset records
//!
//! - AssetId: UUID wrapper, serialized in canonical hyphenated string form
//! - AssetKind: Asset category with stable integer discriminants

use crate::error::{CoreError, CoreResult};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an imported asset
///
/// An AssetId wraps a UUID and stays stable when the asset file is moved or
/// renamed. On the wire it is always the canonical lowercase hyphenated
/// string, so packages written here can be read from other languages without
/// agreeing on a binary UUID layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Create a new random AssetId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an AssetId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Create an AssetId from a u128, handy for deterministic fixtures
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Parse an AssetId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    pub fn parse(s: &str) -> CoreResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::InvalidAssetId(s.to_string()))
    }

    /// Get the raw bytes of this AssetId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Canonical string form used in every serialized structure
    pub fn to_canonical(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for AssetId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for AssetId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.hyphenated())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AssetIdVisitor;

        impl Visitor<'_> for AssetIdVisitor {
            type Value = AssetId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a UUID string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<AssetId, E> {
                AssetId::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AssetIdVisitor)
    }
}

/// Category of an imported asset
///
/// ## Discriminant Values
///
/// These values are part of the package format and MUST NOT change:
/// - Unknown = 0
/// - Texture = 1
/// - Audio = 2
/// - Script = 3
/// - Prefab = 4
/// - Scene = 5
/// - Material = 6
/// - Model = 7
/// - Animation = 8
/// - Font = 9
/// - Shader = 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AssetKind {
    /// Importer could not classify the file
    Unknown = 0,
    /// Images and sprite sheets
    Texture = 1,
    /// Sound effects and music
    Audio = 2,
    /// Gameplay scripts
    Script = 3,
    /// Reusable entity templates
    Prefab = 4,
    /// Level or scene files
    Scene = 5,
    /// Material definitions
    Material = 6,
    /// Meshes and skeletal models
    Model = 7,
    /// Animation clips
    Animation = 8,
    /// Font faces
    Font = 9,
    /// Shader sources
    Shader = 10,
}

impl AssetKind {
    /// Every kind, in discriminant order
    pub const ALL: [AssetKind; 11] = [
        AssetKind::Unknown,
        AssetKind::Texture,
        AssetKind::Audio,
        AssetKind::Script,
        AssetKind::Prefab,
        AssetKind::Scene,
        AssetKind::Material,
        AssetKind::Model,
        AssetKind::Animation,
        AssetKind::Font,
        AssetKind::Shader,
    ];

    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }
}

impl TryFrom<u8> for AssetKind {
    type Error = CoreError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(CoreError::UnknownAssetKind(byte))
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Unknown => "unknown",
            AssetKind::Texture => "texture",
            AssetKind::Audio => "audio",
            AssetKind::Script => "script",
            AssetKind::Prefab => "prefab",
            AssetKind::Scene => "scene",
            AssetKind::Material => "material",
            AssetKind::Model => "model",
            AssetKind::Animation => "animation",
            AssetKind::Font => "font",
            AssetKind::Shader => "shader",
        };
        f.write_str(name)
    }
}

impl Serialize for AssetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_byte())
    }
}

impl<'de> Deserialize<'de> for AssetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let byte = u8::deserialize(deserializer)?;
        AssetKind::try_from(byte).map_err(de::Error::custom)
    }
}
