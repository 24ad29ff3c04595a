use crate::{Blake2b, Blake3, HashAdapter, HmacSha256, HmacSha512};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown hash adapter `{0}` (expected one of: blake2b, blake3, hmac-sha256, hmac-sha512)")]
pub struct HashKindError(pub String);

/// Selects one of the bundled adapters by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashKind {
    #[default]
    Blake2b,
    Blake3,
    HmacSha256,
    HmacSha512,
}

impl HashKind {
    pub const ALL: [HashKind; 4] = [HashKind::Blake2b, HashKind::Blake3, HashKind::HmacSha256, HashKind::HmacSha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashKind::Blake2b => "blake2b",
            HashKind::Blake3 => "blake3",
            HashKind::HmacSha256 => "hmac-sha256",
            HashKind::HmacSha512 => "hmac-sha512",
        }
    }

    /// Build a fresh adapter of this kind.
    pub fn adapter(&self) -> Box<dyn HashAdapter> {
        match self {
            HashKind::Blake2b => Box::new(Blake2b),
            HashKind::Blake3 => Box::new(Blake3),
            HashKind::HmacSha256 => Box::new(HmacSha256),
            HashKind::HmacSha512 => Box::new(HmacSha512),
        }
    }
}

impl Display for HashKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashKind {
    type Err = HashKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        HashKind::ALL.into_iter().find(|kind| kind.as_str() == normalized).ok_or_else(|| HashKindError(s.to_string()))
    }
}

impl Serialize for HashKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HashKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HashKind::from_str(&s).map_err(de::Error::custom)
    }
}
