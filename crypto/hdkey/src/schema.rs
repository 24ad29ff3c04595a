//!
//! Path schemas: typed templates for derivation paths.
//!
//! ```text
//! m / application: any / purpose: any / context: any / index: num
//! ```
//!
//! Segments are separated by `" / "`, the first one is the root marker `m`
//! and every other one is a `label: type` pair with `type` one of `str`,
//! `num` or `any`. The entry at schema position `i` governs path segment `i`.
//!

use crate::{error::Error, path::PREFIX, result::Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

pub const SCHEMA_DELIMITER: &str = " / ";

/// Upper bound on schema segments, the root included.
pub const MAX_SCHEMA_SEGMENTS: usize = 256;

/// How the text of a path segment turns into an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentType {
    /// Always hashed as a label, even when it looks like a number.
    Str,
    /// Decimal `u32` only.
    Num,
    /// Decimal if possible, otherwise hashed as a label.
    Any,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Str => "str",
            SegmentType::Num => "num",
            SegmentType::Any => "any",
        }
    }
}

impl Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "str" => Ok(SegmentType::Str),
            "num" => Ok(SegmentType::Num),
            "any" => Ok(SegmentType::Any),
            other => Err(Error::UnknownType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SchemaSegment {
    label: String,
    kind: SegmentType,
}

impl SchemaSegment {
    pub fn new(label: impl Into<String>, kind: SegmentType) -> Self {
        Self { label: label.into(), kind }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> SegmentType {
        self.kind
    }

    fn parse(position: usize, text: &str) -> Result<Self> {
        let malformed = || Error::MalformedSegment(text.to_string()).at_segment(position, text);
        let (label, kind) = text.split_once(':').ok_or_else(malformed)?;
        let (label, kind) = (label.trim(), kind.trim());
        if label.is_empty() || kind.is_empty() {
            return Err(malformed());
        }
        let kind = kind.parse::<SegmentType>().map_err(|err| err.at_segment(position, label))?;
        Ok(Self::new(label, kind))
    }
}

impl Display for SchemaSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.kind)
    }
}

/// Ordered `(label, type)` pairs; the root marker is implied and not stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PathSchema {
    segments: Vec<SchemaSegment>,
}

impl PathSchema {
    /// Parse schema text.
    ///
    /// Fails with a grammar fault when the root marker is missing or a
    /// segment is not a `label: type` pair, with a type fault on an unknown
    /// type tag, and with a range fault above [`MAX_SCHEMA_SEGMENTS`].
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(SCHEMA_DELIMITER);
        let root = parts.next().unwrap_or_default().trim();
        if root != PREFIX {
            return Err(Error::MissingRoot(root.to_string()));
        }

        let count = text.split(SCHEMA_DELIMITER).count();
        if count > MAX_SCHEMA_SEGMENTS {
            return Err(Error::SchemaTooLong(count));
        }

        let segments = parts.enumerate().map(|(i, part)| SchemaSegment::parse(i + 1, part.trim())).collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<SchemaSegment>) -> Result<Self> {
        if segments.len() + 1 > MAX_SCHEMA_SEGMENTS {
            return Err(Error::SchemaTooLong(segments.len() + 1));
        }
        Ok(Self { segments })
    }

    /// Number of typed segments, the root excluded.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Entry bound to path position `position + 1`.
    pub fn get(&self, position: usize) -> Option<&SchemaSegment> {
        self.segments.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaSegment> + '_ {
        self.segments.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(SchemaSegment::label)
    }
}

impl AsRef<[SchemaSegment]> for PathSchema {
    fn as_ref(&self) -> &[SchemaSegment] {
        &self.segments
    }
}

impl Display for PathSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        for segment in self.segments.iter() {
            write!(f, "{SCHEMA_DELIMITER}{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for PathSchema {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl Serialize for PathSchema {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PathSchema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<PathSchema, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PathSchemaVisitor;
        impl de::Visitor<'_> for PathSchemaVisitor {
            type Value = PathSchema;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a schema string such as `m / label: num / other: str`")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                PathSchema::parse(value).map_err(|err| de::Error::custom(err.to_string()))
            }
        }

        deserializer.deserialize_str(PathSchemaVisitor)
    }
}
