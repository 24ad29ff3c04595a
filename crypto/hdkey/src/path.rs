//! Derivation paths

use crate::{codec::decode_text, error::Error, result::Result, schema::PathSchema, schema::SegmentType};
use serde::{Serialize, Serializer};
use std::fmt::{self, Display};
use symhd_hashes::HashAdapter;

/// Root marker of every path and schema.
pub const PREFIX: &str = "m";

pub const PATH_DELIMITER: char = '/';

/// Digest size used to map a label to an index; the index is the big-endian
/// `u32` taken from its first four bytes.
pub const LABEL_DIGEST_SIZE: usize = 32;

/// Parse a decimal index. Only ASCII digits are accepted.
pub fn parse_index(text: &str) -> Result<u32> {
    if text.is_empty() {
        return Err(Error::EmptySegment);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::NotNumeric(text.to_string()));
    }
    text.parse::<u32>().map_err(|_| Error::IndexOutOfRange(text.to_string()))
}

/// Map a label to an index by hashing it (see [`decode_text`] for how the
/// text becomes bytes). Identical labels map to identical indices under the
/// same adapter.
pub fn label_index<H: HashAdapter + ?Sized>(hasher: &H, text: &str) -> Result<u32> {
    if text.is_empty() {
        return Err(Error::EmptySegment);
    }
    let digest = hasher.hash(&decode_text(text), LABEL_DIGEST_SIZE);
    let head: [u8; 4] = digest.get(..4).and_then(|head| head.try_into().ok()).ok_or(Error::OutputLength {
        requested: LABEL_DIGEST_SIZE,
        max: digest.len(),
        adapter: hasher.name(),
    })?;
    Ok(u32::from_be_bytes(head))
}

impl SegmentType {
    /// Turn the text of one path segment into an index.
    pub fn resolve<H: HashAdapter + ?Sized>(&self, hasher: &H, text: &str) -> Result<u32> {
        match self {
            SegmentType::Num => parse_index(text),
            SegmentType::Str => label_index(hasher, text),
            SegmentType::Any => {
                parse_index(text).or_else(|_| label_index(hasher, text)).map_err(|_| Error::Unresolvable(text.to_string()))
            }
        }
    }
}

/// Validated indices, one per schema position, with the segment text each
/// one was resolved from.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DerivationPath {
    path: Vec<u32>,
    labels: Vec<String>,
}

impl DerivationPath {
    /// Parse `m/i1/i2/...` against `schema`.
    ///
    /// The path may be shorter than the schema, never longer. Every failure
    /// carries the position (root = 0) and label of the offending segment.
    pub fn parse<H: HashAdapter + ?Sized>(hasher: &H, text: &str, schema: &PathSchema) -> Result<Self> {
        let mut parts = text.trim().split(PATH_DELIMITER);
        let root = parts.next().unwrap_or_default();
        if root != PREFIX {
            return Err(Error::MissingRoot(root.to_string()));
        }

        let parts = parts.collect::<Vec<_>>();
        if parts.len() > schema.len() {
            return Err(Error::PathTooLong { found: parts.len(), max: schema.len() });
        }

        let path = parts
            .iter()
            .zip(schema.iter())
            .enumerate()
            .map(|(i, (part, segment))| segment.kind().resolve(hasher, part).map_err(|err| err.at_segment(i + 1, segment.label())))
            .collect::<Result<Vec<_>>>()?;
        let labels = parts.into_iter().map(str::to_string).collect();

        Ok(Self { path, labels })
    }

    pub fn indices(&self) -> &[u32] {
        &self.path
    }

    /// Segment text as written in the parsed path, one entry per index.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// `m/` followed by the segment text, e.g. `m/alpha/7`.
    pub fn to_label_string(&self) -> String {
        let mut text = PREFIX.to_string();
        for label in &self.labels {
            text.push(PATH_DELIMITER);
            text.push_str(label);
        }
        text
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.path.iter().copied()
    }

    /// Is this derivation path empty? (i.e. the root)
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Get the parent [`DerivationPath`] for the current one.
    ///
    /// Returns `None` if this is already the root path.
    pub fn parent(&self) -> Option<Self> {
        self.path.len().checked_sub(1).map(|n| {
            let mut parent = self.clone();
            parent.path.truncate(n);
            parent.labels.truncate(n);
            parent
        })
    }
}

/// Wrap raw indices, labelled by their decimal text.
///
/// No schema is involved, so nothing is validated here.
/// [`KeyTree::derive_path`](crate::tree::KeyTree::derive_path) still rejects
/// a path longer than its schema.
impl From<Vec<u32>> for DerivationPath {
    fn from(path: Vec<u32>) -> Self {
        let labels = path.iter().map(u32::to_string).collect();
        Self { path, labels }
    }
}

impl AsRef<[u32]> for DerivationPath {
    fn as_ref(&self) -> &[u32] {
        &self.path
    }
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;

        for index in self.iter() {
            write!(f, "{PATH_DELIMITER}{index}")?;
        }

        Ok(())
    }
}

impl IntoIterator for DerivationPath {
    type Item = u32;
    type IntoIter = std::vec::IntoIter<u32>;

    fn into_iter(self) -> std::vec::IntoIter<u32> {
        self.path.into_iter()
    }
}

impl Serialize for DerivationPath {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
