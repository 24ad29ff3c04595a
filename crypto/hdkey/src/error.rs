//!
//! Error types emitted by schema parsing, path parsing and key derivation.
//!

use crate::schema::MAX_SCHEMA_SEGMENTS;
use thiserror::Error;

/// Broad class of an [`Error`]. Every class is permanent: retrying the same
/// input fails the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing root marker, malformed `label: type` segment, empty segment.
    Grammar,
    /// Unknown schema type tag, or a value that does not fit the schema type.
    Type,
    /// Too many segments, index out of range, wrong fingerprint size.
    Range,
    /// API misuse that does not stem from textual input.
    Usage,
}

/// [`Error`](enum@Error) variants emitted by this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("expected root marker `m`, found `{0}`")]
    MissingRoot(String),

    #[error("malformed schema segment `{0}` (expected `label: type`)")]
    MalformedSegment(String),

    #[error("empty segment")]
    EmptySegment,

    #[error("`{0}` is neither a decimal index nor a usable label")]
    Unresolvable(String),

    #[error("unknown segment type `{0}` (expected one of: str, num, any)")]
    UnknownType(String),

    #[error("`{0}` is not a decimal index")]
    NotNumeric(String),

    #[error("schema has {0} segments including the root, at most {max} are allowed", max = MAX_SCHEMA_SEGMENTS)]
    SchemaTooLong(usize),

    #[error("path has {found} segments after the root, the schema defines {max}")]
    PathTooLong { found: usize, max: usize },

    #[error("index `{0}` is outside the accepted range 0..=4294967295")]
    IndexOutOfRange(String),

    #[error("fingerprint must be {expected} bytes, got {found}")]
    FingerprintLength { expected: usize, found: usize },

    #[error("cannot produce {requested} bytes with `{adapter}`, the limit is {max}")]
    OutputLength { requested: usize, max: usize, adapter: &'static str },

    #[error("maximum derivation depth exceeded")]
    Depth,

    #[error("a master key has no parent to verify against")]
    NoParent,

    #[error("segment {position} (`{label}`): {source}")]
    Segment { position: usize, label: String, source: Box<Error> },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingRoot(_) | Error::MalformedSegment(_) | Error::EmptySegment | Error::Unresolvable(_) => ErrorKind::Grammar,
            Error::UnknownType(_) | Error::NotNumeric(_) => ErrorKind::Type,
            Error::SchemaTooLong(_) | Error::PathTooLong { .. } | Error::IndexOutOfRange(_) | Error::FingerprintLength { .. } => {
                ErrorKind::Range
            }
            Error::OutputLength { .. } | Error::Depth | Error::NoParent => ErrorKind::Usage,
            Error::Segment { source, .. } => source.kind(),
        }
    }

    /// Attach the path position (root is position 0) and schema label.
    pub fn at_segment(self, position: usize, label: impl Into<String>) -> Self {
        Error::Segment { position, label: label.into(), source: Box::new(self) }
    }

    /// The innermost error, with segment context stripped.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Segment { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_context() {
        let err = Error::NotNumeric("alpha".into()).at_segment(4, "index");
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.root_cause(), &Error::NotNumeric("alpha".into()));
        assert_eq!(err.to_string(), "segment 4 (`index`): `alpha` is not a decimal index");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::MissingRoot("x".into()).kind(), ErrorKind::Grammar);
        assert_eq!(Error::SchemaTooLong(257).kind(), ErrorKind::Range);
        assert_eq!(Error::SchemaTooLong(257).to_string(), "schema has 257 segments including the root, at most 256 are allowed");
        assert_eq!(Error::FingerprintLength { expected: 16, found: 15 }.kind(), ErrorKind::Range);
        assert_eq!(Error::NoParent.kind(), ErrorKind::Usage);
    }
}
