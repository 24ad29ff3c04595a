//!
//! Re-exports of the most commonly used types and traits in this crate.
//!

pub use crate::codec::{Material, decode_text, encode_u32};
pub use crate::error::{Error, ErrorKind};
pub use crate::fingerprint::{fingerprint, verify_lineage};
pub use crate::hdkey::{HDKey, derive_child, derive_master, derive_node};
pub use crate::path::DerivationPath;
pub use crate::schema::{PathSchema, SegmentType};
pub use crate::tree::KeyTree;
pub use symhd_hashes::{Blake2b, Blake3, HashAdapter, HashKind, HmacSha256, HmacSha512};
