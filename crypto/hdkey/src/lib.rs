//!
//! # Symmetric HD keys
//!
//! Trees of symmetric keys derived from one secret along schema-validated
//! paths, a symmetric analogue of BIP32 wallets.
//!
//! ```text
//! secret --HKDF("MASTER")--> m --HKDF("CHILD42")--> m/42 --> ... --> node
//! ```
//!
//! Every step is an extract-then-expand derivation over an injected
//! [`HashAdapter`](symhd_hashes::HashAdapter). Nothing is cached or retained
//! between calls.
//!

pub mod codec;
pub mod error;
pub mod fingerprint;
pub mod hdkey;
pub mod kdf;
pub mod path;
pub mod prelude;
pub mod result;
pub mod salt;
pub mod schema;
pub mod tree;

#[cfg(test)]
mod mock_adapter;

pub use codec::Material;
pub use error::{Error, ErrorKind};
pub use fingerprint::{Fingerprint, fingerprint, verify_lineage};
pub use hdkey::{HDKey, derive_child, derive_master, derive_node};
pub use path::DerivationPath;
pub use result::Result;
pub use schema::{PathSchema, SchemaSegment, SegmentType};
pub use tree::KeyTree;
