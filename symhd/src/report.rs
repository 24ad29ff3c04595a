//!
//! Runs one derivation described by [`Args`] and renders the outcome.
//!

use crate::args::Args;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt::{self, Display};
use symhd_hashes::{HashAdapter, HashKind};
use symhd_hdkey::{KeyTree, PathSchema, codec::to_hex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Derivation(#[from] symhd_hdkey::Error),

    #[error("a master secret is required")]
    MissingSecret,

    #[error("parent key `{0}` is not valid hex")]
    ParentKeyHex(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything known about a derived node, secrets included.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub hash: HashKind,
    pub schema: PathSchema,
    pub path: String,
    pub indices: String,
    pub depth: u32,
    pub key: String,
    pub chain_code: String,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_verified: Option<bool>,
}

impl Report {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text or JSON rendering, as selected by `--json`.
    pub fn render(&self, json: bool) -> Result<String> {
        if json { self.to_json() } else { Ok(self.to_string()) }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "hash:        {}", self.hash)?;
        writeln!(f, "schema:      {}", self.schema)?;
        writeln!(f, "path:        {}", self.path)?;
        writeln!(f, "indices:     {}", self.indices)?;
        writeln!(f, "depth:       {}", self.depth)?;
        writeln!(f, "key:         {}", self.key)?;
        writeln!(f, "chain code:  {}", self.chain_code)?;
        write!(f, "fingerprint: {}", self.fingerprint)?;
        if let Some(verified) = self.parent_verified {
            write!(f, "\nparent:      {}", if verified { "verified" } else { "NOT verified" })?;
        }
        Ok(())
    }
}

fn decode_parent_key(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let mut key = vec![0u8; text.len() / 2];
    if text.len() % 2 != 0 || faster_hex::hex_decode(text.as_bytes(), &mut key).is_err() {
        return Err(Error::ParentKeyHex(text.to_string()));
    }
    Ok(key)
}

/// Parse the schema and path, derive the node and optionally check its parent.
pub fn run(args: &Args) -> Result<Report> {
    let secret = args.secret.as_deref().ok_or(Error::MissingSecret)?;
    let parent_key = args.verify_parent.as_deref().map(decode_parent_key).transpose()?;

    let adapter: Box<dyn HashAdapter> = args.hash.adapter();
    debug!("Using the {} adapter ({} byte digests)", adapter.name(), adapter.output_len());

    let tree = KeyTree::with_schema(adapter, &args.schema)?;
    debug!("Schema `{}` with {} typed segments", tree.schema(), tree.schema().len());

    let path = tree.parse_path(&args.path)?;
    let node = tree.derive_path(&tree.derive_master(secret)?, &path)?;
    info!("Derived {} at depth {}", node.path().unwrap_or_default(), node.depth());

    let parent_verified = match parent_key {
        Some(parent_key) => {
            let verified = tree.verify_parent(&node, &parent_key)?;
            if !verified {
                warn!("The supplied parent key does not match the lineage of {}", args.path);
            }
            Some(verified)
        }
        None => None,
    };

    Ok(Report {
        hash: args.hash,
        schema: tree.schema().clone(),
        path: args.path.trim().to_string(),
        indices: path.to_string(),
        depth: node.depth(),
        key: to_hex(node.key()),
        chain_code: to_hex(node.chain_code()),
        fingerprint: to_hex(node.fingerprint()),
        parent_verified,
    })
}
