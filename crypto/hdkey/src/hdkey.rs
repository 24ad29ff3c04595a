//!
//! Symmetric HD keys and the master/child/node derivation steps.
//!

use crate::{
    codec::{encode_u32, to_hex},
    error::Error,
    fingerprint::{Fingerprint, fingerprint, verify_lineage},
    kdf::hkdf,
    path::{DerivationPath, PATH_DELIMITER, PREFIX},
    result::Result,
    salt::derive_salt,
};
use std::fmt::{self, Debug};
use subtle::{Choice, ConstantTimeEq};
use symhd_hashes::HashAdapter;

pub const KEY_SIZE: usize = 32;
pub const CHAIN_CODE_SIZE: usize = 32;

/// Expand tag of the master derivation.
pub const MASTER_DOMAIN: &[u8] = b"MASTER";

/// Expand tag prefix of a child derivation, followed by the decimal index.
pub const CHILD_DOMAIN: &[u8] = b"CHILD";

const OKM_SIZE: usize = KEY_SIZE + CHAIN_CODE_SIZE;

pub type KeyBytes = [u8; KEY_SIZE];
pub type ChainCode = [u8; CHAIN_CODE_SIZE];

/// A derived key with its chain code and lineage metadata.
///
/// Values are immutable once built; the caller owns them and decides how
/// they are stored or erased.
#[derive(Clone)]
pub struct HDKey {
    key: KeyBytes,
    chain_code: ChainCode,
    depth: u32,
    fingerprint: Fingerprint,
    path: Option<String>,
}

impl HDKey {
    /// Derive the depth-0 key from `secret`.
    pub fn master<H: HashAdapter + ?Sized>(hasher: &H, secret: &[u8]) -> Result<Self> {
        let salt = derive_salt(hasher, secret, None);
        let (key, chain_code) = split_okm(hasher, secret, &salt, MASTER_DOMAIN)?;
        let fingerprint = fingerprint(hasher, secret, &key)?;
        Ok(Self { key, chain_code, depth: 0, fingerprint, path: Some(PREFIX.to_string()) })
    }

    /// Derive the child at `index`.
    pub fn derive_child<H: HashAdapter + ?Sized>(&self, hasher: &H, index: u32) -> Result<Self> {
        self.derive_labelled_child(hasher, index, &index.to_string())
    }

    /// Same as [`HDKey::derive_child`], recording `label` in the path instead of the index.
    fn derive_labelled_child<H: HashAdapter + ?Sized>(&self, hasher: &H, index: u32, label: &str) -> Result<Self> {
        let depth = self.depth.checked_add(1).ok_or(Error::Depth)?;
        let salt = derive_salt(hasher, &self.chain_code, Some(&encode_u32(index)));

        let mut info = CHILD_DOMAIN.to_vec();
        info.extend_from_slice(index.to_string().as_bytes());

        let (key, chain_code) = split_okm(hasher, &self.chain_code, &salt, &info)?;
        let fingerprint = fingerprint(hasher, &self.key, &key)?;
        let path = self.path.as_ref().map(|path| format!("{path}{PATH_DELIMITER}{label}"));

        Ok(Self { key, chain_code, depth, fingerprint, path })
    }

    /// Fold [`HDKey::derive_child`] over every index of `path`.
    ///
    /// The resulting key path carries the segment text of `path`, so a
    /// hashed label reads `m/alpha` rather than its index.
    pub fn derive_path<H: HashAdapter + ?Sized>(&self, hasher: &H, path: &DerivationPath) -> Result<Self> {
        path.iter().zip(path.labels()).try_fold(self.clone(), |key, (index, label)| key.derive_labelled_child(hasher, index, label))
    }

    pub fn key(&self) -> &KeyBytes {
        &self.key
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Cumulative textual path, `m` for a master key.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_master(&self) -> bool {
        self.depth == 0
    }

    /// Check that `parent_key` is the key this one was derived from.
    pub fn verify_parent<H: HashAdapter + ?Sized>(&self, hasher: &H, parent_key: &[u8]) -> Result<bool> {
        if self.is_master() {
            return Err(Error::NoParent);
        }
        verify_lineage(hasher, &self.fingerprint, parent_key, &self.key)
    }
}

fn split_okm<H: HashAdapter + ?Sized>(hasher: &H, ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<(KeyBytes, ChainCode)> {
    let okm = hkdf(hasher, ikm, Some(salt), info, OKM_SIZE)?;
    let mut key = [0u8; KEY_SIZE];
    let mut chain_code = [0u8; CHAIN_CODE_SIZE];
    key.copy_from_slice(&okm[..KEY_SIZE]);
    chain_code.copy_from_slice(&okm[KEY_SIZE..]);
    Ok((key, chain_code))
}

/// Derive the master key for `secret`.
pub fn derive_master<H: HashAdapter + ?Sized>(hasher: &H, secret: &[u8]) -> Result<HDKey> {
    HDKey::master(hasher, secret)
}

/// Derive the child of `parent` at `index`.
pub fn derive_child<H: HashAdapter + ?Sized>(hasher: &H, parent: &HDKey, index: u32) -> Result<HDKey> {
    parent.derive_child(hasher, index)
}

/// Derive the node reached from `root` along `path`.
pub fn derive_node<H: HashAdapter + ?Sized>(hasher: &H, root: &HDKey, path: &DerivationPath) -> Result<HDKey> {
    root.derive_path(hasher, path)
}

impl ConstantTimeEq for HDKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.key[..].ct_eq(&other.key[..])
            & self.chain_code[..].ct_eq(&other.chain_code[..])
            & self.depth.ct_eq(&other.depth)
            & self.fingerprint[..].ct_eq(&other.fingerprint[..])
    }
}

/// NOTE: uses [`ConstantTimeEq`] internally
impl PartialEq for HDKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other)) && self.path == other.path
    }
}

/// NOTE: uses [`ConstantTimeEq`] internally
impl Eq for HDKey {}

impl Debug for HDKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HDKey")
            .field("key", &"...")
            .field("chain_code", &"...")
            .field("depth", &self.depth)
            .field("fingerprint", &to_hex(&self.fingerprint))
            .field("path", &self.path)
            .finish()
    }
}
