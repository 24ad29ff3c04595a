use crate::{codec::Material, error::Error, hdkey::HDKey, path::DerivationPath, result::Result, schema::PathSchema};
use symhd_hashes::HashAdapter;

/// A hash adapter and a path schema bound together.
///
/// Every path is validated in full against the schema before any
/// derivation step runs, so a failing call never computes a partial node.
pub struct KeyTree<H: HashAdapter> {
    hasher: H,
    schema: PathSchema,
}

impl<H: HashAdapter> KeyTree<H> {
    pub fn new(hasher: H, schema: PathSchema) -> Self {
        Self { hasher, schema }
    }

    /// Build a tree from schema text.
    pub fn with_schema(hasher: H, schema: &str) -> Result<Self> {
        Ok(Self::new(hasher, PathSchema::parse(schema)?))
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn schema(&self) -> &PathSchema {
        &self.schema
    }

    pub fn parse_path(&self, path: &str) -> Result<DerivationPath> {
        DerivationPath::parse(&self.hasher, path, &self.schema)
    }

    pub fn derive_master(&self, secret: impl Into<Material>) -> Result<HDKey> {
        let secret = secret.into();
        HDKey::master(&self.hasher, secret.as_bytes())
    }

    /// Derive the node at `path` below `root`.
    ///
    /// Fails with [`Error::PathTooLong`] when `path` has more segments than
    /// the schema, whichever way it was built.
    pub fn derive_path(&self, root: &HDKey, path: &DerivationPath) -> Result<HDKey> {
        if path.len() > self.schema.len() {
            return Err(Error::PathTooLong { found: path.len(), max: self.schema.len() });
        }
        root.derive_path(&self.hasher, path)
    }

    /// Validate `path`, then derive the master key from `secret` and walk down to the node.
    pub fn derive(&self, secret: impl Into<Material>, path: &str) -> Result<HDKey> {
        let path = self.parse_path(path)?;
        let master = self.derive_master(secret)?;
        self.derive_path(&master, &path)
    }

    /// Check that `parent_key` is the parent of `child`.
    pub fn verify_parent(&self, child: &HDKey, parent_key: &[u8]) -> Result<bool> {
        child.verify_parent(&self.hasher, parent_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::to_hex, error::ErrorKind};
    use symhd_hashes::{Blake2b, HashKind};

    const SCHEMA: &str = "m / application: any / purpose: any / context: any / index: num";

    #[test]
    fn test_derive() {
        let tree = KeyTree::with_schema(Blake2b, SCHEMA).unwrap();
        let node = tree.derive([0u8; 32], "m/42/0/1/0").unwrap();
        assert_eq!(to_hex(node.key()), "5ef79f2ba63f14eaff364877ad62f4163c070786b64255f2fa6a3bf3a71fd186");
        assert_eq!(node.depth(), 4);
        assert_eq!(node.path(), Some("m/42/0/1/0"));

        let master = tree.derive_master([0u8; 32]).unwrap();
        let path = tree.parse_path("m/42/0/1/0").unwrap();
        assert_eq!(tree.derive_path(&master, &path).unwrap(), node);
    }

    #[test]
    fn test_secret_text_is_decoded() {
        let tree = KeyTree::with_schema(Blake2b, SCHEMA).unwrap();
        let hex = "00".repeat(32);
        assert_eq!(tree.derive(hex.as_str(), "m/1").unwrap(), tree.derive([0u8; 32], "m/1").unwrap());
        assert_ne!(tree.derive("not hex at all", "m/1").unwrap(), tree.derive([0u8; 32], "m/1").unwrap());
    }

    #[test]
    fn test_invalid_path_fails_before_derivation() {
        let tree = KeyTree::with_schema(Blake2b, SCHEMA).unwrap();
        let err = tree.derive("secret", "m/a/b/c/d").unwrap_err();
        assert_eq!(err, Error::NotNumeric("d".into()).at_segment(4, "index"));
    }

    #[test]
    fn test_unparsed_path_is_bounded_by_schema() {
        let tree = KeyTree::with_schema(Blake2b, "m / a: num").unwrap();
        let master = tree.derive_master("secret").unwrap();

        let err = tree.derive_path(&master, &DerivationPath::from(vec![1, 2, 3, 4, 5])).unwrap_err();
        assert_eq!(err, Error::PathTooLong { found: 5, max: 1 });
        assert_eq!(err.kind(), ErrorKind::Range);

        let node = tree.derive_path(&master, &DerivationPath::from(vec![1])).unwrap();
        assert_eq!(node, tree.derive("secret", "m/1").unwrap());
        assert_eq!(tree.derive_path(&master, &DerivationPath::default()).unwrap(), master);
    }

    #[test]
    fn test_labels_in_key_path() {
        let tree = KeyTree::with_schema(Blake2b, "m / name: str / index: num").unwrap();
        let node = tree.derive([0u8; 32], "m/alpha/7").unwrap();
        assert_eq!(node.path(), Some("m/alpha/7"));
        assert_eq!(to_hex(node.key()), "dbb6a89f3de9f866592e38444c6d49dbd8a7e6393fc8d51c3e4df782616d3107");
    }

    #[test]
    fn test_boxed_adapter() {
        let tree = KeyTree::with_schema(HashKind::Blake2b.adapter(), SCHEMA).unwrap();
        let direct = KeyTree::with_schema(Blake2b, SCHEMA).unwrap();
        assert_eq!(tree.derive("secret", "m/1/2").unwrap(), direct.derive("secret", "m/1/2").unwrap());
        assert!(tree.verify_parent(&tree.derive("secret", "m/1/2").unwrap(), tree.derive("secret", "m/1").unwrap().key()).unwrap());
    }
}
