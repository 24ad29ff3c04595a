//!
//! Hash adapters used by the symmetric HD key derivation engine.
//!
//! The engine never picks a hash primitive on its own. Every derivation call
//! receives a [`HashAdapter`] explicitly, so independent adapters can coexist
//! in one process.
//!

mod hashers;
mod kind;

pub use hashers::{Blake2b, Blake3, HmacSha256, HmacSha512};
pub use kind::{HashKind, HashKindError};

/// Smallest natural output size an adapter may declare.
pub const MIN_OUTPUT_LEN: usize = 16;

/// One-shot digest and keyed MAC over byte input.
///
/// Implementations must be stateless (or build a fresh hashing context per
/// call) so that independent derivations may run on different threads.
pub trait HashAdapter: Send + Sync {
    /// Short identifier, e.g. `blake2b`.
    fn name(&self) -> &'static str;

    /// Natural output size of [`HashAdapter::keyed_hash`] in bytes.
    /// Never smaller than [`MIN_OUTPUT_LEN`].
    fn output_len(&self) -> usize;

    /// Digest of `data`, `min(length, output_len)` bytes long.
    fn hash(&self, data: &[u8], length: usize) -> Vec<u8>;

    /// Keyed MAC of `data` under `key`, `min(length, output_len)` bytes long.
    fn keyed_hash(&self, key: &[u8], data: &[u8], length: usize) -> Vec<u8>;
}

impl<H: HashAdapter + ?Sized> HashAdapter for &H {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn hash(&self, data: &[u8], length: usize) -> Vec<u8> {
        (**self).hash(data, length)
    }

    fn keyed_hash(&self, key: &[u8], data: &[u8], length: usize) -> Vec<u8> {
        (**self).keyed_hash(key, data, length)
    }
}

impl<H: HashAdapter + ?Sized> HashAdapter for Box<H> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn hash(&self, data: &[u8], length: usize) -> Vec<u8> {
        (**self).hash(data, length)
    }

    fn keyed_hash(&self, key: &[u8], data: &[u8], length: usize) -> Vec<u8> {
        (**self).keyed_hash(key, data, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_adapter<H: HashAdapter>(adapter: H) {
        assert!(adapter.output_len() >= MIN_OUTPUT_LEN, "{} output too short", adapter.name());
        assert_eq!(adapter.hash(b"abc", 16).len(), 16);
        assert_eq!(adapter.hash(b"abc", 4096).len(), adapter.output_len());
        assert_eq!(adapter.keyed_hash(b"key", b"abc", 16).len(), 16);
        assert_eq!(adapter.keyed_hash(b"key", b"abc", usize::MAX).len(), adapter.output_len());
        assert_eq!(adapter.keyed_hash(b"key", b"abc", 32), adapter.keyed_hash(b"key", b"abc", 32));
        assert_ne!(adapter.keyed_hash(b"key", b"abc", 32), adapter.keyed_hash(b"kez", b"abc", 32));
    }

    #[test]
    fn test_adapter_contract() {
        assert_adapter(Blake2b);
        assert_adapter(Blake3);
        assert_adapter(HmacSha256);
        assert_adapter(HmacSha512);
    }

    #[test]
    fn test_indirection() {
        let boxed: Box<dyn HashAdapter> = Box::new(Blake2b);
        assert_eq!(boxed.name(), "blake2b");
        assert_eq!(boxed.keyed_hash(b"k", b"m", 32), Blake2b.keyed_hash(b"k", b"m", 32));
        let by_ref = &HmacSha256;
        assert_eq!(by_ref.hash(b"m", 32), HmacSha256.hash(b"m", 32));
    }
}
