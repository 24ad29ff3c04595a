//!
//! Parent/child fingerprints and lineage verification.
//!
//! `fingerprint(parent, child)` is keyed by a value expanded from the parent
//! key under the `FINGERPRINT` tag, then MACs the child key:
//!
//! ```text
//! fk = HKDF(ikm = parent, salt = salt(parent), info = "FINGERPRINT", 32)
//! fp = MAC(fk, child)[..16]
//! ```
//!
//! It depends on the two keys only, never on chain codes.
//!

use crate::{error::Error, kdf::hkdf, result::Result, salt::derive_salt};
use subtle::ConstantTimeEq;
use symhd_hashes::HashAdapter;

pub const FINGERPRINT_SIZE: usize = 16;

pub const FINGERPRINT_DOMAIN: &[u8] = b"FINGERPRINT";

const FINGERPRINT_KEY_SIZE: usize = 32;

pub type Fingerprint = [u8; FINGERPRINT_SIZE];

pub fn fingerprint<H: HashAdapter + ?Sized>(hasher: &H, parent_key: &[u8], child_key: &[u8]) -> Result<Fingerprint> {
    let salt = derive_salt(hasher, parent_key, None);
    let fk = hkdf(hasher, parent_key, Some(&salt), FINGERPRINT_DOMAIN, FINGERPRINT_KEY_SIZE)?;
    let tag = hasher.keyed_hash(&fk, child_key, FINGERPRINT_SIZE);
    let mut fp = [0u8; FINGERPRINT_SIZE];
    fp.iter_mut().zip(tag).for_each(|(dst, src)| *dst = src);
    Ok(fp)
}

/// Check that `stored` is the fingerprint of `child_key` under `parent_key`.
///
/// `stored` must be exactly 16 bytes; anything else is a malformed key and
/// fails with [`Error::FingerprintLength`] instead of returning `false`.
pub fn verify_lineage<H: HashAdapter + ?Sized>(hasher: &H, stored: &[u8], parent_key: &[u8], child_key: &[u8]) -> Result<bool> {
    if stored.len() != FINGERPRINT_SIZE {
        return Err(Error::FingerprintLength { expected: FINGERPRINT_SIZE, found: stored.len() });
    }
    let expected = fingerprint(hasher, parent_key, child_key)?;
    Ok(ct_eq_fingerprint(stored, &expected))
}

/// XOR-accumulates every byte pair, with no early exit.
fn ct_eq_fingerprint(a: &[u8], b: &Fingerprint) -> bool {
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff.ct_eq(&0u8).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::to_hex, mock_adapter::MockAdapter};
    use symhd_hashes::{Blake2b, HmacSha256};

    #[test]
    fn test_fingerprint_is_keyed_by_parent() {
        let fp = fingerprint(&Blake2b, &[1u8; 32], &[2u8; 32]).unwrap();
        assert_eq!(fp, fingerprint(&Blake2b, &[1u8; 32], &[2u8; 32]).unwrap());
        assert_ne!(fp, fingerprint(&Blake2b, &[3u8; 32], &[2u8; 32]).unwrap());
        assert_ne!(fp, fingerprint(&Blake2b, &[1u8; 32], &[3u8; 32]).unwrap());
        assert_ne!(fp, fingerprint(&HmacSha256, &[1u8; 32], &[2u8; 32]).unwrap());
    }

    #[test]
    fn test_verify_lineage() {
        let fp = fingerprint(&HmacSha256, b"parent", b"child").unwrap();
        assert!(verify_lineage(&HmacSha256, &fp, b"parent", b"child").unwrap());
        assert!(!verify_lineage(&HmacSha256, &fp, b"impostor", b"child").unwrap());
        assert!(!verify_lineage(&HmacSha256, &fp, b"parent", b"other").unwrap());

        for i in 0..FINGERPRINT_SIZE {
            let mut tampered = fp;
            tampered[i] ^= 0x80;
            assert!(!verify_lineage(&HmacSha256, &tampered, b"parent", b"child").unwrap());
        }
    }

    #[test]
    fn test_fingerprint_size_is_enforced() {
        let fp = fingerprint(&Blake2b, b"parent", b"child").unwrap();
        assert_eq!(verify_lineage(&Blake2b, &fp[..15], b"parent", b"child"), Err(Error::FingerprintLength { expected: 16, found: 15 }));
        let mut long = fp.to_vec();
        long.push(0);
        assert_eq!(verify_lineage(&Blake2b, &long, b"parent", b"child"), Err(Error::FingerprintLength { expected: 16, found: 17 }));
    }

    #[test]
    fn test_oversized_tags_are_cut() {
        let fp = fingerprint(&MockAdapter::new(48), b"parent", b"child").unwrap();
        assert_eq!(fp, fingerprint(&MockAdapter::new(48), b"parent", b"child").unwrap());
        assert!(verify_lineage(&MockAdapter::new(48), &fp, b"parent", b"child").unwrap());
        assert!(!verify_lineage(&MockAdapter::new(48), &fp, b"impostor", b"child").unwrap());

        let err = fingerprint(&MockAdapter::new(8), b"parent", b"child").unwrap_err();
        assert_eq!(err, Error::OutputLength { requested: 32, max: 8, adapter: "mock" });
    }

    #[test]
    fn test_master_fingerprint_vector() {
        let fp = fingerprint(&Blake2b, &[0u8; 32], &{
            let mut key = [0u8; 32];
            faster_hex::hex_decode(b"7d3f322581f075e7828f9009ad9247275f520fb2590c0930d9b89cf0770e3a3c", &mut key).unwrap();
            key
        })
        .unwrap();
        assert_eq!(to_hex(&fp), "19e7f621d82bbe24ccb68dcc3f736926");
    }
}
