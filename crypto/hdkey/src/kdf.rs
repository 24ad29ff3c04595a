//!
//! Extract-then-expand key derivation (HKDF, RFC 5869) generalized over any
//! keyed-MAC-capable [`HashAdapter`].
//!
//! With [`HmacSha256`](symhd_hashes::HmacSha256) the output is byte-identical
//! to standard HKDF-SHA256.
//!

use crate::{error::Error, result::Result};
use symhd_hashes::HashAdapter;
use zeroize::Zeroizing;

/// The block counter is a single byte.
const MAX_BLOCKS: usize = u8::MAX as usize;

/// HKDF engine bound to a hash adapter.
pub struct Hkdf<'a, H: HashAdapter + ?Sized> {
    hasher: &'a H,
}

impl<'a, H: HashAdapter + ?Sized> Hkdf<'a, H> {
    pub fn new(hasher: &'a H) -> Self {
        Self { hasher }
    }

    /// Largest `length` accepted by [`Hkdf::expand`].
    pub fn max_output_len(&self) -> usize {
        MAX_BLOCKS * self.hasher.output_len()
    }

    /// `prk = MAC(salt, ikm)`. A missing salt is replaced by `output_len` zero bytes.
    pub fn extract(&self, salt: Option<&[u8]>, ikm: &[u8]) -> Zeroizing<Vec<u8>> {
        let block = self.hasher.output_len();
        let prk = match salt {
            Some(salt) => self.hasher.keyed_hash(salt, ikm, block),
            None => self.hasher.keyed_hash(&vec![0u8; block], ikm, block),
        };
        Zeroizing::new(prk)
    }

    /// Expand `prk` into exactly `length` bytes bound to `info`.
    pub fn expand(&self, prk: &[u8], info: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
        let block = self.hasher.output_len();
        if block == 0 || length > self.max_output_len() {
            return Err(Error::OutputLength { requested: length, max: self.max_output_len(), adapter: self.hasher.name() });
        }

        let mut okm = Zeroizing::new(Vec::with_capacity(length + block));
        let mut t = Zeroizing::new(Vec::<u8>::new());
        let mut message = Zeroizing::new(Vec::<u8>::with_capacity(block + info.len() + 1));
        let mut counter = 1u8;
        while okm.len() < length {
            message.clear();
            message.extend_from_slice(&t);
            message.extend_from_slice(info);
            message.push(counter);
            t = Zeroizing::new(self.hasher.keyed_hash(prk, &message, block));
            if t.len() < block {
                return Err(Error::OutputLength { requested: block, max: t.len(), adapter: self.hasher.name() });
            }
            t.truncate(block);
            okm.extend_from_slice(&t);
            counter = counter.wrapping_add(1);
        }
        okm.truncate(length);
        Ok(okm)
    }

    /// Extract then expand: `length` bytes of output key material.
    pub fn derive(&self, ikm: &[u8], salt: Option<&[u8]>, info: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
        let prk = self.extract(salt, ikm);
        self.expand(&prk, info, length)
    }
}

/// Shorthand for `Hkdf::new(hasher).derive(..)`.
pub fn hkdf<H: HashAdapter + ?Sized>(hasher: &H, ikm: &[u8], salt: Option<&[u8]>, info: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
    Hkdf::new(hasher).derive(ikm, salt, info, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::to_hex, mock_adapter::MockAdapter};
    use symhd_hashes::{Blake2b, HmacSha256};

    fn unhex(s: &str) -> Vec<u8> {
        let mut out = vec![0u8; s.len() / 2];
        faster_hex::hex_decode(s.as_bytes(), &mut out).unwrap();
        out
    }

    #[test]
    fn test_rfc5869_sha256() {
        // RFC 5869, test case 1
        let ikm = [0x0bu8; 22];
        let salt = unhex("000102030405060708090a0b0c");
        let info = unhex("f0f1f2f3f4f5f6f7f8f9");
        let okm = hkdf(&HmacSha256, &ikm, Some(&salt), &info, 42).unwrap();
        assert_eq!(to_hex(&okm), "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865");

        // RFC 5869, test case 3 (no salt, no info)
        let okm = hkdf(&HmacSha256, &ikm, None, &[], 42).unwrap();
        assert_eq!(to_hex(&okm), "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d9d201395faa4b61a96c8");
    }

    #[test]
    fn test_blake2b_vectors() {
        let okm = hkdf(&Blake2b, b"ikm", Some(b"salt"), b"info", 80).unwrap();
        assert_eq!(
            to_hex(&okm),
            "5034f782fbd1118077e82d724a2b8f1af8fb1d595f76f30c239a95f8683fc80234c565634d1a23635a7cebedc1360e1783a286223494e9772ca01615113a37d39b12f75d513150d97df77510e7572ed4"
        );
        let okm = hkdf(&Blake2b, b"ikm", None, b"", 42).unwrap();
        assert_eq!(to_hex(&okm), "bb5c36fa5e0f9f3293e603f867e6db4522d37c5b135483abae29540f54d9e544f961f5bcc36a466f79f2");
    }

    #[test]
    fn test_prefix_property() {
        // shorter outputs are prefixes of longer ones for the same inputs
        let long = hkdf(&Blake2b, b"ikm", Some(b"salt"), b"info", 200).unwrap();
        let short = hkdf(&Blake2b, b"ikm", Some(b"salt"), b"info", 33).unwrap();
        assert_eq!(&long[..33], &short[..]);
        assert!(hkdf(&Blake2b, b"ikm", None, b"", 0).unwrap().is_empty());
    }

    #[test]
    fn test_output_limit() {
        let engine = Hkdf::new(&HmacSha256);
        assert_eq!(engine.max_output_len(), 255 * 32);
        assert_eq!(engine.derive(b"ikm", None, b"", 255 * 32).unwrap().len(), 255 * 32);
        let err = engine.derive(b"ikm", None, b"", 255 * 32 + 1).unwrap_err();
        assert_eq!(err, Error::OutputLength { requested: 8161, max: 8160, adapter: "hmac-sha256" });
    }

    #[test]
    fn test_adapter_output_size_is_checked() {
        let err = hkdf(&MockAdapter::new(0), b"ikm", None, b"info", 64).unwrap_err();
        assert_eq!(err, Error::OutputLength { requested: 32, max: 0, adapter: "mock" });
        let err = hkdf(&MockAdapter::new(31), b"ikm", None, b"info", 64).unwrap_err();
        assert_eq!(err, Error::OutputLength { requested: 32, max: 31, adapter: "mock" });

        // extra bytes are dropped, so every block stays 32 bytes
        let okm = hkdf(&MockAdapter::new(48), b"ikm", Some(b"salt"), b"info", 80).unwrap();
        assert_eq!(okm.len(), 80);
        assert_eq!(&okm[..], &hkdf(&MockAdapter::new(48), b"ikm", Some(b"salt"), b"info", 200).unwrap()[..80]);
    }
}
