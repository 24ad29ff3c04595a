use crate::HashAdapter;
use blake2b_simd::{KEYBYTES as BLAKE2B_KEY_LEN, OUTBYTES as BLAKE2B_OUT_LEN, Params};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

/// Blake2b-512 with the native keyed mode.
///
/// The requested length goes into the Blake2b parameter block, so a 16-byte
/// digest is not a prefix of the 64-byte digest. Keys longer than 64 bytes are
/// reduced with unkeyed Blake2b-512 first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake2b;

impl HashAdapter for Blake2b {
    fn name(&self) -> &'static str {
        "blake2b"
    }

    fn output_len(&self) -> usize {
        BLAKE2B_OUT_LEN
    }

    fn hash(&self, data: &[u8], length: usize) -> Vec<u8> {
        let length = length.min(BLAKE2B_OUT_LEN);
        if length == 0 {
            return Vec::new();
        }
        Params::new().hash_length(length).hash(data).as_bytes().to_vec()
    }

    fn keyed_hash(&self, key: &[u8], data: &[u8], length: usize) -> Vec<u8> {
        let length = length.min(BLAKE2B_OUT_LEN);
        if length == 0 {
            return Vec::new();
        }
        let reduced;
        let key = if key.len() > BLAKE2B_KEY_LEN {
            reduced = Params::new().hash_length(BLAKE2B_OUT_LEN).hash(key);
            reduced.as_bytes()
        } else {
            key
        };
        Params::new().hash_length(length).key(key).hash(data).as_bytes().to_vec()
    }
}

const BLAKE3_OUT_LEN: usize = blake3::OUT_LEN;

/// Blake3 in keyed mode. Keys that are not exactly 32 bytes are reduced with
/// unkeyed Blake3 first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3;

impl HashAdapter for Blake3 {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn output_len(&self) -> usize {
        BLAKE3_OUT_LEN
    }

    fn hash(&self, data: &[u8], length: usize) -> Vec<u8> {
        let mut out = vec![0u8; length.min(BLAKE3_OUT_LEN)];
        blake3::Hasher::new().update(data).finalize_xof().fill(&mut out);
        out
    }

    fn keyed_hash(&self, key: &[u8], data: &[u8], length: usize) -> Vec<u8> {
        let key: [u8; blake3::KEY_LEN] = match key.try_into() {
            Ok(key) => key,
            Err(_) => *blake3::hash(key).as_bytes(),
        };
        let mut out = vec![0u8; length.min(BLAKE3_OUT_LEN)];
        blake3::Hasher::new_keyed(&key).update(data).finalize_xof().fill(&mut out);
        out
    }
}

macro_rules! hmac_adapter {
    ($(#[$meta:meta])* $name:ident, $digest:ty, $label:literal, $len:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl HashAdapter for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn output_len(&self) -> usize {
                $len
            }

            fn hash(&self, data: &[u8], length: usize) -> Vec<u8> {
                let digest = <$digest>::digest(data);
                digest[..length.min($len)].to_vec()
            }

            fn keyed_hash(&self, key: &[u8], data: &[u8], length: usize) -> Vec<u8> {
                let mut mac = <Hmac<$digest> as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
                mac.update(data);
                let tag = mac.finalize().into_bytes();
                tag[..length.min($len)].to_vec()
            }
        }
    };
}

hmac_adapter!(
    /// HMAC-SHA256. `hash` is plain SHA-256, truncated.
    HmacSha256,
    Sha256,
    "hmac-sha256",
    32
);

hmac_adapter!(
    /// HMAC-SHA512. `hash` is plain SHA-512, truncated.
    HmacSha512,
    Sha512,
    "hmac-sha512",
    64
);
