//!
//! Text and integer encodings shared by every derivation step.
//!
//! These conversions are part of the derivation contract: changing any of
//! them changes every derived key.
//!

use std::fmt::{self, Debug};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// Decode caller-supplied text into bytes.
///
/// Text of even length consisting only of ASCII hex digits is hex-decoded,
/// anything else is taken as its UTF-8 encoding.
pub fn decode_text(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 == 0 && bytes.iter().all(u8::is_ascii_hexdigit) {
        let mut out = vec![0u8; bytes.len() / 2];
        if faster_hex::hex_decode(bytes, &mut out).is_ok() {
            return out;
        }
    }
    bytes.to_vec()
}

/// Big-endian encoding of a 32-bit index.
#[inline]
pub fn encode_u32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Lower-case hex rendering.
pub fn to_hex(bytes: &[u8]) -> String {
    faster_hex::hex_string(bytes)
}

/// Secret input key material. Wiped from memory on drop.
///
/// Built from text (see [`decode_text`]) or from raw bytes.
#[derive(Clone, Default)]
pub struct Material(Zeroizing<Vec<u8>>);

impl Material {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(decode_text(text))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Material {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Material {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<&String> for Material {
    fn from(text: &String) -> Self {
        Self::from_text(text)
    }
}

impl From<&[u8]> for Material {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Material {
    fn from(bytes: [u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Material {
    fn from(bytes: &[u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Material {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl ConstantTimeEq for Material {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

/// NOTE: uses [`ConstantTimeEq`] internally
impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

/// NOTE: uses [`ConstantTimeEq`] internally
impl Eq for Material {}

impl Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Material").field(&format_args!("{} bytes", self.len())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text("deadbeef"), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_text("DEADBEEF"), vec![0xde, 0xad, 0xbe, 0xef]);
        // odd length stays text
        assert_eq!(decode_text("abc"), b"abc".to_vec());
        assert_eq!(decode_text("123"), b"123".to_vec());
        // even length but not hex
        assert_eq!(decode_text("alpha!"), b"alpha!".to_vec());
        assert_eq!(decode_text("0x00"), b"0x00".to_vec());
        assert_eq!(decode_text("42"), vec![0x42]);
        assert!(decode_text("").is_empty());
        assert_eq!(decode_text("héllo"), "héllo".as_bytes().to_vec());
    }

    #[test]
    fn test_encode_u32() {
        assert_eq!(encode_u32(0), [0, 0, 0, 0]);
        assert_eq!(encode_u32(42), [0, 0, 0, 42]);
        assert_eq!(encode_u32(0x01020304), [1, 2, 3, 4]);
        assert_eq!(encode_u32(u32::MAX), [0xff; 4]);
    }

    #[test]
    fn test_material() {
        let secret = Material::from("00ff");
        assert_eq!(secret.as_bytes(), &[0x00, 0xff]);
        assert_eq!(Material::from([0u8; 32]).len(), 32);
        assert_eq!(Material::from(b"raw".as_slice()).as_bytes(), b"raw");
        assert_eq!(format!("{:?}", Material::from("secret")), "Material(6 bytes)");
        assert_eq!(to_hex(&[0xab, 0x01]), "ab01");
    }

    #[test]
    fn test_material_eq() {
        assert_eq!(Material::from("00ff"), Material::from([0x00u8, 0xff]));
        assert_eq!(Material::default(), Material::from(""));
        assert!(bool::from(Material::from("seed").ct_eq(&Material::from(b"seed"))));

        let secret = Material::from([7u8; 32]);
        for i in 0..32 {
            let mut bytes = [7u8; 32];
            bytes[i] ^= 1;
            assert_ne!(secret, Material::from(bytes));
        }
        assert_ne!(secret, Material::from([7u8; 31]));
    }
}
