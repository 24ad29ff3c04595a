//! Domain-separated salts.

use symhd_hashes::HashAdapter;

pub const SALT_SIZE: usize = 16;

/// Fixed tag appended to every salted message.
pub const SALT_DOMAIN: &[u8; 4] = b"SALT";

/// `MAC(key, message || "SALT")[..16]`, where `key` is the 16-byte digest of
/// `context` or 16 zero bytes when no context is given.
pub fn derive_salt<H: HashAdapter + ?Sized>(hasher: &H, message: &[u8], context: Option<&[u8]>) -> [u8; SALT_SIZE] {
    let mut key = [0u8; SALT_SIZE];
    if let Some(context) = context {
        let digest = hasher.hash(context, SALT_SIZE);
        key.iter_mut().zip(digest).for_each(|(dst, src)| *dst = src);
    }

    let mut input = Vec::with_capacity(message.len() + SALT_DOMAIN.len());
    input.extend_from_slice(message);
    input.extend_from_slice(SALT_DOMAIN);

    let tag = hasher.keyed_hash(&key, &input, SALT_SIZE);
    let mut salt = [0u8; SALT_SIZE];
    salt.iter_mut().zip(tag).for_each(|(dst, src)| *dst = src);
    salt
}
