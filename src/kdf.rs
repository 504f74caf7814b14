//! Passphrase to key/IV derivation
//!
//! Implements OpenSSL's `EVP_BytesToKey` with an MD5 digest and a single
//! iteration, which is what `openssl enc -md md5` and CryptoJS use for the
//! `Salted__` format:
//!
//! ```text
//! D_0 = MD5(passphrase || salt)
//! D_i = MD5(D_{i-1} || passphrase || salt)
//! key || iv = (D_0 || D_1 || D_2)[..48]
//! ```
//!
//! This is a weak KDF. It is kept only because existing ciphertexts depend on
//! it; a stronger one would need a new envelope format.

use md5::{Digest, Md5};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of salt in bytes
pub const SALT_LEN: usize = 8;

/// Length of the AES-256 key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the CBC initialization vector in bytes
pub const IV_LEN: usize = 16;

/// Key and IV for a single encrypt or decrypt call. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeyMaterial {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl DerivedKeyMaterial {
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

/// Derive 48 bytes of key material from a passphrase and salt.
///
/// Deterministic and infallible. An empty passphrase is accepted here;
/// rejecting it is the caller's job.
pub fn derive_key_material(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKeyMaterial {
    let mut material = [0u8; KEY_LEN + IV_LEN];
    let mut filled = 0;
    let mut prev = [0u8; 16];

    while filled < material.len() {
        let mut hasher = Md5::new();
        if filled > 0 {
            hasher.update(prev);
        }
        hasher.update(passphrase);
        hasher.update(salt);
        prev.copy_from_slice(&hasher.finalize());

        let take = prev.len().min(material.len() - filled);
        material[filled..filled + take].copy_from_slice(&prev[..take]);
        filled += take;
    }

    let mut derived = DerivedKeyMaterial {
        key: [0u8; KEY_LEN],
        iv: [0u8; IV_LEN],
    };
    derived.key.copy_from_slice(&material[..KEY_LEN]);
    derived.iv.copy_from_slice(&material[KEY_LEN..]);

    material.zeroize();
    prev.zeroize();

    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_openssl() {
        // openssl enc -aes-256-cbc -md md5 -S 4242424242424242 -pass pass:test -P
        let derived = derive_key_material(b"test", &[0x42u8; SALT_LEN]);

        assert_eq!(
            derived.key().to_vec(),
            hex::decode("2767327394eca021619189e3c6bc901d9da5177732b5dbb76efdf6a978b23063").unwrap()
        );
        assert_eq!(
            derived.iv().to_vec(),
            hex::decode("21ec8327ad0758577a58a132ccd312f9").unwrap()
        );
    }

    #[test]
    fn test_empty_passphrase_still_derives() {
        let derived = derive_key_material(b"", &[0u8; SALT_LEN]);

        assert_eq!(
            derived.key().to_vec(),
            hex::decode("7dea362b3fac8e00956a4952a3d4f474ee0e898aa8e7deb53fe799cf88533135").unwrap()
        );
        assert_eq!(
            derived.iv().to_vec(),
            hex::decode("01ec4d4c34ae7218691993110fb1dd48").unwrap()
        );
    }

    #[test]
    fn test_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key_material(b"passphrase", &salt);
        let b = derive_key_material(b"passphrase", &salt);

        assert_eq!(a.key(), b.key());
        assert_eq!(a.iv(), b.iv());
    }

    #[test]
    fn test_salt_changes_output() {
        let a = derive_key_material(b"passphrase", &[1u8; SALT_LEN]);
        let b = derive_key_material(b"passphrase", &[2u8; SALT_LEN]);

        assert_ne!(a.key(), b.key());
        assert_ne!(a.iv(), b.iv());
    }

    #[test]
    fn test_first_block_is_plain_digest() {
        let salt = [0x11u8; SALT_LEN];
        let derived = derive_key_material(b"abc", &salt);

        let mut hasher = Md5::new();
        hasher.update(b"abc");
        hasher.update(salt);
        let expected = hasher.finalize();

        assert_eq!(&derived.key()[..16], expected.as_slice());
    }
}
