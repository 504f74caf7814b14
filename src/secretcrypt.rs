//! Encryption/decryption using EVP_BytesToKey (MD5) + AES-256-CBC
//!
//! This module implements the binary `Salted__` envelope written by
//! `openssl enc -aes-256-cbc -md md5` and by CryptoJS's passphrase mode:
//! - marker: 8 bytes, the ASCII literal `Salted__`
//! - salt: 8 bytes
//! - ciphertext: variable length, a non-zero multiple of 16 bytes (PKCS#7 padded)
//!
//! There is no MAC. A wrong passphrase or tampered ciphertext is only detected
//! probabilistically, through padding (here) and UTF-8 validity (by the caller).

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{debug, trace};

use crate::error::{ErrorCategory, ErrorKind, Result, ScarcryptError};
use crate::kdf::{self, SALT_LEN};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Marker that opens every envelope
pub const SALT_MARKER: &[u8; 8] = b"Salted__";

/// AES block size in bytes
pub const BLOCK_LEN: usize = 16;

/// Length of marker plus salt
pub const HEADER_LEN: usize = SALT_MARKER.len() + SALT_LEN;

/// Encrypt plaintext with a passphrase using a fresh random salt
///
/// Returns the binary envelope: marker(8) + salt(8) + ciphertext(variable)
pub fn encrypt(passphrase: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt).map_err(|e| {
        ScarcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::RandomUnavailable,
            format!("failed to generate salt: {}", e),
            e,
        )
    })?;

    Ok(encrypt_deterministic(passphrase, plaintext, &salt))
}

/// Encrypt plaintext with a passphrase using the provided salt
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates a random salt.
pub fn encrypt_deterministic(
    passphrase: &[u8],
    plaintext: &[u8],
    salt: &[u8; SALT_LEN],
) -> Vec<u8> {
    let derived = kdf::derive_key_material(passphrase, salt);

    let ciphertext = Aes256CbcEnc::new(derived.key().into(), derived.iv().into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    output.extend_from_slice(SALT_MARKER);
    output.extend_from_slice(salt);
    output.extend_from_slice(&ciphertext);

    trace!(
        plaintext_len = plaintext.len(),
        envelope_len = output.len(),
        "sealed envelope"
    );

    output
}

/// Decrypt an envelope with a passphrase
///
/// Structural problems are reported as `InvalidCiphertext`. Anything that
/// goes wrong after key derivation is `DecryptionFailed`.
pub fn decrypt(passphrase: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() < HEADER_LEN {
        debug!(envelope_len = envelope.len(), "envelope shorter than header");
        return Err(ScarcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidCiphertext,
            "input likely truncated while reading salt",
        ));
    }

    let (marker, rest) = envelope.split_at(SALT_MARKER.len());
    if marker != SALT_MARKER {
        debug!("envelope does not start with salt marker");
        return Err(ScarcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidCiphertext,
            "input is missing the Salted__ marker",
        ));
    }

    let (salt, body) = rest.split_at(SALT_LEN);
    if body.is_empty() || body.len() % BLOCK_LEN != 0 {
        debug!(body_len = body.len(), "ciphertext not aligned to block size");
        return Err(ScarcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidCiphertext,
            format!(
                "ciphertext length {} is not a non-zero multiple of {}",
                body.len(),
                BLOCK_LEN
            ),
        ));
    }

    let mut salt_arr = [0u8; SALT_LEN];
    salt_arr.copy_from_slice(salt);
    let derived = kdf::derive_key_material(passphrase, &salt_arr);

    let plaintext = Aes256CbcDec::new(derived.key().into(), derived.iv().into())
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| {
            debug!("padding check failed");
            ScarcryptError::decryption_failed()
        })?;

    Ok(plaintext)
}
