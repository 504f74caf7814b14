//! String-level encrypt and decrypt
//!
//! These are the entry points a front end calls with the two strings it
//! collected from the user. Every classified failure comes back as a
//! `ScarcryptError`; no partial output is ever returned.

use tracing::debug;

use crate::armor;
use crate::error::{ErrorCategory, ErrorKind, MissingFields, Result, ScarcryptError};
use crate::secretcrypt;

/// Check that both inputs are present before any cryptographic work.
///
/// Reports every missing field at once so the caller can flag each of them.
pub fn validate_inputs(message: &str, passphrase: &str) -> Result<()> {
    let missing = MissingFields {
        message: message.is_empty(),
        passphrase: passphrase.is_empty(),
    };
    if !missing.any() {
        return Ok(());
    }

    let msg = match (missing.message, missing.passphrase) {
        (true, true) => "message and passphrase are required",
        (true, false) => "message is required",
        _ => "passphrase is required",
    };
    Err(ScarcryptError::with_kind(
        ErrorCategory::User,
        ErrorKind::MissingInput(missing),
        msg,
    ))
}

/// Encrypt a message, returning the Base64 armored envelope.
///
/// The message is taken as-is; whitespace-only text is valid plaintext.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String> {
    validate_inputs(plaintext, passphrase)?;

    let envelope = secretcrypt::encrypt(passphrase.as_bytes(), plaintext.as_bytes())
        .map_err(|e| e.with_context("encryption failed"))?;
    let armored = armor::wrap(&envelope);

    debug!(armored_len = armored.len(), "encrypted message");
    Ok(armored)
}

/// Decrypt an armored envelope back into the original message.
///
/// Surrounding whitespace on the ciphertext is ignored.
pub fn decrypt(ciphertext: &str, passphrase: &str) -> Result<String> {
    let trimmed = ciphertext.trim();
    validate_inputs(trimmed, passphrase)?;

    let envelope = armor::unwrap(trimmed).inspect_err(|e| {
        debug!(kind = ?e.kind, "rejected ciphertext text");
    })?;
    let plaintext = secretcrypt::decrypt(passphrase.as_bytes(), &envelope)?;

    // An empty result is indistinguishable from a lucky wrong-key padding
    // match, so it is reported the same way as bad UTF-8.
    if plaintext.is_empty() {
        debug!("decrypted to empty plaintext");
        return Err(ScarcryptError::decryption_failed());
    }

    String::from_utf8(plaintext).map_err(|_| {
        debug!("decrypted bytes are not valid UTF-8");
        ScarcryptError::decryption_failed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of<T: std::fmt::Debug>(result: Result<T>) -> ErrorKind {
        result
            .expect_err("expected an error")
            .kind
            .expect("expected a tagged error")
    }

    #[test]
    fn test_roundtrip() {
        let armored = encrypt("attack at dawn", "hunter2").unwrap();
        assert_eq!(decrypt(&armored, "hunter2").unwrap(), "attack at dawn");
    }

    #[test]
    fn test_roundtrip_unicode() {
        let message = "Grüße, 世界! 🔐\n\tend";
        let armored = encrypt(message, "clé secrète").unwrap();
        assert_eq!(decrypt(&armored, "clé secrète").unwrap(), message);
    }

    #[test]
    fn test_roundtrip_whitespace_message() {
        let armored = encrypt("   ", "k").unwrap();
        assert_eq!(decrypt(&armored, "k").unwrap(), "   ");
    }

    #[test]
    fn test_output_is_salted_base64() {
        let armored = encrypt("hello", "k").unwrap();
        // base64("Salted__") starts every envelope.
        assert!(armored.starts_with("U2FsdGVkX1"));
        assert!(armor::is_base64_text(&armored));
    }

    #[test]
    fn test_encryption_is_randomized() {
        let a = encrypt("same message", "same key").unwrap();
        let b = encrypt("same message", "same key").unwrap();

        assert_ne!(a, b);
        assert_eq!(decrypt(&a, "same key").unwrap(), "same message");
        assert_eq!(decrypt(&b, "same key").unwrap(), "same message");
    }

    #[test]
    fn test_decrypt_ignores_surrounding_whitespace() {
        let armored = encrypt("hello", "k").unwrap();
        let padded = format!("  \n{}\r\n ", armored);
        assert_eq!(decrypt(&padded, "k").unwrap(), "hello");
    }

    #[test]
    fn test_encrypt_both_missing() {
        let err = encrypt("", "").expect_err("expected missing input");
        assert_eq!(
            err.missing_fields(),
            Some(MissingFields {
                message: true,
                passphrase: true,
            })
        );
        assert_eq!(err.category, ErrorCategory::User);
    }

    #[test]
    fn test_encrypt_missing_passphrase() {
        let err = encrypt("hello", "").expect_err("expected missing input");
        assert_eq!(
            err.missing_fields(),
            Some(MissingFields {
                message: false,
                passphrase: true,
            })
        );
        assert_eq!(err.message(), "passphrase is required");
    }

    #[test]
    fn test_decrypt_whitespace_only_is_missing() {
        let err = decrypt(" \n\t ", "k").expect_err("expected missing input");
        assert_eq!(
            err.missing_fields(),
            Some(MissingFields {
                message: true,
                passphrase: false,
            })
        );
    }

    #[test]
    fn test_passphrase_is_not_trimmed() {
        let armored = encrypt("hello", " k ").unwrap();
        assert_eq!(kind_of(decrypt(&armored, "k")), ErrorKind::DecryptionFailed);
        assert_eq!(decrypt(&armored, " k ").unwrap(), "hello");
    }

    #[test]
    fn test_wrong_passphrase() {
        // Known vector from openssl; "wrong" fails the padding check.
        let armored = "U2FsdGVkX19CQkJCQkJCQkS2ZGafdmgqV6Mg7og76b0=";
        assert_eq!(decrypt(armored, "test").unwrap(), "test payload");

        let err = decrypt(armored, "wrong").expect_err("expected decryption failure");
        assert_eq!(err.kind, Some(ErrorKind::DecryptionFailed));
        assert_eq!(
            err.message(),
            "decryption failed; invalid passphrase or ciphertext"
        );
    }

    #[test]
    fn test_wrong_passphrase_never_returns_plaintext() {
        for i in 0..32 {
            let armored = encrypt("the real message", "right").unwrap();
            match decrypt(&armored, &format!("wrong-{}", i)) {
                Ok(text) => assert_ne!(text, "the real message"),
                Err(err) => assert_eq!(err.kind, Some(ErrorKind::DecryptionFailed)),
            }
        }
    }

    #[test]
    fn test_not_base64() {
        assert_eq!(
            kind_of(decrypt("not base64 !!", "k")),
            ErrorKind::InvalidFormat
        );
    }

    #[test]
    fn test_truncated_by_one_character() {
        for message in ["a", "exactly16bytes!!", "a somewhat longer message here"] {
            let armored = encrypt(message, "k").unwrap();
            let truncated = &armored[..armored.len() - 1];
            let kind = kind_of(decrypt(truncated, "k"));
            assert!(
                matches!(kind, ErrorKind::InvalidFormat | ErrorKind::DecryptionFailed),
                "unexpected kind {:?} for {:?}",
                kind,
                message
            );
        }
    }

    #[test]
    fn test_valid_base64_without_marker() {
        // base64 of 32 zero bytes
        let armored = armor::wrap(&[0u8; 32]);
        assert_eq!(kind_of(decrypt(&armored, "k")), ErrorKind::InvalidCiphertext);
    }

    #[test]
    fn test_short_envelope() {
        // base64("Salted__")
        assert_eq!(
            kind_of(decrypt("U2FsdGVkX18=", "k")),
            ErrorKind::InvalidCiphertext
        );
    }

    #[test]
    fn test_empty_plaintext_envelope_fails() {
        // openssl enc of an empty input, salt 4242424242424242, passphrase "test"
        let armored = "U2FsdGVkX19CQkJCQkJCQp3FQX40JMs+eIgjmaegcZM=";
        assert_eq!(kind_of(decrypt(armored, "test")), ErrorKind::DecryptionFailed);
    }

    #[test]
    fn test_non_utf8_plaintext_fails() {
        // openssl enc of bytes ff fe fd, salt 4242424242424242, passphrase "test"
        let armored = "U2FsdGVkX19CQkJCQkJCQp2rAYVftLOlO/LUG/jp+Lc=";
        let err = decrypt(armored, "test").expect_err("expected decryption failure");
        assert_eq!(err.kind, Some(ErrorKind::DecryptionFailed));
        assert!(err.source_error().is_none());
    }
}
