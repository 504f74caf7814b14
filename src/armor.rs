//! Base64 armoring for envelopes
//!
//! The armored form is plain standard Base64 (`A-Z a-z 0-9 + /`, `=` padding)
//! on a single line, which is what `openssl enc -a -A` and CryptoJS produce.
//! There is no version prefix; the `Salted__` marker inside the envelope is
//! the only format signal.

use crate::error::{ErrorCategory, ErrorKind, Result, ScarcryptError};
use base64::{Engine, engine::general_purpose::STANDARD};

/// Most `=` characters accepted at the end of the input by the format check
const MAX_PADDING: usize = 3;

/// Wrap bytes in armor, returning the armored string
pub fn wrap(body: &[u8]) -> String {
    STANDARD.encode(body)
}

/// Unwrap an armored string, returning the original bytes
///
/// The input is not trimmed here.
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    if !is_base64_text(armored) {
        return Err(ScarcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidFormat,
            "invalid base64 format",
        ));
    }

    STANDARD.decode(armored).map_err(|e| {
        ScarcryptError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::InvalidFormat,
            format!("base64 decoding failed: {}", e),
            e,
        )
    })
}

/// One or more alphabet characters followed by at most three `=`.
///
/// This is a cheap shape check only; length and padding correctness are left
/// to the decoder.
pub fn is_base64_text(s: &str) -> bool {
    let body = s.trim_end_matches('=');
    let padding = s.len() - body.len();

    !body.is_empty()
        && padding <= MAX_PADDING
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}
