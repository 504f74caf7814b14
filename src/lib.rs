//! Scarcrypt - passphrase-based text encryption in OpenSSL's `Salted__` format
//!
//! Ciphertexts are Base64 text readable by `openssl enc -d -aes-256-cbc -md md5 -a -A`
//! and by CryptoJS's `AES.decrypt(text, passphrase)`, and vice versa.
//!
//! ```
//! let armored = scarcrypt::encrypt("attack at dawn", "hunter2")?;
//! assert_eq!(scarcrypt::decrypt(&armored, "hunter2")?, "attack at dawn");
//! # Ok::<(), scarcrypt::ScarcryptError>(())
//! ```

#![forbid(unsafe_code)]

pub mod armor;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod passphrase;
pub mod secretcrypt;
pub mod text_ops;

pub use error::{ErrorCategory, ErrorKind, MissingFields, Result, ScarcryptError};
pub use text_ops::{decrypt, encrypt, validate_inputs};
