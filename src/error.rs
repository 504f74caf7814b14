use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Internal errors are never classified for the user: they cover things
    /// like an unavailable random source or failing I/O, and callers should
    /// treat them as unrecoverable.
    Internal,

    /// The user provided invalid input or performed an action that is
    /// unsupported or impossible to complete.
    User,
}

/// Which required inputs were empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissingFields {
    /// The message (plaintext on encrypt, ciphertext on decrypt) was empty.
    pub message: bool,
    /// The passphrase was empty.
    pub passphrase: bool,
}

impl MissingFields {
    pub fn any(&self) -> bool {
        self.message || self.passphrase
    }
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// One or both required inputs were empty. No cryptographic work was attempted.
    MissingInput(MissingFields),
    /// Decrypt input is not well-formed Base64 text.
    InvalidFormat,
    /// The decoded envelope is too short, lacks the salt marker, or is not
    /// aligned to the cipher block size.
    InvalidCiphertext,
    /// Wrong passphrase or corrupted ciphertext. Deliberately never
    /// narrowed down any further.
    DecryptionFailed,
    /// The operating system's secure random source failed.
    RandomUnavailable,
    /// Passphrase could not be obtained from the configured reader.
    PassphraseUnavailable,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct ScarcryptError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl ScarcryptError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: None,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The failure every wrong-passphrase or corrupted-ciphertext path reports.
    pub(crate) fn decryption_failed() -> Self {
        Self::with_kind(
            ErrorCategory::User,
            ErrorKind::DecryptionFailed,
            "decryption failed; invalid passphrase or ciphertext",
        )
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Returns the missing fields if this is a missing-input error.
    pub fn missing_fields(&self) -> Option<MissingFields> {
        match self.kind {
            Some(ErrorKind::MissingInput(fields)) => Some(fields),
            _ => None,
        }
    }

    /// True for failures a caller is expected to render to the user, as
    /// opposed to fatal errors.
    pub fn is_classified(&self) -> bool {
        matches!(
            self.kind,
            Some(
                ErrorKind::MissingInput(_)
                    | ErrorKind::InvalidFormat
                    | ErrorKind::InvalidCiphertext
                    | ErrorKind::DecryptionFailed
            )
        )
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ScarcryptError>;
