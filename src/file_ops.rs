//! Message encryption/decryption operations for the command line
//!
//! Glues the text operations to where the message comes from (an argument or
//! a file) and where the result goes (stdout or a file).

use crate::error::{ErrorCategory, ErrorKind, Result, ScarcryptError};
use crate::passphrase::PassphraseReader;
use crate::text_ops;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the message to transform comes from
#[derive(Debug, Clone)]
pub enum MessageSource {
    Inline(String),
    File(PathBuf),
}

impl MessageSource {
    fn load(&self) -> Result<String> {
        match self {
            MessageSource::Inline(text) => Ok(text.clone()),
            MessageSource::File(path) => {
                let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
                String::from_utf8(bytes).map_err(|e| {
                    ScarcryptError::with_kind_and_source(
                        ErrorCategory::User,
                        ErrorKind::Io,
                        format!("{} is not valid UTF-8", path.display()),
                        e,
                    )
                })
            }
        }
    }
}

/// Where the result is written
#[derive(Debug, Clone)]
pub enum Destination {
    /// Standard output, followed by a newline
    Stdout,
    /// A file created with mode 0o600 on Unix, written verbatim
    File(PathBuf),
}

/// Encrypt a message with a passphrase and write the armored ciphertext
pub fn encrypt_message(
    source: &MessageSource,
    destination: &Destination,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let plaintext = source.load()?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let armored = text_ops::encrypt(&plaintext, &passphrase)?;
    debug!(?destination, "writing ciphertext");
    write_result(destination, &armored)
}

/// Decrypt an armored message with a passphrase and write the plaintext
pub fn decrypt_message(
    source: &MessageSource,
    destination: &Destination,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let armored = source.load()?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let plaintext = text_ops::decrypt(&armored, &passphrase)?;
    debug!(?destination, "writing plaintext");
    write_result(destination, &plaintext)
}

fn write_result(destination: &Destination, contents: &str) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", contents)
                .and_then(|_| stdout.flush())
                .map_err(|e| {
                    ScarcryptError::with_kind_and_source(
                        ErrorCategory::Internal,
                        ErrorKind::Io,
                        "failed to write to stdout",
                        e,
                    )
                })
        }
        Destination::File(path) => write_file_secure(path, contents.as_bytes())
            .map_err(|e| e.with_context(format!("failed to write to {}", path.display()))),
    }
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                ScarcryptError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            ScarcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            ScarcryptError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> ScarcryptError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    ScarcryptError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
