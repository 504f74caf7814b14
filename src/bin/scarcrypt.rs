//! Scarcrypt CLI - Passphrase-based text encryption
//!
//! Command-line interface for encrypting and decrypting short messages in the
//! OpenSSL `Salted__` format (AES-256-CBC, EVP_BytesToKey with MD5).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use scarcrypt::ScarcryptError;
use scarcrypt::file_ops::{self, Destination, MessageSource};
use scarcrypt::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};

#[derive(Parser)]
#[command(name = "scarcrypt")]
#[command(version)]
#[command(about = "Passphrase-based text encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a message
    #[command(alias = "e")]
    Encrypt {
        #[command(flatten)]
        source: SourceArgs,

        /// Path to the file to write the ciphertext to (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt a message
    #[command(alias = "d")]
    Decrypt {
        #[command(flatten)]
        source: SourceArgs,

        /// Path to the file to write the plaintext to (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Message text given directly on the command line
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Path to a file holding the message
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
}

impl SourceArgs {
    fn into_source(self) -> MessageSource {
        match (self.message, self.input) {
            (Some(text), _) => MessageSource::Inline(text),
            (None, Some(path)) => MessageSource::File(path),
            // clap enforces exactly one of the two
            (None, None) => MessageSource::Inline(String::new()),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut reader = get_passphrase_reader(cli.passphrase_stdin);
    let result = match cli.command {
        Commands::Encrypt { source, output } => {
            file_ops::encrypt_message(&source.into_source(), &destination(output), &mut *reader)
        }
        Commands::Decrypt { source, output } => {
            file_ops::decrypt_message(&source.into_source(), &destination(output), &mut *reader)
        }
    };

    if let Err(e) = result {
        report(&e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn destination(output: Option<PathBuf>) -> Destination {
    output.map_or(Destination::Stdout, Destination::File)
}

fn report(err: &ScarcryptError) {
    if let Some(missing) = err.missing_fields() {
        if missing.message {
            eprintln!("Error: message is required");
        }
        if missing.passphrase {
            eprintln!("Error: passphrase is required");
        }
        return;
    }

    eprintln!("Error: {}", err);
    let mut source = err.source_error().map(|s| s as &dyn std::error::Error);
    while let Some(cause) = source {
        tracing::debug!("caused by: {}", cause);
        source = cause.source();
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader)
    }
}
