//! # CLI Argument Definitions
//!
//! Subcommands, arguments and flags of `kioskctl`, declared with `clap`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "kioskctl")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Operator toolkit for kiosk configuration containers and integrity keys")]
pub struct Cli {
    /// Application config file (TOML, YAML or JSON); `./kiosk.*` is used when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Wrap a file in a password container
    Encrypt {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        password: String,
    },
    /// Open a password container
    Decrypt {
        input: PathBuf,
        output: PathBuf,
        /// Omit to probe whether the container needs a password
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Encrypt a file for a certificate
    Seal {
        input: PathBuf,
        output: PathBuf,
        /// Certificate file: DER or PEM, or PKCS#12 when `--passphrase` is given
        #[arg(long)]
        certificate: PathBuf,
        #[arg(long)]
        passphrase: Option<String>,
        /// Wrap a random symmetric key instead of RSA-encrypting the whole payload
        #[arg(short, long)]
        symmetric: bool,
    },
    /// Decrypt a certificate container with an identity from the certificate stores
    Unseal {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        symmetric: bool,
        /// Certificate store root, overriding the configured one
        #[arg(long)]
        stores: Option<PathBuf>,
    },
    /// Import the identities embedded in a JSON settings file and rewrite it without them
    Import {
        input: PathBuf,
        #[arg(long)]
        stores: Option<PathBuf>,
    },
    /// Compute per-URL integrity hashes
    Hash {
        #[command(subcommand)]
        action: HashAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum HashAction {
    /// hex(SHA-256(url + configuration key))
    ConfigKey {
        #[arg(short, long)]
        key: String,
        #[arg(short, long)]
        url: String,
    },
    /// hex(SHA-256(url + browser exam key))
    ExamKey {
        #[arg(short, long)]
        key: String,
        /// Hex-encoded browser exam key salt
        #[arg(short, long)]
        salt: String,
        #[arg(short, long)]
        url: String,
        /// Administrator supplied browser exam key
        #[arg(long)]
        custom: Option<String>,
    },
}
