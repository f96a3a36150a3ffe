#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod handlers;
pub mod models;

use crate::handlers::{certificates, cipher, keys};
use crate::models::args::{AppCommands, Cli, HashAction};

use anyhow::{Context, Result};
use clap::Parser;
use kiosk::kernel::config::load_app_config;
use kiosk_logger::{LevelFilter, Logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_app_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder().name(env!("CARGO_BIN_NAME")).with_config(&config.logging).stderr(true);
    if cli.verbose {
        logger = logger.level(LevelFilter::DEBUG);
    }
    let _log = logger.init()?;

    if let AppCommands::Unseal { stores: Some(root), .. } | AppCommands::Import { stores: Some(root), .. } =
        &cli.command
    {
        config.certificate_store_root.clone_from(root);
    }
    let kiosk = kiosk::init(&config)?;

    match cli.command {
        AppCommands::Encrypt { input, output, password } => cipher::encrypt(&input, &output, &password)?,
        AppCommands::Decrypt { input, output, password } => {
            cipher::decrypt(&input, &output, password.as_deref())?;
        },
        AppCommands::Seal { input, output, certificate, passphrase, symmetric } => {
            cipher::seal(&input, &output, &certificate, passphrase.as_deref(), symmetric)?;
        },
        AppCommands::Unseal { input, output, symmetric, .. } => cipher::unseal(&kiosk, &input, &output, symmetric)?,
        AppCommands::Import { input, .. } => certificates::import(&kiosk, &input)?,
        AppCommands::Hash { action } => match action {
            HashAction::ConfigKey { key, url } => keys::config_key_hash(&kiosk, &key, &url),
            HashAction::ExamKey { key, salt, url, custom } => {
                keys::exam_key_hash(&kiosk, &key, &salt, &url, custom.as_deref())?;
            },
        },
    }

    Ok(())
}
