use config::{Config, Environment, File};
use kiosk_domain::config::AppConfig;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `KIOSK__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "KIOSK";

const DEFAULT_CONFIG_FILE: &str = "kiosk";

/// Custom error type for config loading.
#[kiosk_derive::kiosk_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Base File**: an explicit `path` must exist. Without one, an optional `kiosk.{toml,json,yaml}`
///    in the working directory is picked up when present.
/// 2. **Environment Overrides**: variables prefixed with `KIOSK__`, nested with double underscores
///    (`KIOSK__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// * The explicitly requested file is missing or unreadable.
/// * The merged content does not match the structure of `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads the kiosk [`AppConfig`], falling back to defaults for every missing key.
///
/// # Errors
/// See [`load_config`].
pub fn load_app_config(path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    load_config::<AppConfig>(path)
}
