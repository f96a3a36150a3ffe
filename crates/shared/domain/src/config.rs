use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

const CLIENT_CONFIGURATION_FILE: &str = "client-settings.kiosk";

/// Application configuration shared by the security core.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    /// Per-user application data folder.
    pub app_data_folder: PathBuf,
    /// Local client configuration written by the client configuration pipeline.
    pub app_data_file_path: PathBuf,
    /// Build version mixed into the browser exam key.
    pub program_build_version: String,
    /// Hash of the code signature of the running executable.
    pub code_signature_hash: String,
    /// Root folder of the directory-backed certificate stores.
    pub certificate_store_root: PathBuf,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging knobs consumed by the logger at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Log file folder; console-only logging when absent.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

// --- Default ---

impl Default for AppConfigInner {
    fn default() -> Self {
        let app_data_folder = PathBuf::from("kiosk");
        Self {
            app_data_file_path: app_data_folder.join(CLIENT_CONFIGURATION_FILE),
            certificate_store_root: app_data_folder.join("certificates"),
            app_data_folder,
            program_build_version: "0.0.0".to_owned(),
            code_signature_hash: String::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LogLevel::Info, directory: None, json: false }
    }
}
