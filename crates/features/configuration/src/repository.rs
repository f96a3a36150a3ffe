use kiosk_domain::config::AppConfig;
use kiosk_domain::keys::KEEP_CLIENT_CONFIG_ENCRYPTION;
use kiosk_domain::{
    ConfigureStatus, EncryptionParameters, LoadStatus, ParseResult, PasswordParameters, RawData, SaveStatus,
};
use kiosk_integrity::KeyGenerator;
use kiosk_vault::CertificateResolver;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::ConfigurationError;
use crate::plugins::{DataParser, DataSerializer, ResourceLoader, ResourceSaver};
use crate::settings::Settings;

/// Orchestrates loading, parsing, re-encrypting and saving configuration data.
///
/// Plugins are tried in registration order and the first capable one is used. Each public
/// operation is the single place where stage errors become statuses; nothing below it logs
/// unexpected failures.
#[derive(Debug)]
pub struct ConfigurationRepository {
    loaders: Vec<Arc<dyn ResourceLoader>>,
    parsers: Vec<Arc<dyn DataParser>>,
    serializers: Vec<Arc<dyn DataSerializer>>,
    savers: Vec<Arc<dyn ResourceSaver>>,
    certificates: Arc<dyn CertificateResolver>,
    key_generator: Arc<KeyGenerator>,
    client_configuration_path: PathBuf,
}

/// Builder for [`ConfigurationRepository`]; a certificate resolver is required.
#[derive(Debug, Default)]
pub struct ConfigurationRepositoryBuilder {
    certificates: Option<Arc<dyn CertificateResolver>>,
    key_generator: Option<Arc<KeyGenerator>>,
    client_configuration_path: Option<PathBuf>,
}

impl ConfigurationRepositoryBuilder {
    /// Takes the client configuration path and, unless set explicitly, the key generator inputs.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.client_configuration_path = Some(config.app_data_file_path.clone());
        if self.key_generator.is_none() {
            self.key_generator = Some(Arc::new(KeyGenerator::from_config(config)));
        }
        self
    }

    #[must_use]
    pub fn certificate_resolver(mut self, resolver: Arc<dyn CertificateResolver>) -> Self {
        self.certificates = Some(resolver);
        self
    }

    #[must_use]
    pub fn key_generator(mut self, generator: Arc<KeyGenerator>) -> Self {
        self.key_generator = Some(generator);
        self
    }

    /// Destination of [`ConfigurationRepository::configure_client_with`].
    #[must_use]
    pub fn client_configuration_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_configuration_path = Some(path.into());
        self
    }

    /// # Errors
    /// [`ConfigurationError::Internal`] when no certificate resolver was supplied.
    pub fn build(self) -> Result<ConfigurationRepository, ConfigurationError> {
        let certificates = self.certificates.ok_or("A certificate resolver is required")?;
        let defaults = AppConfig::default();

        Ok(ConfigurationRepository {
            loaders: Vec::new(),
            parsers: Vec::new(),
            serializers: Vec::new(),
            savers: Vec::new(),
            certificates,
            key_generator: self.key_generator.unwrap_or_else(|| Arc::new(KeyGenerator::from_config(&defaults))),
            client_configuration_path: self
                .client_configuration_path
                .unwrap_or_else(|| defaults.app_data_file_path.clone()),
        })
    }
}

impl ConfigurationRepository {
    #[must_use]
    pub fn builder() -> ConfigurationRepositoryBuilder {
        ConfigurationRepositoryBuilder::default()
    }

    pub fn register_loader(&mut self, loader: Arc<dyn ResourceLoader>) {
        debug!(?loader, "Registered resource loader");
        self.loaders.push(loader);
    }

    pub fn register_parser(&mut self, parser: Arc<dyn DataParser>) {
        debug!(?parser, "Registered data parser");
        self.parsers.push(parser);
    }

    pub fn register_serializer(&mut self, serializer: Arc<dyn DataSerializer>) {
        debug!(?serializer, "Registered data serializer");
        self.serializers.push(serializer);
    }

    pub fn register_saver(&mut self, saver: Arc<dyn ResourceSaver>) {
        debug!(?saver, "Registered resource saver");
        self.savers.push(saver);
    }

    #[must_use]
    pub fn key_generator(&self) -> &Arc<KeyGenerator> {
        &self.key_generator
    }

    #[must_use]
    pub const fn client_configuration_path(&self) -> &PathBuf {
        &self.client_configuration_path
    }

    /// Loads and parses the resource at `uri` into [`Settings`].
    ///
    /// A custom browser exam key found in the settings is handed to the key generator.
    ///
    /// # Errors
    /// The status of the first failing stage; never [`LoadStatus::Success`].
    pub fn load_settings(&self, uri: &str, password: Option<&PasswordParameters>) -> Result<Settings, LoadStatus> {
        let result = self.load_and_parse(uri, password).map(|parsed| {
            let settings = Settings::new(parsed.format, parsed.encryption, parsed.raw_data);
            self.post_process(&settings);
            settings
        });

        match result {
            Ok(settings) => {
                info!(uri, format = ?settings.format(), "Loaded settings");
                Ok(settings)
            },
            Err(e) => Err(report("load_settings", uri, &e)),
        }
    }

    /// Loads the resource at `uri`, imports its identity certificates and stores it as the local
    /// client configuration, re-encrypted as [`determine_encryption`] decides.
    #[must_use]
    pub fn configure_client_with(&self, uri: &str, password: Option<&PasswordParameters>) -> ConfigureStatus {
        let parsed = match self.load_and_parse(uri, password) {
            Ok(parsed) => parsed,
            Err(e) => return ConfigureStatus::Load(report("configure_client_with", uri, &e)),
        };

        match self.store_client_configuration(parsed) {
            Ok(()) => {
                info!(uri, destination = %self.client_configuration_path.display(), "Client configured");
                ConfigureStatus::Save(SaveStatus::Success)
            },
            Err(e) => ConfigureStatus::Save(SaveStatus::from(report("configure_client_with", uri, &e))),
        }
    }

    fn load_and_parse(&self, uri: &str, password: Option<&PasswordParameters>) -> Result<ParseResult, ConfigurationError> {
        let Some(loader) = self.loaders.iter().find(|loader| loader.can_load(uri)) else {
            return Err(ConfigurationError::not_supported(format!("No resource loader for {uri}")));
        };
        debug!(?loader, uri, "Selected resource loader");
        let data = loader.load(uri)?;

        let Some(parser) = self.parsers.iter().find(|parser| parser.can_parse(&data)) else {
            return Err(ConfigurationError::not_supported("No parser recognizes the data"));
        };
        debug!(?parser, bytes = data.len(), "Selected data parser");
        parser.parse(&data, password)
    }

    fn store_client_configuration(&self, parsed: ParseResult) -> Result<(), ConfigurationError> {
        let ParseResult { format, mut raw_data, encryption } = parsed;

        let imported = self.certificates.import_identities(&mut raw_data);
        debug!(imported, "Imported embedded identities");

        let encryption = determine_encryption(&raw_data, encryption);

        let Some(serializer) = self.serializers.iter().find(|serializer| serializer.can_serialize(format)) else {
            return Err(ConfigurationError::not_supported(format!("No serializer for {format:?}")));
        };
        debug!(?serializer, ?format, encrypted = encryption.is_some(), "Selected data serializer");
        let serialized = serializer.serialize(&raw_data, encryption.as_ref())?;

        let destination = self.client_configuration_path.to_string_lossy();
        let Some(saver) = self.savers.iter().find(|saver| saver.can_save(&destination)) else {
            return Err(ConfigurationError::not_supported(format!("No resource saver for {destination}")));
        };
        debug!(?saver, %destination, "Selected resource saver");
        saver.save(&destination, &serialized.data)
    }

    fn post_process(&self, settings: &Settings) {
        if let Some(key) = settings.custom_browser_exam_key() {
            self.key_generator.use_custom_browser_exam_key(key);
        }
    }
}

/// Encryption to persist a client configuration with.
///
/// Unless the data sets the keep-encryption flag to `true`, the result is a password hash
/// container with an empty password; otherwise the detected encryption is kept as-is.
#[must_use]
pub fn determine_encryption(
    raw_data: &RawData,
    detected: Option<EncryptionParameters>,
) -> Option<EncryptionParameters> {
    let keep = raw_data.get(KEEP_CLIENT_CONFIG_ENCRYPTION).and_then(Value::as_bool).unwrap_or(false);
    if keep {
        detected
    } else {
        Some(EncryptionParameters::Password(PasswordParameters::empty_hash()))
    }
}

/// Maps a stage error to its status, logging unexpected faults with their full context.
fn report(operation: &'static str, uri: &str, error: &ConfigurationError) -> LoadStatus {
    let status = error.status();
    match status {
        LoadStatus::UnexpectedError => error!(operation, uri, error = %error, "Unexpected configuration failure"),
        LoadStatus::NotSupported => warn!(operation, uri, reason = %error, "Configuration not supported"),
        _ => info!(operation, uri, %status, reason = %error, "Configuration rejected"),
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_domain::PublicKeyParameters;
    use serde_json::json;

    fn raw(value: Value) -> RawData {
        serde_json::from_value(value).unwrap()
    }

    fn public_key() -> EncryptionParameters {
        EncryptionParameters::PublicKey(PublicKeyParameters {
            certificate: vec![1, 2, 3],
            inner_encryption: None,
            symmetric_encryption: true,
        })
    }

    #[test]
    fn missing_flag_resets_to_empty_password_hash() {
        let baseline = Some(EncryptionParameters::Password(PasswordParameters::empty_hash()));

        assert_eq!(determine_encryption(&raw(json!({})), Some(public_key())), baseline);
        assert_eq!(determine_encryption(&raw(json!({})), None), baseline);
        assert_eq!(
            determine_encryption(&raw(json!({ "clientConfigKeepEncryption": false })), Some(public_key())),
            baseline
        );
        assert_eq!(
            determine_encryption(&raw(json!({ "clientConfigKeepEncryption": "yes" })), Some(public_key())),
            baseline
        );
    }

    #[test]
    fn keep_flag_preserves_detected_encryption() {
        let data = raw(json!({ "clientConfigKeepEncryption": true }));

        assert_eq!(determine_encryption(&data, Some(public_key())), Some(public_key()));
        assert_eq!(determine_encryption(&data, None), None);
    }
}
