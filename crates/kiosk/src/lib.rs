//! Facade crate for the kiosk security core.
//! Re-exports the domain, kernel and feature crates and wires the default platform services.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Load an [`AppConfig`] through [`kernel::config::load_app_config`].
//! - Call [`init`] and register the dialect parsers and serializers on the returned repository.

use kiosk_certstore::{CertificateStore, DirectoryBackend};
use kiosk_configuration::{ConfigurationError, ConfigurationRepository, FileResourceLoader, FileResourceSaver};
use kiosk_domain::config::AppConfig;
use kiosk_integrity::KeyGenerator;
use std::sync::Arc;
use tracing::info;

pub use kiosk_certstore as certstore;
pub use kiosk_domain as domain;
pub use kiosk_kernel as kernel;
pub use kiosk_vault as vault;

/// Feature registry for runtime introspection.
pub mod features {
    pub use kiosk_configuration as configuration;
    pub use kiosk_integrity as integrity;

    pub const ENABLED: &[&str] = &["configuration", "integrity"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// The platform certificate store used by [`init`].
pub type PlatformStore = CertificateStore<DirectoryBackend>;

/// Services wired by [`init`].
#[derive(Debug)]
pub struct Kiosk {
    pub repository: ConfigurationRepository,
    pub certificates: Arc<PlatformStore>,
    pub key_generator: Arc<KeyGenerator>,
}

/// Wires the certificate store, key generator and configuration repository from `config`.
///
/// The repository starts with the local file loader and saver registered.
///
/// # Errors
/// Returns an error if the repository cannot be built.
pub fn init(config: &AppConfig) -> Result<Kiosk, ConfigurationError> {
    let certificates = Arc::new(CertificateStore::new(DirectoryBackend::new(&config.certificate_store_root)));
    let key_generator = Arc::new(KeyGenerator::from_config(config));

    let mut repository = ConfigurationRepository::builder()
        .with_config(config)
        .certificate_resolver(certificates.clone())
        .key_generator(key_generator.clone())
        .build()?;
    repository.register_loader(Arc::new(FileResourceLoader));
    repository.register_saver(Arc::new(FileResourceSaver));

    info!(
        stores = %config.certificate_store_root.display(),
        client = %repository.client_configuration_path().display(),
        "Kiosk security core initialized"
    );

    Ok(Kiosk { repository, certificates, key_generator })
}
