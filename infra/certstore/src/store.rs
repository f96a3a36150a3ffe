use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kiosk_domain::RawData;
use kiosk_domain::certificates::CertificateType;
use kiosk_domain::keys::{CERTIFICATE_DATA, CERTIFICATE_TYPE, EMBEDDED_CERTIFICATES};
use kiosk_vault::{Certificate, CertificateResolver, CryptoError, PublicKeyHash};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::IMPORT_PASSPHRASE;
use crate::backend::{OpenMode, StoreBackend, StoreHandle, StoreId};
use crate::error::{StoreError, StoreErrorExt};

/// Stores searched by [`CertificateStore::lookup`], first match wins.
pub const LOOKUP_ORDER: [StoreId; 3] =
    [StoreId::CURRENT_USER_PERSONAL, StoreId::LOCAL_MACHINE_PERSONAL, StoreId::LOCAL_MACHINE_TRUSTED_PEOPLE];

/// Stores every imported identity is added to.
pub const IMPORT_TARGETS: [StoreId; 2] = [StoreId::CURRENT_USER_PERSONAL, StoreId::LOCAL_MACHINE_TRUSTED_PEOPLE];

/// Certificate lookup and identity import over an ordered set of trust stores.
#[derive(Debug, Clone)]
pub struct CertificateStore<B> {
    backend: B,
}

impl<B: StoreBackend> CertificateStore<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the first certificate, in [`LOOKUP_ORDER`], whose public-key hash equals `hash`.
    ///
    /// Each store is opened read-only and closed before the next one is searched.
    ///
    /// # Errors
    /// Backend failures while opening or enumerating a store.
    pub fn lookup(&self, hash: &PublicKeyHash) -> Result<Option<Certificate>, StoreError> {
        for store in LOOKUP_ORDER {
            let handle = self.backend.open(store, OpenMode::ReadOnly)?;
            let found = handle
                .certificates()?
                .into_iter()
                .find(|certificate| certificate.public_key_hash().is_ok_and(|candidate| candidate == *hash));

            if let Some(certificate) = found {
                debug!(%store, thumbprint = %hex::encode(hash), "Certificate found");
                return Ok(Some(certificate));
            }
        }

        debug!(thumbprint = %hex::encode(hash), "Certificate not found in any store");
        Ok(None)
    }

    /// Adds `certificate` to every store in [`IMPORT_TARGETS`].
    ///
    /// # Errors
    /// The first backend failure; earlier targets keep what was written.
    pub fn import(&self, certificate: &Certificate) -> Result<(), StoreError> {
        for store in IMPORT_TARGETS {
            let mut handle = self.backend.open(store, OpenMode::ReadWrite)?;
            handle.add(certificate).context(format!("Importing into {store}"))?;
        }
        Ok(())
    }

    /// Imports the identity certificates embedded in `raw_data`.
    ///
    /// Every identity entry leaves the embedded list whether or not it imported, so private keys
    /// are never written back; failures are logged and do not stop the batch. The key goes away
    /// once the list is empty. A non-array value is left untouched. Returns how many identities
    /// were imported.
    pub fn import_identities(&self, raw_data: &mut RawData) -> usize {
        let Some(entries) = raw_data.get_mut(EMBEDDED_CERTIFICATES).and_then(Value::as_array_mut) else {
            return 0;
        };

        let mut imported = 0;
        let mut remaining = Vec::with_capacity(entries.len());
        for (index, entry) in std::mem::take(entries).into_iter().enumerate() {
            if !is_identity(&entry) {
                remaining.push(entry);
                continue;
            }

            match self.import_entry(&entry) {
                Ok(thumbprint) => {
                    info!(index, %thumbprint, "Imported embedded identity certificate");
                    imported += 1;
                },
                Err(e) => warn!(index, error = %e, "Failed to import embedded identity certificate, dropping it"),
            }
        }

        if remaining.is_empty() {
            raw_data.remove(EMBEDDED_CERTIFICATES);
        } else {
            *entries = remaining;
        }
        imported
    }

    fn import_entry(&self, entry: &Value) -> Result<String, StoreError> {
        let data = entry.get(CERTIFICATE_DATA).and_then(Value::as_str).ok_or_else(|| {
            StoreError::InvalidEntry { message: format!("missing `{CERTIFICATE_DATA}` text").into(), context: None }
        })?;

        let bytes = STANDARD.decode(data)?;
        let certificate = Certificate::from_pkcs12(&bytes, IMPORT_PASSPHRASE)?;
        let thumbprint = hex::encode(certificate.public_key_hash()?);

        self.import(&certificate)?;
        Ok(thumbprint)
    }
}

fn is_identity(entry: &Value) -> bool {
    entry
        .get(CERTIFICATE_TYPE)
        .and_then(Value::as_u64)
        .and_then(|code| CertificateType::try_from(code).ok())
        == Some(CertificateType::Identity)
}

impl<B: StoreBackend> CertificateResolver for CertificateStore<B> {
    fn lookup_by_hash(&self, hash: &PublicKeyHash) -> Result<Option<Certificate>, CryptoError> {
        self.lookup(hash).map_err(|e| match e {
            StoreError::Crypto { source, .. } => source,
            other => CryptoError::Resolver { source: Box::new(other), context: Some("Certificate store lookup".into()) },
        })
    }

    fn import_identities(&self, raw_data: &mut RawData) -> usize {
        Self::import_identities(self, raw_data)
    }
}
