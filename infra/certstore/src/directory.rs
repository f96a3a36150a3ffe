use kiosk_vault::Certificate;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

use crate::IMPORT_PASSPHRASE;
use crate::backend::{OpenMode, StoreBackend, StoreHandle, StoreId};
use crate::error::{StoreError, StoreErrorExt};

const IDENTITY_EXTENSION: &str = "p12";
const CERTIFICATE_EXTENSIONS: [&str; 2] = ["cer", "der"];

/// Trust stores kept as folders under a root, one file per certificate.
///
/// Identities (certificate plus private key) are PKCS#12 files protected by the import
/// passphrase, public certificates are DER files.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn store_path(&self, store: StoreId) -> PathBuf {
        self.root.join(store.as_path())
    }
}

impl StoreBackend for DirectoryBackend {
    type Handle = DirectoryHandle;

    fn open(&self, store: StoreId, mode: OpenMode) -> Result<DirectoryHandle, StoreError> {
        let path = self.store_path(store);
        if mode == OpenMode::ReadWrite {
            fs::create_dir_all(&path).context(format!("Creating store {store}"))?;
        }

        trace!(%store, ?mode, "Opened certificate store");
        Ok(DirectoryHandle { store, mode, path })
    }
}

#[derive(Debug)]
pub struct DirectoryHandle {
    store: StoreId,
    mode: OpenMode,
    path: PathBuf,
}

impl DirectoryHandle {
    fn read_entries(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context(format!("Reading store {}", self.store)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.context(format!("Reading store {}", self.store))?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

fn load_file(path: &Path) -> Result<Option<Certificate>, StoreError> {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return Ok(None);
    };

    let certificate = if extension.eq_ignore_ascii_case(IDENTITY_EXTENSION) {
        let bytes = fs::read(path)?;
        Certificate::from_pkcs12(&bytes, IMPORT_PASSPHRASE)?
    } else if CERTIFICATE_EXTENSIONS.iter().any(|known| extension.eq_ignore_ascii_case(known)) {
        let bytes = fs::read(path)?;
        Certificate::from_der(&bytes)?
    } else {
        return Ok(None);
    };

    Ok(Some(certificate))
}

impl StoreHandle for DirectoryHandle {
    fn certificates(&self) -> Result<Vec<Certificate>, StoreError> {
        let mut certificates = Vec::new();
        for path in self.read_entries()? {
            match load_file(&path) {
                Ok(Some(certificate)) => certificates.push(certificate),
                Ok(None) => {},
                Err(e) => warn!(store = %self.store, path = %path.display(), error = %e, "Skipping unreadable certificate"),
            }
        }
        Ok(certificates)
    }

    fn add(&mut self, certificate: &Certificate) -> Result<(), StoreError> {
        if self.mode == OpenMode::ReadOnly {
            return Err(StoreError::ReadOnly { message: self.store.to_string().into(), context: None });
        }

        let thumbprint = hex::encode(certificate.public_key_hash()?);
        let (file_name, bytes) = if certificate.has_private_key() {
            (format!("{thumbprint}.{IDENTITY_EXTENSION}"), certificate.to_pkcs12(IMPORT_PASSPHRASE, &thumbprint)?)
        } else {
            (format!("{thumbprint}.{}", CERTIFICATE_EXTENSIONS[0]), certificate.to_der()?)
        };

        fs::write(self.path.join(&file_name), bytes).context(format!("Writing {file_name} to {}", self.store))?;
        trace!(store = %self.store, %thumbprint, "Added certificate");
        Ok(())
    }
}

impl Drop for DirectoryHandle {
    fn drop(&mut self) {
        trace!(store = %self.store, "Closed certificate store");
    }
}
