//! Trust stores for the kiosk certificate ciphers.
//!
//! [`CertificateStore`] searches a fixed list of stores (current-user personal, local-machine
//! personal, local-machine trusted people) for a certificate by the SHA-1 hash of its public key,
//! and imports identity certificates embedded in configuration data. Storage is abstracted by
//! [`StoreBackend`]; [`DirectoryBackend`] keeps each store as a folder of certificate files.
//!
//! ```rust,no_run
//! use kiosk_certstore::{CertificateStore, DirectoryBackend};
//!
//! let store = CertificateStore::new(DirectoryBackend::new("/var/lib/kiosk/certificates"));
//! let found = store.lookup(&[0u8; 20]).unwrap();
//! assert!(found.is_none());
//! ```

mod backend;
mod directory;
mod error;
mod store;

pub use backend::{OpenMode, StoreBackend, StoreHandle, StoreId, StoreLocation, StoreName};
pub use directory::{DirectoryBackend, DirectoryHandle};
pub use error::{StoreError, StoreErrorExt};
pub use store::{CertificateStore, IMPORT_TARGETS, LOOKUP_ORDER};

/// Passphrase protecting embedded identity bundles and identities kept in directory stores.
pub const IMPORT_PASSPHRASE: &str = "Di𝈭l𝈖Ch𝈒ah𝉇t𝈁a𝉈Hai1972";
