use kiosk_domain::RawData;
use std::fmt::Debug;

use crate::certificate::{Certificate, PublicKeyHash, RsaCipher};
use crate::error::CryptoError;
use crate::hybrid::HybridCipher;

/// Source of decryption certificates, usually backed by the trust stores.
pub trait CertificateResolver: Send + Sync + Debug {
    /// Finds the certificate whose public-key hash equals `hash`.
    ///
    /// # Errors
    /// Implementation-specific failures; a plain miss is `Ok(None)`.
    fn lookup_by_hash(&self, hash: &PublicKeyHash) -> Result<Option<Certificate>, CryptoError>;

    /// Imports the identity certificates embedded in `raw_data` and removes the imported
    /// entries from it. Returns how many were imported.
    fn import_identities(&self, raw_data: &mut RawData) -> usize;
}

/// Encryption keyed by a certificate's public key, decryption through a [`CertificateResolver`].
pub trait CertificateCipher: Send + Sync + Debug {
    /// # Errors
    /// [`CryptoError`] when the certificate lacks an RSA key or a primitive fails.
    fn encrypt(&self, data: &[u8], certificate: &Certificate) -> Result<Vec<u8>, CryptoError>;

    /// # Errors
    /// * [`CryptoError::CertificateNotFound`] when no certificate matches the embedded hash.
    /// * [`CryptoError::MissingPrivateKey`] when the match cannot decrypt.
    /// * Other [`CryptoError`]s for malformed containers or primitive failures.
    fn decrypt(&self, data: &[u8], resolver: &dyn CertificateResolver) -> Result<Vec<u8>, CryptoError>;
}

/// Picks the hybrid cipher for symmetric-wrapped containers, the plain RSA cipher otherwise.
#[must_use]
pub fn certificate_cipher(symmetric_encryption: bool) -> &'static dyn CertificateCipher {
    if symmetric_encryption { &HybridCipher } else { &RsaCipher }
}
