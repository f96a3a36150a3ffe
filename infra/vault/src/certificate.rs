use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::{Padding, Rsa};
use openssl::x509::X509;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::error::{CryptoError, CryptoErrorExt};
use crate::resolver::{CertificateCipher, CertificateResolver};

/// SHA-1 of a certificate's encoded RSA public key.
pub type PublicKeyHash = [u8; 20];

pub(crate) const HASH_LEN: usize = 20;

/// PKCS#1 v1.5 padding overhead reserved per encrypted block.
pub(crate) const BLOCK_OVERHEAD: usize = 32;

/// An X.509 certificate, optionally paired with its private key.
#[derive(Debug, Clone)]
pub struct Certificate {
    x509: X509,
    private_key: Option<PKey<Private>>,
}

impl Certificate {
    #[must_use]
    pub const fn new(x509: X509, private_key: Option<PKey<Private>>) -> Self {
        Self { x509, private_key }
    }

    /// Parses a DER (or PEM) encoded certificate without a private key.
    ///
    /// # Errors
    /// [`CryptoError::Openssl`] when the bytes are not a certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let x509 = X509::from_der(der).or_else(|_| X509::from_pem(der)).context("Parsing certificate")?;
        Ok(Self::new(x509, None))
    }

    /// Opens a PKCS#12 identity bundle.
    ///
    /// # Errors
    /// [`CryptoError::Openssl`] on a wrong passphrase or a bundle without a certificate.
    pub fn from_pkcs12(der: &[u8], passphrase: &str) -> Result<Self, CryptoError> {
        let parsed = Pkcs12::from_der(der)
            .and_then(|bundle| bundle.parse2(passphrase))
            .context("Opening PKCS#12 bundle")?;

        let x509 = parsed.cert.ok_or_else(|| CryptoError::Internal {
            message: "PKCS#12 bundle holds no certificate".into(),
            context: None,
        })?;

        Ok(Self::new(x509, parsed.pkey))
    }

    /// Packs the certificate and its private key into a PKCS#12 bundle.
    ///
    /// # Errors
    /// * [`CryptoError::MissingPrivateKey`] when there is nothing to bundle with the certificate.
    /// * [`CryptoError::Openssl`] when building the bundle fails.
    pub fn to_pkcs12(&self, passphrase: &str, friendly_name: &str) -> Result<Vec<u8>, CryptoError> {
        let key = self.require_private_key()?;
        let bundle = Pkcs12::builder()
            .name(friendly_name)
            .pkey(key)
            .cert(&self.x509)
            .build2(passphrase)
            .context("Building PKCS#12 bundle")?;

        bundle.to_der().context("Encoding PKCS#12 bundle")
    }

    /// # Errors
    /// [`CryptoError::Openssl`] when encoding fails.
    pub fn to_der(&self) -> Result<Vec<u8>, CryptoError> {
        self.x509.to_der().context("Encoding certificate")
    }

    #[must_use]
    pub const fn x509(&self) -> &X509 {
        &self.x509
    }

    #[must_use]
    pub const fn private_key(&self) -> Option<&PKey<Private>> {
        self.private_key.as_ref()
    }

    #[must_use]
    pub const fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// Lookup hash used by the certificate ciphers and the trust stores.
    ///
    /// # Errors
    /// [`CryptoError::Openssl`] when the certificate does not carry an RSA key.
    pub fn public_key_hash(&self) -> Result<PublicKeyHash, CryptoError> {
        public_key_hash(&self.public_rsa()?)
    }

    /// # Errors
    /// [`CryptoError::Openssl`] when the certificate does not carry an RSA key.
    pub fn public_rsa(&self) -> Result<Rsa<Public>, CryptoError> {
        self.x509
            .public_key()
            .and_then(|key| key.rsa())
            .context("Extracting RSA public key")
    }

    pub(crate) fn require_private_key(&self) -> Result<&PKey<Private>, CryptoError> {
        self.private_key.as_ref().ok_or_else(|| CryptoError::MissingPrivateKey {
            message: "Certificate has no private key".into(),
            context: self.public_key_hash().ok().map(|hash| hex::encode(hash).into()),
        })
    }
}

/// SHA-1 over the PKCS#1 DER encoding of an RSA public key.
///
/// # Errors
/// [`CryptoError::Openssl`] when the key cannot be encoded.
pub fn public_key_hash(key: &Rsa<Public>) -> Result<PublicKeyHash, CryptoError> {
    let der = key.public_key_to_der_pkcs1().context("Encoding RSA public key")?;

    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&Sha1::digest(&der));
    Ok(hash)
}

/// RSA-encrypts `data` in blocks of `key_size - 32` bytes.
pub(crate) fn encrypt_blocks(key: &Rsa<Public>, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key_size = key.size() as usize;
    let block_size = key_size.checked_sub(BLOCK_OVERHEAD).filter(|size| *size > 0).ok_or_else(|| {
        CryptoError::Internal { message: format!("RSA key of {key_size} bytes is too small").into(), context: None }
    })?;

    let mut out = Vec::with_capacity(data.len().div_ceil(block_size) * key_size);
    let mut block = vec![0u8; key_size];
    for chunk in data.chunks(block_size) {
        let written = key.public_encrypt(chunk, &mut block, Padding::PKCS1).context("RSA block encryption")?;
        out.extend_from_slice(&block[..written]);
    }

    Ok(out)
}

/// RSA-decrypts `data` in blocks of exactly `key_size` bytes.
pub(crate) fn decrypt_blocks(key: &Rsa<Private>, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key_size = key.size() as usize;
    if data.len() % key_size != 0 {
        return Err(CryptoError::invalid_payload(format!(
            "Ciphertext of {} bytes is not a multiple of the {key_size} byte RSA block",
            data.len()
        )));
    }

    let mut out = Vec::with_capacity(data.len());
    let mut block = vec![0u8; key_size];
    for chunk in data.chunks(key_size) {
        let written = key.private_decrypt(chunk, &mut block, Padding::PKCS1).context("RSA block decryption")?;
        out.extend_from_slice(&block[..written]);
    }

    Ok(out)
}

/// Splits the leading public-key hash off a certificate-cipher container.
pub(crate) fn split_hash(data: &[u8]) -> Result<(PublicKeyHash, &[u8]), CryptoError> {
    let Some((hash, rest)) = data.split_first_chunk::<HASH_LEN>() else {
        return Err(CryptoError::invalid_payload(format!(
            "Container of {} bytes is shorter than the certificate hash",
            data.len()
        )));
    };
    Ok((*hash, rest))
}

/// Resolves `hash` to a certificate that can decrypt, returning its RSA private key.
pub(crate) fn resolve_private_key(
    hash: &PublicKeyHash,
    resolver: &dyn CertificateResolver,
) -> Result<Rsa<Private>, CryptoError> {
    let thumbprint = hex::encode(hash);
    let Some(certificate) = resolver.lookup_by_hash(hash)? else {
        return Err(CryptoError::CertificateNotFound {
            message: format!("No certificate with public key hash {thumbprint}").into(),
            context: None,
        });
    };

    debug!(%thumbprint, "Resolved decryption certificate");
    certificate.require_private_key()?.rsa().context("Extracting RSA private key")
}

/// Plain certificate cipher: the payload itself is RSA-encrypted block by block.
///
/// ```text
/// [SHA1(PUBKEY)(20)][RSA BLOCK(key_size)]...
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaCipher;

impl CertificateCipher for RsaCipher {
    fn encrypt(&self, data: &[u8], certificate: &Certificate) -> Result<Vec<u8>, CryptoError> {
        let key = certificate.public_rsa()?;
        let hash = public_key_hash(&key)?;
        let blocks = encrypt_blocks(&key, data)?;

        let mut out = Vec::with_capacity(HASH_LEN + blocks.len());
        out.extend_from_slice(&hash);
        out.extend_from_slice(&blocks);
        Ok(out)
    }

    fn decrypt(&self, data: &[u8], resolver: &dyn CertificateResolver) -> Result<Vec<u8>, CryptoError> {
        let (hash, blocks) = split_hash(data)?;
        let key = resolve_private_key(&hash, resolver)?;
        decrypt_blocks(&key, blocks)
    }
}
