//! Test helpers: throwaway RSA identities and a resolver over a fixed certificate list.

use kiosk_domain::RawData;
use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::{X509, X509NameBuilder};

use crate::certificate::{Certificate, PublicKeyHash};
use crate::error::{CryptoError, CryptoErrorExt};
use crate::resolver::CertificateResolver;

/// Generates a self-signed certificate with its RSA private key.
///
/// # Errors
/// [`CryptoError::Openssl`] if key generation or signing fails.
pub fn self_signed_identity(common_name: &str, bits: u32) -> Result<Certificate, CryptoError> {
    let pkey = PKey::from_rsa(Rsa::generate(bits).context("Generating RSA key")?)?;

    let mut name = X509NameBuilder::new()?;
    name.append_entry_by_text("CN", common_name)?;
    let name = name.build();

    let mut serial = BigNum::new()?;
    serial.rand(64, MsbOption::MAYBE_ZERO, false)?;

    let mut builder = X509::builder()?;
    builder.set_version(2)?;
    let serial: openssl::asn1::Asn1Integer = serial.to_asn1_integer()?;
    builder.set_serial_number(&serial)?;
    builder.set_subject_name(&name)?;
    builder.set_issuer_name(&name)?;
    builder.set_pubkey(&pkey)?;
    let not_before: Asn1Time = Asn1Time::days_from_now(0)?;
    let not_after: Asn1Time = Asn1Time::days_from_now(365)?;
    builder.set_not_before(&not_before)?;
    builder.set_not_after(&not_after)?;
    builder.sign(&pkey, MessageDigest::sha256())?;

    Ok(Certificate::new(builder.build(), Some(pkey)))
}

/// Resolver over an in-memory list, first match wins.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    certificates: Vec<Certificate>,
}

impl MemoryResolver {
    #[must_use]
    pub const fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }
}

impl CertificateResolver for MemoryResolver {
    fn lookup_by_hash(&self, hash: &PublicKeyHash) -> Result<Option<Certificate>, CryptoError> {
        for certificate in &self.certificates {
            if certificate.public_key_hash()? == *hash {
                return Ok(Some(certificate.clone()));
            }
        }
        Ok(None)
    }

    fn import_identities(&self, _raw_data: &mut RawData) -> usize {
        0
    }
}
