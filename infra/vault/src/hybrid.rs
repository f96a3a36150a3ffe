use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use crate::certificate::{
    Certificate, HASH_LEN, decrypt_blocks, encrypt_blocks, public_key_hash, resolve_private_key, split_hash,
};
use crate::error::{CryptoError, CryptoErrorExt};
use crate::password::{KEY_LEN, PasswordCipher, random_bytes};
use crate::resolver::{CertificateCipher, CertificateResolver};

const LENGTH_LEN: usize = 4;

/// Certificate-wrapped symmetric encryption.
///
/// The payload goes through the [`PasswordCipher`] under a random 32-byte key (its base64 text is
/// the password); only that key is RSA-encrypted for the certificate:
///
/// ```text
/// [SHA1(PUBKEY)(20)][KEY_CT_LEN(4, LE)][RSA(KEY)][PASSWORD CONTAINER]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridCipher;

impl CertificateCipher for HybridCipher {
    fn encrypt(&self, data: &[u8], certificate: &Certificate) -> Result<Vec<u8>, CryptoError> {
        let key = certificate.public_rsa()?;
        let hash = public_key_hash(&key)?;

        let symmetric_key = Zeroizing::new(random_bytes::<KEY_LEN>()?);
        let password = Zeroizing::new(STANDARD.encode(symmetric_key.as_slice()));

        let wrapped_key = encrypt_blocks(&key, symmetric_key.as_slice())?;
        let wrapped_len = u32::try_from(wrapped_key.len()).map_err(|_| CryptoError::Internal {
            message: "Wrapped key length exceeds u32".into(),
            context: None,
        })?;
        let container = PasswordCipher.encrypt(data, &password)?;

        let mut out = Vec::with_capacity(HASH_LEN + LENGTH_LEN + wrapped_key.len() + container.len());
        out.extend_from_slice(&hash);
        out.extend_from_slice(&wrapped_len.to_le_bytes());
        out.extend_from_slice(&wrapped_key);
        out.extend_from_slice(&container);
        Ok(out)
    }

    fn decrypt(&self, data: &[u8], resolver: &dyn CertificateResolver) -> Result<Vec<u8>, CryptoError> {
        let (hash, rest) = split_hash(data)?;
        let key = resolve_private_key(&hash, resolver)?;

        let Some((length, rest)) = rest.split_first_chunk::<LENGTH_LEN>() else {
            return Err(CryptoError::invalid_payload("Missing wrapped key length"));
        };
        let wrapped_len = u32::from_le_bytes(*length) as usize;
        if wrapped_len > rest.len() {
            return Err(CryptoError::invalid_payload(format!(
                "Wrapped key length {wrapped_len} exceeds the remaining {} bytes",
                rest.len()
            )));
        }

        let (wrapped_key, container) = rest.split_at(wrapped_len);
        let symmetric_key = Zeroizing::new(decrypt_blocks(&key, wrapped_key)?);
        let password = Zeroizing::new(STANDARD.encode(symmetric_key.as_slice()));

        PasswordCipher.decrypt(container, Some(password.as_str())).context("Decrypting hybrid payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::OVERHEAD;
    use crate::resolver::certificate_cipher;
    use crate::testing::{MemoryResolver, self_signed_identity};
    use kiosk_domain::LoadStatus;

    #[test]
    fn roundtrip_with_resolvable_certificate() {
        let identity = self_signed_identity("hybrid", 2048).unwrap();
        let payload = vec![0x5a; 64 * 1024];

        let sealed = HybridCipher.encrypt(&payload, &identity).unwrap();
        let resolver = MemoryResolver::new(vec![identity]);

        assert_eq!(HybridCipher.decrypt(&sealed, &resolver).unwrap(), payload);
    }

    #[test]
    fn layout_carries_hash_length_and_wrapped_key() {
        let identity = self_signed_identity("hybrid-layout", 2048).unwrap();
        let sealed = HybridCipher.encrypt(b"hello", &identity).unwrap();

        assert_eq!(&sealed[..HASH_LEN], identity.public_key_hash().unwrap().as_slice());
        let wrapped_len = u32::from_le_bytes(sealed[HASH_LEN..HASH_LEN + LENGTH_LEN].try_into().unwrap());
        assert_eq!(wrapped_len, 256);
        assert_eq!(sealed.len(), HASH_LEN + LENGTH_LEN + 256 + OVERHEAD + 16);
    }

    #[test]
    fn missing_certificate_is_invalid_data() {
        let identity = self_signed_identity("hybrid-missing", 1024).unwrap();
        let other = self_signed_identity("hybrid-other", 1024).unwrap();
        let sealed = HybridCipher.encrypt(b"hello", &identity).unwrap();

        let err = HybridCipher.decrypt(&sealed, &MemoryResolver::new(vec![other])).unwrap_err();
        assert_eq!(err.status(), LoadStatus::InvalidData);
    }

    #[test]
    fn tampered_payload_needs_password() {
        let identity = self_signed_identity("hybrid-tamper", 1024).unwrap();
        let mut sealed = HybridCipher.encrypt(b"hello", &identity).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;

        let err = HybridCipher.decrypt(&sealed, &MemoryResolver::new(vec![identity])).unwrap_err();
        assert_eq!(err.status(), LoadStatus::PasswordNeeded);
    }

    #[test]
    fn oversized_length_prefix_is_rejected() {
        let identity = self_signed_identity("hybrid-length", 1024).unwrap();
        let mut sealed = HybridCipher.encrypt(b"hello", &identity).unwrap();
        sealed[HASH_LEN..HASH_LEN + LENGTH_LEN].copy_from_slice(&u32::MAX.to_le_bytes());

        let err = HybridCipher.decrypt(&sealed, &MemoryResolver::new(vec![identity])).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPayload { .. }));
    }

    #[test]
    fn selector_matches_symmetric_flag() {
        let identity = self_signed_identity("selector", 1024).unwrap();
        let resolver = MemoryResolver::new(vec![identity.clone()]);

        for symmetric in [true, false] {
            let cipher = certificate_cipher(symmetric);
            let sealed = cipher.encrypt(b"selected", &identity).unwrap();
            assert_eq!(cipher.decrypt(&sealed, &resolver).unwrap(), b"selected");
        }

        let plain = certificate_cipher(false).encrypt(b"selected", &identity).unwrap();
        assert!(certificate_cipher(true).decrypt(&plain, &resolver).is_err());
    }
}
