use getrandom::fill;
use hmac::{Hmac, Mac};
use openssl::hash::MessageDigest;
use openssl::pkcs5::pbkdf2_hmac;
use openssl::symm::{self, Cipher};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoErrorExt};

// --- Container format constants ---

pub const VERSION: u8 = 0x02;
pub const OPTIONS: u8 = 0x01;

pub(crate) const HEADER_LEN: usize = 2;
pub(crate) const SALT_LEN: usize = 8;
pub(crate) const IV_LEN: usize = 16;
pub(crate) const KEY_LEN: usize = 32;
pub(crate) const TAG_LEN: usize = 32;
pub(crate) const ITERATIONS: usize = 10_000;

/// Fixed overhead of a container around its ciphertext.
pub const OVERHEAD: usize = HEADER_LEN + 2 * SALT_LEN + IV_LEN + TAG_LEN;

type HmacSha256 = Hmac<Sha256>;

/// Borrowed view over a password container:
///
/// ```text
/// [V(1)][OPTIONS(1)][ENC_SALT(8)][AUTH_SALT(8)][IV(16)][CIPHERTEXT(N)][HMAC-SHA256(32)]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PasswordContainer<'a> {
    pub version: u8,
    pub options: u8,
    pub encryption_salt: &'a [u8],
    pub authentication_salt: &'a [u8],
    pub iv: &'a [u8],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8],
    authenticated: &'a [u8],
}

impl<'a> PasswordContainer<'a> {
    /// Splits `data` into its sections, or `None` when it is shorter than [`OVERHEAD`].
    #[must_use]
    pub fn split(data: &'a [u8]) -> Option<Self> {
        if data.len() < OVERHEAD {
            return None;
        }

        let (authenticated, tag) = data.split_at(data.len() - TAG_LEN);
        let (header, rest) = authenticated.split_at(HEADER_LEN);
        let (encryption_salt, rest) = rest.split_at(SALT_LEN);
        let (authentication_salt, rest) = rest.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        Some(Self {
            version: header[0],
            options: header[1],
            encryption_salt,
            authentication_salt,
            iv,
            ciphertext,
            tag,
            authenticated,
        })
    }

    /// Every byte covered by the HMAC tag.
    #[must_use]
    pub const fn authenticated(&self) -> &'a [u8] {
        self.authenticated
    }

    #[must_use]
    pub const fn has_known_header(&self) -> bool {
        self.version == VERSION && self.options == OPTIONS
    }
}

/// Password-based authenticated encryption (PBKDF2 + AES-256-CBC, encrypt-then-MAC).
///
/// Two independent keys are derived from the password, one for the cipher and one for the
/// HMAC-SHA256 tag that trails the container.
///
/// ```rust
/// use kiosk_vault::PasswordCipher;
///
/// # fn main() -> Result<(), kiosk_vault::CryptoError> {
/// let cipher = PasswordCipher;
/// let sealed = cipher.encrypt(b"hello", "pw")?;
/// assert_eq!(cipher.decrypt(&sealed, Some("pw"))?, b"hello");
/// assert!(cipher.decrypt(&sealed, Some("wrong")).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordCipher;

impl PasswordCipher {
    /// Encrypts `data` under `password` with fresh salts and IV.
    ///
    /// # Errors
    /// * [`CryptoError::Random`] if the system RNG is unavailable.
    /// * [`CryptoError::Openssl`] if key derivation or AES fails.
    pub fn encrypt(&self, data: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
        let encryption_salt = random_bytes::<SALT_LEN>()?;
        let authentication_salt = random_bytes::<SALT_LEN>()?;
        let iv = random_bytes::<IV_LEN>()?;

        let encryption_key = derive_key(password, &encryption_salt)?;
        let authentication_key = derive_key(password, &authentication_salt)?;

        let ciphertext = symm::encrypt(Cipher::aes_256_cbc(), encryption_key.as_slice(), Some(&iv), data)
            .context("AES-256-CBC encryption failed")?;

        let mut buf = Vec::with_capacity(OVERHEAD + ciphertext.len());
        buf.push(VERSION);
        buf.push(OPTIONS);
        buf.extend_from_slice(&encryption_salt);
        buf.extend_from_slice(&authentication_salt);
        buf.extend_from_slice(&iv);
        buf.extend_from_slice(&ciphertext);

        let tag = compute_tag(authentication_key.as_slice(), &buf)?;
        buf.extend_from_slice(&tag);

        Ok(buf)
    }

    /// Authenticates and decrypts a container produced by [`PasswordCipher::encrypt`].
    ///
    /// A missing password, a wrong one and a tampered container all yield
    /// [`CryptoError::PasswordNeeded`].
    ///
    /// # Errors
    /// * [`CryptoError::PasswordNeeded`] as described above.
    /// * [`CryptoError::Openssl`] if the authenticated ciphertext fails to decrypt.
    pub fn decrypt(&self, data: &[u8], password: Option<&str>) -> Result<Vec<u8>, CryptoError> {
        let Some(password) = password else {
            return Err(CryptoError::password_needed("No password supplied"));
        };

        let Some(container) = PasswordContainer::split(data) else {
            return Err(CryptoError::password_needed("Container failed authentication"));
        };

        if !container.has_known_header() {
            warn!(
                version = container.version,
                options = container.options,
                "Unexpected password container header, attempting decryption anyway"
            );
        }

        let authentication_key = derive_key(password, container.authentication_salt)?;
        let expected = compute_tag(authentication_key.as_slice(), container.authenticated())?;
        if !bool::from(expected.as_slice().ct_eq(container.tag)) {
            return Err(CryptoError::password_needed("Container failed authentication"));
        }

        let encryption_key = derive_key(password, container.encryption_salt)?;
        let plaintext = symm::decrypt(
            Cipher::aes_256_cbc(),
            encryption_key.as_slice(),
            Some(container.iv),
            container.ciphertext,
        )
        .context("AES-256-CBC decryption failed")?;

        Ok(plaintext)
    }
}

fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac(password.as_bytes(), salt, ITERATIONS, MessageDigest::sha1(), key.as_mut_slice())
        .context("PBKDF2 key derivation failed")?;
    Ok(key)
}

fn compute_tag(key: &[u8], data: &[u8]) -> Result<[u8; TAG_LEN], CryptoError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| CryptoError::Internal {
        message: e.to_string().into(),
        context: Some("HMAC key setup".into()),
    })?;
    mac.update(data);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    fill(&mut buf).context("Generating random bytes")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_domain::LoadStatus;

    #[test]
    fn container_layout_is_fixed() {
        let sealed = PasswordCipher.encrypt(b"hello", "pw").unwrap();
        let container = PasswordContainer::split(&sealed).unwrap();

        assert_eq!(container.version, VERSION);
        assert_eq!(container.options, OPTIONS);
        assert_eq!(container.tag.len(), TAG_LEN);
        // "hello" pads to a single AES block.
        assert_eq!(container.ciphertext.len(), 16);
        assert_eq!(sealed.len(), OVERHEAD + 16);
    }

    #[test]
    fn salts_and_iv_are_fresh_per_call() {
        let a = PasswordCipher.encrypt(b"same", "pw").unwrap();
        let b = PasswordCipher.encrypt(b"same", "pw").unwrap();
        let (a, b) = (PasswordContainer::split(&a).unwrap(), PasswordContainer::split(&b).unwrap());

        assert_ne!(a.encryption_salt, b.encryption_salt);
        assert_ne!(a.authentication_salt, b.authentication_salt);
        assert_ne!(a.iv, b.iv);
    }

    #[test]
    fn hello_pw_scenario() {
        let mut sealed = PasswordCipher.encrypt(b"hello", "pw").unwrap();

        assert_eq!(PasswordCipher.decrypt(&sealed, Some("pw")).unwrap(), b"hello");

        let wrong = PasswordCipher.decrypt(&sealed, Some("wrong")).unwrap_err();
        assert_eq!(wrong.status(), LoadStatus::PasswordNeeded);

        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        let tampered = PasswordCipher.decrypt(&sealed, Some("pw")).unwrap_err();
        assert_eq!(tampered.status(), LoadStatus::PasswordNeeded);
    }

    #[test]
    fn unknown_header_still_decrypts() {
        // The header is covered by the tag, so re-tag after rewriting it.
        let sealed = PasswordCipher.encrypt(b"forward", "pw").unwrap();
        let container = PasswordContainer::split(&sealed).unwrap();
        let key = derive_key("pw", container.authentication_salt).unwrap();

        let mut rewritten = container.authenticated().to_vec();
        rewritten[0] = 0x03;
        let tag = compute_tag(key.as_slice(), &rewritten).unwrap();
        rewritten.extend_from_slice(&tag);

        assert_eq!(PasswordCipher.decrypt(&rewritten, Some("pw")).unwrap(), b"forward");
    }

    #[test]
    fn truncated_container_needs_password() {
        let err = PasswordCipher.decrypt(&[VERSION, OPTIONS, 0, 0], Some("pw")).unwrap_err();
        assert_eq!(err.status(), LoadStatus::PasswordNeeded);
    }
}
