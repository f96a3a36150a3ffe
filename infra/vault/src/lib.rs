//! Ciphers protecting kiosk configuration containers.
//!
//! * [`PasswordCipher`]: PBKDF2-derived AES-256-CBC with a trailing HMAC-SHA256 tag.
//! * [`RsaCipher`]: the payload is RSA-encrypted block by block for a certificate.
//! * [`HybridCipher`]: a random key encrypts the payload through the [`PasswordCipher`]; only the
//!   key is RSA-encrypted, so payload size is unbounded.
//!
//! Certificate containers start with the SHA-1 hash of the encrypting public key. Decryption asks a
//! [`CertificateResolver`] (usually the trust stores) for the matching certificate.
//!
//! ## Payload Formats
//!
//! ```text
//! password: [V(1)][OPTIONS(1)][ENC_SALT(8)][AUTH_SALT(8)][IV(16)][CIPHERTEXT(N)][HMAC(32)]
//! rsa:      [SHA1(PUBKEY)(20)][RSA BLOCK(key_size)]...
//! hybrid:   [SHA1(PUBKEY)(20)][KEY_CT_LEN(4, LE)][RSA(KEY)][PASSWORD CONTAINER]
//! ```
//!
//! Every failure is a [`CryptoError`]; [`CryptoError::status`] maps it onto the load status reported
//! to callers.

mod certificate;
mod error;
mod hybrid;
mod password;
mod resolver;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use certificate::{Certificate, PublicKeyHash, RsaCipher, public_key_hash};
pub use error::{CryptoError, CryptoErrorExt};
pub use hybrid::HybridCipher;
pub use password::{OPTIONS, OVERHEAD, PasswordCipher, PasswordContainer, VERSION};
pub use resolver::{CertificateCipher, CertificateResolver, certificate_cipher};

pub mod prelude {
    pub use crate::certificate::{Certificate, RsaCipher};
    pub use crate::error::{CryptoError, CryptoErrorExt};
    pub use crate::hybrid::HybridCipher;
    pub use crate::password::PasswordCipher;
    pub use crate::resolver::{CertificateCipher, CertificateResolver, certificate_cipher};
}
