use serde::{Deserialize, Serialize};

/// Encryption settings detected while parsing, or requested when serializing.
///
/// Values are created per operation and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionParameters {
    Password(PasswordParameters),
    PublicKey(PublicKeyParameters),
}

/// Password protection of a configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordParameters {
    pub password: String,
    /// `true` when `password` already holds the hash of the user's password.
    pub is_hash: bool,
}

/// Certificate protection of a configuration container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyParameters {
    /// DER-encoded X.509 certificate whose public key protects the data.
    pub certificate: Vec<u8>,
    /// Password layer applied inside the certificate layer, if any.
    pub inner_encryption: Option<PasswordParameters>,
    /// Wraps a random symmetric key instead of encrypting the payload with RSA directly.
    pub symmetric_encryption: bool,
}

impl PasswordParameters {
    pub fn new(password: impl Into<String>, is_hash: bool) -> Self {
        Self { password: password.into(), is_hash }
    }

    /// The baseline applied to client configurations that do not ask to keep their encryption.
    #[must_use]
    pub fn empty_hash() -> Self {
        Self { password: String::new(), is_hash: true }
    }
}

impl EncryptionParameters {
    #[must_use]
    pub const fn is_public_key(&self) -> bool {
        matches!(self, Self::PublicKey(_))
    }
}
