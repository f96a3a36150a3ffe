//! # Vault Errors
//!
//! [`CryptoError`] is returned by every cipher operation. Its [`CryptoError::status`] is the
//! load status the configuration pipeline reports for a failed decryption.

use std::borrow::Cow;

#[kiosk_derive::kiosk_error]
pub enum CryptoError {
    /// No password was supplied, or the supplied one failed authentication.
    ///
    /// Wrong passwords and tampered containers are deliberately indistinguishable.
    #[status(PasswordNeeded)]
    #[error("Password needed{}: {message}", format_context(.context))]
    PasswordNeeded { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The container references a certificate that no trust store holds.
    #[status(InvalidData)]
    #[error("Certificate not found{}: {message}", format_context(.context))]
    CertificateNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The resolved certificate carries no private key to decrypt with.
    #[status(InvalidData)]
    #[error("Missing private key{}: {message}", format_context(.context))]
    MissingPrivateKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A certificate-cipher container is truncated or its length prefix is out of range.
    #[error("Invalid payload{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("OpenSSL error{}: {source}", format_context(.context))]
    Openssl { source: openssl::error::ErrorStack, context: Option<Cow<'static, str>> },

    #[error("System RNG unavailable{}: {source}", format_context(.context))]
    Random { source: getrandom::Error, context: Option<Cow<'static, str>> },

    /// A certificate resolver failed for reasons of its own (unreadable store and the like).
    #[error("Certificate resolver error{}: {source}", format_context(.context))]
    Resolver {
        source: Box<dyn std::error::Error + Send + Sync>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CryptoError {
    pub(crate) fn password_needed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::PasswordNeeded { message: message.into(), context: None }
    }

    pub(crate) fn invalid_payload(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidPayload { message: message.into(), context: None }
    }
}
