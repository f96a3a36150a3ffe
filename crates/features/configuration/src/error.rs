use kiosk_vault::CryptoError;
use std::borrow::Cow;

/// Failure of one pipeline stage. [`ConfigurationError::status`] is what the repository reports.
#[kiosk_derive::kiosk_error]
pub enum ConfigurationError {
    /// No registered plugin can handle the input.
    #[status(NotSupported)]
    #[error("Not supported{}: {message}", format_context(.context))]
    NotSupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(PasswordNeeded)]
    #[error("Password needed{}: {message}", format_context(.context))]
    PasswordNeeded { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(InvalidData)]
    #[error("Invalid data{}: {message}", format_context(.context))]
    InvalidData { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(from_source)]
    #[error("Crypto error{}: {source}", format_context(.context))]
    Crypto { source: CryptoError, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal configuration error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ConfigurationError {
    pub(crate) fn not_supported(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotSupported { message: message.into(), context: None }
    }
}
