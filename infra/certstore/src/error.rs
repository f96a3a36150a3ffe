use kiosk_vault::CryptoError;
use std::borrow::Cow;

#[kiosk_derive::kiosk_error]
pub enum StoreError {
    #[error("Store IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[status(from_source)]
    #[error("Certificate error{}: {source}", format_context(.context))]
    Crypto { source: CryptoError, context: Option<Cow<'static, str>> },

    #[status(InvalidData)]
    #[error("Invalid certificate data{}: {source}", format_context(.context))]
    Encoding { source: base64::DecodeError, context: Option<Cow<'static, str>> },

    /// An embedded certificate entry does not have the expected shape.
    #[status(InvalidData)]
    #[error("Invalid certificate entry{}: {message}", format_context(.context))]
    InvalidEntry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Store opened read-only{}: {message}", format_context(.context))]
    ReadOnly { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
