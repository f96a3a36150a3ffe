use std::borrow::Cow;

#[kiosk_derive::kiosk_error]
pub enum IntegrityError {
    /// The external integrity module could not produce a browser exam key.
    #[error("Integrity module error{}: {message}", format_context(.context))]
    Module { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal integrity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
