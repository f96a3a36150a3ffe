mod inner {
    use kiosk_derive::kiosk_error;
    use std::borrow::Cow;

    #[kiosk_error]
    pub enum InnerError {
        #[status(PasswordNeeded)]
        #[error("Authentication failed{}: {message}", format_context(.context))]
        Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    }
}

mod outer {
    use super::inner::InnerError;
    use kiosk_derive::kiosk_error;
    use std::borrow::Cow;

    #[kiosk_error]
    pub enum OuterError {
        #[status(from_source)]
        #[error("Inner failure{}: {source}", format_context(.context))]
        Inner { source: InnerError, context: Option<Cow<'static, str>> },

        #[status(NotSupported)]
        #[error("Nothing can handle {message}")]
        Unsupported { message: Cow<'static, str> },
    }
}

fn main() {
    let _ = outer::OuterError::Unsupported { message: "x".into() }.status();
}
