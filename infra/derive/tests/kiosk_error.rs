mod cipher {
    use kiosk_derive::kiosk_error;
    use std::borrow::Cow;

    #[kiosk_error]
    pub enum CipherFault {
        #[status(PasswordNeeded)]
        #[error("Authentication failed{}: {message}", format_context(.context))]
        Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

        #[error("IO error{}: {source}", format_context(.context))]
        Io { source: std::io::Error, context: Option<Cow<'static, str>> },

        #[error("Internal fault{}: {message}", format_context(.context))]
        Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    }
}

mod pipeline {
    use super::cipher::CipherFault;
    use kiosk_derive::kiosk_error;
    use std::borrow::Cow;

    #[kiosk_error]
    pub enum PipelineFault {
        #[status(from_source)]
        #[error("Cipher failed{}: {source}", format_context(.context))]
        Cipher { source: CipherFault, context: Option<Cow<'static, str>> },

        #[status(NotSupported)]
        #[error("No handler for {message}")]
        Unsupported { message: Cow<'static, str> },
    }
}

use cipher::{CipherFault, CipherFaultExt};
use kiosk_domain::LoadStatus;
use pipeline::PipelineFault;

fn failing_read() -> Result<(), CipherFault> {
    Err::<(), _>(std::io::Error::other("disk gone")).context("Reading container")
}

#[test]
fn kiosk_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/kiosk_error_pass.rs");
    t.pass("tests/ui/kiosk_error_status_pass.rs");
}

#[test]
fn annotated_variants_map_to_their_status() {
    let fault = CipherFault::Authentication { message: "tag mismatch".into(), context: None };
    assert_eq!(fault.status(), LoadStatus::PasswordNeeded);

    let unsupported = PipelineFault::Unsupported { message: "ftp://x".into() };
    assert_eq!(unsupported.status(), LoadStatus::NotSupported);
}

#[test]
fn unannotated_variants_are_unexpected() {
    let err = failing_read().unwrap_err();
    assert!(matches!(err, CipherFault::Io { .. }));
    assert_eq!(err.status(), LoadStatus::UnexpectedError);
    assert!(err.to_string().contains("(Reading container)"));
}

#[test]
fn from_source_delegates_to_inner_status() {
    let inner = CipherFault::Authentication { message: "bad".into(), context: None };
    let outer = PipelineFault::from(inner);
    assert_eq!(outer.status(), LoadStatus::PasswordNeeded);

    let internal: CipherFault = "boom".into();
    assert_eq!(PipelineFault::from(internal).status(), LoadStatus::UnexpectedError);
}

#[test]
fn context_is_attached_to_existing_errors() {
    let result: Result<(), CipherFault> =
        Err(CipherFault::Internal { message: "state".into(), context: None });
    let err = result.context("while sealing").unwrap_err();
    assert_eq!(err.to_string(), "Internal fault (while sealing): state");
}
