use kiosk_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn second_init_reports_subscriber_error() {
    let logger = Logger::builder().name("kiosk-init-once").level(LevelFilter::INFO).init().expect("first init");
    assert!(!logger.has_file_sink(), "console-only logger has no background writer");

    let err = Logger::builder().name("kiosk-init-twice").init().expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
