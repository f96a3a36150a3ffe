use kiosk_domain::certificates::CertificateType;
use kiosk_domain::keys::{CERTIFICATE_DATA, EMBEDDED_CERTIFICATES, KEEP_CLIENT_CONFIG_ENCRYPTION};
use kiosk_domain::{ConfigureStatus, LoadStatus, PasswordParameters, SaveStatus};

#[test]
fn load_status_folds_into_save_status() {
    assert_eq!(SaveStatus::from(LoadStatus::Success), SaveStatus::Success);
    assert_eq!(SaveStatus::from(LoadStatus::NotSupported), SaveStatus::NotSupported);
    assert_eq!(SaveStatus::from(LoadStatus::PasswordNeeded), SaveStatus::UnexpectedError);
}

#[test]
fn configure_status_success_requires_saved() {
    assert!(ConfigureStatus::Save(SaveStatus::Success).is_success());
    assert!(!ConfigureStatus::Load(LoadStatus::Success).is_success());
    assert_eq!(ConfigureStatus::Load(LoadStatus::PasswordNeeded).to_string(), "load:PasswordNeeded");
}

#[test]
fn empty_hash_is_the_client_baseline() {
    let baseline = PasswordParameters::empty_hash();
    assert!(baseline.password.is_empty());
    assert!(baseline.is_hash);
}

#[test]
fn certificate_type_codes_match_wire_values() {
    assert_eq!(CertificateType::try_from(1), Ok(CertificateType::Identity));
    assert_eq!(CertificateType::try_from(7), Err(7));
    assert_eq!(CertificateType::Identity as u8, 1);
}

#[test]
fn raw_keys_match_configuration_names() {
    assert_eq!(EMBEDDED_CERTIFICATES, "embeddedCertificates");
    assert_eq!(CERTIFICATE_DATA, "certificateData");
    assert_eq!(KEEP_CLIENT_CONFIG_ENCRYPTION, "clientConfigKeepEncryption");
}
