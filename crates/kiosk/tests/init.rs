use kiosk::certstore::{OpenMode, StoreBackend, StoreHandle, StoreId};
use kiosk::domain::LoadStatus;
use kiosk::domain::config::AppConfig;
use kiosk::vault::testing::self_signed_identity;
use kiosk::vault::{CertificateCipher, CertificateResolver, HybridCipher};

fn config(root: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.app_data_file_path = root.join("client.kiosk");
    config.certificate_store_root = root.join("stores");
    config.code_signature_hash = "signature".into();
    config.program_build_version = "3.8.0".into();
    config
}

#[test]
fn init_wires_configured_paths() {
    let root = tempfile::tempdir().unwrap();
    let kiosk = kiosk::init(&config(root.path())).unwrap();

    assert_eq!(kiosk.repository.client_configuration_path(), &root.path().join("client.kiosk"));
    assert_eq!(
        kiosk.certificates.backend().store_path(StoreId::CURRENT_USER_PERSONAL),
        root.path().join("stores/current-user/personal")
    );
    assert!(std::sync::Arc::ptr_eq(kiosk.repository.key_generator(), &kiosk.key_generator));
}

#[test]
fn file_loader_is_registered_but_no_dialect() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("exam.kiosk");
    std::fs::write(&source, b"<plist/>").unwrap();

    let kiosk = kiosk::init(&config(root.path())).unwrap();
    assert_eq!(kiosk.repository.load_settings(source.to_str().unwrap(), None), Err(LoadStatus::NotSupported));
}

#[test]
fn store_resolves_identities_under_the_configured_root() {
    let root = tempfile::tempdir().unwrap();
    let kiosk = kiosk::init(&config(root.path())).unwrap();

    let identity = self_signed_identity("exam", 2048).unwrap();
    let mut handle =
        kiosk.certificates.backend().open(StoreId::LOCAL_MACHINE_PERSONAL, OpenMode::ReadWrite).unwrap();
    handle.add(&identity).unwrap();
    drop(handle);

    let found = kiosk.certificates.lookup_by_hash(&identity.public_key_hash().unwrap()).unwrap();
    assert!(found.is_some_and(|certificate| certificate.has_private_key()));

    let sealed = HybridCipher.encrypt(b"settings", &identity).unwrap();
    assert_eq!(HybridCipher.decrypt(&sealed, kiosk.certificates.as_ref()).unwrap(), b"settings");
}

#[test]
fn features_are_listed() {
    assert!(kiosk::features::is_enabled("configuration"));
    assert!(!kiosk::features::is_enabled("lockdown"));
}
