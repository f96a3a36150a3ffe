use kiosk_domain::LoadStatus;
use kiosk_vault::{OVERHEAD, PasswordCipher};
use proptest::prelude::*;

proptest! {
    // PBKDF2 runs four times per case; keep the case count modest.
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn roundtrip_arbitrary_payloads(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        password in "\\PC{0,24}",
    ) {
        let sealed = PasswordCipher.encrypt(&data, &password).unwrap();
        let opened = PasswordCipher.decrypt(&sealed, Some(&password)).unwrap();
        prop_assert_eq!(data, opened);
    }

    #[test]
    fn any_flipped_byte_needs_password(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        position in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let mut sealed = PasswordCipher.encrypt(&data, "pw").unwrap();
        let at = position.index(sealed.len());
        sealed[at] ^= mask;

        let err = PasswordCipher.decrypt(&sealed, Some("pw")).unwrap_err();
        prop_assert_eq!(err.status(), LoadStatus::PasswordNeeded);
    }

    #[test]
    fn missing_password_is_rejected_for_any_bytes(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let err = PasswordCipher.decrypt(&data, None).unwrap_err();
        prop_assert_eq!(err.status(), LoadStatus::PasswordNeeded);
    }
}

#[test]
fn ciphertext_is_block_padded() {
    for (len, blocks) in [(0usize, 1usize), (15, 1), (16, 2), (33, 3)] {
        let sealed = PasswordCipher.encrypt(&vec![7u8; len], "pw").unwrap();
        assert_eq!(sealed.len(), OVERHEAD + blocks * 16, "payload of {len} bytes");
    }
}
