//! Sealing properties.

mod support;

use std::collections::HashSet;

use hangar::core::cipher::{self, MasterKey};
use hangar::ErrorKind;
use support::*;

#[test]
fn test_wrong_key_is_integrity_failure() {
    let sealed = cipher::seal(&test_key(), "correct horse").unwrap().unwrap();
    let other = MasterKey::from_bytes([0xAB; 32]);

    let err = cipher::open_sealed(&other, &sealed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn test_missing_part_is_input_error() {
    let key = test_key();
    let sealed = cipher::seal(&key, "pw").unwrap().unwrap();

    let err = cipher::open(&key, Some(&sealed.ciphertext), None, Some(&sealed.tag)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    let err = cipher::open(&key, None, Some(&sealed.iv), Some(&sealed.tag)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[test]
fn test_ivs_do_not_repeat() {
    let key = test_key();
    let ivs: HashSet<String> = (0..500)
        .map(|_| cipher::seal(&key, "same secret").unwrap().unwrap().iv)
        .collect();
    assert_eq!(ivs.len(), 500);
}

#[test]
fn test_key_from_hex_rejects_bad_input() {
    assert!(MasterKey::from_hex("abcd").is_err());
    assert!(MasterKey::from_hex(&"zz".repeat(32)).is_err());
    assert_eq!(
        MasterKey::from_hex(TEST_KEY_HEX).unwrap().fingerprint(),
        test_key().fingerprint()
    );
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn roundtrip_any_text(value in "\\PC{1,200}") {
            let key = test_key();
            let sealed = cipher::seal(&key, &value).unwrap().unwrap();
            prop_assert_eq!(sealed.ciphertext.len(), value.len() * 2);
            let opened = cipher::open_sealed(&key, &sealed).unwrap();
            prop_assert_eq!(opened.as_str(), value.as_str());
        }

        #[test]
        fn tampered_ciphertext_never_opens(value in "[a-z0-9]{1,64}", index in any::<prop::sample::Index>()) {
            let key = test_key();
            let mut sealed = cipher::seal(&key, &value).unwrap().unwrap();
            let mut bytes = hex::decode(&sealed.ciphertext).unwrap();
            let i = index.index(bytes.len());
            bytes[i] ^= 0x80;
            sealed.ciphertext = hex::encode(bytes);

            let err = cipher::open_sealed(&key, &sealed).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::Integrity);
        }
    }
}
