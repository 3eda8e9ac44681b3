//! AES-256-GCM sealing with 16-byte ivs and detached tags.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::trace;
use zeroize::Zeroizing;

use super::{MasterKey, Sealed};
use crate::core::constants::{IV_LEN, TAG_LEN};
use crate::error::{CipherError, Result};

/// AES-256 in GCM mode with a 128-bit nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

fn cipher(key: &MasterKey) -> Result<Aes256Gcm16> {
    Aes256Gcm16::new_from_slice(key.as_bytes())
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()).into())
}

pub(super) fn seal(key: &MasterKey, plaintext: &str) -> Result<Sealed> {
    trace!(plaintext_len = plaintext.len(), "sealing");

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut buffer = Zeroizing::new(plaintext.as_bytes().to_vec());
    let tag = cipher(key)?
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| CipherError::EncryptionFailed("plaintext rejected".to_string()))?;

    trace!(ciphertext_len = buffer.len(), "sealed");

    Ok(Sealed {
        ciphertext: hex::encode(&*buffer),
        iv: hex::encode(iv),
        tag: hex::encode(tag),
    })
}

pub(super) fn open(key: &MasterKey, ciphertext: &str, iv: &str, tag: &str) -> Result<Zeroizing<String>> {
    trace!(ciphertext_len = ciphertext.len() / 2, "opening");

    let iv = decode_fixed::<IV_LEN>("iv", iv)?;
    let tag = decode_fixed::<TAG_LEN>("tag", tag)?;
    let mut buffer = Zeroizing::new(
        hex::decode(ciphertext)
            .map_err(|e| CipherError::Integrity(format!("ciphertext is not hex: {}", e)))?,
    );

    cipher(key)?
        .decrypt_in_place_detached(
            GenericArray::from_slice(&iv),
            b"",
            &mut buffer,
            GenericArray::from_slice(&tag),
        )
        .map_err(|_| CipherError::Integrity("authentication tag mismatch".to_string()))?;

    let plaintext = std::str::from_utf8(&buffer)
        .map_err(|_| CipherError::Integrity("plaintext is not valid UTF-8".to_string()))?;

    Ok(Zeroizing::new(plaintext.to_owned()))
}

fn decode_fixed<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    hex::decode_to_slice(value, &mut out)
        .map_err(|e| CipherError::Integrity(format!("{} is malformed: {}", field, e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn flip_first_byte(hex_value: &str) -> String {
        let mut bytes = hex::decode(hex_value).unwrap();
        bytes[0] ^= 0x01;
        hex::encode(bytes)
    }

    #[test]
    fn test_layout() {
        let key = MasterKey::from_bytes([1u8; 32]);
        let sealed = seal(&key, "abc").unwrap();
        assert_eq!(sealed.iv.len(), IV_LEN * 2);
        assert_eq!(sealed.tag.len(), TAG_LEN * 2);
        assert_eq!(sealed.ciphertext.len(), 6);
    }

    #[test]
    fn test_tampered_parts_fail_integrity() {
        let key = MasterKey::from_bytes([1u8; 32]);
        let sealed = seal(&key, "p@ss").unwrap();

        let cases = [
            (flip_first_byte(&sealed.ciphertext), sealed.iv.clone(), sealed.tag.clone()),
            (sealed.ciphertext.clone(), flip_first_byte(&sealed.iv), sealed.tag.clone()),
            (sealed.ciphertext.clone(), sealed.iv.clone(), flip_first_byte(&sealed.tag)),
        ];
        for (ct, iv, tag) in cases {
            let err = open(&key, &ct, &iv, &tag).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Integrity);
        }
    }

    #[test]
    fn test_short_iv_fails_integrity() {
        let key = MasterKey::from_bytes([1u8; 32]);
        let sealed = seal(&key, "p@ss").unwrap();
        let err = open(&key, &sealed.ciphertext, &sealed.iv[..20], &sealed.tag).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }
}
