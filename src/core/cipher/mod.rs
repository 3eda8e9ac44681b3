//! Cryptographic operations.
//!
//! Secrets are sealed one string at a time with AES-256-GCM under a single
//! process-wide [`MasterKey`]. A sealed secret is three hex strings:
//! ciphertext, a 16-byte random iv, and a 16-byte authentication tag.
//!
//! ## Invariants
//!
//! - Every call to [`seal`] draws a fresh iv from the OS RNG. Two seals of the
//!   same plaintext never share an iv.
//! - [`open`] never returns plaintext unless the tag verifies.
//! - An empty secret seals to `None`, which is distinct from a failure.

mod gcm;
mod key;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::core::types::HexString;
use crate::error::{CipherError, Result};

pub use key::MasterKey;

/// A sealed secret.
///
/// All three parts are required; a record either has a complete `Sealed`
/// or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sealed {
    pub ciphertext: HexString,
    pub iv: HexString,
    pub tag: HexString,
}

/// Seal a plaintext secret.
///
/// # Returns
///
/// `None` for an empty plaintext, otherwise the sealed parts.
///
/// # Errors
///
/// Returns `CipherError::EncryptionFailed` if the cipher rejects the input.
pub fn seal(key: &MasterKey, plaintext: &str) -> Result<Option<Sealed>> {
    if plaintext.is_empty() {
        return Ok(None);
    }
    gcm::seal(key, plaintext).map(Some)
}

/// Open a sealed secret from its stored parts.
///
/// # Errors
///
/// Returns `CipherError::Incomplete` if any part is missing and
/// `CipherError::Integrity` if the parts are malformed or the tag does not
/// verify (tampered data or a different key).
pub fn open(
    key: &MasterKey,
    ciphertext: Option<&str>,
    iv: Option<&str>,
    tag: Option<&str>,
) -> Result<Zeroizing<String>> {
    let ciphertext = ciphertext.ok_or(CipherError::Incomplete {
        field: "ciphertext",
    })?;
    let iv = iv.ok_or(CipherError::Incomplete { field: "iv" })?;
    let tag = tag.ok_or(CipherError::Incomplete { field: "tag" })?;
    gcm::open(key, ciphertext, iv, tag)
}

/// Open a complete [`Sealed`] value.
pub fn open_sealed(key: &MasterKey, sealed: &Sealed) -> Result<Zeroizing<String>> {
    open(
        key,
        Some(&sealed.ciphertext),
        Some(&sealed.iv),
        Some(&sealed.tag),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    fn key() -> MasterKey {
        MasterKey::from_bytes([7u8; 32])
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = key();
        let sealed = seal(&key, "hunter2").unwrap().unwrap();
        assert_ne!(sealed.ciphertext, "hunter2");
        assert_eq!(open_sealed(&key, &sealed).unwrap().as_str(), "hunter2");
    }

    #[test]
    fn test_seal_empty_is_none() {
        assert!(seal(&key(), "").unwrap().is_none());
    }

    #[test]
    fn test_fresh_iv_per_seal() {
        let key = key();
        let a = seal(&key, "same").unwrap().unwrap();
        let b = seal(&key, "same").unwrap().unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_open_missing_part_is_input_error() {
        let key = key();
        let sealed = seal(&key, "secret").unwrap().unwrap();

        let err = open(&key, Some(&sealed.ciphertext), None, Some(&sealed.tag)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = open(&key, None, Some(&sealed.iv), Some(&sealed.tag)).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::Incomplete {
                field: "ciphertext"
            })
        ));
    }

    #[test]
    fn test_wrong_key_fails_integrity() {
        let sealed = seal(&key(), "secret").unwrap().unwrap();
        let other = MasterKey::from_bytes([8u8; 32]);
        let err = open_sealed(&other, &sealed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn test_unicode_secret() {
        let key = key();
        let sealed = seal(&key, "pässwörd 🔑").unwrap().unwrap();
        assert_eq!(open_sealed(&key, &sealed).unwrap().as_str(), "pässwörd 🔑");
    }
}
