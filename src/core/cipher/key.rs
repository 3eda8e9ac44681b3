//! The process-wide master key.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::core::constants::{KEY_ENV, KEY_LEN, LEGACY_KEY_ENV};
use crate::error::{ConfigError, Result};

/// Symmetric key used to seal every identity secret.
///
/// Loaded once at startup and shared read-only. Key bytes are wiped on drop
/// and never printed; use [`MasterKey::fingerprint`] to identify a key in logs.
pub struct MasterKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl MasterKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Parse a key from 64 hex characters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` for the wrong length or non-hex input.
    pub fn from_hex(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.len() != KEY_LEN * 2 {
            return Err(ConfigError::InvalidKey(format!(
                "expected {} hex characters, got {}",
                KEY_LEN * 2,
                value.len()
            ))
            .into());
        }

        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        hex::decode_to_slice(value, &mut *bytes)
            .map_err(|e| ConfigError::InvalidKey(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Load the key from `HANGAR_ENCRYPTION_KEY`, falling back to `ENCRYPTION_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if neither variable is set. Startup
    /// should abort on this error.
    pub fn from_env() -> Result<Self> {
        let value = std::env::var(KEY_ENV)
            .or_else(|_| std::env::var(LEGACY_KEY_ENV))
            .map_err(|_| ConfigError::MissingKey(KEY_ENV))?;
        let value = Zeroizing::new(value);
        Self::from_hex(&value)
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut *bytes);
        Self { bytes }
    }

    /// Hex form of the key, for printing once at `config init`.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(*self.bytes))
    }

    /// Short, non-secret identifier: the first 8 bytes of SHA-256(key).
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&*self.bytes);
        hex::encode(&digest[..8])
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_from_hex() {
        let key = MasterKey::from_hex(KEY_HEX).unwrap();
        assert_eq!(key.as_bytes()[31], 0x1f);
        assert_eq!(key.to_hex().as_str(), KEY_HEX);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            MasterKey::from_hex("abcd"),
            Err(Error::Config(ConfigError::InvalidKey(_)))
        ));
        let not_hex = "zz".repeat(KEY_LEN);
        assert!(matches!(
            MasterKey::from_hex(&not_hex),
            Err(Error::Config(ConfigError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = MasterKey::from_hex(KEY_HEX).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(KEY_HEX));
        assert!(debug.contains(&key.fingerprint()));
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(
            MasterKey::generate().fingerprint(),
            MasterKey::generate().fingerprint()
        );
    }
}
