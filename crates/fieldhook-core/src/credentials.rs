//! Credential decryption for stored bot tokens.
//!
//! Encrypted values are base64 of a 12-byte nonce followed by the
//! AES-256-GCM ciphertext.

use crate::error::HookError;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const NONCE_LEN: usize = 12;

/// Turns a stored credential into its plaintext
pub trait CredentialStore: Send + Sync {
    fn decrypt(&self, encrypted: &str) -> Result<String, HookError>;
}

/// Credentials stored as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialStore for PlaintextCredentials {
    fn decrypt(&self, encrypted: &str) -> Result<String, HookError> {
        Ok(encrypted.to_string())
    }
}

/// AES-256-GCM encrypted credentials
pub struct AesGcmCredentials {
    cipher: Aes256Gcm,
}

impl AesGcmCredentials {
    /// Create from a base64-encoded 32-byte key
    pub fn new(key_b64: &str) -> Result<Self, HookError> {
        let key = STANDARD
            .decode(key_b64.trim())
            .map_err(|e| HookError::CredentialError(format!("invalid key encoding: {}", e)))?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|_| HookError::CredentialError("key must be 32 bytes".to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypt a credential for storage
    pub fn encrypt(&self, plaintext: &str) -> Result<String, HookError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| HookError::CredentialError("encryption failed".to_string()))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }
}

impl CredentialStore for AesGcmCredentials {
    fn decrypt(&self, encrypted: &str) -> Result<String, HookError> {
        let sealed = STANDARD
            .decode(encrypted.trim())
            .map_err(|e| HookError::CredentialError(format!("invalid encoding: {}", e)))?;
        if sealed.len() <= NONCE_LEN {
            return Err(HookError::CredentialError("ciphertext too short".to_string()));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| HookError::CredentialError("decryption failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| HookError::CredentialError("credential is not UTF-8".to_string()))
    }
}
