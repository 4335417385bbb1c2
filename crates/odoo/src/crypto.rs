//! Credential encryption at rest.
//!
//! Odoo passwords are stored AES-256-GCM encrypted. The key is derived
//! from the deployment's credential passphrase; each encryption uses a
//! fresh random nonce, prepended to the ciphertext, and the blob is
//! base64-url encoded for storage in a text column.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Credential encryption errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed.
    #[error("Credential encryption failed")]
    Encrypt,

    /// Decryption failed (wrong key or corrupted blob).
    #[error("Credential decryption failed; wrong key or corrupted value")]
    Decrypt,

    /// The stored value is not a valid nonce-prefixed blob.
    #[error("Stored credential is malformed")]
    Malformed,
}

/// Symmetric cipher for credentials.
#[derive(Clone)]
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher").finish_non_exhaustive()
    }
}

impl CredentialCipher {
    /// Derives the cipher from a passphrase (SHA-256 of the passphrase is
    /// the AES key).
    #[must_use]
    pub fn new(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypts a plaintext credential for storage.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encrypt` on cipher failure.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut blob = nonce.to_vec();
        blob.extend_from_slice(&ciphertext);
        Ok(base64_url::encode(&blob))
    }

    /// Decrypts a stored credential.
    ///
    /// # Errors
    ///
    /// `CryptoError::Malformed` for undecodable blobs and
    /// `CryptoError::Decrypt` for wrong-key or tampered values.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let blob = base64_url::decode(encoded).map_err(|_| CryptoError::Malformed)?;
        if blob.len() <= NONCE_LEN {
            return Err(CryptoError::Malformed);
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let cipher = CredentialCipher::new("deployment-secret");
        let encoded = cipher.encrypt("odoo-password").unwrap();
        assert_eq!(cipher.decrypt(&encoded).unwrap(), "odoo-password");
    }

    #[test]
    fn test_random_nonce_per_encryption() {
        let cipher = CredentialCipher::new("deployment-secret");
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let encoded = CredentialCipher::new("key-a").encrypt("secret").unwrap();
        assert_eq!(
            CredentialCipher::new("key-b").decrypt(&encoded),
            Err(CryptoError::Decrypt)
        );
    }

    #[test]
    fn test_malformed_blob_fails() {
        let cipher = CredentialCipher::new("key");
        assert_eq!(cipher.decrypt("@@@"), Err(CryptoError::Malformed));
        assert_eq!(cipher.decrypt("c2hvcnQ"), Err(CryptoError::Malformed));
    }
}
