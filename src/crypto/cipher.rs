//! AES-256-GCM authenticated encryption of individual secrets.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `open` splits the nonce back out and
//! verifies the tag before any plaintext is returned.
//!
//! Layout of a sealed token:
//!   [ 12-byte nonce | ciphertext | 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key as AesKey, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::keystore::Key;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Opaque output of `AuthenticatedCipher::seal`.
///
/// Serialized as a standard base64 string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SealedToken(Vec<u8>);

impl SealedToken {
    /// Wrap raw token bytes without validating them; `open` does that.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a base64 token.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        BASE64
            .decode(encoded.trim())
            .map(Self)
            .map_err(|e| VaultError::Format(format!("invalid base64: {e}")))
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<String> for SealedToken {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_base64(&value)
    }
}

impl From<SealedToken> for String {
    fn from(token: SealedToken) -> Self {
        token.to_base64()
    }
}

impl std::fmt::Debug for SealedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SealedToken({} bytes)", self.0.len())
    }
}

/// Seals and opens secrets under a single vault key.
pub struct AuthenticatedCipher {
    cipher: Aes256Gcm,
}

impl AuthenticatedCipher {
    /// Build the cipher from the vault key.
    pub fn new(key: &Key) -> Self {
        let cipher = Aes256Gcm::new(AesKey::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt and authenticate `plaintext` under a fresh random nonce.
    pub fn seal(&self, plaintext: &str) -> Result<SealedToken> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| VaultError::Encryption(e.to_string()))?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(SealedToken(output))
    }

    /// Verify and decrypt a token produced by `seal`.
    ///
    /// Fails with `Format` when the token is too short to hold a nonce
    /// and tag, and with `Integrity` when authentication fails.
    pub fn open(&self, token: &SealedToken) -> Result<String> {
        let bytes = token.as_bytes();
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(VaultError::Format(format!(
                "token is {} bytes, need at least {}",
                bytes.len(),
                NONCE_LEN + TAG_LEN
            )));
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| VaultError::Integrity)?;

        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::Format("plaintext is not valid UTF-8".into())
        })
    }
}
