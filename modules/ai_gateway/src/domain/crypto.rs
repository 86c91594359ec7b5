//! Encryption of provider keys at rest
//!
//! AES-256-GCM with a key derived from the configured secret by SHA-256.
//! Stored form is `v1:<base64 nonce>:<base64 ciphertext>`.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

const VERSION: &str = "v1";
const NONCE_LEN: usize = 12;

pub struct KeyCipher {
    cipher: Aes256Gcm,
}

impl KeyCipher {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.trim().is_empty() {
            bail!("ai.encryption_secret must be set");
        }
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| anyhow!("key encryption failed"))?;

        Ok(format!(
            "{}:{}:{}",
            VERSION,
            STANDARD.encode(nonce),
            STANDARD.encode(ciphertext)
        ))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String> {
        let mut parts = stored.splitn(3, ':');
        let (Some(version), Some(nonce), Some(ciphertext)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("malformed encrypted key");
        };
        if version != VERSION {
            bail!("unsupported encrypted key version '{}'", version);
        }

        let nonce = STANDARD.decode(nonce).context("invalid nonce encoding")?;
        if nonce.len() != NONCE_LEN {
            bail!("invalid nonce length {}", nonce.len());
        }
        let ciphertext = STANDARD.decode(ciphertext).context("invalid ciphertext encoding")?;

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
            .map_err(|_| anyhow!("key decryption failed"))?;
        String::from_utf8(plaintext).context("decrypted key is not UTF-8")
    }
}

/// Last four characters of a key, for display
pub fn key_hint(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}
