//! AES-256-CBC text encryption under a passphrase-derived key.
//!
//! # Envelope format
//!
//! ```text
//! base64(IV || ciphertext)
//! ```
//!
//! A fresh random 16-byte IV is generated for every encryption and travels
//! with the ciphertext so decryption can recover it. The IV is not secret.
//!
//! CBC with PKCS7 padding carries no integrity protection: a tampered
//! ciphertext is detected only by the padding check, which is probabilistic.
//! TODO: layer an HMAC over `IV || ciphertext` before transport.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Cipher block and IV length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Minimum length of the secret passphrase in characters.
pub const MIN_SECRET_CHARS: usize = 32;

/// The configured secret is too short to derive a key from.
#[derive(Debug, Error)]
#[error("encryption secret must be at least {MIN_SECRET_CHARS} characters")]
pub struct WeakSecret;

/// Errors surfaced by [`CipherService`] per-request operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The caller supplied an empty or malformed payload.
    #[error("invalid input: {0}")]
    Input(&'static str),

    /// Decryption failed. Deliberately opaque: wrong key, corrupted
    /// ciphertext, and bad padding are indistinguishable to the caller.
    #[error("decryption failed")]
    Crypto,
}

/// Symmetric text cipher. Holds a 256-bit key derived once from the
/// configured secret; stateless after construction, safe to share across
/// concurrent requests. A fresh cipher transform is built per call.
pub struct CipherService {
    key: [u8; 32],
}

impl std::fmt::Debug for CipherService {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherService").finish_non_exhaustive()
    }
}

impl CipherService {
    /// Derive the key from the secret passphrase. Fails when the secret is
    /// shorter than [`MIN_SECRET_CHARS`]; that is the only safeguard
    /// against a trivially weak key.
    pub fn new(secret: &str) -> Result<Self, WeakSecret> {
        if secret.chars().count() < MIN_SECRET_CHARS {
            return Err(WeakSecret);
        }

        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        Ok(Self { key })
    }

    /// Encrypt `text` into a transport-safe envelope.
    ///
    /// Two calls with the same plaintext produce different envelopes: the
    /// IV is drawn fresh from the OS CSPRNG on every call.
    pub fn encrypt(&self, text: &str) -> Result<String, CipherError> {
        if text.is_empty() {
            return Err(CipherError::Input("text cannot be empty"));
        }

        let mut iv = [0u8; BLOCK_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(text.as_bytes());

        let mut payload = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
        payload.extend_from_slice(&iv);
        payload.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(payload))
    }

    /// Decrypt an envelope produced by [`encrypt`](Self::encrypt) back to
    /// the original text.
    pub fn decrypt(&self, envelope: &str) -> Result<String, CipherError> {
        if envelope.is_empty() {
            return Err(CipherError::Input("envelope cannot be empty"));
        }

        let payload = BASE64
            .decode(envelope)
            .map_err(|_| CipherError::Input("envelope is not valid base64"))?;

        // One IV block plus at least one cipher block.
        if payload.len() < BLOCK_LEN * 2 {
            return Err(CipherError::Input("envelope is too short"));
        }

        let (iv, ciphertext) = payload.split_at(BLOCK_LEN);

        let plaintext = Aes256CbcDec::new_from_slices(&self.key, iv)
            .map_err(|_| CipherError::Crypto)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::Crypto)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Crypto)
    }
}
