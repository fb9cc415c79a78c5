//! Symmetric text encryption subsystem.
//!
//! # Data Flow
//! ```text
//! startup: config secret → cipher.rs key derivation (SHA-256, once)
//! request: text → encrypt → base64(IV || ciphertext) envelope
//!          envelope → decrypt → original text
//! ```
//!
//! # Design Decisions
//! - Key derived once at construction, immutable, never logged
//! - Fresh random IV per encryption, transported inside the envelope
//! - Decryption failures collapse to one opaque error so callers cannot
//!   distinguish bad padding from a wrong key

pub mod cipher;

pub use cipher::{CipherError, CipherService};
