//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (bind address parses, secret long enough)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::crypto::cipher::MIN_SECRET_CHARS;

/// A single semantic configuration problem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("encryption.secret must be at least {MIN_SECRET_CHARS} characters, got {0}")]
    WeakSecret(usize),

    #[error("limits.max_text_chars must be greater than zero")]
    ZeroTextCap,
}

/// Check a deserialized config for semantic problems, collecting every
/// error rather than stopping at the first.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let secret_chars = config.encryption.secret.chars().count();
    if secret_chars < MIN_SECRET_CHARS {
        errors.push(ValidationError::WeakSecret(secret_chars));
    }

    if config.limits.max_text_chars == 0 {
        errors.push(ValidationError::ZeroTextCap);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.encryption.secret = "short".into();
        config.limits.max_text_chars = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::WeakSecret(5)));
    }
}
