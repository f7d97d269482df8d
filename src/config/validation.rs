//! Configuration validation.
//!
//! Catches configurations the server would reject anyway, before connecting.

use super::SessionConfig;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("nick is required")]
    MissingNick,
    #[error("nick must not contain spaces, got '{0}'")]
    InvalidNick(String),
    #[error("capability name must not be empty")]
    EmptyCapability,
    #[error("capability '{0}' is requested more than once")]
    DuplicateCapability(String),
    #[error("nickserv.password must not be empty")]
    EmptyNickServPassword,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &SessionConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if config.nick.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidNick(config.nick.clone()));
    }

    let mut seen = std::collections::HashSet::new();
    for cap in &config.capabilities {
        if cap.name.trim().is_empty() {
            errors.push(ValidationError::EmptyCapability);
        } else if !seen.insert(cap.name.as_str()) {
            errors.push(ValidationError::DuplicateCapability(cap.name.clone()));
        }
    }

    if config.nickserv.as_ref().is_some_and(|ns| ns.password.is_empty()) {
        errors.push(ValidationError::EmptyNickServPassword);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
