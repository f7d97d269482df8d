//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_realname, default_services_nick};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything a session needs to register with a server.
///
/// ```toml
/// nick = "bot"
/// user = "bot"
/// realname = "A friendly bot"
///
/// [nickserv]
/// password = "hunter2"
///
/// [[capabilities]]
/// name = "sasl"
/// required = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Desired nickname. Collisions during registration append `_`.
    pub nick: String,
    /// Username (ident). Defaults to the nickname.
    #[serde(default)]
    pub user: Option<String>,
    /// Real name / GECOS.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Server password sent with PASS.
    #[serde(default)]
    pub password: Option<String>,
    /// Identify to network services after the welcome reply.
    #[serde(default)]
    pub nickserv: Option<NickServConfig>,
    /// Capabilities to request during registration.
    #[serde(default)]
    pub capabilities: Vec<CapabilityRequest>,
}

/// Network services identification.
#[derive(Debug, Clone, Deserialize)]
pub struct NickServConfig {
    /// Services agent to message.
    #[serde(default = "default_services_nick")]
    pub nick: String,
    pub password: String,
}

/// One capability to request with CAP REQ.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CapabilityRequest {
    pub name: String,
    /// Abort the session if the server does not enable it.
    #[serde(default)]
    pub required: bool,
}

impl CapabilityRequest {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
        }
    }
}

impl SessionConfig {
    /// Minimal configuration: a nickname and nothing else.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            user: None,
            realname: default_realname(),
            password: None,
            nickserv: None,
            capabilities: Vec::new(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Username to send with USER.
    pub fn username(&self) -> &str {
        self.user.as_deref().unwrap_or(&self.nick)
    }

    /// Add a capability request.
    #[must_use]
    pub fn with_capability(mut self, name: impl Into<String>, required: bool) -> Self {
        self.capabilities.push(CapabilityRequest::new(name, required));
        self
    }

    /// Configure NickServ identification with the default services nick.
    #[must_use]
    pub fn with_nickserv_password(mut self, password: impl Into<String>) -> Self {
        self.nickserv = Some(NickServConfig {
            nick: default_services_nick(),
            password: password.into(),
        });
        self
    }
}
