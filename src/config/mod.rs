//! Session configuration.
//!
//! - [`types`]: the config structs and TOML loading
//! - [`validation`]: checks run before a session is started
//! - [`defaults`]: serde default functions

mod defaults;
mod types;
mod validation;

pub use types::{CapabilityRequest, ConfigError, NickServConfig, SessionConfig};
pub use validation::{ValidationError, validate};
