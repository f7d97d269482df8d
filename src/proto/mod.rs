//! Protocol-level building blocks consumed by the session layer.
//!
//! Wire framing and transport live elsewhere; this module only carries the
//! structured message, its source prefix, case mapping, and the ISUPPORT
//! feature table.

pub mod casemap;
mod isupport;
mod message;
mod prefix;

pub use casemap::CaseMapping;
pub use isupport::{ISupport, PrefixSpec};
pub use message::{Message, MessageParseError};
pub use prefix::Prefix;

/// Numeric replies the session reacts to.
pub mod numeric {
    pub const RPL_WELCOME: &str = "001";
    pub const RPL_ISUPPORT: &str = "005";
    pub const RPL_TOPIC: &str = "332";
    pub const RPL_NAMREPLY: &str = "353";
    pub const ERR_NICKNAMEINUSE: &str = "433";
    pub const ERR_UNAVAILRESOURCE: &str = "437";
}
