//! slirc-client - IRC client session state.
//!
//! Consumes parsed server messages and keeps two pieces of state in step:
//!
//! - registration: capability negotiation (CAP LS/REQ/ACK/NAK/END), nickname
//!   collision retry, NickServ identification, PING/PONG;
//! - channels: topics and member lists of every joined channel, readable
//!   from other threads while messages are being processed.
//!
//! Socket I/O and line framing are left to the caller: feed each inbound
//! [`Message`] to [`Session::process_message`] and write whatever arrives on
//! the outbound channel.

pub mod config;
pub mod error;
pub mod handlers;
pub mod negotiation;
pub mod proto;
pub mod session;
pub mod tracker;

pub use config::{CapabilityRequest, ConfigError, NickServConfig, SessionConfig};
pub use error::{HandlerError, HandlerResult, NegotiationError, TrackerError};
pub use negotiation::{Capability, CapabilityTable, NegotiationState, NegotiationStatus};
pub use proto::{CaseMapping, ISupport, Message, MessageParseError, Prefix};
pub use session::Session;
pub use tracker::{ChannelState, Tracker};
