//! Error types for the session layer.
//!
//! Tracker and negotiation handlers return their own error enums; the
//! dispatch layer wraps them in [`HandlerError`] and leaves the decision of
//! what is fatal to the owning session.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::proto::Message;

/// Channel/user tracking failures. None of them are fatal, and none of them
/// leave partial state behind: shape checks run before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("malformed {command} message")]
    Malformed { command: &'static str },

    #[error("received {command} for unknown channel {channel}")]
    UnknownChannel {
        command: &'static str,
        channel: String,
    },

    #[error("server feature table has no membership prefix map")]
    MissingPrefixMap,
}

/// Capability negotiation failures. Both abort the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    #[error("CAP {0} requested but was rejected")]
    Rejected(String),

    #[error("CAP {0} requested but not accepted")]
    NotAccepted(String),
}

impl NegotiationError {
    /// The capability that caused the failure.
    pub fn capability(&self) -> &str {
        match self {
            Self::Rejected(cap) | Self::NotAccepted(cap) => cap,
        }
    }
}

/// Errors surfaced by [`Registry::dispatch`](crate::handlers::Registry::dispatch).
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error("malformed {0} message")]
    Malformed(&'static str),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),
}

impl HandlerError {
    /// Whether the owning session should tear the connection down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Negotiation(_) | Self::Send(_))
    }

    /// Static label for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Tracker(TrackerError::Malformed { .. }) | Self::Malformed(_) => "malformed",
            Self::Tracker(TrackerError::UnknownChannel { .. }) => "unknown_channel",
            Self::Tracker(TrackerError::MissingPrefixMap) => "missing_prefix_map",
            Self::Negotiation(NegotiationError::Rejected(_)) => "cap_rejected",
            Self::Negotiation(NegotiationError::NotAccepted(_)) => "cap_not_accepted",
            Self::Send(_) => "send_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
