//! Registration handshake and capability negotiation state.
//!
//! This is sans-IO: methods take the pieces of an inbound message they care
//! about, update state, and hand back whatever needs to go out. The CAP
//! handlers in [`crate::handlers`] do the sending.
//!
//! # Response accounting
//!
//! `remaining_responses` counts capability-protocol replies, not capability
//! names: one for the LS reply and one per `CAP REQ` issued. A single ACK
//! naming three capabilities is one response. When the count reaches zero
//! negotiation is over and every required capability must be enabled.
//!
//! # Nickname collisions
//!
//! Before the welcome reply each 433/437 appends `_` and retries. There is no
//! retry limit; a server that rejects every variant keeps the session
//! retrying until the owner gives up on the connection.

mod caps;

pub use caps::{Capability, CapabilityTable};

use tracing::debug;

use crate::config::CapabilityRequest;
use crate::error::NegotiationError;
use crate::proto::{CaseMapping, Message};

/// Where capability negotiation stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NegotiationStatus {
    /// Nothing was requested, so there is nothing to negotiate.
    #[default]
    Idle,
    /// Waiting for LS/ACK/NAK replies.
    Pending,
    /// `CAP END` was emitted.
    Complete,
    /// The named required capability was rejected or never enabled.
    Failed(String),
}

/// Handshake state owned by a session.
#[derive(Clone, Debug)]
pub struct NegotiationState {
    current_nick: String,
    connected: bool,
    caps: CapabilityTable,
    remaining_responses: i32,
    status: NegotiationStatus,
    casemapping: CaseMapping,
}

impl NegotiationState {
    /// Fresh state for a connection that will register as `nick`.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            current_nick: nick.into(),
            connected: false,
            caps: CapabilityTable::new(),
            remaining_responses: 0,
            status: NegotiationStatus::Idle,
            casemapping: CaseMapping::default(),
        }
    }

    /// Nickname the server currently knows us by (or the one being tried).
    pub fn current_nick(&self) -> &str {
        &self.current_nick
    }

    /// Case-insensitive "is this us" check, under the server's case mapping.
    pub fn is_current_nick(&self, nick: &str) -> bool {
        self.casemapping.names_eq(&self.current_nick, nick)
    }

    /// Follow a `CASEMAPPING` advertisement.
    pub fn set_casemapping(&mut self, casemapping: CaseMapping) {
        self.casemapping = casemapping;
    }

    /// Set once the welcome reply arrives; never cleared.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.caps
    }

    pub fn remaining_responses(&self) -> i32 {
        self.remaining_responses
    }

    pub fn status(&self) -> &NegotiationStatus {
        &self.status
    }

    /// Whether inbound CAP replies still count toward negotiation.
    pub fn awaiting_cap_replies(&self) -> bool {
        self.remaining_responses > 0 && self.status == NegotiationStatus::Pending
    }

    /// Record the capability requests and build the CAP burst.
    ///
    /// Returns `CAP LS` followed by one `CAP REQ` per capability, or nothing
    /// when `requests` is empty.
    pub fn begin(&mut self, requests: &[CapabilityRequest]) -> Vec<Message> {
        if requests.is_empty() {
            return Vec::new();
        }

        let mut burst = vec![Message::cap("LS", None)];
        for request in requests {
            let cap = self.caps.entry(&request.name);
            cap.requested = true;
            cap.required |= request.required;
            burst.push(Message::cap("REQ", Some(&request.name)));
        }

        // The LS reply counts as one response.
        self.remaining_responses = 1 + requests.len() as i32;
        self.status = NegotiationStatus::Pending;
        debug!(
            requested = requests.len(),
            remaining = self.remaining_responses,
            "Starting capability negotiation"
        );
        burst
    }

    /// CAP LS: mark every listed capability available.
    pub fn on_ls(&mut self, names: &str) {
        for token in names.split_whitespace() {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (token, None),
            };
            let cap = self.caps.entry(name);
            cap.available = true;
            if value.is_some() {
                cap.value = value;
            }
        }
        self.remaining_responses -= 1;
    }

    /// CAP ACK: mark every listed capability enabled. A `-name` entry
    /// acknowledges a removal.
    pub fn on_ack(&mut self, names: &str) {
        for token in names.split_whitespace() {
            match token.strip_prefix('-') {
                Some(name) => self.caps.entry(name).enabled = false,
                None => {
                    let cap = self.caps.entry(token);
                    cap.enabled = true;
                    cap.available = true;
                }
            }
        }
        self.remaining_responses -= 1;
    }

    /// CAP NAK: fails immediately if any listed capability is required,
    /// otherwise counts as one response.
    pub fn on_nak(&mut self, names: &str) -> Result<(), NegotiationError> {
        if let Some(name) = names
            .split_whitespace()
            .find(|name| self.caps.is_required(name))
        {
            self.status = NegotiationStatus::Failed(name.to_string());
            return Err(NegotiationError::Rejected(name.to_string()));
        }
        self.remaining_responses -= 1;
        Ok(())
    }

    /// Close negotiation if every expected response has arrived.
    ///
    /// Returns `None` while replies are outstanding (or negotiation is not
    /// pending), `Some(Ok(()))` when `CAP END` should be sent, and
    /// `Some(Err(_))` naming a required capability that was never enabled.
    pub fn finish_if_done(&mut self) -> Option<Result<(), NegotiationError>> {
        if self.status != NegotiationStatus::Pending || self.remaining_responses > 0 {
            return None;
        }

        if let Some(name) = self.caps.first_missing_required() {
            let name = name.to_string();
            self.status = NegotiationStatus::Failed(name.clone());
            return Some(Err(NegotiationError::NotAccepted(name)));
        }

        self.status = NegotiationStatus::Complete;
        Some(Ok(()))
    }

    /// RPL_WELCOME: the server-confirmed nick becomes current.
    pub fn on_welcome(&mut self, nick: &str) {
        self.current_nick = nick.to_string();
        self.connected = true;
    }

    /// 433/437 during registration: returns the next nick to try.
    ///
    /// After the welcome reply collisions are left to the application and
    /// this returns `None`.
    pub fn on_nick_collision(&mut self) -> Option<&str> {
        if self.connected {
            return None;
        }
        self.current_nick.push('_');
        Some(&self.current_nick)
    }

    /// Server-echoed NICK: follow it when the old nick is ours.
    pub fn on_nick_change(&mut self, old: &str, new: &str) -> bool {
        if !self.is_current_nick(old) {
            return false;
        }
        self.current_nick = new.to_string();
        true
    }
}
