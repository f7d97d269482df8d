//! The per-connection session.
//!
//! A `Session` owns everything the dispatch path mutates: negotiation state,
//! the ISUPPORT table, the handler registry and the outbound sender. The
//! channel tracker is shared behind an `Arc` so other tasks can query it
//! while messages are being processed.
//!
//! ```
//! use slirc_client::{Message, Session, SessionConfig};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let mut session = Session::new(SessionConfig::new("bot"), tx);
//! session.start().unwrap();
//!
//! let welcome: Message = ":irc.example.org 001 bot :Welcome".parse().unwrap();
//! session.process_message(&welcome).unwrap();
//! assert!(session.is_connected());
//!
//! let join: Message = ":bot!b@host JOIN :#rust".parse().unwrap();
//! session.process_message(&join).unwrap();
//! assert_eq!(session.tracker().list_channels(), vec!["#rust"]);
//! # while rx.try_recv().is_ok() {}
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::HandlerResult;
use crate::handlers::{Context, Registry};
use crate::negotiation::{NegotiationState, NegotiationStatus};
use crate::proto::{ISupport, Message};
use crate::tracker::Tracker;

/// Session state for one server connection.
pub struct Session {
    config: SessionConfig,
    negotiation: NegotiationState,
    tracker: Arc<Tracker>,
    isupport: ISupport,
    sender: mpsc::UnboundedSender<Message>,
    pongs: Option<mpsc::Sender<String>>,
    registry: Registry,
}

impl Session {
    /// Create a session that writes outbound messages to `sender`.
    pub fn new(config: SessionConfig, sender: mpsc::UnboundedSender<Message>) -> Self {
        let negotiation = NegotiationState::new(config.nick.as_str());
        Self {
            config,
            negotiation,
            tracker: Arc::new(Tracker::new()),
            isupport: ISupport::new(),
            sender,
            pongs: None,
            registry: Registry::new(),
        }
    }

    /// Send the registration burst: PASS, the CAP requests, NICK and USER.
    pub fn start(&mut self) -> HandlerResult {
        if let Some(ref password) = self.config.password {
            self.sender.send(Message::new("PASS", [password.as_str()]))?;
        }

        for msg in self.negotiation.begin(&self.config.capabilities) {
            self.sender.send(msg)?;
        }

        self.sender
            .send(Message::nick(self.negotiation.current_nick()))?;
        self.sender.send(Message::new(
            "USER",
            [
                self.config.username(),
                "0.0.0.0",
                "0.0.0.0",
                self.config.realname.as_str(),
            ],
        ))?;

        debug!(nick = %self.negotiation.current_nick(), "Sent registration");
        Ok(())
    }

    /// Route one inbound message to its handler.
    ///
    /// Errors are returned to the caller unchanged; use
    /// [`HandlerError::is_fatal`](crate::HandlerError::is_fatal) to decide
    /// whether to drop the connection.
    pub fn process_message(&mut self, msg: &Message) -> HandlerResult {
        let mut ctx = Context {
            negotiation: &mut self.negotiation,
            tracker: &self.tracker,
            isupport: &mut self.isupport,
            config: &self.config,
            sender: &self.sender,
            pongs: self.pongs.as_ref(),
        };

        let result = self.registry.dispatch(&mut ctx, msg);
        if let Err(ref e) = result {
            debug!(
                command = %msg.command,
                error = %e,
                code = e.error_code(),
                "Message rejected"
            );
        }
        result
    }

    /// Register a delivery point for PONG payloads.
    ///
    /// The channel holds a single payload; further PONGs are dropped until
    /// the receiver takes it. Calling this again replaces the previous
    /// receiver.
    pub fn subscribe_pongs(&mut self) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(1);
        self.pongs = Some(tx);
        rx
    }

    /// Shared handle to the channel tracker.
    pub fn tracker(&self) -> Arc<Tracker> {
        Arc::clone(&self.tracker)
    }

    pub fn current_nick(&self) -> &str {
        self.negotiation.current_nick()
    }

    pub fn is_connected(&self) -> bool {
        self.negotiation.is_connected()
    }

    pub fn negotiation(&self) -> &NegotiationState {
        &self.negotiation
    }

    pub fn negotiation_status(&self) -> &NegotiationStatus {
        self.negotiation.status()
    }

    pub fn isupport(&self) -> &ISupport {
        &self.isupport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Dispatch counts per command, most used first.
    pub fn command_stats(&self) -> Vec<(&'static str, u64)> {
        self.registry.get_command_stats()
    }
}
