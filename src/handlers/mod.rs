//! Inbound message handlers.
//!
//! Each handler covers one command. The [`Registry`] maps command names to
//! handlers; CAP has a second table for its subcommands. Handlers run on the
//! single dispatch path and mutate session state through a [`Context`].

mod cap;
mod channel;
mod keepalive;
mod registration;
mod registry;

pub use cap::CapHandler;
pub use channel::{
    JoinHandler, KickHandler, NamesReplyHandler, PartHandler, QuitHandler, TopicHandler,
    TopicReplyHandler,
};
pub use keepalive::{PingHandler, PongHandler};
pub use registration::{IsupportHandler, NickCollisionHandler, NickHandler, WelcomeHandler};
pub use registry::Registry;

use tokio::sync::mpsc;

use crate::config::SessionConfig;
pub use crate::error::{HandlerError, HandlerResult};
use crate::negotiation::NegotiationState;
use crate::proto::{ISupport, Message};
use crate::tracker::Tracker;

/// Session state a handler may touch.
pub struct Context<'a> {
    /// Handshake and capability state.
    pub negotiation: &'a mut NegotiationState,
    /// Channel/user tracker (internally locked).
    pub tracker: &'a Tracker,
    /// Server feature table.
    pub isupport: &'a mut ISupport,
    /// Session configuration.
    pub config: &'a SessionConfig,
    /// Outbound messages to the server.
    pub sender: &'a mpsc::UnboundedSender<Message>,
    /// Delivery point for PONG payloads, if anyone registered one.
    pub pongs: Option<&'a mpsc::Sender<String>>,
}

impl Context<'_> {
    /// Queue a message for the server.
    pub fn send(&self, msg: Message) -> HandlerResult {
        self.sender.send(msg)?;
        Ok(())
    }
}

/// Trait implemented by all command handlers.
pub trait Handler: Send + Sync {
    /// Handle an incoming message.
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
