//! CAP replies during registration.
//!
//! Only LS, ACK and NAK move negotiation forward. Replies are ignored once
//! every expected response has been counted, and so are replies too short to
//! carry a capability list (`CAP <target> <subcommand> :<caps>`).

use std::collections::HashMap;

use tracing::debug;

use super::{Context, Handler, HandlerResult};
use crate::error::NegotiationError;
use crate::negotiation::NegotiationState;
use crate::proto::Message;

type SubcommandHandler = fn(&mut NegotiationState, &str) -> Result<(), NegotiationError>;

fn handle_ls(state: &mut NegotiationState, caps: &str) -> Result<(), NegotiationError> {
    state.on_ls(caps);
    Ok(())
}

fn handle_ack(state: &mut NegotiationState, caps: &str) -> Result<(), NegotiationError> {
    state.on_ack(caps);
    Ok(())
}

fn handle_nak(state: &mut NegotiationState, caps: &str) -> Result<(), NegotiationError> {
    state.on_nak(caps)
}

/// Handler for CAP.
pub struct CapHandler {
    subcommands: HashMap<&'static str, SubcommandHandler>,
}

impl CapHandler {
    pub fn new() -> Self {
        let mut subcommands: HashMap<&'static str, SubcommandHandler> = HashMap::new();
        subcommands.insert("LS", handle_ls);
        subcommands.insert("ACK", handle_ack);
        subcommands.insert("NAK", handle_nak);
        Self { subcommands }
    }
}

impl Default for CapHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for CapHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if !ctx.negotiation.awaiting_cap_replies() || msg.params.len() < 3 {
            return Ok(());
        }

        let subcommand = msg.params[1].to_ascii_uppercase();
        let caps = msg.trailing().unwrap_or_default();

        match self.subcommands.get(subcommand.as_str()) {
            Some(handler) => handler(&mut *ctx.negotiation, caps)?,
            None => debug!(subcommand = %subcommand, "Ignoring CAP subcommand"),
        }

        match ctx.negotiation.finish_if_done() {
            Some(Ok(())) => {
                debug!("Capability negotiation complete");
                ctx.send(Message::cap("END", None))
            }
            Some(Err(e)) => Err(e.into()),
            None => Ok(()),
        }
    }
}
