//! PING and PONG handlers.

use tracing::trace;

use super::{Context, Handler, HandlerResult};
use crate::proto::Message;

/// Handler for PING: echo the parameters back as PONG.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let pong = Message {
            prefix: None,
            command: "PONG".to_string(),
            params: msg.params.clone(),
        };
        ctx.send(pong)
    }
}

/// Handler for PONG: hand the payload to whoever is waiting for it.
///
/// The handoff never blocks. If the delivery slot is full, or nobody is
/// listening any more, the payload is dropped.
pub struct PongHandler;

impl Handler for PongHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Some(pongs) = ctx.pongs else {
            return Ok(());
        };

        let payload = msg.trailing().unwrap_or_default().to_string();
        if let Err(e) = pongs.try_send(payload) {
            trace!(error = %e, "Dropped PONG payload");
        }
        Ok(())
    }
}
