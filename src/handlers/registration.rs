//! Handshake-phase handlers: welcome, ISUPPORT, nickname tracking.

use tracing::{debug, info};

use super::{Context, Handler, HandlerError, HandlerResult};
use crate::proto::Message;

/// Handler for RPL_WELCOME (001).
///
/// Records the nick the server registered us under and, if configured,
/// identifies to NickServ.
pub struct WelcomeHandler;

impl Handler for WelcomeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let nick = msg.arg(0).ok_or(HandlerError::Malformed("RPL_WELCOME"))?;
        ctx.negotiation.on_welcome(nick);
        info!(nick = %nick, "Registered with server");

        if let Some(ref nickserv) = ctx.config.nickserv {
            debug!(services = %nickserv.nick, "Identifying to services");
            ctx.send(Message::privmsg(
                nickserv.nick.as_str(),
                format!("IDENTIFY {}", nickserv.password),
            ))?;
        }
        Ok(())
    }
}

/// Handler for RPL_ISUPPORT (005).
///
/// Merges the tokens and applies any change of `CASEMAPPING` to both the
/// nick checks and the tracker.
pub struct IsupportHandler;

impl Handler for IsupportHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.isupport.merge_reply(&msg.params);

        let casemapping = ctx.isupport.casemapping();
        if casemapping != ctx.tracker.casemapping() {
            debug!(?casemapping, "Server case mapping");
            ctx.negotiation.set_casemapping(casemapping);
            ctx.tracker.set_casemapping(casemapping);
        }
        Ok(())
    }
}

/// Handler for ERR_NICKNAMEINUSE (433) and ERR_UNAVAILRESOURCE (437).
///
/// During registration, retries with `_` appended; afterwards the
/// application decides what to do.
pub struct NickCollisionHandler;

impl Handler for NickCollisionHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        let Some(next) = ctx.negotiation.on_nick_collision().map(str::to_string) else {
            return Ok(());
        };
        debug!(nick = %next, "Nickname unavailable, retrying");
        ctx.send(Message::nick(next))
    }
}

/// Handler for NICK: follows our own renames and updates channel membership.
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if let (Some(old), Some(new)) = (msg.source_nickname(), msg.arg(0)) {
            if ctx.negotiation.on_nick_change(old, new) {
                debug!(old = %old, new = %new, "Nickname changed");
            }
        }

        ctx.tracker.on_nick(msg)?;
        Ok(())
    }
}
