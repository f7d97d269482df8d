//! Channel lifecycle handlers. Each one forwards to the [`Tracker`] with
//! the session's current nick.
//!
//! [`Tracker`]: crate::tracker::Tracker

use super::{Context, Handler, HandlerResult};
use crate::proto::Message;

/// Handler for JOIN.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.tracker.on_join(ctx.negotiation.current_nick(), msg)?;
        Ok(())
    }
}

/// Handler for PART.
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.tracker.on_part(ctx.negotiation.current_nick(), msg)?;
        Ok(())
    }
}

/// Handler for KICK.
pub struct KickHandler;

impl Handler for KickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.tracker.on_kick(ctx.negotiation.current_nick(), msg)?;
        Ok(())
    }
}

/// Handler for QUIT.
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.tracker.on_quit(msg)?;
        Ok(())
    }
}

/// Handler for TOPIC.
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.tracker.on_topic(msg)?;
        Ok(())
    }
}

/// Handler for RPL_TOPIC (332).
pub struct TopicReplyHandler;

impl Handler for TopicReplyHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.tracker.on_topic_reply(msg)?;
        Ok(())
    }
}

/// Handler for RPL_NAMREPLY (353).
pub struct NamesReplyHandler;

impl Handler for NamesReplyHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let prefixes = ctx.isupport.membership_prefixes();
        ctx.tracker
            .on_names_reply(ctx.negotiation.current_nick(), prefixes.as_deref(), msg)?;
        Ok(())
    }
}
