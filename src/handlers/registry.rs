//! Command handler registry and dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use super::{
    CapHandler, Context, Handler, HandlerResult, IsupportHandler, JoinHandler, KickHandler,
    NamesReplyHandler, NickCollisionHandler, NickHandler, PartHandler, PingHandler, PongHandler,
    QuitHandler, TopicHandler, TopicReplyHandler, WelcomeHandler,
};
use crate::proto::Message;
use crate::proto::numeric::{
    ERR_NICKNAMEINUSE, ERR_UNAVAILRESOURCE, RPL_ISUPPORT, RPL_NAMREPLY, RPL_TOPIC, RPL_WELCOME,
};

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    /// Per-command dispatch counters.
    command_counts: HashMap<&'static str, AtomicU64>,
}

impl Registry {
    /// Create a registry with every handler registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Registration
        handlers.insert(RPL_WELCOME, Box::new(WelcomeHandler));
        handlers.insert(RPL_ISUPPORT, Box::new(IsupportHandler));
        handlers.insert(ERR_NICKNAMEINUSE, Box::new(NickCollisionHandler));
        handlers.insert(ERR_UNAVAILRESOURCE, Box::new(NickCollisionHandler));
        handlers.insert("CAP", Box::new(CapHandler::new()));
        handlers.insert("NICK", Box::new(NickHandler));

        // Keepalive
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("PONG", Box::new(PongHandler));

        // Channel tracking
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));
        handlers.insert("KICK", Box::new(KickHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));
        handlers.insert("TOPIC", Box::new(TopicHandler));
        handlers.insert(RPL_TOPIC, Box::new(TopicReplyHandler));
        handlers.insert(RPL_NAMREPLY, Box::new(NamesReplyHandler));

        let command_counts = handlers
            .keys()
            .map(|&cmd| (cmd, AtomicU64::new(0)))
            .collect();

        Self {
            handlers,
            command_counts,
        }
    }

    /// Commands dispatched at least once, most used first.
    pub fn get_command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (*cmd, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    /// Dispatch a message to its handler. Commands without a handler are
    /// ignored.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let cmd_name = msg.command.to_ascii_uppercase();

        let Some((&key, handler)) = self.handlers.get_key_value(cmd_name.as_str()) else {
            trace!(command = %cmd_name, "No handler registered");
            return Ok(());
        };

        if let Some(counter) = self.command_counts.get(key) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        handler.handle(ctx, msg)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
