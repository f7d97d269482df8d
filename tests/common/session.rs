//! Session harness for integration tests.

use slirc_client::{HandlerResult, Message, Session, SessionConfig};
use tokio::sync::mpsc;

/// A session plus the receiving end of its outbound channel.
pub struct TestSession {
    pub session: Session,
    outbound: mpsc::UnboundedReceiver<Message>,
}

#[allow(dead_code)]
impl TestSession {
    /// Build a session without sending the registration burst.
    pub fn new(config: SessionConfig) -> Self {
        let (tx, outbound) = mpsc::unbounded_channel();
        Self {
            session: Session::new(config, tx),
            outbound,
        }
    }

    /// Build a session and send the registration burst, discarding it.
    pub fn started(config: SessionConfig) -> Self {
        let mut this = Self::new(config);
        this.session.start().expect("registration burst");
        this.sent();
        this
    }

    /// Build a registered session that has joined `channels`.
    pub fn joined(nick: &str, channels: &[&str]) -> Self {
        let mut this = Self::started(SessionConfig::new(nick));
        this.feed_ok(&format!(":irc.test 001 {nick} :Welcome"));
        for channel in channels {
            this.feed_ok(&format!(":{nick}!u@host JOIN :{channel}"));
        }
        this.sent();
        this
    }

    /// Parse and process one raw server line.
    pub fn feed(&mut self, line: &str) -> HandlerResult {
        let msg: Message = line.parse().expect("test line should parse");
        self.session.process_message(&msg)
    }

    /// Process a line that must be accepted.
    pub fn feed_ok(&mut self, line: &str) {
        if let Err(e) = self.feed(line) {
            panic!("{line:?} was rejected: {e}");
        }
    }

    /// Everything queued for the server since the last call, serialized.
    pub fn sent(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(msg) = self.outbound.try_recv() {
            lines.push(msg.to_string());
        }
        lines
    }

    /// Sorted member list of a tracked channel.
    pub fn members(&self, channel: &str) -> Vec<String> {
        let state = self
            .session
            .tracker()
            .channel(channel)
            .unwrap_or_else(|| panic!("{channel} is not tracked"));
        state.sorted_users().into_iter().map(String::from).collect()
    }
}
