//! Channel and membership tracking.
//!
//! The tracker mirrors the topic and member list of every channel the local
//! user is in. It is fed one event at a time by the session and read from
//! anywhere else through an `Arc<Tracker>`.
//!
//! A single `RwLock` covers the whole channel map. Each event handler
//! validates the message shape first, then takes the write lock for its
//! entire read-decide-write step, so readers see either the state before an
//! event or the state after it. Queries take the read lock and return owned
//! snapshots.
//!
//! Channel names and member nicks are matched under the server's case
//! mapping (RFC 1459 until `CASEMAPPING` says otherwise). Both keep the
//! spelling they were first or last seen with for display.

mod channel;

pub use channel::ChannelState;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::TrackerError;
use crate::proto::{CaseMapping, Message};

type Result<T> = std::result::Result<T, TrackerError>;

/// Live channel/user state for one session.
#[derive(Debug, Default)]
pub struct Tracker {
    inner: RwLock<Channels>,
}

#[derive(Debug, Default)]
struct Channels {
    casemapping: CaseMapping,
    by_name: HashMap<String, ChannelState>,
}

impl Channels {
    fn channel_mut(&mut self, name: &str) -> Option<&mut ChannelState> {
        let key = self.casemapping.fold(name);
        self.by_name.get_mut(&key)
    }
}

/// Sender nick, required for membership events.
fn sender<'m>(msg: &'m Message, command: &'static str) -> Result<&'m str> {
    msg.source_nickname()
        .filter(|nick| !nick.is_empty())
        .ok_or(TrackerError::Malformed { command })
}

fn unknown(command: &'static str, channel: &str) -> TrackerError {
    TrackerError::UnknownChannel {
        command,
        channel: channel.to_string(),
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Names of all tracked channels, in no particular order.
    pub fn list_channels(&self) -> Vec<String> {
        self.inner
            .read()
            .by_name
            .values()
            .map(|state| state.name.clone())
            .collect()
    }

    /// Snapshot of one channel.
    pub fn channel(&self, name: &str) -> Option<ChannelState> {
        let inner = self.inner.read();
        inner.by_name.get(&inner.casemapping.fold(name)).cloned()
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        let inner = self.inner.read();
        inner.by_name.contains_key(&inner.casemapping.fold(name))
    }

    pub fn casemapping(&self) -> CaseMapping {
        self.inner.read().casemapping
    }

    /// Forget everything, e.g. after the connection drops.
    pub fn clear(&self) {
        self.inner.write().by_name.clear();
    }

    /// Switch case mapping and re-key every channel and member under it.
    ///
    /// Entries that become equal under the new mapping are merged.
    pub fn set_casemapping(&self, casemapping: CaseMapping) {
        let mut inner = self.inner.write();
        if inner.casemapping == casemapping {
            return;
        }
        debug!(?casemapping, "Changing case mapping");
        inner.casemapping = casemapping;

        let mut rekeyed: HashMap<String, ChannelState> = HashMap::new();
        for (_, mut state) in inner.by_name.drain() {
            state.remap(casemapping);
            match rekeyed.entry(casemapping.fold(&state.name)) {
                Entry::Occupied(mut merged) => {
                    merged.get_mut().users.extend(state.users);
                }
                Entry::Vacant(slot) => {
                    slot.insert(state);
                }
            }
        }
        inner.by_name = rekeyed;
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// RPL_TOPIC: `332 <me> <channel> :<topic>`
    pub fn on_topic_reply(&self, msg: &Message) -> Result<()> {
        const CMD: &str = "RPL_TOPIC";
        if msg.params.len() != 3 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        self.set_topic(CMD, &msg.params[1], &msg.params[2])
    }

    /// `TOPIC <channel> :<topic>`
    pub fn on_topic(&self, msg: &Message) -> Result<()> {
        const CMD: &str = "TOPIC";
        if msg.params.len() != 2 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        self.set_topic(CMD, &msg.params[0], &msg.params[1])
    }

    fn set_topic(&self, command: &'static str, channel: &str, topic: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let state = inner
            .channel_mut(channel)
            .ok_or_else(|| unknown(command, channel))?;
        state.topic = topic.to_string();
        Ok(())
    }

    /// `:<nick> JOIN :<channel>`
    ///
    /// Only a JOIN by the local user can start tracking a channel.
    pub fn on_join(&self, local_nick: &str, msg: &Message) -> Result<()> {
        const CMD: &str = "JOIN";
        if msg.params.len() != 1 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        let user = sender(msg, CMD)?;
        let channel = &msg.params[0];

        let mut inner = self.inner.write();
        let casemapping = inner.casemapping;
        let key = casemapping.fold(channel);
        if !inner.by_name.contains_key(&key) {
            if !casemapping.names_eq(user, local_nick) {
                return Err(unknown(CMD, channel));
            }
            debug!(channel = %channel, "Tracking channel");
            inner
                .by_name
                .insert(key.clone(), ChannelState::new(channel.as_str(), casemapping));
        }
        if let Some(state) = inner.by_name.get_mut(&key) {
            state.add(user);
        }
        Ok(())
    }

    /// `:<nick> PART <channel> [:<reason>]`
    pub fn on_part(&self, local_nick: &str, msg: &Message) -> Result<()> {
        const CMD: &str = "PART";
        if msg.params.is_empty() {
            return Err(TrackerError::Malformed { command: CMD });
        }
        let user = sender(msg, CMD)?;
        self.remove_member(CMD, local_nick, &msg.params[0], user)
    }

    /// `:<op> KICK <channel> <nick> :<reason>`
    pub fn on_kick(&self, local_nick: &str, msg: &Message) -> Result<()> {
        const CMD: &str = "KICK";
        if msg.params.len() != 3 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        self.remove_member(CMD, local_nick, &msg.params[0], &msg.params[1])
    }

    /// Drop `user` from `channel`, or the whole channel if `user` is us.
    fn remove_member(
        &self,
        command: &'static str,
        local_nick: &str,
        channel: &str,
        user: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write();
        let casemapping = inner.casemapping;
        let key = casemapping.fold(channel);
        let state = inner
            .by_name
            .get_mut(&key)
            .ok_or_else(|| unknown(command, channel))?;

        if casemapping.names_eq(user, local_nick) {
            inner.by_name.remove(&key);
            debug!(channel = %channel, command, "Stopped tracking channel");
        } else {
            state.remove(user);
        }
        Ok(())
    }

    /// `:<nick> QUIT :<reason>`
    pub fn on_quit(&self, msg: &Message) -> Result<()> {
        const CMD: &str = "QUIT";
        if msg.params.len() != 1 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        let user = sender(msg, CMD)?;

        let mut inner = self.inner.write();
        for state in inner.by_name.values_mut() {
            state.remove(user);
        }
        Ok(())
    }

    /// `:<old> NICK :<new>`
    pub fn on_nick(&self, msg: &Message) -> Result<()> {
        const CMD: &str = "NICK";
        if msg.params.len() != 1 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        let old = sender(msg, CMD)?;
        let new = &msg.params[0];

        let mut inner = self.inner.write();
        for state in inner.by_name.values_mut() {
            state.rename(old, new);
        }
        Ok(())
    }

    /// RPL_NAMREPLY: `353 <me> <type> <channel> :<[prefix]nick> ...`
    ///
    /// `prefixes` is the server's membership-prefix alphabet (`@+` and
    /// friends). The local user is skipped; JOIN already added it.
    pub fn on_names_reply(
        &self,
        local_nick: &str,
        prefixes: Option<&str>,
        msg: &Message,
    ) -> Result<()> {
        const CMD: &str = "RPL_NAMREPLY";
        if msg.params.len() != 4 {
            return Err(TrackerError::Malformed { command: CMD });
        }
        let prefixes = prefixes.ok_or(TrackerError::MissingPrefixMap)?;
        let channel = &msg.params[2];

        let mut inner = self.inner.write();
        let casemapping = inner.casemapping;
        let state = inner
            .channel_mut(channel)
            .ok_or_else(|| unknown(CMD, channel))?;
        for nick in msg.params[3]
            .split_whitespace()
            .map(|token| token.trim_start_matches(|c| prefixes.contains(c)))
            .filter(|nick| !nick.is_empty() && !casemapping.names_eq(nick, local_nick))
        {
            state.add(nick);
        }
        Ok(())
    }
}
