//! Per-channel state.

use std::collections::HashMap;

use crate::proto::CaseMapping;

/// Topic and membership of one joined channel.
///
/// Snapshots handed out by [`Tracker::channel`](super::Tracker::channel) are
/// clones; mutating one has no effect on the tracker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Channel name as spelled in the JOIN that created the entry.
    pub name: String,
    /// Current topic; empty until one is seen.
    pub topic: String,
    /// Members keyed by folded nick. The value is the spelling last seen.
    pub users: HashMap<String, String>,
    casemapping: CaseMapping,
}

impl ChannelState {
    pub fn new(name: impl Into<String>, casemapping: CaseMapping) -> Self {
        Self {
            name: name.into(),
            casemapping,
            ..Self::default()
        }
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, nick: &str) -> bool {
        self.users.contains_key(&self.casemapping.fold(nick))
    }

    /// Member nicks in their display spelling, in no particular order.
    pub fn nicks(&self) -> impl Iterator<Item = &str> {
        self.users.values().map(String::as_str)
    }

    /// Members in sorted order, for display.
    pub fn sorted_users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self.nicks().collect();
        users.sort_unstable();
        users
    }

    /// Add `nick`, or update the spelling of an existing member.
    pub(super) fn add(&mut self, nick: &str) {
        self.users
            .insert(self.casemapping.fold(nick), nick.to_string());
    }

    pub(super) fn remove(&mut self, nick: &str) -> bool {
        self.users.remove(&self.casemapping.fold(nick)).is_some()
    }

    /// Replace `old` with `new`, leaving other members alone.
    pub(super) fn rename(&mut self, old: &str, new: &str) -> bool {
        if !self.remove(old) {
            return false;
        }
        self.add(new);
        true
    }

    /// Re-key members under a different case mapping.
    ///
    /// Members that collide under the new mapping collapse into one entry.
    pub(super) fn remap(&mut self, casemapping: CaseMapping) {
        self.casemapping = casemapping;
        self.users = self
            .users
            .drain()
            .map(|(_, nick)| (casemapping.fold(&nick), nick))
            .collect();
    }
}
