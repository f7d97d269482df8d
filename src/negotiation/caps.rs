//! Per-capability negotiation records.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// What the session knows about one capability.
///
/// `enabled` implies `available`: an ACK marks both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capability {
    /// Advertised in a CAP LS reply.
    pub available: bool,
    /// Asked for with CAP REQ.
    pub requested: bool,
    /// The session cannot proceed without it.
    pub required: bool,
    /// Acknowledged by the server.
    pub enabled: bool,
    /// Value from a 302-style `name=value` advertisement.
    pub value: Option<String>,
}

/// Capabilities by name, iterated in name order.
///
/// Entries are created on first mention and never removed.
#[derive(Clone, Debug, Default)]
pub struct CapabilityTable {
    caps: BTreeMap<String, Capability>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.caps.get(name)
    }

    /// Entry for `name`, created empty if absent.
    pub fn entry(&mut self, name: &str) -> &mut Capability {
        self.caps.entry(name.to_string()).or_default()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.caps.get(name).is_some_and(|c| c.enabled)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.caps.get(name).is_some_and(|c| c.required)
    }

    /// First required capability (by name) that is not enabled.
    pub fn first_missing_required(&self) -> Option<&str> {
        self.caps
            .iter()
            .find(|(_, c)| c.required && !c.enabled)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Capability> {
        self.caps.iter()
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }
}
