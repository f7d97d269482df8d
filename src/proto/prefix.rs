//! Message source prefixes.
//!
//! A prefix identifies the origin of a message: either a server name or a
//! user's `nick!user@host` mask. Both forms are represented by the same
//! struct; a server prefix simply has empty `user` and `host` fields.

use std::fmt::{self, Display, Formatter};

/// Origin of an inbound message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Prefix {
    /// Nickname, or server name for server-originated messages.
    pub name: String,
    /// Username (ident). Empty when absent.
    pub user: String,
    /// Hostname. Empty when absent.
    pub host: String,
}

impl Prefix {
    /// Create a full user prefix.
    pub fn new(name: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: user.into(),
            host: host.into(),
        }
    }

    /// Parse a `nick!user@host` mask leniently.
    ///
    /// Missing parts are left empty; nothing is validated.
    pub fn parse(s: &str) -> Self {
        let (rest, host) = match s.split_once('@') {
            Some((rest, host)) => (rest, host),
            None => (s, ""),
        };
        let (name, user) = match rest.split_once('!') {
            Some((name, user)) => (name, user),
            None => (rest, ""),
        };

        Self::new(name, user, host)
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.user.is_empty() {
            write!(f, "!{}", self.user)?;
        }
        if !self.host.is_empty() {
            write!(f, "@{}", self.host)?;
        }
        Ok(())
    }
}
