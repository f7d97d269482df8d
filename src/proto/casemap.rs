//! IRC case mapping.
//!
//! Nicknames and channel names compare case-insensitively. Which characters
//! fold together depends on the server's `CASEMAPPING` token: `ascii` folds
//! letters only, `rfc1459` also treats `[]\~` as the upper-case forms of
//! `{}|^`, and `strict-rfc1459` does the same without `~`/`^`.

/// Case mapping advertised by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseMapping {
    Ascii,
    #[default]
    Rfc1459,
    StrictRfc1459,
}

impl CaseMapping {
    /// Parse a `CASEMAPPING` value. Unknown mappings return `None`.
    pub fn from_token(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "ascii" => Some(Self::Ascii),
            "rfc1459" => Some(Self::Rfc1459),
            "strict-rfc1459" => Some(Self::StrictRfc1459),
            _ => None,
        }
    }

    /// Fold one character.
    #[inline]
    pub const fn fold_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (Self::Ascii, _) => c,
            (_, '[') => '{',
            (_, ']') => '}',
            (_, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Fold a whole name, for use as a map key.
    pub fn fold(self, name: &str) -> String {
        name.chars().map(|c| self.fold_char(c)).collect()
    }

    /// Case-insensitive name comparison.
    pub fn names_eq(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a
                .chars()
                .zip(b.chars())
                .all(|(x, y)| self.fold_char(x) == self.fold_char(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc1459_fold() {
        let map = CaseMapping::Rfc1459;
        assert_eq!(map.fold("#Rust[Dev]"), "#rust{dev}");
        assert_eq!(map.fold("Away\\Nick~"), "away|nick^");
        assert_eq!(map.fold("already-lower"), "already-lower");
    }

    #[test]
    fn test_names_eq() {
        let map = CaseMapping::Rfc1459;
        assert!(map.names_eq("Bot", "bOT"));
        assert!(map.names_eq("nick[1]", "NICK{1}"));
        assert!(!map.names_eq("bot", "bot_"));
        assert!(!map.names_eq("bot", "box"));
    }

    #[test]
    fn test_ascii_and_strict() {
        assert!(!CaseMapping::Ascii.names_eq("#a[b]", "#a{b}"));
        assert!(CaseMapping::Ascii.names_eq("#AB", "#ab"));
        assert!(CaseMapping::StrictRfc1459.names_eq("#a[b]", "#A{B}"));
        assert!(!CaseMapping::StrictRfc1459.names_eq("a~", "a^"));
    }

    #[test]
    fn test_from_token() {
        assert_eq!(CaseMapping::from_token("ascii"), Some(CaseMapping::Ascii));
        assert_eq!(CaseMapping::from_token("RFC1459"), Some(CaseMapping::Rfc1459));
        assert_eq!(
            CaseMapping::from_token("strict-rfc1459"),
            Some(CaseMapping::StrictRfc1459)
        );
        assert_eq!(CaseMapping::from_token("rfc7613"), None);
    }
}
