//! Server feature table built from `RPL_ISUPPORT` (005).
//!
//! The session reads `PREFIX` and `CASEMAPPING` from it, but every advertised
//! token is kept so the owning application can inspect the rest.

use std::collections::HashMap;

use super::casemap::CaseMapping;

/// Tokens assumed until the server says otherwise.
const DEFAULTS: &[(&str, &str)] = &[
    ("PREFIX", "(ov)@+"),
    ("CHANTYPES", "#&"),
    ("CASEMAPPING", "rfc1459"),
];

/// Parsed `PREFIX` value, e.g. `(qaohv)~&@%+`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixSpec {
    /// Channel membership mode letters (`ov`).
    pub modes: String,
    /// Matching display symbols (`@+`).
    pub symbols: String,
}

impl PrefixSpec {
    /// Parse a `PREFIX` value. A bare symbol list without the mode group is
    /// accepted too, since some servers send one.
    pub fn parse(value: &str) -> Option<Self> {
        match value.strip_prefix('(') {
            Some(rest) => {
                let (modes, symbols) = rest.split_once(')')?;
                if modes.is_empty() || symbols.is_empty() {
                    return None;
                }
                Some(Self {
                    modes: modes.to_string(),
                    symbols: symbols.to_string(),
                })
            }
            None if !value.is_empty() => Some(Self {
                modes: String::new(),
                symbols: value.to_string(),
            }),
            None => None,
        }
    }
}

/// Accumulated ISUPPORT tokens for one connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ISupport {
    tokens: HashMap<String, Option<String>>,
}

impl Default for ISupport {
    fn default() -> Self {
        let tokens = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect();
        Self { tokens }
    }
}

impl ISupport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the tokens of one 005 reply.
    ///
    /// The reply looks like `005 <nick> TOKEN[=VALUE]... :are supported by
    /// this server`; the first and last parameters are not tokens. A token of
    /// the form `-KEY` withdraws a previously advertised key.
    pub fn merge_reply(&mut self, params: &[String]) {
        if params.len() < 3 {
            return;
        }

        for token in &params[1..params.len() - 1] {
            if let Some(key) = token.strip_prefix('-') {
                self.tokens.remove(&key.to_ascii_uppercase());
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, Some(v.to_string())),
                None => (token.as_str(), None),
            };
            if !key.is_empty() {
                self.tokens.insert(key.to_ascii_uppercase(), value);
            }
        }
    }

    /// `Some(value)` when the key is advertised; the inner option is the
    /// value, which bare keys like `EXCEPTS` lack.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.tokens
            .get(&key.to_ascii_uppercase())
            .map(|v| v.as_deref())
    }

    pub fn prefix(&self) -> Option<PrefixSpec> {
        self.get("PREFIX").flatten().and_then(PrefixSpec::parse)
    }

    /// The channel-membership prefix alphabet, e.g. `@+`.
    pub fn membership_prefixes(&self) -> Option<String> {
        self.prefix().map(|spec| spec.symbols)
    }

    /// Advertised case mapping; `rfc1459` when absent or unrecognised.
    pub fn casemapping(&self) -> CaseMapping {
        self.get("CASEMAPPING")
            .flatten()
            .and_then(CaseMapping::from_token)
            .unwrap_or_default()
    }

    pub fn network(&self) -> Option<&str> {
        self.get("NETWORK").flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(tokens: &[&str]) -> Vec<String> {
        let mut params = vec!["bot".to_string()];
        params.extend(tokens.iter().map(|t| t.to_string()));
        params.push("are supported by this server".to_string());
        params
    }

    #[test]
    fn test_defaults() {
        let isupport = ISupport::new();
        assert_eq!(isupport.membership_prefixes().as_deref(), Some("@+"));
        assert_eq!(isupport.get("CHANTYPES"), Some(Some("#&")));
        assert_eq!(isupport.network(), None);
    }

    #[test]
    fn test_merge_reply() {
        let mut isupport = ISupport::new();
        isupport.merge_reply(&reply(&["NETWORK=Libera.Chat", "PREFIX=(qaohv)~&@%+", "EXCEPTS"]));

        assert_eq!(isupport.network(), Some("Libera.Chat"));
        assert_eq!(isupport.membership_prefixes().as_deref(), Some("~&@%+"));
        assert_eq!(isupport.get("excepts"), Some(None));
        // The description is not a token.
        assert_eq!(isupport.get("are supported by this server"), None);
    }

    #[test]
    fn test_withdrawn_prefix() {
        let mut isupport = ISupport::new();
        isupport.merge_reply(&reply(&["-PREFIX"]));
        assert_eq!(isupport.membership_prefixes(), None);
    }

    #[test]
    fn test_short_reply_ignored() {
        let mut isupport = ISupport::new();
        isupport.merge_reply(&["bot".to_string(), "PREFIX=(o)@".to_string()]);
        assert_eq!(isupport.membership_prefixes().as_deref(), Some("@+"));
    }

    #[test]
    fn test_casemapping() {
        let mut isupport = ISupport::new();
        assert_eq!(isupport.casemapping(), CaseMapping::Rfc1459);

        isupport.merge_reply(&reply(&["CASEMAPPING=ascii"]));
        assert_eq!(isupport.casemapping(), CaseMapping::Ascii);

        isupport.merge_reply(&reply(&["CASEMAPPING=rfc7613"]));
        assert_eq!(isupport.casemapping(), CaseMapping::Rfc1459);
    }

    #[test]
    fn test_prefix_spec() {
        let spec = PrefixSpec::parse("(ov)@+").unwrap();
        assert_eq!(spec.modes, "ov");
        assert_eq!(spec.symbols, "@+");

        assert_eq!(PrefixSpec::parse("@+").unwrap().symbols, "@+");
        assert!(PrefixSpec::parse("()").is_none());
        assert!(PrefixSpec::parse("").is_none());
    }
}
