//! Integration tests for loading session configuration from disk.

mod common;

use std::fs;

use common::TestSession;
use slirc_client::config::{ValidationError, validate};
use slirc_client::{ConfigError, SessionConfig};
use tempfile::tempdir;

const FULL: &str = r#"
nick = "bot"
user = "botuser"
realname = "A friendly bot"
password = "serverpass"

[nickserv]
password = "hunter2"

[[capabilities]]
name = "sasl"
required = true

[[capabilities]]
name = "multi-prefix"
"#;

#[test]
fn test_load_full_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.toml");
    fs::write(&path, FULL).unwrap();

    let config = SessionConfig::load(&path).unwrap();
    assert_eq!(config.nick, "bot");
    assert_eq!(config.username(), "botuser");
    assert_eq!(config.realname, "A friendly bot");
    assert_eq!(config.password.as_deref(), Some("serverpass"));

    let nickserv = config.nickserv.as_ref().unwrap();
    assert_eq!(nickserv.nick, "NickServ");
    assert_eq!(nickserv.password, "hunter2");

    assert_eq!(config.capabilities.len(), 2);
    assert!(config.capabilities[0].required);
    assert!(!config.capabilities[1].required);
    assert!(validate(&config).is_ok());
}

#[test]
fn test_loaded_config_drives_registration() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.toml");
    fs::write(&path, FULL).unwrap();

    let mut t = TestSession::new(SessionConfig::load(&path).unwrap());
    t.session.start().unwrap();
    assert_eq!(
        t.sent(),
        vec![
            "PASS serverpass",
            "CAP LS",
            "CAP REQ sasl",
            "CAP REQ multi-prefix",
            "NICK bot",
            "USER botuser 0.0.0.0 0.0.0.0 :A friendly bot",
        ]
    );

    t.feed_ok(":irc.test 001 bot :Welcome");
    assert_eq!(t.sent(), vec!["PRIVMSG NickServ :IDENTIFY hunter2"]);
}

#[test]
fn test_minimal_config_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("min.toml");
    fs::write(&path, "nick = \"bot\"\n").unwrap();

    let config = SessionConfig::load(&path).unwrap();
    assert_eq!(config.username(), "bot");
    assert_eq!(config.realname, "slirc-client");
    assert!(config.password.is_none());
    assert!(config.nickserv.is_none());
    assert!(config.capabilities.is_empty());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = SessionConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_invalid_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "nick = [\n").unwrap();

    let err = SessionConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("failed to parse config"));
}

#[test]
fn test_loaded_config_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.toml");
    fs::write(
        &path,
        r#"
nick = "my bot"

[[capabilities]]
name = "sasl"

[[capabilities]]
name = "sasl"
"#,
    )
    .unwrap();

    let config = SessionConfig::load(&path).unwrap();
    assert_eq!(
        validate(&config).unwrap_err(),
        vec![
            ValidationError::InvalidNick("my bot".to_string()),
            ValidationError::DuplicateCapability("sasl".to_string()),
        ]
    );
}
