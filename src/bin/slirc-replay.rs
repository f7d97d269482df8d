//! slirc-replay - feed a recorded server transcript through a session.
//!
//! Usage: `slirc-replay <config.toml> [transcript]`
//!
//! Reads one raw IRC line per line of the transcript (stdin when omitted or
//! `-`), prints every message the session would send as `-> <line>`, and
//! finishes with the tracked channels.

use std::io::{BufRead, BufReader};

use anyhow::Context as _;
use slirc_client::{Message, Session, SessionConfig, config};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| "config.toml".to_string());
    let transcript = args.next().unwrap_or_else(|| "-".to_string());

    let config = SessionConfig::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    let reader: Box<dyn BufRead> = if transcript == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(&transcript)
            .with_context(|| format!("failed to open transcript {transcript}"))?;
        Box::new(BufReader::new(file))
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut session = Session::new(config, tx);
    session.start()?;
    drain(&mut rx);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let msg: Message = match line.parse() {
            Ok(msg) => msg,
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "Skipping unparseable line");
                continue;
            }
        };

        let result = session.process_message(&msg);
        drain(&mut rx);
        match result {
            Ok(()) => {}
            Err(e) if e.is_fatal() => {
                error!(line = lineno + 1, error = %e, "Session aborted");
                return Err(e.into());
            }
            Err(e) => warn!(line = lineno + 1, code = e.error_code(), error = %e, "Message rejected"),
        }
    }

    let enabled: Vec<&str> = session
        .negotiation()
        .capabilities()
        .iter()
        .filter(|(_, cap)| cap.enabled)
        .map(|(name, _)| name.as_str())
        .collect();
    info!(
        nick = %session.current_nick(),
        caps = %enabled.join(" "),
        connected = session.is_connected(),
        status = ?session.negotiation_status(),
        "Transcript finished"
    );

    let tracker = session.tracker();
    let mut channels = tracker.list_channels();
    channels.sort();
    for name in channels {
        if let Some(state) = tracker.channel(&name) {
            println!("{} [{}] {}", state.name, state.topic, state.sorted_users().join(" "));
        }
    }

    Ok(())
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Message>) {
    while let Ok(msg) = rx.try_recv() {
        println!("-> {msg}");
    }
}
