//! Property tests for the channel tracker against a simple membership model.

use std::collections::BTreeMap;

use proptest::prelude::*;
use slirc_client::{Message, Tracker};

const ME: &str = "me";
const CHANNELS: &[&str] = &["#a", "#b", "#c"];
/// Includes case variants of the local nick and of `alice`.
const NICKS: &[&str] = &["me", "alice", "bob", "carol", "ALICE", "Me"];

#[derive(Clone, Debug)]
enum Event {
    Join(usize, usize),
    Part(usize, usize),
    Kick(usize, usize),
    Quit(usize),
    Nick(usize, usize),
}

fn event() -> impl Strategy<Value = Event> {
    let chan = 0..CHANNELS.len();
    let nick = 0..NICKS.len();
    prop_oneof![
        3 => (nick.clone(), chan.clone()).prop_map(|(n, c)| Event::Join(n, c)),
        2 => (nick.clone(), chan.clone()).prop_map(|(n, c)| Event::Part(n, c)),
        1 => (nick.clone(), chan).prop_map(|(n, c)| Event::Kick(n, c)),
        1 => nick.clone().prop_map(Event::Quit),
        1 => (1..NICKS.len(), nick).prop_map(|(a, b)| Event::Nick(a, b)),
    ]
}

fn line(event: &Event) -> String {
    match *event {
        Event::Join(n, c) => format!(":{}!u@h JOIN :{}", NICKS[n], CHANNELS[c]),
        Event::Part(n, c) => format!(":{}!u@h PART {} :bye", NICKS[n], CHANNELS[c]),
        Event::Kick(n, c) => format!(":op!o@h KICK {} {} :out", CHANNELS[c], NICKS[n]),
        Event::Quit(n) => format!(":{}!u@h QUIT :gone", NICKS[n]),
        Event::Nick(a, b) => format!(":{}!u@h NICK :{}", NICKS[a], NICKS[b]),
    }
}

/// Channel -> folded nick -> spelling last seen.
type Model = BTreeMap<&'static str, BTreeMap<String, String>>;

fn fold(nick: &str) -> String {
    nick.to_ascii_lowercase()
}

fn is_local(n: usize) -> bool {
    NICKS[n].eq_ignore_ascii_case(ME)
}

/// Expected effect of one event; mirrors what a server would let us observe.
fn apply(model: &mut Model, event: &Event) {
    match *event {
        Event::Join(n, c) => {
            if is_local(n) || model.contains_key(CHANNELS[c]) {
                model
                    .entry(CHANNELS[c])
                    .or_default()
                    .insert(fold(NICKS[n]), NICKS[n].to_string());
            }
        }
        Event::Part(n, c) | Event::Kick(n, c) => {
            if is_local(n) {
                model.remove(CHANNELS[c]);
            } else if let Some(users) = model.get_mut(CHANNELS[c]) {
                users.remove(&fold(NICKS[n]));
            }
        }
        Event::Quit(n) => {
            for users in model.values_mut() {
                users.remove(&fold(NICKS[n]));
            }
        }
        Event::Nick(a, b) => {
            for users in model.values_mut() {
                if users.remove(&fold(NICKS[a])).is_some() {
                    users.insert(fold(NICKS[b]), NICKS[b].to_string());
                }
            }
        }
    }
}

fn snapshot(tracker: &Tracker) -> Model {
    CHANNELS
        .iter()
        .filter_map(|name| {
            tracker
                .channel(name)
                .map(|state| (*name, state.users.into_iter().collect()))
        })
        .collect()
}

proptest! {
    #[test]
    fn tracker_matches_membership_model(events in prop::collection::vec(event(), 0..64)) {
        let tracker = Tracker::new();
        let mut model = Model::new();

        for event in &events {
            let msg: Message = line(event).parse().unwrap();
            let _ = match event {
                Event::Join(..) => tracker.on_join(ME, &msg),
                Event::Part(..) => tracker.on_part(ME, &msg),
                Event::Kick(..) => tracker.on_kick(ME, &msg),
                Event::Quit(..) => tracker.on_quit(&msg),
                Event::Nick(..) => tracker.on_nick(&msg),
            };
            apply(&mut model, event);
            prop_assert_eq!(snapshot(&tracker), model.clone(), "after {:?}", event);
        }
    }

    #[test]
    fn list_channels_matches_tracked(events in prop::collection::vec(event(), 0..32)) {
        let tracker = Tracker::new();
        for event in &events {
            let msg: Message = line(event).parse().unwrap();
            let _ = match event {
                Event::Join(..) => tracker.on_join(ME, &msg),
                Event::Part(..) => tracker.on_part(ME, &msg),
                _ => Ok(()),
            };
        }

        let mut listed = tracker.list_channels();
        listed.sort();
        let tracked: Vec<String> = CHANNELS
            .iter()
            .filter(|name| tracker.is_tracked(name))
            .map(|name| name.to_string())
            .collect();
        prop_assert_eq!(listed, tracked);
    }
}
