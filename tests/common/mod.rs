#![allow(dead_code)]

use matchforge::config::Config;
use matchforge::frame::{Frame, ValidatedFrame};
use matchforge::MatchDeductor;

pub fn deductor() -> MatchDeductor {
    MatchDeductor::with_config(Config::default()).expect("default config must build")
}

/// One raw frame per second, timer counting down from `from` to `to`.
pub fn countdown(
    start: f64,
    from: u8,
    to: u8,
    characters: (&str, &str),
    players: (&str, &str),
) -> Vec<Frame> {
    (to..=from)
        .rev()
        .enumerate()
        .map(|(i, timer)| Frame {
            timestamp: start + i as f64,
            timer_raw: Some(timer.to_string()),
            character1: Some(characters.0.to_string()),
            character2: Some(characters.1.to_string()),
            player1: Some(players.0.to_string()),
            player2: Some(players.1.to_string()),
        })
        .collect()
}

/// `count` rounds of 99..=60, each starting `pause` seconds after the
/// previous one ended. Returns the frames and the time of the last frame.
pub fn rounds(
    start: f64,
    count: usize,
    pause: f64,
    characters: (&str, &str),
    players: (&str, &str),
) -> (Vec<Frame>, f64) {
    let mut frames = Vec::new();
    let mut t = start;
    for _ in 0..count {
        let round = countdown(t, 99, 60, characters, players);
        t = round.last().map_or(t, |f| f.timestamp) + pause;
        frames.extend(round);
    }
    let end = frames.last().map_or(start, |f| f.timestamp);
    (frames, end)
}

pub fn validated(timestamp: f64, timer: Option<u8>) -> ValidatedFrame {
    ValidatedFrame {
        timestamp,
        timer,
        character1: Some("RYU".to_string()),
        character2: Some("KEN".to_string()),
        player1: Some("DAIGO".to_string()),
        player2: Some("TOKIDO".to_string()),
    }
}

/// Validated frames at one per second starting at `start`.
pub fn validated_run(start: f64, timers: &[Option<u8>]) -> Vec<ValidatedFrame> {
    timers
        .iter()
        .enumerate()
        .map(|(i, t)| validated(start + i as f64, *t))
        .collect()
}

pub fn descending(from: u8, to: u8) -> Vec<Option<u8>> {
    (to..=from).rev().map(Some).collect()
}
