use crate::error::{MatchForgeError, MfResult};
use crate::frame::{Frame, FrameSequence, RawFrame, RawTimestamp};
use crate::text::validator::Vocabulary;
use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Loads frames from `.csv` or JSON (`[...]` / `{"frames": [...]}`).
pub fn load_frames<P: AsRef<Path>>(path: P) -> MfResult<FrameSequence> {
    let path = path.as_ref();
    info!("📂 Loading frames from {}", path.display());

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let sequence = if is_csv {
        read_frames_csv(File::open(path)?)?
    } else {
        parse_frames_json(&fs::read_to_string(path)?)?
    };

    if sequence.skipped > 0 {
        warn!(
            "⚠️  Skipped {} malformed frame(s) in {}",
            sequence.skipped,
            path.display()
        );
    }
    Ok(sequence)
}

pub fn parse_frames_json(content: &str) -> MfResult<FrameSequence> {
    let root: Value = serde_json::from_str(content)?;
    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("frames") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(MatchForgeError::Validation(
                    "expected a 'frames' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(MatchForgeError::Validation(
                "expected a list of frames".to_string(),
            ))
        }
    };

    let mut sequence = FrameSequence::default();
    for (idx, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<RawFrame>(item)
            .map_err(MatchForgeError::from)
            .and_then(RawFrame::into_frame);
        match parsed {
            Ok(frame) => sequence.frames.push(frame),
            Err(e) => {
                warn!("   ⚠️  [Frame {}] {}", idx, e);
                sequence.skipped += 1;
            }
        }
    }

    debug!(
        "Parsed {} frames ({} skipped)",
        sequence.frames.len(),
        sequence.skipped
    );
    Ok(sequence)
}

struct CsvColumns {
    timestamp: usize,
    timer: Option<usize>,
    character1: Option<usize>,
    character2: Option<usize>,
    player1: Option<usize>,
    player2: Option<usize>,
}

/// CSV with a header row naming `timestamp`, `timer_value`, `character1`,
/// `character2`, `player1`, `player2` (any order, extra columns ignored).
pub fn read_frames_csv<R: Read>(reader: R) -> MfResult<FrameSequence> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let columns = CsvColumns {
        timestamp: find(&["timestamp", "time"]).ok_or_else(|| {
            MatchForgeError::Validation("CSV header has no 'timestamp' column".to_string())
        })?,
        timer: find(&["timer_value", "timer_raw", "timer"]),
        character1: find(&["character1"]),
        character2: find(&["character2"]),
        player1: find(&["player1"]),
        player2: find(&["player2"]),
    };

    let mut sequence = FrameSequence::default();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(rec) => rec,
            Err(e) => {
                warn!("   ⚠️  [Row {}] CSV Parse Error: {}", row_idx + 1, e);
                sequence.skipped += 1;
                continue;
            }
        };

        let cell = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let stamp = record.get(columns.timestamp).unwrap_or_default().to_string();
        match RawTimestamp::Clock(stamp).to_seconds() {
            Ok(timestamp) => sequence.frames.push(Frame {
                timestamp,
                timer_raw: cell(columns.timer),
                character1: cell(columns.character1),
                character2: cell(columns.character2),
                player1: cell(columns.player1),
                player2: cell(columns.player2),
            }),
            Err(e) => {
                warn!("   ⚠️  [Row {}] {}", row_idx + 1, e);
                sequence.skipped += 1;
            }
        }
    }

    Ok(sequence)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CharacterFile {
    Plain(Vec<String>),
    Wrapped { characters: Vec<String> },
}

/// Character roster from JSON (`[...]` / `{"characters": [...]}`) or a plain
/// one-name-per-line text file.
pub fn load_character_roster<P: AsRef<Path>>(path: P) -> MfResult<Vocabulary> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        MatchForgeError::Config(format!(
            "Failed to read character roster '{}': {}",
            path.display(),
            e
        ))
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let names: Vec<String> = if is_json {
        match serde_json::from_str::<CharacterFile>(&content)? {
            CharacterFile::Plain(names) => names,
            CharacterFile::Wrapped { characters } => characters,
        }
    } else {
        content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    let roster = Vocabulary::new(names.iter().map(|n| n.to_uppercase()));
    if roster.is_empty() {
        return Err(MatchForgeError::Config(format!(
            "Character roster '{}' is empty",
            path.display()
        )));
    }

    info!("Loaded {} characters from {}", roster.len(), path.display());
    Ok(roster)
}
