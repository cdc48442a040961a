use crate::config::Config;
use crate::error::MfResult;
use crate::model::Match;
use crate::text::characters::display_name;
use crate::text::validator::ValidationStats;
use crate::timecode::{format_hms, serialize_hms};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;

pub const DETECTION_METHOD: &str = "timer_window_state_machine";

/// Coverage and yield counters for one analyzed video.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    // === Frames ===
    pub total_frames: usize,
    pub frames_skipped: usize,
    pub frames_with_valid_timer: usize,
    pub timer_detection_rate: f32,
    pub character_detection_rate: f32,
    pub player_detection_rate: f32,

    // === Detection ===
    pub windows_opened: usize,
    pub windows_rejected: usize,
    pub rounds_detected: usize,
    pub sets_detected: usize,

    // === Grouping losses ===
    pub dropped_rounds: usize,
    pub dropped_sets: usize,
    pub dropped_matches: usize,

    // === Output ===
    pub total_matches: usize,
    pub total_sets: usize,
    pub total_rounds: usize,
    pub avg_sets_per_match: f32,
    pub avg_rounds_per_set: f32,
    pub avg_round_confidence: f32,

    pub validation: ValidationStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoAnalysisReport {
    pub video_name: Option<String>,
    #[serde(serialize_with = "serialize_hms")]
    pub video_duration: f64,
    pub analysis_date: String,
    pub detection_method: String,
    pub parameters: Config,
    pub matches: Vec<Match>,
    pub stats: ReportStats,
}

impl VideoAnalysisReport {
    pub fn to_json(&self) -> MfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> MfResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// One line per match: `HH:MM:SS P1 (Char) VS P2 (Char)`.
    pub fn to_matches_txt(&self) -> String {
        self.matches
            .iter()
            .map(match_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_matches_txt<W: Write>(&self, mut writer: W) -> MfResult<()> {
        for m in &self.matches {
            writeln!(writer, "{}", match_line(m))?;
        }
        Ok(())
    }
}

fn match_line(m: &Match) -> String {
    let (side1, side2) = side_characters(m);
    format!(
        "{} {} VS {}",
        format_hms(m.start_time),
        player_label(m.player1.as_deref(), &side1),
        player_label(m.player2.as_deref(), &side2)
    )
}

fn player_label(player: Option<&str>, characters: &BTreeSet<String>) -> String {
    let name = player.unwrap_or("Unknown");
    // A character is shown only when the player stuck to one all match.
    if characters.len() == 1 {
        if let Some(character) = characters.iter().next() {
            return format!("{} ({})", name, display_name(character));
        }
    }
    name.to_string()
}

/// Characters used by each match side. Sets whose players appear swapped
/// relative to the match contribute their characters swapped.
fn side_characters(m: &Match) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut side1 = BTreeSet::new();
    let mut side2 = BTreeSet::new();

    for set in &m.sets {
        let swapped = (set.player1.is_some() && set.player1 == m.player2)
            || (set.player2.is_some() && set.player2 == m.player1);
        let (c1, c2) = if swapped {
            (&set.character2, &set.character1)
        } else {
            (&set.character1, &set.character2)
        };
        side1.extend(c1.iter().cloned());
        side2.extend(c2.iter().cloned());
    }

    (side1, side2)
}
