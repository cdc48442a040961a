use crate::grouping::pairing::Pairing;
use crate::timecode::serialize_hms;
use serde::Serialize;

/// One timed bout, reconstructed from a closed detection window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    /// 1-based position inside its set; 0 until grouped.
    pub round_number: usize,
    #[serde(serialize_with = "serialize_hms")]
    pub start_time: f64,
    #[serde(serialize_with = "serialize_hms")]
    pub end_time: f64,
    pub timer_start: u8,
    pub timer_end: u8,
    pub detected_timer: u8,
    #[serde(serialize_with = "serialize_hms")]
    pub detection_time: f64,
    pub frames_count: usize,
    pub confidence: f32,
    pub coverage: f32,
    pub coherence: f32,
    pub character1: Option<String>,
    pub character2: Option<String>,
    pub player1: Option<String>,
    pub player2: Option<String>,
}

impl Round {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn characters(&self) -> Pairing {
        Pairing::new(self.character1.clone(), self.character2.clone())
    }

    pub fn players(&self) -> Pairing {
        Pairing::new(self.player1.clone(), self.player2.clone())
    }
}

/// Consecutive rounds between the same two characters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Set {
    pub set_number: usize,
    pub character1: Option<String>,
    pub character2: Option<String>,
    pub player1: Option<String>,
    pub player2: Option<String>,
    #[serde(serialize_with = "serialize_hms")]
    pub start_time: f64,
    #[serde(serialize_with = "serialize_hms")]
    pub end_time: f64,
    pub rounds_count: usize,
    pub confidence: f32,
    pub character_consistency: f32,
    pub rounds: Vec<Round>,
}

impl Set {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn characters(&self) -> Pairing {
        Pairing::new(self.character1.clone(), self.character2.clone())
    }

    pub fn players(&self) -> Pairing {
        Pairing::new(self.player1.clone(), self.player2.clone())
    }
}

/// Consecutive sets between the same two players.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub match_id: usize,
    pub player1: Option<String>,
    pub player2: Option<String>,
    #[serde(serialize_with = "serialize_hms")]
    pub start_time: f64,
    #[serde(serialize_with = "serialize_hms")]
    pub end_time: f64,
    pub sets_count: usize,
    pub total_rounds: usize,
    pub confidence: f32,
    pub character_changes: usize,
    pub matchup_summary: String,
    /// Never inferred from OCR; left for downstream annotation.
    pub winner: Option<String>,
    pub sets: Vec<Set>,
}

impl Match {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn rounds(&self) -> impl Iterator<Item = &Round> {
        self.sets.iter().flat_map(|s| s.rounds.iter())
    }
}
