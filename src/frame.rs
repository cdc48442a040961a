use crate::error::MfResult;
use crate::timecode::parse_timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// One OCR sample as delivered by the frame extractor.
///
/// `None` means the field was never recognized; `Some("")` means the region was
/// read but produced no text. Both carry no signal downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: f64,
    #[serde(default, alias = "timer_value")]
    pub timer_raw: Option<String>,
    #[serde(default)]
    pub character1: Option<String>,
    #[serde(default)]
    pub character2: Option<String>,
    #[serde(default)]
    pub player1: Option<String>,
    #[serde(default)]
    pub player2: Option<String>,
}

impl Frame {
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }
}

/// Timestamps arrive either as seconds or as clock strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Seconds(f64),
    Clock(String),
}

impl RawTimestamp {
    pub fn to_seconds(&self) -> MfResult<f64> {
        match self {
            RawTimestamp::Seconds(s) if s.is_finite() && *s >= 0.0 => Ok(*s),
            RawTimestamp::Seconds(s) => Err(crate::error::MatchForgeError::Timestamp(format!(
                "{} is not a valid position",
                s
            ))),
            RawTimestamp::Clock(text) => parse_timestamp(text),
        }
    }
}

/// Wire shape of a frame before its timestamp is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrame {
    pub timestamp: RawTimestamp,
    #[serde(default, alias = "timer_raw", deserialize_with = "lenient_text")]
    pub timer_value: Option<String>,
    #[serde(default)]
    pub character1: Option<String>,
    #[serde(default)]
    pub character2: Option<String>,
    #[serde(default)]
    pub player1: Option<String>,
    #[serde(default)]
    pub player2: Option<String>,
}

// Some extractors emit the timer as a bare number.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|t| match t {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    }))
}

impl RawFrame {
    pub fn into_frame(self) -> MfResult<Frame> {
        Ok(Frame {
            timestamp: self.timestamp.to_seconds()?,
            timer_raw: self.timer_value,
            character1: self.character1,
            character2: self.character2,
            player1: self.player1,
            player2: self.player2,
        })
    }
}

/// A frame after normalization and smoothing. Every present field is a
/// vocabulary member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedFrame {
    pub timestamp: f64,
    pub timer: Option<u8>,
    pub character1: Option<String>,
    pub character2: Option<String>,
    pub player1: Option<String>,
    pub player2: Option<String>,
}

impl ValidatedFrame {
    pub fn has_characters(&self) -> bool {
        self.character1.is_some() || self.character2.is_some()
    }

    pub fn has_players(&self) -> bool {
        self.player1.is_some() || self.player2.is_some()
    }
}

/// Ordered frames of one video plus the count of records dropped while loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSequence {
    pub frames: Vec<Frame>,
    pub skipped: usize,
}

impl From<Vec<Frame>> for FrameSequence {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames, skipped: 0 }
    }
}
