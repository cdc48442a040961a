use crate::config::DetectionParams;
use crate::detector::backdate::backdated_start;
use crate::frame::ValidatedFrame;
use crate::model::Round;
use crate::util::majority_vote;
use strum_macros::Display;

// === Confidence weights ===
const WEIGHT_COVERAGE: f32 = 0.4;
const WEIGHT_COHERENCE: f32 = 0.3;
const WEIGHT_DURATION: f32 = 0.2;
const WEIGHT_HIGH_START: f32 = 0.1;

// Typical full-length round, in seconds
const PLAUSIBLE_MIN: f64 = 90.0;
const PLAUSIBLE_MAX: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WindowRejection {
    #[strum(serialize = "too few frames")]
    TooFewFrames,
    #[strum(serialize = "low coherence")]
    LowCoherence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedWindow {
    pub reason: WindowRejection,
    pub frames_count: usize,
    pub coherence: f32,
    pub detection_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowOutcome {
    Accepted(Round),
    Rejected(RejectedWindow),
}

/// Fraction of consecutive readings that do not increase. Fewer than two
/// readings carry no countdown evidence and score zero.
pub fn coherence(readings: &[u8]) -> f32 {
    if readings.len() < 2 {
        return 0.0;
    }
    let steady = readings.windows(2).filter(|w| w[1] <= w[0]).count();
    steady as f32 / (readings.len() - 1) as f32
}

/// 1.0 inside the plausible band, falling off linearly outside it.
pub fn duration_score(seconds: f64) -> f32 {
    let score = if seconds < PLAUSIBLE_MIN {
        seconds / PLAUSIBLE_MIN
    } else if seconds <= PLAUSIBLE_MAX {
        1.0
    } else {
        1.0 - (seconds - PLAUSIBLE_MAX) / PLAUSIBLE_MAX
    };
    score.clamp(0.0, 1.0) as f32
}

pub fn round_confidence(
    coverage: f32,
    coherence: f32,
    duration: f64,
    detected_timer: u8,
    high_start_timer: u8,
) -> f32 {
    let high_start = if detected_timer >= high_start_timer {
        1.0
    } else {
        0.0
    };
    let score = WEIGHT_COVERAGE * coverage
        + WEIGHT_COHERENCE * coherence
        + WEIGHT_DURATION * duration_score(duration)
        + WEIGHT_HIGH_START * high_start;
    score.clamp(0.0, 1.0)
}

/// Turns the frames of a closed window into a `Round`, or rejects them.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    params: DetectionParams,
}

impl WindowAggregator {
    pub fn new(params: &DetectionParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    /// `floor` is the earliest admissible start: the sequence origin or the
    /// end of the previous accepted round.
    pub fn close(&self, frames: &[ValidatedFrame], floor: f64) -> WindowOutcome {
        let frames_count = frames.len();
        let readings: Vec<u8> = frames.iter().filter_map(|f| f.timer).collect();
        let coherence = coherence(&readings);

        let (first_frame, last_frame, detected_timer, timer_end) =
            match (frames.first(), frames.last(), readings.first(), readings.last()) {
                (Some(first), Some(last), Some(&start), Some(&end))
                    if frames_count >= self.params.min_window_frames =>
                {
                    (first, last, start, end)
                }
                _ => {
                    return WindowOutcome::Rejected(RejectedWindow {
                        reason: WindowRejection::TooFewFrames,
                        frames_count,
                        coherence,
                        detection_time: frames.first().map_or(floor, |f| f.timestamp),
                    })
                }
            };

        if coherence < self.params.coherence_threshold {
            return WindowOutcome::Rejected(RejectedWindow {
                reason: WindowRejection::LowCoherence,
                frames_count,
                coherence,
                detection_time: first_frame.timestamp,
            });
        }

        let detection_time = first_frame.timestamp;
        let end_time = last_frame.timestamp;
        let start_time =
            backdated_start(detection_time, detected_timer, self.params.timer_origin, floor);
        let coverage = readings.len() as f32 / frames_count as f32;
        let confidence = round_confidence(
            coverage,
            coherence,
            end_time - start_time,
            detected_timer,
            self.params.high_start_timer,
        );

        WindowOutcome::Accepted(Round {
            round_number: 0,
            start_time,
            end_time,
            timer_start: self.params.timer_origin,
            timer_end,
            detected_timer,
            detection_time,
            frames_count,
            confidence,
            coverage,
            coherence,
            character1: consensus(frames, |f| &f.character1),
            character2: consensus(frames, |f| &f.character2),
            player1: consensus(frames, |f| &f.player1),
            player2: consensus(frames, |f| &f.player2),
        })
    }
}

fn consensus<'a>(
    frames: &'a [ValidatedFrame],
    pick: impl Fn(&'a ValidatedFrame) -> &'a Option<String>,
) -> Option<String> {
    majority_vote(frames.iter().filter_map(|f| pick(f).clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coherence_counts_ties_as_steady() {
        assert_eq!(coherence(&[99, 99, 98, 97]), 1.0);
        assert_eq!(coherence(&[99, 98, 99, 97, 96]), 0.75);
        assert_eq!(coherence(&[99]), 0.0);
    }

    #[test]
    fn test_duration_score_band() {
        assert_eq!(duration_score(120.0), 1.0);
        assert!((duration_score(45.0) - 0.5).abs() < 1e-6);
        assert!((duration_score(270.0) - 0.5).abs() < 1e-6);
        assert_eq!(duration_score(400.0), 0.0);
    }
}
