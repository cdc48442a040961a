pub mod backdate;
pub mod history;
pub mod window;

pub use backdate::{backdate, backdated_start};
pub use history::TimerHistory;
pub use window::{
    coherence, round_confidence, RejectedWindow, WindowAggregator, WindowOutcome, WindowRejection,
};

use crate::config::DetectionParams;
use crate::frame::ValidatedFrame;
use crate::model::Round;
use serde::Serialize;
use strum_macros::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DetectorState {
    Idle,
    Collecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BoundaryTrigger {
    #[strum(serialize = "timer jump")]
    TimerJump,
    #[strum(serialize = "reset after low timer")]
    ResetAfterLow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectorStats {
    pub windows_opened: usize,
    pub windows_rejected: usize,
    pub rejected_too_few_frames: usize,
    pub rejected_low_coherence: usize,
    pub rounds_detected: usize,
}

/// Idle/Collecting state machine over the smoothed timer stream.
///
/// Owns the rolling timer history and the open window; one instance per
/// frame sequence.
#[derive(Debug, Clone)]
pub struct RoundDetector {
    params: DetectionParams,
    aggregator: WindowAggregator,
    state: DetectorState,
    history: TimerHistory,
    window: Vec<ValidatedFrame>,
    window_min: u8,
    frame_index: usize,
    sequence_origin: Option<f64>,
    last_round_start: Option<f64>,
    last_round_end: Option<f64>,
    stats: DetectorStats,
}

impl RoundDetector {
    pub fn new(params: &DetectionParams) -> Self {
        Self {
            params: params.clone(),
            aggregator: WindowAggregator::new(params),
            state: DetectorState::Idle,
            history: TimerHistory::new(params.timer_history_size),
            window: Vec::new(),
            window_min: u8::MAX,
            frame_index: 0,
            sequence_origin: None,
            last_round_start: None,
            last_round_end: None,
            stats: DetectorStats::default(),
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn stats(&self) -> &DetectorStats {
        &self.stats
    }

    /// Feeds one frame. Returns the outcome of a window closed by this frame.
    pub fn push(&mut self, frame: ValidatedFrame) -> Option<WindowOutcome> {
        let index = self.frame_index;
        self.frame_index += 1;
        if self.sequence_origin.is_none() {
            self.sequence_origin = Some(frame.timestamp);
        }

        match self.state {
            DetectorState::Idle => {
                if self.can_open(&frame, index) {
                    self.open(frame);
                }
                None
            }
            DetectorState::Collecting => {
                let Some(timer) = frame.timer else {
                    self.window.push(frame);
                    return None;
                };

                if let Some(trigger) = self.boundary(timer) {
                    debug!(
                        "Round boundary at {:.1}s ({}, timer {})",
                        frame.timestamp, trigger, timer
                    );
                    let outcome = self.close();
                    if self.can_open(&frame, index) {
                        self.open(frame);
                    }
                    return Some(outcome);
                }

                self.history.push(timer);
                self.window_min = self.window_min.min(timer);
                self.window.push(frame);
                None
            }
        }
    }

    /// Closes whatever window is still open.
    pub fn finish(&mut self) -> Option<WindowOutcome> {
        match self.state {
            DetectorState::Collecting => Some(self.close()),
            DetectorState::Idle => None,
        }
    }

    /// Runs a whole sequence and keeps the accepted rounds.
    pub fn detect_all(&mut self, frames: &[ValidatedFrame]) -> Vec<Round> {
        let mut rounds = Vec::new();
        for frame in frames {
            if let Some(WindowOutcome::Accepted(round)) = self.push(frame.clone()) {
                rounds.push(round);
            }
        }
        if let Some(WindowOutcome::Accepted(round)) = self.finish() {
            rounds.push(round);
        }
        rounds
    }

    fn can_open(&self, frame: &ValidatedFrame, index: usize) -> bool {
        let Some(timer) = frame.timer else {
            return false;
        };
        if timer < self.params.start_threshold {
            return false;
        }
        if index < self.params.buffer_size {
            return true;
        }
        self.last_round_start
            .map_or(true, |start| frame.timestamp - start >= self.params.min_round_duration)
    }

    fn boundary(&self, timer: u8) -> Option<BoundaryTrigger> {
        if let Some(previous) = self.history.median() {
            if timer as f32 - previous >= self.params.jump_threshold as f32 {
                return Some(BoundaryTrigger::TimerJump);
            }
        }
        if timer >= self.params.start_threshold && self.window_min <= self.params.low_threshold {
            return Some(BoundaryTrigger::ResetAfterLow);
        }
        None
    }

    fn open(&mut self, frame: ValidatedFrame) {
        let timer = frame.timer.unwrap_or(self.params.timer_origin);
        debug!("Window opened at {:.1}s (timer {})", frame.timestamp, timer);

        self.state = DetectorState::Collecting;
        self.history.clear();
        self.history.push(timer);
        self.window_min = timer;
        self.window = vec![frame];
        self.stats.windows_opened += 1;
    }

    fn close(&mut self) -> WindowOutcome {
        self.state = DetectorState::Idle;
        self.history.clear();
        self.window_min = u8::MAX;
        let frames = std::mem::take(&mut self.window);

        let origin = self.sequence_origin.unwrap_or(0.0);
        let floor = self.last_round_end.map_or(origin, |end| end.max(origin));
        let outcome = self.aggregator.close(&frames, floor);

        match &outcome {
            WindowOutcome::Accepted(round) => {
                debug!(
                    "Round accepted: {:.1}s-{:.1}s, {} frames, confidence {:.2}",
                    round.start_time, round.end_time, round.frames_count, round.confidence
                );
                self.last_round_start = Some(round.detection_time);
                self.last_round_end = Some(round.end_time);
                self.stats.rounds_detected += 1;
            }
            WindowOutcome::Rejected(rejected) => {
                debug!(
                    "Window at {:.1}s rejected: {} ({} frames, coherence {:.2})",
                    rejected.detection_time, rejected.reason, rejected.frames_count, rejected.coherence
                );
                self.stats.windows_rejected += 1;
                match rejected.reason {
                    WindowRejection::TooFewFrames => self.stats.rejected_too_few_frames += 1,
                    WindowRejection::LowCoherence => self.stats.rejected_low_coherence += 1,
                }
            }
        }

        outcome
    }
}
