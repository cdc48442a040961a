use crate::config::Config;
use crate::detector::RoundDetector;
use crate::error::MfResult;
use crate::frame::{Frame, FrameSequence};
use crate::grouping::{MatchGrouper, SetGrouper};
use crate::processor::FrameProcessor;
use crate::report::{ReportStats, VideoAnalysisReport, DETECTION_METHOD};
use crate::text::characters::default_roster;
use crate::text::player::PlayerValidator;
use crate::text::roster::{PlayerProvider, StaticRoster};
use crate::text::validator::{TextValidator, Vocabulary};
use crate::util::mean;
use std::sync::Arc;
use tracing::{info, warn};

/// End-to-end pipeline: frames in, `VideoAnalysisReport` out.
///
/// Holds only read-only vocabularies; each `analyze` call builds its own
/// detector state, so one instance can serve many videos concurrently.
#[derive(Clone)]
pub struct MatchDeductor {
    config: Config,
    processor: FrameProcessor,
}

impl MatchDeductor {
    /// Fails on invalid thresholds or an empty character roster.
    pub fn new(
        config: Config,
        characters: Vocabulary,
        players: Option<Arc<dyn PlayerProvider>>,
    ) -> MfResult<Self> {
        config.validate()?;

        let provider = players.unwrap_or_else(|| Arc::new(StaticRoster::default()));
        let text = TextValidator::new(characters, &config.validation)?;
        let players = PlayerValidator::new(provider, &config.validation)?;
        if players.is_open_vocabulary() {
            info!("No player roster loaded; accepting cleaned player names as-is.");
        }
        let processor = FrameProcessor::new(text, players, &config.smoothing);

        Ok(Self { config, processor })
    }

    /// Built-in character roster, no player roster.
    pub fn with_config(config: Config) -> MfResult<Self> {
        Self::new(config, Vocabulary::new(default_roster()), None)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }

    pub fn analyze_frames(&self, frames: &[Frame]) -> VideoAnalysisReport {
        self.analyze(None, &FrameSequence::from(frames.to_vec()))
    }

    pub fn analyze(&self, video_name: Option<&str>, sequence: &FrameSequence) -> VideoAnalysisReport {
        // 0. Drop frames that step back in time
        let mut ordered: Vec<Frame> = Vec::with_capacity(sequence.frames.len());
        let mut out_of_order = 0;
        for frame in &sequence.frames {
            match ordered.last() {
                Some(prev) if frame.timestamp < prev.timestamp => {
                    warn!(
                        "⚠️  Skipping out-of-order frame at {:.2}s (previous {:.2}s)",
                        frame.timestamp, prev.timestamp
                    );
                    out_of_order += 1;
                }
                _ => ordered.push(frame.clone()),
            }
        }

        // 1. Validate + smooth
        let processed = self.processor.process(&ordered);

        // 2-3. Detect windows, aggregate to rounds
        let mut detector = RoundDetector::new(&self.config.detection);
        let rounds = detector.detect_all(&processed.frames);
        let detector_stats = detector.stats().clone();

        // 4. Sets
        let (sets, set_stats) = SetGrouper::new(&self.config.grouping).group(rounds);

        // 5. Matches
        let (matches, match_stats) = MatchGrouper::new(&self.config.grouping).group(sets);

        // 6. Statistics
        let frames = &processed.frames;
        let total_frames = frames.len();
        let rate = |count: usize| {
            if total_frames == 0 {
                0.0
            } else {
                count as f32 / total_frames as f32
            }
        };
        let frames_with_valid_timer = processed.validation.timer.validated;
        let with_characters = frames.iter().filter(|f| f.has_characters()).count();
        let with_players = frames.iter().filter(|f| f.has_players()).count();

        let total_sets: usize = matches.iter().map(|m| m.sets_count).sum();
        let total_rounds: usize = matches.iter().map(|m| m.total_rounds).sum();
        let confidences: Vec<f32> = matches
            .iter()
            .flat_map(|m| m.rounds())
            .map(|r| r.confidence)
            .collect();

        let stats = ReportStats {
            total_frames: total_frames + sequence.skipped + out_of_order,
            frames_skipped: sequence.skipped + out_of_order,
            frames_with_valid_timer,
            timer_detection_rate: rate(frames_with_valid_timer),
            character_detection_rate: rate(with_characters),
            player_detection_rate: rate(with_players),
            windows_opened: detector_stats.windows_opened,
            windows_rejected: detector_stats.windows_rejected,
            rounds_detected: detector_stats.rounds_detected,
            sets_detected: set_stats.sets_detected,
            dropped_rounds: set_stats.dropped_rounds,
            dropped_sets: set_stats.dropped_sets,
            dropped_matches: match_stats.dropped_matches,
            total_matches: matches.len(),
            total_sets,
            total_rounds,
            avg_sets_per_match: if matches.is_empty() {
                0.0
            } else {
                total_sets as f32 / matches.len() as f32
            },
            avg_rounds_per_set: if total_sets == 0 {
                0.0
            } else {
                total_rounds as f32 / total_sets as f32
            },
            avg_round_confidence: mean(&confidences),
            validation: processed.validation.clone(),
        };

        info!(
            "🏁 {}: {} match(es), {} set(s), {} round(s) from {} frames (timer rate {:.1}%)",
            video_name.unwrap_or("video"),
            stats.total_matches,
            stats.total_sets,
            stats.total_rounds,
            stats.total_frames,
            stats.timer_detection_rate * 100.0
        );

        let video_duration = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        };

        VideoAnalysisReport {
            video_name: video_name.map(str::to_string),
            video_duration,
            analysis_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            detection_method: DETECTION_METHOD.to_string(),
            parameters: self.config.clone(),
            matches,
            stats,
        }
    }
}
