use crate::error::{MatchForgeError, MfResult};
use crate::text::similarity::SimilarityMetric;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub validation: ValidationParams,
    #[command(flatten)]
    pub smoothing: SmoothingParams,
    #[command(flatten)]
    pub detection: DetectionParams,
    #[command(flatten)]
    pub grouping: GroupingParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationParams {
    // === Fuzzy cutoffs (0-100) ===
    #[arg(long, default_value_t = 70.0)]
    pub timer_fuzzy_threshold: f32,
    #[arg(long, default_value_t = 60.0)]
    pub character_fuzzy_threshold: f32,
    #[arg(long, default_value_t = 60.0)]
    pub player_fuzzy_threshold: f32,

    // === Player context ===
    #[arg(long, default_value_t = 20.0)]
    pub player_context_bonus: f32,
    #[arg(long, default_value_t = 10.0)]
    pub player_context_penalty: f32,
    #[arg(long, default_value_t = 10)]
    pub player_search_limit: usize,

    #[arg(long, default_value_t = SimilarityMetric::Levenshtein)]
    pub similarity_metric: SimilarityMetric,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            timer_fuzzy_threshold: 70.0,
            character_fuzzy_threshold: 60.0,
            player_fuzzy_threshold: 60.0,
            player_context_bonus: 20.0,
            player_context_penalty: 10.0,
            player_search_limit: 10,
            similarity_metric: SimilarityMetric::Levenshtein,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingParams {
    #[arg(long, default_value_t = 5)]
    pub smoothing_window: usize,
    #[arg(long, default_value_t = 10)]
    pub timer_tolerance: u8,
    #[arg(long, default_value_t = 3)]
    pub timer_extrapolation_step: u8,
    #[arg(long, default_value_t = 80.0)]
    pub character_neighbor_similarity: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            timer_tolerance: 10,
            timer_extrapolation_step: 3,
            character_neighbor_similarity: 80.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionParams {
    // === Timer thresholds ===
    #[arg(long, default_value_t = 95)]
    pub start_threshold: u8,
    #[arg(long, default_value_t = 50)]
    pub low_threshold: u8,
    #[arg(long, default_value_t = 20)]
    pub jump_threshold: u8,

    // Minimum seconds between two round starts
    #[arg(long, default_value_t = 30.0)]
    pub min_round_duration: f64,

    #[arg(long, default_value_t = 5)]
    pub buffer_size: usize,
    #[arg(long, default_value_t = 5)]
    pub timer_history_size: usize,

    // === Window validation ===
    #[arg(long, default_value_t = 3)]
    pub min_window_frames: usize,
    #[arg(long, default_value_t = 0.7)]
    pub coherence_threshold: f32,

    // === Backdating / confidence ===
    #[arg(long, default_value_t = 99)]
    pub timer_origin: u8,
    #[arg(long, default_value_t = 95)]
    pub high_start_timer: u8,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            start_threshold: 95,
            low_threshold: 50,
            jump_threshold: 20,
            min_round_duration: 30.0,
            buffer_size: 5,
            timer_history_size: 5,
            min_window_frames: 3,
            coherence_threshold: 0.7,
            timer_origin: 99,
            high_start_timer: 95,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroupingParams {
    // === Sets ===
    #[arg(long, default_value_t = 300.0)]
    pub max_set_gap: f64,
    #[arg(long, default_value_t = 2)]
    pub min_rounds_per_set: usize,
    /// Sets whose rounds agree on their characters less often than this are dropped.
    #[arg(long, default_value_t = 0.5)]
    pub min_character_consistency: f32,

    // === Matches ===
    #[arg(long, default_value_t = 180.0)]
    pub max_match_gap: f64,
    #[arg(long, default_value_t = 2)]
    pub min_sets_per_match: usize,
    #[arg(long, default_value_t = 3)]
    pub min_rounds_single_set_match: usize,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub split_on_double_character_change: bool,
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self {
            max_set_gap: 300.0,
            min_rounds_per_set: 2,
            min_character_consistency: 0.5,
            max_match_gap: 180.0,
            min_sets_per_match: 2,
            min_rounds_single_set_match: 3,
            split_on_double_character_change: true,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MatchForgeError::Config(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(validation, timer_fuzzy_threshold);
        update_if_present!(validation, character_fuzzy_threshold);
        update_if_present!(validation, player_fuzzy_threshold);
        update_if_present!(validation, player_context_bonus);
        update_if_present!(validation, player_context_penalty);
        update_if_present!(validation, player_search_limit);
        update_if_present!(validation, similarity_metric);

        update_if_present!(smoothing, smoothing_window);
        update_if_present!(smoothing, timer_tolerance);
        update_if_present!(smoothing, timer_extrapolation_step);
        update_if_present!(smoothing, character_neighbor_similarity);

        update_if_present!(detection, start_threshold);
        update_if_present!(detection, low_threshold);
        update_if_present!(detection, jump_threshold);
        update_if_present!(detection, min_round_duration);
        update_if_present!(detection, buffer_size);
        update_if_present!(detection, timer_history_size);
        update_if_present!(detection, min_window_frames);
        update_if_present!(detection, coherence_threshold);
        update_if_present!(detection, timer_origin);
        update_if_present!(detection, high_start_timer);

        update_if_present!(grouping, max_set_gap);
        update_if_present!(grouping, min_rounds_per_set);
        update_if_present!(grouping, min_character_consistency);
        update_if_present!(grouping, max_match_gap);
        update_if_present!(grouping, min_sets_per_match);
        update_if_present!(grouping, min_rounds_single_set_match);
        update_if_present!(grouping, split_on_double_character_change);
    }

    /// Rejects threshold combinations the pipeline cannot run with.
    pub fn validate(&self) -> MfResult<()> {
        let v = &self.validation;
        for (name, value) in [
            ("timer_fuzzy_threshold", v.timer_fuzzy_threshold),
            ("character_fuzzy_threshold", v.character_fuzzy_threshold),
            ("player_fuzzy_threshold", v.player_fuzzy_threshold),
            (
                "character_neighbor_similarity",
                self.smoothing.character_neighbor_similarity,
            ),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(name, format!("{} is outside 0-100", value)));
            }
        }
        if v.player_context_bonus < 0.0 || v.player_context_penalty < 0.0 {
            return Err(invalid(
                "player_context_bonus",
                "context adjustments must be non-negative".to_string(),
            ));
        }
        if v.player_search_limit == 0 {
            return Err(invalid("player_search_limit", "must be at least 1".into()));
        }

        if self.smoothing.smoothing_window == 0 {
            return Err(invalid("smoothing_window", "must be at least 1".into()));
        }

        let d = &self.detection;
        for (name, value) in [
            ("start_threshold", d.start_threshold),
            ("low_threshold", d.low_threshold),
            ("timer_origin", d.timer_origin),
            ("high_start_timer", d.high_start_timer),
        ] {
            if value > 99 {
                return Err(invalid(name, format!("{} is not a timer value", value)));
            }
        }
        if d.low_threshold >= d.start_threshold {
            return Err(invalid(
                "low_threshold",
                format!(
                    "low ({}) must be below start ({})",
                    d.low_threshold, d.start_threshold
                ),
            ));
        }
        if d.start_threshold > d.timer_origin {
            return Err(invalid(
                "start_threshold",
                format!("{} exceeds timer origin {}", d.start_threshold, d.timer_origin),
            ));
        }
        if d.jump_threshold == 0 {
            return Err(invalid("jump_threshold", "must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&d.coherence_threshold) {
            return Err(invalid(
                "coherence_threshold",
                format!("{} is outside 0-1", d.coherence_threshold),
            ));
        }
        if d.min_round_duration < 0.0 {
            return Err(invalid("min_round_duration", "must be non-negative".into()));
        }
        if d.timer_history_size == 0 || d.min_window_frames == 0 {
            return Err(invalid(
                "timer_history_size",
                "history and window sizes must be at least 1".into(),
            ));
        }

        let g = &self.grouping;
        if g.max_set_gap <= 0.0 || g.max_match_gap <= 0.0 {
            return Err(invalid("max_set_gap", "gaps must be positive".into()));
        }
        if !(0.0..=1.0).contains(&g.min_character_consistency) {
            return Err(invalid(
                "min_character_consistency",
                format!("{} is outside 0-1", g.min_character_consistency),
            ));
        }
        if g.min_rounds_per_set == 0
            || g.min_sets_per_match == 0
            || g.min_rounds_single_set_match == 0
        {
            return Err(invalid(
                "min_rounds_per_set",
                "minimum counts must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> MatchForgeError {
    MatchForgeError::Config(format!("Invalid '{}': {}", field, reason))
}
