use crate::config::SmoothingParams;
use crate::frame::{Frame, ValidatedFrame};
use crate::smoother::TemporalSmoother;
use crate::text::player::PlayerValidator;
use crate::text::validator::{Field, TextValidator, ValidationStats};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ProcessedFrames {
    pub frames: Vec<ValidatedFrame>,
    pub validation: ValidationStats,
}

/// Raw frames to validated, smoothed frames.
#[derive(Clone)]
pub struct FrameProcessor {
    text: TextValidator,
    players: PlayerValidator,
    smoother: TemporalSmoother,
}

impl FrameProcessor {
    pub fn new(text: TextValidator, players: PlayerValidator, smoothing: &SmoothingParams) -> Self {
        Self {
            text,
            players,
            smoother: TemporalSmoother::new(smoothing),
        }
    }

    pub fn text(&self) -> &TextValidator {
        &self.text
    }

    pub fn players(&self) -> &PlayerValidator {
        &self.players
    }

    pub fn process(&self, frames: &[Frame]) -> ProcessedFrames {
        let mut validation = ValidationStats::default();

        // 1. Timers and characters, frame by frame
        let validated: Vec<ValidatedFrame> = frames
            .iter()
            .map(|frame| {
                let timer = self.text.validate_timer(frame.timer_raw.as_deref());
                let character1 = self.text.validate_character(frame.character1.as_deref());
                let character2 = self.text.validate_character(frame.character2.as_deref());

                validation.record(Field::Timer, frame.timer_raw.as_deref(), &timer);
                validation.record(Field::Character, frame.character1.as_deref(), &character1);
                validation.record(Field::Character, frame.character2.as_deref(), &character2);

                ValidatedFrame {
                    timestamp: frame.timestamp,
                    timer,
                    character1,
                    character2,
                    player1: None,
                    player2: None,
                }
            })
            .collect();

        // 2. Local consensus over the sliding window
        let mut smoothed = self.smoother.smooth(
            &validated,
            self.text.characters(),
            self.text.similarity(),
        );

        // 3. Players, using the smoothed same-side character as context
        let mut cache: HashMap<(String, Option<String>), Option<String>> = HashMap::new();
        for (frame, raw) in smoothed.iter_mut().zip(frames) {
            let player1 = self.resolve_player(&mut cache, raw.player1.as_deref(), &frame.character1);
            let player2 = self.resolve_player(&mut cache, raw.player2.as_deref(), &frame.character2);

            validation.record(Field::Player, raw.player1.as_deref(), &player1);
            validation.record(Field::Player, raw.player2.as_deref(), &player2);

            frame.player1 = player1;
            frame.player2 = player2;
        }

        debug!(
            "Validated {} frames (timer {}/{}, character {}/{}, player {}/{})",
            smoothed.len(),
            validation.timer.validated,
            validation.timer.validated + validation.timer.rejected,
            validation.character.validated,
            validation.character.validated + validation.character.rejected,
            validation.player.validated,
            validation.player.validated + validation.player.rejected,
        );

        ProcessedFrames {
            frames: smoothed,
            validation,
        }
    }

    fn resolve_player(
        &self,
        cache: &mut HashMap<(String, Option<String>), Option<String>>,
        raw: Option<&str>,
        context: &Option<String>,
    ) -> Option<String> {
        let raw = raw?;
        let key = (raw.to_string(), context.clone());
        cache
            .entry(key)
            .or_insert_with(|| self.players.validate(Some(raw), context.as_deref()))
            .clone()
    }
}
