use crate::config::SmoothingParams;
use crate::frame::ValidatedFrame;
use crate::text::similarity::Similarity;
use crate::text::validator::Vocabulary;
use crate::util::{count_of, majority_vote};

const TIMER_MAX: u8 = 99;

/// Centered sliding-window correction of timer and character fields.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    half: usize,
    tolerance: u8,
    step: u8,
    neighbor_similarity: f32,
}

impl TemporalSmoother {
    pub fn new(params: &SmoothingParams) -> Self {
        Self {
            half: params.smoothing_window / 2,
            tolerance: params.timer_tolerance,
            step: params.timer_extrapolation_step,
            neighbor_similarity: params.character_neighbor_similarity,
        }
    }

    /// Same length and order as the input. The first and last `window / 2`
    /// frames pass through unchanged.
    pub fn smooth(
        &self,
        frames: &[ValidatedFrame],
        characters: &Vocabulary,
        similarity: &dyn Similarity,
    ) -> Vec<ValidatedFrame> {
        let timers: Vec<Option<u8>> = frames.iter().map(|f| f.timer).collect();
        let c1: Vec<Option<String>> = frames.iter().map(|f| f.character1.clone()).collect();
        let c2: Vec<Option<String>> = frames.iter().map(|f| f.character2.clone()).collect();

        let timers = self.smooth_timers(&timers);
        let c1 = self.smooth_characters(&c1, characters, similarity);
        let c2 = self.smooth_characters(&c2, characters, similarity);

        frames
            .iter()
            .zip(timers)
            .zip(c1.into_iter().zip(c2))
            .map(|((frame, timer), (character1, character2))| ValidatedFrame {
                timer,
                character1,
                character2,
                ..frame.clone()
            })
            .collect()
    }

    fn central_range(&self, len: usize) -> std::ops::Range<usize> {
        if self.half == 0 || len <= 2 * self.half {
            return 0..0;
        }
        self.half..len - self.half
    }

    pub fn smooth_timers(&self, timers: &[Option<u8>]) -> Vec<Option<u8>> {
        let mut out = timers.to_vec();

        for i in self.central_range(timers.len()) {
            if self.is_coherent(timers, i) {
                continue;
            }

            let prev = timers[i - self.half..i].iter().rev().flatten().next().copied();
            let next = timers[i + 1..=i + self.half].iter().flatten().next().copied();

            out[i] = match (prev, next) {
                (Some(p), Some(n)) => {
                    let avg = ((p as f32 + n as f32) / 2.0).round() as u8;
                    // Never interpolate upwards through a round reset.
                    if p >= n {
                        Some(avg.clamp(n, p))
                    } else {
                        Some(p)
                    }
                }
                (Some(p), None) => Some(p.saturating_sub(self.step)),
                (None, Some(n)) => Some(n.saturating_add(self.step).min(TIMER_MAX)),
                (None, None) => majority_vote(timers[i - self.half..=i + self.half].iter().flatten().copied()),
            };
        }

        out
    }

    /// Present and within tolerance of at least one directly adjacent reading
    /// (or with no adjacent readings at all).
    fn is_coherent(&self, timers: &[Option<u8>], i: usize) -> bool {
        let Some(center) = timers[i] else {
            return false;
        };
        let adjacent: Vec<u8> = [timers.get(i.wrapping_sub(1)), timers.get(i + 1)]
            .into_iter()
            .flatten()
            .flatten()
            .copied()
            .collect();
        adjacent.is_empty() || adjacent.iter().any(|&a| center.abs_diff(a) <= self.tolerance)
    }

    pub fn smooth_characters(
        &self,
        values: &[Option<String>],
        vocabulary: &Vocabulary,
        similarity: &dyn Similarity,
    ) -> Vec<Option<String>> {
        let mut out = values.to_vec();

        for i in self.central_range(values.len()) {
            let window = &values[i - self.half..=i + self.half];
            let members: Vec<&String> = window
                .iter()
                .flatten()
                .filter(|v| vocabulary.contains(v))
                .collect();

            out[i] = match &values[i] {
                Some(center) => {
                    let center_count = count_of(&members, &center);
                    let mut best: Option<(&String, usize, f32)> = None;
                    for &candidate in &members {
                        if candidate == center {
                            continue;
                        }
                        let score = similarity.similarity(center, candidate);
                        if score < self.neighbor_similarity {
                            continue;
                        }
                        let count = count_of(&members, &candidate);
                        if count <= center_count {
                            continue;
                        }
                        let better = match best {
                            None => true,
                            Some((_, c, s)) => count > c || (count == c && score > s),
                        };
                        if better {
                            best = Some((candidate, count, score));
                        }
                    }
                    Some(best.map_or_else(|| center.clone(), |(v, _, _)| v.clone()))
                }
                None => majority_vote(members.into_iter().cloned()),
            };
        }

        out
    }
}
