use crate::config::GroupingParams;
use crate::grouping::pairing::{Orientation, Pairing};
use crate::grouping::SplitReason;
use crate::model::{Match, Set};
use crate::util::{majority_vote, mean};
use serde::Serialize;
use std::iter;
use tracing::debug;

const PLAUSIBLE_MATCH_SECONDS: std::ops::RangeInclusive<f64> = 300.0..=1800.0;
// Past the plausible range the duration bonus fades out over this many seconds
const OVERLONG_FALLOFF: f64 = 1200.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub matches_detected: usize,
    pub dropped_matches: usize,
    pub dropped_match_sets: usize,
}

/// Groups consecutive sets between the same players into matches.
#[derive(Debug, Clone)]
pub struct MatchGrouper {
    max_gap: f64,
    min_sets: usize,
    min_rounds_single_set: usize,
    split_on_double_change: bool,
}

impl MatchGrouper {
    pub fn new(params: &GroupingParams) -> Self {
        Self {
            max_gap: params.max_match_gap,
            min_sets: params.min_sets_per_match,
            min_rounds_single_set: params.min_rounds_single_set_match,
            split_on_double_change: params.split_on_double_character_change,
        }
    }

    pub fn group(&self, sets: Vec<Set>) -> (Vec<Match>, MatchStats) {
        let mut matches = Vec::new();
        let mut stats = MatchStats::default();
        let mut current: Vec<(Set, Orientation)> = Vec::new();
        let mut players = Pairing::default();

        for set in sets {
            let orientation = set.players().orientation_against(&players);
            let split = match current.last() {
                Some((prev, prev_orientation)) => {
                    self.split_reason(prev, *prev_orientation, &set, orientation)
                }
                None => None,
            };

            let orientation = if let Some(reason) = split {
                debug!("New match at {:.1}s: {}", set.start_time, reason);
                self.finish(std::mem::take(&mut current), &mut matches, &mut stats);
                players = Pairing::default();
                Orientation::Direct
            } else {
                orientation.unwrap_or(Orientation::Direct)
            };

            players.fill_from(&set.players().aligned(orientation));
            current.push((set, orientation));
        }
        self.finish(current, &mut matches, &mut stats);

        (matches, stats)
    }

    fn split_reason(
        &self,
        prev: &Set,
        prev_orientation: Orientation,
        next: &Set,
        orientation: Option<Orientation>,
    ) -> Option<SplitReason> {
        if next.start_time - prev.end_time > self.max_gap {
            return Some(SplitReason::Gap);
        }
        let Some(orientation) = orientation else {
            return Some(SplitReason::PlayerChange);
        };
        if self.split_on_double_change {
            let before = prev.characters().aligned(prev_orientation);
            let after = next_characters(next, orientation, &before);
            if before.changed_on_both_sides(&after) {
                return Some(SplitReason::DoubleCharacterChange);
            }
        }
        None
    }

    fn structure_bonus(&self, sets: usize, rounds: usize) -> f32 {
        if sets >= self.min_sets {
            1.0
        } else if sets == 1 && rounds >= self.min_rounds_single_set {
            0.8
        } else {
            0.0
        }
    }

    pub fn is_valid(&self, sets: usize, rounds: usize) -> bool {
        sets >= self.min_sets || (sets == 1 && rounds >= self.min_rounds_single_set)
    }

    fn finish(&self, group: Vec<(Set, Orientation)>, matches: &mut Vec<Match>, stats: &mut MatchStats) {
        if group.is_empty() {
            return;
        }
        let total_rounds: usize = group.iter().map(|(s, _)| s.rounds_count).sum();
        if !self.is_valid(group.len(), total_rounds) {
            debug!(
                "Dropping match candidate: {} set(s), {} round(s) starting at {:.1}s",
                group.len(),
                total_rounds,
                group[0].0.start_time
            );
            stats.dropped_matches += 1;
            stats.dropped_match_sets += group.len();
            return;
        }

        // Each set votes once per round it contains.
        let aligned: Vec<(Pairing, usize)> = group
            .iter()
            .map(|(s, o)| (s.players().aligned(*o), s.rounds_count))
            .collect();
        let player1 = majority_vote(
            aligned
                .iter()
                .filter_map(|(p, n)| p.first.clone().map(|v| iter::repeat(v).take(*n)))
                .flatten(),
        );
        let player2 = majority_vote(
            aligned
                .iter()
                .filter_map(|(p, n)| p.second.clone().map(|v| iter::repeat(v).take(*n)))
                .flatten(),
        );

        let sets: Vec<Set> = group
            .into_iter()
            .enumerate()
            .map(|(i, (mut set, _))| {
                set.set_number = i + 1;
                set
            })
            .collect();

        let character_changes = sets
            .windows(2)
            .filter(|w| w[0].characters().orientation_against(&w[1].characters()).is_none())
            .count();
        let start_time = sets[0].start_time;
        let end_time = sets[sets.len() - 1].end_time;
        let avg_set_confidence = mean(&sets.iter().map(|s| s.confidence).collect::<Vec<_>>());
        let played: f64 = sets.iter().map(|s| s.end_time - s.start_time).sum();
        let confidence = match_quality(
            avg_set_confidence,
            self.structure_bonus(sets.len(), total_rounds),
            character_changes,
            played,
        );

        stats.matches_detected += 1;
        matches.push(Match {
            match_id: matches.len() + 1,
            player1,
            player2,
            start_time,
            end_time,
            sets_count: sets.len(),
            total_rounds,
            confidence,
            character_changes,
            matchup_summary: matchup_summary(&sets),
            winner: None,
            sets,
        });
    }
}

/// Characters of `next` lined up against the previous set's aligned pairing.
/// Known players decide the sides; without them the characters line up on
/// their own.
fn next_characters(next: &Set, orientation: Orientation, before: &Pairing) -> Pairing {
    let characters = next.characters();
    if next.players().is_empty() {
        let own = characters.orientation_against(before).unwrap_or(Orientation::Direct);
        characters.aligned(own)
    } else {
        characters.aligned(orientation)
    }
}

/// 0.4 set confidence + 0.3 structure + 0.2 character diversity + 0.1 duration.
/// `played` is the summed duration of the sets.
pub fn match_quality(
    avg_set_confidence: f32,
    structure_bonus: f32,
    character_changes: usize,
    played: f64,
) -> f32 {
    let diversity_bonus = (character_changes as f32 / 2.0).min(1.0);
    let duration_bonus: f64 = if PLAUSIBLE_MATCH_SECONDS.contains(&played) {
        1.0
    } else if played < *PLAUSIBLE_MATCH_SECONDS.start() {
        (played / PLAUSIBLE_MATCH_SECONDS.start()).max(0.0)
    } else {
        (1.0 - (played - PLAUSIBLE_MATCH_SECONDS.end()) / OVERLONG_FALLOFF).max(0.0)
    };
    let duration_bonus = duration_bonus as f32;
    (0.4 * avg_set_confidence + 0.3 * structure_bonus + 0.2 * diversity_bonus + 0.1 * duration_bonus)
        .clamp(0.0, 1.0)
}

/// `"RYU vs KEN → LUKE vs JP"`, collapsing repeated pairings.
pub fn matchup_summary(sets: &[Set]) -> String {
    let mut parts: Vec<String> = Vec::new();
    for set in sets {
        let label = format!(
            "{} vs {}",
            set.character1.as_deref().unwrap_or("?"),
            set.character2.as_deref().unwrap_or("?")
        );
        if parts.last() != Some(&label) {
            parts.push(label);
        }
    }
    parts.join(" → ")
}
