use crate::config::GroupingParams;
use crate::grouping::pairing::{Orientation, Pairing};
use crate::grouping::SplitReason;
use crate::model::{Round, Set};
use crate::util::{majority_vote, mean};
use serde::Serialize;
use tracing::debug;

// A best-of-three is the usual full set
const FULL_SET_ROUNDS: f32 = 3.0;
const PLAUSIBLE_SET_SECONDS: std::ops::RangeInclusive<f64> = 120.0..=900.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetStats {
    pub sets_detected: usize,
    pub dropped_sets: usize,
    pub dropped_rounds: usize,
}

/// Groups consecutive rounds sharing a character pairing into sets.
#[derive(Debug, Clone)]
pub struct SetGrouper {
    max_gap: f64,
    min_rounds: usize,
    min_consistency: f32,
}

impl SetGrouper {
    pub fn new(params: &GroupingParams) -> Self {
        Self {
            max_gap: params.max_set_gap,
            min_rounds: params.min_rounds_per_set,
            min_consistency: params.min_character_consistency,
        }
    }

    pub fn group(&self, rounds: Vec<Round>) -> (Vec<Set>, SetStats) {
        let mut sets = Vec::new();
        let mut stats = SetStats::default();
        let mut current: Vec<(Round, Orientation)> = Vec::new();
        let mut pairing = Pairing::default();

        for round in rounds {
            let characters = round.characters();
            let orientation = characters.orientation_against(&pairing);

            let split = match current.last() {
                Some((prev, _)) if round.start_time - prev.end_time > self.max_gap => {
                    Some(SplitReason::Gap)
                }
                Some(_) if orientation.is_none() => Some(SplitReason::CharacterChange),
                _ => None,
            };

            let orientation = if let Some(reason) = split {
                debug!("New set at {:.1}s: {}", round.start_time, reason);
                self.finish(std::mem::take(&mut current), &mut sets, &mut stats);
                pairing = Pairing::default();
                Orientation::Direct
            } else {
                orientation.unwrap_or(Orientation::Direct)
            };

            pairing.fill_from(&characters.aligned(orientation));
            current.push((round, orientation));
        }
        self.finish(current, &mut sets, &mut stats);

        (sets, stats)
    }

    fn finish(&self, group: Vec<(Round, Orientation)>, sets: &mut Vec<Set>, stats: &mut SetStats) {
        if group.is_empty() {
            return;
        }
        if group.len() < self.min_rounds {
            debug!(
                "Dropping set candidate with {} round(s) starting at {:.1}s",
                group.len(),
                group[0].0.start_time
            );
            stats.dropped_sets += 1;
            stats.dropped_rounds += group.len();
            return;
        }

        let characters: Vec<Pairing> = group.iter().map(|(r, o)| r.characters().aligned(*o)).collect();
        let players: Vec<Pairing> = group.iter().map(|(r, o)| r.players().aligned(*o)).collect();

        let character1 = majority_vote(characters.iter().filter_map(|p| p.first.clone()));
        let character2 = majority_vote(characters.iter().filter_map(|p| p.second.clone()));
        let player1 = majority_vote(players.iter().filter_map(|p| p.first.clone()));
        let player2 = majority_vote(players.iter().filter_map(|p| p.second.clone()));

        let consistency = character_consistency(&characters, &character1, &character2);
        if consistency < self.min_consistency {
            debug!(
                "Dropping set candidate at {:.1}s: character consistency {:.2}",
                group[0].0.start_time, consistency
            );
            stats.dropped_sets += 1;
            stats.dropped_rounds += group.len();
            return;
        }

        let rounds: Vec<Round> = group
            .into_iter()
            .enumerate()
            .map(|(i, (mut round, _))| {
                round.round_number = i + 1;
                round
            })
            .collect();

        let start_time = rounds[0].start_time;
        let end_time = rounds[rounds.len() - 1].end_time;
        let avg_confidence = mean(&rounds.iter().map(|r| r.confidence).collect::<Vec<_>>());
        let confidence = set_quality(
            consistency,
            avg_confidence,
            rounds.len(),
            end_time - start_time,
        );

        stats.sets_detected += 1;
        sets.push(Set {
            set_number: sets.len() + 1,
            character1,
            character2,
            player1,
            player2,
            start_time,
            end_time,
            rounds_count: rounds.len(),
            confidence,
            character_consistency: consistency,
            rounds,
        });
    }
}

/// Per side, the share of rounds showing the dominant character; averaged over
/// both sides. Rounds missing a side count against it.
pub fn character_consistency(
    characters: &[Pairing],
    character1: &Option<String>,
    character2: &Option<String>,
) -> f32 {
    if characters.is_empty() {
        return 0.0;
    }
    let hits: usize = characters
        .iter()
        .map(|p| {
            usize::from(character1.is_some() && p.first == *character1)
                + usize::from(character2.is_some() && p.second == *character2)
        })
        .sum();
    hits as f32 / (2.0 * characters.len() as f32)
}

/// 0.4 consistency + 0.3 round confidence + 0.2 round count + 0.1 duration.
pub fn set_quality(consistency: f32, avg_confidence: f32, rounds: usize, duration: f64) -> f32 {
    let rounds_bonus = (rounds as f32 / FULL_SET_ROUNDS).min(1.0);
    let duration_bonus = if PLAUSIBLE_SET_SECONDS.contains(&duration) {
        1.0
    } else {
        0.5
    };
    (0.4 * consistency + 0.3 * avg_confidence + 0.2 * rounds_bonus + 0.1 * duration_bonus)
        .clamp(0.0, 1.0)
}
