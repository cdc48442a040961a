mod common;

use common::{countdown, deductor, validated_run};
use matchforge::config::{Config, DetectionParams};
use matchforge::detector::{backdated_start, coherence, RoundDetector};
use matchforge::frame::Frame;
use matchforge::smoother::TemporalSmoother;
use matchforge::text::{Levenshtein, Vocabulary};
use proptest::prelude::*;

// --- STRATEGIES ---

fn arb_timers() -> impl Strategy<Value = Vec<Option<u8>>> {
    proptest::collection::vec(proptest::option::weighted(0.85, 0u8..=99), 0..300)
}

const CHARACTERS: [&str; 4] = ["RYU", "KEN", "LUKE", "JP"];
const PLAYERS: [&str; 3] = ["Daigo", "Tokido", "Punk"];

// One round of play: where the timer stops, who is on screen, and the
// pause before the next round.
prop_compose! {
    fn arb_round()(
        stop in 10u8..80,
        c1 in 0..CHARACTERS.len(),
        c2 in 0..CHARACTERS.len(),
        p1 in 0..PLAYERS.len(),
        p2 in 0..PLAYERS.len(),
        pause in prop_oneof![1.0..10.0f64, 150.0..400.0f64],
    ) -> (u8, (usize, usize), (usize, usize), f64) {
        (stop, (c1, c2), (p1, p2), pause)
    }
}

fn build_stream(plan: &[(u8, (usize, usize), (usize, usize), f64)]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut t = 0.0;
    for &(stop, (c1, c2), (p1, p2), pause) in plan {
        let round = countdown(
            t,
            99,
            stop,
            (CHARACTERS[c1], CHARACTERS[c2]),
            (PLAYERS[p1], PLAYERS[p2]),
        );
        t = round.last().map_or(t, |f| f.timestamp) + pause;
        frames.extend(round);
    }
    frames
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_character_validation_is_idempotent(raw in "[A-Za-z0-9 .\\-]{0,12}") {
        let deductor = deductor();
        let text = deductor.processor().text();
        if let Some(value) = text.validate_character(Some(&raw)) {
            prop_assert_eq!(text.validate_character(Some(&value)), Some(value.clone()));
        }
    }

    #[test]
    fn test_timer_validation_stays_in_range(raw in "[0-9A-Za-z|]{0,4}") {
        let deductor = deductor();
        let text = deductor.processor().text();
        if let Some(t) = text.validate_timer(Some(&raw)) {
            prop_assert!(t <= 99);
            prop_assert_eq!(text.validate_timer(Some(&format!("{:02}", t))), Some(t));
        }
    }

    #[test]
    fn test_backdated_start_is_bounded(
        detection in 0.0..10_000.0f64,
        timer in 0u8..=99,
        floor_back in 0.0..500.0f64,
    ) {
        let floor = (detection - floor_back).max(0.0);
        let start = backdated_start(detection, timer, 99, floor);
        prop_assert!(start >= floor);
        prop_assert!(start <= detection);
    }

    #[test]
    fn test_coherence_is_a_fraction(readings in proptest::collection::vec(0u8..=99, 0..100)) {
        let c = coherence(&readings);
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn test_smoothing_keeps_shape(timers in arb_timers()) {
        let frames = validated_run(0.0, &timers);
        let vocab = Vocabulary::new(["RYU", "KEN"]);
        let smoothed = TemporalSmoother::new(&Config::default().smoothing)
            .smooth(&frames, &vocab, &Levenshtein);

        prop_assert_eq!(smoothed.len(), frames.len());
        for (a, b) in smoothed.iter().zip(&frames) {
            prop_assert_eq!(a.timestamp, b.timestamp);
            if let Some(t) = a.timer {
                prop_assert!(t <= 99);
            }
        }
    }

    #[test]
    fn test_detected_rounds_are_well_formed(timers in arb_timers()) {
        let params = DetectionParams::default();
        let rounds = RoundDetector::new(&params).detect_all(&validated_run(0.0, &timers));

        for round in &rounds {
            prop_assert!(round.start_time <= round.detection_time);
            prop_assert!(round.detection_time <= round.end_time);
            prop_assert!(round.frames_count >= params.min_window_frames);
            prop_assert!(round.coherence >= params.coherence_threshold);
            prop_assert!((0.0..=1.0).contains(&round.confidence));
            prop_assert_eq!(round.timer_start, params.timer_origin);
        }
        for pair in rounds.windows(2) {
            prop_assert!(pair[0].end_time <= pair[1].start_time);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(60))]

    #[test]
    fn test_hierarchy_invariants(plan in proptest::collection::vec(arb_round(), 1..12)) {
        let frames = build_stream(&plan);
        let report = deductor().analyze_frames(&frames);
        let grouping = &report.parameters.grouping;

        let mut previous_end = f64::NEG_INFINITY;
        let mut total_sets = 0;
        let mut total_rounds = 0;

        for (i, m) in report.matches.iter().enumerate() {
            prop_assert_eq!(m.match_id, i + 1);
            prop_assert_eq!(m.sets_count, m.sets.len());
            prop_assert!(
                m.sets_count >= grouping.min_sets_per_match
                    || (m.sets_count == 1 && m.total_rounds >= grouping.min_rounds_single_set_match)
            );
            prop_assert!(m.start_time >= previous_end);
            prop_assert!(m.start_time <= m.end_time);
            prop_assert!((0.0..=1.0).contains(&m.confidence));
            prop_assert!(m.winner.is_none());
            previous_end = m.end_time;

            let mut rounds_in_match = 0;
            for (j, set) in m.sets.iter().enumerate() {
                prop_assert_eq!(set.set_number, j + 1);
                prop_assert_eq!(set.rounds_count, set.rounds.len());
                prop_assert!(set.rounds_count >= grouping.min_rounds_per_set);
                prop_assert!(set.start_time >= m.start_time && set.end_time <= m.end_time);
                for (k, round) in set.rounds.iter().enumerate() {
                    prop_assert_eq!(round.round_number, k + 1);
                    prop_assert!(round.start_time >= set.start_time && round.end_time <= set.end_time);
                }
                rounds_in_match += set.rounds_count;
            }
            prop_assert_eq!(m.total_rounds, rounds_in_match);
            total_sets += m.sets_count;
            total_rounds += m.total_rounds;
        }

        prop_assert_eq!(report.stats.total_sets, total_sets);
        prop_assert_eq!(report.stats.total_rounds, total_rounds);
        prop_assert!(
            report.stats.rounds_detected >= total_rounds + report.stats.dropped_rounds
        );
    }
}
