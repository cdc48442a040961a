mod common;

use common::{countdown, deductor, rounds};
use matchforge::config::Config;
use matchforge::frame::{Frame, FrameSequence};
use matchforge::report::DETECTION_METHOD;
use matchforge::MatchDeductor;
use serde_json::Value;

const RK: (&str, &str) = ("RYU", "KEN");
const PLAYERS: (&str, &str) = ("Daigo", "Tokido");

#[test]
fn test_clean_countdown_yields_one_round() {
    let frames = countdown(0.0, 99, 60, RK, PLAYERS);
    let report = deductor().analyze_frames(&frames);

    assert_eq!(report.stats.rounds_detected, 1);
    // One round is not a match on its own
    assert!(report.matches.is_empty());
    assert_eq!(report.stats.dropped_rounds, 1);
    assert_eq!(report.stats.total_frames, 40);
    assert_eq!(report.stats.frames_with_valid_timer, 40);
    assert_eq!(report.stats.timer_detection_rate, 1.0);
}

#[test]
fn test_two_rounds_make_a_set_without_a_match() {
    let (frames, _) = rounds(0.0, 2, 5.0, RK, PLAYERS);
    let report = deductor().analyze_frames(&frames);

    assert_eq!(report.stats.rounds_detected, 2);
    assert_eq!(report.stats.sets_detected, 1);
    assert_eq!(report.stats.dropped_matches, 1);
    assert!(report.matches.is_empty());
}

#[test]
fn test_three_rounds_make_a_match() {
    let (frames, _) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    let report = deductor().analyze_frames(&frames);

    assert_eq!(report.matches.len(), 1);
    let m = &report.matches[0];
    assert_eq!(m.sets_count, 1);
    assert_eq!(m.total_rounds, 3);
    assert_eq!(m.player1.as_deref(), Some("Daigo"));
    assert_eq!(m.player2.as_deref(), Some("Tokido"));

    let first = &m.sets[0].rounds[0];
    assert_eq!(first.timer_start, 99);
    assert_eq!(first.start_time, 0.0);
    assert!(first.confidence > 0.8, "confidence {}", first.confidence);

    // Rounds are ordered and never overlap
    let all: Vec<_> = m.rounds().collect();
    for pair in all.windows(2) {
        assert!(pair[0].end_time <= pair[1].start_time);
    }

    assert_eq!(report.stats.total_matches, 1);
    assert_eq!(report.stats.total_sets, 1);
    assert_eq!(report.stats.total_rounds, 3);
    assert_eq!(report.stats.avg_rounds_per_set, 3.0);
}

#[test]
fn test_full_character_swap_splits_matches() {
    let (mut frames, end) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    frames.extend(rounds(end + 5.0, 3, 5.0, ("LUKE", "JP"), PLAYERS).0);
    let report = deductor().analyze_frames(&frames);

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].matchup_summary, "RYU vs KEN");
    assert_eq!(report.matches[1].matchup_summary, "LUKE vs JP");
}

#[test]
fn test_noisy_ocr_still_recovers_structure() {
    let (mut frames, _) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    for (i, frame) in frames.iter_mut().enumerate() {
        if i % 7 == 3 {
            frame.timer_raw = None;
        }
        if i % 11 == 5 {
            frame.character1 = Some("RY0".to_string());
        }
        if i % 13 == 6 {
            frame.player2 = Some("[JP] Tokido".to_string());
        }
    }
    let report = deductor().analyze_frames(&frames);

    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].total_rounds, 3);
    assert_eq!(report.matches[0].sets[0].character1.as_deref(), Some("RYU"));
    assert_eq!(report.matches[0].player2.as_deref(), Some("Tokido"));
    assert!(report.stats.timer_detection_rate < 1.0);
}

#[test]
fn test_empty_input_yields_empty_report() {
    let report = deductor().analyze_frames(&[]);
    assert!(report.matches.is_empty());
    assert_eq!(report.stats.total_frames, 0);
    assert_eq!(report.stats.timer_detection_rate, 0.0);
    assert_eq!(report.video_duration, 0.0);
}

#[test]
fn test_frames_without_timers_yield_nothing() {
    let frames: Vec<Frame> = (0..100)
        .map(|i| Frame {
            character1: Some("RYU".to_string()),
            character2: Some("KEN".to_string()),
            ..Frame::new(i as f64)
        })
        .collect();
    let report = deductor().analyze_frames(&frames);

    assert!(report.matches.is_empty());
    assert_eq!(report.stats.windows_opened, 0);
    assert_eq!(report.stats.character_detection_rate, 1.0);
}

#[test]
fn test_out_of_order_frames_are_skipped() {
    let (mut frames, _) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    let stray = Frame {
        timer_raw: Some("10".to_string()),
        ..Frame::new(3.0)
    };
    frames.insert(50, stray);

    let sequence = FrameSequence {
        frames,
        skipped: 2,
    };
    let report = deductor().analyze(Some("stream"), &sequence);

    assert_eq!(report.video_name.as_deref(), Some("stream"));
    assert_eq!(report.stats.frames_skipped, 3);
    assert_eq!(report.stats.total_frames, 120 + 3);
    assert_eq!(report.matches.len(), 1);
}

#[test]
fn test_matches_txt_lines() {
    let (mut frames, end) = rounds(3600.0, 3, 5.0, RK, PLAYERS);
    frames.extend(rounds(end + 5.0, 3, 5.0, ("LUKE", "JP"), PLAYERS).0);
    let report = deductor().analyze_frames(&frames);

    let text = report.to_matches_txt();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "01:00:00 Daigo (Ryu) VS Tokido (Ken)");
    assert!(lines[1].ends_with("Daigo (Luke) VS Tokido (Jp)"));

    let mut buffer = Vec::new();
    report.write_matches_txt(&mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), format!("{}\n", text));
}

#[test]
fn test_character_hidden_when_side_switches() {
    let (mut frames, end) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    frames.extend(rounds(end + 5.0, 3, 5.0, ("RYU", "JP"), PLAYERS).0);
    let report = deductor().analyze_frames(&frames);

    assert_eq!(report.matches.len(), 1);
    assert_eq!(
        report.to_matches_txt(),
        "00:00:00 Daigo (Ryu) VS Tokido"
    );
}

#[test]
fn test_json_report_shape() {
    let (frames, _) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    let report = deductor().analyze(Some("evo_top8"), &FrameSequence::from(frames));
    let json: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["video_name"], "evo_top8");
    assert_eq!(json["detection_method"], DETECTION_METHOD);
    assert_eq!(json["matches"][0]["start_time"], "00:00:00");
    assert_eq!(json["matches"][0]["sets"][0]["rounds"][0]["timer_start"], 99);
    assert!(json["matches"][0]["winner"].is_null());
    assert_eq!(json["parameters"]["detection"]["start_threshold"], 95);
    assert_eq!(json["stats"]["total_rounds"], 3);
    assert!(json["analysis_date"].as_str().is_some_and(|d| d.len() == 19));
}

#[test]
fn test_deductor_is_reusable_and_deterministic() {
    let (frames, _) = rounds(0.0, 3, 5.0, RK, PLAYERS);
    let deductor = deductor();
    let a = deductor.analyze_frames(&frames);
    let b = deductor.analyze_frames(&frames);
    assert_eq!(a.matches, b.matches);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.detection.low_threshold = 99;
    assert!(MatchDeductor::with_config(config).is_err());
}
