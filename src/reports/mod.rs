use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use matchforge::report::{ReportStats, VideoAnalysisReport};
use matchforge::text::Field;
use matchforge::timecode::format_hms;

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|l| Cell::new(l).add_attribute(Attribute::Bold))
        .collect()
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn confidence_cell(value: f32) -> Cell {
    let color = if value >= 0.8 {
        Color::Green
    } else if value >= 0.6 {
        Color::Yellow
    } else {
        Color::Red
    };
    right(format!("{:.2}", value)).fg(color)
}

pub fn print_match_table(report: &VideoAnalysisReport) {
    let name = report.video_name.as_deref().unwrap_or("video");
    println!(
        "\n🎮 === {} ({}) === 🎮",
        name,
        format_hms(report.video_duration)
    );

    if report.matches.is_empty() {
        println!("No matches found. See statistics below for coverage.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(&[
        "#", "Start", "End", "Player 1", "Player 2", "Sets", "Rounds", "Matchup", "Conf",
    ]));

    for m in &report.matches {
        table.add_row(vec![
            right(m.match_id.to_string()),
            Cell::new(format_hms(m.start_time)),
            Cell::new(format_hms(m.end_time)),
            Cell::new(m.player1.as_deref().unwrap_or("?")),
            Cell::new(m.player2.as_deref().unwrap_or("?")),
            right(m.sets_count.to_string()),
            right(m.total_rounds.to_string()),
            Cell::new(&m.matchup_summary),
            confidence_cell(m.confidence),
        ]);
    }

    println!("{table}");
}

pub fn print_stats_table(report: &VideoAnalysisReport) {
    let s = &report.stats;
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(header(&["Statistic", "Value"]));

    let rows: Vec<(&str, String)> = vec![
        ("Frames", s.total_frames.to_string()),
        ("Frames skipped", s.frames_skipped.to_string()),
        ("Frames with timer", s.frames_with_valid_timer.to_string()),
        ("Timer detection", format!("{:.1}%", s.timer_detection_rate * 100.0)),
        (
            "Character detection",
            format!("{:.1}%", s.character_detection_rate * 100.0),
        ),
        (
            "Player detection",
            format!("{:.1}%", s.player_detection_rate * 100.0),
        ),
        ("Windows opened", s.windows_opened.to_string()),
        ("Windows rejected", s.windows_rejected.to_string()),
        ("Rounds detected", s.rounds_detected.to_string()),
        ("Sets detected", s.sets_detected.to_string()),
        ("Dropped rounds", s.dropped_rounds.to_string()),
        ("Dropped sets", s.dropped_sets.to_string()),
        ("Dropped matches", s.dropped_matches.to_string()),
        ("Matches", s.total_matches.to_string()),
        ("Avg sets / match", format!("{:.2}", s.avg_sets_per_match)),
        ("Avg rounds / set", format!("{:.2}", s.avg_rounds_per_set)),
        ("Avg round confidence", format!("{:.2}", s.avg_round_confidence)),
    ];

    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right(value)]);
    }

    println!("\n📊 === STATISTICS ===");
    println!("{table}");
}

pub fn print_batch_table(rows: &[(String, Option<ReportStats>)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(header(&["Video", "Frames", "Timer %", "Rounds", "Sets", "Matches"]));

    for (name, stats) in rows {
        match stats {
            Some(s) => table.add_row(vec![
                Cell::new(name),
                right(s.total_frames.to_string()),
                right(format!("{:.1}", s.timer_detection_rate * 100.0)),
                right(s.rounds_detected.to_string()),
                right(s.total_sets.to_string()),
                right(s.total_matches.to_string()),
            ]),
            None => table.add_row(vec![
                Cell::new(name),
                Cell::new("FAILED").fg(Color::Red),
            ]),
        };
    }

    println!("\n📦 === BATCH SUMMARY ===");
    println!("{table}");
}

pub fn print_normalization_table(field: Field, results: &[(String, Option<String>)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    let title = format!("Canonical {}", field);
    table.set_header(header(&["Raw", title.as_str()]));

    for (raw, value) in results {
        let cell = match value {
            Some(v) => Cell::new(v).fg(Color::Green),
            None => Cell::new("(rejected)").fg(Color::Red),
        };
        table.add_row(vec![Cell::new(raw), cell]);
    }

    println!("{table}");
}
