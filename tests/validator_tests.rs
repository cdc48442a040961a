use matchforge::config::ValidationParams;
use matchforge::text::characters::default_roster;
use matchforge::text::roster::{JsonRoster, PlayerProvider, StaticRoster};
use matchforge::text::validator::{clean, extract_timer_digits};
use matchforge::text::{
    IndelRatio, Levenshtein, PlayerValidator, Similarity, SimilarityMetric, TextValidator,
    Vocabulary,
};
use rstest::rstest;
use std::sync::Arc;

fn text_validator() -> TextValidator {
    TextValidator::new(Vocabulary::new(default_roster()), &ValidationParams::default()).unwrap()
}

const ROSTER: &str = r#"{
    "players": [
        "Punk",
        {"name": "Daigo Umehara", "shortName": "Daigo", "mains": ["RYU"]},
        {"name": "Tokido", "mains": ["AKUMA"]},
        {"name": "MARK", "mains": ["RYU"]},
        {"name": "MARC", "characters": ["KEN"]}
    ],
    "static_players": ["MenaRD"]
}"#;

fn player_validator() -> PlayerValidator {
    let roster = JsonRoster::from_json_str(ROSTER).unwrap();
    PlayerValidator::new(Arc::new(roster), &ValidationParams::default()).unwrap()
}

// --- TIMER ---

#[rstest]
#[case("99", Some(99))]
#[case("9S", Some(95))]
#[case("O5", Some(5))]
#[case(" 7 ", Some(7))]
#[case("45s", Some(45))]
#[case("", None)]
#[case("   ", None)]
#[case("TIMER", None)]
fn test_timer_validation(#[case] raw: &str, #[case] expected: Option<u8>) {
    assert_eq!(text_validator().validate_timer(Some(raw)), expected);
}

#[test]
fn test_timer_absent_is_absent() {
    assert_eq!(text_validator().validate_timer(None), None);
}

#[rstest]
#[case("9S", Some("95"))]
#[case("12", Some("12"))]
#[case("3", Some("03"))]
#[case("B0", Some("80"))]
#[case("LIVE 45", Some("45"))]
#[case("SOUTH", None)]
fn test_digit_extraction(#[case] cleaned: &str, #[case] expected: Option<&str>) {
    assert_eq!(extract_timer_digits(cleaned).as_deref(), expected);
}

// --- CHARACTERS ---

#[rstest]
#[case("ryu", Some("RYU"))]
#[case("RY0", Some("RYU"))]
#[case("  chun-li ", Some("CHUN-LI"))]
#[case("dee   jay", Some("DEE JAY"))]
#[case("ZANGlEF", Some("ZANGIEF"))]
#[case("XQWVB", None)]
#[case("", None)]
fn test_character_validation(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(
        text_validator().validate_character(Some(raw)).as_deref(),
        expected
    );
}

#[test]
fn test_validation_is_idempotent() {
    let validator = text_validator();
    let samples = ["ryu", "RY0", "Ken ", "ZANGlEF", "M BISON", "A.K.l.", "junk text"];

    for raw in samples {
        let once = validator.validate_character(Some(raw));
        if let Some(value) = &once {
            assert_eq!(
                validator.validate_character(Some(value)).as_ref(),
                Some(value),
                "re-validating '{}' changed it",
                value
            );
        }
    }

    for t in 0..=99u8 {
        let text = format!("{:02}", t);
        assert_eq!(validator.validate_timer(Some(&text)), Some(t));
    }
}

#[test]
fn test_every_roster_entry_validates_to_itself() {
    let validator = text_validator();
    for name in default_roster() {
        assert_eq!(validator.validate_character(Some(&name)), Some(name.clone()));
        assert_eq!(
            validator.validate_character(Some(&name.to_lowercase())),
            Some(name)
        );
    }
}

#[test]
fn test_empty_character_roster_is_rejected() {
    let result = TextValidator::new(Vocabulary::new(Vec::<String>::new()), &ValidationParams::default());
    assert!(result.is_err());
}

#[test]
fn test_clean_collapses_whitespace() {
    assert_eq!(clean("  e.   honda "), "E. HONDA");
    assert_eq!(clean("\tken\n"), "KEN");
}

#[test]
fn test_vocabulary_dedupes_case_insensitively() {
    let vocab = Vocabulary::new(["Ryu", "RYU", " ken ", ""]);
    assert_eq!(vocab.len(), 2);
    assert_eq!(vocab.get("ryu"), Some("Ryu"));
    assert_eq!(vocab.get("KEN"), Some("ken"));
    assert!(!vocab.contains("LUKE"));
}

#[test]
fn test_best_match_ties_keep_first_entry() {
    let vocab = Vocabulary::new(["MARC", "MARK"]);
    let (entry, score) = vocab.best_match("MARQ", &Levenshtein).unwrap();
    assert_eq!(entry, "MARC");
    assert_eq!(score, 75.0);
}

// --- SIMILARITY ---

#[rstest]
#[case(SimilarityMetric::Levenshtein)]
#[case(SimilarityMetric::Indel)]
fn test_similarity_bounds(#[case] metric: SimilarityMetric) {
    let sim = metric.build();
    assert_eq!(sim.similarity("RYU", "RYU"), 100.0);
    assert_eq!(sim.similarity("", ""), 100.0);
    assert_eq!(sim.similarity("ABC", "XYZ"), 0.0);
    let partial = sim.similarity("RYU", "RY0");
    assert!(partial > 0.0 && partial < 100.0);
}

#[test]
fn test_indel_tolerates_doubled_glyphs() {
    assert!(IndelRatio.similarity("KEN", "KENN") > Levenshtein.similarity("KEN", "KENN"));
    assert_eq!(Levenshtein.similarity("AB", "BA"), 0.0);
    assert_eq!(IndelRatio.similarity("AB", "BA"), 50.0);
}

#[test]
fn test_metric_parses_from_text() {
    assert_eq!("indel".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Indel);
    assert_eq!(
        "Levenshtein".parse::<SimilarityMetric>().unwrap(),
        SimilarityMetric::Levenshtein
    );
    assert!("jaro".parse::<SimilarityMetric>().is_err());
}

// --- PLAYERS ---

#[rstest]
#[case("punk", Some("Punk"))]
#[case("Daigo", Some("Daigo Umehara"))]
#[case("RB | Punk", Some("Punk"))]
#[case("[JP] Tokido", Some("Tokido"))]
#[case("Tokid0", Some("Tokido"))]
#[case("MenaRD (DO)", Some("MenaRD"))]
#[case("Nobody At All", None)]
#[case("", None)]
fn test_player_validation(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(
        player_validator().validate(Some(raw), None).as_deref(),
        expected
    );
}

#[rstest]
#[case(Some("KEN"), "MARC")]
#[case(Some("RYU"), "MARK")]
#[case(None, "MARC")]
fn test_player_context_breaks_ties(#[case] context: Option<&str>, #[case] expected: &str) {
    assert_eq!(
        player_validator().validate(Some("MARQ"), context).as_deref(),
        Some(expected)
    );
}

#[test]
fn test_player_search_ranks_and_limits() {
    let validator = player_validator();
    let hits = validator.search("MAR");
    assert!(!hits.is_empty());
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(hits.iter().all(|c| c.score >= 60.0));

    let params = ValidationParams {
        player_search_limit: 1,
        ..Default::default()
    };
    let roster = JsonRoster::from_json_str(ROSTER).unwrap();
    let limited = PlayerValidator::new(Arc::new(roster), &params).unwrap();
    assert_eq!(limited.search("MAR").len(), 1);
}

#[test]
fn test_open_vocabulary_returns_cleaned_name() {
    let validator =
        PlayerValidator::new(Arc::new(StaticRoster::default()), &ValidationParams::default()).unwrap();
    assert!(validator.is_open_vocabulary());
    assert_eq!(
        validator.validate(Some(" RB | Punk "), None).as_deref(),
        Some("Punk")
    );
    assert_eq!(validator.validate(Some("  "), None), None);
}

#[test]
fn test_roster_metadata_queries() {
    let roster = JsonRoster::from_json_str(ROSTER).unwrap();
    let players = roster.all_players();
    assert_eq!(players.len(), 6);
    assert!(players.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(roster.find_players_by_character("ryu"), vec!["Daigo Umehara", "MARK"]);
    assert!(roster.validate_player_character_combination("Tokido", "AKUMA"));
    assert!(!roster.validate_player_character_combination("Tokido", "RYU"));
    // Nothing known about Punk's mains
    assert!(roster.validate_player_character_combination("Punk", "RYU"));
}

#[test]
fn test_roster_restriction() {
    let mut roster = JsonRoster::from_json_str(ROSTER).unwrap();
    roster.restrict_to(&["tokido".to_string(), "Newcomer".to_string()]);
    assert_eq!(roster.all_players(), vec!["Newcomer", "Tokido"]);
    assert!(roster.aliases().is_empty());
    assert_eq!(roster.main_characters("Tokido"), vec!["AKUMA"]);
}

#[test]
fn test_roster_rejects_empty_and_accepts_bare_lists() {
    assert!(JsonRoster::from_json_str(r#"{"players": []}"#).is_err());
    let roster = JsonRoster::from_json_str(r#"["Punk", "Tokido", "Punk"]"#).unwrap();
    assert_eq!(roster.all_players(), vec!["Punk", "Tokido"]);
}
