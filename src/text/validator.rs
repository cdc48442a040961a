use crate::config::ValidationParams;
use crate::error::{MatchForgeError, MfResult};
use crate::text::similarity::Similarity;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Field {
    Timer,
    Character,
    Player,
}

/// Ordered set of canonical values with case-insensitive exact lookup.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<String>,
    keys: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for entry in entries {
            let entry: String = entry.into();
            let entry = entry.trim().to_string();
            if entry.is_empty() {
                continue;
            }
            let key = clean(&entry);
            if vocab.lookup.contains_key(&key) {
                continue;
            }
            vocab.lookup.insert(key.clone(), vocab.entries.len());
            vocab.keys.push(key);
            vocab.entries.push(entry);
        }
        vocab
    }

    /// `"00"` through `"99"`.
    pub fn timers() -> Self {
        Self::new((0..=99).map(|n| format!("{:02}", n)))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.lookup.contains_key(&clean(value))
    }

    /// Case-insensitive exact match, returning the canonical spelling.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.lookup
            .get(&clean(value))
            .map(|&idx| self.entries[idx].as_str())
    }

    /// Every entry scored against `cleaned`, in vocabulary order.
    pub fn scored(&self, cleaned: &str, similarity: &dyn Similarity) -> Vec<(&str, f32)> {
        self.keys
            .iter()
            .zip(&self.entries)
            .map(|(key, entry)| (entry.as_str(), similarity.similarity(cleaned, key)))
            .collect()
    }

    /// Highest-scoring entry; ties keep the earlier entry.
    pub fn best_match(&self, cleaned: &str, similarity: &dyn Similarity) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        for (entry, score) in self.scored(cleaned, similarity) {
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }
        best
    }
}

/// Trimmed, uppercased, inner whitespace collapsed.
pub fn clean(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn lookalike_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        'O' | 'D' | 'Q' => Some('0'),
        'I' | 'L' | '|' => Some('1'),
        'Z' => Some('2'),
        'A' => Some('4'),
        'S' => Some('5'),
        'G' => Some('6'),
        'T' => Some('7'),
        'B' => Some('8'),
        _ => None,
    }
}

/// Two-digit timer candidate from OCR text. Look-alike glyphs are consulted
/// only for short crops that hold fewer than two real digits.
pub fn extract_timer_digits(cleaned: &str) -> Option<String> {
    let mut digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();

    let compact: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() < 2 && compact.chars().count() <= 3 {
        let mapped: String = compact.chars().filter_map(lookalike_digit).collect();
        if mapped.len() > digits.len() {
            digits = mapped;
        }
    }

    match digits.len() {
        0 => None,
        1 => Some(format!("0{}", digits)),
        _ => Some(digits[..2].to_string()),
    }
}

/// Maps raw text to a vocabulary member, or `None` when nothing passes.
pub fn validate(
    raw: &str,
    vocabulary: &Vocabulary,
    fuzzy_threshold: f32,
    extract_digits: bool,
    similarity: &dyn Similarity,
) -> Option<String> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(exact) = vocabulary.get(&cleaned) {
        return Some(exact.to_string());
    }

    if extract_digits {
        if let Some(hit) = extract_timer_digits(&cleaned).and_then(|d| vocabulary.get(&d)) {
            return Some(hit.to_string());
        }
    }

    match vocabulary.best_match(&cleaned, similarity) {
        Some((entry, score)) if score >= fuzzy_threshold => Some(entry.to_string()),
        _ => None,
    }
}

/// Timer and character normalization against fixed vocabularies.
#[derive(Clone)]
pub struct TextValidator {
    timers: Vocabulary,
    characters: Vocabulary,
    similarity: Arc<dyn Similarity>,
    timer_threshold: f32,
    character_threshold: f32,
}

impl TextValidator {
    pub fn new(characters: Vocabulary, params: &ValidationParams) -> MfResult<Self> {
        if characters.is_empty() {
            return Err(MatchForgeError::Config(
                "character roster is empty".to_string(),
            ));
        }
        Ok(Self {
            timers: Vocabulary::timers(),
            characters,
            similarity: params.similarity_metric.build(),
            timer_threshold: params.timer_fuzzy_threshold,
            character_threshold: params.character_fuzzy_threshold,
        })
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn Similarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn characters(&self) -> &Vocabulary {
        &self.characters
    }

    pub fn similarity(&self) -> &dyn Similarity {
        self.similarity.as_ref()
    }

    pub fn validate_timer(&self, raw: Option<&str>) -> Option<u8> {
        let text = validate(raw?, &self.timers, self.timer_threshold, true, self.similarity())?;
        text.parse().ok()
    }

    pub fn validate_character(&self, raw: Option<&str>) -> Option<String> {
        validate(
            raw?,
            &self.characters,
            self.character_threshold,
            false,
            self.similarity(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldCounts {
    pub validated: usize,
    pub rejected: usize,
}

/// Per-field outcome counters. Absent input is neither validated nor rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    pub timer: FieldCounts,
    pub character: FieldCounts,
    pub player: FieldCounts,
}

impl ValidationStats {
    pub fn record<T>(&mut self, field: Field, raw: Option<&str>, result: &Option<T>) {
        if raw.map_or(true, |r| r.trim().is_empty()) {
            return;
        }
        let counts = match field {
            Field::Timer => &mut self.timer,
            Field::Character => &mut self.character,
            Field::Player => &mut self.player,
        };
        if result.is_some() {
            counts.validated += 1;
        } else {
            counts.rejected += 1;
        }
    }
}
