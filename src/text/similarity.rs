use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// Normalized string similarity on a 0-100 scale.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f32;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Levenshtein,
    Indel,
}

impl SimilarityMetric {
    pub fn build(self) -> Arc<dyn Similarity> {
        match self {
            SimilarityMetric::Levenshtein => Arc::new(Levenshtein),
            SimilarityMetric::Indel => Arc::new(IndelRatio),
        }
    }
}

/// Edit-distance ratio: `(1 - distance / max_len) * 100`, computed over chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl Similarity for Levenshtein {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let max_len = a.len().max(b.len());
        if max_len == 0 {
            return 100.0;
        }

        let distance = levenshtein_distance(&a, &b);
        (1.0 - distance as f32 / max_len as f32) * 100.0
    }
}

/// Indel ratio: `2 * LCS / (len_a + len_b) * 100`. Only insertions and
/// deletions count, so dropped or doubled glyphs score higher than with
/// `Levenshtein`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl Similarity for IndelRatio {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let total = a.len() + b.len();
        if total == 0 {
            return 100.0;
        }

        let lcs = lcs_length(&a, &b);
        2.0 * lcs as f32 / total as f32 * 100.0
    }
}

pub fn levenshtein_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_ratio() {
        let sim = Levenshtein;
        assert_eq!(sim.similarity("RYU", "RYU"), 100.0);
        assert!((sim.similarity("RY0", "RYU") - 66.666_67).abs() < 0.01);
        assert_eq!(sim.similarity("", ""), 100.0);
        assert_eq!(sim.similarity("ABC", ""), 0.0);
    }

    #[test]
    fn test_indel_ratio() {
        let sim = IndelRatio;
        assert!((sim.similarity("RY0", "RYU") - 66.666_67).abs() < 0.01);
        assert_eq!(sim.similarity("KEN", "KEN"), 100.0);
        assert_eq!(sim.similarity("AB", "CD"), 0.0);
    }

    #[test]
    fn test_metric_parsing() {
        use std::str::FromStr;
        assert_eq!(
            SimilarityMetric::from_str("indel").unwrap(),
            SimilarityMetric::Indel
        );
        let metric = SimilarityMetric::Levenshtein.build();
        assert_eq!(metric.similarity("KEN", "KEN"), 100.0);
    }
}
