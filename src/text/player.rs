use crate::config::ValidationParams;
use crate::error::MfResult;
use crate::text::roster::PlayerProvider;
use crate::text::similarity::Similarity;
use crate::text::validator::{clean, Vocabulary};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

// Tag before a pipe: "RB | Punk", "FLY|Punk"
const SPONSOR_PREFIX: &str = r"^[^|]{1,12}\|\s*";
// "[JP] Tokido", "(US) Punk", "Tokido [JP]"
const REGION_TAG: &str = r"^[\[(][A-Za-z]{2,3}[\])]\s*|\s*[\[(][A-Za-z]{2,3}[\])]$";
// "Tokido - JP"
const REGION_SUFFIX: &str = r"\s+-\s*[A-Z]{2,3}$";
const BRACKETED: &str = r"\s*[\[({<][^\])}>]*[\])}>]\s*";
const EDGE_PUNCT: &str = r"^[\s|:._\-]+|[\s|:._\-]+$";

/// Heuristic removal of broadcast overlay noise around player names.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
    edges: Regex,
}

impl NoiseFilter {
    pub fn new() -> MfResult<Self> {
        let patterns = [SPONSOR_PREFIX, REGION_TAG, REGION_SUFFIX, BRACKETED]
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            edges: Regex::new(EDGE_PUNCT)?,
        })
    }

    pub fn strip(&self, raw: &str) -> String {
        let mut text = raw.trim().to_string();
        for pattern in &self.patterns {
            let next = pattern.replace_all(&text, " ");
            let next = self.edges.replace_all(next.trim(), "").to_string();
            // A pattern that would eat the whole name is not noise.
            if !next.trim().is_empty() {
                text = next.trim().to_string();
            }
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCandidate {
    pub name: String,
    pub score: f32,
}

/// Resolves OCR'd player names against a provider roster, using the
/// same-side character as a tie-breaker.
#[derive(Clone)]
pub struct PlayerValidator {
    provider: Arc<dyn PlayerProvider>,
    names: Vocabulary,
    aliases: HashMap<String, String>,
    similarity: Arc<dyn Similarity>,
    noise: NoiseFilter,
    threshold: f32,
    context_bonus: f32,
    context_penalty: f32,
    search_limit: usize,
}

impl PlayerValidator {
    pub fn new(provider: Arc<dyn PlayerProvider>, params: &ValidationParams) -> MfResult<Self> {
        let names = Vocabulary::new(provider.all_players());
        let aliases = provider
            .aliases()
            .into_iter()
            .map(|(alias, canonical)| (clean(&alias), canonical))
            .collect();
        Ok(Self {
            provider,
            names,
            aliases,
            similarity: params.similarity_metric.build(),
            noise: NoiseFilter::new()?,
            threshold: params.player_fuzzy_threshold,
            context_bonus: params.player_context_bonus,
            context_penalty: params.player_context_penalty,
            search_limit: params.player_search_limit,
        })
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn Similarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn provider(&self) -> &dyn PlayerProvider {
        self.provider.as_ref()
    }

    pub fn is_open_vocabulary(&self) -> bool {
        self.names.is_empty()
    }

    fn exact(&self, text: &str) -> Option<String> {
        if let Some(name) = self.names.get(text) {
            return Some(name.to_string());
        }
        self.aliases.get(&clean(text)).cloned()
    }

    /// Roster names ranked by similarity, best first, at or above threshold.
    pub fn search(&self, query: &str) -> Vec<PlayerCandidate> {
        let cleaned = clean(query);
        if cleaned.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<PlayerCandidate> = self
            .names
            .scored(&cleaned, self.similarity.as_ref())
            .into_iter()
            .filter(|(_, score)| *score >= self.threshold)
            .map(|(name, score)| PlayerCandidate {
                name: name.to_string(),
                score,
            })
            .collect();

        // Stable sort keeps roster order among equal scores.
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(self.search_limit);
        candidates
    }

    pub fn validate(&self, raw: Option<&str>, context_character: Option<&str>) -> Option<String> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        if self.is_open_vocabulary() {
            let stripped = self.noise.strip(raw);
            return (!stripped.is_empty()).then_some(stripped);
        }

        if let Some(hit) = self.exact(raw) {
            return Some(hit);
        }

        let stripped = self.noise.strip(raw);
        if stripped.is_empty() {
            return None;
        }
        if let Some(hit) = self.exact(&stripped) {
            return Some(hit);
        }

        let candidates = self.search(&stripped);
        let mut best: Option<(String, f32)> = None;
        for candidate in candidates {
            let adjusted = candidate.score + self.context_adjustment(&candidate.name, context_character);
            if best.as_ref().map_or(true, |(_, s)| adjusted > *s) {
                best = Some((candidate.name, adjusted));
            }
        }
        best.map(|(name, _)| name)
    }

    fn context_adjustment(&self, player: &str, context_character: Option<&str>) -> f32 {
        let Some(character) = context_character else {
            return 0.0;
        };
        if self.provider.main_characters(player).is_empty() {
            return 0.0;
        }
        if self
            .provider
            .validate_player_character_combination(player, character)
        {
            self.context_bonus
        } else {
            -self.context_penalty
        }
    }
}
