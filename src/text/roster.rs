use crate::error::{MatchForgeError, MfResult};
use crate::text::validator::clean;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Source of canonical player names and optional main-character metadata.
pub trait PlayerProvider: Send + Sync {
    /// Sorted, de-duplicated canonical names.
    fn all_players(&self) -> Vec<String>;

    /// Alternate spellings as `(alias, canonical)` pairs.
    fn aliases(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn main_characters(&self, _player: &str) -> Vec<String> {
        Vec::new()
    }

    fn find_players_by_character(&self, character: &str) -> Vec<String> {
        self.all_players()
            .into_iter()
            .filter(|p| {
                self.main_characters(p)
                    .iter()
                    .any(|c| clean(c) == clean(character))
            })
            .collect()
    }

    /// `true` when the player is known to play the character, or when nothing
    /// is known about the player's mains.
    fn validate_player_character_combination(&self, player: &str, character: &str) -> bool {
        let mains = self.main_characters(player);
        mains.is_empty() || mains.iter().any(|c| clean(c) == clean(character))
    }
}

/// Plain list of names with no metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    players: Vec<String>,
}

impl StaticRoster {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            players: sorted_unique(names.into_iter().map(Into::into)),
        }
    }
}

impl PlayerProvider for StaticRoster {
    fn all_players(&self) -> Vec<String> {
        self.players.clone()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlayerEntry {
    Name(String),
    Detailed(PlayerRecord),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRecord {
    name: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    original_name: Option<String>,
    #[serde(default, alias = "characters")]
    mains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    players: Vec<PlayerEntry>,
    #[serde(default)]
    static_players: Vec<PlayerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NameList {
    Plain(Vec<String>),
    Wrapped { players: Vec<String> },
}

/// Roster read from a JSON document, optionally restricted to a subset.
#[derive(Debug, Clone, Default)]
pub struct JsonRoster {
    players: Vec<String>,
    mains: HashMap<String, Vec<String>>,
    aliases: Vec<(String, String)>,
}

impl JsonRoster {
    pub fn from_json_str(content: &str) -> MfResult<Self> {
        let file: RosterFile = match serde_json::from_str::<RosterFile>(content) {
            Ok(file) => file,
            Err(_) => {
                // Bare `["name", ...]` lists are accepted too.
                let names: Vec<PlayerEntry> = serde_json::from_str(content)?;
                RosterFile {
                    players: names,
                    static_players: Vec::new(),
                }
            }
        };

        let mut names = Vec::new();
        let mut mains = HashMap::new();
        let mut aliases = Vec::new();

        for entry in file.players.into_iter().chain(file.static_players) {
            match entry {
                PlayerEntry::Name(name) => names.push(name),
                PlayerEntry::Detailed(record) => {
                    let canonical = record.name.trim().to_string();
                    if canonical.is_empty() {
                        continue;
                    }
                    for alias in [record.short_name, record.original_name].into_iter().flatten() {
                        let alias = alias.trim().to_string();
                        if !alias.is_empty() && clean(&alias) != clean(&canonical) {
                            aliases.push((alias, canonical.clone()));
                        }
                    }
                    if !record.mains.is_empty() {
                        mains.insert(clean(&canonical), record.mains);
                    }
                    names.push(canonical);
                }
            }
        }

        let players = sorted_unique(names);
        if players.is_empty() {
            return Err(MatchForgeError::Config(
                "player roster contains no names".to_string(),
            ));
        }

        Ok(Self {
            players,
            mains,
            aliases,
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MatchForgeError::Config(format!(
                "Failed to read player roster '{}': {}",
                path.display(),
                e
            ))
        })?;
        let roster = Self::from_json_str(&content)?;
        info!(
            "Loaded {} players ({} with known mains) from {}",
            roster.players.len(),
            roster.mains.len(),
            path.display()
        );
        Ok(roster)
    }

    /// Reads a restriction list (`[...]` or `{"players": [...]}`).
    pub fn load_restriction<P: AsRef<Path>>(path: P) -> MfResult<Vec<String>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MatchForgeError::Config(format!(
                "Failed to read restriction list '{}': {}",
                path.display(),
                e
            ))
        })?;
        let names = match serde_json::from_str::<NameList>(&content)? {
            NameList::Plain(names) => names,
            NameList::Wrapped { players } => players,
        };
        Ok(names)
    }

    /// Keeps only the listed players. Listed names missing from the roster
    /// are added without metadata.
    pub fn restrict_to(&mut self, allowed: &[String]) {
        let allowed_keys: HashSet<String> = allowed.iter().map(|n| clean(n)).collect();
        let known: HashSet<String> = self.players.iter().map(|n| clean(n)).collect();

        let mut kept: Vec<String> = self
            .players
            .iter()
            .filter(|p| allowed_keys.contains(&clean(p)))
            .cloned()
            .collect();
        kept.extend(
            allowed
                .iter()
                .filter(|n| !known.contains(&clean(n)))
                .cloned(),
        );

        let kept = sorted_unique(kept);
        let kept_keys: HashSet<String> = kept.iter().map(|n| clean(n)).collect();
        self.aliases.retain(|(_, canonical)| kept_keys.contains(&clean(canonical)));
        self.mains.retain(|key, _| kept_keys.contains(key));

        debug!(
            "Roster restricted from {} to {} players",
            self.players.len(),
            kept.len()
        );
        self.players = kept;
    }
}

impl PlayerProvider for JsonRoster {
    fn all_players(&self) -> Vec<String> {
        self.players.clone()
    }

    fn aliases(&self) -> Vec<(String, String)> {
        self.aliases.clone()
    }

    fn main_characters(&self, player: &str) -> Vec<String> {
        self.mains.get(&clean(player)).cloned().unwrap_or_default()
    }
}

fn sorted_unique<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(clean(n)))
        .collect();
    out.sort_by_key(|n| clean(n));
    out
}
