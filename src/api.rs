use crate::config::Config;
use crate::deductor::MatchDeductor;
use crate::error::MfResult;
use crate::loader::{load_character_roster, load_frames};
use crate::report::VideoAnalysisReport;
use crate::text::characters::default_roster;
use crate::text::roster::{JsonRoster, PlayerProvider};
use crate::text::validator::{Field, Vocabulary};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Vocabulary sources; `None` falls back to built-ins.
#[derive(Debug, Clone, Default)]
pub struct VocabularyPaths {
    pub characters: Option<PathBuf>,
    pub players: Option<PathBuf>,
    pub restrict: Option<PathBuf>,
}

/// Service: loads vocabularies once and builds a ready deductor.
pub fn build_deductor(config: Config, paths: &VocabularyPaths) -> MfResult<MatchDeductor> {
    let characters = match &paths.characters {
        Some(path) => load_character_roster(path)?,
        None => Vocabulary::new(default_roster()),
    };

    let players: Option<Arc<dyn PlayerProvider>> = match &paths.players {
        Some(path) => {
            let mut roster = JsonRoster::load_from_file(path)?;
            if let Some(restrict) = &paths.restrict {
                let allowed = JsonRoster::load_restriction(restrict)?;
                info!("Restricting roster to {} players", allowed.len());
                roster.restrict_to(&allowed);
            }
            Some(Arc::new(roster))
        }
        None => None,
    };

    MatchDeductor::new(config, characters, players)
}

fn video_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Service: one frame file to one report.
pub fn analyze_file<P: AsRef<Path>>(deductor: &MatchDeductor, path: P) -> MfResult<VideoAnalysisReport> {
    let path = path.as_ref();
    let sequence = load_frames(path)?;
    Ok(deductor.analyze(video_name(path).as_deref(), &sequence))
}

/// Service: independent videos in parallel, results in input order.
pub fn analyze_batch(
    deductor: &MatchDeductor,
    paths: &[PathBuf],
) -> Vec<(PathBuf, MfResult<VideoAnalysisReport>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), analyze_file(deductor, path)))
        .collect()
}

/// Service: normalizes raw texts for one field, pairing each with its result.
pub fn normalize(
    deductor: &MatchDeductor,
    field: Field,
    texts: &[String],
    context_character: Option<&str>,
) -> Vec<(String, Option<String>)> {
    let processor = deductor.processor();
    texts
        .iter()
        .map(|raw| {
            let value = match field {
                Field::Timer => processor
                    .text()
                    .validate_timer(Some(raw))
                    .map(|t| format!("{:02}", t)),
                Field::Character => processor.text().validate_character(Some(raw)),
                Field::Player => {
                    let context = context_character
                        .and_then(|c| processor.text().validate_character(Some(c)));
                    processor.players().validate(Some(raw), context.as_deref())
                }
            };
            (raw.clone(), value)
        })
        .collect()
}
