use crate::reports;
use clap::Args;
use matchforge::api;
use matchforge::config::Config;
use matchforge::{MatchDeductor, MatchForgeError, MfResult};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub config: Config,

    /// Frame files, one per video
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value = "reports")]
    pub out_dir: PathBuf,
}

pub fn run(args: &BatchArgs, deductor: &MatchDeductor) -> MfResult<()> {
    fs::create_dir_all(&args.out_dir)?;
    info!(
        "🔥 Analyzing {} videos on {} threads",
        args.inputs.len(),
        rayon::current_num_threads()
    );

    let mut rows = Vec::new();
    let mut failures = 0;

    for (path, result) in api::analyze_batch(deductor, &args.inputs) {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video")
            .to_string();
        match result {
            Ok(report) => {
                let json_path = args.out_dir.join(format!("{}.json", stem));
                report.write_json(BufWriter::new(File::create(&json_path)?))?;
                let txt_path = args.out_dir.join(format!("{}_matches.txt", stem));
                report.write_matches_txt(BufWriter::new(File::create(&txt_path)?))?;
                rows.push((stem, Some(report.stats)));
            }
            Err(e) => {
                error!("❌ {}: {}", path.display(), e);
                failures += 1;
                rows.push((stem, None));
            }
        }
    }

    reports::print_batch_table(&rows);
    info!("💾 Reports written to {}", args.out_dir.display());

    if failures > 0 {
        return Err(MatchForgeError::Validation(format!(
            "{} of {} videos failed",
            failures,
            args.inputs.len()
        )));
    }
    Ok(())
}
