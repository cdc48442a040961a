use crate::reports;
use clap::Args;
use matchforge::api;
use matchforge::config::Config;
use matchforge::{MatchDeductor, MfResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Frame file (.json or .csv)
    pub input: PathBuf,

    /// Write the JSON report here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the one-line-per-match summary here
    #[arg(long)]
    pub matches_txt: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs, deductor: &MatchDeductor) -> MfResult<()> {
    let report = api::analyze_file(deductor, &args.input)?;

    reports::print_match_table(&report);
    reports::print_stats_table(&report);

    if let Some(path) = &args.output {
        report.write_json(BufWriter::new(File::create(path)?))?;
        info!("💾 Report written to {}", path.display());
    }
    if let Some(path) = &args.matches_txt {
        report.write_matches_txt(BufWriter::new(File::create(path)?))?;
        info!("💾 Match list written to {}", path.display());
    }

    Ok(())
}
