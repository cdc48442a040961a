use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use matchforge::api::{self, VocabularyPaths};
use matchforge::config::Config;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Character roster (.json list or one name per line)
    #[arg(global = true, long)]
    characters: Option<PathBuf>,

    /// Player roster JSON
    #[arg(global = true, long)]
    players: Option<PathBuf>,

    /// Restrict the player roster to the names in this JSON list
    #[arg(global = true, long)]
    restrict: Option<PathBuf>,

    /// Threshold overrides as JSON; explicit flags still win
    #[arg(global = true, long = "config-file")]
    config_file: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyze(cmd::analyze::AnalyzeArgs),
    Batch(cmd::batch::BatchArgs),
    Normalize(cmd::normalize::NormalizeArgs),
}

fn main() {
    // 1. Parse raw matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("🚀 Initializing MatchForge...");

    // 2. Config from the subcommand flags, optionally layered over a file
    let cli_config = match &cli.command {
        Commands::Analyze(args) => &args.config,
        Commands::Batch(args) => &args.config,
        Commands::Normalize(args) => &args.config,
    };
    let sub_matches = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);

    let config = match &cli.config_file {
        Some(path) => {
            info!("⚙️  Loading config from {}", path.display());
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ {}", e);
                process::exit(1);
            });
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };

    // 3. Vocabularies are loaded once, before any frame is read
    let paths = VocabularyPaths {
        characters: cli.characters.clone(),
        players: cli.players.clone(),
        restrict: cli.restrict.clone(),
    };
    let deductor = match api::build_deductor(config, &paths) {
        Ok(d) => d,
        Err(e) => {
            error!("❌ FATAL ERROR INITIALIZING PIPELINE: {}", e);
            process::exit(1);
        }
    };

    // 4. Execute
    let result = match cli.command {
        Commands::Analyze(args) => cmd::analyze::run(&args, &deductor),
        Commands::Batch(args) => cmd::batch::run(&args, &deductor),
        Commands::Normalize(args) => cmd::normalize::run(&args, &deductor),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
