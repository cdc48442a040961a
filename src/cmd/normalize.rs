use crate::reports;
use clap::Args;
use matchforge::api;
use matchforge::config::Config;
use matchforge::text::Field;
use matchforge::{MatchDeductor, MfResult};

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long, default_value_t = Field::Character)]
    pub field: Field,

    /// Same-side character, used to rank player candidates
    #[arg(long)]
    pub context: Option<String>,

    #[arg(required = true)]
    pub texts: Vec<String>,
}

pub fn run(args: &NormalizeArgs, deductor: &MatchDeductor) -> MfResult<()> {
    let results = api::normalize(deductor, args.field, &args.texts, args.context.as_deref());
    reports::print_normalization_table(args.field, &results);
    Ok(())
}
