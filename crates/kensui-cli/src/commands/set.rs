use clap::Subcommand;

use super::{runtime, Context};

#[derive(Subcommand)]
pub enum SetAction {
    /// Log a completed set and evaluate today's quota
    Log {
        /// Rank id of the step trained
        rank_id: u32,
        /// Sets this record stands for
        #[arg(long, default_value = "1")]
        sets: u32,
    },
}

pub fn run(action: SetAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load()?;
    let rt = runtime()?;

    match action {
        SetAction::Log { rank_id, sets } => {
            let outcome = rt.block_on(ctx.tracker.log_set(ctx.account(), rank_id, sets))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
