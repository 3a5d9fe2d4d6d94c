use clap::Subcommand;

use super::{runtime, Context};

#[derive(Subcommand)]
pub enum ProgramAction {
    /// List catalog steps with their status for the active account
    List,
    /// Show one step in full, exam criteria included
    Show {
        /// Rank id of the step
        rank_id: u32,
    },
}

pub fn run(action: ProgramAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load()?;

    match action {
        ProgramAction::List => {
            let rt = runtime()?;
            let overview = rt.block_on(ctx.tracker.overview(ctx.account()));
            println!("{}", serde_json::to_string_pretty(&overview.steps)?);
        }
        ProgramAction::Show { rank_id } => {
            let step = ctx
                .tracker
                .program()
                .step(rank_id)
                .ok_or_else(|| format!("no step with rank id {rank_id}"))?;
            println!("{}", serde_json::to_string_pretty(step)?);
        }
    }
    Ok(())
}
