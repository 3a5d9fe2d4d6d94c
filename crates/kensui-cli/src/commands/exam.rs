use clap::Subcommand;

use super::{runtime, Context};

#[derive(Subcommand)]
pub enum ExamAction {
    /// Show the exam criteria of a step
    Show {
        /// Rank id of the step
        rank_id: u32,
    },
    /// Report a passed exam; promotes when the step is current
    Pass {
        /// Rank id of the step whose exam was passed
        rank_id: u32,
    },
}

pub fn run(action: ExamAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load()?;

    match action {
        ExamAction::Show { rank_id } => {
            let step = ctx
                .tracker
                .program()
                .step(rank_id)
                .ok_or_else(|| format!("no step with rank id {rank_id}"))?;
            match &step.test_criteria {
                Some(criteria) => println!("{}", serde_json::to_string_pretty(criteria)?),
                None => println!("step '{}' has no exam", step.title),
            }
        }
        ExamAction::Pass { rank_id } => {
            let rt = runtime()?;
            let outcome = rt.block_on(ctx.tracker.pass_exam(ctx.account(), rank_id))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
