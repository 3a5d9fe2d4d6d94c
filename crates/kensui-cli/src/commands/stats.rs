use clap::Subcommand;
use serde::Serialize;

use super::{runtime, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's quota progress and streak
    Today,
    /// Full overview: rank, streak, per-step status
    Overview,
}

#[derive(Serialize)]
struct TodayStats {
    daily_progress: u32,
    daily_target: u32,
    quota_met: bool,
    streak: u32,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load()?;
    let rt = runtime()?;
    let overview = rt.block_on(ctx.tracker.overview(ctx.account()));

    match action {
        StatsAction::Today => {
            let today = TodayStats {
                daily_progress: overview.daily_progress,
                daily_target: overview.daily_target,
                quota_met: overview.quota_met_today,
                streak: overview.streak,
            };
            println!("{}", serde_json::to_string_pretty(&today)?);
        }
        StatsAction::Overview => {
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
    }
    Ok(())
}
