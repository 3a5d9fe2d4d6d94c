use clap::Subcommand;

use super::{runtime, Context};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List logged sets, newest first
    List {
        /// Show at most this many records
        #[arg(long)]
        limit: Option<usize>,
        /// Print as JSON instead of one line per record
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load()?;
    let rt = runtime()?;

    match action {
        HistoryAction::List { limit, json } => {
            let records = rt.block_on(ctx.tracker.history(ctx.account(), limit));
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!(
                        "{}  Lv.{}  {}  x{}",
                        record.created_at.format("%Y-%m-%d %H:%M"),
                        record.level,
                        record.title,
                        record.sets
                    );
                }
            }
        }
    }
    Ok(())
}
