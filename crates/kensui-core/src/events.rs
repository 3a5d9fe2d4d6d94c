use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change the tracker makes produces an Event.
/// Front-ends render them (toast, badge, celebration) without
/// re-deriving the rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A completed set was appended to the ledger.
    SetLogged {
        rank_id: u32,
        title: String,
        daily_progress: u32,
        at: DateTime<Utc>,
    },
    /// Today's quota was met for the first time today.
    QuotaAchieved {
        streak: u32,
        at: DateTime<Utc>,
    },
    /// A passed exam moved the rank up.
    RankPromoted {
        from: u32,
        to: u32,
        at: DateTime<Utc>,
    },
}
