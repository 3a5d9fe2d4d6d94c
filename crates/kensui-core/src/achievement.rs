//! Daily quota and streak evaluation.
//!
//! [`AchievementEngine::evaluate`] is the only writer of streak state.
//! Everything else is a pure read: a broken streak displays as zero
//! without being written back, and the stored pair stays untouched
//! until the next achieved day starts a fresh run.
//!
//! Streak rules, relative to the stored `last_achieved_day`:
//! - same day: already counted, nothing changes
//! - adjacent day: the run continues, streak + 1
//! - anything wider (or no anchor at all): a new run starts at 1

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::daykey::{DayClock, DayKey};
use crate::error::Result;
use crate::record::SetRecord;
use crate::session::AccountId;
use crate::store::{Namespace, ProgressStore, StreakStats};

/// Sets per calendar day required for the day to count as achieved.
pub const DEFAULT_DAILY_TARGET: u32 = 3;

/// Result of one quota evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOutcome {
    /// Whether today's quota is met.
    pub achieved: bool,
    /// The streak after evaluation.
    pub streak: u32,
    /// Sets counted for today.
    pub daily_progress: u32,
    /// True only on the evaluation that persisted today's achievement.
    /// Re-evaluations of an already-achieved day report `achieved`
    /// without this flag, so celebration fires once per day.
    pub newly_achieved: bool,
}

/// Sum of sets across the records filed on `today`.
pub fn daily_progress(records: &[SetRecord], clock: &DayClock, today: DayKey) -> u32 {
    records
        .iter()
        .filter(|r| clock.day_key(r.created_at) == today)
        .map(|r| r.sets)
        .sum()
}

/// The streak as it should be displayed on `today`, computed from the
/// stored pair without touching it. A one-day gap still displays the
/// stored value (the run is alive until today is over); a wider gap
/// displays zero even though the stored value survives until the next
/// achieved day overwrites it.
pub fn display_streak(stats: &StreakStats, today: DayKey) -> u32 {
    match stats.last_achieved_day {
        None => 0,
        Some(day) => match today.days_between(&day) {
            0 | 1 => stats.streak,
            _ => 0,
        },
    }
}

/// Quota and streak evaluator bound to a store and a day clock.
pub struct AchievementEngine {
    store: Arc<ProgressStore>,
    clock: DayClock,
    daily_target: u32,
}

impl AchievementEngine {
    pub fn new(store: Arc<ProgressStore>, clock: DayClock, daily_target: u32) -> Self {
        Self {
            store,
            clock,
            daily_target,
        }
    }

    pub fn daily_target(&self) -> u32 {
        self.daily_target
    }

    pub fn clock(&self) -> DayClock {
        self.clock
    }

    /// Today's progress for the account; 0 for an empty ledger.
    pub async fn daily_progress_for(
        &self,
        account: Option<&AccountId>,
        today: DayKey,
    ) -> Result<u32> {
        let records = self.store.list_records(account).await?;
        Ok(daily_progress(&records, &self.clock, today))
    }

    /// The display streak for the account. Never mutates stored state.
    pub async fn current_streak(&self, account: Option<&AccountId>, today: DayKey) -> Result<u32> {
        let stats = self.store.stats(account).await?;
        Ok(display_streak(&stats, today))
    }

    /// Evaluate today's quota and update the streak pair.
    ///
    /// The whole read-modify-write runs under the namespace lock, so
    /// two overlapping evaluations of one account cannot both observe
    /// the pre-update pair and double-count the day. Re-entry on an
    /// already-achieved day returns the stored streak untouched.
    pub async fn evaluate(&self, account: Option<&AccountId>, today: DayKey) -> Result<DailyOutcome> {
        let lock = self.store.namespace_lock(&Namespace::of(account));
        let _guard = lock.lock().await;

        let records = self.store.list_records(account).await?;
        let progress = daily_progress(&records, &self.clock, today);
        let stats = self.store.stats(account).await?;

        if progress < self.daily_target {
            return Ok(DailyOutcome {
                achieved: false,
                streak: display_streak(&stats, today),
                daily_progress: progress,
                newly_achieved: false,
            });
        }

        let streak = match stats.last_achieved_day {
            Some(day) if today.days_between(&day) == 0 => {
                // Already counted today.
                return Ok(DailyOutcome {
                    achieved: true,
                    streak: stats.streak,
                    daily_progress: progress,
                    newly_achieved: false,
                });
            }
            Some(day) if today.days_between(&day) == 1 => stats.streak + 1,
            _ => 1,
        };

        self.store
            .set_stats(
                account,
                StreakStats {
                    streak,
                    last_achieved_day: Some(today),
                },
            )
            .await?;
        debug!(streak, day = %today, "daily quota achieved");

        Ok(DailyOutcome {
            achieved: true,
            streak,
            daily_progress: progress,
            newly_achieved: true,
        })
    }
}
