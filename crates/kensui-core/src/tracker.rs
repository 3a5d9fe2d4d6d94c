//! Progress tracker: the engine's front door.
//!
//! Ties the catalog, the ledger, the achievement engine and the rank
//! rules together the way a front-end consumes them: one call per user
//! action, one aggregate read for rendering. Mutating calls surface
//! store errors to the caller; [`ProgressTracker::overview`] and
//! [`ProgressTracker::history`] never fail, they degrade to defaults
//! so a rendering path always has something to draw.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::achievement::{daily_progress, display_streak, AchievementEngine, DailyOutcome};
use crate::daykey::DayClock;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::program::Program;
use crate::rank::{self, StepStatus, DEFAULT_RANK};
use crate::record::{SetDraft, SetRecord};
use crate::session::AccountId;
use crate::store::{Namespace, ProgressStore, StreakStats};

/// Everything a front-end needs to render the home screen.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub rank: u32,
    pub streak: u32,
    pub daily_progress: u32,
    pub daily_target: u32,
    pub quota_met_today: bool,
    pub steps: Vec<StepOverview>,
}

/// One catalog row with its status for the rendered account.
#[derive(Debug, Clone, Serialize)]
pub struct StepOverview {
    pub rank_id: u32,
    pub level: String,
    pub title: String,
    pub status: StepStatus,
    /// Whether the training action is replaced by the exam prompt.
    pub exam_required: bool,
}

/// Outcome of logging one completed set.
#[derive(Debug, Clone, Serialize)]
pub struct SetOutcome {
    pub record: SetRecord,
    pub daily: DailyOutcome,
    pub events: Vec<Event>,
}

/// Outcome of reporting a passed promotion exam.
#[derive(Debug, Clone, Serialize)]
pub struct ExamOutcome {
    pub rank: u32,
    pub promoted: bool,
    pub events: Vec<Event>,
}

pub struct ProgressTracker {
    store: Arc<ProgressStore>,
    engine: AchievementEngine,
    program: Program,
    clock: DayClock,
}

impl ProgressTracker {
    pub fn new(
        store: Arc<ProgressStore>,
        program: Program,
        clock: DayClock,
        daily_target: u32,
    ) -> Self {
        let engine = AchievementEngine::new(Arc::clone(&store), clock, daily_target);
        Self {
            store,
            engine,
            program,
            clock,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Record one completed set of the step and evaluate today's
    /// quota. This is the "set done" tap.
    pub async fn log_set(
        &self,
        account: Option<&AccountId>,
        rank_id: u32,
        sets: u32,
    ) -> Result<SetOutcome> {
        let step = self
            .program
            .step(rank_id)
            .ok_or(CoreError::UnknownRank(rank_id))?;
        let draft = SetDraft::for_step(step).with_sets(sets);
        let record = self.store.append_record(account, &draft).await?;
        let daily = self.engine.evaluate(account, self.clock.today()).await?;

        let mut events = vec![Event::SetLogged {
            rank_id,
            title: step.title.clone(),
            daily_progress: daily.daily_progress,
            at: record.created_at,
        }];
        if daily.newly_achieved {
            events.push(Event::QuotaAchieved {
                streak: daily.streak,
                at: record.created_at,
            });
        }
        Ok(SetOutcome {
            record,
            daily,
            events,
        })
    }

    /// Report a passed promotion exam for the step. The candidate rank
    /// is the next catalog entry; the monotonic rule decides whether
    /// anything moves. Passing an exam for an already-cleared step is
    /// a no-op, not an error.
    pub async fn pass_exam(
        &self,
        account: Option<&AccountId>,
        rank_id: u32,
    ) -> Result<ExamOutcome> {
        let step = self
            .program
            .step(rank_id)
            .ok_or(CoreError::UnknownRank(rank_id))?;

        // Read-modify-write on the rank document.
        let lock = self.store.namespace_lock(&Namespace::of(account));
        let _guard = lock.lock().await;

        let current = self.store.rank(account).await?;
        let promotion = rank::promote(current, step.rank_id + 1);
        let mut events = Vec::new();
        if promotion.promoted {
            self.store.set_rank(account, promotion.new_rank).await?;
            events.push(Event::RankPromoted {
                from: current,
                to: promotion.new_rank,
                at: chrono::Utc::now(),
            });
        }
        Ok(ExamOutcome {
            rank: promotion.new_rank,
            promoted: promotion.promoted,
            events,
        })
    }

    /// Aggregate state for rendering. Never fails: a store that cannot
    /// be read renders as a fresh account (rank 1, streak 0, empty
    /// day) behind a warning.
    pub async fn overview(&self, account: Option<&AccountId>) -> Overview {
        let today = self.clock.today();
        let rank = match self.store.rank(account).await {
            Ok(rank) => rank,
            Err(err) => {
                warn!(error = %err, "rank read failed, rendering default");
                DEFAULT_RANK
            }
        };
        let stats = match self.store.stats(account).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "stats read failed, rendering default");
                StreakStats::default()
            }
        };
        let records = match self.store.list_records(account).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "record read failed, rendering empty day");
                Vec::new()
            }
        };

        let streak = display_streak(&stats, today);
        let progress = daily_progress(&records, &self.clock, today);
        let steps = self
            .program
            .steps
            .iter()
            .map(|step| StepOverview {
                rank_id: step.rank_id,
                level: step.level.clone(),
                title: step.title.clone(),
                status: rank::step_status(step, rank),
                exam_required: rank::exam_required(step, rank, streak),
            })
            .collect();

        Overview {
            rank,
            streak,
            daily_progress: progress,
            daily_target: self.engine.daily_target(),
            quota_met_today: progress >= self.engine.daily_target(),
            steps,
        }
    }

    /// Ledger history, newest first; degrades to empty on store
    /// failure.
    pub async fn history(&self, account: Option<&AccountId>, limit: Option<usize>) -> Vec<SetRecord> {
        let mut records = match self.store.list_records(account).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "history read failed, rendering empty");
                Vec::new()
            }
        };
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievement::DEFAULT_DAILY_TARGET;
    use crate::store::{LocalStore, RemoteConfig, RemoteStore};

    fn guest_tracker() -> ProgressTracker {
        let store = Arc::new(ProgressStore::new(
            RemoteStore::new(RemoteConfig::default()),
            LocalStore::open_memory().unwrap(),
        ));
        ProgressTracker::new(
            store,
            Program::default_progression(),
            DayClock::utc(),
            DEFAULT_DAILY_TARGET,
        )
    }

    #[tokio::test]
    async fn log_set_rejects_unknown_rank() {
        let tracker = guest_tracker();
        let err = tracker.log_set(None, 99, 1).await.unwrap_err();
        assert!(matches!(err, CoreError::UnknownRank(99)));
    }

    #[tokio::test]
    async fn log_set_appends_and_reports_progress() {
        let tracker = guest_tracker();
        let outcome = tracker.log_set(None, 1, 1).await.unwrap();
        assert_eq!(outcome.record.title, "Dead Hang");
        assert_eq!(outcome.daily.daily_progress, 1);
        assert!(!outcome.daily.achieved);
        assert!(matches!(outcome.events[0], Event::SetLogged { rank_id: 1, .. }));
    }

    #[tokio::test]
    async fn third_set_of_the_day_achieves_the_quota() {
        let tracker = guest_tracker();
        tracker.log_set(None, 1, 1).await.unwrap();
        tracker.log_set(None, 1, 1).await.unwrap();
        let third = tracker.log_set(None, 1, 1).await.unwrap();

        assert!(third.daily.achieved);
        assert_eq!(third.daily.streak, 1);
        assert!(third
            .events
            .iter()
            .any(|e| matches!(e, Event::QuotaAchieved { streak: 1, .. })));

        // A fourth set keeps the day achieved without recelebrating.
        let fourth = tracker.log_set(None, 1, 1).await.unwrap();
        assert!(fourth.daily.achieved);
        assert_eq!(fourth.daily.streak, 1);
        assert!(!fourth
            .events
            .iter()
            .any(|e| matches!(e, Event::QuotaAchieved { .. })));
    }

    #[tokio::test]
    async fn pass_exam_promotes_once_and_only_upward() {
        let tracker = guest_tracker();

        let first = tracker.pass_exam(None, 1).await.unwrap();
        assert!(first.promoted);
        assert_eq!(first.rank, 2);
        assert!(matches!(
            first.events[0],
            Event::RankPromoted { from: 1, to: 2, .. }
        ));

        // Re-passing the now-cleared step changes nothing.
        let again = tracker.pass_exam(None, 1).await.unwrap();
        assert!(!again.promoted);
        assert_eq!(again.rank, 2);
        assert!(again.events.is_empty());
    }

    #[tokio::test]
    async fn exam_on_the_last_step_is_not_capped() {
        let tracker = guest_tracker();
        tracker.store.set_rank(None, 4).await.unwrap();

        let outcome = tracker.pass_exam(None, 4).await.unwrap();
        assert!(outcome.promoted);
        assert_eq!(outcome.rank, 5);

        let overview = tracker.overview(None).await;
        assert_eq!(overview.rank, 5);
        // Every step reads as cleared once the ladder is finished.
        assert!(overview
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Cleared));
    }

    #[tokio::test]
    async fn overview_reflects_rank_quota_and_exam_routing() {
        let tracker = guest_tracker();
        tracker.store.set_rank(None, 2).await.unwrap();
        tracker
            .store
            .set_stats(
                None,
                StreakStats {
                    streak: 5,
                    last_achieved_day: Some(tracker.clock.today()),
                },
            )
            .await
            .unwrap();

        let overview = tracker.overview(None).await;
        assert_eq!(overview.rank, 2);
        assert_eq!(overview.streak, 5);
        assert_eq!(overview.daily_target, DEFAULT_DAILY_TARGET);

        let statuses: Vec<(u32, StepStatus, bool)> = overview
            .steps
            .iter()
            .map(|s| (s.rank_id, s.status, s.exam_required))
            .collect();
        assert_eq!(
            statuses,
            vec![
                (1, StepStatus::Cleared, false),
                (2, StepStatus::Current, true),
                (3, StepStatus::Locked, false),
                (4, StepStatus::Locked, false),
            ]
        );
    }

    #[tokio::test]
    async fn history_truncates_to_the_requested_limit() {
        let tracker = guest_tracker();
        for _ in 0..5 {
            tracker.log_set(None, 1, 1).await.unwrap();
        }
        assert_eq!(tracker.history(None, Some(3)).await.len(), 3);
        assert_eq!(tracker.history(None, None).await.len(), 5);
    }
}
