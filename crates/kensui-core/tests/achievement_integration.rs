//! Integration tests for the daily quota and streak workflow.
//!
//! Drives the full path through the public API against an in-memory
//! guest store: log sets, evaluate the quota, re-read state, continue
//! and break streaks across days.

use std::sync::Arc;

use kensui_core::{
    DayClock, LocalStore, Program, ProgressStore, ProgressTracker, RemoteConfig, RemoteStore,
    StreakStats, DEFAULT_DAILY_TARGET,
};

fn guest_tracker() -> (ProgressTracker, Arc<ProgressStore>) {
    let store = Arc::new(ProgressStore::new(
        RemoteStore::new(RemoteConfig::default()),
        LocalStore::open_memory().unwrap(),
    ));
    let tracker = ProgressTracker::new(
        Arc::clone(&store),
        Program::default_progression(),
        DayClock::utc(),
        DEFAULT_DAILY_TARGET,
    );
    (tracker, store)
}

#[tokio::test]
async fn a_full_training_day_builds_a_streak() {
    let (tracker, store) = guest_tracker();

    // Two sets: quota still open.
    tracker.log_set(None, 1, 1).await.unwrap();
    let second = tracker.log_set(None, 1, 1).await.unwrap();
    assert!(!second.daily.achieved);
    assert_eq!(second.daily.daily_progress, 2);

    // Third set closes the quota and starts the streak.
    let third = tracker.log_set(None, 1, 1).await.unwrap();
    assert!(third.daily.achieved);
    assert!(third.daily.newly_achieved);
    assert_eq!(third.daily.streak, 1);

    let stats = store.stats(None).await.unwrap();
    assert_eq!(stats.streak, 1);
    assert!(stats.last_achieved_day.is_some());

    // The overview agrees with the ledger.
    let overview = tracker.overview(None).await;
    assert_eq!(overview.daily_progress, 3);
    assert!(overview.quota_met_today);
    assert_eq!(overview.streak, 1);
}

#[tokio::test]
async fn extra_sets_after_the_quota_change_nothing() {
    let (tracker, store) = guest_tracker();

    for _ in 0..3 {
        tracker.log_set(None, 1, 1).await.unwrap();
    }
    let before = store.stats(None).await.unwrap();

    let extra = tracker.log_set(None, 2, 1).await.unwrap();
    assert!(extra.daily.achieved);
    assert!(!extra.daily.newly_achieved);
    assert_eq!(extra.daily.streak, before.streak);
    assert_eq!(store.stats(None).await.unwrap(), before);
}

#[tokio::test]
async fn a_multi_set_record_can_meet_the_quota_alone() {
    let (tracker, _store) = guest_tracker();

    let outcome = tracker.log_set(None, 1, 3).await.unwrap();
    assert_eq!(outcome.record.sets, 3);
    assert!(outcome.daily.achieved);
    assert_eq!(outcome.daily.daily_progress, 3);
    assert_eq!(outcome.daily.streak, 1);
}

#[tokio::test]
async fn yesterdays_achievement_continues_into_today() {
    let (tracker, store) = guest_tracker();
    let clock = DayClock::utc();
    let yesterday = clock.day_key(chrono::Utc::now() - chrono::Duration::days(1));

    store
        .set_stats(
            None,
            StreakStats {
                streak: 4,
                last_achieved_day: Some(yesterday),
            },
        )
        .await
        .unwrap();

    // The streak still displays while today is undecided.
    let overview = tracker.overview(None).await;
    assert_eq!(overview.streak, 4);

    for _ in 0..3 {
        tracker.log_set(None, 2, 1).await.unwrap();
    }
    let overview = tracker.overview(None).await;
    assert_eq!(overview.streak, 5);
    assert_eq!(store.stats(None).await.unwrap().streak, 5);
}

#[tokio::test]
async fn a_missed_day_restarts_the_streak_at_one() {
    let (tracker, store) = guest_tracker();
    let clock = DayClock::utc();
    let three_days_ago = clock.day_key(chrono::Utc::now() - chrono::Duration::days(3));

    store
        .set_stats(
            None,
            StreakStats {
                streak: 9,
                last_achieved_day: Some(three_days_ago),
            },
        )
        .await
        .unwrap();

    // The stale streak displays as zero before anything is logged.
    assert_eq!(tracker.overview(None).await.streak, 0);

    for _ in 0..3 {
        tracker.log_set(None, 1, 1).await.unwrap();
    }
    let stats = store.stats(None).await.unwrap();
    assert_eq!(stats.streak, 1);
    assert_eq!(stats.last_achieved_day, Some(clock.today()));
}

#[tokio::test]
async fn five_day_streak_routes_the_current_step_to_its_exam() {
    let (tracker, store) = guest_tracker();
    let clock = DayClock::utc();

    store.set_rank(None, 2).await.unwrap();
    store
        .set_stats(
            None,
            StreakStats {
                streak: 5,
                last_achieved_day: Some(clock.today()),
            },
        )
        .await
        .unwrap();

    let overview = tracker.overview(None).await;
    let current = overview.steps.iter().find(|s| s.rank_id == 2).unwrap();
    assert!(current.exam_required);
    // Only the current step routes to an exam.
    assert!(overview
        .steps
        .iter()
        .filter(|s| s.rank_id != 2)
        .all(|s| !s.exam_required));

    // Passing the exam promotes; the new current step needs a fresh
    // streak before it examines again.
    let exam = tracker.pass_exam(None, 2).await.unwrap();
    assert!(exam.promoted);
    assert_eq!(exam.rank, 3);
}

#[tokio::test]
async fn history_is_served_newest_first() {
    let (tracker, _store) = guest_tracker();

    let first = tracker.log_set(None, 1, 1).await.unwrap();
    let second = tracker.log_set(None, 2, 1).await.unwrap();
    let third = tracker.log_set(None, 2, 1).await.unwrap();

    let history = tracker.history(None, None).await;
    let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            third.record.id.as_str(),
            second.record.id.as_str(),
            first.record.id.as_str()
        ]
    );
}
