//! # Kensui Core Library
//!
//! This library provides the core business logic for Kensui, a guided
//! pull-up training tracker: users climb an ordered catalog of skill
//! steps, log their daily sets, keep streaks, and take promotion exams
//! to advance. All rules live here; front-ends (the CLI binary, the
//! mobile shell) are thin layers over the same core library.
//!
//! ## Architecture
//!
//! - **Progress Store**: one persistence contract with two backends,
//!   the remote account database and the local SQLite guest namespace,
//!   selected per call by the presence of an account id
//! - **Achievement Engine**: daily quota and streak evaluation, the
//!   only writer of streak state, serialized per account
//! - **Rank Rules**: locked/current/cleared classification, monotonic
//!   promotion, and exam routing
//! - **Tracker**: orchestration plus degrading aggregate reads for
//!   rendering
//!
//! ## Key Components
//!
//! - [`ProgressTracker`]: one call per user action
//! - [`ProgressStore`]: dual-backend persistence
//! - [`AchievementEngine`]: quota and streak rules
//! - [`Program`]: the training-step catalog

pub mod achievement;
pub mod config;
pub mod daykey;
pub mod error;
pub mod events;
pub mod program;
pub mod rank;
pub mod record;
pub mod session;
pub mod store;
pub mod tracker;

pub use achievement::{AchievementEngine, DailyOutcome, DEFAULT_DAILY_TARGET};
pub use config::Config;
pub use daykey::{DayClock, DayKey};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use program::{Program, Target, TargetKind, TestCriteria, TrainingStep};
pub use rank::{Promotion, StepStatus, DEFAULT_RANK, EXAM_STREAK_THRESHOLD};
pub use record::{SetDraft, SetRecord};
pub use session::{AccountId, Session};
pub use store::{LocalStore, Namespace, ProgressStore, RemoteConfig, RemoteStore, StreakStats};
pub use tracker::{ExamOutcome, Overview, ProgressTracker, SetOutcome, StepOverview};
