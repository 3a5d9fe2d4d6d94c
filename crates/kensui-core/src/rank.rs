//! Rank progression rules.
//!
//! A user's rank is a pointer into the catalog: everything below it is
//! cleared, the matching step is current, everything above is locked.
//! Promotion is monotonic. A candidate at or below the current rank
//! leaves it untouched, whatever the caller believed, so no sequence
//! of calls can ever demote an account.

use serde::{Deserialize, Serialize};

use crate::program::TrainingStep;

/// Rank every account starts at.
pub const DEFAULT_RANK: u32 = 1;

/// Streak length at which a current step with exam criteria stops
/// offering plain training and routes to the promotion exam instead.
pub const EXAM_STREAK_THRESHOLD: u32 = 5;

/// How a catalog step relates to a user's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Above the user's rank; not yet reachable.
    Locked,
    /// The step being trained right now.
    Current,
    /// Already passed.
    Cleared,
}

/// Classify a step against a user's rank.
pub fn step_status(step: &TrainingStep, user_rank: u32) -> StepStatus {
    if step.rank_id > user_rank {
        StepStatus::Locked
    } else if step.rank_id == user_rank {
        StepStatus::Current
    } else {
        StepStatus::Cleared
    }
}

/// Outcome of applying a promotion candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    pub new_rank: u32,
    pub promoted: bool,
}

/// Apply a promotion candidate to the current rank. Only a strictly
/// higher candidate moves it.
pub fn promote(current: u32, candidate: u32) -> Promotion {
    if candidate > current {
        Promotion {
            new_rank: candidate,
            promoted: true,
        }
    } else {
        Promotion {
            new_rank: current,
            promoted: false,
        }
    }
}

/// Whether the step's training action must be replaced by the
/// promotion-exam prompt: the step is current, it defines exam
/// criteria, and the streak has reached the threshold. Display routing
/// only; nothing here is persisted.
pub fn exam_required(step: &TrainingStep, user_rank: u32, streak: u32) -> bool {
    step.test_criteria.is_some()
        && step_status(step, user_rank) == StepStatus::Current
        && streak >= EXAM_STREAK_THRESHOLD
}
