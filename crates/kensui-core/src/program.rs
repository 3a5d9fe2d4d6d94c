//! The training-step catalog.
//!
//! Kensui ships the classic four-step pull-up ladder. Steps are static
//! data: the engine only ever reads them, keyed by `rank_id`. Rank ids
//! are contiguous and strictly ascending from 1. `level` is the badge
//! label the program displays; it starts at "0", so it is a label, not
//! an index.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Whether a target is held for time or counted in repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Time,
    Count,
}

/// A per-set goal, e.g. "30 sec" or "10 reps".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    pub value: u32,
    pub unit: String,
}

impl Target {
    /// A hold-for-time target, in seconds.
    pub fn time(value: u32) -> Self {
        Self {
            kind: TargetKind::Time,
            value,
            unit: "sec".to_string(),
        }
    }

    /// A repetition-count target.
    pub fn count(value: u32) -> Self {
        Self {
            kind: TargetKind::Count,
            value,
            unit: "reps".to_string(),
        }
    }
}

/// What must be performed, in one attempt, to pass the promotion exam
/// of a step. Steps without criteria are trained but never examined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCriteria {
    pub target: Target,
    pub sets: u32,
}

/// One entry of the progression catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStep {
    /// Progression key: contiguous, strictly ascending, starting at 1.
    pub rank_id: u32,
    /// Badge label shown next to the step.
    pub level: String,
    pub title: String,
    pub description: String,
    pub target: Target,
    /// Prescribed sets per workout, at least 1.
    pub sets: u32,
    /// Rest between sets, in seconds.
    pub rest_seconds: u32,
    /// Exam to unlock the next rank.
    pub test_criteria: Option<TestCriteria>,
}

/// The ordered catalog of training steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub steps: Vec<TrainingStep>,
}

impl Program {
    /// The built-in pull-up progression: dead hang, Australian pull-up,
    /// negative pull-up, full pull-up.
    pub fn default_progression() -> Self {
        Self {
            steps: vec![
                TrainingStep {
                    rank_id: 1,
                    level: "0".to_string(),
                    title: "Dead Hang".to_string(),
                    description: "Start by simply hanging from the bar. Builds grip \
                                  strength and the feel of supporting your own weight."
                        .to_string(),
                    target: Target::time(30),
                    sets: 3,
                    rest_seconds: 60,
                    test_criteria: Some(TestCriteria {
                        target: Target::time(60),
                        sets: 1,
                    }),
                },
                TrainingStep {
                    rank_id: 2,
                    level: "1".to_string(),
                    title: "Australian Pull-up".to_string(),
                    description: "Use a low bar with your feet on the ground and pull \
                                  your chest up to the bar at an incline."
                        .to_string(),
                    target: Target::count(10),
                    sets: 3,
                    rest_seconds: 90,
                    test_criteria: Some(TestCriteria {
                        target: Target::count(15),
                        sets: 1,
                    }),
                },
                TrainingStep {
                    rank_id: 3,
                    level: "2".to_string(),
                    title: "Negative Pull-up".to_string(),
                    description: "Jump up to the top position, then lower yourself as \
                                  slowly as you can."
                        .to_string(),
                    target: Target::count(5),
                    sets: 3,
                    rest_seconds: 120,
                    test_criteria: Some(TestCriteria {
                        target: Target::count(8),
                        sets: 1,
                    }),
                },
                TrainingStep {
                    rank_id: 4,
                    level: "3".to_string(),
                    title: "Pull-up".to_string(),
                    description: "From a dead hang, pull without swinging until your \
                                  chin clears the bar."
                        .to_string(),
                    target: Target::count(1),
                    sets: 1,
                    rest_seconds: 120,
                    test_criteria: Some(TestCriteria {
                        target: Target::count(3),
                        sets: 1,
                    }),
                },
            ],
        }
    }

    /// Look up a step by its rank id.
    pub fn step(&self, rank_id: u32) -> Option<&TrainingStep> {
        self.steps.iter().find(|s| s.rank_id == rank_id)
    }

    /// Highest rank id in the catalog, 0 for an empty one.
    pub fn max_rank(&self) -> u32 {
        self.steps.last().map(|s| s.rank_id).unwrap_or(0)
    }

    /// Check the catalog invariant: rank ids contiguous and strictly
    /// ascending from 1, every step prescribing at least one set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.steps.is_empty() {
            return Err(ValidationError::InvalidCatalog(
                "catalog has no steps".to_string(),
            ));
        }
        for (index, step) in self.steps.iter().enumerate() {
            let expected = index as u32 + 1;
            if step.rank_id != expected {
                return Err(ValidationError::InvalidCatalog(format!(
                    "rank ids must be contiguous from 1: expected {expected}, found {} ('{}')",
                    step.rank_id, step.title
                )));
            }
            if step.sets == 0 {
                return Err(ValidationError::InvalidCatalog(format!(
                    "step '{}' prescribes zero sets",
                    step.title
                )));
            }
        }
        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::default_progression()
    }
}
