//! Completed-set records.
//!
//! One record per completed set, not per workout. The ledger is
//! append-only: nothing in the engine edits or deletes a record once
//! it is filed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::program::TrainingStep;

/// A completed set, as persisted.
///
/// Field names follow the wire documents (`createdAt`, camelCase) so
/// the same shape round-trips through the remote account store and the
/// local guest namespace. `created_at` is the instant the set was
/// logged; day bucketing happens at read time through a
/// [`DayClock`](crate::daykey::DayClock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    /// Push id assigned by the remote store, or a UUID for guest
    /// records.
    pub id: String,
    /// Badge label of the step at the time of logging.
    pub level: String,
    /// Step title at the time of logging.
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Sets this record stands for, conventionally 1.
    pub sets: u32,
}

/// A record about to be appended. The store assigns the id and stamps
/// `created_at` at the call instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDraft {
    pub level: String,
    pub title: String,
    pub sets: u32,
}

impl SetDraft {
    /// Draft one completed set of the given step.
    pub fn for_step(step: &TrainingStep) -> Self {
        Self {
            level: step.level.clone(),
            title: step.title.clone(),
            sets: 1,
        }
    }

    /// Override the set count, e.g. when a whole workout is logged as
    /// one record.
    pub fn with_sets(mut self, sets: u32) -> Self {
        self.sets = sets;
        self
    }

    /// A draft must stand for at least one set of a named exercise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sets == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sets".to_string(),
                message: "a record must count at least one set".to_string(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "title must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;

    #[test]
    fn draft_for_step_copies_labels() {
        let program = Program::default_progression();
        let draft = SetDraft::for_step(program.step(2).unwrap());
        assert_eq!(draft.level, "1");
        assert_eq!(draft.title, "Australian Pull-up");
        assert_eq!(draft.sets, 1);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn zero_set_draft_is_rejected() {
        let program = Program::default_progression();
        let draft = SetDraft::for_step(program.step(1).unwrap()).with_sets(0);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let draft = SetDraft {
            level: "0".to_string(),
            title: "   ".to_string(),
            sets: 1,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn record_serializes_in_wire_form() {
        let record = SetRecord {
            id: "-NxAbc123".to_string(),
            level: "0".to_string(),
            title: "Dead Hang".to_string(),
            created_at: "2026-03-01T12:30:00Z".parse().unwrap(),
            sets: 1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["createdAt"], "2026-03-01T12:30:00Z");
        assert_eq!(json["id"], "-NxAbc123");
        assert_eq!(json["sets"], 1);
    }
}
