//! Progress persistence.
//!
//! Two backends behind one contract: the remote account store (one
//! JSON document per path, keyed by account id) and the local guest
//! store (SQLite on this device). Which backend serves a call is
//! decided per operation from the account argument, never cached, so
//! an account switch takes effect on the very next call.

pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::{RemoteConfig, RemoteStore};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::daykey::DayKey;
use crate::error::{Result, StoreError};
use crate::record::{SetDraft, SetRecord};
use crate::session::AccountId;

/// Returns `~/.config/kensui[-dev]/` based on KENSUI_ENV.
///
/// Set KENSUI_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("KENSUI_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("kensui-dev")
    } else {
        base_dir.join("kensui")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// The namespace a store call is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Account(AccountId),
    Guest,
}

impl Namespace {
    /// Namespace for an optional account: `Some` maps to that account,
    /// `None` to guest.
    pub fn of(account: Option<&AccountId>) -> Self {
        match account {
            Some(id) => Namespace::Account(id.clone()),
            None => Namespace::Guest,
        }
    }

    /// Stable key used by the per-namespace lock registry.
    fn lock_key(&self) -> String {
        match self {
            Namespace::Account(id) => format!("account/{}", id.as_str()),
            Namespace::Guest => "guest".to_string(),
        }
    }
}

/// The streak pair. Always read and written as one document so the
/// counter and its anchor day cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    /// Consecutive achieved days, as last persisted.
    #[serde(default)]
    pub streak: u32,
    /// Day the daily quota was last met; absent until the first
    /// achieved day.
    #[serde(default)]
    pub last_achieved_day: Option<DayKey>,
}

/// Routes every operation to the backend owning the namespace and
/// hands out the per-namespace write locks.
///
/// The store itself does not serialize reads; only the operations that
/// read-modify-write (quota evaluation, promotion, guest appends) take
/// the namespace lock.
pub struct ProgressStore {
    remote: RemoteStore,
    local: LocalStore,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProgressStore {
    pub fn new(remote: RemoteStore, local: LocalStore) -> Self {
        Self {
            remote,
            local,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The mutual-exclusion scope for one namespace. Held across a
    /// whole read-modify-write, it guarantees overlapping updates to
    /// the same account observe each other.
    pub fn namespace_lock(&self, namespace: &Namespace) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(namespace.lock_key()).or_default().clone()
    }

    /// Current rank of the namespace; defaults apply when nothing was
    /// ever stored.
    pub async fn rank(&self, account: Option<&AccountId>) -> Result<u32, StoreError> {
        match account {
            Some(id) => self.remote.get_rank(id).await,
            None => self.local.get_rank(),
        }
    }

    /// Persist the rank. Callers apply the monotonic promotion rule
    /// before writing; the store stores.
    pub async fn set_rank(&self, account: Option<&AccountId>, rank: u32) -> Result<(), StoreError> {
        match account {
            Some(id) => self.remote.set_rank(id, rank).await,
            None => self.local.set_rank(rank),
        }
    }

    /// The streak document; a default (zero streak, no anchor day)
    /// when nothing was ever stored.
    pub async fn stats(&self, account: Option<&AccountId>) -> Result<StreakStats, StoreError> {
        match account {
            Some(id) => self.remote.get_stats(id).await,
            None => self.local.get_stats(),
        }
    }

    /// Persist the streak document as one unit.
    pub async fn set_stats(
        &self,
        account: Option<&AccountId>,
        stats: StreakStats,
    ) -> Result<(), StoreError> {
        match account {
            Some(id) => self.remote.set_stats(id, &stats).await,
            None => self.local.set_stats(&stats),
        }
    }

    /// Append one completed set to the namespace ledger. Validates the
    /// draft, stamps the call instant, and returns the stored record
    /// with its assigned id.
    pub async fn append_record(
        &self,
        account: Option<&AccountId>,
        draft: &SetDraft,
    ) -> Result<SetRecord> {
        draft.validate()?;
        let created_at = chrono::Utc::now();
        match account {
            Some(id) => Ok(self.remote.append_record(id, draft, created_at).await?),
            None => {
                // The guest ledger is one JSON array; serialize
                // concurrent appends so neither is lost.
                let lock = self.namespace_lock(&Namespace::Guest);
                let _guard = lock.lock().await;
                Ok(self.local.append_record(draft, created_at)?)
            }
        }
    }

    /// Every record of the namespace, newest first. An account with no
    /// records yields an empty list, not an error.
    pub async fn list_records(
        &self,
        account: Option<&AccountId>,
    ) -> Result<Vec<SetRecord>, StoreError> {
        match account {
            Some(id) => self.remote.list_records(id).await,
            None => self.local.list_records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_of_maps_account_presence() {
        let id = AccountId::from("abc");
        assert_eq!(Namespace::of(Some(&id)), Namespace::Account(id.clone()));
        assert_eq!(Namespace::of(None), Namespace::Guest);
    }

    #[test]
    fn lock_keys_do_not_collide_across_kinds() {
        // An account literally named "guest" must not share a lock
        // with the guest namespace.
        let account = Namespace::Account(AccountId::from("guest"));
        assert_ne!(account.lock_key(), Namespace::Guest.lock_key());
    }

    #[test]
    fn stats_document_round_trips_in_wire_form() {
        let stats = StreakStats {
            streak: 4,
            last_achieved_day: Some("2026-03-01".parse().unwrap()),
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["streak"], 4);
        assert_eq!(json["lastAchievedDay"], "2026-03-01");

        let back: StreakStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn stats_fields_default_when_absent() {
        let stats: StreakStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.streak, 0);
        assert!(stats.last_achieved_day.is_none());
    }
}
