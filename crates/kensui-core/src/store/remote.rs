//! Remote account storage.
//!
//! Thin client over the account database's REST interface, one JSON
//! document per path in the Firebase Realtime-Database style the
//! hosted deployment runs on. Documents live under `users/{account}`;
//! a POST to the records node returns the server-assigned push id.
//! Every request carries the configured timeout so a stalled write
//! fails instead of hanging the caller.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::StreakStats;
use crate::error::StoreError;
use crate::rank::DEFAULT_RANK;
use crate::record::{SetDraft, SetRecord};
use crate::session::AccountId;

fn default_base_url() -> String {
    "https://kensui-app-default-rtdb.firebaseio.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Database root, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Id token appended as the `auth` query parameter. `None` works
    /// against databases with open rules and in tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Wire form of one record inside the per-account records map. The
/// record id is the map key, not a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordDoc {
    level: String,
    title: String,
    created_at: DateTime<Utc>,
    sets: u32,
}

impl RecordDoc {
    fn from_draft(draft: &SetDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            level: draft.level.clone(),
            title: draft.title.clone(),
            created_at,
            sets: draft.sets,
        }
    }

    fn into_record(self, id: String) -> SetRecord {
        SetRecord {
            id,
            level: self.level,
            title: self.title,
            created_at: self.created_at,
            sets: self.sets,
        }
    }
}

/// REST client for the per-account progress documents.
pub struct RemoteStore {
    config: RemoteConfig,
    http_client: Client,
}

impl RemoteStore {
    /// Create a new RemoteStore.
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    /// URL of one document node under the account, with the auth
    /// parameter when a token is configured.
    fn node_url(&self, account: &AccountId, node: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = format!(
            "{base}/users/{}/{node}.json",
            urlencoding::encode(account.as_str())
        );
        if let Some(token) = &self.config.auth_token {
            url.push_str(&format!("?auth={}", urlencoding::encode(token)));
        }
        url
    }

    /// Surface HTTP-level failures and `{"error": ...}` payloads as
    /// store errors; hand back the body otherwise.
    async fn check(resp: reqwest::Response) -> Result<serde_json::Value, StoreError> {
        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;
        if let Some(err) = body.get("error") {
            return Err(StoreError::Rejected(err.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Rejected(format!("HTTP {status}")));
        }
        Ok(body)
    }

    /// GET one document; a missing node (`null` body) comes back as
    /// `None`.
    async fn get_doc<T: DeserializeOwned>(
        &self,
        account: &AccountId,
        node: &str,
    ) -> Result<Option<T>, StoreError> {
        let resp = self
            .http_client
            .get(self.node_url(account, node))
            .timeout(self.timeout())
            .send()
            .await?;
        let body = Self::check(resp).await?;
        if body.is_null() {
            return Ok(None);
        }
        serde_json::from_value(body)
            .map(Some)
            .map_err(|err| StoreError::Corrupt {
                key: node.to_string(),
                message: err.to_string(),
            })
    }

    /// PUT one document, replacing whatever was at the node.
    async fn put_doc<T: Serialize>(
        &self,
        account: &AccountId,
        node: &str,
        doc: &T,
    ) -> Result<(), StoreError> {
        let resp = self
            .http_client
            .put(self.node_url(account, node))
            .timeout(self.timeout())
            .json(doc)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    // ── Progress documents ──────────────────────────────────────────

    pub async fn get_rank(&self, account: &AccountId) -> Result<u32, StoreError> {
        Ok(self
            .get_doc::<u32>(account, "rank")
            .await?
            .unwrap_or(DEFAULT_RANK))
    }

    pub async fn set_rank(&self, account: &AccountId, rank: u32) -> Result<(), StoreError> {
        self.put_doc(account, "rank", &rank).await
    }

    pub async fn get_stats(&self, account: &AccountId) -> Result<StreakStats, StoreError> {
        Ok(self
            .get_doc::<StreakStats>(account, "stats")
            .await?
            .unwrap_or_default())
    }

    pub async fn set_stats(
        &self,
        account: &AccountId,
        stats: &StreakStats,
    ) -> Result<(), StoreError> {
        self.put_doc(account, "stats", stats).await
    }

    /// POST the record document; the store answers `{"name": id}` with
    /// the push id it filed the record under.
    pub async fn append_record(
        &self,
        account: &AccountId,
        draft: &SetDraft,
        created_at: DateTime<Utc>,
    ) -> Result<SetRecord, StoreError> {
        let doc = RecordDoc::from_draft(draft, created_at);
        let resp = self
            .http_client
            .post(self.node_url(account, "records"))
            .timeout(self.timeout())
            .json(&doc)
            .send()
            .await?;
        let body = Self::check(resp).await?;
        let id = body["name"]
            .as_str()
            .ok_or_else(|| StoreError::Rejected("missing push id in append response".to_string()))?;
        Ok(doc.into_record(id.to_string()))
    }

    /// The whole records map of the account, newest first. A missing
    /// node means no records yet.
    pub async fn list_records(&self, account: &AccountId) -> Result<Vec<SetRecord>, StoreError> {
        let docs: Option<HashMap<String, RecordDoc>> = self.get_doc(account, "records").await?;
        let mut records: Vec<SetRecord> = docs
            .unwrap_or_default()
            .into_iter()
            .map(|(id, doc)| doc.into_record(id))
            .collect();
        // Newest first on the instant; ties break on the push id,
        // which is itself chronological.
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(base_url: &str, token: Option<&str>) -> RemoteStore {
        RemoteStore::new(RemoteConfig {
            base_url: base_url.to_string(),
            auth_token: token.map(|t| t.to_string()),
            request_timeout_secs: 5,
        })
    }

    #[test]
    fn node_url_places_account_and_node() {
        let store = store_with("https://db.example.com/", None);
        let url = store.node_url(&AccountId::from("uid-1"), "rank");
        assert_eq!(url, "https://db.example.com/users/uid-1/rank.json");
    }

    #[test]
    fn node_url_appends_auth_token() {
        let store = store_with("https://db.example.com", Some("tok en"));
        let url = store.node_url(&AccountId::from("uid-1"), "stats");
        assert_eq!(
            url,
            "https://db.example.com/users/uid-1/stats.json?auth=tok%20en"
        );
    }

    #[test]
    fn node_url_escapes_hostile_account_ids() {
        let store = store_with("https://db.example.com", None);
        let url = store.node_url(&AccountId::from("../intruder"), "rank");
        assert!(!url.contains("/../"));
        assert!(url.contains("..%2Fintruder"));
    }

    #[test]
    fn record_doc_round_trips_through_wire_form() {
        let draft = SetDraft {
            level: "2".to_string(),
            title: "Negative Pull-up".to_string(),
            sets: 1,
        };
        let at: DateTime<Utc> = "2026-03-01T10:00:00Z".parse().unwrap();
        let doc = RecordDoc::from_draft(&draft, at);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["createdAt"], "2026-03-01T10:00:00Z");
        assert!(json.get("id").is_none());

        let record = doc.into_record("-NxPush".to_string());
        assert_eq!(record.id, "-NxPush");
        assert_eq!(record.title, "Negative Pull-up");
        assert_eq!(record.created_at, at);
    }
}
