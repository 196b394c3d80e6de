//! Access to the `confessions` table through the project's REST gateway.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SupabaseConfig;

const TABLE: &str = "confessions";

/// Moderation state of a confession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfessionStatus {
    /// Approved and waiting to be published.
    Queued,
    Posted,
    Failed,
}

impl fmt::Display for ConfessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Queued => "queued",
            Self::Posted => "posted",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A confession row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Confession {
    pub id: i64,
    pub content: String,
    /// Pre-rendered card image handed to Instagram.
    pub image_url: String,
    pub status: ConfessionStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request to the confessions table failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("confessions table returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("queued row has no numeric id: {0}")]
    MissingId(Value),
}

/// The row picked up from the queue.
///
/// A row whose id is readable but whose other columns are not is still
/// returned, so the caller can take it off the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuedConfession {
    Ready(Confession),
    Malformed { id: i64, reason: String },
}

impl QueuedConfession {
    pub fn id(&self) -> i64 {
        match self {
            Self::Ready(confession) => confession.id,
            Self::Malformed { id, .. } => *id,
        }
    }

    fn from_row(row: Value) -> Result<Self, StoreError> {
        let Some(id) = row.get("id").and_then(Value::as_i64) else {
            return Err(StoreError::MissingId(row));
        };
        match serde_json::from_value::<Confession>(row) {
            Ok(confession) => Ok(Self::Ready(confession)),
            Err(e) => {
                warn!("ConfessionStore: confession #{id} is malformed: {e}");
                Ok(Self::Malformed {
                    id,
                    reason: format!("malformed confession row: {e}"),
                })
            }
        }
    }
}

#[derive(Serialize)]
struct StatusPatch {
    status: ConfessionStatus,
}

/// Reads and updates confessions with the project key.
#[derive(Debug, Clone)]
pub struct ConfessionStore {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl ConfessionStore {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{TABLE}", self.config.rest_url())
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let key = self.config.anon_key();
        self.client
            .request(method, self.table_url())
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Fetches one queued confession, in the table's natural order.
    pub async fn next_queued(&self) -> Result<Option<QueuedConfession>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("status", "eq.queued"), ("limit", "1")])
            .send()
            .await?;

        // Rows are decoded one by one so a bad column cannot hide the id.
        let rows: Vec<Value> = check_status(response).await?.json().await?;
        debug!("ConfessionStore: {} queued row(s) returned", rows.len());
        rows.into_iter()
            .next()
            .map(QueuedConfession::from_row)
            .transpose()
    }

    pub async fn set_status(&self, id: i64, status: ConfessionStatus) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .json(&StatusPatch { status })
            .send()
            .await?;

        check_status(response).await?;
        debug!("ConfessionStore: confession #{id} marked {status}");
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}
