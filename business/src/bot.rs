//! One run of the confession publisher.
//!
//! ## Flow
//!
//! 1. Fetch one `queued` confession; stop if there is none
//!    (a row with unreadable columns goes straight to step 3 as a failure)
//! 2. Publish its image with the confession text as caption
//! 3. Mark it `posted` on success, `failed` otherwise
//!
//! If the store itself fails after a confession was picked up, the run makes
//! a best-effort attempt to mark it `failed` before reporting the error.

use log::{error, info, warn};

use crate::confessions::{ConfessionStatus, ConfessionStore, QueuedConfession, StoreError};
use crate::instagram::InstagramPublisher;

/// Result of a run that reached the end of its flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// Nothing was queued.
    Idle,
    Posted { id: i64, post_id: String },
    /// Publishing failed and the confession was marked `failed`.
    Failed { id: i64, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn process_one_confession(
    store: &ConfessionStore,
    publisher: &InstagramPublisher,
) -> Result<RunReport, BotError> {
    let Some(queued) = store.next_queued().await? else {
        info!("No queued confessions found");
        return Ok(RunReport::Idle);
    };
    let id = queued.id();
    info!("Processing confession #{id}");

    let published = match queued {
        QueuedConfession::Ready(confession) => publisher
            .publish(&confession.image_url, &confession.content)
            .await
            .map_err(|e| e.to_string()),
        QueuedConfession::Malformed { reason, .. } => Err(reason),
    };

    let (status, report) = match published {
        Ok(post_id) => (ConfessionStatus::Posted, RunReport::Posted { id, post_id }),
        Err(reason) => {
            warn!("Publishing confession #{id} failed: {reason}");
            (ConfessionStatus::Failed, RunReport::Failed { id, reason })
        }
    };

    if let Err(e) = store.set_status(id, status).await {
        error!("Updating confession #{id} to '{status}' failed: {e}");
        if status != ConfessionStatus::Failed {
            if let Err(retry) = store.set_status(id, ConfessionStatus::Failed).await {
                error!("Marking confession #{id} as failed also failed: {retry}");
            }
        }
        return Err(e.into());
    }

    info!("Updated confession #{id} status to '{status}'");
    Ok(report)
}
