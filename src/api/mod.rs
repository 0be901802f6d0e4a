//! Training API collaborator
//!
//! The `TrainingApi` trait is what the app talks to; `ApiClient` is the
//! HTTP implementation. Read-only fetches are retried, saves never are.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{retry_async, RetryConfig};
use crate::models::{
    CreateTrainingSessionRequest, MySetDetail, MySetSummary, PreviousSession,
    PreviousSessionData, SaveAck, TrainingSession,
};
use crate::Result;

pub mod client;

pub use client::ApiClient;

#[async_trait]
pub trait TrainingApi: Send + Sync {
    /// `GET /training/mysets`
    async fn list_mysets(&self) -> Result<Vec<MySetSummary>>;

    /// `GET /training/mysets/{id}`
    async fn fetch_myset(&self, id: i64) -> Result<MySetDetail>;

    /// `GET /training/mysets/{id}/record/`; `None` when there is no record yet
    async fn fetch_previous_session(&self, id: i64) -> Result<Option<PreviousSessionData>>;

    /// `POST /training/mysets/{id}/record/`
    async fn save_session(
        &self,
        id: i64,
        request: &CreateTrainingSessionRequest,
    ) -> Result<SaveAck>;
}

/// Fetch the template list, retrying transient failures
pub async fn load_mysets(api: &dyn TrainingApi, retry: RetryConfig) -> Result<Vec<MySetSummary>> {
    let mysets = retry_async(|| api.list_mysets(), retry).await?;
    info!(count = mysets.len(), "mysets loaded");
    Ok(mysets)
}

/// Fetch a template and the previous session of it.
///
/// A failing template fetch is an error. A failing previous-session fetch is
/// logged and the session starts without comparison data.
pub async fn load_session(
    api: &dyn TrainingApi,
    id: i64,
    retry: RetryConfig,
) -> Result<(TrainingSession, Option<PreviousSession>)> {
    let detail = retry_async(|| api.fetch_myset(id), retry.clone()).await?;
    let session = detail.into_session()?;

    let previous = match retry_async(|| api.fetch_previous_session(id), retry).await {
        Ok(data) => data.map(PreviousSession::from),
        Err(err) => {
            warn!(myset = id, error = %err, "previous session unavailable");
            None
        }
    };

    info!(
        myset = id,
        exercises = session.exercises.len(),
        has_previous = previous.is_some(),
        "session loaded"
    );
    Ok((session, previous))
}
