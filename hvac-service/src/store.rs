use std::sync::Arc;

use hvac_client::Reading;
use tokio::sync::RwLock;

use crate::chart::ChartError;

/// Lifecycle of the one dataset loaded per session.
#[derive(Debug, Clone)]
pub enum LoadState {
    Pending,
    Ready(Arc<[Reading]>),
    /// Terminal; loads are not retried.
    Failed(String),
}

/// Shared handle that gates every chart request on a completed load.
#[derive(Clone)]
pub struct DatasetStore {
    state: Arc<RwLock<LoadState>>,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(LoadState::Pending)),
        }
    }

    /// Store the cleaned sequence. Only the first transition out of
    /// `Pending` takes effect.
    pub async fn publish(&self, readings: Vec<Reading>) -> bool {
        let mut guard = self.state.write().await;
        if !matches!(*guard, LoadState::Pending) {
            return false;
        }
        *guard = LoadState::Ready(readings.into());
        true
    }

    pub async fn fail(&self, reason: impl Into<String>) -> bool {
        let mut guard = self.state.write().await;
        if !matches!(*guard, LoadState::Pending) {
            return false;
        }
        *guard = LoadState::Failed(reason.into());
        true
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.clone()
    }

    /// The loaded readings, or why they are not available.
    pub async fn readings(&self) -> Result<Arc<[Reading]>, ChartError> {
        match &*self.state.read().await {
            LoadState::Ready(readings) => Ok(readings.clone()),
            LoadState::Pending => Err(ChartError::NotLoaded),
            LoadState::Failed(reason) => Err(ChartError::LoadFailed(reason.clone())),
        }
    }
}
