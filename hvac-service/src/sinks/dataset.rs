use hvac_client::Reading;

use crate::{
    pipeline::{PipelineError, Sink},
    store::DatasetStore,
};

/// Publishes the cleaned sequence into the store that chart requests read.
pub struct DatasetSink {
    store: DatasetStore,
}

impl DatasetSink {
    pub fn new(store: DatasetStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Sink<Reading> for DatasetSink {
    async fn run(&self, batch: Vec<Reading>) -> Result<(), PipelineError> {
        let rows = batch.len();
        if !self.store.publish(batch).await {
            return Err(PipelineError::Sink("dataset already loaded for this session".to_string()));
        }
        metrics::gauge!("hvac_dataset_rows").set(rows as f64);
        tracing::info!(rows, "dataset published");
        Ok(())
    }
}
