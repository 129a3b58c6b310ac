use std::sync::Arc;

use hvac_client::Reading;

use crate::{
    config::SanitizerConfig,
    pipeline::{LoadReport, Pipeline, PipelineError, Sink},
    sources::{HvacCsvSource, RawRow},
    sinks::DatasetSink,
    store::DatasetStore,
    transform::{Normalizer, TemperatureSanitizer},
};

/// CSV → normalize → sanitize → `sink`.
pub fn csv_pipeline<K>(
    source: HvacCsvSource,
    sanitizer: SanitizerConfig,
    sink: K,
) -> Pipeline<HvacCsvSource, RawRow, Reading, K>
where
    K: Sink<Reading> + Send + Sync + 'static,
{
    Pipeline {
        source,
        transform: Arc::new(Normalizer),
        batch_transforms: vec![Arc::new(TemperatureSanitizer::new(sanitizer))],
        sink,
    }
}

/// One-shot load into `store`. A failure is recorded in the store and not retried.
pub async fn load_into_store(
    source: HvacCsvSource,
    sanitizer: SanitizerConfig,
    store: DatasetStore,
) -> Result<LoadReport, PipelineError> {
    let pipeline = csv_pipeline(source, sanitizer, DatasetSink::new(store.clone()));
    match pipeline.run().await {
        Ok(report) => Ok(report),
        Err(e) => {
            tracing::error!(error = %e, "dataset load failed");
            metrics::counter!("hvac_load_failures_total").increment(1);
            store.fail(e.to_string()).await;
            Err(e)
        }
    }
}
