use std::{pin::Pin, sync::Arc};

use futures::{Stream, StreamExt};

#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    /// 1-based line in the source file, for diagnostics.
    pub line: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(String),
    #[error("row {line} rejected: {reason}")]
    Row { line: u64, reason: String },
    #[error("sink error: {0}")]
    Sink(String),
}

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn stream(
        &self,
    ) -> Pin<Box<dyn Stream<Item = Result<Envelope<T>, PipelineError>> + Send>>;
}

/// Row-at-a-time conversion applied as records arrive.
#[async_trait::async_trait]
pub trait Transform<I, O>: Send + Sync {
    async fn apply(&self, input: Envelope<I>) -> Result<Envelope<O>, PipelineError>;
}

/// Whole-sequence pass that needs positional context (neighbouring rows).
pub trait BatchTransform<T>: Send + Sync {
    fn apply(&self, input: Vec<T>) -> Result<Vec<T>, PipelineError>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    async fn run(&self, batch: Vec<T>) -> Result<(), PipelineError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: usize,
}

pub struct Pipeline<S, I, T, K> {
    pub source: S,
    pub transform: Arc<dyn Transform<I, T> + Send + Sync>,
    /// Run in order over the full batch.
    pub batch_transforms: Vec<Arc<dyn BatchTransform<T> + Send + Sync>>,
    pub sink: K,
}

impl<S, I, T, K> Pipeline<S, I, T, K>
where
    I: Send + 'static,
    T: Send + 'static,
    S: Source<I> + Send + Sync + 'static,
    K: Sink<T> + Send + Sync + 'static,
{
    /// Drain the source, then run batch transforms and hand the result to the sink.
    ///
    /// Row errors are logged and skipped; any other error aborts the run.
    pub async fn run(self) -> Result<LoadReport, PipelineError> {
        let mut stream = self.source.stream().await;
        let mut batch = Vec::new();
        let mut report = LoadReport::default();

        while let Some(item) = stream.next().await {
            let res = match item {
                Ok(env) => self.transform.apply(env).await,
                Err(e) => Err(e),
            };

            match res {
                Ok(env) => {
                    batch.push(env.payload);
                    report.accepted += 1;
                }
                Err(PipelineError::Row { line, reason }) => {
                    tracing::warn!(line, reason = %reason, "skipping malformed row");
                    metrics::counter!("hvac_rows_rejected_total").increment(1);
                    report.rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }

        for t in &self.batch_transforms {
            batch = t.apply(batch)?;
        }

        self.sink.run(batch).await?;

        tracing::info!(
            accepted = report.accepted,
            rejected = report.rejected,
            "load pipeline finished"
        );
        Ok(report)
    }
}
