pub mod chart;
pub mod config;
pub mod http;
pub mod loader;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod store;
pub mod transform;

pub use pipeline::{Envelope, Pipeline, PipelineError};
