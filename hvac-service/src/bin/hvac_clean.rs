use anyhow::{bail, Result};
use hvac_service::{
    config::{AppConfig, SanitizerConfig},
    loader,
    observability,
    sinks::CsvWriterSink,
    sources::HvacCsvSource,
};
use std::env;

/// Clean a readings CSV and write the result to stdout.
///
/// Thresholds come from `HVAC_CONFIG` when it is set, otherwise defaults.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: hvac-clean <csv_file_path>");
    }
    let file_path = &args[1];

    let sanitizer = if env::var_os("HVAC_CONFIG").is_some() {
        AppConfig::load()?.sanitizer
    } else {
        SanitizerConfig::default()
    };

    let pipeline = loader::csv_pipeline(
        HvacCsvSource::new(file_path),
        sanitizer,
        CsvWriterSink::new(std::io::stdout()),
    );
    let report = pipeline.run().await?;

    if report.rejected > 0 {
        tracing::warn!(rejected = report.rejected, "some rows were dropped");
    }

    Ok(())
}
