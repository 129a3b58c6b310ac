use std::{io::Write, sync::Mutex};

use hvac_client::Reading;

use crate::{
    pipeline::{PipelineError, Sink},
    transform::normalize::format_date,
};

/// Writes cleaned readings back out in the input CSV layout.
///
/// Missing values are written as empty fields.
pub struct CsvWriterSink<W> {
    out: Mutex<Option<W>>,
}

impl<W: Write + Send> CsvWriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(Some(out)),
        }
    }

    /// Hand back the writer after `run`.
    pub fn into_inner(self) -> Option<W> {
        self.out.into_inner().ok().flatten()
    }
}

fn opt_field(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn write_all<W: Write>(out: &mut W, batch: &[Reading]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "DailyTempF", "kWh", "year"])?;
    for r in batch {
        wtr.write_record([
            format_date(r.date),
            opt_field(r.daily_temp_f),
            opt_field(r.kwh),
            r.year.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[async_trait::async_trait]
impl<W: Write + Send> Sink<Reading> for CsvWriterSink<W> {
    async fn run(&self, batch: Vec<Reading>) -> Result<(), PipelineError> {
        let mut guard = self
            .out
            .lock()
            .map_err(|_| PipelineError::Sink("CSV writer lock poisoned".to_string()))?;
        let out = guard
            .as_mut()
            .ok_or_else(|| PipelineError::Sink("CSV writer already taken".to_string()))?;

        write_all(out, &batch)
            .map_err(|e| PipelineError::Sink(format!("failed to write CSV: {e}")))?;
        tracing::info!(rows = batch.len(), "cleaned CSV written");
        Ok(())
    }
}
