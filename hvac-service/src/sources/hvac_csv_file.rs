use std::{fs::File, io::Read, path::PathBuf};

use futures::Stream;
use serde::Deserialize;

use crate::pipeline::{Envelope, PipelineError, Source};

pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "DailyTempF", "kWh"];

/// One CSV line as read, before any coercion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub date: String,
    #[serde(rename = "DailyTempF")]
    pub daily_temp_f: String,
    #[serde(rename = "kWh")]
    pub kwh: String,
    #[serde(default)]
    pub year: Option<String>,
}

enum CsvInput {
    Path(PathBuf),
    Inline(String),
}

/// CSV source for daily building readings.
///
/// Expected header columns (by name):
/// - date (MM/DD/YYYY)
/// - DailyTempF
/// - kWh
/// - year (optional)
///
/// Rows are yielded in file order.
pub struct HvacCsvSource {
    input: CsvInput,
}

impl HvacCsvSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            input: CsvInput::Path(path.into()),
        }
    }

    /// Read from CSV text already in memory.
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Self {
            input: CsvInput::Inline(text.into()),
        }
    }

    fn open(&self) -> Result<Box<dyn Read + Send>, PipelineError> {
        match &self.input {
            CsvInput::Path(path) => {
                let file = File::open(path).map_err(|e| {
                    let path = path.display();
                    PipelineError::Source(format!("failed to open CSV file '{path}': {e}"))
                })?;
                Ok(Box::new(file))
            }
            CsvInput::Inline(text) => Ok(Box::new(std::io::Cursor::new(text.clone().into_bytes()))),
        }
    }
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), PipelineError> {
    for name in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == name) {
            return Err(PipelineError::Source(format!("missing column '{name}' in CSV header")));
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl Source<RawRow> for HvacCsvSource {
    async fn stream(
        &self,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<Envelope<RawRow>, PipelineError>> + Send>> {
        // The files are small daily series; a blocking reader inside the stream is enough.
        let opened = self.open();
        let s = async_stream::stream! {
            let reader = match opened {
                Ok(r) => r,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let mut rdr = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            let headers = match rdr.headers() {
                Ok(h) => h.clone(),
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to read CSV headers: {e}")));
                    return;
                }
            };
            if let Err(e) = check_headers(&headers) {
                yield Err(e);
                return;
            }

            for result in rdr.records() {
                let record = match result {
                    Ok(r) => r,
                    Err(e) => {
                        metrics::counter!("hvac_csv_parse_errors_total").increment(1);
                        if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                            let reason = format!("failed to read CSV record: {e}");
                            yield Err(PipelineError::Source(reason));
                            return;
                        }
                        // A malformed line only costs that line.
                        let line = e.position().map(|p| p.line()).unwrap_or_default();
                        yield Err(PipelineError::Row { line, reason: e.to_string() });
                        continue;
                    }
                };

                let line = record.position().map(|p| p.line()).unwrap_or_default();
                metrics::counter!("hvac_csv_rows_read_total").increment(1);

                match record.deserialize::<RawRow>(Some(&headers)) {
                    Ok(row) => yield Ok(Envelope { payload: row, line }),
                    Err(e) => {
                        metrics::counter!("hvac_csv_parse_errors_total").increment(1);
                        yield Err(PipelineError::Row { line, reason: e.to_string() });
                    }
                }
            }
        };

        Box::pin(s)
    }
}
