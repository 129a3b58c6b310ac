use hvac_client::Reading;
use time::{format_description::FormatItem, macros::format_description, Date};

use crate::{
    pipeline::{Envelope, PipelineError, Transform},
    sources::RawRow,
};

/// Accepts `7/4/2023` as well as `07/04/2023`.
const DATE_IN: &[FormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");
const DATE_OUT: &[FormatItem<'static>] = format_description!("[month]/[day]/[year]");

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid date '{0}', expected MM/DD/YYYY")]
    InvalidDate(String),
}

pub fn parse_date(s: &str) -> Result<Date, NormalizeError> {
    Date::parse(s.trim(), DATE_IN).map_err(|_| NormalizeError::InvalidDate(s.to_string()))
}

pub fn format_date(date: Date) -> String {
    // The description only holds numeric components, which always format.
    date.format(DATE_OUT).unwrap_or_default()
}

/// Numeric coercion: blank, non-numeric or non-finite text becomes `None`.
pub fn coerce_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert one raw CSV row into a `Reading`.
///
/// Only the date is mandatory. When the `year` column is absent or not an
/// integer the year is taken from the date.
pub fn normalize_row(row: &RawRow) -> Result<Reading, NormalizeError> {
    let date = parse_date(&row.date)?;
    let mut reading = Reading::new(date, coerce_number(&row.kwh), coerce_number(&row.daily_temp_f));

    if let Some(year) = row.year.as_deref().and_then(|y| y.trim().parse::<i32>().ok()) {
        reading.year = year;
    }

    Ok(reading)
}

/// Normalize a whole batch; output has the same length and order as the input.
pub fn normalize_all(rows: &[RawRow]) -> Vec<Result<Reading, NormalizeError>> {
    rows.iter().map(normalize_row).collect()
}

#[derive(Clone, Default)]
pub struct Normalizer;

#[async_trait::async_trait]
impl Transform<RawRow, Reading> for Normalizer {
    async fn apply(&self, input: Envelope<RawRow>) -> Result<Envelope<Reading>, PipelineError> {
        match normalize_row(&input.payload) {
            Ok(reading) => Ok(Envelope {
                payload: reading,
                line: input.line,
            }),
            Err(e) => {
                metrics::counter!("hvac_normalize_rejected_total").increment(1);
                Err(PipelineError::Row {
                    line: input.line,
                    reason: e.to_string(),
                })
            }
        }
    }
}
