use std::collections::BTreeSet;

use time::Date;

use crate::domain::{Field, Reading, SeriesDescriptor};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeriesPoint {
    pub date: Date,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScatterPoint {
    pub date: Date,
    pub daily_temp_f: f64,
    pub kwh: f64,
    pub high_temp: bool,
}

/// Value-axis domain `[0, max]` for a field.
///
/// Returns `None` when no reading carries a value for the field, which
/// callers treat as "no series drawn".
pub fn value_domain(readings: &[Reading], field: Field) -> Option<(f64, f64)> {
    let descriptor = field.descriptor();
    readings
        .iter()
        .filter_map(|r| descriptor.value(r))
        .reduce(f64::max)
        .map(|max| (0.0, max))
}

/// First and last date covered by the sequence.
pub fn date_extent(readings: &[Reading]) -> Option<(Date, Date)> {
    let min = readings.iter().map(|r| r.date).min()?;
    let max = readings.iter().map(|r| r.date).max()?;
    Some((min, max))
}

pub fn temperature_extent(readings: &[Reading]) -> Option<(f64, f64)> {
    readings
        .iter()
        .filter_map(|r| r.daily_temp_f)
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
}

/// Split a series into contiguous drawable runs.
///
/// A reading whose value is missing or outside the descriptor bounds ends
/// the current run; the line is never interpolated across it.
pub fn line_segments(
    readings: &[Reading],
    descriptor: &SeriesDescriptor,
) -> Vec<Vec<SeriesPoint>> {
    let mut segments = Vec::new();
    let mut current: Vec<SeriesPoint> = Vec::new();

    for r in readings {
        match descriptor.drawable(r) {
            Some(value) => current.push(SeriesPoint { date: r.date, value }),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Readings whose year is one of `years` (exact match), in source order.
pub fn filter_by_years<'a>(readings: &'a [Reading], years: &[i32]) -> Vec<&'a Reading> {
    readings.iter().filter(|r| years.contains(&r.year)).collect()
}

/// Points with both a temperature and an energy value, in source order.
pub fn scatter_points<'a, I>(readings: I, high_temp_f: f64) -> Vec<ScatterPoint>
where
    I: IntoIterator<Item = &'a Reading>,
{
    readings
        .into_iter()
        .filter_map(|r| {
            let (t, kwh) = (r.daily_temp_f?, r.kwh?);
            Some(ScatterPoint {
                date: r.date,
                daily_temp_f: t,
                kwh,
                high_temp: t > high_temp_f,
            })
        })
        .collect()
}

/// Distinct years present, ascending.
pub fn available_years(readings: &[Reading]) -> Vec<i32> {
    readings
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
