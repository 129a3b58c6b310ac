//! Chart update protocol.
//!
//! Selection changes are handled by plain functions that receive the full
//! dataset and the selection; nothing here keeps "current field" state.
//! Every update names the series it replaces so the renderer can retire it,
//! leaving exactly one series on the surface.

use hvac_client::{
    query::{self, ScatterPoint, SeriesPoint},
    Field, Reading, SelectionError,
};
use serde::Serialize;
use std::collections::BTreeSet;
use time::Date;

use crate::config::{ChartConfig, Margin};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("data has not finished loading")]
    NotLoaded,
    #[error("data load failed: {0}")]
    LoadFailed(String),
    #[error("invalid selection: {0}")]
    Selection(#[from] SelectionError),
}

/// Drawing region: the outer size minus margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub content_width: u32,
    pub content_height: u32,
}

impl ChartLayout {
    pub fn from_config(cfg: &ChartConfig) -> Self {
        let m = cfg.margin;
        Self {
            width: cfg.width,
            height: cfg.height,
            margin: m,
            content_width: cfg.width.saturating_sub(m.left + m.right),
            content_height: cfg.height.saturating_sub(m.top + m.bottom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineUpdate {
    pub field: Field,
    pub y_label: &'static str,
    /// Series to fade out while this one fades in.
    pub retire: Option<Field>,
    pub transition_ms: u64,
    pub x_domain: Option<(Date, Date)>,
    /// `[0, max]`; `None` means nothing is drawn.
    pub y_domain: Option<(f64, f64)>,
    pub y_max_label: Option<String>,
    /// Contiguous drawable runs; gaps are not bridged.
    pub segments: Vec<Vec<SeriesPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterUpdate {
    /// Selected years, ascending and deduplicated.
    pub years: Vec<i32>,
    pub transition_ms: u64,
    pub x_domain: Option<(f64, f64)>,
    pub y_domain: Option<(f64, f64)>,
    pub points: Vec<ScatterPoint>,
}

/// Build the line-chart update for a field chosen in the selector.
///
/// `key` is untrusted UI input; `previous` is the field currently drawn.
pub fn on_field_selected(
    readings: &[Reading],
    key: &str,
    previous: Option<Field>,
    cfg: &ChartConfig,
) -> Result<LineUpdate, ChartError> {
    let field: Field = key.parse()?;
    Ok(line_update(readings, field, previous, cfg))
}

pub fn line_update(
    readings: &[Reading],
    field: Field,
    previous: Option<Field>,
    cfg: &ChartConfig,
) -> LineUpdate {
    let descriptor = field.descriptor();
    let y_domain = query::value_domain(readings, field);

    LineUpdate {
        field,
        y_label: descriptor.y_label,
        retire: previous.filter(|p| *p != field),
        transition_ms: cfg.transition_ms,
        x_domain: query::date_extent(readings),
        y_domain,
        y_max_label: y_domain.map(|(_, max)| descriptor.format(max)),
        segments: query::line_segments(readings, descriptor),
    }
}

/// Build the scatter update for the year selector.
///
/// `selection` is one year (`"2023"`) or a comma-separated list
/// (`"2022,2023"`). Axis domains come from the whole dataset so they stay
/// fixed while the selection changes.
pub fn on_year_selected(
    readings: &[Reading],
    selection: &str,
    cfg: &ChartConfig,
) -> Result<ScatterUpdate, ChartError> {
    let years = parse_years(selection)?;
    let selected = query::filter_by_years(readings, &years);

    Ok(ScatterUpdate {
        transition_ms: cfg.transition_ms,
        x_domain: query::temperature_extent(readings),
        y_domain: query::value_domain(readings, Field::EnergyUsage),
        points: query::scatter_points(selected, cfg.high_temp_f),
        years,
    })
}

fn parse_years(selection: &str) -> Result<Vec<i32>, SelectionError> {
    let invalid = || SelectionError::InvalidYear(selection.to_string());

    let years = selection
        .split(',')
        .map(|y| y.trim().parse::<i32>().map_err(|_| invalid()))
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(years.into_iter().collect())
}
