pub mod series_queries;

pub use series_queries::{
    available_years, date_extent, filter_by_years, line_segments, scatter_points,
    temperature_extent, value_domain, ScatterPoint, SeriesPoint,
};
