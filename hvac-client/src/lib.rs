pub mod domain;
pub mod query;

pub use domain::{Field, Reading, SelectionError, SeriesDescriptor};
