pub mod reading;
pub mod series;

pub use reading::Reading;
pub use series::{Field, SelectionError, SeriesDescriptor};
