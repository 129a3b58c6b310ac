pub mod normalize;
pub mod sanitize;

pub use normalize::{normalize_all, normalize_row, NormalizeError, Normalizer};
pub use sanitize::{sanitize_temperatures, SanitizeReport, TemperatureSanitizer};
