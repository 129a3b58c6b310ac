use std::{fmt, str::FromStr};

use crate::domain::Reading;

/// Errors raised while resolving a selection coming from the UI.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid year '{0}'")]
    InvalidYear(String),
}

/// The closed set of series a chart can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    #[cfg_attr(feature = "serde", serde(rename = "energyUsage"))]
    EnergyUsage,
    #[cfg_attr(feature = "serde", serde(rename = "temp"))]
    Temp,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::EnergyUsage, Field::Temp];

    /// Key used by the field selector control.
    pub fn key(self) -> &'static str {
        match self {
            Field::EnergyUsage => "energyUsage",
            Field::Temp => "temp",
        }
    }

    pub fn descriptor(self) -> &'static SeriesDescriptor {
        match self {
            Field::EnergyUsage => &ENERGY_USAGE,
            Field::Temp => &TEMP,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| SelectionError::UnknownField(s.to_string()))
    }
}

/// Static description of how a field is read, bounded and labelled.
///
/// Values outside `[min, max)` are treated as gaps when drawing.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeriesDescriptor {
    pub field: Field,
    /// CSV column the values come from.
    pub column: &'static str,
    pub min: f64,
    pub max: f64,
    pub y_label: &'static str,
}

pub static ENERGY_USAGE: SeriesDescriptor = SeriesDescriptor {
    field: Field::EnergyUsage,
    column: "kWh",
    min: f64::MIN_POSITIVE,
    max: f64::MAX,
    y_label: "Daily Electrical Energy",
};

pub static TEMP: SeriesDescriptor = SeriesDescriptor {
    field: Field::Temp,
    column: "DailyTempF",
    min: 1.0,
    max: 90.0,
    y_label: "Average Daily Temperature",
};

impl SeriesDescriptor {
    /// Resolve a descriptor from an untrusted selector value.
    pub fn lookup(key: &str) -> Result<&'static SeriesDescriptor, SelectionError> {
        key.parse::<Field>().map(Field::descriptor)
    }

    pub fn value(&self, reading: &Reading) -> Option<f64> {
        match self.field {
            Field::EnergyUsage => reading.kwh,
            Field::Temp => reading.daily_temp_f,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    /// The value if present and within bounds; `None` marks a gap.
    pub fn drawable(&self, reading: &Reading) -> Option<f64> {
        self.value(reading).filter(|v| self.contains(*v))
    }

    pub fn format(&self, value: f64) -> String {
        match self.field {
            Field::EnergyUsage => format!("{:.0} MW", value / 1000.0),
            Field::Temp => format!("{value:.0}F"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn lookup_resolves_registered_keys() {
        assert_eq!(SeriesDescriptor::lookup("temp").unwrap().field, Field::Temp);
        assert_eq!(
            SeriesDescriptor::lookup("energyUsage").unwrap().column,
            "kWh"
        );
    }

    #[test]
    fn lookup_rejects_unregistered_key() {
        let res = SeriesDescriptor::lookup("humidity");
        assert_eq!(res, Err(SelectionError::UnknownField("humidity".to_string())));

        // Keys are matched exactly, including case.
        assert!(SeriesDescriptor::lookup("Temp").is_err());
        assert!(SeriesDescriptor::lookup("").is_err());
    }

    #[test]
    fn key_and_parse_agree_for_every_field() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>(), Ok(field));
            assert_eq!(field.descriptor().field, field);
        }
    }

    #[test]
    fn bounds_are_inclusive_below_exclusive_above() {
        assert!(TEMP.contains(1.0));
        assert!(TEMP.contains(89.9));
        assert!(!TEMP.contains(90.0));
        assert!(!TEMP.contains(0.5));

        assert!(!ENERGY_USAGE.contains(0.0));
        assert!(ENERGY_USAGE.contains(12_000.0));
    }

    #[test]
    fn drawable_masks_missing_and_out_of_range_values() {
        let r = Reading::new(date!(2023 - 07 - 01), Some(0.0), Some(72.0));
        assert_eq!(TEMP.drawable(&r), Some(72.0));
        assert_eq!(ENERGY_USAGE.drawable(&r), None);

        let missing = Reading::new(date!(2023 - 07 - 02), None, None);
        assert_eq!(TEMP.drawable(&missing), None);
    }

    #[test]
    fn formatters_match_axis_units() {
        assert_eq!(ENERGY_USAGE.format(15_400.0), "15 MW");
        assert_eq!(TEMP.format(71.6), "72F");
    }
}
