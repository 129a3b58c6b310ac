use time::Date;

/// One normalized day of building data.
///
/// `kwh` and `daily_temp_f` are `None` when the source value could not be
/// read as a finite number, or (for temperature) when it was flagged as
/// implausible and could not be imputed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    pub date: Date,
    pub kwh: Option<f64>,
    pub daily_temp_f: Option<f64>,
    pub year: i32,
}

impl Reading {
    pub fn new(date: Date, kwh: Option<f64>, daily_temp_f: Option<f64>) -> Self {
        Self {
            date,
            kwh,
            daily_temp_f,
            year: date.year(),
        }
    }
}
