//! Temperature cleaning: flag implausible readings, then fill isolated gaps.
//!
//! Both passes are positional. They rely on the file's row order, not on
//! sorting by date.

use hvac_client::Reading;

use crate::{
    config::SanitizerConfig,
    pipeline::{BatchTransform, PipelineError},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub out_of_range: usize,
    pub jumps: usize,
    pub imputed: usize,
    /// Missing after both passes, including values that were never readable.
    pub missing: usize,
}

/// Pass 1: drop temperatures outside the open range `(min_temp_f, max_temp_f)`
/// or more than `max_daily_jump_f` away from the previous row's original value.
///
/// The first row is only range-checked.
pub fn flag_outliers(
    temps: &[Option<f64>],
    cfg: &SanitizerConfig,
) -> (Vec<Option<f64>>, SanitizeReport) {
    let mut report = SanitizeReport::default();

    let flagged = temps
        .iter()
        .enumerate()
        .map(|(i, &temp)| {
            let t = temp?;
            if t <= cfg.min_temp_f || t >= cfg.max_temp_f {
                report.out_of_range += 1;
                return None;
            }
            let prev = i.checked_sub(1).and_then(|p| temps[p]);
            if let Some(prev) = prev {
                if (t - prev).abs() > cfg.max_daily_jump_f {
                    report.jumps += 1;
                    return None;
                }
            }
            Some(t)
        })
        .collect();

    (flagged, report)
}

/// Pass 2: fill a missing interior value with the mean of its neighbours
/// when both are present.
///
/// Reads neighbours from the pass-1 output only, so a filled value never
/// feeds the next position. The first and last rows are never filled.
pub fn impute_gaps(flagged: &[Option<f64>]) -> (Vec<Option<f64>>, usize) {
    let mut out = flagged.to_vec();
    let mut imputed = 0;

    for i in 1..flagged.len().saturating_sub(1) {
        if flagged[i].is_some() {
            continue;
        }
        if let (Some(prev), Some(next)) = (flagged[i - 1], flagged[i + 1]) {
            out[i] = Some((prev + next) / 2.0);
            imputed += 1;
        }
    }

    (out, imputed)
}

/// Run both passes over `readings.daily_temp_f`; other fields are untouched.
pub fn sanitize_temperatures(
    mut readings: Vec<Reading>,
    cfg: &SanitizerConfig,
) -> (Vec<Reading>, SanitizeReport) {
    let temps: Vec<Option<f64>> = readings.iter().map(|r| r.daily_temp_f).collect();

    let (flagged, mut report) = flag_outliers(&temps, cfg);
    let (cleaned, imputed) = impute_gaps(&flagged);
    report.imputed = imputed;
    report.missing = cleaned.iter().filter(|t| t.is_none()).count();

    for (reading, temp) in readings.iter_mut().zip(cleaned) {
        reading.daily_temp_f = temp;
    }

    (readings, report)
}

#[derive(Clone, Default)]
pub struct TemperatureSanitizer {
    cfg: SanitizerConfig,
}

impl TemperatureSanitizer {
    pub fn new(cfg: SanitizerConfig) -> Self {
        Self { cfg }
    }
}

impl BatchTransform<Reading> for TemperatureSanitizer {
    fn apply(&self, input: Vec<Reading>) -> Result<Vec<Reading>, PipelineError> {
        let (out, report) = sanitize_temperatures(input, &self.cfg);

        metrics::counter!("hvac_temp_flagged_range_total").increment(report.out_of_range as u64);
        metrics::counter!("hvac_temp_flagged_jump_total").increment(report.jumps as u64);
        metrics::counter!("hvac_temp_imputed_total").increment(report.imputed as u64);
        tracing::info!(
            rows = out.len(),
            out_of_range = report.out_of_range,
            jumps = report.jumps,
            imputed = report.imputed,
            missing = report.missing,
            "temperature sanitization complete"
        );

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Duration};

    fn cfg() -> SanitizerConfig {
        SanitizerConfig {
            min_temp_f: 1.0,
            max_temp_f: 90.0,
            max_daily_jump_f: 20.0,
        }
    }

    fn clean(temps: &[Option<f64>]) -> Vec<Option<f64>> {
        let (flagged, _) = flag_outliers(temps, &cfg());
        impute_gaps(&flagged).0
    }

    #[test]
    fn single_gap_is_filled_with_neighbour_mean() {
        assert_eq!(
            clean(&[Some(20.0), None, Some(30.0)]),
            vec![Some(20.0), Some(25.0), Some(30.0)]
        );
    }

    #[test]
    fn out_of_range_value_is_flagged_regardless_of_jump() {
        let (flagged, report) = flag_outliers(&[Some(50.0), Some(95.0), Some(52.0)], &cfg());
        assert_eq!(flagged[1], None);
        assert_eq!(report.out_of_range, 1);
    }

    #[test]
    fn day_after_a_range_outlier_is_checked_against_the_raw_outlier() {
        // 52 is 43F away from the raw 95, so it goes too.
        let (flagged, report) = flag_outliers(&[Some(50.0), Some(95.0), Some(52.0)], &cfg());
        assert_eq!(flagged, vec![Some(50.0), None, None]);
        assert_eq!(report.jumps, 1);

        // Close enough to the raw outlier: kept, and the outlier is filled.
        assert_eq!(
            clean(&[Some(70.0), Some(95.0), Some(80.0)]),
            vec![Some(70.0), Some(75.0), Some(80.0)]
        );
    }

    #[test]
    fn day_over_day_jump_is_flagged_inside_range() {
        let (flagged, report) = flag_outliers(&[Some(50.0), Some(75.0), Some(50.0)], &cfg());
        assert_eq!(flagged[1], None);
        assert_eq!(report.jumps, 2);
    }

    #[test]
    fn jump_check_uses_the_original_previous_value() {
        // 75 is flagged, but 50 is still compared against the raw 75.
        let (flagged, _) = flag_outliers(&[Some(50.0), Some(75.0), Some(50.0)], &cfg());
        assert_eq!(flagged, vec![Some(50.0), None, None]);

        // A previous value that was never readable disables the jump check.
        let (flagged, _) = flag_outliers(&[None, Some(80.0)], &cfg());
        assert_eq!(flagged, vec![None, Some(80.0)]);
    }

    #[test]
    fn first_row_is_only_range_checked() {
        let (flagged, _) = flag_outliers(&[Some(85.0), Some(84.0)], &cfg());
        assert_eq!(flagged, vec![Some(85.0), Some(84.0)]);

        let (flagged, _) = flag_outliers(&[Some(0.5)], &cfg());
        assert_eq!(flagged, vec![None]);
    }

    #[test]
    fn range_bounds_themselves_are_flagged() {
        let temps = [Some(60.0), Some(70.0), Some(90.0), Some(80.0)];
        let (flagged, report) = flag_outliers(&temps, &cfg());
        assert_eq!(flagged, vec![Some(60.0), Some(70.0), None, Some(80.0)]);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(clean(&temps), vec![Some(60.0), Some(70.0), Some(75.0), Some(80.0)]);

        let (flagged, report) = flag_outliers(&[Some(1.0), Some(1.0), Some(5.0)], &cfg());
        assert_eq!(flagged, vec![None, None, Some(5.0)]);
        assert_eq!(report.out_of_range, 2);
    }

    #[test]
    fn values_just_inside_the_bounds_are_kept() {
        let (flagged, _) = flag_outliers(&[Some(1.5), Some(2.0)], &cfg());
        assert_eq!(flagged, vec![Some(1.5), Some(2.0)]);

        let (flagged, _) = flag_outliers(&[Some(89.9), Some(85.0)], &cfg());
        assert_eq!(flagged, vec![Some(89.9), Some(85.0)]);
    }

    #[test]
    fn missing_first_and_last_values_are_never_imputed() {
        let out = clean(&[None, Some(40.0), Some(42.0), None]);
        assert_eq!(out[0], None);
        assert_eq!(out[3], None);

        // Flagged boundaries stay flagged too.
        let out = clean(&[Some(95.0), Some(80.0), Some(82.0), Some(-3.0)]);
        assert_eq!(out, vec![None, Some(80.0), Some(82.0), None]);
    }

    #[test]
    fn boundaries_keep_their_first_pass_value() {
        let inputs: [&[Option<f64>]; 4] = [
            &[Some(20.0), Some(25.0)],
            &[None, None],
            &[Some(50.0), None, Some(95.0)],
            &[Some(10.0), Some(60.0), None, Some(44.0), Some(45.0)],
        ];
        for temps in inputs {
            let (flagged, _) = flag_outliers(temps, &cfg());
            let (out, _) = impute_gaps(&flagged);
            let last = temps.len() - 1;
            assert_eq!(out[0], flagged[0]);
            assert_eq!(out[last], flagged[last]);
        }
    }

    #[test]
    fn imputation_does_not_propagate() {
        assert_eq!(clean(&[None, None, Some(30.0)]), vec![None, None, Some(30.0)]);

        // Two adjacent gaps: neither has two present neighbours.
        assert_eq!(
            clean(&[Some(30.0), None, None, Some(34.0)]),
            vec![Some(30.0), None, None, Some(34.0)]
        );
    }

    #[test]
    fn short_and_empty_sequences_are_untouched() {
        assert_eq!(impute_gaps(&[]).0, Vec::<Option<f64>>::new());
        assert_eq!(impute_gaps(&[None]).0, vec![None]);
        assert_eq!(impute_gaps(&[None, Some(3.0)]).0, vec![None, Some(3.0)]);
    }

    #[test]
    fn sanitize_temperatures_only_rewrites_temperature() {
        let start = date!(2023 - 03 - 01);
        let readings: Vec<Reading> = [Some(70.0), Some(95.0), Some(80.0)]
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                Reading::new(start + Duration::days(i as i64), Some(1000.0 + i as f64), t)
            })
            .collect();

        let (out, report) = sanitize_temperatures(readings.clone(), &cfg());

        assert_eq!(out.len(), 3);
        assert_eq!(out[1].daily_temp_f, Some(75.0));
        assert_eq!(out[1].kwh, Some(1001.0));
        assert_eq!(out[1].date, readings[1].date);
        assert_eq!(
            report,
            SanitizeReport {
                out_of_range: 1,
                jumps: 0,
                imputed: 1,
                missing: 0,
            }
        );
    }

    #[test]
    fn batch_transform_accepts_empty_input() {
        let out = TemperatureSanitizer::new(cfg()).apply(Vec::new()).unwrap();
        assert!(out.is_empty());
    }
}
