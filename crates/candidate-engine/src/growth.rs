//! Volume-growth estimation from a coarse ~48h hourly series.

use common::VolumeSeries;

/// "Last 24h vs prior 24h" growth derived from the two halves of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthEstimate {
    /// `None` when the series is too short or either half averages to a
    /// non-positive volume. Callers must not treat that as a confirmed
    /// 0% reading.
    pub growth_pct: Option<f64>,
    pub prev_avg: f64,
    pub last_avg: f64,
}

impl GrowthEstimate {
    pub fn unavailable() -> Self {
        Self {
            growth_pct: None,
            prev_avg: 0.0,
            last_avg: 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.growth_pct.is_some()
    }
}

fn mean(values: &[common::VolumePoint]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|p| p.volume).sum::<f64>() / values.len() as f64
}

/// Split the series at its midpoint and compare half averages.
///
/// The split keeps at least one element in the previous half so odd and
/// very short series still produce defined averages.
pub fn estimate_growth(series: &VolumeSeries) -> GrowthEstimate {
    if series.len() < 2 {
        return GrowthEstimate::unavailable();
    }

    let half = (series.len() / 2).max(1);
    let prev_avg = mean(&series.points[..half]);
    let last_avg = mean(&series.points[half..]);

    if prev_avg <= 0.0 || last_avg <= 0.0 {
        return GrowthEstimate {
            growth_pct: None,
            prev_avg,
            last_avg,
        };
    }

    GrowthEstimate {
        growth_pct: Some((last_avg - prev_avg) / prev_avg * 100.0),
        prev_avg,
        last_avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::VolumePoint;

    fn hourly(volumes: &[f64]) -> VolumeSeries {
        VolumeSeries::new(
            volumes
                .iter()
                .enumerate()
                .map(|(i, v)| VolumePoint {
                    ts_ms: i as i64 * 3_600_000,
                    volume: *v,
                })
                .collect(),
        )
    }

    #[test]
    fn empty_series_is_unavailable() {
        assert!(!estimate_growth(&hourly(&[])).is_available());
    }

    #[test]
    fn single_sample_is_unavailable() {
        let est = estimate_growth(&hourly(&[1_000.0]));
        assert_eq!(est.growth_pct, None);
        assert_eq!(est.prev_avg, 0.0);
        assert_eq!(est.last_avg, 0.0);
    }

    #[test]
    fn strictly_increasing_even_series_grows() {
        let est = estimate_growth(&hourly(&[1.0, 2.0, 3.0, 4.0]));
        let pct = est.growth_pct.unwrap();
        assert!(pct > 0.0, "expected positive growth, got {}", pct);
        assert_eq!(est.prev_avg, 1.5);
        assert_eq!(est.last_avg, 3.5);
    }

    #[test]
    fn doubling_halves_is_one_hundred_pct() {
        let est = estimate_growth(&hourly(&[100.0, 100.0, 200.0, 200.0]));
        assert_eq!(est.growth_pct, Some(100.0));
    }

    #[test]
    fn odd_length_split_keeps_one_in_previous_half() {
        // len 3 → prev = [10], last = [20, 30]
        let est = estimate_growth(&hourly(&[10.0, 20.0, 30.0]));
        assert_eq!(est.prev_avg, 10.0);
        assert_eq!(est.last_avg, 25.0);
        assert_eq!(est.growth_pct, Some(150.0));
    }

    #[test]
    fn zero_volume_half_is_unavailable_not_zero_growth() {
        let est = estimate_growth(&hourly(&[0.0, 0.0, 50.0, 50.0]));
        assert_eq!(est.growth_pct, None);
        assert_eq!(est.last_avg, 50.0);
    }

    #[test]
    fn declining_series_is_negative() {
        let est = estimate_growth(&hourly(&[200.0, 200.0, 100.0, 100.0]));
        assert_eq!(est.growth_pct, Some(-50.0));
    }
}
