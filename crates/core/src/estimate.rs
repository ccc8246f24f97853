use std::time::Instant;

/// Which end of the scale the battery is heading towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Heading to 0%.
    Discharging,
    /// Heading to 100%.
    Charging,
}

impl Direction {
    fn target(self) -> f64 {
        match self {
            Direction::Discharging => 0.0,
            Direction::Charging => 100.0,
        }
    }
}

/// Linear time-remaining estimator for drivers that don't report a rate.
///
/// The rate is only recomputed when the percentage actually changes between
/// polls; in between, the last computed value is returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    last_percentage: Option<f64>,
    last_change: Option<Instant>,
    last_minutes: Option<u32>,
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the baseline so the next sample reseeds it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Last computed estimate, if any.
    pub fn minutes(&self) -> Option<u32> {
        self.last_minutes
    }

    /// Feed one sample.  Returns the estimated minutes until `direction`'s
    /// target is reached, or `None` while the estimate is indeterminate.
    pub fn observe(&mut self, percentage: f64, now: Instant, direction: Direction) -> Option<u32> {
        let (Some(last), Some(since)) = (self.last_percentage, self.last_change) else {
            self.last_percentage = Some(percentage);
            self.last_change = Some(now);
            return None;
        };

        if percentage == last {
            return self.last_minutes;
        }

        let elapsed = now.saturating_duration_since(since).as_secs_f64();
        self.last_minutes = extrapolate(last, percentage, elapsed, direction.target());
        self.last_percentage = Some(percentage);
        self.last_change = Some(now);
        self.last_minutes
    }
}

/// y = mx + b, solved for the target level.
fn extrapolate(from: f64, to: f64, elapsed_secs: f64, target: f64) -> Option<u32> {
    if elapsed_secs <= 0.0 {
        return None;
    }
    let rate = (to - from) / elapsed_secs;
    if rate == 0.0 || !rate.is_finite() {
        return None;
    }

    let minutes = ((target - to) / rate / 60.0).round();
    if minutes.is_finite() && minutes >= 0.0 && minutes <= f64::from(u32::MAX) {
        Some(minutes as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const POLL: Duration = Duration::from_secs(5);

    #[test]
    fn first_sample_has_no_estimate() {
        let mut est = Estimator::new();
        assert_eq!(est.observe(80.0, Instant::now(), Direction::Discharging), None);
    }

    #[test]
    fn unchanged_percentage_keeps_previous_value() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        est.observe(81.0, t0, Direction::Discharging);
        let first = est.observe(80.0, t0 + Duration::from_secs(60), Direction::Discharging);
        assert_eq!(first, Some(80));

        let again = est.observe(80.0, t0 + Duration::from_secs(65), Direction::Discharging);
        assert_eq!(again, first);
        let again = est.observe(80.0, t0 + Duration::from_secs(70), Direction::Discharging);
        assert_eq!(again, first);
    }

    #[test]
    fn flat_readings_never_produce_an_estimate() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        let out: Vec<_> = (0..3)
            .map(|i| est.observe(80.0, t0 + POLL * i, Direction::Discharging))
            .collect();
        assert_eq!(out, vec![None, None, None]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn decreasing_sequence_gives_non_increasing_estimate() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        est.reset();
        let mut previous = u32::MAX;
        for (i, pct) in (50..=90).rev().enumerate() {
            let now = t0 + Duration::from_secs(60) * i as u32;
            if let Some(min) = est.observe(f64::from(pct), now, Direction::Discharging) {
                assert!(min <= previous, "{min} > {previous}");
                previous = min;
            }
        }
        // 1% per minute at 50% → 50 minutes left.
        assert_eq!(previous, 50);
    }

    #[test]
    fn charging_targets_full() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        est.observe(40.0, t0, Direction::Charging);
        let min = est.observe(42.0, t0 + Duration::from_secs(120), Direction::Charging);
        // 1% per minute, 58% to go.
        assert_eq!(min, Some(58));
    }

    #[test]
    fn zero_elapsed_time_is_guarded() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        est.observe(40.0, t0, Direction::Discharging);
        assert_eq!(est.observe(39.0, t0, Direction::Discharging), None);
    }

    #[test]
    fn wrong_way_rate_is_indeterminate() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        est.observe(40.0, t0, Direction::Charging);
        assert_eq!(est.observe(39.0, t0 + POLL, Direction::Charging), None);
    }

    #[test]
    fn reset_clears_baseline() {
        let t0 = Instant::now();
        let mut est = Estimator::new();
        est.observe(60.0, t0, Direction::Discharging);
        est.observe(59.0, t0 + Duration::from_secs(60), Direction::Discharging);
        assert!(est.minutes().is_some());

        est.reset();
        assert_eq!(est.minutes(), None);
        assert_eq!(est.observe(58.0, t0 + Duration::from_secs(120), Direction::Charging), None);
    }
}
