//! Heart-rate-variability estimation over fixed-size sample windows.
//!
//! Samples are batched into windows of 30 readings. When a window fills it
//! is consumed whole: each heart rate becomes an RR interval (60000/hr ms),
//! and the RMSSD of the successive differences becomes the new variability
//! value. Between full windows the last computed value stays authoritative.

/// Number of samples consumed per HRV computation.
pub const WINDOW_SIZE: usize = 30;

/// Placeholder variability in milliseconds before the first full window.
pub const INITIAL_HRV_MS: f64 = 50.0;

/// A sensor reading the estimator refuses to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSampleError {
    pub heart_rate: u32,
}

impl std::fmt::Display for InvalidSampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid heart-rate sample: {} bpm", self.heart_rate)
    }
}

impl std::error::Error for InvalidSampleError {}

/// Windowed RMSSD estimator.
pub struct HrvEstimator {
    window: Vec<u32>,
    capacity: usize,
    current: f64,
}

impl HrvEstimator {
    /// Create an estimator with the default window size and placeholder value.
    pub fn new() -> Self {
        Self::with_window(WINDOW_SIZE, INITIAL_HRV_MS)
    }

    /// Create an estimator with a custom window size and initial value.
    pub fn with_window(capacity: usize, initial_hrv_ms: f64) -> Self {
        Self {
            window: Vec::with_capacity(capacity),
            capacity,
            current: initial_hrv_ms,
        }
    }

    /// Feed one heart-rate reading into the window.
    ///
    /// Returns `Ok(Some(hrv))` exactly when this reading fills the window,
    /// `Ok(None)` otherwise. A zero heart rate is rejected before it can
    /// poison the RR conversion; the window is left untouched.
    pub fn observe(&mut self, heart_rate: u32) -> Result<Option<f64>, InvalidSampleError> {
        if heart_rate == 0 {
            return Err(InvalidSampleError { heart_rate });
        }

        self.window.push(heart_rate);
        if self.window.len() < self.capacity {
            return Ok(None);
        }

        let hrv = rmssd(&self.window);
        self.window.clear();
        self.current = hrv;
        Ok(Some(hrv))
    }

    /// The last computed variability, or the placeholder before the first window.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Number of readings waiting in the unconsumed window.
    pub fn pending(&self) -> usize {
        self.window.len()
    }
}

impl Default for HrvEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Root mean square of successive RR-interval differences, in milliseconds.
fn rmssd(heart_rates: &[u32]) -> f64 {
    let rr_intervals: Vec<f64> = heart_rates.iter().map(|&hr| 60_000.0 / hr as f64).collect();

    let diffs: Vec<f64> = rr_intervals
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();

    if diffs.is_empty() {
        return 0.0;
    }

    let mean_sq = diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64;
    mean_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_value_before_window_fills() {
        let mut estimator = HrvEstimator::new();
        for _ in 0..WINDOW_SIZE - 1 {
            assert_eq!(estimator.observe(72).unwrap(), None);
        }
        assert_eq!(estimator.pending(), WINDOW_SIZE - 1);
        assert_eq!(estimator.current(), INITIAL_HRV_MS);
    }

    #[test]
    fn test_window_consumed_on_thirtieth_sample() {
        let mut estimator = HrvEstimator::new();
        for _ in 0..WINDOW_SIZE - 1 {
            estimator.observe(72).unwrap();
        }
        let hrv = estimator.observe(72).unwrap();
        assert!(hrv.is_some());
        assert_eq!(estimator.pending(), 0);
    }

    #[test]
    fn test_constant_rate_has_zero_variability() {
        // 60 bpm => every RR interval is 1000ms, all diffs zero.
        let mut estimator = HrvEstimator::new();
        let mut result = None;
        for _ in 0..WINDOW_SIZE {
            result = estimator.observe(60).unwrap();
        }
        assert_eq!(result, Some(0.0));
        assert_eq!(estimator.current(), 0.0);
    }

    #[test]
    fn test_alternating_rates_rmssd() {
        // Alternating 60/100 bpm: RR alternates 1000ms/600ms, every diff is
        // 400ms in magnitude, so RMSSD is exactly 400.
        let mut estimator = HrvEstimator::new();
        let mut result = None;
        for i in 0..WINDOW_SIZE {
            let hr = if i % 2 == 0 { 60 } else { 100 };
            result = estimator.observe(hr).unwrap();
        }
        let hrv = result.unwrap();
        assert!((hrv - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_heart_rate_rejected() {
        let mut estimator = HrvEstimator::new();
        estimator.observe(72).unwrap();
        let err = estimator.observe(0).unwrap_err();
        assert_eq!(err.heart_rate, 0);
        // Window unaffected by the rejected sample.
        assert_eq!(estimator.pending(), 1);
    }

    #[test]
    fn test_value_persists_between_windows() {
        let mut estimator = HrvEstimator::new();
        for _ in 0..WINDOW_SIZE {
            estimator.observe(60).unwrap();
        }
        assert_eq!(estimator.current(), 0.0);

        // A partial second window does not disturb the published value.
        for _ in 0..10 {
            estimator.observe(100).unwrap();
        }
        assert_eq!(estimator.current(), 0.0);
    }
}
