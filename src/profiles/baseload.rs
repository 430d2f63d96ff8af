use rand::{SeedableRng, rngs::StdRng};

use super::{HOURS_PER_DAY, HourlySource, gaussian_noise, seasonal_factor};

/// Day of year with the highest building load (mid-January heating peak).
const LOAD_PEAK_DAY: f64 = 15.0;
/// Relative drop of the load from its winter peak to midsummer.
const LOAD_SEASONAL_DEPTH: f64 = 0.3;

/// Sinusoidal daily building load with a winter peak.
///
/// # Examples
///
/// ```
/// use pv_lifecycle::profiles::{BaseLoad, HourlySource};
///
/// let mut load = BaseLoad::new(1.0, 0.5, 0.0, 0.05, 42);
/// let noon = load.energy_kwh(12);
/// assert!(noon >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLoad {
    /// Average hourly consumption at the seasonal peak (kWh).
    pub base_kw: f64,

    /// Amplitude of the daily variation (kWh).
    pub amp_kw: f64,

    /// Phase offset of the daily pattern in radians.
    pub phase_rad: f64,

    /// Standard deviation of the Gaussian noise (kWh).
    pub noise_std: f64,

    rng: StdRng,
}

impl BaseLoad {
    /// Creates a load generator.
    ///
    /// # Arguments
    ///
    /// * `base_kw` - Baseline consumption
    /// * `amp_kw` - Amplitude of the daily sinusoid
    /// * `phase_rad` - Phase offset (0 = rising through the mean at midnight)
    /// * `noise_std` - Gaussian noise standard deviation
    /// * `seed` - Random seed for reproducible noise
    pub fn new(base_kw: f64, amp_kw: f64, phase_rad: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            base_kw: base_kw.max(0.0),
            amp_kw,
            phase_rad,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl HourlySource for BaseLoad {
    /// Consumption during `hour`, never negative.
    fn energy_kwh(&mut self, hour: usize) -> f64 {
        let day_pos = (hour % HOURS_PER_DAY) as f64 / HOURS_PER_DAY as f64;
        let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
        let season = seasonal_factor(hour, LOAD_PEAK_DAY, LOAD_SEASONAL_DEPTH);

        let kwh = season * (self.base_kw + self.amp_kw * angle.sin())
            + gaussian_noise(&mut self.rng, self.noise_std);
        kwh.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_inputs_clamped() {
        let load = BaseLoad::new(-1.0, 0.5, 0.0, -0.1, 1);
        assert_eq!(load.base_kw, 0.0);
        assert_eq!(load.noise_std, 0.0);
    }

    #[test]
    fn noiseless_load_follows_sinusoid() {
        let mut load = BaseLoad::new(2.0, 1.0, 0.0, 0.0, 1);
        // Day 15 is the seasonal peak, so the envelope is 1.
        let start = 15 * HOURS_PER_DAY;
        assert!((load.energy_kwh(start) - 2.0).abs() < 1e-9);
        assert!((load.energy_kwh(start + 6) - 3.0).abs() < 1e-9);
        assert!((load.energy_kwh(start + 18) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn never_negative() {
        let mut load = BaseLoad::new(0.1, 2.0, 0.0, 0.5, 9);
        for h in 0..500 {
            assert!(load.energy_kwh(h) >= 0.0);
        }
    }

    #[test]
    fn same_seed_same_profile() {
        let mut a = BaseLoad::new(1.0, 0.5, 1.2, 0.1, 42);
        let mut b = BaseLoad::new(1.0, 0.5, 1.2, 0.1, 42);
        assert_eq!(a.profile(48), b.profile(48));
    }
}
