use rand::{SeedableRng, rngs::StdRng};

use super::{HOURS_PER_DAY, HourlySource, gaussian_noise, seasonal_factor};

/// Day of year with the highest PV yield (June solstice).
const PV_PEAK_DAY: f64 = 172.0;
/// Relative drop of PV yield from midsummer to midwinter.
const PV_SEASONAL_DEPTH: f64 = 0.6;

/// Half-cosine daylight PV generation with a summer peak.
#[derive(Debug, Clone)]
pub struct SolarPv {
    /// Peak output under ideal midsummer conditions (kW).
    pub kw_peak: f64,

    /// Hour of day when generation starts (inclusive).
    pub sunrise_idx: usize,

    /// Hour of day when generation stops (exclusive).
    pub sunset_idx: usize,

    /// Standard deviation of the multiplicative noise.
    pub noise_std: f64,

    rng: StdRng,
}

impl SolarPv {
    /// Creates a PV generator.
    ///
    /// A sunrise/sunset pair outside `0..=24` or in the wrong order yields a
    /// generator that never produces.
    pub fn new(
        kw_peak: f64,
        sunrise_idx: usize,
        sunset_idx: usize,
        noise_std: f64,
        seed: u64,
    ) -> Self {
        Self {
            kw_peak: kw_peak.max(0.0),
            sunrise_idx,
            sunset_idx,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fraction of peak output at this hour of day, in `[0, 1]`.
    fn daylight_frac(&self, hour: usize) -> f64 {
        let t = hour % HOURS_PER_DAY;
        if self.sunrise_idx >= self.sunset_idx
            || self.sunset_idx > HOURS_PER_DAY
            || t < self.sunrise_idx
            || t >= self.sunset_idx
        {
            return 0.0;
        }
        let span = (self.sunset_idx - self.sunrise_idx) as f64;
        let x = (t - self.sunrise_idx) as f64 / span;
        (std::f64::consts::PI * x).sin().max(0.0)
    }
}

impl HourlySource for SolarPv {
    fn energy_kwh(&mut self, hour: usize) -> f64 {
        let frac = self.daylight_frac(hour);
        if frac <= 0.0 {
            return 0.0;
        }
        let season = seasonal_factor(hour, PV_PEAK_DAY, PV_SEASONAL_DEPTH);
        let noise_mult = 1.0 + gaussian_noise(&mut self.rng, self.noise_std);
        (self.kw_peak * frac * season * noise_mult).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_generation_at_night() {
        let mut pv = SolarPv::new(5.0, 6, 18, 0.0, 42);
        for h in [0, 3, 5, 18, 23, 24 + 2] {
            assert_eq!(pv.energy_kwh(h), 0.0);
        }
    }

    #[test]
    fn peak_near_noon_in_midsummer() {
        let mut pv = SolarPv::new(5.0, 6, 18, 0.0, 42);
        let noon = pv.energy_kwh(172 * HOURS_PER_DAY + 12);
        assert!(noon > 4.9 && noon <= 5.0);
    }

    #[test]
    fn winter_yield_below_summer() {
        let mut pv = SolarPv::new(5.0, 6, 18, 0.0, 42);
        let summer = pv.energy_kwh(172 * HOURS_PER_DAY + 12);
        let winter = pv.energy_kwh(355 * HOURS_PER_DAY + 12);
        assert!(winter < summer);
    }

    #[test]
    fn inverted_window_never_generates() {
        let mut pv = SolarPv::new(5.0, 18, 6, 0.0, 42);
        assert!((0..48).all(|h| pv.energy_kwh(h) == 0.0));
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = SolarPv::new(5.0, 6, 18, 0.1, 42);
        let mut b = SolarPv::new(5.0, 6, 18, 0.1, 43);
        assert_ne!(a.profile(24), b.profile(24));
    }
}
