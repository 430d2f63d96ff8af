//! Seeded synthetic hourly profiles for demo runs and property tests.
//!
//! Used when a scenario names no CSV file. The shapes are deliberately simple:
//! a sinusoidal daily load and a half-cosine daylight PV curve, both with a
//! seasonal envelope and Gaussian noise.

pub mod baseload;
pub mod solar;

use rand::{Rng, rngs::StdRng};

use crate::model::types::{BuildingProfiles, HourlyProfile};

pub use baseload::BaseLoad;
pub use solar::SolarPv;

/// Hours in the representative (non-leap) year.
pub const HOURS_PER_YEAR: usize = 8760;
/// Hours per simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Seed offset for the PV generator so load and PV noise are uncorrelated.
const SOLAR_SEED_OFFSET: u64 = 1;

/// Anything that yields one energy value per hour.
pub trait HourlySource {
    /// Energy (kWh) during `hour`, counted from the start of the year.
    fn energy_kwh(&mut self, hour: usize) -> f64;

    /// Samples `hours` consecutive hours into a profile.
    fn profile(&mut self, hours: usize) -> HourlyProfile {
        HourlyProfile::new((0..hours).map(|h| self.energy_kwh(h)).collect())
    }
}

/// Builds one year of consumption and generation for a system of
/// `capacity_kw`, drawing a building load averaging `base_load_kw`.
///
/// Identical arguments always produce identical profiles.
pub fn synthetic_year(capacity_kw: f64, base_load_kw: f64, seed: u64) -> BuildingProfiles {
    let mut load = BaseLoad::new(base_load_kw, 0.5 * base_load_kw, 1.2, 0.05 * base_load_kw, seed);
    let mut pv = SolarPv::new(
        capacity_kw,
        6,    /* sunrise hour */
        18,   /* sunset hour */
        0.05, /* noise_std */
        seed.wrapping_add(SOLAR_SEED_OFFSET),
    );
    BuildingProfiles {
        consumption: load.profile(HOURS_PER_YEAR),
        generation: pv.profile(HOURS_PER_YEAR),
    }
}

/// Seasonal multiplier in `[1 - depth, 1]`, peaking on day `peak_day`.
pub(crate) fn seasonal_factor(hour: usize, peak_day: f64, depth: f64) -> f64 {
    let day = (hour / HOURS_PER_DAY) as f64;
    let angle = 2.0 * std::f64::consts::PI * (day - peak_day) / 365.0;
    1.0 - depth * 0.5 * (1.0 - angle.cos())
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
pub(crate) fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
