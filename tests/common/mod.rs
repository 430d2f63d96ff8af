//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use rand::{Rng, SeedableRng, rngs::StdRng};

use pv_lifecycle::model::{BuildingProfiles, EconomicParameters, HourlyProfile};
use pv_lifecycle::profiles::synthetic_year;

/// One-year, zero-rate parameters for hand-checkable runs (5 kW, residential).
pub fn one_year_params() -> EconomicParameters {
    EconomicParameters {
        capacity_kw: 5.0,
        inflation_rate: 0.0,
        discount_rate: 0.0,
        period_years: 1,
        degradation_rate: 0.0,
        replacement_years: vec![],
        ..EconomicParameters::default()
    }
}

/// Reference residential parameters (30 kW, 25 years).
pub fn default_params() -> EconomicParameters {
    EconomicParameters::default()
}

/// Single-hour profile pair.
pub fn one_hour(consumption: f64, generation: f64) -> (HourlyProfile, HourlyProfile) {
    (
        HourlyProfile::new(vec![consumption]),
        HourlyProfile::new(vec![generation]),
    )
}

/// Full synthetic year for a 30 kW system with an 8 kWh average load.
pub fn synthetic(seed: u64) -> BuildingProfiles {
    synthetic_year(30.0, 8.0, seed)
}

/// Uniform random hourly values in `[0, max)` with a fixed seed.
pub fn random_profiles(hours: usize, max_kwh: f64, seed: u64) -> BuildingProfiles {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut draw = |n: usize| -> HourlyProfile {
        HourlyProfile::new((0..n).map(|_| rng.random::<f64>() * max_kwh).collect())
    };
    let consumption = draw(hours);
    let generation = draw(hours);
    BuildingProfiles {
        consumption,
        generation,
    }
}
