//! Flat grid tariffs and capacity-banded installation cost.

use crate::error::{LifecycleError, Result};

use super::types::BuildingFunction;

/// Residential grid tariff (currency per kWh).
pub const RESIDENTIAL_TARIFF: f64 = 0.06704;
/// Commercial grid tariff (currency per kWh).
pub const COMMERCIAL_TARIFF: f64 = 0.11518;

/// Installation cost bands as `(upper bound kW inclusive, cost per kW)`.
const COST_BANDS: [(f64, f64); 6] = [
    (2.5, 4000.0),
    (5.0, 3000.0),
    (10.0, 2500.0),
    (15.0, 2300.0),
    (20.0, 2000.0),
    (10_000.0, 1800.0),
];

/// Cost per kW above the largest band.
const UTILITY_SCALE_COST_PER_KW: f64 = 1449.0;

/// Returns the first-year grid tariff for a building function.
pub fn resolve_tariff(building_function: BuildingFunction) -> f64 {
    match building_function {
        BuildingFunction::Residential => RESIDENTIAL_TARIFF,
        BuildingFunction::Commercial => COMMERCIAL_TARIFF,
    }
}

/// Parses `name` and returns its tariff.
///
/// # Errors
///
/// Returns `InvalidConfiguration` for names other than `residential` and
/// `commercial`.
pub fn resolve_tariff_by_name(name: &str) -> Result<f64> {
    Ok(resolve_tariff(name.parse()?))
}

/// Returns the installation cost per kW for a system of `capacity_kw`.
///
/// Each band includes its upper bound: 2.5 kW costs 4000/kW, 2.50001 kW
/// costs 3000/kW.
///
/// # Errors
///
/// Returns `InvalidConfiguration` if `capacity_kw` is not a positive number.
pub fn resolve_cost_per_kw(capacity_kw: f64) -> Result<f64> {
    if !(capacity_kw.is_finite() && capacity_kw > 0.0) {
        return Err(LifecycleError::invalid(format!(
            "capacity_kw must be > 0, got {capacity_kw}"
        )));
    }
    Ok(COST_BANDS
        .iter()
        .find(|(upper, _)| capacity_kw <= *upper)
        .map_or(UTILITY_SCALE_COST_PER_KW, |&(_, cost)| cost))
}

/// Total upfront capital cost of the system.
///
/// # Errors
///
/// See [`resolve_cost_per_kw`].
pub fn initial_cost(capacity_kw: f64) -> Result<f64> {
    Ok(capacity_kw * resolve_cost_per_kw(capacity_kw)?)
}
