//! Core model types: hourly profiles, economic parameters, shares and year records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, Result};

/// One representative year of hourly energy values (kWh per hour).
///
/// Read once and never mutated; every simulated year derives its own scaled
/// copy on the fly.
///
/// # Examples
///
/// ```
/// use pv_lifecycle::model::types::HourlyProfile;
///
/// let p = HourlyProfile::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(p.len(), 3);
/// assert_eq!(p.total(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlyProfile {
    values: Vec<f64>,
}

impl HourlyProfile {
    /// Wraps hourly values without inspecting them.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of hours in the profile.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Sum over all hours.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl From<Vec<f64>> for HourlyProfile {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// The two aligned hourly series of one building.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildingProfiles {
    /// Hourly consumption (kWh).
    pub consumption: HourlyProfile,
    /// Hourly PV generation (kWh).
    pub generation: HourlyProfile,
}

/// Building use, which selects the flat grid tariff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingFunction {
    Residential,
    Commercial,
}

impl BuildingFunction {
    /// Accepted configuration names.
    pub const NAMES: &[&str] = &["residential", "commercial"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
        }
    }
}

impl FromStr for BuildingFunction {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "residential" => Ok(Self::Residential),
            "commercial" => Ok(Self::Commercial),
            other => Err(LifecycleError::invalid(format!(
                "unknown building function \"{other}\", expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for BuildingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantity that caps the exported energy credited by net metering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetMeteringCap {
    /// Grid purchase of the first simulated year, for every year.
    FirstYearPurchase,
    /// Grid purchase of the year being credited.
    CurrentYearPurchase,
}

/// Immutable economic and technical parameters for one lifecycle run.
///
/// `Default` reproduces the reference residential example: a 30 kW system
/// over 25 years with one component replacement in year 12.
#[derive(Debug, Clone, PartialEq)]
pub struct EconomicParameters {
    pub building_function: BuildingFunction,
    /// PV nameplate capacity (kW, > 0).
    pub capacity_kw: f64,
    /// Annual inflation of tariffs and operating costs (fraction).
    pub inflation_rate: f64,
    /// Annual discount rate (fraction).
    pub discount_rate: f64,
    /// Number of simulated years (> 0).
    pub period_years: u32,
    /// Annual generation decay (fraction in `[0, 1]`).
    pub degradation_rate: f64,
    /// Years in `1..=period_years` that trigger one component replacement.
    pub replacement_years: Vec<u32>,
    /// Fraction of the initial cost spent per replacement.
    pub replacement_ratio: f64,
    /// Annual maintenance cost as a fraction of the initial cost.
    pub maintenance_cost_ratio: f64,
    /// Tax credit rate (0 disables the deduction income).
    pub tax_deduct: f64,
    /// One-time lump-sum incentive added to the discounted income.
    pub incentive: f64,
    /// Overrides the variant's default net-metering cap when set.
    pub net_metering_cap: Option<NetMeteringCap>,
}

impl Default for EconomicParameters {
    fn default() -> Self {
        Self {
            building_function: BuildingFunction::Residential,
            capacity_kw: 30.0,
            inflation_rate: 0.03,
            discount_rate: 0.05,
            period_years: 25,
            degradation_rate: 0.01,
            replacement_years: vec![12],
            replacement_ratio: 0.1,
            maintenance_cost_ratio: 0.01,
            tax_deduct: 0.0,
            incentive: 0.0,
            net_metering_cap: None,
        }
    }
}

impl EconomicParameters {
    /// Checks every parameter against its accepted domain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if !(self.capacity_kw.is_finite() && self.capacity_kw > 0.0) {
            return Err(LifecycleError::invalid(format!(
                "capacity_kw must be > 0, got {}",
                self.capacity_kw
            )));
        }
        if self.period_years == 0 {
            return Err(LifecycleError::invalid("period_years must be > 0"));
        }
        for (name, rate) in [
            ("inflation_rate", self.inflation_rate),
            ("discount_rate", self.discount_rate),
        ] {
            if !(rate.is_finite() && rate > -1.0) {
                return Err(LifecycleError::invalid(format!(
                    "{name} must be a finite rate > -1, got {rate}"
                )));
            }
        }
        for (name, fraction) in [
            ("degradation_rate", self.degradation_rate),
            ("tax_deduct", self.tax_deduct),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(LifecycleError::invalid(format!(
                    "{name} must be in [0, 1], got {fraction}"
                )));
            }
        }
        for (name, ratio) in [
            ("replacement_ratio", self.replacement_ratio),
            ("maintenance_cost_ratio", self.maintenance_cost_ratio),
        ] {
            if !(ratio.is_finite() && ratio >= 0.0) {
                return Err(LifecycleError::invalid(format!(
                    "{name} must be >= 0, got {ratio}"
                )));
            }
        }
        if !self.incentive.is_finite() {
            return Err(LifecycleError::invalid("incentive must be finite"));
        }
        if let Some(&year) = self
            .replacement_years
            .iter()
            .find(|&&y| y == 0 || y > self.period_years)
        {
            return Err(LifecycleError::invalid(format!(
                "replacement year {year} outside 1..={}",
                self.period_years
            )));
        }
        Ok(())
    }

    /// Whether `year` triggers a component replacement.
    pub fn is_replacement_year(&self, year: u32) -> bool {
        self.replacement_years.contains(&year)
    }
}

/// One user's fractions of the shared system.
///
/// No invariant ties shares across users; callers decide whether they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserShare {
    /// Fraction of the building consumption attributed to the user.
    pub consumption_share: f64,
    /// Fraction of the PV generation owned by the user.
    pub pv_share: f64,
    /// Fraction of the initial investment paid by the user.
    pub initial_cost_share: f64,
}

impl UserShare {
    pub fn new(consumption_share: f64, pv_share: f64, initial_cost_share: f64) -> Self {
        Self {
            consumption_share,
            pv_share,
            initial_cost_share,
        }
    }

    /// The whole building: every share equal to 1.
    pub fn whole() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any share lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, share) in [
            ("consumption_share", self.consumption_share),
            ("pv_share", self.pv_share),
            ("initial_cost_share", self.initial_cost_share),
        ] {
            if !(0.0..=1.0).contains(&share) {
                return Err(LifecycleError::invalid(format!(
                    "{name} must be in [0, 1], got {share}"
                )));
            }
        }
        Ok(())
    }
}

/// Undiscounted annual energy sums for one simulated year (kWh).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AnnualFlows {
    pub generation: f64,
    pub self_consumption: f64,
    pub export: f64,
    pub grid_purchase: f64,
    pub consumption: f64,
}

impl AnnualFlows {
    /// Divides every energy quantity by the discount factor `d`.
    pub fn discounted(&self, d: f64) -> Self {
        Self {
            generation: self.generation / d,
            self_consumption: self.self_consumption / d,
            export: self.export / d,
            grid_purchase: self.grid_purchase / d,
            consumption: self.consumption / d,
        }
    }
}

/// Complete record of one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    /// Year index, starting at 1.
    pub year: u32,
    /// Degraded, undiscounted energy flows.
    pub flows: AnnualFlows,
    /// Energy flows divided by `(1 + discount_rate)^year`.
    pub discounted: AnnualFlows,
    /// Discounted cost: capital cost in year 1, opex plus replacement after.
    pub cost: f64,
    pub self_consumption_income: f64,
    pub net_metering_income: f64,
    pub tax_deduction_income: f64,
    /// Sum of the three income components.
    pub income: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_valid() {
        assert!(EconomicParameters::default().validate().is_ok());
    }

    #[test]
    fn building_function_parses_known_names() {
        assert_eq!(
            "residential".parse::<BuildingFunction>(),
            Ok(BuildingFunction::Residential)
        );
        assert_eq!(
            "commercial".parse::<BuildingFunction>(),
            Ok(BuildingFunction::Commercial)
        );
    }

    #[test]
    fn building_function_rejects_industrial() {
        let err = "industrial".parse::<BuildingFunction>().unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("industrial"));
    }

    #[test]
    fn validate_rejects_non_positive_capacity() {
        for capacity_kw in [0.0, -3.0, f64::NAN] {
            let params = EconomicParameters {
                capacity_kw,
                ..EconomicParameters::default()
            };
            assert!(matches!(
                params.validate(),
                Err(LifecycleError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn validate_rejects_zero_period() {
        let params = EconomicParameters {
            period_years: 0,
            replacement_years: vec![],
            ..EconomicParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_replacement_after_period() {
        let params = EconomicParameters {
            period_years: 10,
            replacement_years: vec![12],
            ..EconomicParameters::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn validate_rejects_degradation_above_one() {
        let params = EconomicParameters {
            degradation_rate: 1.5,
            ..EconomicParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn share_outside_unit_interval_rejected() {
        assert!(UserShare::new(0.5, 1.2, 0.5).validate().is_err());
        assert!(UserShare::new(-0.1, 0.5, 0.5).validate().is_err());
        assert!(UserShare::whole().validate().is_ok());
    }

    #[test]
    fn discounted_flows_divide_every_field() {
        let flows = AnnualFlows {
            generation: 10.0,
            self_consumption: 6.0,
            export: 4.0,
            grid_purchase: 2.0,
            consumption: 8.0,
        };
        let d = flows.discounted(2.0);
        assert_eq!(d.generation, 5.0);
        assert_eq!(d.self_consumption, 3.0);
        assert_eq!(d.export, 2.0);
        assert_eq!(d.grid_purchase, 1.0);
        assert_eq!(d.consumption, 4.0);
    }
}
