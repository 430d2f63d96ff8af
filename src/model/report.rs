//! Post-loop aggregation into LCOE, NPV and per-year series.

use std::fmt;

use serde::Serialize;

use crate::error::{LifecycleError, Result};

use super::types::{AnnualFlows, YearRecord};

/// Lifetime sums over all year records.
///
/// Computed post-hoc from the records so the reported totals always match
/// the per-year series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LifecycleTotals {
    pub discounted_generation: f64,
    pub discounted_self_consumption: f64,
    pub discounted_export: f64,
    pub discounted_grid_purchase: f64,
    pub discounted_cost: f64,
    /// Discounted income, including the incentive when one applies.
    pub discounted_income: f64,
    pub net_metering_income: f64,
}

impl LifecycleTotals {
    /// Sums the records and adds `incentive` to the income once.
    pub fn from_years(years: &[YearRecord], incentive: f64) -> Self {
        let mut totals = years.iter().fold(Self::default(), |mut acc, r| {
            acc.discounted_generation += r.discounted.generation;
            acc.discounted_self_consumption += r.discounted.self_consumption;
            acc.discounted_export += r.discounted.export;
            acc.discounted_grid_purchase += r.discounted.grid_purchase;
            acc.discounted_cost += r.cost;
            acc.discounted_income += r.income;
            acc.net_metering_income += r.net_metering_income;
            acc
        });
        totals.discounted_income += incentive;
        totals
    }

    /// Lifetime discounted cost per discounted kWh generated.
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when the discounted generation is exactly zero.
    pub fn lcoe_pv(&self) -> Result<f64> {
        if self.discounted_generation == 0.0 {
            return Err(LifecycleError::DivisionUndefined(
                "total discounted generation is zero, cannot calculate LCOE",
            ));
        }
        Ok(self.discounted_cost / self.discounted_generation)
    }

    /// Net-metering income per discounted exported kWh, or 0 without exports.
    pub fn lcoe_export(&self) -> f64 {
        if self.discounted_export > 0.0 {
            self.net_metering_income / self.discounted_export
        } else {
            0.0
        }
    }

    /// Sum of discounted self-consumption, export and grid purchase.
    pub fn total_transaction(&self) -> f64 {
        self.discounted_self_consumption + self.discounted_export + self.discounted_grid_purchase
    }

    /// Transaction-weighted cost of energy across PV, grid and export.
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when the total transaction is zero.
    pub fn lcoe_system(&self, lcoe_pv: f64, base_tariff: f64) -> Result<f64> {
        let total = self.total_transaction();
        if total == 0.0 {
            return Err(LifecycleError::DivisionUndefined(
                "total discounted transaction is zero, cannot calculate system LCOE",
            ));
        }
        Ok((self.discounted_self_consumption / total) * lcoe_pv
            + (self.discounted_grid_purchase / total) * base_tariff
            - (self.discounted_export / total) * self.lcoe_export())
    }

    pub fn npv(&self) -> f64 {
        self.discounted_income - self.discounted_cost
    }
}

/// Full single-building lifecycle result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleResult {
    pub lcoe_pv: f64,
    pub lcoe_system: f64,
    pub lcoe_export: f64,
    pub npv: f64,
    /// Undiscounted first-year generation from the input profile (kWh).
    pub first_year_generation: f64,
    pub first_year_self_consumption: f64,
    pub first_year_grid_purchase: f64,
    pub first_year_export: f64,
    pub total_discounted_cost: f64,
    pub total_discounted_income: f64,
    /// Discounted generation per year, index 0 is year 1.
    pub discounted_generation_per_year: Vec<f64>,
    pub discounted_self_consumption_per_year: Vec<f64>,
    pub discounted_cost_per_year: Vec<f64>,
    pub discounted_income_per_year: Vec<f64>,
    pub totals: LifecycleTotals,
    pub years: Vec<YearRecord>,
}

impl LifecycleResult {
    /// Aggregates the year records of a single-building run.
    ///
    /// # Arguments
    ///
    /// * `years` - Year records in year order
    /// * `first_year` - Undiscounted year-1 flows of the input profiles
    /// * `base_tariff` - First-year grid tariff
    /// * `incentive` - One-time income added to the discounted total
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when the discounted generation is zero.
    pub fn from_years(
        years: Vec<YearRecord>,
        first_year: AnnualFlows,
        base_tariff: f64,
        incentive: f64,
    ) -> Result<Self> {
        let totals = LifecycleTotals::from_years(&years, incentive);
        let lcoe_pv = totals.lcoe_pv()?;
        let lcoe_system = totals.lcoe_system(lcoe_pv, base_tariff)?;

        Ok(Self {
            lcoe_pv,
            lcoe_system,
            lcoe_export: totals.lcoe_export(),
            npv: totals.npv(),
            first_year_generation: first_year.generation,
            first_year_self_consumption: first_year.self_consumption,
            first_year_grid_purchase: first_year.grid_purchase,
            first_year_export: first_year.export,
            total_discounted_cost: totals.discounted_cost,
            total_discounted_income: totals.discounted_income,
            discounted_generation_per_year: series(&years, |r| r.discounted.generation),
            discounted_self_consumption_per_year: series(&years, |r| {
                r.discounted.self_consumption
            }),
            discounted_cost_per_year: series(&years, |r| r.cost),
            discounted_income_per_year: series(&years, |r| r.income),
            totals,
            years,
        })
    }
}

impl fmt::Display for LifecycleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Lifecycle Report ---")?;
        writeln!(f, "LCOE PV:                  {:.5} /kWh", self.lcoe_pv)?;
        writeln!(f, "LCOE system:              {:.5} /kWh", self.lcoe_system)?;
        writeln!(f, "LCOE export:              {:.5} /kWh", self.lcoe_export)?;
        writeln!(f, "NPV:                      {:.2}", self.npv)?;
        writeln!(
            f,
            "First-year generation:    {:.2} kWh",
            self.first_year_generation
        )?;
        writeln!(
            f,
            "First-year self-use:      {:.2} kWh",
            self.first_year_self_consumption
        )?;
        writeln!(
            f,
            "First-year grid purchase: {:.2} kWh",
            self.first_year_grid_purchase
        )?;
        writeln!(f, "First-year export:        {:.2} kWh", self.first_year_export)?;
        writeln!(
            f,
            "Discounted total cost:    {:.2}",
            self.total_discounted_cost
        )?;
        write!(
            f,
            "Discounted total income:  {:.2}",
            self.total_discounted_income
        )
    }
}

/// Reduced per-user result of the multi-user allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLifecycleResult {
    pub lcoe_pv: f64,
    pub npv: f64,
    pub total_discounted_cost: f64,
    pub total_discounted_income: f64,
    pub discounted_generation_per_year: Vec<f64>,
    pub discounted_self_consumption_per_year: Vec<f64>,
}

impl UserLifecycleResult {
    /// Aggregates one user's year records; no incentive applies.
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when the user's discounted generation is zero.
    pub fn from_years(years: &[YearRecord]) -> Result<Self> {
        let totals = LifecycleTotals::from_years(years, 0.0);
        Ok(Self {
            lcoe_pv: totals.lcoe_pv()?,
            npv: totals.npv(),
            total_discounted_cost: totals.discounted_cost,
            total_discounted_income: totals.discounted_income,
            discounted_generation_per_year: series(years, |r| r.discounted.generation),
            discounted_self_consumption_per_year: series(years, |r| {
                r.discounted.self_consumption
            }),
        })
    }
}

impl fmt::Display for UserLifecycleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LCOE PV:                  {:.5} /kWh", self.lcoe_pv)?;
        writeln!(f, "NPV:                      {:.2}", self.npv)?;
        writeln!(
            f,
            "Discounted total cost:    {:.2}",
            self.total_discounted_cost
        )?;
        write!(
            f,
            "Discounted total income:  {:.2}",
            self.total_discounted_income
        )
    }
}

fn series(years: &[YearRecord], field: impl Fn(&YearRecord) -> f64) -> Vec<f64> {
    years.iter().map(field).collect()
}
