//! Lifecycle model that runs the discounted year loop over hourly profiles.

use tracing::{debug, info};

use crate::error::{LifecycleError, Result};

use super::decomposition::decompose_year;
use super::report::LifecycleResult;
use super::tariff::{initial_cost, resolve_tariff};
use super::types::{
    AnnualFlows, EconomicParameters, HourlyProfile, NetMeteringCap, UserShare, YearRecord,
};

/// Which flavour of the year loop to run.
///
/// The single-building model credits tax deductions and the incentive and caps
/// net metering at the first-year grid purchase; a shared user gets neither
/// credit and is capped at the current year's purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    SingleBuilding,
    SharedUser,
}

impl Variant {
    pub fn default_net_metering_cap(self) -> NetMeteringCap {
        match self {
            Self::SingleBuilding => NetMeteringCap::FirstYearPurchase,
            Self::SharedUser => NetMeteringCap::CurrentYearPurchase,
        }
    }

    pub fn credits_tax_and_incentive(self) -> bool {
        matches!(self, Self::SingleBuilding)
    }
}

/// The discounted-cash-flow model for one building or one user.
///
/// Borrows the parameters and profiles; every call to [`LifecycleModel::step`]
/// is a pure function of the year index, so runs are repeatable bit for bit.
#[derive(Debug, Clone)]
pub struct LifecycleModel<'a> {
    params: &'a EconomicParameters,
    consumption: &'a HourlyProfile,
    generation: &'a HourlyProfile,
    share: UserShare,
    variant: Variant,
    base_tariff: f64,
    cost_basis: f64,
    net_metering_cap: NetMeteringCap,
}

impl<'a> LifecycleModel<'a> {
    /// Creates a model after validating parameters, share and profile alignment.
    ///
    /// # Arguments
    ///
    /// * `params` - Economic and technical parameters
    /// * `consumption` - Hourly building consumption
    /// * `generation` - Hourly PV generation, same length as `consumption`
    /// * `share` - Scaling applied to consumption, generation and cost
    /// * `variant` - Single building or shared user
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for out-of-domain parameters or shares,
    /// `DataFormat` for empty or misaligned profiles.
    pub fn new(
        params: &'a EconomicParameters,
        consumption: &'a HourlyProfile,
        generation: &'a HourlyProfile,
        share: UserShare,
        variant: Variant,
    ) -> Result<Self> {
        params.validate()?;
        share.validate()?;
        check_aligned(consumption, generation)?;

        let cost_basis = initial_cost(params.capacity_kw)? * share.initial_cost_share;
        Ok(Self {
            params,
            consumption,
            generation,
            share,
            variant,
            base_tariff: resolve_tariff(params.building_function),
            cost_basis,
            net_metering_cap: params
                .net_metering_cap
                .unwrap_or_else(|| variant.default_net_metering_cap()),
        })
    }

    /// Single-building model over the whole profiles.
    ///
    /// # Errors
    ///
    /// See [`LifecycleModel::new`].
    pub fn single_building(
        params: &'a EconomicParameters,
        consumption: &'a HourlyProfile,
        generation: &'a HourlyProfile,
    ) -> Result<Self> {
        Self::new(
            params,
            consumption,
            generation,
            UserShare::whole(),
            Variant::SingleBuilding,
        )
    }

    pub fn params(&self) -> &EconomicParameters {
        self.params
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// First-year grid tariff.
    pub fn base_tariff(&self) -> f64 {
        self.base_tariff
    }

    /// Capital cost carried by this model (the user's share when shared).
    pub fn cost_basis(&self) -> f64 {
        self.cost_basis
    }

    /// Share-scaled, undegraded flows for year 1.
    pub fn first_year_flows(&self) -> AnnualFlows {
        self.flows(1)
    }

    fn flows(&self, year: u32) -> AnnualFlows {
        decompose_year(
            self.consumption,
            self.generation,
            self.share.consumption_share,
            self.share.pv_share,
            self.params.degradation_rate,
            year,
        )
    }

    /// Computes one year of the loop.
    ///
    /// # Arguments
    ///
    /// * `year` - Year index, starting at 1
    /// * `first_year_grid_purchase` - Cap quantity used when net metering is
    ///   capped at the first-year purchase
    pub fn step(&self, year: u32, first_year_grid_purchase: f64) -> YearRecord {
        let p = self.params;
        let discount = (1.0 + p.discount_rate).powi(year as i32);
        let inflation = (1.0 + p.inflation_rate).powi(year as i32);

        let flows = self.flows(year);
        let discounted = flows.discounted(discount);

        let cost = if year == 1 {
            self.cost_basis
        } else {
            let opex = self.cost_basis * p.maintenance_cost_ratio * inflation / discount;
            let replacement = if p.is_replacement_year(year) {
                self.cost_basis * p.replacement_ratio * inflation / discount
            } else {
                0.0
            };
            opex + replacement
        };

        let tariff = self.base_tariff * (1.0 + p.inflation_rate).powi(year as i32 - 1);
        let self_consumption_income = discounted.self_consumption * tariff;

        let cap = match self.net_metering_cap {
            NetMeteringCap::FirstYearPurchase => first_year_grid_purchase,
            NetMeteringCap::CurrentYearPurchase => flows.grid_purchase,
        };
        let net_metering_income = flows.export.min(cap) * tariff / discount;

        let tax_deduction_income = if self.variant.credits_tax_and_incentive() {
            self.cost_basis
                * (1.0 + p.tax_deduct)
                * (1.0 - p.tax_deduct).powi(year as i32 - 1)
                * p.tax_deduct
        } else {
            0.0
        };

        YearRecord {
            year,
            flows,
            discounted,
            cost,
            self_consumption_income,
            net_metering_income,
            tax_deduction_income,
            income: self_consumption_income + net_metering_income + tax_deduction_income,
        }
    }

    /// Runs every year of the period and returns the records in year order.
    pub fn run(&self) -> Vec<YearRecord> {
        let first_year_grid_purchase = self.first_year_flows().grid_purchase;
        (1..=self.params.period_years)
            .map(|year| {
                let record = self.step(year, first_year_grid_purchase);
                debug!(
                    year,
                    generation_kwh = record.flows.generation,
                    cost = record.cost,
                    income = record.income,
                    "simulated year"
                );
                record
            })
            .collect()
    }

    /// Runs the loop and aggregates the full single-building result.
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when the total discounted generation is zero.
    pub fn simulate(&self) -> Result<LifecycleResult> {
        let years = self.run();
        let incentive = if self.variant.credits_tax_and_incentive() {
            self.params.incentive
        } else {
            0.0
        };
        // First-year figures always come from the unscaled input profiles.
        let first_year = decompose_year(self.consumption, self.generation, 1.0, 1.0, 0.0, 1);
        let result = LifecycleResult::from_years(years, first_year, self.base_tariff, incentive)?;
        info!(
            lcoe_pv = result.lcoe_pv,
            npv = result.npv,
            years = self.params.period_years,
            "lifecycle run complete"
        );
        Ok(result)
    }
}

/// Runs the single-building lifecycle computation.
///
/// # Examples
///
/// ```
/// use pv_lifecycle::model::engine::calculate_lifecycle;
/// use pv_lifecycle::model::types::{EconomicParameters, HourlyProfile};
///
/// let params = EconomicParameters {
///     capacity_kw: 5.0,
///     period_years: 1,
///     replacement_years: vec![],
///     ..EconomicParameters::default()
/// };
/// let consumption = HourlyProfile::new(vec![10.0]);
/// let generation = HourlyProfile::new(vec![6.0]);
/// let result = calculate_lifecycle(&params, &consumption, &generation).unwrap();
/// assert!(result.npv < 0.0);
/// ```
///
/// # Errors
///
/// See [`LifecycleModel::new`] and [`LifecycleModel::simulate`].
pub fn calculate_lifecycle(
    params: &EconomicParameters,
    consumption: &HourlyProfile,
    generation: &HourlyProfile,
) -> Result<LifecycleResult> {
    LifecycleModel::single_building(params, consumption, generation)?.simulate()
}

fn check_aligned(consumption: &HourlyProfile, generation: &HourlyProfile) -> Result<()> {
    if consumption.is_empty() {
        return Err(LifecycleError::data("hourly profiles are empty"));
    }
    if consumption.len() != generation.len() {
        return Err(LifecycleError::data(format!(
            "consumption has {} hours but generation has {}",
            consumption.len(),
            generation.len()
        )));
    }
    Ok(())
}
