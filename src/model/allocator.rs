//! Multi-user allocation of one shared PV system.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{LifecycleError, Result};

use super::engine::{LifecycleModel, Variant};
use super::report::UserLifecycleResult;
use super::tariff::resolve_cost_per_kw;
use super::types::{EconomicParameters, HourlyProfile, UserShare};

/// Per-user outcome: each user's failure stays with that user.
pub type AllocationResults = IndexMap<String, Result<UserLifecycleResult>>;

/// Runs the lifecycle loop once per user of a shared system.
///
/// Every user sees the building profiles scaled by their own consumption and
/// PV shares, so self-consumption is decided per share rather than on the
/// pooled profile and the per-user sum can be lower than the building total.
#[derive(Debug, Clone)]
pub struct MultiUserAllocator<'a> {
    params: &'a EconomicParameters,
    consumption: &'a HourlyProfile,
    generation: &'a HourlyProfile,
}

impl<'a> MultiUserAllocator<'a> {
    pub fn new(
        params: &'a EconomicParameters,
        consumption: &'a HourlyProfile,
        generation: &'a HourlyProfile,
    ) -> Self {
        Self {
            params,
            consumption,
            generation,
        }
    }

    /// Computes every user's result, in the order given.
    ///
    /// # Errors
    ///
    /// Fails as a whole only for problems shared by all users: invalid
    /// parameters or duplicate user ids. Invalid shares, misaligned profiles
    /// and zero generation are reported in the user's own entry.
    pub fn allocate<'u, I>(&self, users: I) -> Result<AllocationResults>
    where
        I: IntoIterator<Item = (&'u str, UserShare)>,
    {
        self.params.validate()?;
        resolve_cost_per_kw(self.params.capacity_kw)?;

        let mut results = AllocationResults::new();
        for (id, share) in users {
            if results.contains_key(id) {
                return Err(LifecycleError::invalid(format!("duplicate user id \"{id}\"")));
            }
            let outcome = self.allocate_user(share);
            match &outcome {
                Ok(r) => debug!(user = id, lcoe_pv = r.lcoe_pv, npv = r.npv, "user allocated"),
                Err(e) => warn!(user = id, error = %e, "user allocation failed"),
            }
            results.insert(id.to_string(), outcome);
        }
        Ok(results)
    }

    /// Computes one user's reduced lifecycle result.
    ///
    /// # Errors
    ///
    /// See [`LifecycleModel::new`]; `DivisionUndefined` for zero generation.
    pub fn allocate_user(&self, share: UserShare) -> Result<UserLifecycleResult> {
        let model = LifecycleModel::new(
            self.params,
            self.consumption,
            self.generation,
            share,
            Variant::SharedUser,
        )?;
        UserLifecycleResult::from_years(&model.run())
    }
}
