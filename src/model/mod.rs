/// Multi-user allocation of a shared system.
pub mod allocator;
pub mod decomposition;
/// Lifecycle year loop.
pub mod engine;
/// LCOE/NPV aggregation and result records.
pub mod report;
pub mod tariff;
pub mod types;

pub use allocator::{AllocationResults, MultiUserAllocator};
pub use engine::{LifecycleModel, Variant, calculate_lifecycle};
pub use report::{LifecycleResult, LifecycleTotals, UserLifecycleResult};
pub use types::{
    BuildingFunction, BuildingProfiles, EconomicParameters, HourlyProfile, NetMeteringCap,
    UserShare, YearRecord,
};
