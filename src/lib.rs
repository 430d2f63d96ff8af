//! Lifecycle economics of rooftop PV systems.
//!
//! Turns one representative year of hourly building consumption and PV
//! generation into discounted multi-year cash flows, then into the levelized
//! cost of energy and net present value. A shared system can be split among
//! several co-owners, each evaluated on their own share.

pub mod config;
pub mod error;
/// CSV profile loading and result export.
pub mod io;
/// Tariffs, the discounted year loop, reports and multi-user allocation.
pub mod model;
pub mod profiles;

pub use error::{LifecycleError, Result};
