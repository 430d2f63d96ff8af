//! Hourly decomposition of one year's PV generation against consumption.

use super::types::{AnnualFlows, HourlyProfile};

/// Generation remaining after `year - 1` years of degradation, as a factor.
pub fn degradation_factor(degradation_rate: f64, year: u32) -> f64 {
    (1.0 - degradation_rate).powi(year.saturating_sub(1) as i32)
}

/// Splits one year of hourly flows into self-consumption, export and grid
/// purchase, and sums each to an annual value.
///
/// Generation is scaled by `generation_share` and degraded to `year`
/// (1-based); consumption is scaled by `consumption_share`. Profiles are
/// zipped hour by hour, so both must have the same length.
///
/// The result always satisfies `generation == self_consumption + export` and
/// `consumption == self_consumption + grid_purchase` up to rounding.
///
/// # Examples
///
/// ```
/// use pv_lifecycle::model::decomposition::decompose_year;
/// use pv_lifecycle::model::types::HourlyProfile;
///
/// let consumption = HourlyProfile::new(vec![10.0]);
/// let generation = HourlyProfile::new(vec![6.0]);
/// let flows = decompose_year(&consumption, &generation, 1.0, 1.0, 0.0, 1);
/// assert_eq!(flows.self_consumption, 6.0);
/// assert_eq!(flows.export, 0.0);
/// assert_eq!(flows.grid_purchase, 4.0);
/// ```
pub fn decompose_year(
    consumption: &HourlyProfile,
    generation: &HourlyProfile,
    consumption_share: f64,
    generation_share: f64,
    degradation_rate: f64,
    year: u32,
) -> AnnualFlows {
    let gen_scale = generation_share * degradation_factor(degradation_rate, year);

    let mut flows = AnnualFlows::default();
    for (&cons_h, &gen_h) in consumption.as_slice().iter().zip(generation.as_slice()) {
        let gen_kwh = gen_h * gen_scale;
        let cons_kwh = cons_h * consumption_share;

        flows.generation += gen_kwh;
        flows.consumption += cons_kwh;
        flows.self_consumption += gen_kwh.min(cons_kwh);
        flows.export += (gen_kwh - cons_kwh).max(0.0);
        flows.grid_purchase += (cons_kwh - gen_kwh).max(0.0);
    }
    flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn profile(values: &[f64]) -> HourlyProfile {
        HourlyProfile::new(values.to_vec())
    }

    #[test]
    fn single_hour_deficit() {
        let flows = decompose_year(&profile(&[10.0]), &profile(&[6.0]), 1.0, 1.0, 0.0, 1);
        assert_eq!(flows.generation, 6.0);
        assert_eq!(flows.self_consumption, 6.0);
        assert_eq!(flows.export, 0.0);
        assert_eq!(flows.grid_purchase, 4.0);
        assert_eq!(flows.consumption, 10.0);
    }

    #[test]
    fn surplus_hours_export() {
        let flows = decompose_year(
            &profile(&[1.0, 2.0, 0.0]),
            &profile(&[3.0, 1.0, 2.0]),
            1.0,
            1.0,
            0.0,
            1,
        );
        assert_eq!(flows.self_consumption, 2.0);
        assert_eq!(flows.export, 4.0);
        assert_eq!(flows.grid_purchase, 1.0);
    }

    #[test]
    fn degradation_applies_from_second_year() {
        assert_eq!(degradation_factor(0.1, 1), 1.0);
        assert_relative_eq!(degradation_factor(0.1, 2), 0.9, max_relative = 1e-12);
        assert_relative_eq!(degradation_factor(0.1, 3), 0.81, max_relative = 1e-12);

        let flows = decompose_year(&profile(&[0.0]), &profile(&[10.0]), 1.0, 1.0, 0.1, 3);
        assert_relative_eq!(flows.generation, 8.1, max_relative = 1e-12);
        assert_relative_eq!(flows.export, 8.1, max_relative = 1e-12);
    }

    #[test]
    fn shares_scale_each_side_independently() {
        let flows = decompose_year(&profile(&[10.0]), &profile(&[6.0]), 0.4, 0.5, 0.0, 1);
        assert_relative_eq!(flows.consumption, 4.0, max_relative = 1e-12);
        assert_relative_eq!(flows.generation, 3.0, max_relative = 1e-12);
        assert_relative_eq!(flows.self_consumption, 3.0, max_relative = 1e-12);
        assert_relative_eq!(flows.grid_purchase, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn partitions_hold_for_mixed_profile() {
        let cons = profile(&[0.5, 1.2, 3.4, 0.0, 2.2, 0.8]);
        let generation = profile(&[0.0, 2.5, 1.1, 0.7, 2.2, 4.0]);
        for year in 1..=5 {
            let f = decompose_year(&cons, &generation, 1.0, 1.0, 0.02, year);
            assert_relative_eq!(
                f.generation,
                f.self_consumption + f.export,
                max_relative = 1e-9
            );
            assert_relative_eq!(
                f.consumption,
                f.self_consumption + f.grid_purchase,
                max_relative = 1e-9
            );
        }
    }
}
