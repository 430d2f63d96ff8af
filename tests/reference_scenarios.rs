//! Hand-checkable reference runs on one-hour profiles.

mod common;

use approx::assert_relative_eq;
use rstest::rstest;

use pv_lifecycle::LifecycleError;
use pv_lifecycle::config::ScenarioConfig;
use pv_lifecycle::model::tariff::{RESIDENTIAL_TARIFF, initial_cost, resolve_cost_per_kw};
use pv_lifecycle::model::{BuildingFunction, MultiUserAllocator, UserShare, calculate_lifecycle};

#[test]
fn one_hour_deficit_matches_hand_calculation() {
    let params = common::one_year_params();
    let (consumption, generation) = common::one_hour(10.0, 6.0);

    let result = calculate_lifecycle(&params, &consumption, &generation)
        .expect("one-hour run should succeed");

    assert_eq!(result.first_year_self_consumption, 6.0);
    assert_eq!(result.first_year_export, 0.0);
    assert_eq!(result.first_year_grid_purchase, 4.0);
    assert_eq!(result.years.len(), 1);

    // 5 kW falls into the (2.5, 5] band at 3000/kW; year 1 carries capital cost only.
    assert_relative_eq!(result.total_discounted_cost, 15_000.0, max_relative = 1e-12);
    assert_relative_eq!(
        result.total_discounted_income,
        6.0 * RESIDENTIAL_TARIFF,
        max_relative = 1e-12
    );
    assert_relative_eq!(result.total_discounted_income, 0.40224, max_relative = 1e-9);
    assert_relative_eq!(result.npv, 0.40224 - 15_000.0, max_relative = 1e-12);
    assert_relative_eq!(result.lcoe_pv, 2_500.0, max_relative = 1e-12);
    assert_eq!(result.lcoe_export, 0.0);
}

#[test]
fn unknown_building_function_is_invalid_configuration() {
    let err = "industrial"
        .parse::<BuildingFunction>()
        .expect_err("industrial is not a building function");
    assert!(matches!(err, LifecycleError::InvalidConfiguration(_)));

    let mut scenario = ScenarioConfig::residential();
    scenario.project.building_function = "industrial".to_string();
    assert!(scenario.parameters().is_err());
}

#[rstest]
#[case(0.001, 4000.0)]
#[case(2.5, 4000.0)]
#[case(2.50001, 3000.0)]
fn cost_band_boundaries(#[case] capacity_kw: f64, #[case] expected: f64) {
    assert_eq!(resolve_cost_per_kw(capacity_kw), Ok(expected));
}

#[test]
fn initial_cost_of_reference_capacity() {
    assert_eq!(initial_cost(5.0), Ok(15_000.0));
}

fn two_user_self_consumption(consumption_kwh: f64, generation_kwh: f64) -> (f64, f64) {
    let params = common::one_year_params();
    let (consumption, generation) = common::one_hour(consumption_kwh, generation_kwh);

    let single = calculate_lifecycle(&params, &consumption, &generation)
        .expect("single-building run should succeed");

    let allocator = MultiUserAllocator::new(&params, &consumption, &generation);
    let results = allocator
        .allocate([
            ("A", UserShare::new(0.6, 0.5, 0.5)),
            ("B", UserShare::new(0.4, 0.5, 0.5)),
        ])
        .expect("allocation should succeed");

    let per_user: f64 = results
        .values()
        .map(|r| {
            r.as_ref().expect("both users should succeed").discounted_self_consumption_per_year[0]
        })
        .sum();
    (per_user, single.first_year_self_consumption)
}

#[test]
fn per_user_self_consumption_adds_up_when_generation_fits_every_user() {
    // Each user gets 3 kWh of generation against 6 and 4 kWh of load.
    let (per_user, single) = two_user_self_consumption(10.0, 6.0);
    assert_relative_eq!(per_user, single, max_relative = 1e-12);
}

#[test]
fn per_user_self_consumption_is_sub_additive_when_a_share_overflows() {
    // User B gets 5 kWh of generation against 4 kWh of load and exports the
    // surplus, while the pooled building would have consumed it all.
    let (per_user, single) = two_user_self_consumption(10.0, 10.0);
    assert_relative_eq!(single, 10.0, max_relative = 1e-12);
    assert_relative_eq!(per_user, 9.0, max_relative = 1e-12);
    assert!(per_user < single);
}
