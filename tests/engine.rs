use std::sync::Arc;

use spacelift::analysis::sensitivity::{SensitivityAnalyzer, SensitivityParameter, ValueRange};
use spacelift::config::const_funcs::ratio_grid;
use spacelift::config::constants::TOTAL_MATERIAL;
use spacelift::config::simulation_config::{AvailabilityConfig, RunConfig};
use spacelift::core::ratio_optimizer::cheapest_within;
use spacelift::{
    AvailabilitySimulator, ModelError, PhysicalConstants, RatioOptimizer, ReliabilityRegime, ScenarioEvaluator,
    TransportMode,
};

fn evaluator() -> ScenarioEvaluator {
    ScenarioEvaluator::new(Arc::new(PhysicalConstants::default()))
}

#[test]
fn test_default_single_mode_durations() {
    let e = evaluator();
    let elevator = e
        .evaluate_single_mode(TransportMode::ElevatorTug, ReliabilityRegime::Measured, TOTAL_MATERIAL)
        .unwrap();
    let rocket = e
        .evaluate_single_mode(TransportMode::GroundRocket, ReliabilityRegime::Measured, TOTAL_MATERIAL)
        .unwrap();

    // 537,000 × 0.99 × 0.99 = 526,313.7 t/yr, which needs just over 190 years
    assert_eq!(elevator.years_needed, 191);
    assert_eq!(rocket.years_needed, 43);
    assert!(elevator.total_cost > 200.0 * rocket.total_cost);
}

#[test]
fn test_sweep_endpoints_reproduce_single_modes_in_both_regimes() {
    let e = evaluator();
    let optimizer = RatioOptimizer::new(&e, true);
    for regime in ReliabilityRegime::ALL {
        let points = optimizer.sweep(TOTAL_MATERIAL, regime, 0.01).unwrap();
        let rocket = e.evaluate_single_mode(TransportMode::GroundRocket, regime, TOTAL_MATERIAL).unwrap();
        let elevator = e.evaluate_single_mode(TransportMode::ElevatorTug, regime, TOTAL_MATERIAL).unwrap();
        let (first, last) = (points[0], points[points.len() - 1]);
        assert_eq!((first.years_needed, first.total_cost), (rocket.years_needed, rocket.total_cost));
        assert_eq!((last.years_needed, last.total_cost), (elevator.years_needed, elevator.total_cost));
    }
}

#[test]
fn test_constrained_optimum_matches_brute_force_for_every_limit() {
    let e = evaluator();
    let optimizer = RatioOptimizer::new(&e, false);
    let points = optimizer.sweep(TOTAL_MATERIAL, ReliabilityRegime::Measured, 0.01).unwrap();
    for limit in (10..=200).step_by(10) {
        let best = optimizer
            .minimize_cost_within(TOTAL_MATERIAL, ReliabilityRegime::Measured, 0.01, limit)
            .unwrap();
        let feasible: Vec<_> = points.iter().filter(|p| p.years_needed <= limit).collect();
        match best {
            None => assert!(feasible.is_empty()),
            Some(best) => {
                assert!(best.years_needed <= limit);
                assert!(feasible.iter().all(|p| best.total_cost <= p.total_cost));
                assert_eq!(Some(&best), cheapest_within(&points, limit));
            }
        }
    }
}

#[test]
fn test_unconstrained_optimum_never_beaten() {
    let e = evaluator();
    let optimizer = RatioOptimizer::new(&e, false);
    for step in [0.01, 0.03, 0.1, 0.25] {
        let points = optimizer.sweep(TOTAL_MATERIAL, ReliabilityRegime::Idealized, step).unwrap();
        let best = optimizer.minimize_cost(TOTAL_MATERIAL, ReliabilityRegime::Idealized, step).unwrap();
        assert!(points.iter().all(|p| best.total_cost <= p.total_cost));
        assert_eq!(points.last().unwrap().elevator_ratio, 1.0);
    }
}

#[test]
fn test_availability_feeds_capacity() {
    let e = evaluator();
    let result = AvailabilitySimulator::new(AvailabilityConfig::default(), 4_000, Some(2024))
        .simulate()
        .unwrap();
    let corrected = e.economics_with_availability(ReliabilityRegime::Measured, &result).unwrap();
    let plain = e.economics(ReliabilityRegime::Measured).unwrap();
    assert!(corrected.elevator.capacity.effective < plain.elevator.capacity.theoretical);

    let scenario = e
        .evaluate_single_mode_with(&corrected, TransportMode::ElevatorTug, TOTAL_MATERIAL)
        .unwrap();
    assert!(scenario.years_needed > 191);
}

#[test]
fn test_availability_reproducible_across_parallel_sweep() {
    let simulator = AvailabilitySimulator::new(AvailabilityConfig::default(), 2_000, Some(77));
    let single = simulator.simulate().unwrap();
    let sweep = simulator
        .sweep(
            spacelift::core::availability::AvailabilityParameter::SafeWindSpeed,
            &[AvailabilityConfig::default().safe_wind_speed],
            true,
        )
        .unwrap();
    assert_eq!(sweep[0].availability, single.availability);
    assert_eq!(sweep[0].corrected_throughput, single.corrected_throughput);
}

#[test]
fn test_invalid_inputs_surface_typed_errors() {
    let zero_trials = AvailabilitySimulator::new(AvailabilityConfig::default(), 0, None).simulate();
    assert_eq!(zero_trials.unwrap_err(), ModelError::InvalidSampleSize(0));

    let e = evaluator();
    let economics = e.economics(ReliabilityRegime::Measured).unwrap();
    let analyzer = SensitivityAnalyzer::new(&economics, TOTAL_MATERIAL, false).unwrap();
    let inverted = ValueRange::new(5.0, 1.0, 3);
    let err = analyzer
        .sweep_parameter(SensitivityParameter::UnitCostRocket, &inverted, &ratio_grid(0.1).unwrap(), &[100.0])
        .unwrap_err();
    assert!(matches!(err, ModelError::ConfigurationOutOfRange { .. }));

    let mut constants = PhysicalConstants::default();
    constants.reliability.measured.rocket = 1.5;
    let bad = ScenarioEvaluator::new(Arc::new(constants));
    assert!(matches!(
        bad.economics(ReliabilityRegime::Measured),
        Err(ModelError::InvalidPhysicalParameters(_))
    ));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = RunConfig { seed: Some(5), extra_material: 1e6, ..RunConfig::default() };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: RunConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.seed, Some(5));
    assert_eq!(parsed.regime, config.regime);
    assert_eq!(parsed.time_limits, config.time_limits);
    assert_eq!(parsed.constants.elevator.harbors, 3);
    assert_eq!(parsed.total_material(), TOTAL_MATERIAL + 1e6);
}
