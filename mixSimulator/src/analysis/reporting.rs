use crate::core::availability::{AvailabilityResult, AvailabilitySweepPoint};
use crate::core::ratio_optimizer::{RatioPoint, TimeLimitedOptimum};
use crate::core::scenario::{RegimeEconomics, Scenario};
use super::environmental::EnvironmentalSummary;
use super::regime_comparison::RegimeComparisonRow;
use super::residual_loss::ResidualLossPoint;
use super::sensitivity::SensitivityGrid;

const BILLION: f64 = 1e9;

pub fn print_unit_economics(economics: &RegimeEconomics) {
    println!("\nUnit Economics ({})", economics.regime.display_name());
    println!("----------------------------------------");
    for mode in [&economics.elevator, &economics.rocket] {
        println!("{}:", mode.mode.scenario_name());
        println!("  Cost per tonne: ${:.2}", mode.cost_per_ton);
        println!("  Theoretical capacity: {:.1} t/yr", mode.capacity.theoretical);
        println!("  Effective capacity: {:.1} t/yr", mode.capacity.effective);
    }
}

pub fn print_scenario(scenario: &Scenario) {
    println!("\n{}", scenario.name);
    println!("----------------------------------------");
    println!("Regime: {}", scenario.regime);
    println!("Years needed: {}", scenario.years_needed);
    println!("Completion year: {}", scenario.completion_year);
    println!("Total cost: ${:.2} billion", scenario.total_cost / BILLION);
    println!("Annual capacity: {:.1} t/yr", scenario.annual_capacity);
    if let (Some(elevator), Some(rocket)) = (scenario.elevator_ratio, scenario.rocket_ratio) {
        println!("Split: {:.1}% elevator / {:.1}% rocket", elevator * 100.0, rocket * 100.0);
    }
    if let Some(limit) = scenario.time_limit {
        println!("Time limit: {} years", limit);
    }
}

pub fn print_ratio_point(label: &str, point: &RatioPoint) {
    println!("\n{}", label);
    println!("----------------------------------------");
    println!("Elevator ratio: {:.2}", point.elevator_ratio);
    println!("  Elevator: {:.0} t, {} years, ${:.2} billion", point.elevator_material, point.elevator_years, point.elevator_cost / BILLION);
    println!("  Rocket: {:.0} t, {} years, ${:.2} billion", point.rocket_material, point.rocket_years, point.rocket_cost / BILLION);
    println!("Years needed: {}", point.years_needed);
    println!("Total cost: ${:.2} billion", point.total_cost / BILLION);
}

pub fn print_time_limited_optima(optima: &[TimeLimitedOptimum]) {
    println!("\nCost-Optimal Split by Time Limit");
    println!("----------------------------------------");
    if optima.is_empty() {
        println!("No time limit is achievable");
        return;
    }
    for optimum in optima {
        println!(
            "{:>4} years: ratio {:.2}, {} years, ${:.2} billion",
            optimum.time_limit,
            optimum.point.elevator_ratio,
            optimum.point.years_needed,
            optimum.point.total_cost / BILLION
        );
    }
}

pub fn print_availability(result: &AvailabilityResult) {
    println!("\nElevator Availability ({} trials)", result.trial_count);
    println!("----------------------------------------");
    println!("Availability (A_SE): {:.4}", result.availability);
    println!("Average effective success rate: {:.4}", result.average_effective_success_rate);
    println!("Maintenance downtime: {:.1}%", result.maintenance_downtime * 100.0);
    println!("Corrected throughput: {:.2} t per cycle", result.corrected_throughput);
}

pub fn print_availability_sweep(points: &[AvailabilitySweepPoint]) {
    let Some(first) = points.first() else {
        return;
    };
    println!("\nAvailability vs {}", first.parameter);
    println!("----------------------------------------");
    for point in points {
        println!("{:>8.3}: A_SE={:.4}, throughput={:.2}", point.value, point.availability, point.corrected_throughput);
    }
}

pub fn print_sensitivity_summary(grid: &SensitivityGrid) {
    println!("\nSensitivity to {}", grid.parameter);
    println!("----------------------------------------");
    println!("Baseline: {:.6e}", grid.baseline.get(grid.parameter));
    for slice in &grid.slices {
        let feasible = slice.cells().filter(|c| c.feasible).count();
        let total = slice.cells().count();
        match slice.best_cell() {
            Some(best) => println!(
                "Limit {:>5.0} years: {}/{} feasible, best value {:.6e} at ratio {:.2} ({:.1} years, ${:.2} billion)",
                slice.time_limit,
                feasible,
                total,
                best.parameter_value,
                best.elevator_ratio,
                best.total_time,
                best.total_cost / BILLION
            ),
            None => println!("Limit {:>5.0} years: no feasible cell", slice.time_limit),
        }
    }
}

pub fn print_residual_losses(points: &[ResidualLossPoint]) {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return;
    };
    println!("\nResidual Loss ({})", first.mode.scenario_name());
    println!("----------------------------------------");
    println!("Failure on mission {}: ${:.2} million", first.failure_mission, first.loss / 1e6);
    println!("Failure on mission {}: ${:.2} million", last.failure_mission, last.loss / 1e6);
}

pub fn print_regime_comparison(rows: &[RegimeComparisonRow]) {
    println!("\nReliability Impact (idealized -> measured)");
    println!("----------------------------------------");
    for row in rows {
        println!(
            "{}: {} -> {} years ({:+}), ${:.2} -> ${:.2} billion ({:+.2}%)",
            row.plan,
            row.idealized_years,
            row.measured_years,
            row.year_delta,
            row.idealized_cost / BILLION,
            row.measured_cost / BILLION,
            row.cost_delta_percent
        );
    }
}

pub fn print_environmental_summary(summary: &EnvironmentalSummary) {
    println!("\nEnvironmental Impact");
    println!("----------------------------------------");
    println!("Propellant intensity: {:.3} t per tonne of payload", summary.rocket.propellant_intensity);
    println!("Rockets only: {:.3e} weighted units", summary.rocket.total_impact);
    for emission in &summary.rocket.emissions {
        println!("  {}: {:.3e} kg", emission.pollutant.symbol(), emission.total);
    }
    for (scenario, impact) in &summary.elevator {
        println!("Elevator only ({}): {:.3e} kgCO2e", scenario, impact);
    }
}
