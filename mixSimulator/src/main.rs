use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use spacelift::analysis::environmental::{EnvironmentalImpactModel, EnvironmentalSummary};
use spacelift::analysis::regime_comparison::{RegimeComparison, RegimeComparisonRow};
use spacelift::analysis::reporting;
use spacelift::analysis::residual_loss::ResidualLossModel;
use spacelift::analysis::sensitivity::{SensitivityAnalyzer, SensitivityGrid, SensitivityParameter};
use spacelift::cli::cli::Args;
use spacelift::config::const_funcs::ratio_grid;
use spacelift::config::constants::SENSITIVITY_TIME_LIMITS;
use spacelift::config::regime::ReliabilityRegime;
use spacelift::config::simulation_config::RunConfig;
use spacelift::core::availability::{AvailabilityParameter, AvailabilityResult, AvailabilitySimulator};
use spacelift::core::ratio_optimizer::{RatioOptimizer, RatioPoint};
use spacelift::core::scenario::{Scenario, ScenarioEvaluator};
use spacelift::models::transport_mode::TransportMode;
use spacelift::utils::csv_export::CsvExporter;
use spacelift::utils::logging::{self, FileIOType, OperationCategory};
use spacelift::ModelResult;

#[derive(Serialize)]
struct RunSummary<'a> {
    run_timestamp: &'a str,
    seed: Option<u64>,
    config: &'a RunConfig,
    total_material: f64,
    scenarios: &'a [Scenario],
    cost_optimum: &'a RatioPoint,
    availability: &'a AvailabilityResult,
    regime_comparison: &'a [RegimeComparisonRow],
    environmental: &'a EnvironmentalSummary,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();
    logging::init_logging(args.enable_timing())?;

    let mut config = load_config(&args)?;
    config.validate()?;
    if config.seed.is_none() {
        let seed = rand::random::<u64>();
        info!(seed, "no seed given, drew one for this run");
        config.seed = Some(seed);
    }

    println!("Space Elevator / Ground Rocket Transport Mix Simulator");
    println!("Regime: {}, parallel: {}, CSV export: {}",
             config.regime.display_name(),
             if config.parallel { "enabled" } else { "disabled" },
             if args.export_csv() { "enabled" } else { "disabled" });

    let constants = Arc::new(config.constants.clone());
    let evaluator = ScenarioEvaluator::new(Arc::clone(&constants));
    let optimizer = RatioOptimizer::new(&evaluator, config.parallel);
    let total = config.total_material();

    // Single modes and the split search
    let economics = evaluator.economics(config.regime)?;
    reporting::print_unit_economics(&economics);

    let mut scenarios = TransportMode::ALL
        .iter()
        .map(|&mode| evaluator.evaluate_single_mode_with(&economics, mode, total))
        .collect::<Result<Vec<_>, _>>()?;
    scenarios.iter().for_each(reporting::print_scenario);

    let sweep = optimizer.sweep_with(&economics, total, config.step)?;
    let best = optimizer.minimize_cost_with(&economics, total, config.step)?;
    reporting::print_ratio_point("Cost-Optimal Split", &best);
    scenarios.push(optimizer.to_scenario(&economics, &best, None)?);

    let optima = optimizer.sweep_by_time_limit_with(&economics, total, config.step, &config.time_limits)?;
    reporting::print_time_limited_optima(&optima);
    for optimum in &optima {
        scenarios.push(optimizer.to_scenario(&economics, &optimum.point, Some(optimum.time_limit))?);
    }

    if config.extra_material > 0.0 {
        report_extra_demand(&evaluator, &optimizer, &config)?;
    }

    // Elevator availability and the capacity it leaves
    let simulator = AvailabilitySimulator::new(config.availability.clone(), config.trial_count, config.seed);
    let (availability, samples) = simulator.simulate_with_samples()?;
    reporting::print_availability(&availability);
    match availability_corrected(&evaluator, &optimizer, &config, &availability) {
        Ok((elevator, corrected_best)) => {
            reporting::print_scenario(&elevator);
            reporting::print_ratio_point("Cost-Optimal Split (availability corrected)", &corrected_best);
            scenarios.push(elevator);
        }
        Err(e) => warn!("Skipping availability-corrected scenarios: {}", e),
    }

    // Sensitivity sweeps
    let progress = ProgressBar::new((AvailabilityParameter::ALL.len() + SensitivityParameter::ALL.len()) as u64);
    progress.set_style(ProgressStyle::with_template("{msg:>24} [{bar:40}] {pos}/{len}")?.progress_chars("#>-"));

    let mut availability_sweeps = Vec::new();
    for parameter in AvailabilityParameter::ALL {
        progress.set_message(parameter.to_string());
        availability_sweeps.extend(simulator.sweep(parameter, &parameter.default_values(), config.parallel)?);
        progress.inc(1);
    }

    let analyzer = SensitivityAnalyzer::new(&economics, total, config.parallel)?;
    let ratios = ratio_grid(config.step)?;
    let mut grids: Vec<SensitivityGrid> = Vec::new();
    for parameter in SensitivityParameter::ALL {
        progress.set_message(parameter.to_string());
        let range = analyzer.default_range(parameter);
        grids.push(analyzer.sweep_parameter(parameter, &range, &ratios, &SENSITIVITY_TIME_LIMITS)?);
        progress.inc(1);
    }
    progress.finish_with_message("sweeps complete");

    for parameter in AvailabilityParameter::ALL {
        let points: Vec<_> = availability_sweeps.iter().filter(|p| p.parameter == parameter).copied().collect();
        reporting::print_availability_sweep(&points);
    }
    grids.iter().for_each(reporting::print_sensitivity_summary);

    // Supplementary analyses
    let residual_model = ResidualLossModel::new(&constants);
    let mut residual_losses = Vec::new();
    for mode in TransportMode::ALL {
        let curve = residual_model.curve(mode)?;
        reporting::print_residual_losses(&curve);
        residual_losses.extend(curve);
    }

    let comparison = RegimeComparison::new(&evaluator, config.parallel).compare(total, config.step)?;
    reporting::print_regime_comparison(&comparison);

    let environmental = EnvironmentalImpactModel::new(config.environment.clone(), constants.g0)?.summarize(total)?;
    reporting::print_environmental_summary(&environmental);

    if args.export_csv() {
        let exporter = CsvExporter::new(args.output_dir(), args.verbose())?;
        exporter.export_records("scenarios", &scenarios)?;
        exporter.export_records("ratio_sweep", &sweep)?;
        exporter.export_records("time_limited_optima", &optima)?;
        exporter.export_records("availability", &[availability])?;
        exporter.export_availability_samples(&samples)?;
        exporter.export_records("availability_sweeps", &availability_sweeps)?;
        let cells: Vec<_> = grids.iter().flat_map(|g| g.cells().copied()).collect();
        exporter.export_records("sensitivity_grid", &cells)?;
        exporter.export_records("residual_loss", &residual_losses)?;
        exporter.export_records("regime_comparison", &comparison)?;
        exporter.export_records("environmental_hybrid", &environmental.hybrid)?;
        exporter.export_summary("summary", &RunSummary {
            run_timestamp: exporter.timestamp(),
            seed: config.seed,
            config: &config,
            total_material: total,
            scenarios: &scenarios,
            cost_optimum: &best,
            availability: &availability,
            regime_comparison: &comparison,
            environmental: &environmental,
        })?;
        println!("\nResults written to {}", exporter.output_dir().display());
    }

    logging::print_timing_report();
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<RunConfig> {
    let _timing = logging::start_timing("load_config",
        OperationCategory::FileIO { subcategory: FileIOType::ConfigLoad });

    let mut config = match args.config() {
        Some(path) => {
            info!(path, "loading run configuration");
            RunConfig::load(path)?
        }
        None => RunConfig::default(),
    };
    args.apply_to(&mut config);
    Ok(config)
}

fn availability_corrected(
    evaluator: &ScenarioEvaluator,
    optimizer: &RatioOptimizer,
    config: &RunConfig,
    availability: &AvailabilityResult,
) -> ModelResult<(Scenario, RatioPoint)> {
    let total = config.total_material();
    let corrected = evaluator.economics_with_availability(config.regime, availability)?;
    let mut elevator = evaluator.evaluate_single_mode_with(&corrected, TransportMode::ElevatorTug, total)?;
    elevator.name = format!("{} (availability corrected)", elevator.name);
    let best = optimizer.minimize_cost_with(&corrected, total, config.step)?;
    Ok((elevator, best))
}

// Base plus extra demand, always under measured reliability
fn report_extra_demand(
    evaluator: &ScenarioEvaluator,
    optimizer: &RatioOptimizer,
    config: &RunConfig,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let total = config.total_material();
    println!("\nExtended demand: {:.0} t base + {:.0} t extra", config.material_demand, config.extra_material);
    let economics = evaluator.economics(ReliabilityRegime::Measured)?;
    for mode in TransportMode::ALL {
        reporting::print_scenario(&evaluator.evaluate_single_mode_with(&economics, mode, total)?);
    }
    let best = optimizer.minimize_cost_with(&economics, total, config.step)?;
    reporting::print_ratio_point("Cost-Optimal Split (extended demand)", &best);
    Ok(())
}
