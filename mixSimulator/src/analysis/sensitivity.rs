// Sensitivity of total time and cost to the per-tonne time and cost of each mode

use std::fmt;
use std::str::FromStr;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::config::constants::{
    COMBINED_COST_WEIGHT, COMBINED_TIME_WEIGHT, SENSITIVITY_POINTS, SENSITIVITY_SCALE_MAX, SENSITIVITY_SCALE_MIN,
};
use crate::config::const_funcs::{linspace, validate_ratio};
use crate::core::scenario::{validate_material, RegimeEconomics};
use crate::error::{ModelError, ModelResult};
use crate::utils::logging::{self, OperationCategory};
use crate::utils::traits::{opt_field, FlatRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityParameter {
    UnitTimeElevator, // years per tonne
    UnitTimeRocket,
    UnitCostElevator, // USD per tonne
    UnitCostRocket,
}

impl SensitivityParameter {
    pub const ALL: [SensitivityParameter; 4] = [
        SensitivityParameter::UnitTimeElevator,
        SensitivityParameter::UnitTimeRocket,
        SensitivityParameter::UnitCostElevator,
        SensitivityParameter::UnitCostRocket,
    ];
}

impl FromStr for SensitivityParameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit_time_elevator" => Ok(SensitivityParameter::UnitTimeElevator),
            "unit_time_rocket" => Ok(SensitivityParameter::UnitTimeRocket),
            "unit_cost_elevator" => Ok(SensitivityParameter::UnitCostElevator),
            "unit_cost_rocket" => Ok(SensitivityParameter::UnitCostRocket),
            _ => Err(format!("Unknown sensitivity parameter: {}", s)),
        }
    }
}

impl fmt::Display for SensitivityParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityParameter::UnitTimeElevator => write!(f, "unit_time_elevator"),
            SensitivityParameter::UnitTimeRocket => write!(f, "unit_time_rocket"),
            SensitivityParameter::UnitCostElevator => write!(f, "unit_cost_elevator"),
            SensitivityParameter::UnitCostRocket => write!(f, "unit_cost_rocket"),
        }
    }
}

/// Evenly spaced parameter values, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl ValueRange {
    pub fn new(min: f64, max: f64, points: usize) -> Self {
        Self { min, max, points }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 {
            return Err(ModelError::out_of_range("value_range.min", self.min, "bounds must be finite and non-negative"));
        }
        if self.min > self.max {
            return Err(ModelError::out_of_range("value_range.min", self.min, "must not exceed max"));
        }
        if self.points == 0 {
            return Err(ModelError::out_of_range("value_range.points", 0.0, "must be at least 1"));
        }
        Ok(())
    }

    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.points)
    }
}

/// Unperturbed per-tonne time and cost of both modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub unit_time_elevator: f64,
    pub unit_time_rocket: f64,
    pub unit_cost_elevator: f64,
    pub unit_cost_rocket: f64,
}

impl Baseline {
    /// Unit time is the reciprocal of theoretical capacity, kept continuous.
    /// Reliability only enters through the unit costs.
    pub fn from_economics(economics: &RegimeEconomics) -> Self {
        Self {
            unit_time_elevator: 1.0 / economics.elevator.capacity.theoretical,
            unit_time_rocket: 1.0 / economics.rocket.capacity.theoretical,
            unit_cost_elevator: economics.elevator.cost_per_ton,
            unit_cost_rocket: economics.rocket.cost_per_ton,
        }
    }

    pub fn get(&self, parameter: SensitivityParameter) -> f64 {
        match parameter {
            SensitivityParameter::UnitTimeElevator => self.unit_time_elevator,
            SensitivityParameter::UnitTimeRocket => self.unit_time_rocket,
            SensitivityParameter::UnitCostElevator => self.unit_cost_elevator,
            SensitivityParameter::UnitCostRocket => self.unit_cost_rocket,
        }
    }

    fn with(&self, parameter: SensitivityParameter, value: f64) -> Self {
        let mut perturbed = *self;
        match parameter {
            SensitivityParameter::UnitTimeElevator => perturbed.unit_time_elevator = value,
            SensitivityParameter::UnitTimeRocket => perturbed.unit_time_rocket = value,
            SensitivityParameter::UnitCostElevator => perturbed.unit_cost_elevator = value,
            SensitivityParameter::UnitCostRocket => perturbed.unit_cost_rocket = value,
        }
        perturbed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCell {
    pub parameter: SensitivityParameter,
    pub time_limit: f64,
    pub parameter_value: f64,
    pub elevator_ratio: f64,
    pub total_time: f64,
    pub total_cost: f64,
    pub feasible: bool,
    /// Normalized cost/time blend within the cell's time limit; `None` when infeasible.
    pub combined_score: Option<f64>,
}

impl FlatRecord for SensitivityCell {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("parameter", self.parameter.to_string()),
            ("time_limit", self.time_limit.to_string()),
            ("parameter_value", self.parameter_value.to_string()),
            ("elevator_ratio", self.elevator_ratio.to_string()),
            ("total_time", self.total_time.to_string()),
            ("total_cost", self.total_cost.to_string()),
            ("feasible", self.feasible.to_string()),
            ("combined_score", opt_field(self.combined_score)),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMetric {
    TotalTime,
    TotalCost,
    CombinedScore,
}

/// Cells for one time limit, indexed `[value][ratio]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLimitSlice {
    pub time_limit: f64,
    pub rows: Vec<Vec<SensitivityCell>>,
}

impl TimeLimitSlice {
    pub fn cells(&self) -> impl Iterator<Item = &SensitivityCell> {
        self.rows.iter().flatten()
    }

    /// Ordered `(parameter_value, ratio, metric)` triples. Infeasible cells
    /// yield `None` for the combined score only.
    pub fn surface(&self, metric: SurfaceMetric) -> Vec<(f64, f64, Option<f64>)> {
        self.cells()
            .map(|cell| {
                let value = match metric {
                    SurfaceMetric::TotalTime => Some(cell.total_time),
                    SurfaceMetric::TotalCost => Some(cell.total_cost),
                    SurfaceMetric::CombinedScore => cell.combined_score,
                };
                (cell.parameter_value, cell.elevator_ratio, value)
            })
            .collect()
    }

    /// Feasible cell with the lowest combined score, first one on ties.
    pub fn best_cell(&self) -> Option<&SensitivityCell> {
        let mut best: Option<(&SensitivityCell, f64)> = None;
        for cell in self.cells() {
            if let Some(score) = cell.combined_score {
                match best {
                    Some((_, current)) if score >= current => {}
                    _ => best = Some((cell, score)),
                }
            }
        }
        best.map(|(cell, _)| cell)
    }
}

/// Response grid `[time_limit][parameter_value][ratio]` for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub parameter: SensitivityParameter,
    pub baseline: Baseline,
    pub values: Vec<f64>,
    pub ratios: Vec<f64>,
    pub slices: Vec<TimeLimitSlice>,
}

impl SensitivityGrid {
    pub fn cell(&self, limit_index: usize, value_index: usize, ratio_index: usize) -> Option<&SensitivityCell> {
        self.slices.get(limit_index)?.rows.get(value_index)?.get(ratio_index)
    }

    pub fn cells(&self) -> impl Iterator<Item = &SensitivityCell> {
        self.slices.iter().flat_map(|slice| slice.cells())
    }
}

pub struct SensitivityAnalyzer {
    baseline: Baseline,
    total_material: f64,
    parallel: bool,
}

impl SensitivityAnalyzer {
    pub fn new(economics: &RegimeEconomics, total_material: f64, parallel: bool) -> ModelResult<Self> {
        validate_material(total_material)?;
        Ok(Self {
            baseline: Baseline::from_economics(economics),
            total_material,
            parallel,
        })
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Baseline scaled from 80% to 120%.
    pub fn default_range(&self, parameter: SensitivityParameter) -> ValueRange {
        let base = self.baseline.get(parameter);
        ValueRange::new(base * SENSITIVITY_SCALE_MIN, base * SENSITIVITY_SCALE_MAX, SENSITIVITY_POINTS)
    }

    pub fn sweep_parameter(
        &self,
        parameter: SensitivityParameter,
        range: &ValueRange,
        ratios: &[f64],
        time_limits: &[f64],
    ) -> ModelResult<SensitivityGrid> {
        let _timing = logging::start_timing("sensitivity_sweep", OperationCategory::Sensitivity);
        range.validate()?;
        for &ratio in ratios {
            validate_ratio(ratio)?;
        }
        for &limit in time_limits {
            if limit.is_nan() || limit < 0.0 {
                return Err(ModelError::out_of_range("time_limit", limit, "must be non-negative"));
            }
        }

        let values = range.values();
        let responses: Vec<Vec<(f64, f64)>> = if self.parallel {
            values.par_iter().map(|&value| self.responses(parameter, value, ratios)).collect()
        } else {
            values.iter().map(|&value| self.responses(parameter, value, ratios)).collect()
        };

        let slices = time_limits
            .iter()
            .map(|&time_limit| build_slice(parameter, time_limit, &values, ratios, &responses))
            .collect();

        info!(%parameter, values = values.len(), ratios = ratios.len(), limits = time_limits.len(), "sensitivity grid built");
        Ok(SensitivityGrid {
            parameter,
            baseline: self.baseline,
            values,
            ratios: ratios.to_vec(),
            slices,
        })
    }

    /// `(total_time, total_cost)` for every ratio at one parameter value.
    fn responses(&self, parameter: SensitivityParameter, value: f64, ratios: &[f64]) -> Vec<(f64, f64)> {
        let inputs = self.baseline.with(parameter, value);
        ratios
            .iter()
            .map(|&ratio| {
                let elevator_material = self.total_material * ratio;
                let rocket_material = self.total_material - elevator_material;
                let elevator_time = if elevator_material > 0.0 { inputs.unit_time_elevator * elevator_material } else { 0.0 };
                let rocket_time = if rocket_material > 0.0 { inputs.unit_time_rocket * rocket_material } else { 0.0 };
                let cost = inputs.unit_cost_elevator * elevator_material + inputs.unit_cost_rocket * rocket_material;
                (elevator_time.max(rocket_time), cost)
            })
            .collect()
    }
}

fn build_slice(
    parameter: SensitivityParameter,
    time_limit: f64,
    values: &[f64],
    ratios: &[f64],
    responses: &[Vec<(f64, f64)>],
) -> TimeLimitSlice {
    let feasible = responses.iter().flatten().filter(|(time, _)| *time <= time_limit);
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for &(time, cost) in feasible {
        bounds = Some(match bounds {
            None => (time, time, cost, cost),
            Some((t_min, t_max, c_min, c_max)) => (t_min.min(time), t_max.max(time), c_min.min(cost), c_max.max(cost)),
        });
    }

    let rows: Vec<Vec<SensitivityCell>> = values
        .iter()
        .zip(responses)
        .map(|(&parameter_value, row)| {
            ratios
                .iter()
                .zip(row)
                .map(|(&elevator_ratio, &(total_time, total_cost))| {
                    let feasible = total_time <= time_limit;
                    let combined_score = match bounds {
                        Some((t_min, t_max, c_min, c_max)) if feasible => Some(
                            COMBINED_COST_WEIGHT * normalize(total_cost, c_min, c_max)
                                + COMBINED_TIME_WEIGHT * normalize(total_time, t_min, t_max),
                        ),
                        _ => None,
                    };
                    SensitivityCell {
                        parameter,
                        time_limit,
                        parameter_value,
                        elevator_ratio,
                        total_time,
                        total_cost,
                        feasible,
                        combined_score,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    TimeLimitSlice { time_limit, rows }
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::config::constants::{SENSITIVITY_TIME_LIMITS, TOTAL_MATERIAL};
    use crate::config::const_funcs::ratio_grid;
    use crate::config::regime::ReliabilityRegime;
    use crate::config::simulation_config::PhysicalConstants;
    use crate::core::scenario::ScenarioEvaluator;

    fn analyzer(parallel: bool) -> SensitivityAnalyzer {
        let evaluator = ScenarioEvaluator::new(Arc::new(PhysicalConstants::default()));
        let economics = evaluator.economics(ReliabilityRegime::Measured).unwrap();
        SensitivityAnalyzer::new(&economics, TOTAL_MATERIAL, parallel).unwrap()
    }

    #[test]
    fn test_baseline_is_reciprocal_capacity() {
        let a = analyzer(false);
        assert!((a.baseline().unit_time_rocket - 1.0 / 2_500_000.0).abs() < 1e-18);
        assert!((a.baseline().unit_time_elevator - 1.0 / 537_000.0).abs() < 1e-18);
        assert!((a.baseline().unit_cost_rocket - 1600.0 / 0.95).abs() < 1e-9);
        let range = a.default_range(SensitivityParameter::UnitCostRocket);
        assert_eq!(range.points, 5);
        assert!((range.min - 0.8 * 1600.0 / 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_grid_shape_and_feasibility() {
        let a = analyzer(false);
        let ratios = ratio_grid(0.1).unwrap();
        let range = a.default_range(SensitivityParameter::UnitTimeElevator);
        let grid = a
            .sweep_parameter(SensitivityParameter::UnitTimeElevator, &range, &ratios, &SENSITIVITY_TIME_LIMITS)
            .unwrap();
        assert_eq!(grid.slices.len(), 5);
        assert!(grid.slices.iter().all(|s| s.rows.len() == 5 && s.rows.iter().all(|r| r.len() == 11)));

        for cell in grid.cells() {
            assert_eq!(cell.feasible, cell.total_time <= cell.time_limit);
            assert_eq!(cell.combined_score.is_some(), cell.feasible);
            if let Some(score) = cell.combined_score {
                assert!((0.0..=1.0).contains(&score));
            }
        }

        // All-rocket takes 40 years, so it is feasible under 50
        let rocket_only = grid.cell(0, 2, 0).unwrap();
        assert!((rocket_only.total_time - TOTAL_MATERIAL / 2_500_000.0).abs() < 1e-9);
        assert!(rocket_only.feasible);
        // All-elevator takes about 186 years
        assert!(!grid.cell(0, 2, 10).unwrap().feasible);
        assert!(grid.cell(3, 2, 10).unwrap().feasible);
    }

    #[test]
    fn test_zero_ratio_ignores_elevator_parameters() {
        let a = analyzer(false);
        let range = ValueRange::new(1.0, 1_000_000.0, 3);
        let grid = a
            .sweep_parameter(SensitivityParameter::UnitCostElevator, &range, &[0.0, 0.5], &[100.0])
            .unwrap();
        let rows = &grid.slices[0].rows;
        assert_eq!(rows[0][0].total_cost, rows[2][0].total_cost);
        assert!(rows[0][1].total_cost < rows[2][1].total_cost);
    }

    #[test]
    fn test_single_feasible_cell_scores_zero() {
        let a = analyzer(false);
        let range = ValueRange::new(a.baseline().unit_time_rocket, a.baseline().unit_time_rocket, 1);
        let grid = a
            .sweep_parameter(SensitivityParameter::UnitTimeRocket, &range, &[0.0, 1.0], &[50.0])
            .unwrap();
        let slice = &grid.slices[0];
        assert_eq!(slice.rows[0][0].combined_score, Some(0.0));
        assert_eq!(slice.rows[0][1].combined_score, None);
        assert_eq!(slice.best_cell().map(|c| c.elevator_ratio), Some(0.0));
    }

    #[test]
    fn test_surface_triples_are_ordered() {
        let a = analyzer(true);
        let ratios = [0.0, 0.25, 0.5];
        let range = a.default_range(SensitivityParameter::UnitCostRocket);
        let grid = a
            .sweep_parameter(SensitivityParameter::UnitCostRocket, &range, &ratios, &[250.0])
            .unwrap();
        let surface = grid.slices[0].surface(SurfaceMetric::TotalCost);
        assert_eq!(surface.len(), 15);
        assert_eq!(surface[0].0, range.min);
        assert_eq!(surface[1].1, 0.25);
        assert!(surface.iter().all(|(_, _, v)| v.is_some()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ratios = ratio_grid(0.05).unwrap();
        let grids: Vec<SensitivityGrid> = [false, true]
            .iter()
            .map(|&parallel| {
                let a = analyzer(parallel);
                let range = a.default_range(SensitivityParameter::UnitTimeRocket);
                a.sweep_parameter(SensitivityParameter::UnitTimeRocket, &range, &ratios, &SENSITIVITY_TIME_LIMITS)
                    .unwrap()
            })
            .collect();
        assert_eq!(grids[0], grids[1]);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let a = analyzer(false);
        let inverted = ValueRange::new(2.0, 1.0, 3);
        assert!(matches!(
            a.sweep_parameter(SensitivityParameter::UnitCostRocket, &inverted, &[0.5], &[50.0]),
            Err(ModelError::ConfigurationOutOfRange { .. })
        ));
        let range = ValueRange::new(1.0, 2.0, 3);
        assert!(a.sweep_parameter(SensitivityParameter::UnitCostRocket, &range, &[1.5], &[50.0]).is_err());
        assert!(a.sweep_parameter(SensitivityParameter::UnitCostRocket, &range, &[0.5], &[-1.0]).is_err());
    }

    #[test]
    fn test_parameter_names_parse() {
        for p in SensitivityParameter::ALL {
            assert_eq!(p.to_string().parse::<SensitivityParameter>().unwrap(), p);
        }
    }
}
