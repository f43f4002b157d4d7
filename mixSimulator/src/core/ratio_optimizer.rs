use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::config::const_funcs::{calc_completion_year, ratio_grid, validate_ratio};
use crate::config::regime::ReliabilityRegime;
use crate::core::scenario::{validate_material, RegimeEconomics, Scenario, ScenarioEvaluator, ScenarioKind};
use crate::error::{ModelError, ModelResult};
use crate::utils::logging::{self, OperationCategory, OptimizationType};
use crate::utils::traits::FlatRecord;

/// One elevator/rocket split of the total demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    pub elevator_ratio: f64,
    pub rocket_ratio: f64,
    pub elevator_material: f64,
    pub rocket_material: f64,
    pub elevator_years: u32,
    pub rocket_years: u32,
    pub years_needed: u32,
    pub elevator_cost: f64,
    pub rocket_cost: f64,
    pub total_cost: f64,
}

impl FlatRecord for RatioPoint {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("elevator_ratio", self.elevator_ratio.to_string()),
            ("rocket_ratio", self.rocket_ratio.to_string()),
            ("elevator_material", self.elevator_material.to_string()),
            ("rocket_material", self.rocket_material.to_string()),
            ("elevator_years", self.elevator_years.to_string()),
            ("rocket_years", self.rocket_years.to_string()),
            ("years_needed", self.years_needed.to_string()),
            ("elevator_cost", self.elevator_cost.to_string()),
            ("rocket_cost", self.rocket_cost.to_string()),
            ("total_cost", self.total_cost.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeLimitedOptimum {
    pub time_limit: u32,
    pub point: RatioPoint,
}

impl FlatRecord for TimeLimitedOptimum {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("time_limit", self.time_limit.to_string())];
        fields.extend(self.point.fields());
        fields
    }
}

/// Lowest-cost point, first one wins on ties.
pub fn cheapest(points: &[RatioPoint]) -> Option<&RatioPoint> {
    cheapest_matching(points, |_| true)
}

/// Lowest-cost point that finishes within `time_limit` years.
pub fn cheapest_within(points: &[RatioPoint], time_limit: u32) -> Option<&RatioPoint> {
    cheapest_matching(points, |p| p.years_needed <= time_limit)
}

fn cheapest_matching(points: &[RatioPoint], keep: impl Fn(&RatioPoint) -> bool) -> Option<&RatioPoint> {
    let mut best: Option<&RatioPoint> = None;
    for point in points.iter().filter(|p| keep(p)) {
        match best {
            Some(current) if point.total_cost >= current.total_cost => {}
            _ => best = Some(point),
        }
    }
    best
}

/// Searches the elevator/rocket split for the cheapest plan, optionally under
/// a deadline.
pub struct RatioOptimizer<'a> {
    evaluator: &'a ScenarioEvaluator,
    parallel: bool,
}

impl<'a> RatioOptimizer<'a> {
    pub fn new(evaluator: &'a ScenarioEvaluator, parallel: bool) -> Self {
        Self { evaluator, parallel }
    }

    pub fn evaluate_ratio(&self, economics: &RegimeEconomics, total_material: f64, ratio: f64) -> ModelResult<RatioPoint> {
        validate_ratio(ratio)?;
        validate_material(total_material)?;
        split(economics, total_material, ratio)
    }

    pub fn sweep(&self, total_material: f64, regime: ReliabilityRegime, step: f64) -> ModelResult<Vec<RatioPoint>> {
        let economics = self.evaluator.economics(regime)?;
        self.sweep_with(&economics, total_material, step)
    }

    /// Every split on the grid `{0, step, …, 1}`, in ascending ratio order.
    pub fn sweep_with(&self, economics: &RegimeEconomics, total_material: f64, step: f64) -> ModelResult<Vec<RatioPoint>> {
        let _timing = logging::start_timing(
            "ratio_sweep",
            OperationCategory::Optimization { subcategory: OptimizationType::RatioSweep },
        );
        validate_material(total_material)?;
        let grid = ratio_grid(step)?;

        let points: Vec<RatioPoint> = if self.parallel {
            grid.par_iter().map(|&ratio| split(economics, total_material, ratio)).collect::<ModelResult<_>>()?
        } else {
            grid.iter().map(|&ratio| split(economics, total_material, ratio)).collect::<ModelResult<_>>()?
        };
        debug!(regime = %economics.regime, points = points.len(), step, "ratio sweep complete");
        Ok(points)
    }

    pub fn minimize_cost(&self, total_material: f64, regime: ReliabilityRegime, step: f64) -> ModelResult<RatioPoint> {
        let economics = self.evaluator.economics(regime)?;
        self.minimize_cost_with(&economics, total_material, step)
    }

    pub fn minimize_cost_with(&self, economics: &RegimeEconomics, total_material: f64, step: f64) -> ModelResult<RatioPoint> {
        let points = self.sweep_with(economics, total_material, step)?;
        let best = cheapest(&points)
            .copied()
            .ok_or_else(|| ModelError::out_of_range("step", step, "produced an empty ratio grid"))?;
        info!(
            regime = %economics.regime,
            elevator_ratio = best.elevator_ratio,
            years = best.years_needed,
            cost = best.total_cost,
            "unconstrained optimum"
        );
        Ok(best)
    }

    /// Cheapest split finishing within `time_limit` years, or `None` when no
    /// split on the grid is fast enough.
    pub fn minimize_cost_within(
        &self,
        total_material: f64,
        regime: ReliabilityRegime,
        step: f64,
        time_limit: u32,
    ) -> ModelResult<Option<RatioPoint>> {
        let economics = self.evaluator.economics(regime)?;
        self.minimize_cost_within_with(&economics, total_material, step, time_limit)
    }

    pub fn minimize_cost_within_with(
        &self,
        economics: &RegimeEconomics,
        total_material: f64,
        step: f64,
        time_limit: u32,
    ) -> ModelResult<Option<RatioPoint>> {
        let points = self.sweep_with(economics, total_material, step)?;
        let best = cheapest_within(&points, time_limit).copied();
        if best.is_none() {
            debug!(time_limit, "no split meets the time limit");
        }
        Ok(best)
    }

    pub fn sweep_by_time_limit(
        &self,
        total_material: f64,
        regime: ReliabilityRegime,
        step: f64,
        time_limits: &[u32],
    ) -> ModelResult<Vec<TimeLimitedOptimum>> {
        let economics = self.evaluator.economics(regime)?;
        self.sweep_by_time_limit_with(&economics, total_material, step, time_limits)
    }

    /// Constrained optimum for each limit. Limits no split can meet are skipped.
    pub fn sweep_by_time_limit_with(
        &self,
        economics: &RegimeEconomics,
        total_material: f64,
        step: f64,
        time_limits: &[u32],
    ) -> ModelResult<Vec<TimeLimitedOptimum>> {
        let _timing = logging::start_timing(
            "time_limit_sweep",
            OperationCategory::Optimization { subcategory: OptimizationType::TimeLimitSweep },
        );
        let points = self.sweep_with(economics, total_material, step)?;
        let optima: Vec<TimeLimitedOptimum> = time_limits
            .iter()
            .filter_map(|&time_limit| {
                cheapest_within(&points, time_limit).map(|point| TimeLimitedOptimum { time_limit, point: *point })
            })
            .collect();
        info!(
            limits = time_limits.len(),
            feasible = optima.len(),
            "time-limited optima computed"
        );
        Ok(optima)
    }

    /// Wraps a split as a combined scenario.
    pub fn to_scenario(&self, economics: &RegimeEconomics, point: &RatioPoint, time_limit: Option<u32>) -> ModelResult<Scenario> {
        let mut annual_capacity = 0.0;
        if point.elevator_material > 0.0 {
            annual_capacity += economics.elevator.capacity.effective;
        }
        if point.rocket_material > 0.0 {
            annual_capacity += economics.rocket.capacity.effective;
        }
        let name = match time_limit {
            Some(limit) => format!("Combined ({:.0}% elevator, {} year limit)", point.elevator_ratio * 100.0, limit),
            None => format!("Combined ({:.0}% elevator)", point.elevator_ratio * 100.0),
        };
        Ok(Scenario {
            name,
            kind: ScenarioKind::Combined,
            regime: economics.regime,
            years_needed: point.years_needed,
            completion_year: calc_completion_year(economics.start_year, point.years_needed)?,
            total_cost: point.total_cost,
            annual_capacity,
            elevator_ratio: Some(point.elevator_ratio),
            rocket_ratio: Some(point.rocket_ratio),
            elevator_material: Some(point.elevator_material),
            rocket_material: Some(point.rocket_material),
            time_limit,
        })
    }
}

fn split(economics: &RegimeEconomics, total_material: f64, ratio: f64) -> ModelResult<RatioPoint> {
    let elevator_material = total_material * ratio;
    let rocket_material = total_material - elevator_material;
    let elevator = economics.elevator.leg(elevator_material)?;
    let rocket = economics.rocket.leg(rocket_material)?;

    Ok(RatioPoint {
        elevator_ratio: ratio,
        rocket_ratio: 1.0 - ratio,
        elevator_material,
        rocket_material,
        elevator_years: elevator.years,
        rocket_years: rocket.years,
        years_needed: elevator.years.max(rocket.years),
        elevator_cost: elevator.cost,
        rocket_cost: rocket.cost,
        total_cost: elevator.cost + rocket.cost,
    })
}
