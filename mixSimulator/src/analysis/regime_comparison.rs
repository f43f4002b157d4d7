use serde::{Deserialize, Serialize};
use tracing::info;
use crate::config::regime::ReliabilityRegime;
use crate::core::ratio_optimizer::RatioOptimizer;
use crate::core::scenario::{Scenario, ScenarioEvaluator};
use crate::error::ModelResult;
use crate::models::transport_mode::TransportMode;
use crate::utils::logging::{self, OperationCategory, OptimizationType};
use crate::utils::traits::FlatRecord;

/// How one plan shifts when moving from idealized to measured reliability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeComparisonRow {
    pub plan: String,
    pub idealized_years: u32,
    pub measured_years: u32,
    pub year_delta: i64,
    pub idealized_cost: f64,
    pub measured_cost: f64,
    pub cost_delta: f64,
    pub cost_delta_percent: f64,
}

impl RegimeComparisonRow {
    fn new(plan: &str, idealized: &Scenario, measured: &Scenario) -> Self {
        let cost_delta = measured.total_cost - idealized.total_cost;
        Self {
            plan: plan.to_string(),
            idealized_years: idealized.years_needed,
            measured_years: measured.years_needed,
            year_delta: measured.years_needed as i64 - idealized.years_needed as i64,
            idealized_cost: idealized.total_cost,
            measured_cost: measured.total_cost,
            cost_delta,
            cost_delta_percent: if idealized.total_cost > 0.0 { cost_delta / idealized.total_cost * 100.0 } else { 0.0 },
        }
    }
}

impl FlatRecord for RegimeComparisonRow {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("plan", self.plan.clone()),
            ("idealized_years", self.idealized_years.to_string()),
            ("measured_years", self.measured_years.to_string()),
            ("year_delta", self.year_delta.to_string()),
            ("idealized_cost", self.idealized_cost.to_string()),
            ("measured_cost", self.measured_cost.to_string()),
            ("cost_delta", self.cost_delta.to_string()),
            ("cost_delta_percent", self.cost_delta_percent.to_string()),
        ]
    }
}

pub struct RegimeComparison<'a> {
    evaluator: &'a ScenarioEvaluator,
    parallel: bool,
}

impl<'a> RegimeComparison<'a> {
    pub fn new(evaluator: &'a ScenarioEvaluator, parallel: bool) -> Self {
        Self { evaluator, parallel }
    }

    /// Elevator-only, rocket-only and the cheapest split under both regimes.
    pub fn compare(&self, total_material: f64, step: f64) -> ModelResult<Vec<RegimeComparisonRow>> {
        let _timing = logging::start_timing(
            "regime_comparison",
            OperationCategory::Optimization { subcategory: OptimizationType::RegimeComparison },
        );
        let optimizer = RatioOptimizer::new(self.evaluator, self.parallel);
        let mut per_regime = Vec::with_capacity(2);
        for regime in [ReliabilityRegime::Idealized, ReliabilityRegime::Measured] {
            let economics = self.evaluator.economics(regime)?;
            let elevator = self.evaluator.evaluate_single_mode_with(&economics, TransportMode::ElevatorTug, total_material)?;
            let rocket = self.evaluator.evaluate_single_mode_with(&economics, TransportMode::GroundRocket, total_material)?;
            let best = optimizer.minimize_cost_with(&economics, total_material, step)?;
            let combined = optimizer.to_scenario(&economics, &best, None)?;
            per_regime.push([elevator, rocket, combined]);
        }

        let plans = ["Space Elevator Only", "Traditional Rockets Only", "Cost-Optimal Combination"];
        let rows: Vec<RegimeComparisonRow> = plans
            .iter()
            .enumerate()
            .map(|(i, plan)| RegimeComparisonRow::new(plan, &per_regime[0][i], &per_regime[1][i]))
            .collect();
        for row in &rows {
            info!(plan = %row.plan, year_delta = row.year_delta, cost_delta_percent = row.cost_delta_percent, "reliability impact");
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::config::constants::TOTAL_MATERIAL;
    use crate::config::simulation_config::PhysicalConstants;

    #[test]
    fn test_measured_regime_is_never_better() {
        let evaluator = ScenarioEvaluator::new(Arc::new(PhysicalConstants::default()));
        let rows = RegimeComparison::new(&evaluator, false).compare(TOTAL_MATERIAL, 0.01).unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row.year_delta >= 0);
            assert!(row.cost_delta > 0.0);
        }
        assert_eq!(rows[0].idealized_years, 187);
        assert_eq!(rows[0].measured_years, 191);
        assert_eq!(rows[1].idealized_years, 40);
        assert_eq!(rows[1].measured_years, 43);
        assert!((rows[1].cost_delta_percent - (1.0 / 0.95 - 1.0) * 100.0).abs() < 1e-9);
    }
}
