use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::const_funcs::{calc_completion_year, calc_years_needed};
use crate::config::regime::ReliabilityRegime;
use crate::config::simulation_config::PhysicalConstants;
use crate::core::availability::AvailabilityResult;
use crate::error::{ModelError, ModelResult};
use crate::models::capacity::{Capacity, CapacityModel};
use crate::models::transport_mode::TransportMode;
use crate::models::unit_economics::UnitEconomicsDeriver;
use crate::utils::logging::{self, EconomicsType, OperationCategory};
use crate::utils::traits::{opt_field, FlatRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    SingleMode(TransportMode),
    Combined,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::SingleMode(mode) => write!(f, "{}", mode),
            ScenarioKind::Combined => write!(f, "combined"),
        }
    }
}

/// A fully evaluated transport plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub kind: ScenarioKind,
    pub regime: ReliabilityRegime,
    pub years_needed: u32,
    pub completion_year: u32,
    pub total_cost: f64,
    pub annual_capacity: f64,
    pub elevator_ratio: Option<f64>,
    pub rocket_ratio: Option<f64>,
    pub elevator_material: Option<f64>,
    pub rocket_material: Option<f64>,
    pub time_limit: Option<u32>,
}

impl FlatRecord for Scenario {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("kind", self.kind.to_string()),
            ("regime", self.regime.to_string()),
            ("years_needed", self.years_needed.to_string()),
            ("completion_year", self.completion_year.to_string()),
            ("total_cost", self.total_cost.to_string()),
            ("annual_capacity", self.annual_capacity.to_string()),
            ("elevator_ratio", opt_field(self.elevator_ratio)),
            ("rocket_ratio", opt_field(self.rocket_ratio)),
            ("elevator_material", opt_field(self.elevator_material)),
            ("rocket_material", opt_field(self.rocket_material)),
            ("time_limit", opt_field(self.time_limit)),
        ]
    }
}

/// Years and cost contributed by one mode carrying part of the demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub material: f64,
    pub years: u32,
    pub cost: f64,
}

/// Unit cost and effective capacity of one mode, resolved once per regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeEconomics {
    pub mode: TransportMode,
    pub cost_per_ton: f64,
    pub capacity: Capacity,
}

impl ModeEconomics {
    /// An empty leg takes no time and costs nothing.
    pub fn leg(&self, material: f64) -> ModelResult<Leg> {
        if material <= 0.0 {
            return Ok(Leg { material: 0.0, years: 0, cost: 0.0 });
        }
        Ok(Leg {
            material,
            years: calc_years_needed(material, self.capacity.effective)?,
            cost: material * self.cost_per_ton,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeEconomics {
    pub regime: ReliabilityRegime,
    pub start_year: u32,
    pub elevator: ModeEconomics,
    pub rocket: ModeEconomics,
}

impl RegimeEconomics {
    pub fn get(&self, mode: TransportMode) -> &ModeEconomics {
        match mode {
            TransportMode::ElevatorTug => &self.elevator,
            TransportMode::GroundRocket => &self.rocket,
        }
    }
}

pub fn validate_material(total_material: f64) -> ModelResult<()> {
    if !total_material.is_finite() || total_material < 0.0 {
        return Err(ModelError::out_of_range(
            "material_demand",
            total_material,
            "must be finite and non-negative",
        ));
    }
    Ok(())
}

/// Evaluates single-mode scenarios and resolves the per-regime economics the
/// optimizer works from.
pub struct ScenarioEvaluator {
    constants: Arc<PhysicalConstants>,
    deriver: UnitEconomicsDeriver,
    capacity: CapacityModel,
}

impl ScenarioEvaluator {
    pub fn new(constants: Arc<PhysicalConstants>) -> Self {
        Self {
            deriver: UnitEconomicsDeriver::new(Arc::clone(&constants)),
            capacity: CapacityModel::new(Arc::clone(&constants)),
            constants,
        }
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn deriver(&self) -> &UnitEconomicsDeriver {
        &self.deriver
    }

    pub fn capacity_model(&self) -> &CapacityModel {
        &self.capacity
    }

    pub fn economics(&self, regime: ReliabilityRegime) -> ModelResult<RegimeEconomics> {
        let _timing = logging::start_timing(
            "resolve_economics",
            OperationCategory::Economics { subcategory: EconomicsType::UnitCost },
        );
        Ok(RegimeEconomics {
            regime,
            start_year: self.constants.start_year,
            elevator: self.mode_economics(TransportMode::ElevatorTug, regime)?,
            rocket: self.mode_economics(TransportMode::GroundRocket, regime)?,
        })
    }

    /// Same as [`economics`](Self::economics) but with the elevator capacity
    /// taken from a wind availability simulation.
    pub fn economics_with_availability(
        &self,
        regime: ReliabilityRegime,
        availability: &AvailabilityResult,
    ) -> ModelResult<RegimeEconomics> {
        let mut economics = self.economics(regime)?;
        economics.elevator.capacity = self.capacity.elevator_capacity_with_availability(regime, availability)?;
        debug!(
            effective = economics.elevator.capacity.effective,
            availability = availability.availability,
            "elevator capacity corrected for availability"
        );
        Ok(economics)
    }

    pub fn evaluate_single_mode(
        &self,
        mode: TransportMode,
        regime: ReliabilityRegime,
        total_material: f64,
    ) -> ModelResult<Scenario> {
        let economics = self.economics(regime)?;
        self.evaluate_single_mode_with(&economics, mode, total_material)
    }

    pub fn evaluate_single_mode_with(
        &self,
        economics: &RegimeEconomics,
        mode: TransportMode,
        total_material: f64,
    ) -> ModelResult<Scenario> {
        let _timing = logging::start_timing(
            "evaluate_single_mode",
            OperationCategory::Economics { subcategory: EconomicsType::Scenario },
        );
        validate_material(total_material)?;
        let mode_economics = economics.get(mode);
        let leg = mode_economics.leg(total_material)?;

        let (elevator_material, rocket_material) = match mode {
            TransportMode::ElevatorTug => (leg.material, 0.0),
            TransportMode::GroundRocket => (0.0, leg.material),
        };
        let scenario = Scenario {
            name: mode.scenario_name().to_string(),
            kind: ScenarioKind::SingleMode(mode),
            regime: economics.regime,
            years_needed: leg.years,
            completion_year: calc_completion_year(economics.start_year, leg.years)?,
            total_cost: leg.cost,
            annual_capacity: mode_economics.capacity.effective,
            elevator_ratio: None,
            rocket_ratio: None,
            elevator_material: Some(elevator_material),
            rocket_material: Some(rocket_material),
            time_limit: None,
        };
        debug!(%mode, regime = %economics.regime, years = scenario.years_needed, cost = scenario.total_cost, "evaluated scenario");
        Ok(scenario)
    }

    fn mode_economics(&self, mode: TransportMode, regime: ReliabilityRegime) -> ModelResult<ModeEconomics> {
        Ok(ModeEconomics {
            mode,
            cost_per_ton: self.deriver.derive_unit_cost(mode, regime)?.cost_per_ton,
            capacity: self.capacity.effective_capacity(mode, regime)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::TOTAL_MATERIAL;

    fn evaluator() -> ScenarioEvaluator {
        ScenarioEvaluator::new(Arc::new(PhysicalConstants::default()))
    }

    #[test]
    fn test_elevator_only_measured() {
        let s = evaluator()
            .evaluate_single_mode(TransportMode::ElevatorTug, ReliabilityRegime::Measured, TOTAL_MATERIAL)
            .unwrap();
        // 1e8 / 526,313.7 = 190.00075, rounded up
        assert_eq!(s.years_needed, 191);
        assert_eq!(s.completion_year, 2241);
        assert_eq!(s.name, "Space Elevator Only");
    }

    #[test]
    fn test_rocket_only_measured() {
        let s = evaluator()
            .evaluate_single_mode(TransportMode::GroundRocket, ReliabilityRegime::Measured, TOTAL_MATERIAL)
            .unwrap();
        assert_eq!(s.years_needed, 43);
        assert_eq!(s.completion_year, 2093);
        assert!((s.total_cost - TOTAL_MATERIAL * 1600.0 / 0.95).abs() < 1e-3);
        assert_eq!(s.annual_capacity, 2_375_000.0);
    }

    #[test]
    fn test_idealized_rocket_divides_exactly() {
        let s = evaluator()
            .evaluate_single_mode(TransportMode::GroundRocket, ReliabilityRegime::Idealized, TOTAL_MATERIAL)
            .unwrap();
        assert_eq!(s.years_needed, 40);
    }

    #[test]
    fn test_years_monotone_in_material() {
        let e = evaluator();
        let economics = e.economics(ReliabilityRegime::Measured).unwrap();
        let mut previous = 0;
        for material in [0.0, 1.0, 5e5, 5.3e5, 1e7, 1e8, 2e8] {
            let s = e.evaluate_single_mode_with(&economics, TransportMode::ElevatorTug, material).unwrap();
            assert!(s.years_needed >= previous);
            previous = s.years_needed;
        }
    }

    #[test]
    fn test_years_monotone_in_capacity() {
        let mut previous = u32::MAX;
        for harbors in 1..=6 {
            let mut constants = PhysicalConstants::default();
            constants.elevator.harbors = harbors;
            let s = ScenarioEvaluator::new(Arc::new(constants))
                .evaluate_single_mode(TransportMode::ElevatorTug, ReliabilityRegime::Measured, TOTAL_MATERIAL)
                .unwrap();
            assert!(s.years_needed <= previous);
            previous = s.years_needed;
        }
    }

    #[test]
    fn test_zero_material_takes_no_time() {
        let s = evaluator()
            .evaluate_single_mode(TransportMode::GroundRocket, ReliabilityRegime::Measured, 0.0)
            .unwrap();
        assert_eq!(s.years_needed, 0);
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.completion_year, 2050);
    }

    #[test]
    fn test_negative_material_is_rejected() {
        let err = evaluator()
            .evaluate_single_mode(TransportMode::GroundRocket, ReliabilityRegime::Measured, -1.0)
            .unwrap_err();
        assert!(matches!(err, ModelError::ConfigurationOutOfRange { .. }));
    }

    #[test]
    fn test_unrepresentable_duration_is_rejected() {
        let e = evaluator();
        let err = e
            .evaluate_single_mode(TransportMode::ElevatorTug, ReliabilityRegime::Measured, 1e16)
            .unwrap_err();
        assert!(matches!(err, ModelError::ConfigurationOutOfRange { .. }));

        // Years fit in u32 but the completion year does not
        let economics = e.economics(ReliabilityRegime::Measured).unwrap();
        let capacity = economics.elevator.capacity.effective;
        let material = (u32::MAX - 1_000) as f64 * capacity;
        assert!(economics.elevator.leg(material).is_ok());
        let err = e
            .evaluate_single_mode_with(&economics, TransportMode::ElevatorTug, material)
            .unwrap_err();
        assert!(matches!(err, ModelError::ConfigurationOutOfRange { .. }));
    }

    #[test]
    fn test_availability_correction_slows_elevator() {
        let e = evaluator();
        let availability = AvailabilityResult {
            trial_count: 10,
            availability: 0.5,
            average_effective_success_rate: 0.5,
            corrected_throughput: 0.0,
            maintenance_downtime: 0.0,
        };
        let plain = e.economics(ReliabilityRegime::Measured).unwrap();
        let corrected = e.economics_with_availability(ReliabilityRegime::Measured, &availability).unwrap();
        assert!(corrected.elevator.capacity.effective < plain.elevator.capacity.effective);
        assert_eq!(corrected.rocket, plain.rocket);
        assert_eq!(corrected.elevator.cost_per_ton, plain.elevator.cost_per_ton);
    }

    #[test]
    fn test_flat_record_columns() {
        let s = evaluator()
            .evaluate_single_mode(TransportMode::GroundRocket, ReliabilityRegime::Idealized, 1000.0)
            .unwrap();
        let fields = s.fields();
        assert_eq!(fields[0], ("name", "Traditional Rockets Only".to_string()));
        assert!(fields.iter().any(|(k, v)| *k == "time_limit" && v.is_empty()));
    }
}
