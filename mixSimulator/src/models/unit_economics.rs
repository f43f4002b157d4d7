use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::const_funcs::{calc_mass_ratio, calc_propellant_fraction, calc_total_mass_multiplier};
use crate::config::regime::ReliabilityRegime;
use crate::config::simulation_config::PhysicalConstants;
use crate::error::{ModelError, ModelResult};
use super::transport_mode::TransportMode;

/// Cost of delivering one tonne of payload with a given mode under a given regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    pub mode: TransportMode,
    pub regime: ReliabilityRegime,
    pub cost_per_ton: f64,
}

/// Mass budget of the orbital tug per tonne of payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TugMassBudget {
    pub mass_ratio: f64,
    pub propellant_fraction: f64,
    pub total_mass_multiplier: f64,
}

/// Derives per-tonne transport cost from the engineering constants.
///
/// Dividing by the compound success probability is a deterministic derating
/// standing in for the expected cost of lost loads. No failure or retry is
/// ever simulated.
pub struct UnitEconomicsDeriver {
    constants: Arc<PhysicalConstants>,
    cache: RwLock<HashMap<(TransportMode, ReliabilityRegime), UnitCost>>,
}

impl UnitEconomicsDeriver {
    pub fn new(constants: Arc<PhysicalConstants>) -> Self {
        Self {
            constants,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn tug_mass_budget(&self) -> ModelResult<TugMassBudget> {
        let tug = &self.constants.tug;
        if self.constants.g0 <= 0.0 || tug.specific_impulse <= 0.0 {
            return Err(ModelError::InvalidPhysicalParameters(format!(
                "g0 ({}) and tug Isp ({}) must be positive",
                self.constants.g0, tug.specific_impulse
            )));
        }
        let mass_ratio = calc_mass_ratio(tug.delta_v, tug.specific_impulse, self.constants.g0);
        if !mass_ratio.is_finite() || mass_ratio <= 1.0 {
            return Err(ModelError::InvalidPhysicalParameters(format!(
                "tug mass ratio must exceed 1, got {} (delta-v {} m/s)",
                mass_ratio, tug.delta_v
            )));
        }
        let propellant_fraction = calc_propellant_fraction(mass_ratio, tug.dry_mass_ratio);
        Ok(TugMassBudget {
            mass_ratio,
            propellant_fraction,
            total_mass_multiplier: calc_total_mass_multiplier(propellant_fraction, tug.dry_mass_ratio),
        })
    }

    /// Per-tonne cost for `mode` under `regime`, memoised per regime.
    pub fn derive_unit_cost(&self, mode: TransportMode, regime: ReliabilityRegime) -> ModelResult<UnitCost> {
        if let Some(cached) = self.cache.read().get(&(mode, regime)) {
            return Ok(*cached);
        }

        let cost_per_ton = match mode {
            TransportMode::ElevatorTug => self.elevator_cost_per_ton(regime)?,
            TransportMode::GroundRocket => self.rocket_cost_per_ton(regime)?,
        };
        if !cost_per_ton.is_finite() || cost_per_ton <= 0.0 {
            return Err(ModelError::InvalidPhysicalParameters(format!(
                "{} unit cost must be positive, got {}",
                mode, cost_per_ton
            )));
        }

        let unit_cost = UnitCost { mode, regime, cost_per_ton };
        debug!(%mode, %regime, cost_per_ton, "derived unit cost");
        self.cache.write().insert((mode, regime), unit_cost);
        Ok(unit_cost)
    }

    fn elevator_cost_per_ton(&self, regime: ReliabilityRegime) -> ModelResult<f64> {
        let reliability = self.constants.reliability.get(regime);
        reliability.validate()?;
        let tug = &self.constants.tug;
        if tug.reuse_count == 0 {
            return Err(ModelError::InvalidPhysicalParameters(
                "tug reuse count must be at least 1".to_string(),
            ));
        }
        let budget = self.tug_mass_budget()?;

        let lift = self.constants.elevator.cost_per_ton * budget.total_mass_multiplier;
        let fuel = tug.fuel_cost_per_ton * budget.propellant_fraction;
        let amortised_vehicle = tug.vehicle_cost / tug.reuse_count as f64;
        Ok((lift + fuel + amortised_vehicle) / reliability.elevator_chain())
    }

    fn rocket_cost_per_ton(&self, regime: ReliabilityRegime) -> ModelResult<f64> {
        let reliability = self.constants.reliability.get(regime);
        reliability.validate()?;
        let rocket = &self.constants.rocket;
        let payload = rocket.payload_avg();
        if payload <= 0.0 || rocket.reuse_count == 0 {
            return Err(ModelError::InvalidPhysicalParameters(format!(
                "rocket payload ({}) and reuse count ({}) must be positive",
                payload, rocket.reuse_count
            )));
        }
        Ok(rocket.consumption_factor * rocket.cost_per_launch
            / (payload * rocket.reuse_count as f64 * reliability.rocket))
    }
}
