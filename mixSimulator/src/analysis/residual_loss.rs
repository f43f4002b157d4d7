use serde::{Deserialize, Serialize};
use crate::config::const_funcs::calc_residual_loss;
use crate::config::simulation_config::PhysicalConstants;
use crate::error::ModelResult;
use crate::models::transport_mode::TransportMode;
use crate::utils::logging::{self, EconomicsType, OperationCategory};
use crate::utils::traits::FlatRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualLossPoint {
    pub mode: TransportMode,
    pub failure_mission: u32,
    pub loss: f64, // USD
}

impl FlatRecord for ResidualLossPoint {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", self.mode.to_string()),
            ("failure_mission", self.failure_mission.to_string()),
            ("loss", self.loss.to_string()),
        ]
    }
}

/// Vehicle value written off when a reusable vehicle is lost mid-life.
pub struct ResidualLossModel<'a> {
    constants: &'a PhysicalConstants,
}

impl<'a> ResidualLossModel<'a> {
    pub fn new(constants: &'a PhysicalConstants) -> Self {
        Self { constants }
    }

    /// The reusable vehicle of each mode: the orbital tug for the elevator chain.
    fn vehicle(&self, mode: TransportMode) -> (f64, u32) {
        match mode {
            TransportMode::ElevatorTug => (self.constants.tug.vehicle_cost, self.constants.tug.reuse_count),
            TransportMode::GroundRocket => (self.constants.rocket.vehicle_cost, self.constants.rocket.reuse_count),
        }
    }

    pub fn loss_at(&self, mode: TransportMode, failure_mission: u32) -> ModelResult<f64> {
        let (cost, reuse) = self.vehicle(mode);
        calc_residual_loss(cost, reuse, failure_mission)
    }

    /// Loss for a failure on each mission `1..=N` of the design life.
    pub fn curve(&self, mode: TransportMode) -> ModelResult<Vec<ResidualLossPoint>> {
        let _timing = logging::start_timing(
            "residual_loss_curve",
            OperationCategory::Economics { subcategory: EconomicsType::ResidualLoss },
        );
        let (cost, reuse) = self.vehicle(mode);
        (1..=reuse.max(1))
            .map(|n| {
                Ok(ResidualLossPoint {
                    mode,
                    failure_mission: n,
                    loss: calc_residual_loss(cost, reuse, n)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tug_curve() {
        let constants = PhysicalConstants::default();
        let curve = ResidualLossModel::new(&constants).curve(TransportMode::ElevatorTug).unwrap();
        assert_eq!(curve.len(), 50);
        assert_eq!(curve[0].loss, 20_000_000.0);
        assert_eq!(curve[49].loss, 400_000.0);
        assert!(curve.windows(2).all(|w| w[0].loss > w[1].loss));
    }

    #[test]
    fn test_rocket_curve() {
        let constants = PhysicalConstants::default();
        let model = ResidualLossModel::new(&constants);
        let curve = model.curve(TransportMode::GroundRocket).unwrap();
        assert_eq!(curve.len(), 20);
        assert_eq!(curve[0].loss, 10_000_000.0);
        assert_eq!(model.loss_at(TransportMode::GroundRocket, 20).unwrap(), 500_000.0);
    }

    #[test]
    fn test_zero_design_life_is_rejected() {
        let mut constants = PhysicalConstants::default();
        constants.rocket.reuse_count = 0;
        assert!(ResidualLossModel::new(&constants).curve(TransportMode::GroundRocket).is_err());
    }
}
