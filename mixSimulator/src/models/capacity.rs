use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::config::regime::ReliabilityRegime;
use crate::config::simulation_config::PhysicalConstants;
use crate::core::availability::AvailabilityResult;
use crate::error::{ModelError, ModelResult};
use crate::utils::logging::{self, EconomicsType, OperationCategory};
use super::transport_mode::TransportMode;

/// Annual throughput of one mode, in tonnes per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    pub mode: TransportMode,
    pub theoretical: f64,
    pub effective: f64, // theoretical derated by compound reliability
}

pub struct CapacityModel {
    constants: Arc<PhysicalConstants>,
}

impl CapacityModel {
    pub fn new(constants: Arc<PhysicalConstants>) -> Self {
        Self { constants }
    }

    pub fn theoretical_capacity(&self, mode: TransportMode) -> ModelResult<f64> {
        let theoretical = match mode {
            TransportMode::ElevatorTug => {
                let elevator = &self.constants.elevator;
                elevator.harbors as f64 * elevator.annual_capacity_per_harbor
            }
            TransportMode::GroundRocket => {
                let rocket = &self.constants.rocket;
                rocket.launch_sites as f64 * rocket.launches_per_site_per_year as f64 * rocket.payload_avg()
            }
        };
        if !theoretical.is_finite() || theoretical <= 0.0 {
            return Err(ModelError::InvalidPhysicalParameters(format!(
                "{} capacity must be positive, got {}",
                mode, theoretical
            )));
        }
        Ok(theoretical)
    }

    pub fn effective_capacity(&self, mode: TransportMode, regime: ReliabilityRegime) -> ModelResult<Capacity> {
        let _timing = logging::start_timing(
            "effective_capacity",
            OperationCategory::Economics { subcategory: EconomicsType::Capacity },
        );
        let reliability = self.constants.reliability.get(regime);
        reliability.validate()?;
        let theoretical = self.theoretical_capacity(mode)?;
        let derating = match mode {
            TransportMode::ElevatorTug => reliability.elevator_chain(),
            TransportMode::GroundRocket => reliability.rocket,
        };
        Ok(Capacity {
            mode,
            theoretical,
            effective: theoretical * derating,
        })
    }

    /// Elevator capacity with the simulated availability correction in place
    /// of the fixed elevator reliability. The tug stays derated by its own
    /// reliability.
    pub fn elevator_capacity_with_availability(
        &self,
        regime: ReliabilityRegime,
        availability: &AvailabilityResult,
    ) -> ModelResult<Capacity> {
        let _timing = logging::start_timing(
            "capacity_with_availability",
            OperationCategory::Economics { subcategory: EconomicsType::Capacity },
        );
        let reliability = self.constants.reliability.get(regime);
        reliability.validate()?;
        let theoretical = self.theoretical_capacity(TransportMode::ElevatorTug)?;
        let factor = availability.throughput_factor();
        if !(0.0..=1.0).contains(&factor) {
            return Err(ModelError::out_of_range("availability_factor", factor, "must lie in [0, 1]"));
        }
        let effective = theoretical * factor * reliability.tug;
        if effective <= 0.0 {
            return Err(ModelError::InvalidPhysicalParameters(
                "elevator is never available under the simulated wind regime".to_string(),
            ));
        }
        Ok(Capacity {
            mode: TransportMode::ElevatorTug,
            theoretical,
            effective,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> CapacityModel {
        CapacityModel::new(Arc::new(PhysicalConstants::default()))
    }

    #[test]
    fn test_elevator_capacity() {
        let cap = model().effective_capacity(TransportMode::ElevatorTug, ReliabilityRegime::Measured).unwrap();
        assert_eq!(cap.theoretical, 537_000.0);
        assert!((cap.effective - 526_313.7).abs() < 1e-6);
    }

    #[test]
    fn test_rocket_capacity() {
        let cap = model().effective_capacity(TransportMode::GroundRocket, ReliabilityRegime::Measured).unwrap();
        assert_eq!(cap.theoretical, 2_500_000.0);
        assert!((cap.effective - 2_375_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_effective_never_exceeds_theoretical() {
        let m = model();
        for regime in ReliabilityRegime::ALL {
            for mode in TransportMode::ALL {
                let cap = m.effective_capacity(mode, regime).unwrap();
                assert!(cap.effective <= cap.theoretical);
                let equal = cap.effective == cap.theoretical;
                assert_eq!(equal, regime == ReliabilityRegime::Idealized);
            }
        }
    }

    #[test]
    fn test_zero_sites_is_rejected() {
        let mut constants = PhysicalConstants::default();
        constants.rocket.launch_sites = 0;
        let m = CapacityModel::new(Arc::new(constants));
        assert!(matches!(
            m.effective_capacity(TransportMode::GroundRocket, ReliabilityRegime::Measured),
            Err(ModelError::InvalidPhysicalParameters(_))
        ));
    }

    #[test]
    fn test_availability_correction_replaces_elevator_reliability() {
        let availability = AvailabilityResult {
            trial_count: 100,
            availability: 0.9,
            average_effective_success_rate: 0.8,
            corrected_throughput: 3.0 * 50.0 * 0.9 * 0.8 * 0.95,
            maintenance_downtime: 0.05,
        };
        let cap = model()
            .elevator_capacity_with_availability(ReliabilityRegime::Measured, &availability)
            .unwrap();
        let expected = 537_000.0 * 0.9 * 0.8 * 0.95 * 0.99;
        assert!((cap.effective - expected).abs() < 1e-6);
        assert!(cap.effective <= cap.theoretical);
    }
}
