use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::config::const_funcs::{calc_propellant_intensity, linspace, validate_ratio};
use crate::config::simulation_config::{CarbonScenario, EnvironmentalConfig, Pollutant};
use crate::core::scenario::validate_material;
use crate::error::{ModelError, ModelResult};
use crate::utils::logging::{self, OperationCategory};
use crate::utils::traits::FlatRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantEmission {
    pub pollutant: Pollutant,
    pub per_ton: f64, // kg per tonne of payload
    pub total: f64,   // kg
    pub weighted_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketImpact {
    pub payload: f64,
    pub propellant_intensity: f64,
    pub emissions: Vec<PollutantEmission>,
    pub total_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridImpactPoint {
    pub scenario: String,
    pub elevator_ratio: f64,
    pub rocket_impact: f64,
    pub elevator_impact: f64,
    pub total_impact: f64,
}

impl FlatRecord for HybridImpactPoint {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("scenario", self.scenario.clone()),
            ("elevator_ratio", self.elevator_ratio.to_string()),
            ("rocket_impact", self.rocket_impact.to_string()),
            ("elevator_impact", self.elevator_impact.to_string()),
            ("total_impact", self.total_impact.to_string()),
        ]
    }
}

/// Rocket-only, elevator-only and hybrid impacts for one demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSummary {
    pub rocket: RocketImpact,
    pub elevator: Vec<(String, f64)>,
    pub hybrid: Vec<HybridImpactPoint>,
}

/// Weighted atmospheric impact of rocket exhaust against the grid emissions
/// of powering the elevator.
pub struct EnvironmentalImpactModel {
    config: EnvironmentalConfig,
    g0: f64,
}

impl EnvironmentalImpactModel {
    pub fn new(config: EnvironmentalConfig, g0: f64) -> ModelResult<Self> {
        if config.ground_specific_impulse <= 0.0 || g0 <= 0.0 {
            return Err(ModelError::InvalidPhysicalParameters(format!(
                "ground rocket Isp ({}) and g0 ({}) must be positive",
                config.ground_specific_impulse, g0
            )));
        }
        if !(0.0..1.0).contains(&config.structural_fraction) {
            return Err(ModelError::out_of_range(
                "structural_fraction",
                config.structural_fraction,
                "must lie in [0, 1)",
            ));
        }
        if let Some(bad) = config.carbon_scenarios.iter().find(|s| s.carbon_intensity < 0.0) {
            return Err(ModelError::out_of_range(
                "carbon_intensity",
                bad.carbon_intensity,
                "must be non-negative",
            ));
        }
        Ok(Self { config, g0 })
    }

    pub fn config(&self) -> &EnvironmentalConfig {
        &self.config
    }

    /// Tonnes of propellant burned per tonne of payload delivered.
    pub fn propellant_intensity(&self) -> f64 {
        calc_propellant_intensity(
            self.config.ground_delta_v,
            self.config.ground_specific_impulse,
            self.config.structural_fraction,
            self.g0,
        )
    }

    pub fn rocket_impact(&self, payload: f64) -> RocketImpact {
        let gamma = self.propellant_intensity();
        let emissions: Vec<PollutantEmission> = self
            .config
            .pollutants
            .iter()
            .map(|factor| {
                let per_ton = factor.emission_factor / 1000.0 * gamma;
                PollutantEmission {
                    pollutant: factor.pollutant,
                    per_ton,
                    total: per_ton * payload,
                    weighted_impact: per_ton * factor.weight * payload,
                }
            })
            .collect();
        RocketImpact {
            payload,
            propellant_intensity: gamma,
            total_impact: emissions.iter().map(|e| e.weighted_impact).sum(),
            emissions,
        }
    }

    /// kgCO2e from the electricity used to lift `payload`.
    pub fn elevator_impact(&self, payload: f64, carbon_intensity: f64) -> f64 {
        payload * self.config.elevator_energy_per_ton * carbon_intensity
    }

    pub fn hybrid_impact(&self, total_material: f64, elevator_ratio: f64, scenario: &CarbonScenario) -> ModelResult<HybridImpactPoint> {
        validate_ratio(elevator_ratio)?;
        validate_material(total_material)?;
        let elevator_payload = total_material * elevator_ratio;
        let rocket_payload = total_material - elevator_payload;
        let rocket_impact = self.rocket_impact(rocket_payload).total_impact;
        let elevator_impact = self.elevator_impact(elevator_payload, scenario.carbon_intensity);
        Ok(HybridImpactPoint {
            scenario: scenario.name.clone(),
            elevator_ratio,
            rocket_impact,
            elevator_impact,
            total_impact: rocket_impact + elevator_impact,
        })
    }

    /// Hybrid impact at evenly spaced elevator ratios for every carbon scenario.
    pub fn sweep(&self, total_material: f64) -> ModelResult<Vec<HybridImpactPoint>> {
        let ratios = linspace(0.0, 1.0, self.config.sweep_points);
        let mut points = Vec::with_capacity(ratios.len() * self.config.carbon_scenarios.len());
        for scenario in &self.config.carbon_scenarios {
            for &ratio in &ratios {
                points.push(self.hybrid_impact(total_material, ratio, scenario)?);
            }
        }
        Ok(points)
    }

    pub fn summarize(&self, total_material: f64) -> ModelResult<EnvironmentalSummary> {
        let _timing = logging::start_timing("environmental_summary", OperationCategory::Environmental);
        validate_material(total_material)?;
        let rocket = self.rocket_impact(total_material);
        let elevator = self
            .config
            .carbon_scenarios
            .iter()
            .map(|s| (s.name.clone(), self.elevator_impact(total_material, s.carbon_intensity)))
            .collect();
        let hybrid = self.sweep(total_material)?;
        debug!(gamma = rocket.propellant_intensity, "propellant intensity");
        info!(rocket_impact = rocket.total_impact, hybrid_points = hybrid.len(), "environmental analysis complete");
        Ok(EnvironmentalSummary { rocket, elevator, hybrid })
    }
}
