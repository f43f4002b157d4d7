use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;
use crate::config::regime::{RegimeTable, ReliabilityRegime};
use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevatorParams {
    pub harbors: u32,
    pub annual_capacity_per_harbor: f64, // tonnes per year
    pub cost_per_ton: f64,               // USD per tonne lifted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TugParams {
    pub delta_v: f64,            // m/s
    pub specific_impulse: f64,   // s
    pub dry_mass_ratio: f64,     // dry mass over payload
    pub fuel_cost_per_ton: f64,  // USD
    pub vehicle_cost: f64,       // USD
    pub reuse_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketParams {
    pub launch_sites: u32,
    pub launches_per_site_per_year: u32,
    pub payload_min: f64,        // tonnes
    pub payload_max: f64,        // tonnes
    pub cost_per_launch: f64,    // USD
    pub consumption_factor: f64,
    pub reuse_count: u32,
    pub vehicle_cost: f64,       // USD
}

impl RocketParams {
    pub fn payload_avg(&self) -> f64 {
        (self.payload_min + self.payload_max) / 2.0
    }
}

/// Immutable engineering constants shared by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    pub g0: f64,
    pub start_year: u32,
    pub elevator: ElevatorParams,
    pub tug: TugParams,
    pub rocket: RocketParams,
    pub reliability: RegimeTable,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            g0: G_0,
            start_year: START_YEAR,
            elevator: ElevatorParams {
                harbors: GALACTIC_HARBORS,
                annual_capacity_per_harbor: ELEVATOR_ANNUAL_CAPACITY,
                cost_per_ton: ELEVATOR_COST_PER_TON,
            },
            tug: TugParams {
                delta_v: TUG_DELTA_V,
                specific_impulse: TUG_I_SP,
                dry_mass_ratio: TUG_DRY_MASS_RATIO,
                fuel_cost_per_ton: TUG_COST_FUEL_PER_TON,
                vehicle_cost: TUG_COST_VEHICLE,
                reuse_count: TUG_REUSE_COUNT,
            },
            rocket: RocketParams {
                launch_sites: ROCKET_LAUNCH_SITES,
                launches_per_site_per_year: ROCKET_LAUNCHES_PER_YEAR_PER_SITE,
                payload_min: ROCKET_PAYLOAD_MIN,
                payload_max: ROCKET_PAYLOAD_MAX,
                cost_per_launch: ROCKET_COST_PER_LAUNCH,
                consumption_factor: ROCKET_CONSUMPTION_FACTOR,
                reuse_count: ROCKET_REUSE_COUNT,
                vehicle_cost: ROCKET_COST_VEHICLE,
            },
            reliability: RegimeTable::default(),
        }
    }
}

/// Parameters of the wind/sway availability model for the elevator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    pub coupling_coefficient: f64, // rad per m/s
    pub critical_sway_angle: f64,  // rad
    pub safe_wind_speed: f64,      // m/s
    pub weibull_shape: f64,
    pub weibull_scale: f64,        // m/s
    pub sway_noise_std: f64,       // rad
    pub success_noise_std: f64,
    pub nominal_success_rate: f64,
    pub cable_count: u32,
    pub per_trip_payload: f64,     // tonnes
    pub maintenance_downtime: f64, // fraction of time offline
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            coupling_coefficient: SWAY_COUPLING,
            critical_sway_angle: CRITICAL_SWAY_ANGLE,
            safe_wind_speed: SAFE_WIND_SPEED,
            weibull_shape: WEIBULL_SHAPE,
            weibull_scale: WEIBULL_SCALE,
            sway_noise_std: SWAY_NOISE_STD,
            success_noise_std: SUCCESS_NOISE_STD,
            nominal_success_rate: ELEVATOR_BASE_SUCCESS_RATE,
            cable_count: ELEVATOR_CABLES,
            per_trip_payload: ELEVATOR_TRIP_PAYLOAD,
            maintenance_downtime: MAINTENANCE_DOWNTIME,
        }
    }
}

/// Pollutant emitted by ground rocket exhaust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    BlackCarbon,
    Alumina,
    WaterVapour,
    NitrogenOxides,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [
        Pollutant::BlackCarbon,
        Pollutant::Alumina,
        Pollutant::WaterVapour,
        Pollutant::NitrogenOxides,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Pollutant::BlackCarbon => "BC",
            Pollutant::Alumina => "Al2O3",
            Pollutant::WaterVapour => "H2O",
            Pollutant::NitrogenOxides => "NOx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantFactor {
    pub pollutant: Pollutant,
    pub emission_factor: f64, // g per kg of propellant
    pub weight: f64,          // relative environmental impact
}

/// Grid carbon intensity scenario for the electricity driving the elevator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonScenario {
    pub name: String,
    pub carbon_intensity: f64, // kgCO2e per kWh
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalConfig {
    pub ground_delta_v: f64,          // m/s
    pub ground_specific_impulse: f64, // s
    pub structural_fraction: f64,
    pub pollutants: Vec<PollutantFactor>,
    pub elevator_energy_per_ton: f64, // kWh per tonne
    pub carbon_scenarios: Vec<CarbonScenario>,
    pub sweep_points: usize,
}

impl Default for EnvironmentalConfig {
    fn default() -> Self {
        let factor = |pollutant, emission_factor, weight| PollutantFactor { pollutant, emission_factor, weight };
        let scenario = |name: &str, carbon_intensity| CarbonScenario { name: name.to_string(), carbon_intensity };
        Self {
            ground_delta_v: GROUND_DELTA_V,
            ground_specific_impulse: GROUND_I_SP,
            structural_fraction: GROUND_STRUCTURAL_FRACTION,
            pollutants: vec![
                factor(Pollutant::BlackCarbon, BC_EMISSION_FACTOR, BC_WEIGHT),
                factor(Pollutant::Alumina, AL2O3_EMISSION_FACTOR, AL2O3_WEIGHT),
                factor(Pollutant::WaterVapour, H2O_EMISSION_FACTOR, H2O_WEIGHT),
                factor(Pollutant::NitrogenOxides, NOX_EMISSION_FACTOR, NOX_WEIGHT),
            ],
            elevator_energy_per_ton: ELEVATOR_ENERGY_PER_TON,
            carbon_scenarios: vec![
                scenario("S1", CARBON_INTENSITY_S1),
                scenario("S2", CARBON_INTENSITY_S2),
                scenario("S3", CARBON_INTENSITY_S3),
            ],
            sweep_points: ENVIRONMENTAL_SWEEP_POINTS,
        }
    }
}

/// Options for one run of the binary. Every field may be supplied by a JSON
/// file and overridden on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub regime: ReliabilityRegime,
    pub material_demand: f64,
    pub extra_material: f64,
    pub step: f64,
    pub time_limits: Vec<u32>,
    pub trial_count: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub availability: AvailabilityConfig,
    pub environment: EnvironmentalConfig,
    pub constants: PhysicalConstants,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            regime: ReliabilityRegime::Measured,
            material_demand: TOTAL_MATERIAL,
            extra_material: DEFAULT_EXTRA_MATERIAL,
            step: DEFAULT_RATIO_STEP,
            time_limits: default_time_limits(),
            trial_count: MC_TRIALS,
            seed: None,
            parallel: true,
            availability: AvailabilityConfig::default(),
            environment: EnvironmentalConfig::default(),
            constants: PhysicalConstants::default(),
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Base demand plus any extra material.
    pub fn total_material(&self) -> f64 {
        self.material_demand + self.extra_material
    }

    pub fn validate(&self) -> ModelResult<()> {
        let total = self.total_material();
        if !total.is_finite() || total < 0.0 {
            return Err(ModelError::out_of_range("material_demand", total, "must be finite and non-negative"));
        }
        if !(self.step > 0.0 && self.step <= 1.0) {
            return Err(ModelError::out_of_range("step", self.step, "must lie in (0, 1]"));
        }
        if self.trial_count < 1 {
            return Err(ModelError::InvalidSampleSize(self.trial_count));
        }
        Ok(())
    }
}

pub fn default_time_limits() -> Vec<u32> {
    (DEFAULT_TIME_LIMIT_MIN..=DEFAULT_TIME_LIMIT_MAX)
        .step_by(DEFAULT_TIME_LIMIT_STEP as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_time_limits_span_four_centuries() {
        let limits = default_time_limits();
        assert_eq!(limits.first(), Some(&10));
        assert_eq!(limits.last(), Some(&400));
        assert_eq!(limits.len(), 40);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"regime": "idealized", "step": 0.02, "seed": 7}"#).unwrap();
        assert_eq!(config.regime, ReliabilityRegime::Idealized);
        assert_eq!(config.step, 0.02);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.material_demand, TOTAL_MATERIAL);
        assert_eq!(config.constants, PhysicalConstants::default());
    }

    #[test]
    fn test_validate_rejects_bad_step_and_trials() {
        let mut config = RunConfig::default();
        assert!(config.validate().is_ok());
        config.step = 0.0;
        assert!(matches!(config.validate(), Err(ModelError::ConfigurationOutOfRange { .. })));
        config.step = 0.05;
        config.trial_count = 0;
        assert_eq!(config.validate(), Err(ModelError::InvalidSampleSize(0)));
    }

    #[test]
    fn test_extra_material_adds_to_demand() {
        let config = RunConfig { extra_material: 5_000_000.0, ..RunConfig::default() };
        assert_eq!(config.total_material(), 105_000_000.0);
    }

    #[test]
    fn test_rocket_payload_average() {
        assert_eq!(PhysicalConstants::default().rocket.payload_avg(), 125.0);
    }
}
