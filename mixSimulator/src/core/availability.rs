//! Monte Carlo model of space elevator availability under wind loading.
//!
//! Each trial draws a wind speed from a Weibull distribution, derives the
//! cable sway angle from it plus Gaussian noise, and marks the elevator
//! available when both the angle and the wind speed are within limits. The
//! per-trip success probability is perturbed independently and gated by
//! availability.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::config::constants::{AVAILABILITY_SWEEP_POINTS, COUPLING_SWEEP, CRITICAL_ANGLE_SWEEP, SAFE_WIND_SWEEP};
use crate::config::const_funcs::linspace;
use crate::config::simulation_config::AvailabilityConfig;
use crate::error::{ModelError, ModelResult};
use crate::utils::logging::{self, OperationCategory, SimulationType};
use crate::utils::traits::FlatRecord;

/// One trial of the simulation. Only lives for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySample {
    pub wind_speed: f64,
    pub sway_angle: f64,
    pub available: bool,
    pub perturbed_success_rate: f64,
    pub effective_success_rate: f64,
}

/// Aggregate of a full simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub trial_count: usize,
    /// Long-run fraction of trials in which the elevator was usable (A_SE).
    pub availability: f64,
    pub average_effective_success_rate: f64,
    /// Cable-limited tonnes per cycle after availability, success and maintenance.
    pub corrected_throughput: f64,
    pub maintenance_downtime: f64,
}

impl AvailabilityResult {
    /// Fraction of nominal throughput left after wind, failures and maintenance.
    pub fn throughput_factor(&self) -> f64 {
        self.availability * self.average_effective_success_rate * (1.0 - self.maintenance_downtime)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityParameter {
    SafeWindSpeed,
    CriticalSwayAngle,
    CouplingCoefficient,
}

impl AvailabilityParameter {
    pub const ALL: [AvailabilityParameter; 3] = [
        AvailabilityParameter::SafeWindSpeed,
        AvailabilityParameter::CriticalSwayAngle,
        AvailabilityParameter::CouplingCoefficient,
    ];

    pub fn default_values(&self) -> Vec<f64> {
        let (min, max) = match self {
            AvailabilityParameter::SafeWindSpeed => SAFE_WIND_SWEEP,
            AvailabilityParameter::CriticalSwayAngle => CRITICAL_ANGLE_SWEEP,
            AvailabilityParameter::CouplingCoefficient => COUPLING_SWEEP,
        };
        linspace(min, max, AVAILABILITY_SWEEP_POINTS)
    }

    fn apply(&self, config: &mut AvailabilityConfig, value: f64) {
        match self {
            AvailabilityParameter::SafeWindSpeed => config.safe_wind_speed = value,
            AvailabilityParameter::CriticalSwayAngle => config.critical_sway_angle = value,
            AvailabilityParameter::CouplingCoefficient => config.coupling_coefficient = value,
        }
    }
}

impl FromStr for AvailabilityParameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe_wind_speed" | "v_safe" => Ok(AvailabilityParameter::SafeWindSpeed),
            "critical_sway_angle" | "phi_crit" => Ok(AvailabilityParameter::CriticalSwayAngle),
            "coupling_coefficient" | "k" => Ok(AvailabilityParameter::CouplingCoefficient),
            _ => Err(format!("Unknown availability parameter: {}", s)),
        }
    }
}

impl fmt::Display for AvailabilityParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityParameter::SafeWindSpeed => write!(f, "safe_wind_speed"),
            AvailabilityParameter::CriticalSwayAngle => write!(f, "critical_sway_angle"),
            AvailabilityParameter::CouplingCoefficient => write!(f, "coupling_coefficient"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySweepPoint {
    pub parameter: AvailabilityParameter,
    pub value: f64,
    pub availability: f64,
    pub corrected_throughput: f64,
}

impl FlatRecord for AvailabilitySweepPoint {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("parameter", self.parameter.to_string()),
            ("value", self.value.to_string()),
            ("availability", self.availability.to_string()),
            ("corrected_throughput", self.corrected_throughput.to_string()),
        ]
    }
}

impl FlatRecord for AvailabilityResult {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("trial_count", self.trial_count.to_string()),
            ("availability", self.availability.to_string()),
            ("average_effective_success_rate", self.average_effective_success_rate.to_string()),
            ("corrected_throughput", self.corrected_throughput.to_string()),
            ("maintenance_downtime", self.maintenance_downtime.to_string()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct AvailabilitySimulator {
    config: AvailabilityConfig,
    trial_count: usize,
    seed: Option<u64>,
}

impl AvailabilitySimulator {
    pub fn new(config: AvailabilityConfig, trial_count: usize, seed: Option<u64>) -> Self {
        Self { config, trial_count, seed }
    }

    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    pub fn simulate(&self) -> ModelResult<AvailabilityResult> {
        self.run(self.resolve_seed(), false).map(|(result, _)| result)
    }

    /// Like [`simulate`](Self::simulate) but also returns every trial, for
    /// wind/sway scatter output.
    pub fn simulate_with_samples(&self) -> ModelResult<(AvailabilityResult, Vec<AvailabilitySample>)> {
        self.run(self.resolve_seed(), true)
    }

    /// Re-runs the simulation for each value of `parameter`, holding the trial
    /// count, seed and every other parameter fixed.
    pub fn sweep(
        &self,
        parameter: AvailabilityParameter,
        values: &[f64],
        parallel: bool,
    ) -> ModelResult<Vec<AvailabilitySweepPoint>> {
        let _timing = logging::start_timing(
            "availability_sweep",
            OperationCategory::Simulation { subcategory: SimulationType::SensitivitySweep },
        );
        if let Some(bad) = values.iter().find(|v| v.is_nan()) {
            return Err(ModelError::out_of_range(&parameter.to_string(), *bad, "sweep values must be numbers"));
        }

        // Every swept value sees the same random stream
        let seed = self.resolve_seed();
        let evaluate = |value: &f64| -> ModelResult<AvailabilitySweepPoint> {
            let mut config = self.config.clone();
            parameter.apply(&mut config, *value);
            let simulator = AvailabilitySimulator::new(config, self.trial_count, Some(seed));
            let (result, _) = simulator.run(seed, false)?;
            Ok(AvailabilitySweepPoint {
                parameter,
                value: *value,
                availability: result.availability,
                corrected_throughput: result.corrected_throughput,
            })
        };

        let points = if parallel {
            values.par_iter().map(evaluate).collect::<ModelResult<Vec<_>>>()?
        } else {
            values.iter().map(evaluate).collect::<ModelResult<Vec<_>>>()?
        };
        info!(%parameter, points = points.len(), "availability sweep complete");
        Ok(points)
    }

    fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random::<u64>)
    }

    fn validate(&self) -> ModelResult<()> {
        if self.trial_count < 1 {
            return Err(ModelError::InvalidSampleSize(self.trial_count));
        }
        let c = &self.config;
        if !(c.weibull_shape > 0.0 && c.weibull_shape.is_finite()) {
            return Err(ModelError::out_of_range("weibull_shape", c.weibull_shape, "must be positive"));
        }
        if !(c.weibull_scale >= 0.0 && c.weibull_scale.is_finite()) {
            return Err(ModelError::out_of_range("weibull_scale", c.weibull_scale, "must be non-negative"));
        }
        for (name, std) in [("sway_noise_std", c.sway_noise_std), ("success_noise_std", c.success_noise_std)] {
            if !(std >= 0.0 && std.is_finite()) {
                return Err(ModelError::out_of_range(name, std, "must be non-negative"));
            }
        }
        if !c.coupling_coefficient.is_finite() {
            return Err(ModelError::out_of_range("coupling_coefficient", c.coupling_coefficient, "must be finite"));
        }
        // Infinite thresholds are legal and disable the corresponding check
        if c.critical_sway_angle.is_nan() {
            return Err(ModelError::out_of_range("critical_sway_angle", c.critical_sway_angle, "must be a number"));
        }
        if c.safe_wind_speed.is_nan() {
            return Err(ModelError::out_of_range("safe_wind_speed", c.safe_wind_speed, "must be a number"));
        }
        if !(0.0..=1.0).contains(&c.nominal_success_rate) {
            return Err(ModelError::out_of_range("nominal_success_rate", c.nominal_success_rate, "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&c.maintenance_downtime) {
            return Err(ModelError::out_of_range("maintenance_downtime", c.maintenance_downtime, "must lie in [0, 1]"));
        }
        if !(c.per_trip_payload >= 0.0 && c.per_trip_payload.is_finite()) {
            return Err(ModelError::out_of_range("per_trip_payload", c.per_trip_payload, "must be non-negative"));
        }
        Ok(())
    }

    fn run(&self, seed: u64, keep_samples: bool) -> ModelResult<(AvailabilityResult, Vec<AvailabilitySample>)> {
        self.validate()?;
        let _timing = logging::start_timing(
            "availability_simulation",
            OperationCategory::Simulation { subcategory: SimulationType::MonteCarlo },
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut samples = Vec::with_capacity(if keep_samples { self.trial_count } else { 0 });
        let mut available_count = 0usize;
        let mut effective_sum = 0.0;

        for _ in 0..self.trial_count {
            let sample = self.draw_trial(&mut rng);
            if sample.available {
                available_count += 1;
            }
            effective_sum += sample.effective_success_rate;
            if keep_samples {
                samples.push(sample);
            }
        }

        let trials = self.trial_count as f64;
        let availability = available_count as f64 / trials;
        let average_effective_success_rate = effective_sum / trials;
        let c = &self.config;
        let corrected_throughput = c.cable_count as f64
            * c.per_trip_payload
            * availability
            * average_effective_success_rate
            * (1.0 - c.maintenance_downtime);

        debug!(seed, trials = self.trial_count, availability, average_effective_success_rate, "availability run");
        Ok((
            AvailabilityResult {
                trial_count: self.trial_count,
                availability,
                average_effective_success_rate,
                corrected_throughput,
                maintenance_downtime: c.maintenance_downtime,
            },
            samples,
        ))
    }

    fn draw_trial(&self, rng: &mut StdRng) -> AvailabilitySample {
        let c = &self.config;
        let wind_speed = sample_weibull(rng, c.weibull_shape, c.weibull_scale);
        let sway_angle = c.coupling_coefficient * wind_speed + c.sway_noise_std * sample_standard_normal(rng);
        let available = sway_angle <= c.critical_sway_angle && wind_speed <= c.safe_wind_speed;
        let perturbed_success_rate =
            (c.nominal_success_rate + c.success_noise_std * sample_standard_normal(rng)).clamp(0.0, 1.0);
        let effective_success_rate = if available { perturbed_success_rate } else { 0.0 };

        AvailabilitySample {
            wind_speed,
            sway_angle,
            available,
            perturbed_success_rate,
            effective_success_rate,
        }
    }
}

/// Inverse-CDF draw from Weibull(shape, scale).
fn sample_weibull(rng: &mut StdRng, shape: f64, scale: f64) -> f64 {
    let u: f64 = rng.gen();
    scale * (-(1.0 - u).ln()).max(0.0).powf(1.0 / shape)
}

fn sample_standard_normal(rng: &mut StdRng) -> f64 {
    let u1 = rng.gen::<f64>().clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON);
    let u2: f64 = rng.gen();

    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
