use clap::Parser;
use crate::config::regime::ReliabilityRegime;
use crate::config::simulation_config::RunConfig;

#[derive(Parser)]
#[command(author, version, about = "Space elevator and ground rocket transport mix optimizer", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "JSON run configuration; flags below override it")]
    config: Option<String>,

    #[arg(short, long, help = "Reliability regime: idealized or measured")]
    regime: Option<ReliabilityRegime>,

    #[arg(short, long, help = "Material demand in tonnes")]
    material: Option<f64>,

    #[arg(long, help = "Extra material in tonnes added on top of the demand")]
    extra_material: Option<f64>,

    #[arg(short, long, help = "Elevator ratio step, in (0, 1]")]
    step: Option<f64>,

    #[arg(long, value_delimiter = ',', help = "Comma-separated time limits in years")]
    time_limits: Option<Vec<u32>>,

    #[arg(short = 'n', long, help = "Monte Carlo trials for the availability model")]
    trials: Option<usize>,

    #[arg(long, help = "Random seed for deterministic simulation")]
    seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    no_parallel: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, help = "Write CSV and JSON results", default_value_t = false)]
    export_csv: bool,

    #[arg(short, long, default_value = "results")]
    output_dir: String,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn regime(&self) -> Option<ReliabilityRegime> {
        self.regime
    }

    pub fn material(&self) -> Option<f64> {
        self.material
    }

    pub fn extra_material(&self) -> Option<f64> {
        self.extra_material
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    pub fn time_limits(&self) -> Option<&[u32]> {
        self.time_limits.as_deref()
    }

    pub fn trials(&self) -> Option<usize> {
        self.trials
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn no_parallel(&self) -> bool {
        self.no_parallel
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn export_csv(&self) -> bool {
        self.export_csv
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Overlay every flag that was given onto `config`.
    pub fn apply_to(&self, config: &mut RunConfig) {
        if let Some(regime) = self.regime {
            config.regime = regime;
        }
        if let Some(material) = self.material {
            config.material_demand = material;
        }
        if let Some(extra) = self.extra_material {
            config.extra_material = extra;
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(limits) = &self.time_limits {
            config.time_limits = limits.clone();
        }
        if let Some(trials) = self.trials {
            config.trial_count = trials;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_parallel {
            config.parallel = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "spacelift",
            "--regime",
            "idealized",
            "--time-limits",
            "50,100",
            "--seed",
            "9",
            "--no-parallel",
        ]);
        let mut config = RunConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.regime, ReliabilityRegime::Idealized);
        assert_eq!(config.time_limits, vec![50, 100]);
        assert_eq!(config.seed, Some(9));
        assert!(!config.parallel);
        assert_eq!(config.step, RunConfig::default().step);
    }

    #[test]
    fn test_no_flags_keep_defaults() {
        let args = Args::parse_from(["spacelift"]);
        let mut config = RunConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config, RunConfig::default());
        assert_eq!(args.output_dir(), "results");
    }
}
