// Reliability regime module - named bundles of success probabilities
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;
use crate::error::{ModelError, ModelResult};

/// Selects which set of reliability assumptions an evaluation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityRegime {
    Idealized, // Every system succeeds on every trip
    Measured,  // Current demonstrated success rates
}

impl ReliabilityRegime {
    pub const ALL: [ReliabilityRegime; 2] = [ReliabilityRegime::Idealized, ReliabilityRegime::Measured];

    pub fn display_name(&self) -> &'static str {
        match self {
            ReliabilityRegime::Idealized => "Idealized (100% reliability)",
            ReliabilityRegime::Measured => "Measured reliability",
        }
    }
}

impl FromStr for ReliabilityRegime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idealized" | "ideal" | "1" => Ok(ReliabilityRegime::Idealized),
            "measured" | "current" | "2" => Ok(ReliabilityRegime::Measured),
            _ => Err(format!("Unknown reliability regime: {}", s)),
        }
    }
}

impl fmt::Display for ReliabilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReliabilityRegime::Idealized => write!(f, "idealized"),
            ReliabilityRegime::Measured => write!(f, "measured"),
        }
    }
}

/// Per-trip success probabilities for the three vehicles involved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilitySet {
    pub elevator: f64,
    pub tug: f64,
    pub rocket: f64,
}

impl ReliabilitySet {
    /// Compound success probability of the elevator+tug chain.
    pub fn elevator_chain(&self) -> f64 {
        self.elevator * self.tug
    }

    pub fn validate(&self) -> ModelResult<()> {
        for (name, value) in [("elevator", self.elevator), ("tug", self.tug), ("rocket", self.rocket)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ModelError::InvalidPhysicalParameters(format!(
                    "{} reliability must lie in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Lookup table from regime to its reliability set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable {
    pub idealized: ReliabilitySet,
    pub measured: ReliabilitySet,
}

impl RegimeTable {
    pub fn get(&self, regime: ReliabilityRegime) -> &ReliabilitySet {
        match regime {
            ReliabilityRegime::Idealized => &self.idealized,
            ReliabilityRegime::Measured => &self.measured,
        }
    }
}

impl Default for RegimeTable {
    fn default() -> Self {
        Self {
            idealized: ReliabilitySet {
                elevator: ELEVATOR_RELIABILITY_IDEAL,
                tug: TUG_RELIABILITY_IDEAL,
                rocket: ROCKET_RELIABILITY_IDEAL,
            },
            measured: ReliabilitySet {
                elevator: ELEVATOR_RELIABILITY_MEASURED,
                tug: TUG_RELIABILITY_MEASURED,
                rocket: ROCKET_RELIABILITY_MEASURED,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_round_trips_through_strings() {
        for regime in ReliabilityRegime::ALL {
            let parsed: ReliabilityRegime = regime.to_string().parse().unwrap();
            assert_eq!(parsed, regime);
        }
        assert_eq!("current".parse::<ReliabilityRegime>().unwrap(), ReliabilityRegime::Measured);
        assert!("optimistic".parse::<ReliabilityRegime>().is_err());
    }

    #[test]
    fn test_default_table_lookup() {
        let table = RegimeTable::default();
        assert_eq!(table.get(ReliabilityRegime::Idealized).elevator_chain(), 1.0);
        let measured = table.get(ReliabilityRegime::Measured);
        assert!((measured.elevator_chain() - 0.9801).abs() < 1e-12);
        assert_eq!(measured.rocket, 0.95);
    }

    #[test]
    fn test_validate_rejects_zero_and_above_one() {
        let mut set = RegimeTable::default().measured;
        assert!(set.validate().is_ok());
        set.tug = 0.0;
        assert!(matches!(set.validate(), Err(ModelError::InvalidPhysicalParameters(_))));
        set.tug = 1.2;
        assert!(set.validate().is_err());
    }
}
