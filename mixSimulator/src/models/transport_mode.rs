use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    ElevatorTug,  // Space elevator lift plus orbital tug transfer
    GroundRocket, // Reusable ground-launched rockets
}

impl TransportMode {
    pub const ALL: [TransportMode; 2] = [TransportMode::ElevatorTug, TransportMode::GroundRocket];

    pub fn scenario_name(&self) -> &'static str {
        match self {
            TransportMode::ElevatorTug => "Space Elevator Only",
            TransportMode::GroundRocket => "Traditional Rockets Only",
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ElevatorTug" | "elevator" => Ok(TransportMode::ElevatorTug),
            "GroundRocket" | "rocket" => Ok(TransportMode::GroundRocket),
            _ => Err(format!("Unknown transport mode: {}", s)),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::ElevatorTug => write!(f, "ElevatorTug"),
            TransportMode::GroundRocket => write!(f, "GroundRocket"),
        }
    }
}
