// Module declarations for the transport mix simulator

pub mod error;

// Core engine
pub mod core {
    pub mod availability;
    pub mod scenario;
    pub mod ratio_optimizer;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod const_funcs;
    pub mod regime;
    pub mod simulation_config;
}

// Model definitions
pub mod models {
    pub mod transport_mode;
    pub mod unit_economics;
    pub mod capacity;
}

// Analysis and reporting
pub mod analysis {
    pub mod sensitivity;
    pub mod residual_loss;
    pub mod regime_comparison;
    pub mod environmental;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
    pub mod traits;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::config::regime::ReliabilityRegime;
pub use crate::config::simulation_config::{PhysicalConstants, RunConfig};
pub use crate::core::availability::AvailabilitySimulator;
pub use crate::core::ratio_optimizer::RatioOptimizer;
pub use crate::core::scenario::ScenarioEvaluator;
pub use crate::error::{ModelError, ModelResult};
pub use crate::models::transport_mode::TransportMode;
