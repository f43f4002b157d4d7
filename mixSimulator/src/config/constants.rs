// Time Constants
pub const START_YEAR: u32 = 2050;

// Demand
pub const TOTAL_MATERIAL: f64 = 100_000_000.0;       // tonnes to deliver
pub const DEFAULT_EXTRA_MATERIAL: f64 = 0.0;         // additional tonnes on top of the base demand

// Physical Constants
pub const G_0: f64 = 9.81;                           // m/s²

// Space Elevator System
pub const GALACTIC_HARBORS: u32 = 3;
pub const ELEVATOR_ANNUAL_CAPACITY: f64 = 179_000.0; // tonnes per harbor per year
pub const ELEVATOR_COST_PER_TON: f64 = 1000.0;       // USD per tonne lifted

// Orbital Tug
pub const TUG_DELTA_V: f64 = 2800.0;                 // m/s
pub const TUG_I_SP: f64 = 380.0;                     // s
pub const TUG_DRY_MASS_RATIO: f64 = 0.2;             // dry mass over payload mass
pub const TUG_COST_FUEL_PER_TON: f64 = 2000.0;       // USD per tonne of propellant
pub const TUG_COST_VEHICLE: f64 = 20_000_000.0;      // USD
pub const TUG_REUSE_COUNT: u32 = 50;

// Ground Rockets
pub const ROCKET_LAUNCH_SITES: u32 = 10;
pub const ROCKET_PAYLOAD_MIN: f64 = 100.0;           // tonnes
pub const ROCKET_PAYLOAD_MAX: f64 = 150.0;           // tonnes
pub const ROCKET_COST_PER_LAUNCH: f64 = 10_000_000.0; // USD
pub const ROCKET_CONSUMPTION_FACTOR: f64 = 0.4;      // share of launch cost consumed per flight
pub const ROCKET_LAUNCHES_PER_YEAR_PER_SITE: u32 = 2000;
pub const ROCKET_REUSE_COUNT: u32 = 20;
pub const ROCKET_COST_VEHICLE: f64 = 10_000_000.0;   // USD, used for residual loss

// Reliability - idealized regime
pub const ELEVATOR_RELIABILITY_IDEAL: f64 = 1.0;
pub const TUG_RELIABILITY_IDEAL: f64 = 1.0;
pub const ROCKET_RELIABILITY_IDEAL: f64 = 1.0;

// Reliability - measured regime
pub const ELEVATOR_RELIABILITY_MEASURED: f64 = 0.99;
pub const TUG_RELIABILITY_MEASURED: f64 = 0.99;
pub const ROCKET_RELIABILITY_MEASURED: f64 = 0.95;

// Ratio Sweep
pub const DEFAULT_RATIO_STEP: f64 = 0.01;
pub const DEFAULT_TIME_LIMIT_MIN: u32 = 10;
pub const DEFAULT_TIME_LIMIT_MAX: u32 = 400;
pub const DEFAULT_TIME_LIMIT_STEP: u32 = 10;

// Sensitivity Grid
pub const SENSITIVITY_SCALE_MIN: f64 = 0.8;          // fraction of baseline
pub const SENSITIVITY_SCALE_MAX: f64 = 1.2;
pub const SENSITIVITY_POINTS: usize = 5;
pub const SENSITIVITY_TIME_LIMITS: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 250.0];
pub const COMBINED_COST_WEIGHT: f64 = 0.5;
pub const COMBINED_TIME_WEIGHT: f64 = 0.5;

// Elevator Availability Monte Carlo
pub const MC_TRIALS: usize = 10_000;
pub const SWAY_COUPLING: f64 = 0.05;                 // rad per m/s
pub const CRITICAL_SWAY_ANGLE: f64 = 1.0;            // rad
pub const SAFE_WIND_SPEED: f64 = 20.0;               // m/s
pub const WEIBULL_SHAPE: f64 = 2.0;
pub const WEIBULL_SCALE: f64 = 10.0;                 // m/s
pub const SWAY_NOISE_STD: f64 = 0.05;                // rad
pub const SUCCESS_NOISE_STD: f64 = 0.01;
pub const ELEVATOR_BASE_SUCCESS_RATE: f64 = 0.99;
pub const ELEVATOR_CABLES: u32 = 3;
pub const ELEVATOR_TRIP_PAYLOAD: f64 = 50.0;         // tonnes per trip
pub const MAINTENANCE_DOWNTIME: f64 = 0.05;          // fraction of time offline

// Availability Sensitivity Ranges
pub const SAFE_WIND_SWEEP: (f64, f64) = (10.0, 30.0);
pub const CRITICAL_ANGLE_SWEEP: (f64, f64) = (0.5, 2.0);
pub const COUPLING_SWEEP: (f64, f64) = (0.01, 0.1);
pub const AVAILABILITY_SWEEP_POINTS: usize = 20;

// Ground Rocket Environmental Model
pub const GROUND_DELTA_V: f64 = 9500.0;              // m/s, orbit plus losses
pub const GROUND_I_SP: f64 = 310.0;                  // s
pub const GROUND_STRUCTURAL_FRACTION: f64 = 0.1;

// Emission factors (g per kg of propellant)
pub const BC_EMISSION_FACTOR: f64 = 0.1;
pub const AL2O3_EMISSION_FACTOR: f64 = 5.0;
pub const H2O_EMISSION_FACTOR: f64 = 1200.0;
pub const NOX_EMISSION_FACTOR: f64 = 2.0;

// Relative environmental weights
pub const BC_WEIGHT: f64 = 500.0;
pub const AL2O3_WEIGHT: f64 = 10.0;
pub const H2O_WEIGHT: f64 = 5.0;
pub const NOX_WEIGHT: f64 = 100.0;

// Elevator electricity use and grid carbon intensity
pub const ELEVATOR_ENERGY_PER_TON: f64 = 30.0;       // kWh per tonne
pub const CARBON_INTENSITY_S1: f64 = 0.06;           // kgCO2e/kWh, strong decarbonisation
pub const CARBON_INTENSITY_S2: f64 = 0.20;           // moderate transition
pub const CARBON_INTENSITY_S3: f64 = 0.45;           // conservative
pub const ENVIRONMENTAL_SWEEP_POINTS: usize = 11;
