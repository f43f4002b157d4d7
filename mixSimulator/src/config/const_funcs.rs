use crate::error::{ModelError, ModelResult};

/// Tsiolkovsky mass ratio `exp(Δv / (g0·Isp))`.
pub fn calc_mass_ratio(delta_v: f64, specific_impulse: f64, g0: f64) -> f64 {
    (delta_v / (g0 * specific_impulse)).exp()
}

/// Propellant mass per unit payload for a vehicle with the given dry-mass ratio.
pub fn calc_propellant_fraction(mass_ratio: f64, dry_mass_ratio: f64) -> f64 {
    (mass_ratio - 1.0) * (1.0 + dry_mass_ratio)
}

/// Initial mass per unit payload: propellant + dry structure + the payload itself.
pub fn calc_total_mass_multiplier(propellant_fraction: f64, dry_mass_ratio: f64) -> f64 {
    propellant_fraction + dry_mass_ratio + 1.0
}

/// Whole years needed to move `mass` at `annual_capacity`. A partial final
/// year counts as a full one.
pub fn calc_years_needed(mass: f64, annual_capacity: f64) -> ModelResult<u32> {
    let years = (mass / annual_capacity).ceil();
    if !(years >= 0.0 && years <= u32::MAX as f64) {
        return Err(ModelError::out_of_range(
            "material_demand",
            mass,
            "needs more years than can be represented at this capacity",
        ));
    }
    Ok(years as u32)
}

/// Calendar year a plan finishes when it starts in `start_year`.
pub fn calc_completion_year(start_year: u32, years: u32) -> ModelResult<u32> {
    start_year
        .checked_add(years)
        .ok_or_else(|| ModelError::out_of_range("years_needed", years as f64, "completion year overflows"))
}

/// Residual vehicle value lost when a failure happens on mission `failure_mission`
/// of a vehicle designed for `design_reuse` missions (linear depreciation).
pub fn calc_residual_loss(vehicle_cost: f64, design_reuse: u32, failure_mission: u32) -> ModelResult<f64> {
    if design_reuse == 0 {
        return Err(ModelError::InvalidPhysicalParameters(
            "design reuse count must be at least 1".to_string(),
        ));
    }
    let n = failure_mission.clamp(1, design_reuse);
    Ok(vehicle_cost * (design_reuse - n + 1) as f64 / design_reuse as f64)
}

/// Propellant burned per unit payload for a single-stage ground rocket with
/// structural mass fraction `epsilon`.
pub fn calc_propellant_intensity(delta_v: f64, specific_impulse: f64, epsilon: f64, g0: f64) -> f64 {
    let r = calc_mass_ratio(delta_v, specific_impulse, g0);
    let gamma = if r * epsilon >= 1.0 {
        // Closed form diverges; fall back to the ideal-rocket estimate
        r - 1.0
    } else {
        r * (1.0 - epsilon) / (1.0 - r * epsilon) - 1.0
    };
    gamma.max(0.0)
}

/// `points` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let span = max - min;
            let last = (points - 1) as f64;
            (0..points)
                .map(|i| if i == points - 1 { max } else { min + span * i as f64 / last })
                .collect()
        }
    }
}

const MAX_RATIO_DIVISIONS: f64 = 1e6;

/// Elevator ratios `{0, step, 2·step, …, 1}` in ascending order.
///
/// When `1 / step` is a whole number the grid is built as `i / n`, so e.g. a
/// 1% step yields exactly 0.07 rather than `7 × 0.01`.
pub fn ratio_grid(step: f64) -> ModelResult<Vec<f64>> {
    if !(step > 0.0 && step <= 1.0) {
        return Err(ModelError::out_of_range("step", step, "must lie in (0, 1]"));
    }
    let divisions = 1.0 / step;
    if divisions > MAX_RATIO_DIVISIONS {
        return Err(ModelError::out_of_range("step", step, "yields more than a million ratio points"));
    }
    let rounded = divisions.round();
    if (divisions - rounded).abs() < 1e-9 {
        let n = rounded as usize;
        return Ok((0..=n).map(|i| i as f64 / n as f64).collect());
    }

    let mut ratios = Vec::new();
    let mut i = 0usize;
    loop {
        let ratio = i as f64 * step;
        if ratio >= 1.0 - 1e-12 {
            break;
        }
        ratios.push(ratio);
        i += 1;
    }
    ratios.push(1.0);
    Ok(ratios)
}

pub fn validate_ratio(ratio: f64) -> ModelResult<()> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(ModelError::out_of_range("elevator_ratio", ratio, "must lie in [0, 1]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tug_mass_ratio_is_above_one() {
        let r = calc_mass_ratio(2800.0, 380.0, 9.81);
        assert!((r - 2.119358).abs() < 1e-6);
        let prop = calc_propellant_fraction(r, 0.2);
        assert!((prop - (r - 1.0) * 1.2).abs() < 1e-12);
        assert!((calc_total_mass_multiplier(prop, 0.2) - (prop + 1.2)).abs() < 1e-12);
    }

    #[test]
    fn test_years_round_up() {
        assert_eq!(calc_years_needed(100.0, 10.0).unwrap(), 10);
        assert_eq!(calc_years_needed(100.5, 10.0).unwrap(), 11);
        assert_eq!(calc_years_needed(0.0, 10.0).unwrap(), 0);
    }

    #[test]
    fn test_unrepresentable_years_are_rejected() {
        assert_eq!(calc_years_needed(u32::MAX as f64, 1.0).unwrap(), u32::MAX);
        assert!(matches!(
            calc_years_needed(1e16, 526_313.7),
            Err(ModelError::ConfigurationOutOfRange { .. })
        ));
        assert!(calc_years_needed(1.0, 0.0).is_err());
        assert_eq!(calc_completion_year(2050, 191).unwrap(), 2241);
        assert!(calc_completion_year(2050, u32::MAX).is_err());
    }

    #[test]
    fn test_residual_loss_depreciates_linearly() {
        assert_eq!(calc_residual_loss(20_000_000.0, 50, 1).unwrap(), 20_000_000.0);
        assert_eq!(calc_residual_loss(20_000_000.0, 50, 50).unwrap(), 400_000.0);
        // Out-of-range missions clamp to the design life
        assert_eq!(calc_residual_loss(10.0, 10, 0).unwrap(), 10.0);
        assert_eq!(calc_residual_loss(10.0, 10, 99).unwrap(), 1.0);
        assert!(calc_residual_loss(10.0, 0, 1).is_err());
    }

    #[test]
    fn test_propellant_intensity_falls_back_when_structure_too_heavy() {
        let r = calc_mass_ratio(9500.0, 310.0, 9.81);
        let light = calc_propellant_intensity(9500.0, 310.0, 0.01, 9.81);
        assert!(r * 0.01 < 1.0);
        assert!((light - (r * 0.99 / (1.0 - r * 0.01) - 1.0)).abs() < 1e-9);

        // At the ground-rocket defaults R·ε exceeds one
        assert!(r * 0.1 >= 1.0);
        let heavy = calc_propellant_intensity(9500.0, 310.0, 0.1, 9.81);
        assert!((heavy - (r - 1.0)).abs() < 1e-9);
        assert_eq!(calc_propellant_intensity(0.0, 310.0, 0.1, 9.81), 0.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.8, 1.2, 5);
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], 0.8);
        assert_eq!(v[4], 1.2);
        assert!((v[2] - 1.0).abs() < 1e-12);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(3.0, 4.0, 0).is_empty());
    }

    #[test]
    fn test_ratio_grid_exact_division() {
        let grid = ratio_grid(0.01).unwrap();
        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[7], 0.07);
        assert_eq!(grid[100], 1.0);
    }

    #[test]
    fn test_ratio_grid_uneven_step_ends_at_one() {
        let grid = ratio_grid(0.3).unwrap();
        assert_eq!(grid.len(), 5);
        assert_eq!(*grid.last().unwrap(), 1.0);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ratio_grid_rejects_bad_step() {
        assert!(ratio_grid(0.0).is_err());
        assert!(ratio_grid(-0.1).is_err());
        assert!(ratio_grid(1.5).is_err());
        assert!(matches!(ratio_grid(1e-10), Err(ModelError::ConfigurationOutOfRange { .. })));
        assert_eq!(ratio_grid(1e-5).unwrap().len(), 100_001);
        assert_eq!(ratio_grid(1.0).unwrap(), vec![0.0, 1.0]);
    }
}
