//! # Story Force Distribution
//!
//! Converts the combined base shear into per-floor forces, displacements,
//! and inter-story drift ratios.
//!
//! ## Vertical Distribution
//!
//! Forces follow the code exponent k:
//!
//! ```text
//! Fi = V · (mi·hi^k) / Σ(m·h^k)
//! k = 1.0 for T ≤ 0.5 s, 2.0 for T ≥ 2.5 s, linear in between
//! ```
//!
//! The displacement profile accumulates story increments proportional to
//! story shear (uniform story stiffness assumption), scaled so the roof
//! matches the combined modal displacement. Drift is the absolute
//! displacement difference across a story divided by the story height; the
//! ground provides floor 1's reference displacement of zero.
//!
//! ## Reference
//!
//! ASCE 7-22, Section 12.8.3: Vertical Distribution of Seismic Forces

use serde::{Deserialize, Serialize};

use crate::building::{BuildingGeometry, MassDistribution};
use crate::combination::CombinedResponse;
use crate::errors::{SeismicError, SeismicResult};

/// Period below which the distribution exponent is 1.0 (s)
const K_LINEAR_PERIOD_S: f64 = 0.5;

/// Period above which the distribution exponent is 2.0 (s)
const K_QUADRATIC_PERIOD_S: f64 = 2.5;

/// Seismic response of a single story.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": 3,
///   "force_x_kn": 210.5,
///   "force_y_kn": 198.2,
///   "displacement_m": 0.012,
///   "drift_ratio": 0.0013,
///   "acceleration_g": 0.21
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    /// Floor index, 1-based bottom-up
    pub floor: usize,

    /// Lateral force applied at this floor, X direction (kN)
    pub force_x_kn: f64,

    /// Lateral force applied at this floor, Y direction (kN)
    pub force_y_kn: f64,

    /// Absolute floor displacement (m)
    pub displacement_m: f64,

    /// Inter-story drift ratio (dimensionless, ≥ 0)
    pub drift_ratio: f64,

    /// Peak floor acceleration (g)
    pub acceleration_g: f64,
}

/// Vertical distribution exponent k for a fundamental period.
pub fn vertical_distribution_exponent(period_s: f64) -> f64 {
    if period_s <= K_LINEAR_PERIOD_S {
        1.0
    } else if period_s >= K_QUADRATIC_PERIOD_S {
        2.0
    } else {
        1.0 + (period_s - K_LINEAR_PERIOD_S) / (K_QUADRATIC_PERIOD_S - K_LINEAR_PERIOD_S)
    }
}

/// Distribute the combined base shear over the building height.
///
/// # Errors
///
/// `CalculationFailed` if the mass-height weighting degenerates to zero
/// (all floor masses zero).
pub fn distribute(
    combined: &CombinedResponse,
    geometry: &BuildingGeometry,
    masses: &MassDistribution,
    fundamental_period_s: f64,
) -> SeismicResult<Vec<StoryResponse>> {
    geometry.validate()?;
    masses.validate()?;

    let n = geometry.floor_count;
    let k = vertical_distribution_exponent(fundamental_period_s);
    let total_height = geometry.total_height_m();

    // Σ m·h^k over all floors
    let weights: Vec<f64> = (1..=n)
        .map(|floor| {
            let mass = floor_mass(masses, floor);
            mass * geometry.floor_elevation_m(floor).powf(k)
        })
        .collect();
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return Err(SeismicError::calculation_failed(
            "story_distribution",
            "mass-height weighting sums to zero",
        ));
    }

    let forces_x: Vec<f64> = weights
        .iter()
        .map(|w| combined.base_shear_x_kn * w / weight_sum)
        .collect();
    let forces_y: Vec<f64> = weights
        .iter()
        .map(|w| combined.base_shear_y_kn * w / weight_sum)
        .collect();

    // Story shear profile: shear in story j resists all forces at and above j
    let mut story_shear = vec![0.0; n];
    let mut running = 0.0;
    for j in (0..n).rev() {
        running += forces_x[j];
        story_shear[j] = running;
    }

    // Displacement increments proportional to story shear, normalized so the
    // roof matches the combined modal displacement
    let shear_sum: f64 = story_shear.iter().sum();
    let mut displacements = vec![0.0; n];
    let mut cumulative = 0.0;
    for j in 0..n {
        let increment = if shear_sum > 0.0 {
            combined.displacement_m * story_shear[j] / shear_sum
        } else {
            0.0
        };
        cumulative += increment;
        displacements[j] = cumulative;
    }

    let responses = (0..n)
        .map(|j| {
            let below = if j == 0 { 0.0 } else { displacements[j - 1] };
            let drift_ratio = (displacements[j] - below).abs() / geometry.floor_height_m;
            let height_ratio = geometry.floor_elevation_m(j + 1) / total_height;
            StoryResponse {
                floor: j + 1,
                force_x_kn: forces_x[j],
                force_y_kn: forces_y[j],
                displacement_m: displacements[j],
                drift_ratio,
                acceleration_g: combined.acceleration_g * height_ratio,
            }
        })
        .collect();

    Ok(responses)
}

/// Largest drift ratio over all stories.
pub fn max_drift_ratio(stories: &[StoryResponse]) -> f64 {
    stories.iter().map(|s| s.drift_ratio).fold(0.0, f64::max)
}

/// Mass of a 1-based floor, repeating the last entry if the array is short.
fn floor_mass(masses: &MassDistribution, floor: usize) -> f64 {
    masses
        .floor_masses_t
        .get(floor - 1)
        .or_else(|| masses.floor_masses_t.last())
        .copied()
        .unwrap_or(0.0)
}
