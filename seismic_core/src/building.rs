//! # Building Input Contracts
//!
//! In-process data contracts supplied by external collaborators (project
//! setup, geometry editors). These are plain records: the pipeline receives
//! them by reference, validates them up front, and never mutates them.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::building::{BuildingGeometry, MassDistribution, Damping};
//!
//! let geometry = BuildingGeometry::new(30.0, 20.0, 3.2, 8);
//! let masses = MassDistribution::uniform(8, 450.0);
//! let damping = Damping::default(); // 5% viscous
//!
//! assert!(geometry.validate().is_ok());
//! assert!(masses.validate().is_ok());
//! assert_eq!(geometry.total_height_m(), 25.6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SeismicError, SeismicResult};

/// Building geometry descriptor.
///
/// ## JSON Example
///
/// ```json
/// {
///   "length_m": 30.0,
///   "width_m": 20.0,
///   "floor_height_m": 3.2,
///   "floor_count": 8,
///   "bay_spacing_x_m": 6.0,
///   "bay_spacing_y_m": 5.0,
///   "vertical_irregularity": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingGeometry {
    /// Plan length in meters (X direction)
    pub length_m: f64,

    /// Plan width in meters (Y direction)
    pub width_m: f64,

    /// Typical story height in meters
    pub floor_height_m: f64,

    /// Number of floors above grade
    pub floor_count: usize,

    /// Column bay spacing in the X direction (m)
    pub bay_spacing_x_m: f64,

    /// Column bay spacing in the Y direction (m)
    pub bay_spacing_y_m: f64,

    /// Vertical irregularity flag (setbacks, soft stories)
    ///
    /// Affects the empirical period coefficients and triggers a stricter
    /// detailing recommendation at high seismic design categories.
    pub vertical_irregularity: bool,
}

impl BuildingGeometry {
    /// Create a regular rectangular building with default 6 m bays.
    pub fn new(length_m: f64, width_m: f64, floor_height_m: f64, floor_count: usize) -> Self {
        BuildingGeometry {
            length_m,
            width_m,
            floor_height_m,
            floor_count,
            bay_spacing_x_m: 6.0,
            bay_spacing_y_m: 6.0,
            vertical_irregularity: false,
        }
    }

    /// Mark the building as vertically irregular (builder pattern)
    pub fn with_vertical_irregularity(mut self) -> Self {
        self.vertical_irregularity = true;
        self
    }

    /// Total height above grade (m)
    pub fn total_height_m(&self) -> f64 {
        self.floor_height_m * self.floor_count as f64
    }

    /// Height of the top of floor `i` (1-based) above grade (m)
    pub fn floor_elevation_m(&self, floor: usize) -> f64 {
        self.floor_height_m * floor as f64
    }

    /// Validate geometry parameters.
    pub fn validate(&self) -> SeismicResult<()> {
        if self.length_m <= 0.0 || self.width_m <= 0.0 {
            return Err(SeismicError::invalid_input(
                "length_m/width_m",
                format!("{} x {}", self.length_m, self.width_m),
                "Plan dimensions must be positive",
            ));
        }
        if self.floor_height_m <= 0.0 {
            return Err(SeismicError::invalid_input(
                "floor_height_m",
                self.floor_height_m.to_string(),
                "Story height must be positive",
            ));
        }
        if self.floor_count == 0 {
            return Err(SeismicError::invalid_input(
                "floor_count",
                "0",
                "Building must have at least one floor",
            ));
        }
        Ok(())
    }
}

/// Mass distribution over the building height.
///
/// Masses are in tonnes. The per-floor array is indexed bottom-up:
/// `floor_masses_t[0]` is the first suspended floor.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_mass_t": 3600.0,
///   "floor_masses_t": [450.0, 450.0, 450.0, 450.0, 450.0, 450.0, 450.0, 450.0],
///   "center_of_mass_m": [[15.0, 10.0], [15.0, 10.0]]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassDistribution {
    /// Total seismic mass (t)
    pub total_mass_t: f64,

    /// Per-floor mass (t), bottom-up
    pub floor_masses_t: Vec<f64>,

    /// Per-floor center of mass as (x, y) plan coordinates (m)
    ///
    /// Empty means geometric center at every floor.
    #[serde(default)]
    pub center_of_mass_m: Vec<(f64, f64)>,
}

impl MassDistribution {
    /// Create a uniform distribution: every floor carries the same mass.
    pub fn uniform(floor_count: usize, mass_per_floor_t: f64) -> Self {
        MassDistribution {
            total_mass_t: mass_per_floor_t * floor_count as f64,
            floor_masses_t: vec![mass_per_floor_t; floor_count],
            center_of_mass_m: Vec::new(),
        }
    }

    /// Validate the mass distribution.
    ///
    /// Total mass must be positive; per-floor masses must be non-negative
    /// and sum to the total within 1%.
    pub fn validate(&self) -> SeismicResult<()> {
        if self.total_mass_t <= 0.0 {
            return Err(SeismicError::invalid_input(
                "total_mass_t",
                self.total_mass_t.to_string(),
                "Total mass must be positive",
            ));
        }
        if self.floor_masses_t.is_empty() {
            return Err(SeismicError::missing_field("floor_masses_t"));
        }
        for (i, m) in self.floor_masses_t.iter().enumerate() {
            if *m < 0.0 {
                return Err(SeismicError::invalid_input(
                    format!("floor_masses_t[{}]", i),
                    m.to_string(),
                    "Floor mass cannot be negative",
                ));
            }
        }
        let sum: f64 = self.floor_masses_t.iter().sum();
        if (sum - self.total_mass_t).abs() > 0.01 * self.total_mass_t {
            return Err(SeismicError::invalid_input(
                "floor_masses_t",
                format!("sum {:.1} t vs total {:.1} t", sum, self.total_mass_t),
                "Per-floor masses must sum to the total mass",
            ));
        }
        Ok(())
    }
}

/// Structural material summary.
///
/// Used only to size illustrative critical sections for demand/capacity
/// reporting; the dynamic pipeline does not solve member stiffness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSummary {
    /// Concrete compressive strength f'c (MPa)
    pub concrete_fc_mpa: f64,

    /// Steel yield strength fy (MPa)
    pub steel_fy_mpa: f64,

    /// Concrete elastic modulus (MPa)
    pub concrete_e_mpa: f64,

    /// Steel elastic modulus (MPa)
    pub steel_e_mpa: f64,
}

impl Default for MaterialSummary {
    /// C30 concrete with Grade 420 reinforcement.
    fn default() -> Self {
        MaterialSummary {
            concrete_fc_mpa: 30.0,
            steel_fy_mpa: 420.0,
            concrete_e_mpa: 27_400.0,
            steel_e_mpa: 200_000.0,
        }
    }
}

impl MaterialSummary {
    /// Validate material strengths.
    pub fn validate(&self) -> SeismicResult<()> {
        if self.concrete_fc_mpa <= 0.0 || self.steel_fy_mpa <= 0.0 {
            return Err(SeismicError::invalid_input(
                "material strengths",
                format!("f'c={}, fy={}", self.concrete_fc_mpa, self.steel_fy_mpa),
                "Material strengths must be positive",
            ));
        }
        Ok(())
    }
}

/// Damping model tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DampingType {
    /// Mass/stiffness proportional (Rayleigh) viscous damping
    #[default]
    Proportional,
    /// Constant modal damping ratio across all modes
    Modal,
}

/// Viscous damping specification.
///
/// The ratio applies to every mode; the design spectrum assumes 5%.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Damping {
    /// Damping ratio as a fraction of critical (0.0 to 0.2)
    pub ratio: f64,

    /// Damping model tag
    pub damping_type: DampingType,
}

impl Default for Damping {
    fn default() -> Self {
        Damping {
            ratio: 0.05,
            damping_type: DampingType::Proportional,
        }
    }
}

impl Damping {
    /// Validate the damping ratio range.
    pub fn validate(&self) -> SeismicResult<()> {
        if !(0.0..=0.2).contains(&self.ratio) {
            return Err(SeismicError::invalid_input(
                "damping.ratio",
                self.ratio.to_string(),
                "Damping ratio must be between 0.0 and 0.2",
            ));
        }
        Ok(())
    }
}
