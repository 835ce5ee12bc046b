//! # Performance Assessment
//!
//! Maps the drift demand onto a qualitative performance level, illustrative
//! demand/capacity ratios for named critical elements, and log-normal
//! fragility curves per damage state.
//!
//! The element list and fragility parameters are fixed lookup data in the
//! spirit of code commentary tables, not per-element finite-element
//! results.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::performance::{assess, PerformanceLevel};
//!
//! let assessment = assess(0.004);
//! assert_eq!(assessment.level, PerformanceLevel::ImmediateOccupancy);
//! assert!(assessment.demand_capacity.iter().all(|dc| dc.ratio < 1.0));
//! ```

use serde::{Deserialize, Serialize};

/// Drift ratio below which the building remains immediately occupiable
const IO_DRIFT_LIMIT: f64 = 0.005;

/// Drift ratio below which life safety is maintained
const LS_DRIFT_LIMIT: f64 = 0.015;

/// Drift grid over which fragility probability arrays are tabulated
const FRAGILITY_GRID_STEP: f64 = 0.002;
const FRAGILITY_GRID_POINTS: usize = 26;

/// Qualitative performance level, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceLevel {
    /// Negligible structural damage, building usable immediately
    ImmediateOccupancy,
    /// Damage but substantial margin against collapse
    LifeSafety,
    /// Heavy damage, at or near the collapse margin
    CollapsePrevention,
}

impl PerformanceLevel {
    /// Classify a maximum inter-story drift ratio.
    pub fn from_drift(max_drift_ratio: f64) -> PerformanceLevel {
        if max_drift_ratio < IO_DRIFT_LIMIT {
            PerformanceLevel::ImmediateOccupancy
        } else if max_drift_ratio < LS_DRIFT_LIMIT {
            PerformanceLevel::LifeSafety
        } else {
            PerformanceLevel::CollapsePrevention
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            PerformanceLevel::ImmediateOccupancy => "Immediate Occupancy",
            PerformanceLevel::LifeSafety => "Life Safety",
            PerformanceLevel::CollapsePrevention => "Collapse Prevention",
        }
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Damage state for fragility evaluation, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageState {
    Slight,
    Moderate,
    Extensive,
    Complete,
}

impl DamageState {
    /// All damage states, slight to complete
    pub const ALL: [DamageState; 4] = [
        DamageState::Slight,
        DamageState::Moderate,
        DamageState::Extensive,
        DamageState::Complete,
    ];

    /// Median drift ratio of the log-normal fragility function
    pub fn median_drift_ratio(&self) -> f64 {
        match self {
            DamageState::Slight => 0.005,
            DamageState::Moderate => 0.010,
            DamageState::Extensive => 0.020,
            DamageState::Complete => 0.040,
        }
    }

    /// Log-standard-deviation (dispersion) of the fragility function
    pub fn dispersion(&self) -> f64 {
        match self {
            DamageState::Slight => 0.40,
            DamageState::Moderate => 0.45,
            DamageState::Extensive => 0.50,
            DamageState::Complete => 0.55,
        }
    }
}

/// Illustrative demand/capacity ratio for a named critical element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandCapacityRatio {
    /// Element label
    pub element: String,

    /// Drift demand applied to the element (ratio)
    pub demand: f64,

    /// Drift capacity of the element (ratio)
    pub capacity: f64,

    /// demand / capacity; > 1.0 means overstressed
    pub ratio: f64,
}

/// One damage state's fragility curve, tabulated over the shared grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragilityCurve {
    /// Damage state this curve describes
    pub state: DamageState,

    /// Median drift ratio parameter
    pub median_drift_ratio: f64,

    /// Dispersion parameter
    pub dispersion: f64,

    /// Exceedance probability at the assessed drift
    pub probability_at_demand: f64,

    /// Exceedance probabilities over [`PerformanceAssessment::drift_grid`]
    pub probabilities: Vec<f64>,
}

/// Output of the performance assessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceAssessment {
    /// Qualitative level from the drift demand
    pub level: PerformanceLevel,

    /// Maximum inter-story drift ratio assessed
    pub max_drift_ratio: f64,

    /// Illustrative ratios for named critical elements
    pub demand_capacity: Vec<DemandCapacityRatio>,

    /// Drift grid shared by all fragility probability arrays
    pub drift_grid: Vec<f64>,

    /// Fragility curves, slight to complete
    pub fragility: Vec<FragilityCurve>,
}

/// Fixed critical-element drift capacities (label, capacity ratio).
const CRITICAL_ELEMENTS: [(&str, f64); 4] = [
    ("Corner column C1", 0.020),
    ("Interior beam-column joint J3", 0.015),
    ("Core shear wall W1", 0.025),
    ("Slab-column connection S2", 0.030),
];

/// Assess performance from the maximum inter-story drift ratio.
pub fn assess(max_drift_ratio: f64) -> PerformanceAssessment {
    let demand_capacity = CRITICAL_ELEMENTS
        .iter()
        .map(|(element, capacity)| DemandCapacityRatio {
            element: element.to_string(),
            demand: max_drift_ratio,
            capacity: *capacity,
            ratio: max_drift_ratio / capacity,
        })
        .collect();

    let drift_grid: Vec<f64> = (0..FRAGILITY_GRID_POINTS)
        .map(|i| i as f64 * FRAGILITY_GRID_STEP)
        .collect();

    let fragility = DamageState::ALL
        .iter()
        .map(|state| {
            let median = state.median_drift_ratio();
            let beta = state.dispersion();
            FragilityCurve {
                state: *state,
                median_drift_ratio: median,
                dispersion: beta,
                probability_at_demand: exceedance_probability(max_drift_ratio, median, beta),
                probabilities: drift_grid
                    .iter()
                    .map(|d| exceedance_probability(*d, median, beta))
                    .collect(),
            }
        })
        .collect();

    PerformanceAssessment {
        level: PerformanceLevel::from_drift(max_drift_ratio),
        max_drift_ratio,
        demand_capacity,
        drift_grid,
        fragility,
    }
}

/// Log-normal exceedance probability: Φ(ln(d/median)/β), 0 at zero drift.
fn exceedance_probability(drift: f64, median: f64, beta: f64) -> f64 {
    if drift <= 0.0 {
        return 0.0;
    }
    standard_normal_cdf((drift / median).ln() / beta)
}

/// Standard normal CDF via the Abramowitz-Stegun 7.1.26 erf approximation
/// (max absolute error about 1.5e-7).
fn standard_normal_cdf(x: f64) -> f64 {
    let z = x / std::f64::consts::SQRT_2;
    0.5 * (1.0 + erf(z))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}
