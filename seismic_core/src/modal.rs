//! # Modal Analysis
//!
//! Computes an ordered list of vibration modes (period, mass participation,
//! shape) for the building.
//!
//! This is an empirical approximation, not a structural eigensolution: the
//! fundamental period comes from the code formula T = Ct·H^x, higher-mode
//! periods from T1/i^0.8, and modal masses from a geometric decay per axis.
//! The [`ModalAnalyzer`] trait keeps the approximation behind a seam so a
//! real mass/stiffness eigensolver can be substituted without changing any
//! downstream contract.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::building::{BuildingGeometry, MassDistribution, Damping};
//! use seismic_core::modal::{EmpiricalModalAnalyzer, ModalAnalyzer};
//!
//! let geometry = BuildingGeometry::new(30.0, 20.0, 3.2, 8);
//! let masses = MassDistribution::uniform(8, 450.0);
//!
//! let modes = EmpiricalModalAnalyzer
//!     .analyze(&geometry, &masses, &Damping::default())
//!     .unwrap();
//!
//! assert_eq!(modes.len(), 24); // min(3 × floors, 30)
//! assert!(modes[0].period_s > modes[1].period_s);
//! ```
//!
//! ## Reference
//!
//! ASCE 7-22, Section 12.8.2.1: Approximate Fundamental Period

use serde::{Deserialize, Serialize};

use crate::building::{BuildingGeometry, Damping, MassDistribution};
use crate::errors::{SeismicError, SeismicResult};

/// Period coefficient Ct for regular concrete moment frames (SI, H in m)
const CT_REGULAR: f64 = 0.0466;

/// Period exponent x for regular concrete moment frames
const X_REGULAR: f64 = 0.9;

/// Period coefficient Ct applied when vertical irregularity is flagged
/// ("all other structural systems" row of the code table)
const CT_IRREGULAR: f64 = 0.0488;

/// Period exponent x applied when vertical irregularity is flagged
const X_IRREGULAR: f64 = 0.75;

/// Higher-mode period decay: Ti = T1 / i^0.8
const HIGHER_MODE_EXPONENT: f64 = 0.8;

/// Cap on the number of generated modes
const MAX_MODES: usize = 30;

/// Per-axis geometric-decay parameters (asymptotic captured fraction,
/// decay ratio). Mode i carries A·(1-r)·r^(i-1) of the total mass.
const MASS_DECAY_X: (f64, f64) = (0.98, 0.32);
const MASS_DECAY_Y: (f64, f64) = (0.98, 0.35);
const MASS_DECAY_RZ: (f64, f64) = (0.95, 0.45);

/// A single vibration mode.
///
/// Modes are ordered by increasing index = decreasing period (mode 1 is the
/// fundamental, longest-period mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mode {
    /// Ordinal index, 1-based
    pub index: usize,

    /// Natural period (s)
    pub period_s: f64,

    /// Natural frequency (Hz)
    pub frequency_hz: f64,

    /// Damping ratio (fraction of critical)
    pub damping_ratio: f64,

    /// Modal mass per axis (t): [x, y, torsion]
    pub modal_mass_t: [f64; 3],

    /// Mass-normalized participation factor per axis: [x, y, torsion]
    pub participation: [f64; 3],

    /// Cumulative effective-mass fraction per axis after this mode:
    /// [x, y, torsion]. Non-decreasing with mode index, ≤ 1.
    pub cumulative_mass_fraction: [f64; 3],

    /// Shape ordinate per floor (bottom-up), normalized to the roof
    pub shape: Vec<f64>,
}

/// Capability seam for modal analysis.
///
/// The pipeline is generic over this trait; [`EmpiricalModalAnalyzer`] is
/// the provided closed-form implementation.
pub trait ModalAnalyzer {
    /// Compute the ordered mode list for the building.
    fn analyze(
        &self,
        geometry: &BuildingGeometry,
        masses: &MassDistribution,
        damping: &Damping,
    ) -> SeismicResult<Vec<Mode>>;
}

/// Closed-form modal property estimator.
///
/// Produces min(3 × floors, 30) modes with code-formula periods and
/// geometric-decay modal masses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmpiricalModalAnalyzer;

impl ModalAnalyzer for EmpiricalModalAnalyzer {
    fn analyze(
        &self,
        geometry: &BuildingGeometry,
        masses: &MassDistribution,
        damping: &Damping,
    ) -> SeismicResult<Vec<Mode>> {
        geometry.validate()?;
        masses.validate()?;
        damping.validate()?;

        let height_m = geometry.total_height_m();
        let (ct, x) = if geometry.vertical_irregularity {
            (CT_IRREGULAR, X_IRREGULAR)
        } else {
            (CT_REGULAR, X_REGULAR)
        };
        let t1_s = ct * height_m.powf(x);
        if t1_s <= 0.0 {
            return Err(SeismicError::calculation_failed(
                "modal",
                format!("fundamental period {} s is not positive", t1_s),
            ));
        }

        let n_modes = (3 * geometry.floor_count).min(MAX_MODES);
        log::debug!(
            "modal analysis: T1 = {:.3} s, {} modes for {} floors",
            t1_s,
            n_modes,
            geometry.floor_count
        );

        let mut cumulative = [0.0f64; 3];
        let modes = (1..=n_modes)
            .map(|i| {
                let period_s = t1_s / (i as f64).powf(HIGHER_MODE_EXPONENT);
                let fractions = [
                    mass_fraction(MASS_DECAY_X, i),
                    mass_fraction(MASS_DECAY_Y, i),
                    mass_fraction(MASS_DECAY_RZ, i),
                ];
                for axis in 0..3 {
                    cumulative[axis] += fractions[axis];
                }
                Mode {
                    index: i,
                    period_s,
                    frequency_hz: 1.0 / period_s,
                    damping_ratio: damping.ratio,
                    modal_mass_t: [
                        fractions[0] * masses.total_mass_t,
                        fractions[1] * masses.total_mass_t,
                        fractions[2] * masses.total_mass_t,
                    ],
                    participation: [
                        fractions[0].sqrt(),
                        fractions[1].sqrt(),
                        fractions[2].sqrt(),
                    ],
                    cumulative_mass_fraction: cumulative,
                    shape: mode_shape(i, geometry),
                }
            })
            .collect();

        Ok(modes)
    }
}

/// Modal mass fraction of mode `i` for one axis: A·(1-r)·r^(i-1)
fn mass_fraction((asymptote, ratio): (f64, f64), i: usize) -> f64 {
    asymptote * (1.0 - ratio) * ratio.powi(i as i32 - 1)
}

/// Cantilever-style shape ordinates for mode `i`, normalized to the roof.
///
/// φ_j = sin((2i−1)·π·h_j / 2H), evaluated at each floor elevation.
fn mode_shape(i: usize, geometry: &BuildingGeometry) -> Vec<f64> {
    let height_m = geometry.total_height_m();
    let k = (2 * i - 1) as f64 * std::f64::consts::PI / (2.0 * height_m);
    let roof = (k * height_m).sin().abs().max(1e-12);
    (1..=geometry.floor_count)
        .map(|floor| (k * geometry.floor_elevation_m(floor)).sin() / roof)
        .collect()
}

/// Total captured effective-mass fraction per axis: [x, y, torsion].
///
/// Reads the last mode's cumulative entry; empty mode lists capture nothing.
pub fn mass_participation(modes: &[Mode]) -> [f64; 3] {
    modes
        .last()
        .map(|m| m.cumulative_mass_fraction)
        .unwrap_or([0.0; 3])
}
