//! # Modal Response Combination
//!
//! Maps each mode's period onto the design spectrum and combines the
//! per-mode responses into peak estimates.
//!
//! Two combination rules are produced:
//!
//! - **SRSS**: sqrt of the sum of squares, assuming independent modes
//! - **CQC**: SRSS inflated by a fixed 1.10 correlation factor, standing in
//!   for the full cross-mode correlation of closely spaced modes
//!
//! CQC is the authoritative combined response used downstream; both are
//! exposed for comparison.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::building::{BuildingGeometry, MassDistribution, Damping};
//! use seismic_core::modal::{EmpiricalModalAnalyzer, ModalAnalyzer};
//! use seismic_core::site::{SiteInput, RiskCategory};
//! use seismic_core::spectrum::DesignSpectrum;
//! use seismic_core::combination::combine;
//!
//! let geometry = BuildingGeometry::new(30.0, 20.0, 3.2, 8);
//! let masses = MassDistribution::uniform(8, 450.0);
//! let modes = EmpiricalModalAnalyzer
//!     .analyze(&geometry, &masses, &Damping::default())
//!     .unwrap();
//! let profile = SiteInput::new("C", 1.0, 0.4, RiskCategory::II).resolve().unwrap();
//! let spectrum = DesignSpectrum::from_profile(&profile);
//!
//! let combination = combine(&modes, &spectrum).unwrap();
//! assert!(combination.cqc.base_shear_x_kn >= combination.srss.base_shear_x_kn);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SeismicError, SeismicResult};
use crate::modal::Mode;
use crate::spectrum::DesignSpectrum;
use crate::units::GRAVITY_MPS2;

/// Fixed inflation applied to SRSS to approximate full CQC
pub const CQC_CORRELATION_FACTOR: f64 = 1.10;

/// Spectral response of a single mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalResponse {
    /// Mode ordinal, 1-based
    pub mode_index: usize,

    /// Mode period (s)
    pub period_s: f64,

    /// Spectral acceleration at this period (g), interpolated on the
    /// sampled spectrum and clamped at the domain edges
    pub sa_g: f64,

    /// Modal base shear, X direction (kN)
    pub base_shear_x_kn: f64,

    /// Modal base shear, Y direction (kN)
    pub base_shear_y_kn: f64,

    /// Modal roof displacement contribution (m)
    pub displacement_m: f64,

    /// Modal roof acceleration contribution (g)
    pub acceleration_g: f64,
}

/// Combination rule tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinationRule {
    /// Square Root of Sum of Squares
    Srss,
    /// Complete Quadratic Combination (approximated)
    Cqc,
}

/// Peak response estimate under one combination rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResponse {
    /// Rule that produced this estimate
    pub rule: CombinationRule,

    /// Combined base shear, X direction (kN)
    pub base_shear_x_kn: f64,

    /// Combined base shear, Y direction (kN)
    pub base_shear_y_kn: f64,

    /// Combined roof displacement (m)
    pub displacement_m: f64,

    /// Combined roof acceleration (g)
    pub acceleration_g: f64,
}

/// Output of the modal response combiner: per-mode responses plus both
/// combined estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalCombination {
    /// Per-mode spectral responses, in mode order
    pub per_mode: Vec<ModalResponse>,

    /// SRSS combination
    pub srss: CombinedResponse,

    /// CQC combination (authoritative downstream)
    pub cqc: CombinedResponse,
}

impl ModalCombination {
    /// The combined response used by downstream stages (CQC).
    pub fn authoritative(&self) -> &CombinedResponse {
        &self.cqc
    }
}

/// Combine modal responses against the design spectrum.
///
/// Each mode's spectral acceleration is interpolated from the sampled
/// spectrum; modal base shear is Sa·g·(modal mass), modal displacement is
/// the participation-scaled spectral displacement. SRSS reduces the mode
/// set; CQC inflates SRSS by [`CQC_CORRELATION_FACTOR`].
///
/// # Errors
///
/// `CalculationFailed` if the mode list is empty.
pub fn combine(modes: &[Mode], spectrum: &DesignSpectrum) -> SeismicResult<ModalCombination> {
    if modes.is_empty() {
        return Err(SeismicError::calculation_failed(
            "combination",
            "mode list is empty",
        ));
    }

    let per_mode: Vec<ModalResponse> = modes
        .iter()
        .map(|mode| {
            let sa_g = spectrum.sa_at(mode.period_s);
            let sd_m = spectrum.sd_at(mode.period_s);
            ModalResponse {
                mode_index: mode.index,
                period_s: mode.period_s,
                sa_g,
                // V = Sa · g · m  (g in m/s², m in t -> kN)
                base_shear_x_kn: sa_g * GRAVITY_MPS2 * mode.modal_mass_t[0],
                base_shear_y_kn: sa_g * GRAVITY_MPS2 * mode.modal_mass_t[1],
                displacement_m: mode.participation[0] * sd_m,
                acceleration_g: mode.participation[0] * sa_g,
            }
        })
        .collect();

    let srss = CombinedResponse {
        rule: CombinationRule::Srss,
        base_shear_x_kn: srss_of(&per_mode, |r| r.base_shear_x_kn),
        base_shear_y_kn: srss_of(&per_mode, |r| r.base_shear_y_kn),
        displacement_m: srss_of(&per_mode, |r| r.displacement_m),
        acceleration_g: srss_of(&per_mode, |r| r.acceleration_g),
    };

    let cqc = CombinedResponse {
        rule: CombinationRule::Cqc,
        base_shear_x_kn: srss.base_shear_x_kn * CQC_CORRELATION_FACTOR,
        base_shear_y_kn: srss.base_shear_y_kn * CQC_CORRELATION_FACTOR,
        displacement_m: srss.displacement_m * CQC_CORRELATION_FACTOR,
        acceleration_g: srss.acceleration_g * CQC_CORRELATION_FACTOR,
    };

    log::debug!(
        "modal combination: V_cqc = ({:.1}, {:.1}) kN over {} modes",
        cqc.base_shear_x_kn,
        cqc.base_shear_y_kn,
        per_mode.len()
    );

    Ok(ModalCombination {
        per_mode,
        srss,
        cqc,
    })
}

/// Order-independent SRSS reduction over the mode set.
fn srss_of(responses: &[ModalResponse], value: impl Fn(&ModalResponse) -> f64) -> f64 {
    responses
        .iter()
        .map(|r| value(r).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BuildingGeometry, Damping, MassDistribution};
    use crate::modal::{EmpiricalModalAnalyzer, ModalAnalyzer};
    use crate::site::{RiskCategory, SiteInput};
    use approx::assert_relative_eq;

    fn test_inputs() -> (Vec<Mode>, DesignSpectrum) {
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.2, 8);
        let masses = MassDistribution::uniform(8, 450.0);
        let modes = EmpiricalModalAnalyzer
            .analyze(&geometry, &masses, &Damping::default())
            .unwrap();
        let profile = SiteInput::new("C", 1.0, 0.4, RiskCategory::II)
            .resolve()
            .unwrap();
        (modes, DesignSpectrum::from_profile(&profile))
    }

    #[test]
    fn test_cqc_exceeds_srss() {
        let (modes, spectrum) = test_inputs();
        let combo = combine(&modes, &spectrum).unwrap();

        assert!(combo.cqc.base_shear_x_kn >= combo.srss.base_shear_x_kn);
        assert!(combo.cqc.base_shear_y_kn >= combo.srss.base_shear_y_kn);
        assert!(combo.cqc.displacement_m >= combo.srss.displacement_m);
        assert_relative_eq!(
            combo.cqc.base_shear_x_kn,
            combo.srss.base_shear_x_kn * 1.10,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_authoritative_is_cqc() {
        let (modes, spectrum) = test_inputs();
        let combo = combine(&modes, &spectrum).unwrap();
        assert_eq!(combo.authoritative().rule, CombinationRule::Cqc);
    }

    #[test]
    fn test_per_mode_count_and_order() {
        let (modes, spectrum) = test_inputs();
        let combo = combine(&modes, &spectrum).unwrap();
        assert_eq!(combo.per_mode.len(), modes.len());
        assert_eq!(combo.per_mode[0].mode_index, 1);
        // Fundamental mode carries the largest modal base shear
        let max_shear = combo
            .per_mode
            .iter()
            .map(|r| r.base_shear_x_kn)
            .fold(0.0f64, f64::max);
        assert_relative_eq!(combo.per_mode[0].base_shear_x_kn, max_shear);
    }

    #[test]
    fn test_single_mode_srss_is_identity() {
        let (modes, spectrum) = test_inputs();
        let first = &modes[..1];
        let combo = combine(first, &spectrum).unwrap();
        assert_relative_eq!(
            combo.srss.base_shear_x_kn,
            combo.per_mode[0].base_shear_x_kn,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_modal_shear_formula() {
        let (modes, spectrum) = test_inputs();
        let combo = combine(&modes, &spectrum).unwrap();
        let mode = &modes[0];
        let expected = spectrum.sa_at(mode.period_s) * GRAVITY_MPS2 * mode.modal_mass_t[0];
        assert_relative_eq!(combo.per_mode[0].base_shear_x_kn, expected);
    }

    #[test]
    fn test_empty_mode_list_errors() {
        let (_, spectrum) = test_inputs();
        let err = combine(&[], &spectrum).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
    }

    #[test]
    fn test_zero_spectrum_gives_zero_response() {
        let (modes, _) = test_inputs();
        let spectrum = DesignSpectrum::from_design_values(0.0, 0.0);
        let combo = combine(&modes, &spectrum).unwrap();
        assert_eq!(combo.cqc.base_shear_x_kn, 0.0);
        assert_eq!(combo.cqc.displacement_m, 0.0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let (modes, spectrum) = test_inputs();
        let combo = combine(&modes, &spectrum).unwrap();
        let json = serde_json::to_string(&combo).unwrap();
        let parsed: ModalCombination = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.per_mode.len(), combo.per_mode.len());
        assert_relative_eq!(parsed.cqc.base_shear_x_kn, combo.cqc.base_shear_x_kn);
    }
}
