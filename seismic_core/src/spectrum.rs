//! # Design Response Spectrum
//!
//! Builds the period → acceleration design curve from a resolved site
//! profile.
//!
//! ## Curve Shape
//!
//! The spectrum has four period regions separated by T0, TS, and TL:
//!
//! ```text
//! T ≤ T0:        Sa = SDS·(0.4 + 0.6·T/T0)     (rising ramp)
//! T0 < T ≤ TS:   Sa = SDS                       (flat plateau)
//! TS < T ≤ TL:   Sa = SD1/T                     (constant velocity)
//! T > TL:        Sa = SD1·TL/T²                 (constant displacement)
//! ```
//!
//! with T0 = 0.2·SD1/SDS, TS = SD1/SDS, and TL fixed at 8.0 s. The curve is
//! continuous at every breakpoint.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::site::{SiteInput, RiskCategory};
//! use seismic_core::spectrum::DesignSpectrum;
//!
//! let profile = SiteInput::new("C", 1.0, 0.4, RiskCategory::II)
//!     .resolve()
//!     .unwrap();
//! let spectrum = DesignSpectrum::from_profile(&profile);
//!
//! assert!((spectrum.t0_s - 0.1).abs() < 1e-9);
//! assert!((spectrum.ts_s - 0.5).abs() < 1e-9);
//! // On the plateau the spectral acceleration equals SDS
//! assert!((spectrum.sa_at(0.3) - 0.8).abs() < 1e-6);
//! ```
//!
//! ## Reference
//!
//! ASCE 7-22, Section 11.4.6: Design Response Spectrum

use serde::{Deserialize, Serialize};

use crate::site::SiteSeismicProfile;
use crate::units::GRAVITY_MPS2;

/// Sampling step for the tabulated curve (s)
pub const SAMPLE_STEP_S: f64 = 0.01;

/// Upper end of the tabulated period range (s)
pub const MAX_PERIOD_S: f64 = 10.0;

/// Long-period transition TL (s), fixed for this closed-form pipeline
pub const LONG_PERIOD_TRANSITION_S: f64 = 8.0;

/// One sampled point on the design spectrum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Period (s)
    pub period_s: f64,
    /// Spectral acceleration (g)
    pub sa_g: f64,
    /// Spectral velocity Sv = Sa·g·T/2π (m/s)
    pub sv_mps: f64,
    /// Spectral displacement Sd = Sa·g·T²/4π² (m)
    pub sd_m: f64,
}

/// The design response spectrum: sampled curve plus scalar breakpoints.
///
/// Acceleration is continuous and piecewise-monotonic across the four
/// period regions. A degenerate site (SDS = 0) yields an all-zero curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSpectrum {
    /// Sampled points at [`SAMPLE_STEP_S`] spacing from 0 to [`MAX_PERIOD_S`]
    pub points: Vec<SpectrumPoint>,

    /// Design short-period acceleration (g)
    pub sds_g: f64,

    /// Design 1-second acceleration (g)
    pub sd1_g: f64,

    /// Ramp/plateau transition T0 = 0.2·SD1/SDS (s)
    pub t0_s: f64,

    /// Plateau/velocity transition TS = SD1/SDS (s)
    pub ts_s: f64,

    /// Long-period transition TL (s)
    pub tl_s: f64,
}

impl DesignSpectrum {
    /// Build the design spectrum from a resolved site profile.
    pub fn from_profile(profile: &SiteSeismicProfile) -> DesignSpectrum {
        Self::from_design_values(profile.sds_g, profile.sd1_g)
    }

    /// Build directly from SDS/SD1 design values.
    pub fn from_design_values(sds_g: f64, sd1_g: f64) -> DesignSpectrum {
        let (t0_s, ts_s) = if sds_g > 0.0 {
            (0.2 * sd1_g / sds_g, sd1_g / sds_g)
        } else {
            // Degenerate site: flat zero spectrum, no meaningful breakpoints
            (0.0, 0.0)
        };
        let tl_s = LONG_PERIOD_TRANSITION_S;

        let n_samples = (MAX_PERIOD_S / SAMPLE_STEP_S).round() as usize + 1;
        let points = (0..n_samples)
            .map(|i| {
                let period_s = i as f64 * SAMPLE_STEP_S;
                let sa_g = sa_ordinate(period_s, sds_g, sd1_g, t0_s, ts_s, tl_s);
                let sv_mps = sa_g * GRAVITY_MPS2 * period_s / (2.0 * std::f64::consts::PI);
                let sd_m =
                    sa_g * GRAVITY_MPS2 * period_s.powi(2) / (4.0 * std::f64::consts::PI.powi(2));
                SpectrumPoint {
                    period_s,
                    sa_g,
                    sv_mps,
                    sd_m,
                }
            })
            .collect();

        DesignSpectrum {
            points,
            sds_g,
            sd1_g,
            t0_s,
            ts_s,
            tl_s,
        }
    }

    /// Spectral acceleration at an arbitrary period by linear interpolation
    /// on the sampled points, clamped at both domain edges.
    pub fn sa_at(&self, period_s: f64) -> f64 {
        interpolate(&self.points, period_s, |p| p.sa_g)
    }

    /// Spectral displacement at an arbitrary period (m), interpolated.
    pub fn sd_at(&self, period_s: f64) -> f64 {
        interpolate(&self.points, period_s, |p| p.sd_m)
    }
}

/// Closed-form spectral acceleration ordinate (g) for one period.
fn sa_ordinate(period_s: f64, sds_g: f64, sd1_g: f64, t0_s: f64, ts_s: f64, tl_s: f64) -> f64 {
    if sds_g <= 0.0 {
        return 0.0;
    }
    if period_s <= t0_s {
        if t0_s > 0.0 {
            sds_g * (0.4 + 0.6 * period_s / t0_s)
        } else {
            // SD1 = 0 collapses the ramp; plateau value applies from T = 0
            sds_g
        }
    } else if period_s <= ts_s {
        sds_g
    } else if period_s <= tl_s {
        sd1_g / period_s
    } else {
        sd1_g * tl_s / period_s.powi(2)
    }
}

/// Linear interpolation over uniformly sampled points, clamped at the edges.
fn interpolate(points: &[SpectrumPoint], period_s: f64, value: impl Fn(&SpectrumPoint) -> f64) -> f64 {
    let last = points.len() - 1;
    if period_s <= points[0].period_s {
        return value(&points[0]);
    }
    if period_s >= points[last].period_s {
        return value(&points[last]);
    }
    let idx = (period_s / SAMPLE_STEP_S).floor() as usize;
    let lo = &points[idx.min(last - 1)];
    let hi = &points[(idx + 1).min(last)];
    let span = hi.period_s - lo.period_s;
    if span <= 0.0 {
        return value(lo);
    }
    let t = (period_s - lo.period_s) / span;
    value(lo) + t * (value(hi) - value(lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{RiskCategory, SiteInput};
    use approx::assert_relative_eq;

    fn test_spectrum() -> DesignSpectrum {
        // SDS = 0.8, SD1 = 0.4 -> T0 = 0.1, TS = 0.5
        let profile = SiteInput::new("C", 1.0, 0.4, RiskCategory::II)
            .resolve()
            .unwrap();
        DesignSpectrum::from_profile(&profile)
    }

    #[test]
    fn test_breakpoints() {
        let spectrum = test_spectrum();
        assert_relative_eq!(spectrum.t0_s, 0.1, max_relative = 1e-12);
        assert_relative_eq!(spectrum.ts_s, 0.5, max_relative = 1e-12);
        assert_relative_eq!(spectrum.tl_s, 8.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_period_ordinate() {
        let spectrum = test_spectrum();
        // Sa(0) = 0.4·SDS
        assert_relative_eq!(spectrum.sa_at(0.0), 0.32, max_relative = 1e-9);
    }

    #[test]
    fn test_plateau_value() {
        let spectrum = test_spectrum();
        assert_relative_eq!(spectrum.sa_at(0.3), 0.8, max_relative = 1e-6);
        assert_relative_eq!(spectrum.sa_at(0.5), 0.8, max_relative = 1e-6);
    }

    #[test]
    fn test_velocity_region() {
        let spectrum = test_spectrum();
        // Example 3: T = 0.6 s > TS -> Sa = SD1/T = 0.4/0.6
        assert_relative_eq!(spectrum.sa_at(0.6), 0.4 / 0.6, max_relative = 1e-3);
    }

    #[test]
    fn test_continuity_at_breakpoints() {
        let spectrum = test_spectrum();
        let eps = 1e-6;

        let left_t0 = sa_ordinate(spectrum.t0_s - eps, 0.8, 0.4, 0.1, 0.5, 8.0);
        let right_t0 = sa_ordinate(spectrum.t0_s + eps, 0.8, 0.4, 0.1, 0.5, 8.0);
        assert!((left_t0 - right_t0).abs() < 1e-4);

        let left_ts = sa_ordinate(spectrum.ts_s - eps, 0.8, 0.4, 0.1, 0.5, 8.0);
        let right_ts = sa_ordinate(spectrum.ts_s + eps, 0.8, 0.4, 0.1, 0.5, 8.0);
        assert!((left_ts - right_ts).abs() < 1e-4);

        let left_tl = sa_ordinate(8.0, 0.8, 0.4, 0.1, 0.5, 8.0);
        let right_tl = sa_ordinate(8.0 + eps, 0.8, 0.4, 0.1, 0.5, 8.0);
        assert!((left_tl - right_tl).abs() < 1e-4);
    }

    #[test]
    fn test_strictly_decreasing_beyond_tl() {
        let spectrum = test_spectrum();
        let mut prev = spectrum.sa_at(8.0);
        for i in 1..=20 {
            let t = 8.0 + 0.1 * i as f64;
            let sa = spectrum.sa_at(t);
            assert!(sa < prev, "Sa must strictly decrease beyond TL at T={}", t);
            prev = sa;
        }
    }

    #[test]
    fn test_degenerate_site_yields_zero_spectrum() {
        let spectrum = DesignSpectrum::from_design_values(0.0, 0.0);
        assert!(spectrum.points.iter().all(|p| p.sa_g == 0.0));
        assert_eq!(spectrum.sa_at(1.0), 0.0);
    }

    #[test]
    fn test_zero_sd1_keeps_plateau() {
        // SD1 = 0 with SDS > 0: no ramp, plateau collapses at TS = 0,
        // velocity branch is zero everywhere
        let spectrum = DesignSpectrum::from_design_values(0.8, 0.0);
        assert_relative_eq!(spectrum.sa_at(0.0), 0.8);
        assert_eq!(spectrum.sa_at(1.0), 0.0);
    }

    #[test]
    fn test_interpolation_clamps_at_edges() {
        let spectrum = test_spectrum();
        assert_eq!(spectrum.sa_at(-1.0), spectrum.sa_at(0.0));
        assert_eq!(spectrum.sa_at(50.0), spectrum.sa_at(10.0));
    }

    #[test]
    fn test_velocity_and_displacement_spectra() {
        let spectrum = test_spectrum();
        let p = &spectrum.points[100]; // T = 1.0 s
        assert_relative_eq!(p.period_s, 1.0, max_relative = 1e-12);
        let expected_sv = p.sa_g * GRAVITY_MPS2 * 1.0 / (2.0 * std::f64::consts::PI);
        assert_relative_eq!(p.sv_mps, expected_sv, max_relative = 1e-12);
        let expected_sd = p.sa_g * GRAVITY_MPS2 / (4.0 * std::f64::consts::PI.powi(2));
        assert_relative_eq!(p.sd_m, expected_sd, max_relative = 1e-12);
    }

    #[test]
    fn test_sample_count() {
        let spectrum = test_spectrum();
        assert_eq!(spectrum.points.len(), 1001);
        assert_relative_eq!(
            spectrum.points.last().unwrap().period_s,
            10.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let spectrum = test_spectrum();
        let json = serde_json::to_string(&spectrum).unwrap();
        let parsed: DesignSpectrum = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.points.len(), spectrum.points.len());
        assert_relative_eq!(parsed.sds_g, spectrum.sds_g);
    }
}
