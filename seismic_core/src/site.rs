//! # Site Seismic Parameters
//!
//! Resolves raw site inputs (mapped accelerations, site class, risk
//! category) into the design spectral coefficients that drive the rest of
//! the pipeline.
//!
//! ## Overview
//!
//! Mapped accelerations Ss and S1 are amplified by site coefficients Fa and
//! Fv looked up from fixed tables keyed by site class, then reduced to
//! design values:
//!
//! ```text
//! SMS = Fa × Ss        SDS = (2/3) × SMS
//! SM1 = Fv × S1        SD1 = (2/3) × SM1
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::site::{SiteInput, RiskCategory};
//!
//! let input = SiteInput::new("C", 1.0, 0.4, RiskCategory::II);
//! let profile = input.resolve().unwrap();
//!
//! assert!((profile.sds_g - 0.8).abs() < 1e-9);
//! assert!((profile.sd1_g - 0.4).abs() < 1e-9);
//! ```
//!
//! ## Reference
//!
//! ASCE 7-22, Chapter 11: Seismic Design Criteria, Section 11.4

use serde::{Deserialize, Serialize};

use crate::errors::{SeismicError, SeismicResult};

/// Reduction applied to Fa above Ss = 1.5 g and to Fv above S1 = 0.75 g.
///
/// Soft soils amplify weak shaking more than strong shaking; the fixed
/// tables are capped with this single down-adjustment at high intensity.
const HIGH_INTENSITY_REDUCTION: f64 = 0.9;

/// Ss threshold above which Fa is reduced (g)
const SS_REDUCTION_THRESHOLD: f64 = 1.5;

/// S1 threshold above which Fv is reduced (g)
const S1_REDUCTION_THRESHOLD: f64 = 0.75;

/// Site class per ASCE 7-22 Table 20.3-1 (6-level ordinal, A = hardest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SiteClass {
    /// Hard rock (vs30 > 1500 m/s)
    A,
    /// Rock (760 - 1500 m/s)
    B,
    /// Very dense soil or soft rock (360 - 760 m/s)
    C,
    /// Stiff soil (180 - 360 m/s)
    D,
    /// Soft clay (< 180 m/s)
    E,
    /// Soils requiring site-specific evaluation (liquefiable, sensitive clays)
    ///
    /// Treated with class E coefficients in this closed-form pipeline.
    F,
}

impl SiteClass {
    /// All site classes for UI selection
    pub const ALL: [SiteClass; 6] = [
        SiteClass::A,
        SiteClass::B,
        SiteClass::C,
        SiteClass::D,
        SiteClass::E,
        SiteClass::F,
    ];

    /// Parse a site class label ("C", "SC", "sc" are all class C).
    ///
    /// Returns `None` for unrecognized labels; the caller decides whether a
    /// fallback is permitted.
    pub fn parse(label: &str) -> Option<SiteClass> {
        let trimmed = label.trim().trim_start_matches(['S', 's']);
        match trimmed.to_ascii_uppercase().as_str() {
            "A" => Some(SiteClass::A),
            "B" => Some(SiteClass::B),
            "C" => Some(SiteClass::C),
            "D" => Some(SiteClass::D),
            "E" => Some(SiteClass::E),
            "F" => Some(SiteClass::F),
            _ => None,
        }
    }

    /// Short-period site coefficient Fa (base table value)
    pub fn fa(&self) -> f64 {
        match self {
            SiteClass::A => 0.8,
            SiteClass::B => 0.9,
            SiteClass::C => 1.2,
            SiteClass::D => 1.1,
            SiteClass::E => 1.6,
            SiteClass::F => 1.6,
        }
    }

    /// Long-period site coefficient Fv (base table value)
    pub fn fv(&self) -> f64 {
        match self {
            SiteClass::A => 0.8,
            SiteClass::B => 0.8,
            SiteClass::C => 1.5,
            SiteClass::D => 1.9,
            SiteClass::E => 3.0,
            SiteClass::F => 3.0,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SiteClass::A => "A - Hard Rock",
            SiteClass::B => "B - Rock",
            SiteClass::C => "C - Very Dense Soil",
            SiteClass::D => "D - Stiff Soil",
            SiteClass::E => "E - Soft Clay",
            SiteClass::F => "F - Site-Specific Required",
        }
    }
}

impl std::fmt::Display for SiteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Risk category per ASCE 7-22 Table 1.5-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum RiskCategory {
    /// Low hazard to human life (agricultural, minor storage)
    I,
    /// All buildings not in I, III, or IV
    #[default]
    II,
    /// Substantial hazard (large assembly, schools)
    III,
    /// Essential facilities (hospitals, fire stations)
    IV,
}

impl RiskCategory {
    /// All risk categories for UI selection
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::I,
        RiskCategory::II,
        RiskCategory::III,
        RiskCategory::IV,
    ];

    /// Seismic importance factor Ie per ASCE 7-22 Table 1.5-2
    pub fn importance_factor(&self) -> f64 {
        match self {
            RiskCategory::I => 1.0,
            RiskCategory::II => 1.0,
            RiskCategory::III => 1.25,
            RiskCategory::IV => 1.5,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskCategory::I => "I (Low Hazard)",
            RiskCategory::II => "II (Standard)",
            RiskCategory::III => "III (Substantial Hazard)",
            RiskCategory::IV => "IV (Essential)",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Raw site inputs before resolution.
///
/// The site class is carried as the user-entered label so that unrecognized
/// values surface as a structured error rather than a silent default.
///
/// ## JSON Example
///
/// ```json
/// {
///   "site_class": "D",
///   "latitude": 37.77,
///   "longitude": -122.42,
///   "risk_category": "II",
///   "ss_g": 1.5,
///   "s1_g": 0.6,
///   "allow_class_fallback": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInput {
    /// Site class label as entered ("C", "SC", ...)
    pub site_class: String,

    /// Site latitude in decimal degrees
    #[serde(default)]
    pub latitude: f64,

    /// Site longitude in decimal degrees
    #[serde(default)]
    pub longitude: f64,

    /// Risk category of the structure
    pub risk_category: RiskCategory,

    /// Mapped short-period spectral acceleration Ss (g)
    pub ss_g: f64,

    /// Mapped 1-second spectral acceleration S1 (g)
    pub s1_g: f64,

    /// Permit falling back to the stiffest tabulated class when the label
    /// is unrecognized. Never applied silently.
    #[serde(default)]
    pub allow_class_fallback: bool,
}

impl SiteInput {
    /// Create a site input with coordinates at the origin and no fallback.
    pub fn new(site_class: impl Into<String>, ss_g: f64, s1_g: f64, risk_category: RiskCategory) -> Self {
        SiteInput {
            site_class: site_class.into(),
            latitude: 0.0,
            longitude: 0.0,
            risk_category,
            ss_g,
            s1_g,
            allow_class_fallback: false,
        }
    }

    /// Set site coordinates (builder pattern)
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Permit class fallback (builder pattern)
    pub fn with_class_fallback(mut self) -> Self {
        self.allow_class_fallback = true;
        self
    }

    /// Validate raw inputs.
    pub fn validate(&self) -> SeismicResult<()> {
        if self.ss_g < 0.0 {
            return Err(SeismicError::invalid_input(
                "ss_g",
                self.ss_g.to_string(),
                "Mapped acceleration Ss must be non-negative",
            ));
        }
        if self.s1_g < 0.0 {
            return Err(SeismicError::invalid_input(
                "s1_g",
                self.s1_g.to_string(),
                "Mapped acceleration S1 must be non-negative",
            ));
        }
        Ok(())
    }

    /// Resolve raw inputs into a [`SiteSeismicProfile`].
    ///
    /// Looks up Fa/Fv for the site class, applies the high-intensity
    /// reductions, and computes SMS, SM1, SDS, SD1, PGA, and PGV.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if Ss or S1 is negative
    /// * `UnknownSiteClass` if the label is unrecognized and
    ///   `allow_class_fallback` is false
    pub fn resolve(&self) -> SeismicResult<SiteSeismicProfile> {
        self.validate()?;

        let class = match SiteClass::parse(&self.site_class) {
            Some(class) => class,
            None if self.allow_class_fallback => {
                log::warn!(
                    "site class '{}' unrecognized, falling back to class C",
                    self.site_class
                );
                SiteClass::C
            }
            None => return Err(SeismicError::unknown_site_class(&self.site_class)),
        };

        let mut fa = class.fa();
        if self.ss_g > SS_REDUCTION_THRESHOLD {
            fa *= HIGH_INTENSITY_REDUCTION;
        }
        let mut fv = class.fv();
        if self.s1_g > S1_REDUCTION_THRESHOLD {
            fv *= HIGH_INTENSITY_REDUCTION;
        }

        let sms_g = fa * self.ss_g;
        let sm1_g = fv * self.s1_g;
        let sds_g = 2.0 / 3.0 * sms_g;
        let sd1_g = 2.0 / 3.0 * sm1_g;

        // PGA per the general approximation PGA = 0.4 SDS; PGV from the
        // spectral velocity at T = 1 s (Sv = Sa g T / 2π).
        let pga_g = 0.4 * sds_g;
        let pgv_mps = sd1_g * crate::units::GRAVITY_MPS2 / (2.0 * std::f64::consts::PI);

        Ok(SiteSeismicProfile {
            site_class: class,
            latitude: self.latitude,
            longitude: self.longitude,
            risk_category: self.risk_category,
            ss_g: self.ss_g,
            s1_g: self.s1_g,
            fa,
            fv,
            sms_g,
            sm1_g,
            sds_g,
            sd1_g,
            pga_g,
            pgv_mps,
        })
    }
}

/// Site-adjusted spectral coefficients.
///
/// Immutable once resolved; downstream stages read it by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSeismicProfile {
    /// Resolved site class
    pub site_class: SiteClass,

    /// Site latitude in decimal degrees
    pub latitude: f64,

    /// Site longitude in decimal degrees
    pub longitude: f64,

    /// Risk category of the structure
    pub risk_category: RiskCategory,

    /// Mapped short-period spectral acceleration Ss (g)
    pub ss_g: f64,

    /// Mapped 1-second spectral acceleration S1 (g)
    pub s1_g: f64,

    /// Short-period site coefficient after intensity adjustment
    pub fa: f64,

    /// Long-period site coefficient after intensity adjustment
    pub fv: f64,

    /// Site-modified short-period acceleration SMS = Fa·Ss (g)
    pub sms_g: f64,

    /// Site-modified 1-second acceleration SM1 = Fv·S1 (g)
    pub sm1_g: f64,

    /// Design short-period acceleration SDS = (2/3)·SMS (g)
    pub sds_g: f64,

    /// Design 1-second acceleration SD1 = (2/3)·SM1 (g)
    pub sd1_g: f64,

    /// Peak ground acceleration estimate (g)
    pub pga_g: f64,

    /// Peak ground velocity estimate (m/s)
    pub pgv_mps: f64,
}

impl SiteSeismicProfile {
    /// Seismic importance factor for this profile's risk category
    pub fn importance_factor(&self) -> f64 {
        self.risk_category.importance_factor()
    }
}
