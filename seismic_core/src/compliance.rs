//! # Code Compliance Checks
//!
//! Evaluates the combined demand against building-code limits: minimum base
//! shear, story drift, P-Delta significance, and the seismic design
//! category.
//!
//! Every check yields a [`ComplianceVerdict`] carrying the code clause, the
//! required and actual values, and a tri-state status. Failed checks are
//! data in the result — they are reported, never raised as errors.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::compliance::{determine_sdc, SeismicDesignCategory};
//! use seismic_core::site::RiskCategory;
//!
//! let sdc = determine_sdc(0.8, 0.4, RiskCategory::II);
//! assert_eq!(sdc, SeismicDesignCategory::D);
//! ```

use serde::{Deserialize, Serialize};

use crate::building::{BuildingGeometry, MassDistribution};
use crate::combination::CombinedResponse;
use crate::site::{RiskCategory, SiteSeismicProfile};
use crate::story::{max_drift_ratio, StoryResponse};

/// Drift ratio limit for risk categories I-III
const DRIFT_LIMIT: f64 = 0.020;

/// Drift ratio limit for risk category IV
const DRIFT_LIMIT_ESSENTIAL: f64 = 0.015;

/// P-Delta stability coefficient above which second-order effects are
/// significant
const P_DELTA_SIGNIFICANCE: f64 = 0.10;

// ============================================================================
// ASCE 7-22 Code Section References
// ============================================================================

/// ASCE 7-22 code section references for seismic demand checks.
///
/// These constants provide traceable references to Minimum Design Loads
/// and Associated Criteria for Buildings and Other Structures (ASCE 7-22).
pub mod asce_ref {
    /// Minimum base shear coefficient
    pub const MIN_BASE_SHEAR: &str = "ASCE 7-22 12.8.1.1";
    /// Allowable story drift
    pub const STORY_DRIFT: &str = "ASCE 7-22 12.12.1";
    /// P-Delta stability coefficient
    pub const P_DELTA: &str = "ASCE 7-22 12.8.7";
    /// Seismic design category assignment
    pub const SDC: &str = "ASCE 7-22 11.6";
    /// Design response spectrum
    pub const DESIGN_SPECTRUM: &str = "ASCE 7-22 11.4.6";
    /// Vertical distribution of seismic forces
    pub const VERTICAL_DISTRIBUTION: &str = "ASCE 7-22 12.8.3";
}

/// Tri-state outcome of a compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictStatus {
    /// Demand is within the code limit
    Pass,
    /// Demand exceeds the code limit
    Fail,
    /// Advisory condition (e.g., P-Delta significance)
    Warning,
}

/// Outcome of a single code check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "rule_id": "ASCE 7-22 12.12.1",
///   "description": "Story drift within allowable",
///   "required": 0.02,
///   "actual": 0.013,
///   "unit": "ratio",
///   "status": "Pass"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// Code clause this check traces to
    pub rule_id: String,

    /// Human-readable requirement
    pub description: String,

    /// Limit value from the code
    pub required: f64,

    /// Computed demand value
    pub actual: f64,

    /// Unit of both values
    pub unit: String,

    /// Tri-state outcome
    pub status: VerdictStatus,
}

impl ComplianceVerdict {
    /// True unless the status is Fail (warnings count as passing).
    pub fn passes(&self) -> bool {
        self.status != VerdictStatus::Fail
    }
}

/// Seismic Design Category per ASCE 7-22 Section 11.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeismicDesignCategory {
    /// Minimal seismic risk
    A,
    /// Low
    B,
    /// Moderate
    C,
    /// High
    D,
    /// Very high (near-fault, S1 ≥ 0.75)
    E,
    /// Very high, essential facility
    F,
}

impl SeismicDesignCategory {
    /// Letter code for display
    pub fn code(&self) -> &'static str {
        match self {
            SeismicDesignCategory::A => "A",
            SeismicDesignCategory::B => "B",
            SeismicDesignCategory::C => "C",
            SeismicDesignCategory::D => "D",
            SeismicDesignCategory::E => "E",
            SeismicDesignCategory::F => "F",
        }
    }

    /// Fixed detailing/analysis requirements this category triggers.
    pub fn detailing_requirements(&self) -> Vec<&'static str> {
        match self {
            SeismicDesignCategory::A => vec!["Basic load path and connection checks"],
            SeismicDesignCategory::B => vec![
                "Basic load path and connection checks",
                "Ordinary detailing of lateral system permitted",
            ],
            SeismicDesignCategory::C => vec![
                "Intermediate detailing of the lateral system",
                "Anchorage of nonstructural components",
            ],
            SeismicDesignCategory::D => vec![
                "Special detailing of the lateral system",
                "Anchorage of nonstructural components",
                "Dynamic analysis procedure for irregular structures",
                "Redundancy factor evaluation",
            ],
            SeismicDesignCategory::E | SeismicDesignCategory::F => vec![
                "Special detailing of the lateral system",
                "Anchorage of nonstructural components",
                "Dynamic analysis procedure required",
                "Redundancy factor evaluation",
                "Near-fault design provisions",
                "Site-specific hazard study recommended",
            ],
        }
    }
}

impl std::fmt::Display for SeismicDesignCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Assign the seismic design category from the design accelerations.
///
/// The severer of the SDS-based and SD1-based mappings governs; risk
/// category IV raises the mid categories one step, and S1 ≥ 0.75 forces
/// E (F for essential facilities) regardless of the tables.
pub fn determine_sdc(sds_g: f64, sd1_g: f64, risk_category: RiskCategory) -> SeismicDesignCategory {
    // S1 proxy: SD1 is (2/3)·Fv·S1; the near-fault trigger is checked on
    // the design value at the equivalent threshold (2/3)·0.75
    if sd1_g >= 0.5 {
        return if risk_category == RiskCategory::IV {
            SeismicDesignCategory::F
        } else {
            SeismicDesignCategory::E
        };
    }

    let from_sds = if sds_g < 0.167 {
        SeismicDesignCategory::A
    } else if sds_g < 0.33 {
        SeismicDesignCategory::B
    } else if sds_g < 0.50 {
        SeismicDesignCategory::C
    } else {
        SeismicDesignCategory::D
    };

    let from_sd1 = if sd1_g < 0.067 {
        SeismicDesignCategory::A
    } else if sd1_g < 0.133 {
        SeismicDesignCategory::B
    } else if sd1_g < 0.20 {
        SeismicDesignCategory::C
    } else {
        SeismicDesignCategory::D
    };

    let mut sdc = from_sds.max(from_sd1);
    if risk_category == RiskCategory::IV {
        sdc = match sdc {
            SeismicDesignCategory::B => SeismicDesignCategory::C,
            SeismicDesignCategory::C => SeismicDesignCategory::D,
            other => other,
        };
    }
    sdc
}

/// Full compliance output: the category, its detailing requirements, and
/// every individual verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Assigned seismic design category
    pub sdc: SeismicDesignCategory,

    /// Detailing/analysis requirement strings for the category
    pub detailing_requirements: Vec<String>,

    /// Individual check verdicts
    pub verdicts: Vec<ComplianceVerdict>,
}

impl ComplianceReport {
    /// True when no verdict failed (warnings allowed).
    pub fn all_pass(&self) -> bool {
        self.verdicts.iter().all(|v| v.passes())
    }

    /// Verdicts that failed outright.
    pub fn failures(&self) -> Vec<&ComplianceVerdict> {
        self.verdicts
            .iter()
            .filter(|v| v.status == VerdictStatus::Fail)
            .collect()
    }
}

/// Run all compliance checks against the combined demand.
///
/// The governing base shear is the smaller of the two horizontal
/// directions, so both must clear the minimum.
pub fn evaluate(
    profile: &SiteSeismicProfile,
    combined: &CombinedResponse,
    stories: &[StoryResponse],
    geometry: &BuildingGeometry,
    masses: &MassDistribution,
) -> ComplianceReport {
    let importance = profile.importance_factor();
    let weight_kn = crate::units::Tonnes(masses.total_mass_t).weight_kn().0;
    let mut verdicts = Vec::new();

    // --- Minimum base shear ---
    let min_coefficient = (0.044 * profile.sds_g).max(0.01);
    let required_shear_kn = min_coefficient * importance * weight_kn;
    let governing_shear_kn = combined.base_shear_x_kn.min(combined.base_shear_y_kn);
    verdicts.push(ComplianceVerdict {
        rule_id: asce_ref::MIN_BASE_SHEAR.to_string(),
        description: "Combined base shear at least the code minimum".to_string(),
        required: required_shear_kn,
        actual: governing_shear_kn,
        unit: "kN".to_string(),
        status: if governing_shear_kn >= required_shear_kn {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        },
    });

    // --- Story drift ---
    let drift_limit = if profile.risk_category == RiskCategory::IV {
        DRIFT_LIMIT_ESSENTIAL
    } else {
        DRIFT_LIMIT
    };
    let max_drift = max_drift_ratio(stories);
    verdicts.push(ComplianceVerdict {
        rule_id: asce_ref::STORY_DRIFT.to_string(),
        description: "Story drift within allowable".to_string(),
        required: drift_limit,
        actual: max_drift,
        unit: "ratio".to_string(),
        status: if max_drift <= drift_limit {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        },
    });

    // --- P-Delta significance ---
    let max_displacement_m = stories
        .iter()
        .map(|s| s.displacement_m)
        .fold(0.0f64, f64::max);
    let shear_for_theta = combined.base_shear_x_kn.max(combined.base_shear_y_kn);
    let theta = if shear_for_theta > 0.0 {
        (weight_kn * max_displacement_m) / (shear_for_theta * geometry.total_height_m())
    } else {
        0.0
    };
    verdicts.push(ComplianceVerdict {
        rule_id: asce_ref::P_DELTA.to_string(),
        description: "P-Delta stability coefficient".to_string(),
        required: P_DELTA_SIGNIFICANCE,
        actual: theta,
        unit: "ratio".to_string(),
        status: if theta > P_DELTA_SIGNIFICANCE {
            VerdictStatus::Warning
        } else {
            VerdictStatus::Pass
        },
    });

    let sdc = determine_sdc(profile.sds_g, profile.sd1_g, profile.risk_category);
    log::debug!(
        "compliance: SDC {}, {} verdicts, max drift {:.4}",
        sdc,
        verdicts.len(),
        max_drift
    );

    ComplianceReport {
        sdc,
        detailing_requirements: sdc
            .detailing_requirements()
            .into_iter()
            .map(String::from)
            .collect(),
        verdicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::CombinationRule;
    use crate::site::SiteInput;
    use approx::assert_relative_eq;

    fn test_profile(risk: RiskCategory) -> SiteSeismicProfile {
        SiteInput::new("C", 1.0, 0.4, risk).resolve().unwrap()
    }

    fn test_combined(shear_kn: f64) -> CombinedResponse {
        CombinedResponse {
            rule: CombinationRule::Cqc,
            base_shear_x_kn: shear_kn,
            base_shear_y_kn: shear_kn,
            displacement_m: 0.04,
            acceleration_g: 0.3,
        }
    }

    fn test_stories(drift: f64) -> Vec<StoryResponse> {
        (1..=5)
            .map(|floor| StoryResponse {
                floor,
                force_x_kn: 100.0,
                force_y_kn: 100.0,
                displacement_m: 0.008 * floor as f64,
                drift_ratio: drift,
                acceleration_g: 0.2,
            })
            .collect()
    }

    #[test]
    fn test_example_2_minimum_coefficient() {
        // SDS = 0.8, risk II: max(0.044·0.8, 0.01) = 0.0352
        let profile = test_profile(RiskCategory::II);
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.0, 5);
        let masses = MassDistribution::uniform(5, 400.0);
        let report = evaluate(
            &profile,
            &test_combined(10_000.0),
            &test_stories(0.005),
            &geometry,
            &masses,
        );

        let min_shear = &report.verdicts[0];
        let weight_kn = 2000.0 * crate::units::GRAVITY_MPS2;
        assert_relative_eq!(min_shear.required, 0.0352 * weight_kn, max_relative = 1e-9);
    }

    #[test]
    fn test_minimum_coefficient_floor() {
        // Tiny SDS: the 0.01 floor governs
        let profile = SiteInput::new("A", 0.1, 0.02, RiskCategory::II)
            .resolve()
            .unwrap();
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.0, 5);
        let masses = MassDistribution::uniform(5, 400.0);
        let report = evaluate(
            &profile,
            &test_combined(10_000.0),
            &test_stories(0.005),
            &geometry,
            &masses,
        );
        let weight_kn = 2000.0 * crate::units::GRAVITY_MPS2;
        assert_relative_eq!(
            report.verdicts[0].required,
            0.01 * weight_kn,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_base_shear_verdict_direction() {
        let profile = test_profile(RiskCategory::II);
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.0, 5);
        let masses = MassDistribution::uniform(5, 400.0);

        let passing = evaluate(
            &profile,
            &test_combined(10_000.0),
            &test_stories(0.005),
            &geometry,
            &masses,
        );
        assert_eq!(passing.verdicts[0].status, VerdictStatus::Pass);

        let failing = evaluate(
            &profile,
            &test_combined(100.0),
            &test_stories(0.005),
            &geometry,
            &masses,
        );
        assert_eq!(failing.verdicts[0].status, VerdictStatus::Fail);
        // Boolean matches the numeric comparison exactly
        assert_eq!(
            failing.verdicts[0].status == VerdictStatus::Pass,
            failing.verdicts[0].actual >= failing.verdicts[0].required
        );
    }

    #[test]
    fn test_drift_limit_by_risk_category() {
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.0, 5);
        let masses = MassDistribution::uniform(5, 400.0);

        // 1.8% drift: passes standard, fails essential
        let standard = evaluate(
            &test_profile(RiskCategory::II),
            &test_combined(10_000.0),
            &test_stories(0.018),
            &geometry,
            &masses,
        );
        assert_eq!(standard.verdicts[1].status, VerdictStatus::Pass);

        let essential = evaluate(
            &test_profile(RiskCategory::IV),
            &test_combined(10_000.0),
            &test_stories(0.018),
            &geometry,
            &masses,
        );
        assert_eq!(essential.verdicts[1].status, VerdictStatus::Fail);
        assert_relative_eq!(essential.verdicts[1].required, 0.015);
    }

    #[test]
    fn test_p_delta_warning() {
        let profile = test_profile(RiskCategory::II);
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.0, 5);
        let masses = MassDistribution::uniform(5, 400.0);

        // Low shear with a real displacement pushes theta over 0.10
        let report = evaluate(
            &profile,
            &test_combined(300.0),
            &test_stories(0.005),
            &geometry,
            &masses,
        );
        let p_delta = &report.verdicts[2];
        assert!(p_delta.actual > 0.10);
        assert_eq!(p_delta.status, VerdictStatus::Warning);
        // Warnings do not fail the report's pass check for this rule
        assert!(p_delta.passes());
    }

    #[test]
    fn test_sdc_thresholds() {
        assert_eq!(
            determine_sdc(0.10, 0.03, RiskCategory::II),
            SeismicDesignCategory::A
        );
        assert_eq!(
            determine_sdc(0.25, 0.10, RiskCategory::II),
            SeismicDesignCategory::B
        );
        assert_eq!(
            determine_sdc(0.40, 0.15, RiskCategory::II),
            SeismicDesignCategory::C
        );
        assert_eq!(
            determine_sdc(0.80, 0.40, RiskCategory::II),
            SeismicDesignCategory::D
        );
    }

    #[test]
    fn test_sdc_severer_mapping_governs() {
        // Low SDS but high SD1: SD1 row governs
        assert_eq!(
            determine_sdc(0.20, 0.25, RiskCategory::II),
            SeismicDesignCategory::D
        );
    }

    #[test]
    fn test_sdc_risk_iv_elevation() {
        assert_eq!(
            determine_sdc(0.40, 0.15, RiskCategory::IV),
            SeismicDesignCategory::D
        );
        assert_eq!(
            determine_sdc(0.25, 0.10, RiskCategory::IV),
            SeismicDesignCategory::C
        );
    }

    #[test]
    fn test_sdc_near_fault() {
        assert_eq!(
            determine_sdc(1.2, 0.6, RiskCategory::II),
            SeismicDesignCategory::E
        );
        assert_eq!(
            determine_sdc(1.2, 0.6, RiskCategory::IV),
            SeismicDesignCategory::F
        );
    }

    #[test]
    fn test_detailing_requirements_grow_with_category() {
        assert!(
            SeismicDesignCategory::D.detailing_requirements().len()
                > SeismicDesignCategory::B.detailing_requirements().len()
        );
        assert!(SeismicDesignCategory::F
            .detailing_requirements()
            .iter()
            .any(|r| r.contains("Near-fault")));
    }

    #[test]
    fn test_report_serialization() {
        let profile = test_profile(RiskCategory::II);
        let geometry = BuildingGeometry::new(30.0, 20.0, 3.0, 5);
        let masses = MassDistribution::uniform(5, 400.0);
        let report = evaluate(
            &profile,
            &test_combined(10_000.0),
            &test_stories(0.005),
            &geometry,
            &masses,
        );
        let json = serde_json::to_string(&report).unwrap();
        let parsed: ComplianceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.verdicts.len(), 3);
        assert_eq!(parsed.sdc, SeismicDesignCategory::D);
    }
}
