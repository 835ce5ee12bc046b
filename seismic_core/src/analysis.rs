//! # Analysis Pipeline
//!
//! Runs the full seismic demand pipeline and aggregates every stage output
//! into one immutable [`AnalysisResult`].
//!
//! ## Pipeline
//!
//! ```text
//! SiteInput ──resolve──▶ SiteSeismicProfile
//!                │
//!                ├──▶ DesignSpectrum ──┐
//! Building ──▶ Modes ─────────────────┴──▶ ModalCombination
//!                │                              │
//!                │                              ├──▶ StoryResponse table
//!                │                              ├──▶ ComplianceReport
//! GroundMotion ──┴──▶ TimeHistoryTrace          └──▶ PerformanceAssessment
//! ```
//!
//! Each stage is a pure function over the prior stage's record. Validation
//! errors abort before any physics runs; every other irregularity (low mass
//! participation, failed code checks) is data inside the result.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::analysis::{run_analysis, AnalysisInput};
//! use seismic_core::building::{BuildingGeometry, MassDistribution};
//! use seismic_core::site::{SiteInput, RiskCategory};
//!
//! let input = AnalysisInput::new(
//!     BuildingGeometry::new(30.0, 20.0, 3.2, 8),
//!     MassDistribution::uniform(8, 450.0),
//!     SiteInput::new("C", 1.0, 0.4, RiskCategory::II),
//! );
//!
//! let result = run_analysis(&input).unwrap();
//! assert!(result.converged);
//! assert!(!result.recommendations.is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::building::{BuildingGeometry, Damping, MassDistribution, MaterialSummary};
use crate::combination::{combine, ModalCombination};
use crate::compliance::{self, ComplianceReport, SeismicDesignCategory, VerdictStatus};
use crate::errors::SeismicResult;
use crate::modal::{mass_participation, EmpiricalModalAnalyzer, Mode, ModalAnalyzer};
use crate::performance::{assess, PerformanceAssessment, PerformanceLevel};
use crate::site::{SiteInput, SiteSeismicProfile};
use crate::spectrum::DesignSpectrum;
use crate::story::{distribute, max_drift_ratio, StoryResponse};
use crate::time_history::{simulate, GroundMotionRecord, SyntheticRecordGenerator, TimeHistoryTrace};

/// Current schema version for serialized analysis results
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Mass-participation fraction every axis must reach for convergence
pub const CONVERGENCE_THRESHOLD: f64 = 0.90;

/// Fixed message emitted when no recommendation trigger fires
pub const SATISFACTORY_MESSAGE: &str =
    "Analysis satisfactory: demand within code limits and modal model converged.";

/// Complete input for one analysis invocation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "geometry": { "length_m": 30.0, "width_m": 20.0, "floor_height_m": 3.2,
///                 "floor_count": 8, "bay_spacing_x_m": 6.0,
///                 "bay_spacing_y_m": 6.0, "vertical_irregularity": false },
///   "masses": { "total_mass_t": 3600.0,
///               "floor_masses_t": [450.0, 450.0, 450.0, 450.0,
///                                   450.0, 450.0, 450.0, 450.0] },
///   "site": { "site_class": "C", "risk_category": "II",
///             "ss_g": 1.0, "s1_g": 0.4 },
///   "damping": { "ratio": 0.05, "damping_type": "Proportional" },
///   "synthetic_seed": 42
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Building geometry descriptor
    pub geometry: BuildingGeometry,

    /// Mass distribution over height
    pub masses: MassDistribution,

    /// Structural material summary
    #[serde(default)]
    pub material: MaterialSummary,

    /// Raw site seismic inputs
    pub site: SiteInput,

    /// Viscous damping specification
    #[serde(default)]
    pub damping: Damping,

    /// Supplied ground-motion record for the time-history stage
    #[serde(default)]
    pub ground_motion: Option<GroundMotionRecord>,

    /// Seed for a synthetic record when no real record is supplied.
    /// None skips the time-history stage entirely.
    #[serde(default)]
    pub synthetic_seed: Option<u64>,
}

impl AnalysisInput {
    /// Create an input with default material, 5% damping, and no
    /// time-history stage.
    pub fn new(geometry: BuildingGeometry, masses: MassDistribution, site: SiteInput) -> Self {
        AnalysisInput {
            geometry,
            masses,
            material: MaterialSummary::default(),
            site,
            damping: Damping::default(),
            ground_motion: None,
            synthetic_seed: None,
        }
    }

    /// Attach a recorded ground motion (builder pattern)
    pub fn with_ground_motion(mut self, record: GroundMotionRecord) -> Self {
        self.ground_motion = Some(record);
        self
    }

    /// Request a synthetic record with an explicit seed (builder pattern)
    pub fn with_synthetic_seed(mut self, seed: u64) -> Self {
        self.synthetic_seed = Some(seed);
        self
    }

    /// Validate every sub-record. Fatal: the pipeline refuses to start on
    /// any invalid input.
    pub fn validate(&self) -> SeismicResult<()> {
        self.geometry.validate()?;
        self.masses.validate()?;
        self.material.validate()?;
        self.site.validate()?;
        self.damping.validate()?;
        if let Some(record) = &self.ground_motion {
            record.validate()?;
        }
        Ok(())
    }
}

/// Identity and provenance of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Unique id of this run
    pub id: Uuid,

    /// Schema version of the serialized result
    pub version: String,

    /// Creation timestamp (UTC)
    pub created: DateTime<Utc>,

    /// Seed of the synthetic ground motion, when one was generated
    pub ground_motion_seed: Option<u64>,
}

/// The aggregate analysis record.
///
/// Created once per invocation and never mutated afterwards; downstream
/// consumers (report, cost, visualization modules) treat it as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Run identity and provenance
    pub metadata: AnalysisMetadata,

    /// Resolved site profile
    pub profile: SiteSeismicProfile,

    /// Design response spectrum
    pub spectrum: DesignSpectrum,

    /// Ordered mode list
    pub modes: Vec<Mode>,

    /// Per-mode and combined (SRSS/CQC) responses
    pub combination: ModalCombination,

    /// Per-story force/displacement/drift table
    pub stories: Vec<StoryResponse>,

    /// Approximate time-history response, when a record was supplied or
    /// synthesis was requested
    pub time_history: Option<TimeHistoryTrace>,

    /// Code compliance verdicts and seismic design category
    pub compliance: ComplianceReport,

    /// Performance level, D/C ratios, fragility curves
    pub performance: PerformanceAssessment,

    /// Captured effective-mass fraction per axis: [x, y, torsion]
    pub mass_participation: [f64; 3],

    /// True when every axis reaches [`CONVERGENCE_THRESHOLD`]
    pub converged: bool,

    /// Ordered, deterministic recommendation strings
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Seismic design category shorthand
    pub fn sdc(&self) -> SeismicDesignCategory {
        self.compliance.sdc
    }

    /// True when all code checks pass and the modal model converged.
    pub fn is_satisfactory(&self) -> bool {
        self.converged && self.compliance.all_pass()
    }
}

/// Convergence rule: every axis must capture at least 90% of the mass.
pub fn is_converged(participation: &[f64; 3]) -> bool {
    participation.iter().all(|p| *p >= CONVERGENCE_THRESHOLD)
}

/// Run the pipeline with the default empirical modal analyzer.
pub fn run_analysis(input: &AnalysisInput) -> SeismicResult<AnalysisResult> {
    run_analysis_with(&EmpiricalModalAnalyzer, input)
}

/// Run the pipeline with a caller-supplied modal analyzer.
///
/// The analyzer seam lets a true eigensolver replace the empirical
/// approximation without changing any downstream stage.
pub fn run_analysis_with<A: ModalAnalyzer>(
    analyzer: &A,
    input: &AnalysisInput,
) -> SeismicResult<AnalysisResult> {
    input.validate()?;

    let profile = input.site.resolve()?;
    log::debug!(
        "analysis start: SDS = {:.3} g, SD1 = {:.3} g, {} floors",
        profile.sds_g,
        profile.sd1_g,
        input.geometry.floor_count
    );

    let spectrum = DesignSpectrum::from_profile(&profile);
    let modes = analyzer.analyze(&input.geometry, &input.masses, &input.damping)?;
    let combination = combine(&modes, &spectrum)?;

    let fundamental_period_s = modes[0].period_s;
    let stories = distribute(
        combination.authoritative(),
        &input.geometry,
        &input.masses,
        fundamental_period_s,
    )?;

    let time_history = match (&input.ground_motion, input.synthetic_seed) {
        (Some(record), _) => Some(simulate(
            record,
            &input.geometry,
            &input.masses,
            fundamental_period_s,
        )?),
        (None, Some(seed)) => {
            let record = SyntheticRecordGenerator::new(seed).generate(
                format!("GM-synthetic-{}", seed),
                6.5,
                20.0,
            );
            Some(simulate(
                &record,
                &input.geometry,
                &input.masses,
                fundamental_period_s,
            )?)
        }
        (None, None) => None,
    };

    let compliance = compliance::evaluate(
        &profile,
        combination.authoritative(),
        &stories,
        &input.geometry,
        &input.masses,
    );
    let performance = assess(max_drift_ratio(&stories));

    let participation = mass_participation(&modes);
    let converged = is_converged(&participation);
    if !converged {
        log::warn!(
            "modal model did not converge: participation {:?} below {:.0}%",
            participation,
            CONVERGENCE_THRESHOLD * 100.0
        );
    }

    let recommendations = build_recommendations(converged, &compliance, &performance);

    Ok(AnalysisResult {
        metadata: AnalysisMetadata {
            id: Uuid::new_v4(),
            version: SCHEMA_VERSION.to_string(),
            created: Utc::now(),
            ground_motion_seed: time_history.as_ref().and_then(|t| t.seed),
        },
        profile,
        spectrum,
        modes,
        combination,
        stories,
        time_history,
        compliance,
        performance,
        mass_participation: participation,
        converged,
        recommendations,
    })
}

/// Deterministic, ordered recommendation synthesis.
///
/// Trigger order: non-convergence, drift non-compliance, insufficient base
/// shear, collapse-prevention performance, high seismic design category.
/// With no trigger, the fixed satisfactory message is emitted alone.
fn build_recommendations(
    converged: bool,
    compliance: &ComplianceReport,
    performance: &PerformanceAssessment,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !converged {
        recommendations.push(
            "Modal mass participation is below 90% in at least one axis; \
             increase the mode count or substitute a refined modal model."
                .to_string(),
        );
    }

    for verdict in &compliance.verdicts {
        if verdict.status != VerdictStatus::Fail {
            continue;
        }
        if verdict.rule_id == compliance::asce_ref::STORY_DRIFT {
            recommendations.push(format!(
                "Story drift {:.4} exceeds the allowable {:.4}; increase lateral \
                 stiffness (larger columns, added shear walls) per {}.",
                verdict.actual, verdict.required, verdict.rule_id
            ));
        } else if verdict.rule_id == compliance::asce_ref::MIN_BASE_SHEAR {
            recommendations.push(format!(
                "Combined base shear {:.0} kN is below the code minimum {:.0} kN; \
                 scale design forces up per {}.",
                verdict.actual, verdict.required, verdict.rule_id
            ));
        }
    }

    if performance.level == PerformanceLevel::CollapsePrevention {
        recommendations.push(
            "Drift demand reaches the collapse-prevention range; a structural \
             retrofit or stiffness redistribution is strongly advised."
                .to_string(),
        );
    }

    if compliance.sdc >= SeismicDesignCategory::D {
        recommendations.push(format!(
            "Seismic design category {} requires special detailing and the \
             additional measures listed in the compliance report.",
            compliance.sdc
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(SATISFACTORY_MESSAGE.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::RiskCategory;
    use approx::assert_relative_eq;

    fn test_input() -> AnalysisInput {
        AnalysisInput::new(
            BuildingGeometry::new(30.0, 20.0, 3.2, 8),
            MassDistribution::uniform(8, 450.0),
            SiteInput::new("C", 1.0, 0.4, RiskCategory::II),
        )
    }

    #[test]
    fn test_full_pipeline_runs() {
        let result = run_analysis(&test_input()).unwrap();
        assert_eq!(result.modes.len(), 24);
        assert_eq!(result.stories.len(), 8);
        assert!(result.time_history.is_none());
        assert_eq!(result.metadata.version, SCHEMA_VERSION);
        assert!(result.converged);
    }

    #[test]
    fn test_invalid_input_aborts_before_computation() {
        let mut input = test_input();
        input.masses.total_mass_t = -10.0;
        assert!(run_analysis(&input).is_err());

        let mut input = test_input();
        input.damping.ratio = 0.5;
        assert!(run_analysis(&input).is_err());
    }

    #[test]
    fn test_example_5_convergence_rule() {
        // x and y pass but torsion misses 90%: not converged
        assert!(!is_converged(&[0.92, 0.91, 0.85]));
        assert!(is_converged(&[0.92, 0.91, 0.90]));
        assert!(!is_converged(&[0.89, 0.95, 0.95]));
    }

    #[test]
    fn test_convergence_flag_matches_rule() {
        let result = run_analysis(&test_input()).unwrap();
        assert_eq!(result.converged, is_converged(&result.mass_participation));
    }

    #[test]
    fn test_synthetic_seed_round_trip() {
        let input = test_input().with_synthetic_seed(42);
        let result = run_analysis(&input).unwrap();
        let trace = result.time_history.as_ref().unwrap();
        assert_eq!(trace.seed, Some(42));
        assert_eq!(result.metadata.ground_motion_seed, Some(42));
    }

    #[test]
    fn test_synthetic_runs_are_reproducible() {
        let input = test_input().with_synthetic_seed(7);
        let a = run_analysis(&input).unwrap();
        let b = run_analysis(&input).unwrap();
        let ta = a.time_history.unwrap();
        let tb = b.time_history.unwrap();
        assert_eq!(ta.base_shear_kn, tb.base_shear_kn);
        assert_relative_eq!(
            ta.floor_peaks[3].peak_displacement_m,
            tb.floor_peaks[3].peak_displacement_m
        );
    }

    #[test]
    fn test_supplied_record_takes_precedence() {
        let record = SyntheticRecordGenerator::new(99).generate("GM-supplied", 7.0, 15.0);
        let input = test_input()
            .with_ground_motion(record)
            .with_synthetic_seed(42);
        let result = run_analysis(&input).unwrap();
        assert_eq!(
            result.time_history.as_ref().unwrap().record_id,
            "GM-supplied"
        );
        assert_eq!(result.metadata.ground_motion_seed, Some(99));
    }

    #[test]
    fn test_high_sdc_recommendation_fires() {
        let result = run_analysis(&test_input()).unwrap();
        // SDS = 0.8 -> category D
        assert_eq!(result.sdc(), SeismicDesignCategory::D);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("category D")));
    }

    #[test]
    fn test_satisfactory_message_on_benign_site() {
        // Weak shaking on rock: everything passes, category A/B
        let input = AnalysisInput::new(
            BuildingGeometry::new(30.0, 20.0, 3.2, 8),
            MassDistribution::uniform(8, 450.0),
            SiteInput::new("B", 0.15, 0.04, RiskCategory::II),
        );
        let result = run_analysis(&input).unwrap();
        if result.is_satisfactory() && result.sdc() < SeismicDesignCategory::D {
            assert_eq!(result.recommendations, vec![SATISFACTORY_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn test_recommendation_order_is_deterministic() {
        let a = run_analysis(&test_input()).unwrap();
        let b = run_analysis(&test_input()).unwrap();
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn test_result_serialization_roundtrip() {
        let result = run_analysis(&test_input().with_synthetic_seed(5)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.modes.len(), result.modes.len());
        assert_eq!(parsed.metadata.id, result.metadata.id);
        assert_eq!(parsed.recommendations, result.recommendations);
    }

    #[test]
    fn test_custom_analyzer_seam() {
        struct SingleMode;
        impl ModalAnalyzer for SingleMode {
            fn analyze(
                &self,
                geometry: &BuildingGeometry,
                masses: &MassDistribution,
                damping: &Damping,
            ) -> SeismicResult<Vec<Mode>> {
                EmpiricalModalAnalyzer
                    .analyze(geometry, masses, damping)
                    .map(|modes| modes.into_iter().take(1).collect())
            }
        }

        let result = run_analysis_with(&SingleMode, &test_input()).unwrap();
        assert_eq!(result.modes.len(), 1);
        // One mode cannot capture 90% of the mass on any axis
        assert!(!result.converged);
        assert!(result.recommendations[0].contains("participation"));
    }
}
