//! # Spectrand CLI Application
//!
//! Terminal front end for the seismic demand calculation engine. Prompts
//! for a handful of building and site parameters (with sensible defaults),
//! runs the full pipeline, and prints a summary.
//!
//! Set `RUST_LOG=debug` to watch the pipeline stages.

use std::io::{self, BufRead, Write};

use seismic_core::analysis::{run_analysis, AnalysisInput};
use seismic_core::building::{BuildingGeometry, MassDistribution};
use seismic_core::compliance::VerdictStatus;
use seismic_core::site::{RiskCategory, SiteInput};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_string(prompt: &str, default: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn main() {
    env_logger::init();

    println!("Spectrand CLI - Seismic Demand Calculator");
    println!("=========================================");
    println!();

    let floors = prompt_f64("Number of floors [8]: ", 8.0).max(1.0) as usize;
    let floor_height_m = prompt_f64("Story height (m) [3.2]: ", 3.2);
    let mass_per_floor_t = prompt_f64("Mass per floor (t) [450.0]: ", 450.0);
    let site_class = prompt_string("Site class A-F [C]: ", "C");
    let ss_g = prompt_f64("Mapped Ss (g) [1.0]: ", 1.0);
    let s1_g = prompt_f64("Mapped S1 (g) [0.4]: ", 0.4);
    let seed = prompt_f64("Ground-motion seed [42]: ", 42.0) as u64;

    let input = AnalysisInput::new(
        BuildingGeometry::new(30.0, 20.0, floor_height_m, floors),
        MassDistribution::uniform(floors, mass_per_floor_t),
        SiteInput::new(site_class, ss_g, s1_g, RiskCategory::II),
    )
    .with_synthetic_seed(seed);

    println!();
    println!("Running analysis...");
    println!();

    let result = match run_analysis(&input) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Analysis failed [{}]: {}", err.error_code(), err);
            std::process::exit(1);
        }
    };

    println!("Site profile:");
    println!("  Site class:       {}", result.profile.site_class);
    println!("  SDS / SD1:        {:.3} g / {:.3} g", result.profile.sds_g, result.profile.sd1_g);
    println!();
    println!("Dynamic properties:");
    println!("  Fundamental T1:   {:.3} s", result.modes[0].period_s);
    println!("  Modes computed:   {}", result.modes.len());
    println!(
        "  Mass captured:    {:.1}% / {:.1}% / {:.1}% (x / y / torsion)",
        result.mass_participation[0] * 100.0,
        result.mass_participation[1] * 100.0,
        result.mass_participation[2] * 100.0
    );
    println!("  Converged:        {}", if result.converged { "yes" } else { "NO" });
    println!();
    println!("Demand:");
    println!(
        "  Base shear (CQC): {:.0} kN (SRSS {:.0} kN)",
        result.combination.cqc.base_shear_x_kn, result.combination.srss.base_shear_x_kn
    );
    let max_drift = result
        .stories
        .iter()
        .map(|s| s.drift_ratio)
        .fold(0.0f64, f64::max);
    println!("  Max drift ratio:  {:.4}", max_drift);
    if let Some(trace) = &result.time_history {
        println!(
            "  Time history:     '{}' peak shear {:.0} kN (seed {:?})",
            trace.record_id,
            trace.base_shear_kn.iter().fold(0.0f64, |m, v| m.max(v.abs())),
            trace.seed
        );
    }
    println!();
    println!("Compliance (SDC {}):", result.sdc());
    for verdict in &result.compliance.verdicts {
        let mark = match verdict.status {
            VerdictStatus::Pass => "PASS",
            VerdictStatus::Fail => "FAIL",
            VerdictStatus::Warning => "WARN",
        };
        println!(
            "  [{}] {} - required {:.4}, actual {:.4} {}",
            mark, verdict.rule_id, verdict.required, verdict.actual, verdict.unit
        );
    }
    println!();
    println!("Performance: {}", result.performance.level);
    println!();
    println!("Recommendations:");
    for (i, rec) in result.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }

    let dump = prompt_string("\nDump full JSON result? [y/N]: ", "n");
    if dump.eq_ignore_ascii_case("y") {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("Serialization failed: {}", err),
        }
    }
}
