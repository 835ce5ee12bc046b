//! # seismic_core - Seismic Demand Calculation Engine
//!
//! `seismic_core` is the computational heart of Spectrand, providing
//! building-code seismic demand calculations with a clean, LLM-friendly
//! API. All inputs and outputs are JSON-serializable, making it ideal for
//! integration with AI assistants via MCP or similar protocols.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input records and return new ones
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Data over control flow**: failed code checks are reported in the
//!   result, never thrown
//!
//! ## Quick Start
//!
//! ```rust
//! use seismic_core::analysis::{run_analysis, AnalysisInput};
//! use seismic_core::building::{BuildingGeometry, MassDistribution};
//! use seismic_core::site::{SiteInput, RiskCategory};
//!
//! let input = AnalysisInput::new(
//!     BuildingGeometry::new(30.0, 20.0, 3.2, 8),
//!     MassDistribution::uniform(8, 450.0),
//!     SiteInput::new("D", 1.5, 0.6, RiskCategory::II),
//! );
//!
//! let result = run_analysis(&input).unwrap();
//! println!("SDC: {}", result.sdc());
//! println!("Base shear: {:.0} kN", result.combination.cqc.base_shear_x_kn);
//!
//! // Serialize the full record for storage or transmission
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`analysis`] - Pipeline entry point and the aggregate result record
//! - [`building`] - Geometry, mass, material, and damping input contracts
//! - [`site`] - Site class tables and spectral coefficient resolution
//! - [`spectrum`] - Design response spectrum construction
//! - [`modal`] - Empirical modal analysis behind a capability trait
//! - [`combination`] - SRSS/CQC modal response combination
//! - [`story`] - Vertical force distribution and drift profile
//! - [`time_history`] - Seeded synthetic records and approximate simulation
//! - [`compliance`] - Code checks and seismic design category
//! - [`performance`] - Performance levels and fragility curves
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod building;
pub mod combination;
pub mod compliance;
pub mod errors;
pub mod modal;
pub mod performance;
pub mod site;
pub mod spectrum;
pub mod story;
pub mod time_history;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use analysis::{run_analysis, run_analysis_with, AnalysisInput, AnalysisResult};
pub use errors::{SeismicError, SeismicResult};
pub use site::{RiskCategory, SiteClass, SiteInput, SiteSeismicProfile};
