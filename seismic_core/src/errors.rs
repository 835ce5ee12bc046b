//! # Error Types
//!
//! Structured error types for seismic_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Only fatal conditions are modeled here: invalid inputs abort the pipeline
//! before any physics runs. Non-fatal irregularities (low mass participation,
//! failed code checks) are recorded as data inside the analysis result, never
//! raised as errors.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::errors::{SeismicError, SeismicResult};
//!
//! fn validate_mass(total_mass_t: f64) -> SeismicResult<()> {
//!     if total_mass_t <= 0.0 {
//!         return Err(SeismicError::InvalidInput {
//!             field: "total_mass_t".to_string(),
//!             value: total_mass_t.to_string(),
//!             reason: "Total mass must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for seismic_core operations
pub type SeismicResult<T> = Result<T, SeismicError>;

/// Structured error type for analysis operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SeismicError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Site class not recognized and fallback not permitted
    #[error("Unknown site class: '{site_class}' (explicit fallback to rock not enabled)")]
    UnknownSiteClass { site_class: String },

    /// A pipeline stage failed (degenerate geometry, empty mode set, etc.)
    #[error("Calculation failed: {stage} - {reason}")]
    CalculationFailed { stage: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SeismicError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SeismicError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        SeismicError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownSiteClass error
    pub fn unknown_site_class(site_class: impl Into<String>) -> Self {
        SeismicError::UnknownSiteClass {
            site_class: site_class.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        SeismicError::CalculationFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SeismicError::InvalidInput { .. } => "INVALID_INPUT",
            SeismicError::MissingField { .. } => "MISSING_FIELD",
            SeismicError::UnknownSiteClass { .. } => "UNKNOWN_SITE_CLASS",
            SeismicError::CalculationFailed { .. } => "CALCULATION_FAILED",
            SeismicError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SeismicError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
