//! # Unit Types
//!
//! Type-safe wrappers for engineering units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64
//! wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Seismic code calculations use a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## SI Units (Primary)
//!
//! The engine works in SI internally, matching modern seismic codes:
//! - Length: meters (m), millimeters (mm)
//! - Time: seconds (s), frequency: hertz (Hz)
//! - Mass: tonnes (t = 1000 kg)
//! - Force: kilonewtons (kN)
//! - Spectral acceleration: fractions of g (g = 9.80665 m/s²)
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::units::{Meters, Millimeters, Gs};
//!
//! let height = Meters(3.2);
//! let height_mm: Millimeters = height.into();
//! assert_eq!(height_mm.0, 3200.0);
//!
//! let sa = Gs(0.8); // spectral acceleration, fraction of g
//! assert!((sa.to_mps2() - 7.845).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

/// Standard gravitational acceleration (m/s²)
pub const GRAVITY_MPS2: f64 = 9.80665;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Time / Frequency Units
// ============================================================================

/// Time or period in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f64);

/// Frequency in hertz
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hertz(pub f64);

impl From<Seconds> for Hertz {
    fn from(period: Seconds) -> Self {
        if period.0 > 0.0 {
            Hertz(1.0 / period.0)
        } else {
            Hertz(0.0)
        }
    }
}

impl From<Hertz> for Seconds {
    fn from(freq: Hertz) -> Self {
        if freq.0 > 0.0 {
            Seconds(1.0 / freq.0)
        } else {
            Seconds(0.0)
        }
    }
}

// ============================================================================
// Mass / Force Units
// ============================================================================

/// Mass in tonnes (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl Tonnes {
    /// Seismic weight of this mass (kN): W = m·g
    ///
    /// 1 t × 9.80665 m/s² = 9.80665 kN
    pub fn weight_kn(&self) -> Kilonewtons {
        Kilonewtons(self.0 * GRAVITY_MPS2)
    }
}

// ============================================================================
// Acceleration Units
// ============================================================================

/// Acceleration as a fraction of standard gravity
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gs(pub f64);

impl Gs {
    /// Convert to m/s²
    pub fn to_mps2(&self) -> f64 {
        self.0 * GRAVITY_MPS2
    }

    /// Convert from m/s²
    pub fn from_mps2(a: f64) -> Self {
        Gs(a / GRAVITY_MPS2)
    }
}
