// Re-export parry for the appropriate float size
#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;

#[cfg(feature = "f32")]
pub use parry3d;

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Default distance under which a point counts as lying on a plane.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-4;
/// Default distance under which a point counts as lying on a plane.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-5;

/// Lazily-initialized tolerance used by the default BSP operations.
/// Defaults to [`EPSILON`] for the active precision, but can be overridden:
///  1) **Build-time**: set env var `CSG_BOOLEAN_TOLERANCE` (e.g. `CSG_BOOLEAN_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
///
/// Individual operations can also carry their own value through
/// `SerialBspOps::with_tolerance` / `ParallelBspOps::with_tolerance`.
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current tolerance.
/// If not set yet, it tries `CSG_BOOLEAN_TOLERANCE` (parsed as the active `Real`) and
/// falls back to [`EPSILON`].
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        // Compile-time env if provided, inherited by dependencies
        if let Some(environment_variable) = option_env!("CSG_BOOLEAN_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        EPSILON
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Returns `false` if a value was already in place.
pub fn set_tolerance(value: Real) -> bool {
    TOLERANCE_CELL.set(value.max(Real::EPSILON)).is_ok()
}

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Tau
/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;
