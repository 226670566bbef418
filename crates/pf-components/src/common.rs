//! Common utilities for element calculations.

use crate::error::{ComponentError, ComponentResult};
use pf_core::numeric::ensure_finite;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Flow area [m²] of a bore given in millimetres.
pub fn bore_area_m2(diameter_mm: f64) -> f64 {
    let d = diameter_mm / 1000.0;
    std::f64::consts::PI * d * d / 4.0
}

/// Mean velocity [m/s] of `flow_ls` litres per second through a bore in millimetres.
pub fn velocity_mps(flow_ls: f64, diameter_mm: f64) -> f64 {
    (flow_ls / 1000.0) / bore_area_m2(diameter_mm)
}

/// Velocity head v²/2g [m].
pub fn velocity_head(velocity_mps: f64, g_mps2: f64) -> f64 {
    velocity_mps * velocity_mps / (2.0 * g_mps2)
}
