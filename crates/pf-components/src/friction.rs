//! Friction factor and Darcy-Weisbach head loss.

use crate::common::check_finite;
use crate::error::ComponentResult;

/// Below this Reynolds number the flow is treated as stagnant.
pub const MIN_REYNOLDS: f64 = 10.0;
/// Iteration cap for the Colebrook-White fixed point.
pub const MAX_ITERATIONS: usize = 50;
const ABS_TOL: f64 = 1e-10;
const REL_TOL: f64 = 1e-8;

/// Reynolds number ρvd/μ (SI inputs).
pub fn reynolds(rho: f64, velocity_mps: f64, diameter_m: f64, mu: f64) -> f64 {
    rho * velocity_mps * diameter_m / mu
}

/// Swamee-Jain explicit approximation of the Darcy friction factor.
pub fn swamee_jain(roughness_mm: f64, diameter_mm: f64, reynolds: f64) -> f64 {
    let rel = roughness_mm / (3.7 * diameter_mm);
    0.25 / (rel + 5.74 / reynolds.powf(0.9)).log10().powi(2)
}

/// Darcy friction factor from the Colebrook-White equation.
///
/// Fixed-point iteration seeded by Swamee-Jain. Stops when the step is below
/// 1e-10 absolute or 1e-8 relative, or after [`MAX_ITERATIONS`] steps, in which
/// case the latest iterate is returned. Reynolds numbers below
/// [`MIN_REYNOLDS`] give zero friction.
pub fn colebrook_white(roughness_mm: f64, diameter_mm: f64, reynolds: f64) -> ComponentResult<f64> {
    if reynolds < MIN_REYNOLDS {
        return Ok(0.0);
    }

    let rel = roughness_mm / (3.7 * diameter_mm);
    let mut f = swamee_jain(roughness_mm, diameter_mm, reynolds);
    check_finite(f, "friction factor seed")?;

    for _ in 0..MAX_ITERATIONS {
        let next = (-2.0 * (rel + 2.51 / (reynolds * f.sqrt())).log10()).powi(-2);
        check_finite(next, "friction factor")?;
        let step = (next - f).abs();
        f = next;
        if step < ABS_TOL || step / f < REL_TOL {
            break;
        }
    }
    Ok(f)
}

/// Darcy-Weisbach head loss f·(L/d)·v²/2g [m].
pub fn darcy_weisbach(
    friction: f64,
    length_m: f64,
    velocity_mps: f64,
    diameter_m: f64,
    g_mps2: f64,
) -> f64 {
    friction * length_m / diameter_m * velocity_mps * velocity_mps / (2.0 * g_mps2)
}
