//! Fluid property model trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use pf_core::units::{Density, DynVisc, Temperature};

/// Properties the friction model needs from a liquid at one temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidProperties {
    pub density: Density,
    pub dynamic_viscosity: DynVisc,
}

/// Trait for fluid property models.
///
/// Implementations must be thread-safe (Send + Sync) so independent solves can
/// share one model across threads.
pub trait FluidModel: Send + Sync {
    /// Model name, used in setup errors.
    fn name(&self) -> &str;

    /// Check if this model has data for the named fluid.
    fn supports(&self, fluid: &str) -> bool;

    /// Density and dynamic viscosity of `fluid` at temperature `t`.
    fn properties(&self, fluid: &str, t: Temperature) -> FluidResult<FluidProperties>;
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure temperature is finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be above absolute zero and finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: f64) -> FluidResult<()> {
        if !rho.is_finite() || rho <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure dynamic viscosity is positive and finite.
    pub fn validate_viscosity(mu: f64) -> FluidResult<()> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "viscosity must be positive and finite",
            });
        }
        Ok(())
    }
}
