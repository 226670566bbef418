//! Valves and fittings: K-value minor losses and mixing valves.

use crate::common::{velocity_head, velocity_mps};
use crate::error::ComponentResult;
use crate::traits::LossContext;
use pf_core::units::{kpa, pressure_to_head};

/// Head [m] charged for pushing flow the wrong way through a mixing valve.
///
/// The flow is added on top so the minimizer still sees a slope.
pub const BACKFLOW_PENALTY: f64 = 1e10;

/// Valve or fitting with a catalog K-value.
#[derive(Debug, Clone, PartialEq)]
pub struct Fitting {
    /// Catalog valve key.
    pub valve: String,
}

impl Fitting {
    pub fn new(valve: impl Into<String>) -> Self {
        Self {
            valve: valve.into(),
        }
    }

    /// Minor loss K·v²/2g [m], with v taken in the narrowest adjoining pipe.
    pub(crate) fn head_loss(
        &self,
        ctx: &dyn LossContext,
        flow_ls: f64,
        from: &str,
        to: &str,
    ) -> ComponentResult<f64> {
        let diameter_mm = ctx.smallest_connected_diameter_mm(from, to)?;
        let k = ctx.catalog().k_value(&self.valve, diameter_mm)?;
        let velocity = velocity_mps(flow_ls, diameter_mm);
        Ok(k * velocity_head(velocity, ctx.gravity().value))
    }
}

/// Thermostatic mixing valve with two inlets and one outlet.
///
/// Flow is only meaningful from either inlet to the outlet. Any other direction
/// costs [`BACKFLOW_PENALTY`].
#[derive(Debug, Clone, PartialEq)]
pub struct MixingValve {
    /// Catalog model key.
    pub model: String,
    pub hot_inlet: String,
    pub cold_inlet: String,
    pub outlet: String,
}

impl MixingValve {
    /// Whether `from -> to` is one of the two permitted directions.
    pub fn permits(&self, from: &str, to: &str) -> bool {
        (from == self.hot_inlet || from == self.cold_inlet) && to == self.outlet
    }

    pub(crate) fn head_loss(
        &self,
        ctx: &dyn LossContext,
        system: &str,
        flow_ls: f64,
        from: &str,
        to: &str,
    ) -> ComponentResult<f64> {
        if !self.permits(from, to) {
            return Ok(BACKFLOW_PENALTY + flow_ls);
        }
        let drop_kpa = ctx.catalog().mixing_valve_drop_kpa(&self.model, flow_ls)?;
        let fluid = ctx.fluid(system)?;
        Ok(pressure_to_head(kpa(drop_kpa), fluid.density, ctx.gravity()))
    }
}
