//! Straight pipe run with Darcy-Weisbach friction.

use crate::common::velocity_mps;
use crate::error::ComponentResult;
use crate::friction::{colebrook_white, darcy_weisbach, reynolds};
use crate::traits::LossContext;
use pf_core::units::Length;

/// A length of catalog pipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Catalog material key.
    pub material: String,
    /// Nominal size [mm] within the material's size list.
    pub nominal_mm: f64,
    pub length: Length,
}

impl Pipe {
    pub fn new(material: impl Into<String>, nominal_mm: f64, length: Length) -> Self {
        Self {
            material: material.into(),
            nominal_mm,
            length,
        }
    }

    /// Internal diameter [mm] from the catalog.
    pub fn internal_diameter_mm(&self, ctx: &dyn LossContext) -> ComponentResult<f64> {
        Ok(ctx
            .catalog()
            .pipe_spec(&self.material, self.nominal_mm)?
            .internal_diameter_mm)
    }

    /// Friction head loss [m] for a non-negative flow of the system's fluid.
    pub(crate) fn head_loss(
        &self,
        ctx: &dyn LossContext,
        system: &str,
        flow_ls: f64,
    ) -> ComponentResult<f64> {
        let spec = ctx
            .catalog()
            .pipe_spec(&self.material, self.nominal_mm)?;
        let fluid = ctx.fluid(system)?;

        let diameter_m = spec.internal_diameter_mm / 1000.0;
        let velocity = velocity_mps(flow_ls, spec.internal_diameter_mm);
        let re = reynolds(
            fluid.density.value,
            velocity,
            diameter_m,
            fluid.dynamic_viscosity.value,
        );
        let friction = colebrook_white(spec.roughness_mm, spec.internal_diameter_mm, re)?;

        Ok(darcy_weisbach(
            friction,
            self.length.value,
            velocity,
            diameter_m,
            ctx.gravity().value,
        ))
    }
}
