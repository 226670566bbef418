//! Core traits for element loss models.

use crate::catalog::Catalog;
use crate::error::ComponentResult;
use pf_core::units::Accel;
use pf_fluids::FluidProperties;

/// What an element needs from the network it sits in to compute its loss.
///
/// Elements hold only names (catalog keys, system ids, node ids); everything
/// they resolve goes through this trait.
pub trait LossContext {
    /// Catalog of pipe sizes and valve tables.
    fn catalog(&self) -> &Catalog;

    /// Gravitational acceleration used to convert pressure to head.
    fn gravity(&self) -> Accel;

    /// Fluid properties of the named flow system at its operating temperature.
    fn fluid(&self, system: &str) -> ComponentResult<FluidProperties>;

    /// Smallest internal diameter [mm] among pipes attached to either node.
    ///
    /// Fittings have no bore of their own and are sized by their neighbours.
    fn smallest_connected_diameter_mm(&self, from: &str, to: &str) -> ComponentResult<f64>;
}
