//! pf-fluids: liquid property lookup for pipeflow.
//!
//! Provides:
//! - `FluidModel` trait: density and dynamic viscosity of a named fluid at a temperature
//! - `TabulatedFluidModel`: temperature tables with linear interpolation,
//!   shipped with a water table covering 0-100 °C
//!
//! # Example
//!
//! ```
//! use pf_fluids::{FluidModel, TabulatedFluidModel};
//! use pf_core::units::celsius;
//!
//! let model = TabulatedFluidModel::default();
//! let props = model.properties("water", celsius(20.0)).unwrap();
//! assert!((props.density.value - 998.21).abs() < 1e-6);
//! ```

pub mod error;
pub mod model;
pub mod table;

// Re-exports for ergonomics
pub use error::{FluidError, FluidResult};
pub use model::{FluidModel, FluidProperties};
pub use table::{FluidTable, FluidTablePoint, TabulatedFluidModel, WATER};
