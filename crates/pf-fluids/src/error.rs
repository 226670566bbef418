//! Fluid property errors.

use pf_core::PfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, viscosity, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Temperature outside the tabulated range of a fluid.
    #[error("Temperature {temperature_c} °C out of range for {fluid} ({min_c}..={max_c} °C)")]
    OutOfRange {
        fluid: String,
        temperature_c: f64,
        min_c: f64,
        max_c: f64,
    },

    /// No table for the requested fluid.
    #[error("Unknown fluid: {name}")]
    UnknownFluid { name: String },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<FluidError> for PfError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::UnknownFluid { .. } | FluidError::OutOfRange { .. } => {
                PfError::MissingData {
                    what: err.to_string(),
                }
            }
            FluidError::NonPhysical { .. } => PfError::Invariant {
                what: err.to_string(),
            },
            FluidError::InvalidArg { .. } => PfError::InvalidArg {
                what: err.to_string(),
            },
        }
    }
}
