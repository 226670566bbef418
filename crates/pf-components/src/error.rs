//! Error types for component operations.

use pf_core::error::PfError;
use pf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during element loss calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Missing catalog entry: {what}")]
    MissingCatalogEntry { what: String },

    #[error("No pipe connected between {from} and {to} to size the fitting")]
    MissingDiameter { from: String, to: String },

    #[error("Unknown flow system: {system}")]
    UnknownSystem { system: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for PfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::Fluid(inner) => inner.into(),
            ComponentError::NonPhysical { .. } => PfError::Invariant {
                what: e.to_string(),
            },
            ComponentError::InvalidArg { .. } => PfError::InvalidArg {
                what: e.to_string(),
            },
            ComponentError::MissingCatalogEntry { .. }
            | ComponentError::MissingDiameter { .. }
            | ComponentError::UnknownSystem { .. } => PfError::MissingData {
                what: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::MissingCatalogEntry {
            what: "copper 15 mm".into(),
        };
        assert!(err.to_string().contains("copper 15 mm"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::MissingDiameter {
            from: "a".into(),
            to: "b".into(),
        };
        let pf_err: PfError = comp_err.into();
        assert!(matches!(pf_err, PfError::MissingData { .. }));

        let fluid: ComponentError = FluidError::UnknownFluid { name: "x".into() }.into();
        assert!(matches!(PfError::from(fluid), PfError::MissingData { .. }));
    }
}
