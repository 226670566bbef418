//! Error types for solver operations.

use pf_components::ComponentError;
use pf_core::error::PfError;
use pf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during network solving.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Arc endpoint {node} is not a supply node")]
    ArcEndpointNotSupply { node: String },

    #[error("Demand node {node} has no path to any supply")]
    NoSupplyPath { node: String },

    #[error("Residual is not unimodal on [{low}, {high}]")]
    NotUnimodal { low: f64, high: f64 },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Graph error: {0}")]
    Graph(#[from] pf_graph::GraphError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Component(inner) => inner.into(),
            SolverError::Fluid(inner) => inner.into(),
            SolverError::Graph(inner) => inner.into(),
            SolverError::ProblemSetup { what } => PfError::InvalidArg { what },
            SolverError::NoSupplyPath { .. } | SolverError::ArcEndpointNotSupply { .. } => {
                PfError::MissingData {
                    what: e.to_string(),
                }
            }
            SolverError::NotUnimodal { .. } | SolverError::Numeric { .. } => PfError::Invariant {
                what: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_keep_category() {
        let err: PfError = SolverError::NoSupplyPath { node: "wc".into() }.into();
        assert!(matches!(err, PfError::MissingData { .. }));

        let err: PfError = SolverError::NotUnimodal {
            low: -1.0,
            high: 1.0,
        }
        .into();
        assert!(matches!(err, PfError::Invariant { .. }));

        let err: PfError = SolverError::from(ComponentError::InvalidArg { what: "flow" }).into();
        assert!(matches!(err, PfError::InvalidArg { .. }));
    }
}
