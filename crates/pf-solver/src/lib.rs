//! Steady flow solver for piping networks.
//!
//! The network is split into independent loops and supply-to-supply arcs. An
//! initial flow routes every demand to a supply, then each loop and arc is
//! relaxed in turn: a one-dimensional search finds the flow shift that balances
//! its head losses, until a full pass moves (almost) nothing.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod flows;
pub mod minimize;
pub mod network;
pub mod solve;

pub use config::SolverConfig;
pub use diagnostics::ElementReport;
pub use error::{SolverError, SolverResult};
pub use flows::FlowAssignment;
pub use minimize::ternary_search_for_global_min;
pub use network::{FlowNetwork, FlowSystem};
pub use solve::{Decomposition, FlowSolution, FlowSolver, Path};
