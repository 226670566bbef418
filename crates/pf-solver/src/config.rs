//! Relaxation solver configuration.

/// Flow relaxation configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Maximum relaxation passes over all loops and arcs
    pub max_iterations: usize,
    /// Pass is converged once the summed |flow adjustment| [L/s] drops below this
    pub minimum_flow_rate_change: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            minimum_flow_rate_change: 1e-4,
        }
    }
}
