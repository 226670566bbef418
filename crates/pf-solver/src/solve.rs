//! Loop and arc relaxation flow solver.
//!
//! A solve runs in three stages:
//! 1. Decompose the network into independent loops and supply-to-supply arcs.
//! 2. Seed a mass-conserving flow by routing each demand along one path to a supply.
//! 3. Relax: shift flow around every loop and arc until its head losses balance
//!    (zero around a loop, the supply head difference along an arc).
//!
//! Loop shifts keep every node balanced, and arc shifts only change how much
//! each supply delivers, so conservation from the seed survives relaxation.

use std::collections::{HashMap, HashSet};

use pf_core::units::{kpa, pressure_to_head};
use pf_components::LossContext;
use pf_graph::{Edge, EdgeUid, SeenSets, Traversal};
use tracing::{debug, info, warn};

use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};
use crate::flows::FlowAssignment;
use crate::minimize::ternary_search_for_global_min;
use crate::network::FlowNetwork;

/// Ordered edges, each starting where the previous one ended.
pub type Path = Vec<Edge<String, String>>;

/// Outcome of [`FlowSolver::solve_flows_ls`].
#[derive(Clone, Debug)]
pub struct FlowSolution {
    pub flows: FlowAssignment,
    /// Relaxation passes performed
    pub iterations: usize,
    /// Whether the last pass moved less flow than the configured threshold
    pub converged: bool,
    /// Summed |flow adjustment| [L/s] of the last pass
    pub last_change: f64,
    pub cycles: Vec<Path>,
    pub arcs: Vec<Path>,
    /// Edges on neither a loop nor an arc, i.e. branches whose flow the seed fixes
    pub unaccounted_edges: Vec<EdgeUid>,
}

impl FlowSolution {
    /// Flow along `uid` leaving `node` [L/s].
    pub fn flow(&self, uid: &str, node: &str) -> f64 {
        self.flows.get_flow(uid, node)
    }

    /// Net flow leaving `node` through the network [L/s].
    ///
    /// Zero at interior nodes, minus the demand at a fixture and the delivered
    /// flow at a supply.
    pub fn net_outflow(&self, network: &FlowNetwork, node: &str) -> f64 {
        network
            .graph()
            .out_edges(&node.to_string())
            .iter()
            .map(|edge| self.flows.get_flow(&edge.uid, node))
            .sum()
    }
}

/// Loops, arcs and leftovers of one decomposition.
#[derive(Clone, Debug, Default)]
pub struct Decomposition {
    pub cycles: Vec<Path>,
    pub arcs: Vec<Path>,
    pub unaccounted: Vec<EdgeUid>,
}

/// Steady flow solver over a borrowed network.
///
/// The network is only read, so independent solves may share it across threads.
pub struct FlowSolver<'a> {
    pub(crate) network: &'a FlowNetwork,
    config: SolverConfig,
}

impl<'a> FlowSolver<'a> {
    pub fn new(network: &'a FlowNetwork) -> Self {
        Self::with_config(network, SolverConfig::default())
    }

    pub fn with_config(network: &'a FlowNetwork, config: SolverConfig) -> Self {
        Self { network, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve for the flow in every element.
    ///
    /// `demands` maps fixture nodes to their draw [L/s]; `supplies_kpa` maps
    /// source nodes to their fixed pressure [kPa]. Running out of iterations is
    /// not an error: the solution is returned with `converged == false`.
    pub fn solve_flows_ls(
        &self,
        demands: &HashMap<String, f64>,
        supplies_kpa: &HashMap<String, f64>,
    ) -> SolverResult<FlowSolution> {
        let supplies: HashSet<String> = supplies_kpa.keys().cloned().collect();
        let decomposition = self.decompose(&supplies)?;
        let mut flows = self.initial_flow_rates(demands, &supplies)?;

        let arc_heads = decomposition
            .arcs
            .iter()
            .map(|arc| self.arc_expected_head(arc, supplies_kpa))
            .collect::<SolverResult<Vec<f64>>>()?;

        let mut iterations = 0;
        let mut converged = false;
        let mut last_change = f64::INFINITY;
        for iteration in 1..=self.config.max_iterations {
            let mut change = 0.0;
            for cycle in &decomposition.cycles {
                change += self.adjust_path(&mut flows, cycle, 0.0)?.abs();
            }
            for (arc, expected) in decomposition.arcs.iter().zip(&arc_heads) {
                change += self.adjust_path(&mut flows, arc, *expected)?.abs();
            }

            iterations = iteration;
            last_change = change;
            debug!(iteration, change, "relaxation pass");
            if change < self.config.minimum_flow_rate_change {
                converged = true;
                break;
            }
        }

        if converged {
            info!(iterations, last_change, "flow solve converged");
        } else {
            warn!(
                iterations,
                last_change,
                threshold = self.config.minimum_flow_rate_change,
                "flow solve stopped before converging"
            );
        }

        Ok(FlowSolution {
            flows,
            iterations,
            converged,
            last_change,
            cycles: decomposition.cycles,
            arcs: decomposition.arcs,
            unaccounted_edges: decomposition.unaccounted,
        })
    }

    /// Split the network into loops, then arcs between `supplies` through the rest.
    pub fn decompose(&self, supplies: &HashSet<String>) -> SolverResult<Decomposition> {
        let graph = self.network.graph();
        let cycles = graph.edge_cycle_cover(false);
        let accounted: HashSet<EdgeUid> = cycles
            .iter()
            .flatten()
            .map(|edge| edge.uid.clone())
            .collect();

        let cover = graph.source_arc_cover(supplies, &accounted)?;
        let unaccounted: Vec<EdgeUid> = cover.unaccounted.into_iter().map(|e| e.uid).collect();
        debug!(
            cycles = cycles.len(),
            arcs = cover.arcs.len(),
            unaccounted = unaccounted.len(),
            "network decomposed"
        );
        if !unaccounted.is_empty() {
            debug!(edges = ?unaccounted, "edges on no loop or arc");
        }

        Ok(Decomposition {
            cycles,
            arcs: cover.arcs,
            unaccounted,
        })
    }

    /// Route every demand in full along one path to some supply.
    pub fn initial_flow_rates(
        &self,
        demands: &HashMap<String, f64>,
        supplies: &HashSet<String>,
    ) -> SolverResult<FlowAssignment> {
        let graph = self.network.graph();
        let mut ordered: Vec<(&String, &f64)> = demands.iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(b.0));

        let mut flows = FlowAssignment::new();
        for (node, demand) in ordered {
            let path = graph
                .any_path(
                    node,
                    |n| supplies.contains(n),
                    &mut SeenSets::default(),
                    Traversal::UNDIRECTED,
                )
                .ok_or_else(|| SolverError::NoSupplyPath { node: node.clone() })?;
            // The path runs demand -> supply; the demand flows the other way.
            for edge in &path {
                flows.add_flow(edge, -demand);
            }
        }
        Ok(flows)
    }

    /// Head [m] at the end supply minus head at the start supply of `arc`.
    ///
    /// Each supply pressure is converted with the fluid of the element it feeds.
    pub fn arc_expected_head(
        &self,
        arc: &[Edge<String, String>],
        supplies_kpa: &HashMap<String, f64>,
    ) -> SolverResult<f64> {
        let (Some(first), Some(last)) = (arc.first(), arc.last()) else {
            return Err(SolverError::ProblemSetup {
                what: "empty arc".to_string(),
            });
        };
        let start = self.supply_head(&first.from, &first.value, supplies_kpa)?;
        let end = self.supply_head(&last.to, &last.value, supplies_kpa)?;
        Ok(end - start)
    }

    fn supply_head(
        &self,
        node: &str,
        element_id: &str,
        supplies_kpa: &HashMap<String, f64>,
    ) -> SolverResult<f64> {
        let pressure_kpa =
            supplies_kpa
                .get(node)
                .ok_or_else(|| SolverError::ArcEndpointNotSupply {
                    node: node.to_string(),
                })?;
        let element = self.network.element(element_id)?;
        let fluid = self.network.fluid(&element.system)?;
        Ok(pressure_to_head(
            kpa(*pressure_kpa),
            fluid.density,
            self.network.gravity(),
        ))
    }

    /// Find the shift `delta` that best balances `path`, apply it, and return it.
    pub fn adjust_path(
        &self,
        flows: &mut FlowAssignment,
        path: &[Edge<String, String>],
        expected_head: f64,
    ) -> SolverResult<f64> {
        let delta = ternary_search_for_global_min(|delta| {
            Ok(self
                .shifted_residual(flows, path, expected_head, delta)?
                .abs())
        })?;
        for edge in path {
            flows.add_flow(edge, delta);
        }
        Ok(delta)
    }

    /// Signed head loss [m] of one edge carrying `flow_ls` along its orientation.
    pub(crate) fn edge_loss(&self, edge: &Edge<String, String>, flow_ls: f64) -> SolverResult<f64> {
        let element = self.network.element(&edge.value)?;
        Ok(element.head_loss(self.network, flow_ls, &edge.from, &edge.to, true)?)
    }

    /// Summed signed head loss [m] along `path` under the given flows.
    pub fn path_head_loss(
        &self,
        flows: &FlowAssignment,
        path: &[Edge<String, String>],
    ) -> SolverResult<f64> {
        self.shifted_path_loss(flows, path, 0.0)
    }

    /// Imbalance [m] of `path`: `-expected_head - path_head_loss`. Zero once balanced.
    pub fn path_residual(
        &self,
        flows: &FlowAssignment,
        path: &[Edge<String, String>],
        expected_head: f64,
    ) -> SolverResult<f64> {
        self.shifted_residual(flows, path, expected_head, 0.0)
    }

    fn shifted_residual(
        &self,
        flows: &FlowAssignment,
        path: &[Edge<String, String>],
        expected_head: f64,
        delta: f64,
    ) -> SolverResult<f64> {
        Ok(-expected_head - self.shifted_path_loss(flows, path, delta)?)
    }

    fn shifted_path_loss(
        &self,
        flows: &FlowAssignment,
        path: &[Edge<String, String>],
        delta: f64,
    ) -> SolverResult<f64> {
        path.iter()
            .map(|edge| self.edge_loss(edge, flows.along(edge) + delta))
            .sum()
    }
}
