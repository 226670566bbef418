//! Post-solve diagnostics: node pressures and per-element figures.

use std::collections::{HashMap, HashSet};

use pf_components::LossContext;
use pf_core::units::head_to_pressure;
use pf_graph::{Control, DfsEvent, Edge, SeenSets, Traversal};
use uom::si::pressure::kilopascal;

use crate::error::{SolverError, SolverResult};
use crate::solve::{FlowSolution, FlowSolver};

/// Flow and loss through one element, oriented along its flow.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementReport {
    /// Edge uid (the element id, or `<id>:hot` / `<id>:cold` for mixing valves)
    pub uid: String,
    pub element: String,
    pub kind: &'static str,
    pub from: String,
    pub to: String,
    /// Non-negative flow from `from` to `to` [L/s]
    pub flow_ls: f64,
    pub head_loss_m: f64,
    pub velocity_mps: Option<f64>,
}

impl FlowSolver<'_> {
    /// Pressure [kPa] at every node reachable from a supply.
    ///
    /// Walks outward from each supply, subtracting each element's loss
    /// (converted with its own fluid density). Where paths from two supplies
    /// meet, the first walk to arrive wins; after a converged solve the
    /// difference is within the loop tolerance.
    pub fn node_pressures_kpa(
        &self,
        solution: &FlowSolution,
        supplies_kpa: &HashMap<String, f64>,
    ) -> SolverResult<HashMap<String, f64>> {
        let graph = self.network.graph();
        let mut pressures = supplies_kpa.clone();
        let mut seen = SeenSets::default();
        let mut failure = None;

        let mut sources: Vec<&String> = supplies_kpa.keys().collect();
        sources.sort();
        for source in sources {
            graph.dfs(source, &mut seen, Traversal::UNDIRECTED, |event| {
                let DfsEvent::VisitEdge(edge) = event else {
                    return Control::Continue;
                };
                if pressures.contains_key(&edge.to) {
                    return Control::Continue;
                }
                match self.pressure_across(edge, solution, &pressures) {
                    Ok(p) => {
                        pressures.insert(edge.to.clone(), p);
                        Control::Continue
                    }
                    Err(err) => {
                        failure = Some(err);
                        Control::Break
                    }
                }
            });
            if let Some(err) = failure.take() {
                return Err(err);
            }
        }
        Ok(pressures)
    }

    fn pressure_across(
        &self,
        edge: &Edge<String, String>,
        solution: &FlowSolution,
        pressures: &HashMap<String, f64>,
    ) -> SolverResult<f64> {
        let upstream = pressures
            .get(&edge.from)
            .copied()
            .ok_or_else(|| SolverError::Numeric {
                what: format!("no pressure known at {}", edge.from),
            })?;
        let element = self.network.element(&edge.value)?;
        let fluid = self.network.fluid(&element.system)?;
        let loss = self.edge_loss(edge, solution.flows.along(edge))?;
        let drop = head_to_pressure(loss, fluid.density, self.network.gravity());
        Ok(upstream - drop.get::<kilopascal>())
    }

    /// One report per element edge, in network insertion order.
    pub fn element_reports(&self, solution: &FlowSolution) -> SolverResult<Vec<ElementReport>> {
        let mut reported = HashSet::new();
        let mut reports = Vec::new();
        for record in self.network.graph().edges() {
            if !reported.insert(record.uid.clone()) {
                continue;
            }
            let flow = solution.flows.along(record);
            let edge = if flow < 0.0 {
                record.reversed()
            } else {
                record.clone()
            };
            let element = self.network.element(&edge.value)?;
            reports.push(ElementReport {
                uid: edge.uid.clone(),
                element: edge.value.clone(),
                kind: element.kind_name(),
                flow_ls: flow.abs(),
                head_loss_m: self.edge_loss(&edge, flow.abs())?,
                velocity_mps: element.velocity_mps(self.network, flow, &edge.from, &edge.to)?,
                from: edge.from,
                to: edge.to,
            });
        }
        Ok(reports)
    }
}
