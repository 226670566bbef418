//! Signed flow rates on network edges.

use std::collections::HashMap;

use pf_graph::{Edge, EdgeUid};

/// Flow [L/s] on each edge, as seen from either of its endpoints.
///
/// `get_flow(uid, from) == -get_flow(uid, to)` always holds: a positive value
/// means fluid leaves the queried node along that edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowAssignment {
    flows: HashMap<(EdgeUid, String), f64>,
}

impl FlowAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flow along `uid` leaving `node`; zero for edges never touched.
    pub fn get_flow(&self, uid: &str, node: &str) -> f64 {
        self.flows
            .get(&(uid.to_string(), node.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Push `delta` more flow along `edge`, from `edge.from` towards `edge.to`.
    pub fn add_flow<V>(&mut self, edge: &Edge<String, V>, delta: f64) {
        *self
            .flows
            .entry((edge.uid.clone(), edge.from.clone()))
            .or_insert(0.0) += delta;
        *self
            .flows
            .entry((edge.uid.clone(), edge.to.clone()))
            .or_insert(0.0) -= delta;
    }

    /// Flow along `edge` in its own orientation.
    pub fn along<V>(&self, edge: &Edge<String, V>) -> f64 {
        self.get_flow(&edge.uid, &edge.from)
    }

    /// Number of `(edge, node)` entries recorded.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// All entries as `(uid, node, flow)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.flows
            .iter()
            .map(|((uid, node), flow)| (uid.as_str(), node.as_str(), *flow))
    }
}
