//! Core graph data structures.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Stable identifier shared by the directed records of one network edge.
pub type EdgeUid = String;

/// A directed edge record.
///
/// An undirected network edge is stored as two complementary records
/// (`a -> b` and `b -> a`) sharing one `uid`. Edges produced by reverse or
/// undirected traversal are flipped copies with `is_reversed` toggled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<N, V> {
    pub from: N,
    pub to: N,
    /// External identifier of the pipe/valve this edge stands for.
    pub value: V,
    pub is_directed: bool,
    pub is_reversed: bool,
    pub uid: EdgeUid,
}

impl<N: Clone, V: Clone> Edge<N, V> {
    /// The same edge walked the other way.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            value: self.value.clone(),
            is_directed: self.is_directed,
            is_reversed: !self.is_reversed,
            uid: self.uid.clone(),
        }
    }
}

/// Directed multigraph with full and reverse adjacency.
///
/// Nodes are plain identifiers; the graph never interprets them. Node and edge
/// iteration follows insertion order so every traversal is deterministic.
#[derive(Debug, Clone)]
pub struct Graph<N, V> {
    pub(crate) nodes: Vec<N>,
    pub(crate) adjacency: HashMap<N, Vec<Edge<N, V>>>,
    pub(crate) reverse_adjacency: HashMap<N, Vec<Edge<N, V>>>,
    /// Every directed record, in insertion order.
    pub(crate) edges: Vec<Edge<N, V>>,
    next_uid: u64,
}

impl<N, V> Default for Graph<N, V> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            adjacency: HashMap::new(),
            reverse_adjacency: HashMap::new(),
            edges: Vec::new(),
            next_uid: 0,
        }
    }
}

impl<N, V> Graph<N, V>
where
    N: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: N) {
        if self.adjacency.contains_key(&node) {
            return;
        }
        self.adjacency.insert(node.clone(), Vec::new());
        self.reverse_adjacency.insert(node.clone(), Vec::new());
        self.nodes.push(node);
    }

    /// Add one directed record, creating missing endpoints. Returns its uid.
    pub fn add_directed_edge(
        &mut self,
        from: N,
        to: N,
        value: V,
        uid: Option<EdgeUid>,
        directed: bool,
    ) -> EdgeUid {
        let uid = uid.unwrap_or_else(|| self.fresh_uid());
        self.add_node(from.clone());
        self.add_node(to.clone());

        let edge = Edge {
            from: from.clone(),
            to: to.clone(),
            value,
            is_directed: directed,
            is_reversed: false,
            uid: uid.clone(),
        };
        self.adjacency.entry(from).or_default().push(edge.clone());
        self.reverse_adjacency
            .entry(to)
            .or_default()
            .push(edge.clone());
        self.edges.push(edge);
        uid
    }

    /// Add an undirected edge as two complementary directed records sharing a uid.
    pub fn add_edge(&mut self, a: N, b: N, value: V, uid: Option<EdgeUid>) -> EdgeUid {
        let uid = uid.unwrap_or_else(|| self.fresh_uid());
        self.add_directed_edge(a.clone(), b.clone(), value.clone(), Some(uid.clone()), false);
        self.add_directed_edge(b, a, value, Some(uid.clone()), false);
        uid
    }

    fn fresh_uid(&mut self) -> EdgeUid {
        let uid = format!("e{}", self.next_uid);
        self.next_uid += 1;
        uid
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// All directed records in insertion order.
    pub fn edges(&self) -> &[Edge<N, V>] {
        &self.edges
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Records leaving `node`.
    pub fn out_edges(&self, node: &N) -> &[Edge<N, V>] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records arriving at `node`.
    pub fn in_edges(&self, node: &N) -> &[Edge<N, V>] {
        self.reverse_adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
