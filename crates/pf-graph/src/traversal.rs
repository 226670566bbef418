//! Depth-first traversal and the searches built on it.
//!
//! The walk is driven by an explicit stack rather than recursion, so deep
//! networks cannot overflow the call stack. Callers observe the walk through
//! [`DfsEvent`]s and steer it by returning a [`Control`].

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use crate::graph::{Edge, EdgeUid, Graph};

/// Which records a traversal may follow out of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    /// Follow records only along their stored direction (or only against it when `reversed`).
    pub directed: bool,
    /// Walk incoming records backwards instead of outgoing records forwards.
    pub reversed: bool,
}

impl Traversal {
    pub const FORWARD: Self = Self {
        directed: true,
        reversed: false,
    };
    pub const BACKWARD: Self = Self {
        directed: true,
        reversed: true,
    };
    pub const UNDIRECTED: Self = Self {
        directed: false,
        reversed: false,
    };
}

impl Default for Traversal {
    fn default() -> Self {
        Self::FORWARD
    }
}

/// Nodes and edge uids already claimed.
///
/// Seen-sets are reentrant: pre-seeding them excludes those parts of the graph
/// from a search, which is how cycle and arc searches step around their seed edges.
#[derive(Debug, Clone)]
pub struct SeenSets<N> {
    pub nodes: HashSet<N>,
    pub edges: HashSet<EdgeUid>,
}

impl<N> Default for SeenSets<N> {
    fn default() -> Self {
        Self {
            nodes: HashSet::new(),
            edges: HashSet::new(),
        }
    }
}

impl<N> SeenSets<N> {
    /// Seen-sets with the given edges excluded up front.
    pub fn excluding_edges(edges: HashSet<EdgeUid>) -> Self {
        Self {
            nodes: HashSet::new(),
            edges,
        }
    }
}

/// One step of a depth-first walk.
#[derive(Debug)]
pub enum DfsEvent<'a, N, V> {
    VisitNode(&'a N),
    LeaveNode(&'a N),
    /// The edge is oriented along the walk.
    VisitEdge(&'a Edge<N, V>),
    LeaveEdge(&'a Edge<N, V>),
}

/// Visitor verdict for `VisitNode`/`VisitEdge` events. Ignored for `Leave*` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    /// Do not descend past this node/edge; its leave event still fires.
    Prune,
    /// Stop the whole walk; open nodes/edges are still left in stack order.
    Break,
}

/// Nodes and edges of one undirected connected component.
#[derive(Debug, Clone)]
pub struct ConnectedComponent<N, V> {
    pub nodes: Vec<N>,
    pub edges: Vec<Edge<N, V>>,
}

struct Frame<N, V> {
    node: N,
    via: Option<Edge<N, V>>,
    edges: Vec<Edge<N, V>>,
    next: usize,
}

impl<N, V> Graph<N, V>
where
    N: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Records leaving `node` under the given traversal, oriented along the walk.
    fn walk_edges(&self, node: &N, traversal: Traversal) -> Vec<Edge<N, V>> {
        let forward = self.out_edges(node).iter().cloned();
        let backward = self.in_edges(node).iter().map(Edge::reversed);
        match (traversal.directed, traversal.reversed) {
            (true, false) => forward.collect(),
            (true, true) => backward.collect(),
            (false, _) => forward.chain(backward).collect(),
        }
    }

    /// Depth-first walk from `start`.
    ///
    /// Every edge uid is visited at most once per walk (tracked in `seen.edges`),
    /// including edges leading back to already-seen nodes. Each `VisitNode`/`VisitEdge`
    /// is matched by exactly one `LeaveNode`/`LeaveEdge`, also when the visitor prunes
    /// or breaks. Returns `Control::Break` if the visitor broke off the walk.
    pub fn dfs<F>(
        &self,
        start: &N,
        seen: &mut SeenSets<N>,
        traversal: Traversal,
        mut visitor: F,
    ) -> Control
    where
        F: FnMut(DfsEvent<'_, N, V>) -> Control,
    {
        if !seen.nodes.insert(start.clone()) {
            return Control::Continue;
        }
        match visitor(DfsEvent::VisitNode(start)) {
            Control::Continue => {}
            control => {
                visitor(DfsEvent::LeaveNode(start));
                return control;
            }
        }

        let mut stack = vec![Frame {
            node: start.clone(),
            via: None,
            edges: self.walk_edges(start, traversal),
            next: 0,
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if frame.next >= frame.edges.len() {
                if let Some(done) = stack.pop() {
                    leave_frame(&done, &mut visitor);
                }
                continue;
            }
            let edge = frame.edges[frame.next].clone();
            frame.next += 1;

            if !seen.edges.insert(edge.uid.clone()) {
                continue;
            }
            match visitor(DfsEvent::VisitEdge(&edge)) {
                Control::Continue => {}
                Control::Prune => {
                    visitor(DfsEvent::LeaveEdge(&edge));
                    continue;
                }
                Control::Break => {
                    visitor(DfsEvent::LeaveEdge(&edge));
                    unwind(&mut stack, &mut visitor);
                    return Control::Break;
                }
            }

            if !seen.nodes.insert(edge.to.clone()) {
                visitor(DfsEvent::LeaveEdge(&edge));
                continue;
            }
            match visitor(DfsEvent::VisitNode(&edge.to)) {
                Control::Continue => {
                    let edges = self.walk_edges(&edge.to, traversal);
                    stack.push(Frame {
                        node: edge.to.clone(),
                        via: Some(edge),
                        edges,
                        next: 0,
                    });
                }
                Control::Prune => {
                    visitor(DfsEvent::LeaveNode(&edge.to));
                    visitor(DfsEvent::LeaveEdge(&edge));
                }
                Control::Break => {
                    visitor(DfsEvent::LeaveNode(&edge.to));
                    visitor(DfsEvent::LeaveEdge(&edge));
                    unwind(&mut stack, &mut visitor);
                    return Control::Break;
                }
            }
        }

        Control::Continue
    }

    /// First path found by `dfs` from `from` to any node satisfying `is_target`.
    ///
    /// Edges are oriented along the path. A start node that is itself a target
    /// yields an empty path; `None` means no target is reachable.
    pub fn any_path<P>(
        &self,
        from: &N,
        is_target: P,
        seen: &mut SeenSets<N>,
        traversal: Traversal,
    ) -> Option<Vec<Edge<N, V>>>
    where
        P: Fn(&N) -> bool,
    {
        if is_target(from) {
            return Some(Vec::new());
        }

        let mut path: Vec<Edge<N, V>> = Vec::new();
        let mut found = None;
        self.dfs(from, seen, traversal, |event| match event {
            DfsEvent::VisitEdge(edge) => {
                path.push(edge.clone());
                Control::Continue
            }
            DfsEvent::LeaveEdge(_) => {
                path.pop();
                Control::Continue
            }
            DfsEvent::VisitNode(node) if is_target(node) => {
                found = Some(path.clone());
                Control::Break
            }
            _ => Control::Continue,
        });
        found
    }

    /// Fewest-edge path from `from` to any node satisfying `is_target`.
    ///
    /// Breadth-first counterpart of [`Graph::any_path`], honouring the same
    /// seen-sets and traversal modes.
    pub fn shortest_path<P>(
        &self,
        from: &N,
        is_target: P,
        seen: &mut SeenSets<N>,
        traversal: Traversal,
    ) -> Option<Vec<Edge<N, V>>>
    where
        P: Fn(&N) -> bool,
    {
        if is_target(from) {
            return Some(Vec::new());
        }

        let mut parent: HashMap<N, Edge<N, V>> = HashMap::new();
        let mut queue = VecDeque::from([from.clone()]);
        seen.nodes.insert(from.clone());
        while let Some(node) = queue.pop_front() {
            for edge in self.walk_edges(&node, traversal) {
                if seen.edges.contains(&edge.uid) || seen.nodes.contains(&edge.to) {
                    continue;
                }
                seen.edges.insert(edge.uid.clone());
                seen.nodes.insert(edge.to.clone());
                let reached = edge.to.clone();
                parent.insert(reached.clone(), edge);

                if is_target(&reached) {
                    let mut path = Vec::new();
                    let mut at = reached;
                    while let Some(edge) = parent.remove(&at) {
                        at = edge.from.clone();
                        path.push(edge);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(reached);
            }
        }
        None
    }

    /// Post-order over everything reachable from `roots`: children before parents.
    ///
    /// Intended for trees, forests and DAGs, where it yields a valid bottom-up
    /// evaluation order.
    pub fn dag_traversal(&self, roots: &[N]) -> Vec<N> {
        let mut order = Vec::new();
        let mut seen = SeenSets::default();
        for root in roots {
            self.dfs(root, &mut seen, Traversal::FORWARD, |event| {
                if let DfsEvent::LeaveNode(node) = event {
                    order.push(node.clone());
                }
                Control::Continue
            });
        }
        order
    }

    /// Partition all nodes and edges into undirected connected components.
    pub fn connected_components(&self) -> Vec<ConnectedComponent<N, V>> {
        let mut seen = SeenSets::default();
        let mut components = Vec::new();
        for node in &self.nodes {
            if seen.nodes.contains(node) {
                continue;
            }
            let mut component = ConnectedComponent {
                nodes: Vec::new(),
                edges: Vec::new(),
            };
            self.dfs(node, &mut seen, Traversal::UNDIRECTED, |event| {
                match event {
                    DfsEvent::VisitNode(n) => component.nodes.push(n.clone()),
                    DfsEvent::VisitEdge(e) => component.edges.push(e.clone()),
                    _ => {}
                }
                Control::Continue
            });
            components.push(component);
        }
        components
    }
}

fn leave_frame<N, V, F>(frame: &Frame<N, V>, visitor: &mut F)
where
    F: FnMut(DfsEvent<'_, N, V>) -> Control,
{
    visitor(DfsEvent::LeaveNode(&frame.node));
    if let Some(via) = &frame.via {
        visitor(DfsEvent::LeaveEdge(via));
    }
}

fn unwind<N, V, F>(stack: &mut Vec<Frame<N, V>>, visitor: &mut F)
where
    F: FnMut(DfsEvent<'_, N, V>) -> Control,
{
    while let Some(frame) = stack.pop() {
        leave_frame(&frame, visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a -> b -> c -> a, plus c -> d (all directed).
    fn directed_loop() -> Graph<&'static str, ()> {
        let mut graph = Graph::new();
        graph.add_directed_edge("a", "b", (), Some("ab".into()), true);
        graph.add_directed_edge("b", "c", (), Some("bc".into()), true);
        graph.add_directed_edge("c", "a", (), Some("ca".into()), true);
        graph.add_directed_edge("c", "d", (), Some("cd".into()), true);
        graph
    }

    #[test]
    fn dfs_visits_each_edge_once_and_balances() {
        let graph = directed_loop();
        let mut visited = Vec::new();
        let (mut enters, mut leaves) = (0, 0);
        graph.dfs(&"a", &mut SeenSets::default(), Traversal::FORWARD, |event| {
            match event {
                DfsEvent::VisitEdge(e) => {
                    enters += 1;
                    visited.push(e.uid.clone());
                }
                DfsEvent::LeaveEdge(_) => leaves += 1,
                _ => {}
            }
            Control::Continue
        });
        visited.sort();
        assert_eq!(visited, vec!["ab", "bc", "ca", "cd"]);
        assert_eq!(enters, leaves);
    }

    #[test]
    fn prune_stops_descent_but_still_leaves() {
        let graph = directed_loop();
        let mut nodes = Vec::new();
        let mut balance = 0_i32;
        graph.dfs(&"a", &mut SeenSets::default(), Traversal::FORWARD, |event| {
            match event {
                DfsEvent::VisitNode(n) => {
                    balance += 1;
                    nodes.push(*n);
                    if *n == "b" {
                        return Control::Prune;
                    }
                }
                DfsEvent::LeaveNode(_) => balance -= 1,
                _ => {}
            }
            Control::Continue
        });
        assert_eq!(nodes, vec!["a", "b"]);
        assert_eq!(balance, 0);
    }

    #[test]
    fn seeded_seen_edges_are_excluded() {
        let graph = directed_loop();
        let mut seen = SeenSets::excluding_edges(HashSet::from(["bc".to_string()]));
        let path = graph.any_path(&"a", |n| *n == "d", &mut seen, Traversal::FORWARD);
        assert!(path.is_none());
    }

    #[test]
    fn backward_walk_flips_edges() {
        let graph = directed_loop();
        let path = graph
            .any_path(&"d", |n| *n == "b", &mut SeenSets::default(), Traversal::BACKWARD)
            .unwrap();
        let hops: Vec<_> = path.iter().map(|e| (e.from, e.to, e.is_reversed)).collect();
        assert_eq!(hops, vec![("d", "c", true), ("c", "b", true)]);
    }

    #[test]
    fn any_path_to_self_is_empty() {
        let graph = directed_loop();
        let path = graph.any_path(&"a", |n| *n == "a", &mut SeenSets::default(), Traversal::FORWARD);
        assert_eq!(path.map(|p| p.len()), Some(0));
    }

    #[test]
    fn shortest_path_takes_the_direct_edge() {
        // a -> b -> c -> d, plus a shortcut a -> d added last.
        let mut graph: Graph<&str, ()> = Graph::new();
        graph.add_edge("a", "b", (), Some("ab".into()));
        graph.add_edge("b", "c", (), Some("bc".into()));
        graph.add_edge("c", "d", (), Some("cd".into()));
        graph.add_edge("a", "d", (), Some("ad".into()));

        let long = graph
            .any_path(&"a", |n| *n == "d", &mut SeenSets::default(), Traversal::UNDIRECTED)
            .unwrap();
        assert_eq!(long.len(), 3);

        let short = graph
            .shortest_path(&"a", |n| *n == "d", &mut SeenSets::default(), Traversal::UNDIRECTED)
            .unwrap();
        let hops: Vec<_> = short.iter().map(|e| (e.from, e.to)).collect();
        assert_eq!(hops, vec![("a", "d")]);

        let mut seen = SeenSets::excluding_edges(HashSet::from(["ad".to_string()]));
        let detour = graph
            .shortest_path(&"a", |n| *n == "d", &mut seen, Traversal::UNDIRECTED)
            .unwrap();
        assert_eq!(detour.len(), 3);
        assert_eq!(detour.last().unwrap().to, "d");
    }

    #[test]
    fn dag_traversal_puts_children_first() {
        let mut graph: Graph<&str, ()> = Graph::new();
        graph.add_directed_edge("root", "left", (), None, true);
        graph.add_directed_edge("root", "right", (), None, true);
        graph.add_directed_edge("left", "leaf", (), None, true);

        let order = graph.dag_traversal(&["root"]);
        let pos = |n: &str| order.iter().position(|x| *x == n).unwrap();
        assert_eq!(order.len(), 4);
        assert!(pos("leaf") < pos("left"));
        assert!(pos("left") < pos("root"));
        assert!(pos("right") < pos("root"));
    }

    #[test]
    fn connected_components_partition() {
        let mut graph: Graph<u32, ()> = Graph::new();
        graph.add_edge(1, 2, (), None);
        graph.add_edge(2, 3, (), None);
        graph.add_directed_edge(5, 4, (), None, true);
        graph.add_node(6);

        let components = graph.connected_components();
        let mut sizes: Vec<_> = components.iter().map(|c| c.nodes.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![1, 2, 3]);
        let edge_count: usize = components.iter().map(|c| c.edges.len()).sum();
        assert_eq!(edge_count, 3);
    }
}
