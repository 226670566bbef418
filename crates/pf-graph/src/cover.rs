//! Loop and source-arc decomposition.
//!
//! The flow solver needs two kinds of independent paths: closed loops, whose
//! head losses must sum to zero, and arcs between fixed-pressure sources, whose
//! head losses must match the sources' head difference. Each search excludes
//! its seed edge through pre-seeded dfs seen-sets, so loops and arcs may share
//! edges but every one of them adds an edge none of the earlier ones holds.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, EdgeUid, Graph};
use crate::traversal::{Control, DfsEvent, SeenSets, Traversal};

/// Result of [`Graph::source_arc_cover`].
#[derive(Debug, Clone)]
pub struct ArcCover<N, V> {
    /// Source-to-source paths, each starting and ending at a member of the source set.
    pub arcs: Vec<Vec<Edge<N, V>>>,
    /// Edges left over because at least one endpoint cannot reach a source.
    pub unaccounted: Vec<Edge<N, V>>,
}

/// The path walked end to start, every edge flipped.
pub fn reverse_path<N: Clone, V: Clone>(path: &[Edge<N, V>]) -> Vec<Edge<N, V>> {
    path.iter().rev().map(Edge::reversed).collect()
}

impl<N, V> Graph<N, V>
where
    N: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Independent cycles covering every edge that closes a loop.
    ///
    /// For each edge `u -> v` not yet covered, looks for a path `v -> u` that
    /// avoids that edge. The edge plus that path is a cycle, and all of its
    /// edges become covered. Each cycle starts with its seed edge.
    ///
    /// Undirected searches also stay off the other edges outside a spanning
    /// forest, so every such edge closes exactly one cycle and a connected
    /// network with `E` edges and `V` nodes yields `E - V + 1` independent
    /// loops. Directed searches only avoid the seed edge.
    pub fn edge_cycle_cover(&self, directed: bool) -> Vec<Vec<Edge<N, V>>> {
        let (traversal, chords) = if directed {
            (Traversal::FORWARD, HashSet::new())
        } else {
            (Traversal::UNDIRECTED, self.chords())
        };

        let mut covered: HashSet<EdgeUid> = HashSet::new();
        let mut cycles = Vec::new();
        for edge in &self.edges {
            if covered.contains(&edge.uid) {
                continue;
            }
            let mut excluded = chords.clone();
            excluded.insert(edge.uid.clone());

            let mut seen = SeenSets::excluding_edges(excluded);
            let Some(path) = self.any_path(&edge.to, |n| *n == edge.from, &mut seen, traversal)
            else {
                continue;
            };

            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(edge.clone());
            cycle.extend(path);
            covered.extend(cycle.iter().map(|e| e.uid.clone()));
            cycles.push(cycle);
        }

        debug!(
            cycles = cycles.len(),
            covered_edges = covered.len(),
            "edge cycle cover"
        );
        cycles
    }

    /// Edges left out of an undirected dfs spanning forest.
    fn chords(&self) -> HashSet<EdgeUid> {
        let mut seen = SeenSets::default();
        let mut tree = HashSet::new();
        for node in &self.nodes {
            let mut pending: Option<EdgeUid> = None;
            self.dfs(node, &mut seen, Traversal::UNDIRECTED, |event| {
                match event {
                    DfsEvent::VisitEdge(edge) => pending = Some(edge.uid.clone()),
                    DfsEvent::LeaveEdge(_) => pending = None,
                    DfsEvent::VisitNode(_) => {
                        if let Some(uid) = pending.take() {
                            tree.insert(uid);
                        }
                    }
                    DfsEvent::LeaveNode(_) => {}
                }
                Control::Continue
            });
        }
        self.edges
            .iter()
            .filter(|e| !tree.contains(&e.uid))
            .map(|e| e.uid.clone())
            .collect()
    }

    /// Source-to-source arcs through every edge not in `accounted_for`.
    ///
    /// For each remaining edge, searches (undirected, avoiding only that edge)
    /// from its first endpoint to some source, then from its second endpoint
    /// while also avoiding the first half. When both succeed the arc is
    /// `reverse(first half) + edge + second half`, running from one source to
    /// another. Both halves ending at the same source means the edge closes a loop
    /// the cycle cover missed, which is reported as [`GraphError::ArcClosesOnItself`].
    ///
    /// Sources still not joined to each other by an arc afterwards, such as two
    /// sources on one loop, are linked by a fewest-edge path so that each
    /// connected group of `k` sources carries `k - 1` independent arcs.
    pub fn source_arc_cover(
        &self,
        sources: &HashSet<N>,
        accounted_for: &HashSet<EdgeUid>,
    ) -> GraphResult<ArcCover<N, V>> {
        let is_source = |n: &N| sources.contains(n);
        let mut accounted = accounted_for.clone();
        let mut arcs = Vec::new();
        let mut unaccounted = Vec::new();

        for edge in &self.edges {
            if accounted.contains(&edge.uid) {
                continue;
            }
            let mut excluded = HashSet::from([edge.uid.clone()]);

            let mut seen = SeenSets::excluding_edges(excluded.clone());
            let Some(first) = self.any_path(&edge.from, is_source, &mut seen, Traversal::UNDIRECTED)
            else {
                unaccounted.push(edge.clone());
                continue;
            };

            excluded.extend(first.iter().map(|e| e.uid.clone()));
            let mut seen = SeenSets::excluding_edges(excluded);
            let Some(second) = self.any_path(&edge.to, is_source, &mut seen, Traversal::UNDIRECTED)
            else {
                unaccounted.push(edge.clone());
                continue;
            };

            let start = first.last().map_or(&edge.from, |e| &e.to);
            let end = second.last().map_or(&edge.to, |e| &e.to);
            if start == end {
                return Err(GraphError::ArcClosesOnItself {
                    uid: edge.uid.clone(),
                    source: format!("{:?}", start),
                });
            }

            let mut arc = reverse_path(&first);
            arc.push(edge.clone());
            arc.extend(second);
            accounted.extend(arc.iter().map(|e| e.uid.clone()));
            arcs.push(arc);
        }

        let links = self.link_source_groups(sources, &arcs);
        for link in &links {
            accounted.extend(link.iter().map(|e| e.uid.clone()));
        }
        arcs.extend(links);

        // Both records of an undirected edge land here; report each uid once.
        let mut reported = HashSet::new();
        unaccounted.retain(|e: &Edge<N, V>| {
            !accounted.contains(&e.uid) && reported.insert(e.uid.clone())
        });

        debug!(
            arcs = arcs.len(),
            unaccounted = unaccounted.len(),
            "source arc cover"
        );
        Ok(ArcCover { arcs, unaccounted })
    }

    /// Extra arcs joining groups of sources that `arcs` leaves apart.
    fn link_source_groups(
        &self,
        sources: &HashSet<N>,
        arcs: &[Vec<Edge<N, V>>],
    ) -> Vec<Vec<Edge<N, V>>> {
        let ordered: Vec<&N> = self.nodes.iter().filter(|n| sources.contains(*n)).collect();
        let mut group: HashMap<N, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, n)| ((*n).clone(), i))
            .collect();
        for arc in arcs {
            if let (Some(first), Some(last)) = (arc.first(), arc.last()) {
                merge_groups(&mut group, &first.from, &last.to);
            }
        }

        let mut links = Vec::new();
        for source in ordered {
            let Some(own) = group.get(source).copied() else {
                continue;
            };
            let in_other_group = |n: &N| group.get(n).is_some_and(|g| *g != own);
            let Some(link) = self.shortest_path(
                source,
                in_other_group,
                &mut SeenSets::default(),
                Traversal::UNDIRECTED,
            ) else {
                continue;
            };
            if let Some(last) = link.last() {
                merge_groups(&mut group, source, &last.to);
            }
            links.push(link);
        }
        links
    }
}

/// Fold the group of `b` into the group of `a`.
fn merge_groups<N: Eq + Hash>(group: &mut HashMap<N, usize>, a: &N, b: &N) {
    let (Some(keep), Some(fold)) = (group.get(a).copied(), group.get(b).copied()) else {
        return;
    };
    for g in group.values_mut() {
        if *g == fold {
            *g = keep;
        }
    }
}
