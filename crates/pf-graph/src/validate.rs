//! Graph validation logic.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Graph};

impl<N, V> Graph<N, V>
where
    N: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Check the edge-record invariants.
    ///
    /// Every undirected uid must have exactly one forward and one backward record
    /// (complementary endpoints), and every directed uid must be unique.
    pub fn validate(&self) -> GraphResult<()> {
        let mut by_uid: HashMap<&str, Vec<&Edge<N, V>>> = HashMap::new();
        for edge in &self.edges {
            by_uid.entry(edge.uid.as_str()).or_default().push(edge);
        }

        for (uid, records) in by_uid {
            let undirected = records.iter().any(|e| !e.is_directed);
            if !undirected {
                if records.len() > 1 {
                    return Err(GraphError::DuplicateEdgeUid {
                        uid: uid.to_string(),
                    });
                }
                continue;
            }

            if records.len() != 2 {
                return Err(GraphError::UnpairedEdge {
                    uid: uid.to_string(),
                    count: records.len(),
                });
            }
            let (a, b) = (records[0], records[1]);
            if a.from != b.to || a.to != b.from || a.is_directed != b.is_directed {
                return Err(GraphError::MismatchedPair {
                    uid: uid.to_string(),
                });
            }
        }

        Ok(())
    }
}
