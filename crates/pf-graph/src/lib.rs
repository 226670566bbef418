//! pf-graph: generic directed multigraph for pipeflow networks.
//!
//! Provides:
//! - `Graph<N, V>` with full and reverse adjacency
//! - Depth-first traversal driven by an explicit stack, with reentrant seen-sets
//! - Path search, DAG ordering and connected components
//! - Cycle-cover and source-arc-cover decomposition used by the flow solver
//!
//! # Example
//!
//! ```
//! use pf_graph::{Graph, SeenSets, Traversal};
//!
//! let mut graph: Graph<&str, &str> = Graph::new();
//! graph.add_edge("source", "tee", "pipe-1", None);
//! graph.add_edge("tee", "basin", "pipe-2", None);
//!
//! let path = graph
//!     .any_path(&"basin", |n| *n == "source", &mut SeenSets::default(), Traversal::FORWARD)
//!     .unwrap();
//! assert_eq!(path.len(), 2);
//! assert_eq!(path[1].to, "source");
//! ```

pub mod cover;
pub mod error;
pub mod graph;
pub mod traversal;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use cover::{ArcCover, reverse_path};
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, EdgeUid, Graph};
pub use traversal::{ConnectedComponent, Control, DfsEvent, SeenSets, Traversal};
