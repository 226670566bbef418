//! Graph-specific error types.

use pf_core::PfError;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and decomposition errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An undirected edge uid does not have exactly one forward and one backward record.
    UnpairedEdge { uid: String, count: usize },

    /// The two records sharing an undirected uid are not complementary.
    MismatchedPair { uid: String },

    /// A directed edge reuses a uid already taken by another edge.
    DuplicateEdgeUid { uid: String },

    /// Both halves of a source arc ended at the same source; that edge belongs to a cycle.
    ArcClosesOnItself { uid: String, source: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnpairedEdge { uid, count } => {
                write!(
                    f,
                    "Undirected edge {} has {} directed records (expected 2)",
                    uid, count
                )
            }
            GraphError::MismatchedPair { uid } => {
                write!(f, "Directed records of edge {} are not complementary", uid)
            }
            GraphError::DuplicateEdgeUid { uid } => {
                write!(f, "Edge uid {} is used more than once", uid)
            }
            GraphError::ArcClosesOnItself { uid, source } => {
                write!(
                    f,
                    "Arc through edge {} starts and ends at source {}",
                    uid, source
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for PfError {
    fn from(err: GraphError) -> Self {
        PfError::Invariant {
            what: err.to_string(),
        }
    }
}
