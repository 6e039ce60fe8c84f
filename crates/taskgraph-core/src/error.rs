use std::fmt;

/// Precondition failures surfaced by the graph algorithms.
///
/// None of these are retried internally: each one means the caller passed
/// an argument the operation cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A vertex index (edge endpoint, source, target) lies outside `[0, n)`.
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    OutOfRange { vertex: usize, vertex_count: usize },

    /// A DAG-only algorithm was handed a graph containing a cycle.
    #[error("graph is not a DAG: only {ordered} of {vertex_count} vertices could be ordered")]
    NotADag { ordered: usize, vertex_count: usize },

    /// A component id outside `[0, component_count)`.
    #[error("invalid component id {component}: graph has {component_count} components")]
    InvalidComponent {
        component: usize,
        component_count: usize,
    },

    /// A path sum left the `i64` range while relaxing `from → to`.
    #[error("path distance overflowed relaxing edge {from} -> {to}")]
    DistanceOverflow { from: usize, to: usize },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
            Self::NotADag { .. } => ErrorCode::NotADag,
            Self::InvalidComponent { .. } => ErrorCode::InvalidComponent,
            Self::DistanceOverflow { .. } => ErrorCode::DistanceOverflow,
        }
    }
}

/// Result alias used across the core crate.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Machine-readable error codes for report writers and scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    OutOfRange,
    NotADag,
    InvalidComponent,
    DistanceOverflow,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::OutOfRange => "E1001",
            Self::NotADag => "E1002",
            Self::InvalidComponent => "E1003",
            Self::DistanceOverflow => "E1004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfRange => "Vertex index out of range",
            Self::NotADag => "Graph contains a cycle",
            Self::InvalidComponent => "Invalid component id",
            Self::DistanceOverflow => "Path distance overflow",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::OutOfRange => None,
            Self::NotADag => {
                Some("Run SCC detection and use the condensation graph for path queries.")
            }
            Self::InvalidComponent => Some("Component ids range over the SCC result's components."),
            Self::DistanceOverflow => Some("Edge weights are too large for 64-bit path sums."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
