use crate::Vec2;
use std::fmt;
use thiserror::Error;

/// Which end of an edge referenced a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    Source,
    Target,
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRole::Source => f.write_str("source"),
            EdgeRole::Target => f.write_str("target"),
        }
    }
}

/// Errors that can occur during hierarchical layout computation
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError<N>
where
    N: fmt::Debug,
{
    /// An edge references a node that is not part of the graph
    #[error("missing {role} node {id:?}")]
    MissingNode { id: N, role: EdgeRole },

    /// The graph contains a cycle, `path` starts and ends on the same node
    #[error("invalid DAG, circular node path: {}", format_path(.path))]
    CyclicGraph { path: Vec<N> },

    /// The hierarchy doesn't have exactly one root
    #[error("expected exactly one root node, found {}: {roots:?}", .roots.len())]
    AmbiguousRoot { roots: Vec<N> },

    /// A traversal path got longer than the configured limit
    #[error("depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

impl<N: fmt::Debug> LayoutError<N> {
    /// Convert the node identifiers carried by the error
    pub fn map_id<M, F>(self, mut f: F) -> LayoutError<M>
    where
        M: fmt::Debug,
        F: FnMut(N) -> M,
    {
        match self {
            LayoutError::MissingNode { id, role } => LayoutError::MissingNode { id: f(id), role },
            LayoutError::CyclicGraph { path } => LayoutError::CyclicGraph {
                path: path.into_iter().map(f).collect(),
            },
            LayoutError::AmbiguousRoot { roots } => LayoutError::AmbiguousRoot {
                roots: roots.into_iter().map(f).collect(),
            },
            LayoutError::DepthLimitExceeded { limit } => LayoutError::DepthLimitExceeded { limit },
        }
    }
}

fn format_path<N: fmt::Debug>(path: &[N]) -> String {
    path.iter()
        .map(|node| format!("{node:?}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors raised while loading a layout configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid layout configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("unknown layout mode {0:?}, expected \"td\" or \"lr\"")]
    UnknownMode(String),

    #[error("separation must be a positive number, got {0}")]
    InvalidSeparation(f32),

    #[error("node size must be positive on both axes, got {0:?}")]
    InvalidNodeSize(Vec2),
}
