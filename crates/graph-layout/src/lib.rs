//! Hierarchical layout of directed acyclic graphs
//!
//! The layout runs in three phases:
//!
//! 1. Every node gets a depth, the length of the longest path reaching it
//!    from a root. Dangling edges and cycles are rejected here.
//! 2. The DAG is reduced to a tree by keeping, for every node, the first edge
//!    targeting it.
//! 3. The tree is placed on a grid with a tidy tree algorithm, then oriented
//!    top-down or left-right.
//!
//! It works with node and edge records coming from a graph store, or with any
//! graph implementing petgraph's visitor traits.
//!
//! # Example
//!
//! ```
//! use graph_layout::{EdgeRecord, HierarchicalLayout, LayoutEngine, Mode, NodeRecord};
//! use petgraph::graphmap::DiGraphMap;
//!
//! // From records
//! let nodes = vec![NodeRecord::bare("a"), NodeRecord::bare("b"), NodeRecord::bare("c")];
//! let edges = vec![EdgeRecord::new("a", "b"), EdgeRecord::new("b", "c")];
//! let layout = HierarchicalLayout::new(Mode::Td)
//!     .layout_records(nodes, &edges)
//!     .unwrap();
//! assert!(layout.step());
//! assert_eq!(layout.node_position("c").unwrap().position.y, -100.0);
//!
//! // From a petgraph graph, using the LayoutEngine trait
//! let mut graph = DiGraphMap::new();
//! graph.add_edge(1, 2, ());
//! graph.add_edge(1, 3, ());
//! let layout = HierarchicalLayout::new(Mode::Lr).layout(&graph).unwrap();
//! assert_eq!(layout.node_position(&3).unwrap().position.x, 50.0);
//!
//! // Or directly by calling each phase for better control
//! let engine = HierarchicalLayout::default();
//! let depths = engine.compute_depths(&graph).unwrap();
//! assert_eq!(depths.max_depth(), 1);
//! let layout = engine.compute_positions(&depths).unwrap();
//! assert_eq!(layout.len(), 3);
//! ```

mod engine;
mod error;
mod geometry;
mod input;
mod layout;

pub mod hierarchical;

// Re-export core types and traits
pub use engine::{LayoutEngine, LayoutStrategy};
pub use error::{ConfigError, EdgeRole, LayoutError};
pub use geometry::{Position, Vec2};
pub use input::{EdgeRecord, Endpoints, NodeRecord};
pub use layout::{PositionedLayout, PositionedNode};

// Re-export petgraph visitor traits for graph abstraction
pub use petgraph::visit::{GraphBase, IntoNeighborsDirected, IntoNodeIdentifiers};

// Re-export hierarchical layout types
pub use hierarchical::{Depths, Hierarchy, HierarchicalLayout, Mode};
