use crate::PositionedLayout;
use std::hash::Hash;

/// A layout engine that can compute positions for graph nodes
///
/// This trait is generic over the graph type `G`, allowing different layout
/// engines to work with different graph types:
/// - The hierarchical layout implements `LayoutEngine<G>` for any `G`
///   exposing node identifiers and directed neighbors
/// - Other layouts can specify their own graph requirements
pub trait LayoutEngine<G> {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash;

    /// The error returned when the graph can't be laid out
    type Error;

    /// Compute node positions for the given graph
    ///
    /// # Errors
    /// Returns an error if the layout computation fails (e.g., graph contains
    /// cycles for DAG layouts, or other layout-specific constraints are violated)
    fn layout(&self, graph: G) -> Result<PositionedLayout<Self::NodeId>, Self::Error>;
}

/// The view renderers have on a layout
///
/// Iterative layouts progress a bit on each `step`, eager ones are done from
/// the start.
pub trait LayoutStrategy {
    type NodeId;
    type Node;

    /// Advance the layout, returns true once positions are final
    fn step(&mut self) -> bool;

    /// Current position of a node, `None` if the node is unknown
    fn node_position(&self, id: &Self::NodeId) -> Option<&Self::Node>;
}
