mod depths;
mod hierarchy;
mod placement;

use crate::error::{ConfigError, LayoutError};
use crate::input::{EdgeRecord, NodeRecord};
use crate::layout::{PositionedLayout, PositionedNode};
use crate::{LayoutEngine, Position, Vec2};
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use tracing::debug;

pub use depths::Depths;
pub use hierarchy::Hierarchy;

use depths::working_graph;
use placement::place_tree;

/// Direction in which the tree grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Top-down, the root is on top and depth grows towards negative y
    #[default]
    Td,
    /// Left-right, the root is on the left and depth grows towards positive x
    Lr,
}

impl Mode {
    /// Map a tree placement (x along a level, y along the depth) to a position
    fn orient(self, point: Vec2) -> Position {
        match self {
            Mode::Td => Position::new(point.x, -point.y),
            Mode::Lr => Position::new(point.y, point.x),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "td" => Ok(Mode::Td),
            "lr" => Ok(Mode::Lr),
            other => Err(ConfigError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Td => f.write_str("td"),
            Mode::Lr => f.write_str("lr"),
        }
    }
}

/// Configuration for the hierarchical (tidy tree) DAG layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalLayout {
    /// Direction in which the tree grows
    pub mode: Mode,

    /// Grid cell of a node, along a level and between levels
    pub node_size: Vec2,

    /// Distance between neighbouring nodes, in node sizes
    pub separation: f32,

    /// Longest path accepted, in edges
    pub depth_limit: Option<usize>,
}

impl Default for HierarchicalLayout {
    fn default() -> Self {
        Self {
            mode: Mode::Td,
            node_size: Vec2::new(50.0, 50.0),
            separation: 1.0,
            depth_limit: None,
        }
    }
}

impl HierarchicalLayout {
    /// Create a new hierarchical layout growing in the given direction
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Load a configuration from a RON document, missing fields keep their
    /// default value
    ///
    /// ```
    /// use graph_layout::{HierarchicalLayout, Mode};
    ///
    /// let layout = HierarchicalLayout::from_ron("(mode: lr, depth_limit: Some(64))").unwrap();
    /// assert_eq!(layout.mode, Mode::Lr);
    /// assert_eq!(layout.separation, 1.0);
    /// ```
    ///
    /// # Errors
    /// Returns an error if the document doesn't parse or fails [`Self::validate`]
    pub fn from_ron(document: &str) -> Result<Self, ConfigError> {
        let layout: Self = ron::from_str(document)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check that spacing values can produce a layout without overlaps
    ///
    /// # Errors
    /// Returns an error if `separation` or a `node_size` component isn't a
    /// finite, strictly positive number
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.separation) {
            return Err(ConfigError::InvalidSeparation(self.separation));
        }
        if !positive(self.node_size.x) || !positive(self.node_size.y) {
            return Err(ConfigError::InvalidNodeSize(self.node_size));
        }
        Ok(())
    }

    /// Resolve the depth of every node (cheap to keep around)
    ///
    /// Nodes are visited in `node_identifiers` order and edges in outgoing
    /// neighbor order.
    ///
    /// # Errors
    /// Returns an error if the graph contains cycles or a path longer than
    /// `depth_limit`
    pub fn compute_depths<G>(&self, graph: G) -> Result<Depths<G::NodeId>, LayoutError<G::NodeId>>
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash + fmt::Debug,
    {
        let edges = graph.node_identifiers().flat_map(|node| {
            graph
                .neighbors_directed(node, Direction::Outgoing)
                .map(move |succ| (node, succ))
        });
        let internal_graph = working_graph(graph.node_identifiers(), edges)?;
        Depths::resolve(internal_graph, self.depth_limit)
    }

    /// Derive the single-root tree used for placement
    ///
    /// # Errors
    /// Returns an error unless exactly one node has no incoming edge, which
    /// includes the empty graph
    pub fn compute_hierarchy<N>(&self, depths: &Depths<N>) -> Result<Hierarchy<N>, LayoutError<N>>
    where
        N: Copy + Ord + Hash + fmt::Debug,
    {
        Hierarchy::build(depths)
    }

    /// Place the nodes of the graph
    ///
    /// # Errors
    /// Returns an error unless exactly one node has no incoming edge, which
    /// includes the empty graph
    pub fn compute_positions<N>(&self, depths: &Depths<N>) -> Result<PositionedLayout<N>, LayoutError<N>>
    where
        N: Copy + Ord + Hash + fmt::Debug,
    {
        let hierarchy = self.compute_hierarchy(depths)?;
        let mut layout = PositionedLayout::with_capacity(depths.len(), depths.max_depth());

        let points = place_tree(&hierarchy, self.node_size, self.separation);
        for (&id, point) in hierarchy.nodes().iter().zip(points) {
            layout.insert(PositionedNode {
                id,
                data: (),
                depth: depths.depth(id).unwrap_or_default(),
                position: self.mode.orient(point),
            });
        }

        debug!("Placed {} nodes, mode {}", layout.len(), self.mode);

        Ok(layout)
    }

    /// Lay out nodes and edges coming from a graph store
    ///
    /// Node payloads are moved into the resulting layout.
    ///
    /// # Errors
    /// Returns an error if an edge references an unknown node, if the graph
    /// has a cycle, a path longer than `depth_limit`, or not exactly one root
    pub fn layout_records<P>(
        &self,
        nodes: Vec<NodeRecord<P>>,
        edges: &[EdgeRecord],
    ) -> Result<PositionedLayout<String, P>, LayoutError<String>> {
        debug!("Layout of {} nodes and {} edges", nodes.len(), edges.len());

        let (placed, max_depth) = {
            let to_owned = |err: LayoutError<&str>| err.map_id(str::to_owned);

            let graph = working_graph(
                nodes.iter().map(|node| node.id.as_str()),
                edges.iter().map(|edge| (edge.source(), edge.target())),
            )
            .map_err(to_owned)?;
            let depths = Depths::resolve(graph, self.depth_limit).map_err(to_owned)?;
            let positions = self.compute_positions(&depths).map_err(to_owned)?;

            let placed: Vec<_> = nodes
                .iter()
                .map(|node| {
                    positions
                        .node_position(node.id.as_str())
                        .map(|placed| (placed.depth, placed.position))
                })
                .collect();
            (placed, positions.max_depth())
        };

        let mut layout = PositionedLayout::with_capacity(nodes.len(), max_depth);
        for (node, placed) in nodes.into_iter().zip(placed) {
            let Some((depth, position)) = placed else {
                continue;
            };
            layout.insert(PositionedNode {
                id: node.id,
                data: node.data,
                depth,
                position,
            });
        }

        Ok(layout)
    }
}

// Implement LayoutEngine for any graph with the required capabilities
impl<G> LayoutEngine<G> for HierarchicalLayout
where
    G: IntoNodeIdentifiers + IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash + fmt::Debug,
{
    type NodeId = G::NodeId;
    type Error = LayoutError<G::NodeId>;

    fn layout(&self, graph: G) -> Result<PositionedLayout<Self::NodeId>, Self::Error> {
        let depths = self.compute_depths(graph)?;
        self.compute_positions(&depths)
    }
}
