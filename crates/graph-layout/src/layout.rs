use crate::{LayoutStrategy, Position};
use std::borrow::Borrow;
use std::collections::hash_map::Values;
use std::collections::HashMap;
use std::hash::Hash;

/// A node with its computed position
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode<N, P = ()> {
    pub id: N,

    /// Payload of the node, as given by the caller
    pub data: P,

    /// Length of the longest path from a root to this node
    pub depth: usize,

    pub position: Position,
}

/// Positions of all the nodes of a graph
///
/// The layout is computed eagerly, there is nothing left to iterate on once
/// it's built.
#[derive(Debug, Clone)]
pub struct PositionedLayout<N, P = ()> {
    nodes: HashMap<N, PositionedNode<N, P>>,
    max_depth: usize,
}

impl<N, P> PositionedLayout<N, P>
where
    N: Clone + Eq + Hash,
{
    pub(crate) fn with_capacity(capacity: usize, max_depth: usize) -> Self {
        Self {
            nodes: HashMap::with_capacity(capacity),
            max_depth,
        }
    }

    pub(crate) fn insert(&mut self, node: PositionedNode<N, P>) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Always true, the layout is final from construction
    pub fn step(&self) -> bool {
        true
    }

    /// Position of a node, `None` if it isn't part of the layout
    pub fn node_position<Q>(&self, id: &Q) -> Option<&PositionedNode<N, P>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.get(id)
    }

    /// Maximum depth of the graph, at least 1
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over positioned nodes in arbitrary order
    pub fn iter(&self) -> Values<'_, N, PositionedNode<N, P>> {
        self.nodes.values()
    }
}

impl<'a, N, P> IntoIterator for &'a PositionedLayout<N, P>
where
    N: Clone + Eq + Hash,
{
    type Item = &'a PositionedNode<N, P>;
    type IntoIter = Values<'a, N, PositionedNode<N, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N, P> LayoutStrategy for PositionedLayout<N, P>
where
    N: Clone + Eq + Hash,
{
    type NodeId = N;
    type Node = PositionedNode<N, P>;

    fn step(&mut self) -> bool {
        PositionedLayout::step(self)
    }

    fn node_position(&self, id: &N) -> Option<&Self::Node> {
        PositionedLayout::node_position(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn sample() -> PositionedLayout<String, u32> {
        let mut layout = PositionedLayout::with_capacity(2, 1);
        layout.insert(PositionedNode {
            id: "a".to_owned(),
            data: 7,
            depth: 0,
            position: Position::new(0.0, 0.0),
        });
        layout.insert(PositionedNode {
            id: "b".to_owned(),
            data: 8,
            depth: 1,
            position: Position::new(0.0, -50.0),
        });
        layout
    }

    /// Drive any strategy the way a renderer would
    fn settle<L: LayoutStrategy>(layout: &mut L, max_steps: usize) -> usize {
        (1..=max_steps).find(|_| layout.step()).unwrap_or(max_steps)
    }

    #[test]
    fn test_settles_on_first_step() {
        let mut layout = sample();
        assert_eq!(settle(&mut layout, 100), 1);
    }

    #[test]
    fn test_lookup() {
        let layout = sample();
        let b = layout.node_position("b").unwrap();
        assert_eq!(b.data, 8);
        assert_eq!(b.position, Position::new(0.0, -50.0));
        assert_eq!(
            LayoutStrategy::node_position(&layout, &"a".to_owned()).map(|node| node.data),
            Some(7)
        );
        assert!(layout.node_position("c").is_none());
    }

    #[test]
    fn test_iteration() {
        let layout = sample();
        let mut ids: Vec<_> = layout.iter().map(|node| node.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!((&layout).into_iter().count(), layout.len());
    }
}
