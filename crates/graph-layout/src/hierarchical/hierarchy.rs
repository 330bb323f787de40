use super::Depths;
use crate::error::LayoutError;
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

/// Single-root tree spanning the nodes of a DAG
///
/// The parent of a node is the source of the first edge targeting it, in edge
/// insertion order. Children are kept in node insertion order.
#[derive(Debug, Clone)]
pub struct Hierarchy<N>
where
    N: Copy + Ord + Hash,
{
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    pub(crate) parents: Vec<Option<usize>>,
    pub(crate) children: Vec<Vec<usize>>,
    pub(crate) root: usize,
}

impl<N> Hierarchy<N>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    /// Derive the hierarchy from resolved depths
    ///
    /// # Errors
    /// Returns an error unless exactly one node has no incoming edge, an
    /// empty graph has no root
    pub(crate) fn build(depths: &Depths<N>) -> Result<Self, LayoutError<N>> {
        let graph = &depths.graph;
        let nodes: Vec<N> = graph.nodes().collect();
        let index: HashMap<N, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();

        let parents: Vec<Option<usize>> = nodes
            .iter()
            .map(|&node| {
                graph
                    .neighbors_directed(node, Direction::Incoming)
                    .next()
                    .and_then(|parent| index.get(&parent).copied())
            })
            .collect();

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(i),
                None => roots.push(i),
            }
        }

        let root = match roots.as_slice() {
            [root] => *root,
            _ => {
                return Err(LayoutError::AmbiguousRoot {
                    roots: roots.into_iter().map(|i| nodes[i]).collect(),
                })
            }
        };

        debug!("Hierarchy of {} nodes rooted at {:?}", nodes.len(), nodes[root]);

        Ok(Self {
            nodes,
            index,
            parents,
            children,
            root,
        })
    }

    /// Nodes of the tree, in insertion order
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn root(&self) -> N {
        self.nodes[self.root]
    }

    /// Tree parent of `node`, `None` for the root and unknown nodes
    pub fn parent(&self, node: N) -> Option<N> {
        let i = *self.index.get(&node)?;
        self.parents[i].map(|parent| self.nodes[parent])
    }

    /// Tree children of `node`, in insertion order
    pub fn children(&self, node: N) -> impl Iterator<Item = N> + '_ {
        self.index
            .get(&node)
            .map(|&i| self.children[i].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&child| self.nodes[child])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchical::depths::working_graph;
    use test_log::test;

    fn hierarchy<'a>(
        nodes: &[&'a str],
        edges: &[(&'a str, &'a str)],
    ) -> Result<Hierarchy<&'a str>, LayoutError<&'a str>> {
        let graph = working_graph(nodes.iter().copied(), edges.iter().copied())?;
        Hierarchy::build(&Depths::resolve(graph, None)?)
    }

    #[test]
    fn test_first_incoming_edge_is_parent() {
        let tree = hierarchy(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("c", "b")])
            .unwrap();
        assert_eq!(tree.root(), "a");
        assert_eq!(tree.parent("b"), Some("a"));
        assert_eq!(tree.parent("c"), Some("a"));
        assert_eq!(tree.parent("a"), None);

        let tree = hierarchy(&["a", "b", "c"], &[("a", "c"), ("c", "b"), ("a", "b")])
            .unwrap();
        assert_eq!(tree.parent("b"), Some("c"));
        assert_eq!(tree.children("a").collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_children_follow_node_order() {
        let tree = hierarchy(&["r", "z", "y", "x"], &[("r", "x"), ("r", "y"), ("r", "z")])
            .unwrap();
        assert_eq!(tree.children("r").collect::<Vec<_>>(), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_single_node() {
        let tree = hierarchy(&["a"], &[]).unwrap();
        assert_eq!(tree.root(), "a");
        assert_eq!(tree.children("a").count(), 0);
    }

    #[test]
    fn test_empty_graph_has_no_root() {
        let err = hierarchy(&[], &[]).unwrap_err();
        assert_eq!(err, LayoutError::AmbiguousRoot { roots: vec![] });
    }

    #[test]
    fn test_multiple_roots() {
        let err = hierarchy(&["a", "b", "c"], &[("a", "c"), ("b", "c")]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::AmbiguousRoot {
                roots: vec!["a", "b"]
            }
        );
    }

    #[test]
    fn test_unknown_node() {
        let tree = hierarchy(&["a", "b"], &[("a", "b")]).unwrap();
        assert_eq!(tree.parent("x"), None);
        assert_eq!(tree.children("x").count(), 0);
    }
}
