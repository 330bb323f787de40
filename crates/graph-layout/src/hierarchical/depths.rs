use crate::error::{EdgeRole, LayoutError};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::iter;
use tracing::{debug, trace};

/// Depth of every node of a DAG, with the graph it was computed on
///
/// The depth of a node is the length of the longest path reaching it from a
/// root. Holding a `Depths` means the graph was checked for dangling edges
/// and cycles.
#[derive(Debug, Clone)]
pub struct Depths<N>
where
    N: Copy + Ord + Hash,
{
    /// Internal graph, nodes and neighbors iterate in insertion order
    pub(crate) graph: DiGraphMap<N, ()>,

    depths: HashMap<N, usize>,

    max_depth: usize,
}

impl<N> Depths<N>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    /// Resolve the depths of all the nodes of `graph`
    ///
    /// When `limit` is set, paths longer than `limit` edges are rejected.
    ///
    /// # Errors
    /// Returns an error if the graph contains a cycle or a path exceeds `limit`
    pub(crate) fn resolve(
        graph: DiGraphMap<N, ()>,
        limit: Option<usize>,
    ) -> Result<Self, LayoutError<N>> {
        let depths = traverse(&graph, limit)?;

        // Graphs without edges still span one level
        let max_depth = depths
            .values()
            .copied()
            .max()
            .filter(|&depth| depth > 0)
            .unwrap_or(1);

        debug!(
            "Resolved depths of {} nodes, max depth {max_depth}",
            graph.node_count()
        );

        Ok(Self {
            graph,
            depths,
            max_depth,
        })
    }

    /// Depth of `node`, `None` if it isn't part of the graph
    pub fn depth(&self, node: N) -> Option<usize> {
        self.depths.get(&node).copied()
    }

    /// Maximum depth over all nodes, at least 1
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterate over nodes and their depth, in node insertion order
    pub fn iter(&self) -> impl Iterator<Item = (N, usize)> + '_ {
        self.graph
            .nodes()
            .filter_map(|node| self.depth(node).map(|depth| (node, depth)))
    }
}

/// Build the working graph out of node identifiers and `(source, target)`
/// pairs
///
/// # Errors
/// Returns an error naming the first endpoint that isn't in `nodes`, sources
/// are checked before targets
pub(crate) fn working_graph<N, I, E>(nodes: I, edges: E) -> Result<DiGraphMap<N, ()>, LayoutError<N>>
where
    N: Copy + Ord + Hash + fmt::Debug,
    I: IntoIterator<Item = N>,
    E: IntoIterator<Item = (N, N)>,
{
    let mut graph = DiGraphMap::new();
    for node in nodes {
        graph.add_node(node);
    }

    for (source, target) in edges {
        if !graph.contains_node(source) {
            return Err(LayoutError::MissingNode {
                id: source,
                role: EdgeRole::Source,
            });
        }
        if !graph.contains_node(target) {
            return Err(LayoutError::MissingNode {
                id: target,
                role: EdgeRole::Target,
            });
        }
        graph.add_edge(source, target, ());
    }

    Ok(graph)
}

/// Raise the depth of `node` to `depth`, returns false if it was already at
/// least that deep
fn relax<N: Hash + Eq>(depths: &mut HashMap<N, usize>, node: N, depth: usize) -> bool {
    match depths.get(&node) {
        Some(&current) if current >= depth => false,
        _ => {
            depths.insert(node, depth);
            true
        }
    }
}

/// Depth-first traversal starting from every node at depth 0
///
/// Each frame of `stack` holds the successors of the matching entry of `path`
/// that are left to visit. A node is only descended into when its depth
/// increases, so every node ends up at its longest distance from a root.
fn traverse<N>(
    graph: &DiGraphMap<N, ()>,
    limit: Option<usize>,
) -> Result<HashMap<N, usize>, LayoutError<N>>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    let mut depths = HashMap::with_capacity(graph.node_count());
    let mut path = Vec::new();
    let mut on_path = HashSet::new();
    let mut stack = Vec::new();

    for start in graph.nodes() {
        if !relax(&mut depths, start, 0) {
            continue;
        }
        path.push(start);
        on_path.insert(start);
        stack.push(graph.neighbors_directed(start, Direction::Outgoing));

        while let Some(successors) = stack.last_mut() {
            let Some(next) = successors.next() else {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(&done);
                }
                continue;
            };

            if on_path.contains(&next) {
                let cycle = path
                    .iter()
                    .copied()
                    .skip_while(|&node| node != next)
                    .chain(iter::once(next))
                    .collect();
                return Err(LayoutError::CyclicGraph { path: cycle });
            }

            let depth = path.len();
            if !relax(&mut depths, next, depth) {
                continue;
            }
            if let Some(limit) = limit {
                if depth > limit {
                    return Err(LayoutError::DepthLimitExceeded { limit });
                }
            }

            trace!("{next:?} at depth {depth}");
            path.push(next);
            on_path.insert(next);
            stack.push(graph.neighbors_directed(next, Direction::Outgoing));
        }
    }

    Ok(depths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn resolve<'a>(
        nodes: &[&'a str],
        edges: &[(&'a str, &'a str)],
    ) -> Result<Depths<&'a str>, LayoutError<&'a str>> {
        let graph = working_graph(nodes.iter().copied(), edges.iter().copied())?;
        Depths::resolve(graph, None)
    }

    #[test]
    fn test_isolated_nodes() {
        let depths = resolve(&["a", "b", "c"], &[]).unwrap();
        assert!(depths.iter().all(|(_, depth)| depth == 0));
        assert_eq!(depths.max_depth(), 1);
    }

    #[test]
    fn test_empty_graph() {
        let depths = resolve(&[], &[]).unwrap();
        assert!(depths.is_empty());
        assert_eq!(depths.max_depth(), 1);
    }

    #[test]
    fn test_chain() {
        let depths = resolve(&["a", "b", "c"], &[("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(depths.depth("a"), Some(0));
        assert_eq!(depths.depth("b"), Some(1));
        assert_eq!(depths.depth("c"), Some(2));
        assert_eq!(depths.max_depth(), 2);
    }

    #[test]
    fn test_longest_path_wins() {
        let depths = resolve(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("c", "b")]).unwrap();
        assert_eq!(depths.depth("b"), Some(2));

        // Same graph, nodes listed so the short path is explored first
        let depths = resolve(&["b", "a", "c"], &[("a", "b"), ("c", "b"), ("a", "c")]).unwrap();
        assert_eq!(depths.depth("b"), Some(2));
    }

    #[test]
    fn test_edges_increase_depth() {
        let edges = [
            ("a", "b"),
            ("a", "c"),
            ("b", "d"),
            ("c", "d"),
            ("d", "e"),
            ("a", "e"),
            ("f", "e"),
        ];
        let depths = resolve(&["e", "d", "c", "b", "a", "f"], &edges).unwrap();
        for (source, target) in edges {
            assert!(depths.depth(target).unwrap() > depths.depth(source).unwrap());
        }
        assert_eq!(depths.depth("e"), Some(3));
        assert_eq!(depths.depth("f"), Some(0));
        assert_eq!(depths.max_depth(), 3);
    }

    #[test]
    fn test_cycle_path() {
        let err = resolve(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicGraph {
                path: vec!["a", "b", "c", "a"]
            }
        );
    }

    #[test]
    fn test_cycle_below_root() {
        let err = resolve(
            &["root", "a", "b"],
            &[("root", "a"), ("a", "b"), ("b", "a")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicGraph {
                path: vec!["a", "b", "a"]
            }
        );
    }

    #[test]
    fn test_self_loop() {
        let err = resolve(&["a"], &[("a", "a")]).unwrap_err();
        assert_eq!(err, LayoutError::CyclicGraph { path: vec!["a", "a"] });
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let depths = resolve(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        )
        .unwrap();
        assert_eq!(depths.depth("d"), Some(2));
    }

    #[test]
    fn test_missing_source() {
        let err = resolve(&["a"], &[("x", "a")]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MissingNode {
                id: "x",
                role: EdgeRole::Source
            }
        );
    }

    #[test]
    fn test_missing_target() {
        let err = resolve(&["a", "b"], &[("a", "b"), ("b", "x")]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MissingNode {
                id: "x",
                role: EdgeRole::Target
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let graph = working_graph(["a", "b", "c"], [("a", "b"), ("b", "c")]).unwrap();
        let err = Depths::resolve(graph.clone(), Some(1)).unwrap_err();
        assert_eq!(err, LayoutError::DepthLimitExceeded { limit: 1 });

        let depths = Depths::resolve(graph, Some(2)).unwrap();
        assert_eq!(depths.max_depth(), 2);
    }

    #[test]
    fn test_deep_chain() {
        let ids: Vec<String> = (0..100_000).map(|i| i.to_string()).collect();
        let nodes: Vec<&str> = ids.iter().map(String::as_str).collect();
        let edges: Vec<_> = nodes.windows(2).map(|pair| (pair[0], pair[1])).collect();
        let depths = resolve(&nodes, &edges).unwrap();
        assert_eq!(depths.max_depth(), 99_999);
    }
}
