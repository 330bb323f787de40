//! Tidy tree placement
//!
//! Reingold-Tilford layout with the linear time improvements of Walker and
//! Buchheim et al:
//!
//! 1. First walk, bottom-up: give every node a preliminary x, pushing
//!    sibling subtrees apart by following their contours. Threads link the
//!    contours so they can be walked without visiting whole subtrees.
//! 2. Second walk, top-down: accumulate the modifiers into final x values.
//!
//! Coordinates are expressed in units of `node_size`: the root sits at
//! x = 0 and every level is `node_size.y` below the previous one.

use super::Hierarchy;
use crate::Vec2;
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct TreeNode {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Index among its siblings
    number: usize,
    depth: usize,
    prelim: f32,
    modifier: f32,
    /// Shift and change, used to spread out the siblings of moved subtrees
    shift: f32,
    change: f32,
    /// Next node of the contour when `children` is empty
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor of this node's children during apportion
    default_ancestor: Option<usize>,
}

struct TidyTree {
    nodes: Vec<TreeNode>,
    separation: f32,
}

/// Place the nodes of `hierarchy`, returned positions follow
/// [`Hierarchy::nodes`]
pub(crate) fn place_tree<N>(hierarchy: &Hierarchy<N>, node_size: Vec2, separation: f32) -> Vec<Vec2>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    let mut tree = TidyTree::new(hierarchy, separation);
    let root = hierarchy.root;

    for v in tree.post_order(root) {
        tree.first_walk(v);
    }

    let mut x = vec![0.0; tree.nodes.len()];
    let root_offset = -tree.nodes[root].prelim;
    for v in tree.pre_order(root) {
        let parent_modifier = match tree.nodes[v].parent {
            Some(parent) => tree.nodes[parent].modifier,
            None => root_offset,
        };
        let node = &mut tree.nodes[v];
        x[v] = node.prelim + parent_modifier;
        node.modifier += parent_modifier;
    }

    tree.nodes
        .iter()
        .zip(x)
        .map(|(node, x)| Vec2::new(x * node_size.x, node.depth as f32 * node_size.y))
        .collect()
}

impl TidyTree {
    fn new<N>(hierarchy: &Hierarchy<N>, separation: f32) -> Self
    where
        N: Copy + Ord + Hash + fmt::Debug,
    {
        let mut nodes: Vec<TreeNode> = hierarchy
            .children
            .iter()
            .enumerate()
            .map(|(i, children)| TreeNode {
                parent: hierarchy.parents[i],
                children: children.clone(),
                number: 0,
                depth: 0,
                prelim: 0.0,
                modifier: 0.0,
                shift: 0.0,
                change: 0.0,
                thread: None,
                ancestor: i,
                default_ancestor: None,
            })
            .collect();

        let mut stack = vec![hierarchy.root];
        while let Some(v) = stack.pop() {
            let depth = nodes[v].depth + 1;
            for (number, child) in hierarchy.children[v].iter().copied().enumerate() {
                nodes[child].number = number;
                nodes[child].depth = depth;
                stack.push(child);
            }
        }

        Self { nodes, separation }
    }

    /// Children before parents, left siblings before right siblings
    fn post_order(&self, root: usize) -> Vec<usize> {
        let mut order = self.pre_order_rev(root);
        order.reverse();
        order
    }

    fn pre_order(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.nodes[v].children.iter().rev());
        }
        order
    }

    /// Pre-order visiting the last child first
    fn pre_order_rev(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.nodes[v].children.iter());
        }
        order
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        let parent = node.parent?;
        let number = node.number.checked_sub(1)?;
        self.nodes[parent].children.get(number).copied()
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        node.children.first().copied().or(node.thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        node.children.last().copied().or(node.thread)
    }

    fn first_walk(&mut self, v: usize) {
        let left_sibling = self.left_sibling(v);
        let first_child = self.nodes[v].children.first().copied();
        let last_child = self.nodes[v].children.last().copied();

        if let (Some(first), Some(last)) = (first_child, last_child) {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    let prelim = self.nodes[w].prelim + self.separation;
                    self.nodes[v].prelim = prelim;
                    self.nodes[v].modifier = prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation;
        }

        let Some(parent) = self.nodes[v].parent else {
            return;
        };
        let Some(default_ancestor) = self.nodes[parent]
            .default_ancestor
            .or_else(|| self.nodes[parent].children.first().copied())
        else {
            return;
        };
        let ancestor = self.apportion(v, left_sibling, default_ancestor);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    /// Push the subtree of `v` right of the subtrees of its left siblings
    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };
        let Some(mut outer_left) = self.leftmost_sibling(v) else {
            return ancestor;
        };

        // inner_right/outer_right walk the contours of v, inner_left/outer_left
        // the contours of its left siblings
        let mut outer_right = v;
        let mut sum_inner_right = self.nodes[v].modifier;
        let mut sum_outer_right = self.nodes[v].modifier;
        let mut sum_inner_left = self.nodes[w].modifier;
        let mut sum_outer_left = self.nodes[outer_left].modifier;

        let mut inner_left = self.next_right(w);
        let mut inner_right = self.next_left(v);

        while let (Some(il), Some(ir)) = (inner_left, inner_right) {
            let (Some(next_outer_left), Some(next_outer_right)) =
                (self.next_left(outer_left), self.next_right(outer_right))
            else {
                break;
            };
            outer_left = next_outer_left;
            outer_right = next_outer_right;
            self.nodes[outer_right].ancestor = v;

            let shift = self.nodes[il].prelim + sum_inner_left - self.nodes[ir].prelim
                - sum_inner_right
                + self.separation;
            if shift > 0.0 {
                let moved = self.next_ancestor(il, v, ancestor);
                self.move_subtree(moved, v, shift);
                sum_inner_right += shift;
                sum_outer_right += shift;
            }

            sum_inner_left += self.nodes[il].modifier;
            sum_inner_right += self.nodes[ir].modifier;
            sum_outer_left += self.nodes[outer_left].modifier;
            sum_outer_right += self.nodes[outer_right].modifier;

            inner_left = self.next_right(il);
            inner_right = self.next_left(ir);
        }

        if let Some(il) = inner_left {
            if self.next_right(outer_right).is_none() {
                self.nodes[outer_right].thread = Some(il);
                self.nodes[outer_right].modifier += sum_inner_left - sum_outer_right;
            }
        }

        if let Some(ir) = inner_right {
            if self.next_left(outer_left).is_none() {
                self.nodes[outer_left].thread = Some(ir);
                self.nodes[outer_left].modifier += sum_inner_right - sum_outer_left;
                ancestor = v;
            }
        }

        ancestor
    }

    fn leftmost_sibling(&self, v: usize) -> Option<usize> {
        let parent = self.nodes[v].parent?;
        self.nodes[parent].children.first().copied()
    }

    fn next_ancestor(&self, inner_left: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.nodes[inner_left].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, from: usize, to: usize, shift: f32) {
        let subtrees = self.nodes[to].number.saturating_sub(self.nodes[from].number).max(1);
        let change = shift / subtrees as f32;

        let to_node = &mut self.nodes[to];
        to_node.change -= change;
        to_node.shift += shift;
        to_node.prelim += shift;
        to_node.modifier += shift;

        self.nodes[from].change += change;
    }

    /// Spread the shifts recorded by `move_subtree` over the children of `v`
    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = self.nodes[v].children.clone();
        for child in children.into_iter().rev() {
            let node = &mut self.nodes[child];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }
}
