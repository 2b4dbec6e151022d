//! Bounded directional search through the native tree.
//!
//! Finds the nearest node matching a predicate before (or after) a starting
//! node, looking through the siblings of the node and of each of its
//! ancestors, and into those siblings' subtrees. The ascent stops below the
//! first ancestor matching a boundary predicate, so a search started inside
//! an editor root never leaves it.

use crate::tree::NativeTree;

/// Which way to walk from the starting node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn sibling<T: NativeTree>(self, tree: &T, node: &T::Node) -> Option<T::Node> {
        match self {
            Direction::Backward => tree.previous_sibling(node),
            Direction::Forward => tree.next_sibling(node),
        }
    }

    /// The child visited first when descending: the one nearest the start.
    fn entry_child<T: NativeTree>(self, tree: &T, node: &T::Node) -> Option<T::Node> {
        match self {
            Direction::Backward => tree.last_child(node),
            Direction::Forward => tree.first_child(node),
        }
    }
}

/// Find the nearest node in `direction` from `node` for which `is_match`
/// holds.
///
/// `node` itself is never a candidate. Its siblings are checked in order,
/// each one before its own descendants. If nothing matches, the search moves
/// up to the parent and continues with the parent's siblings, unless the
/// parent is missing or `is_boundary` holds for it.
pub fn find_nearest_matching<T, M, B>(
    tree: &T,
    node: &T::Node,
    direction: Direction,
    is_match: M,
    is_boundary: B,
) -> Option<T::Node>
where
    T: NativeTree,
    M: Fn(&T::Node) -> bool,
    B: Fn(&T::Node) -> bool,
{
    let mut current = node.clone();
    loop {
        if let Some(side) = direction.sibling(tree, &current) {
            if let Some(found) = search_siblings(tree, side, direction, &is_match) {
                return Some(found);
            }
        }

        let parent = tree.parent(&current)?;
        if is_boundary(&parent) {
            return None;
        }
        current = parent;
    }
}

/// Shorthand for a backward [`find_nearest_matching`].
pub fn find_previous_matching<T, M, B>(
    tree: &T,
    node: &T::Node,
    is_match: M,
    is_boundary: B,
) -> Option<T::Node>
where
    T: NativeTree,
    M: Fn(&T::Node) -> bool,
    B: Fn(&T::Node) -> bool,
{
    find_nearest_matching(tree, node, Direction::Backward, is_match, is_boundary)
}

/// Shorthand for a forward [`find_nearest_matching`].
pub fn find_next_matching<T, M, B>(
    tree: &T,
    node: &T::Node,
    is_match: M,
    is_boundary: B,
) -> Option<T::Node>
where
    T: NativeTree,
    M: Fn(&T::Node) -> bool,
    B: Fn(&T::Node) -> bool,
{
    find_nearest_matching(tree, node, Direction::Forward, is_match, is_boundary)
}

/// Depth-first walk over `first`, its following siblings in `direction`, and
/// their subtrees. A node is checked before its children; a node's whole
/// subtree is finished before its next sibling.
fn search_siblings<T, M>(
    tree: &T,
    first: T::Node,
    direction: Direction,
    is_match: &M,
) -> Option<T::Node>
where
    T: NativeTree,
    M: Fn(&T::Node) -> bool,
{
    let mut stack = vec![first];
    while let Some(node) = stack.pop() {
        if is_match(&node) {
            return Some(node);
        }
        // Pushed first, popped after the whole child subtree.
        if let Some(sibling) = direction.sibling(tree, &node) {
            stack.push(sibling);
        }
        if let Some(child) = direction.entry_child(tree, &node) {
            stack.push(child);
        }
    }
    None
}
