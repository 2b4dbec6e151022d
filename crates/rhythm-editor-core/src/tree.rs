//! Native tree abstraction.
//!
//! The core never owns the native tree. It reads structure (parents,
//! siblings, document order) and layout through this trait, which the
//! browser crate implements over `web_sys::Node` and [`MemoryTree`] implements
//! over an arena for headless hosts and tests.
//!
//! [`MemoryTree`]: crate::memory::MemoryTree

use std::cmp::Ordering;
use std::fmt::Debug;

/// Layout box kind of a native node, as far as caret placement cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Flows in a line with its siblings.
    Inline,
    /// Starts its own line.
    Block,
}

/// Read-only view of a native tree.
pub trait NativeTree {
    /// Handle to a native node. Equality must be node identity, not
    /// structural equality.
    type Node: Clone + PartialEq + Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;

    fn last_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Compare two nodes in document order.
    ///
    /// `Less` means `a` comes before `b`. An ancestor comes before its
    /// descendants. Identical nodes compare `Equal`.
    fn compare_position(&self, a: &Self::Node, b: &Self::Node) -> Ordering;

    /// Characters of text content in `node`'s subtree.
    fn text_len(&self, node: &Self::Node) -> usize;

    /// Layout kind of `node`, or `None` if native layout is not available
    /// (detached node, nothing rendered yet, non-element node).
    fn layout(&self, node: &Self::Node) -> Option<Layout>;

    /// True when `node` is laid out inline.
    fn is_inline(&self, node: &Self::Node) -> bool {
        self.layout(node) == Some(Layout::Inline)
    }
}
