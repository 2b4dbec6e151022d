//! Native selection boundary.
//!
//! The platform's caret/highlight is an anchor/focus pair of (node, offset)
//! positions. This trait is the only way the core reads or replaces it. The
//! browser implementation wraps `window.getSelection()`; native UI toolkits
//! would wrap their own selection model.

use crate::error::PlatformError;

/// Raw native selection: anchor and focus as (node, offset) pairs.
///
/// Offsets are whatever the implementation reports for the node, before any
/// placeholder correction.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSelectionState<N> {
    pub anchor_node: N,
    pub anchor_offset: usize,
    pub focus_node: N,
    pub focus_offset: usize,
}

impl<N: Clone> NativeSelectionState<N> {
    /// A collapsed selection (caret) at `node`/`offset`.
    pub fn caret(node: N, offset: usize) -> Self {
        Self {
            anchor_node: node.clone(),
            anchor_offset: offset,
            focus_node: node,
            focus_offset: offset,
        }
    }
}

impl<N: PartialEq> NativeSelectionState<N> {
    pub fn is_collapsed(&self) -> bool {
        self.anchor_node == self.focus_node && self.anchor_offset == self.focus_offset
    }
}

/// Platform-specific selection reading and writing.
pub trait NativeSelection {
    type Node;

    /// Current native selection, or `None` when there is no selection or it
    /// is missing an anchor or focus node.
    fn read(&self) -> Option<NativeSelectionState<Self::Node>>;

    /// Replace the native selection.
    fn write(&mut self, state: &NativeSelectionState<Self::Node>) -> Result<(), PlatformError>;
}
