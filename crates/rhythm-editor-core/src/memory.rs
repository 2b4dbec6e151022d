//! In-memory native backend.
//!
//! `MemoryTree` is an arena tree implementing [`NativeTree`], and
//! `MemorySelection` a selection store implementing [`NativeSelection`] that
//! counts writes. Together they let a host drive the reconciler without a
//! browser, and they are what the tests in this crate run against.

use std::cmp::Ordering;

use crate::error::PlatformError;
use crate::platform::{NativeSelection, NativeSelectionState};
use crate::tree::{Layout, NativeTree};

/// Handle to a node in a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layout: Option<Layout>,
    text: String,
}

/// Arena-backed tree. Node 0 is the document node.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: Vec<NodeData>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                layout: Some(Layout::Block),
                text: String::new(),
            }],
        }
    }

    /// The document node every other node descends from while attached.
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a node and append it as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, layout: Option<Layout>) -> NodeId {
        let id = self.create(layout);
        self.attach(parent, id, None);
        id
    }

    /// Create a detached node.
    pub fn create(&mut self, layout: Option<Layout>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            children: Vec::new(),
            layout,
            text: String::new(),
        });
        id
    }

    /// Append a text leaf holding `text` under `parent`. Text leaves have no
    /// layout of their own.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.append_child(parent, None);
        self.nodes[id.0].text = text.to_owned();
        id
    }

    /// Insert `node` under `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`. The node is detached
    /// from its current parent first.
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        self.detach(node);
        self.attach(parent, node, reference);
    }

    /// Remove `node` (and its subtree) from its parent.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn set_layout(&mut self, node: NodeId, layout: Option<Layout>) {
        self.nodes[node.0].layout = layout;
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn attach(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let siblings = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
    }

    fn sibling(&self, node: NodeId, delta: isize) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|c| *c == node)?;
        let target = index.checked_add_signed(delta)?;
        siblings.get(target).copied()
    }

    /// Child-index path from the topmost ancestor down to `node`, plus that
    /// ancestor.
    fn path(&self, node: NodeId) -> (NodeId, Vec<usize>) {
        let mut path = Vec::new();
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            let index = self.nodes[parent.0]
                .children
                .iter()
                .position(|c| *c == current)
                .unwrap_or_default();
            path.push(index);
            current = parent;
        }
        path.reverse();
        (current, path)
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeTree for MemoryTree {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
        self.sibling(*node, -1)
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        self.sibling(*node, 1)
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].children.first().copied()
    }

    fn last_child(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].children.last().copied()
    }

    fn compare_position(&self, a: &NodeId, b: &NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (top_a, path_a) = self.path(*a);
        let (top_b, path_b) = self.path(*b);
        if top_a != top_b {
            // Disconnected subtrees: any consistent order will do.
            return top_a.cmp(&top_b);
        }
        // Slice ordering puts a prefix (ancestor) before its extensions.
        path_a.cmp(&path_b)
    }

    fn text_len(&self, node: &NodeId) -> usize {
        let data = &self.nodes[node.0];
        data.text.chars().count()
            + data
                .children
                .iter()
                .map(|child| self.text_len(child))
                .sum::<usize>()
    }

    fn layout(&self, node: &NodeId) -> Option<Layout> {
        let (top, _) = self.path(*node);
        if top != self.document() {
            return None;
        }
        self.nodes[node.0].layout
    }
}

/// Selection store for a [`MemoryTree`].
///
/// `read` returns whatever was last written or simulated with [`set`].
///
/// [`set`]: MemorySelection::set
#[derive(Debug, Clone, Default)]
pub struct MemorySelection {
    state: Option<NativeSelectionState<NodeId>>,
    writes: usize,
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user moving the selection. Not counted as a write.
    pub fn set(&mut self, state: NativeSelectionState<NodeId>) {
        self.state = Some(state);
    }

    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Number of times the core replaced the selection.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn state(&self) -> Option<&NativeSelectionState<NodeId>> {
        self.state.as_ref()
    }
}

impl NativeSelection for MemorySelection {
    type Node = NodeId;

    fn read(&self) -> Option<NativeSelectionState<NodeId>> {
        self.state.clone()
    }

    fn write(&mut self, state: &NativeSelectionState<NodeId>) -> Result<(), PlatformError> {
        self.state = Some(state.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order() {
        let mut tree = MemoryTree::new();
        let doc = tree.document();
        let a = tree.append_child(doc, Some(Layout::Block));
        let a1 = tree.append_child(a, Some(Layout::Inline));
        let b = tree.append_child(doc, Some(Layout::Block));

        assert_eq!(tree.compare_position(&a, &b), Ordering::Less);
        assert_eq!(tree.compare_position(&b, &a1), Ordering::Greater);
        // Ancestor before descendant.
        assert_eq!(tree.compare_position(&a, &a1), Ordering::Less);
        assert_eq!(tree.compare_position(&a1, &a1), Ordering::Equal);
    }

    #[test]
    fn test_siblings_and_reorder() {
        let mut tree = MemoryTree::new();
        let doc = tree.document();
        let a = tree.append_child(doc, None);
        let b = tree.append_child(doc, None);
        let c = tree.append_child(doc, None);

        assert_eq!(tree.previous_sibling(&b), Some(a));
        assert_eq!(tree.next_sibling(&b), Some(c));
        assert_eq!(tree.previous_sibling(&a), None);

        tree.insert_before(doc, c, Some(a));
        assert_eq!(tree.children(doc), &[c, a, b]);
        assert_eq!(tree.compare_position(&c, &a), Ordering::Less);
    }

    #[test]
    fn test_detached_nodes_have_no_layout() {
        let mut tree = MemoryTree::new();
        let doc = tree.document();
        let a = tree.append_child(doc, Some(Layout::Inline));
        assert!(tree.is_inline(&a));

        tree.detach(a);
        assert_eq!(tree.layout(&a), None);
        assert_eq!(tree.parent(&a), None);
    }

    #[test]
    fn test_selection_counts_writes_only() {
        let mut tree = MemoryTree::new();
        let a = tree.append_child(tree.document(), None);
        let mut sel = MemorySelection::new();
        assert!(sel.read().is_none());

        sel.set(NativeSelectionState::caret(a, 1));
        assert_eq!(sel.write_count(), 0);

        sel.write(&NativeSelectionState::caret(a, 2)).unwrap();
        assert_eq!(sel.write_count(), 1);
        assert_eq!(sel.read().unwrap().anchor_offset, 2);
    }
}
