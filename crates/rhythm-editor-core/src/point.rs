//! Logical caret positions.
//!
//! A `Point` is a character offset into a region's intended value, addressed
//! by the region's identifier. It also captures the backing node the registry
//! resolved at construction time, because two mounts of the same identifier
//! are distinct positions while a re-render is in flight.

use std::cmp::Ordering;

use crate::config::EditorConfig;
use crate::id::EditableId;
use crate::registry::Scope;
use crate::search::find_previous_matching;
use crate::tree::NativeTree;

/// A position the caret could occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<N> {
    pub id: EditableId,
    pub node: N,
    /// Character offset into the region's intended value.
    pub offset: usize,
}

impl<N: Clone + PartialEq> Point<N> {
    pub fn new(id: EditableId, node: N, offset: usize) -> Self {
        Self { id, node, offset }
    }

    /// Resolve `id` through the registry. `None` if the region is not mounted.
    pub fn from_id_and_offset<T>(
        scope: Scope<'_, T>,
        id: &EditableId,
        offset: usize,
    ) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        let node = scope.registry.lookup(id)?;
        Some(Self::new(id.clone(), node.clone(), offset))
    }

    /// Resolve a host-declared position, clamping the offset to the
    /// region's intended value the way native readings are clamped.
    pub fn from_declared<T>(scope: Scope<'_, T>, id: &EditableId, offset: usize) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        let entry = scope.registry.entry(id)?;
        Some(Self::new(id.clone(), entry.node.clone(), offset.min(entry.len())))
    }

    /// Build a point from a native (node, offset) position.
    ///
    /// `node` may be the region's backing node or anything inside it (a text
    /// node, say); the nearest registered ancestor below the editor root is
    /// used, and text preceding `node` within that region is added to the
    /// offset. The result is clamped to the intended value's length, which
    /// absorbs the placeholder glyph an empty region renders. `None` if no
    /// region contains `node`.
    pub fn from_backing_node_and_offset<T>(
        scope: Scope<'_, T>,
        node: &N,
        raw_offset: usize,
    ) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        let mut current = node.clone();
        let mut native_offset = raw_offset;
        let entry = loop {
            if let Some(entry) = scope.registry.entry_for_node(&current) {
                break entry;
            }
            if scope.is_boundary(&current) {
                return None;
            }
            let mut sibling = scope.tree.previous_sibling(&current);
            while let Some(previous) = sibling {
                native_offset += scope.tree.text_len(&previous);
                sibling = scope.tree.previous_sibling(&previous);
            }
            current = scope.tree.parent(&current)?;
        };

        let offset = native_offset.min(entry.len());
        if offset != native_offset {
            tracing::trace!(
                target: "rhythm::selection",
                id = %entry.id,
                native_offset,
                offset,
                "clamped native offset to intended value"
            );
        }
        Some(Self::new(entry.id.clone(), entry.node.clone(), offset))
    }

    /// True while the registry still has an entry for this point's region.
    pub fn currently_exists<T>(&self, scope: Scope<'_, T>) -> bool
    where
        T: NativeTree<Node = N>,
    {
        scope.registry.lookup(&self.id).is_some()
    }

    /// The point `steps` characters away. One step is one press of an arrow
    /// key; negative steps move backward.
    ///
    /// Forward motion stays in the region even past its end; the host clamps
    /// on render. Moving backward past offset 0 lands at the end of the
    /// nearest preceding region inside the editor root, or at offset 0 of
    /// this region if there is none.
    pub fn steps_away<T>(&self, scope: Scope<'_, T>, steps: isize) -> Self
    where
        T: NativeTree<Node = N>,
    {
        if let Some(offset) = self.offset.checked_add_signed(steps) {
            return Self::new(self.id.clone(), self.node.clone(), offset);
        }

        let previous = find_previous_matching(
            scope.tree,
            &self.node,
            |node| scope.is_editable(node),
            |node| scope.is_boundary(node),
        );
        match previous.and_then(|node| scope.registry.entry_for_node(&node)) {
            Some(entry) => {
                tracing::trace!(
                    target: "rhythm::selection",
                    from = %self.id,
                    to = %entry.id,
                    offset = entry.len(),
                    "stepped back into previous region"
                );
                Self::new(entry.id.clone(), entry.node.clone(), entry.len())
            }
            None => Self::new(self.id.clone(), self.node.clone(), 0),
        }
    }

    /// Document-order comparison: backing node position first, then offset.
    pub fn cmp_in_document<T>(scope: Scope<'_, T>, p0: &Self, p1: &Self) -> Ordering
    where
        T: NativeTree<Node = N>,
    {
        match scope.tree.compare_position(&p0.node, &p1.node) {
            Ordering::Equal => p0.offset.cmp(&p1.offset),
            other => other,
        }
    }

    /// True if `p0` is strictly before `p1`.
    pub fn is_before_in_document<T>(scope: Scope<'_, T>, p0: &Self, p1: &Self) -> bool
    where
        T: NativeTree<Node = N>,
    {
        Self::cmp_in_document(scope, p0, p1) == Ordering::Less
    }

    /// Canonical form of this point.
    ///
    /// Offset 0 of an inline region whose previous sibling is also an inline
    /// region is the same caret position as the end of that sibling; the
    /// rewrite repeats until it no longer applies, so a run of empty inline
    /// regions collapses onto the end of the first non-empty one before it.
    /// Regions without native layout are left alone.
    pub fn normalize<T>(&self, scope: Scope<'_, T>) -> Self
    where
        T: NativeTree<Node = N>,
    {
        let mut point = self.clone();
        // Each hop lands on a distinct, earlier registered sibling.
        for _ in 0..scope.registry.len() {
            match point.adjacent_inline_predecessor(scope) {
                Some(previous) => point = previous,
                None => break,
            }
        }
        point
    }

    /// [`normalize`](Self::normalize), unless the config turns adjacency
    /// normalization off.
    pub fn normalize_with<T>(&self, scope: Scope<'_, T>, config: &EditorConfig) -> Self
    where
        T: NativeTree<Node = N>,
    {
        if config.normalize_adjacent_inline {
            self.normalize(scope)
        } else {
            self.clone()
        }
    }

    fn adjacent_inline_predecessor<T>(&self, scope: Scope<'_, T>) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        if self.offset != 0 || !scope.tree.is_inline(&self.node) {
            return None;
        }
        let sibling = scope.tree.previous_sibling(&self.node)?;
        if !scope.tree.is_inline(&sibling) {
            return None;
        }
        let entry = scope.registry.entry_for_node(&sibling)?;
        Some(Self::new(entry.id.clone(), sibling, entry.len()))
    }
}
