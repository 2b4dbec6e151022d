//! Logical selections.
//!
//! A `Range` is an anchor/focus pair of [`Point`]s with the document-order
//! start and end worked out once, at construction. Ranges are immutable; any
//! operation that changes one returns a new value.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::id::EditableId;
use crate::platform::NativeSelectionState;
use crate::point::Point;
use crate::registry::Scope;
use crate::tree::NativeTree;

/// Plain-data selection crossing the core/host boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionExport {
    pub start_id: EditableId,
    pub start_offset: usize,
    pub end_id: EditableId,
    pub end_offset: usize,
}

impl SelectionExport {
    /// A caret at `offset` of `id`.
    pub fn caret(id: EditableId, offset: usize) -> Self {
        Self {
            start_id: id.clone(),
            start_offset: offset,
            end_id: id,
            end_offset: offset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Range<N> {
    anchor: Point<N>,
    focus: Point<N>,
    anchor_is_start: bool,
}

impl<N: Clone + PartialEq> Range<N> {
    /// Build a range from an unordered anchor/focus pair.
    pub fn new<T>(scope: Scope<'_, T>, anchor: Point<N>, focus: Point<N>) -> Self
    where
        T: NativeTree<Node = N>,
    {
        // Start is whichever end is not later; ties keep the anchor.
        let anchor_is_start = !Point::is_before_in_document(scope, &focus, &anchor);
        Self {
            anchor,
            focus,
            anchor_is_start,
        }
    }

    /// A caret at `point`.
    pub fn collapsed(point: Point<N>) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
            anchor_is_start: true,
        }
    }

    pub fn anchor(&self) -> &Point<N> {
        &self.anchor
    }

    pub fn focus(&self) -> &Point<N> {
        &self.focus
    }

    pub fn start(&self) -> &Point<N> {
        if self.anchor_is_start {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn end(&self) -> &Point<N> {
        if self.anchor_is_start {
            &self.focus
        } else {
            &self.anchor
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// True if both ends are mounted and still in order.
    ///
    /// Order is re-checked against the current tree, so a range whose regions
    /// were reordered since construction no longer exists.
    pub fn currently_exists<T>(&self, scope: Scope<'_, T>) -> bool
    where
        T: NativeTree<Node = N>,
    {
        if !self.anchor.currently_exists(scope) {
            return false;
        }
        if self.anchor == self.focus {
            return true;
        }
        self.focus.currently_exists(scope)
            && Point::is_before_in_document(scope, self.start(), self.end())
    }

    /// Direction-insensitive equality: same start and same end.
    pub fn unordered_eq(&self, other: &Self) -> bool {
        self.start() == other.start() && self.end() == other.end()
    }

    /// Both ends normalized. See [`Point::normalize`].
    pub fn normalize<T>(&self, scope: Scope<'_, T>) -> Self
    where
        T: NativeTree<Node = N>,
    {
        Self::new(scope, self.anchor.normalize(scope), self.focus.normalize(scope))
    }

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

    /// Native form: each end addressed at its region's backing node with a
    /// logical character offset. Platform layers map that onto their own
    /// text nodes and offset units.
    pub fn to_native(&self) -> NativeSelectionState<N> {
        NativeSelectionState {
            anchor_node: self.anchor.node.clone(),
            anchor_offset: self.anchor.offset,
            focus_node: self.focus.node.clone(),
            focus_offset: self.focus.offset,
        }
    }

    /// Read a native selection. `None` if either end is outside every
    /// registered region.
    pub fn from_native<T>(scope: Scope<'_, T>, state: &NativeSelectionState<N>) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        let anchor =
            Point::from_backing_node_and_offset(scope, &state.anchor_node, state.anchor_offset)?;
        let focus =
            Point::from_backing_node_and_offset(scope, &state.focus_node, state.focus_offset)?;
        Some(Self::new(scope, anchor, focus))
    }

    /// Re-resolve both ends through the registry, keeping ids, offsets and
    /// direction. Picks up regions that were remounted on new nodes since the
    /// range was built. `None` if either id is gone.
    pub fn refreshed<T>(&self, scope: Scope<'_, T>) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        let anchor = Point::from_id_and_offset(scope, &self.anchor.id, self.anchor.offset)?;
        let focus = Point::from_id_and_offset(scope, &self.focus.id, self.focus.offset)?;
        Some(Self::new(scope, anchor, focus))
    }

    pub fn to_export(&self) -> SelectionExport {
        let start = self.start();
        let end = self.end();
        SelectionExport {
            start_id: start.id.clone(),
            start_offset: start.offset,
            end_id: end.id.clone(),
            end_offset: end.offset,
        }
    }

    /// Resolve a host-declared selection, with the start as anchor. Offsets
    /// past a region's intended value are clamped to its end. `None` if
    /// either id is not mounted.
    pub fn from_export<T>(scope: Scope<'_, T>, export: &SelectionExport) -> Option<Self>
    where
        T: NativeTree<Node = N>,
    {
        let anchor = Point::from_declared(scope, &export.start_id, export.start_offset)?;
        let focus = Point::from_declared(scope, &export.end_id, export.end_offset)?;
        Some(Self::new(scope, anchor, focus))
    }
}

/// Ordered equality: same anchor and same focus.
impl<N: PartialEq> PartialEq for Range<N> {
    fn eq(&self, other: &Self) -> bool {
        self.anchor == other.anchor && self.focus == other.focus
    }
}
