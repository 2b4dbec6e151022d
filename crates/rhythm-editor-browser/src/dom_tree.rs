//! `NativeTree` over the live DOM.

use std::cmp::Ordering;

use rhythm_editor_core::{Layout, NativeTree};
use wasm_bindgen::JsCast;
use web_sys::Node;

/// The browser document, seen through [`NativeTree`].
///
/// Stateless: every query goes straight to the DOM, so it always reflects the
/// latest render.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomTree;

impl NativeTree for DomTree {
    type Node = Node;

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn previous_sibling(&self, node: &Node) -> Option<Node> {
        node.previous_sibling()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn first_child(&self, node: &Node) -> Option<Node> {
        node.first_child()
    }

    fn last_child(&self, node: &Node) -> Option<Node> {
        node.last_child()
    }

    fn compare_position(&self, a: &Node, b: &Node) -> Ordering {
        if a.is_same_node(Some(b)) {
            return Ordering::Equal;
        }
        // FOLLOWING is also set when `b` is a descendant of `a`.
        let position = a.compare_document_position(b);
        if position & Node::DOCUMENT_POSITION_FOLLOWING != 0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    fn text_len(&self, node: &Node) -> usize {
        node.text_content()
            .map(|text| text.chars().count())
            .unwrap_or_default()
    }

    fn layout(&self, node: &Node) -> Option<Layout> {
        if !node.is_connected() {
            return None;
        }
        let element = node.dyn_ref::<web_sys::Element>()?;
        let style = web_sys::window()?.get_computed_style(element).ok()??;
        let display = style.get_property_value("display").ok()?;
        layout_for_display(&display)
    }
}

/// Map a computed `display` value to a layout kind.
pub fn layout_for_display(display: &str) -> Option<Layout> {
    match display.trim() {
        "" | "none" => None,
        d if d.starts_with("inline") => Some(Layout::Inline),
        _ => Some(Layout::Block),
    }
}
