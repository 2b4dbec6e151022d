//! Browser implementation of the native selection boundary.
//!
//! Uses the DOM Selection API. The core works in character offsets; the DOM
//! works in UTF-16 offsets against text nodes (or child indices against
//! elements). This module converts between the two.

use rhythm_editor_core::{NativeSelection, NativeSelectionState, PlatformError};
use wasm_bindgen::JsCast;
use web_sys::Node;

/// `NodeFilter.SHOW_ALL`.
const SHOW_ALL: u32 = 0xFFFF_FFFF;

/// Reads and writes `window.getSelection()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSelection;

impl BrowserSelection {
    pub fn new() -> Self {
        Self
    }
}

impl NativeSelection for BrowserSelection {
    type Node = Node;

    fn read(&self) -> Option<NativeSelectionState<Node>> {
        let selection = web_sys::window()?.get_selection().ok()??;
        let anchor_node = selection.anchor_node()?;
        let focus_node = selection.focus_node()?;
        let anchor_offset = selection.anchor_offset();
        let focus_offset = selection.focus_offset();

        tracing::trace!(
            target: "rhythm::selection",
            anchor_node_name = %anchor_node.node_name(),
            anchor_offset,
            focus_node_name = %focus_node.node_name(),
            focus_offset,
            "browser selection state"
        );

        let (anchor_node, anchor_offset) =
            dom_position_to_char_position(&anchor_node, anchor_offset);
        let (focus_node, focus_offset) = dom_position_to_char_position(&focus_node, focus_offset);
        Some(NativeSelectionState {
            anchor_node,
            anchor_offset,
            focus_node,
            focus_offset,
        })
    }

    fn write(&mut self, state: &NativeSelectionState<Node>) -> Result<(), PlatformError> {
        let window = web_sys::window().ok_or("no window")?;
        let selection = window
            .get_selection()
            .map_err(|e| format!("get_selection failed: {:?}", e))?
            .ok_or("no selection object")?;

        let (anchor_node, anchor_offset) =
            char_position_to_dom_position(&state.anchor_node, state.anchor_offset)?;
        let (focus_node, focus_offset) =
            char_position_to_dom_position(&state.focus_node, state.focus_offset)?;

        // set_base_and_extent keeps the direction, unlike add_range.
        selection
            .set_base_and_extent(&anchor_node, anchor_offset, &focus_node, focus_offset)
            .map_err(|e| format!("set_base_and_extent failed: {:?}", e))?;
        Ok(())
    }
}

/// Convert a DOM selection position into a node and a character offset
/// within it.
///
/// A text node position keeps the text node, with its UTF-16 offset turned
/// into characters; the core adds preceding text while walking up to the
/// region. An element position (child index) becomes the element plus the
/// characters in the children before the index.
pub fn dom_position_to_char_position(node: &Node, dom_offset: u32) -> (Node, usize) {
    if node.node_type() == Node::TEXT_NODE {
        let chars = utf16_to_char_offset(&text_of(node), dom_offset as usize);
        return (node.clone(), chars);
    }

    let children = node.child_nodes();
    let chars = (0..dom_offset.min(children.length()))
        .filter_map(|i| children.get(i))
        .map(|child| text_of(&child).chars().count())
        .sum();
    (node.clone(), chars)
}

/// Convert an element and character offset into a DOM position the Selection
/// API accepts: a text node and UTF-16 offset where one exists, or offset 0
/// of the element if it holds no text.
pub fn char_position_to_dom_position(
    node: &Node,
    char_offset: usize,
) -> Result<(Node, u32), PlatformError> {
    if node.node_type() == Node::TEXT_NODE {
        let utf16 = char_to_utf16_offset(&text_of(node), char_offset);
        return Ok((node.clone(), utf16 as u32));
    }
    let Some(element) = node.dyn_ref::<web_sys::Element>() else {
        return Ok((node.clone(), 0));
    };
    match find_text_node_at_offset(element, char_offset)? {
        Some((text_node, utf16)) => Ok((text_node, utf16 as u32)),
        None => Ok((node.clone(), 0)),
    }
}

/// Find the text node holding character `target_char_offset` of `container`,
/// and the UTF-16 offset within it.
///
/// Subtrees marked `contenteditable="false"` are skipped. Offsets past the
/// end land at the end of the last text node. `None` if the container has no
/// text at all.
pub fn find_text_node_at_offset(
    container: &web_sys::Element,
    target_char_offset: usize,
) -> Result<Option<(Node, usize)>, PlatformError> {
    let document = container.owner_document().ok_or("no document")?;
    let walker = document
        .create_tree_walker_with_what_to_show(container, SHOW_ALL)
        .map_err(|e| format!("create_tree_walker failed: {:?}", e))?;

    let mut accumulated = 0;
    let mut last_node: Option<(Node, String)> = None;
    let mut skip_until_exit: Option<web_sys::Element> = None;

    while let Ok(Some(node)) = walker.next_node() {
        if let Some(ref skip_elem) = skip_until_exit {
            if !skip_elem.contains(Some(&node)) {
                skip_until_exit = None;
            }
        }

        if skip_until_exit.is_none() {
            if let Some(element) = node.dyn_ref::<web_sys::Element>() {
                if element.get_attribute("contenteditable").as_deref() == Some("false") {
                    skip_until_exit = Some(element.clone());
                    continue;
                }
            }
        }

        if skip_until_exit.is_some() || node.node_type() != Node::TEXT_NODE {
            continue;
        }

        let text = text_of(&node);
        let text_len = text.chars().count();
        if accumulated + text_len >= target_char_offset {
            let utf16 = char_to_utf16_offset(&text, target_char_offset - accumulated);
            return Ok(Some((node, utf16)));
        }
        accumulated += text_len;
        last_node = Some((node, text));
    }

    Ok(last_node.map(|(node, text)| {
        let len = text.encode_utf16().count();
        (node, len)
    }))
}

fn text_of(node: &Node) -> String {
    node.text_content().unwrap_or_default()
}

/// Characters in the first `utf16_offset` code units of `text`. An offset
/// inside a surrogate pair counts the whole character.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (chars, c) in text.chars().enumerate() {
        if units >= utf16_offset {
            return chars;
        }
        units += c.len_utf16();
    }
    text.chars().count()
}

/// UTF-16 code units in the first `char_offset` characters of `text`.
pub fn char_to_utf16_offset(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}
