//! Browser DOM layer for rhythm editor roots.
//!
//! This crate implements the native side of `rhythm-editor-core` over
//! `web-sys`. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom_tree`: `NativeTree` over live DOM nodes, with computed-style layout
//! - `cursor`: Selection API reading/writing and UTF-16 offset conversion
//! - `events`: beforeinput and keydown extraction
//! - `root`: `BrowserEditorRoot`, which wires the listeners to a reconciler
//!
//! # Re-exports
//!
//! This crate re-exports `rhythm-editor-core` for convenience, so consumers
//! only need to depend on `rhythm-editor-browser`.

// Re-export core crate
pub use rhythm_editor_core;
pub use rhythm_editor_core::*;

pub mod cursor;
pub mod dom_tree;
pub mod events;
pub mod root;

pub use cursor::BrowserSelection;
pub use dom_tree::DomTree;
pub use events::{
    get_data_from_event, get_input_type_from_event, get_key_from_event, is_composing,
    parse_browser_input_type,
};
pub use root::BrowserEditorRoot;
