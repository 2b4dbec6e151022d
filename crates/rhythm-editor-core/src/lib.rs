//! rhythm-editor-core: selection reconciliation for id-addressed editable regions.
//!
//! This crate provides:
//! - `Registry` - mounted regions by host identifier, scoped to one editor root
//! - `Point` / `Range` - logical positions and selections, with document-order
//!   comparison, boundary stepping and adjacency normalization
//! - `Reconciler` - outbound/inbound selection sync with echo suppression, and
//!   edit intents for input events
//! - `NativeTree` / `NativeSelection` traits for the platform side, with an
//!   in-memory implementation for headless hosts

pub mod actions;
pub mod config;
pub mod error;
pub mod id;
pub mod intent;
pub mod memory;
pub mod platform;
pub mod point;
pub mod range;
pub mod reconciler;
pub mod registry;
pub mod search;
pub mod tree;

pub use actions::{InputType, Key, KeydownResult};
pub use config::{DEFAULT_PLACEHOLDER, EditorConfig};
pub use error::{EditorError, PlatformError};
pub use id::EditableId;
pub use intent::{EditIntent, deletion_intent, insertion_intent};
pub use memory::{MemorySelection, MemoryTree, NodeId};
pub use platform::{NativeSelection, NativeSelectionState};
pub use point::Point;
pub use range::{Range, SelectionExport};
pub use reconciler::{
    ChangeEvent, EchoState, EditorHost, InputOutcome, OutboundSync, Reconciler, SelectEvent,
};
pub use registry::{NodeRole, RegionEntry, Registry, Scope};
pub use search::{Direction, find_nearest_matching, find_next_matching, find_previous_matching};
pub use smol_str::SmolStr;
pub use tree::{Layout, NativeTree};
