//! Registry of mounted editable regions.
//!
//! Maps each region's serialized identifier to its current backing node and
//! the value the host intends it to hold. The rendering layer writes it on
//! mount, unmount and value change; everything else only reads it. One
//! registry belongs to one editor root, so several editors can live side by
//! side without sharing state.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::id::EditableId;
use crate::tree::NativeTree;

/// What a registered node is to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// The enclosing editor root. Searches never ascend past it.
    EditorRoot,
    /// A mounted editable region.
    Editable,
}

/// A mounted region.
#[derive(Debug, Clone)]
pub struct RegionEntry<N> {
    pub id: EditableId,
    pub node: N,
    value: String,
    value_len: usize,
}

impl<N> RegionEntry<N> {
    fn new(id: EditableId, node: N, value: String) -> Self {
        let value_len = value.chars().count();
        Self {
            id,
            node,
            value,
            value_len,
        }
    }

    /// The intended logical value, independent of any native placeholder.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length of the intended value in characters.
    pub fn len(&self) -> usize {
        self.value_len
    }

    pub fn is_empty(&self) -> bool {
        self.value_len == 0
    }
}

/// Region registry for one editor root.
#[derive(Debug, Clone)]
pub struct Registry<N> {
    root: Option<N>,
    regions: HashMap<SmolStr, RegionEntry<N>>,
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self {
            root: None,
            regions: HashMap::new(),
        }
    }
}

impl<N: Clone + PartialEq> Registry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `node` as the editor root.
    pub fn register_root(&mut self, node: N) {
        self.root = Some(node);
    }

    pub fn unregister_root(&mut self) -> Option<N> {
        self.root.take()
    }

    pub fn root(&self) -> Option<&N> {
        self.root.as_ref()
    }

    /// Add or replace the entry for `id`. Last write wins; the previous entry
    /// is returned.
    pub fn register(
        &mut self,
        id: EditableId,
        node: N,
        value: impl Into<String>,
    ) -> Option<RegionEntry<N>> {
        let key = SmolStr::new(id.key());
        tracing::trace!(target: "rhythm::selection", id = %id, "register region");
        self.regions.insert(key, RegionEntry::new(id, node, value.into()))
    }

    pub fn unregister(&mut self, id: &EditableId) -> Option<RegionEntry<N>> {
        tracing::trace!(target: "rhythm::selection", id = %id, "unregister region");
        self.regions.remove(id.key())
    }

    /// Replace the intended value of a mounted region. Returns false if `id`
    /// is not mounted.
    pub fn set_value(&mut self, id: &EditableId, value: impl Into<String>) -> bool {
        match self.regions.get_mut(id.key()) {
            Some(entry) => {
                *entry = RegionEntry::new(entry.id.clone(), entry.node.clone(), value.into());
                true
            }
            None => false,
        }
    }

    /// Current backing node for `id`.
    pub fn lookup(&self, id: &EditableId) -> Option<&N> {
        self.regions.get(id.key()).map(|entry| &entry.node)
    }

    pub fn entry(&self, id: &EditableId) -> Option<&RegionEntry<N>> {
        self.regions.get(id.key())
    }

    /// Reverse lookup: the region currently backed by `node`.
    pub fn entry_for_node(&self, node: &N) -> Option<&RegionEntry<N>> {
        self.regions.values().find(|entry| entry.node == *node)
    }

    pub fn role_of(&self, node: &N) -> Option<NodeRole> {
        if self.root.as_ref() == Some(node) {
            Some(NodeRole::EditorRoot)
        } else if self.entry_for_node(node).is_some() {
            Some(NodeRole::Editable)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionEntry<N>> {
        self.regions.values()
    }
}

/// The tree and registry a coordinate computation runs against.
///
/// Points and ranges are plain values; every operation that needs to resolve
/// them against the current native state takes a `Scope`.
pub struct Scope<'a, T: NativeTree> {
    pub tree: &'a T,
    pub registry: &'a Registry<T::Node>,
}

impl<'a, T: NativeTree> Scope<'a, T> {
    pub fn new(tree: &'a T, registry: &'a Registry<T::Node>) -> Self {
        Self { tree, registry }
    }

    /// True if `node` is the registered editor root, which bounds upward
    /// searches.
    pub fn is_boundary(&self, node: &T::Node) -> bool {
        self.registry.role_of(node) == Some(NodeRole::EditorRoot)
    }

    pub fn is_editable(&self, node: &T::Node) -> bool {
        self.registry.role_of(node) == Some(NodeRole::Editable)
    }
}

impl<T: NativeTree> Clone for Scope<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: NativeTree> Copy for Scope<'_, T> {}
