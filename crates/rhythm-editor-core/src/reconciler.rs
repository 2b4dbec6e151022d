//! Selection reconciliation.
//!
//! Keeps the host's logical selection and the native selection in step, in
//! both directions, and turns input events into edit intents.
//!
//! Outbound (host → native): resolve the declared selection, normalize it,
//! and write it only if the native selection doesn't already say the same
//! thing. Inbound (native → host): read the native selection, normalize it,
//! and report it only if it differs from what the host last declared or was
//! last told.
//!
//! A write is followed by the platform announcing the selection change it
//! caused. [`EchoState`] tracks that: after a write the reconciler waits for
//! the matching notification and swallows it instead of bouncing it back to
//! the host.

use serde::{Deserialize, Serialize};

use crate::actions::{InputType, Key, KeydownResult};
use crate::config::EditorConfig;
use crate::error::PlatformError;
use crate::intent::{EditIntent, deletion_intent, insertion_intent};
use crate::platform::NativeSelection;
use crate::range::{Range, SelectionExport};
use crate::registry::Scope;
use crate::tree::NativeTree;

/// Fired for text insertions and backward deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// W3C `inputType` of the edit.
    pub input_type: String,
    /// Inserted text. Empty for deletions.
    pub data: String,
    pub replace_range: SelectionExport,
    pub after_range: SelectionExport,
}

impl ChangeEvent {
    fn new<N: Clone + PartialEq>(
        input_type: &InputType,
        data: &str,
        intent: &EditIntent<N>,
    ) -> Self {
        Self {
            input_type: input_type.as_str().to_owned(),
            data: data.to_owned(),
            replace_range: intent.replace.to_export(),
            after_range: intent.after.to_export(),
        }
    }
}

/// Fired when the native selection moves somewhere logically new.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectEvent {
    pub selection_range: SelectionExport,
}

/// Receiver for reconciler events.
pub trait EditorHost {
    fn on_change(&mut self, event: ChangeEvent);

    fn on_select(&mut self, event: SelectEvent);
}

/// What an outbound sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundSync {
    /// An id in the declared selection isn't mounted yet.
    Unresolved,
    /// Both ids resolved but the range is out of order or half unmounted.
    NotRepresentable,
    /// The native selection already matched; nothing written.
    AlreadyInSync,
    /// The native selection was replaced.
    Written,
}

/// What to do with an input event after the reconciler has seen it.
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Report the change and cancel the native default.
    Handled(ChangeEvent),
    /// Report the change and let the native default run.
    Reported(ChangeEvent),
    /// Not ours; the native default runs and the host hears nothing.
    PassThrough,
}

impl InputOutcome {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    pub fn change(&self) -> Option<&ChangeEvent> {
        match self {
            Self::Handled(event) | Self::Reported(event) => Some(event),
            Self::PassThrough => None,
        }
    }

    pub fn into_change(self) -> Option<ChangeEvent> {
        match self {
            Self::Handled(event) | Self::Reported(event) => Some(event),
            Self::PassThrough => None,
        }
    }
}

/// Echo suppression state.
#[derive(Debug, Clone, PartialEq)]
pub enum EchoState<N> {
    Idle,
    /// A write of this (normalized) range is waiting for its notification.
    AwaitingEcho(Range<N>),
}

/// Per-root reconciliation state.
#[derive(Debug, Clone)]
pub struct Reconciler<N> {
    config: EditorConfig,
    echo: EchoState<N>,
    /// Normalized selection the host last declared or was told about.
    last_known: Option<Range<N>>,
    /// Un-normalized selection edit intents are computed from.
    current: Option<Range<N>>,
}

impl<N: Clone + PartialEq> Default for Reconciler<N> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<N: Clone + PartialEq> Reconciler<N> {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            echo: EchoState::Idle,
            last_known: None,
            current: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn echo_state(&self) -> &EchoState<N> {
        &self.echo
    }

    pub fn last_known(&self) -> Option<&Range<N>> {
        self.last_known.as_ref()
    }

    pub fn current_selection(&self) -> Option<&Range<N>> {
        self.current.as_ref()
    }

    /// Push a host-declared selection to the native side.
    ///
    /// Errors only when the native write itself fails; the declared selection
    /// is still recorded so the next inbound notification is compared against
    /// it.
    pub fn sync_outbound<T, S>(
        &mut self,
        scope: Scope<'_, T>,
        declared: &SelectionExport,
        native: &mut S,
    ) -> Result<OutboundSync, PlatformError>
    where
        T: NativeTree<Node = N>,
        S: NativeSelection<Node = N>,
    {
        let Some(range) = Range::from_export(scope, declared) else {
            tracing::debug!(
                target: "rhythm::selection",
                start = %declared.start_id,
                end = %declared.end_id,
                "declared selection not mounted yet, skipping"
            );
            return Ok(OutboundSync::Unresolved);
        };

        let normalized = range.normalize_with(scope, &self.config);
        if !normalized.currently_exists(scope) {
            tracing::debug!(
                target: "rhythm::selection",
                "declared selection not representable, skipping"
            );
            return Ok(OutboundSync::NotRepresentable);
        }
        self.current = Some(range);
        self.last_known = Some(normalized.clone());

        let native_range = native
            .read()
            .and_then(|state| Range::from_native(scope, &state))
            .map(|range| range.normalize_with(scope, &self.config));
        if native_range.is_some_and(|existing| existing.unordered_eq(&normalized)) {
            tracing::trace!(target: "rhythm::selection", "native selection already in sync");
            return Ok(OutboundSync::AlreadyInSync);
        }

        native.write(&normalized.to_native())?;
        tracing::trace!(
            target: "rhythm::selection",
            start = %normalized.start().id,
            start_offset = normalized.start().offset,
            end = %normalized.end().id,
            end_offset = normalized.end().offset,
            "wrote native selection"
        );
        self.echo = EchoState::AwaitingEcho(normalized);
        Ok(OutboundSync::Written)
    }

    /// Handle a native selection-change notification.
    ///
    /// Returns the event to hand the host, if the selection is logically new.
    pub fn sync_inbound<T, S>(&mut self, scope: Scope<'_, T>, native: &S) -> Option<SelectEvent>
    where
        T: NativeTree<Node = N>,
        S: NativeSelection<Node = N>,
    {
        let state = native.read()?;
        let Some(range) = Range::from_native(scope, &state) else {
            tracing::trace!(
                target: "rhythm::selection",
                "native selection outside editable regions"
            );
            return None;
        };
        let normalized = range.normalize_with(scope, &self.config);

        // Echoes and no-op moves keep `current`, so edit intents stay on the
        // declared (un-normalized) selection.
        let echo = std::mem::replace(&mut self.echo, EchoState::Idle);
        if let EchoState::AwaitingEcho(expected) = echo {
            if expected.unordered_eq(&normalized) {
                tracing::debug!(target: "rhythm::selection", "suppressed echo of own write");
                self.last_known = Some(normalized);
                return None;
            }
        }

        if self
            .last_known
            .as_ref()
            .is_some_and(|known| known.unordered_eq(&normalized))
        {
            return None;
        }

        let event = SelectEvent {
            selection_range: normalized.to_export(),
        };
        tracing::trace!(
            target: "rhythm::selection",
            selection = ?event.selection_range,
            "selection changed"
        );
        self.current = Some(range);
        self.last_known = Some(normalized);
        Some(event)
    }

    /// React to a `beforeinput`-style event.
    pub fn handle_before_input<T>(
        &mut self,
        scope: Scope<'_, T>,
        input_type: &InputType,
        data: Option<&str>,
        is_composing: bool,
    ) -> InputOutcome
    where
        T: NativeTree<Node = N>,
    {
        if is_composing || *input_type == InputType::InsertCompositionText {
            return InputOutcome::PassThrough;
        }

        match (input_type, data) {
            (t, Some(text)) if t.is_plain_text_insertion() => {
                let Some(selection) = self.selection_for_intent(scope) else {
                    return InputOutcome::PassThrough;
                };
                let intent = insertion_intent(scope, &selection, text);
                let event = ChangeEvent::new(input_type, text, &intent);
                tracing::trace!(
                    target: "rhythm::input",
                    input_type = %event.input_type,
                    data = %event.data,
                    "insertion"
                );
                if self.config.suppress_native_insertion {
                    InputOutcome::Handled(event)
                } else {
                    InputOutcome::Reported(event)
                }
            }
            (InputType::DeleteContentBackward, _) => match self.delete_backward(scope) {
                Some(event) => InputOutcome::Handled(event),
                None => InputOutcome::PassThrough,
            },
            _ => InputOutcome::PassThrough,
        }
    }

    /// React to a key press. Only Backspace is handled.
    pub fn handle_key_down<T>(
        &mut self,
        scope: Scope<'_, T>,
        key: &Key,
    ) -> (KeydownResult, Option<ChangeEvent>)
    where
        T: NativeTree<Node = N>,
    {
        if *key != Key::Backspace {
            return (KeydownResult::NotHandled, None);
        }
        match self.delete_backward(scope) {
            Some(event) => (KeydownResult::Handled, Some(event)),
            None => (KeydownResult::NotHandled, None),
        }
    }

    fn delete_backward<T>(&self, scope: Scope<'_, T>) -> Option<ChangeEvent>
    where
        T: NativeTree<Node = N>,
    {
        let selection = self.selection_for_intent(scope)?;
        let intent = deletion_intent(scope, &selection);
        let event = ChangeEvent::new(&InputType::DeleteContentBackward, "", &intent);
        tracing::trace!(
            target: "rhythm::input",
            replace = ?event.replace_range,
            "backward delete"
        );
        Some(event)
    }

    /// The current selection re-resolved against the live registry, if it
    /// still exists.
    fn selection_for_intent<T>(&self, scope: Scope<'_, T>) -> Option<Range<N>>
    where
        T: NativeTree<Node = N>,
    {
        let selection = self.current.as_ref()?.refreshed(scope)?;
        if selection.currently_exists(scope) {
            Some(selection)
        } else {
            tracing::debug!(
                target: "rhythm::input",
                "selection no longer exists, ignoring input"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::EditableId;
    use crate::memory::{MemorySelection, MemoryTree, NodeId};
    use crate::platform::NativeSelectionState;
    use crate::registry::Registry;
    use crate::tree::Layout;

    fn two_regions() -> (MemoryTree, Registry<NodeId>, NodeId, NodeId) {
        let mut tree = MemoryTree::new();
        let root = tree.append_child(tree.document(), Some(Layout::Block));
        let a = tree.append_child(root, Some(Layout::Block));
        let b = tree.append_child(root, Some(Layout::Block));
        let mut registry = Registry::new();
        registry.register_root(root);
        registry.register(EditableId::from("a"), a, "hello");
        registry.register(EditableId::from("b"), b, "world");
        (tree, registry, a, b)
    }

    #[test]
    fn test_outbound_skips_unmounted_ids() {
        let (tree, registry, _, _) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();

        let declared = SelectionExport::caret(EditableId::from("nope"), 0);
        let result = reconciler.sync_outbound(scope, &declared, &mut native);
        assert_eq!(result, Ok(OutboundSync::Unresolved));
        assert_eq!(native.write_count(), 0);
        assert!(reconciler.current_selection().is_none());
    }

    #[test]
    fn test_outbound_accepts_reversed_declaration() {
        let (tree, registry, _, _) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();

        // Declared ends swapped: construction reorders them, so this is fine.
        let declared = SelectionExport {
            start_id: EditableId::from("b"),
            start_offset: 1,
            end_id: EditableId::from("a"),
            end_offset: 1,
        };
        let result = reconciler.sync_outbound(scope, &declared, &mut native);
        assert_eq!(result, Ok(OutboundSync::Written));
    }

    #[test]
    fn test_inbound_after_user_move_reports_once() {
        let (tree, registry, _, b) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();

        native.set(NativeSelectionState::caret(b, 2));
        let event = reconciler.sync_inbound(scope, &native).unwrap();
        assert_eq!(
            event.selection_range,
            SelectionExport::caret(EditableId::from("b"), 2)
        );
        // Same position again: nothing new to report.
        assert!(reconciler.sync_inbound(scope, &native).is_none());
    }

    #[test]
    fn test_mismatched_echo_is_reported() {
        let (tree, registry, _, b) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();

        let declared = SelectionExport::caret(EditableId::from("a"), 1);
        reconciler
            .sync_outbound(scope, &declared, &mut native)
            .unwrap();
        assert!(matches!(reconciler.echo_state(), EchoState::AwaitingEcho(_)));

        // The user clicked elsewhere before the echo arrived.
        native.set(NativeSelectionState::caret(b, 3));
        let event = reconciler.sync_inbound(scope, &native).unwrap();
        assert_eq!(event.selection_range.start_id, EditableId::from("b"));
        assert_eq!(reconciler.echo_state(), &EchoState::Idle);
    }

    #[test]
    fn test_native_outside_regions_is_ignored() {
        let (tree, registry, _, _) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();

        assert!(reconciler.sync_inbound(scope, &native).is_none());
        native.set(NativeSelectionState::caret(tree.document(), 0));
        assert!(reconciler.sync_inbound(scope, &native).is_none());
    }

    #[test]
    fn test_input_without_selection_passes_through() {
        let (tree, registry, _, _) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();

        let outcome =
            reconciler.handle_before_input(scope, &InputType::InsertText, Some("x"), false);
        assert_eq!(outcome, InputOutcome::PassThrough);
        let (result, event) = reconciler.handle_key_down(scope, &Key::Backspace);
        assert_eq!(result, KeydownResult::NotHandled);
        assert!(event.is_none());
    }

    #[test]
    fn test_composition_and_other_inputs_pass_through() {
        let (tree, registry, _, b) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();
        native.set(NativeSelectionState::caret(b, 2));
        reconciler.sync_inbound(scope, &native);

        let composing =
            reconciler.handle_before_input(scope, &InputType::InsertText, Some("x"), true);
        assert_eq!(composing, InputOutcome::PassThrough);
        let paragraph =
            reconciler.handle_before_input(scope, &InputType::InsertParagraph, None, false);
        assert_eq!(paragraph, InputOutcome::PassThrough);
        let (result, _) = reconciler.handle_key_down(scope, &Key::character("x"));
        assert_eq!(result, KeydownResult::NotHandled);
    }

    #[test]
    fn test_insertion_outcome_follows_config() {
        let (tree, registry, _, b) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut native = MemorySelection::new();
        native.set(NativeSelectionState::caret(b, 2));

        let mut reported = Reconciler::default();
        reported.sync_inbound(scope, &native);
        let outcome = reported.handle_before_input(scope, &InputType::InsertText, Some("x"), false);
        assert!(matches!(outcome, InputOutcome::Reported(_)));
        assert!(!outcome.prevents_default());

        let mut handled = Reconciler::new(EditorConfig {
            suppress_native_insertion: true,
            ..EditorConfig::default()
        });
        handled.sync_inbound(scope, &native);
        let outcome =
            handled.handle_before_input(scope, &InputType::InsertFromPaste, Some("x"), false);
        assert!(outcome.prevents_default());
        assert_eq!(outcome.change().unwrap().input_type, "insertFromPaste");
    }

    #[test]
    fn test_virtual_keyboard_delete_is_handled() {
        let (tree, registry, _, b) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();
        native.set(NativeSelectionState::caret(b, 2));
        reconciler.sync_inbound(scope, &native);

        let outcome =
            reconciler.handle_before_input(scope, &InputType::DeleteContentBackward, None, false);
        assert!(outcome.prevents_default());
        let event = outcome.into_change().unwrap();
        assert_eq!(event.data, "");
        assert_eq!(event.after_range, SelectionExport::caret(EditableId::from("b"), 1));
    }

    #[test]
    fn test_intent_uses_remounted_node() {
        let (mut tree, mut registry, _, b) = two_regions();
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();
        native.set(NativeSelectionState::caret(b, 0));
        reconciler.sync_inbound(Scope::new(&tree, &registry), &native);

        // Re-render replaces b's node; the selection still names "b".
        let root = *registry.root().unwrap();
        let remounted = tree.create(Some(Layout::Block));
        tree.insert_before(root, remounted, Some(b));
        tree.detach(b);
        registry.register(EditableId::from("b"), remounted, "world");

        let scope = Scope::new(&tree, &registry);
        let (_, event) = reconciler.handle_key_down(scope, &Key::Backspace);
        let event = event.unwrap();
        assert_eq!(event.replace_range.start_id, EditableId::from("a"));
        assert_eq!(event.replace_range.start_offset, 5);
    }

    #[test]
    fn test_change_event_payload() {
        let (tree, registry, _, b) = two_regions();
        let scope = Scope::new(&tree, &registry);
        let mut reconciler = Reconciler::default();
        let mut native = MemorySelection::new();
        native.set(NativeSelectionState::caret(b, 0));
        reconciler.sync_inbound(scope, &native);

        let (_, event) = reconciler.handle_key_down(scope, &Key::Backspace);
        insta::assert_yaml_snapshot!(event.unwrap(), @r#"
        inputType: deleteContentBackward
        data: ""
        replaceRange:
          startId: a
          startOffset: 5
          endId: b
          endOffset: 0
        afterRange:
          startId: a
          startOffset: 5
          endId: a
          endOffset: 5
        "#);
    }
}
