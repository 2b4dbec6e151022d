//! Editor root: one registry and reconciler bound to a DOM element.
//!
//! The root listens for `beforeinput` and `keydown` on its element and for
//! `selectionchange` on the document, runs them through the reconciler, and
//! hands the resulting events to an [`EditorHost`]. The rendering layer calls
//! [`mount_region`], [`unmount_region`] and [`set_region_value`] as regions
//! come and go, then [`set_selection`] once the DOM is committed.
//!
//! [`mount_region`]: BrowserEditorRoot::mount_region
//! [`unmount_region`]: BrowserEditorRoot::unmount_region
//! [`set_region_value`]: BrowserEditorRoot::set_region_value
//! [`set_selection`]: BrowserEditorRoot::set_selection

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use rhythm_editor_core::{
    EditableId, EditorConfig, EditorHost, KeydownResult, OutboundSync, PlatformError, Reconciler,
    Registry, Scope, SelectionExport,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, Node};

use crate::cursor::BrowserSelection;
use crate::dom_tree::DomTree;
use crate::events::{
    get_data_from_event, get_input_type_from_event, get_key_from_event, is_composing,
};

/// Mutable state shared with the event listeners.
struct RootState {
    registry: Registry<Node>,
    reconciler: Reconciler<Node>,
    selection: BrowserSelection,
    /// Last selection the host declared, re-applied by [`BrowserEditorRoot::resync`].
    declared: Option<SelectionExport>,
}

/// An editor root in the browser.
///
/// Listeners are removed when the root is dropped or [`detach`]ed.
///
/// [`detach`]: BrowserEditorRoot::detach
pub struct BrowserEditorRoot<H: EditorHost + 'static> {
    element: Element,
    state: Rc<RefCell<RootState>>,
    host: Rc<RefCell<H>>,
    listeners: Vec<EventListener>,
}

impl<H: EditorHost + 'static> BrowserEditorRoot<H> {
    /// Create a root over `element`. Call [`attach`](Self::attach) to start
    /// listening.
    pub fn new(element: Element, config: EditorConfig, host: H) -> Self {
        let mut registry = Registry::new();
        registry.register_root(Node::from(element.clone()));
        let state = RootState {
            registry,
            reconciler: Reconciler::new(config),
            selection: BrowserSelection::new(),
            declared: None,
        };
        Self {
            element,
            state: Rc::new(RefCell::new(state)),
            host: Rc::new(RefCell::new(host)),
            listeners: Vec::new(),
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.host
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Install the event listeners. Does nothing if already attached.
    pub fn attach(&mut self) -> Result<(), PlatformError> {
        if self.is_attached() {
            return Ok(());
        }
        let document = self.element.owner_document().ok_or("no document")?;

        let before_input = {
            let state = self.state.clone();
            let host = self.host.clone();
            EventListener::new_with_options(
                &self.element,
                "beforeinput",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(input) = event.dyn_ref::<web_sys::InputEvent>() else {
                        return;
                    };
                    let input_type = get_input_type_from_event(input);
                    let data = get_data_from_event(input);
                    let outcome = {
                        let state = &mut *state.borrow_mut();
                        let tree = DomTree;
                        let scope = Scope::new(&tree, &state.registry);
                        state.reconciler.handle_before_input(
                            scope,
                            &input_type,
                            data.as_deref(),
                            is_composing(input),
                        )
                    };
                    if outcome.prevents_default() {
                        event.prevent_default();
                    }
                    if let Some(change) = outcome.into_change() {
                        dispatch(&host, |host| host.on_change(change));
                    }
                },
            )
        };

        let key_down = {
            let state = self.state.clone();
            let host = self.host.clone();
            EventListener::new_with_options(
                &self.element,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(keyboard) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                        return;
                    };
                    let key = get_key_from_event(keyboard);
                    let (result, change) = {
                        let state = &mut *state.borrow_mut();
                        let tree = DomTree;
                        let scope = Scope::new(&tree, &state.registry);
                        state.reconciler.handle_key_down(scope, &key)
                    };
                    if result == KeydownResult::Handled {
                        event.prevent_default();
                    }
                    if let Some(change) = change {
                        dispatch(&host, |host| host.on_change(change));
                    }
                },
            )
        };

        let selection_change = {
            let state = self.state.clone();
            let host = self.host.clone();
            EventListener::new(&document, "selectionchange", move |_| {
                let select = {
                    let state = &mut *state.borrow_mut();
                    let tree = DomTree;
                    let scope = Scope::new(&tree, &state.registry);
                    state.reconciler.sync_inbound(scope, &state.selection)
                };
                if let Some(select) = select {
                    dispatch(&host, |host| host.on_select(select));
                }
            })
        };

        self.listeners = vec![before_input, key_down, selection_change];
        tracing::debug!(target: "rhythm::input", "editor root attached");
        Ok(())
    }

    /// Remove the event listeners. Registered regions are kept.
    pub fn detach(&mut self) {
        self.listeners.clear();
        tracing::debug!(target: "rhythm::input", "editor root detached");
    }

    /// Register `element` as the region for `id` and render `value` into it.
    ///
    /// Replaces any earlier mount of the same id.
    pub fn mount_region(&self, id: EditableId, element: &Element, value: &str) {
        let mut state = self.state.borrow_mut();
        render_text(element, state.reconciler.config().display_text(value));
        state.registry.register(id, Node::from(element.clone()), value);
    }

    /// Forget the region for `id`. Returns false if it wasn't mounted.
    pub fn unmount_region(&self, id: &EditableId) -> bool {
        self.state.borrow_mut().registry.unregister(id).is_some()
    }

    /// Update the intended value of a mounted region and re-render its text.
    /// Returns false if `id` isn't mounted.
    pub fn set_region_value(&self, id: &EditableId, value: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.registry.set_value(id, value) {
            return false;
        }
        let text = state.reconciler.config().display_text(value);
        if let Some(element) = state
            .registry
            .lookup(id)
            .and_then(|node| node.dyn_ref::<Element>())
        {
            render_text(element, text);
        }
        true
    }

    /// Declare the selection the host wants and push it to the DOM.
    ///
    /// A failed native write is logged and returned; the declared selection
    /// is kept either way.
    pub fn set_selection(&self, declared: SelectionExport) -> Result<OutboundSync, PlatformError> {
        let state = &mut *self.state.borrow_mut();
        let tree = DomTree;
        let scope = Scope::new(&tree, &state.registry);
        let result = state
            .reconciler
            .sync_outbound(scope, &declared, &mut state.selection);
        if let Err(e) = &result {
            tracing::warn!(target: "rhythm::selection", "failed to write selection: {}", e);
        }
        state.declared = Some(declared);
        result
    }

    /// Re-apply the last declared selection, e.g. after regions it names
    /// were mounted. `None` if nothing was declared yet.
    pub fn resync(&self) -> Option<Result<OutboundSync, PlatformError>> {
        let declared = self.state.borrow().declared.clone()?;
        Some(self.set_selection(declared))
    }

    /// The normalized selection last seen in the DOM or written to it.
    pub fn selection(&self) -> Option<SelectionExport> {
        self.state
            .borrow()
            .reconciler
            .last_known()
            .map(|range| range.to_export())
    }

    /// Number of mounted regions.
    pub fn region_count(&self) -> usize {
        self.state.borrow().registry.len()
    }
}

/// Hand an event to the host. An event raised while the host is still
/// handling an earlier one (a callback dispatching DOM events synchronously)
/// is dropped.
fn dispatch<H: EditorHost>(host: &Rc<RefCell<H>>, f: impl FnOnce(&mut H)) {
    match host.try_borrow_mut() {
        Ok(mut host) => f(&mut *host),
        Err(_) => {
            tracing::warn!(target: "rhythm::input", "host busy, dropping re-entrant event");
        }
    }
}

/// Replace `element`'s text, leaving it alone if it already matches so a
/// caret inside it survives.
fn render_text(element: &Element, text: &str) {
    if element.text_content().as_deref() != Some(text) {
        element.set_text_content(Some(text));
    }
}
