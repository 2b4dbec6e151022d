//! JsEditorRoot - the editor root wrapper for JavaScript.

use rhythm_editor_browser::{
    BrowserEditorRoot, EditableId, EditorConfig, OutboundSync, SelectionExport,
};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::host::{JsCallbacks, to_js};

/// An editor root exposed to JavaScript.
///
/// Construct it over the `contenteditable` element, mount a region for each
/// editable span the renderer produces, and call `setSelection` after every
/// commit.
#[wasm_bindgen]
pub struct JsEditorRoot {
    inner: BrowserEditorRoot<JsCallbacks>,
    callbacks: JsCallbacks,
}

#[wasm_bindgen]
impl JsEditorRoot {
    /// Create a root over `element` and start listening for input.
    ///
    /// `options` is an optional `{ placeholder, suppressNativeInsertion,
    /// normalizeAdjacentInline }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: Element,
        options: JsValue,
        on_change: Option<js_sys::Function>,
        on_select: Option<js_sys::Function>,
    ) -> Result<JsEditorRoot, JsError> {
        let config: EditorConfig = if options.is_undefined() || options.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?
        };

        let callbacks = JsCallbacks::new(on_change, on_select);
        let mut inner = BrowserEditorRoot::new(element, config, callbacks.clone());
        inner
            .attach()
            .map_err(|e| JsError::new(&format!("Failed to attach: {}", e)))?;
        Ok(Self { inner, callbacks })
    }

    /// Replace the `onChange` callback.
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        self.callbacks.set_on_change(callback);
    }

    /// Replace the `onSelect` callback.
    #[wasm_bindgen(js_name = setOnSelect)]
    pub fn set_on_select(&self, callback: Option<js_sys::Function>) {
        self.callbacks.set_on_select(callback);
    }

    /// Register `element` as the region for `id` and render `value` into it.
    #[wasm_bindgen(js_name = mountRegion)]
    pub fn mount_region(
        &self,
        id: JsValue,
        element: &Element,
        value: &str,
    ) -> Result<(), JsError> {
        let id = parse_id(id)?;
        self.inner.mount_region(id, element, value);
        Ok(())
    }

    /// Forget the region for `id`. Returns false if it wasn't mounted.
    #[wasm_bindgen(js_name = unmountRegion)]
    pub fn unmount_region(&self, id: JsValue) -> Result<bool, JsError> {
        let id = parse_id(id)?;
        Ok(self.inner.unmount_region(&id))
    }

    /// Update a mounted region's value. Returns false if it isn't mounted.
    #[wasm_bindgen(js_name = setRegionValue)]
    pub fn set_region_value(&self, id: JsValue, value: &str) -> Result<bool, JsError> {
        let id = parse_id(id)?;
        Ok(self.inner.set_region_value(&id, value))
    }

    /// Declare the selection `{ startId, startOffset, endId, endOffset }` and
    /// push it to the DOM.
    ///
    /// Returns `"written"`, `"alreadyInSync"`, `"unresolved"` or
    /// `"notRepresentable"`. A failed DOM write is logged and reported as
    /// `"failed"`.
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&self, selection: JsValue) -> Result<String, JsError> {
        let declared: SelectionExport = serde_wasm_bindgen::from_value(selection)
            .map_err(|e| JsError::new(&format!("Invalid selection: {}", e)))?;
        Ok(sync_status(self.inner.set_selection(declared).ok()).to_string())
    }

    /// Re-apply the last declared selection. `undefined` if none was declared.
    pub fn resync(&self) -> Option<String> {
        self.inner
            .resync()
            .map(|result| sync_status(result.ok()).to_string())
    }

    /// The normalized selection last seen in the DOM, or `null`.
    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> Result<JsValue, JsError> {
        match self.inner.selection() {
            Some(selection) => to_js(&selection),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(getter, js_name = regionCount)]
    pub fn region_count(&self) -> usize {
        self.inner.region_count()
    }

    /// Resume listening after `detach`.
    pub fn attach(&mut self) -> Result<(), JsError> {
        self.inner
            .attach()
            .map_err(|e| JsError::new(&format!("Failed to attach: {}", e)))
    }

    /// Stop listening. Mounted regions are kept.
    pub fn detach(&mut self) {
        self.inner.detach();
    }
}

fn parse_id(id: JsValue) -> Result<EditableId, JsError> {
    serde_wasm_bindgen::from_value(id)
        .map_err(|e| JsError::new(&format!("Invalid region id: {}", e)))
}

fn sync_status(result: Option<OutboundSync>) -> &'static str {
    match result {
        Some(OutboundSync::Written) => "written",
        Some(OutboundSync::AlreadyInSync) => "alreadyInSync",
        Some(OutboundSync::Unresolved) => "unresolved",
        Some(OutboundSync::NotRepresentable) => "notRepresentable",
        None => "failed",
    }
}
