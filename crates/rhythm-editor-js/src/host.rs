//! Host callbacks backed by JavaScript functions.

use std::cell::RefCell;
use std::rc::Rc;

use rhythm_editor_browser::{ChangeEvent, EditorHost, SelectEvent};
use serde::Serialize;
use wasm_bindgen::prelude::*;

type Slot = Rc<RefCell<Option<js_sys::Function>>>;

/// Forwards editor events to optional `onChange` / `onSelect` functions.
///
/// Payloads are serialized as plain objects, with region ids in whatever
/// shape the host mounted them. Clones share their slots, so a callback may
/// be replaced from inside another callback.
#[derive(Clone, Default)]
pub struct JsCallbacks {
    on_change: Slot,
    on_select: Slot,
}

impl JsCallbacks {
    pub fn new(on_change: Option<js_sys::Function>, on_select: Option<js_sys::Function>) -> Self {
        Self {
            on_change: Rc::new(RefCell::new(on_change)),
            on_select: Rc::new(RefCell::new(on_select)),
        }
    }

    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        *self.on_change.borrow_mut() = callback;
    }

    pub fn set_on_select(&self, callback: Option<js_sys::Function>) {
        *self.on_select.borrow_mut() = callback;
    }
}

impl EditorHost for JsCallbacks {
    fn on_change(&mut self, event: ChangeEvent) {
        // Cloned out so the slot isn't borrowed while JS runs.
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            invoke(&callback, "onChange", &event);
        }
    }

    fn on_select(&mut self, event: SelectEvent) {
        let callback = self.on_select.borrow().clone();
        if let Some(callback) = callback {
            invoke(&callback, "onSelect", &event);
        }
    }
}

/// Convert a Rust value to a plain JS object (maps become objects, not `Map`).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn invoke<T: Serialize>(callback: &js_sys::Function, name: &str, payload: &T) {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let value = match payload.serialize(&serializer) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                target: "rhythm::input",
                "failed to serialize {} payload: {}",
                name,
                e
            );
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
        tracing::warn!(target: "rhythm::input", "{} callback threw: {:?}", name, e);
    }
}
