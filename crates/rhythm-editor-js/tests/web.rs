//! WASM browser tests for the JavaScript bindings.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rhythm_editor_js::JsEditorRoot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn make_root(regions: usize) -> (Element, Vec<Element>) {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    root.set_attribute("contenteditable", "true").unwrap();
    let spans = (0..regions)
        .map(|_| {
            let span = document.create_element("span").unwrap();
            root.append_child(&span).unwrap();
            span
        })
        .collect();
    document.body().unwrap().append_child(&root).unwrap();
    (root, spans)
}

fn json(text: &str) -> JsValue {
    js_sys::JSON::parse(text).unwrap()
}

/// A callback that pushes its argument onto `log`.
fn recorder(log: &js_sys::Array) -> js_sys::Function {
    let push = js_sys::Function::new_with_args("log, event", "log.push(event)");
    push.bind1(&JsValue::NULL, log).unchecked_into()
}

fn backspace_event() -> web_sys::KeyboardEvent {
    let init = web_sys::KeyboardEventInit::new();
    init.set_key("Backspace");
    init.set_bubbles(true);
    init.set_cancelable(true);
    web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

#[wasm_bindgen_test]
fn test_options_and_structured_ids() {
    let (root_element, spans) = make_root(2);
    let root = JsEditorRoot::new(
        root_element.clone(),
        json(r#"{"placeholder":"·"}"#),
        None,
        None,
    )
    .unwrap();

    root.mount_region(json(r#"{"row":1,"col":2}"#), &spans[0], "abc")
        .unwrap();
    root.mount_region(json(r#""tail""#), &spans[1], "").unwrap();
    assert_eq!(root.region_count(), 2);
    assert_eq!(spans[1].text_content().as_deref(), Some("·"));

    // Key order in the id object doesn't matter.
    let status = root
        .set_selection(json(
            r#"{"startId":{"col":2,"row":1},"startOffset":1,"endId":{"col":2,"row":1},"endOffset":1}"#,
        ))
        .unwrap();
    assert_eq!(status, "written");
    assert_eq!(root.resync().as_deref(), Some("alreadyInSync"));

    assert!(root.set_region_value(json(r#""tail""#), "z").unwrap());
    assert!(root.unmount_region(json(r#""tail""#)).unwrap());
    assert!(!root.unmount_region(json(r#""tail""#)).unwrap());
    root_element.remove();
}

#[wasm_bindgen_test]
fn test_invalid_selection_is_an_error() {
    let (root_element, _) = make_root(0);
    let root = JsEditorRoot::new(root_element.clone(), JsValue::UNDEFINED, None, None).unwrap();
    assert!(root.set_selection(json(r#"{"startId":1}"#)).is_err());
    assert_eq!(root.resync(), None);
    root_element.remove();
}

#[wasm_bindgen_test]
fn test_backspace_calls_on_change() {
    let (root_element, spans) = make_root(1);
    let changes = js_sys::Array::new();
    let root = JsEditorRoot::new(
        root_element.clone(),
        JsValue::NULL,
        Some(recorder(&changes)),
        None,
    )
    .unwrap();
    root.mount_region(JsValue::from(7), &spans[0], "abcd").unwrap();
    root.set_selection(json(
        r#"{"startId":7,"startOffset":2,"endId":7,"endOffset":2}"#,
    ))
    .unwrap();

    spans[0].dispatch_event(&backspace_event()).unwrap();

    assert_eq!(changes.length(), 1);
    let change = js_sys::JSON::stringify(&changes.get(0))
        .unwrap()
        .as_string()
        .unwrap();
    assert_eq!(
        change,
        r#"{"inputType":"deleteContentBackward","data":"","replaceRange":{"startId":7,"startOffset":1,"endId":7,"endOffset":2},"afterRange":{"startId":7,"startOffset":1,"endId":7,"endOffset":1}}"#
    );
    root_element.remove();
}

#[wasm_bindgen_test]
fn test_on_change_can_replace_itself() {
    let (root_element, spans) = make_root(1);
    let calls = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<JsEditorRoot>>> = Rc::new(RefCell::new(None));

    // Unsubscribes on the first change.
    let once = {
        let calls = calls.clone();
        let slot = slot.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
            calls.set(calls.get() + 1);
            if let Some(root) = slot.borrow().as_ref() {
                root.set_on_change(None);
            }
        })
    };
    let callback: js_sys::Function = once.as_ref().unchecked_ref::<js_sys::Function>().clone();

    let root = JsEditorRoot::new(root_element.clone(), JsValue::NULL, Some(callback), None)
        .unwrap();
    root.mount_region(JsValue::from("a"), &spans[0], "abcd").unwrap();
    root.set_selection(json(
        r#"{"startId":"a","startOffset":2,"endId":"a","endOffset":2}"#,
    ))
    .unwrap();
    *slot.borrow_mut() = Some(root);

    spans[0].dispatch_event(&backspace_event()).unwrap();
    spans[0].dispatch_event(&backspace_event()).unwrap();
    assert_eq!(calls.get(), 1);

    slot.borrow_mut().take();
    drop(once);
    root_element.remove();
}
