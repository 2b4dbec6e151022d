//! WASM bindings for rhythm editor roots.
//!
//! Lets a JavaScript rendering layer mount editable regions under a root
//! element, declare the selection it wants, and receive `onChange` /
//! `onSelect` callbacks with plain JSON payloads.

mod editor;
mod host;

pub use editor::*;
pub use host::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and route `tracing` output to the console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // Per-keystroke selection traces are too chatty for the console.
    let filter = EnvFilter::new("debug,rhythm::selection=info");

    let reg = Registry::default().with(filter).with(wasm_layer);

    let _ = set_global_default(reg);
}
