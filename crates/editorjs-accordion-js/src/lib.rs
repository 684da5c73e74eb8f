//! WASM bindings for the Editor.js accordion block tool.
//!
//! Exposes the `Accordion` class, registered with Editor.js as a block tool:
//!
//! ```js
//! import init, { Accordion } from "editorjs-accordion-js";
//! await init();
//! new EditorJS({ tools: { accordion: { class: Accordion, config: { maxBlockCount: 8 } } } });
//! ```

mod accordion;
mod host;
mod types;

pub use accordion::*;
pub use host::{BlockApi, EditorApi, EditorJsHost};
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
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

    // Another module on the page may already own the global subscriber.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
