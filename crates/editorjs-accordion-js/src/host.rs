//! Editor.js APIs handed to the tool, and the `BlockHost` built on them.

use std::cell::RefCell;
use std::rc::Rc;

use editorjs_accordion_browser::header::set_chevron_rotated;
use editorjs_accordion_browser::{
    BlockHost, DomBlock, SettingsLabels, SmolStr, mark_boundary, set_run_property,
};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

#[wasm_bindgen]
extern "C" {
    /// The per-block API (`block` in the tool constructor options).
    pub type BlockApi;

    #[wasm_bindgen(method, getter)]
    fn id(this: &BlockApi) -> Option<String>;

    /// The block's holder element. Not available until the block is mounted.
    #[wasm_bindgen(method, getter)]
    fn holder(this: &BlockApi) -> Option<HtmlElement>;

    #[wasm_bindgen(method, catch, js_name = dispatchChange)]
    fn dispatch_change(this: &BlockApi) -> Result<(), JsValue>;

    /// The editor API (`api` in the tool constructor options).
    pub type EditorApi;

    #[wasm_bindgen(method, getter)]
    fn i18n(this: &EditorApi) -> Option<I18nApi>;

    #[wasm_bindgen(method, getter)]
    fn styles(this: &EditorApi) -> Option<StylesApi>;

    type I18nApi;

    #[wasm_bindgen(method, catch)]
    fn t(this: &I18nApi, key: &str) -> Result<JsValue, JsValue>;

    type StylesApi;

    #[wasm_bindgen(method, getter)]
    fn input(this: &StylesApi) -> Option<String>;
}

impl EditorApi {
    /// Labels translated through the editor's i18n, English if unavailable.
    pub fn labels(&self) -> SettingsLabels {
        let Some(i18n) = self.i18n() else {
            return SettingsLabels::default();
        };
        SettingsLabels::translated(|key| {
            i18n.t(key)
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| key.to_string())
        })
    }

    /// Class the editor applies to its own text inputs.
    pub fn input_class(&self) -> String {
        self.styles()
            .and_then(|styles| styles.input())
            .unwrap_or_default()
    }
}

/// Chevron element shared between the header view and the host.
pub type ChevronSlot = Rc<RefCell<Option<HtmlElement>>>;

/// `BlockHost` over an Editor.js block.
///
/// The holder is read on every call, so the host works before mounting
/// (everything is a no-op) and follows the holder if the editor replaces it.
pub struct EditorJsHost {
    block: BlockApi,
    chevron: ChevronSlot,
}

impl EditorJsHost {
    pub fn new(block: BlockApi, chevron: ChevronSlot) -> Self {
        Self { block, chevron }
    }

    fn holder(&self) -> Option<Element> {
        self.block.holder().map(Element::from)
    }
}

impl BlockHost for EditorJsHost {
    type Node = DomBlock;

    fn block_id(&self) -> SmolStr {
        self.block.id().map(SmolStr::from).unwrap_or_default()
    }

    fn set_boundary(&self, block_count: u32, readonly: bool) {
        if let Some(holder) = self.holder() {
            mark_boundary(&holder, block_count, readonly);
        }
    }

    fn set_run_property(&self, name: &str, value: &str) {
        if let Some(holder) = self.holder() {
            set_run_property(&holder, name, value);
        }
    }

    fn set_chevron_rotated(&self, rotated: bool) {
        if let Some(chevron) = self.chevron.borrow().as_ref() {
            set_chevron_rotated(chevron, rotated);
        }
    }

    fn dispatch_change(&self) {
        if let Err(e) = self.block.dispatch_change() {
            tracing::warn!("dispatchChange failed: {:?}", e);
        }
    }

    fn header_node(&self) -> Option<DomBlock> {
        self.holder().map(DomBlock::new)
    }
}
