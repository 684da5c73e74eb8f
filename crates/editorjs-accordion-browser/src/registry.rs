//! Page-wide style registry backed by a single `<style>` element.

use editorjs_accordion_core::StyleRegistry;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlStyleElement};

/// `id` of the shared style element.
pub const STYLE_ELEMENT_ID: &str = "editorjs-accordion-styles";

/// Style registry writing into the shared `<style>` element in `<head>`.
///
/// Rules are appended as new text nodes, so text already in the element is
/// never rewritten.
#[derive(Debug, Clone)]
pub struct DomStyleRegistry {
    element: HtmlStyleElement,
}

impl DomStyleRegistry {
    /// Find the shared style element, creating it on first use.
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        if let Some(existing) = document.get_element_by_id(STYLE_ELEMENT_ID) {
            match existing.dyn_into::<HtmlStyleElement>() {
                Ok(element) => return Ok(Self { element }),
                Err(other) => {
                    tracing::warn!(
                        tag = %other.tag_name(),
                        "element with the accordion style id is not a <style>, creating another"
                    );
                }
            }
        }

        let element: HtmlStyleElement = document
            .create_element("style")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("created element is not a <style>"))?;
        element.set_id(STYLE_ELEMENT_ID);

        let head = document
            .head()
            .ok_or_else(|| JsValue::from_str("document has no <head>"))?;
        head.append_child(&element)?;
        tracing::debug!("created shared accordion style element");

        Ok(Self { element })
    }

    /// [`attach`](Self::attach) to the global document.
    pub fn attach_global() -> Result<Self, JsValue> {
        Self::attach(&gloo_utils::document())
    }

    /// Whether the style element is still in a document.
    pub fn is_attached(&self) -> bool {
        self.element.is_connected()
    }

    pub fn element(&self) -> &HtmlStyleElement {
        &self.element
    }

    /// Everything appended so far.
    pub fn text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }
}

impl StyleRegistry for DomStyleRegistry {
    fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    fn append(&self, css: &str) {
        if let Err(e) = self.element.append_with_str_1(css) {
            tracing::warn!("Appending accordion rules failed: {:?}", e);
        }
    }
}
