//! DOM helpers for block holders.
//!
//! The host renders each block into a holder element; holders are siblings
//! under one container. The header's holder carries the boundary attributes,
//! and the open-state custom property lives on the shared container so the
//! whole run inherits it.

use editorjs_accordion_core::{BOUNDARY_ATTR, BlockNode, READONLY_ATTR, class_tokens};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

/// A block holder element, walked in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomBlock(Element);

impl DomBlock {
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }

    pub fn into_element(self) -> Element {
        self.0
    }
}

impl BlockNode for DomBlock {
    fn next_block(&self) -> Option<Self> {
        self.0.next_element_sibling().map(DomBlock)
    }

    fn is_accordion_header(&self) -> bool {
        self.0.has_attribute(BOUNDARY_ATTR)
    }
}

/// Put the boundary marker (and read-only marker) on a header holder.
pub fn mark_boundary(holder: &Element, block_count: u32, readonly: bool) {
    if let Err(e) = holder.set_attribute(BOUNDARY_ATTR, &block_count.to_string()) {
        tracing::warn!("Failed to set boundary attribute: {:?}", e);
        return;
    }
    let result = if readonly {
        holder.set_attribute(READONLY_ATTR, "")
    } else {
        holder.remove_attribute(READONLY_ATTR)
    };
    if let Err(e) = result {
        tracing::warn!("Failed to update read-only marker: {:?}", e);
    }
}

/// Set a custom property on the holder's parent container.
///
/// Does nothing while the holder is detached.
pub fn set_run_property(holder: &Element, name: &str, value: &str) {
    let Some(container) = holder.parent_element() else {
        return;
    };
    let Some(container) = container.dyn_ref::<HtmlElement>() else {
        return;
    };
    if let Err(e) = container.style().set_property(name, value) {
        tracing::warn!(name, "Failed to set run property: {:?}", e);
    }
}

/// Add or remove a single class.
pub fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, on) {
        tracing::warn!(class, "Failed to toggle class: {:?}", e);
    }
}

/// Add every class in a space-separated class string.
pub fn add_classes(element: &Element, classes: &str) {
    let list = element.class_list();
    for class in class_tokens(classes) {
        if let Err(e) = list.add_1(class) {
            tracing::warn!(class, "Failed to add class: {:?}", e);
        }
    }
}
