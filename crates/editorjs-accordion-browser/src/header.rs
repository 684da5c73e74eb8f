//! The header element rendered by the accordion block.
//!
//! Edit mode: an editable title and a settings affordance.
//! Read-only mode: a fixed title and a chevron; clicking anywhere on the
//! header toggles the accordion.

use editorjs_accordion_core::icons::{CHEVRON_UP_ICON, GEAR_ICON};
use editorjs_accordion_core::{
    CHEVRON_CLASS, CHEVRON_ROTATED_CLASS, CssClasses, READONLY_ATTR, SettingsLabels,
};
use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::dom::{add_classes, set_class};

/// Inputs for building a header.
pub struct HeaderOptions<'a> {
    pub classes: &'a CssClasses,
    pub labels: &'a SettingsLabels,
    pub title: &'a str,
    pub readonly: bool,
    /// Replaces the built-in gear icon. Cloned, so one element can serve many blocks.
    pub settings_icon: Option<&'a Element>,
}

/// Rendered header elements and the listeners attached to them.
///
/// Listeners are removed when the view is dropped.
pub struct HeaderView {
    wrapper: HtmlElement,
    title: HtmlElement,
    settings: Option<HtmlElement>,
    chevron: Option<HtmlElement>,
    listeners: Vec<EventListener>,
}

impl HeaderView {
    pub fn build(document: &Document, opts: HeaderOptions<'_>) -> Result<Self, JsValue> {
        let wrapper = create_html(document, "div")?;
        if opts.readonly {
            wrapper.set_attribute(READONLY_ATTR, "")?;
        }
        add_classes(&wrapper, &opts.classes.wrapper);

        let title = create_html(document, "div")?;
        title.set_attribute(
            "contenteditable",
            if opts.readonly { "false" } else { "true" },
        )?;
        title.set_text_content(Some(opts.title));
        wrapper.append_child(&title)?;

        let mut settings = None;
        let mut chevron = None;

        if opts.readonly {
            let icon = create_html(document, "div")?;
            icon.class_list().add_1(CHEVRON_CLASS)?;
            icon.set_inner_html(CHEVRON_UP_ICON);
            wrapper.append_child(&icon)?;
            chevron = Some(icon);
        } else {
            let button = create_html(document, "div")?;
            add_classes(&button, &opts.classes.settings);
            button.set_attribute("role", "button")?;
            button.set_attribute("aria-label", &opts.labels.settings)?;
            button.set_tab_index(0);
            match opts.settings_icon {
                Some(icon) => {
                    let copy = icon.clone_node_with_deep(true)?;
                    button.append_child(&copy)?;
                }
                None => button.set_inner_html(GEAR_ICON),
            }
            wrapper.append_child(&button)?;
            settings = Some(button);
        }

        Ok(Self {
            wrapper,
            title,
            settings,
            chevron,
            listeners: Vec::new(),
        })
    }

    /// The element returned to the host from `render`.
    pub fn wrapper(&self) -> &HtmlElement {
        &self.wrapper
    }

    pub fn title(&self) -> &HtmlElement {
        &self.title
    }

    /// Settings affordance, present in edit mode only.
    pub fn settings_button(&self) -> Option<&HtmlElement> {
        self.settings.as_ref()
    }

    /// Chevron, present in read-only mode only.
    pub fn chevron(&self) -> Option<&HtmlElement> {
        self.chevron.as_ref()
    }

    /// Call `f` with the title text after every edit.
    pub fn on_title_input(&mut self, f: impl Fn(String) + 'static) {
        let title = self.title.clone();
        let listener = EventListener::new(&self.title, "input", move |_| {
            f(title.text_content().unwrap_or_default());
        });
        self.listeners.push(listener);
    }

    /// Call `f` when the settings affordance is clicked.
    pub fn on_settings_click(&mut self, f: impl Fn() + 'static) {
        let Some(button) = &self.settings else {
            return;
        };
        let listener = EventListener::new(button, "click", move |_| f());
        self.listeners.push(listener);
    }

    /// Call `f` when the header surface is clicked. Read-only headers only.
    pub fn on_toggle(&mut self, f: impl Fn() + 'static) {
        if self.chevron.is_none() {
            return;
        }
        let listener = EventListener::new(&self.wrapper, "click", move |_| f());
        self.listeners.push(listener);
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Rotate the chevron (closed) or reset it (open).
pub fn set_chevron_rotated(chevron: &Element, rotated: bool) {
    set_class(chevron, CHEVRON_ROTATED_CLASS, rotated);
}

pub(crate) fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("created element is not an HtmlElement"))
}
