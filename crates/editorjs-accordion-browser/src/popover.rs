//! Transient settings popover.
//!
//! Opened next to the settings affordance. While open it holds a
//! capture-phase click listener on the document; the listener is released
//! on every close path (save, outside click, drop).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use editorjs_accordion_core::{
    AccordionError, CssClasses, SettingsForm, SettingsLabels, SettingsUpdate, is_outside_click,
};
use editorjs_accordion_core::settings::parse_block_count;
use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Node};

use crate::dom::add_classes;
use crate::header::create_html;

/// Keys typed into the count input must not reach the host's shortcuts.
const ISOLATED_INPUT_EVENTS: [&str; 4] = ["input", "keydown", "keyup", "keypress"];

/// Inputs for building a popover.
pub struct PopoverOptions<'a> {
    pub classes: &'a CssClasses,
    pub labels: &'a SettingsLabels,
    pub form: &'a SettingsForm,
    /// Host-provided class for text inputs.
    pub input_class: &'a str,
}

/// What the popover reports back to its block.
pub struct PopoverCallbacks {
    /// Save pressed with a usable count. Runs before the popover closes.
    pub on_save: Box<dyn Fn(SettingsUpdate)>,
    /// Runs after a save once the popover is gone.
    pub on_saved: Box<dyn Fn()>,
    /// Checkbox toggled. Applied immediately, without a save.
    pub on_default_expanded: Box<dyn Fn(bool)>,
}

struct PopoverInner {
    element: HtmlElement,
    anchor: Element,
    count_input: HtmlInputElement,
    checkbox: HtmlInputElement,
    save_button: HtmlElement,
    min: u32,
    max: u32,
    callbacks: PopoverCallbacks,
    listeners: RefCell<Vec<EventListener>>,
    outside_click: RefCell<Option<EventListener>>,
    closed: Cell<bool>,
}

impl PopoverInner {
    fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        self.outside_click.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.element.remove();
        tracing::trace!("settings popover closed");
    }

    fn save(&self) {
        let raw = self.count_input.value();
        let block_count = match parse_block_count(&raw, self.min, self.max) {
            Ok(count) => count,
            Err(e) => {
                let err = AccordionError::from(e);
                tracing::warn!(error = %err, "Ignoring block count");
                return;
            }
        };
        let update = SettingsUpdate {
            block_count,
            default_expanded: self.checkbox.checked(),
        };
        (self.callbacks.on_save)(update);
        self.close();
        (self.callbacks.on_saved)();
    }

    fn handle_document_click(&self, event: &web_sys::Event) {
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let target = target.as_ref();
        let on_anchor = self.anchor.contains(target);
        let inside = self.element.contains(target);
        if is_outside_click(on_anchor, inside) {
            self.close();
        }
    }
}

impl Drop for PopoverInner {
    fn drop(&mut self) {
        self.close();
    }
}

/// An open (or closed) settings popover. Dropping it closes it.
pub struct SettingsPopover {
    inner: Rc<PopoverInner>,
}

impl SettingsPopover {
    /// Build the popover, wire its listeners and insert it after `anchor`.
    pub fn open(
        document: &Document,
        anchor: &Element,
        opts: PopoverOptions<'_>,
        callbacks: PopoverCallbacks,
    ) -> Result<Self, JsValue> {
        let PopoverOptions {
            classes,
            labels,
            form,
            input_class,
        } = opts;

        let element = create_html(document, "div")?;
        add_classes(&element, &classes.settings_popover);

        let content = create_html(document, "div")?;
        add_classes(&content, &classes.settings_content);
        element.append_child(&content)?;

        let count_row = create_html(document, "div")?;
        add_classes(&count_row, &classes.settings_block_config);
        let count_label: Element = label(document, &form.count_input_id, &labels.block_count)?;
        count_row.append_child(&count_label)?;

        let count_input = create_input(document, "number", &form.count_input_id)?;
        add_classes(&count_input, input_class);
        count_input.set_min(&form.min_block_count.to_string());
        count_input.set_max(&form.max_block_count.to_string());
        count_input.set_value(&form.block_count.to_string());
        count_row.append_child(&count_input)?;

        let save_button = create_html(document, "button")?;
        save_button.set_attribute("type", "button")?;
        add_classes(&save_button, &classes.save_settings);
        save_button.set_text_content(Some(&labels.save));
        count_row.append_child(&save_button)?;
        content.append_child(&count_row)?;

        let delimiter = create_html(document, "div")?;
        add_classes(&delimiter, &classes.settings_delimiter);
        content.append_child(&delimiter)?;

        let expanded_row = create_html(document, "div")?;
        add_classes(&expanded_row, &classes.settings_block_config);
        let expanded_label: Element = label(
            document,
            &form.expanded_input_id,
            &labels.default_expanded,
        )?;
        expanded_row.append_child(&expanded_label)?;
        let checkbox = create_input(document, "checkbox", &form.expanded_input_id)?;
        add_classes(&checkbox, &classes.settings_checkbox);
        checkbox.set_checked(form.default_expanded);
        expanded_row.append_child(&checkbox)?;
        content.append_child(&expanded_row)?;

        let inner = Rc::new(PopoverInner {
            element,
            anchor: anchor.clone(),
            count_input,
            checkbox,
            save_button,
            min: form.min_block_count,
            max: form.max_block_count,
            callbacks,
            listeners: RefCell::new(Vec::new()),
            outside_click: RefCell::new(None),
            closed: Cell::new(false),
        });

        let mut listeners = Vec::with_capacity(ISOLATED_INPUT_EVENTS.len() + 2);
        for event_type in ISOLATED_INPUT_EVENTS {
            listeners.push(EventListener::new(
                &inner.count_input,
                event_type,
                |event| event.stop_propagation(),
            ));
        }

        let weak = Rc::downgrade(&inner);
        listeners.push(EventListener::new(&inner.save_button, "click", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.save();
            }
        }));

        let weak = Rc::downgrade(&inner);
        listeners.push(EventListener::new(&inner.checkbox, "change", move |_| {
            if let Some(inner) = weak.upgrade() {
                (inner.callbacks.on_default_expanded)(inner.checkbox.checked());
            }
        }));
        *inner.listeners.borrow_mut() = listeners;

        let weak: Weak<PopoverInner> = Rc::downgrade(&inner);
        let outside = EventListener::new_with_options(
            document,
            "click",
            EventListenerOptions::run_in_capture_phase(),
            move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_document_click(event);
                }
            },
        );
        *inner.outside_click.borrow_mut() = Some(outside);

        anchor.insert_adjacent_element("afterend", &inner.element)?;
        tracing::trace!(input = %form.count_input_id, "settings popover opened");

        Ok(Self { inner })
    }

    /// Remove the popover and release its listeners. Later calls do nothing.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_open(&self) -> bool {
        !self.inner.closed.get()
    }

    /// Whether the document-level click listener is still registered.
    pub fn has_outside_listener(&self) -> bool {
        self.inner.outside_click.borrow().is_some()
    }

    pub fn element(&self) -> &HtmlElement {
        &self.inner.element
    }

    pub fn count_input(&self) -> &HtmlInputElement {
        &self.inner.count_input
    }

    pub fn checkbox(&self) -> &HtmlInputElement {
        &self.inner.checkbox
    }

    pub fn save_button(&self) -> &HtmlElement {
        &self.inner.save_button
    }
}

fn label(document: &Document, target: &str, text: &str) -> Result<Element, JsValue> {
    let label = document.create_element("label")?;
    label.set_attribute("for", target)?;
    label.set_text_content(Some(text));
    Ok(label)
}

fn create_input(document: &Document, kind: &str, id: &str) -> Result<HtmlInputElement, JsValue> {
    let input = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str("created element is not an input"))?;
    input.set_type(kind);
    input.set_id(id);
    Ok(input)
}
