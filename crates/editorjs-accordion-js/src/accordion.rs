//! Accordion - the block tool class registered with Editor.js.

use std::cell::RefCell;
use std::rc::Rc;

use editorjs_accordion_browser::{
    AccordionBlock, AccordionConfig, AccordionError, DomStyleRegistry, HeaderOptions, HeaderView,
    PopoverCallbacks, PopoverOptions, SettingsLabels, SettingsPopover, TOOLBOX,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::host::{BlockApi, ChevronSlot, EditorApi, EditorJsHost};
use crate::types::{JsBlockData, JsToolbox};

type InnerBlock = AccordionBlock<EditorJsHost, Rc<DomStyleRegistry>>;

thread_local! {
    static REGISTRY: RefCell<Option<Rc<DomStyleRegistry>>> = const { RefCell::new(None) };
}

/// The page-wide style registry, created on first use.
///
/// A cached registry whose element was removed from the document is replaced.
fn shared_registry() -> Result<Rc<DomStyleRegistry>, JsValue> {
    REGISTRY.with(|slot| {
        if let Some(registry) = slot.borrow().as_ref() {
            if registry.is_attached() {
                return Ok(registry.clone());
            }
            tracing::debug!("accordion style element was detached, re-attaching");
        }
        let registry = Rc::new(DomStyleRegistry::attach_global()?);
        *slot.borrow_mut() = Some(registry.clone());
        Ok(registry)
    })
}

/// Accordion block tool.
///
/// Groups the next N blocks under a collapsible header without moving them.
#[wasm_bindgen]
pub struct Accordion {
    block: Rc<RefCell<InnerBlock>>,
    chevron: ChevronSlot,
    popover: Rc<RefCell<Option<SettingsPopover>>>,
    view: Option<HeaderView>,
    labels: Rc<SettingsLabels>,
    input_class: Rc<str>,
    settings_icon: Option<Element>,
}

#[wasm_bindgen]
impl Accordion {
    /// Called by Editor.js with `{ data, config, api, readOnly, block }`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Accordion, JsError> {
        if !options.is_object() {
            return Err(JsError::new("Accordion options must be an object"));
        }

        let block_api = field(&options, "block");
        if !block_api.is_object() {
            return Err(JsError::new("Accordion options are missing the block API"));
        }
        let block_api: BlockApi = block_api.unchecked_into();

        let api = field(&options, "api");
        let (labels, input_class) = if api.is_object() {
            let api: EditorApi = api.unchecked_into();
            (api.labels(), api.input_class())
        } else {
            (SettingsLabels::default(), String::new())
        };

        let config_value = field(&options, "config");
        let config = parse_config(&config_value);
        let settings_icon = settings_icon(&config_value);
        let data = parse_data(field(&options, "data"));
        let readonly = field(&options, "readOnly").as_bool().unwrap_or(false);

        let registry = shared_registry().map_err(js_error)?;
        let chevron = ChevronSlot::default();
        let host = EditorJsHost::new(block_api, chevron.clone());
        let block = AccordionBlock::new(&data, config, readonly, host, registry);
        tracing::debug!(id = block.id(), readonly, "accordion constructed");

        Ok(Self {
            block: Rc::new(RefCell::new(block)),
            chevron,
            popover: Rc::default(),
            view: None,
            labels: Rc::new(labels),
            input_class: input_class.into(),
            settings_icon,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn toolbox() -> JsToolbox {
        TOOLBOX.into()
    }

    #[wasm_bindgen(getter, js_name = isReadOnlySupported)]
    pub fn is_read_only_supported() -> bool {
        true
    }

    #[wasm_bindgen(getter, js_name = isInline)]
    pub fn is_inline() -> bool {
        false
    }

    /// Check persisted data before the editor accepts it.
    pub fn validate(&self, data: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(data) {
            Ok(value) => InnerBlock::validate(&value),
            Err(_) => false,
        }
    }

    /// Build the header element.
    pub fn render(&mut self) -> Result<HtmlElement, JsError> {
        let document = document().map_err(js_error)?;

        let mut view = {
            let block = self.block.borrow();
            HeaderView::build(
                &document,
                HeaderOptions {
                    classes: block.classes(),
                    labels: &self.labels,
                    title: &block.data().title,
                    readonly: block.readonly(),
                    settings_icon: self.settings_icon.as_ref(),
                },
            )
            .map_err(js_error)?
        };

        let block = self.block.clone();
        view.on_title_input(move |title| block.borrow_mut().set_title(title));

        if let Some(button) = view.settings_button() {
            let settings = SettingsTrigger {
                block: self.block.clone(),
                popover: self.popover.clone(),
                labels: self.labels.clone(),
                input_class: self.input_class.clone(),
                anchor: button.clone().into(),
                document,
            };
            view.on_settings_click(move || settings.toggle());
        }

        let block = self.block.clone();
        view.on_toggle(move || block.borrow_mut().toggle());

        *self.chevron.borrow_mut() = view.chevron().cloned();
        let wrapper = view.wrapper().clone();
        self.view = Some(view);
        Ok(wrapper)
    }

    /// Lifecycle hook: the block is in the document.
    pub fn rendered(&self) {
        self.block.borrow_mut().rendered();
    }

    /// Current block data. The rendered content is not consulted.
    pub fn save(&self, _content: JsValue) -> JsBlockData {
        self.block.borrow().save().into()
    }

    pub fn toggle(&self) {
        self.block.borrow_mut().toggle();
    }

    #[wasm_bindgen(getter)]
    pub fn opened(&self) -> bool {
        self.block.borrow().opened()
    }

    #[wasm_bindgen(setter)]
    pub fn set_opened(&self, open: bool) {
        self.block.borrow_mut().set_opened(open);
    }

    /// Holders of the blocks currently grouped under this header.
    pub fn blocks(&self) -> js_sys::Array {
        self.block
            .borrow()
            .run()
            .into_iter()
            .map(|b| JsValue::from(b.into_element()))
            .collect()
    }

    /// Lifecycle hook: the block is being removed.
    pub fn destroy(&mut self) {
        self.popover.borrow_mut().take();
        self.view = None;
        self.chevron.borrow_mut().take();
    }
}

/// State captured by the settings affordance's click listener.
struct SettingsTrigger {
    block: Rc<RefCell<InnerBlock>>,
    popover: Rc<RefCell<Option<SettingsPopover>>>,
    labels: Rc<SettingsLabels>,
    input_class: Rc<str>,
    anchor: Element,
    document: Document,
}

impl SettingsTrigger {
    /// Open the popover, or close it if it is already open.
    fn toggle(&self) {
        let mut slot = self.popover.borrow_mut();
        if slot.as_ref().is_some_and(SettingsPopover::is_open) {
            *slot = None;
            return;
        }

        let (form, classes) = {
            let block = self.block.borrow();
            (block.settings_form(), block.classes().clone())
        };

        let on_save = self.block.clone();
        let on_saved = self.block.clone();
        let on_default_expanded = self.block.clone();
        let callbacks = PopoverCallbacks {
            on_save: Box::new(move |update| on_save.borrow_mut().apply_settings(update)),
            on_saved: Box::new(move || on_saved.borrow_mut().refresh()),
            on_default_expanded: Box::new(move |expanded| {
                on_default_expanded
                    .borrow_mut()
                    .set_default_expanded(expanded)
            }),
        };

        let opened = SettingsPopover::open(
            &self.document,
            &self.anchor,
            PopoverOptions {
                classes: &classes,
                labels: &self.labels,
                form: &form,
                input_class: &self.input_class,
            },
            callbacks,
        );
        match opened {
            Ok(popover) => *slot = Some(popover),
            Err(e) => tracing::warn!("Failed to open settings popover: {:?}", e),
        }
    }
}

fn field(object: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(object, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn parse_config(value: &JsValue) -> AccordionConfig {
    if value.is_undefined() || value.is_null() {
        return AccordionConfig::default();
    }
    match serde_wasm_bindgen::from_value::<AccordionConfig>(value.clone()) {
        Ok(config) => config,
        Err(e) => {
            let err = AccordionError::Config(e.to_string());
            tracing::warn!(error = %err, "Using default accordion config");
            AccordionConfig::default()
        }
    }
}

/// `config.overrides.settingsIcon`, if it is an element.
fn settings_icon(config: &JsValue) -> Option<Element> {
    if !config.is_object() {
        return None;
    }
    let overrides = field(config, "overrides");
    if !overrides.is_object() {
        return None;
    }
    field(&overrides, "settingsIcon").dyn_into::<Element>().ok()
}

fn parse_data(value: JsValue) -> serde_json::Value {
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        let err = AccordionError::Data(e.to_string());
        tracing::warn!(error = %err, "Falling back to default accordion data");
        serde_json::Value::Null
    })
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn js_error(e: JsValue) -> JsError {
    JsError::new(&format!("{e:?}"))
}
