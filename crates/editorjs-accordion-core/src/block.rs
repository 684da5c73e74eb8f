//! Block-tool logic, generic over the host's capabilities.
//!
//! `AccordionBlock` owns the instance data and open state and drives the
//! style registry. Everything that touches the host (DOM attributes, the
//! custom property, change notifications) goes through [`BlockHost`], so
//! the same logic runs against the browser DOM and against test fakes.

use serde_json::Value;
use smol_str::SmolStr;

use crate::config::{AccordionConfig, CssClasses, StyleOverrides};
use crate::run::{BlockNode, resolve_run};
use crate::selector::opened_var;
use crate::settings::{SettingsForm, SettingsUpdate};
use crate::state::OpenState;
use crate::stylesheet::{AccordionStyles, StyleRegistry, ensure_rules};
use crate::types::{AccordionData, validate_data};

/// Host operations the accordion needs.
///
/// Implementations must tolerate being called before the block is mounted,
/// treating a missing holder as nothing to do.
pub trait BlockHost {
    /// Handle to a block in document order, used for run resolution.
    type Node: BlockNode;

    /// Stable id of this block, supplied by the host.
    fn block_id(&self) -> SmolStr;

    /// Mark the header holder with the boundary attribute (and read-only marker).
    fn set_boundary(&self, block_count: u32, readonly: bool);

    /// Write a custom property on the container shared by the header and its run.
    fn set_run_property(&self, name: &str, value: &str);

    /// Rotate or unrotate the chevron, if one is rendered.
    fn set_chevron_rotated(&self, rotated: bool);

    /// Tell the host the block data changed.
    fn dispatch_change(&self);

    /// The header's own block, as the start of a run walk.
    fn header_node(&self) -> Option<Self::Node>;
}

/// One accordion instance.
pub struct AccordionBlock<H, R> {
    id: SmolStr,
    data: AccordionData,
    config: AccordionConfig,
    styles: StyleOverrides,
    classes: CssClasses,
    readonly: bool,
    state: OpenState,
    host: H,
    registry: R,
}

impl<H: BlockHost, R: StyleRegistry> AccordionBlock<H, R> {
    /// Build an instance from the host's raw data and parsed config.
    ///
    /// Style overrides are checked here once; invalid ones are logged and
    /// dropped for the lifetime of the instance.
    pub fn new(data: &Value, config: AccordionConfig, readonly: bool, host: H, registry: R) -> Self {
        let data = AccordionData::from_host_value(data, &config);
        let state = OpenState::from_open(data.default_expanded(&config));
        Self {
            id: host.block_id(),
            styles: config.overrides.styles.sanitized(),
            classes: CssClasses::new(&config.overrides.classes),
            data,
            config,
            readonly,
            state,
            host,
            registry,
        }
    }

    /// Host-facing validation of persisted data.
    pub fn validate(data: &Value) -> bool {
        validate_data(data)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &AccordionData {
        &self.data
    }

    pub fn config(&self) -> &AccordionConfig {
        &self.config
    }

    pub fn classes(&self) -> &CssClasses {
        &self.classes
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> OpenState {
        self.state
    }

    pub fn opened(&self) -> bool {
        self.state.is_open()
    }

    /// Name of this instance's open-state custom property.
    pub fn opened_property(&self) -> String {
        opened_var(&self.id)
    }

    /// Lifecycle hook after the host inserted the block into the document.
    pub fn rendered(&mut self) {
        self.host
            .set_run_property(&self.opened_property(), self.state.grid_rows());
        self.render_blocks();
        self.set_opened(self.state.is_open());
    }

    /// Declared run length, kept within `1..=max_block_count`.
    fn block_count(&self) -> u32 {
        self.data
            .settings
            .block_count
            .clamp(1, self.config.max_block_count.max(1))
    }

    /// Mark the header and make sure rules for the current count exist.
    pub fn render_blocks(&self) {
        let count = self.block_count();
        self.host.set_boundary(count, self.readonly);

        let styles = AccordionStyles {
            instance_id: &self.id,
            run_length: count,
            disable_animation: self.config.disable_animation,
            overrides: &self.styles,
        };
        ensure_rules(&self.registry, &styles);

        if let Some(header) = self.host.header_node() {
            let resolved = resolve_run(&header, count).count();
            if resolved < count as usize {
                tracing::debug!(
                    instance = %self.id,
                    declared = count,
                    resolved,
                    "accordion run truncated"
                );
            }
        }
    }

    /// Flip the open state.
    pub fn toggle(&mut self) {
        self.set_opened(self.state.toggled().is_open());
    }

    /// Set the open state and apply its visual side effects.
    ///
    /// The custom property is written before the chevron is updated.
    pub fn set_opened(&mut self, open: bool) {
        self.state = OpenState::from_open(open);
        self.host
            .set_run_property(&self.opened_property(), self.state.grid_rows());
        self.host.set_chevron_rotated(self.state.chevron_rotated());
    }

    /// The blocks currently grouped under this header.
    pub fn run(&self) -> Vec<H::Node> {
        match self.host.header_node() {
            Some(header) => resolve_run(&header, self.block_count()).collect(),
            None => Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.data.title = title.into();
        self.host.dispatch_change();
    }

    /// Persist the default-expanded flag. The live open state is left alone.
    pub fn set_default_expanded(&mut self, expanded: bool) {
        self.data.settings.default_expanded = Some(expanded);
        self.host.dispatch_change();
    }

    /// Initial values for the settings popover.
    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm::new(&self.id, &self.data, &self.config)
    }

    /// Write saved settings into the data and notify the host.
    ///
    /// Call [`refresh`](Self::refresh) once the popover is gone to restyle.
    pub fn apply_settings(&mut self, update: SettingsUpdate) {
        let max = self.config.max_block_count.max(1);
        self.data.settings.block_count = update.block_count.clamp(1, max);
        self.data.settings.default_expanded = Some(update.default_expanded);
        self.host.dispatch_change();
    }

    /// Re-run style synthesis and re-apply the current open state.
    pub fn refresh(&mut self) {
        self.render_blocks();
        self.set_opened(self.state.is_open());
    }

    /// Data for the host's `save` call, exactly as held in memory.
    pub fn save(&self) -> &AccordionData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::selector::BOUNDARY_ATTR;
    use crate::stylesheet::MemoryStyleRegistry;

    #[derive(Default)]
    struct FakeDoc {
        /// Block ids in document order, with their attributes.
        blocks: RefCell<Vec<(String, HashMap<String, String>)>>,
        /// Custom properties on the shared container.
        props: RefCell<HashMap<String, String>>,
    }

    impl FakeDoc {
        fn with_blocks(ids: &[&str]) -> Rc<Self> {
            let doc = Self::default();
            *doc.blocks.borrow_mut() = ids
                .iter()
                .map(|id| (id.to_string(), HashMap::new()))
                .collect();
            Rc::new(doc)
        }

        fn attr(&self, id: &str, name: &str) -> Option<String> {
            self.blocks
                .borrow()
                .iter()
                .find(|(b, _)| b == id)
                .and_then(|(_, attrs)| attrs.get(name).cloned())
        }

        fn prop(&self, name: &str) -> Option<String> {
            self.props.borrow().get(name).cloned()
        }
    }

    #[derive(Clone)]
    struct FakeNode {
        doc: Rc<FakeDoc>,
        index: usize,
    }

    impl BlockNode for FakeNode {
        fn next_block(&self) -> Option<Self> {
            let len = self.doc.blocks.borrow().len();
            (self.index + 1 < len).then(|| FakeNode {
                doc: self.doc.clone(),
                index: self.index + 1,
            })
        }

        fn is_accordion_header(&self) -> bool {
            self.doc.blocks.borrow()[self.index]
                .1
                .contains_key(BOUNDARY_ATTR)
        }
    }

    struct FakeHost {
        id: &'static str,
        doc: Rc<FakeDoc>,
        chevron_rotated: Cell<Option<bool>>,
        changes: Cell<usize>,
        /// Order of side effects, to check property-before-chevron.
        log: RefCell<Vec<&'static str>>,
    }

    impl FakeHost {
        fn new(id: &'static str, doc: &Rc<FakeDoc>) -> Self {
            Self {
                id,
                doc: doc.clone(),
                chevron_rotated: Cell::new(None),
                changes: Cell::new(0),
                log: RefCell::new(Vec::new()),
            }
        }
    }

    impl BlockHost for FakeHost {
        type Node = FakeNode;

        fn block_id(&self) -> SmolStr {
            SmolStr::new(self.id)
        }

        fn set_boundary(&self, block_count: u32, readonly: bool) {
            let mut blocks = self.doc.blocks.borrow_mut();
            if let Some((_, attrs)) = blocks.iter_mut().find(|(b, _)| b == self.id) {
                attrs.insert(BOUNDARY_ATTR.to_string(), block_count.to_string());
                if readonly {
                    attrs.insert("data-readonly".to_string(), String::new());
                }
            }
        }

        fn set_run_property(&self, name: &str, value: &str) {
            self.log.borrow_mut().push("property");
            self.doc
                .props
                .borrow_mut()
                .insert(name.to_string(), value.to_string());
        }

        fn set_chevron_rotated(&self, rotated: bool) {
            self.log.borrow_mut().push("chevron");
            self.chevron_rotated.set(Some(rotated));
        }

        fn dispatch_change(&self) {
            self.changes.set(self.changes.get() + 1);
        }

        fn header_node(&self) -> Option<FakeNode> {
            let index = self
                .doc
                .blocks
                .borrow()
                .iter()
                .position(|(b, _)| b == self.id)?;
            Some(FakeNode {
                doc: self.doc.clone(),
                index,
            })
        }
    }

    type TestBlock<'r> = AccordionBlock<FakeHost, &'r MemoryStyleRegistry>;

    fn make_block<'r>(
        doc: &Rc<FakeDoc>,
        id: &'static str,
        data: Value,
        registry: &'r MemoryStyleRegistry,
    ) -> TestBlock<'r> {
        AccordionBlock::new(
            &data,
            AccordionConfig::default(),
            false,
            FakeHost::new(id, doc),
            registry,
        )
    }

    #[test]
    fn test_end_to_end_settings_change() {
        let doc = FakeDoc::with_blocks(&["acc", "p1", "p2", "p3", "p4", "p5"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(
            &doc,
            "acc",
            json!({"title": "FAQ", "settings": {"blockCount": 2, "defaultExpanded": false}}),
            &registry,
        );

        block.rendered();
        assert_eq!(doc.attr("acc", BOUNDARY_ATTR).as_deref(), Some("2"));
        assert_eq!(doc.prop("--acc-opened-acc").as_deref(), Some("0fr"));

        block.toggle();
        assert_eq!(doc.prop("--acc-opened-acc").as_deref(), Some("1fr"));
        assert!(block.opened());

        let form = block.settings_form();
        let count = form.parse_block_count("4").unwrap();
        block.apply_settings(SettingsUpdate {
            block_count: count,
            default_expanded: form.default_expanded,
        });
        block.refresh();

        assert_eq!(doc.attr("acc", BOUNDARY_ATTR).as_deref(), Some("4"));
        assert_eq!(registry.count("/* accordion acc x4 */"), 1);
        assert_eq!(registry.count("/* accordion acc x2 */"), 1);
        // Settings save leaves the live state alone.
        assert_eq!(doc.prop("--acc-opened-acc").as_deref(), Some("1fr"));
        assert_eq!(block.run().len(), 4);
        assert_eq!(block.host().changes.get(), 1);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let doc = FakeDoc::with_blocks(&["acc", "p1"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(&doc, "acc", json!({}), &registry);
        block.rendered();

        let before = (block.opened(), doc.prop("--acc-opened-acc"));
        block.toggle();
        block.toggle();
        assert_eq!((block.opened(), doc.prop("--acc-opened-acc")), before);
    }

    #[test]
    fn test_initial_state_from_data_then_config() {
        let doc = FakeDoc::with_blocks(&["acc"]);
        let registry = MemoryStyleRegistry::new();

        let block = make_block(&doc, "acc", json!({}), &registry);
        assert!(block.opened());

        let config = AccordionConfig {
            default_expanded: false,
            ..Default::default()
        };
        let block: TestBlock<'_> =
            AccordionBlock::new(&json!({}), config, true, FakeHost::new("acc", &doc), &registry);
        assert!(!block.opened());

        let block = make_block(
            &doc,
            "acc",
            json!({"settings": {"blockCount": 1, "defaultExpanded": false}}),
            &registry,
        );
        assert!(!block.opened());
    }

    #[test]
    fn test_set_opened_orders_side_effects() {
        let doc = FakeDoc::with_blocks(&["acc", "p1"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(&doc, "acc", json!({}), &registry);

        block.set_opened(false);
        assert_eq!(*block.host().log.borrow(), vec!["property", "chevron"]);
        assert_eq!(block.host().chevron_rotated.get(), Some(true));
    }

    #[test]
    fn test_rendered_twice_no_duplicate_rules() {
        let doc = FakeDoc::with_blocks(&["acc", "p1", "p2", "p3"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(&doc, "acc", json!({"settings": {"blockCount": 3}}), &registry);
        block.rendered();
        block.rendered();
        assert_eq!(registry.count("/* accordion acc x3 */"), 1);
        assert_eq!(registry.count("/* read-only blocks */"), 1);
    }

    #[test]
    fn test_run_stops_at_neighbour_header() {
        let doc = FakeDoc::with_blocks(&["a", "p1", "b", "p2", "p3"]);
        let registry = MemoryStyleRegistry::new();
        let mut first = make_block(&doc, "a", json!({"settings": {"blockCount": 3}}), &registry);
        let mut second = make_block(&doc, "b", json!({"settings": {"blockCount": 3}}), &registry);
        second.rendered();
        first.rendered();

        assert_eq!(first.run().len(), 1);
        assert_eq!(second.run().len(), 2);
        // Two instances, two distinct rule sets.
        assert_eq!(registry.count("/* accordion a x3 */"), 1);
        assert_eq!(registry.count("/* accordion b x3 */"), 1);
    }

    #[test]
    fn test_save_returns_in_memory_data() {
        let doc = FakeDoc::with_blocks(&["acc"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(&doc, "acc", json!({"title": "Old"}), &registry);
        block.set_title("New");
        block.set_default_expanded(false);

        assert_eq!(
            block.save().to_value(),
            json!({"title": "New", "settings": {"blockCount": 3, "defaultExpanded": false}})
        );
        assert_eq!(block.host().changes.get(), 2);
        // The default flag doesn't reset the live state.
        assert!(block.opened());
    }

    #[test]
    fn test_apply_settings_clamps_to_max() {
        let doc = FakeDoc::with_blocks(&["acc"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(&doc, "acc", json!({}), &registry);
        block.apply_settings(SettingsUpdate {
            block_count: 50,
            default_expanded: true,
        });
        assert_eq!(block.data().settings.block_count, 10);
    }

    #[test]
    fn test_oversized_saved_count_is_capped() {
        let doc = FakeDoc::with_blocks(&["acc", "p1", "p2"]);
        let registry = MemoryStyleRegistry::new();
        let mut block = make_block(
            &doc,
            "acc",
            json!({"settings": {"blockCount": 100000}}),
            &registry,
        );
        block.rendered();

        assert_eq!(doc.attr("acc", BOUNDARY_ATTR).as_deref(), Some("10"));
        assert_eq!(registry.count("/* accordion acc x10 */"), 1);
        assert_eq!(registry.count("/* accordion acc x100000 */"), 0);
        assert_eq!(block.save().settings.block_count, 10);
    }

    #[test]
    fn test_validate_delegates() {
        assert!(!TestBlock::validate(&json!({"settings": {"blockCount": 0}, "title": "x"})));
        assert!(TestBlock::validate(&json!({"settings": {"blockCount": 3}, "title": "x"})));
        assert!(!TestBlock::validate(&json!({"settings": {"blockCount": 3}, "title": 5})));
    }
}
