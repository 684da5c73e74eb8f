//! Shared style registry and the rule sets appended to it.
//!
//! All accordions on a page share one stylesheet. Rules for a given
//! (instance, run length) pair are appended once, tagged with a marker
//! comment, and never rewritten or removed afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::StyleOverrides;
use crate::escape::{encode_ident_fragment, escape_css_string};
use crate::selector::{
    BLOCK_CLASS, BLOCK_CONTENT_CLASS, BLOCK_ID_ATTR, BOUNDARY_ATTR, REDACTOR_CLASS, RenderMode,
    RunSelector, border_color_var, opened_var, rule,
};

/// Append-only store for generated CSS text.
///
/// The browser implementation wraps a single `<style>` element in the
/// document head; tests use [`MemoryStyleRegistry`].
pub trait StyleRegistry {
    /// Whether the accumulated text contains `needle`.
    fn contains(&self, needle: &str) -> bool;

    /// Append CSS text. Existing text is left untouched.
    fn append(&self, css: &str);
}

impl<T: StyleRegistry + ?Sized> StyleRegistry for Rc<T> {
    fn contains(&self, needle: &str) -> bool {
        (**self).contains(needle)
    }

    fn append(&self, css: &str) {
        (**self).append(css)
    }
}

impl<T: StyleRegistry + ?Sized> StyleRegistry for &T {
    fn contains(&self, needle: &str) -> bool {
        (**self).contains(needle)
    }

    fn append(&self, css: &str) {
        (**self).append(css)
    }
}

/// In-memory registry for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStyleRegistry {
    text: RefCell<String>,
}

impl MemoryStyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the accumulated text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of non-overlapping occurrences of `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.text.borrow().matches(needle).count()
    }
}

impl StyleRegistry for MemoryStyleRegistry {
    fn contains(&self, needle: &str) -> bool {
        self.text.borrow().contains(needle)
    }

    fn append(&self, css: &str) {
        self.text.borrow_mut().push_str(css);
    }
}

/// Identity of one emitted rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey<'a> {
    pub instance_id: &'a str,
    pub run_length: u32,
}

impl StyleKey<'_> {
    /// Comment that opens the rule set and doubles as its presence check.
    ///
    /// The id is encoded as an identifier fragment, which also encodes `*` and
    /// `/`, so the marker can't terminate early.
    pub fn marker(&self) -> String {
        format!(
            "/* accordion {} x{} */",
            encode_ident_fragment(self.instance_id),
            self.run_length
        )
    }
}

const TRANSITION_ROWS: [&str; 2] = [
    "transition: grid-template-rows .5s",
    "-webkit-transition: grid-template-rows .5s",
];

const TRANSITION_BORDER: [&str; 2] = [
    "transition: border .3s, visibility .5s",
    "-webkit-transition: border .3s, visibility .5s",
];

/// Everything needed to generate one instance's rule set.
#[derive(Debug, Clone, Copy)]
pub struct AccordionStyles<'a> {
    pub instance_id: &'a str,
    pub run_length: u32,
    pub disable_animation: bool,
    /// Overrides are assumed already validated.
    pub overrides: &'a StyleOverrides,
}

impl<'a> AccordionStyles<'a> {
    pub fn key(&self) -> StyleKey<'a> {
        StyleKey {
            instance_id: self.instance_id,
            run_length: self.run_length.max(1),
        }
    }

    /// Generate the full rule set for both render modes.
    pub fn render(&self) -> String {
        let key = self.key();
        let readonly = RunSelector::new(self.instance_id, key.run_length, RenderMode::ReadOnly);
        let edit = RunSelector::new(self.instance_id, key.run_length, RenderMode::Interactive);
        let content = format!(" .{BLOCK_CONTENT_CLASS}");
        let inside = format!(" .{BLOCK_CONTENT_CLASS} > *");
        let opened = opened_var(self.instance_id);
        let border = border_color_var(self.instance_id);
        let overrides = self.overrides;

        let mut css = String::new();
        css.push('\n');
        css.push_str(&key.marker());
        css.push('\n');

        css.push_str("\n/* read-only blocks */\n");
        let rows = format!("grid-template-rows: var({opened}, 0fr)");
        let mut block_decls = vec!["display: grid", "overflow: hidden"];
        if !self.disable_animation {
            block_decls.extend(TRANSITION_ROWS);
        }
        block_decls.push(&rows);
        block_decls.extend(overrides.block_wrapper.as_deref());
        css.push_str(&rule(&readonly.each_in_range(""), block_decls));

        css.push_str("\n/* read-only block content */\n");
        let mut readonly_content = vec!["min-height: 0"];
        readonly_content.extend(TRANSITION_BORDER);
        // The grid parent drops the host's default max width.
        readonly_content.push("width: 650px");
        readonly_content.extend(overrides.block_content.as_deref());
        css.push_str(&rule(&readonly.each_in_range(&content), readonly_content));

        css.push_str("\n/* edit block content */\n");
        let side_left = format!("border-left: 1px solid var({border}, transparent)");
        let side_right = format!("border-right: 1px solid var({border}, transparent)");
        let mut edit_content = vec![side_left.as_str(), side_right.as_str()];
        edit_content.extend(TRANSITION_BORDER);
        edit_content.extend(["min-height: 0", "width: 650px"]);
        edit_content.extend(overrides.block_content.as_deref());
        css.push_str(&rule(&edit.each_in_range(&content), edit_content));

        css.push_str("\n/* edit last block content */\n");
        let bottom = format!("border-bottom: 1px solid var({border}, transparent)");
        let mut last_content = vec![
            bottom.as_str(),
            "border-radius: 0 0 15px 15px",
            "-webkit-border-radius: 0 0 15px 15px",
        ];
        last_content.extend(overrides.last_block_content.as_deref());
        css.push_str(&rule(&edit.last_in_range(&content), last_content));

        css.push_str("\n/* inside content */\n");
        let inside_selector = format!(
            "{},\n{}",
            readonly.each_in_range(&inside),
            edit.each_in_range(&inside)
        );
        let mut inside_decls = vec!["padding-inline: 20px"];
        inside_decls.extend(overrides.inside_content.as_deref());
        css.push_str(&rule(&inside_selector, inside_decls));

        css.push_str("\n/* hover accent */\n");
        let header = format!(
            ".{BLOCK_CLASS}[{BOUNDARY_ATTR}][{BLOCK_ID_ATTR}=\"{}\"]",
            escape_css_string(self.instance_id)
        );
        let hover_selector =
            format!(".{REDACTOR_CLASS}:has({header}:hover, {header}:focus-within)");
        let accent = format!("{border}: var(--acc-border-color)");
        css.push_str(&rule(&hover_selector, [accent.as_str()]));

        css
    }
}

/// Append the rule set for `styles` unless its key is already present.
///
/// Returns whether anything was appended. Calling it again with the same
/// instance and run length leaves the registry unchanged.
pub fn ensure_rules<R: StyleRegistry + ?Sized>(registry: &R, styles: &AccordionStyles<'_>) -> bool {
    let key = styles.key();
    if registry.contains(&key.marker()) {
        tracing::trace!(
            instance = key.instance_id,
            run_length = key.run_length,
            "accordion rules already present"
        );
        return false;
    }

    registry.append(&styles.render());
    tracing::debug!(
        instance = key.instance_id,
        run_length = key.run_length,
        "appended accordion rules"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles<'a>(id: &'a str, n: u32, overrides: &'a StyleOverrides) -> AccordionStyles<'a> {
        AccordionStyles {
            instance_id: id,
            run_length: n,
            disable_animation: false,
            overrides,
        }
    }

    #[test]
    fn test_ensure_rules_idempotent() {
        let registry = MemoryStyleRegistry::new();
        let overrides = StyleOverrides::default();
        let s = styles("blk", 3, &overrides);

        assert!(ensure_rules(&registry, &s));
        let after_first = registry.text();
        assert!(!ensure_rules(&registry, &s));
        assert_eq!(registry.text(), after_first);
        assert_eq!(registry.count(&s.key().marker()), 1);
        assert_eq!(registry.count("/* hover accent */"), 1);
    }

    #[test]
    fn test_new_length_appends_and_keeps_old() {
        let registry = MemoryStyleRegistry::new();
        let overrides = StyleOverrides::default();
        ensure_rules(&registry, &styles("blk", 2, &overrides));
        ensure_rules(&registry, &styles("blk", 4, &overrides));

        assert_eq!(registry.count("/* accordion blk x2 */"), 1);
        assert_eq!(registry.count("/* accordion blk x4 */"), 1);
        assert!(registry.contains(r#"[data-accordion-wrapper="2"][data-id="blk"]"#));
        assert!(registry.contains(r#"[data-accordion-wrapper="4"][data-id="blk"]"#));
    }

    #[test]
    fn test_marker_does_not_alias_longer_counts() {
        let registry = MemoryStyleRegistry::new();
        let overrides = StyleOverrides::default();
        ensure_rules(&registry, &styles("blk", 10, &overrides));
        assert!(ensure_rules(&registry, &styles("blk", 1, &overrides)));
    }

    #[test]
    fn test_instances_keyed_separately() {
        let registry = MemoryStyleRegistry::new();
        let overrides = StyleOverrides::default();
        assert!(ensure_rules(&registry, &styles("a", 3, &overrides)));
        assert!(ensure_rules(&registry, &styles("b", 3, &overrides)));
        assert_eq!(registry.count("/* hover accent */"), 2);
    }

    #[test]
    fn test_render_uses_instance_vars() {
        let overrides = StyleOverrides::default();
        let css = styles("blk", 2, &overrides).render();
        assert!(css.contains("grid-template-rows: var(--acc-opened-blk, 0fr);"));
        assert!(css.contains("border-left: 1px solid var(--acc-border-color-blk, transparent);"));
        assert!(css.contains("--acc-border-color-blk: var(--acc-border-color);"));
        assert!(css.contains("transition: grid-template-rows .5s;"));
        assert!(css.contains(
            r#".codex-editor__redactor:has(.ce-block[data-accordion-wrapper][data-id="blk"]:hover, .ce-block[data-accordion-wrapper][data-id="blk"]:focus-within)"#
        ));
    }

    #[test]
    fn test_disable_animation_drops_row_transition() {
        let overrides = StyleOverrides::default();
        let mut s = styles("blk", 2, &overrides);
        s.disable_animation = true;
        let css = s.render();
        assert!(!css.contains("grid-template-rows .5s"));
        assert!(css.contains("grid-template-rows: var(--acc-opened-blk, 0fr);"));
    }

    #[test]
    fn test_overrides_appended_to_categories() {
        let overrides = StyleOverrides {
            block_wrapper: Some("background: pink".into()),
            block_content: Some("color: navy".into()),
            last_block_content: Some("margin-bottom: 8px".into()),
            inside_content: Some("font-size: 12px".into()),
        };
        let css = styles("blk", 2, &overrides).render();
        assert!(css.contains("    background: pink;\n"));
        // Content override lands in both the read-only and edit content rules.
        assert_eq!(css.matches("    color: navy;\n").count(), 2);
        assert!(css.contains("    margin-bottom: 8px;\n"));
        assert!(css.contains("    font-size: 12px;\n"));
    }

    #[test]
    fn test_rule_braces_balanced() {
        let overrides = StyleOverrides::default();
        for n in [1, 2, 5, 10] {
            let css = styles("blk", n, &overrides).render();
            assert_eq!(css.matches('{').count(), css.matches('}').count());
            assert_eq!(css.matches('{').count(), 6);
        }
    }
}
