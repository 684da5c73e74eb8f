//! Selector synthesis for sibling runs.
//!
//! The host renders every block as a flat sibling `.ce-block` under the
//! redactor, so the accordion body can't be a subtree. Instead each rule
//! anchors on the header block and walks `+` combinators to reach the
//! blocks after it. CSS has no "1 to N siblings" combinator, so a range is
//! written as the union of one selector per offset.
//!
//! Anchors are scoped by run length, block id and render mode, so rules
//! for two accordions never match each other's blocks. Every sibling step
//! excludes blocks that carry the boundary marker, which is what stops a
//! run at the next accordion header.

use crate::escape::{encode_ident_fragment, escape_css_string};

/// Class the host puts on every block holder.
pub const BLOCK_CLASS: &str = "ce-block";
/// Class of the content element inside each block holder.
pub const BLOCK_CONTENT_CLASS: &str = "ce-block__content";
/// Class of the host's block container, parent of all block holders.
pub const REDACTOR_CLASS: &str = "codex-editor__redactor";
/// Attribute the host puts on every block holder with the block id.
pub const BLOCK_ID_ATTR: &str = "data-id";
/// Boundary marker, carries the active block count of an accordion header.
pub const BOUNDARY_ATTR: &str = "data-accordion-wrapper";
/// Present on headers rendered in read-only mode.
pub const READONLY_ATTR: &str = "data-readonly";

/// Rendering context of a header. Rules differ per context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    ReadOnly,
    Interactive,
}

impl RenderMode {
    pub fn from_readonly(readonly: bool) -> Self {
        if readonly {
            RenderMode::ReadOnly
        } else {
            RenderMode::Interactive
        }
    }

    fn condition(self) -> String {
        match self {
            RenderMode::ReadOnly => format!("[{READONLY_ATTR}]"),
            RenderMode::Interactive => format!(":not([{READONLY_ATTR}])"),
        }
    }
}

/// Name of the custom property holding an instance's `grid-template-rows` value.
///
/// Usable as-is both in CSS text and with CSSOM `setProperty`.
pub fn opened_var(instance_id: &str) -> String {
    format!("--acc-opened-{}", encode_ident_fragment(instance_id))
}

/// Name of the custom property holding an instance's border colour.
pub fn border_color_var(instance_id: &str) -> String {
    format!("--acc-border-color-{}", encode_ident_fragment(instance_id))
}

/// Selectors over the sibling run of one accordion header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSelector<'a> {
    instance_id: &'a str,
    run_length: u32,
    mode: RenderMode,
}

impl<'a> RunSelector<'a> {
    /// A zero run length is treated as one.
    pub fn new(instance_id: &'a str, run_length: u32, mode: RenderMode) -> Self {
        Self {
            instance_id,
            run_length: run_length.max(1),
            mode,
        }
    }

    pub fn run_length(&self) -> u32 {
        self.run_length
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Selector for the header block itself.
    pub fn anchor(&self) -> String {
        format!(
            ".{BLOCK_CLASS}[{BOUNDARY_ATTR}=\"{}\"][{BLOCK_ID_ATTR}=\"{}\"]{}:has(.{})",
            self.run_length,
            escape_css_string(self.instance_id),
            self.mode.condition(),
            crate::config::WRAPPER_CLASS,
        )
    }

    /// Selector for the sibling exactly `offset` blocks after the header.
    pub fn at_offset(&self, offset: u32, extra: &str) -> String {
        format!("{}{}{extra}", self.anchor(), sibling_chain(offset))
    }

    /// Union matching every block of the run, offsets `1..=run_length`.
    ///
    /// `extra` is appended to each branch, e.g. `" .ce-block__content"` to
    /// reach a descendant of each block.
    pub fn each_in_range(&self, extra: &str) -> String {
        let parts: Vec<String> = (1..=self.run_length)
            .map(|offset| self.at_offset(offset, extra))
            .collect();
        parts.join(",\n")
    }

    /// Union matching whichever block actually ends the run.
    ///
    /// Branches, in order:
    /// - the full run exists: offset `run_length`
    /// - the document ends early: offset `k` that is the last child
    /// - another header follows: offset `k` whose next sibling is a header
    ///
    /// for every `k` in `1..run_length`.
    pub fn last_in_range(&self, extra: &str) -> String {
        let anchor = self.anchor();
        let mut parts = vec![format!(
            "{anchor}{}{extra}",
            sibling_chain(self.run_length)
        )];

        for offset in (1..self.run_length).rev() {
            parts.push(format!(
                "{anchor}{}:last-child{extra}",
                sibling_chain(offset)
            ));
        }

        for offset in (1..self.run_length).rev() {
            parts.push(format!(
                "{anchor}{}:has(+ .{BLOCK_CLASS}[{BOUNDARY_ATTR}]){extra}",
                sibling_chain(offset)
            ));
        }

        parts.join(",\n")
    }
}

fn sibling_chain(steps: u32) -> String {
    let step = format!(" + .{BLOCK_CLASS}:not([{BOUNDARY_ATTR}])");
    step.repeat(steps as usize)
}

/// Format a rule from a selector and declaration lines.
///
/// Declarations are emitted one per line; blank entries are skipped.
pub fn rule<'d>(selector: &str, declarations: impl IntoIterator<Item = &'d str>) -> String {
    let mut out = String::with_capacity(selector.len() + 64);
    out.push_str(selector);
    out.push_str(" {\n");
    for decl in declarations {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        out.push_str("    ");
        out.push_str(decl);
        if !decl.ends_with(';') {
            out.push(';');
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_per_mode() {
        let ro = RunSelector::new("abc", 2, RenderMode::ReadOnly);
        assert_eq!(
            ro.anchor(),
            r#".ce-block[data-accordion-wrapper="2"][data-id="abc"][data-readonly]:has(.accordion-wrapper)"#
        );
        let edit = RunSelector::new("abc", 2, RenderMode::Interactive);
        assert_eq!(
            edit.anchor(),
            r#".ce-block[data-accordion-wrapper="2"][data-id="abc"]:not([data-readonly]):has(.accordion-wrapper)"#
        );
    }

    #[test]
    fn test_each_in_range_two() {
        let sel = RunSelector::new("abc", 2, RenderMode::Interactive);
        insta::assert_snapshot!(sel.each_in_range(" .ce-block__content"), @r#"
        .ce-block[data-accordion-wrapper="2"][data-id="abc"]:not([data-readonly]):has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]) .ce-block__content,
        .ce-block[data-accordion-wrapper="2"][data-id="abc"]:not([data-readonly]):has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]) + .ce-block:not([data-accordion-wrapper]) .ce-block__content
        "#);
    }

    #[test]
    fn test_last_in_range_three() {
        let sel = RunSelector::new("abc", 3, RenderMode::ReadOnly);
        insta::assert_snapshot!(sel.last_in_range(""), @r#"
        .ce-block[data-accordion-wrapper="3"][data-id="abc"][data-readonly]:has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]) + .ce-block:not([data-accordion-wrapper]) + .ce-block:not([data-accordion-wrapper]),
        .ce-block[data-accordion-wrapper="3"][data-id="abc"][data-readonly]:has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]) + .ce-block:not([data-accordion-wrapper]):last-child,
        .ce-block[data-accordion-wrapper="3"][data-id="abc"][data-readonly]:has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]):last-child,
        .ce-block[data-accordion-wrapper="3"][data-id="abc"][data-readonly]:has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]) + .ce-block:not([data-accordion-wrapper]):has(+ .ce-block[data-accordion-wrapper]),
        .ce-block[data-accordion-wrapper="3"][data-id="abc"][data-readonly]:has(.accordion-wrapper) + .ce-block:not([data-accordion-wrapper]):has(+ .ce-block[data-accordion-wrapper])
        "#);
    }

    #[test]
    fn test_single_block_run_degenerates() {
        let sel = RunSelector::new("abc", 1, RenderMode::Interactive);
        let each = sel.each_in_range(" .ce-block__content");
        let last = sel.last_in_range(" .ce-block__content");
        assert_eq!(each, last);
        assert!(!each.contains(",\n"));
    }

    #[test]
    fn test_zero_length_treated_as_one() {
        let sel = RunSelector::new("abc", 0, RenderMode::Interactive);
        assert_eq!(sel.run_length(), 1);
        assert_eq!(
            sel.each_in_range(""),
            RunSelector::new("abc", 1, RenderMode::Interactive).each_in_range("")
        );
    }

    #[test]
    fn test_branch_counts_scale_with_length() {
        for n in 1..=25u32 {
            let sel = RunSelector::new("id", n, RenderMode::ReadOnly);
            let each = sel.each_in_range("");
            let last = sel.last_in_range("");
            assert_eq!(each.split(",\n").count(), n as usize);
            assert_eq!(last.split(",\n").count(), (2 * n - 1) as usize);
            // Each branch of the each-union walks exactly its offset.
            for (i, branch) in each.split(",\n").enumerate() {
                assert_eq!(branch.matches(" + .ce-block").count(), i + 1);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = RunSelector::new("x", 7, RenderMode::Interactive).last_in_range(" > *");
        let b = RunSelector::new("x", 7, RenderMode::Interactive).last_in_range(" > *");
        assert_eq!(a, b);
    }

    #[test]
    fn test_instances_do_not_share_anchors() {
        let a = RunSelector::new("a", 3, RenderMode::Interactive).each_in_range("");
        let b = RunSelector::new("b", 3, RenderMode::Interactive).each_in_range("");
        assert!(a.split(",\n").all(|branch| !b.contains(branch)));
    }

    #[test]
    fn test_hostile_id_is_escaped() {
        let sel = RunSelector::new(r#"a"]{x"#, 1, RenderMode::ReadOnly);
        assert!(sel.anchor().contains(r#"[data-id="a\"]{x"]"#));
        assert_eq!(opened_var("a.b"), "--acc-opened-a_2e_b");
        assert_ne!(opened_var("a\0"), opened_var("a\u{FFFD}"));
        assert_eq!(border_color_var("q1"), "--acc-border-color-q1");
    }

    #[test]
    fn test_rule_formatting() {
        assert_eq!(
            rule(".x", ["color: red", "", "  margin: 0;  "]),
            ".x {\n    color: red;\n    margin: 0;\n}\n"
        );
    }
}
