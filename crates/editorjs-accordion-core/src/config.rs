//! Tool configuration supplied by the host, and the class names derived from it.

use serde::{Deserialize, Serialize};

use crate::declarations::validate_declarations;
use crate::error::AccordionError;

/// Upper bound on the block count when the host does not configure one.
pub const DEFAULT_MAX_BLOCK_COUNT: u32 = 10;

/// Global tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionConfig {
    /// Whether accordions start expanded unless the block says otherwise.
    pub default_expanded: bool,
    /// Largest block count the settings popover accepts.
    pub max_block_count: u32,
    /// Skip the height transition on open/close.
    pub disable_animation: bool,
    pub overrides: Overrides,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            default_expanded: true,
            max_block_count: DEFAULT_MAX_BLOCK_COUNT,
            disable_animation: false,
            overrides: Overrides::default(),
        }
    }
}

/// Host-provided class and style additions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overrides {
    pub classes: ClassOverrides,
    pub styles: StyleOverrides,
}

/// Extra class names appended to the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassOverrides {
    pub wrapper: Option<String>,
    pub settings: Option<String>,
    pub settings_popover: Option<String>,
    pub settings_content: Option<String>,
    pub settings_block_config: Option<String>,
    pub settings_checkbox: Option<String>,
    pub settings_delimiter: Option<String>,
    pub save_settings: Option<String>,
}

/// Extra declarations appended to each generated rule category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    /// Appended to the grid rule on each read-only sibling block.
    pub block_wrapper: Option<String>,
    /// Appended to the content rule of every block in the run.
    pub block_content: Option<String>,
    /// Appended to the content rule of the last block in the run.
    pub last_block_content: Option<String>,
    /// Appended to the rule for elements inside each block's content.
    pub inside_content: Option<String>,
}

impl StyleOverrides {
    /// Drop every override that is not a flat declaration list.
    ///
    /// Rejected overrides are logged and the category falls back to the
    /// built-in declarations alone.
    pub fn sanitized(&self) -> Self {
        Self {
            block_wrapper: keep_valid("blockWrapper", &self.block_wrapper),
            block_content: keep_valid("blockContent", &self.block_content),
            last_block_content: keep_valid("lastBlockContent", &self.last_block_content),
            inside_content: keep_valid("insideContent", &self.inside_content),
        }
    }
}

fn keep_valid(category: &str, rules: &Option<String>) -> Option<String> {
    let rules = rules.as_deref()?;
    match validate_declarations(rules) {
        Ok(()) => Some(rules.to_string()),
        Err(e) => {
            let err = AccordionError::from(e);
            tracing::warn!(
                category,
                rules,
                error = %err,
                "Invalid CSS rules provided, insert only the css declarations"
            );
            None
        }
    }
}

/// Class names of the header and settings elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssClasses {
    pub wrapper: String,
    pub settings: String,
    pub settings_popover: String,
    pub settings_content: String,
    pub settings_block_config: String,
    pub settings_checkbox: String,
    pub settings_delimiter: String,
    pub save_settings: String,
}

/// Built-in class of the header wrapper, used by selectors for the structural check.
pub const WRAPPER_CLASS: &str = "accordion-wrapper";
pub const CHEVRON_CLASS: &str = "accordion-chevron-icon";
pub const CHEVRON_ROTATED_CLASS: &str = "accordion-chevron-icon-rotated";

impl CssClasses {
    pub fn new(overrides: &ClassOverrides) -> Self {
        Self {
            wrapper: join_class(WRAPPER_CLASS, &overrides.wrapper),
            settings: join_class("accordion-settings", &overrides.settings),
            settings_popover: join_class("settings-popover", &overrides.settings_popover),
            settings_content: join_class("settings-content", &overrides.settings_content),
            settings_block_config: join_class(
                "settings-block-config",
                &overrides.settings_block_config,
            ),
            settings_checkbox: join_class("settings-checkbox", &overrides.settings_checkbox),
            settings_delimiter: join_class("settings-delimiter", &overrides.settings_delimiter),
            save_settings: join_class("save-settings", &overrides.save_settings),
        }
    }
}

fn join_class(base: &str, extra: &Option<String>) -> String {
    match extra.as_deref().map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{base} {extra}"),
        _ => base.to_string(),
    }
}

/// Split a space-separated class string into individual tokens.
pub fn class_tokens(classes: &str) -> impl Iterator<Item = &str> {
    classes.split_ascii_whitespace()
}
