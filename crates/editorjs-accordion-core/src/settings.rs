//! Settings popover model: form values, labels and input parsing.

use miette::Diagnostic;

use crate::config::AccordionConfig;
use crate::types::AccordionData;

/// Error for block count input that can't be used.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SettingsError {
    #[error("block count `{0}` is not a whole number")]
    #[diagnostic(
        code(accordion::settings::not_a_number),
        help("enter a number between 1 and the configured maximum")
    )]
    NotANumber(String),
}

/// Values edited by the settings popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub block_count: u32,
    pub default_expanded: bool,
}

/// Initial state of the settings popover for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    /// `id` of the number input, unique per block.
    pub count_input_id: String,
    /// `id` of the checkbox, unique per block.
    pub expanded_input_id: String,
    pub block_count: u32,
    pub min_block_count: u32,
    pub max_block_count: u32,
    pub default_expanded: bool,
}

impl SettingsForm {
    pub fn new(block_id: &str, data: &AccordionData, config: &AccordionConfig) -> Self {
        Self {
            count_input_id: format!("blockCount-{block_id}"),
            expanded_input_id: format!("defaultExpanded-{block_id}"),
            block_count: data.settings.block_count,
            min_block_count: 1,
            max_block_count: config.max_block_count.max(1),
            default_expanded: data.default_expanded(config),
        }
    }

    /// Parse the number input's value, clamped to the form's bounds.
    pub fn parse_block_count(&self, input: &str) -> Result<u32, SettingsError> {
        parse_block_count(input, self.min_block_count, self.max_block_count)
    }
}

/// Parse a block count typed into the settings popover.
///
/// Whole numbers outside `min..=max` are clamped; anything else is an error
/// and leaves the current count in place.
pub fn parse_block_count(input: &str, min: u32, max: u32) -> Result<u32, SettingsError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| SettingsError::NotANumber(trimmed.to_string()))?;
    let clamped = value.clamp(min as i64, max.max(min) as i64) as u32;
    if clamped as i64 != value {
        tracing::debug!(value, clamped, "block count clamped to configured bounds");
    }
    Ok(clamped)
}

/// Text shown in the header and settings popover.
///
/// Built-in strings are English; hosts translate them through their i18n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLabels {
    pub settings: String,
    pub block_count: String,
    pub save: String,
    pub default_expanded: String,
}

impl Default for SettingsLabels {
    fn default() -> Self {
        Self::translated(str::to_string)
    }
}

impl SettingsLabels {
    pub fn translated(mut t: impl FnMut(&str) -> String) -> Self {
        Self {
            settings: t("Settings"),
            block_count: t("Block Count"),
            save: t("Save"),
            default_expanded: t("Default Expanded"),
        }
    }
}

/// Whether a document click should dismiss the popover.
pub fn is_outside_click(on_settings_button: bool, inside_popover: bool) -> bool {
    !on_settings_button && !inside_popover
}
