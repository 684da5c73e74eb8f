//! Persisted block data and its validation.
//!
//! The host serializes exactly this shape per block:
//!
//! ```json
//! { "title": "Details", "settings": { "blockCount": 3, "defaultExpanded": true } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AccordionConfig;

/// Block count used when persisted data carries none.
pub const DEFAULT_BLOCK_COUNT: u32 = 3;

/// Per-instance settings edited through the settings popover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccordionSettings {
    /// Number of following sibling blocks grouped under the header.
    #[serde(default = "default_block_count")]
    pub block_count: u32,
    /// Whether the accordion starts expanded. `None` defers to the config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expanded: Option<bool>,
}

impl Default for AccordionSettings {
    fn default() -> Self {
        Self {
            block_count: DEFAULT_BLOCK_COUNT,
            default_expanded: None,
        }
    }
}

fn default_block_count() -> u32 {
    DEFAULT_BLOCK_COUNT
}

/// Block data as persisted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccordionData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub settings: AccordionSettings,
}

impl AccordionData {
    /// Build data from whatever the host handed over, filling gaps with defaults.
    ///
    /// Fields that are present but unusable (wrong type, zero count) are
    /// replaced by their defaults rather than failing construction: a broken
    /// block still renders, and `validate` is where the host learns about it.
    /// A count above `config.max_block_count` is lowered to it.
    pub fn from_host_value(value: &Value, config: &AccordionConfig) -> Self {
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let settings = value.get("settings");
        let max = config.max_block_count.max(1);
        let block_count = match settings
            .and_then(|s| s.get("blockCount"))
            .and_then(as_block_count)
        {
            Some(count) if count > max => {
                tracing::debug!(count, max, "capping persisted block count");
                max
            }
            Some(count) => count,
            None => DEFAULT_BLOCK_COUNT.min(max),
        };
        let default_expanded = settings
            .and_then(|s| s.get("defaultExpanded"))
            .and_then(Value::as_bool)
            .or(Some(config.default_expanded));

        Self {
            title,
            settings: AccordionSettings {
                block_count,
                default_expanded,
            },
        }
    }

    /// The instance-level expanded flag, falling back to the config default.
    pub fn default_expanded(&self, config: &AccordionConfig) -> bool {
        self.settings
            .default_expanded
            .unwrap_or(config.default_expanded)
    }

    /// Serialize for the host's `save` call.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Check persisted block data the way the host's `validate` hook expects.
///
/// Rejects data whose `settings.blockCount` is missing, not a whole number, or
/// below one, and data whose `title` is not a string.
pub fn validate_data(value: &Value) -> bool {
    let Some(count) = value.get("settings").and_then(|s| s.get("blockCount")) else {
        return false;
    };
    if as_block_count(count).is_none() {
        return false;
    }
    matches!(value.get("title"), Some(Value::String(_)))
}

/// Read a JSON number as a block count: whole, at least one, fits in u32.
fn as_block_count(value: &Value) -> Option<u32> {
    let n = value.as_f64()?;
    if n < 1.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return None;
    }
    Some(n as u32)
}
