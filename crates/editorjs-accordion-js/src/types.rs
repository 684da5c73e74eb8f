//! Types exposed to JavaScript via wasm-bindgen.

use editorjs_accordion_core::{AccordionData, AccordionSettings, Toolbox};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Toolbox entry for the host's block menu.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct JsToolbox {
    pub title: String,
    /// Inline SVG markup.
    pub icon: String,
}

impl From<Toolbox> for JsToolbox {
    fn from(toolbox: Toolbox) -> Self {
        Self {
            title: toolbox.title.to_string(),
            icon: toolbox.icon.to_string(),
        }
    }
}

/// Persisted block data, as returned from `save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsBlockData {
    pub title: String,
    pub settings: JsBlockSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsBlockSettings {
    pub block_count: u32,
    #[tsify(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expanded: Option<bool>,
}

impl From<&AccordionData> for JsBlockData {
    fn from(data: &AccordionData) -> Self {
        Self {
            title: data.title.clone(),
            settings: (&data.settings).into(),
        }
    }
}

impl From<&AccordionSettings> for JsBlockSettings {
    fn from(settings: &AccordionSettings) -> Self {
        Self {
            block_count: settings.block_count,
            default_expanded: settings.default_expanded,
        }
    }
}
