//! editorjs-accordion-core: accordion grouping logic without DOM dependencies.
//!
//! An accordion header claims the next N blocks of the host editor as its
//! body without moving them. This crate provides:
//! - `selector`: CSS selectors over a header's sibling run
//! - `stylesheet`: the shared, append-only style registry and rule sets
//! - `state`: the open/closed state machine
//! - `run`: lazy resolution of the sibling run
//! - `settings`: the settings popover's form model
//! - `block`: the block-tool logic, generic over `BlockHost`

pub mod block;
pub mod config;
pub mod declarations;
pub mod error;
pub mod escape;
pub mod icons;
pub mod run;
pub mod selector;
pub mod settings;
pub mod state;
pub mod stylesheet;
pub mod types;

pub use block::{AccordionBlock, BlockHost};
pub use config::{
    AccordionConfig, CHEVRON_CLASS, CHEVRON_ROTATED_CLASS, ClassOverrides, CssClasses, Overrides,
    StyleOverrides, WRAPPER_CLASS, class_tokens,
};
pub use declarations::{CssOverrideError, validate_declarations};
pub use error::{AccordionError, Result};
pub use run::{BlockNode, SiblingRun, SliceBlock, resolve_run};
pub use selector::{
    BLOCK_CLASS, BLOCK_CONTENT_CLASS, BLOCK_ID_ATTR, BOUNDARY_ATTR, READONLY_ATTR, RenderMode,
    RunSelector, border_color_var, opened_var,
};
pub use settings::{SettingsError, SettingsForm, SettingsLabels, SettingsUpdate, is_outside_click};
pub use smol_str::SmolStr;
pub use state::OpenState;
pub use stylesheet::{AccordionStyles, MemoryStyleRegistry, StyleKey, StyleRegistry, ensure_rules};
pub use types::{AccordionData, AccordionSettings, DEFAULT_BLOCK_COUNT, validate_data};

/// Toolbox entry shown by the host's block menu.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Toolbox {
    pub title: &'static str,
    pub icon: &'static str,
}

pub const TOOLBOX: Toolbox = Toolbox {
    title: "Accordion",
    icon: icons::ACCORDION_ICON,
};
