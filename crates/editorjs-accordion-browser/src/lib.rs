//! Browser DOM layer for the accordion block.
//!
//! This crate binds the pure logic in `editorjs-accordion-core` to the
//! browser DOM. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `registry`: the page-wide `<style>` element behind `StyleRegistry`
//! - `dom`: sibling walking over block holders, attribute and property helpers
//! - `header`: the header element the block renders
//! - `popover`: the transient settings popover and its outside-click listener
//!
//! # Re-exports
//!
//! This crate re-exports `editorjs-accordion-core` for convenience, so consumers
//! only need to depend on `editorjs-accordion-browser`.

// Re-export core crate
pub use editorjs_accordion_core;
pub use editorjs_accordion_core::*;

pub mod dom;
pub mod header;
pub mod popover;
pub mod registry;

pub use dom::{DomBlock, mark_boundary, set_class, set_run_property};
pub use header::{HeaderOptions, HeaderView};
pub use popover::{PopoverCallbacks, PopoverOptions, SettingsPopover};
pub use registry::{DomStyleRegistry, STYLE_ELEMENT_ID};
