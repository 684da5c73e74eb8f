//! Error types for the accordion block.
//!
//! Nothing here is fatal to the host: callers log these and continue with a
//! reduced visual state.

use miette::Diagnostic;

use crate::declarations::CssOverrideError;
use crate::settings::SettingsError;

/// Main error type for accordion operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum AccordionError {
    /// A configured style override is not a flat declaration list.
    #[error(transparent)]
    #[diagnostic(transparent)]
    StyleOverride(#[from] CssOverrideError),

    /// Settings input could not be applied.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Settings(#[from] SettingsError),

    /// Host configuration could not be decoded.
    #[error("invalid accordion config: {0}")]
    #[diagnostic(
        code(accordion::config),
        help("see the Config type for accepted fields; defaults are used instead")
    )]
    Config(String),

    /// Persisted block data could not be decoded.
    #[error("invalid accordion data: {0}")]
    #[diagnostic(code(accordion::data))]
    Data(String),
}

pub type Result<T, E = AccordionError> = std::result::Result<T, E>;
