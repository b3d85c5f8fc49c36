//! Varex Code Generator
//!
//! Turns an organized export into the plugin's three outputs: a JSON dump,
//! a CSS custom-properties stylesheet, and an on-canvas style guide. The
//! [`plugin`] module wires them to the host's message protocol.
//!
//! ```text
//! OrganizedExport → json::download()        → DownloadFile (application/json)
//!                 → css::download()         → DownloadFile (text/plain)
//!                 → style_guide::render()   → Canvas
//! ```

pub mod css;
pub mod json;
pub mod names;
pub mod plugin;
pub mod style_guide;

use serde::{Deserialize, Serialize};
use varex_model::ResolvedValue;

pub use css::CssExportOptions;
pub use plugin::{InboundMessage, OutboundMessage, Plugin, PluginEvent, Summary};
pub use style_guide::{Canvas, RenderError, StyleNode};

pub const MIME_JSON: &str = "application/json";
pub const MIME_TEXT: &str = "text/plain";

/// A generated file handed to the UI for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFile {
    pub filename: String,
    pub content: String,
    pub mime_type: String,
}

/// Code generation error.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Codegen error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Codegen error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render an optional value the way the host stringifies it (`null` when absent).
pub fn js_string(value: Option<&ResolvedValue>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "null".into(),
    }
}
