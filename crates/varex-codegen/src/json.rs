//! JSON export.
//!
//! Pretty-prints an organized export, optionally narrowed to a single mode.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use varex_model::{ModeSelection, OrganizedExport};

use crate::names::sanitize_file_name;
use crate::{CodegenError, DownloadFile, MIME_JSON};

/// Indent used when the request gives none (or zero).
pub const DEFAULT_INDENT: usize = 2;

/// Widest indent honored; larger requests are capped.
pub const MAX_INDENT: usize = 10;

/// The export a mode selection refers to.
///
/// A named mode present in the export yields a narrowed copy; anything else
/// (including a named mode that does not exist) yields the full export.
pub fn select<'a>(export: &'a OrganizedExport, mode: &ModeSelection) -> Cow<'a, OrganizedExport> {
    match mode {
        ModeSelection::Named(name) => match export.narrowed_to_mode(name) {
            Some(narrowed) => Cow::Owned(narrowed),
            None => Cow::Borrowed(export),
        },
        ModeSelection::All | ModeSelection::Default => Cow::Borrowed(export),
    }
}

/// Serialize with `indent` spaces per level.
pub fn to_json(export: &OrganizedExport, indent: Option<usize>) -> Result<String, CodegenError> {
    let width = match indent {
        None | Some(0) => DEFAULT_INDENT,
        Some(n) => n.min(MAX_INDENT),
    };
    let pad = " ".repeat(width);

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(pad.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    export.serialize(&mut serializer)?;

    Ok(String::from_utf8(buf)?)
}

/// Build the JSON download for an export.
pub fn download(
    export: &OrganizedExport,
    indent: Option<usize>,
    mode: &ModeSelection,
) -> Result<DownloadFile, CodegenError> {
    let selected = select(export, mode);

    let mut filename = format!("{}_variables", sanitize_file_name(&export.metadata.file_name));
    if let Some(mode) = &selected.mode {
        filename.push('_');
        filename.push_str(&sanitize_file_name(mode));
    }
    filename.push_str(".json");

    Ok(DownloadFile {
        filename,
        content: to_json(&selected, indent)?,
        mime_type: MIME_JSON.into(),
    })
}
