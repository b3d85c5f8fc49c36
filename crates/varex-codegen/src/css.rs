//! CSS code generator.
//!
//! Serializes an organized export as CSS custom properties: a `:root` block
//! for the flat view or a single mode, or one `[data-mode="…"]` block per mode.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use varex_model::{ModeSelection, OrganizedExport, ResolvedValue, TypeGroups, VariableType};

use crate::names::{clean_variable_name, sanitize_file_name};
use crate::{js_string, DownloadFile, MIME_TEXT};

const BANNER: &str = "Figma Variables Export";

/// Options for CSS export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CssExportOptions {
    pub use_prefix: bool,
    pub prefix: String,
    /// Emit a comment header before each type's declarations.
    pub group_by_collection: bool,
    pub remove_duplicate_words: bool,
    pub mode: ModeSelection,
}

impl Default for CssExportOptions {
    fn default() -> Self {
        Self {
            use_prefix: false,
            prefix: String::new(),
            group_by_collection: true,
            remove_duplicate_words: true,
            mode: ModeSelection::Default,
        }
    }
}

impl CssExportOptions {
    fn active_prefix(&self) -> &str {
        if self.use_prefix {
            &self.prefix
        } else {
            ""
        }
    }
}

/// Generate a stylesheet stamped with the current time.
pub fn generate(export: &OrganizedExport, options: &CssExportOptions) -> String {
    generate_at(export, options, Utc::now())
}

/// Generate a stylesheet stamped with `generated_at`.
pub fn generate_at(
    export: &OrganizedExport,
    options: &CssExportOptions,
    generated_at: DateTime<Utc>,
) -> String {
    let mut css = format!("/* {BANNER} */\n");
    css.push_str(&format!(
        "/* Generated on {} */\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));

    let groups = match &options.mode {
        ModeSelection::Named(mode) => match export.mode_groups(mode) {
            Some(groups) => {
                css.push_str(&format!("/* Mode: {mode} */\n"));
                groups
            }
            None => &export.variables_by_type,
        },
        ModeSelection::All => match &export.variables_by_mode {
            Some(by_mode) => {
                css.push_str("/* All Modes */\n\n");
                for (mode, groups) in by_mode {
                    css.push_str(&format!("/* Mode: {mode} */\n"));
                    css.push_str(&format!("[data-mode=\"{mode}\"] {{\n"));
                    write_declarations(&mut css, groups, options);
                    css.push_str("}\n\n");
                }
                return css;
            }
            None => &export.variables_by_type,
        },
        ModeSelection::Default => &export.variables_by_type,
    };

    css.push_str("\n:root {\n");
    write_declarations(&mut css, groups, options);
    css.push_str("}\n");
    css
}

fn write_declarations(out: &mut String, groups: &TypeGroups, options: &CssExportOptions) {
    let prefix = options.active_prefix();

    for (ty, bucket) in groups {
        if options.group_by_collection {
            out.push_str(&format!("  /* {ty} */\n"));
        }

        for variable in &bucket.variables {
            let name = clean_variable_name(&variable.name, prefix, options.remove_duplicate_words);
            let value = format_css_value(variable.value.as_ref(), &variable.ty);
            out.push_str(&format!("  --{name}: {value};\n"));
        }

        if options.group_by_collection {
            out.push('\n');
        }
    }
}

/// Render a resolved value as a CSS value for its declared type.
///
/// Strings are quoted without escaping; an embedded `"` yields invalid CSS.
pub fn format_css_value(value: Option<&ResolvedValue>, ty: &VariableType) -> String {
    match ty {
        VariableType::Color => match value.and_then(ResolvedValue::hex) {
            Some(hex) => hex.to_string(),
            None => js_string(value),
        },
        VariableType::Float => js_string(value),
        VariableType::Boolean => {
            if value.is_some_and(ResolvedValue::is_truthy) {
                "true".into()
            } else {
                "false".into()
            }
        }
        VariableType::String | VariableType::Other(_) => format!("\"{}\"", js_string(value)),
    }
}

/// Build the CSS download for an export.
pub fn download(export: &OrganizedExport, options: &CssExportOptions) -> DownloadFile {
    let mut filename = format!("{}_variables", sanitize_file_name(&export.metadata.file_name));
    match &options.mode {
        ModeSelection::Named(mode) => {
            filename.push('_');
            filename.push_str(&sanitize_file_name(mode));
        }
        ModeSelection::All => filename.push_str("_all_modes"),
        ModeSelection::Default => {}
    }
    filename.push_str(".css");

    DownloadFile {
        filename,
        content: generate(export, options),
        mime_type: MIME_TEXT.into(),
    }
}
