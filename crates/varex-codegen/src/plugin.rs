//! Plugin message dispatcher.
//!
//! Handles the messages the plugin UI sends and produces the messages it
//! expects back. Every request that needs variable data re-reads the host
//! and first emits a [`Summary`] of the fresh export, then its own response.
//! One message is handled at a time; the host serializes UI messages.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use varex_model::{ModeSelection, OrganizedExport};
use varex_organizer::{Organizer, VariableHost};

use crate::css::{self, CssExportOptions};
use crate::style_guide::{self, Canvas};
use crate::{json, DownloadFile};

/// A message from the plugin UI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    GetVariables,
    ExportJson {
        #[serde(default)]
        indent: Option<usize>,
        #[serde(default)]
        mode: ModeSelection,
    },
    ExportCss {
        #[serde(default)]
        options: CssExportOptions,
    },
    CreateStyleGuide {
        #[serde(default)]
        data: Option<OrganizedExport>,
    },
    #[serde(other)]
    Unknown,
}

/// Counts and data pushed to the UI after every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub export_data: OrganizedExport,
}

/// A typed response to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginEvent {
    VariablesData { data: OrganizedExport },
    DownloadFile(DownloadFile),
    StyleGuideCreated,
    Error { error: String },
}

/// A message to the plugin UI.
///
/// The summary carries no `type` field; every other message does.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Summary(Summary),
    Event(PluginEvent),
}

impl OutboundMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Event(PluginEvent::Error {
            error: message.into(),
        })
    }
}

pub struct Plugin<H, C> {
    host: H,
    canvas: C,
}

impl<H: VariableHost, C: Canvas> Plugin<H, C> {
    pub fn new(host: H, canvas: C) -> Self {
        Self { host, canvas }
    }

    /// Messages sent when the plugin opens.
    pub async fn start(&self) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        self.refresh(&mut out).await;
        out
    }

    /// Parse a JSON message and handle it.
    pub async fn handle_json(&self, source: &str) -> Vec<OutboundMessage> {
        match serde_json::from_str::<InboundMessage>(source) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                error!("invalid plugin message: {e}");
                vec![OutboundMessage::error(format!("Invalid message: {e}"))]
            }
        }
    }

    pub async fn handle(&self, message: InboundMessage) -> Vec<OutboundMessage> {
        let mut out = Vec::new();

        match message {
            InboundMessage::GetVariables => {
                if let Some(export) = self.refresh(&mut out).await {
                    out.push(OutboundMessage::Event(PluginEvent::VariablesData {
                        data: export,
                    }));
                }
            }
            InboundMessage::ExportJson { indent, mode } => {
                if let Some(export) = self.refresh(&mut out).await {
                    match json::download(&export, indent, &mode) {
                        Ok(file) => out.push(download(file)),
                        Err(e) => {
                            error!("error exporting JSON: {e}");
                            out.push(OutboundMessage::error(format!("Failed to export JSON: {e}")));
                        }
                    }
                }
            }
            InboundMessage::ExportCss { options } => {
                if let Some(export) = self.refresh(&mut out).await {
                    out.push(download(css::download(&export, &options)));
                }
            }
            InboundMessage::CreateStyleGuide { data: Some(data) } => {
                match style_guide::render(&self.canvas, &data).await {
                    Ok(()) => out.push(OutboundMessage::Event(PluginEvent::StyleGuideCreated)),
                    Err(e) => {
                        error!("error creating style guide: {e}");
                        out.push(OutboundMessage::error(format!(
                            "Failed to create style guide: {e}"
                        )));
                    }
                }
            }
            InboundMessage::CreateStyleGuide { data: None } => {
                out.push(OutboundMessage::error(
                    "No data received for style guide creation.",
                ));
            }
            InboundMessage::Unknown => debug!("ignoring unknown plugin message"),
        }

        out
    }

    /// Rebuild the export from the host and push its summary.
    async fn refresh(&self, out: &mut Vec<OutboundMessage>) -> Option<OrganizedExport> {
        match Organizer::new(&self.host).collect().await {
            Ok(export) => {
                debug!(count = export.metadata.total_variables, "refreshed variables");
                out.push(OutboundMessage::Summary(Summary {
                    count: export.metadata.total_variables,
                    export_data: export.clone(),
                }));
                Some(export)
            }
            Err(e) => {
                error!("error reading variables: {e}");
                out.push(OutboundMessage::error(format!("Failed to read variables: {e}")));
                None
            }
        }
    }
}

fn download(file: DownloadFile) -> OutboundMessage {
    OutboundMessage::Event(PluginEvent::DownloadFile(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_guide::{FontName, StyleNode};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use varex_model::{
        DocumentInfo, Mode, RawValue, Rgba, Variable, VariableCollection, VariableType,
    };
    use varex_organizer::{HostError, Snapshot};

    #[derive(Default)]
    struct RecordingCanvas {
        inserted: RefCell<Vec<String>>,
        broken: bool,
    }

    impl Canvas for RecordingCanvas {
        async fn load_font(&self, _font: &FontName) -> Result<(), HostError> {
            Ok(())
        }

        async fn insert(&self, root: &StyleNode) -> Result<(), HostError> {
            if self.broken {
                return Err(HostError::new("page is read-only"));
            }
            self.inserted.borrow_mut().push(root.name().to_string());
            Ok(())
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(DocumentInfo {
            name: "Brand Tokens".into(),
            key: None,
        })
        .with_collection(VariableCollection {
            id: "c".into(),
            name: "Theme".into(),
            modes: vec![
                Mode {
                    mode_id: "l".into(),
                    name: "Light".into(),
                },
                Mode {
                    mode_id: "d".into(),
                    name: "Dark Mode".into(),
                },
            ],
        })
        .with_variable(
            Variable::new("v1", "Color/Primary", VariableType::Color, "c")
                .with_value("l", RawValue::Color(Rgba::rgb(1.0, 0.0, 0.0)))
                .with_value("d", RawValue::Color(Rgba::rgb(0.5, 0.0, 0.0))),
        )
        .with_variable(
            Variable::new("v2", "Radius", VariableType::Float, "c")
                .with_value("l", RawValue::Number(4.0))
                .with_value("d", RawValue::Number(4.0)),
        )
    }

    fn plugin() -> Plugin<Snapshot, RecordingCanvas> {
        Plugin::new(snapshot(), RecordingCanvas::default())
    }

    fn run(plugin: &Plugin<Snapshot, RecordingCanvas>, message: &str) -> Vec<OutboundMessage> {
        pollster::block_on(plugin.handle_json(message))
    }

    fn file(message: &OutboundMessage) -> &DownloadFile {
        match message {
            OutboundMessage::Event(PluginEvent::DownloadFile(file)) => file,
            other => panic!("expected download, got {other:?}"),
        }
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    #[test]
    fn test_start_sends_summary() {
        let out = pollster::block_on(plugin().start());
        assert_eq!(out.len(), 1);
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["exportData"]["metadata"]["fileName"], "Brand Tokens");
        assert!(json.get("type").is_none());
    }

    #[test]
    fn test_get_variables() {
        let out = run(&plugin(), r#"{"type": "get-variables"}"#);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], OutboundMessage::Summary(_)));
        let json = serde_json::to_value(&out[1]).unwrap();
        assert_eq!(json["type"], "variables-data");
        assert_eq!(json["data"]["metadata"]["modes"][0], "Dark Mode");
    }

    #[test]
    fn test_host_failure_reported() {
        struct Offline;

        impl VariableHost for Offline {
            async fn local_variables(&self) -> Result<Vec<Variable>, HostError> {
                Err(HostError::new("document closed"))
            }

            async fn variable_by_id(&self, _id: &str) -> Result<Option<Variable>, HostError> {
                Ok(None)
            }

            async fn collection_by_id(
                &self,
                _id: &str,
            ) -> Result<Option<VariableCollection>, HostError> {
                Ok(None)
            }

            fn document(&self) -> DocumentInfo {
                DocumentInfo::default()
            }
        }

        let plugin = Plugin::new(Offline, RecordingCanvas::default());
        let out = pollster::block_on(plugin.handle(InboundMessage::GetVariables));
        assert_eq!(
            out,
            vec![OutboundMessage::error(
                "Failed to read variables: Host error: document closed"
            )]
        );
    }

    // =========================================================================
    // Exports
    // =========================================================================

    #[test]
    fn test_export_json_default() {
        let out = run(&plugin(), r#"{"type": "export-json"}"#);
        assert_eq!(out.len(), 2);
        let file = file(&out[1]);
        assert_eq!(file.filename, "Brand_Tokens_variables.json");
        assert_eq!(file.mime_type, "application/json");
        assert!(file.content.starts_with("{\n  \"metadata\""));
    }

    #[test]
    fn test_export_json_named_mode_with_indent() {
        let out = run(&plugin(), r#"{"type": "export-json", "indent": 4, "mode": "Dark Mode"}"#);
        let file = file(&out[1]);
        assert_eq!(file.filename, "Brand_Tokens_variables_Dark_Mode.json");
        assert!(file.content.starts_with("{\n    \"metadata\""));
        let value: serde_json::Value = serde_json::from_str(&file.content).unwrap();
        assert_eq!(value["mode"], "Dark Mode");
        assert_eq!(value["variablesByType"]["COLOR"]["variables"][0]["value"]["hex"], "#800000");
    }

    #[test]
    fn test_export_css_all_modes() {
        let out = run(
            &plugin(),
            r#"{"type": "export-css", "options": {"usePrefix": true, "prefix": "ds-",
                "groupByCollection": false, "removeDuplicateWords": true, "mode": "all"}}"#,
        );
        let file = file(&out[1]);
        assert_eq!(file.filename, "Brand_Tokens_variables_all_modes.css");
        assert_eq!(file.mime_type, "text/plain");
        assert!(file.content.contains("[data-mode=\"Dark Mode\"] {\n  --ds-color-primary: #800000;"));
        assert!(file.content.contains("[data-mode=\"Light\"] {\n  --ds-color-primary: #ff0000;"));
        assert!(file.content.contains("  --ds-radius: 4;"));
    }

    #[test]
    fn test_export_css_without_options_uses_defaults() {
        let out = run(&plugin(), r#"{"type": "export-css"}"#);
        let file = file(&out[1]);
        assert_eq!(file.filename, "Brand_Tokens_variables.css");
        assert!(file.content.contains("  /* COLOR */\n  --color-primary: #ff0000;"));
    }

    // =========================================================================
    // Style guide
    // =========================================================================

    #[test]
    fn test_create_style_guide() {
        let plugin = plugin();
        let export = pollster::block_on(Organizer::new(&plugin.host).collect()).unwrap();
        let out = pollster::block_on(plugin.handle(InboundMessage::CreateStyleGuide {
            data: Some(export),
        }));
        assert_eq!(out, vec![OutboundMessage::Event(PluginEvent::StyleGuideCreated)]);
        assert_eq!(
            *plugin.canvas.inserted.borrow(),
            vec!["Variable Style Guide - Brand Tokens".to_string()]
        );
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json, serde_json::json!({"type": "style-guide-created"}));
    }

    #[test]
    fn test_create_style_guide_without_data() {
        let out = run(&plugin(), r#"{"type": "create-style-guide"}"#);
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "error", "error": "No data received for style guide creation."})
        );
    }

    #[test]
    fn test_create_style_guide_render_failure() {
        let plugin = Plugin::new(
            snapshot(),
            RecordingCanvas {
                broken: true,
                ..Default::default()
            },
        );
        let export = pollster::block_on(Organizer::new(&plugin.host).collect()).unwrap();
        let out = pollster::block_on(plugin.handle(InboundMessage::CreateStyleGuide {
            data: Some(export),
        }));
        assert_eq!(
            out,
            vec![OutboundMessage::error(
                "Failed to create style guide: Host error: page is read-only"
            )]
        );
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn test_unknown_message_ignored() {
        assert!(run(&plugin(), r#"{"type": "resize", "width": 500}"#).is_empty());
    }

    #[test]
    fn test_malformed_message() {
        let out = run(&plugin(), "not json");
        assert!(matches!(
            &out[0],
            OutboundMessage::Event(PluginEvent::Error { error }) if error.starts_with("Invalid message")
        ));
    }

    #[test]
    fn test_parse_inbound() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"type": "export-json", "mode": "all"}"#).unwrap();
        assert_eq!(
            message,
            InboundMessage::ExportJson {
                indent: None,
                mode: ModeSelection::All,
            }
        );
    }
}
