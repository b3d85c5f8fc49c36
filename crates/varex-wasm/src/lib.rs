//! WASM bindings for the variable exporter.
//!
//! The plugin's main thread passes in two JS objects and the UI message:
//!
//! - `host`: `getLocalVariables()`, `getVariableById(id)`, `getCollectionById(id)`
//!   (each may return a value or a promise) and a `document` property `{ name, key }`.
//! - `canvas`: `loadFont({ family, style })` and `insert(node)`.
//!
//! `handleMessage()` resolves to the array of messages to post back to the UI.

use js_sys::{Function, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use varex_codegen::style_guide::FontName;
use varex_codegen::{Canvas, InboundMessage, OutboundMessage, Plugin, StyleNode};
use varex_model::{DocumentInfo, Variable, VariableCollection};
use varex_organizer::{HostError, Snapshot, VariableHost};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Handle one UI message against the live document.
///
/// Resolves to an array of outbound messages, in posting order.
#[wasm_bindgen(js_name = handleMessage)]
pub async fn handle_message(
    host: JsValue,
    canvas: JsValue,
    message: JsValue,
) -> Result<JsValue, JsError> {
    let message: InboundMessage =
        serde_wasm_bindgen::from_value(message).map_err(|e| JsError::new(&e.to_string()))?;
    debug!(?message, "handling plugin message");

    let plugin = Plugin::new(JsHost::new(host), JsCanvas::new(canvas));
    to_js(&plugin.handle(message).await)
}

/// Messages to post when the plugin opens.
#[wasm_bindgen]
pub async fn start(host: JsValue, canvas: JsValue) -> Result<JsValue, JsError> {
    let plugin = Plugin::new(JsHost::new(host), JsCanvas::new(canvas));
    to_js(&plugin.start().await)
}

/// Handle a JSON message against a JSON document snapshot.
///
/// Returns the outbound messages as a JSON array. There is no canvas, so
/// style guide requests report an error.
#[wasm_bindgen(js_name = handleSnapshotMessage)]
pub async fn handle_snapshot_message(
    snapshot: String,
    message: String,
) -> Result<String, JsError> {
    run_snapshot(&snapshot, &message).await.map_err(|e| JsError::new(&e))
}

/// Get the exporter version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

async fn run_snapshot(snapshot: &str, message: &str) -> Result<String, String> {
    let snapshot = Snapshot::from_json(snapshot).map_err(|e| e.to_string())?;
    let plugin = Plugin::new(snapshot, DetachedCanvas);
    let out = plugin.handle_json(message).await;
    serde_json::to_string(&out).map_err(|e| e.to_string())
}

fn to_js(messages: &[OutboundMessage]) -> Result<JsValue, JsError> {
    messages
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

// =============================================================================
// JS-backed ports
// =============================================================================

/// A host object living on the JS side.
struct JsHost {
    inner: JsValue,
}

impl JsHost {
    fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: &str,
        args: &[JsValue],
    ) -> Result<T, HostError> {
        let value = call(&self.inner, method, args).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| HostError::new(format!("{method} returned unexpected data: {e}")))
    }

    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        method: &str,
        id: &str,
    ) -> Result<Option<T>, HostError> {
        let value = call(&self.inner, method, &[JsValue::from_str(id)]).await?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| HostError::new(format!("{method} returned unexpected data: {e}")))
    }
}

impl VariableHost for JsHost {
    async fn local_variables(&self) -> Result<Vec<Variable>, HostError> {
        self.fetch("getLocalVariables", &[]).await
    }

    async fn variable_by_id(&self, id: &str) -> Result<Option<Variable>, HostError> {
        self.fetch_optional("getVariableById", id).await
    }

    async fn collection_by_id(&self, id: &str) -> Result<Option<VariableCollection>, HostError> {
        self.fetch_optional("getCollectionById", id).await
    }

    fn document(&self) -> DocumentInfo {
        let value = Reflect::get(&self.inner, &JsValue::from_str("document"))
            .unwrap_or(JsValue::UNDEFINED);
        match serde_wasm_bindgen::from_value(value) {
            Ok(document) => document,
            Err(e) => {
                warn!("host document info unreadable: {e}");
                DocumentInfo::default()
            }
        }
    }
}

/// A drawing surface living on the JS side.
struct JsCanvas {
    inner: JsValue,
}

impl JsCanvas {
    fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    async fn send<T: Serialize>(&self, method: &str, arg: &T) -> Result<(), HostError> {
        let arg = arg
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| HostError::new(e.to_string()))?;
        call(&self.inner, method, &[arg]).await?;
        Ok(())
    }
}

impl Canvas for JsCanvas {
    async fn load_font(&self, font: &FontName) -> Result<(), HostError> {
        self.send("loadFont", font).await
    }

    async fn insert(&self, root: &StyleNode) -> Result<(), HostError> {
        self.send("insert", root).await
    }
}

/// Stand-in canvas for snapshot sessions.
struct DetachedCanvas;

impl Canvas for DetachedCanvas {
    async fn load_font(&self, _font: &FontName) -> Result<(), HostError> {
        Ok(())
    }

    async fn insert(&self, _root: &StyleNode) -> Result<(), HostError> {
        Err(HostError::new("no canvas attached"))
    }
}

/// Call `target[method](...args)` and await the result if it is a promise.
async fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, HostError> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))
        .map_err(|e| HostError::new(js_message(&e)))?
        .dyn_into()
        .map_err(|_| HostError::new(format!("{method} is not a function")))?;

    let result = match args {
        [] => function.call0(target),
        [a] => function.call1(target, a),
        [a, b, ..] => function.call2(target, a, b),
    }
    .map_err(|e| HostError::new(js_message(&e)))?;

    match result.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .map_err(|e| HostError::new(js_message(&e))),
        Err(value) => Ok(value),
    }
}

fn js_message(error: &JsValue) -> String {
    if let Some(message) = error.as_string() {
        return message;
    }
    Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{error:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM): snapshot sessions only touch Rust code
    // =========================================================================

    const SNAPSHOT: &str = r#"{
        "document": {"name": "Tokens"},
        "collections": [
            {"id": "c", "name": "Theme", "modes": [{"modeId": "m1", "name": "Base"}]}
        ],
        "variables": [
            {
                "id": "v1",
                "name": "Brand/Blue",
                "resolvedType": "COLOR",
                "variableCollectionId": "c",
                "valuesByMode": {"m1": {"r": 0, "g": 0, "b": 1, "a": 1}}
            },
            {
                "id": "v2",
                "name": "Link",
                "resolvedType": "COLOR",
                "variableCollectionId": "c",
                "valuesByMode": {"m1": {"type": "VARIABLE_ALIAS", "id": "v1"}}
            }
        ]
    }"#;

    fn native_run(message: &str) -> serde_json::Value {
        let out = pollster::block_on(run_snapshot(SNAPSHOT, message)).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_get_variables() {
        let out = native_run(r#"{"type": "get-variables"}"#);
        assert_eq!(out[0]["count"], 2);
        assert_eq!(out[1]["type"], "variables-data");
        let colors = &out[1]["data"]["variablesByType"]["COLOR"];
        assert_eq!(colors["count"], 2);
        assert_eq!(colors["variables"][1]["name"], "Link");
        assert_eq!(colors["variables"][1]["value"]["hex"], "#0000ff");
    }

    #[test]
    fn test_export_css() {
        let out = native_run(r#"{"type": "export-css", "options": {"mode": "Base"}}"#);
        assert_eq!(out[1]["type"], "download-file");
        assert_eq!(out[1]["filename"], "Tokens_variables_Base.css");
        let content = out[1]["content"].as_str().unwrap();
        assert!(content.contains("/* Mode: Base */"));
        assert!(content.contains("  --link: #0000ff;"));
    }

    #[test]
    fn test_style_guide_without_canvas() {
        let out = native_run(
            r#"{"type": "create-style-guide", "data": {
                "metadata": {"exportDate": "", "fileName": "Tokens", "totalVariables": 0, "modes": []},
                "variablesByType": {}
            }}"#,
        );
        assert_eq!(
            out[0]["error"],
            "Failed to create style guide: Host error: no canvas attached"
        );
    }

    #[test]
    fn test_unexpected_value_keeps_export_alive() {
        let snapshot = r#"{
            "document": {"name": "Odd"},
            "variables": [
                {"id": "v1", "name": "gap", "resolvedType": "FLOAT", "valuesByMode": {"m": 8}},
                {"id": "v2", "name": "fill", "resolvedType": "COLOR",
                 "valuesByMode": {"m": {"r": 1, "g": 0}}}
            ]
        }"#;
        let out = pollster::block_on(run_snapshot(snapshot, r#"{"type": "export-css"}"#)).unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out[0]["count"], 2);
        let content = out[1]["content"].as_str().unwrap();
        assert!(content.contains("  --gap: 8;"));
        assert!(content.contains("  --fill: [object Object];"));
    }

    #[test]
    fn test_bad_snapshot() {
        let err = pollster::block_on(run_snapshot("not json", r#"{"type": "get-variables"}"#))
            .unwrap_err();
        assert!(err.starts_with("Invalid snapshot"));
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }
}
