//! Variable values.
//!
//! Host values enter the pipeline as a closed union ([`RawValue`]) and leave
//! it fully dereferenced ([`ResolvedValue`]). Both serialize untagged so the
//! JSON output matches the host's own value shapes. Shapes the union does not
//! know (`null`, partial colors, newer object types) are carried as
//! `Other` instead of failing the whole document.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::color::rgb_to_hex;

/// Declared type of a variable.
///
/// Unknown type names are kept verbatim in [`VariableType::Other`] so newer
/// host types pass through the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableType {
    Color,
    Float,
    String,
    Boolean,
    Other(String),
}

impl VariableType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Color => "COLOR",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for VariableType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "COLOR" => Self::Color,
            "FLOAT" => Self::Float,
            "STRING" => Self::String,
            "BOOLEAN" => Self::Boolean,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for VariableType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<VariableType> for String {
    fn from(ty: VariableType) -> Self {
        match ty {
            VariableType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color literal with channels nominally in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(serialize_with = "serialize_number")]
    pub r: f64,
    #[serde(serialize_with = "serialize_number")]
    pub g: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_number"
    )]
    pub a: Option<f64>,
}

impl Rgba {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.r, self.g, self.b, self.a)
    }
}

/// Marker for the host's alias tag (`"type": "VARIABLE_ALIAS"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// A reference from one variable value to another variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRef {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: String,
}

impl AliasRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: AliasKind::VariableAlias,
            id: id.into(),
        }
    }
}

/// A value as stored by the host for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Alias(AliasRef),
    Color(Rgba),
    Boolean(bool),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    String(String),
    /// Anything else the host hands over, including `null`.
    Other(Value),
}

impl RawValue {
    pub fn alias(id: impl Into<String>) -> Self {
        Self::Alias(AliasRef::new(id))
    }

    /// `false`, `0`, `NaN`, the empty string and `null` count as "no value".
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Boolean(b) => !b,
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::String(s) => s.is_empty(),
            Self::Alias(_) | Self::Color(_) => false,
            Self::Other(value) => !json_truthy(value),
        }
    }
}

/// A formatted color: original channels plus their hex rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub rgb: Rgba,
    pub hex: String,
}

impl From<Rgba> for ColorValue {
    fn from(rgb: Rgba) -> Self {
        Self {
            hex: rgb.to_hex(),
            rgb,
        }
    }
}

/// A value with every alias dereferenced.
///
/// `Color` is a color literal under a `COLOR` declared type. A color literal
/// reaching any other declared type stays unformatted as `Rgba`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    Color(ColorValue),
    Rgba(Rgba),
    Boolean(bool),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    String(String),
    /// An unrecognized host value, passed through untouched.
    Other(Value),
}

impl ResolvedValue {
    pub fn hex(&self) -> Option<&str> {
        match self {
            Self::Color(color) => Some(&color.hex),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Color(_) | Self::Rgba(_) => true,
            Self::Other(value) => json_truthy(value),
        }
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => f.write_str(&color.hex),
            Self::Rgba(rgba) => f.write_str(&rgba.to_hex()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => f.write_str(s),
            Self::Other(value) => f.write_str(&js_display(value)),
        }
    }
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String conversion of an arbitrary host value.
fn js_display(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                item => js_display(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".into(),
    }
}

/// Format a number the way the host runtime prints it: integers without `.0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).into()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Largest integer a host number holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Serialize integral numbers without a fractional part, as the host does.
fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

fn serialize_optional_number<S: Serializer>(
    n: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match n {
        Some(n) => serialize_number(n, serializer),
        None => serializer.serialize_none(),
    }
}
