//! Host-owned variable data.
//!
//! Field names follow the host's document model (`resolvedType`,
//! `variableCollectionId`, `valuesByMode`) so snapshots taken inside the host
//! deserialize directly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{RawValue, VariableType};

/// A named design token with one raw value per mode.
///
/// `values_by_mode` keeps the host's enumeration order; the first entry is the
/// value used when another variable aliases this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(rename = "resolvedType", alias = "declaredType")]
    pub declared_type: VariableType,
    #[serde(default)]
    pub variable_collection_id: String,
    #[serde(default)]
    pub values_by_mode: IndexMap<String, RawValue>,
}

impl Variable {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        declared_type: VariableType,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            declared_type,
            variable_collection_id: collection_id.into(),
            values_by_mode: IndexMap::new(),
        }
    }

    /// Builder-style helper for attaching a value to a mode.
    pub fn with_value(mut self, mode_id: impl Into<String>, value: RawValue) -> Self {
        self.values_by_mode.insert(mode_id.into(), value);
        self
    }

    /// The value of the first mode in host order.
    pub fn first_value(&self) -> Option<&RawValue> {
        self.values_by_mode.values().next()
    }
}

/// A mode declared by a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: String,
    pub name: String,
}

/// A host-side grouping of variables defining the available modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCollection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modes: Vec<Mode>,
}

impl VariableCollection {
    pub fn mode_name(&self, mode_id: &str) -> Option<&str> {
        self.modes
            .iter()
            .find(|m| m.mode_id == mode_id)
            .map(|m| m.name.as_str())
    }
}

/// The current host document.
///
/// `key` is absent for documents that were never saved to the host's storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}
