//! The organized export structure.
//!
//! Built fresh for every export request and serialized as-is for the JSON
//! download, so field names and key order follow the wire format
//! (`metadata`, `variablesByType`, `variablesByMode`, optional `mode`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{ResolvedValue, VariableType};

/// One variable value as it appears in the export.
///
/// `mode` is set inside `variablesByMode` and absent in the flat
/// `variablesByType` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: VariableType,
    pub value: Option<ResolvedValue>,
    pub variable_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Variables of one type, with their count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeBucket {
    pub count: usize,
    pub variables: Vec<ExportedVariable>,
}

impl TypeBucket {
    pub fn push(&mut self, variable: ExportedVariable) {
        self.count += 1;
        self.variables.push(variable);
    }
}

/// Buckets keyed by variable type, in first-seen order.
pub type TypeGroups = IndexMap<VariableType, TypeBucket>;

/// Export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// ISO-8601 generation timestamp.
    pub export_date: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    pub total_variables: usize,
    /// Sorted, deduplicated mode names.
    pub modes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizedExport {
    pub metadata: Metadata,
    pub variables_by_type: TypeGroups,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables_by_mode: Option<IndexMap<String, TypeGroups>>,
    /// Set only on a copy narrowed to a single mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl OrganizedExport {
    /// Type groups for one mode, if that mode exists in the export.
    pub fn mode_groups(&self, mode: &str) -> Option<&TypeGroups> {
        self.variables_by_mode.as_ref()?.get(mode)
    }

    /// A copy whose `variables_by_type` is replaced by the groups of `mode`.
    pub fn narrowed_to_mode(&self, mode: &str) -> Option<Self> {
        let groups = self.mode_groups(mode)?.clone();
        Some(Self {
            metadata: self.metadata.clone(),
            variables_by_type: groups,
            variables_by_mode: self.variables_by_mode.clone(),
            mode: Some(mode.to_string()),
        })
    }

    /// Total number of entries in the flat view.
    pub fn flat_count(&self) -> usize {
        self.variables_by_type.values().map(|b| b.count).sum()
    }
}

/// Which slice of an export a serializer should emit.
///
/// On the wire this is an optional string: absent (or empty) selects the flat
/// view, `"all"` selects every mode, anything else names a mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ModeSelection {
    #[default]
    Default,
    All,
    Named(String),
}

impl From<Option<String>> for ModeSelection {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Self::Default,
            Some(name) if name.is_empty() => Self::Default,
            Some(name) if name == "all" => Self::All,
            Some(name) => Self::Named(name),
        }
    }
}

impl From<&str> for ModeSelection {
    fn from(value: &str) -> Self {
        Self::from(Some(value.to_string()))
    }
}

impl From<ModeSelection> for Option<String> {
    fn from(selection: ModeSelection) -> Self {
        match selection {
            ModeSelection::Default => None,
            ModeSelection::All => Some("all".into()),
            ModeSelection::Named(name) => Some(name),
        }
    }
}
