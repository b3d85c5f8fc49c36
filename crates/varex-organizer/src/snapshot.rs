//! In-memory host.
//!
//! A [`Snapshot`] is a dump of the host's document, collections and variables.
//! It answers every [`VariableHost`] read immediately, which makes it the host
//! for offline exports and for tests.

use serde::{Deserialize, Serialize};
use varex_model::{DocumentInfo, Variable, VariableCollection};

use crate::host::{HostError, VariableHost};

/// Snapshot loading error.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub document: DocumentInfo,
    #[serde(default)]
    pub collections: Vec<VariableCollection>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Snapshot {
    pub fn new(document: DocumentInfo) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_collection(mut self, collection: VariableCollection) -> Self {
        self.collections.push(collection);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }
}

impl VariableHost for Snapshot {
    async fn local_variables(&self) -> Result<Vec<Variable>, HostError> {
        Ok(self.variables.clone())
    }

    async fn variable_by_id(&self, id: &str) -> Result<Option<Variable>, HostError> {
        Ok(self.variables.iter().find(|v| v.id == id).cloned())
    }

    async fn collection_by_id(&self, id: &str) -> Result<Option<VariableCollection>, HostError> {
        Ok(self.collections.iter().find(|c| c.id == id).cloned())
    }

    fn document(&self) -> DocumentInfo {
        self.document.clone()
    }
}
