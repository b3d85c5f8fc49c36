//! Export organizer.
//!
//! Turns the host's flat variable list into an [`OrganizedExport`]:
//!
//! ```text
//! variables → mode names → resolve every (variable, mode) → bucket by mode/type
//!           → flat first-mode view by type → sort buckets → metadata
//! ```
//!
//! Every host read is awaited in sequence and nothing is cached between
//! requests.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use tracing::{debug, error};
use varex_model::{
    ExportedVariable, Metadata, OrganizedExport, TypeGroups, Variable, UNKNOWN_MODE,
};

use crate::collate::NameCollator;
use crate::host::{HostError, VariableHost};
use crate::resolver::Resolver;

pub struct Organizer<'h, H> {
    host: &'h H,
    resolver: Resolver<'h, H>,
}

impl<'h, H: VariableHost> Organizer<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            resolver: Resolver::new(host),
        }
    }

    /// Read every local variable from the host and organize it.
    pub async fn collect(&self) -> Result<OrganizedExport, HostError> {
        let variables = self.host.local_variables().await?;
        Ok(self.organize(&variables).await)
    }

    /// Organize `variables`, stamped with the current time.
    pub async fn organize(&self, variables: &[Variable]) -> OrganizedExport {
        self.organize_at(variables, Utc::now()).await
    }

    /// Organize `variables`, stamped with `exported_at`.
    pub async fn organize_at(
        &self,
        variables: &[Variable],
        exported_at: DateTime<Utc>,
    ) -> OrganizedExport {
        let (mode_names, modes) = self.discover_modes(variables).await;

        let mut by_type = TypeGroups::new();
        let mut by_mode: IndexMap<String, TypeGroups> = modes
            .iter()
            .map(|name| (name.clone(), TypeGroups::new()))
            .collect();
        let mut seen: HashSet<&str> = HashSet::new();

        for variable in variables {
            for (mode_id, raw) in &variable.values_by_mode {
                let mode = mode_names
                    .get(mode_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_MODE.to_string());

                let value = self
                    .resolver
                    .resolve(Some(raw), &variable.declared_type)
                    .await;

                let exported = ExportedVariable {
                    name: variable.name.clone(),
                    ty: variable.declared_type.clone(),
                    value,
                    variable_id: variable.id.clone(),
                    mode: Some(mode.clone()),
                };

                if seen.insert(variable.id.as_str()) {
                    by_type
                        .entry(variable.declared_type.clone())
                        .or_default()
                        .push(ExportedVariable {
                            mode: None,
                            ..exported.clone()
                        });
                }

                by_mode
                    .entry(mode)
                    .or_default()
                    .entry(variable.declared_type.clone())
                    .or_default()
                    .push(exported);
            }
        }

        let mut collator = NameCollator::new();
        sort_groups(&mut by_type, &mut collator);
        for groups in by_mode.values_mut() {
            sort_groups(groups, &mut collator);
        }

        let document = self.host.document();
        debug!(
            total = variables.len(),
            modes = ?modes,
            types = by_type.len(),
            "organized variables"
        );

        OrganizedExport {
            metadata: Metadata {
                export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                file_name: document.name,
                file_key: document.key,
                total_variables: variables.len(),
                modes,
            },
            variables_by_type: by_type,
            variables_by_mode: Some(by_mode),
            mode: None,
        }
    }

    /// Map every referenced mode id to its name through the owning collection.
    ///
    /// Returns the id → name map and the sorted set of names. Ids with no
    /// matching mode are left unmapped and contribute [`UNKNOWN_MODE`].
    async fn discover_modes(
        &self,
        variables: &[Variable],
    ) -> (HashMap<String, String>, Vec<String>) {
        let mut names: HashMap<String, String> = HashMap::new();
        let mut modes: BTreeSet<String> = BTreeSet::new();
        let mut unmapped = false;

        for variable in variables {
            for mode_id in variable.values_by_mode.keys() {
                if names.contains_key(mode_id) {
                    continue;
                }

                let collection = match self
                    .host
                    .collection_by_id(&variable.variable_collection_id)
                    .await
                {
                    Ok(collection) => collection,
                    Err(e) => {
                        error!(
                            collection = %variable.variable_collection_id,
                            "error reading variable collection: {e}"
                        );
                        None
                    }
                };

                match collection.as_ref().and_then(|c| c.mode_name(mode_id)) {
                    Some(name) => {
                        names.insert(mode_id.clone(), name.to_string());
                        modes.insert(name.to_string());
                    }
                    None => unmapped = true,
                }
            }
        }

        // An id unmapped early may still be mapped through a later variable.
        if unmapped
            && variables
                .iter()
                .flat_map(|v| v.values_by_mode.keys())
                .any(|id| !names.contains_key(id))
        {
            modes.insert(UNKNOWN_MODE.to_string());
        }

        (names, modes.into_iter().collect())
    }
}

fn sort_groups(groups: &mut TypeGroups, collator: &mut NameCollator) {
    for bucket in groups.values_mut() {
        bucket
            .variables
            .sort_by(|a, b| collator.compare(&a.name, &b.name));
    }
}
