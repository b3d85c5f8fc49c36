//! Varex Organizer
//!
//! Reads variables through the [`VariableHost`] port, dereferences alias
//! chains, and groups the results into an [`OrganizedExport`].
//!
//! ```text
//! VariableHost → Resolver → Organizer → OrganizedExport
//! ```
//!
//! [`OrganizedExport`]: varex_model::OrganizedExport

pub mod collate;
pub mod host;
pub mod organizer;
pub mod resolver;
pub mod snapshot;

pub use host::{HostError, VariableHost};
pub use organizer::Organizer;
pub use resolver::{Resolver, MAX_ALIAS_DEPTH};
pub use snapshot::{Snapshot, SnapshotError};
