//! The host port.
//!
//! Everything the pipeline reads from the host document goes through
//! [`VariableHost`]. All reads are awaited one at a time; implementations do
//! not need to be `Send` or reentrant.

use varex_model::{DocumentInfo, Variable, VariableCollection};

/// A failed host read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Host error: {message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Read-only access to the host's variables.
///
/// Lookups return `Ok(None)` when the referenced object does not exist and
/// `Err` when the lookup itself failed.
#[allow(async_fn_in_trait)]
pub trait VariableHost {
    /// Every local variable in the current document, in host order.
    async fn local_variables(&self) -> Result<Vec<Variable>, HostError>;

    async fn variable_by_id(&self, id: &str) -> Result<Option<Variable>, HostError>;

    async fn collection_by_id(&self, id: &str) -> Result<Option<VariableCollection>, HostError>;

    fn document(&self) -> DocumentInfo;
}

impl<H: VariableHost + ?Sized> VariableHost for &H {
    async fn local_variables(&self) -> Result<Vec<Variable>, HostError> {
        (**self).local_variables().await
    }

    async fn variable_by_id(&self, id: &str) -> Result<Option<Variable>, HostError> {
        (**self).variable_by_id(id).await
    }

    async fn collection_by_id(&self, id: &str) -> Result<Option<VariableCollection>, HostError> {
        (**self).collection_by_id(id).await
    }

    fn document(&self) -> DocumentInfo {
        (**self).document()
    }
}
