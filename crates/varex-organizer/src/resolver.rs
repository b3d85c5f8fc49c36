//! Value resolver.
//!
//! Follows alias chains through the host until a literal is reached, then
//! formats that literal by the declared type of the variable that holds it.
//!
//! An alias target contributes the value of its *first* mode, whatever mode
//! the caller is resolving for. Chains are followed iteratively; a chain
//! longer than [`MAX_ALIAS_DEPTH`] (which is what a cycle looks like) resolves
//! to `None` with a warning.

use tracing::{error, warn};
use varex_model::{RawValue, ResolvedValue, VariableType};

use crate::host::VariableHost;

/// Maximum number of alias hops followed for a single value.
pub const MAX_ALIAS_DEPTH: usize = 32;

pub struct Resolver<'h, H> {
    host: &'h H,
}

impl<'h, H: VariableHost> Resolver<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Resolve a raw value declared as `ty`.
    ///
    /// Returns `None` for missing or falsy values, for alias targets the host
    /// cannot find, and for chains exceeding [`MAX_ALIAS_DEPTH`].
    pub async fn resolve(
        &self,
        value: Option<&RawValue>,
        ty: &VariableType,
    ) -> Option<ResolvedValue> {
        let mut current = value.cloned();
        let mut ty = ty.clone();
        let mut hops = 0;

        loop {
            let raw = match current {
                Some(raw) if !raw.is_falsy() => raw,
                _ => return None,
            };

            match raw {
                RawValue::Alias(alias) => {
                    if hops == MAX_ALIAS_DEPTH {
                        warn!(id = %alias.id, "alias chain exceeds {MAX_ALIAS_DEPTH} hops");
                        return None;
                    }
                    hops += 1;

                    let target = match self.host.variable_by_id(&alias.id).await {
                        Ok(Some(target)) => target,
                        Ok(None) => {
                            warn!(id = %alias.id, "could not resolve variable reference");
                            return None;
                        }
                        Err(e) => {
                            error!(id = %alias.id, "error resolving variable alias: {e}");
                            return None;
                        }
                    };

                    current = target.first_value().cloned();
                    ty = target.declared_type;
                }
                RawValue::Color(rgba) if ty == VariableType::Color => {
                    return Some(ResolvedValue::Color(rgba.into()));
                }
                RawValue::Other(value) => {
                    warn!(%ty, %value, "unexpected value format, passing it through");
                    return Some(ResolvedValue::Other(value));
                }
                literal => return pass_through(literal),
            }
        }
    }
}

/// A literal kept as-is under its declared type.
fn pass_through(raw: RawValue) -> Option<ResolvedValue> {
    match raw {
        RawValue::Alias(_) => None,
        RawValue::Color(rgba) => Some(ResolvedValue::Rgba(rgba)),
        RawValue::Boolean(b) => Some(ResolvedValue::Boolean(b)),
        RawValue::Number(n) => Some(ResolvedValue::Number(n)),
        RawValue::String(s) => Some(ResolvedValue::String(s)),
        RawValue::Other(value) => Some(ResolvedValue::Other(value)),
    }
}
