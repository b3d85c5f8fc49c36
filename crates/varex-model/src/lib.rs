//! Varex Model
//!
//! Data types shared by every stage of the variable export pipeline:
//! host variables with their raw per-mode values, resolved values,
//! and the organized export structure handed to the serializers.
//! Also home of the color codec.
//!
//! ```text
//! Variable { valuesByMode: RawValue } → resolve → ResolvedValue → OrganizedExport
//! ```
//!
//! # Example
//!
//! ```
//! use varex_model::rgb_to_hex;
//!
//! assert_eq!(rgb_to_hex(1.0, 0.0, 0.0, None), "#ff0000");
//! ```

pub mod color;
pub mod export;
pub mod value;
pub mod variable;

pub use color::rgb_to_hex;
pub use export::{
    ExportedVariable, Metadata, ModeSelection, OrganizedExport, TypeBucket, TypeGroups,
};
pub use value::{format_number, AliasRef, ColorValue, RawValue, ResolvedValue, Rgba, VariableType};
pub use variable::{DocumentInfo, Mode, Variable, VariableCollection};

/// Mode name used when a mode id cannot be found in its collection.
pub const UNKNOWN_MODE: &str = "Unknown Mode";
