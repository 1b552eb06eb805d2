//! Core contracts shared across Fixturist crates.
//!
//! This crate defines the type descriptors the generation engine walks
//! (`Shape`, `RecordShape`, `FieldShape`), the `Describe` capability that
//! produces them, zero values, and the qualified field-path helpers used as
//! the join key by every directive store.

pub mod describe;
pub mod error;
pub mod path;
pub mod shape;
pub mod types;
pub mod value;

pub use describe::Describe;
pub use error::{Error, Result};
pub use path::{PATH_SEPARATOR, qualified_path};
pub use shape::{FieldShape, RecordShape, Shape};
pub use types::PrimitiveKind;
pub use value::{Value, map_key, to_value};
