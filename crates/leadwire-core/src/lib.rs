//! Field-mapping engine for webhook-to-CRM transforms.
//!
//! Provides the declarative mapping table, the dotted-path resolver, and the
//! named transform functions used to turn a nested call-center payload into
//! the flat field map the CRM lead API expects. All other crates depend on
//! these types; nothing here performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod lead;
pub mod mapping;
pub mod path;
pub mod transforms;

pub use error::MappingError;
pub use lead::lead_mapping;
pub use mapping::{apply, FieldDiagnostic, FieldSource, FieldSpec, MappedRecord, MappingTable};
pub use path::resolve_path;
