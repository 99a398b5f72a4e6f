//! Declarative mapping from a nested source document to a flat field map.
//!
//! A [`MappingTable`] holds one [`FieldSpec`] per target field. Applying the
//! table to a document resolves every entry independently; a failing
//! transform skips its field and records a diagnostic instead of aborting
//! the whole record.

use serde_json::{Map, Value};
use tracing::warn;

use crate::{error::MappingError, path::resolve_path};

/// Named pure transform invoked with `(raw_value, full_document)`.
///
/// The raw value is `Value::Null` when the source path did not resolve, or
/// always for [`FieldSource::Multiple`] specs. Transforms must not mutate
/// either argument and must return `Value::Null` to omit the field.
pub type TransformFn = fn(&Value, &Value) -> Result<Value, MappingError>;

/// Where a target field's value comes from.
#[derive(Debug, Clone)]
pub enum FieldSource {
    /// A dotted path into the source document.
    Path(String),
    /// A literal value, independent of document content.
    Static(Value),
    /// Derived from the whole document by the spec's transform.
    Multiple,
}

/// Declarative rule describing how to derive one output field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Where the raw value comes from.
    pub source: FieldSource,
    /// Optional transform applied to the raw value.
    pub transform: Option<TransformFn>,
}

impl FieldSpec {
    /// Creates a spec that resolves a dotted path.
    pub fn path(path: impl Into<String>) -> Self {
        Self { source: FieldSource::Path(path.into()), transform: None }
    }

    /// Creates a spec that always yields a literal value.
    pub fn static_value(value: Value) -> Self {
        Self { source: FieldSource::Static(value), transform: None }
    }

    /// Creates a spec derived from the whole document by `transform`.
    pub fn multiple(transform: TransformFn) -> Self {
        Self { source: FieldSource::Multiple, transform: Some(transform) }
    }

    /// Attaches a transform to a path spec.
    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Ordered collection of field specifications for one target entity.
///
/// Iteration visits every entry in insertion order. Output order is
/// irrelevant to the CRM, but deterministic iteration keeps diagnostics
/// stable.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<(String, FieldSpec)>,
}

impl MappingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target field, consuming and returning the table.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.entries.push((name.into(), spec));
        self
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of target fields in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Diagnostic for a field skipped during mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// Target field name that was skipped.
    pub field: String,
    /// Why the field was skipped.
    pub message: String,
}

/// Result of applying a mapping table to a document.
#[derive(Debug, Clone, Default)]
pub struct MappedRecord {
    /// Flat map of target field name to resolved value.
    pub fields: Map<String, Value>,
    /// Fields skipped because their transform failed.
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl MappedRecord {
    /// Whether no field survived mapping.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Applies a mapping table to a source document.
///
/// Every entry is resolved independently; one failing transform never aborts
/// the rest. A resolved value is included only if it is not null, not an
/// empty string, and not an empty array. Falsy scalars (`0`, `false`) are
/// included as-is.
pub fn apply(document: &Value, table: &MappingTable) -> MappedRecord {
    let mut record = MappedRecord::default();

    for (name, spec) in table.iter() {
        match resolve_field(document, spec) {
            Ok(value) => {
                if !is_omitted(&value) {
                    record.fields.insert(name.to_string(), value);
                }
            },
            Err(e) => {
                warn!(field = name, error = %e, "field skipped during mapping");
                record
                    .diagnostics
                    .push(FieldDiagnostic { field: name.to_string(), message: e.to_string() });
            },
        }
    }

    record
}

/// Resolves one field specification against the document.
fn resolve_field(document: &Value, spec: &FieldSpec) -> Result<Value, MappingError> {
    match &spec.source {
        FieldSource::Static(value) => Ok(value.clone()),
        FieldSource::Multiple => match spec.transform {
            Some(transform) => transform(&Value::Null, document),
            None => Ok(Value::Null),
        },
        FieldSource::Path(path) => {
            let raw = resolve_path(document, path).cloned().unwrap_or(Value::Null);
            match spec.transform {
                Some(transform) => transform(&raw, document),
                None => Ok(raw),
            }
        },
    }
}

/// Whether a resolved value is omitted from the output record.
///
/// Null, empty string, and empty array are omitted; everything else,
/// including `0` and `false`, is kept.
fn is_omitted(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn upper(raw: &Value, _doc: &Value) -> Result<Value, MappingError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            _ => Err(MappingError::unexpected_type("string")),
        }
    }

    fn combine(_raw: &Value, doc: &Value) -> Result<Value, MappingError> {
        let a = resolve_path(doc, "a").and_then(Value::as_str).unwrap_or("-");
        let b = resolve_path(doc, "b").and_then(Value::as_str).unwrap_or("-");
        Ok(json!(format!("{a}/{b}")))
    }

    fn failing(_raw: &Value, _doc: &Value) -> Result<Value, MappingError> {
        Err(MappingError::transform("boom"))
    }

    #[test]
    fn static_field_ignores_document() {
        let table = MappingTable::new().field("SOURCE_ID", FieldSpec::static_value(json!("CALL")));

        let record = apply(&json!({"anything": "else"}), &table);
        assert_eq!(record.fields.get("SOURCE_ID"), Some(&json!("CALL")));

        let record = apply(&json!({}), &table);
        assert_eq!(record.fields.get("SOURCE_ID"), Some(&json!("CALL")));
    }

    #[test]
    fn path_field_resolves_without_transform() {
        let table = MappingTable::new().field("NAME", FieldSpec::path("contact.name"));
        let record = apply(&json!({"contact": {"name": "Ann"}}), &table);
        assert_eq!(record.fields.get("NAME"), Some(&json!("Ann")));
    }

    #[test]
    fn path_field_applies_transform() {
        let table =
            MappingTable::new().field("NAME", FieldSpec::path("contact.name").with_transform(upper));
        let record = apply(&json!({"contact": {"name": "ann"}}), &table);
        assert_eq!(record.fields.get("NAME"), Some(&json!("ANN")));
    }

    #[test]
    fn multiple_field_combines_paths() {
        let table = MappingTable::new().field("BOTH", FieldSpec::multiple(combine));
        let record = apply(&json!({"a": "x", "b": "y"}), &table);
        assert_eq!(record.fields.get("BOTH"), Some(&json!("x/y")));
    }

    #[test]
    fn multiple_field_without_transform_is_omitted() {
        let spec = FieldSpec { source: FieldSource::Multiple, transform: None };
        let table = MappingTable::new().field("EMPTY", spec);
        let record = apply(&json!({}), &table);
        assert!(record.is_empty());
        assert!(record.diagnostics.is_empty());
    }

    #[test]
    fn missing_path_is_omitted_not_an_error() {
        let table =
            MappingTable::new().field("NAME", FieldSpec::path("call.agreements.client_name"));
        let record = apply(&json!({"call": {}}), &table);
        assert!(record.is_empty());
        assert!(record.diagnostics.is_empty());
    }

    #[test]
    fn failing_transform_skips_field_and_continues() {
        let table = MappingTable::new()
            .field("BAD", FieldSpec::path("contact.name").with_transform(failing))
            .field("GOOD", FieldSpec::static_value(json!("kept")));

        let record = apply(&json!({"contact": {"name": "Ann"}}), &table);

        assert_eq!(record.fields.get("GOOD"), Some(&json!("kept")));
        assert!(!record.fields.contains_key("BAD"));
        assert_eq!(record.diagnostics.len(), 1);
        assert_eq!(record.diagnostics[0].field, "BAD");
        assert!(record.diagnostics[0].message.contains("boom"));
    }

    #[test]
    fn empty_string_and_empty_array_are_omitted() {
        let table = MappingTable::new()
            .field("EMPTY_STR", FieldSpec::static_value(json!("")))
            .field("EMPTY_LIST", FieldSpec::static_value(json!([])));
        let record = apply(&json!({}), &table);
        assert!(record.is_empty());
    }

    #[test]
    fn falsy_scalars_are_included() {
        let table = MappingTable::new()
            .field("ZERO", FieldSpec::static_value(json!(0)))
            .field("NO", FieldSpec::static_value(json!(false)));
        let record = apply(&json!({}), &table);
        assert_eq!(record.fields.get("ZERO"), Some(&json!(0)));
        assert_eq!(record.fields.get("NO"), Some(&json!(false)));
    }

    #[test]
    fn apply_is_idempotent() {
        let table = MappingTable::new()
            .field("NAME", FieldSpec::path("contact.name").with_transform(upper))
            .field("BOTH", FieldSpec::multiple(combine))
            .field("SOURCE_ID", FieldSpec::static_value(json!("CALL")));
        let doc = json!({"contact": {"name": "ann"}, "a": "x", "b": "y"});

        let first = apply(&doc, &table);
        let second = apply(&doc, &table);
        assert_eq!(first.fields, second.fields);
    }

    #[test]
    fn duplicate_target_names_last_write_wins() {
        let table = MappingTable::new()
            .field("NAME", FieldSpec::static_value(json!("first")))
            .field("NAME", FieldSpec::static_value(json!("second")));
        let record = apply(&json!({}), &table);
        assert_eq!(record.fields.get("NAME"), Some(&json!("second")));
    }
}
