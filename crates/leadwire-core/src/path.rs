//! Dotted-path resolution over JSON documents.
//!
//! Supports plain object traversal only. Array indexing is deliberately
//! unsupported; mapping tables that need values out of sequences do so
//! through a transform.

use serde_json::Value;

/// Path spellings reserved by the wire format of mapping tables.
///
/// These name field-source modes, never document keys, so the resolver
/// refuses them outright.
const RESERVED: [&str; 2] = ["static", "multiple"];

/// Resolves a dotted path (e.g. `"call.agreements.client_name"`) against a
/// document.
///
/// Returns `None` when any segment is missing, when an intermediate value is
/// not an object, when the path is empty, or when the path is a reserved
/// spelling. Missing intermediates short-circuit; resolution never panics.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() || RESERVED.contains(&path) {
        return None;
    }

    let mut current = document;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
