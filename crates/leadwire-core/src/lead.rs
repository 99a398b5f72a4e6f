//! Production mapping table for CRM leads.

use serde_json::json;

use crate::{
    mapping::{FieldSpec, MappingTable},
    transforms,
};

/// Builds the mapping table for lead creation.
///
/// One entry per CRM lead field. Transforms are the named functions in
/// [`crate::transforms`]; the table itself carries no logic.
pub fn lead_mapping() -> MappingTable {
    MappingTable::new()
        .field("TITLE", FieldSpec::static_value(json!("Call-center lead")))
        .field(
            "NAME",
            FieldSpec::path("call.agreements.client_name").with_transform(transforms::client_name),
        )
        .field("PHONE", FieldSpec::path("contact.phone").with_transform(transforms::phone_entries))
        .field("SOURCE_ID", FieldSpec::static_value(json!("CALL")))
        .field("COMMENTS", FieldSpec::multiple(transforms::call_summary))
}
