use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::BinderyConfig;

/// JSON schema for `bindery.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(BinderyConfig);
    let metadata = schema.schema.metadata();
    metadata.title = Some("bindery.toml".to_owned());
    metadata.description =
        Some("Configuration for the bindery resolution engine and its logging.".to_owned());
    schema
}
