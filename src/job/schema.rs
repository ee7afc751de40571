use anyhow::{anyhow, Result};
use jsonschema::JSONSchema;
use serde_json::Value;

/// included job description schema
static JOB_SCHEMA: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/job.json"));

pub fn load_schema() -> Result<JSONSchema> {
    let schema: Value = serde_json::from_str(JOB_SCHEMA)?;
    compile_schema(&schema)
}

fn compile_schema(schema: &Value) -> Result<JSONSchema> {
    JSONSchema::options()
        .compile(schema)
        .map_err(|err| anyhow!("Invalid job schema: {err}"))
}
