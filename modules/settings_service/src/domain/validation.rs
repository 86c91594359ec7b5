//! Key format and JSON Schema validation for setting values

use crate::contract::SettingsError;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const MAX_KEY_LEN: usize = 128;

// Literal pattern; compiling it cannot fail
#[allow(clippy::expect_used)]
static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)*$").expect("valid regex"));

/// Keys are dotted lowercase identifiers, e.g. `ai.default_provider`
pub fn validate_key(key: &str) -> Result<(), SettingsError> {
    if key.is_empty() {
        return Err(SettingsError::validation("setting key cannot be empty"));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(SettingsError::validation(format!(
            "setting key is longer than {} characters",
            MAX_KEY_LEN
        )));
    }
    if !KEY_PATTERN.is_match(key) {
        return Err(SettingsError::validation(format!(
            "setting key '{}' must be dot-separated segments of a-z, 0-9 and '_'",
            key
        )));
    }
    Ok(())
}

/// Compile a schema, rejecting documents that are not valid JSON Schema
pub fn compile_schema(schema: &Value) -> Result<Validator, SettingsError> {
    Validator::new(schema).map_err(|e| SettingsError::validation(format!("Invalid JSON Schema: {}", e)))
}

/// Validate a setting value against a JSON Schema, collecting every violation
pub fn validate_against_schema(value: &Value, schema: &Value) -> Result<(), SettingsError> {
    let validator = compile_schema(schema)?;
    let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SettingsError::SchemaValidation { errors })
    }
}
