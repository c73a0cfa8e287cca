//! JSON merge patches for blocks (RFC 7396 semantics).
//!
//! Objects merge key by key, arrays and scalars replace, `null` removes.

use crate::block::Block;
use crate::validate::{validate, ValidationError};
use serde_json::Value;

/// Merge `patch` into a copy of `block` and validate the result
///
/// The original block is untouched; callers commit the returned block.
pub fn apply_patch(block: &Block, patch: &Value) -> Result<Block, ValidationError> {
    let Value::Object(fields) = patch else {
        return Err(ValidationError::PatchNotObject);
    };

    let mut current =
        serde_json::to_value(block).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    if let Some(id) = fields.get("id") {
        if id != &current["id"] {
            return Err(ValidationError::ImmutableField("id"));
        }
    }
    if let Some(tag) = fields.get("type") {
        if tag != &current["type"] {
            return Err(ValidationError::ImmutableField("type"));
        }
    }

    merge(&mut current, patch);

    let patched: Block =
        serde_json::from_value(current).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate(&patched)?;
    Ok(patched)
}

/// Deep-merge `patch` into `target`
pub fn merge(target: &mut Value, patch: &Value) {
    match patch {
        Value::Object(patch_fields) => {
            if !target.is_object() {
                *target = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(target_fields) = target {
                for (key, value) in patch_fields {
                    if value.is_null() {
                        target_fields.remove(key);
                    } else {
                        merge(
                            target_fields.entry(key.clone()).or_insert(Value::Null),
                            value,
                        );
                    }
                }
            }
        }
        other => *target = other.clone(),
    }
}
