use serde_json::{Map, Value};
use tracing::debug;

use crate::document::ID_FIELD;
use crate::value::values_equal;

#[derive(Debug, Clone)]
pub enum UpdateOp {
    Push { path: String, value: Value },
    Pull { path: String, value: Value },
}

/// Parse an update specification into an ordered list of operations.
///
/// All `$push` entries come first, then all `$pull` entries; fields keep
/// the order in which they were given. Unknown operators and non-object
/// operator bodies are skipped.
pub fn parse_update(update: &Value) -> Vec<UpdateOp> {
    let Some(obj) = update.as_object() else {
        debug!("update is not an object, nothing to apply");
        return Vec::new();
    };

    for op in obj.keys() {
        if op != "$push" && op != "$pull" {
            debug!(%op, "ignoring unsupported update operator");
        }
    }

    let mut ops = Vec::new();
    if let Some(fields) = obj.get("$push").and_then(Value::as_object) {
        for (path, value) in fields {
            ops.push(UpdateOp::Push {
                path: path.clone(),
                value: value.clone(),
            });
        }
    }
    if let Some(fields) = obj.get("$pull").and_then(Value::as_object) {
        for (path, value) in fields {
            ops.push(UpdateOp::Pull {
                path: path.clone(),
                value: value.clone(),
            });
        }
    }
    ops
}

/// Apply parsed operations to a stored document body, in place.
pub fn apply_update(body: &mut Map<String, Value>, ops: &[UpdateOp]) {
    for op in ops {
        match op {
            UpdateOp::Push { path, value } => apply_push(body, path, value),
            UpdateOp::Pull { path, value } => apply_pull(body, path, value),
        }
    }
}

// ---------------------------------------------------------------------------
// Array operators
// ---------------------------------------------------------------------------

fn apply_push(body: &mut Map<String, Value>, path: &str, value: &Value) {
    let Some(slot) = field_slot(body, path) else {
        return;
    };
    match slot {
        Value::Array(arr) => arr.push(value.clone()),
        other => *other = Value::Array(vec![value.clone()]),
    }
}

fn apply_pull(body: &mut Map<String, Value>, path: &str, match_val: &Value) {
    if let Some(Value::Array(arr)) = existing_field(body, path) {
        arr.retain(|el| !values_equal(el, match_val));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mutable slot for `path`, creating intermediate objects and a `null`
/// leaf as needed. `None` for the identity field or when an intermediate
/// segment holds a non-object value.
fn field_slot<'a>(body: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts[0] == ID_FIELD {
        return None;
    }
    let (last, parents) = parts.split_last()?;
    let mut current = body;
    for part in parents {
        let next = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = next.as_object_mut()?;
    }
    Some(current.entry(last.to_string()).or_insert(Value::Null))
}

fn existing_field<'a>(body: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let mut parts = path.split('.');
    let mut current = body.get_mut(parts.next()?)?;
    for part in parts {
        current = current.as_object_mut()?.get_mut(part)?;
    }
    Some(current)
}
