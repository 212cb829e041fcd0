use serde_json::{Map, Value};

use crate::value::IndexValue;

/// Name of the identity field of every collection.
pub const ID_FIELD: &str = "_id";

pub type DocumentId = IndexValue;

/// Borrowed view of a stored document.
///
/// The body never contains `_id`; the identity is kept beside it and
/// synthesized back on field resolution and materialization.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRef<'a> {
    pub id: &'a Value,
    pub body: &'a Map<String, Value>,
}

impl<'a> DocumentRef<'a> {
    pub fn new(id: &'a Value, body: &'a Map<String, Value>) -> Self {
        Self { id, body }
    }

    /// Access a nested field using dot notation: "schedule_details.days".
    ///
    /// Returns `None` when any segment is missing or the walk hits a
    /// non-object, which is not the same as a field holding `null`.
    pub fn get_field(&self, path: &str) -> Option<&'a Value> {
        let mut parts = path.split('.');
        let head = parts.next()?;
        let mut current = if head == ID_FIELD {
            self.id
        } else {
            self.body.get(head)?
        };
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Materialize the document with `_id` as its first field.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.body.len() + 1);
        map.insert(ID_FIELD.to_string(), self.id.clone());
        for (k, v) in self.body {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

/// Separate the identity from a document.
///
/// Returns `None` when the document is not an object or its `_id` is
/// absent or `null`.
pub fn split_identity(document: Value) -> Option<(Value, Map<String, Value>)> {
    let Value::Object(fields) = document else {
        return None;
    };
    let mut id = None;
    let mut body = Map::with_capacity(fields.len());
    for (key, value) in fields {
        if key == ID_FIELD {
            id = Some(value);
        } else {
            body.insert(key, value);
        }
    }
    match id {
        Some(Value::Null) | None => None,
        Some(id) => Some((id, body)),
    }
}
