use std::collections::BTreeMap;

use serde_json::{Value, json};
use tracing::debug;

use crate::document::DocumentRef;
use crate::value::IndexValue;

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Path unwound when the `$unwind` stage does not name one as `"$path"`.
pub const DEFAULT_UNWIND_PATH: &str = "schedule_details.days";

#[derive(Debug, Clone)]
pub enum Stage {
    Unwind(String),
    Group,
    Unrecognized,
}

/// The one aggregation shape the store evaluates: unwind an array path,
/// then group by the unwound value.
#[derive(Debug, Clone)]
pub enum Pipeline {
    DistinctValues { path: String },
    Unsupported,
}

/// Classify a stage by its keys. `$unwind` wins when both are present.
fn parse_stage(stage: &Value) -> Stage {
    let Some(obj) = stage.as_object() else {
        return Stage::Unrecognized;
    };
    if let Some(body) = obj.get("$unwind") {
        let path = parse_unwind(body).unwrap_or_else(|| DEFAULT_UNWIND_PATH.to_string());
        return Stage::Unwind(path);
    }
    if obj.contains_key("$group") {
        return Stage::Group;
    }
    Stage::Unrecognized
}

fn has_group(stage: &Value) -> bool {
    stage.as_object().is_some_and(|obj| obj.contains_key("$group"))
}

fn parse_unwind(val: &Value) -> Option<String> {
    let path = match val {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("path")?.as_str()?,
        _ => return None,
    };
    path.strip_prefix('$')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

impl Pipeline {
    pub fn parse(pipeline: &Value) -> Self {
        let Some(stages) = pipeline.as_array() else {
            return Pipeline::Unsupported;
        };
        if stages.len() < 2 {
            return Pipeline::Unsupported;
        }
        // Stages past the group are not evaluated.
        match parse_stage(&stages[0]) {
            Stage::Unwind(path) if has_group(&stages[1]) => Pipeline::DistinctValues { path },
            _ => Pipeline::Unsupported,
        }
    }

    /// Evaluate over documents in scan order.
    ///
    /// Returns one `{"_id": value}` record per distinct value, sorted
    /// ascending. An unsupported pipeline yields no records.
    pub fn execute<'a, I>(&self, docs: I) -> Vec<Value>
    where
        I: IntoIterator<Item = DocumentRef<'a>>,
    {
        let Pipeline::DistinctValues { path } = self else {
            debug!("unsupported pipeline shape, returning no results");
            return Vec::new();
        };

        let mut distinct: BTreeMap<IndexValue, Value> = BTreeMap::new();
        for doc in docs {
            for item in unwind(doc.get_field(path)) {
                distinct
                    .entry(IndexValue::from_json(item))
                    .or_insert_with(|| item.clone());
            }
        }
        distinct
            .into_values()
            .map(|value| json!({ "_id": value }))
            .collect()
    }
}

/// Values an `$unwind` produces for one document. Missing, `null` and
/// empty arrays produce nothing; a scalar produces itself.
fn unwind(field: Option<&Value>) -> Vec<&Value> {
    match field {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(arr)) => arr.iter().collect(),
        Some(other) => vec![other],
    }
}
