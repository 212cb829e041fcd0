use std::cmp::Ordering;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::document::DocumentRef;
use crate::value::{IndexValue, values_equal};

// ---------------------------------------------------------------------------
// Filter AST
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Clause {
    Equals(JsonValue),
    In(Vec<JsonValue>),
    Gte(IndexValue),
    Lte(IndexValue),
    /// Unknown operator or malformed operand. Never matches.
    Unsupported(String),
}

/// A parsed filter: every `(path, clause)` pair must hold.
#[derive(Debug, Clone)]
pub enum Filter {
    Conditions(Vec<(String, Clause)>),
    /// The filter was not an object; nothing matches it.
    Invalid,
}

// ---------------------------------------------------------------------------
// Parsing: JSON → Filter
// ---------------------------------------------------------------------------

pub fn parse_filter(filter: &JsonValue) -> Filter {
    let Some(obj) = filter.as_object() else {
        return Filter::Invalid;
    };

    let mut conditions = Vec::new();
    for (path, value) in obj {
        match value.as_object() {
            Some(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                if ops.keys().all(|k| k.starts_with('$')) {
                    for (op_key, op_val) in ops {
                        conditions.push((path.clone(), parse_op(op_key, op_val)));
                    }
                } else {
                    conditions.push((
                        path.clone(),
                        Clause::Unsupported("operator object mixes plain keys".into()),
                    ));
                }
            }
            // Plain objects and scalars are equality tests
            _ => conditions.push((path.clone(), Clause::Equals(value.clone()))),
        }
    }
    Filter::Conditions(conditions)
}

fn parse_op(op_key: &str, op_val: &JsonValue) -> Clause {
    match op_key {
        "$in" => match op_val.as_array() {
            Some(arr) => Clause::In(arr.clone()),
            None => Clause::Unsupported("$in must be an array".into()),
        },
        "$gte" => Clause::Gte(IndexValue::from_json(op_val)),
        "$lte" => Clause::Lte(IndexValue::from_json(op_val)),
        other => Clause::Unsupported(format!("unknown operator: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Filter {
    pub fn matches(&self, doc: &DocumentRef<'_>) -> bool {
        match self {
            Filter::Invalid => false,
            Filter::Conditions(conditions) => conditions.iter().all(|(path, clause)| {
                doc.get_field(path)
                    .is_some_and(|value| clause_holds(clause, value))
            }),
        }
    }
}

fn clause_holds(clause: &Clause, value: &JsonValue) -> bool {
    match clause {
        Clause::Equals(expected) => values_equal(value, expected),
        // At least one candidate present in the array suffices.
        Clause::In(candidates) => value.as_array().is_some_and(|items| {
            candidates
                .iter()
                .any(|c| items.iter().any(|item| values_equal(item, c)))
        }),
        Clause::Gte(bound) => matches!(
            IndexValue::from_json(value).compare(bound),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Clause::Lte(bound) => matches!(
            IndexValue::from_json(value).compare(bound),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Clause::Unsupported(reason) => {
            debug!(%reason, "unsupported filter clause treated as no match");
            false
        }
    }
}
