use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde_json::Value as JsonValue;

/// JSON value with type-aware ordering.
///
/// Used as the identity key of stored documents and as the sort key of
/// aggregation output. Integers and floats share one numeric family, so
/// `1` and `1.0` are the same value. Arrays and objects are kept as a
/// canonical text (sorted keys, integral numbers without a fraction) and
/// sort after every scalar.
#[derive(Debug, Clone)]
pub enum IndexValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Composite(String),
}

impl Eq for IndexValue {}

impl Hash for IndexValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            IndexValue::Null => 0u8.hash(state),
            IndexValue::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            // Both numeric variants hash through f64 so equal numbers collide.
            IndexValue::Integer(i) => {
                2u8.hash(state);
                (*i as f64).to_bits().hash(state);
            }
            IndexValue::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            IndexValue::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            IndexValue::Composite(s) => {
                4u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl PartialEq for IndexValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for IndexValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use IndexValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,

            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Boolean(_), _) => Ordering::Less,
            (_, Boolean(_)) => Ordering::Greater,

            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(_) | Float(_), _) => Ordering::Less,
            (_, Integer(_) | Float(_)) => Ordering::Greater,

            (String(a), String(b)) => a.cmp(b),
            (String(_), _) => Ordering::Less,
            (_, String(_)) => Ordering::Greater,

            (Composite(a), Composite(b)) => a.cmp(b),
        }
    }
}

impl IndexValue {
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => IndexValue::Null,
            JsonValue::Bool(b) => IndexValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    IndexValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    IndexValue::Float(f)
                } else {
                    IndexValue::Null
                }
            }
            JsonValue::String(s) => IndexValue::String(s.clone()),
            other => {
                let mut text = String::new();
                write_canonical(other, &mut text);
                IndexValue::Composite(text)
            }
        }
    }

    /// Ordering restricted to a single type family.
    ///
    /// Range filters use this instead of `Ord`: a string is neither greater
    /// nor less than a number, so the comparison yields `None`.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        use IndexValue::*;
        match (self, other) {
            (Boolean(_), Boolean(_))
            | (Integer(_) | Float(_), Integer(_) | Float(_))
            | (String(_), String(_)) => Some(self.cmp(other)),
            _ => None,
        }
    }
}

/// Serialize `value` so that values equal under [`values_equal`] produce
/// the same text.
fn write_canonical(value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&JsonValue::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => out.push_str(&i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                out.push_str(&(f as i64).to_string())
            }
            _ => out.push_str(&n.to_string()),
        },
        other => out.push_str(&other.to_string()),
    }
}

/// Deep equality where numbers compare by numeric value (`2 == 2.0`).
pub fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (JsonValue::Array(xs), JsonValue::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (JsonValue::Object(xs), JsonValue::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}
