use serde_json::Value;

use crate::error::Result;

/// Why an insert left the collection unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document had no `_id`, a `null` one, or was not an object.
    MissingIdentity,
    /// A document with the same `_id` is already stored.
    DuplicateIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Collection operations shared by the embedded store and any remote
/// adapter.
///
/// Filters, updates and pipelines use the JSON query dialect understood by
/// [`crate::query`], [`crate::update`] and [`crate::pipeline`]. Mutating
/// operations take `&mut self`; callers sharing a store across threads
/// must serialize access themselves.
pub trait DocumentStore: Send {
    /// Number of stored documents.
    fn count(&self) -> Result<u64>;

    /// Point lookup by the `_id` entry of `filter`.
    fn find_one(&self, filter: &Value) -> Result<Option<Value>>;

    fn insert_one(&mut self, document: Value) -> Result<InsertOutcome>;

    /// Every document when `filter` is `None`, otherwise every match.
    fn find(&self, filter: Option<&Value>) -> Result<Vec<Value>>;

    /// Apply `update` to the document named by the `_id` entry of `filter`.
    fn update_one(&mut self, filter: &Value, update: &Value) -> Result<UpdateResult>;

    fn aggregate(&self, pipeline: &Value) -> Result<Vec<Value>>;
}
