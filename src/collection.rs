use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::document::{DocumentId, DocumentRef, ID_FIELD, split_identity};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::query;
use crate::store::{DocumentStore, InsertOutcome, SkipReason, UpdateResult};
use crate::update;

struct StoredDocument {
    /// Identity as the caller supplied it; the map key is its ordered form.
    id: Value,
    body: Map<String, Value>,
}

/// In-memory collection keyed by `_id`, iterated in insertion order.
pub struct MemoryCollection {
    name: String,
    docs: IndexMap<DocumentId, StoredDocument>,
}

impl MemoryCollection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            docs: IndexMap::new(),
        }
    }

    /// Store `document` under its `_id`. Documents without an identity,
    /// or whose identity is already present, are dropped with a warning.
    pub fn insert(&mut self, document: Value) -> InsertOutcome {
        let Some((id, body)) = split_identity(document) else {
            warn!(collection = %self.name, "document has no _id, insert skipped");
            return InsertOutcome::Skipped(SkipReason::MissingIdentity);
        };
        let key = DocumentId::from_json(&id);
        if self.docs.contains_key(&key) {
            warn!(collection = %self.name, %id, "duplicate _id, insert skipped");
            return InsertOutcome::Skipped(SkipReason::DuplicateIdentity);
        }
        self.docs.insert(key, StoredDocument { id, body });
        InsertOutcome::Inserted
    }

    pub fn get_by_id(&self, id: &Value) -> Option<DocumentRef<'_>> {
        self.docs
            .get(&DocumentId::from_json(id))
            .map(|doc| DocumentRef::new(&doc.id, &doc.body))
    }

    /// Lazy traversal in insertion order.
    pub fn scan(&self) -> impl Iterator<Item = DocumentRef<'_>> {
        self.docs
            .values()
            .map(|doc| DocumentRef::new(&doc.id, &doc.body))
    }

    fn body_mut(&mut self, id: &Value) -> Option<&mut Map<String, Value>> {
        self.docs
            .get_mut(&DocumentId::from_json(id))
            .map(|doc| &mut doc.body)
    }
}

/// The `_id` entry of a point-operation filter.
fn identity_filter(filter: &Value) -> Option<&Value> {
    filter.as_object()?.get(ID_FIELD)
}

impl DocumentStore for MemoryCollection {
    fn count(&self) -> Result<u64> {
        Ok(self.docs.len() as u64)
    }

    fn find_one(&self, filter: &Value) -> Result<Option<Value>> {
        Ok(identity_filter(filter)
            .and_then(|id| self.get_by_id(id))
            .map(|doc| doc.to_value()))
    }

    fn insert_one(&mut self, document: Value) -> Result<InsertOutcome> {
        Ok(self.insert(document))
    }

    fn find(&self, filter: Option<&Value>) -> Result<Vec<Value>> {
        let Some(filter) = filter else {
            return Ok(self.scan().map(|doc| doc.to_value()).collect());
        };
        let filter = query::parse_filter(filter);
        Ok(self
            .scan()
            .filter(|doc| filter.matches(doc))
            .map(|doc| doc.to_value())
            .collect())
    }

    fn update_one(&mut self, filter: &Value, update: &Value) -> Result<UpdateResult> {
        let Some(id) = identity_filter(filter) else {
            debug!(collection = %self.name, "update filter has no _id, nothing matched");
            return Ok(UpdateResult::default());
        };
        let ops = update::parse_update(update);
        let Some(body) = self.body_mut(id) else {
            return Ok(UpdateResult::default());
        };
        update::apply_update(body, &ops);
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: 1,
        })
    }

    fn aggregate(&self, pipeline: &Value) -> Result<Vec<Value>> {
        Ok(Pipeline::parse(pipeline).execute(self.scan()))
    }
}
