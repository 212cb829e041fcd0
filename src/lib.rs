pub mod collection;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod password;
pub mod pipeline;
pub mod query;
pub mod seed;
pub mod store;
pub mod update;
pub mod value;

pub use collection::MemoryCollection;
pub use config::StoreConfig;
pub use document::DocumentId;
pub use engine::{BackendKind, Connector, Database};
pub use error::{Error, Result};
pub use store::{DocumentStore, InsertOutcome, SkipReason, UpdateResult};
