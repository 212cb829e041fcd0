use tracing::{info, warn};

use crate::collection::MemoryCollection;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::DocumentStore;

pub const ACTIVITIES: &str = "activities";
pub const TEACHERS: &str = "teachers";

/// Access to an external document database.
///
/// Implemented by driver adapters outside this crate. `ping` is called
/// exactly once, before any collection is opened.
pub trait Connector {
    fn ping(&self, config: &StoreConfig) -> Result<()>;

    fn open_collection(&self, config: &StoreConfig, name: &str) -> Result<Box<dyn DocumentStore>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    Memory,
}

/// The application's collections, backed either by the external database
/// or by in-memory collections. The choice is made once, on construction.
pub struct Database {
    backend: BackendKind,
    activities: Box<dyn DocumentStore>,
    teachers: Box<dyn DocumentStore>,
}

impl Database {
    /// Probe the external database and open its collections, or fall back
    /// to in-memory storage when any step fails.
    pub fn connect(config: &StoreConfig, connector: &dyn Connector) -> Self {
        match Self::open_remote(config, connector) {
            Ok(db) => {
                info!(uri = %config.uri, database = %config.database, "connected to document database");
                db
            }
            Err(e) => {
                warn!(uri = %config.uri, error = %e, "document database unavailable, using in-memory storage");
                Self::in_memory()
            }
        }
    }

    fn open_remote(config: &StoreConfig, connector: &dyn Connector) -> Result<Self> {
        connector.ping(config)?;
        Ok(Self {
            backend: BackendKind::Remote,
            activities: connector.open_collection(config, ACTIVITIES)?,
            teachers: connector.open_collection(config, TEACHERS)?,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            activities: Box::new(MemoryCollection::new(ACTIVITIES)),
            teachers: Box::new(MemoryCollection::new(TEACHERS)),
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn activities(&self) -> &dyn DocumentStore {
        self.activities.as_ref()
    }

    pub fn activities_mut(&mut self) -> &mut dyn DocumentStore {
        self.activities.as_mut()
    }

    pub fn teachers(&self) -> &dyn DocumentStore {
        self.teachers.as_ref()
    }

    pub fn teachers_mut(&mut self) -> &mut dyn DocumentStore {
        self.teachers.as_mut()
    }

    /// Look up a collection by name.
    pub fn collection(&self, name: &str) -> Result<&dyn DocumentStore> {
        match name {
            ACTIVITIES => Ok(self.activities()),
            TEACHERS => Ok(self.teachers()),
            _ => Err(Error::CollectionNotFound(name.to_string())),
        }
    }

    pub fn collection_mut(&mut self, name: &str) -> Result<&mut dyn DocumentStore> {
        match name {
            ACTIVITIES => Ok(self.activities_mut()),
            TEACHERS => Ok(self.teachers_mut()),
            _ => Err(Error::CollectionNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    struct Unreachable;

    impl Connector for Unreachable {
        fn ping(&self, config: &StoreConfig) -> Result<()> {
            Err(Error::Connection(format!("{} timed out", config.uri)))
        }

        fn open_collection(&self, _: &StoreConfig, name: &str) -> Result<Box<dyn DocumentStore>> {
            panic!("collection {name} opened after failed ping")
        }
    }

    /// Reachable server whose collections are plain in-memory ones.
    #[derive(Default)]
    struct Loopback {
        pings: Cell<u32>,
        fail_open: bool,
    }

    impl Connector for Loopback {
        fn ping(&self, _: &StoreConfig) -> Result<()> {
            self.pings.set(self.pings.get() + 1);
            Ok(())
        }

        fn open_collection(&self, _: &StoreConfig, name: &str) -> Result<Box<dyn DocumentStore>> {
            if self.fail_open {
                return Err(Error::Connection("not authorized".into()));
            }
            let mut col = MemoryCollection::new(name);
            col.insert(json!({"_id": "remote-marker"}));
            Ok(Box::new(col))
        }
    }

    #[test]
    fn falls_back_when_ping_fails() {
        let db = Database::connect(&StoreConfig::default(), &Unreachable);
        assert_eq!(db.backend(), BackendKind::Memory);
        assert_eq!(db.activities().count().unwrap(), 0);
        assert_eq!(db.teachers().count().unwrap(), 0);
    }

    #[test]
    fn uses_remote_when_reachable() {
        let connector = Loopback::default();
        let db = Database::connect(&StoreConfig::default(), &connector);
        assert_eq!(db.backend(), BackendKind::Remote);
        assert_eq!(connector.pings.get(), 1);
        assert!(db
            .activities()
            .find_one(&json!({"_id": "remote-marker"}))
            .unwrap()
            .is_some());
    }

    #[test]
    fn falls_back_when_open_fails() {
        let connector = Loopback {
            fail_open: true,
            ..Default::default()
        };
        let db = Database::connect(&StoreConfig::default(), &connector);
        assert_eq!(db.backend(), BackendKind::Memory);
    }

    #[test]
    fn collections_by_name() {
        let mut db = Database::in_memory();
        db.collection_mut(TEACHERS)
            .unwrap()
            .insert_one(json!({"_id": "mchen"}))
            .unwrap();
        assert_eq!(db.collection(TEACHERS).unwrap().count().unwrap(), 1);
        assert_eq!(db.collection(ACTIVITIES).unwrap().count().unwrap(), 0);
        assert!(matches!(
            db.collection("students"),
            Err(Error::CollectionNotFound(_))
        ));
    }
}
