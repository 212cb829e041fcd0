//! End-to-end behaviour of the in-memory backend through the `Database`
//! context: round trips, counting, array updates, filters and the
//! distinct-days aggregation over the seeded activities.

use serde_json::{Value, json};

use mergington_db::seed::init_database;
use mergington_db::{
    BackendKind, Connector, Database, DocumentStore, Error, InsertOutcome, SkipReason, StoreConfig,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Offline;

impl Connector for Offline {
    fn ping(&self, _: &StoreConfig) -> mergington_db::Result<()> {
        Err(Error::Connection("connection refused".into()))
    }

    fn open_collection(
        &self,
        _: &StoreConfig,
        _: &str,
    ) -> mergington_db::Result<Box<dyn DocumentStore>> {
        Err(Error::Connection("connection refused".into()))
    }
}

fn seeded() -> Database {
    let mut db = Database::connect(&StoreConfig::default(), &Offline);
    assert_eq!(db.backend(), BackendKind::Memory);
    init_database(&mut db).unwrap();
    db
}

fn ids(docs: &[Value]) -> Vec<&str> {
    docs.iter().map(|d| d["_id"].as_str().unwrap()).collect()
}

fn days_pipeline() -> Value {
    json!([
        {"$unwind": "$schedule_details.days"},
        {"$group": {"_id": "$schedule_details.days"}},
        {"$sort": {"_id": 1}}
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn insert_round_trip_and_count() {
    let mut db = Database::in_memory();
    let store = db.activities_mut();
    let doc = json!({
        "_id": "Chess Club",
        "schedule_details": {"days": ["Monday", "Friday"], "start_time": "15:15"},
        "participants": []
    });

    assert_eq!(store.insert_one(doc.clone()).unwrap(), InsertOutcome::Inserted);
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.find_one(&json!({"_id": "Chess Club"})).unwrap(), Some(doc));

    let skipped = store.insert_one(json!({"description": "no id"})).unwrap();
    assert_eq!(skipped, InsertOutcome::Skipped(SkipReason::MissingIdentity));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn signup_and_unregister_flow() {
    let mut db = seeded();
    let filter = json!({"_id": "Manga Maniacs"});
    let email = "new@mergington.edu";

    let store = db.activities_mut();
    for _ in 0..2 {
        let res = store
            .update_one(&filter, &json!({"$push": {"participants": email}}))
            .unwrap();
        assert_eq!(res.modified_count, 1);
    }
    let doc = store.find_one(&filter).unwrap().unwrap();
    assert_eq!(doc["participants"], json!([email, email]));

    store
        .update_one(&filter, &json!({"$pull": {"participants": email}}))
        .unwrap();
    let doc = store.find_one(&filter).unwrap().unwrap();
    assert_eq!(doc["participants"], json!([]));

    let res = store
        .update_one(&json!({"_id": "Knitting"}), &json!({"$push": {"participants": email}}))
        .unwrap();
    assert_eq!(res.modified_count, 0);
}

#[test]
fn filter_by_day_and_time() {
    let db = seeded();
    let store = db.activities();

    let weekend = store
        .find(Some(&json!({"schedule_details.days": {"$in": ["Saturday", "Sunday"]}})))
        .unwrap();
    assert_eq!(
        ids(&weekend),
        vec![
            "Weekend Robotics Workshop",
            "Science Olympiad",
            "Sunday Chess Tournament"
        ]
    );

    let mornings = store
        .find(Some(&json!({
            "schedule_details.start_time": {"$gte": "06:00", "$lte": "08:00"}
        })))
        .unwrap();
    assert_eq!(
        ids(&mornings),
        vec!["Programming Class", "Morning Fitness", "Math Club"]
    );

    let combined = store
        .find(Some(&json!({
            "schedule_details.days": {"$in": ["Thursday"]},
            "schedule_details.start_time": {"$gte": "15:00"}
        })))
        .unwrap();
    assert_eq!(ids(&combined), vec!["Soccer Team", "Art Club"]);

    assert_eq!(store.find(None).unwrap().len(), 13);
    assert!(store.find(Some(&json!({"schedule_details.days": {"$nin": ["Monday"]}}))).unwrap().is_empty());
}

#[test]
fn distinct_days_over_seed() {
    let db = seeded();
    let days = db.activities().aggregate(&days_pipeline()).unwrap();
    assert_eq!(
        days,
        vec![
            json!({"_id": "Friday"}),
            json!({"_id": "Monday"}),
            json!({"_id": "Saturday"}),
            json!({"_id": "Sunday"}),
            json!({"_id": "Thursday"}),
            json!({"_id": "Tuesday"}),
            json!({"_id": "Wednesday"}),
        ]
    );

    let unsupported = json!([{"$group": {"_id": "$schedule_details.days"}}]);
    assert!(db.activities().aggregate(&unsupported).unwrap().is_empty());
}
