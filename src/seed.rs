use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::engine::Database;
use crate::error::Result;
use crate::password::hash_password;
use crate::store::{DocumentStore, InsertOutcome};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDetails {
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub schedule_details: ScheduleDetails,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAccount {
    pub username: String,
    pub display_name: String,
    /// Argon2 PHC string.
    pub password: String,
    pub role: Role,
}

/// Documents written by [`init_database`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub activities: usize,
    pub teachers: usize,
}

type ActivityRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
    &'static str,
    &'static str,
    u32,
    &'static [&'static str],
);

// name, description, schedule, days, start, end, max, participants
const ACTIVITIES: &[ActivityRow] = &[
    (
        "Chess Club",
        "Learn strategies and compete in chess tournaments",
        "Mondays and Fridays, 3:15 PM - 4:45 PM",
        &["Monday", "Friday"],
        "15:15",
        "16:45",
        12,
        &["michael@mergington.edu", "daniel@mergington.edu"],
    ),
    (
        "Programming Class",
        "Learn programming fundamentals and build software projects",
        "Tuesdays and Thursdays, 7:00 AM - 8:00 AM",
        &["Tuesday", "Thursday"],
        "07:00",
        "08:00",
        20,
        &["emma@mergington.edu", "sophia@mergington.edu"],
    ),
    (
        "Morning Fitness",
        "Early morning physical training and exercises",
        "Mondays, Wednesdays, Fridays, 6:30 AM - 7:45 AM",
        &["Monday", "Wednesday", "Friday"],
        "06:30",
        "07:45",
        30,
        &["john@mergington.edu", "olivia@mergington.edu"],
    ),
    (
        "Soccer Team",
        "Join the school soccer team and compete in matches",
        "Tuesdays and Thursdays, 3:30 PM - 5:30 PM",
        &["Tuesday", "Thursday"],
        "15:30",
        "17:30",
        22,
        &["liam@mergington.edu", "noah@mergington.edu"],
    ),
    (
        "Basketball Team",
        "Practice and compete in basketball tournaments",
        "Wednesdays and Fridays, 3:15 PM - 5:00 PM",
        &["Wednesday", "Friday"],
        "15:15",
        "17:00",
        15,
        &["ava@mergington.edu", "mia@mergington.edu"],
    ),
    (
        "Art Club",
        "Explore various art techniques and create masterpieces",
        "Thursdays, 3:15 PM - 5:00 PM",
        &["Thursday"],
        "15:15",
        "17:00",
        15,
        &["amelia@mergington.edu", "harper@mergington.edu"],
    ),
    (
        "Drama Club",
        "Act, direct, and produce plays and performances",
        "Mondays and Wednesdays, 3:30 PM - 5:30 PM",
        &["Monday", "Wednesday"],
        "15:30",
        "17:30",
        20,
        &["ella@mergington.edu", "scarlett@mergington.edu"],
    ),
    (
        "Math Club",
        "Solve challenging problems and prepare for math competitions",
        "Tuesdays, 7:15 AM - 8:00 AM",
        &["Tuesday"],
        "07:15",
        "08:00",
        10,
        &["james@mergington.edu", "benjamin@mergington.edu"],
    ),
    (
        "Debate Team",
        "Develop public speaking and argumentation skills",
        "Fridays, 3:30 PM - 5:30 PM",
        &["Friday"],
        "15:30",
        "17:30",
        12,
        &["charlotte@mergington.edu", "amelia@mergington.edu"],
    ),
    (
        "Weekend Robotics Workshop",
        "Build and program robots in our state-of-the-art workshop",
        "Saturdays, 10:00 AM - 2:00 PM",
        &["Saturday"],
        "10:00",
        "14:00",
        15,
        &["ethan@mergington.edu", "oliver@mergington.edu"],
    ),
    (
        "Science Olympiad",
        "Weekend science competition preparation for regional and state events",
        "Saturdays, 1:00 PM - 4:00 PM",
        &["Saturday"],
        "13:00",
        "16:00",
        18,
        &["isabella@mergington.edu", "lucas@mergington.edu"],
    ),
    (
        "Sunday Chess Tournament",
        "Weekly tournament for serious chess players with rankings",
        "Sundays, 2:00 PM - 5:00 PM",
        &["Sunday"],
        "14:00",
        "17:00",
        16,
        &["william@mergington.edu", "jacob@mergington.edu"],
    ),
    (
        "Manga Maniacs",
        "Dive into epic adventures and discover incredible worlds! Join fellow otaku as we \
         explore legendary manga series, discuss your favorite heroes and villains, and \
         uncover hidden gems in Japanese storytelling.",
        "Tuesdays, 7:00 PM - 8:00 PM",
        &["Tuesday"],
        "19:00",
        "20:00",
        15,
        &[],
    ),
];

// username, display name, initial password, role
const TEACHERS: &[(&str, &str, &str, Role)] = &[
    ("mrodriguez", "Ms. Rodriguez", "art123", Role::Teacher),
    ("mchen", "Mr. Chen", "chess456", Role::Teacher),
    ("principal", "Principal Martinez", "admin789", Role::Admin),
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The starting activities, keyed by name.
pub fn initial_activities() -> Vec<(String, Activity)> {
    ACTIVITIES
        .iter()
        .map(
            |&(name, description, schedule, days, start, end, max, participants)| {
                let activity = Activity {
                    description: description.to_string(),
                    schedule: schedule.to_string(),
                    schedule_details: ScheduleDetails {
                        days: strings(days),
                        start_time: start.to_string(),
                        end_time: end.to_string(),
                    },
                    max_participants: max,
                    participants: strings(participants),
                };
                (name.to_string(), activity)
            },
        )
        .collect()
}

/// The starting staff accounts with freshly hashed passwords.
pub fn initial_teachers() -> Result<Vec<TeacherAccount>> {
    TEACHERS
        .iter()
        .map(|&(username, display_name, password, role)| {
            Ok(TeacherAccount {
                username: username.to_string(),
                display_name: display_name.to_string(),
                password: hash_password(password)?,
                role,
            })
        })
        .collect()
}

/// Serialize `record` and attach `id` as its `_id`.
fn with_identity<T: Serialize>(id: &str, record: &T) -> Result<Value> {
    let mut doc = serde_json::Map::new();
    doc.insert("_id".to_string(), Value::String(id.to_string()));
    if let Value::Object(fields) = serde_json::to_value(record)? {
        doc.extend(fields);
    }
    Ok(Value::Object(doc))
}

fn insert_all(store: &mut dyn DocumentStore, docs: Vec<Value>) -> Result<usize> {
    let mut inserted = 0;
    for doc in docs {
        if store.insert_one(doc)? == InsertOutcome::Inserted {
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Seed each collection that is still empty. Non-empty collections are
/// left alone, so calling this on every startup is safe.
pub fn init_database(db: &mut Database) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if db.activities().count()? == 0 {
        let docs = initial_activities()
            .iter()
            .map(|(name, activity)| with_identity(name, activity))
            .collect::<Result<Vec<_>>>()?;
        report.activities = insert_all(db.activities_mut(), docs)?;
    }

    if db.teachers().count()? == 0 {
        let docs = initial_teachers()?
            .iter()
            .map(|teacher| with_identity(&teacher.username, teacher))
            .collect::<Result<Vec<_>>>()?;
        report.teachers = insert_all(db.teachers_mut(), docs)?;
    }

    info!(
        activities = report.activities,
        teachers = report.teachers,
        "seeded database"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use serde_json::json;

    #[test]
    fn activities_have_consistent_schedules() {
        let activities = initial_activities();
        assert_eq!(activities.len(), 13);
        for (name, activity) in &activities {
            let details = &activity.schedule_details;
            assert!(!details.days.is_empty(), "{name}");
            assert!(details.start_time < details.end_time, "{name}");
            assert!(activity.participants.len() <= activity.max_participants as usize);
        }
    }

    #[test]
    fn seeds_once() {
        let mut db = Database::in_memory();
        let first = init_database(&mut db).unwrap();
        assert_eq!(first, SeedReport { activities: 13, teachers: 3 });
        let second = init_database(&mut db).unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(db.activities().count().unwrap(), 13);
    }

    #[test]
    fn seeded_documents_keep_field_layout() {
        let mut db = Database::in_memory();
        init_database(&mut db).unwrap();
        let chess = db
            .activities()
            .find_one(&json!({"_id": "Chess Club"}))
            .unwrap()
            .unwrap();
        assert_eq!(chess["schedule_details"]["days"], json!(["Monday", "Friday"]));
        assert_eq!(chess["max_participants"], 12);
        let activity: Activity = serde_json::from_value(chess).unwrap();
        assert_eq!(activity.schedule_details.start_time, "15:15");
    }

    #[test]
    fn seeded_teacher_passwords_verify() {
        let mut db = Database::in_memory();
        init_database(&mut db).unwrap();
        let principal = db
            .teachers()
            .find_one(&json!({"_id": "principal"}))
            .unwrap()
            .unwrap();
        assert_eq!(principal["role"], "admin");
        assert_eq!(principal["username"], "principal");
        let hash = principal["password"].as_str().unwrap();
        assert!(verify_password("admin789", hash));
        assert!(!verify_password("art123", hash));
    }
}
