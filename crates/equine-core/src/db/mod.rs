//! Local embedded store (SQLite).

mod horses;
mod patients;
mod schema;
mod sessions;
mod staff;

pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::seed::SeedData;
use crate::models::EntityKind;
use crate::store::{RecordCounts, StoreError};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{} not found: {id}", .kind.noun())]
    NotFound { kind: EntityKind, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Unsupported schema version {found} (expected {expected})")]
    Version { found: i64, expected: i64 },
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { kind, id } => StoreError::NotFound { kind, id },
            DbError::Constraint(msg) => StoreError::Constraint(msg),
            DbError::Corrupt(msg) => StoreError::Corrupt(msg),
            DbError::Sqlite(rusqlite::Error::SqliteFailure(code, msg))
                if code.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(msg.unwrap_or_else(|| code.to_string()))
            }
            DbError::Sqlite(rusqlite::Error::FromSqlConversionFailure(_, _, err)) => {
                StoreError::Corrupt(err.to_string())
            }
            DbError::Sqlite(
                err @ (rusqlite::Error::SqliteFailure(_, _)
                | rusqlite::Error::SqliteSingleThreadedMode
                | rusqlite::Error::InvalidPath(_)),
            ) => StoreError::Unavailable(err.to_string()),
            DbError::Sqlite(err) => StoreError::Corrupt(err.to_string()),
            e @ DbError::Version { .. } => StoreError::Unavailable(e.to_string()),
        }
    }
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening {} database", DB_NAME);
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create tables on first open, refuse databases from a newer schema.
    fn initialize(&self) -> DbResult<()> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        match version {
            0 => {
                debug!(version = SCHEMA_VERSION, "Creating schema");
                self.conn.execute_batch(SCHEMA)?;
                self.conn
                    .pragma_update(None, "user_version", SCHEMA_VERSION)?;
                Ok(())
            }
            SCHEMA_VERSION => {
                self.conn.execute_batch(SCHEMA)?;
                Ok(())
            }
            found => Err(DbError::Version {
                found,
                expected: SCHEMA_VERSION,
            }),
        }
    }

    /// Schema version recorded in the file.
    pub fn schema_version(&self) -> DbResult<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Load `seed` when the patients table is empty. Returns whether it loaded.
    pub fn load_seed_if_empty(&mut self, seed: &SeedData) -> DbResult<bool> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let tx = self.conn.transaction()?;
        for patient in &seed.patients {
            patients::insert(&tx, patient)?;
        }
        for member in &seed.staff {
            staff::insert(&tx, member)?;
        }
        for horse in &seed.horses {
            horses::insert(&tx, horse)?;
        }
        for session in &seed.sessions {
            sessions::insert(&tx, session)?;
        }
        tx.commit()?;

        info!(
            patients = seed.patients.len(),
            staff = seed.staff.len(),
            horses = seed.horses.len(),
            sessions = seed.sessions.len(),
            "Initial data loaded into database"
        );
        Ok(true)
    }

    /// Per-table record counts.
    pub fn record_counts(&self) -> DbResult<RecordCounts> {
        let count = |table: &str| -> DbResult<u64> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
            Ok(n.max(0) as u64)
        };
        Ok(RecordCounts {
            patients: count("patients")?,
            staff: count("staff")?,
            horses: count("horses")?,
            sessions: count("sessions")?,
        })
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

mod backend {
    //! [`Store`] over the typed table functions.

    use super::{horses, patients, sessions, staff, Database};
    use crate::models::{
        EntityKind, Horse, HorsePatch, NewHorse, NewPatient, NewSession, NewStaff, Patient,
        PatientPatch, Session, SessionPatch, Staff, StaffPatch,
    };
    use crate::store::{RecordCounts, Store, StoreError, StoreResult};

    impl Store for Database {
        fn list_patients(&self) -> StoreResult<Vec<Patient>> {
            Ok(patients::list(&self.conn)?)
        }

        fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
            Ok(patients::get(&self.conn, id)?)
        }

        fn insert_patient(&mut self, new: NewPatient) -> StoreResult<Patient> {
            let patient = Patient::create(new);
            patients::insert(&self.conn, &patient)?;
            Ok(patient)
        }

        fn update_patient(&mut self, id: &str, patch: PatientPatch) -> StoreResult<Patient> {
            let mut patient = patients::get(&self.conn, id)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Patient, id))?;
            patch.apply(&mut patient);
            patients::update(&self.conn, &patient)?;
            Ok(patient)
        }

        fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
            Ok(patients::delete(&self.conn, id)?)
        }

        fn list_staff(&self) -> StoreResult<Vec<Staff>> {
            Ok(staff::list(&self.conn)?)
        }

        fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
            Ok(staff::get(&self.conn, id)?)
        }

        fn insert_staff(&mut self, new: NewStaff) -> StoreResult<Staff> {
            let member = Staff::create(new);
            staff::insert(&self.conn, &member)?;
            Ok(member)
        }

        fn update_staff(&mut self, id: &str, patch: StaffPatch) -> StoreResult<Staff> {
            let mut member = staff::get(&self.conn, id)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Staff, id))?;
            patch.apply(&mut member);
            staff::update(&self.conn, &member)?;
            Ok(member)
        }

        fn delete_staff(&mut self, id: &str) -> StoreResult<bool> {
            Ok(staff::delete(&self.conn, id)?)
        }

        fn list_horses(&self) -> StoreResult<Vec<Horse>> {
            Ok(horses::list(&self.conn)?)
        }

        fn get_horse(&self, id: &str) -> StoreResult<Option<Horse>> {
            Ok(horses::get(&self.conn, id)?)
        }

        fn insert_horse(&mut self, new: NewHorse) -> StoreResult<Horse> {
            let horse = Horse::create(new);
            horses::insert(&self.conn, &horse)?;
            Ok(horse)
        }

        fn update_horse(&mut self, id: &str, patch: HorsePatch) -> StoreResult<Horse> {
            let mut horse = horses::get(&self.conn, id)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Horse, id))?;
            patch.apply(&mut horse);
            horses::update(&self.conn, &horse)?;
            Ok(horse)
        }

        fn delete_horse(&mut self, id: &str) -> StoreResult<bool> {
            Ok(horses::delete(&self.conn, id)?)
        }

        fn list_sessions(&self) -> StoreResult<Vec<Session>> {
            Ok(sessions::list(&self.conn)?)
        }

        fn get_session(&self, id: &str) -> StoreResult<Option<Session>> {
            Ok(sessions::get(&self.conn, id)?)
        }

        fn insert_session(&mut self, new: NewSession) -> StoreResult<Session> {
            let session = Session::create(new);
            sessions::insert(&self.conn, &session)?;
            Ok(session)
        }

        fn update_session(&mut self, id: &str, patch: SessionPatch) -> StoreResult<Session> {
            let mut session = sessions::get(&self.conn, id)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))?;
            patch.apply(&mut session);
            sessions::update(&self.conn, &session)?;
            Ok(session)
        }

        fn delete_session(&mut self, id: &str) -> StoreResult<bool> {
            Ok(sessions::delete(&self.conn, id)?)
        }

        fn counts(&self) -> StoreResult<RecordCounts> {
            Ok(self.record_counts()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;
    use crate::store::Store;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"patients".to_string()));
        assert!(tables.contains(&"staff".to_string()));
        assert!(tables.contains(&"horses".to_string()));
        assert!(tables.contains(&"sessions".to_string()));
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_seed_only_when_empty() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(db.load_seed_if_empty(&SeedData::load()).unwrap());
        assert!(!db.load_seed_if_empty(&SeedData::load()).unwrap());

        let counts = db.record_counts().unwrap();
        assert_eq!(counts.patients, 3);
        assert_eq!(counts.sessions, 3);
    }

    #[test]
    fn test_duplicate_document_is_constraint() {
        let mut db = Database::open_in_memory().unwrap();
        let new = NewPatient {
            document_id: "V-1".into(),
            first_name: "Ana".into(),
            last_name: "Martínez".into(),
            ..Default::default()
        };
        db.insert_patient(new.clone()).unwrap();
        let err = db.insert_patient(new).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "{err:?}");
    }

    #[test]
    fn test_reopen_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_DB_FILE);

        {
            let mut db = Database::open(&path).unwrap();
            db.load_seed_if_empty(&SeedData::load()).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.record_counts().unwrap().horses, 3);
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
                .unwrap();
        }
        let err = Database::open(&path).err().unwrap();
        assert!(matches!(err, DbError::Version { .. }));
    }
}
