//! SQLite schema definition.

/// Logical database name; also the stem of the default file name.
pub const DB_NAME: &str = "equine-clinic";

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "equine-clinic.db";

/// Schema version stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Complete database schema. Sessions carry no foreign keys; references are
/// checked by the service before writes.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birth_date TEXT,
    phone TEXT,
    email TEXT,
    diagnosis TEXT,
    therapy_goals TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_document ON patients(document_id);

-- ============================================================================
-- Staff
-- ============================================================================

CREATE TABLE IF NOT EXISTS staff (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    specialty TEXT,
    role TEXT,
    hire_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_staff_document ON staff(document_id);

-- ============================================================================
-- Horses
-- ============================================================================

CREATE TABLE IF NOT EXISTS horses (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER CHECK (age IS NULL OR age >= 0),
    breed TEXT,
    color TEXT,
    height TEXT,
    weight TEXT,
    temperament TEXT,
    training TEXT,
    medical_history TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_horses_name ON horses(name);

-- ============================================================================
-- Sessions
-- ============================================================================

CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    patient_id TEXT NOT NULL,
    horse_id TEXT NOT NULL,
    staff_id TEXT NOT NULL,
    duration TEXT,
    activities TEXT,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'scheduled'
        CHECK (status IN ('scheduled', 'completed', 'cancelled')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
CREATE INDEX IF NOT EXISTS idx_sessions_patient ON sessions(patient_id);
CREATE INDEX IF NOT EXISTS idx_sessions_horse ON sessions(horse_id);
CREATE INDEX IF NOT EXISTS idx_sessions_staff ON sessions(staff_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_secondary_indexes_exist() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for expected in [
            "idx_patients_document",
            "idx_staff_document",
            "idx_horses_name",
            "idx_sessions_date",
            "idx_sessions_patient",
            "idx_sessions_horse",
            "idx_sessions_staff",
        ] {
            assert!(indexes.iter().any(|i| i == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO sessions (id, date, time, patient_id, horse_id, staff_id, status)
             VALUES ('s1', '2024-01-01', '09:00', 'p', 'h', 's', 'postponed')",
            [],
        );
        assert!(result.is_err());
    }
}
