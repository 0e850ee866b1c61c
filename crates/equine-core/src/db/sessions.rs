//! Session database operations.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{DbError, DbResult};
use crate::models::{Session, SessionStatus};

const COLUMNS: &str = "id, date, time, patient_id, horse_id, staff_id, duration, activities, \
                       notes, status, created_at, updated_at";

/// Intermediate row struct for database mapping.
struct SessionRow {
    id: String,
    date: NaiveDate,
    time: String,
    patient_id: String,
    horse_id: String,
    staff_id: String,
    duration: Option<String>,
    activities: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(SessionRow {
            id: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
            patient_id: row.get(3)?,
            horse_id: row.get(4)?,
            staff_id: row.get(5)?,
            duration: row.get(6)?,
            activities: row.get(7)?,
            notes: row.get(8)?,
            status: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl TryFrom<SessionRow> for Session {
    type Error = DbError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let status = string_to_status(&row.status)?;

        Ok(Session {
            id: row.id,
            date: row.date,
            time: row.time,
            patient_id: row.patient_id,
            horse_id: row.horse_id,
            staff_id: row.staff_id,
            duration: row.duration,
            activities: row.activities,
            notes: row.notes,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn string_to_status(s: &str) -> Result<SessionStatus, DbError> {
    SessionStatus::parse(s).ok_or_else(|| DbError::Corrupt(format!("Unknown session status: {}", s)))
}

fn collect(rows: impl Iterator<Item = rusqlite::Result<SessionRow>>) -> DbResult<Vec<Session>> {
    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(row?.try_into()?);
    }
    Ok(sessions)
}

pub(super) fn insert(conn: &Connection, session: &Session) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO sessions (
            id, date, time, patient_id, horse_id, staff_id, duration,
            activities, notes, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            session.id,
            session.date,
            session.time,
            session.patient_id,
            session.horse_id,
            session.staff_id,
            session.duration,
            session.activities,
            session.notes,
            session.status.as_str(),
            session.created_at,
            session.updated_at,
        ],
    )?;
    Ok(())
}

pub(super) fn update(conn: &Connection, session: &Session) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE sessions SET
            date = ?2,
            time = ?3,
            patient_id = ?4,
            horse_id = ?5,
            staff_id = ?6,
            duration = ?7,
            activities = ?8,
            notes = ?9,
            status = ?10,
            updated_at = ?11
        WHERE id = ?1
        "#,
        params![
            session.id,
            session.date,
            session.time,
            session.patient_id,
            session.horse_id,
            session.staff_id,
            session.duration,
            session.activities,
            session.notes,
            session.status.as_str(),
            session.updated_at,
        ],
    )?;
    Ok(rows_affected > 0)
}

pub(super) fn get(conn: &Connection, id: &str) -> DbResult<Option<Session>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM sessions WHERE id = ?"),
        [id],
        SessionRow::from_row,
    )
    .optional()?
    .map(|row| row.try_into())
    .transpose()
}

pub(super) fn list(conn: &Connection) -> DbResult<Vec<Session>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM sessions ORDER BY date, time"
    ))?;
    let rows = stmt.query_map([], SessionRow::from_row)?;
    collect(rows)
}

pub(super) fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM sessions WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::seed::SeedData;
    use crate::models::{NewSession, SessionPatch};
    use crate::store::{Store, StoreError};

    fn setup_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.load_seed_if_empty(&SeedData::load()).unwrap();
        db
    }

    fn new_session(date: NaiveDate, time: &str) -> NewSession {
        NewSession {
            date,
            time: time.into(),
            patient_id: "pat-1".into(),
            horse_id: "hrs-2".into(),
            staff_id: "stf-1".into(),
            duration: Some("45 minutes".into()),
            activities: None,
            notes: None,
            status: SessionStatus::Scheduled,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut db = setup_db();
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let session = db.insert_session(new_session(date, "10:30")).unwrap();

        let retrieved = db.get_session(&session.id).unwrap().unwrap();
        assert_eq!(retrieved, session);
    }

    #[test]
    fn test_list_ordered_by_date_then_time() {
        let mut db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        db.insert_session(new_session(date, "14:00")).unwrap();
        db.insert_session(new_session(date, "09:00")).unwrap();
        db.insert_session(new_session(date.pred_opt().unwrap(), "16:00"))
            .unwrap();

        let times: Vec<_> = db
            .list_sessions()
            .unwrap()
            .into_iter()
            .map(|s| s.time)
            .collect();
        assert_eq!(times, vec!["16:00", "09:00", "14:00"]);
    }

    #[test]
    fn test_status_update_persists() {
        let mut db = setup_db();
        db.update_session("ses-3", SessionPatch::status(SessionStatus::Cancelled))
            .unwrap();

        let session = db.get_session("ses-3").unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Cancelled);
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let db = Database::open_in_memory().unwrap();
        // Bypass the CHECK constraint to simulate a damaged file.
        db.conn()
            .execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 INSERT INTO sessions (id, date, time, patient_id, horse_id, staff_id, status)
                 VALUES ('bad', '2024-01-01', '09:00', 'p', 'h', 's', 'postponed');",
            )
            .unwrap();

        let err: StoreError = db.get_session("bad").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)), "{err:?}");
    }
}
