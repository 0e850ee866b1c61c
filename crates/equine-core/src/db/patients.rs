//! Patient database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DbResult;
use crate::models::Patient;

const COLUMNS: &str = "id, document_id, first_name, last_name, birth_date, phone, email, \
                       diagnosis, therapy_goals, notes, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        document_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        birth_date: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
        diagnosis: row.get(7)?,
        therapy_goals: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Insert a new patient.
pub(super) fn insert(conn: &Connection, patient: &Patient) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO patients (
            id, document_id, first_name, last_name, birth_date, phone, email,
            diagnosis, therapy_goals, notes, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            patient.id,
            patient.document_id,
            patient.first_name,
            patient.last_name,
            patient.birth_date,
            patient.phone,
            patient.email,
            patient.diagnosis,
            patient.therapy_goals,
            patient.notes,
            patient.created_at,
            patient.updated_at,
        ],
    )?;
    Ok(())
}

/// Overwrite every mutable column of an existing patient.
pub(super) fn update(conn: &Connection, patient: &Patient) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE patients SET
            document_id = ?2,
            first_name = ?3,
            last_name = ?4,
            birth_date = ?5,
            phone = ?6,
            email = ?7,
            diagnosis = ?8,
            therapy_goals = ?9,
            notes = ?10,
            updated_at = ?11
        WHERE id = ?1
        "#,
        params![
            patient.id,
            patient.document_id,
            patient.first_name,
            patient.last_name,
            patient.birth_date,
            patient.phone,
            patient.email,
            patient.diagnosis,
            patient.therapy_goals,
            patient.notes,
            patient.updated_at,
        ],
    )?;
    Ok(rows_affected > 0)
}

pub(super) fn get(conn: &Connection, id: &str) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM patients WHERE id = ?"),
        [id],
        from_row,
    )
    .optional()
    .map_err(Into::into)
}

pub(super) fn list(conn: &Connection) -> DbResult<Vec<Patient>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM patients ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(super) fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{NewPatient, PatientPatch};
    use crate::store::Store;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_patient(document_id: &str, first: &str, last: &str) -> NewPatient {
        NewPatient {
            document_id: document_id.into(),
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut db = setup_db();

        let mut new = new_patient("V-12345678", "María", "González");
        new.birth_date = NaiveDate::from_ymd_opt(2010, 5, 15);
        new.diagnosis = Some("Autism spectrum disorder".into());
        let patient = db.insert_patient(new).unwrap();

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved, patient);
        assert_eq!(retrieved.birth_date, NaiveDate::from_ymd_opt(2010, 5, 15));
    }

    #[test]
    fn test_update_patient() {
        let mut db = setup_db();
        let patient = db
            .insert_patient(new_patient("V-1", "Carlos", "Rodríguez"))
            .unwrap();

        let updated = db
            .update_patient(
                &patient.id,
                PatientPatch {
                    notes: Some(Some("Good progress".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Good progress"));

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved.notes.as_deref(), Some("Good progress"));
        assert_eq!(retrieved.first_name, "Carlos");
    }

    #[test]
    fn test_list_sorted_by_last_name() {
        let mut db = setup_db();
        db.insert_patient(new_patient("V-1", "Ana", "Martínez")).unwrap();
        db.insert_patient(new_patient("V-2", "Carlos", "Blanco")).unwrap();

        let names: Vec<_> = db
            .list_patients()
            .unwrap()
            .into_iter()
            .map(|p| p.last_name)
            .collect();
        assert_eq!(names, vec!["Blanco", "Martínez"]);
    }

    #[test]
    fn test_duplicate_document_is_rejected() {
        let mut db = setup_db();
        db.insert_patient(new_patient("V-9", "Ana", "Martínez")).unwrap();
        assert!(db.insert_patient(new_patient("V-9", "Eva", "Ruiz")).is_err());
        assert_eq!(db.list_patients().unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let mut db = setup_db();
        let patient = db.insert_patient(new_patient("V-1", "Ana", "Martínez")).unwrap();

        assert!(db.delete_patient(&patient.id).unwrap());
        assert!(!db.delete_patient(&patient.id).unwrap());
    }
}
