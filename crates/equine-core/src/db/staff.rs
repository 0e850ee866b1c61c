//! Staff database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DbResult;
use crate::models::Staff;

const COLUMNS: &str = "id, document_id, first_name, last_name, phone, email, specialty, role, \
                       hire_date, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Staff> {
    Ok(Staff {
        id: row.get(0)?,
        document_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        specialty: row.get(6)?,
        role: row.get(7)?,
        hire_date: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub(super) fn insert(conn: &Connection, staff: &Staff) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO staff (
            id, document_id, first_name, last_name, phone, email,
            specialty, role, hire_date, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            staff.id,
            staff.document_id,
            staff.first_name,
            staff.last_name,
            staff.phone,
            staff.email,
            staff.specialty,
            staff.role,
            staff.hire_date,
            staff.created_at,
            staff.updated_at,
        ],
    )?;
    Ok(())
}

pub(super) fn update(conn: &Connection, staff: &Staff) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE staff SET
            document_id = ?2,
            first_name = ?3,
            last_name = ?4,
            phone = ?5,
            email = ?6,
            specialty = ?7,
            role = ?8,
            hire_date = ?9,
            updated_at = ?10
        WHERE id = ?1
        "#,
        params![
            staff.id,
            staff.document_id,
            staff.first_name,
            staff.last_name,
            staff.phone,
            staff.email,
            staff.specialty,
            staff.role,
            staff.hire_date,
            staff.updated_at,
        ],
    )?;
    Ok(rows_affected > 0)
}

pub(super) fn get(conn: &Connection, id: &str) -> DbResult<Option<Staff>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM staff WHERE id = ?"),
        [id],
        from_row,
    )
    .optional()
    .map_err(Into::into)
}

pub(super) fn list(conn: &Connection) -> DbResult<Vec<Staff>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM staff ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(super) fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM staff WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}
