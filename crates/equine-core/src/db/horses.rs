//! Horse database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DbResult;
use crate::models::Horse;

const COLUMNS: &str = "id, name, age, breed, color, height, weight, temperament, training, \
                       medical_history, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Horse> {
    Ok(Horse {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        breed: row.get(3)?,
        color: row.get(4)?,
        height: row.get(5)?,
        weight: row.get(6)?,
        temperament: row.get(7)?,
        training: row.get(8)?,
        medical_history: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

pub(super) fn insert(conn: &Connection, horse: &Horse) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO horses (
            id, name, age, breed, color, height, weight, temperament,
            training, medical_history, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            horse.id,
            horse.name,
            horse.age,
            horse.breed,
            horse.color,
            horse.height,
            horse.weight,
            horse.temperament,
            horse.training,
            horse.medical_history,
            horse.created_at,
            horse.updated_at,
        ],
    )?;
    Ok(())
}

pub(super) fn update(conn: &Connection, horse: &Horse) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE horses SET
            name = ?2,
            age = ?3,
            breed = ?4,
            color = ?5,
            height = ?6,
            weight = ?7,
            temperament = ?8,
            training = ?9,
            medical_history = ?10,
            updated_at = ?11
        WHERE id = ?1
        "#,
        params![
            horse.id,
            horse.name,
            horse.age,
            horse.breed,
            horse.color,
            horse.height,
            horse.weight,
            horse.temperament,
            horse.training,
            horse.medical_history,
            horse.updated_at,
        ],
    )?;
    Ok(rows_affected > 0)
}

pub(super) fn get(conn: &Connection, id: &str) -> DbResult<Option<Horse>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM horses WHERE id = ?"),
        [id],
        from_row,
    )
    .optional()
    .map_err(Into::into)
}

pub(super) fn list(conn: &Connection) -> DbResult<Vec<Horse>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM horses ORDER BY name"))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(super) fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM horses WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{HorsePatch, NewHorse};
    use crate::store::Store;

    #[test]
    fn test_insert_and_update() {
        let mut db = Database::open_in_memory().unwrap();
        let horse = db
            .insert_horse(NewHorse {
                name: "Estrella".into(),
                age: Some(10),
                breed: Some("Appaloosa".into()),
                ..Default::default()
            })
            .unwrap();

        db.update_horse(
            &horse.id,
            HorsePatch {
                age: Some(Some(11)),
                temperament: Some(Some("Patient and friendly".into())),
                ..Default::default()
            },
        )
        .unwrap();

        let retrieved = db.get_horse(&horse.id).unwrap().unwrap();
        assert_eq!(retrieved.age, Some(11));
        assert_eq!(retrieved.breed.as_deref(), Some("Appaloosa"));
        assert_eq!(retrieved.temperament.as_deref(), Some("Patient and friendly"));
    }

    #[test]
    fn test_names_not_unique() {
        let mut db = Database::open_in_memory().unwrap();
        for _ in 0..2 {
            db.insert_horse(NewHorse {
                name: "Luna".into(),
                ..Default::default()
            })
            .unwrap();
        }
        assert_eq!(db.list_horses().unwrap().len(), 2);
    }
}
