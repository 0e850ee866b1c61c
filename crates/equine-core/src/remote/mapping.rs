//! Field-mapping tables between domain structs and hosted table columns.
//!
//! Each table pairs a domain field name with the column name of the hosted
//! schema. Records cross the adapter boundary as JSON objects: the domain
//! struct is serialized with serde, its keys renamed through the table, and
//! the reverse on the way back. Session status values are also translated.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{RemoteError, RemoteResult};
use crate::models::SessionStatus;

/// Domain field to remote column pairs for one table.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub table: &'static str,
    pub fields: &'static [(&'static str, &'static str)],
}

pub const PATIENT: FieldMap = FieldMap {
    table: "pacientes",
    fields: &[
        ("id", "id"),
        ("document_id", "cedula"),
        ("first_name", "nombre"),
        ("last_name", "apellido"),
        ("birth_date", "fecha_nacimiento"),
        ("phone", "telefono"),
        ("email", "email"),
        ("diagnosis", "diagnostico"),
        ("therapy_goals", "objetivos"),
        ("notes", "observaciones"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
};

pub const STAFF: FieldMap = FieldMap {
    table: "personal",
    fields: &[
        ("id", "id"),
        ("document_id", "cedula"),
        ("first_name", "nombre"),
        ("last_name", "apellido"),
        ("phone", "telefono"),
        ("email", "email"),
        ("specialty", "especialidad"),
        ("role", "cargo"),
        ("hire_date", "fecha_contratacion"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
};

pub const HORSE: FieldMap = FieldMap {
    table: "caballos",
    fields: &[
        ("id", "id"),
        ("name", "nombre"),
        ("age", "edad"),
        ("breed", "raza"),
        ("color", "color"),
        ("height", "altura"),
        ("weight", "peso"),
        ("temperament", "temperamento"),
        ("training", "entrenamiento"),
        ("medical_history", "historial_medico"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
};

pub const SESSION: FieldMap = FieldMap {
    table: "sesiones",
    fields: &[
        ("id", "id"),
        ("date", "fecha"),
        ("time", "hora"),
        ("patient_id", "paciente_id"),
        ("horse_id", "caballo_id"),
        ("staff_id", "personal_id"),
        ("duration", "duracion"),
        ("activities", "actividades"),
        ("notes", "observaciones"),
        ("status", "estado"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
};

pub const ALL: [FieldMap; 4] = [PATIENT, STAFF, HORSE, SESSION];

const STATUS_VALUES: [(SessionStatus, &str); 3] = [
    (SessionStatus::Scheduled, "programada"),
    (SessionStatus::Completed, "completada"),
    (SessionStatus::Cancelled, "cancelada"),
];

impl FieldMap {
    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }

    pub fn field(&self, column: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(_, c)| *c == column)
            .map(|(f, _)| *f)
    }

    /// PostgREST `order` value, e.g. `apellido.asc,nombre.asc`.
    pub fn order_by(&self, fields: &[&str]) -> String {
        fields
            .iter()
            .filter_map(|f| self.column(f))
            .map(|c| format!("{c}.asc"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Rename domain keys to columns. A key with no mapping is a bug.
    pub fn to_row(&self, record: Map<String, Value>) -> RemoteResult<Map<String, Value>> {
        record
            .into_iter()
            .map(|(key, value)| match self.column(&key) {
                Some(column) => Ok((column.to_string(), value)),
                None => Err(RemoteError::Decode(format!(
                    "no column for field '{key}' in {}",
                    self.table
                ))),
            })
            .collect()
    }

    /// Rename columns to domain keys. Unmapped columns (embedded rows,
    /// columns added server-side) are dropped.
    pub fn from_row(&self, row: Map<String, Value>) -> Map<String, Value> {
        row.into_iter()
            .filter_map(|(column, value)| self.field(&column).map(|f| (f.to_string(), value)))
            .collect()
    }

    /// Serialize a domain value into a remote row.
    pub fn encode<T: Serialize>(&self, value: &T) -> RemoteResult<Map<String, Value>> {
        let record = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(RemoteError::Decode(format!(
                    "expected object for {}, got {other}",
                    self.table
                )))
            }
            Err(e) => return Err(RemoteError::Decode(e.to_string())),
        };
        let mut row = self.to_row(record)?;
        if let Some(status) = row.get_mut("estado") {
            *status = status_to_remote(status)?;
        }
        Ok(row)
    }

    /// Deserialize a remote row into a domain value.
    pub fn decode<T: DeserializeOwned>(&self, row: Value) -> RemoteResult<T> {
        let Value::Object(row) = row else {
            return Err(RemoteError::Decode(format!(
                "expected row object from {}",
                self.table
            )));
        };
        let mut record = self.from_row(row);
        if self.column("status").is_some() {
            let status = record.remove("status").unwrap_or(Value::Null);
            record.insert("status".into(), status_from_remote(&status)?);
        }
        serde_json::from_value(Value::Object(record)).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Domain status value ("scheduled") to the hosted value ("programada").
fn status_to_remote(value: &Value) -> RemoteResult<Value> {
    let status = value
        .as_str()
        .and_then(SessionStatus::parse)
        .ok_or_else(|| RemoteError::Decode(format!("invalid session status {value}")))?;
    Ok(Value::String(remote_status(status).to_string()))
}

/// Hosted status value to the domain value. A null status reads as scheduled.
fn status_from_remote(value: &Value) -> RemoteResult<Value> {
    let status = match value {
        Value::Null => SessionStatus::Scheduled,
        Value::String(s) => STATUS_VALUES
            .iter()
            .find(|(_, remote)| remote == s)
            .map(|(status, _)| *status)
            .ok_or_else(|| RemoteError::Decode(format!("unknown session status '{s}'")))?,
        other => {
            return Err(RemoteError::Decode(format!(
                "unexpected session status {other}"
            )))
        }
    };
    Ok(Value::String(status.as_str().to_string()))
}

pub fn remote_status(status: SessionStatus) -> &'static str {
    STATUS_VALUES
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, remote)| *remote)
        .unwrap_or("programada")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed, Horse, Patient, Session, SessionPatch, Staff};
    use serde_json::json;
    use std::collections::HashSet;

    fn domain_keys<T: Serialize>(value: &T) -> HashSet<String> {
        match serde_json::to_value(value).unwrap() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => panic!("not an object"),
        }
    }

    fn mapped_fields(map: &FieldMap) -> HashSet<String> {
        map.fields.iter().map(|(f, _)| f.to_string()).collect()
    }

    #[test]
    fn test_tables_cover_every_field() {
        assert_eq!(mapped_fields(&PATIENT), domain_keys(&seed::patients()[0]));
        assert_eq!(mapped_fields(&STAFF), domain_keys(&seed::staff()[0]));
        assert_eq!(mapped_fields(&HORSE), domain_keys(&seed::horses()[0]));
        assert_eq!(mapped_fields(&SESSION), domain_keys(&seed::sessions()[0]));
    }

    #[test]
    fn test_tables_are_bijective() {
        for map in ALL {
            let fields: HashSet<_> = map.fields.iter().map(|(f, _)| f).collect();
            let columns: HashSet<_> = map.fields.iter().map(|(_, c)| c).collect();
            assert_eq!(fields.len(), map.fields.len(), "{}", map.table);
            assert_eq!(columns.len(), map.fields.len(), "{}", map.table);
        }
    }

    #[test]
    fn test_patient_encode_uses_hosted_columns() {
        let patient = &seed::patients()[0];
        let row = PATIENT.encode(patient).unwrap();
        assert_eq!(row["cedula"], "V-12345678");
        assert_eq!(row["apellido"], "González");
        assert_eq!(row["fecha_nacimiento"], "2010-05-15");
        assert!(!row.contains_key("document_id"));

        let back: Patient = PATIENT.decode(Value::Object(row)).unwrap();
        assert_eq!(&back, patient);
    }

    #[test]
    fn test_staff_and_horse_decode() {
        let staff: Staff = STAFF
            .decode(json!({
                "id": "e1", "cedula": "V-1", "nombre": "Luisa", "apellido": "Fernández",
                "telefono": null, "email": null, "especialidad": "Psicóloga", "cargo": null,
                "fecha_contratacion": "2021-03-01",
                "created_at": "2024-01-01T00:00:00+00:00", "updated_at": "2024-01-01T00:00:00+00:00"
            }))
            .unwrap();
        assert_eq!(staff.specialty.as_deref(), Some("Psicóloga"));

        let horse: Horse = HORSE
            .decode(json!({
                "id": "c1", "nombre": "Luna", "edad": 8, "raza": null, "color": null,
                "altura": "1.5 m", "peso": "450 kg", "temperamento": null,
                "entrenamiento": null, "historial_medico": null,
                "created_at": "x", "updated_at": "x"
            }))
            .unwrap();
        assert_eq!(horse.age, Some(8));
        assert_eq!(horse.height.as_deref(), Some("1.5 m"));
    }

    #[test]
    fn test_session_status_translated() {
        let session = &seed::sessions()[2];
        let row = SESSION.encode(session).unwrap();
        assert_eq!(row["estado"], "programada");
        assert_eq!(row["paciente_id"], "pat-3");

        let mut row = Value::Object(row);
        row["estado"] = Value::Null;
        row["paciente"] = json!({ "nombre": "Ana", "apellido": "Martínez" });
        let back: Session = SESSION.decode(row).unwrap();
        assert_eq!(back.status, SessionStatus::Scheduled);
        assert_eq!(back.patient_id, "pat-3");
    }

    #[test]
    fn test_unknown_remote_status_rejected() {
        let mut row = Value::Object(SESSION.encode(&seed::sessions()[0]).unwrap());
        row["estado"] = json!("pospuesta");
        let result: RemoteResult<Session> = SESSION.decode(row);
        assert!(matches!(result, Err(RemoteError::Decode(_))));
    }

    #[test]
    fn test_patch_encodes_only_present_fields() {
        let patch = SessionPatch::status(SessionStatus::Cancelled);
        let row = SESSION.encode(&patch).unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row["estado"], "cancelada");
    }

    #[test]
    fn test_order_by() {
        assert_eq!(
            PATIENT.order_by(&["last_name", "first_name"]),
            "apellido.asc,nombre.asc"
        );
        assert_eq!(SESSION.order_by(&["date", "time"]), "fecha.asc,hora.asc");
    }
}
