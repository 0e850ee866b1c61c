//! Hosted relational backend over a PostgREST-style REST interface.
//!
//! [`RemoteStore`] turns each [`Store`] call into one HTTP round-trip through a
//! [`Transport`]. The real transport (`HttpTransport`, reqwest blocking) is
//! built with the `remote` feature; tests drive the store with an in-process
//! fake.

#[cfg(feature = "remote")]
mod http;
pub mod mapping;

#[cfg(feature = "remote")]
pub use http::HttpTransport;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    EnrichedSession, EntityKind, Horse, HorseName, HorsePatch, NewHorse, NewPatient, NewSession,
    NewStaff, Patient, PatientPatch, PersonName, Session, SessionPatch, Staff, StaffPatch,
};
use crate::store::{RecordCounts, Store, StoreError, StoreResult};
use mapping::FieldMap;

/// Remote backend errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

impl RemoteError {
    /// HTTP 404: the addressed row (or table) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::Status { status: 404, .. })
    }
}

impl From<RemoteError> for StoreError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Transport(msg) => StoreError::Unavailable(msg),
            RemoteError::Decode(msg) => StoreError::Corrupt(msg),
            RemoteError::Status {
                status, message, ..
            } if status == 409 => StoreError::Constraint(message),
            RemoteError::Status {
                code: Some(code),
                message,
                ..
            } if code == "23505" || code == "23503" => StoreError::Constraint(message),
            RemoteError::Status {
                status, message, ..
            } => StoreError::Rejected(format!("HTTP {status}: {message}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// One table-level request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub table: &'static str,
    /// Query pairs in PostgREST syntax (`select`, `order`, `id=eq.X`).
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    fn new(method: Method, table: &'static str) -> Self {
        Self {
            method,
            table,
            query: Vec::new(),
            body: None,
        }
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    fn eq(self, column: &str, value: &str) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Executes requests against the hosted backend.
///
/// Returns `Err` only when no response was received; HTTP error statuses come
/// back as a [`Response`].
pub trait Transport {
    fn execute(&self, request: &Request) -> RemoteResult<Response>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &Request) -> RemoteResult<Response> {
        (**self).execute(request)
    }
}

/// Embedded select used for enriched session reads.
const SESSION_JOIN: &str = "*,paciente:pacientes(nombre,apellido),\
                            caballo:caballos(nombre),personal:personal(nombre,apellido)";

/// Store backed by the hosted tables `pacientes`, `personal`, `caballos` and
/// `sesiones`.
pub struct RemoteStore<T: Transport> {
    transport: T,
}

impl<T: Transport> RemoteStore<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and parse the JSON array every PostgREST call returns.
    fn rows(&self, request: Request) -> RemoteResult<Vec<Value>> {
        debug!(table = request.table, method = ?request.method, "Remote request");
        let response = self.transport.execute(&request)?;

        if !(200..300).contains(&response.status) {
            return Err(status_error(&response));
        }
        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&response.body) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(other) => Ok(vec![other]),
            Err(e) => Err(RemoteError::Decode(e.to_string())),
        }
    }

    fn list<R: DeserializeOwned>(&self, map: FieldMap, order: &[&str]) -> StoreResult<Vec<R>> {
        let request = Request::new(Method::Get, map.table)
            .param("select", "*")
            .param("order", map.order_by(order));
        self.rows(request)?
            .into_iter()
            .map(|row| map.decode(row).map_err(StoreError::from))
            .collect()
    }

    fn get<R: DeserializeOwned>(&self, map: FieldMap, id: &str) -> StoreResult<Option<R>> {
        let request = Request::new(Method::Get, map.table)
            .param("select", "*")
            .eq("id", id);
        match self.rows(request) {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(Some(map.decode(row)?)),
                None => Ok(None),
            },
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert<R: Serialize + DeserializeOwned>(&self, map: FieldMap, record: &R) -> StoreResult<R> {
        let row = map.encode(record)?;
        let request = Request::new(Method::Post, map.table).body(Value::Object(row));
        match self.rows(request)?.into_iter().next() {
            Some(row) => Ok(map.decode(row)?),
            None => Err(StoreError::Rejected(format!(
                "insert into {} returned no row",
                map.table
            ))),
        }
    }

    fn update<P: Serialize, R: DeserializeOwned>(
        &self,
        map: FieldMap,
        kind: EntityKind,
        id: &str,
        patch: &P,
    ) -> StoreResult<R> {
        let mut row = map.encode(patch)?;
        row.insert(
            "updated_at".into(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        let request = Request::new(Method::Patch, map.table)
            .eq("id", id)
            .body(Value::Object(row));
        match self.rows(request) {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(map.decode(row)?),
                None => Err(StoreError::not_found(kind, id)),
            },
            Err(e) if e.is_not_found() => Err(StoreError::not_found(kind, id)),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, map: FieldMap, id: &str) -> StoreResult<bool> {
        let request = Request::new(Method::Delete, map.table).eq("id", id);
        match self.rows(request) {
            Ok(rows) => Ok(!rows.is_empty()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self, map: FieldMap) -> StoreResult<u64> {
        let request = Request::new(Method::Get, map.table).param("select", "id");
        Ok(self.rows(request)?.len() as u64)
    }

    fn decode_enriched(&self, row: Value) -> StoreResult<EnrichedSession> {
        let patient = person_name(row.get("paciente"));
        let staff = person_name(row.get("personal"));
        let horse = row
            .get("caballo")
            .and_then(|h| h.get("nombre"))
            .and_then(Value::as_str)
            .map(|name| HorseName {
                name: name.to_string(),
            });
        let session: Session = mapping::SESSION.decode(row)?;
        Ok(EnrichedSession {
            session,
            patient,
            horse,
            staff,
        })
    }
}

fn person_name(value: Option<&Value>) -> Option<PersonName> {
    let value = value?;
    Some(PersonName {
        first_name: value.get("nombre")?.as_str()?.to_string(),
        last_name: value.get("apellido")?.as_str()?.to_string(),
    })
}

/// Build a status error from a PostgREST error body (`code`, `message`).
fn status_error(response: &Response) -> RemoteError {
    let parsed: Option<Value> = serde_json::from_str(&response.body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    RemoteError::Status {
        status: response.status,
        code: field("code"),
        message: field("message").unwrap_or_else(|| response.body.clone()),
    }
}

impl<T: Transport> Store for RemoteStore<T> {
    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.list(mapping::PATIENT, &["last_name", "first_name"])
    }

    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        self.get(mapping::PATIENT, id)
    }

    fn insert_patient(&mut self, new: NewPatient) -> StoreResult<Patient> {
        self.insert(mapping::PATIENT, &Patient::create(new))
    }

    fn update_patient(&mut self, id: &str, patch: PatientPatch) -> StoreResult<Patient> {
        self.update(mapping::PATIENT, EntityKind::Patient, id, &patch)
    }

    fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
        self.delete(mapping::PATIENT, id)
    }

    fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        self.list(mapping::STAFF, &["last_name", "first_name"])
    }

    fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        self.get(mapping::STAFF, id)
    }

    fn insert_staff(&mut self, new: NewStaff) -> StoreResult<Staff> {
        self.insert(mapping::STAFF, &Staff::create(new))
    }

    fn update_staff(&mut self, id: &str, patch: StaffPatch) -> StoreResult<Staff> {
        self.update(mapping::STAFF, EntityKind::Staff, id, &patch)
    }

    fn delete_staff(&mut self, id: &str) -> StoreResult<bool> {
        self.delete(mapping::STAFF, id)
    }

    fn list_horses(&self) -> StoreResult<Vec<Horse>> {
        self.list(mapping::HORSE, &["name"])
    }

    fn get_horse(&self, id: &str) -> StoreResult<Option<Horse>> {
        self.get(mapping::HORSE, id)
    }

    fn insert_horse(&mut self, new: NewHorse) -> StoreResult<Horse> {
        self.insert(mapping::HORSE, &Horse::create(new))
    }

    fn update_horse(&mut self, id: &str, patch: HorsePatch) -> StoreResult<Horse> {
        self.update(mapping::HORSE, EntityKind::Horse, id, &patch)
    }

    fn delete_horse(&mut self, id: &str) -> StoreResult<bool> {
        self.delete(mapping::HORSE, id)
    }

    fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        self.list(mapping::SESSION, &["date", "time"])
    }

    fn get_session(&self, id: &str) -> StoreResult<Option<Session>> {
        self.get(mapping::SESSION, id)
    }

    fn insert_session(&mut self, new: NewSession) -> StoreResult<Session> {
        self.insert(mapping::SESSION, &Session::create(new))
    }

    fn update_session(&mut self, id: &str, patch: SessionPatch) -> StoreResult<Session> {
        self.update(mapping::SESSION, EntityKind::Session, id, &patch)
    }

    fn delete_session(&mut self, id: &str) -> StoreResult<bool> {
        self.delete(mapping::SESSION, id)
    }

    fn counts(&self) -> StoreResult<RecordCounts> {
        Ok(RecordCounts {
            patients: self.count(mapping::PATIENT)?,
            staff: self.count(mapping::STAFF)?,
            horses: self.count(mapping::HORSE)?,
            sessions: self.count(mapping::SESSION)?,
        })
    }

    fn list_enriched_sessions(&self) -> StoreResult<Vec<EnrichedSession>> {
        let request = Request::new(Method::Get, mapping::SESSION.table)
            .param("select", SESSION_JOIN)
            .param("order", mapping::SESSION.order_by(&["date", "time"]));
        self.rows(request)?
            .into_iter()
            .map(|row| self.decode_enriched(row))
            .collect()
    }

    fn get_enriched_session(&self, id: &str) -> StoreResult<Option<EnrichedSession>> {
        let request = Request::new(Method::Get, mapping::SESSION.table)
            .param("select", SESSION_JOIN)
            .eq("id", id);
        self.rows(request)?
            .into_iter()
            .next()
            .map(|row| self.decode_enriched(row))
            .transpose()
    }
}
