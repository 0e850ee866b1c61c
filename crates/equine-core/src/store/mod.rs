//! Persistence adapter contract.
//!
//! Every backend (in-memory, local SQLite, hosted relational) implements
//! [`Store`]. Exactly one backend is active in a deployment; the service layer
//! only ever talks to this trait.

mod memory;

pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    EnrichedSession, EntityKind, Horse, HorsePatch, NewHorse, NewPatient, NewSession, NewStaff,
    Patient, PatientPatch, Session, SessionPatch, Staff, StaffPatch,
};

/// Adapter failures, shared by all backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("{} not found: {id}", .kind.noun())]
    NotFound { kind: EntityKind, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record counts per table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordCounts {
    pub patients: u64,
    pub staff: u64,
    pub horses: u64,
    pub sessions: u64,
}

/// Typed CRUD over the four record kinds.
pub trait Store {
    // Patients
    fn list_patients(&self) -> StoreResult<Vec<Patient>>;
    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>>;
    fn insert_patient(&mut self, new: NewPatient) -> StoreResult<Patient>;
    fn update_patient(&mut self, id: &str, patch: PatientPatch) -> StoreResult<Patient>;
    fn delete_patient(&mut self, id: &str) -> StoreResult<bool>;

    // Staff
    fn list_staff(&self) -> StoreResult<Vec<Staff>>;
    fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>>;
    fn insert_staff(&mut self, new: NewStaff) -> StoreResult<Staff>;
    fn update_staff(&mut self, id: &str, patch: StaffPatch) -> StoreResult<Staff>;
    fn delete_staff(&mut self, id: &str) -> StoreResult<bool>;

    // Horses
    fn list_horses(&self) -> StoreResult<Vec<Horse>>;
    fn get_horse(&self, id: &str) -> StoreResult<Option<Horse>>;
    fn insert_horse(&mut self, new: NewHorse) -> StoreResult<Horse>;
    fn update_horse(&mut self, id: &str, patch: HorsePatch) -> StoreResult<Horse>;
    fn delete_horse(&mut self, id: &str) -> StoreResult<bool>;

    // Sessions
    fn list_sessions(&self) -> StoreResult<Vec<Session>>;
    fn get_session(&self, id: &str) -> StoreResult<Option<Session>>;
    fn insert_session(&mut self, new: NewSession) -> StoreResult<Session>;
    fn update_session(&mut self, id: &str, patch: SessionPatch) -> StoreResult<Session>;
    fn delete_session(&mut self, id: &str) -> StoreResult<bool>;

    /// Per-table record counts.
    fn counts(&self) -> StoreResult<RecordCounts>;

    /// All sessions with linked display names. Joins client-side unless the
    /// backend can do it in one query.
    fn list_enriched_sessions(&self) -> StoreResult<Vec<EnrichedSession>> {
        let sessions = self.list_sessions()?;
        let patients = self.list_patients()?;
        let horses = self.list_horses()?;
        let staff = self.list_staff()?;
        Ok(crate::service::enrich_sessions(
            sessions, &patients, &horses, &staff,
        ))
    }

    /// One session with linked display names.
    fn get_enriched_session(&self, id: &str) -> StoreResult<Option<EnrichedSession>> {
        let Some(session) = self.get_session(id)? else {
            return Ok(None);
        };
        let patients: Vec<Patient> = self.get_patient(&session.patient_id)?.into_iter().collect();
        let horses: Vec<Horse> = self.get_horse(&session.horse_id)?.into_iter().collect();
        let staff: Vec<Staff> = self.get_staff(&session.staff_id)?.into_iter().collect();
        Ok(crate::service::enrich_sessions(vec![session], &patients, &horses, &staff).pop())
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        (**self).list_patients()
    }
    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        (**self).get_patient(id)
    }
    fn insert_patient(&mut self, new: NewPatient) -> StoreResult<Patient> {
        (**self).insert_patient(new)
    }
    fn update_patient(&mut self, id: &str, patch: PatientPatch) -> StoreResult<Patient> {
        (**self).update_patient(id, patch)
    }
    fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
        (**self).delete_patient(id)
    }

    fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        (**self).list_staff()
    }
    fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        (**self).get_staff(id)
    }
    fn insert_staff(&mut self, new: NewStaff) -> StoreResult<Staff> {
        (**self).insert_staff(new)
    }
    fn update_staff(&mut self, id: &str, patch: StaffPatch) -> StoreResult<Staff> {
        (**self).update_staff(id, patch)
    }
    fn delete_staff(&mut self, id: &str) -> StoreResult<bool> {
        (**self).delete_staff(id)
    }

    fn list_horses(&self) -> StoreResult<Vec<Horse>> {
        (**self).list_horses()
    }
    fn get_horse(&self, id: &str) -> StoreResult<Option<Horse>> {
        (**self).get_horse(id)
    }
    fn insert_horse(&mut self, new: NewHorse) -> StoreResult<Horse> {
        (**self).insert_horse(new)
    }
    fn update_horse(&mut self, id: &str, patch: HorsePatch) -> StoreResult<Horse> {
        (**self).update_horse(id, patch)
    }
    fn delete_horse(&mut self, id: &str) -> StoreResult<bool> {
        (**self).delete_horse(id)
    }

    fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        (**self).list_sessions()
    }
    fn get_session(&self, id: &str) -> StoreResult<Option<Session>> {
        (**self).get_session(id)
    }
    fn insert_session(&mut self, new: NewSession) -> StoreResult<Session> {
        (**self).insert_session(new)
    }
    fn update_session(&mut self, id: &str, patch: SessionPatch) -> StoreResult<Session> {
        (**self).update_session(id, patch)
    }
    fn delete_session(&mut self, id: &str) -> StoreResult<bool> {
        (**self).delete_session(id)
    }

    fn counts(&self) -> StoreResult<RecordCounts> {
        (**self).counts()
    }
    fn list_enriched_sessions(&self) -> StoreResult<Vec<EnrichedSession>> {
        (**self).list_enriched_sessions()
    }
    fn get_enriched_session(&self, id: &str) -> StoreResult<Option<EnrichedSession>> {
        (**self).get_enriched_session(id)
    }
}
