//! Process-local store for tests and fixtures.

use tracing::debug;

use super::{RecordCounts, Store, StoreError, StoreResult};
use crate::models::seed::SeedData;
use crate::models::{
    EntityKind, Horse, HorsePatch, NewHorse, NewPatient, NewSession, NewStaff, Patient,
    PatientPatch, Session, SessionPatch, Staff, StaffPatch,
};

/// In-memory backend. Contents are lost when the value is dropped.
///
/// Does not enforce document-number uniqueness or session references; the
/// service layer checks references before writing.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    patients: Vec<Patient>,
    staff: Vec<Staff>,
    horses: Vec<Horse>,
    sessions: Vec<Session>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the sample rows.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.load(SeedData::load());
        store
    }

    /// Replace all contents with `seed`.
    pub fn load(&mut self, seed: SeedData) {
        self.patients = seed.patients;
        self.staff = seed.staff;
        self.horses = seed.horses;
        self.sessions = seed.sessions;
    }

    /// Drop every record.
    pub fn reset(&mut self) {
        debug!("Resetting in-memory store");
        *self = Self::default();
    }
}

fn remove_by_id<T>(rows: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &str) -> bool {
    let before = rows.len();
    rows.retain(|row| key(row) != id);
    rows.len() != before
}

impl Store for MemoryStore {
    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut rows = self.patients.clone();
        rows.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(rows)
    }

    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        Ok(self.patients.iter().find(|p| p.id == id).cloned())
    }

    fn insert_patient(&mut self, new: NewPatient) -> StoreResult<Patient> {
        let patient = Patient::create(new);
        self.patients.push(patient.clone());
        Ok(patient)
    }

    fn update_patient(&mut self, id: &str, patch: PatientPatch) -> StoreResult<Patient> {
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Patient, id))?;
        patch.apply(patient);
        Ok(patient.clone())
    }

    fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by_id(&mut self.patients, id, |p| p.id.as_str()))
    }

    fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        let mut rows = self.staff.clone();
        rows.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(rows)
    }

    fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        Ok(self.staff.iter().find(|s| s.id == id).cloned())
    }

    fn insert_staff(&mut self, new: NewStaff) -> StoreResult<Staff> {
        let staff = Staff::create(new);
        self.staff.push(staff.clone());
        Ok(staff)
    }

    fn update_staff(&mut self, id: &str, patch: StaffPatch) -> StoreResult<Staff> {
        let staff = self
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Staff, id))?;
        patch.apply(staff);
        Ok(staff.clone())
    }

    fn delete_staff(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by_id(&mut self.staff, id, |s| s.id.as_str()))
    }

    fn list_horses(&self) -> StoreResult<Vec<Horse>> {
        let mut rows = self.horses.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    fn get_horse(&self, id: &str) -> StoreResult<Option<Horse>> {
        Ok(self.horses.iter().find(|h| h.id == id).cloned())
    }

    fn insert_horse(&mut self, new: NewHorse) -> StoreResult<Horse> {
        let horse = Horse::create(new);
        self.horses.push(horse.clone());
        Ok(horse)
    }

    fn update_horse(&mut self, id: &str, patch: HorsePatch) -> StoreResult<Horse> {
        let horse = self
            .horses
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Horse, id))?;
        patch.apply(horse);
        Ok(horse.clone())
    }

    fn delete_horse(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by_id(&mut self.horses, id, |h| h.id.as_str()))
    }

    fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        let mut rows = self.sessions.clone();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        Ok(rows)
    }

    fn get_session(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.iter().find(|s| s.id == id).cloned())
    }

    fn insert_session(&mut self, new: NewSession) -> StoreResult<Session> {
        let session = Session::create(new);
        self.sessions.push(session.clone());
        Ok(session)
    }

    fn update_session(&mut self, id: &str, patch: SessionPatch) -> StoreResult<Session> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))?;
        patch.apply(session);
        Ok(session.clone())
    }

    fn delete_session(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by_id(&mut self.sessions, id, |s| s.id.as_str()))
    }

    fn counts(&self) -> StoreResult<RecordCounts> {
        Ok(RecordCounts {
            patients: self.patients.len() as u64,
            staff: self.staff.len() as u64,
            horses: self.horses.len() as u64,
            sessions: self.sessions.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;

    #[test]
    fn test_seeded_counts() {
        let store = MemoryStore::seeded();
        let counts = store.counts().unwrap();
        assert_eq!(
            counts,
            RecordCounts {
                patients: 3,
                staff: 3,
                horses: 3,
                sessions: 3
            }
        );
    }

    #[test]
    fn test_reset_empties_store() {
        let mut store = MemoryStore::seeded();
        store.reset();
        assert_eq!(store.counts().unwrap(), RecordCounts::default());
    }

    #[test]
    fn test_insert_assigns_id() {
        let mut store = MemoryStore::new();
        let horse = store
            .insert_horse(NewHorse {
                name: "Canela".into(),
                ..Default::default()
            })
            .unwrap();
        assert!(!horse.id.is_empty());
        assert_eq!(store.get_horse(&horse.id).unwrap(), Some(horse));
    }

    #[test]
    fn test_delete_missing_is_false() {
        let mut store = MemoryStore::seeded();
        assert!(!store.delete_patient("nope").unwrap());
        assert!(store.delete_patient("pat-1").unwrap());
        assert!(store.get_patient("pat-1").unwrap().is_none());
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store
            .update_session("ghost", SessionPatch::status(SessionStatus::Cancelled))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Session,
                ..
            }
        ));
    }

    #[test]
    fn test_default_join_resolves_names() {
        let store = MemoryStore::seeded();
        let session = store.get_enriched_session("ses-3").unwrap().unwrap();
        assert_eq!(session.patient_name().as_deref(), Some("Ana Martínez"));
        assert_eq!(session.horse_name(), Some("Trueno"));
        assert_eq!(session.staff_name().as_deref(), Some("Roberto Díaz"));
    }

    #[test]
    fn test_sessions_sorted_by_date() {
        let store = MemoryStore::seeded();
        let sessions = store.list_sessions().unwrap();
        assert!(sessions.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
