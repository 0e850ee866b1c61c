//! Entity data service.
//!
//! [`ClinicService`] sits between the views and the active [`Store`]. Every
//! store failure is caught here, logged, and turned into an empty result plus
//! an error notification; callers only ever see `Option`, `Vec` or `bool`.

mod enrich;
mod stats;

pub use enrich::{enrich_sessions, select_upcoming};
pub use stats::{DatabaseStatus, Statistics};

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::models::{
    EnrichedSession, EntityKind, Horse, HorsePatch, NewHorse, NewPatient, NewSession, NewStaff,
    Patient, PatientPatch, Session, SessionPatch, Staff, StaffPatch,
};
use crate::notify::{Notifier, TracingNotifier};
use crate::store::{Store, StoreError, StoreResult};

/// Number of sessions shown on the dashboard.
pub const DASHBOARD_UPCOMING: usize = 5;

#[derive(Debug, Clone, Copy)]
enum Op {
    Load,
    Create,
    Update,
    Delete,
}

impl Op {
    fn verb(self) -> &'static str {
        match self {
            Op::Load => "loading",
            Op::Create => "creating",
            Op::Update => "updating",
            Op::Delete => "deleting",
        }
    }
}

/// Result of reading one record by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// The store answered and has no such record.
    Missing,
    /// The store failed; the failure is already reported.
    Failed,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Failed => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Missing => Lookup::Missing,
            Lookup::Failed => Lookup::Failed,
        }
    }
}

/// Typed CRUD and aggregates over one store.
pub struct ClinicService<S: Store> {
    store: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: Store> ClinicService<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Service whose notifications only go to the log.
    pub fn with_tracing(store: S) -> Self {
        Self::new(store, Arc::new(TracingNotifier))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Log and notify a failed store call.
    fn fail(&self, op: Op, kind: EntityKind, id: Option<&str>, err: &StoreError) {
        let target = kind.noun().to_lowercase();
        match err {
            StoreError::Unavailable(_) | StoreError::Corrupt(_) => {
                error!(kind = %kind, id = id.unwrap_or("-"), error = %err, "Error {} {}", op.verb(), target)
            }
            _ => {
                warn!(kind = %kind, id = id.unwrap_or("-"), error = %err, "Error {} {}", op.verb(), target)
            }
        }

        let message = match (op, id, err) {
            (_, _, StoreError::Constraint(detail)) => {
                format!("Error {} {}: {}", op.verb(), target, detail)
            }
            (Op::Load, None, _) => format!("Error loading {}", kind.plural()),
            _ => format!("Error {} {}", op.verb(), target),
        };
        self.notifier.error(&message);
    }

    fn guard<T>(&self, op: Op, kind: EntityKind, id: Option<&str>, result: StoreResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.fail(op, kind, id, &err);
                None
            }
        }
    }

    fn guard_lookup<T>(&self, kind: EntityKind, id: &str, result: StoreResult<Option<T>>) -> Lookup<T> {
        match self.guard(Op::Load, kind, Some(id), result) {
            Some(Some(value)) => Lookup::Found(value),
            Some(None) => Lookup::Missing,
            None => Lookup::Failed,
        }
    }

    fn guard_delete(&self, kind: EntityKind, id: &str, result: StoreResult<bool>) -> bool {
        match result {
            Ok(true) => {
                debug!(kind = %kind, id, "Deleted");
                true
            }
            Ok(false) => {
                self.fail(Op::Delete, kind, Some(id), &StoreError::not_found(kind, id));
                false
            }
            Err(err) => {
                self.fail(Op::Delete, kind, Some(id), &err);
                false
            }
        }
    }

    // ========================================================================
    // Patients
    // ========================================================================

    pub fn list_patients(&self) -> Vec<Patient> {
        let result = self.store.list_patients();
        self.guard(Op::Load, EntityKind::Patient, None, result)
            .unwrap_or_default()
    }

    pub fn get_patient(&self, id: &str) -> Option<Patient> {
        self.lookup_patient(id).found()
    }

    pub fn lookup_patient(&self, id: &str) -> Lookup<Patient> {
        let result = self.store.get_patient(id);
        self.guard_lookup(EntityKind::Patient, id, result)
    }

    pub fn create_patient(&mut self, new: NewPatient) -> Option<Patient> {
        let result = self.store.insert_patient(new);
        self.guard(Op::Create, EntityKind::Patient, None, result)
    }

    pub fn update_patient(&mut self, id: &str, patch: PatientPatch) -> Option<Patient> {
        let result = self.store.update_patient(id, patch);
        self.guard(Op::Update, EntityKind::Patient, Some(id), result)
    }

    pub fn delete_patient(&mut self, id: &str) -> bool {
        let result = self.store.delete_patient(id);
        self.guard_delete(EntityKind::Patient, id, result)
    }

    // ========================================================================
    // Staff
    // ========================================================================

    pub fn list_staff(&self) -> Vec<Staff> {
        let result = self.store.list_staff();
        self.guard(Op::Load, EntityKind::Staff, None, result)
            .unwrap_or_default()
    }

    pub fn get_staff(&self, id: &str) -> Option<Staff> {
        self.lookup_staff(id).found()
    }

    pub fn lookup_staff(&self, id: &str) -> Lookup<Staff> {
        let result = self.store.get_staff(id);
        self.guard_lookup(EntityKind::Staff, id, result)
    }

    pub fn create_staff(&mut self, new: NewStaff) -> Option<Staff> {
        let result = self.store.insert_staff(new);
        self.guard(Op::Create, EntityKind::Staff, None, result)
    }

    pub fn update_staff(&mut self, id: &str, patch: StaffPatch) -> Option<Staff> {
        let result = self.store.update_staff(id, patch);
        self.guard(Op::Update, EntityKind::Staff, Some(id), result)
    }

    pub fn delete_staff(&mut self, id: &str) -> bool {
        let result = self.store.delete_staff(id);
        self.guard_delete(EntityKind::Staff, id, result)
    }

    // ========================================================================
    // Horses
    // ========================================================================

    pub fn list_horses(&self) -> Vec<Horse> {
        let result = self.store.list_horses();
        self.guard(Op::Load, EntityKind::Horse, None, result)
            .unwrap_or_default()
    }

    pub fn get_horse(&self, id: &str) -> Option<Horse> {
        self.lookup_horse(id).found()
    }

    pub fn lookup_horse(&self, id: &str) -> Lookup<Horse> {
        let result = self.store.get_horse(id);
        self.guard_lookup(EntityKind::Horse, id, result)
    }

    pub fn create_horse(&mut self, new: NewHorse) -> Option<Horse> {
        let result = self.store.insert_horse(new);
        self.guard(Op::Create, EntityKind::Horse, None, result)
    }

    pub fn update_horse(&mut self, id: &str, patch: HorsePatch) -> Option<Horse> {
        let result = self.store.update_horse(id, patch);
        self.guard(Op::Update, EntityKind::Horse, Some(id), result)
    }

    pub fn delete_horse(&mut self, id: &str) -> bool {
        let result = self.store.delete_horse(id);
        self.guard_delete(EntityKind::Horse, id, result)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// All sessions with linked display names.
    pub fn list_sessions(&self) -> Vec<EnrichedSession> {
        let result = self.store.list_enriched_sessions();
        self.guard(Op::Load, EntityKind::Session, None, result)
            .unwrap_or_default()
    }

    pub fn get_session(&self, id: &str) -> Option<EnrichedSession> {
        self.lookup_session(id).found()
    }

    /// Session with linked records, telling a missing id apart from a failure.
    pub fn lookup_session(&self, id: &str) -> Lookup<EnrichedSession> {
        let result = self.store.get_enriched_session(id);
        self.guard_lookup(EntityKind::Session, id, result)
    }

    pub fn create_session(&mut self, new: NewSession) -> Option<Session> {
        let result = self
            .check_references(
                Some(new.patient_id.as_str()),
                Some(new.horse_id.as_str()),
                Some(new.staff_id.as_str()),
            )
            .and_then(|()| self.store.insert_session(new));
        self.guard(Op::Create, EntityKind::Session, None, result)
    }

    pub fn update_session(&mut self, id: &str, patch: SessionPatch) -> Option<Session> {
        let result = self
            .check_references(
                patch.patient_id.as_deref(),
                patch.horse_id.as_deref(),
                patch.staff_id.as_deref(),
            )
            .and_then(|()| self.store.update_session(id, patch));
        self.guard(Op::Update, EntityKind::Session, Some(id), result)
    }

    pub fn delete_session(&mut self, id: &str) -> bool {
        let result = self.store.delete_session(id);
        self.guard_delete(EntityKind::Session, id, result)
    }

    /// Every given reference must resolve before a session is written.
    fn check_references(
        &self,
        patient_id: Option<&str>,
        horse_id: Option<&str>,
        staff_id: Option<&str>,
    ) -> StoreResult<()> {
        if let Some(id) = patient_id {
            if self.store.get_patient(id)?.is_none() {
                return Err(StoreError::Constraint(format!("unknown patient {id}")));
            }
        }
        if let Some(id) = horse_id {
            if self.store.get_horse(id)?.is_none() {
                return Err(StoreError::Constraint(format!("unknown horse {id}")));
            }
        }
        if let Some(id) = staff_id {
            if self.store.get_staff(id)?.is_none() {
                return Err(StoreError::Constraint(format!("unknown staff member {id}")));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Dashboard counts; all zeros if the store cannot answer.
    pub fn statistics(&self) -> Statistics {
        let result = self
            .store
            .counts()
            .and_then(|counts| Ok(Statistics::from_parts(counts, &self.store.list_sessions()?)));
        match result {
            Ok(stats) => stats,
            Err(err) => {
                error!(error = %err, "Error loading statistics");
                self.notifier.error("Error loading statistics");
                Statistics::default()
            }
        }
    }

    /// Scheduled sessions, soonest first, at most `limit`.
    pub fn upcoming_sessions(&self, limit: usize) -> Vec<EnrichedSession> {
        select_upcoming(self.list_sessions(), limit)
    }

    /// Status badge for the navigation bar. Failures are logged, not notified.
    pub fn database_status(&self) -> DatabaseStatus {
        match self.store.counts() {
            Ok(counts) => DatabaseStatus::Connected { counts },
            Err(err) => {
                warn!(error = %err, "Database status check failed");
                DatabaseStatus::Error {
                    message: err.to_string(),
                }
            }
        }
    }
}
