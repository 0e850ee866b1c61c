//! Equine Core Library
//!
//! Record management for an equine-therapy clinic: patients, staff, horses and
//! therapy sessions, with a dashboard over them.
//!
//! # Architecture
//!
//! ```text
//!        UI shell (native, via FFI)
//!                 │
//!        ┌────────▼────────┐
//!        │      views      │  list / detail / form / dashboard controllers
//!        └────────┬────────┘
//!                 │
//!        ┌────────▼────────┐      ┌──────────┐
//!        │     service     │─────▶│  notify  │  success / error toasts
//!        └────────┬────────┘      └──────────┘
//!                 │ Store
//!     ┌───────────┼────────────────┐
//!     ▼           ▼                ▼
//! MemoryStore  Database        RemoteStore
//!  (in-proc)   (SQLite)     (hosted REST tables)
//! ```
//!
//! Exactly one backend is active, chosen by [`config::ClinicConfig`].
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Staff, Horse, Session)
//! - [`store`]: Persistence adapter trait and in-memory backend
//! - [`db`]: SQLite backend
//! - [`remote`]: Hosted relational backend and field mapping
//! - [`service`]: Entity data service, enrichment and dashboard aggregates
//! - [`notify`]: Transient user notifications
//! - [`views`]: View-model controllers for the UI
//! - [`config`]: Deployment configuration
//! - [`telemetry`]: Logging setup

pub mod config;
pub mod db;
pub mod models;
pub mod notify;
pub mod remote;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod views;

// Re-export commonly used types
pub use config::{Backend, ClinicConfig};
pub use db::Database;
pub use models::{
    EnrichedSession, EntityKind, Horse, NewHorse, NewPatient, NewSession, NewStaff, Patient,
    Session, SessionStatus, Staff,
};
pub use notify::{Notification, NotificationLog, Notifier};
pub use service::{ClinicService, DatabaseStatus, Lookup, Statistics};
pub use store::{MemoryStore, Store, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info};

use models::SessionPatch;
use views::form::{
    FormSpec, FormValues, HorseForm, PatientForm, SessionForm, StaffForm, ValidationErrors,
    INCOMPLETE, INVALID,
};

/// Backend behind the FFI object.
pub type DynStore = Box<dyn Store + Send>;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<db::DbError> for ClinicError {
    fn from(e: db::DbError) -> Self {
        ClinicError::Storage(e.to_string())
    }
}

impl From<config::ConfigError> for ClinicError {
    fn from(e: config::ConfigError) -> Self {
        ClinicError::Config(e.to_string())
    }
}

impl From<remote::RemoteError> for ClinicError {
    fn from(e: remote::RemoteError) -> Self {
        ClinicError::Storage(e.to_string())
    }
}

impl From<ValidationErrors> for ClinicError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .iter()
            .map(|(key, message)| format!("{key}: {message}"))
            .collect();
        ClinicError::InvalidInput(fields.join("; "))
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Backend selection
// =========================================================================

/// Build the configured backend.
pub fn open_store(config: &ClinicConfig) -> Result<DynStore, ClinicError> {
    match config.backend {
        Backend::Memory => {
            info!("Using in-memory store");
            Ok(Box::new(MemoryStore::seeded()))
        }
        Backend::Sqlite => {
            let mut db = Database::open(&config.sqlite.path)?;
            if config.sqlite.seed {
                db.load_seed_if_empty(&models::seed::SeedData::load())?;
            }
            Ok(Box::new(db))
        }
        Backend::Remote => open_remote(config),
    }
}

#[cfg(feature = "remote")]
fn open_remote(config: &ClinicConfig) -> Result<DynStore, ClinicError> {
    let url = config.remote.url.as_deref().unwrap_or_default();
    let key = config.remote.api_key.as_deref().unwrap_or_default();
    info!(url, "Using hosted store");
    let transport = remote::HttpTransport::new(url, key, config.remote.timeout())?;
    Ok(Box::new(remote::RemoteStore::new(transport)))
}

#[cfg(not(feature = "remote"))]
fn open_remote(_config: &ClinicConfig) -> Result<DynStore, ClinicError> {
    Err(ClinicError::Config(
        "remote backend requires the `remote` feature".into(),
    ))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a SQLite store at the given path, seeding it when empty.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let mut db = Database::open(&path)?;
    db.load_seed_if_empty(&models::seed::SeedData::load())?;
    Ok(ClinicCore::with_store(Box::new(db)))
}

/// In-memory store with the sample records (for testing and demos).
#[uniffi::export]
pub fn open_in_memory() -> Arc<ClinicCore> {
    ClinicCore::with_store(Box::new(MemoryStore::seeded()))
}

/// Load a TOML configuration file, set up logging and open its backend.
#[uniffi::export]
pub fn open_from_config(path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let config = ClinicConfig::from_file(Path::new(&path))?;
    telemetry::init_logging(config.log_filter.as_deref());
    Ok(ClinicCore::with_store(open_store(&config)?))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe service wrapper for FFI.
///
/// Failed operations return `None`/`false` and queue an error notification;
/// the UI shows whatever [`drain_notifications`](Self::drain_notifications)
/// returns.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    service: Arc<Mutex<ClinicService<DynStore>>>,
    notifications: Arc<NotificationLog>,
}

impl ClinicCore {
    pub fn with_store(store: DynStore) -> Arc<Self> {
        let notifications = Arc::new(NotificationLog::new());
        let service = ClinicService::new(store, notifications.clone());
        Arc::new(Self {
            service: Arc::new(Mutex::new(service)),
            notifications,
        })
    }

    /// Run the form rules for `F` over host input. Failures queue the same
    /// notification the form would and never reach the store.
    fn validate<F: FormSpec>(&self, values: FormValues) -> Result<F::Input, ClinicError> {
        F::parse(&values).map_err(|errors| {
            debug!(kind = %F::KIND, fields = errors.len(), "rejected host input");
            self.notifications
                .error(if errors.has_missing() { INCOMPLETE } else { INVALID });
            errors.into()
        })
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.list_patients().into_iter().map(Into::into).collect())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.get_patient(&id).map(Into::into))
    }

    pub fn create_patient(&self, input: FfiPatientInput) -> Result<Option<FfiPatient>, ClinicError> {
        let new = self.validate::<PatientForm>(input.into())?;
        let mut service = self.service.lock()?;
        Ok(service.create_patient(new).map(Into::into))
    }

    /// Replace every editable field of a patient.
    pub fn update_patient(
        &self,
        id: String,
        input: FfiPatientInput,
    ) -> Result<Option<FfiPatient>, ClinicError> {
        let new = self.validate::<PatientForm>(input.into())?;
        let mut service = self.service.lock()?;
        Ok(service.update_patient(&id, new.into()).map(Into::into))
    }

    pub fn delete_patient(&self, id: String) -> Result<bool, ClinicError> {
        let mut service = self.service.lock()?;
        Ok(service.delete_patient(&id))
    }

    // =========================================================================
    // Staff Operations
    // =========================================================================

    pub fn list_staff(&self) -> Result<Vec<FfiStaff>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.list_staff().into_iter().map(Into::into).collect())
    }

    pub fn get_staff(&self, id: String) -> Result<Option<FfiStaff>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.get_staff(&id).map(Into::into))
    }

    pub fn create_staff(&self, input: FfiStaffInput) -> Result<Option<FfiStaff>, ClinicError> {
        let new = self.validate::<StaffForm>(input.into())?;
        let mut service = self.service.lock()?;
        Ok(service.create_staff(new).map(Into::into))
    }

    pub fn update_staff(
        &self,
        id: String,
        input: FfiStaffInput,
    ) -> Result<Option<FfiStaff>, ClinicError> {
        let new = self.validate::<StaffForm>(input.into())?;
        let mut service = self.service.lock()?;
        Ok(service.update_staff(&id, new.into()).map(Into::into))
    }

    pub fn delete_staff(&self, id: String) -> Result<bool, ClinicError> {
        let mut service = self.service.lock()?;
        Ok(service.delete_staff(&id))
    }

    // =========================================================================
    // Horse Operations
    // =========================================================================

    pub fn list_horses(&self) -> Result<Vec<FfiHorse>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.list_horses().into_iter().map(Into::into).collect())
    }

    pub fn get_horse(&self, id: String) -> Result<Option<FfiHorse>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.get_horse(&id).map(Into::into))
    }

    pub fn create_horse(&self, input: FfiHorseInput) -> Result<Option<FfiHorse>, ClinicError> {
        let new = self.validate::<HorseForm>(input.into())?;
        let mut service = self.service.lock()?;
        Ok(service.create_horse(new).map(Into::into))
    }

    pub fn update_horse(
        &self,
        id: String,
        input: FfiHorseInput,
    ) -> Result<Option<FfiHorse>, ClinicError> {
        let new = self.validate::<HorseForm>(input.into())?;
        let mut service = self.service.lock()?;
        Ok(service.update_horse(&id, new.into()).map(Into::into))
    }

    pub fn delete_horse(&self, id: String) -> Result<bool, ClinicError> {
        let mut service = self.service.lock()?;
        Ok(service.delete_horse(&id))
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// All sessions with patient, horse and therapist names.
    pub fn list_sessions(&self) -> Result<Vec<FfiSession>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.list_sessions().into_iter().map(Into::into).collect())
    }

    pub fn get_session(&self, id: String) -> Result<Option<FfiSession>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.get_session(&id).map(Into::into))
    }

    pub fn create_session(&self, input: FfiSessionInput) -> Result<Option<FfiSession>, ClinicError> {
        let new = self.validate::<SessionForm>(input.into())?;
        let mut service = self.service.lock()?;
        let Some(created) = service.create_session(new) else {
            return Ok(None);
        };
        Ok(service.get_session(&created.id).map(Into::into))
    }

    /// Replace the session's fields; an absent status keeps the stored one.
    pub fn update_session(
        &self,
        id: String,
        input: FfiSessionInput,
    ) -> Result<Option<FfiSession>, ClinicError> {
        let keep_status = input.status.is_none();
        let new = self.validate::<SessionForm>(input.into())?;
        let mut patch = SessionPatch::from(new);
        if keep_status {
            patch.status = None;
        }
        let mut service = self.service.lock()?;
        if service.update_session(&id, patch).is_none() {
            return Ok(None);
        }
        Ok(service.get_session(&id).map(Into::into))
    }

    pub fn delete_session(&self, id: String) -> Result<bool, ClinicError> {
        let mut service = self.service.lock()?;
        Ok(service.delete_session(&id))
    }

    // =========================================================================
    // Dashboard Operations
    // =========================================================================

    pub fn statistics(&self) -> Result<FfiStatistics, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.statistics().into())
    }

    /// Scheduled sessions, soonest first.
    pub fn upcoming_sessions(&self, limit: u32) -> Result<Vec<FfiSession>, ClinicError> {
        let service = self.service.lock()?;
        Ok(service
            .upcoming_sessions(limit as usize)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn database_status(&self) -> Result<FfiDatabaseStatus, ClinicError> {
        let service = self.service.lock()?;
        Ok(service.database_status().into())
    }

    /// Notifications queued since the last call, oldest first.
    pub fn drain_notifications(&self) -> Vec<FfiNotification> {
        self.notifications
            .drain()
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub diagnosis: Option<String>,
    pub therapy_goals: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            document_id: p.document_id,
            first_name: p.first_name,
            last_name: p.last_name,
            birth_date: format_date(p.birth_date),
            phone: p.phone,
            email: p.email,
            diagnosis: p.diagnosis,
            therapy_goals: p.therapy_goals,
            notes: p.notes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Editable patient fields; dates as `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub diagnosis: Option<String>,
    pub therapy_goals: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiPatientInput> for FormValues {
    fn from(input: FfiPatientInput) -> Self {
        FormValues::from([
            ("document_id", input.document_id),
            ("first_name", input.first_name),
            ("last_name", input.last_name),
            ("birth_date", input.birth_date.unwrap_or_default()),
            ("phone", input.phone.unwrap_or_default()),
            ("email", input.email.unwrap_or_default()),
            ("diagnosis", input.diagnosis.unwrap_or_default()),
            ("therapy_goals", input.therapy_goals.unwrap_or_default()),
            ("notes", input.notes.unwrap_or_default()),
        ])
    }
}

/// FFI-safe staff member.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaff {
    pub id: String,
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Staff> for FfiStaff {
    fn from(s: Staff) -> Self {
        Self {
            id: s.id,
            document_id: s.document_id,
            first_name: s.first_name,
            last_name: s.last_name,
            phone: s.phone,
            email: s.email,
            specialty: s.specialty,
            role: s.role,
            hire_date: format_date(s.hire_date),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaffInput {
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<String>,
}

impl From<FfiStaffInput> for FormValues {
    fn from(input: FfiStaffInput) -> Self {
        FormValues::from([
            ("document_id", input.document_id),
            ("first_name", input.first_name),
            ("last_name", input.last_name),
            ("phone", input.phone.unwrap_or_default()),
            ("email", input.email.unwrap_or_default()),
            ("specialty", input.specialty.unwrap_or_default()),
            ("role", input.role.unwrap_or_default()),
            ("hire_date", input.hire_date.unwrap_or_default()),
        ])
    }
}

/// FFI-safe horse.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHorse {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub temperament: Option<String>,
    pub training: Option<String>,
    pub medical_history: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Horse> for FfiHorse {
    fn from(h: Horse) -> Self {
        Self {
            id: h.id,
            name: h.name,
            age: h.age,
            breed: h.breed,
            color: h.color,
            height: h.height,
            weight: h.weight,
            temperament: h.temperament,
            training: h.training,
            medical_history: h.medical_history,
            created_at: h.created_at,
            updated_at: h.updated_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHorseInput {
    pub name: String,
    pub age: Option<u32>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub temperament: Option<String>,
    pub training: Option<String>,
    pub medical_history: Option<String>,
}

impl From<FfiHorseInput> for FormValues {
    fn from(input: FfiHorseInput) -> Self {
        FormValues::from([
            ("name", input.name),
            ("age", input.age.map(|a| a.to_string()).unwrap_or_default()),
            ("breed", input.breed.unwrap_or_default()),
            ("color", input.color.unwrap_or_default()),
            ("height", input.height.unwrap_or_default()),
            ("weight", input.weight.unwrap_or_default()),
            ("temperament", input.temperament.unwrap_or_default()),
            ("training", input.training.unwrap_or_default()),
            ("medical_history", input.medical_history.unwrap_or_default()),
        ])
    }
}

/// FFI-safe session with linked display names.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub id: String,
    pub date: String,
    pub time: String,
    pub patient_id: String,
    pub horse_id: String,
    pub staff_id: String,
    pub duration: Option<String>,
    pub activities: Option<String>,
    pub notes: Option<String>,
    /// scheduled | completed | cancelled
    pub status: String,
    pub patient_name: Option<String>,
    pub horse_name: Option<String>,
    pub staff_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EnrichedSession> for FfiSession {
    fn from(enriched: EnrichedSession) -> Self {
        let patient_name = enriched.patient_name();
        let horse_name = enriched.horse_name().map(str::to_string);
        let staff_name = enriched.staff_name();
        let s = enriched.session;
        Self {
            id: s.id,
            date: s.date.format("%Y-%m-%d").to_string(),
            time: s.time,
            patient_id: s.patient_id,
            horse_id: s.horse_id,
            staff_id: s.staff_id,
            duration: s.duration,
            activities: s.activities,
            notes: s.notes,
            status: s.status.as_str().to_string(),
            patient_name,
            horse_name,
            staff_name,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSessionInput {
    pub date: String,
    pub time: String,
    pub patient_id: String,
    pub horse_id: String,
    pub staff_id: String,
    pub duration: Option<String>,
    pub activities: Option<String>,
    pub notes: Option<String>,
    /// Scheduled when absent on create; unchanged when absent on update.
    pub status: Option<String>,
}

impl From<FfiSessionInput> for FormValues {
    fn from(input: FfiSessionInput) -> Self {
        FormValues::from([
            ("date", input.date),
            ("time", input.time),
            ("patient_id", input.patient_id),
            ("horse_id", input.horse_id),
            ("staff_id", input.staff_id),
            ("duration", input.duration.unwrap_or_default()),
            ("activities", input.activities.unwrap_or_default()),
            ("notes", input.notes.unwrap_or_default()),
            ("status", input.status.unwrap_or_default()),
        ])
    }
}

/// FFI-safe dashboard counts.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatistics {
    pub patients: u64,
    pub staff: u64,
    pub horses: u64,
    pub scheduled_sessions: u64,
    pub completed_sessions: u64,
}

impl From<Statistics> for FfiStatistics {
    fn from(s: Statistics) -> Self {
        Self {
            patients: s.patients,
            staff: s.staff,
            horses: s.horses,
            scheduled_sessions: s.scheduled_sessions,
            completed_sessions: s.completed_sessions,
        }
    }
}

/// FFI-safe backend status; counts are zero when disconnected.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDatabaseStatus {
    pub connected: bool,
    pub message: Option<String>,
    pub patients: u64,
    pub staff: u64,
    pub horses: u64,
    pub sessions: u64,
}

impl From<DatabaseStatus> for FfiDatabaseStatus {
    fn from(status: DatabaseStatus) -> Self {
        match status {
            DatabaseStatus::Connected { counts } => Self {
                connected: true,
                message: None,
                patients: counts.patients,
                staff: counts.staff,
                horses: counts.horses,
                sessions: counts.sessions,
            },
            DatabaseStatus::Error { message } => Self {
                connected: false,
                message: Some(message),
                patients: 0,
                staff: 0,
                horses: 0,
                sessions: 0,
            },
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    /// success | error | info
    pub level: String,
    pub message: String,
}

impl From<Notification> for FfiNotification {
    fn from(n: Notification) -> Self {
        Self {
            level: n.level.as_str().to_string(),
            message: n.message,
        }
    }
}
