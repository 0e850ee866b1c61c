//! [`ViewRecord`] for each record kind.

use chrono::NaiveDate;

use super::routes::Route;
use super::table::{Column, EmptyState};
use super::{DetailField, ViewRecord, UNASSIGNED};
use crate::models::{EnrichedSession, EntityKind, Horse, Patient, Staff};
use crate::service::{ClinicService, Lookup};
use crate::store::Store;

fn date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

const PATIENT_COLUMNS: &[Column] = &[
    Column::sortable("document_id", "Document"),
    Column::sortable("first_name", "First name"),
    Column::plain("last_name", "Last name"),
    Column::plain("diagnosis", "Diagnosis"),
];

impl ViewRecord for Patient {
    const KIND: EntityKind = EntityKind::Patient;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> String {
        self.full_name()
    }

    fn columns() -> &'static [Column] {
        PATIENT_COLUMNS
    }

    fn cell(&self, column: &str) -> String {
        match column {
            "document_id" => self.document_id.clone(),
            "first_name" => self.first_name.clone(),
            "last_name" => self.last_name.clone(),
            "diagnosis" => self.diagnosis.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn search_column() -> &'static str {
        "first_name"
    }

    fn fields(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Document", Some(self.document_id.clone())),
            DetailField::new("First name", Some(self.first_name.clone())),
            DetailField::new("Last name", Some(self.last_name.clone())),
            DetailField::new("Birth date", date(self.birth_date)),
            DetailField::new("Phone", self.phone.clone()),
            DetailField::new("Email", self.email.clone()),
            DetailField::new("Diagnosis", self.diagnosis.clone()),
            DetailField::new("Therapy goals", self.therapy_goals.clone()),
            DetailField::new("Notes", self.notes.clone()),
        ]
    }

    fn empty_state() -> EmptyState {
        EmptyState {
            title: "No patients",
            description: "No patients have been registered yet.",
            create_route: Route::New(EntityKind::Patient),
            create_label: "Register patient",
        }
    }

    fn load_all<S: Store>(service: &ClinicService<S>) -> Vec<Self> {
        service.list_patients()
    }

    fn load<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Self> {
        service.lookup_patient(id)
    }

    fn remove<S: Store>(service: &mut ClinicService<S>, id: &str) -> bool {
        service.delete_patient(id)
    }
}

const STAFF_COLUMNS: &[Column] = &[
    Column::sortable("document_id", "Document"),
    Column::sortable("first_name", "First name"),
    Column::plain("last_name", "Last name"),
    Column::plain("specialty", "Specialty"),
    Column::plain("role", "Role"),
];

impl ViewRecord for Staff {
    const KIND: EntityKind = EntityKind::Staff;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> String {
        self.full_name()
    }

    fn columns() -> &'static [Column] {
        STAFF_COLUMNS
    }

    fn cell(&self, column: &str) -> String {
        match column {
            "document_id" => self.document_id.clone(),
            "first_name" => self.first_name.clone(),
            "last_name" => self.last_name.clone(),
            "specialty" => self.specialty.clone().unwrap_or_default(),
            "role" => self.role.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn search_column() -> &'static str {
        "first_name"
    }

    fn fields(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Document", Some(self.document_id.clone())),
            DetailField::new("First name", Some(self.first_name.clone())),
            DetailField::new("Last name", Some(self.last_name.clone())),
            DetailField::new("Phone", self.phone.clone()),
            DetailField::new("Email", self.email.clone()),
            DetailField::new("Specialty", self.specialty.clone()),
            DetailField::new("Role", self.role.clone()),
            DetailField::new("Hire date", date(self.hire_date)),
        ]
    }

    fn empty_state() -> EmptyState {
        EmptyState {
            title: "No staff registered",
            description: "No staff members have been registered yet.",
            create_route: Route::New(EntityKind::Staff),
            create_label: "Register staff member",
        }
    }

    fn load_all<S: Store>(service: &ClinicService<S>) -> Vec<Self> {
        service.list_staff()
    }

    fn load<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Self> {
        service.lookup_staff(id)
    }

    fn remove<S: Store>(service: &mut ClinicService<S>, id: &str) -> bool {
        service.delete_staff(id)
    }
}

const HORSE_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::plain("age", "Age"),
    Column::plain("breed", "Breed"),
    Column::plain("temperament", "Temperament"),
];

impl ViewRecord for Horse {
    const KIND: EntityKind = EntityKind::Horse;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [Column] {
        HORSE_COLUMNS
    }

    fn cell(&self, column: &str) -> String {
        match column {
            "name" => self.name.clone(),
            "age" => self.age.map(|a| format!("{a} years")).unwrap_or_default(),
            "breed" => self.breed.clone().unwrap_or_default(),
            "temperament" => self.temperament.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn search_column() -> &'static str {
        "name"
    }

    fn fields(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Name", Some(self.name.clone())),
            DetailField::new("Age", self.age.map(|a| format!("{a} years"))),
            DetailField::new("Breed", self.breed.clone()),
            DetailField::new("Color", self.color.clone()),
            DetailField::new("Height", self.height.clone()),
            DetailField::new("Weight", self.weight.clone()),
            DetailField::new("Temperament", self.temperament.clone()),
            DetailField::new("Training", self.training.clone()),
            DetailField::new("Medical history", self.medical_history.clone()),
        ]
    }

    fn empty_state() -> EmptyState {
        EmptyState {
            title: "No horses",
            description: "No horses have been registered yet.",
            create_route: Route::New(EntityKind::Horse),
            create_label: "Register horse",
        }
    }

    fn load_all<S: Store>(service: &ClinicService<S>) -> Vec<Self> {
        service.list_horses()
    }

    fn load<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Self> {
        service.lookup_horse(id)
    }

    fn remove<S: Store>(service: &mut ClinicService<S>, id: &str) -> bool {
        service.delete_horse(id)
    }
}

const SESSION_COLUMNS: &[Column] = &[
    Column::sortable("date", "Date"),
    Column::plain("time", "Time"),
    Column::plain("patient", "Patient"),
    Column::plain("horse", "Horse"),
    Column::plain("staff", "Therapist"),
    Column::plain("status", "Status"),
];

impl ViewRecord for EnrichedSession {
    const KIND: EntityKind = EntityKind::Session;

    fn id(&self) -> &str {
        &self.session.id
    }

    fn title(&self) -> String {
        format!(
            "Session of {} {}",
            self.session.date.format("%Y-%m-%d"),
            self.session.time
        )
    }

    fn columns() -> &'static [Column] {
        SESSION_COLUMNS
    }

    fn cell(&self, column: &str) -> String {
        match column {
            "date" => self.session.date.format("%Y-%m-%d").to_string(),
            "time" => self.session.time.clone(),
            "patient" => self.patient_name().unwrap_or_else(|| UNASSIGNED.into()),
            "horse" => self.horse_name().unwrap_or(UNASSIGNED).to_string(),
            "staff" => self.staff_name().unwrap_or_else(|| UNASSIGNED.into()),
            "status" => self.session.status.label().to_string(),
            _ => String::new(),
        }
    }

    fn search_column() -> &'static str {
        "patient"
    }

    fn fields(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Date", date(Some(self.session.date))),
            DetailField::new("Time", Some(self.session.time.clone())),
            DetailField::new("Patient", Some(self.cell("patient"))),
            DetailField::new("Horse", Some(self.cell("horse"))),
            DetailField::new("Therapist", Some(self.cell("staff"))),
            DetailField::new("Duration", self.session.duration.clone()),
            DetailField::new("Activities", self.session.activities.clone()),
            DetailField::new("Notes", self.session.notes.clone()),
            DetailField::new("Status", Some(self.cell("status"))),
        ]
    }

    fn empty_state() -> EmptyState {
        EmptyState {
            title: "No sessions",
            description: "No sessions have been scheduled yet.",
            create_route: Route::New(EntityKind::Session),
            create_label: "Schedule session",
        }
    }

    fn load_all<S: Store>(service: &ClinicService<S>) -> Vec<Self> {
        service.list_sessions()
    }

    fn load<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Self> {
        service.lookup_session(id)
    }

    fn remove<S: Store>(service: &mut ClinicService<S>, id: &str) -> bool {
        service.delete_session(id)
    }
}
