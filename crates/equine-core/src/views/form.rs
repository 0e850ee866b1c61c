//! Create/edit forms.
//!
//! One [`FormController`] per record kind serves both creating and editing;
//! the mode comes from the route. Flow:
//!
//! ```text
//! create: Idle(empty) ─┐
//! edit:   LoadingExisting ── load ──> Idle(populated)
//!                                        │ submit
//!                    invalid input <─────┤ (no store call)
//!                                        ▼
//!                                    Submitting ──> Done(list route)
//!                                        │
//!                                        └── store failure ──> Idle + error
//! ```

use std::collections::BTreeMap;
use std::marker::PhantomData;

use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::routes::Route;
use crate::models::{
    EntityKind, Horse, NewHorse, NewPatient, NewSession, NewStaff, Patient, Session,
    SessionStatus, Staff,
};
use crate::service::{ClinicService, Lookup};
use crate::store::Store;

pub const REQUIRED: &str = "This field is required";
pub const INCOMPLETE: &str = "Please complete all required fields";
pub const INVALID: &str = "Please correct the highlighted fields";

/// Raw text of every field, keyed by field name.
pub type FormValues = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Date,
    Time,
    Number,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        required,
    }
}

/// One entry of a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Field-level validation failures.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &'static str, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any failure is a missing required value.
    pub fn has_missing(&self) -> bool {
        self.0.values().any(|m| m == REQUIRED)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

// ============================================================================
// Field parsing
// ============================================================================

/// Reads typed values out of [`FormValues`], collecting failures.
struct Parser<'a> {
    values: &'a FormValues,
    errors: ValidationErrors,
}

impl<'a> Parser<'a> {
    fn new(values: &'a FormValues) -> Self {
        Self {
            values,
            errors: ValidationErrors::default(),
        }
    }

    fn raw(&self, key: &str) -> &str {
        self.values.get(key).map(|v| v.trim()).unwrap_or("")
    }

    fn optional(&self, key: &str) -> Option<String> {
        let value = self.raw(key);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn required(&mut self, key: &'static str) -> String {
        let value = self.raw(key).to_string();
        if value.is_empty() {
            self.errors.insert(key, REQUIRED);
        }
        value
    }

    fn email(&mut self, key: &'static str) -> Option<String> {
        let value = self.optional(key)?;
        if !value.contains('@') || value.starts_with('@') || value.ends_with('@') {
            self.errors.insert(key, "Enter a valid email address");
        }
        Some(value)
    }

    fn date(&mut self, key: &'static str) -> Option<NaiveDate> {
        let value = self.optional(key)?;
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.errors.insert(key, "Enter a date as YYYY-MM-DD");
                None
            }
        }
    }

    fn required_date(&mut self, key: &'static str) -> Option<NaiveDate> {
        if self.raw(key).is_empty() {
            self.errors.insert(key, REQUIRED);
            return None;
        }
        self.date(key)
    }

    /// `HH:MM`, normalized to two-digit hours.
    fn required_time(&mut self, key: &'static str) -> String {
        let value = self.required(key);
        if value.is_empty() {
            return value;
        }
        match NaiveTime::parse_from_str(&value, "%H:%M") {
            Ok(time) => time.format("%H:%M").to_string(),
            Err(_) => {
                self.errors.insert(key, "Enter a time as HH:MM");
                value
            }
        }
    }

    fn whole_number(&mut self, key: &'static str, message: &str) -> Option<u32> {
        let value = self.optional(key)?;
        match value.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.errors.insert(key, message);
                None
            }
        }
    }

    fn status(&mut self, key: &'static str) -> SessionStatus {
        match self.optional(key) {
            None => SessionStatus::default(),
            Some(value) => SessionStatus::parse(&value).unwrap_or_else(|| {
                self.errors.insert(key, "Unknown status");
                SessionStatus::default()
            }),
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ============================================================================
// Per-kind forms
// ============================================================================

/// Field layout, parsing and persistence calls for one record kind.
pub trait FormSpec {
    const KIND: EntityKind;
    type Record;
    type Input;

    fn fields() -> &'static [FieldSpec];

    /// Values of a blank create form.
    fn defaults() -> FormValues {
        Self::fields()
            .iter()
            .map(|f| (f.key, String::new()))
            .collect()
    }

    /// Values pre-populated from an existing record.
    fn values(record: &Self::Record) -> FormValues;

    fn parse(values: &FormValues) -> Result<Self::Input, ValidationErrors>;

    /// Choices for select fields.
    fn options<S: Store>(_service: &ClinicService<S>) -> BTreeMap<&'static str, Vec<SelectOption>> {
        BTreeMap::new()
    }

    fn fetch<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Self::Record>;

    fn create<S: Store>(service: &mut ClinicService<S>, input: Self::Input) -> Option<Self::Record>;

    fn update<S: Store>(
        service: &mut ClinicService<S>,
        id: &str,
        input: Self::Input,
    ) -> Option<Self::Record>;
}

#[derive(Debug)]
pub struct PatientForm;

const PATIENT_FIELDS: &[FieldSpec] = &[
    field("document_id", "Document", FieldKind::Text, true),
    field("first_name", "First name", FieldKind::Text, true),
    field("last_name", "Last name", FieldKind::Text, true),
    field("birth_date", "Birth date", FieldKind::Date, false),
    field("phone", "Phone", FieldKind::Text, false),
    field("email", "Email", FieldKind::Email, false),
    field("diagnosis", "Diagnosis", FieldKind::TextArea, false),
    field("therapy_goals", "Therapy goals", FieldKind::TextArea, false),
    field("notes", "Notes", FieldKind::TextArea, false),
];

impl FormSpec for PatientForm {
    const KIND: EntityKind = EntityKind::Patient;
    type Record = Patient;
    type Input = NewPatient;

    fn fields() -> &'static [FieldSpec] {
        PATIENT_FIELDS
    }

    fn values(p: &Patient) -> FormValues {
        FormValues::from([
            ("document_id", p.document_id.clone()),
            ("first_name", p.first_name.clone()),
            ("last_name", p.last_name.clone()),
            ("birth_date", date_text(p.birth_date)),
            ("phone", text(&p.phone)),
            ("email", text(&p.email)),
            ("diagnosis", text(&p.diagnosis)),
            ("therapy_goals", text(&p.therapy_goals)),
            ("notes", text(&p.notes)),
        ])
    }

    fn parse(values: &FormValues) -> Result<NewPatient, ValidationErrors> {
        let mut p = Parser::new(values);
        let input = NewPatient {
            document_id: p.required("document_id"),
            first_name: p.required("first_name"),
            last_name: p.required("last_name"),
            birth_date: p.date("birth_date"),
            phone: p.optional("phone"),
            email: p.email("email"),
            diagnosis: p.optional("diagnosis"),
            therapy_goals: p.optional("therapy_goals"),
            notes: p.optional("notes"),
        };
        p.finish(input)
    }

    fn fetch<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Patient> {
        service.lookup_patient(id)
    }

    fn create<S: Store>(service: &mut ClinicService<S>, input: NewPatient) -> Option<Patient> {
        service.create_patient(input)
    }

    fn update<S: Store>(service: &mut ClinicService<S>, id: &str, input: NewPatient) -> Option<Patient> {
        service.update_patient(id, input.into())
    }
}

#[derive(Debug)]
pub struct StaffForm;

const STAFF_FIELDS: &[FieldSpec] = &[
    field("document_id", "Document", FieldKind::Text, true),
    field("first_name", "First name", FieldKind::Text, true),
    field("last_name", "Last name", FieldKind::Text, true),
    field("phone", "Phone", FieldKind::Text, false),
    field("email", "Email", FieldKind::Email, false),
    field("specialty", "Specialty", FieldKind::Text, false),
    field("role", "Role", FieldKind::Text, false),
    field("hire_date", "Hire date", FieldKind::Date, false),
];

impl FormSpec for StaffForm {
    const KIND: EntityKind = EntityKind::Staff;
    type Record = Staff;
    type Input = NewStaff;

    fn fields() -> &'static [FieldSpec] {
        STAFF_FIELDS
    }

    fn values(s: &Staff) -> FormValues {
        FormValues::from([
            ("document_id", s.document_id.clone()),
            ("first_name", s.first_name.clone()),
            ("last_name", s.last_name.clone()),
            ("phone", text(&s.phone)),
            ("email", text(&s.email)),
            ("specialty", text(&s.specialty)),
            ("role", text(&s.role)),
            ("hire_date", date_text(s.hire_date)),
        ])
    }

    fn parse(values: &FormValues) -> Result<NewStaff, ValidationErrors> {
        let mut p = Parser::new(values);
        let input = NewStaff {
            document_id: p.required("document_id"),
            first_name: p.required("first_name"),
            last_name: p.required("last_name"),
            phone: p.optional("phone"),
            email: p.email("email"),
            specialty: p.optional("specialty"),
            role: p.optional("role"),
            hire_date: p.date("hire_date"),
        };
        p.finish(input)
    }

    fn fetch<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Staff> {
        service.lookup_staff(id)
    }

    fn create<S: Store>(service: &mut ClinicService<S>, input: NewStaff) -> Option<Staff> {
        service.create_staff(input)
    }

    fn update<S: Store>(service: &mut ClinicService<S>, id: &str, input: NewStaff) -> Option<Staff> {
        service.update_staff(id, input.into())
    }
}

#[derive(Debug)]
pub struct HorseForm;

const HORSE_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("age", "Age", FieldKind::Number, false),
    field("breed", "Breed", FieldKind::Text, false),
    field("color", "Color", FieldKind::Text, false),
    field("height", "Height", FieldKind::Text, false),
    field("weight", "Weight", FieldKind::Text, false),
    field("temperament", "Temperament", FieldKind::TextArea, false),
    field("training", "Training", FieldKind::TextArea, false),
    field("medical_history", "Medical history", FieldKind::TextArea, false),
];

impl FormSpec for HorseForm {
    const KIND: EntityKind = EntityKind::Horse;
    type Record = Horse;
    type Input = NewHorse;

    fn fields() -> &'static [FieldSpec] {
        HORSE_FIELDS
    }

    fn values(h: &Horse) -> FormValues {
        FormValues::from([
            ("name", h.name.clone()),
            ("age", h.age.map(|a| a.to_string()).unwrap_or_default()),
            ("breed", text(&h.breed)),
            ("color", text(&h.color)),
            ("height", text(&h.height)),
            ("weight", text(&h.weight)),
            ("temperament", text(&h.temperament)),
            ("training", text(&h.training)),
            ("medical_history", text(&h.medical_history)),
        ])
    }

    fn parse(values: &FormValues) -> Result<NewHorse, ValidationErrors> {
        let mut p = Parser::new(values);
        let input = NewHorse {
            name: p.required("name"),
            age: p.whole_number("age", "Age must be a whole number"),
            breed: p.optional("breed"),
            color: p.optional("color"),
            height: p.optional("height"),
            weight: p.optional("weight"),
            temperament: p.optional("temperament"),
            training: p.optional("training"),
            medical_history: p.optional("medical_history"),
        };
        p.finish(input)
    }

    fn fetch<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Horse> {
        service.lookup_horse(id)
    }

    fn create<S: Store>(service: &mut ClinicService<S>, input: NewHorse) -> Option<Horse> {
        service.create_horse(input)
    }

    fn update<S: Store>(service: &mut ClinicService<S>, id: &str, input: NewHorse) -> Option<Horse> {
        service.update_horse(id, input.into())
    }
}

#[derive(Debug)]
pub struct SessionForm;

pub const DEFAULT_SESSION_TIME: &str = "09:00";
pub const DEFAULT_SESSION_DURATION: &str = "45 minutes";

const SESSION_FIELDS: &[FieldSpec] = &[
    field("date", "Date", FieldKind::Date, true),
    field("time", "Time", FieldKind::Time, true),
    field("patient_id", "Patient", FieldKind::Select, true),
    field("horse_id", "Horse", FieldKind::Select, true),
    field("staff_id", "Therapist", FieldKind::Select, true),
    field("duration", "Duration", FieldKind::Text, false),
    field("activities", "Activities", FieldKind::TextArea, false),
    field("notes", "Notes", FieldKind::TextArea, false),
    field("status", "Status", FieldKind::Select, false),
];

impl FormSpec for SessionForm {
    const KIND: EntityKind = EntityKind::Session;
    type Record = Session;
    type Input = NewSession;

    fn fields() -> &'static [FieldSpec] {
        SESSION_FIELDS
    }

    fn defaults() -> FormValues {
        let mut values: FormValues = SESSION_FIELDS
            .iter()
            .map(|f| (f.key, String::new()))
            .collect();
        values.insert("date", Local::now().date_naive().format("%Y-%m-%d").to_string());
        values.insert("time", DEFAULT_SESSION_TIME.to_string());
        values.insert("duration", DEFAULT_SESSION_DURATION.to_string());
        values.insert("status", SessionStatus::Scheduled.as_str().to_string());
        values
    }

    fn values(s: &Session) -> FormValues {
        FormValues::from([
            ("date", date_text(Some(s.date))),
            ("time", s.time.clone()),
            ("patient_id", s.patient_id.clone()),
            ("horse_id", s.horse_id.clone()),
            ("staff_id", s.staff_id.clone()),
            ("duration", text(&s.duration)),
            ("activities", text(&s.activities)),
            ("notes", text(&s.notes)),
            ("status", s.status.as_str().to_string()),
        ])
    }

    fn parse(values: &FormValues) -> Result<NewSession, ValidationErrors> {
        let mut p = Parser::new(values);
        let date = p.required_date("date");
        let time = p.required_time("time");
        let patient_id = p.required("patient_id");
        let horse_id = p.required("horse_id");
        let staff_id = p.required("staff_id");
        let status = p.status("status");
        let Some(date) = date else {
            return Err(p.errors);
        };
        let input = NewSession {
            date,
            time,
            patient_id,
            horse_id,
            staff_id,
            duration: p.optional("duration"),
            activities: p.optional("activities"),
            notes: p.optional("notes"),
            status,
        };
        p.finish(input)
    }

    fn options<S: Store>(service: &ClinicService<S>) -> BTreeMap<&'static str, Vec<SelectOption>> {
        BTreeMap::from([
            (
                "patient_id",
                service
                    .list_patients()
                    .into_iter()
                    .map(|p| SelectOption::new(p.id.clone(), p.full_name()))
                    .collect(),
            ),
            (
                "horse_id",
                service
                    .list_horses()
                    .into_iter()
                    .map(|h| SelectOption::new(h.id, h.name))
                    .collect(),
            ),
            (
                "staff_id",
                service
                    .list_staff()
                    .into_iter()
                    .map(|s| SelectOption::new(s.id.clone(), s.full_name()))
                    .collect(),
            ),
            (
                "status",
                SessionStatus::ALL
                    .into_iter()
                    .map(|s| SelectOption::new(s.as_str(), s.label()))
                    .collect(),
            ),
        ])
    }

    fn fetch<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Session> {
        service.lookup_session(id).map(|enriched| enriched.session)
    }

    fn create<S: Store>(service: &mut ClinicService<S>, input: NewSession) -> Option<Session> {
        service.create_session(input)
    }

    fn update<S: Store>(service: &mut ClinicService<S>, id: &str, input: NewSession) -> Option<Session> {
        service.update_session(id, input.into())
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "route", rename_all = "snake_case")]
pub enum FormState {
    /// Edit mode, record not fetched yet.
    LoadingExisting,
    /// Accepting input.
    Idle,
    /// A store call is in flight.
    Submitting,
    /// Finished; the UI navigates to the route.
    Done(Route),
}

#[derive(Debug)]
pub struct FormController<F: FormSpec> {
    mode: FormMode,
    state: FormState,
    values: FormValues,
    populated: bool,
    errors: ValidationErrors,
    options: BTreeMap<&'static str, Vec<SelectOption>>,
    submit_error: Option<String>,
    _spec: PhantomData<F>,
}

impl<F: FormSpec> FormController<F> {
    /// Blank form with the kind's defaults.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            state: FormState::Idle,
            values: F::defaults(),
            populated: false,
            errors: ValidationErrors::default(),
            options: BTreeMap::new(),
            submit_error: None,
            _spec: PhantomData,
        }
    }

    /// Form for an existing record; call [`load`](Self::load) next.
    pub fn edit(id: &str) -> Self {
        Self {
            mode: FormMode::Edit(id.to_string()),
            state: FormState::LoadingExisting,
            ..Self::create()
        }
    }

    /// Create or edit depending on whether the route carries an id.
    pub fn for_id(id: Option<&str>) -> Self {
        match id {
            Some(id) => Self::edit(id),
            None => Self::create(),
        }
    }

    /// Fetch selector options and, in edit mode, the record to edit.
    pub fn load<S: Store>(&mut self, service: &ClinicService<S>) {
        self.options = F::options(service);

        let FormMode::Edit(id) = &self.mode else {
            return;
        };
        if self.state != FormState::LoadingExisting {
            return;
        }
        match F::fetch(service, id) {
            Lookup::Found(record) => {
                self.values = F::values(&record);
                self.populated = true;
                self.state = FormState::Idle;
            }
            Lookup::Missing => {
                service
                    .notifier()
                    .error(&format!("{} not found", F::KIND.noun()));
                self.state = FormState::Done(Route::List(F::KIND));
            }
            Lookup::Failed => self.state = FormState::Done(Route::List(F::KIND)),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        F::fields()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Set a field's text. Returns `false` for unknown fields.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(spec) = F::fields().iter().find(|f| f.key == key) else {
            return false;
        };
        self.values.insert(spec.key, value.into());
        self.errors.remove(key);
        true
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn options(&self, key: &str) -> &[SelectOption] {
        self.options.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Message of the last failed store call.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn title(&self) -> String {
        let noun = F::KIND.noun();
        match self.mode {
            FormMode::Create => format!("New {}", noun.to_lowercase()),
            FormMode::Edit(_) => format!("Edit {}", noun.to_lowercase()),
        }
    }

    pub fn cancel_route(&self) -> Route {
        Route::List(F::KIND)
    }

    /// Validate, then create or update. Returns `true` once the record is
    /// saved and the form is done.
    pub fn submit<S: Store>(&mut self, service: &mut ClinicService<S>) -> bool {
        if self.state != FormState::Idle {
            return false;
        }

        let input = match F::parse(&self.values) {
            Ok(input) => input,
            Err(errors) => {
                debug!(kind = %F::KIND, fields = errors.len(), "Form rejected");
                let message = if errors.has_missing() { INCOMPLETE } else { INVALID };
                service.notifier().error(message);
                self.errors = errors;
                return false;
            }
        };

        self.errors = ValidationErrors::default();
        self.submit_error = None;
        self.state = FormState::Submitting;

        let noun = F::KIND.noun();
        let (saved, verb) = match &self.mode {
            FormMode::Create => (F::create(service, input).is_some(), "created"),
            FormMode::Edit(id) => (F::update(service, id, input).is_some(), "updated"),
        };

        if saved {
            service
                .notifier()
                .success(&format!("{noun} {verb} successfully"));
            self.state = FormState::Done(Route::List(F::KIND));
        } else {
            self.submit_error = Some(format!("Could not save {}", noun.to_lowercase()));
            self.state = FormState::Idle;
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::models::{
        EnrichedSession, HorsePatch, PatientPatch, SessionPatch, StaffPatch,
    };
    use crate::notify::{Level, NotificationLog};
    use crate::store::{MemoryStore, RecordCounts, StoreResult};

    /// Forwards to a [`MemoryStore`], counting every call.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        calls: Cell<usize>,
    }

    impl CountingStore {
        fn seeded() -> Self {
            Self {
                inner: MemoryStore::seeded(),
                calls: Cell::new(0),
            }
        }

        fn tick(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl Store for CountingStore {
        fn list_patients(&self) -> StoreResult<Vec<Patient>> {
            self.tick();
            self.inner.list_patients()
        }
        fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
            self.tick();
            self.inner.get_patient(id)
        }
        fn insert_patient(&mut self, new: NewPatient) -> StoreResult<Patient> {
            self.tick();
            self.inner.insert_patient(new)
        }
        fn update_patient(&mut self, id: &str, patch: PatientPatch) -> StoreResult<Patient> {
            self.tick();
            self.inner.update_patient(id, patch)
        }
        fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
            self.tick();
            self.inner.delete_patient(id)
        }
        fn list_staff(&self) -> StoreResult<Vec<Staff>> {
            self.tick();
            self.inner.list_staff()
        }
        fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
            self.tick();
            self.inner.get_staff(id)
        }
        fn insert_staff(&mut self, new: NewStaff) -> StoreResult<Staff> {
            self.tick();
            self.inner.insert_staff(new)
        }
        fn update_staff(&mut self, id: &str, patch: StaffPatch) -> StoreResult<Staff> {
            self.tick();
            self.inner.update_staff(id, patch)
        }
        fn delete_staff(&mut self, id: &str) -> StoreResult<bool> {
            self.tick();
            self.inner.delete_staff(id)
        }
        fn list_horses(&self) -> StoreResult<Vec<Horse>> {
            self.tick();
            self.inner.list_horses()
        }
        fn get_horse(&self, id: &str) -> StoreResult<Option<Horse>> {
            self.tick();
            self.inner.get_horse(id)
        }
        fn insert_horse(&mut self, new: NewHorse) -> StoreResult<Horse> {
            self.tick();
            self.inner.insert_horse(new)
        }
        fn update_horse(&mut self, id: &str, patch: HorsePatch) -> StoreResult<Horse> {
            self.tick();
            self.inner.update_horse(id, patch)
        }
        fn delete_horse(&mut self, id: &str) -> StoreResult<bool> {
            self.tick();
            self.inner.delete_horse(id)
        }
        fn list_sessions(&self) -> StoreResult<Vec<Session>> {
            self.tick();
            self.inner.list_sessions()
        }
        fn get_session(&self, id: &str) -> StoreResult<Option<Session>> {
            self.tick();
            self.inner.get_session(id)
        }
        fn insert_session(&mut self, new: NewSession) -> StoreResult<Session> {
            self.tick();
            self.inner.insert_session(new)
        }
        fn update_session(&mut self, id: &str, patch: SessionPatch) -> StoreResult<Session> {
            self.tick();
            self.inner.update_session(id, patch)
        }
        fn delete_session(&mut self, id: &str) -> StoreResult<bool> {
            self.tick();
            self.inner.delete_session(id)
        }
        fn counts(&self) -> StoreResult<RecordCounts> {
            self.tick();
            self.inner.counts()
        }
    }

    fn counting() -> (ClinicService<CountingStore>, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::new());
        (ClinicService::new(CountingStore::seeded(), log.clone()), log)
    }

    fn memory() -> (ClinicService<MemoryStore>, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::new());
        (ClinicService::new(MemoryStore::seeded(), log.clone()), log)
    }

    #[test]
    fn test_missing_last_name_makes_no_store_calls() {
        let (mut service, log) = counting();
        let mut form = FormController::<PatientForm>::create();
        form.load(&service);
        form.set("document_id", "V-1");
        form.set("first_name", "Lucía");

        assert!(!form.submit(&mut service));
        assert_eq!(service.store().calls.get(), 0);
        assert_eq!(*form.state(), FormState::Idle);
        assert_eq!(form.errors().get("last_name"), Some(REQUIRED));
        assert_eq!(form.errors().len(), 1);
        assert_eq!(log.messages(Level::Error), vec![INCOMPLETE]);
    }

    #[test]
    fn test_create_patient() {
        let (mut service, log) = memory();
        let mut form = FormController::<PatientForm>::create();
        assert_eq!(form.title(), "New patient");
        form.set("document_id", " V-99 ");
        form.set("first_name", "Lucía");
        form.set("last_name", "Pérez");
        form.set("birth_date", "2012-02-29");

        assert!(form.submit(&mut service));
        assert_eq!(
            *form.state(),
            FormState::Done(Route::List(EntityKind::Patient))
        );
        assert_eq!(log.messages(Level::Success), vec!["Patient created successfully"]);

        let created = service
            .list_patients()
            .into_iter()
            .find(|p| p.document_id == "V-99")
            .unwrap();
        assert_eq!(created.birth_date, NaiveDate::from_ymd_opt(2012, 2, 29));
        assert_eq!(created.email, None);
    }

    #[test]
    fn test_setting_a_field_clears_its_error() {
        let (mut service, _) = memory();
        let mut form = FormController::<HorseForm>::create();
        assert!(!form.submit(&mut service));
        assert!(form.errors().get("name").is_some());

        form.set("name", "Canela");
        assert!(form.errors().is_empty());
        assert!(!form.set("owner", "x"));
    }

    #[test]
    fn test_horse_age_must_be_whole_number() {
        let (mut service, log) = memory();
        let mut form = FormController::<HorseForm>::create();
        form.set("name", "Canela");
        form.set("age", "4.5");

        assert!(!form.submit(&mut service));
        assert_eq!(form.errors().get("age"), Some("Age must be a whole number"));
        assert_eq!(log.messages(Level::Error), vec![INVALID]);
        assert_eq!(service.list_horses().len(), 3);
    }

    #[test]
    fn test_bad_date_and_email_rejected() {
        let (mut service, _) = memory();
        let mut form = FormController::<StaffForm>::create();
        form.set("document_id", "V-5");
        form.set("first_name", "Ana");
        form.set("last_name", "Ruiz");
        form.set("hire_date", "15/01/2020");
        form.set("email", "ana.example.com");

        assert!(!form.submit(&mut service));
        assert!(form.errors().get("hire_date").is_some());
        assert!(form.errors().get("email").is_some());
    }

    #[test]
    fn test_edit_prepopulates_and_updates() {
        let (mut service, log) = memory();
        let mut form = FormController::<StaffForm>::edit("stf-2");
        assert_eq!(*form.state(), FormState::LoadingExisting);
        assert!(!form.submit(&mut service));

        form.load(&service);
        assert_eq!(*form.state(), FormState::Idle);
        assert!(form.is_populated());
        assert_eq!(form.value("first_name"), Some("Luisa"));
        assert_eq!(form.value("hire_date"), Some("2021-03-01"));

        form.set("role", "");
        assert!(form.submit(&mut service));
        assert_eq!(log.messages(Level::Success), vec!["Staff member updated successfully"]);
        assert_eq!(service.get_staff("stf-2").unwrap().role, None);
    }

    #[test]
    fn test_edit_of_missing_record_redirects() {
        let (service, log) = memory();
        let mut form = FormController::<HorseForm>::for_id(Some("hrs-404"));
        form.load(&service);
        assert_eq!(*form.state(), FormState::Done(Route::List(EntityKind::Horse)));
        assert_eq!(log.messages(Level::Error), vec!["Horse not found"]);
    }

    #[test]
    fn test_session_defaults_and_options() {
        let (service, _) = memory();
        let mut form = FormController::<SessionForm>::create();
        form.load(&service);

        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(form.value("date"), Some(today.as_str()));
        assert_eq!(form.value("time"), Some(DEFAULT_SESSION_TIME));
        assert_eq!(form.value("duration"), Some(DEFAULT_SESSION_DURATION));
        assert_eq!(form.value("status"), Some("scheduled"));
        assert_eq!(form.options("patient_id").len(), 3);
        assert_eq!(form.options("horse_id")[0].label, "Estrella");
        assert_eq!(form.options("status").len(), 3);
        assert!(form.options("notes").is_empty());
    }

    #[test]
    fn test_session_requires_links() {
        let (mut service, log) = memory();
        let mut form = FormController::<SessionForm>::create();
        form.set("patient_id", "pat-1");

        assert!(!form.submit(&mut service));
        assert!(form.errors().get("horse_id").is_some());
        assert!(form.errors().get("staff_id").is_some());
        assert_eq!(log.messages(Level::Error), vec![INCOMPLETE]);
    }

    #[test]
    fn test_session_time_format() {
        let (mut service, _) = memory();
        let mut form = FormController::<SessionForm>::create();
        form.set("patient_id", "pat-1");
        form.set("horse_id", "hrs-1");
        form.set("staff_id", "stf-1");
        form.set("time", "9am");
        assert!(!form.submit(&mut service));
        assert_eq!(form.errors().get("time"), Some("Enter a time as HH:MM"));

        form.set("time", "9:30");
        assert!(form.submit(&mut service));
        let sessions: Vec<EnrichedSession> = service.list_sessions();
        assert!(sessions.iter().any(|s| s.session.time == "09:30"));
    }

    #[test]
    fn test_store_failure_returns_to_idle() {
        let (mut service, log) = memory();
        let mut form = FormController::<SessionForm>::create();
        form.set("patient_id", "pat-404");
        form.set("horse_id", "hrs-1");
        form.set("staff_id", "stf-1");

        assert!(!form.submit(&mut service));
        assert_eq!(*form.state(), FormState::Idle);
        assert_eq!(form.submit_error(), Some("Could not save session"));
        assert!(log.messages(Level::Success).is_empty());
        assert_eq!(log.messages(Level::Error).len(), 1);
    }

    #[test]
    fn test_status_change_through_edit() {
        let (mut service, _) = memory();
        let mut form = FormController::<SessionForm>::edit("ses-3");
        form.load(&service);
        assert_eq!(form.value("patient_id"), Some("pat-3"));
        form.set("status", "completed");
        assert!(form.submit(&mut service));
        assert_eq!(
            service.get_session("ses-3").unwrap().session.status,
            SessionStatus::Completed
        );
    }
}
