//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A therapy recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID assigned at creation, immutable
    pub id: String,
    /// Identity document number (unique among patients)
    pub document_id: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Clinical diagnosis
    pub diagnosis: Option<String>,
    /// Therapy objectives
    pub therapy_goals: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Patient fields supplied by a caller when creating a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub diagnosis: Option<String>,
    pub therapy_goals: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. `None` leaves a field untouched; for optional columns
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapy_goals: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Patient {
    /// Create a patient from caller input, assigning a fresh identifier.
    pub fn create(new: NewPatient) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), new)
    }

    /// Create a patient with a caller-chosen identifier (fixtures, remote inserts).
    pub fn with_id(id: String, new: NewPatient) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            document_id: new.document_id,
            first_name: new.first_name,
            last_name: new.last_name,
            birth_date: new.birth_date,
            phone: new.phone,
            email: new.email,
            diagnosis: new.diagnosis,
            therapy_goals: new.therapy_goals,
            notes: new.notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// "First Last" for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Editable fields, used to pre-populate the edit form.
    pub fn to_new(&self) -> NewPatient {
        NewPatient {
            document_id: self.document_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date,
            phone: self.phone.clone(),
            email: self.email.clone(),
            diagnosis: self.diagnosis.clone(),
            therapy_goals: self.therapy_goals.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl PatientPatch {
    /// Apply the set fields to `patient` and bump its update timestamp.
    pub fn apply(self, patient: &mut Patient) {
        if let Some(v) = self.document_id {
            patient.document_id = v;
        }
        if let Some(v) = self.first_name {
            patient.first_name = v;
        }
        if let Some(v) = self.last_name {
            patient.last_name = v;
        }
        if let Some(v) = self.birth_date {
            patient.birth_date = v;
        }
        if let Some(v) = self.phone {
            patient.phone = v;
        }
        if let Some(v) = self.email {
            patient.email = v;
        }
        if let Some(v) = self.diagnosis {
            patient.diagnosis = v;
        }
        if let Some(v) = self.therapy_goals {
            patient.therapy_goals = v;
        }
        if let Some(v) = self.notes {
            patient.notes = v;
        }
        patient.touch();
    }
}

impl From<NewPatient> for PatientPatch {
    fn from(new: NewPatient) -> Self {
        Self {
            document_id: Some(new.document_id),
            first_name: Some(new.first_name),
            last_name: Some(new.last_name),
            birth_date: Some(new.birth_date),
            phone: Some(new.phone),
            email: Some(new.email),
            diagnosis: Some(new.diagnosis),
            therapy_goals: Some(new.therapy_goals),
            notes: Some(new.notes),
        }
    }
}
