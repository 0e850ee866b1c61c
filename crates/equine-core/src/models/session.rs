//! Therapy session models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Booked, not yet held
    #[default]
    Scheduled,
    /// Held
    Completed,
    /// Called off
    Cancelled,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 3] = [Self::Scheduled, Self::Completed, Self::Cancelled];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human-readable label for tables and badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// A therapy appointment linking one patient, one horse and one staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub date: NaiveDate,
    /// Start time, "HH:MM"
    pub time: String,
    pub patient_id: String,
    pub horse_id: String,
    pub staff_id: String,
    /// Free text (e.g. "45 minutes")
    pub duration: Option<String>,
    /// Planned activities
    pub activities: Option<String>,
    /// Observation notes
    pub notes: Option<String>,
    pub status: SessionStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSession {
    pub date: NaiveDate,
    pub time: String,
    pub patient_id: String,
    pub horse_id: String,
    pub staff_id: String,
    pub duration: Option<String>,
    pub activities: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

impl Session {
    pub fn create(new: NewSession) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), new)
    }

    pub fn with_id(id: String, new: NewSession) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            date: new.date,
            time: new.time,
            patient_id: new.patient_id,
            horse_id: new.horse_id,
            staff_id: new.staff_id,
            duration: new.duration,
            activities: new.activities,
            notes: new.notes,
            status: new.status,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn to_new(&self) -> NewSession {
        NewSession {
            date: self.date,
            time: self.time.clone(),
            patient_id: self.patient_id.clone(),
            horse_id: self.horse_id.clone(),
            staff_id: self.staff_id.clone(),
            duration: self.duration.clone(),
            activities: self.activities.clone(),
            notes: self.notes.clone(),
            status: self.status,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == SessionStatus::Scheduled
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl SessionPatch {
    /// Status-only patch, the most common edit.
    pub fn status(status: SessionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(self, session: &mut Session) {
        if let Some(v) = self.date {
            session.date = v;
        }
        if let Some(v) = self.time {
            session.time = v;
        }
        if let Some(v) = self.patient_id {
            session.patient_id = v;
        }
        if let Some(v) = self.horse_id {
            session.horse_id = v;
        }
        if let Some(v) = self.staff_id {
            session.staff_id = v;
        }
        if let Some(v) = self.duration {
            session.duration = v;
        }
        if let Some(v) = self.activities {
            session.activities = v;
        }
        if let Some(v) = self.notes {
            session.notes = v;
        }
        if let Some(v) = self.status {
            session.status = v;
        }
        session.touch();
    }
}

impl From<NewSession> for SessionPatch {
    fn from(new: NewSession) -> Self {
        Self {
            date: Some(new.date),
            time: Some(new.time),
            patient_id: Some(new.patient_id),
            horse_id: Some(new.horse_id),
            staff_id: Some(new.staff_id),
            duration: Some(new.duration),
            activities: Some(new.activities),
            notes: Some(new.notes),
            status: Some(new.status),
        }
    }
}

/// First and last name of a linked patient or staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn full(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Name of a linked horse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HorseName {
    pub name: String,
}

/// A session with display names of its linked records, joined at read time.
///
/// Never persisted. A reference that no longer resolves leaves its display
/// field empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedSession {
    #[serde(flatten)]
    pub session: Session,
    pub patient: Option<PersonName>,
    pub horse: Option<HorseName>,
    pub staff: Option<PersonName>,
}

impl EnrichedSession {
    /// Wrap a session with no display fields resolved.
    pub fn bare(session: Session) -> Self {
        Self {
            session,
            patient: None,
            horse: None,
            staff: None,
        }
    }

    pub fn patient_name(&self) -> Option<String> {
        self.patient.as_ref().map(PersonName::full)
    }

    pub fn staff_name(&self) -> Option<String> {
        self.staff.as_ref().map(PersonName::full)
    }

    pub fn horse_name(&self) -> Option<&str> {
        self.horse.as_ref().map(|h| h.name.as_str())
    }
}
