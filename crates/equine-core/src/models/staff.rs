//! Staff models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A clinic employee (therapist, trainer, groom, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    pub id: String,
    /// Identity document number (unique among staff)
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Professional specialty (e.g. "Physiotherapist")
    pub specialty: Option<String>,
    /// Role or title within the clinic
    pub role: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewStaff {
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StaffPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<Option<NaiveDate>>,
}

impl Staff {
    pub fn create(new: NewStaff) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), new)
    }

    pub fn with_id(id: String, new: NewStaff) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            document_id: new.document_id,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            email: new.email,
            specialty: new.specialty,
            role: new.role,
            hire_date: new.hire_date,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn to_new(&self) -> NewStaff {
        NewStaff {
            document_id: self.document_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            specialty: self.specialty.clone(),
            role: self.role.clone(),
            hire_date: self.hire_date,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl StaffPatch {
    pub fn apply(self, staff: &mut Staff) {
        if let Some(v) = self.document_id {
            staff.document_id = v;
        }
        if let Some(v) = self.first_name {
            staff.first_name = v;
        }
        if let Some(v) = self.last_name {
            staff.last_name = v;
        }
        if let Some(v) = self.phone {
            staff.phone = v;
        }
        if let Some(v) = self.email {
            staff.email = v;
        }
        if let Some(v) = self.specialty {
            staff.specialty = v;
        }
        if let Some(v) = self.role {
            staff.role = v;
        }
        if let Some(v) = self.hire_date {
            staff.hire_date = v;
        }
        staff.touch();
    }
}

impl From<NewStaff> for StaffPatch {
    fn from(new: NewStaff) -> Self {
        Self {
            document_id: Some(new.document_id),
            first_name: Some(new.first_name),
            last_name: Some(new.last_name),
            phone: Some(new.phone),
            email: Some(new.email),
            specialty: Some(new.specialty),
            role: Some(new.role),
            hire_date: Some(new.hire_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_staff() {
        let staff = Staff::create(NewStaff {
            document_id: "V-87654321".into(),
            first_name: "Javier".into(),
            last_name: "Méndez".into(),
            specialty: Some("Physiotherapist".into()),
            ..Default::default()
        });
        assert_eq!(staff.id.len(), 36);
        assert_eq!(staff.full_name(), "Javier Méndez");
    }

    #[test]
    fn test_patch_role() {
        let mut staff = Staff::create(NewStaff {
            document_id: "V-1".into(),
            first_name: "Luisa".into(),
            last_name: "Fernández".into(),
            ..Default::default()
        });
        StaffPatch {
            role: Some(Some("Lead therapist".into())),
            ..Default::default()
        }
        .apply(&mut staff);
        assert_eq!(staff.role.as_deref(), Some("Lead therapist"));
        assert_eq!(staff.document_id, "V-1");
    }
}
