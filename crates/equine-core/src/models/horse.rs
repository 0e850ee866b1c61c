//! Horse models.

use serde::{Deserialize, Serialize};

/// A therapy horse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Horse {
    pub id: String,
    pub name: String,
    /// Age in whole years
    pub age: Option<u32>,
    pub breed: Option<String>,
    pub color: Option<String>,
    /// Height as entered (e.g. "1.5 m")
    pub height: Option<String>,
    /// Weight as entered (e.g. "450 kg")
    pub weight: Option<String>,
    pub temperament: Option<String>,
    pub training: Option<String>,
    pub medical_history: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewHorse {
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

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HorsePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperament: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Option<String>>,
}

impl Horse {
    pub fn create(new: NewHorse) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), new)
    }

    pub fn with_id(id: String, new: NewHorse) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name: new.name,
            age: new.age,
            breed: new.breed,
            color: new.color,
            height: new.height,
            weight: new.weight,
            temperament: new.temperament,
            training: new.training,
            medical_history: new.medical_history,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn to_new(&self) -> NewHorse {
        NewHorse {
            name: self.name.clone(),
            age: self.age,
            breed: self.breed.clone(),
            color: self.color.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
            temperament: self.temperament.clone(),
            training: self.training.clone(),
            medical_history: self.medical_history.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl HorsePatch {
    pub fn apply(self, horse: &mut Horse) {
        if let Some(v) = self.name {
            horse.name = v;
        }
        if let Some(v) = self.age {
            horse.age = v;
        }
        if let Some(v) = self.breed {
            horse.breed = v;
        }
        if let Some(v) = self.color {
            horse.color = v;
        }
        if let Some(v) = self.height {
            horse.height = v;
        }
        if let Some(v) = self.weight {
            horse.weight = v;
        }
        if let Some(v) = self.temperament {
            horse.temperament = v;
        }
        if let Some(v) = self.training {
            horse.training = v;
        }
        if let Some(v) = self.medical_history {
            horse.medical_history = v;
        }
        horse.touch();
    }
}

impl From<NewHorse> for HorsePatch {
    fn from(new: NewHorse) -> Self {
        Self {
            name: Some(new.name),
            age: Some(new.age),
            breed: Some(new.breed),
            color: Some(new.color),
            height: Some(new.height),
            weight: Some(new.weight),
            temperament: Some(new.temperament),
            training: Some(new.training),
            medical_history: Some(new.medical_history),
        }
    }
}
