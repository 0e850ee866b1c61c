//! Domain models for the clinic records system.

mod horse;
mod patient;
pub mod seed;
mod session;
mod staff;

pub use horse::*;
pub use patient::*;
pub use session::*;
pub use staff::*;

use serde::{Deserialize, Serialize};

/// The four record kinds the clinic manages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Patient,
    Staff,
    Horse,
    Session,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Patient, Self::Staff, Self::Horse, Self::Session];

    /// Singular noun for messages ("Patient created successfully").
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Staff => "Staff member",
            Self::Horse => "Horse",
            Self::Session => "Session",
        }
    }

    /// Plural noun for list titles and load errors.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Patient => "patients",
            Self::Staff => "staff",
            Self::Horse => "horses",
            Self::Session => "sessions",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.plural())
    }
}
