//! Dashboard aggregates and the storage status badge.

use serde::{Deserialize, Serialize};

use crate::models::{Session, SessionStatus};
use crate::store::RecordCounts;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistics {
    pub patients: u64,
    pub staff: u64,
    pub horses: u64,
    pub scheduled_sessions: u64,
    pub completed_sessions: u64,
}

impl Statistics {
    pub fn from_parts(counts: RecordCounts, sessions: &[Session]) -> Self {
        let with_status =
            |status| sessions.iter().filter(|s| s.status == status).count() as u64;
        Self {
            patients: counts.patients,
            staff: counts.staff,
            horses: counts.horses,
            scheduled_sessions: with_status(SessionStatus::Scheduled),
            completed_sessions: with_status(SessionStatus::Completed),
        }
    }
}

/// Reachability of the active backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected { counts: RecordCounts },
    Error { message: String },
}

impl DatabaseStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, DatabaseStatus::Connected { .. })
    }

    /// Total records across all tables, zero when disconnected.
    pub fn total_records(&self) -> u64 {
        match self {
            DatabaseStatus::Connected { counts } => {
                counts.patients + counts.staff + counts.horses + counts.sessions
            }
            DatabaseStatus::Error { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed;

    #[test]
    fn test_from_parts_counts_by_status() {
        let counts = RecordCounts {
            patients: 3,
            staff: 3,
            horses: 3,
            sessions: 3,
        };
        let stats = Statistics::from_parts(counts, &seed::sessions());
        assert_eq!(stats.scheduled_sessions, 1);
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.patients, 3);
    }

    #[test]
    fn test_status_totals() {
        let status = DatabaseStatus::Connected {
            counts: RecordCounts {
                patients: 1,
                staff: 2,
                horses: 3,
                sessions: 4,
            },
        };
        assert!(status.is_connected());
        assert_eq!(status.total_records(), 10);

        let down = DatabaseStatus::Error {
            message: "offline".into(),
        };
        assert_eq!(down.total_records(), 0);
        assert_eq!(serde_json::to_value(&down).unwrap()["state"], "error");
    }
}
