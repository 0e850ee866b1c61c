//! Landing page: counts, upcoming sessions and shortcuts.

use serde::Serialize;

use super::routes::Route;
use super::{ViewRecord, UNASSIGNED};
use crate::models::{EnrichedSession, EntityKind};
use crate::service::{ClinicService, Statistics, DASHBOARD_UPCOMING};
use crate::store::Store;

pub const TITLE: &str = "Dashboard";
pub const WELCOME: &str = "Welcome to the equine therapy center management system";
pub const NO_UPCOMING: &str = "No scheduled sessions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u64,
    pub caption: String,
    pub route: Route,
}

/// Row of the "Upcoming Sessions" card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingItem {
    pub patient: String,
    pub horse: String,
    pub date: String,
    pub time: String,
    pub route: Route,
}

impl From<&EnrichedSession> for UpcomingItem {
    fn from(enriched: &EnrichedSession) -> Self {
        Self {
            patient: enriched.cell("patient"),
            horse: enriched.horse_name().unwrap_or(UNASSIGNED).to_string(),
            date: enriched.cell("date"),
            time: enriched.session.time.clone(),
            route: Route::Detail(EntityKind::Session, enriched.session.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub label: &'static str,
    pub route: Route,
}

/// Creation shortcuts, one per kind.
pub fn shortcuts() -> Vec<Shortcut> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| Shortcut {
            label: match kind {
                EntityKind::Patient => "New Patient",
                EntityKind::Staff => "New Staff",
                EntityKind::Horse => "New Horse",
                EntityKind::Session => "New Session",
            },
            route: Route::New(kind),
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    loaded: bool,
    statistics: Statistics,
    upcoming: Vec<EnrichedSession>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<S: Store>(&mut self, service: &ClinicService<S>) {
        self.statistics = service.statistics();
        self.upcoming = service.upcoming_sessions(DASHBOARD_UPCOMING);
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn cards(&self) -> Vec<StatCard> {
        let s = &self.statistics;
        vec![
            StatCard {
                title: "Patients",
                value: s.patients,
                caption: "Registered patients".into(),
                route: Route::List(EntityKind::Patient),
            },
            StatCard {
                title: "Staff",
                value: s.staff,
                caption: "Active staff members".into(),
                route: Route::List(EntityKind::Staff),
            },
            StatCard {
                title: "Horses",
                value: s.horses,
                caption: "Therapy horses".into(),
                route: Route::List(EntityKind::Horse),
            },
            StatCard {
                title: "Sessions",
                value: s.scheduled_sessions,
                caption: format!(
                    "{} completed, {} scheduled",
                    s.completed_sessions, s.scheduled_sessions
                ),
                route: Route::List(EntityKind::Session),
            },
        ]
    }

    pub fn upcoming(&self) -> Vec<UpcomingItem> {
        self.upcoming.iter().map(UpcomingItem::from).collect()
    }

    /// Placeholder text when nothing is scheduled.
    pub fn upcoming_placeholder(&self) -> Option<&'static str> {
        (self.loaded && self.upcoming.is_empty()).then_some(NO_UPCOMING)
    }

    pub fn schedule_route(&self) -> Route {
        Route::New(EntityKind::Session)
    }

    pub fn shortcuts(&self) -> Vec<Shortcut> {
        shortcuts()
    }
}
