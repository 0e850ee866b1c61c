//! Navigation bar and storage status badge.

use serde::Serialize;

use super::routes::Route;
use crate::models::EntityKind;
use crate::service::{ClinicService, DatabaseStatus};
use crate::store::{RecordCounts, Store};

pub const BRAND: &str = "Equine Therapy Center";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

/// Navbar entries in display order.
pub fn nav_items() -> Vec<NavItem> {
    let mut items = vec![NavItem {
        label: "Dashboard",
        route: Route::Dashboard,
    }];
    items.extend(EntityKind::ALL.into_iter().map(|kind| NavItem {
        label: match kind {
            EntityKind::Patient => "Patients",
            EntityKind::Staff => "Staff",
            EntityKind::Horse => "Horses",
            EntityKind::Session => "Sessions",
        },
        route: Route::List(kind),
    }));
    items
}

impl NavItem {
    /// Highlighted while the current route is this item or below it.
    pub fn is_active(&self, current: &Route) -> bool {
        match (&self.route, current.kind()) {
            (Route::Dashboard, _) => *current == Route::Dashboard,
            (Route::List(kind), Some(current_kind)) => *kind == current_kind,
            _ => false,
        }
    }
}

/// Database badge shown in the navbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StatusBadge {
    Loading,
    Connected { counts: RecordCounts },
    Error { message: String },
}

impl StatusBadge {
    pub fn label(&self) -> &'static str {
        match self {
            StatusBadge::Loading => "Connecting...",
            StatusBadge::Connected { .. } => "Connected",
            StatusBadge::Error { .. } => "Error",
        }
    }

    /// Tooltip lines: status, then one count per table when connected.
    pub fn tooltip(&self) -> Vec<String> {
        let mut lines = vec![format!("Database status: {}", self.label())];
        if let StatusBadge::Connected { counts } = self {
            lines.push(format!("Patients: {}", counts.patients));
            lines.push(format!("Staff: {}", counts.staff));
            lines.push(format!("Horses: {}", counts.horses));
            lines.push(format!("Sessions: {}", counts.sessions));
        }
        lines
    }
}

impl From<DatabaseStatus> for StatusBadge {
    fn from(status: DatabaseStatus) -> Self {
        match status {
            DatabaseStatus::Connected { counts } => StatusBadge::Connected { counts },
            DatabaseStatus::Error { message } => StatusBadge::Error { message },
        }
    }
}

/// Navbar state for one screen.
#[derive(Debug, Clone, Serialize)]
pub struct NavBar {
    pub brand: &'static str,
    pub items: Vec<NavItem>,
    pub current: Route,
    pub badge: StatusBadge,
}

impl NavBar {
    /// Navbar before the status check has run.
    pub fn new(current: Route) -> Self {
        Self {
            brand: BRAND,
            items: nav_items(),
            current,
            badge: StatusBadge::Loading,
        }
    }

    /// Run the status check.
    pub fn refresh<S: Store>(&mut self, service: &ClinicService<S>) {
        self.badge = service.database_status().into();
    }

    pub fn active_item(&self) -> Option<&NavItem> {
        self.items.iter().find(|item| item.is_active(&self.current))
    }
}
