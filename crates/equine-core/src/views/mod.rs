//! View-model controllers for the clinic UI.
//!
//! Each screen of the UI is a plain state object driven by the UI shell:
//! the shell calls `load`/`submit`/`confirm_*` and renders whatever state
//! results. Controllers only talk to [`ClinicService`]; notifications go out
//! through the service's notifier.
//!
//! - **routes**: route table and path parsing
//! - **nav**: navbar entries and storage status badge
//! - **table**: searchable, sortable row table and empty state
//! - **list**: per-entity list page with confirm-before-delete
//! - **detail**: read-only single-record page
//! - **form**: create/edit form state machine and validation
//! - **dashboard**: statistics cards, upcoming sessions, shortcuts

pub mod dashboard;
pub mod detail;
pub mod form;
pub mod list;
pub mod nav;
mod records;
pub mod routes;
pub mod table;

pub use routes::Route;

use serde::Serialize;

use crate::models::EntityKind;
use crate::service::{ClinicService, Lookup};
use crate::store::Store;
use table::{Column, EmptyState};

/// Shown for optional values that are not set.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Shown when a session reference no longer resolves.
pub const UNASSIGNED: &str = "Unassigned";

/// One labeled value on a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    fn new(label: &'static str, value: Option<String>) -> Self {
        Self {
            label,
            value: value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        }
    }
}

/// A record kind that list and detail pages can show.
pub trait ViewRecord: Clone {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Heading for the detail page.
    fn title(&self) -> String;

    /// Table columns, in display order.
    fn columns() -> &'static [Column];

    /// Display text of one column.
    fn cell(&self, column: &str) -> String;

    /// Column the list search box filters on.
    fn search_column() -> &'static str;

    /// Read-only fields for the detail page.
    fn fields(&self) -> Vec<DetailField>;

    fn empty_state() -> EmptyState;

    fn load_all<S: Store>(service: &ClinicService<S>) -> Vec<Self>;

    fn load<S: Store>(service: &ClinicService<S>, id: &str) -> Lookup<Self>;

    fn remove<S: Store>(service: &mut ClinicService<S>, id: &str) -> bool;
}
