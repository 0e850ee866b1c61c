//! List page for one record kind.

use serde::Serialize;

use super::routes::Route;
use super::table::{EmptyState, Table};
use super::ViewRecord;
use crate::service::ClinicService;
use crate::store::Store;

/// Confirmation prompt shown before a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmDialog {
    pub target_id: String,
    pub title: &'static str,
    pub message: String,
}

impl ConfirmDialog {
    pub fn delete<E: ViewRecord>(id: &str) -> Self {
        Self {
            target_id: id.to_string(),
            title: "Are you sure?",
            message: format!(
                "This action cannot be undone. The {} record will be permanently deleted.",
                E::KIND.noun().to_lowercase()
            ),
        }
    }
}

/// Links offered on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowActions {
    pub view: Route,
    pub edit: Route,
}

/// What the page body shows.
#[derive(Debug)]
pub enum ListBody<'a, E: ViewRecord> {
    Loading,
    Empty(EmptyState),
    Rows(Vec<&'a E>),
}

#[derive(Debug)]
pub struct ListPage<E: ViewRecord> {
    table: Table<E>,
    loaded: bool,
    confirm: Option<ConfirmDialog>,
}

impl<E: ViewRecord> Default for ListPage<E> {
    fn default() -> Self {
        Self {
            table: Table::default(),
            loaded: false,
            confirm: None,
        }
    }
}

impl<E: ViewRecord> ListPage<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all rows. A failed load shows the empty state; the service has
    /// already notified.
    pub fn load<S: Store>(&mut self, service: &ClinicService<S>) {
        self.table.set_rows(E::load_all(service));
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn table(&self) -> &Table<E> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table<E> {
        &mut self.table
    }

    pub fn body(&self) -> ListBody<'_, E> {
        if !self.loaded {
            ListBody::Loading
        } else if self.table.is_empty() {
            ListBody::Empty(E::empty_state())
        } else {
            ListBody::Rows(self.table.visible())
        }
    }

    pub fn new_route(&self) -> Route {
        Route::New(E::KIND)
    }

    pub fn row_actions(&self, row: &E) -> RowActions {
        RowActions {
            view: Route::Detail(E::KIND, row.id().to_string()),
            edit: Route::Edit(E::KIND, row.id().to_string()),
        }
    }

    pub fn confirm_dialog(&self) -> Option<&ConfirmDialog> {
        self.confirm.as_ref()
    }

    /// Open the delete prompt for a row.
    pub fn request_delete(&mut self, id: &str) {
        self.confirm = Some(ConfirmDialog::delete::<E>(id));
    }

    pub fn cancel_delete(&mut self) {
        self.confirm = None;
    }

    /// Delete the row behind the open prompt. Returns `true` if it was removed.
    pub fn confirm_delete<S: Store>(&mut self, service: &mut ClinicService<S>) -> bool {
        let Some(dialog) = self.confirm.take() else {
            return false;
        };
        if !E::remove(service, &dialog.target_id) {
            return false;
        }
        self.table.remove(&dialog.target_id);
        service
            .notifier()
            .success(&format!("{} deleted successfully", E::KIND.noun()));
        true
    }
}
