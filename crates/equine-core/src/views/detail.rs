//! Read-only page for a single record.

use super::list::ConfirmDialog;
use super::routes::Route;
use super::{DetailField, ViewRecord};
use crate::service::{ClinicService, Lookup};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<E> {
    Loading,
    Loaded(E),
    /// Leave the page for this route.
    Redirect(Route),
}

#[derive(Debug)]
pub struct DetailPage<E: ViewRecord> {
    id: String,
    state: DetailState<E>,
    confirm: Option<ConfirmDialog>,
}

impl<E: ViewRecord> DetailPage<E> {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: DetailState::Loading,
            confirm: None,
        }
    }

    /// Fetch the record. A miss or a store failure redirects to the list;
    /// only the miss adds a "not found" notification.
    pub fn load<S: Store>(&mut self, service: &ClinicService<S>) {
        self.state = match E::load(service, &self.id) {
            Lookup::Found(record) => DetailState::Loaded(record),
            Lookup::Missing => {
                service
                    .notifier()
                    .error(&format!("{} not found", E::KIND.noun()));
                DetailState::Redirect(Route::List(E::KIND))
            }
            Lookup::Failed => DetailState::Redirect(Route::List(E::KIND)),
        };
    }

    pub fn state(&self) -> &DetailState<E> {
        &self.state
    }

    pub fn record(&self) -> Option<&E> {
        match &self.state {
            DetailState::Loaded(record) => Some(record),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<String> {
        self.record().map(ViewRecord::title)
    }

    /// Labeled values; empty until loaded.
    pub fn fields(&self) -> Vec<DetailField> {
        self.record().map(ViewRecord::fields).unwrap_or_default()
    }

    pub fn edit_route(&self) -> Route {
        Route::Edit(E::KIND, self.id.clone())
    }

    pub fn back_route(&self) -> Route {
        Route::List(E::KIND)
    }

    pub fn confirm_dialog(&self) -> Option<&ConfirmDialog> {
        self.confirm.as_ref()
    }

    pub fn request_delete(&mut self) {
        self.confirm = Some(ConfirmDialog::delete::<E>(&self.id));
    }

    pub fn cancel_delete(&mut self) {
        self.confirm = None;
    }

    /// Delete after confirmation; on success the page redirects to the list.
    pub fn confirm_delete<S: Store>(&mut self, service: &mut ClinicService<S>) -> bool {
        if self.confirm.take().is_none() {
            return false;
        }
        if !E::remove(service, &self.id) {
            return false;
        }
        service
            .notifier()
            .success(&format!("{} deleted successfully", E::KIND.noun()));
        self.state = DetailState::Redirect(Route::List(E::KIND));
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{EnrichedSession, EntityKind, Horse, Patient, Staff};
    use crate::notify::{Level, NotificationLog};
    use crate::remote::{RemoteError, RemoteResult, RemoteStore, Request, Response, Transport};
    use crate::store::MemoryStore;
    use crate::views::{NOT_SPECIFIED, UNASSIGNED};

    fn service() -> (ClinicService<MemoryStore>, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::new());
        (ClinicService::new(MemoryStore::seeded(), log.clone()), log)
    }

    #[test]
    fn test_loads_record() {
        let (service, log) = service();
        let mut page = DetailPage::<Horse>::new("hrs-2");
        assert_eq!(*page.state(), DetailState::Loading);
        assert!(page.fields().is_empty());

        page.load(&service);
        assert_eq!(page.title().as_deref(), Some("Estrella"));
        assert_eq!(page.fields()[1].value, "10 years");
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_record_redirects() {
        let (service, log) = service();
        let mut page = DetailPage::<Staff>::new("stf-404");
        page.load(&service);
        assert_eq!(
            *page.state(),
            DetailState::Redirect(Route::List(EntityKind::Staff))
        );
        assert_eq!(log.messages(Level::Error), vec!["Staff member not found"]);
    }

    #[test]
    fn test_session_detail_after_patient_removed() {
        let (mut service, _) = service();
        assert!(service.delete_patient("pat-3"));

        let mut page = DetailPage::<EnrichedSession>::new("ses-3");
        page.load(&service);
        let fields = page.fields();
        let value = |label: &str| {
            fields
                .iter()
                .find(|f| f.label == label)
                .map(|f| f.value.clone())
                .unwrap()
        };
        assert_eq!(value("Patient"), UNASSIGNED);
        assert_eq!(value("Horse"), "Trueno");
        assert_eq!(value("Notes"), NOT_SPECIFIED);
    }

    #[test]
    fn test_delete_redirects_to_list() {
        let (mut service, log) = service();
        let mut page = DetailPage::<Horse>::new("hrs-1");
        page.load(&service);

        assert!(!page.confirm_delete(&mut service));
        page.request_delete();
        assert!(page.confirm_delete(&mut service));
        assert_eq!(page.state(), &DetailState::Redirect(page.back_route()));
        assert!(service.get_horse("hrs-1").is_none());
        assert_eq!(log.messages(Level::Success), vec!["Horse deleted successfully"]);
    }

    struct Offline;

    impl Transport for Offline {
        fn execute(&self, _request: &Request) -> RemoteResult<Response> {
            Err(RemoteError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn test_store_failure_reports_once() {
        let log = Arc::new(NotificationLog::new());
        let service = ClinicService::new(RemoteStore::new(Offline), log.clone());

        let mut page = DetailPage::<Patient>::new("pat-1");
        page.load(&service);
        assert_eq!(
            *page.state(),
            DetailState::Redirect(Route::List(EntityKind::Patient))
        );
        assert_eq!(log.messages(Level::Error), vec!["Error loading patient"]);
    }
}
