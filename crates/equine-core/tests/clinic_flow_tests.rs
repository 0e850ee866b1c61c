//! End-to-end flows through the service and view controllers, run against
//! every local backend.

use std::sync::Arc;

use chrono::NaiveDate;
use equine_core::models::{SessionPatch, SessionStatus};
use equine_core::notify::{Level, NotificationLog};
use equine_core::views::dashboard::Dashboard;
use equine_core::views::detail::{DetailPage, DetailState};
use equine_core::views::form::{FormController, FormState, PatientForm, SessionForm};
use equine_core::views::list::{ListBody, ListPage};
use equine_core::views::{Route, ViewRecord, UNASSIGNED};
use equine_core::{
    ClinicService, Database, EnrichedSession, EntityKind, MemoryStore, NewPatient, NewSession,
    Patient, Store,
};

type DynStore = Box<dyn Store + Send>;

fn backends() -> Vec<(&'static str, DynStore)> {
    let mut db = Database::open_in_memory().unwrap();
    db.load_seed_if_empty(&equine_core::models::seed::SeedData::load())
        .unwrap();
    let memory: DynStore = Box::new(MemoryStore::seeded());
    let sqlite: DynStore = Box::new(db);
    vec![("memory", memory), ("sqlite", sqlite)]
}

fn with_log(store: DynStore) -> (ClinicService<DynStore>, Arc<NotificationLog>) {
    let log = Arc::new(NotificationLog::new());
    (ClinicService::new(store, log.clone()), log)
}

fn new_patient(document_id: &str, first: &str, last: &str) -> NewPatient {
    NewPatient {
        document_id: document_id.into(),
        first_name: first.into(),
        last_name: last.into(),
        ..Default::default()
    }
}

#[test]
fn test_created_ids_are_assigned_and_unique() {
    for (name, store) in backends() {
        let (mut service, _) = with_log(store);
        let a = service.create_patient(new_patient("D-1", "Ana", "Sosa")).unwrap();
        let b = service.create_patient(new_patient("D-2", "Bea", "Sosa")).unwrap();
        assert!(!a.id.is_empty(), "{name}");
        assert_ne!(a.id, b.id, "{name}");
        assert_eq!(service.list_patients().len(), 5, "{name}");
    }
}

#[test]
fn test_delete_absent_id_reports_false() {
    for (name, store) in backends() {
        let (mut service, log) = with_log(store);
        assert!(!service.delete_horse("hrs-404"), "{name}");
        assert_eq!(log.messages(Level::Error), vec!["Error deleting horse"], "{name}");
        assert_eq!(service.list_horses().len(), 3, "{name}");
    }
}

#[test]
fn test_status_update_reads_back() {
    for (name, store) in backends() {
        let (mut service, _) = with_log(store);
        let updated = service
            .update_session("ses-3", SessionPatch::status(SessionStatus::Cancelled))
            .unwrap();
        assert_eq!(updated.status, SessionStatus::Cancelled, "{name}");
        assert_eq!(
            service.get_session("ses-3").unwrap().session.status,
            SessionStatus::Cancelled,
            "{name}"
        );
    }
}

#[test]
fn test_deleted_patient_leaves_session_unassigned() {
    for (name, store) in backends() {
        let (mut service, _) = with_log(store);
        assert!(service.delete_patient("pat-1"), "{name}");

        let sessions = service.list_sessions();
        let first = sessions.iter().find(|s| s.session.id == "ses-1").unwrap();
        assert!(first.patient.is_none(), "{name}");
        assert_eq!(first.horse_name(), Some("Luna"), "{name}");

        let mut page = ListPage::<EnrichedSession>::new();
        page.load(&service);
        page.table_mut().set_search("unassigned");
        match page.body() {
            ListBody::Rows(rows) => {
                assert_eq!(rows.len(), 1, "{name}");
                assert_eq!(rows[0].id(), "ses-1", "{name}");
            }
            other => panic!("{name}: unexpected body {other:?}"),
        }
    }
}

#[test]
fn test_statistics_counts() {
    let mut store = MemoryStore::new();
    let p: Vec<Patient> = (0..3)
        .map(|i| {
            store
                .insert_patient(new_patient(&format!("D-{i}"), "P", &format!("{i}")))
                .unwrap()
        })
        .collect();
    let s1 = store
        .insert_staff(equine_core::NewStaff {
            document_id: "S-1".into(),
            first_name: "S".into(),
            last_name: "One".into(),
            ..Default::default()
        })
        .unwrap();
    store
        .insert_staff(equine_core::NewStaff {
            document_id: "S-2".into(),
            first_name: "S".into(),
            last_name: "Two".into(),
            ..Default::default()
        })
        .unwrap();
    let h = store
        .insert_horse(equine_core::NewHorse {
            name: "Luz".into(),
            ..Default::default()
        })
        .unwrap();
    for status in [SessionStatus::Scheduled, SessionStatus::Completed] {
        store
            .insert_session(NewSession {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                time: "09:00".into(),
                patient_id: p[0].id.clone(),
                horse_id: h.id.clone(),
                staff_id: s1.id.clone(),
                duration: None,
                activities: None,
                notes: None,
                status,
            })
            .unwrap();
    }

    let service = ClinicService::with_tracing(store);
    let stats = service.statistics();
    assert_eq!(
        (
            stats.patients,
            stats.staff,
            stats.horses,
            stats.scheduled_sessions,
            stats.completed_sessions
        ),
        (3, 2, 1, 1, 1)
    );
}

#[test]
fn test_patient_form_to_detail_flow() {
    for (name, store) in backends() {
        let (mut service, log) = with_log(store);

        let mut form = FormController::<PatientForm>::for_id(None);
        form.load(&service);
        form.set("document_id", "V-55");
        form.set("first_name", "Lucía");
        assert!(!form.submit(&mut service), "{name}");
        assert_eq!(service.list_patients().len(), 3, "{name}");

        form.set("last_name", "Pérez");
        assert!(form.submit(&mut service), "{name}");
        assert_eq!(
            *form.state(),
            FormState::Done(Route::List(EntityKind::Patient)),
            "{name}"
        );

        let created = service
            .list_patients()
            .into_iter()
            .find(|p| p.document_id == "V-55")
            .unwrap();
        let mut page = DetailPage::<Patient>::new(&created.id);
        page.load(&service);
        assert_eq!(page.title().as_deref(), Some("Lucía Pérez"), "{name}");

        page.request_delete();
        assert!(page.confirm_delete(&mut service), "{name}");
        assert!(matches!(page.state(), DetailState::Redirect(_)), "{name}");
        assert_eq!(
            log.messages(Level::Success),
            vec!["Patient created successfully", "Patient deleted successfully"],
            "{name}"
        );
    }
}

#[test]
fn test_session_form_schedules_for_dashboard() {
    for (name, store) in backends() {
        let (mut service, _) = with_log(store);

        let mut form = FormController::<SessionForm>::create();
        form.load(&service);
        let patient = form.options("patient_id")[0].value.clone();
        let horse = form.options("horse_id")[0].value.clone();
        let staff = form.options("staff_id")[0].value.clone();
        form.set("date", "2023-01-02");
        form.set("patient_id", patient);
        form.set("horse_id", horse);
        form.set("staff_id", staff);
        assert!(form.submit(&mut service), "{name}");

        let mut dashboard = Dashboard::new();
        dashboard.load(&service);
        let upcoming = dashboard.upcoming();
        assert_eq!(upcoming.len(), 2, "{name}");
        assert_eq!(upcoming[0].date, "2023-01-02", "{name}");
        assert_ne!(upcoming[0].patient, UNASSIGNED, "{name}");
        assert_eq!(dashboard.statistics().scheduled_sessions, 2, "{name}");
    }
}
