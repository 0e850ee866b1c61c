//! Read-time joins of sessions with their linked records.

use std::collections::HashMap;

use crate::models::{
    EnrichedSession, Horse, HorseName, Patient, PersonName, Session, SessionStatus, Staff,
};

/// Attach display names to each session. A reference that does not resolve
/// leaves its field `None`.
pub fn enrich_sessions(
    sessions: Vec<Session>,
    patients: &[Patient],
    horses: &[Horse],
    staff: &[Staff],
) -> Vec<EnrichedSession> {
    let patients: HashMap<&str, &Patient> = patients.iter().map(|p| (p.id.as_str(), p)).collect();
    let horses: HashMap<&str, &Horse> = horses.iter().map(|h| (h.id.as_str(), h)).collect();
    let staff: HashMap<&str, &Staff> = staff.iter().map(|s| (s.id.as_str(), s)).collect();

    sessions
        .into_iter()
        .map(|session| {
            let patient = patients
                .get(session.patient_id.as_str())
                .map(|p| PersonName {
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                });
            let horse = horses
                .get(session.horse_id.as_str())
                .map(|h| HorseName {
                    name: h.name.clone(),
                });
            let staff = staff.get(session.staff_id.as_str()).map(|s| PersonName {
                first_name: s.first_name.clone(),
                last_name: s.last_name.clone(),
            });
            EnrichedSession {
                session,
                patient,
                horse,
                staff,
            }
        })
        .collect()
}

/// Scheduled sessions, soonest first, at most `limit`.
pub fn select_upcoming(sessions: Vec<EnrichedSession>, limit: usize) -> Vec<EnrichedSession> {
    let mut upcoming: Vec<_> = sessions
        .into_iter()
        .filter(|s| s.session.status == SessionStatus::Scheduled)
        .collect();
    upcoming.sort_by(|a, b| {
        (a.session.date, &a.session.time).cmp(&(b.session.date, &b.session.time))
    });
    upcoming.truncate(limit);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[test]
    fn test_enrich_seed_sessions() {
        let enriched = enrich_sessions(
            seed::sessions(),
            &seed::patients(),
            &seed::horses(),
            &seed::staff(),
        );
        assert_eq!(enriched.len(), 3);

        let third = enriched.iter().find(|e| e.session.id == "ses-3").unwrap();
        assert_eq!(third.patient_name().as_deref(), Some("Ana Martínez"));
        assert_eq!(third.horse_name(), Some("Trueno"));
        assert_eq!(third.staff_name().as_deref(), Some("Roberto Díaz"));
    }

    #[test]
    fn test_deleted_patient_leaves_field_absent() {
        let patients: Vec<_> = seed::patients()
            .into_iter()
            .filter(|p| p.id != "pat-1")
            .collect();
        let enriched = enrich_sessions(seed::sessions(), &patients, &seed::horses(), &seed::staff());

        let first = enriched.iter().find(|e| e.session.id == "ses-1").unwrap();
        assert!(first.patient.is_none());
        assert_eq!(first.horse_name(), Some("Luna"));
    }

    fn arb_status() -> impl Strategy<Value = SessionStatus> {
        prop_oneof![
            Just(SessionStatus::Scheduled),
            Just(SessionStatus::Completed),
            Just(SessionStatus::Cancelled),
        ]
    }

    fn arb_session() -> impl Strategy<Value = EnrichedSession> {
        (0i64..400, 7u32..19, arb_status()).prop_map(|(offset, hour, status)| {
            let mut session = seed::sessions().remove(0);
            session.id = format!("s-{offset}-{hour}");
            session.date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(offset);
            session.time = format!("{hour:02}:00");
            session.status = status;
            EnrichedSession::bare(session)
        })
    }

    proptest! {
        #[test]
        fn upcoming_is_scheduled_sorted_and_bounded(
            sessions in prop::collection::vec(arb_session(), 0..40),
            limit in 0usize..8,
        ) {
            let scheduled = sessions
                .iter()
                .filter(|s| s.session.status == SessionStatus::Scheduled)
                .count();
            let upcoming = select_upcoming(sessions, limit);

            prop_assert_eq!(upcoming.len(), scheduled.min(limit));
            prop_assert!(upcoming.iter().all(|s| s.session.status == SessionStatus::Scheduled));
            prop_assert!(upcoming.windows(2).all(|w| w[0].session.date <= w[1].session.date));
        }
    }
}
