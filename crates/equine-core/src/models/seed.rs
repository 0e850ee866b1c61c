//! Sample rows loaded into an empty store on first start.

use chrono::NaiveDate;

use super::{
    Horse, NewHorse, NewPatient, NewSession, NewStaff, Patient, Session, SessionStatus, Staff,
};

/// Complete fixture set, referentially consistent.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub patients: Vec<Patient>,
    pub staff: Vec<Staff>,
    pub horses: Vec<Horse>,
    pub sessions: Vec<Session>,
}

impl SeedData {
    pub fn load() -> Self {
        Self {
            patients: patients(),
            staff: staff(),
            horses: horses(),
            sessions: sessions(),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

pub fn patients() -> Vec<Patient> {
    vec![
        Patient::with_id(
            "pat-1".into(),
            NewPatient {
                document_id: "V-12345678".into(),
                first_name: "María".into(),
                last_name: "González".into(),
                birth_date: date(2010, 5, 15),
                phone: text("0414-1234567"),
                email: text("maria@example.com"),
                diagnosis: text("Autism spectrum disorder"),
                therapy_goals: text("Improve coordination and communication"),
                notes: text("Responds well to structured activities"),
            },
        ),
        Patient::with_id(
            "pat-2".into(),
            NewPatient {
                document_id: "V-23456789".into(),
                first_name: "Carlos".into(),
                last_name: "Rodríguez".into(),
                birth_date: date(2008, 10, 20),
                phone: text("0424-9876543"),
                email: None,
                diagnosis: text("Mild cerebral palsy"),
                therapy_goals: text("Strengthen muscles and balance"),
                notes: None,
            },
        ),
        Patient::with_id(
            "pat-3".into(),
            NewPatient {
                document_id: "V-34567890".into(),
                first_name: "Ana".into(),
                last_name: "Martínez".into(),
                birth_date: date(2015, 3, 8),
                phone: text("0412-4567890"),
                email: text("ana.martinez@example.com"),
                diagnosis: text("Down syndrome"),
                therapy_goals: text("Develop social skills"),
                notes: None,
            },
        ),
    ]
}

pub fn staff() -> Vec<Staff> {
    vec![
        Staff::with_id(
            "stf-1".into(),
            NewStaff {
                document_id: "V-87654321".into(),
                first_name: "Javier".into(),
                last_name: "Méndez".into(),
                phone: text("0416-7654321"),
                email: text("javier.mendez@example.com"),
                specialty: text("Physiotherapist"),
                role: text("Lead therapist"),
                hire_date: date(2020, 1, 15),
            },
        ),
        Staff::with_id(
            "stf-2".into(),
            NewStaff {
                document_id: "V-76543210".into(),
                first_name: "Luisa".into(),
                last_name: "Fernández".into(),
                phone: text("0414-8765432"),
                email: text("luisa@example.com"),
                specialty: text("Psychologist"),
                role: text("Support therapist"),
                hire_date: date(2021, 3, 1),
            },
        ),
        Staff::with_id(
            "stf-3".into(),
            NewStaff {
                document_id: "V-65432109".into(),
                first_name: "Roberto".into(),
                last_name: "Díaz".into(),
                phone: text("0424-5432109"),
                email: text("roberto@example.com"),
                specialty: text("Equestrian trainer"),
                role: text("Horse keeper"),
                hire_date: date(2019, 6, 10),
            },
        ),
    ]
}

pub fn horses() -> Vec<Horse> {
    vec![
        Horse::with_id(
            "hrs-1".into(),
            NewHorse {
                name: "Luna".into(),
                age: Some(8),
                breed: text("Quarter Horse"),
                color: text("Chestnut"),
                height: text("1.5 m"),
                weight: text("450 kg"),
                temperament: text("Docile and calm"),
                training: text("Fully trained for equine therapy"),
                medical_history: text("Vaccinations up to date"),
            },
        ),
        Horse::with_id(
            "hrs-2".into(),
            NewHorse {
                name: "Estrella".into(),
                age: Some(10),
                breed: text("Appaloosa"),
                color: text("Black and white spotted"),
                height: text("1.48 m"),
                weight: text("420 kg"),
                temperament: text("Patient and friendly"),
                training: text("Specialized in children with autism"),
                medical_history: text("Recent dental check"),
            },
        ),
        Horse::with_id(
            "hrs-3".into(),
            NewHorse {
                name: "Trueno".into(),
                age: Some(7),
                breed: text("Criollo"),
                color: text("Black"),
                height: text("1.52 m"),
                weight: text("460 kg"),
                temperament: text("Energetic but obedient"),
                training: text("Basic equine therapy training"),
                medical_history: text("Joint treatment"),
            },
        ),
    ]
}

pub fn sessions() -> Vec<Session> {
    let rows = [
        (
            "ses-1",
            date(2023, 4, 10),
            "09:00",
            "pat-1",
            "hrs-1",
            "stf-1",
            "45 minutes",
            "Balance and coordination exercises",
            text("Notable progress in posture"),
            SessionStatus::Completed,
        ),
        (
            "ses-2",
            date(2023, 4, 11),
            "10:00",
            "pat-2",
            "hrs-2",
            "stf-2",
            "30 minutes",
            "Relaxation and contact with the horse",
            text("Initial anxiety, then good adaptation"),
            SessionStatus::Completed,
        ),
        (
            "ses-3",
            date(2023, 4, 12),
            "11:00",
            "pat-3",
            "hrs-3",
            "stf-3",
            "40 minutes",
            "Sensory stimulation and basic exercises",
            None,
            SessionStatus::Scheduled,
        ),
    ];

    rows.into_iter()
        .filter_map(
            |(id, date, time, patient, horse, staff, duration, activities, notes, status)| {
                Some(Session::with_id(
                    id.into(),
                    NewSession {
                        date: date?,
                        time: time.into(),
                        patient_id: patient.into(),
                        horse_id: horse.into(),
                        staff_id: staff.into(),
                        duration: text(duration),
                        activities: text(activities),
                        notes,
                        status,
                    },
                ))
            },
        )
        .collect()
}
