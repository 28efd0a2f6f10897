#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use integraupt_portal::db::repositories::LocalRepository;
use integraupt_portal::models::{
    Faculty, FacultyId, ScheduleEntry, School, SchoolId, Space, SpaceId, SpaceKind, SpaceState,
    TimeBlock, UserId, UserProfile,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// "Today" used by the booking tests.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 10).unwrap()
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").unwrap()
}

pub fn space(id: i64, name: &str, kind: SpaceKind, school: &str) -> Space {
    Space {
        id: SpaceId::new(id),
        code: format!("SP-{}", id),
        name: name.to_string(),
        location: "Pabellón C".to_string(),
        kind,
        capacity: 30,
        equipment: "Proyector".to_string(),
        faculty: "Facultad de Ingeniería".to_string(),
        school: school.to_string(),
        state: SpaceState::Available,
    }
}

pub fn user(id: i64, first: &str, last: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        first_names: first.to_string(),
        last_names: last.to_string(),
    }
}

/// Repository with two schools, four spaces, three blocks and a small schedule.
///
/// - space 1 "Laboratorio A" (Sistemas), space 2 "Laboratorio B" (Sistemas, maintenance)
/// - space 3 "Aula 201" (Civil), space 4 "Aula 305" (Sistemas, no schedule)
/// - users 1 (Ana Flores), 2 (Carlos Huanca), 9 (Admin Portal)
pub fn portal_repository() -> LocalRepository {
    let repo = LocalRepository::new();

    repo.add_school(
        Faculty {
            id: FacultyId::new(1),
            name: "Facultad de Ingeniería".to_string(),
        },
        School {
            id: SchoolId::new(1),
            name: "Ingeniería de Sistemas".to_string(),
            faculty_id: FacultyId::new(1),
        },
    );
    repo.add_school(
        Faculty {
            id: FacultyId::new(1),
            name: "Facultad de Ingeniería".to_string(),
        },
        School {
            id: SchoolId::new(2),
            name: "Ingeniería Civil".to_string(),
            faculty_id: FacultyId::new(1),
        },
    );

    repo.add_space(space(1, "Laboratorio A", SpaceKind::Laboratory, "Ingeniería de Sistemas"));
    let mut closed = space(2, "Laboratorio B", SpaceKind::Laboratory, "Ingenieria de Sistemas");
    closed.state = SpaceState::Maintenance;
    repo.add_space(closed);
    repo.add_space(space(3, "Aula 201", SpaceKind::Classroom, "Ingeniería Civil"));
    repo.add_space(space(4, "Aula 305", SpaceKind::Classroom, "Ingeniería de Sistemas"));

    repo.add_time_block(TimeBlock::new(1, "8:00", "8:50").with_name("Bloque 1").with_order(1));
    repo.add_time_block(TimeBlock::new(2, "8:50", "9:40").with_name("Bloque 2").with_order(2));
    repo.add_time_block(TimeBlock::new(3, "14:00", "14:50").with_order(3));

    repo.set_schedule(
        SpaceId::new(1),
        vec![
            ScheduleEntry::new(2, "Lunes").occupied_by("Base de Datos II"),
            ScheduleEntry::new(1, "Miércoles")
                .occupied_by("Redes I")
                .with_instructor("Ing. Quispe"),
        ],
    );

    repo.add_user(user(1, "Ana", "Flores"));
    repo.add_user(user(2, "Carlos", "Huanca"));
    repo.add_user(user(9, "Admin", "Portal"));

    repo
}
