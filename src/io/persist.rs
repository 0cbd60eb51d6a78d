use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::io::storage::{Storage, StorageError};
use crate::model::project::{NewProject, Project, ProjectId, ProjectStatus};
use crate::model::state::{Snapshot, SnapshotRef, StoreState};
use crate::model::task::{NewTask, Priority, Task, TaskId};

/// Marks the key a malformed record is moved to before it is replaced.
/// The full backup key also carries a timestamp, see [`corrupt_key`].
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// What to do when no record is stored yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstRun {
    Seed,
    Empty,
}

/// Outcome of [`load`]
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub snapshot: Snapshot,
    /// True when `snapshot` is the stored record itself, not seed or empty data
    pub stored: bool,
    /// False when the stored record could be neither read nor set aside.
    /// Saving would then destroy the only copy of it.
    pub writable: bool,
}

/// Read the persisted record. Never fails: a missing record yields the seed
/// dataset. A malformed one (bad JSON or not UTF-8) is moved to
/// [`corrupt_key`] byte for byte, logged, and treated as missing. Any other
/// read error also yields the seed dataset, but with `writable: false`.
pub fn load(storage: &impl Storage, key: &str, first_run: FirstRun) -> Loaded {
    load_at(storage, key, first_run, Utc::now())
}

/// [`load`] with an explicit clock, used for seed timestamps and backup keys
pub fn load_at(
    storage: &impl Storage,
    key: &str,
    first_run: FirstRun,
    now: DateTime<Utc>,
) -> Loaded {
    let text = match storage.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return fresh(key, first_run, now, true),
        Err(e @ StorageError::NotText { .. }) => {
            let writable = set_aside(storage, key, now, &e);
            return fresh(key, first_run, now, writable);
        }
        Err(e) => {
            warn!(key, error = %e, "could not read stored state, changes will not be saved");
            return fresh(key, first_run, now, false);
        }
    };

    match serde_json::from_str::<Snapshot>(&text) {
        Ok(snapshot) => {
            debug!(key, "loaded stored state");
            Loaded {
                snapshot,
                stored: true,
                writable: true,
            }
        }
        Err(e) => {
            let writable = set_aside(storage, key, now, &e);
            fresh(key, first_run, now, writable)
        }
    }
}

/// Backup key for a malformed record found at `now`
pub fn corrupt_key(key: &str, now: DateTime<Utc>) -> String {
    format!("{}{}-{}", key, CORRUPT_SUFFIX, now.format("%Y%m%dT%H%M%S%3fZ"))
}

/// Move a malformed record out of the way. Returns whether that worked.
fn set_aside(
    storage: &impl Storage,
    key: &str,
    now: DateTime<Utc>,
    reason: &dyn Display,
) -> bool {
    let backup = corrupt_key(key, now);
    match storage.rename(key, &backup) {
        Ok(()) => {
            warn!(key, backup = %backup, error = %reason, "moved malformed stored state aside");
            true
        }
        Err(e) => {
            warn!(
                key,
                error = %e,
                "could not back up malformed stored state, changes will not be saved"
            );
            false
        }
    }
}

fn fresh(key: &str, first_run: FirstRun, now: DateTime<Utc>, writable: bool) -> Loaded {
    let snapshot = match first_run {
        FirstRun::Seed => {
            info!(key, "no usable stored state, seeding sample data");
            sample_data(now)
        }
        FirstRun::Empty => Snapshot::default(),
    };
    Loaded {
        snapshot,
        stored: false,
        writable,
    }
}

/// Write the persisted fields of `state`. Failures are logged and dropped;
/// the next successful save captures the latest in-memory state anyway.
pub fn save(storage: &impl Storage, key: &str, state: &StoreState) {
    let json = match serde_json::to_string(&SnapshotRef::from(state)) {
        Ok(json) => json,
        Err(e) => {
            warn!(key, error = %e, "could not serialize state");
            return;
        }
    };
    if let Err(e) = storage.set(key, &json) {
        warn!(key, error = %e, "could not save state");
    }
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Sample projects and tasks for a first run. Ids are fresh on every call;
/// every record shares the `now` timestamp.
pub fn sample_data(now: DateTime<Utc>) -> Snapshot {
    let projects: Vec<Project> = sample_projects()
        .into_iter()
        .map(|p| p.into_project(ProjectId::generate(), now))
        .collect();

    let tasks: Vec<Task> = SAMPLE_TASKS
        .iter()
        .map(|&(project_idx, title, completed, priority, due)| {
            NewTask {
                project_id: projects[project_idx].id.clone(),
                title: title.to_string(),
                completed,
                priority,
                due_date: parse_date(due),
            }
            .into_task(TaskId::generate(), now)
        })
        .collect();

    Snapshot {
        projects: Some(projects),
        tasks: Some(tasks),
        dark_mode: None,
    }
}

fn sample_projects() -> Vec<NewProject> {
    vec![
        NewProject {
            name: "Website Redesign".into(),
            description: "Full redesign of the company website with new branding and improved UX."
                .into(),
            status: ProjectStatus::Active,
            priority: Priority::High,
            category: "Design".into(),
            color: "#3b82f6".into(),
            due_date: parse_date("2026-03-15"),
            notes: "Focus on mobile-first approach. Check with marketing for brand guidelines."
                .into(),
        },
        NewProject {
            name: "API Integration".into(),
            description: "Integrate third-party payment and shipping APIs into the platform."
                .into(),
            status: ProjectStatus::Planning,
            priority: Priority::Medium,
            category: "Development".into(),
            color: "#8b5cf6".into(),
            due_date: parse_date("2026-04-01"),
            notes: String::new(),
        },
        NewProject {
            name: "Q1 Marketing Campaign".into(),
            description: "Social media and email campaign for Q1 product launch.".into(),
            status: ProjectStatus::Completed,
            priority: Priority::Medium,
            category: "Marketing".into(),
            color: "#10b981".into(),
            due_date: parse_date("2026-02-01"),
            notes: "Completed ahead of schedule.".into(),
        },
    ]
}

/// (project position, title, completed, priority, due date)
const SAMPLE_TASKS: [(usize, &str, bool, Priority, &str); 7] = [
    (0, "Create wireframes", true, Priority::High, "2026-02-20"),
    (0, "Design mockups in Figma", false, Priority::High, "2026-03-01"),
    (0, "Review with stakeholders", false, Priority::Medium, "2026-03-08"),
    (1, "Research payment providers", false, Priority::High, "2026-03-10"),
    (1, "Write API spec document", false, Priority::Medium, "2026-03-20"),
    (2, "Draft email copy", true, Priority::Medium, "2026-01-15"),
    (2, "Schedule social posts", true, Priority::Low, "2026-01-20"),
];

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::{Action, View};
    use crate::ops::reducer::reduce;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    const KEY: &str = "dashboard_data";

    #[test]
    fn first_run_seeds_three_projects_seven_tasks() {
        let storage = MemoryStorage::new();
        let loaded = load(&storage, KEY, FirstRun::Seed);
        assert!(loaded.writable);
        assert!(!loaded.stored);
        let snap = loaded.snapshot;
        let projects = snap.projects.unwrap();
        let tasks = snap.tasks.unwrap();

        assert_eq!(projects.len(), 3);
        assert_eq!(tasks.len(), 7);
        assert_eq!(projects[0].name, "Website Redesign");

        let ids: HashSet<&ProjectId> = projects.iter().map(|p| &p.id).collect();
        assert!(tasks.iter().all(|t| ids.contains(&t.project_id)));

        let per_project: Vec<usize> = projects
            .iter()
            .map(|p| tasks.iter().filter(|t| t.project_id == p.id).count())
            .collect();
        assert_eq!(per_project, vec![3, 2, 2]);
    }

    #[test]
    fn seeding_uses_fresh_ids_and_one_timestamp() {
        let now = Utc::now();
        let a = sample_data(now);
        let b = sample_data(now);
        let a_projects = a.projects.unwrap();
        let b_projects = b.projects.unwrap();
        assert_ne!(a_projects[0].id, b_projects[0].id);
        assert!(a_projects.iter().all(|p| p.created_at == now));
        assert!(a.tasks.unwrap().iter().all(|t| t.created_at == now));
    }

    #[test]
    fn first_run_empty_when_seeding_disabled() {
        let storage = MemoryStorage::new();
        assert_eq!(
            load(&storage, KEY, FirstRun::Empty).snapshot,
            Snapshot::default()
        );
    }

    #[test]
    fn save_then_load_reproduces_persisted_fields() {
        let storage = MemoryStorage::new();
        let mut state = reduce(StoreState::default(), Action::Load(sample_data(Utc::now())));
        state = reduce(state, Action::ToggleDarkMode);
        let pid = state.projects[1].id.clone();
        state = reduce(
            state,
            Action::SetView {
                view: View::ProjectDetail,
                project_id: Some(pid),
            },
        );

        save(&storage, KEY, &state);
        let loaded = load(&storage, KEY, FirstRun::Seed).snapshot;
        let reloaded = reduce(StoreState::default(), Action::Load(loaded));

        assert_eq!(reloaded.projects, state.projects);
        assert_eq!(reloaded.tasks, state.tasks);
        assert!(reloaded.dark_mode);
        assert_eq!(reloaded.active_view, View::Dashboard);
        assert_eq!(reloaded.selected_project_id, None);
    }

    #[test]
    fn saved_record_has_no_transient_fields() {
        let storage = MemoryStorage::new();
        let state = StoreState {
            active_view: View::Projects,
            ..Default::default()
        };
        save(&storage, KEY, &state);
        let raw = storage.get(KEY).unwrap().unwrap();
        assert!(!raw.contains("activeView"));
        assert!(!raw.contains("selectedProjectId"));
        assert!(raw.contains("\"darkMode\":false"));
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn malformed_record_is_backed_up_and_seeded() {
        let storage = MemoryStorage::with_entry(KEY, "not json {{{");
        let now = at("2026-03-10T08:30:00.250Z");
        let loaded = load_at(&storage, KEY, FirstRun::Seed, now);

        assert!(loaded.writable);
        assert_eq!(loaded.snapshot.projects.map(|p| p.len()), Some(3));
        let backup = corrupt_key(KEY, now);
        assert_eq!(backup, "dashboard_data.corrupt-20260310T083000250Z");
        assert_eq!(storage.get(&backup).unwrap().as_deref(), Some("not json {{{"));
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn earlier_backups_are_kept() {
        let storage = MemoryStorage::with_entry(KEY, "first bad");
        let first = at("2026-03-10T08:30:00Z");
        load_at(&storage, KEY, FirstRun::Empty, first);
        storage.set(KEY, "second bad").unwrap();
        let second = at("2026-03-11T08:30:00Z");
        load_at(&storage, KEY, FirstRun::Empty, second);

        let first_backup = storage.get(&corrupt_key(KEY, first)).unwrap();
        let second_backup = storage.get(&corrupt_key(KEY, second)).unwrap();
        assert_eq!(first_backup.as_deref(), Some("first bad"));
        assert_eq!(second_backup.as_deref(), Some("second bad"));
    }

    #[test]
    fn malformed_record_that_cannot_be_moved_is_not_writable() {
        let storage = MemoryStorage::with_entry(KEY, "not json");
        storage.set_fail_writes(true);
        let loaded = load(&storage, KEY, FirstRun::Seed);

        assert!(!loaded.writable);
        assert_eq!(loaded.snapshot.projects.map(|p| p.len()), Some(3));
        assert_eq!(storage.get(KEY).unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn read_failure_is_not_writable() {
        let storage = MemoryStorage::with_entry(KEY, r#"{"darkMode":true}"#);
        storage.set_fail_reads(true);
        let loaded = load(&storage, KEY, FirstRun::Empty);
        assert!(!loaded.writable);
        assert_eq!(loaded.snapshot, Snapshot::default());
    }

    #[test]
    fn non_utf8_file_is_moved_aside_byte_for_byte() {
        let dir = tempfile::TempDir::new().unwrap();
        let raw: &[u8] = b"{\"projects\":[],\"x\":\"\xff\xfe\"}";
        std::fs::write(dir.path().join("dashboard_data.json"), raw).unwrap();
        let storage = crate::io::storage::FileStorage::new(dir.path());
        let now = at("2026-03-10T08:30:00Z");

        let loaded = load_at(&storage, KEY, FirstRun::Seed, now);
        assert!(loaded.writable);
        assert_eq!(loaded.snapshot.projects.map(|p| p.len()), Some(3));
        let backup = storage.path_for(&corrupt_key(KEY, now));
        assert_eq!(std::fs::read(backup).unwrap(), raw);
    }

    #[test]
    fn partial_record_loads_as_is() {
        let storage = MemoryStorage::with_entry(KEY, r#"{"darkMode":true}"#);
        let loaded = load(&storage, KEY, FirstRun::Seed);
        assert!(loaded.stored);
        let snap = loaded.snapshot;
        assert_eq!(snap.dark_mode, Some(true));
        assert!(snap.projects.is_none());
    }

    #[test]
    fn reads_records_written_by_the_web_app() {
        let raw = r##"{
            "projects":[{"id":"8d3c","name":"Launch","description":"","status":"on-hold",
              "priority":"high","category":"","color":"#ef4444","dueDate":"","notes":"",
              "createdAt":"2026-01-04T09:12:44.120Z"}],
            "tasks":[{"id":"a1","projectId":"8d3c","title":"Draft plan","completed":false,
              "priority":"medium","dueDate":"2026-01-10","createdAt":"2026-01-04T09:13:01.005Z"}],
            "darkMode":false
        }"##;
        let storage = MemoryStorage::with_entry(KEY, raw);
        let snap = load(&storage, KEY, FirstRun::Seed).snapshot;
        let projects = snap.projects.unwrap();
        assert_eq!(projects[0].status, ProjectStatus::OnHold);
        assert!(projects[0].due_date.is_none());
        let tasks = snap.tasks.unwrap();
        assert_eq!(tasks[0].due_date, parse_date("2026-01-10"));
        // Still in place, nothing was moved aside
        assert!(storage.contains(KEY));
    }

    #[test]
    fn save_failure_is_swallowed() {
        let storage = MemoryStorage::with_entry(KEY, "{}");
        storage.set_fail_writes(true);
        save(&storage, KEY, &StoreState::default());
        assert_eq!(storage.get(KEY).unwrap().as_deref(), Some("{}"));
    }
}
