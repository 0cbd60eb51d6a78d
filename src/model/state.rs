use serde::{Deserialize, Serialize};

use super::project::{Project, ProjectId};
use super::task::Task;

/// Which top-level screen a front end is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Dashboard,
    Projects,
    ProjectDetail,
}

/// Root aggregate held by the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Newest first
    pub projects: Vec<Project>,
    /// Oldest first
    pub tasks: Vec<Task>,
    pub dark_mode: bool,
    // --- Transient navigation state (never persisted) ---
    pub active_view: View,
    pub selected_project_id: Option<ProjectId>,
}

impl StoreState {
    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn tasks_for<'a>(&'a self, id: &'a ProjectId) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| &t.project_id == id)
    }

    /// The persisted subset of this state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            projects: Some(self.projects.clone()),
            tasks: Some(self.tasks.clone()),
            dark_mode: Some(self.dark_mode),
        }
    }
}

/// The persisted record. Every field is optional so partial records merge
/// over the current state field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
}

/// Borrowed view of the persisted fields, so saving doesn't clone
/// every collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRef<'a> {
    pub projects: &'a [Project],
    pub tasks: &'a [Task],
    pub dark_mode: bool,
}

impl<'a> From<&'a StoreState> for SnapshotRef<'a> {
    fn from(state: &'a StoreState) -> Self {
        SnapshotRef {
            projects: &state.projects,
            tasks: &state.tasks,
            dark_mode: state.dark_mode,
        }
    }
}
