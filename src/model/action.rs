use super::project::{NewProject, ProjectId, ProjectPatch};
use super::state::{Snapshot, View};
use super::task::{NewTask, TaskId, TaskPatch};

/// A request to change store state. Every mutation goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Merge a persisted snapshot over the current state
    Load(Snapshot),
    /// Navigate; `project_id: None` keeps the current selection
    SetView {
        view: View,
        project_id: Option<ProjectId>,
    },
    ToggleDarkMode,
    AddProject(NewProject),
    UpdateProject {
        id: ProjectId,
        patch: ProjectPatch,
    },
    /// Removes the project and every task that references it
    DeleteProject(ProjectId),
    AddTask(NewTask),
    UpdateTask {
        id: TaskId,
        patch: TaskPatch,
    },
    DeleteTask(TaskId),
    ToggleTask(TaskId),
}

impl Action {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Load(_) => "load",
            Action::SetView { .. } => "set_view",
            Action::ToggleDarkMode => "toggle_dark_mode",
            Action::AddProject(_) => "add_project",
            Action::UpdateProject { .. } => "update_project",
            Action::DeleteProject(_) => "delete_project",
            Action::AddTask(_) => "add_task",
            Action::UpdateTask { .. } => "update_task",
            Action::DeleteTask(_) => "delete_task",
            Action::ToggleTask(_) => "toggle_task",
        }
    }

    /// False for navigation, whose fields are never stored
    pub fn touches_record(&self) -> bool {
        !matches!(self, Action::SetView { .. })
    }
}
