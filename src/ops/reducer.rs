use chrono::Utc;

use crate::model::action::Action;
use crate::model::project::{NewProject, ProjectId, ProjectPatch};
use crate::model::state::{Snapshot, StoreState, View};
use crate::model::task::{NewTask, TaskId, TaskPatch};

/// Compute the next state from the current one. Total: every action yields a
/// state, and actions naming an unknown id leave the state unchanged.
pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::Load(snapshot) => load(&mut state, snapshot),
        Action::SetView { view, project_id } => set_view(&mut state, view, project_id),
        Action::ToggleDarkMode => state.dark_mode = !state.dark_mode,
        Action::AddProject(new) => add_project(&mut state, new),
        Action::UpdateProject { id, patch } => update_project(&mut state, &id, patch),
        Action::DeleteProject(id) => delete_project(&mut state, &id),
        Action::AddTask(new) => add_task(&mut state, new),
        Action::UpdateTask { id, patch } => update_task(&mut state, &id, patch),
        Action::DeleteTask(id) => state.tasks.retain(|t| t.id != id),
        Action::ToggleTask(id) => toggle_task(&mut state, &id),
    }
    state
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Shallow merge: each field present in the snapshot replaces the current one
fn load(state: &mut StoreState, snapshot: Snapshot) {
    if let Some(projects) = snapshot.projects {
        state.projects = projects;
    }
    if let Some(tasks) = snapshot.tasks {
        state.tasks = tasks;
    }
    if let Some(dark_mode) = snapshot.dark_mode {
        state.dark_mode = dark_mode;
    }
}

fn set_view(state: &mut StoreState, view: View, project_id: Option<ProjectId>) {
    state.active_view = view;
    if project_id.is_some() {
        state.selected_project_id = project_id;
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// New projects go to the front
fn add_project(state: &mut StoreState, new: NewProject) {
    let project = new.into_project(ProjectId::generate(), Utc::now());
    state.projects.insert(0, project);
}

fn update_project(state: &mut StoreState, id: &ProjectId, patch: ProjectPatch) {
    if let Some(project) = state.projects.iter_mut().find(|p| &p.id == id) {
        patch.apply(project);
    }
}

/// Remove the project and its tasks in one step, then return to the list
fn delete_project(state: &mut StoreState, id: &ProjectId) {
    state.projects.retain(|p| &p.id != id);
    state.tasks.retain(|t| &t.project_id != id);
    state.active_view = View::Projects;
    state.selected_project_id = None;
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Append a task. Tasks for a project that doesn't exist are dropped so the
/// task list never holds orphans.
fn add_task(state: &mut StoreState, new: NewTask) {
    if state.project(&new.project_id).is_none() {
        return;
    }
    let task = new.into_task(TaskId::generate(), Utc::now());
    state.tasks.push(task);
}

fn update_task(state: &mut StoreState, id: &TaskId, patch: TaskPatch) {
    if let Some(task) = state.tasks.iter_mut().find(|t| &t.id == id) {
        patch.apply(task);
    }
}

fn toggle_task(state: &mut StoreState, id: &TaskId) {
    if let Some(task) = state.tasks.iter_mut().find(|t| &t.id == id) {
        task.completed = !task.completed;
    }
}
