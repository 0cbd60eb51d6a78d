use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::model::state::StoreState;
use crate::model::task::{Priority, Task};

// ---------------------------------------------------------------------------
// Project list
// ---------------------------------------------------------------------------

/// Project list filter. Empty search and `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub search: String,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        self.matches_search(project)
            && self.status.is_none_or(|s| project.status == s)
            && self.priority.is_none_or(|p| project.priority == p)
    }

    /// Case-insensitive substring match on name, description and category
    fn matches_search(&self, project: &Project) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&project.name, &project.description, &project.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Projects matching `filter`, in store order
pub fn filter_projects<'a>(state: &'a StoreState, filter: &ProjectFilter) -> Vec<&'a Project> {
    state.projects.iter().filter(|p| filter.matches(p)).collect()
}

/// The project named by `selectedProjectId`, if it still exists
pub fn selected_project(state: &StoreState) -> Option<&Project> {
    state
        .selected_project_id
        .as_ref()
        .and_then(|id| state.project(id))
}

// ---------------------------------------------------------------------------
// Task list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    /// Not yet completed
    Active,
    Completed,
}

impl TaskFilter {
    pub fn parse_filter(s: &str) -> Option<Self> {
        match s {
            "all" => Some(TaskFilter::All),
            "active" => Some(TaskFilter::Active),
            "completed" => Some(TaskFilter::Completed),
            _ => None,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

/// Tasks of one project: open before completed, then high → low priority.
/// Ties keep insertion order.
pub fn project_tasks<'a>(
    state: &'a StoreState,
    project_id: &'a ProjectId,
    filter: TaskFilter,
) -> Vec<&'a Task> {
    let mut tasks: Vec<&Task> = state
        .tasks_for(project_id)
        .filter(|t| filter.matches(t))
        .collect();
    tasks.sort_by_key(|t| (t.completed, t.priority.rank()));
    tasks
}
