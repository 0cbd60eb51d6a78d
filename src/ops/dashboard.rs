use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::project::{Project, ProjectStatus};
use crate::model::state::StoreState;

use super::progress::{Progress, overall_progress};

/// How many projects the upcoming/recent lists show
pub const DASHBOARD_LIST_LEN: usize = 5;

/// Relative due-date label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "lowercase")]
pub enum DueLabel {
    Overdue(i64),
    Today,
    Left(i64),
}

impl DueLabel {
    pub fn from_dates(due: NaiveDate, today: NaiveDate) -> Self {
        let days = (due - today).num_days();
        match days {
            d if d < 0 => DueLabel::Overdue(-d),
            0 => DueLabel::Today,
            d => DueLabel::Left(d),
        }
    }

    /// Due within three days, or already overdue
    pub fn is_urgent(self) -> bool {
        match self {
            DueLabel::Overdue(_) | DueLabel::Today => true,
            DueLabel::Left(d) => d <= 3,
        }
    }
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Overdue(d) => write!(f, "{}d overdue", d),
            DueLabel::Today => write!(f, "Due today"),
            DueLabel::Left(d) => write!(f, "{}d left", d),
        }
    }
}

/// A project with a due date before today that isn't completed
pub fn is_overdue(project: &Project, today: NaiveDate) -> bool {
    project.status != ProjectStatus::Completed && project.due_date.is_some_and(|d| d < today)
}

/// Aggregate numbers and short lists for the overview screen
#[derive(Debug, Clone)]
pub struct DashboardSummary<'a> {
    pub total_projects: usize,
    pub active_projects: usize,
    pub tasks: Progress,
    pub overdue_projects: usize,
    /// Open projects with a due date, soonest first
    pub upcoming: Vec<&'a Project>,
    /// Newest projects by creation time
    pub recent: Vec<&'a Project>,
}

pub fn dashboard_summary(state: &StoreState, today: NaiveDate) -> DashboardSummary<'_> {
    let projects = &state.projects;

    let mut upcoming: Vec<&Project> = projects
        .iter()
        .filter(|p| p.due_date.is_some() && p.status != ProjectStatus::Completed)
        .collect();
    upcoming.sort_by_key(|p| p.due_date);
    upcoming.truncate(DASHBOARD_LIST_LEN);

    let mut recent: Vec<&Project> = projects.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(DASHBOARD_LIST_LEN);

    DashboardSummary {
        total_projects: projects.len(),
        active_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count(),
        tasks: overall_progress(state),
        overdue_projects: projects.iter().filter(|p| is_overdue(p, today)).count(),
        upcoming,
        recent,
    }
}
