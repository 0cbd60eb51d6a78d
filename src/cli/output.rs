use chrono::NaiveDate;
use serde::Serialize;

use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Priority, Task};
use crate::ops::dashboard::{DashboardSummary, DueLabel};
use crate::ops::filter::TaskFilter;
use crate::ops::progress::Progress;

/// Number of id characters shown in human-readable output
pub const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectJson<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressJson>,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub done: usize,
    pub total: usize,
    pub percent: u32,
}

impl From<Progress> for ProgressJson {
    fn from(p: Progress) -> Self {
        ProgressJson {
            done: p.done,
            total: p.total,
            percent: p.percent(),
        }
    }
}

#[derive(Serialize)]
pub struct ProjectDetailJson<'a> {
    pub project: &'a Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressJson>,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardJson<'a> {
    pub total_projects: usize,
    pub active_projects: usize,
    pub tasks: ProgressJson,
    pub overdue_projects: usize,
    pub upcoming: Vec<UpcomingJson<'a>>,
    pub recent: Vec<&'a Project>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingJson<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub due_date: Option<NaiveDate>,
    pub due: Option<DueLabel>,
}

pub fn dashboard_to_json<'a>(summary: &DashboardSummary<'a>, today: NaiveDate) -> DashboardJson<'a> {
    DashboardJson {
        total_projects: summary.total_projects,
        active_projects: summary.active_projects,
        tasks: summary.tasks.into(),
        overdue_projects: summary.overdue_projects,
        upcoming: summary
            .upcoming
            .iter()
            .map(|&p| UpcomingJson {
                id: p.id.as_str(),
                name: &p.name,
                due_date: p.due_date,
                due: p.due_date.map(|d| DueLabel::from_dates(d, today)),
            })
            .collect(),
        recent: summary.recent.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn format_progress(progress: Option<Progress>) -> String {
    match progress {
        Some(p) if p.is_complete() => format!("{}/{} (done)", p.done, p.total),
        Some(p) => format!("{}/{} ({}%)", p.done, p.total, p.percent()),
        None => "no tasks".to_string(),
    }
}

/// Format a project as a one-line summary
pub fn format_project_line(project: &Project, progress: Option<Progress>, today: NaiveDate) -> String {
    let due_str = project
        .due_date
        .map(|d| format!("  due {} ({})", d, DueLabel::from_dates(d, today)))
        .unwrap_or_default();
    format!(
        "{}  {}  [{}] {}  {}{}",
        short_id(project.id.as_str()),
        project.name,
        project.status,
        project.priority,
        format_progress(progress),
        due_str
    )
}

/// Format a task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let due_str = task
        .due_date
        .map(|d| format!(" due {}", d))
        .unwrap_or_default();
    format!(
        "[{}] {} {} ({}){}",
        check,
        short_id(task.id.as_str()),
        task.title,
        task.priority,
        due_str
    )
}

/// Format the detailed project view
pub fn format_project_detail(
    project: &Project,
    progress: Option<Progress>,
    tasks: &[&Task],
    today: NaiveDate,
) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("{} ({})", project.name, project.id));
    lines.push(format!(
        "status: {}  priority: {}  color: {}",
        project.status.label(),
        project.priority,
        project.color
    ));
    if !project.category.is_empty() {
        lines.push(format!("category: {}", project.category));
    }
    if let Some(due) = project.due_date {
        lines.push(format!("due: {} ({})", due, DueLabel::from_dates(due, today)));
    }
    if !project.description.is_empty() {
        lines.push(format!("description: {}", project.description));
    }
    lines.push(format!("progress: {}", format_progress(progress)));
    if !project.notes.is_empty() {
        lines.push("notes:".to_string());
        for line in project.notes.lines() {
            lines.push(format!("  {}", line));
        }
    }

    lines.push(String::new());
    if tasks.is_empty() {
        lines.push("(no tasks)".to_string());
    }
    for task in tasks {
        lines.push(format_task_line(task));
    }
    lines
}

/// Format the dashboard overview
pub fn format_dashboard(summary: &DashboardSummary<'_>, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "projects: {} ({} active, {} overdue)",
        summary.total_projects, summary.active_projects, summary.overdue_projects
    ));
    let task_pct = if summary.tasks.total > 0 {
        format!(" - {}% done", summary.tasks.percent())
    } else {
        String::new()
    };
    lines.push(format!(
        "tasks: {}/{} complete{}",
        summary.tasks.done, summary.tasks.total, task_pct
    ));

    lines.push(String::new());
    lines.push("-- Upcoming --".to_string());
    if summary.upcoming.is_empty() {
        lines.push("  (nothing due)".to_string());
    }
    for project in &summary.upcoming {
        if let Some(due) = project.due_date {
            let label = DueLabel::from_dates(due, today);
            let mark = if label.is_urgent() { '!' } else { ' ' };
            lines.push(format!(
                "{} {}  {}  {}",
                mark,
                short_id(project.id.as_str()),
                project.name,
                label
            ));
        }
    }

    lines.push(String::new());
    lines.push("-- Recent --".to_string());
    for project in &summary.recent {
        lines.push(format!(
            "  {}  {}  [{}]",
            short_id(project.id.as_str()),
            project.name,
            project.status
        ));
    }
    lines
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

pub fn parse_status(s: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse_status(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: planning, active, on-hold, completed)",
            s
        )
    })
}

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse_priority(s)
        .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
}

pub fn parse_task_filter(s: &str) -> Result<TaskFilter, String> {
    TaskFilter::parse_filter(s)
        .ok_or_else(|| format!("unknown filter '{}' (expected: all, active, completed)", s))
}

/// Parse a due date; `none` (or empty) means no due date
pub fn parse_due(s: &str) -> Result<Option<NaiveDate>, String> {
    match s.trim() {
        "" | "none" => Ok(None),
        s => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::{NewProject, ProjectId};
    use crate::model::task::{NewTask, TaskId};
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn short_id_truncates() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn project_line() {
        let project = NewProject {
            name: "Launch".into(),
            status: ProjectStatus::Active,
            priority: Priority::High,
            due_date: Some(date("2026-03-12")),
            ..Default::default()
        }
        .into_project(ProjectId::from("abcdef1234"), Utc::now());

        let line = format_project_line(
            &project,
            Some(Progress { done: 1, total: 3 }),
            date("2026-03-10"),
        );
        assert_eq!(
            line,
            "abcdef12  Launch  [active] high  1/3 (33%)  due 2026-03-12 (2d left)"
        );
        let line = format_project_line(&project, None, date("2026-03-10"));
        assert!(line.contains("no tasks"));
        let line = format_project_line(
            &project,
            Some(Progress { done: 2, total: 2 }),
            date("2026-03-10"),
        );
        assert!(line.contains("2/2 (done)"));
    }

    #[test]
    fn dashboard_marks_urgent_deadlines() {
        let today = date("2026-03-10");
        let soon = NewProject {
            name: "Soon".into(),
            due_date: Some(date("2026-03-12")),
            ..Default::default()
        }
        .into_project(ProjectId::from("aaaaaaaa11"), Utc::now());
        let later = NewProject {
            name: "Later".into(),
            due_date: Some(date("2026-04-01")),
            ..Default::default()
        }
        .into_project(ProjectId::from("bbbbbbbb22"), Utc::now());

        let summary = DashboardSummary {
            total_projects: 2,
            active_projects: 0,
            tasks: Progress::default(),
            overdue_projects: 0,
            upcoming: vec![&soon, &later],
            recent: vec![],
        };
        let lines = format_dashboard(&summary, today);
        assert!(lines.contains(&"! aaaaaaaa  Soon  2d left".to_string()));
        assert!(lines.contains(&"  bbbbbbbb  Later  22d left".to_string()));
    }

    #[test]
    fn task_line() {
        let mut task = NewTask::new(ProjectId::from("p"), "Draft plan")
            .into_task(TaskId::from("t1"), Utc::now());
        assert_eq!(format_task_line(&task), "[ ] t1 Draft plan (medium)");
        task.completed = true;
        task.due_date = Some(date("2026-01-10"));
        assert_eq!(
            format_task_line(&task),
            "[x] t1 Draft plan (medium) due 2026-01-10"
        );
    }

    #[test]
    fn parse_arguments() {
        assert_eq!(parse_status("on-hold"), Ok(ProjectStatus::OnHold));
        assert!(parse_status("paused").is_err());
        assert_eq!(parse_priority("low"), Ok(Priority::Low));
        assert!(parse_priority("urgent").is_err());
        assert_eq!(parse_due("none"), Ok(None));
        assert_eq!(parse_due("2026-02-01"), Ok(Some(date("2026-02-01"))));
        assert!(parse_due("02/01/2026").is_err());
        assert_eq!(parse_task_filter("completed"), Ok(TaskFilter::Completed));
    }
}
