use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::storage::FileStorage;
use crate::model::action::Action;
use crate::model::project::{NewProject, ProjectId, ProjectPatch};
use crate::model::state::{StoreState, View};
use crate::model::task::{NewTask, TaskId, TaskPatch};
use crate::ops::dashboard::dashboard_summary;
use crate::ops::filter::{ProjectFilter, filter_projects, project_tasks, selected_project};
use crate::ops::progress::project_progress;
use crate::store::{Store, StoreOptions};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let mut store = open_store(cli.data_dir.as_deref())?;
    let today = Local::now().date_naive();

    let read_only = matches!(
        cli.command,
        Commands::Dashboard | Commands::Projects(_) | Commands::Show(_)
    );
    if !read_only && !store.is_saving() {
        return Err("stored data could not be read, refusing to change it".into());
    }

    match cli.command {
        // Read commands
        Commands::Dashboard => cmd_dashboard(&mut store, json, today),
        Commands::Projects(args) => cmd_projects(&mut store, args, json, today),
        Commands::Show(args) => cmd_show(&mut store, args, json, today),

        // Write commands
        Commands::AddProject(args) => cmd_add_project(&mut store, args, json),
        Commands::EditProject(args) => cmd_edit_project(&mut store, args, json),
        Commands::RmProject(args) => cmd_rm_project(&mut store, args, json),
        Commands::AddTask(args) => cmd_add_task(&mut store, args, json),
        Commands::EditTask(args) => cmd_edit_task(&mut store, args, json),
        Commands::RmTask(args) => cmd_rm_task(&mut store, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut store, args, json),
        Commands::Dark => cmd_dark(&mut store, json),
        Commands::Notes(args) => cmd_notes(&mut store, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(data_dir: Option<&str>) -> Result<Store<FileStorage>, Box<dyn std::error::Error>> {
    let config = config_io::read_config()?;
    let dir = config_io::resolve_data_dir(data_dir.map(Path::new), &config);
    Ok(Store::open(FileStorage::new(dir), StoreOptions::from(&config)))
}

/// Resolve a full id or unique id prefix among `ids`
fn resolve_prefix<'a>(
    ids: impl Iterator<Item = &'a str>,
    prefix: &str,
    kind: &str,
) -> Result<String, String> {
    if prefix.is_empty() {
        return Err(format!("{} id cannot be empty", kind));
    }
    let mut matches = Vec::new();
    for id in ids {
        if id == prefix {
            return Ok(id.to_string());
        }
        if id.starts_with(prefix) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [] => Err(format!("{} not found: {}", kind, prefix)),
        [only] => Ok(only.to_string()),
        _ => Err(format!(
            "{} id '{}' is ambiguous ({} matches)",
            kind,
            prefix,
            matches.len()
        )),
    }
}

fn resolve_project(state: &StoreState, prefix: &str) -> Result<ProjectId, String> {
    resolve_prefix(state.projects.iter().map(|p| p.id.as_str()), prefix, "project").map(ProjectId)
}

fn resolve_task(state: &StoreState, prefix: &str) -> Result<TaskId, String> {
    resolve_prefix(state.tasks.iter().map(|t| t.id.as_str()), prefix, "task").map(TaskId)
}

fn require_text(value: &str, what: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", what))
    } else {
        Ok(())
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_dashboard(store: &mut Store<FileStorage>, json: bool, today: NaiveDate) -> CmdResult {
    store.dispatch(Action::SetView {
        view: View::Dashboard,
        project_id: None,
    });
    let state = store.state();
    let summary = dashboard_summary(&state, today);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dashboard_to_json(&summary, today))?
        );
    } else {
        print_lines(&format_dashboard(&summary, today));
    }
    Ok(())
}

fn cmd_projects(
    store: &mut Store<FileStorage>,
    args: ProjectsArgs,
    json: bool,
    today: NaiveDate,
) -> CmdResult {
    let filter = ProjectFilter {
        search: args.search.unwrap_or_default(),
        status: args.status.as_deref().map(parse_status).transpose()?,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
    };
    store.dispatch(Action::SetView {
        view: View::Projects,
        project_id: None,
    });
    let state = store.state();
    let projects = filter_projects(&state, &filter);

    if json {
        let out: Vec<ProjectJson> = projects
            .iter()
            .map(|&p| ProjectJson {
                project: p,
                progress: project_progress(&state, &p.id).map(Into::into),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if projects.is_empty() {
        println!("no projects");
    } else {
        for p in projects {
            println!(
                "{}",
                format_project_line(p, project_progress(&state, &p.id), today)
            );
        }
    }
    Ok(())
}

fn cmd_show(
    store: &mut Store<FileStorage>,
    args: ShowArgs,
    json: bool,
    today: NaiveDate,
) -> CmdResult {
    let filter = parse_task_filter(&args.filter)?;
    let id = resolve_project(&store.state(), &args.project)?;
    store.dispatch(Action::SetView {
        view: View::ProjectDetail,
        project_id: Some(id.clone()),
    });

    let state = store.state();
    let project =
        selected_project(&state).ok_or_else(|| format!("project not found: {}", id))?;
    let progress = project_progress(&state, &id);
    let tasks = project_tasks(&state, &id, filter);

    if json {
        let out = ProjectDetailJson {
            project,
            progress: progress.map(Into::into),
            tasks,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_lines(&format_project_detail(project, progress, &tasks, today));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

fn cmd_add_project(store: &mut Store<FileStorage>, args: AddProjectArgs, json: bool) -> CmdResult {
    require_text(&args.name, "project name")?;
    let defaults = NewProject::default();
    let new = NewProject {
        name: args.name,
        description: args.description.unwrap_or_default(),
        status: args
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or(defaults.status),
        priority: args
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()?
            .unwrap_or(defaults.priority),
        category: args.category.unwrap_or_default(),
        color: args.color.unwrap_or(defaults.color),
        due_date: args.due.as_deref().map(parse_due).transpose()?.flatten(),
        notes: args.notes.unwrap_or_default(),
    };
    store.dispatch(Action::AddProject(new));

    let state = store.state();
    let project = state
        .projects
        .first()
        .ok_or("project was not created")?;
    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        println!("{}", project.id);
    }
    Ok(())
}

fn cmd_edit_project(store: &mut Store<FileStorage>, args: EditProjectArgs, json: bool) -> CmdResult {
    let id = resolve_project(&store.state(), &args.project)?;
    if let Some(name) = &args.name {
        require_text(name, "project name")?;
    }
    let patch = ProjectPatch {
        name: args.name,
        description: args.description,
        status: args.status.as_deref().map(parse_status).transpose()?,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        category: args.category,
        color: args.color,
        due_date: args.due.as_deref().map(parse_due).transpose()?,
        notes: args.notes,
    };
    if patch.is_empty() {
        return Err("nothing to change (pass at least one field flag)".into());
    }
    store.dispatch(Action::UpdateProject {
        id: id.clone(),
        patch,
    });
    print_project_result(store, &id, json, "updated")
}

fn cmd_notes(store: &mut Store<FileStorage>, args: NotesArgs, json: bool) -> CmdResult {
    let id = resolve_project(&store.state(), &args.project)?;
    store.dispatch(Action::UpdateProject {
        id: id.clone(),
        patch: ProjectPatch {
            notes: Some(args.text),
            ..Default::default()
        },
    });
    print_project_result(store, &id, json, "notes saved for")
}

fn print_project_result(
    store: &Store<FileStorage>,
    id: &ProjectId,
    json: bool,
    verb: &str,
) -> CmdResult {
    let state = store.state();
    let project = state
        .project(id)
        .ok_or_else(|| format!("project not found: {}", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        println!("{} {} ({})", verb, project.name, short_id(project.id.as_str()));
    }
    Ok(())
}

fn cmd_rm_project(store: &mut Store<FileStorage>, args: ProjectRef, json: bool) -> CmdResult {
    let state = store.state();
    let id = resolve_project(&state, &args.project)?;
    let name = state.project(&id).map(|p| p.name.clone()).unwrap_or_default();
    let task_count = state.tasks_for(&id).count();

    store.dispatch(Action::DeleteProject(id.clone()));

    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": id, "tasksDeleted": task_count })
        );
    } else {
        println!("deleted {} and {} task(s)", name, task_count);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add_task(store: &mut Store<FileStorage>, args: AddTaskArgs, json: bool) -> CmdResult {
    let project_id = resolve_project(&store.state(), &args.project)?;
    require_text(&args.title, "task title")?;
    let new = NewTask {
        priority: args
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()?
            .unwrap_or_default(),
        due_date: args.due.as_deref().map(parse_due).transpose()?.flatten(),
        ..NewTask::new(project_id, args.title)
    };
    let before = store.state().tasks.len();
    store.dispatch(Action::AddTask(new));

    let state = store.state();
    if state.tasks.len() == before {
        return Err("task was not created".into());
    }
    let task = state.tasks.last().ok_or("task was not created")?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_edit_task(store: &mut Store<FileStorage>, args: EditTaskArgs, json: bool) -> CmdResult {
    let id = resolve_task(&store.state(), &args.task)?;
    if let Some(title) = &args.title {
        require_text(title, "task title")?;
    }
    let patch = TaskPatch {
        title: args.title,
        completed: None,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        due_date: args.due.as_deref().map(parse_due).transpose()?,
    };
    if patch.is_empty() {
        return Err("nothing to change (pass --title, --priority or --due)".into());
    }
    store.dispatch(Action::UpdateTask {
        id: id.clone(),
        patch,
    });
    print_task_result(store, &id, json)
}

fn cmd_toggle(store: &mut Store<FileStorage>, args: TaskRef, json: bool) -> CmdResult {
    let id = resolve_task(&store.state(), &args.task)?;
    store.dispatch(Action::ToggleTask(id.clone()));
    print_task_result(store, &id, json)
}

fn print_task_result(store: &Store<FileStorage>, id: &TaskId, json: bool) -> CmdResult {
    let state = store.state();
    let task = state
        .tasks
        .iter()
        .find(|t| &t.id == id)
        .ok_or_else(|| format!("task not found: {}", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_rm_task(store: &mut Store<FileStorage>, args: TaskRef, json: bool) -> CmdResult {
    let id = resolve_task(&store.state(), &args.task)?;
    store.dispatch(Action::DeleteTask(id.clone()));
    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("deleted task {}", short_id(id.as_str()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

fn cmd_dark(store: &mut Store<FileStorage>, json: bool) -> CmdResult {
    store.dispatch(Action::ToggleDarkMode);
    let on = store.state().dark_mode;
    if json {
        println!("{}", serde_json::json!({ "darkMode": on }));
    } else {
        println!("dark mode: {}", if on { "on" } else { "off" });
    }
    Ok(())
}
