use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - projects and tasks, kept locally"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Store data in this directory instead of the configured one
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show totals, upcoming deadlines and recent projects
    Dashboard,
    /// List projects
    Projects(ProjectsArgs),
    /// Show a project and its tasks
    Show(ShowArgs),
    /// Create a project
    AddProject(AddProjectArgs),
    /// Change project fields
    EditProject(EditProjectArgs),
    /// Delete a project and all of its tasks
    RmProject(ProjectRef),
    /// Add a task to a project
    AddTask(AddTaskArgs),
    /// Change task fields
    EditTask(EditTaskArgs),
    /// Delete a task
    RmTask(TaskRef),
    /// Mark a task done, or not done
    Toggle(TaskRef),
    /// Toggle dark mode
    Dark,
    /// Replace a project's notes
    Notes(NotesArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsArgs {
    /// Case-insensitive text to find in name, description or category
    #[arg(long, short)]
    pub search: Option<String>,
    /// Filter by status (planning, active, on-hold, completed)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project ID or unique ID prefix
    pub project: String,
    /// Which tasks to list (all, active, completed)
    #[arg(long, default_value = "all")]
    pub filter: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectRef {
    /// Project ID or unique ID prefix
    pub project: String,
}

#[derive(Args)]
pub struct TaskRef {
    /// Task ID or unique ID prefix
    pub task: String,
}

#[derive(Args)]
pub struct AddProjectArgs {
    /// Project name
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// planning, active, on-hold, completed (default: planning)
    #[arg(long)]
    pub status: Option<String>,
    /// low, medium, high (default: medium)
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Color token (default: #3b82f6)
    #[arg(long)]
    pub color: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct EditProjectArgs {
    /// Project ID or unique ID prefix
    pub project: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    /// Due date (YYYY-MM-DD), or "none" to clear
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct AddTaskArgs {
    /// Project ID or unique ID prefix
    pub project: String,
    /// Task title
    pub title: String,
    /// low, medium, high (default: medium)
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct EditTaskArgs {
    /// Task ID or unique ID prefix
    pub task: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD), or "none" to clear
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct NotesArgs {
    /// Project ID or unique ID prefix
    pub project: String,
    /// New notes text (empty string clears)
    pub text: String,
}
