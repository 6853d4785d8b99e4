use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo", about = concat!("[x] todo v", env!("CARGO_PKG_VERSION"), " - tasks, due dates and reminders"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use the REST backend regardless of config
    #[arg(long, global = true)]
    pub remote: bool,

    /// Directory holding tasks.json and session.json
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Change a task's title
    Edit(EditArgs),
    /// Flip a task between active and completed
    Toggle(IdArgs),
    /// Delete a task
    Delete(DeleteArgs),
    /// Show task counts
    Stats,
    /// Stay running and print alerts as tasks come due
    Watch(WatchArgs),
    /// Log in to the REST backend
    Login(LoginArgs),
    /// Create an account on the REST backend
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
}

#[derive(Args)]
pub struct ListArgs {
    /// all, active or completed
    #[arg(long, short = 'f', default_value = "all")]
    pub filter: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Due date, e.g. 2024-05-01T14:30
    #[arg(long)]
    pub due: Option<String>,
    /// personal, work, shopping, health or other
    #[arg(
        long,
        short = 'c',
        default_value = "personal",
        value_parser = ["personal", "work", "shopping", "health", "other"],
        ignore_case = true
    )]
    pub category: String,
    /// Alert shortly before the due date
    #[arg(long)]
    pub notify: bool,
    /// Longer description
    #[arg(long)]
    pub description: Option<String>,
    /// low, medium or high
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title (prompted when omitted)
    pub title: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ID
    pub id: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between reloads
    #[arg(long, default_value_t = 30)]
    pub interval: u64,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    /// Read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    /// Read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}
