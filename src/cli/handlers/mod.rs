mod auth;
pub use auth::{cmd_login, cmd_logout, cmd_register};

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use chrono::Local;

use crate::alerts::{Alert, Notifier};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::context::AppContext;
use crate::model::dates;
use crate::model::task::{Priority, Task, TaskDraft, TaskId};
use crate::ops::filter::Filter;
use crate::ops::stats::TaskStats;
use crate::store::{AnyBackend, TaskStore};
use crate::view::actions::{self, Prompter, RowAction};
use crate::view::rows;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, ctx: &AppContext) -> CmdResult {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Err("no command given (try `todo --help`)".into());
    };

    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(ctx, args, json),
        Commands::Stats => cmd_stats(ctx, json),
        Commands::Watch(args) => cmd_watch(ctx, args),

        // Write commands
        Commands::Add(args) => cmd_add(ctx, args, json),
        Commands::Edit(args) => cmd_edit(ctx, args, json),
        Commands::Toggle(args) => cmd_toggle(ctx, args, json),
        Commands::Delete(args) => cmd_delete(ctx, args, json),

        // Session
        Commands::Login(args) => cmd_login(ctx, args, json),
        Commands::Register(args) => cmd_register(ctx, args, json),
        Commands::Logout => cmd_logout(ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(ctx: &AppContext) -> Result<TaskStore<AnyBackend>, Box<dyn std::error::Error>> {
    ctx.open_store().map_err(|e| {
        if e.is_auth() {
            format!("{} (run `todo login`)", e.user_message()).into()
        } else {
            e.user_message().into()
        }
    })
}

fn find_task<'a>(store: &'a TaskStore<AnyBackend>, id: &TaskId) -> Result<&'a Task, String> {
    store
        .get(id)
        .ok_or_else(|| format!("task not found: {}", id))
}

/// Print an outcome message, or the message plus the task as JSON
fn report(message: &str, task: Option<&Task>, json: bool) -> CmdResult {
    if json {
        let out = MessageJson {
            message: message.to_string(),
            task: task.map(task_to_json),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", message);
    }
    Ok(())
}

/// Line-based prompts on a reader/writer pair (stdin/stderr in practice)
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{}", question);
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt_title(&mut self, current: &str) -> Option<String> {
        self.ask(&format!("Edit task [{}]: ", current))
    }

    fn confirm_delete(&mut self, task: &Task) -> bool {
        self.ask(&format!("Delete \"{}\"? [y/n] ", task.title))
            .is_some_and(|a| a.trim().eq_ignore_ascii_case("y"))
    }
}

fn stdin_prompter() -> LinePrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    LinePrompter::new(std::io::stdin().lock(), std::io::stderr())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &AppContext, args: ListArgs, json: bool) -> CmdResult {
    let filter: Filter = args.filter.parse()?;
    let mut store = open_store(ctx)?;
    if filter != Filter::All {
        store.set_filter(filter).map_err(|e| e.user_message())?;
    }
    let visible = store.visible();

    if json {
        let out: Vec<TaskJson> = visible.iter().map(|t| task_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_list(&rows::project(&visible)) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(ctx: &AppContext, json: bool) -> CmdResult {
    let store = open_store(ctx)?;
    let stats = TaskStats::of(store.list());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(stats))?);
    } else {
        for line in format_stats(&stats) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_watch(ctx: &AppContext, args: WatchArgs) -> CmdResult {
    let mut store = open_store(ctx)?;
    let sink = Box::new(|alert: Alert| {
        println!("\x07{}: {}", alert.heading, alert.body);
    });
    let mut notifier = Notifier::from_config(&ctx.config.alerts, sink);
    if !notifier.is_active() {
        return Err("alerts are disabled in config ([alerts] enabled = false)".into());
    }

    let interval = Duration::from_secs(args.interval.max(1));
    let tick = Duration::from_secs(1);
    eprintln!("watching for due tasks (ctrl-c to stop)");
    notifier.scan(store.list(), Local::now().naive_local());
    loop {
        let mut waited = Duration::ZERO;
        while waited < interval {
            thread::sleep(tick);
            waited += tick;
            notifier.poll(Local::now().naive_local(), |id| {
                store.get(id).map(|t| t.completed)
            });
        }
        match store.refresh() {
            Ok(()) => notifier.scan(store.list(), Local::now().naive_local()),
            Err(e) if e.is_auth() => return Err(e.user_message().into()),
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &AppContext, args: AddArgs, json: bool) -> CmdResult {
    let mut draft = TaskDraft::new(args.title)
        .category(args.category.to_ascii_lowercase())
        .notify(args.notify);
    if let Some(ref due) = args.due {
        if let Some(due) = dates::parse_due(due)? {
            draft = draft.due(due);
        }
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(ref p) = args.priority {
        draft.priority = Priority::parse(p)
            .ok_or_else(|| format!("unknown priority '{}' (expected low, medium, high)", p))?;
    }

    let mut store = open_store(ctx)?;
    let task = store.add(draft).map_err(|e| e.user_message())?;
    report(actions::ADDED, Some(&task), json)
}

fn cmd_edit(ctx: &AppContext, args: EditArgs, json: bool) -> CmdResult {
    let mut store = open_store(ctx)?;
    let id = TaskId::new(args.id);
    let action = match args.title {
        Some(title) => RowAction::Edit(Some(title)),
        None => RowAction::edit_with(&mut stdin_prompter(), find_task(&store, &id)?),
    };
    match actions::apply(&mut store, &id, action).map_err(|e| e.user_message())? {
        Some(msg) => report(&msg, store.get(&id), json),
        None => report("cancelled", None, json),
    }
}

fn cmd_toggle(ctx: &AppContext, args: IdArgs, json: bool) -> CmdResult {
    let mut store = open_store(ctx)?;
    let id = TaskId::new(args.id);
    find_task(&store, &id)?;
    let msg = actions::apply(&mut store, &id, RowAction::Toggle)
        .map_err(|e| e.user_message())?
        .unwrap_or_default();
    report(&msg, store.get(&id), json)
}

fn cmd_delete(ctx: &AppContext, args: DeleteArgs, json: bool) -> CmdResult {
    let mut store = open_store(ctx)?;
    let id = TaskId::new(args.id);
    let action = if args.yes {
        RowAction::Delete { confirmed: true }
    } else {
        RowAction::delete_with(&mut stdin_prompter(), find_task(&store, &id)?)
    };
    match actions::apply(&mut store, &id, action).map_err(|e| e.user_message())? {
        Some(msg) => report(&msg, None, json),
        None => report("cancelled", None, json),
    }
}
