mod init;
pub use init::cmd_init;

use std::collections::HashSet;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::storage::FileStorage;
use crate::io::workspace::{self, Workspace, WorkspaceError};
use crate::model::task::{Task, TaskId};
use crate::render::{RendererKind, Surface, Theme};
use crate::sync::{EventOutcome, Synchronizer, UiEvent};

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> HandlerResult {
    let json = cli.json;
    let dir = cli.dir.as_deref();

    match cli.command {
        None => Err("no command given (try `tp --help`)".into()),
        Some(cmd) => match cmd {
            // Init runs before workspace discovery
            Commands::Init(args) => cmd_init(args, dir, json),

            // Read commands
            Commands::List(args) => cmd_list(args, dir, json),
            Commands::Show(args) => cmd_show(args, dir, json),
            Commands::Stats => cmd_stats(dir, json),
            Commands::View(args) => cmd_view(args, dir, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, dir, json),
            Commands::Edit(args) => cmd_edit(args, dir, json),
            Commands::Rm(args) => cmd_rm(args, dir, json),
            Commands::Toggle(args) => cmd_toggle(args, dir, json),
            Commands::Clear => cmd_clear(dir, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Locate the workspace from `-C` or the current directory
pub fn load_workspace_at(dir: Option<&str>) -> Result<Workspace, WorkspaceError> {
    let start = match dir {
        Some(d) => std::fs::canonicalize(d)?,
        None => std::env::current_dir()?,
    };
    let root = workspace::discover_workspace(&start)?;
    workspace::load_workspace(&root)
}

/// Hydrate a synchronizer over the workspace's file storage
pub fn open_sync(
    ws: &Workspace,
    kind: RendererKind,
) -> Result<Synchronizer<FileStorage>, crate::sync::SyncError> {
    Synchronizer::open(
        ws.storage(),
        &ws.config.storage.key,
        kind,
        Theme::from_config(&ws.config.ui),
    )
}

fn open_default(
    dir: Option<&str>,
) -> Result<(Workspace, Synchronizer<FileStorage>), Box<dyn std::error::Error>> {
    let ws = load_workspace_at(dir)?;
    let sync = open_sync(&ws, ws.config.ui.renderer)?;
    Ok((ws, sync))
}

fn not_found(id: TaskId) -> Box<dyn std::error::Error> {
    format!("task not found: {}", id).into()
}

fn print_outcome(action: &'static str, id: TaskId, complete: Option<bool>) -> HandlerResult {
    print_json(&OutcomeJson {
        action,
        id,
        complete,
    })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let ws = load_workspace_at(dir)?;
    let kind = args.view.unwrap_or(ws.config.ui.renderer);
    let sync = open_sync(&ws, kind)?;
    let store = sync.store();

    let mut tasks: Vec<Task> = if args.completed {
        store.get_completed()
    } else if args.pending {
        store.get_pending()
    } else {
        store.get_all()
    };
    if let Some(cat) = args.category.as_deref() {
        let in_category: HashSet<TaskId> =
            store.get_by_category(cat).iter().map(Task::id).collect();
        tasks.retain(|t| in_category.contains(&t.id()));
    }
    let records: Vec<_> = tasks.iter().map(Task::to_record).collect();

    if json {
        print_json(&records)?;
        return Ok(());
    }

    let renderer = kind.build(&Theme::from_config(&ws.config.ui));
    let mut surface = Surface::new();
    renderer.render(&records, &mut surface);
    println!("{}", surface.to_plain_text());
    Ok(())
}

fn cmd_show(args: IdArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, sync) = open_default(dir)?;
    let task = sync.store().get_by_id(args.id).ok_or_else(|| not_found(args.id))?;
    if json {
        print_json(&task.to_record())?;
    } else {
        println!("{}", format_task_detail(&task));
    }
    Ok(())
}

fn cmd_stats(dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, sync) = open_default(dir)?;
    let stats = sync.store().get_statistics();
    if json {
        print_json(&stats)?;
    } else {
        println!("{}", format_stats(&stats));
    }
    Ok(())
}

fn cmd_view(args: ViewArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let ws = load_workspace_at(dir)?;
    let view = match args.kind {
        Some(kind) => {
            let (_config, mut doc) = config_io::read_config(&ws.data_dir)?;
            config_io::set_renderer(&mut doc, kind);
            config_io::write_config(&ws.data_dir, &doc)?;
            tracing::info!(view = %kind, "default view changed");
            kind
        }
        None => ws.config.ui.renderer,
    };
    if json {
        print_json(&ViewJson {
            view: view.to_string(),
        })?;
    } else {
        println!("{}", view);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, mut sync) = open_default(dir)?;
    let outcome = sync.handle(UiEvent::Submit {
        text: args.title,
        category: args.category,
    })?;
    let EventOutcome::Added(task) = outcome else {
        return Err("task was not added".into());
    };
    if json {
        print_json(&task.to_record())?;
    } else {
        println!("{}", task.id());
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, mut sync) = open_default(dir)?;
    match sync.handle(UiEvent::Edit {
        id: args.id,
        text: args.title,
    })? {
        EventOutcome::Updated(id) if json => print_outcome("edit", id, None),
        EventOutcome::Updated(_) => Ok(()),
        _ => Err(not_found(args.id)),
    }
}

fn cmd_rm(args: IdArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, mut sync) = open_default(dir)?;
    match sync.handle(UiEvent::Delete { id: args.id })? {
        EventOutcome::Deleted(id) if json => print_outcome("rm", id, None),
        EventOutcome::Deleted(_) => Ok(()),
        _ => Err(not_found(args.id)),
    }
}

fn cmd_toggle(args: IdArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, mut sync) = open_default(dir)?;
    match sync.handle(UiEvent::Toggle { id: args.id })? {
        EventOutcome::Toggled(task) => {
            if json {
                print_outcome("toggle", task.id(), Some(task.is_complete()))
            } else {
                let state = if task.is_complete() { "complete" } else { "pending" };
                println!("{} {}", task.id(), state);
                Ok(())
            }
        }
        _ => Err(not_found(args.id)),
    }
}

fn cmd_clear(dir: Option<&str>, json: bool) -> HandlerResult {
    let (_ws, mut sync) = open_default(dir)?;
    let removed = sync.store().len();
    sync.handle(UiEvent::ClearAll)?;
    if json {
        print_json(&ClearedJson {
            action: "clear",
            removed,
        })?;
    } else {
        println!("removed {} task(s)", removed);
    }
    Ok(())
}
