use clap::{Args, Parser, Subcommand};

use crate::model::TaskId;
use crate::render::RendererKind;

#[derive(Parser)]
#[command(name = "tp", about = concat!("[x] taskpad v", env!("CARGO_PKG_VERSION"), " - a todo list for your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .taskpad/ workspace in the current directory
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// Change a task's title
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Toggle a task between pending and complete
    Toggle(IdArgs),
    /// List tasks using one of the views
    List(ListArgs),
    /// Show task details
    Show(IdArgs),
    /// Show completion statistics
    Stats,
    /// Delete every task
    Clear,
    /// Show or set the default view
    View(ViewArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Rewrite the config even if .taskpad/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Category label (e.g. Work, House)
    #[arg(long, short = 'c', default_value = "")]
    pub category: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: TaskId,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: TaskId,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only completed tasks
    #[arg(long, conflicts_with = "pending")]
    pub completed: bool,
    /// Only pending tasks
    #[arg(long)]
    pub pending: bool,
    /// Only tasks in this category (exact match)
    #[arg(long)]
    pub category: Option<String>,
    /// View to render with (default: from config)
    #[arg(long, value_enum)]
    pub view: Option<RendererKind>,
}

#[derive(Args)]
pub struct ViewArgs {
    /// New default view (omit to print the current one)
    #[arg(value_enum)]
    pub kind: Option<RendererKind>,
}
