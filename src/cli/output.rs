use serde::Serialize;

use crate::model::task::Task;
use crate::ops::stats::Statistics;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct OutcomeJson {
    pub action: &'static str,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

#[derive(Serialize)]
pub struct ClearedJson {
    pub action: &'static str,
    pub removed: usize,
}

#[derive(Serialize)]
pub struct ViewJson {
    pub view: String,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Multi-line detail block for `tp show`
pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  {}\n", task.id(), task.title()));
    let status = if task.is_complete() { "complete" } else { "pending" };
    out.push_str(&format!("status:   {}\n", status));
    if let Some(cat) = task.category() {
        out.push_str(&format!("category: {} ({})\n", cat.title(), cat.color()));
    }
    out.push_str(&format!(
        "created:  {}\n",
        task.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "updated:  {}",
        task.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

pub fn format_stats(stats: &Statistics) -> String {
    format!(
        "total:     {}\ncompleted: {}\npending:   {}\nrate:      {}%",
        stats.total,
        stats.completed,
        stats.pending,
        stats.rate_label()
    )
}
