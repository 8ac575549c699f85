//! Presentation strategies.
//!
//! A [`TaskRenderer`] turns a list of [`TaskRecord`]s into a [`Surface`]:
//! styled terminal lines plus the semantic units (checkbox, title, badge,
//! delete action) the view binds input to. The four variants differ only
//! in layout and are selected at runtime through [`RendererKind`].

pub mod card;
pub mod compact;
pub mod list;
pub mod table;
pub mod theme;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::model::record::TaskRecord;

pub use card::CardRenderer;
pub use compact::CompactRenderer;
pub use list::ListRenderer;
pub use table::TableRenderer;
pub use theme::Theme;

/// Common contract of every presentation strategy
pub trait TaskRenderer {
    fn kind(&self) -> RendererKind;

    /// Clear `surface`, then draw either the empty-state placeholder or one
    /// unit per task in list order.
    fn render(&self, tasks: &[TaskRecord], surface: &mut Surface);
}

/// Which presentation strategy to use
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    List,
    Card,
    Table,
    Compact,
}

impl RendererKind {
    pub const ALL: [RendererKind; 4] = [
        RendererKind::List,
        RendererKind::Card,
        RendererKind::Table,
        RendererKind::Compact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::List => "list",
            RendererKind::Card => "card",
            RendererKind::Table => "table",
            RendererKind::Compact => "compact",
        }
    }

    /// Next kind in tab order, wrapping around
    pub fn next(self) -> RendererKind {
        let idx = RendererKind::ALL.iter().position(|k| *k == self).unwrap_or(0);
        RendererKind::ALL[(idx + 1) % RendererKind::ALL.len()]
    }

    pub fn build(self, theme: &Theme) -> Box<dyn TaskRenderer> {
        let theme = theme.clone();
        match self {
            RendererKind::List => Box::new(ListRenderer::new(theme)),
            RendererKind::Card => Box::new(CardRenderer::new(theme)),
            RendererKind::Table => Box::new(TableRenderer::new(theme)),
            RendererKind::Compact => Box::new(CompactRenderer::new(theme)),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view {0:?} (expected list, card, table or compact)")]
pub struct UnknownRenderer(pub String);

impl FromStr for RendererKind {
    type Err = UnknownRenderer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RendererKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRenderer(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Category badge shown next to a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub title: String,
    pub color: String,
}

/// One rendered task and the rows it occupies on the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUnit {
    pub id: u64,
    pub title: String,
    /// Checkbox state
    pub complete: bool,
    pub badge: Option<Badge>,
    pub rows: Range<usize>,
}

impl TaskUnit {
    fn new(task: &TaskRecord, rows: Range<usize>) -> Self {
        TaskUnit {
            id: task.id,
            title: task.title.clone(),
            complete: task.complete,
            badge: task_badge(task),
            rows,
        }
    }
}

/// Render target: styled lines plus the task units drawn on them
#[derive(Debug, Clone, Default)]
pub struct Surface {
    layout: Option<RendererKind>,
    lines: Vec<Line<'static>>,
    units: Vec<TaskUnit>,
    placeholder: Option<String>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all prior content and tag the surface with a layout
    pub fn clear(&mut self, layout: RendererKind) {
        self.layout = Some(layout);
        self.lines.clear();
        self.units.clear();
        self.placeholder = None;
    }

    pub fn layout(&self) -> Option<RendererKind> {
        self.layout
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn units(&self) -> &[TaskUnit] {
        &self.units
    }

    /// Empty-state message, if the last render had no tasks
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Index of the next line to be pushed
    pub fn row(&self) -> usize {
        self.lines.len()
    }

    pub fn push_line(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn push_unit(&mut self, task: &TaskRecord, start: usize) {
        let unit = TaskUnit::new(task, start..self.row());
        self.units.push(unit);
    }

    fn set_placeholder(&mut self, text: &str, style: Style) {
        self.placeholder = Some(text.to_string());
        self.lines.push(Line::from(Span::styled(text.to_string(), style)));
    }

    pub fn unit_at_row(&self, row: usize) -> Option<&TaskUnit> {
        self.units.iter().find(|u| u.rows.contains(&row))
    }

    pub fn unit_by_id(&self, id: u64) -> Option<&TaskUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Lines as plain text, trailing whitespace trimmed
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                let s: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                s.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ---------------------------------------------------------------------------
// Span helpers shared by the renderers
// ---------------------------------------------------------------------------

fn task_badge(task: &TaskRecord) -> Option<Badge> {
    let category = task.category.as_ref()?;
    if category.title.is_empty() {
        return None;
    }
    Some(Badge {
        title: category.title.clone(),
        color: category.color.clone(),
    })
}

fn checkbox_span(complete: bool, theme: &Theme) -> Span<'static> {
    if complete {
        Span::styled("[x]", Style::default().fg(theme.green))
    } else {
        Span::styled("[ ]", Style::default().fg(theme.text))
    }
}

/// Title text, struck through and dimmed when complete
fn title_span(task: &TaskRecord, theme: &Theme) -> Span<'static> {
    let style = if task.complete {
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text_bright)
    };
    Span::styled(task.title.clone(), style)
}

fn badge_span(badge: &Badge, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!(" {} ", badge.title),
        Style::default()
            .fg(theme.badge_text)
            .bg(theme.badge_color(&badge.color)),
    )
}

fn delete_span(label: &'static str, theme: &Theme) -> Span<'static> {
    Span::styled(label, Style::default().fg(theme.red))
}

fn placeholder_style(theme: &Theme) -> Style {
    Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC)
}

/// Right-pad to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        String::new()
    } else {
        " ".repeat(width - used)
    }
}
