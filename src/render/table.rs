use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::{
    RendererKind, Surface, TaskRenderer, Theme, badge_span, checkbox_span, delete_span, pad,
    placeholder_style, task_badge, title_span,
};
use crate::model::record::TaskRecord;

const HEADERS: [&str; 4] = ["Status", "Task", "Category", "Actions"];
const DELETE_LABEL: &str = "Delete";

/// Table with a header row and one row per task
#[derive(Debug, Clone)]
pub struct TableRenderer {
    theme: Theme,
}

impl TableRenderer {
    pub fn new(theme: Theme) -> Self {
        TableRenderer { theme }
    }

    fn separator(&self) -> Span<'static> {
        Span::styled(" │ ", Style::default().fg(self.theme.border))
    }
}

/// Column widths: fixed headers, or the widest cell
fn column_widths(tasks: &[TaskRecord]) -> [usize; 4] {
    let task_w = tasks.iter().map(|t| t.title.width()).max().unwrap_or(0);
    // badges render with one space of padding on each side
    let cat_w = tasks
        .iter()
        .filter_map(task_badge)
        .map(|b| b.title.width() + 2)
        .max()
        .unwrap_or(0);
    [
        HEADERS[0].len(),
        task_w.max(HEADERS[1].len()),
        cat_w.max(HEADERS[2].len()),
        HEADERS[3].len().max(DELETE_LABEL.len()),
    ]
}

impl TaskRenderer for TableRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Table
    }

    fn render(&self, tasks: &[TaskRecord], surface: &mut Surface) {
        surface.clear(self.kind());
        if tasks.is_empty() {
            surface.set_placeholder(
                "No tasks in the table. Add one to begin!",
                placeholder_style(&self.theme),
            );
            return;
        }

        let widths = column_widths(tasks);
        let header_style = Style::default()
            .fg(self.theme.text)
            .add_modifier(Modifier::BOLD);

        let mut header = Vec::new();
        for (i, title) in HEADERS.iter().enumerate() {
            if i > 0 {
                header.push(self.separator());
            }
            header.push(Span::styled(*title, header_style));
            header.push(Span::raw(pad(title, widths[i])));
        }
        surface.push_line(Line::from(header));

        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        surface.push_line(Line::from(Span::styled(
            rule.join("─┼─"),
            Style::default().fg(self.theme.border),
        )));

        for task in tasks {
            let start = surface.row();
            let mut spans = vec![
                checkbox_span(task.complete, &self.theme),
                Span::raw(pad("[ ]", widths[0])),
                self.separator(),
                title_span(task, &self.theme),
                Span::raw(pad(&task.title, widths[1])),
                self.separator(),
            ];
            match task_badge(task) {
                Some(badge) => {
                    let cell = format!(" {} ", badge.title);
                    spans.push(badge_span(&badge, &self.theme));
                    spans.push(Span::raw(pad(&cell, widths[2])));
                }
                None => spans.push(Span::raw(" ".repeat(widths[2]))),
            }
            spans.push(self.separator());
            spans.push(delete_span(DELETE_LABEL, &self.theme));
            surface.push_line(Line::from(spans));
            surface.push_unit(task, start);
        }
    }
}
