use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::{
    RendererKind, Surface, TaskRenderer, Theme, badge_span, checkbox_span, delete_span, pad,
    placeholder_style, task_badge, title_span,
};
use crate::model::record::TaskRecord;

const MIN_INNER_WIDTH: usize = 24;
const DELETE_LABEL: &str = "✕ Delete";

/// Bordered card per task: header (checkbox + badge), body (title),
/// footer (delete). All cards share the width of the widest one.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    theme: Theme,
}

impl CardRenderer {
    pub fn new(theme: Theme) -> Self {
        CardRenderer { theme }
    }

    fn border(&self, text: String) -> Span<'static> {
        Span::styled(text, Style::default().fg(self.theme.border))
    }

    /// `│ <content><padding> │`
    fn boxed(&self, mut content: Vec<Span<'static>>, inner: usize) -> Line<'static> {
        let used: usize = content.iter().map(|s| s.content.width()).sum();
        let mut spans = vec![self.border("│ ".into())];
        spans.append(&mut content);
        spans.push(Span::raw(pad_to(used, inner)));
        spans.push(self.border(" │".into()));
        Line::from(spans)
    }
}

fn pad_to(used: usize, width: usize) -> String {
    " ".repeat(width.saturating_sub(used))
}

fn inner_width(tasks: &[TaskRecord]) -> usize {
    tasks
        .iter()
        .map(|t| {
            let header = 3 + task_badge(t).map_or(0, |b| b.title.width() + 3);
            t.title.width().max(header)
        })
        .max()
        .unwrap_or(0)
        .max(MIN_INNER_WIDTH)
}

impl TaskRenderer for CardRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Card
    }

    fn render(&self, tasks: &[TaskRecord], surface: &mut Surface) {
        surface.clear(self.kind());
        if tasks.is_empty() {
            surface.set_placeholder(
                "Nothing to do! Add a task to get started.",
                placeholder_style(&self.theme),
            );
            return;
        }

        let inner = inner_width(tasks);
        let rule = "─".repeat(inner + 2);

        for (i, task) in tasks.iter().enumerate() {
            if i > 0 {
                surface.push_line(Line::default());
            }
            let start = surface.row();
            surface.push_line(Line::from(self.border(format!("╭{}╮", rule))));

            let mut header = vec![checkbox_span(task.complete, &self.theme)];
            if let Some(badge) = task_badge(task) {
                header.push(Span::raw(" "));
                header.push(badge_span(&badge, &self.theme));
            }
            surface.push_line(self.boxed(header, inner));

            surface.push_line(self.boxed(vec![title_span(task, &self.theme)], inner));

            let footer = vec![
                Span::raw(pad(DELETE_LABEL, inner)),
                delete_span(DELETE_LABEL, &self.theme),
            ];
            surface.push_line(self.boxed(footer, inner));

            surface.push_line(Line::from(self.border(format!("╰{}╯", rule))));
            surface.push_unit(task, start);
        }
    }
}
