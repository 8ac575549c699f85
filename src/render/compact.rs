use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::{
    RendererKind, Surface, TaskRenderer, Theme, delete_span, placeholder_style, task_badge,
    title_span,
};
use crate::model::record::TaskRecord;

/// Dense rows: `✓ title ·badge ×`
#[derive(Debug, Clone)]
pub struct CompactRenderer {
    theme: Theme,
}

impl CompactRenderer {
    pub fn new(theme: Theme) -> Self {
        CompactRenderer { theme }
    }

    fn checkbox(&self, complete: bool) -> Span<'static> {
        if complete {
            Span::styled("✓", Style::default().fg(self.theme.green))
        } else {
            Span::styled("○", Style::default().fg(self.theme.dim))
        }
    }
}

impl TaskRenderer for CompactRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Compact
    }

    fn render(&self, tasks: &[TaskRecord], surface: &mut Surface) {
        surface.clear(self.kind());
        if tasks.is_empty() {
            surface.set_placeholder("✓ All clear! Add a task.", placeholder_style(&self.theme));
            return;
        }

        for task in tasks {
            let start = surface.row();
            let mut spans = vec![
                self.checkbox(task.complete),
                Span::raw(" "),
                title_span(task, &self.theme),
            ];
            if let Some(badge) = task_badge(task) {
                // compact badges are colored text rather than a filled block
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("·{}", badge.title),
                    Style::default().fg(self.theme.badge_color(&badge.color)),
                ));
            }
            spans.push(Span::raw(" "));
            spans.push(delete_span("×", &self.theme));
            surface.push_line(Line::from(spans));
            surface.push_unit(task, start);
        }
    }
}
