use ratatui::text::{Line, Span};

use super::{
    RendererKind, Surface, TaskRenderer, Theme, badge_span, checkbox_span, delete_span,
    placeholder_style, task_badge, title_span,
};
use crate::model::record::TaskRecord;

/// One line per task: `[ ] title  badge  Delete`
#[derive(Debug, Clone)]
pub struct ListRenderer {
    theme: Theme,
}

impl ListRenderer {
    pub fn new(theme: Theme) -> Self {
        ListRenderer { theme }
    }
}

impl TaskRenderer for ListRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::List
    }

    fn render(&self, tasks: &[TaskRecord], surface: &mut Surface) {
        surface.clear(self.kind());
        if tasks.is_empty() {
            surface.set_placeholder("Nothing to do! Add a task?", placeholder_style(&self.theme));
            return;
        }

        for task in tasks {
            let start = surface.row();
            let mut spans = vec![
                checkbox_span(task.complete, &self.theme),
                Span::raw(" "),
                title_span(task, &self.theme),
            ];
            if let Some(badge) = task_badge(task) {
                spans.push(Span::raw("  "));
                spans.push(badge_span(&badge, &self.theme));
            }
            spans.push(Span::raw("  "));
            spans.push(delete_span("[Delete]", &self.theme));
            surface.push_line(Line::from(spans));
            surface.push_unit(task, start);
        }
    }
}
