use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::KeyValueStorage;
use crate::tui::app::{App, Mode};

/// Draw the active renderer's surface with the selected task highlighted.
/// Adjusts `app.scroll` so the selection stays on screen.
pub fn render_content<S: KeyValueStorage + 'static>(
    frame: &mut Frame,
    app: &mut App<S>,
    area: Rect,
) {
    let surface = app.sync.surface();
    let height = area.height as usize;
    let selected = surface.units().get(app.cursor).map(|u| u.rows.clone());

    if let Some(rows) = &selected {
        if rows.start < app.scroll {
            app.scroll = rows.start;
        } else if rows.end > app.scroll + height {
            app.scroll = rows.end.saturating_sub(height);
        }
    }
    app.scroll = app.scroll.min(surface.lines().len().saturating_sub(height));

    let bg = Style::default().bg(app.theme.background);
    let marker_style = Style::default().fg(app.theme.highlight).bg(app.theme.background);
    // no selection while adding or confirming a clear
    let show_selection = matches!(app.mode, Mode::Navigate | Mode::Edit(_));

    let lines: Vec<Line> = surface
        .lines()
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(height)
        .map(|(row, line)| {
            let is_selected =
                show_selection && selected.as_ref().is_some_and(|r| r.contains(&row));
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            if is_selected {
                spans.push(Span::styled("\u{258E}", marker_style));
            } else {
                spans.push(Span::styled(" ", bg));
            }
            spans.extend(line.spans.iter().cloned());
            let out = Line::from(spans);
            if is_selected {
                out.patch_style(Style::default().bg(app.theme.selection_bg))
            } else {
                out
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(bg), area);
}
