use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::KeyValueStorage;
use crate::render::RendererKind;
use crate::tui::app::App;

/// Render the view tabs with a separator line below
pub fn render_tab_bar<S: KeyValueStorage + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    let rule = "\u{2500}".repeat(chunks[1].width as usize);
    let sep = Paragraph::new(Line::from(Span::styled(
        rule,
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    )));
    frame.render_widget(sep, chunks[1]);
}

fn render_tabs<S: KeyValueStorage + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg_style = Style::default().bg(app.theme.background);
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );
    let active = app.sync.renderer_kind();

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled(
            "\u{25B6}",
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background),
        ),
        Span::styled(" ", bg_style),
    ];

    for (i, kind) in RendererKind::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(sep.clone());
        }
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, tab_label(*kind)),
            tab_style(app, *kind == active),
        ));
    }

    let count = app.sync.store().len();
    spans.push(Span::styled(
        format!("  {} task{}", count, if count == 1 { "" } else { "s" }),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn tab_label(kind: RendererKind) -> &'static str {
    match kind {
        RendererKind::List => "List",
        RendererKind::Card => "Cards",
        RendererKind::Table => "Table",
        RendererKind::Compact => "Compact",
    }
}

fn tab_style<S: KeyValueStorage + 'static>(app: &App<S>, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::test_keys::test_app;
    use crate::tui::render::test_helpers::render_to_string;

    #[test]
    fn test_tab_bar_text() {
        let app = test_app(&[("a", ""), ("b", "")]);
        let out = render_to_string(60, 2, |frame, area| render_tab_bar(frame, &app, area));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            " \u{25B6}  1 List │ 2 Cards │ 3 Table │ 4 Compact   2 tasks"
        );
        assert_eq!(lines[1], "\u{2500}".repeat(60));
    }

    #[test]
    fn test_active_tab_is_highlighted() {
        let mut app = test_app(&[]);
        app.set_view(RendererKind::Table);
        let buf = crate::tui::render::test_helpers::render_to_buffer(60, 2, |frame, area| {
            render_tab_bar(frame, &app, area)
        });
        // " ▶ " is three cells, then " 1 List " (8) + "│" + " 2 Cards " (9) + "│"
        let table_col = 3 + 8 + 1 + 9 + 1 + 1;
        assert_eq!(buf[(table_col as u16, 0u16)].bg, app.theme.selection_bg);
        assert_eq!(buf[(4u16, 0u16)].bg, app.theme.background);
    }
}
