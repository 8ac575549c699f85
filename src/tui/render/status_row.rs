use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::io::storage::KeyValueStorage;
use crate::tui::app::{AddField, App, Mode};
use crate::tui::input::text::TextInput;

const NAVIGATE_HINT: &str = "a add  e edit  d del  space toggle  v view  q quit";
const ADD_HINT: &str = "Tab field  Enter add  Esc cancel";
const EDIT_HINT: &str = "Enter save  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row<S: KeyValueStorage + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let label = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let (spans, hint) = match app.mode {
        Mode::Navigate => {
            let spans = match &app.message {
                Some(msg) => {
                    let fg = if msg.is_error { app.theme.red } else { app.theme.green };
                    vec![Span::styled(format!(" {}", msg.text), Style::default().fg(fg).bg(bg))]
                }
                None => vec![Span::styled(
                    format!(" {}", app.sync.store().get_statistics()),
                    Style::default().fg(app.theme.dim).bg(bg),
                )],
            };
            (spans, app.show_key_hints.then_some(NAVIGATE_HINT))
        }
        Mode::Add => {
            let mut spans = vec![Span::styled(" add ", label)];
            spans.extend(field_spans(
                app,
                "title",
                &app.title_input,
                app.add_field == AddField::Title,
            ));
            spans.push(Span::styled("  ", Style::default().bg(bg)));
            spans.extend(field_spans(
                app,
                "category",
                &app.category_input,
                app.add_field == AddField::Category,
            ));
            push_error(app, &mut spans);
            (spans, Some(ADD_HINT))
        }
        Mode::Edit(id) => {
            let mut spans = vec![Span::styled(format!(" edit #{} ", id), label)];
            spans.extend(input_spans(app, &app.title_input, true));
            push_error(app, &mut spans);
            (spans, Some(EDIT_HINT))
        }
        Mode::ConfirmClear => {
            let count = app.sync.store().len();
            let spans = vec![Span::styled(
                format!(" Delete all {} tasks? (y/n)", count),
                Style::default().fg(app.theme.red).bg(bg),
            )];
            (spans, None)
        }
    };

    let line = right_align_hint(app, spans, hint, width);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

fn field_spans<'a, S: KeyValueStorage + 'static>(
    app: &App<S>,
    name: &'static str,
    input: &'a TextInput,
    focused: bool,
) -> Vec<Span<'a>> {
    let fg = if focused { app.theme.text_bright } else { app.theme.dim };
    let mut spans = vec![Span::styled(
        format!("{}: ", name),
        Style::default().fg(fg).bg(app.theme.background),
    )];
    spans.extend(input_spans(app, input, focused));
    spans
}

/// Buffer text with a `▌` cursor when focused
fn input_spans<'a, S: KeyValueStorage + 'static>(
    app: &App<S>,
    input: &'a TextInput,
    focused: bool,
) -> Vec<Span<'a>> {
    let text = Style::default().fg(app.theme.text_bright).bg(app.theme.background);
    if !focused {
        return vec![Span::styled(input.as_str(), text.fg(app.theme.text))];
    }
    vec![
        Span::styled(input.before_cursor(), text),
        Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(app.theme.background),
        ),
        Span::styled(input.after_cursor(), text),
    ]
}

fn push_error<S: KeyValueStorage + 'static>(app: &App<S>, spans: &mut Vec<Span>) {
    if let Some(msg) = app.message.as_ref().filter(|m| m.is_error) {
        spans.push(Span::styled(
            format!("  {}", msg.text),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        ));
    }
}

/// Pad between content and a right-aligned hint when both fit
fn right_align_hint<'a, S: KeyValueStorage + 'static>(
    app: &App<S>,
    mut spans: Vec<Span<'a>>,
    hint: Option<&'static str>,
    width: usize,
) -> Line<'a> {
    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| s.content.width()).sum();
        let hint_width = hint.width() + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(
                " ".repeat(padding),
                Style::default().bg(app.theme.background),
            ));
            spans.push(Span::styled(
                hint,
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            ));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::UiEvent;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::render_to_string;
    use crossterm::event::KeyCode;

    #[test]
    fn test_navigate_shows_statistics() {
        let mut app = test_app(&[("a", ""), ("b", ""), ("c", "")]);
        app.apply(UiEvent::Toggle { id: 1 });
        app.message = None;
        app.show_key_hints = false;
        let out = render_to_string(80, 1, |frame, area| render_status_row(frame, &app, area));
        assert_eq!(out, " 3 total, 1 done, 2 pending (33.3%)");
    }

    #[test]
    fn test_navigate_hint_right_aligned() {
        let app = test_app(&[]);
        let out = render_to_string(100, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with(" 0 total"));
        assert!(out.ends_with(NAVIGATE_HINT));
        assert_eq!(out.width(), 100 - 1);
    }

    #[test]
    fn test_add_prompt_shows_both_fields() {
        let mut app = test_app(&[]);
        handle_key(&mut app, ch('a'));
        type_str(&mut app, "Buy");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "Ho");
        let out = render_to_string(80, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with(" add title: Buy  category: Ho\u{258C}"));
        assert!(out.ends_with(ADD_HINT));
    }

    #[test]
    fn test_edit_prompt_with_error() {
        let mut app = test_app(&[("x", "")]);
        handle_key(&mut app, ch('e'));
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Enter));
        let out = render_to_string(120, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with(" edit #1 \u{258C}  task title cannot be empty"), "{}", out);
    }

    #[test]
    fn test_confirm_clear_prompt() {
        let mut app = test_app(&[("a", ""), ("b", "")]);
        handle_key(&mut app, ch('X'));
        let out = render_to_string(80, 1, |frame, area| render_status_row(frame, &app, area));
        assert_eq!(out, " Delete all 2 tasks? (y/n)");
    }
}
