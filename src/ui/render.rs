//! Main rendering module for debugmate
//!
//! Renders the complete UI:
//! - Header with theme and mode (top)
//! - Code editor, error field and stats (left)
//! - Hint or full output panel (right)
//! - Global status bar (bottom)
//! - Popup overlays + flash messages

use crate::app::{App, Focus, PopupState};
use crate::parser::Section;
use crate::ui::widgets;
use crate::ui::Theme;
use crate::view::ViewModel;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

/// Main render function, entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Fill entire background
    frame.render_widget(Block::default().style(app.theme.block_style()), area);

    let vertical = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(8),    // editor | output
        Constraint::Length(1), // status bar
    ])
    .split(area);

    render_header(frame, app, vertical[0]);

    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[1]);

    let left = Layout::vertical([
        Constraint::Min(4),    // editor
        Constraint::Length(6), // error field
        Constraint::Length(1), // stats
    ])
    .split(columns[0]);

    render_editor(frame, app, left[0]);
    render_error_field(frame, app, left[1]);
    render_stats(frame, app, left[2]);
    render_output(frame, app, columns[1]);

    render_status(frame, app, vertical[2]);

    if app.in_flight() {
        let message = format!("Analyzing your code… {}s", app.request_secs());
        widgets::render_loading(frame, &message, &app.theme, columns[1]);
    }

    if let PopupState::Notice {
        title,
        message,
        is_error,
    } = &app.popup
    {
        widgets::render_notice(frame, title, message, *is_error, &app.theme, area);
    }

    if let Some(msg) = &app.flash_message {
        widgets::render_flash_message(frame, &msg.text, msg.is_error, &app.theme, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let left = Line::from(vec![
        Span::styled(" 🐞 debugmate ", theme.title()),
        Span::styled("AI code debugger", theme.text_dim()),
    ]);
    frame.render_widget(Paragraph::new(left).style(theme.block_style()), area);

    let right = Line::from(vec![
        Span::styled("[F2] ", theme.key_hint()),
        Span::styled(format!("Mode: {}  ", app.mode.label()), theme.text()),
        Span::styled("[F8] ", theme.key_hint()),
        Span::styled(format!("{} ", app.view.theme_label()), theme.text()),
    ]);
    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right).style(theme.block_style()),
        area,
    );
}

fn focused_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .style(theme.block_style())
        .title(title)
        .title_style(if focused { theme.title() } else { theme.text_dim() })
        .borders(Borders::ALL)
        .border_style(if focused {
            theme.border_focused()
        } else {
            theme.border()
        })
}

fn render_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Editor && matches!(app.popup, PopupState::None);
    let block = focused_block(" Code ".to_string(), focused, &app.theme);

    let textarea = app.editor.textarea_mut();
    style_text_field(textarea, block, app.theme.code(), focused);
    textarea.set_line_number_style(Style::default().fg(app.theme.fg_dim).bg(app.theme.code_bg));

    frame.render_widget(app.editor.textarea(), area);
}

fn render_error_field(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::ErrorField && matches!(app.popup, PopupState::None);
    let block = focused_block(" Error message (optional) ".to_string(), focused, &app.theme);

    let textarea = app.error_field.textarea_mut();
    style_text_field(textarea, block, app.theme.text(), focused);
    textarea.set_placeholder_text("Paste the traceback or error here");
    textarea.set_placeholder_style(app.theme.text_dim());

    frame.render_widget(app.error_field.textarea(), area);
}

/// The cursor is only drawn in the focused field
fn style_text_field(
    textarea: &mut TextArea<'static>,
    block: Block<'static>,
    base: Style,
    focused: bool,
) {
    textarea.set_block(block);
    textarea.set_style(base);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_cursor_style(if focused {
        base.add_modifier(Modifier::REVERSED)
    } else {
        base
    });
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(format!(" {}", app.stats.lines_label()), theme.text_dim()),
        Span::styled("  │  ", theme.border()),
        Span::styled(app.stats.chars_label(), theme.text_dim()),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.block_style()), area);
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Output;
    let theme = &app.theme;
    let view = &app.view;

    let title = if view.hint_visible() {
        " 💡 Hint ".to_string()
    } else {
        match &view.error_type {
            Some(kind) => format!(" 🔍 Diagnosis · {} ", kind),
            None => " 🔍 Diagnosis ".to_string(),
        }
    };

    let actions = Line::from(vec![
        Span::styled("[F3] ", theme.key_hint()),
        Span::styled("Listen  ", theme.text()),
        Span::styled("[F4] ", theme.key_hint()),
        Span::styled(format!("{}  ", view.copy_label()), theme.text()),
        Span::styled("[F6] ", theme.key_hint()),
        Span::styled("Clear ", theme.text()),
    ])
    .alignment(Alignment::Right);

    let block = focused_block(title, focused, theme).title_top(actions);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if view.empty_state_visible {
        lines.extend(empty_state_lines(theme));
    }
    if view.hint_visible() {
        lines.extend(view.hint_text.split('\n').map(|l| Line::styled(l.to_string(), theme.text())));
    } else {
        lines.extend(full_output_lines(view, app.selected_section, focused, theme));
    }

    let paragraph = Paragraph::new(lines)
        .style(theme.text())
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));
    frame.render_widget(paragraph, inner);
}

fn empty_state_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::raw(""),
        Line::styled("Nothing analyzed yet", theme.title()).alignment(Alignment::Center),
        Line::styled(
            "Write or paste code, add the error, then press Ctrl+S",
            theme.text_dim(),
        )
        .alignment(Alignment::Center),
        Line::raw(""),
    ]
}

/// Section headers, with the content of expanded sections below them
pub fn full_output_lines<'a>(
    view: &'a ViewModel,
    selected: usize,
    focused: bool,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for (i, collapsible) in view.sections.iter().enumerate() {
        let header_style = if focused && i == selected {
            theme.selected()
        } else {
            theme.title()
        };
        lines.push(Line::styled(collapsible.label.as_str(), header_style));

        if collapsible.expanded {
            let is_code = matches!(collapsible.section, Section::FixedCode | Section::Example);
            let style = if is_code { theme.code() } else { theme.text() };
            for text in view.field(collapsible.section).split('\n') {
                lines.push(Line::from(vec![
                    Span::styled("  ", theme.text()),
                    Span::styled(text, style),
                ]));
            }
        }
        lines.push(Line::raw(""));
    }

    lines
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = &[
        ("^S", "Debug"),
        ("Tab", "Focus"),
        ("F7", "Clear code"),
        ("Esc", "Stop voice"),
        ("^Q", "Quit"),
    ];
    widgets::render_status_bar(frame, hints, &app.config.server_url, &app.theme, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::config::ThemeMode;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<String>>()
            .join("\n")
    }

    #[test]
    fn test_initial_screen() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(&dir);
        let text = screen_text(&mut app);
        assert!(text.contains("debugmate"));
        assert!(text.contains("Write your Python code here"));
        assert!(text.contains("Lines: 2"));
        assert!(text.contains("Nothing analyzed yet"));
        assert!(text.contains("Error Reason"));
    }

    #[test]
    fn test_error_field_shows_placeholder_then_lines() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(&dir);
        assert!(screen_text(&mut app).contains("Paste the traceback or error here"));

        app.error_field
            .set_value("Traceback (most recent call last):\nIndexError: list index out of range");
        let text = screen_text(&mut app);
        assert!(text.contains("Traceback (most recent call last):"));
        assert!(text.contains("IndexError: list index out of range"));
        assert!(!text.contains("Paste the traceback"));
    }

    #[test]
    fn test_very_long_line_renders() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(&dir);
        let long_line = format!("x = '{}'", "a".repeat(70_000));
        app.editor.set_value(&long_line);
        app.on_code_changed();
        let text = screen_text(&mut app);
        assert!(text.contains("Chars: 70006"));
        assert!(text.contains("aaaa"));
    }

    #[test]
    fn test_hint_screen_hides_sections() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(&dir);
        app.view.hide_empty_state();
        app.view.show_hint_only("Check the loop bounds");
        let text = screen_text(&mut app);
        assert!(text.contains("Check the loop bounds"));
        assert!(!text.contains("Fixed Code"));
    }

    #[test]
    fn test_full_lines_show_only_expanded_content() {
        let mut view = ViewModel::new(ThemeMode::Dark);
        view.show_full_output("ERROR_REASON: shown\nEXPLANATION: hidden");
        let theme = Theme::from_mode(ThemeMode::Dark);
        let text: Vec<String> = full_output_lines(&view, 0, false, &theme)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l.contains("shown")));
        assert!(!text.iter().any(|l| l.contains("hidden")));
        assert!(text[0].starts_with('▼'));
    }
}
