//! Reusable UI widgets for debugmate
//!
//! - Notice popup
//! - Flash messages
//! - Loading indicator
//! - Status bar
//! - Layout helpers

use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Blocking notice: the message and an `[o] OK` hint, dismissed by the user
pub fn render_notice(
    frame: &mut Frame,
    title: &str,
    message: &str,
    is_error: bool,
    theme: &Theme,
    area: Rect,
) {
    let width = (message.chars().count() as u16 + 8).clamp(30, 60);
    let popup = centered_rect(width, 7, area);
    frame.render_widget(Clear, popup);

    let border = if is_error { theme.error() } else { theme.warning() };
    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", title))
        .title_style(theme.title());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::raw(""),
        Line::styled(message, theme.text().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[o]", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::styled(" OK", theme.text_dim()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

/// Render a loading indicator
pub fn render_loading(
    frame: &mut Frame,
    message: &str,
    theme: &Theme,
    area: Rect,
) {
    let spinner_frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let frame_idx = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / 100) as usize
        % spinner_frames.len();

    let content = Line::from(vec![
        Span::styled(spinner_frames[frame_idx], Style::default().fg(theme.accent)),
        Span::raw(" "),
        Span::styled(message, theme.text()),
    ]);

    let popup_width = 40.min(area.width.saturating_sub(4));
    let popup_area = centered_rect(popup_width, 3, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner);
}

/// Render a flash message on the last line of `area`
pub fn render_flash_message(
    frame: &mut Frame,
    message: &str,
    is_error: bool,
    theme: &Theme,
    area: Rect,
) {
    let style = if is_error { theme.error() } else { theme.success() };
    let prefix = if is_error { "✗ " } else { "✓ " };

    let flash_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, flash_area);
    let flash = Paragraph::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(message, style),
    ]))
    .style(theme.block_style());
    frame.render_widget(flash, flash_area);
}

/// Render status bar: key hints on the left, plain text on the right
pub fn render_status_bar(
    frame: &mut Frame,
    hints: &[(&str, &str)],
    right_content: &str,
    theme: &Theme,
    area: Rect,
) {
    frame.render_widget(Clear, area);

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {} ", key), theme.key_hint()),
                Span::styled(format!("{} ", label), theme.text_dim()),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.block_style()),
        area,
    );

    let right_len = right_content.chars().count() as u16;
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len + 1),
        y: area.y,
        width: (right_len + 1).min(area.width),
        height: 1,
    };
    frame.render_widget(Paragraph::new(right_content).style(theme.text_dim()), right_area);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered_rect(40, 10, area);
        assert_eq!(r, Rect::new(20, 7, 40, 10));

        let tiny = centered_rect(100, 50, Rect::new(0, 0, 10, 5));
        assert_eq!(tiny, Rect::new(0, 0, 10, 5));
    }

    #[test]
    fn test_notice_shows_message() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_notice(frame, "Notice", "Nothing to copy!", false, &theme, area)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Nothing to copy!"));
        assert!(text.contains("[o] OK"));
    }
}
