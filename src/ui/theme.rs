//! Theme definitions for debugmate
//!
//! Two palettes, light and dark, chosen by the persisted theme flag.
//! One theme instance, applied to every panel.

use crate::config::ThemeMode;
use ratatui::style::{Color, Modifier, Style};

/// Complete theme with all required colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // Accent colors
    pub accent: Color,
    pub accent_dim: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Code panes (editor, fixed code, example)
    pub code_bg: Color,
}

impl Theme {
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Gruvbox dark (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(40, 40, 40),
            fg: Color::Rgb(235, 219, 178),
            fg_dim: Color::Rgb(146, 131, 116),
            accent: Color::Rgb(254, 128, 25),
            accent_dim: Color::Rgb(214, 93, 14),
            success: Color::Rgb(184, 187, 38),
            warning: Color::Rgb(250, 189, 47),
            error: Color::Rgb(251, 73, 52),
            border: Color::Rgb(80, 73, 69),
            border_focused: Color::Rgb(168, 153, 132),
            selection_bg: Color::Rgb(80, 73, 69),
            selection_fg: Color::Rgb(235, 219, 178),
            code_bg: Color::Rgb(29, 32, 33),
        }
    }

    /// Solarized light
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(253, 246, 227),
            fg: Color::Rgb(88, 110, 117),
            fg_dim: Color::Rgb(147, 161, 161),
            accent: Color::Rgb(38, 139, 210),     // blue
            accent_dim: Color::Rgb(42, 161, 152), // cyan
            success: Color::Rgb(133, 153, 0),     // green
            warning: Color::Rgb(181, 137, 0),     // yellow
            error: Color::Rgb(220, 50, 47),       // red
            border: Color::Rgb(210, 203, 184),
            border_focused: Color::Rgb(38, 139, 210),
            selection_bg: Color::Rgb(238, 232, 213),
            selection_fg: Color::Rgb(7, 54, 66),
            code_bg: Color::Rgb(238, 232, 213),
        }
    }

    // === STYLE HELPERS ===

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn code(&self) -> Style {
        Style::default().fg(self.fg).bg(self.code_bg)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused).bg(self.bg)
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent_dim)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning).bg(self.bg)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    pub fn block_style(&self) -> Style {
        Style::default().bg(self.bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_mode() {
        let dark = Theme::from_mode(ThemeMode::Dark);
        assert_eq!(dark.bg, Color::Rgb(40, 40, 40));

        let light = Theme::from_mode(ThemeMode::Light);
        assert_eq!(light.bg, Color::Rgb(253, 246, 227));
        assert_ne!(light.fg, dark.fg);
    }
}
