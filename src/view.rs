//! Output view model
//!
//! Everything the output side of the screen shows lives here as plain
//! state; `ui::render` only reads it. The hint panel and the full panel
//! are a single enum, so they can never be visible at the same time.

use crate::config::ThemeMode;
use crate::parser::{self, ParsedSections, Section, PLACEHOLDER};
use std::time::{Duration, Instant};

const COLLAPSED_GLYPH: char = '▶';
const EXPANDED_GLYPH: char = '▼';
const COPIED_FEEDBACK: Duration = Duration::from_millis(1500);

/// Top-level output view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputView {
    Hint,
    Full,
}

/// A section header that can be folded open or closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collapsible {
    pub section: Section,
    pub label: String,
    pub expanded: bool,
}

impl Collapsible {
    fn new(section: Section) -> Self {
        Self {
            section,
            label: format!("{} {} {}", COLLAPSED_GLYPH, section.emoji(), section.title()),
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.set_expanded(!self.expanded);
    }

    /// Swap the leading glyph, leaving the rest of the label untouched.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
        let glyph = if expanded { EXPANDED_GLYPH } else { COLLAPSED_GLYPH };
        let rest: String = self.label.chars().skip(2).collect();
        self.label = format!("{} {}", glyph, rest);
    }
}

#[derive(Debug, Clone)]
pub struct ViewModel {
    pub view: OutputView,
    pub hint_text: String,
    /// Rendered field values, placeholder already substituted
    fields: [String; 5],
    pub sections: Vec<Collapsible>,
    pub empty_state_visible: bool,
    pub theme: ThemeMode,
    /// Service classification of the last full response, if any
    pub error_type: Option<String>,
    copied_at: Option<Instant>,
}

impl ViewModel {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            view: OutputView::Full,
            hint_text: PLACEHOLDER.to_string(),
            fields: placeholder_fields(),
            sections: Section::all().iter().map(|s| Collapsible::new(*s)).collect(),
            empty_state_visible: true,
            theme,
            error_type: None,
            copied_at: None,
        }
    }

    pub fn hint_visible(&self) -> bool {
        self.view == OutputView::Hint
    }

    pub fn full_visible(&self) -> bool {
        self.view == OutputView::Full
    }

    pub fn field(&self, section: Section) -> &str {
        &self.fields[section.index()]
    }

    pub fn show_hint_only(&mut self, text: &str) {
        self.view = OutputView::Hint;
        self.hint_text = text.to_string();
    }

    pub fn show_full_output(&mut self, raw: &str) {
        self.view = OutputView::Full;
        let parsed: ParsedSections = parser::parse(raw);
        if parsed.is_empty() {
            tracing::warn!("response carried no known section");
        }
        for section in Section::all() {
            self.fields[section.index()] = parsed.display(*section).to_string();
        }
        if let Some(first) = self.sections.first_mut() {
            first.set_expanded(true);
        }
    }

    pub fn clear_output(&mut self) {
        self.view = OutputView::Full;
        self.fields = placeholder_fields();
        self.hint_text = PLACEHOLDER.to_string();
        self.error_type = None;
        self.empty_state_visible = true;
    }

    pub fn hide_empty_state(&mut self) {
        self.empty_state_visible = false;
    }

    pub fn toggle_section(&mut self, index: usize) {
        if let Some(section) = self.sections.get_mut(index) {
            section.toggle();
        }
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn theme_label(&self) -> &'static str {
        self.theme.label()
    }

    /// True when every field still shows the placeholder
    pub fn all_fields_placeholder(&self) -> bool {
        self.fields.iter().all(|f| f == PLACEHOLDER)
    }

    pub fn mark_copied(&mut self) {
        self.copied_at = Some(Instant::now());
    }

    pub fn copy_label(&self) -> &'static str {
        self.copy_label_at(Instant::now())
    }

    fn copy_label_at(&self, now: Instant) -> &'static str {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPIED_FEEDBACK => "Copied!",
            _ => "Copy",
        }
    }
}

fn placeholder_fields() -> [String; 5] {
    std::array::from_fn(|_| PLACEHOLDER.to_string())
}
