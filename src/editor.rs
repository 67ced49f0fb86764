//! Multi-line text fields
//!
//! Thin wrapper over `tui-textarea`, used for the code editor and the error
//! field. Every input reports whether the content changed so the caller can
//! refresh the statistics line.

use crossterm::event::KeyEvent;
use tui_textarea::{CursorMove, Input, TextArea};

pub const INITIAL_CODE: &str = "# Write your Python code here\n";

pub struct TextField {
    textarea: TextArea<'static>,
}

impl Default for TextField {
    fn default() -> Self {
        Self::with_value("")
    }
}

impl TextField {
    pub fn with_value(value: &str) -> Self {
        let mut field = Self {
            textarea: TextArea::default(),
        };
        field.set_value(value);
        field
    }

    /// Code editor preloaded with the starter comment
    pub fn code_editor() -> Self {
        Self::with_value(INITIAL_CODE)
    }

    /// Full content, lines joined with `\n`
    pub fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Replace the whole content. The cursor moves to the end.
    pub fn set_value(&mut self, value: &str) {
        let lines: Vec<String> = normalize_newlines(value)
            .split('\n')
            .map(String::from)
            .collect();
        self.textarea = TextArea::new(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.textarea.cursor()
    }

    /// Apply an editing key. Returns true when the content changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.textarea.input(Input::from(key))
    }

    /// Insert a bracketed paste at the cursor, line breaks included.
    pub fn paste(&mut self, text: &str) -> bool {
        let text = normalize_newlines(text);
        if text.is_empty() {
            return false;
        }
        self.textarea.insert_str(&text)
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    /// Styling is applied by the renderer on every frame
    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }
}

/// Terminals deliver pasted line breaks as `\r` or `\r\n`
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
