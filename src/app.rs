//! Application state and event handling for debugmate

use crate::client::{DebugTransport, HttpTransport};
use crate::clipboard::{self, ClipboardBackend, SystemClipboard};
use crate::config::Config;
use crate::editor::TextField;
use crate::error::DebugError;
use crate::parser::Section;
use crate::speech::{self, CommandSpeech, SpeechEngine};
use crate::stats::EditorStats;
use crate::submit::{self, Submission};
use crate::types::{FlashMessage, Mode};
use crate::ui::Theme;
use crate::view::ViewModel;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;

/// Which pane receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    ErrorField,
    Output,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Editor => Focus::ErrorField,
            Focus::ErrorField => Focus::Output,
            Focus::Output => Focus::Editor,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Focus::Editor => Focus::Output,
            Focus::ErrorField => Focus::Editor,
            Focus::Output => Focus::ErrorField,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PopupState {
    None,
    Notice {
        title: String,
        message: String,
        is_error: bool,
    },
}

/// Main application state
pub struct App {
    pub should_quit: bool,
    pub config: Config,
    config_path: PathBuf,
    pub theme: Theme,
    pub focus: Focus,
    pub popup: PopupState,
    pub flash_message: Option<FlashMessage>,

    // Form
    pub editor: TextField,
    pub stats: EditorStats,
    pub error_field: TextField,
    pub mode: Mode,

    // Output
    pub view: ViewModel,
    pub selected_section: usize,
    pub output_scroll: u16,

    submission: Submission,
    speech: Box<dyn SpeechEngine>,
    clipboard: Box<dyn ClipboardBackend>,
}

impl App {
    pub fn new(config: Config, piped_input: Option<String>) -> Result<Self> {
        let config_path = Config::path()?;
        let transport: Arc<dyn DebugTransport> = Arc::new(HttpTransport::new(&config));
        let speech = Box::new(CommandSpeech::new(config.speech_command.as_deref()));
        let clipboard = Box::new(SystemClipboard::default());

        let mut app = Self::with_backends(config, config_path, transport, speech, clipboard);
        if let Some(code) = piped_input {
            app.editor.set_value(&code);
            app.on_code_changed();
        }
        Ok(app)
    }

    pub fn with_backends(
        config: Config,
        config_path: PathBuf,
        transport: Arc<dyn DebugTransport>,
        speech: Box<dyn SpeechEngine>,
        clipboard: Box<dyn ClipboardBackend>,
    ) -> Self {
        let editor = TextField::code_editor();
        let stats = EditorStats::compute(&editor.value());

        Self {
            should_quit: false,
            theme: Theme::from_mode(config.theme),
            view: ViewModel::new(config.theme),
            mode: config.default_mode,
            config,
            config_path,
            focus: Focus::Editor,
            popup: PopupState::None,
            flash_message: None,
            editor,
            stats,
            error_field: TextField::default(),
            selected_section: 0,
            output_scroll: 0,
            submission: Submission::new(transport),
            speech,
            clipboard,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.submission.in_flight()
    }

    pub fn request_secs(&self) -> u64 {
        self.submission.elapsed().map_or(0, |d| d.as_secs())
    }

    pub fn show_flash(&mut self, msg: &str, is_error: bool) {
        self.flash_message = Some(FlashMessage::new(msg.to_string(), is_error));
    }

    fn show_notice(&mut self, err: &DebugError) {
        let is_error = err.is_transport();
        self.popup = PopupState::Notice {
            title: (if is_error { "Error" } else { "Notice" }).to_string(),
            message: err.notice().to_string(),
            is_error,
        };
    }

    // ── Actions ──

    pub fn on_code_changed(&mut self) {
        self.stats = EditorStats::compute(&self.editor.value());
    }

    pub fn clear_code(&mut self) {
        self.editor.set_value("");
        self.on_code_changed();
    }

    pub fn clear_output(&mut self) {
        self.speech.cancel();
        self.view.clear_output();
        self.selected_section = 0;
        self.output_scroll = 0;
    }

    pub fn submit(&mut self) {
        self.speech.cancel();
        self.view.hide_empty_state();

        let code = self.editor.value();
        let error = self.error_field.value();
        match self.submission.submit(&code, &error, self.mode) {
            Ok(()) => tracing::info!("submitted {} chars in {} mode", code.len(), self.mode.as_str()),
            Err(e) => self.show_notice(&e),
        }
    }

    pub fn listen(&mut self) {
        if let Err(e) = speech::listen(self.speech.as_mut(), &self.view) {
            self.show_notice(&e);
        }
    }

    pub fn stop_speech(&mut self) {
        self.speech.cancel();
    }

    pub fn copy_output(&mut self) {
        match clipboard::copy_output(self.clipboard.as_mut(), &mut self.view) {
            Ok(()) => self.show_flash("Copied!", false),
            Err(e) => self.show_notice(&e),
        }
    }

    pub fn toggle_theme(&mut self) {
        let mode = self.view.toggle_theme();
        self.theme = Theme::from_mode(mode);
        self.config.theme = mode;

        // Write only the theme: command-line overrides stay session-local
        let mut persisted =
            Config::load_from(&self.config_path).unwrap_or_else(|_| self.config.clone());
        persisted.theme = mode;
        tracing::info!("theme set to {}", mode.as_str());
        if let Err(e) = persisted.save_to(&self.config_path) {
            tracing::error!("failed to persist theme: {:#}", e);
            self.show_flash(&format!("Could not save theme: {}", e), true);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    /// Poll background work. Called once per loop iteration.
    pub fn update_timers(&mut self) -> Result<()> {
        if let Some(msg) = &self.flash_message {
            if msg.is_expired(3) {
                self.flash_message = None;
            }
        }

        if let Some(outcome) = self.submission.poll() {
            let routed = outcome.and_then(|resp| submit::route(&resp, &mut self.view));
            match routed {
                Ok(()) => {
                    self.output_scroll = 0;
                    self.selected_section = 0;
                }
                Err(e) => {
                    tracing::error!("debug request failed: {}", e);
                    self.show_notice(&e);
                }
            }
        }
        Ok(())
    }

    // ── Keys ──

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let PopupState::Notice { .. } = self.popup {
            match key.code {
                KeyCode::Char('o') | KeyCode::Enter | KeyCode::Esc => {
                    self.popup = PopupState::None;
                }
                _ => {}
            }
            return Ok(());
        }

        if self.handle_global_key(key) {
            return Ok(());
        }

        match self.focus {
            Focus::Editor => {
                if self.editor.handle_key(key) {
                    self.on_code_changed();
                }
            }
            Focus::ErrorField => {
                self.error_field.handle_key(key);
            }
            Focus::Output => self.handle_output_key(key),
        }
        Ok(())
    }

    /// Bracketed paste goes verbatim into the focused text field.
    pub fn handle_paste(&mut self, text: &str) {
        if !matches!(self.popup, PopupState::None) {
            return;
        }
        match self.focus {
            Focus::Editor => {
                if self.editor.paste(text) {
                    self.on_code_changed();
                }
            }
            Focus::ErrorField => {
                self.error_field.paste(text);
            }
            Focus::Output => {}
        }
    }

    /// Keys that work regardless of focus. Returns true when consumed.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::F(5) => self.submit(),
            KeyCode::F(2) => self.toggle_mode(),
            KeyCode::F(3) => self.listen(),
            KeyCode::F(4) => self.copy_output(),
            KeyCode::F(6) => self.clear_output(),
            KeyCode::F(7) => self.clear_code(),
            KeyCode::F(8) => self.toggle_theme(),
            KeyCode::Esc => self.stop_speech(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            // The editor keeps Tab for indentation
            KeyCode::Tab if self.focus != Focus::Editor => self.focus = self.focus.next(),
            _ => return false,
        }
        true
    }

    fn handle_output_key(&mut self, key: KeyEvent) {
        let last = Section::all().len() - 1;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected_section = (self.selected_section + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_section = self.selected_section.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.view.toggle_section(self.selected_section);
            }
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(5),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(5),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }
}
